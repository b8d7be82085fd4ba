// Copyright 2020 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! A simple typed event bus used by workers to publish and subscribe to runtime events.

use dashmap::DashMap;

use std::any::{Any, TypeId};

type Listener<'a> = dyn Fn(&dyn Any) + Send + Sync + 'a;

/// A bus that dispatches events of arbitrary types to registered listeners.
#[derive(Default)]
pub struct Bus<'a> {
    listeners: DashMap<TypeId, Vec<(Box<Listener<'a>>, TypeId)>>,
}

impl<'a> Bus<'a> {
    /// Dispatches an event to every listener registered for its type.
    pub fn dispatch<E: Any>(&self, event: E) {
        if let Some(mut ls) = self.listeners.get_mut(&TypeId::of::<E>()) {
            ls.iter_mut().for_each(|(l, _)| l(&event))
        }
    }

    /// Registers a listener for events of type `E`, tagged with the owning worker `W` so it can
    /// later be purged with [`Bus::purge_worker_listeners`].
    pub fn add_listener<W: Any, E: Any, F: Fn(&E) + Send + Sync + 'a>(&self, handler: F) {
        self.listeners.entry(TypeId::of::<E>()).or_default().push((
            Box::new(move |event| handler(event.downcast_ref().expect("invalid event"))),
            TypeId::of::<W>(),
        ));
    }

    /// Removes every listener that was registered by the given worker.
    pub fn purge_worker_listeners(&self, worker_id: TypeId) {
        self.listeners
            .iter_mut()
            .for_each(|mut listeners| listeners.retain(|(_, id)| *id != worker_id));
    }
}
