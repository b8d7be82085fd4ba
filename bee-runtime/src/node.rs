// Copyright 2020 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! A typed, retain/release-tracked resource handle, the same shape the coordinator core relies on
//! through `bee_tangle`'s cached message handles.

use log::warn;

use std::{
    any::type_name,
    collections::HashMap,
    ops::Deref,
    panic::Location,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex, Weak,
    },
};

static RES_ID: AtomicUsize = AtomicUsize::new(0);

/// A tracked, cloneable handle to a shared resource.
///
/// Cloning a handle is the "retain" half of a retain/release protocol: each clone records the
/// call site and the corresponding `Drop` removes that record again ("release"). This is the same
/// shape used by the tangle's cached metadata handles (see `bee_tangle::metadata`).
pub struct ResHandle<R> {
    id: Option<usize>,
    inner: Arc<(R, Mutex<HashMap<usize, &'static Location<'static>>>)>,
}

impl<R> ResHandle<R> {
    /// Wraps a resource in a fresh, untracked handle.
    pub fn new(res: R) -> Self {
        Self {
            id: None,
            inner: Arc::new((res, Mutex::new(HashMap::new()))),
        }
    }

    /// Downgrades this handle to a non-owning weak handle.
    pub fn into_weak(self) -> WeakHandle<R> {
        let inner = Arc::downgrade(&self.inner);
        drop(self);
        WeakHandle { inner }
    }

    /// Attempts to unwrap the inner resource, failing (and logging the outstanding call sites) if
    /// other handles are still alive.
    pub fn try_unwrap(self) -> Option<R> {
        let inner = self.inner.clone();
        drop(self);
        match Arc::try_unwrap(inner) {
            Ok((res, _)) => Some(res),
            Err(inner) => {
                let usages = inner
                    .1
                    .lock()
                    .unwrap()
                    .values()
                    .fold(String::new(), |s, loc| format!("{}\n- {}", s, loc));
                warn!(
                    "attempted to gain ownership of resource `{}` but it is still in use at: {}",
                    type_name::<R>(),
                    usages,
                );
                None
            }
        }
    }
}

impl<R> Clone for ResHandle<R> {
    #[track_caller]
    fn clone(&self) -> Self {
        let new_id = RES_ID.fetch_add(1, Ordering::Relaxed);
        self.inner.1.lock().unwrap().insert(new_id, Location::caller());
        Self {
            id: Some(new_id),
            inner: self.inner.clone(),
        }
    }
}

impl<R> Deref for ResHandle<R> {
    type Target = R;

    fn deref(&self) -> &Self::Target {
        &self.inner.0
    }
}

impl<R> Drop for ResHandle<R> {
    fn drop(&mut self) {
        if let Some(id) = self.id {
            self.inner.1.lock().unwrap().remove(&id);
        }
    }
}

/// A non-owning counterpart to [`ResHandle`] that does not keep the resource alive.
pub struct WeakHandle<R> {
    inner: Weak<(R, Mutex<HashMap<usize, &'static Location<'static>>>)>,
}

impl<R> WeakHandle<R> {
    /// Attempts to upgrade to a strong, tracked handle.
    #[track_caller]
    pub fn upgrade(&self) -> Option<ResHandle<R>> {
        let new_id = RES_ID.fetch_add(1, Ordering::Relaxed);
        let inner = self.inner.upgrade()?;
        inner.1.lock().unwrap().insert(new_id, Location::caller());
        Some(ResHandle {
            id: Some(new_id),
            inner,
        })
    }
}

impl<R> Clone for WeakHandle<R> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}
