// Copyright 2020-2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! A breadth-first walk of a message's future cone: itself and every descendant reachable by
//! following child edges forward through the Tangle.
//!
//! This is the traverser the coordinator uses to find which messages a checkpoint or milestone
//! confirms: starting from the previous milestone's tips, it walks forward until it runs out of
//! matching messages, applying a consumer to everything it visits along the way.

use crate::{error::Error, metadata::MessageMetadata, tangle::Tangle};

use bee_message::{Message, MessageId};

use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicBool, Ordering},
        Mutex,
    },
};

/// Serializes traversals: only one Children Traverser runs against a given Tangle at a time, so
/// that two concurrent walks can't interleave their visits of a shared region of the DAG.
static TRAVERSAL_LOCK: Mutex<()> = Mutex::new(());

/// A handle used to cancel an in-progress traversal from another thread.
///
/// Cloning shares the same underlying flag; setting it via [`AbortHandle::abort`] causes the next
/// iteration of the walk loop to return [`Error::Aborted`].
#[derive(Clone, Default)]
pub struct AbortHandle(std::sync::Arc<AtomicBool>);

impl AbortHandle {
    /// Creates a fresh, not-yet-aborted handle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation of the traversal holding this handle.
    pub fn abort(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    fn is_aborted(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Walks the future cone of `root`, breadth-first, applying `matches` to decide whether to stop
/// descending through a message and `consume` on every message that matches.
///
/// `root` itself is visited first. A message that fails `matches` is not passed to `consume` and
/// its children are not enqueued. If `walk_already_discovered` is `false`, a message already
/// visited earlier in the same walk is skipped on subsequent encounters (the common case, since the
/// future cone of a DAG can re-converge); set it to `true` to revisit shared descendants every time
/// they are reached.
///
/// Every message visited is retained via a [`CachedMessage`](crate::tangle::CachedMessage) for the
/// duration of the walk and released once the walk ends, on every exit path including
/// [`Error::MessageNotFound`] and [`Error::Aborted`].
pub fn visit_children_follow<Match, Consume>(
    tangle: &Tangle,
    root: MessageId,
    walk_already_discovered: bool,
    abort: &AbortHandle,
    mut matches: Match,
    mut consume: Consume,
) -> Result<(), Error>
where
    Match: FnMut(&Message, &MessageMetadata) -> bool,
    Consume: FnMut(&MessageId, &Message, &MessageMetadata),
{
    let _single_traverser = TRAVERSAL_LOCK.lock().unwrap();

    let mut to_visit = VecDeque::new();
    let mut discovered = hashbrown::HashSet::new();
    to_visit.push_back(root);

    // Every retained handle lives here so it is released, via `Drop`, no matter which branch below
    // returns. Do not remove entries from this vec before the function exits.
    let mut retained = Vec::new();

    let outcome = (|| {
        while let Some(id) = to_visit.pop_front() {
            if abort.is_aborted() {
                return Err(Error::Aborted);
            }

            if !walk_already_discovered && !discovered.insert(id) {
                continue;
            }

            let vertex = tangle.get(&id).ok_or(Error::MessageNotFound(id))?;
            let metadata = vertex.metadata();

            if matches(vertex.message(), &metadata) {
                consume(&id, vertex.message(), &metadata);

                for child in tangle.children(&id) {
                    to_visit.push_back(child);
                }
            }

            retained.push(vertex);
        }

        Ok(())
    })();

    drop(retained);
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::MessageMetadata;
    use bee_message::parent::Parents;

    fn chain(tangle: &Tangle, parent: MessageId) -> MessageId {
        let message = Message::build(Parents::new(vec![parent]).unwrap()).finish().unwrap();
        let id = message.id();
        tangle.insert(id, message, MessageMetadata::new(0));
        id
    }

    #[test]
    fn visits_root_and_descendants_breadth_first() {
        let tangle = Tangle::new();
        let root = chain(&tangle, MessageId::NULL);
        let child_a = chain(&tangle, root);
        let child_b = chain(&tangle, root);
        let grandchild = chain(&tangle, child_a);

        let mut visited = Vec::new();
        visit_children_follow(&tangle, root, false, &AbortHandle::new(), |_, _| true, |id, _, _| {
            visited.push(*id)
        })
        .unwrap();

        assert_eq!(visited[0], root);
        assert!(visited.contains(&child_a));
        assert!(visited.contains(&child_b));
        assert!(visited.contains(&grandchild));
        assert_eq!(visited.len(), 4);
    }

    #[test]
    fn predicate_false_stops_descent() {
        let tangle = Tangle::new();
        let root = chain(&tangle, MessageId::NULL);
        let child = chain(&tangle, root);
        let _grandchild = chain(&tangle, child);

        let mut visited = Vec::new();
        visit_children_follow(
            &tangle,
            root,
            false,
            &AbortHandle::new(),
            |_, _| true,
            |id, _, _| visited.push(*id),
        )
        .unwrap();
        assert_eq!(visited.len(), 3);

        visited.clear();
        visit_children_follow(
            &tangle,
            root,
            false,
            &AbortHandle::new(),
            move |_, _| false,
            |_, _, _| unreachable!("predicate rejected root, consume must not run"),
        )
        .unwrap();
        assert!(visited.is_empty());
    }

    #[test]
    fn missing_root_is_an_error() {
        let tangle = Tangle::new();
        let err = visit_children_follow(
            &tangle,
            MessageId::NULL,
            false,
            &AbortHandle::new(),
            |_, _| true,
            |_, _, _| {},
        )
        .unwrap_err();
        assert!(matches!(err, Error::MessageNotFound(id) if id == MessageId::NULL));
    }

    #[test]
    fn abort_before_start_returns_aborted() {
        let tangle = Tangle::new();
        let root = chain(&tangle, MessageId::NULL);
        let abort = AbortHandle::new();
        abort.abort();

        let err = visit_children_follow(&tangle, root, false, &abort, |_, _| true, |_, _, _| {}).unwrap_err();
        assert!(matches!(err, Error::Aborted));
    }
}
