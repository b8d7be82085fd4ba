// Copyright 2020-2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use crate::metadata::MessageMetadata;

use bee_message::{payload::milestone::MilestoneIndex, Message, MessageId};
use bee_runtime::node::ResHandle;

use hashbrown::{HashMap, HashSet};

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Mutex, RwLock,
};

/// A message together with its mutable metadata, as stored in the [`Tangle`].
pub struct VertexData {
    message: Message,
    metadata: Mutex<MessageMetadata>,
}

impl VertexData {
    /// The message body. Immutable once inserted.
    pub fn message(&self) -> &Message {
        &self.message
    }

    /// A snapshot of the message's current metadata.
    pub fn metadata(&self) -> MessageMetadata {
        self.metadata.lock().unwrap().clone()
    }

    /// Applies `f` to the message's metadata under its lock.
    pub fn with_metadata<R>(&self, f: impl FnOnce(&mut MessageMetadata) -> R) -> R {
        f(&mut self.metadata.lock().unwrap())
    }
}

/// A tracked handle to a stored message and its metadata.
///
/// Cloning retains the vertex (bumping its reference count), and every clone's `Drop` releases it
/// again. A traversal that holds one of these for every message it visits is guaranteed to release
/// all of them, in any exit path, once the handle goes out of scope.
pub type CachedMessage = ResHandle<VertexData>;

/// The in-memory, append-mostly DAG of messages the coordinator has seen.
///
/// Messages are never removed once inserted; children edges are recorded for a parent even before
/// the parent itself has arrived, so that a subsequent traversal can still discover them.
#[derive(Default)]
pub struct Tangle {
    vertices: RwLock<HashMap<MessageId, CachedMessage>>,
    children: RwLock<HashMap<MessageId, HashSet<MessageId>>>,
    solid_entry_points: RwLock<HashSet<MessageId>>,
    milestones: RwLock<HashMap<MilestoneIndex, MessageId>>,
    tainted: AtomicBool,
}

impl Tangle {
    /// Creates an empty Tangle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `message` under `id` with fresh `metadata`, and records it as a child of each of its
    /// parents. Returns a handle to the newly stored vertex. A repeated insert of the same `id` is a
    /// no-op that returns a handle to the existing vertex.
    pub fn insert(&self, id: MessageId, message: Message, metadata: MessageMetadata) -> CachedMessage {
        {
            let vertices = self.vertices.read().unwrap();
            if let Some(existing) = vertices.get(&id) {
                return existing.clone();
            }
        }

        for parent in message.parents().iter() {
            self.children.write().unwrap().entry(*parent).or_default().insert(id);
        }

        let handle = ResHandle::new(VertexData {
            message,
            metadata: Mutex::new(metadata),
        });

        self.vertices.write().unwrap().entry(id).or_insert(handle).clone()
    }

    /// Retrieves a tracked handle to the message stored under `id`, if any.
    pub fn get(&self, id: &MessageId) -> Option<CachedMessage> {
        self.vertices.read().unwrap().get(id).cloned()
    }

    /// Whether a message is stored under `id`.
    pub fn contains(&self, id: &MessageId) -> bool {
        self.vertices.read().unwrap().contains_key(id)
    }

    /// The number of messages stored in the Tangle.
    pub fn len(&self) -> usize {
        self.vertices.read().unwrap().len()
    }

    /// Whether the Tangle holds no messages.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The ids of the known children of `id`, in no particular order.
    pub fn children(&self, id: &MessageId) -> Vec<MessageId> {
        self.children
            .read()
            .unwrap()
            .get(id)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    /// The number of known children of `id`.
    pub fn num_children(&self, id: &MessageId) -> usize {
        self.children.read().unwrap().get(id).map(HashSet::len).unwrap_or(0)
    }

    /// Registers `id` as a solid entry point: a message so old that its own ancestry is assumed
    /// solid without being walked.
    pub fn add_solid_entry_point(&self, id: MessageId) {
        self.solid_entry_points.write().unwrap().insert(id);
    }

    /// Removes `id` from the solid entry point set.
    pub fn remove_solid_entry_point(&self, id: &MessageId) {
        self.solid_entry_points.write().unwrap().remove(id);
    }

    /// Whether `id` is a registered solid entry point.
    pub fn is_solid_entry_point(&self, id: &MessageId) -> bool {
        self.solid_entry_points.read().unwrap().contains(id)
    }

    /// All registered solid entry points, in no particular order.
    pub fn solid_entry_points(&self) -> Vec<MessageId> {
        self.solid_entry_points.read().unwrap().iter().copied().collect()
    }

    /// Records that `id` is the tail message of the milestone at `index`.
    pub fn record_milestone(&self, index: MilestoneIndex, id: MessageId) {
        self.milestones.write().unwrap().insert(index, id);
    }

    /// The tail message id of the milestone at `index`, if the Tangle has seen it.
    pub fn milestone(&self, index: MilestoneIndex) -> Option<MessageId> {
        self.milestones.read().unwrap().get(&index).copied()
    }

    /// The highest milestone index recorded, if any.
    pub fn search_latest_milestone_index(&self) -> Option<MilestoneIndex> {
        self.milestones.read().unwrap().keys().copied().max()
    }

    /// Whether the Tangle has been marked tainted (its consistency can no longer be trusted).
    pub fn is_tainted(&self) -> bool {
        self.tainted.load(Ordering::Relaxed)
    }

    /// Marks the Tangle tainted. Irreversible.
    pub fn set_tainted(&self) {
        self.tainted.store(true, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bee_message::parent::Parents;

    fn message_with_parents(parents: Vec<MessageId>) -> Message {
        Message::build(Parents::new(parents).unwrap()).finish().unwrap()
    }

    #[test]
    fn insert_and_get_roundtrip() {
        let tangle = Tangle::new();
        let message = message_with_parents(vec![MessageId::NULL]);
        let id = message.id();

        tangle.insert(id, message.clone(), MessageMetadata::new(0));

        let cached = tangle.get(&id).unwrap();
        assert_eq!(cached.message(), &message);
        assert_eq!(tangle.len(), 1);
    }

    #[test]
    fn get_missing_returns_none() {
        let tangle = Tangle::new();
        assert!(tangle.get(&MessageId::NULL).is_none());
    }

    #[test]
    fn insert_records_children_of_parent() {
        let tangle = Tangle::new();
        let parent = MessageId::NULL;
        let child = message_with_parents(vec![parent]);
        let child_id = child.id();

        tangle.insert(child_id, child, MessageMetadata::new(0));

        assert_eq!(tangle.num_children(&parent), 1);
        assert_eq!(tangle.children(&parent), vec![child_id]);
    }

    #[test]
    fn children_recorded_even_for_absent_parent() {
        let tangle = Tangle::new();
        let parent = MessageId::NULL;
        assert_eq!(tangle.num_children(&parent), 0);

        let child = message_with_parents(vec![parent]);
        tangle.insert(child.id(), child, MessageMetadata::new(0));

        assert_eq!(tangle.num_children(&parent), 1);
        assert!(!tangle.contains(&parent));
    }

    #[test]
    fn milestone_index_round_trips() {
        let tangle = Tangle::new();
        assert_eq!(tangle.search_latest_milestone_index(), None);

        tangle.record_milestone(MilestoneIndex::new(1), MessageId::NULL);
        tangle.record_milestone(MilestoneIndex::new(2), MessageId::from([2u8; 32]));

        assert_eq!(tangle.milestone(MilestoneIndex::new(1)), Some(MessageId::NULL));
        assert_eq!(tangle.search_latest_milestone_index(), Some(MilestoneIndex::new(2)));
    }

    #[test]
    fn tainted_flag_is_sticky() {
        let tangle = Tangle::new();
        assert!(!tangle.is_tainted());
        tangle.set_tainted();
        assert!(tangle.is_tainted());
    }

    #[test]
    fn solid_entry_points_round_trip() {
        let tangle = Tangle::new();
        let id = MessageId::NULL;

        assert!(!tangle.is_solid_entry_point(&id));
        tangle.add_solid_entry_point(id);
        assert!(tangle.is_solid_entry_point(&id));
        assert_eq!(tangle.solid_entry_points(), vec![id]);

        tangle.remove_solid_entry_point(&id);
        assert!(!tangle.is_solid_entry_point(&id));
    }
}
