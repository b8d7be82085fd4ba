// Copyright 2020-2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! Mutable state tracked alongside every message stored in the [`Tangle`](crate::Tangle).

use bee_message::payload::milestone::MilestoneIndex;

/// Tracks solidification and confirmation state for a single message.
///
/// A message's [`Message`](bee_message::Message) body is immutable once inserted; everything that
/// changes as the Tangle learns more about a message lives here instead.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessageMetadata {
    arrival_timestamp: u64,
    solidification_timestamp: Option<u64>,
    milestone_index: Option<MilestoneIndex>,
    is_milestone: bool,
}

impl MessageMetadata {
    /// Creates metadata for a message that just arrived at `arrival_timestamp` (unix seconds).
    pub fn new(arrival_timestamp: u64) -> Self {
        Self {
            arrival_timestamp,
            solidification_timestamp: None,
            milestone_index: None,
            is_milestone: false,
        }
    }

    /// The unix timestamp, in seconds, at which the message was first seen.
    pub fn arrival_timestamp(&self) -> u64 {
        self.arrival_timestamp
    }

    /// Whether every ancestor of this message down to a solid entry point is known.
    pub fn is_solid(&self) -> bool {
        self.solidification_timestamp.is_some()
    }

    /// The unix timestamp at which the message became solid, if it has.
    pub fn solidification_timestamp(&self) -> Option<u64> {
        self.solidification_timestamp
    }

    /// Marks the message solid at `timestamp`. Idempotent: a message cannot become un-solid.
    pub fn solidify(&mut self, timestamp: u64) {
        if self.solidification_timestamp.is_none() {
            self.solidification_timestamp = Some(timestamp);
        }
    }

    /// The milestone index that confirmed this message, if any.
    pub fn milestone_index(&self) -> Option<MilestoneIndex> {
        self.milestone_index
    }

    /// Records that `index` confirmed this message.
    pub fn confirm(&mut self, index: MilestoneIndex) {
        self.milestone_index = Some(index);
    }

    /// Whether this message carries a milestone payload.
    pub fn is_milestone(&self) -> bool {
        self.is_milestone
    }

    /// Marks this message as carrying a milestone payload.
    pub fn set_milestone(&mut self) {
        self.is_milestone = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_metadata_is_not_solid() {
        let metadata = MessageMetadata::new(100);
        assert!(!metadata.is_solid());
        assert_eq!(metadata.arrival_timestamp(), 100);
    }

    #[test]
    fn solidify_is_idempotent() {
        let mut metadata = MessageMetadata::new(100);
        metadata.solidify(200);
        metadata.solidify(300);
        assert_eq!(metadata.solidification_timestamp(), Some(200));
    }

    #[test]
    fn confirm_records_milestone_index() {
        let mut metadata = MessageMetadata::new(100);
        assert_eq!(metadata.milestone_index(), None);
        metadata.confirm(MilestoneIndex::new(7));
        assert_eq!(metadata.milestone_index(), Some(MilestoneIndex::new(7)));
    }
}
