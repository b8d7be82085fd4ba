// Copyright 2020-2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! Events fired by the coordinator core, and the solidification events the scheduler's
//! `send_message` protocol waits on. Dispatched through [`bee_runtime::event::Bus`], the same
//! typed bus the rest of the bee framework uses.

use bee_message::{
    payload::milestone::{MilestoneId, MilestoneIndex},
    MessageId,
};

/// Fired once per checkpoint message issued during an `issue_checkpoint` call.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct IssuedCheckpointTransaction {
    /// The index of the checkpoint interval this belongs to.
    pub checkpoint_index: u32,
    /// The position of this checkpoint within the tip sequence it was issuing.
    pub tip_index: usize,
    /// The total number of checkpoints being issued in this call.
    pub total_tips: usize,
    /// The id of the issued checkpoint's tail message.
    pub mid: MessageId,
}

/// Fired once a milestone has been issued, sent, and persisted.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct IssuedMilestone {
    /// The index of the issued milestone.
    pub index: MilestoneIndex,
    /// The id of the milestone's tail message.
    pub mid: MessageId,
    /// The id of the milestone itself: the hash of its essence, distinct from `mid`.
    pub milestone_id: MilestoneId,
}

/// Fired by the DAG store when a message's entire past cone becomes known.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MessageSolid(pub MessageId);

/// Fired by the DAG store when the latest solid milestone index advances.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SolidMilestoneIndexChanged(pub MilestoneIndex);
