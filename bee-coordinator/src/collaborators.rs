// Copyright 2020-2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! Narrow interfaces onto the external systems the coordinator core depends on but does not own:
//! tip selection, gossip emission, and the blocking "has the DAG incorporated this yet" protocol.

use bee_message::{Message, MessageId};
use bee_tangle::MessageMetadata;

/// Offers tips for checkpoints and milestones to reference.
///
/// The heaviest-branch scoring behind a real implementation is out of scope here; this crate only
/// consumes the contract.
pub trait TipSelector {
    /// The error a selector reports when it has nothing to offer.
    type Error: std::error::Error;

    /// Selects tips to reference. `extra_required` asks the selector to return at least that many
    /// beyond whatever it would offer unprompted; a milestone always asks for exactly one extra
    /// tip just before issuance (see §4.E). Must return a non-empty sequence on success.
    fn select_tips(&self, extra_required: usize) -> Result<Vec<MessageId>, Self::Error>;

    /// Notifies the selector that a message has become solid, returning its updated tracked
    /// message count.
    fn on_new_solid_message(&self, metadata: &MessageMetadata) -> usize;

    /// The number of messages currently tracked for tip selection.
    fn get_tracked_messages_count(&self) -> usize;
}

/// Verifies a freshly built bundle and emits it to the gossip layer.
pub trait GossipProcessor {
    /// The error produced when verification or emission fails.
    type Error: std::error::Error;

    /// Verifies and emits every message in `bundle`, in order.
    fn verify_and_emit(&self, bundle: &[Message]) -> Result<(), Self::Error>;
}

/// The "send callback" of §2's data flow: hands a freshly built message to the network and
/// returns its id only once the DAG has observed it solid.
///
/// A concrete implementation composes a [`GossipProcessor`] with the event-bus wait described in
/// §4.E (`MessageSolid`, and for milestones, `SolidMilestoneIndexChanged`); the coordinator core
/// itself only depends on this narrower contract.
pub trait MessageSender {
    /// The error produced when sending fails.
    type Error: std::error::Error;

    /// Sends `message`, blocking until the DAG has incorporated it, and returns its id.
    ///
    /// `is_milestone` additionally waits for the latest solid milestone index to advance before
    /// returning.
    fn send(&self, message: Message, is_milestone: bool) -> Result<MessageId, Self::Error>;
}
