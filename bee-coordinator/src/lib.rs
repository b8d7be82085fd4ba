// Copyright 2020-2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! The milestone-issuing coordinator core: bootstrap, the checkpoint and milestone issuance
//! operations, durable state, and the scheduler that drives them from timers and DAG
//! solidification events.
//!
//! This crate owns the issuance state machine; the DAG object store, the proof-of-work engine's
//! concrete search strategy, the gossip/network layer, the tip selector's scoring algorithm, and
//! the white-flag mutation computation algorithm are all external collaborators consumed through
//! the narrow interfaces in [`collaborators`].

#![deny(missing_docs, warnings)]

/// Assembles and proof-of-works checkpoint and milestone messages.
pub mod builder;
/// External collaborator contracts: tip selection, gossip emission, and the solidity wait.
pub mod collaborators;
/// Runtime configuration.
pub mod config;
/// The coordinator's issuance state machine.
pub mod coordinator;
/// The coordinator's error taxonomy.
pub mod error;
/// Events fired by the coordinator core and consumed by the scheduler.
pub mod event;
/// Time- and load-driven triggering of issuance operations.
pub mod scheduler;
/// Durable, atomic persistence of coordinator state.
pub mod state;

pub use self::{
    builder::MilestoneBuilder,
    collaborators::{GossipProcessor, MessageSender, TipSelector},
    config::{CoordinatorConfig, CoordinatorConfigBuilder, TipSelectionConfig},
    coordinator::Coordinator,
    error::Error,
    event::{IssuedCheckpointTransaction, IssuedMilestone, MessageSolid, SolidMilestoneIndexChanged},
    scheduler::{is_below_max_depth, on_new_solid_message, Scheduler, SignalSender},
    state::{CoordinatorState, StateStore},
};
