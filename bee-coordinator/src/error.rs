// Copyright 2020-2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! The coordinator's error taxonomy: every operation returns one of four kinds of failure, and the
//! kind alone determines what the caller must do with it.

use bee_message::MessageId;

/// Every error the coordinator core can produce.
///
/// [`Error::Fatal`] must terminate the process: the in-memory and on-disk views of "which
/// milestones have been issued" can no longer be trusted to agree. [`Error::Recoverable`] is
/// returned to the caller, who logs a warning and retries on the next signal. [`Error::Aborted`]
/// means a traversal was cancelled through its abort handle; resources are released cleanly and
/// nothing was issued. [`Error::Lookup`] bubbles a missing message up to the caller, who decides
/// whether that is fatal in context.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An error the process cannot recover from; it must terminate.
    #[error(transparent)]
    Fatal(#[from] Fatal),
    /// An error the caller can retry after logging a warning.
    #[error(transparent)]
    Recoverable(#[from] Recoverable),
    /// The operation was cancelled through an abort handle.
    #[error("operation aborted")]
    Aborted,
    /// A message referenced by id was not found.
    #[error("message {0} not found")]
    Lookup(MessageId),
}

impl From<bee_tangle::Error> for Error {
    fn from(error: bee_tangle::Error) -> Self {
        match error {
            bee_tangle::Error::MessageNotFound(id) => Self::Lookup(id),
            bee_tangle::Error::Aborted => Self::Aborted,
        }
    }
}

/// Failures that must terminate the process: the coordinator can no longer guarantee it remembers
/// every milestone it has issued.
#[derive(Debug, thiserror::Error)]
pub enum Fatal {
    /// The public key derived from the held private key does not match the configured one.
    #[error("signing key check failed: {0}")]
    SigningKeyMismatch(#[from] bee_signing::Error),
    /// The state file could not be read, or was missing when a non-bootstrap start required it.
    #[error("failed to load coordinator state: {0}")]
    StateLoad(String),
    /// The state file could not be written after a successful issuance.
    #[error("failed to persist coordinator state: {0}")]
    StateStore(String),
    /// The highest milestone index found in the DAG does not match the loaded state.
    #[error("dag's highest milestone index {dag_index} does not match loaded state index {state_index}")]
    StateDagMismatch {
        /// The milestone index recorded in the state file.
        state_index: u32,
        /// The highest milestone index found in the DAG.
        dag_index: u32,
    },
    /// The DAG store has been marked tainted; its content can no longer be trusted.
    #[error("dag store is tainted")]
    Tainted,
    /// The configured merkle hash function name is not recognized or not supported.
    #[error("merkle hash function: {0}")]
    HashFunction(#[from] bee_ledger::Error),
    /// `init_state` could not bring the coordinator to a valid starting state: a bootstrap was
    /// requested over an existing state file, or a resumed bootstrap's predecessor milestone is
    /// missing from the DAG.
    #[error("failed to initialize coordinator state: {0}")]
    BootstrapFailed(String),
    /// `create_and_send_milestone` failed after `init_state` succeeded: white-flag computation,
    /// message building, or sending the bundle failed. The system must halt, since retrying risks
    /// issuing a duplicate milestone index.
    #[error("failed to issue milestone: {0}")]
    IssuanceFailed(String),
}

/// Failures the caller should log and retry on the next signal.
#[derive(Debug, thiserror::Error)]
pub enum Recoverable {
    /// The node reports it is not synced with the network.
    #[error("node is not synced")]
    NodeNotSynced,
    /// A registered backpressure predicate reported the node is overloaded.
    #[error("node load is too high")]
    NodeLoadTooHigh,
    /// `issue_checkpoint` was called with an empty tip sequence.
    #[error("no tips were given")]
    NoTipsGiven,
    /// The tip selector reported it has no tips to offer.
    #[error("no tips are available")]
    NoTipsAvailable,
    /// Sending a checkpoint bundle failed.
    #[error("failed to send checkpoint: {0}")]
    CheckpointSendFailed(String),
}
