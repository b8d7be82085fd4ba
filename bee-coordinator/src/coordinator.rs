// Copyright 2020-2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! The issuance state machine: bootstrap, the checkpoint and milestone operations, backpressure,
//! and event emission.

use crate::{
    builder::MilestoneBuilder,
    collaborators::MessageSender,
    config::CoordinatorConfig,
    error::{Error, Fatal, Recoverable},
    event::{IssuedCheckpointTransaction, IssuedMilestone},
    state::{CoordinatorState, StateStore},
};

use bee_ledger::WhiteFlagEngine;
use bee_message::{payload::milestone::MilestoneIndex, MessageId};
use bee_pow::providers::NonceProvider;
use bee_runtime::event::Bus;
use bee_tangle::Tangle;

use std::sync::{Arc, Mutex};

/// The coordinator's in-memory issuance state, mutated only while the issuance mutex is held.
struct IssuanceState {
    latest_milestone_index: MilestoneIndex,
    latest_milestone_hash: MessageId,
    latest_milestone_timestamp: i64,
    latest_milestone_tips: Vec<MessageId>,
    bootstrapped: bool,
}

/// The milestone-issuing coordinator core.
///
/// Generic over the collaborators it invokes through narrow traits: the message sender (gossip
/// emission plus the blocking solidity wait), the white-flag mutation engine, and the
/// proof-of-work nonce provider backing its [`MilestoneBuilder`].
pub struct Coordinator<S, W, P> {
    config: CoordinatorConfig,
    tangle: Arc<Tangle>,
    state_store: StateStore,
    builder: MilestoneBuilder<P>,
    white_flag_engine: W,
    sender: S,
    bus: Arc<Bus<'static>>,
    issuance: Mutex<Option<IssuanceState>>,
    backpressure: Mutex<Vec<Box<dyn Fn() -> bool + Send + Sync>>>,
    synced: Mutex<Box<dyn Fn() -> bool + Send + Sync>>,
}

impl<S, W, P> Coordinator<S, W, P>
where
    S: MessageSender,
    W: WhiteFlagEngine,
    P: NonceProvider,
{
    /// Creates a new coordinator. `init_state` must be called before any issuance operation.
    pub fn new(
        config: CoordinatorConfig,
        tangle: Arc<Tangle>,
        builder: MilestoneBuilder<P>,
        white_flag_engine: W,
        sender: S,
        bus: Arc<Bus<'static>>,
    ) -> Self {
        let state_store = StateStore::new(config.state_file_path.clone());

        Self {
            config,
            tangle,
            state_store,
            builder,
            white_flag_engine,
            sender,
            bus,
            issuance: Mutex::new(None),
            backpressure: Mutex::new(Vec::new()),
            synced: Mutex::new(Box::new(|| true)),
        }
    }

    /// The configured interval between milestone ticks, as consulted by [`crate::scheduler::Scheduler`].
    pub fn milestone_interval(&self) -> std::time::Duration {
        self.config.milestone_interval
    }

    /// Registers a backpressure predicate. Before any issuance, if any registered predicate
    /// returns `true`, the operation fails with [`Recoverable::NodeLoadTooHigh`].
    pub fn register_backpressure(&self, predicate: impl Fn() -> bool + Send + Sync + 'static) {
        self.backpressure.lock().unwrap().push(Box::new(predicate));
    }

    /// Sets the predicate consulted to decide whether the node is synced with the network.
    pub fn set_synced_check(&self, predicate: impl Fn() -> bool + Send + Sync + 'static) {
        *self.synced.lock().unwrap() = Box::new(predicate);
    }

    /// Confirms that the public key derived from the held signing key matches the configured one.
    pub fn check_public_key(&self) -> Result<(), Error> {
        self.builder
            .verify_public_key(&self.config.public_key)
            .map_err(|e| Error::Fatal(Fatal::SigningKeyMismatch(e)))
    }

    /// Initializes in-memory issuance state, either by bootstrapping a fresh network or by
    /// resuming from a previously persisted state file.
    ///
    /// `start_index == 0` is silently promoted to `1`.
    pub fn init_state(&self, bootstrap: bool, start_index: MilestoneIndex) -> Result<(), Error> {
        let start_index = if start_index.0 == 0 {
            MilestoneIndex::new(1)
        } else {
            start_index
        };

        let state = if bootstrap {
            if self.state_store.exists() {
                return Err(Error::Fatal(Fatal::BootstrapFailed(
                    "state file already exists".to_owned(),
                )));
            }

            let latest_milestone_hash = if start_index.0 == 1 {
                self.tangle.add_solid_entry_point(MessageId::NULL);
                MessageId::NULL
            } else {
                self.tangle
                    .milestone(start_index - 1)
                    .ok_or_else(|| Error::Fatal(Fatal::BootstrapFailed(format!(
                        "dag does not contain milestone {}",
                        (start_index - 1).0
                    ))))?
            };

            IssuanceState {
                latest_milestone_index: start_index - 1,
                latest_milestone_hash,
                latest_milestone_timestamp: 0,
                latest_milestone_tips: vec![MessageId::NULL],
                bootstrapped: false,
            }
        } else {
            let loaded = self
                .state_store
                .load()
                .map_err(|e| Error::Fatal(Fatal::StateLoad(e.to_string())))?;

            let dag_index = self.tangle.search_latest_milestone_index().unwrap_or_default();
            if dag_index != loaded.latest_milestone_index {
                return Err(Error::Fatal(Fatal::StateDagMismatch {
                    state_index: loaded.latest_milestone_index.0,
                    dag_index: dag_index.0,
                }));
            }

            IssuanceState {
                latest_milestone_index: loaded.latest_milestone_index,
                latest_milestone_hash: loaded.latest_milestone_hash,
                latest_milestone_timestamp: loaded.latest_milestone_timestamp,
                latest_milestone_tips: loaded.latest_milestone_tips,
                bootstrapped: true,
            }
        };

        *self.issuance.lock().unwrap() = Some(state);
        Ok(())
    }

    /// Issues the network's first milestone if it has not been issued yet. Returns the current
    /// latest milestone hash either way.
    pub fn bootstrap(&self) -> Result<MessageId, Error> {
        let mut guard = self.issuance.lock().unwrap();
        let state = guard.as_mut().expect("init_state must be called first");

        if !state.bootstrapped {
            let trunk = state.latest_milestone_hash;
            let branch = state.latest_milestone_hash;
            let new_index = state.latest_milestone_index + 1;

            self.create_and_send_milestone(state, trunk, branch, new_index)?;
            state.bootstrapped = true;
        }

        Ok(state.latest_milestone_hash)
    }

    /// Issues a chain of checkpoints referencing `tips` in order.
    ///
    /// Each checkpoint's trunk is the given tip; its branch is the previous checkpoint's tail (or
    /// `last_checkpoint_mid` for the first). Returns the final tail.
    pub fn issue_checkpoint(
        &self,
        checkpoint_index: u32,
        last_checkpoint_mid: MessageId,
        tips: &[MessageId],
    ) -> Result<MessageId, Error> {
        if tips.is_empty() {
            return Err(Error::Recoverable(Recoverable::NoTipsGiven));
        }

        let _guard = self.issuance.lock().unwrap();
        self.check_gates()?;

        let mut previous = last_checkpoint_mid;

        for (tip_index, tip) in tips.iter().enumerate() {
            let message = self
                .builder
                .build_checkpoint(*tip, previous)
                .map_err(|e| Error::Recoverable(Recoverable::CheckpointSendFailed(e.to_string())))?;

            let mid = self
                .sender
                .send(message, false)
                .map_err(|e| Error::Recoverable(Recoverable::CheckpointSendFailed(e.to_string())))?;

            self.bus.dispatch(IssuedCheckpointTransaction {
                checkpoint_index,
                tip_index,
                total_tips: tips.len(),
                mid,
            });

            previous = mid;
        }

        Ok(previous)
    }

    /// Issues the next milestone, referencing `(trunk, branch)`.
    ///
    /// Synced and backpressure failures are recoverable; any failure past that point is fatal,
    /// since the system can no longer guarantee it has not lost track of an issued milestone.
    pub fn issue_milestone(&self, trunk: MessageId, branch: MessageId) -> Result<MessageId, Error> {
        let mut guard = self.issuance.lock().unwrap();
        self.check_gates()?;

        let state = guard.as_mut().expect("init_state must be called first");
        let new_index = state.latest_milestone_index + 1;

        self.create_and_send_milestone(state, trunk, branch, new_index)?;

        Ok(state.latest_milestone_hash)
    }

    fn check_gates(&self) -> Result<(), Error> {
        if !(self.synced.lock().unwrap())() {
            return Err(Error::Recoverable(Recoverable::NodeNotSynced));
        }

        if self.backpressure.lock().unwrap().iter().any(|predicate| predicate()) {
            return Err(Error::Recoverable(Recoverable::NodeLoadTooHigh));
        }

        Ok(())
    }

    fn create_and_send_milestone(
        &self,
        state: &mut IssuanceState,
        trunk: MessageId,
        branch: MessageId,
        new_index: MilestoneIndex,
    ) -> Result<(), Error> {
        if self.tangle.is_tainted() {
            return Err(Error::Fatal(Fatal::Tainted));
        }

        let mutations = self
            .white_flag_engine
            .compute_mutations(&self.tangle, self.config.merkle_hash_function, trunk, branch)
            .map_err(|e| Error::Fatal(Fatal::IssuanceFailed(e.to_string())))?;

        let merkle_root = mutations.merkle_root.as_slice().try_into().map_err(|_| {
            Error::Fatal(Fatal::IssuanceFailed("merkle root was not 32 bytes".to_owned()))
        })?;

        let timestamp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|duration| duration.as_secs() as i64)
            .unwrap_or(0);

        let message = self
            .builder
            .build_milestone(trunk, branch, new_index, bee_message::payload::milestone::MerkleRoot::new(merkle_root), timestamp)
            .map_err(|e| Error::Fatal(Fatal::IssuanceFailed(e.to_string())))?;

        let milestone_id = match message.payload() {
            Some(bee_message::payload::Payload::Milestone(payload)) => payload.id(),
            None => {
                return Err(Error::Fatal(Fatal::IssuanceFailed(
                    "built milestone message carried no milestone payload".to_owned(),
                )))
            }
        };

        let tail = self
            .sender
            .send(message, true)
            .map_err(|e| Error::Fatal(Fatal::IssuanceFailed(e.to_string())))?;

        state.latest_milestone_hash = tail;
        state.latest_milestone_index = new_index;
        state.latest_milestone_timestamp = timestamp;
        state.latest_milestone_tips = vec![tail];

        self.state_store
            .store(&CoordinatorState {
                latest_milestone_index: state.latest_milestone_index,
                latest_milestone_hash: state.latest_milestone_hash,
                latest_milestone_timestamp: state.latest_milestone_timestamp,
                latest_milestone_tips: state.latest_milestone_tips.clone(),
            })
            .map_err(|e| Error::Fatal(Fatal::StateStore(e.to_string())))?;

        self.bus.dispatch(IssuedMilestone {
            index: state.latest_milestone_index,
            mid: state.latest_milestone_hash,
            milestone_id,
        });

        Ok(())
    }
}
