// Copyright 2020-2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! Time- and load-driven triggering of the coordinator core's operations.
//!
//! The milestone tick is a coalescing, capacity-one signal: a pending tick is never duplicated,
//! so a slow consumer never accumulates a backlog of stale ticks. The checkpoint signal fires
//! whenever the tip selector's tracked message count crosses its configured threshold upward.

use crate::{
    collaborators::{MessageSender, TipSelector},
    coordinator::Coordinator,
    error::{Error, Recoverable},
};

use bee_ledger::WhiteFlagEngine;
use bee_message::{payload::milestone::MilestoneIndex, MessageId};
use bee_pow::providers::NonceProvider;

use std::sync::{
    atomic::{AtomicBool, Ordering},
    mpsc::{self, Receiver, RecvTimeoutError, Sender},
    Arc,
};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// The ticker thread's poll granularity: small enough that a shutdown is noticed promptly, well
/// under any sane `milestone_interval`.
const TICKER_STEP: Duration = Duration::from_millis(100);

/// A signal consumed by the scheduler's cooperative select loop.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Signal {
    Checkpoint,
    Milestone,
    Shutdown,
}

/// The producing half of the scheduler's signal channel: timers and tip-selector hooks use this
/// to wake the consuming loop.
#[derive(Clone)]
pub struct SignalSender {
    sender: Sender<Signal>,
    milestone_pending: Arc<AtomicBool>,
}

impl SignalSender {
    /// Requests a milestone tick. Coalescing: a tick already pending and not yet consumed is not
    /// duplicated.
    pub fn signal_milestone(&self) {
        if !self.milestone_pending.swap(true, Ordering::AcqRel) {
            let _ = self.sender.send(Signal::Milestone);
        }
    }

    /// Requests a checkpoint be considered. Called once the tip selector's tracked message count
    /// crosses `max_tracked_messages` upward.
    pub fn signal_checkpoint(&self) {
        let _ = self.sender.send(Signal::Checkpoint);
    }

    /// Requests the scheduler's run loop to exit after completing any in-flight issuance.
    pub fn shutdown(&self) {
        let _ = self.sender.send(Signal::Shutdown);
    }
}

/// Drives a [`Coordinator`] from checkpoint and milestone signals.
pub struct Scheduler<S, W, P, T> {
    coordinator: Coordinator<S, W, P>,
    tip_selector: T,
    max_tracked_messages: usize,
    receiver: Receiver<Signal>,
    sender: SignalSender,
    ticker_running: Arc<AtomicBool>,
    ticker: Option<JoinHandle<()>>,
}

impl<S, W, P, T> Scheduler<S, W, P, T>
where
    S: MessageSender,
    W: WhiteFlagEngine,
    P: NonceProvider,
    T: TipSelector,
{
    /// Creates a scheduler over `coordinator`, consulting `tip_selector` for tips and checkpoint
    /// thresholds.
    ///
    /// Spawns the milestone ticker: a background thread that calls [`SignalSender::signal_milestone`]
    /// once per `coordinator`'s configured `milestone_interval`. The thread is joined when the
    /// scheduler is dropped.
    pub fn new(coordinator: Coordinator<S, W, P>, tip_selector: T, max_tracked_messages: usize) -> Self {
        let (sender, receiver) = mpsc::channel();
        let sender = SignalSender {
            sender,
            milestone_pending: Arc::new(AtomicBool::new(false)),
        };

        let ticker_running = Arc::new(AtomicBool::new(true));
        let ticker = {
            let running = ticker_running.clone();
            let sender = sender.clone();
            let interval = coordinator.milestone_interval();
            thread::spawn(move || {
                let mut elapsed = Duration::ZERO;
                while running.load(Ordering::Relaxed) {
                    thread::sleep(TICKER_STEP);
                    elapsed += TICKER_STEP;
                    if elapsed >= interval {
                        sender.signal_milestone();
                        elapsed = Duration::ZERO;
                    }
                }
            })
        };

        Self {
            coordinator,
            tip_selector,
            max_tracked_messages,
            receiver,
            sender,
            ticker_running,
            ticker: Some(ticker),
        }
    }

    /// A clonable handle producers can use to signal this scheduler.
    pub fn signal_sender(&self) -> SignalSender {
        self.sender.clone()
    }

    /// Runs the cooperative select loop until a shutdown signal is received.
    ///
    /// `last_milestone_mid` and `last_checkpoint_mid` seed the checkpoint chain; typically both
    /// are the hash of the most recently issued milestone.
    pub fn run(&self, last_milestone_mid: MessageId, last_checkpoint_mid: MessageId) {
        let mut last_milestone_mid = last_milestone_mid;
        let mut last_checkpoint_mid = last_checkpoint_mid;
        let mut last_checkpoint_index = 0u32;

        loop {
            match self.receiver.recv_timeout(Duration::from_millis(100)) {
                Ok(Signal::Checkpoint) => {
                    self.handle_checkpoint_signal(&mut last_checkpoint_mid, &mut last_checkpoint_index);
                }
                Ok(Signal::Milestone) => {
                    self.sender.milestone_pending.store(false, Ordering::Release);

                    if self.handle_milestone_signal(
                        &mut last_milestone_mid,
                        &mut last_checkpoint_mid,
                        &mut last_checkpoint_index,
                    ) {
                        return;
                    }
                }
                Ok(Signal::Shutdown) => return,
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => return,
            }
        }
    }

    fn handle_checkpoint_signal(&self, last_checkpoint_mid: &mut MessageId, last_checkpoint_index: &mut u32) {
        if self.tip_selector.get_tracked_messages_count() < self.max_tracked_messages {
            return;
        }

        let tips = match self.tip_selector.select_tips(0) {
            Ok(tips) => tips,
            Err(error) => {
                log::warn!("tip selection for checkpoint failed: {error}");
                return;
            }
        };

        match self.coordinator.issue_checkpoint(*last_checkpoint_index, *last_checkpoint_mid, &tips) {
            Ok(tail) => {
                log::info!("checkpoint {} issued: {tail}", *last_checkpoint_index + 1);
                *last_checkpoint_mid = tail;
                *last_checkpoint_index += 1;
            }
            Err(error) => log::warn!("issue_checkpoint failed: {error}"),
        }
    }

    /// Returns `true` if the scheduler should stop running (a fatal error occurred).
    fn handle_milestone_signal(
        &self,
        last_milestone_mid: &mut MessageId,
        last_checkpoint_mid: &mut MessageId,
        last_checkpoint_index: &mut u32,
    ) -> bool {
        if let Ok(tips) = self.tip_selector.select_tips(1) {
            if let Some(tip) = tips.into_iter().next() {
                if let Err(error) = self.coordinator.issue_checkpoint(*last_checkpoint_index, *last_checkpoint_mid, &[tip]) {
                    log::warn!("pre-milestone checkpoint failed: {error}");
                }
            }
        }

        match self.coordinator.issue_milestone(*last_milestone_mid, *last_checkpoint_mid) {
            Ok(milestone_mid) => {
                log::info!("milestone issued: {milestone_mid}");
                *last_checkpoint_mid = milestone_mid;
                *last_checkpoint_index = 0;
                *last_milestone_mid = milestone_mid;
                false
            }
            Err(Error::Recoverable(Recoverable::NodeNotSynced)) => {
                log::warn!("milestone issuance deferred: node not synced");
                false
            }
            Err(Error::Recoverable(error)) => {
                log::warn!("milestone issuance deferred: {error}");
                false
            }
            Err(error) => {
                log::error!("fatal error issuing milestone: {error}");
                true
            }
        }
    }
}

impl<S, W, P, T> Drop for Scheduler<S, W, P, T> {
    fn drop(&mut self) {
        self.ticker_running.store(false, Ordering::Relaxed);
        if let Some(ticker) = self.ticker.take() {
            let _ = ticker.join();
        }
    }
}

/// Whether a message at `omrsi` should be excluded from tip selection given the current latest
/// solid milestone index `lsmi` and the configured `below_max_depth` threshold.
pub fn is_below_max_depth(lsmi: MilestoneIndex, omrsi: MilestoneIndex, below_max_depth: u32) -> bool {
    lsmi.0.saturating_sub(omrsi.0) > below_max_depth
}

/// Feeds a newly solid message to the tip selector, and requests a checkpoint if its tracked
/// message count crosses `max_tracked_messages` upward as a result.
///
/// Intended to be wired as the host's own `MessageSolid` listener, ahead of the scheduler's select
/// loop: the event bus subscription itself is an external collaborator (§1), not something this
/// crate owns.
pub fn on_new_solid_message<T: TipSelector>(
    tip_selector: &T,
    signal_sender: &SignalSender,
    max_tracked_messages: usize,
    metadata: &bee_tangle::MessageMetadata,
    lsmi: MilestoneIndex,
    omrsi: MilestoneIndex,
    below_max_depth: u32,
) {
    if is_below_max_depth(lsmi, omrsi, below_max_depth) {
        return;
    }

    if tip_selector.on_new_solid_message(metadata) >= max_tracked_messages {
        signal_sender.signal_checkpoint();
    }
}
