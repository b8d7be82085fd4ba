// Copyright 2020-2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use bee_coordinator::{
    builder::MilestoneBuilder,
    collaborators::{MessageSender, TipSelector},
    config::CoordinatorConfig,
    coordinator::Coordinator,
    error::{Error, Fatal, Recoverable},
    event::{IssuedCheckpointTransaction, IssuedMilestone},
    scheduler::Scheduler,
};
use bee_ledger::ReferenceWhiteFlagEngine;
use bee_message::{payload::milestone::MilestoneIndex, payload::Payload, Message, MessageId};
use bee_runtime::event::Bus;
use bee_signing::CoordinatorSigner;
use bee_tangle::{MessageMetadata, Tangle};

use std::{
    convert::Infallible,
    sync::{Arc, Mutex},
    time::Duration,
};

struct RecordingSender {
    tangle: Arc<Tangle>,
}

impl MessageSender for RecordingSender {
    type Error = Infallible;

    fn send(&self, message: Message, _is_milestone: bool) -> Result<MessageId, Self::Error> {
        let id = message.id();

        if let Some(Payload::Milestone(payload)) = message.payload() {
            self.tangle.record_milestone(payload.essence().index(), id);
        }

        self.tangle.insert(id, message, MessageMetadata::new(0));
        Ok(id)
    }
}

fn signer_hex() -> String {
    hex::encode([3u8; 32])
}

fn coordinator(
    tangle: Arc<Tangle>,
    bus: Arc<Bus<'static>>,
    state_file_path: std::path::PathBuf,
) -> Coordinator<RecordingSender, ReferenceWhiteFlagEngine, u64> {
    let config = CoordinatorConfig::build()
        .mwm(1)
        .state_file_path(state_file_path)
        .public_key(signer_public_key_hex())
        .finish()
        .unwrap();

    let signer = CoordinatorSigner::from_hex(&signer_hex()).unwrap();
    let builder = MilestoneBuilder::new(signer, 0u64, config.mwm);
    let sender = RecordingSender { tangle: tangle.clone() };

    Coordinator::new(config, tangle, builder, ReferenceWhiteFlagEngine, sender, bus)
}

fn coordinator_with_interval(
    tangle: Arc<Tangle>,
    bus: Arc<Bus<'static>>,
    state_file_path: std::path::PathBuf,
    milestone_interval: Duration,
) -> Coordinator<RecordingSender, ReferenceWhiteFlagEngine, u64> {
    let config = CoordinatorConfig::build()
        .mwm(1)
        .state_file_path(state_file_path)
        .public_key(signer_public_key_hex())
        .milestone_interval(milestone_interval)
        .finish()
        .unwrap();

    let signer = CoordinatorSigner::from_hex(&signer_hex()).unwrap();
    let builder = MilestoneBuilder::new(signer, 0u64, config.mwm);
    let sender = RecordingSender { tangle: tangle.clone() };

    Coordinator::new(config, tangle, builder, ReferenceWhiteFlagEngine, sender, bus)
}

fn signer_public_key_hex() -> String {
    let signer = CoordinatorSigner::from_hex(&signer_hex()).unwrap();
    hex::encode(signer.public_key().to_bytes())
}

struct EventCollector;

fn milestone_events(bus: &Bus<'static>) -> Arc<Mutex<Vec<IssuedMilestone>>> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();
    bus.add_listener::<EventCollector, IssuedMilestone, _>(move |event: &IssuedMilestone| {
        sink.lock().unwrap().push(*event);
    });
    events
}

fn checkpoint_events(bus: &Bus<'static>) -> Arc<Mutex<Vec<IssuedCheckpointTransaction>>> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();
    bus.add_listener::<EventCollector, IssuedCheckpointTransaction, _>(move |event: &IssuedCheckpointTransaction| {
        sink.lock().unwrap().push(*event);
    });
    events
}

#[test]
fn s1_clean_bootstrap() {
    let dir = tempfile::tempdir().unwrap();
    let tangle = Arc::new(Tangle::new());
    let bus = Arc::new(Bus::default());
    let events = milestone_events(&bus);

    let coordinator = coordinator(tangle, bus, dir.path().join("coordinator.state"));

    coordinator.check_public_key().unwrap();
    coordinator.init_state(true, MilestoneIndex::new(1)).unwrap();
    let hash = coordinator.bootstrap().unwrap();

    assert!(dir.path().join("coordinator.state").is_file());
    assert_eq!(events.lock().unwrap().len(), 1);
    assert_eq!(events.lock().unwrap()[0].index, MilestoneIndex::new(1));
    assert_eq!(events.lock().unwrap()[0].mid, hash);
    // The milestone id is the hash of the essence, not the tail message id.
    assert_ne!(events.lock().unwrap()[0].milestone_id.as_bytes().as_slice(), hash.as_bytes().as_slice());
}

#[test]
fn s2_resume_then_issue_next_milestone() {
    let dir = tempfile::tempdir().unwrap();
    let state_path = dir.path().join("coordinator.state");
    let tangle = Arc::new(Tangle::new());
    let bus = Arc::new(Bus::default());

    // Bootstrap to get to index 1 first, so we have a real state file and dag entry.
    {
        let coordinator = coordinator(tangle.clone(), bus.clone(), state_path.clone());
        coordinator.init_state(true, MilestoneIndex::new(1)).unwrap();
        coordinator.bootstrap().unwrap();
    }

    // Fresh coordinator instance resumes from the persisted state and the populated tangle.
    let coordinator = coordinator(tangle, bus, state_path.clone());
    coordinator.init_state(false, MilestoneIndex::new(0)).unwrap();

    let previous_hash = coordinator.bootstrap().unwrap();
    let next_hash = coordinator.issue_milestone(previous_hash, previous_hash).unwrap();
    assert_ne!(next_hash, previous_hash);

    let persisted = bee_coordinator::state::StateStore::new(state_path).load().unwrap();
    assert_eq!(persisted.latest_milestone_index, MilestoneIndex::new(2));
}

#[test]
fn s3_resume_mismatch_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let state_path = dir.path().join("coordinator.state");
    let tangle = Arc::new(Tangle::new());
    let bus = Arc::new(Bus::default());

    {
        let coordinator = coordinator(tangle.clone(), bus.clone(), state_path.clone());
        coordinator.init_state(true, MilestoneIndex::new(1)).unwrap();
        coordinator.bootstrap().unwrap();
    }

    // A fresh, empty tangle has no recorded milestones: its highest index (0) will not match the
    // persisted state's index (1).
    let mismatched_tangle = Arc::new(Tangle::new());
    let coordinator = coordinator(mismatched_tangle, bus, state_path);

    let err = coordinator.init_state(false, MilestoneIndex::new(0)).unwrap_err();
    assert!(matches!(err, Error::Fatal(Fatal::StateDagMismatch { .. })));
}

#[test]
fn s4_backpressure_blocks_issuance() {
    let dir = tempfile::tempdir().unwrap();
    let tangle = Arc::new(Tangle::new());
    let bus = Arc::new(Bus::default());
    let coordinator = coordinator(tangle, bus, dir.path().join("coordinator.state"));

    coordinator.init_state(true, MilestoneIndex::new(1)).unwrap();
    coordinator.register_backpressure(|| true);

    let err = coordinator.issue_milestone(MessageId::NULL, MessageId::NULL).unwrap_err();
    assert!(matches!(err, Error::Recoverable(Recoverable::NodeLoadTooHigh)));
}

#[test]
fn s5_checkpoint_chain() {
    let dir = tempfile::tempdir().unwrap();
    let tangle = Arc::new(Tangle::new());
    let bus = Arc::new(Bus::default());
    let events = checkpoint_events(&bus);
    let coordinator = coordinator(tangle, bus, dir.path().join("coordinator.state"));

    coordinator.init_state(true, MilestoneIndex::new(1)).unwrap();
    let milestone_tail = coordinator.bootstrap().unwrap();

    let t1 = MessageId::from([1u8; 32]);
    let t2 = MessageId::from([2u8; 32]);
    let t3 = MessageId::from([3u8; 32]);

    let result = coordinator.issue_checkpoint(0, milestone_tail, &[t1, t2, t3]).unwrap();

    let fired = events.lock().unwrap();
    assert_eq!(fired.len(), 3);
    assert_eq!(fired[0].tip_index, 0);
    assert_eq!(fired[1].tip_index, 1);
    assert_eq!(fired[2].tip_index, 2);
    assert_eq!(fired[2].mid, result);
}

struct StubTipSelector {
    tip: MessageId,
}

impl TipSelector for StubTipSelector {
    type Error = Infallible;

    fn select_tips(&self, _extra_required: usize) -> Result<Vec<MessageId>, Self::Error> {
        Ok(vec![self.tip])
    }

    fn on_new_solid_message(&self, _metadata: &MessageMetadata) -> usize {
        0
    }

    fn get_tracked_messages_count(&self) -> usize {
        0
    }
}

#[test]
fn s6_scheduler_ticks_out_a_milestone_on_its_own() {
    let dir = tempfile::tempdir().unwrap();
    let tangle = Arc::new(Tangle::new());
    let bus = Arc::new(Bus::default());
    let events = milestone_events(&bus);

    let coordinator = coordinator_with_interval(
        tangle,
        bus,
        dir.path().join("coordinator.state"),
        Duration::from_millis(150),
    );

    coordinator.init_state(true, MilestoneIndex::new(1)).unwrap();
    let bootstrap_tail = coordinator.bootstrap().unwrap();

    let tip_selector = StubTipSelector { tip: MessageId::from([7u8; 32]) };
    let scheduler = Arc::new(Scheduler::new(coordinator, tip_selector, usize::MAX));
    let signal_sender = scheduler.signal_sender();

    let run_handle = {
        let scheduler = scheduler.clone();
        std::thread::spawn(move || scheduler.run(bootstrap_tail, bootstrap_tail))
    };

    // The ticker fires on its own, with no external signal, well before a generous timeout.
    let deadline = std::time::Instant::now() + Duration::from_secs(5);
    while events.lock().unwrap().is_empty() && std::time::Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(20));
    }

    assert_eq!(events.lock().unwrap().len(), 1);
    assert_eq!(events.lock().unwrap()[0].index, MilestoneIndex::new(2));

    signal_sender.shutdown();
    run_handle.join().unwrap();
}

#[test]
fn empty_tips_returns_no_tips_given() {
    let dir = tempfile::tempdir().unwrap();
    let tangle = Arc::new(Tangle::new());
    let bus = Arc::new(Bus::default());
    let coordinator = coordinator(tangle, bus, dir.path().join("coordinator.state"));

    coordinator.init_state(true, MilestoneIndex::new(1)).unwrap();

    let err = coordinator.issue_checkpoint(0, MessageId::NULL, &[]).unwrap_err();
    assert!(matches!(err, Error::Recoverable(Recoverable::NoTipsGiven)));
}
