// Copyright 2020-2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! Durable, atomic load/save of the coordinator's persisted state.
//!
//! On-disk framing is a self-contained binary record: `[u32 index][bytes32 hash][i64
//! timestamp][u16 n_tips][n_tips × MID]`, all fields little-endian. A write never touches the
//! real path directly; it writes to a sibling temp file, `fsync`s it, and renames it into place,
//! so a crash mid-write leaves the previous state file intact.

use bee_message::{payload::milestone::MilestoneIndex, MessageId};

use std::{
    fs::{self, File},
    io::{self, Read, Write},
    path::PathBuf,
};

/// The coordinator's persisted state: everything needed to resume issuance after a restart.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CoordinatorState {
    /// The index of the last successfully issued milestone.
    pub latest_milestone_index: MilestoneIndex,
    /// The tail message id of the last successfully issued milestone.
    pub latest_milestone_hash: MessageId,
    /// The Unix timestamp, in seconds, of the last successfully issued milestone. Zero at genesis.
    pub latest_milestone_timestamp: i64,
    /// The message ids of the just-issued milestone bundle, tail first.
    pub latest_milestone_tips: Vec<MessageId>,
}

/// Loads and persists [`CoordinatorState`] at a fixed path on disk.
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    /// Creates a store rooted at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Whether a state file currently exists at the configured path.
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Loads the state file.
    ///
    /// Fails if the file is absent, truncated, or its tip count does not match the remaining
    /// bytes.
    pub fn load(&self) -> Result<CoordinatorState, Error> {
        let mut file = File::open(&self.path).map_err(|e| Error::Io(self.path.clone(), e))?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes).map_err(|e| Error::Io(self.path.clone(), e))?;

        decode(&bytes).ok_or_else(|| Error::Truncated(self.path.clone()))
    }

    /// Persists `state`, replacing any previous state file atomically.
    pub fn store(&self, state: &CoordinatorState) -> Result<(), Error> {
        let bytes = encode(state);

        let temp_path = self.path.with_extension("tmp");
        {
            let mut temp_file = File::create(&temp_path).map_err(|e| Error::Io(temp_path.clone(), e))?;
            temp_file.write_all(&bytes).map_err(|e| Error::Io(temp_path.clone(), e))?;
            temp_file.sync_all().map_err(|e| Error::Io(temp_path.clone(), e))?;
        }

        fs::rename(&temp_path, &self.path).map_err(|e| Error::Io(self.path.clone(), e))
    }
}

fn encode(state: &CoordinatorState) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(4 + 32 + 8 + 2 + state.latest_milestone_tips.len() * 32);

    bytes.extend_from_slice(&state.latest_milestone_index.0.to_le_bytes());
    bytes.extend_from_slice(state.latest_milestone_hash.as_bytes());
    bytes.extend_from_slice(&state.latest_milestone_timestamp.to_le_bytes());
    bytes.extend_from_slice(&(state.latest_milestone_tips.len() as u16).to_le_bytes());
    for tip in &state.latest_milestone_tips {
        bytes.extend_from_slice(tip.as_bytes());
    }

    bytes
}

fn decode(bytes: &[u8]) -> Option<CoordinatorState> {
    const HEADER_LEN: usize = 4 + 32 + 8 + 2;

    if bytes.len() < HEADER_LEN {
        return None;
    }

    let index = u32::from_le_bytes(bytes[0..4].try_into().ok()?);
    let hash = MessageId::new(bytes[4..36].try_into().ok()?);
    let timestamp = i64::from_le_bytes(bytes[36..44].try_into().ok()?);
    let n_tips = u16::from_le_bytes(bytes[44..46].try_into().ok()?) as usize;

    let tips_bytes = &bytes[46..];
    if tips_bytes.len() != n_tips * 32 {
        return None;
    }

    let tips = tips_bytes
        .chunks_exact(32)
        .map(|chunk| MessageId::new(chunk.try_into().unwrap()))
        .collect();

    Some(CoordinatorState {
        latest_milestone_index: MilestoneIndex::new(index),
        latest_milestone_hash: hash,
        latest_milestone_timestamp: timestamp,
        latest_milestone_tips: tips,
    })
}

/// Errors produced while loading or persisting a [`CoordinatorState`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An I/O error occurred while reading or writing the given path.
    #[error("{0}: {1}")]
    Io(PathBuf, #[source] io::Error),
    /// The state file exists but is shorter than its declared framing, or its tip count does not
    /// match the remaining bytes.
    #[error("state file at {0} is truncated or inconsistently framed")]
    Truncated(PathBuf),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_state() -> CoordinatorState {
        CoordinatorState {
            latest_milestone_index: MilestoneIndex::new(42),
            latest_milestone_hash: MessageId::from([7u8; 32]),
            latest_milestone_timestamp: 1_650_000_000,
            latest_milestone_tips: vec![MessageId::from([1u8; 32]), MessageId::from([2u8; 32])],
        }
    }

    #[test]
    fn store_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path().join("coordinator.state"));
        let state = sample_state();

        store.store(&state).unwrap();

        assert_eq!(store.load().unwrap(), state);
    }

    #[test]
    fn load_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path().join("missing"));
        assert!(store.load().is_err());
    }

    #[test]
    fn load_truncated_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("coordinator.state");
        fs::write(&path, [0u8; 10]).unwrap();

        let store = StateStore::new(path);
        assert!(matches!(store.load(), Err(Error::Truncated(_))));
    }

    #[test]
    fn store_does_not_leave_temp_file_behind() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path().join("coordinator.state"));
        store.store(&sample_state()).unwrap();

        assert!(!dir.path().join("coordinator.tmp").exists());
    }

    #[test]
    fn empty_tips_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path().join("coordinator.state"));
        let mut state = sample_state();
        state.latest_milestone_tips.clear();

        store.store(&state).unwrap();
        assert_eq!(store.load().unwrap(), state);
    }
}
