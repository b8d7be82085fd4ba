// Copyright 2020-2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! Coordinator configuration.
//!
//! Loading this from a file or the command line (`--cooBootstrap`, `--cooStartIndex`, and friends)
//! is a wiring concern that lives outside this crate; [`CoordinatorConfig`] is the value such
//! wiring is expected to hand the coordinator once parsed.

use bee_ledger::HashFunction;

use std::{path::PathBuf, time::Duration};

/// Tip-selection tuning passed through unchanged to the configured tip selector.
#[derive(Clone, Debug)]
pub struct TipSelectionConfig {
    /// Below-max-depth cutoff: messages whose `(lsmi - omrsi)` exceeds this are excluded from tip
    /// selection.
    pub below_max_depth: u32,
    /// Checkpoint-triggering threshold: a checkpoint is requested once the selector's tracked
    /// message count crosses this value upward.
    pub max_tracked_messages: usize,
}

impl Default for TipSelectionConfig {
    fn default() -> Self {
        Self {
            below_max_depth: 15,
            max_tracked_messages: 10_000,
        }
    }
}

/// Builder for a [`CoordinatorConfig`].
#[derive(Default)]
pub struct CoordinatorConfigBuilder {
    mwm: Option<u32>,
    state_file_path: Option<PathBuf>,
    milestone_interval: Option<Duration>,
    merkle_hash_function: Option<String>,
    public_key: Option<String>,
    tip_selection: Option<TipSelectionConfig>,
}

impl CoordinatorConfigBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the minimum weight magnitude every issued message's proof of work must reach.
    pub fn mwm(mut self, mwm: u32) -> Self {
        self.mwm = Some(mwm);
        self
    }

    /// Sets the path of the durable state file.
    pub fn state_file_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.state_file_path = Some(path.into());
        self
    }

    /// Sets the interval between milestone ticks.
    pub fn milestone_interval(mut self, interval: Duration) -> Self {
        self.milestone_interval = Some(interval);
        self
    }

    /// Sets the configured name of the merkle hash function (`MilestoneMerkleTreeHashFunc`).
    pub fn merkle_hash_function(mut self, name: impl Into<String>) -> Self {
        self.merkle_hash_function = Some(name.into());
        self
    }

    /// Sets the hex-encoded public key the held private key is checked against at startup.
    pub fn public_key(mut self, public_key: impl Into<String>) -> Self {
        self.public_key = Some(public_key.into());
        self
    }

    /// Sets the tip-selection tuning parameters.
    pub fn tip_selection(mut self, tip_selection: TipSelectionConfig) -> Self {
        self.tip_selection = Some(tip_selection);
        self
    }

    /// Builds the configuration, validating the merkle hash function name.
    pub fn finish(self) -> Result<CoordinatorConfig, bee_ledger::Error> {
        let merkle_hash_function_name = self.merkle_hash_function.unwrap_or_else(|| "blake2b-256".to_owned());
        let merkle_hash_function = HashFunction::from_name(&merkle_hash_function_name)?;

        Ok(CoordinatorConfig {
            mwm: self.mwm.unwrap_or(14),
            state_file_path: self.state_file_path.unwrap_or_else(|| PathBuf::from("coordinator.state")),
            milestone_interval: self.milestone_interval.unwrap_or(Duration::from_secs(60)),
            merkle_hash_function,
            public_key: self.public_key.unwrap_or_default(),
            tip_selection: self.tip_selection.unwrap_or_default(),
        })
    }
}

/// The coordinator's validated runtime configuration.
#[derive(Clone, Debug)]
pub struct CoordinatorConfig {
    /// The minimum weight magnitude every issued message's proof of work must reach.
    pub mwm: u32,
    /// The path of the durable state file.
    pub state_file_path: PathBuf,
    /// The interval between milestone ticks.
    pub milestone_interval: Duration,
    /// The merkle hash function used by both the milestone builder and the white-flag engine.
    pub merkle_hash_function: HashFunction,
    /// The hex-encoded public key the held private key is checked against at startup.
    pub public_key: String,
    /// Tip-selection tuning parameters.
    pub tip_selection: TipSelectionConfig,
}

impl CoordinatorConfig {
    /// Creates a builder for a [`CoordinatorConfig`].
    pub fn build() -> CoordinatorConfigBuilder {
        CoordinatorConfigBuilder::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_pick_blake2b_256() {
        let config = CoordinatorConfig::build().finish().unwrap();
        assert_eq!(config.merkle_hash_function, HashFunction::Blake2b256);
        assert_eq!(config.mwm, 14);
    }

    #[test]
    fn unknown_hash_function_fails_to_build() {
        assert!(CoordinatorConfig::build().merkle_hash_function("sha3-256").finish().is_err());
    }
}
