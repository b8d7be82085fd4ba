// Copyright 2020 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use crate::{providers::{NonceProvider, NonceProviderBuilder}, score::compute_pow_score};

use std::{
    sync::{
        atomic::{AtomicBool, AtomicU64, Ordering},
        Arc,
    },
    thread,
};

/// Error returned by [`Miner`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The search was cancelled via the abort signal before a nonce was found.
    #[error("proof of work was cancelled")]
    Cancelled,
}

/// Builds a [`Miner`].
pub struct MinerBuilder {
    num_workers: usize,
    signal: Arc<AtomicBool>,
}

impl Default for MinerBuilder {
    fn default() -> Self {
        Self {
            num_workers: num_cpus::get(),
            signal: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl MinerBuilder {
    /// Sets the number of worker threads used to search for a nonce. Defaults to the number of
    /// available CPUs.
    pub fn with_num_workers(mut self, num_workers: usize) -> Self {
        self.num_workers = num_workers;
        self
    }

    /// Shares an external cancellation flag with the built [`Miner`]; setting it to `true` stops
    /// every worker at the next checkpoint.
    pub fn with_signal(mut self, signal: Arc<AtomicBool>) -> Self {
        self.signal = signal;
        self
    }
}

impl NonceProviderBuilder for MinerBuilder {
    type Provider = Miner;

    fn finish(self) -> Self::Provider {
        Miner {
            num_workers: self.num_workers.max(1),
            signal: self.signal,
        }
    }
}

/// A multi-threaded, CPU-bound [`NonceProvider`] that searches for a nonce whose
/// [`compute_pow_score`] meets or exceeds the target.
///
/// Each worker thread scans a disjoint residue class of `u64` (`worker_index, worker_index +
/// num_workers, ...`), so workers never duplicate work and the search is embarrassingly parallel.
pub struct Miner {
    num_workers: usize,
    signal: Arc<AtomicBool>,
}

impl NonceProvider for Miner {
    type Builder = MinerBuilder;
    type Error = Error;

    fn nonce(&self, bytes: &[u8], target_score: f64) -> Result<u64, Self::Error> {
        let found = Arc::new(AtomicBool::new(false));
        let winner = Arc::new(AtomicU64::new(0));

        thread::scope(|scope| {
            for worker_index in 0..self.num_workers {
                let bytes = bytes;
                let signal = self.signal.clone();
                let found = found.clone();
                let winner = winner.clone();

                scope.spawn(move || {
                    let mut nonce = worker_index as u64;
                    let mut buffer = bytes.to_vec();
                    buffer.extend_from_slice(&0u64.to_le_bytes());
                    let prefix_len = bytes.len();

                    while !found.load(Ordering::Relaxed) && !signal.load(Ordering::Relaxed) {
                        buffer[prefix_len..].copy_from_slice(&nonce.to_le_bytes());

                        if compute_pow_score(&buffer) >= target_score {
                            winner.store(nonce, Ordering::Relaxed);
                            found.store(true, Ordering::Relaxed);
                            break;
                        }

                        nonce = nonce.wrapping_add(self.num_workers as u64);
                    }
                });
            }
        });

        if found.load(Ordering::Relaxed) {
            Ok(winner.load(Ordering::Relaxed))
        } else {
            Err(Error::Cancelled)
        }
    }
}
