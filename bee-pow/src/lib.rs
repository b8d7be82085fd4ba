// Copyright 2020 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! Proof-of-work utilities: a pluggable [`NonceProvider`](providers::NonceProvider) abstraction
//! and a multi-threaded [`Miner`](providers::Miner) implementation.

#![deny(missing_docs, warnings)]

/// Nonce providers: [`Miner`](providers::Miner) for real proof-of-work, [`Constant`](providers::Constant) for tests.
pub mod providers;
/// Proof-of-work scoring.
pub mod score;

pub use self::score::compute_pow_score;
