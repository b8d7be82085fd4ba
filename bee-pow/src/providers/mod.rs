// Copyright 2020 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! Providers of proof-of-work nonces.

mod constant;
mod miner;

pub use self::{
    constant::{Constant, ConstantBuilder},
    miner::{Miner, MinerBuilder},
};

/// A type that can find a nonce satisfying a target proof-of-work score.
pub trait NonceProvider: Sized {
    /// The builder type of this provider.
    type Builder: NonceProviderBuilder<Provider = Self>;
    /// The error type returned when a nonce cannot be found.
    type Error: std::error::Error;

    /// Finds a nonce so that, appended to `bytes`, the resulting proof-of-work score is at least
    /// `target_score`.
    fn nonce(&self, bytes: &[u8], target_score: f64) -> Result<u64, Self::Error>;
}

/// Builds a [`NonceProvider`].
pub trait NonceProviderBuilder: Default {
    /// The provider type this builder produces.
    type Provider: NonceProvider<Builder = Self>;

    /// Creates a new builder.
    fn new() -> Self {
        Self::default()
    }

    /// Consumes the builder, producing a provider.
    fn finish(self) -> Self::Provider;
}

/// Trivial [`NonceProviderBuilder`] for `u64` as a [`NonceProvider`] of itself.
#[derive(Default)]
pub struct U64Builder(u64);

impl NonceProviderBuilder for U64Builder {
    type Provider = u64;

    fn finish(self) -> u64 {
        self.0
    }
}

impl NonceProvider for u64 {
    type Builder = U64Builder;
    type Error = std::convert::Infallible;

    /// Ignores `bytes` and `target_score`, always returning the constant nonce itself. Useful in
    /// tests that need a deterministic, zero-cost provider.
    fn nonce(&self, _bytes: &[u8], _target_score: f64) -> Result<u64, Self::Error> {
        Ok(*self)
    }
}
