// Copyright 2020 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use crate::providers::{NonceProvider, NonceProviderBuilder};

use std::convert::Infallible;

/// Builds a [`Constant`] nonce provider.
#[derive(Default)]
pub struct ConstantBuilder {
    value: u64,
}

impl ConstantBuilder {
    /// Sets the nonce that the built [`Constant`] will always return.
    pub fn with_value(mut self, value: u64) -> Self {
        self.value = value;
        self
    }
}

impl NonceProviderBuilder for ConstantBuilder {
    type Provider = Constant;

    fn finish(self) -> Self::Provider {
        Constant { value: self.value }
    }
}

/// A [`NonceProvider`] that always returns the same nonce, regardless of input.
///
/// Used in tests and in place of [`Miner`](super::Miner) where proof-of-work is not meant to be
/// enforced, e.g. checkpoint messages.
pub struct Constant {
    value: u64,
}

impl NonceProvider for Constant {
    type Builder = ConstantBuilder;
    type Error = Infallible;

    fn nonce(&self, _bytes: &[u8], _target_score: f64) -> Result<u64, Self::Error> {
        Ok(self.value)
    }
}
