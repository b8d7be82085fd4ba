// Copyright 2020-2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

/// Errors that can occur while loading or using a [`CoordinatorSigner`](crate::CoordinatorSigner).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The environment variable holding the private key was not set.
    #[error("environment variable `{0}` is not set")]
    EnvVarMissing(String),
    /// The environment variable's content was not valid hex.
    #[error("private key is not valid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),
    /// The decoded private key did not have the expected length.
    #[error("invalid private key length: expected {expected} bytes, found {found}")]
    InvalidPrivateKeyLength {
        /// The expected length, in bytes.
        expected: usize,
        /// The length that was actually found.
        found: usize,
    },
    /// The public key derived from the held private key does not match the one configured by the
    /// operator.
    #[error("configured public key does not match the key derived from the private key")]
    PublicKeyMismatch,
}
