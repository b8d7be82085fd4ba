// Copyright 2020-2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

/// Errors raised while selecting a merkle hash function or computing white-flag mutations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The configured name is not one of the four names the coordinator spec recognizes.
    #[error("unknown merkle hash function `{0}`")]
    UnknownHashFunction(String),
    /// The configured name is recognized but this build has no hasher backing it.
    #[error("unsupported merkle hash function `{0}`")]
    UnsupportedHashFunction(String),
    /// The white-flag engine could not compute mutations, e.g. because an ancestor was missing
    /// from its message cache.
    #[error("white-flag mutation computation failed: {0}")]
    MutationComputationFailed(String),
}
