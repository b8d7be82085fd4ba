// Copyright 2020-2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! Merkle root hashing and the white-flag mutation engine contract the coordinator issues
//! milestones against.

#![deny(missing_docs, warnings)]

mod error;
mod hash_function;
mod merkle_hasher;
mod white_flag;

pub use self::{
    error::Error,
    hash_function::HashFunction,
    merkle_hasher::MerkleHasher,
    white_flag::{ReferenceWhiteFlagEngine, WhiteFlagEngine, WhiteFlagMutations},
};
