// Copyright 2020-2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! Ed25519 signing for the coordinator's milestones.

#![deny(missing_docs, warnings)]

mod error;
mod signer;

pub use self::{
    error::Error,
    signer::{verify, CoordinatorSigner},
};
