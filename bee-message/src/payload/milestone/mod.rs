// Copyright 2020-2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! Module describing the milestone payload: the signed message the coordinator issues to anchor
//! a portion of the DAG.

mod essence;
mod index;
mod merkle;
mod milestone_id;
#[allow(clippy::module_inception)]
mod payload;

pub use self::{
    essence::MilestoneEssence,
    index::MilestoneIndex,
    merkle::MerkleRoot,
    milestone_id::MilestoneId,
    payload::{MilestonePayload, MilestoneSignature},
};
