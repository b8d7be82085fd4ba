// Copyright 2020-2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! The in-memory Tangle: the coordinator's view of the DAG of messages it has seen, and the
//! future-cone walk used to decide what a milestone or checkpoint confirms.

#![deny(missing_docs, warnings)]

pub mod error;
pub mod metadata;
pub mod tangle;
pub mod traversal;

pub use self::{
    error::Error,
    metadata::MessageMetadata,
    tangle::{CachedMessage, Tangle, VertexData},
    traversal::{visit_children_follow, AbortHandle},
};
