// Copyright 2020-2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! Core data types for messages in the tangle: the generic [`Message`] envelope, its [`Parents`],
//! and the [`MilestonePayload`](payload::MilestonePayload) the coordinator issues.

#![deny(missing_docs, warnings)]

mod error;
mod message;
mod message_id;

/// A module that provides types and validations of parents.
pub mod parent;
/// A module that provides types and validations of payloads.
pub mod payload;

pub use self::{
    error::Error,
    message::{Message, MessageBuilder},
    message_id::{MessageId, MESSAGE_ID_LENGTH},
    parent::Parents,
};
