// Copyright 2020-2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use crate::MessageId;

/// Errors that can occur when constructing or unpacking a [`Message`](crate::Message) or a
/// milestone payload.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid message id length {0}")]
    InvalidMessageIdLength(usize),
    #[error("a message must reference at least one parent")]
    MessageWithoutParents,
    #[error("a message may not reference more than {max} parents, found {found}")]
    TooManyParents { max: usize, found: usize },
    #[error("duplicate parent {0}")]
    DuplicateParent(MessageId),
    #[error("parents must be sorted and deduplicated")]
    ParentsNotUniqueSorted,
    #[error("invalid merkle root length {0}")]
    InvalidMerkleRootLength(usize),
    #[error("invalid milestone signature length {0}")]
    InvalidSignatureLength(usize),
    #[error("invalid milestone public key length {0}")]
    InvalidPublicKeyLength(usize),
    #[error("unknown payload kind {0}")]
    UnknownPayloadKind(u32),
    #[error("invalid payload length: expected {expected}, got {actual}")]
    InvalidPayloadLength { expected: usize, actual: usize },
    #[error("packing or unpacking a message failed: {0}")]
    Packable(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
