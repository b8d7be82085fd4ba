// Copyright 2020-2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use bee_message::MessageId;

/// Errors produced while traversing the Tangle.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A message referenced by the walk (as a root or as a child) is not present in the Tangle.
    #[error("message {0} not found")]
    MessageNotFound(MessageId),
    /// The traversal was cancelled through its abort signal before it ran to completion.
    #[error("traversal aborted")]
    Aborted,
}
