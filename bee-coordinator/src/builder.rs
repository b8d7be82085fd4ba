// Copyright 2020-2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! Assembles checkpoint and milestone messages and drives their proof of work.

use crate::error::Error;

use bee_message::{
    parent::Parents,
    payload::milestone::{
        MerkleRoot, MilestoneEssence, MilestoneIndex, MilestonePayload, MilestoneSignature,
    },
    Message, MessageId,
};
use bee_pow::providers::NonceProvider;
use bee_signing::CoordinatorSigner;

/// Builds checkpoint and milestone messages, signing and proof-of-working them before they are
/// handed to the gossip layer.
///
/// A checkpoint carries no payload and is issued at a fixed, low target score (its only purpose is
/// to keep the future cone shallow between milestones); a milestone carries a signed
/// [`MilestonePayload`] and must reach the configured minimum weight magnitude.
pub struct MilestoneBuilder<P> {
    signer: CoordinatorSigner,
    nonce_provider: P,
    mwm: u32,
}

impl<P: NonceProvider> MilestoneBuilder<P> {
    /// Creates a new builder over the given signer and nonce provider.
    pub fn new(signer: CoordinatorSigner, nonce_provider: P, mwm: u32) -> Self {
        Self {
            signer,
            nonce_provider,
            mwm,
        }
    }

    /// The proof-of-work target score a message's hash must reach, derived from the configured
    /// minimum weight magnitude.
    fn target_score(&self) -> f64 {
        3f64.powi(self.mwm as i32)
    }

    /// Confirms that the public key derived from the held signing key matches `expected_hex`.
    pub fn verify_public_key(&self, expected_hex: &str) -> Result<(), bee_signing::Error> {
        self.signer.verify_public_key_hex(expected_hex)
    }

    /// Builds a checkpoint message referencing `tip` and `previous`, with its nonce set so that it
    /// reaches [`Self::target_score`].
    pub fn build_checkpoint(&self, tip: MessageId, previous: MessageId) -> Result<Message, Error> {
        let message = Message::build(Parents::new(vec![tip, previous]).map_err(|e| {
            Error::Fatal(crate::error::Fatal::BootstrapFailed(e.to_string()))
        })?)
        .finish()
        .map_err(|e| Error::Fatal(crate::error::Fatal::BootstrapFailed(e.to_string())))?;

        self.with_pow(message)
    }

    /// Builds, signs and proof-of-works a milestone message referencing `(trunk, branch)` at
    /// `index`, committing to `merkle_root` at `timestamp` (unix seconds).
    pub fn build_milestone(
        &self,
        trunk: MessageId,
        branch: MessageId,
        index: MilestoneIndex,
        merkle_root: MerkleRoot,
        timestamp: i64,
    ) -> Result<Message, Error> {
        let essence = MilestoneEssence::new(index, timestamp, trunk, branch, merkle_root);
        let signature = MilestoneSignature::new(self.signer.sign(&essence.hash()).to_bytes());
        let payload = MilestonePayload::new(essence, signature);

        let message = Message::build(Parents::new(vec![trunk, branch]).map_err(|e| {
            Error::Fatal(crate::error::Fatal::BootstrapFailed(e.to_string()))
        })?)
        .with_payload(payload.into())
        .finish()
        .map_err(|e| Error::Fatal(crate::error::Fatal::BootstrapFailed(e.to_string())))?;

        self.with_pow(message)
    }

    fn with_pow(&self, message: Message) -> Result<Message, Error> {
        let nonce = self
            .nonce_provider
            .nonce(&message.pow_input(), self.target_score())
            .map_err(|_| Error::Aborted)?;

        Ok(message.with_nonce(nonce))
    }
}
