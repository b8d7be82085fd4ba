// Copyright 2020-2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use crate::{
    parent::Parents,
    payload::{OptionalPayload, Payload},
    Error, MessageId,
};

use crypto::hashes::{blake2b::Blake2b256, Digest};
use packable::{error::UnpackError, packer::Packer, unpacker::Unpacker, Packable, PackableExt};

/// A builder to construct a [`Message`] before its proof of work has been computed.
#[derive(Clone)]
#[must_use]
pub struct MessageBuilder {
    parents: Parents,
    payload: Option<Payload>,
}

impl MessageBuilder {
    /// Creates a new [`MessageBuilder`] referencing the given parents.
    pub fn new(parents: Parents) -> Self {
        Self { parents, payload: None }
    }

    /// Attaches a payload to the message under construction.
    pub fn with_payload(mut self, payload: Payload) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Finishes the builder into a [`Message`] with a zero nonce.
    ///
    /// The caller is expected to compute a proof-of-work nonce over
    /// [`Message::pow_input`] and set it with [`Message::with_nonce`] before gossiping the
    /// message; a zero nonce is only a valid placeholder for checkpoint messages whose weight
    /// magnitude is not enforced.
    pub fn finish(self) -> Result<Message, Error> {
        verify_payload(self.payload.as_ref())?;

        let message = Message {
            parents: self.parents,
            payload: self.payload.into(),
            nonce: 0,
        };

        if message.packed_len() > Message::LENGTH_MAX {
            return Err(Error::Packable(format!(
                "message of {} bytes exceeds the {} byte maximum",
                message.packed_len(),
                Message::LENGTH_MAX
            )));
        }

        Ok(message)
    }
}

/// The object that the coordinator issues into, and that is gossiped around, the DAG.
///
/// A message's identifier ([`MessageId`]) is the BLAKE2b-256 hash of its packed bytes, so it only
/// becomes stable once the nonce has been set.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Message {
    parents: Parents,
    payload: OptionalPayload,
    nonce: u64,
}

impl Message {
    /// The maximum number of bytes in a message.
    pub const LENGTH_MAX: usize = 32768;

    /// Creates a new [`MessageBuilder`] to construct an instance of a [`Message`].
    pub fn build(parents: Parents) -> MessageBuilder {
        MessageBuilder::new(parents)
    }

    /// Returns the parents of this [`Message`].
    pub fn parents(&self) -> &Parents {
        &self.parents
    }

    /// Returns the payload of this [`Message`], if any.
    pub fn payload(&self) -> Option<&Payload> {
        self.payload.as_ref()
    }

    /// Returns the nonce of this [`Message`].
    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    /// Computes the identifier of this [`Message`].
    pub fn id(&self) -> MessageId {
        MessageId::new(Blake2b256::digest(&self.pack_to_vec()).into())
    }

    /// Returns the packed bytes a proof-of-work handler should hash, i.e. everything but the
    /// trailing nonce.
    pub fn pow_input(&self) -> Vec<u8> {
        let bytes = self.pack_to_vec();
        bytes[..bytes.len() - core::mem::size_of::<u64>()].to_vec()
    }

    /// Returns a copy of this [`Message`] with the given proof-of-work nonce set.
    pub fn with_nonce(mut self, nonce: u64) -> Self {
        self.nonce = nonce;
        self
    }
}

impl Packable for Message {
    type UnpackError = Error;
    type UnpackVisitor = ();

    fn pack<P: Packer>(&self, packer: &mut P) -> Result<(), P::Error> {
        self.parents.pack(packer)?;
        self.payload.pack(packer)?;
        self.nonce.pack(packer)?;

        Ok(())
    }

    fn unpack<U: Unpacker, const VERIFY: bool>(
        unpacker: &mut U,
        visitor: &Self::UnpackVisitor,
    ) -> Result<Self, UnpackError<Self::UnpackError, U::Error>> {
        let parents = Parents::unpack::<_, VERIFY>(unpacker, visitor)?;
        let payload = OptionalPayload::unpack::<_, VERIFY>(unpacker, visitor)?;

        if VERIFY {
            verify_payload(payload.as_ref()).map_err(UnpackError::Packable)?;
        }

        let mut nonce_bytes = [0u8; 8];
        unpacker.unpack_bytes(&mut nonce_bytes)?;
        let nonce = u64::from_le_bytes(nonce_bytes);

        let message = Self {
            parents,
            payload,
            nonce,
        };

        if VERIFY && message.packed_len() > Self::LENGTH_MAX {
            return Err(UnpackError::Packable(Error::Packable(format!(
                "message of {} bytes exceeds the {} byte maximum",
                message.packed_len(),
                Self::LENGTH_MAX
            ))));
        }

        Ok(message)
    }
}

fn verify_payload(payload: Option<&Payload>) -> Result<(), Error> {
    if !matches!(payload, None | Some(Payload::Milestone(_))) {
        Err(Error::UnknownPayloadKind(payload.unwrap().kind()))
    } else {
        Ok(())
    }
}
