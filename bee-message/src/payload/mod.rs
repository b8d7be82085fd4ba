// Copyright 2020-2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! The payload module defines the core data types for representing message payloads.

pub mod milestone;

pub use self::milestone::MilestonePayload;

use crate::Error;

use packable::{error::UnpackError, packer::Packer, unpacker::Unpacker, Packable, PackableExt};

use core::ops::Deref;

/// A generic payload that can represent different types defining message payloads.
///
/// A checkpoint message carries no payload; only milestones do.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "type", content = "data")
)]
pub enum Payload {
    /// A milestone payload.
    Milestone(Box<MilestonePayload>),
}

impl From<MilestonePayload> for Payload {
    fn from(payload: MilestonePayload) -> Self {
        Self::Milestone(Box::new(payload))
    }
}

impl Payload {
    /// Returns the payload kind of a [`Payload`].
    pub fn kind(&self) -> u32 {
        match self {
            Self::Milestone(_) => MilestonePayload::KIND,
        }
    }
}

impl Packable for Payload {
    type UnpackError = Error;
    type UnpackVisitor = ();

    fn pack<P: Packer>(&self, packer: &mut P) -> Result<(), P::Error> {
        match self {
            Payload::Milestone(milestone) => {
                packer.pack_bytes(MilestonePayload::KIND.to_le_bytes())?;
                milestone.pack(packer)
            }
        }
    }

    fn unpack<U: Unpacker, const VERIFY: bool>(
        unpacker: &mut U,
        visitor: &Self::UnpackVisitor,
    ) -> Result<Self, UnpackError<Self::UnpackError, U::Error>> {
        let mut kind_bytes = [0u8; 4];
        unpacker.unpack_bytes(&mut kind_bytes)?;
        let kind = u32::from_le_bytes(kind_bytes);

        Ok(match kind {
            MilestonePayload::KIND => Payload::from(MilestonePayload::unpack::<_, VERIFY>(unpacker, visitor)?),
            k => return Err(UnpackError::Packable(Error::UnknownPayloadKind(k))),
        })
    }
}

/// Representation of an optional [`Payload`].
///
/// Essentially an `Option<Payload>` with a length-prefixed [`Packable`] implementation, so an
/// absent payload is a fixed four zero bytes rather than a variable-length encoding of `None`.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OptionalPayload(Option<Payload>);

impl Deref for OptionalPayload {
    type Target = Option<Payload>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Option<Payload>> for OptionalPayload {
    fn from(option: Option<Payload>) -> Self {
        Self(option)
    }
}

impl Packable for OptionalPayload {
    type UnpackError = Error;
    type UnpackVisitor = ();

    fn pack<P: Packer>(&self, packer: &mut P) -> Result<(), P::Error> {
        match &self.0 {
            None => packer.pack_bytes(0u32.to_le_bytes()),
            Some(payload) => {
                packer.pack_bytes((payload.packed_len() as u32).to_le_bytes())?;
                payload.pack(packer)
            }
        }
    }

    fn unpack<U: Unpacker, const VERIFY: bool>(
        unpacker: &mut U,
        visitor: &Self::UnpackVisitor,
    ) -> Result<Self, UnpackError<Self::UnpackError, U::Error>> {
        let mut len_bytes = [0u8; 4];
        unpacker.unpack_bytes(&mut len_bytes)?;
        let len = u32::from_le_bytes(len_bytes) as usize;

        if len > 0 {
            let payload = Payload::unpack::<_, VERIFY>(unpacker, visitor)?;

            if VERIFY && len != payload.packed_len() {
                return Err(UnpackError::Packable(Error::InvalidPayloadLength {
                    expected: len,
                    actual: payload.packed_len(),
                }));
            }

            Ok(Self(Some(payload)))
        } else {
            Ok(Self(None))
        }
    }
}
