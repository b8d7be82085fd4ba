// Copyright 2020-2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use crate::{
    payload::milestone::{MilestoneEssence, MilestoneId},
    Error,
};

use packable::{error::UnpackError, packer::Packer, unpacker::Unpacker, Packable};

use core::convert::TryFrom;

const SIGNATURE_LENGTH: usize = 64;

/// An Ed25519 signature over a [`MilestoneEssence`] hash.
#[derive(Clone, Copy, Eq, PartialEq)]
pub struct MilestoneSignature([u8; SIGNATURE_LENGTH]);

impl MilestoneSignature {
    /// Creates a new [`MilestoneSignature`] from its raw bytes.
    pub fn new(bytes: [u8; SIGNATURE_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Returns the raw bytes of this [`MilestoneSignature`].
    pub fn as_bytes(&self) -> &[u8; SIGNATURE_LENGTH] {
        &self.0
    }
}

impl core::fmt::Debug for MilestoneSignature {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "MilestoneSignature({})", hex::encode(self.0))
    }
}

impl TryFrom<&[u8]> for MilestoneSignature {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let array: [u8; SIGNATURE_LENGTH] = bytes
            .try_into()
            .map_err(|_| Error::InvalidSignatureLength(bytes.len()))?;
        Ok(Self(array))
    }
}

impl Packable for MilestoneSignature {
    type UnpackError = Error;
    type UnpackVisitor = ();

    fn pack<P: Packer>(&self, packer: &mut P) -> Result<(), P::Error> {
        packer.pack_bytes(self.0)
    }

    fn unpack<U: Unpacker, const VERIFY: bool>(
        unpacker: &mut U,
        _visitor: &Self::UnpackVisitor,
    ) -> Result<Self, UnpackError<Self::UnpackError, U::Error>> {
        let mut bytes = [0u8; SIGNATURE_LENGTH];
        unpacker.unpack_bytes(&mut bytes)?;
        Ok(Self(bytes))
    }
}

/// A payload that anchors a portion of the DAG and is identified by a monotonically increasing
/// [`MilestoneIndex`](super::MilestoneIndex).
///
/// It carries a single Ed25519 signature: the coordinator is assumed to be the network's single
/// issuer (see Non-goals), so threshold/multi-signature schemes are out of scope here.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MilestonePayload {
    essence: MilestoneEssence,
    signature: MilestoneSignature,
}

impl MilestonePayload {
    /// The payload kind of a [`MilestonePayload`].
    pub const KIND: u32 = 1;

    /// Creates a new [`MilestonePayload`].
    pub fn new(essence: MilestoneEssence, signature: MilestoneSignature) -> Self {
        Self { essence, signature }
    }

    /// Returns the essence of this [`MilestonePayload`].
    pub fn essence(&self) -> &MilestoneEssence {
        &self.essence
    }

    /// Returns the signature of this [`MilestonePayload`].
    pub fn signature(&self) -> &MilestoneSignature {
        &self.signature
    }

    /// The id of this milestone: the BLAKE2b-256 hash of its essence, i.e. the same hash that gets
    /// signed. Distinct from the containing message's id.
    pub fn id(&self) -> MilestoneId {
        MilestoneId::new(self.essence.hash())
    }
}

impl Packable for MilestonePayload {
    type UnpackError = Error;
    type UnpackVisitor = ();

    fn pack<P: Packer>(&self, packer: &mut P) -> Result<(), P::Error> {
        self.essence.pack(packer)?;
        self.signature.pack(packer)?;

        Ok(())
    }

    fn unpack<U: Unpacker, const VERIFY: bool>(
        unpacker: &mut U,
        visitor: &Self::UnpackVisitor,
    ) -> Result<Self, UnpackError<Self::UnpackError, U::Error>> {
        let essence = MilestoneEssence::unpack::<_, VERIFY>(unpacker, visitor)?;
        let signature = MilestoneSignature::unpack::<_, VERIFY>(unpacker, visitor)?;

        Ok(Self { essence, signature })
    }
}

#[cfg(feature = "serde")]
mod dto {
    use super::*;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    impl Serialize for MilestoneSignature {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            hex::encode(self.0).serialize(serializer)
        }
    }

    impl<'de> Deserialize<'de> for MilestoneSignature {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            use serde::de::Error as _;

            let s = String::deserialize(deserializer)?;
            let bytes = hex::decode(&s).map_err(D::Error::custom)?;
            MilestoneSignature::try_from(bytes.as_slice()).map_err(D::Error::custom)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{payload::milestone::MilestoneIndex, MessageId};

    fn essence(index: u32) -> MilestoneEssence {
        MilestoneEssence::new(
            MilestoneIndex::new(index),
            0,
            MessageId::from([1u8; 32]),
            MessageId::from([2u8; 32]),
            crate::payload::milestone::MerkleRoot::new([3u8; 32]),
        )
    }

    #[test]
    fn id_is_deterministic() {
        let payload = MilestonePayload::new(essence(1), MilestoneSignature::new([0u8; 64]));
        assert_eq!(payload.id(), payload.id());
    }

    #[test]
    fn id_differs_from_tail_message_id() {
        let payload = MilestonePayload::new(essence(1), MilestoneSignature::new([0u8; 64]));
        assert_ne!(payload.id().as_bytes(), MessageId::from([1u8; 32]).as_bytes());
    }

    #[test]
    fn id_changes_with_essence() {
        let a = MilestonePayload::new(essence(1), MilestoneSignature::new([0u8; 64]));
        let b = MilestonePayload::new(essence(2), MilestoneSignature::new([0u8; 64]));
        assert_ne!(a.id(), b.id());
    }
}
