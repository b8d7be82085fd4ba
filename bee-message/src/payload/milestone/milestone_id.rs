// Copyright 2020-2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use crate::Error;

use packable::{error::UnpackError, packer::Packer, unpacker::Unpacker, Packable};

use core::{convert::TryFrom, fmt};

const MILESTONE_ID_LENGTH: usize = 32;

/// A milestone identifier, the BLAKE2b-256 hash of a milestone essence.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
pub struct MilestoneId([u8; MILESTONE_ID_LENGTH]);

impl MilestoneId {
    /// Creates a new [`MilestoneId`].
    pub fn new(bytes: [u8; MILESTONE_ID_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Returns the raw bytes of this [`MilestoneId`].
    pub fn as_bytes(&self) -> &[u8; MILESTONE_ID_LENGTH] {
        &self.0
    }
}

impl From<[u8; MILESTONE_ID_LENGTH]> for MilestoneId {
    fn from(bytes: [u8; MILESTONE_ID_LENGTH]) -> Self {
        Self::new(bytes)
    }
}

impl AsRef<[u8]> for MilestoneId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl TryFrom<&[u8]> for MilestoneId {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let array: [u8; MILESTONE_ID_LENGTH] = bytes
            .try_into()
            .map_err(|_| Error::InvalidMessageIdLength(bytes.len()))?;
        Ok(Self(array))
    }
}

impl fmt::Display for MilestoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl fmt::Debug for MilestoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MilestoneId({})", self)
    }
}

impl Packable for MilestoneId {
    type UnpackError = Error;
    type UnpackVisitor = ();

    fn pack<P: Packer>(&self, packer: &mut P) -> Result<(), P::Error> {
        packer.pack_bytes(self.0)
    }

    fn unpack<U: Unpacker, const VERIFY: bool>(
        unpacker: &mut U,
        _visitor: &Self::UnpackVisitor,
    ) -> Result<Self, UnpackError<Self::UnpackError, U::Error>> {
        let mut bytes = [0u8; MILESTONE_ID_LENGTH];
        unpacker.unpack_bytes(&mut bytes)?;
        Ok(Self(bytes))
    }
}

#[cfg(feature = "serde")]
mod dto {
    use super::*;

    use serde::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer};

    impl Serialize for MilestoneId {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            self.to_string().serialize(serializer)
        }
    }

    impl<'de> Deserialize<'de> for MilestoneId {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let s = String::deserialize(deserializer)?;
            let bytes = hex::decode(&s).map_err(D::Error::custom)?;
            MilestoneId::try_from(bytes.as_slice()).map_err(D::Error::custom)
        }
    }
}
