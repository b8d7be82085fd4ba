// Copyright 2020-2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use crate::Error;

use packable::{error::UnpackError, packer::Packer, unpacker::Unpacker, Packable};

use core::{convert::TryFrom, fmt};

const MERKLE_ROOT_LENGTH: usize = 32;

/// The root of a merkle hash tree computed over the messages referenced by a milestone.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Default)]
pub struct MerkleRoot([u8; MERKLE_ROOT_LENGTH]);

impl MerkleRoot {
    /// Creates a new [`MerkleRoot`].
    pub fn new(bytes: [u8; MERKLE_ROOT_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Returns the raw bytes of this [`MerkleRoot`].
    pub fn as_bytes(&self) -> &[u8; MERKLE_ROOT_LENGTH] {
        &self.0
    }
}

impl From<[u8; MERKLE_ROOT_LENGTH]> for MerkleRoot {
    fn from(bytes: [u8; MERKLE_ROOT_LENGTH]) -> Self {
        Self::new(bytes)
    }
}

impl AsRef<[u8]> for MerkleRoot {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl TryFrom<&[u8]> for MerkleRoot {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let array: [u8; MERKLE_ROOT_LENGTH] = bytes
            .try_into()
            .map_err(|_| Error::InvalidMerkleRootLength(bytes.len()))?;
        Ok(Self(array))
    }
}

impl fmt::Display for MerkleRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl fmt::Debug for MerkleRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MerkleRoot({})", self)
    }
}

impl Packable for MerkleRoot {
    type UnpackError = Error;
    type UnpackVisitor = ();

    fn pack<P: Packer>(&self, packer: &mut P) -> Result<(), P::Error> {
        packer.pack_bytes(self.0)
    }

    fn unpack<U: Unpacker, const VERIFY: bool>(
        unpacker: &mut U,
        _visitor: &Self::UnpackVisitor,
    ) -> Result<Self, UnpackError<Self::UnpackError, U::Error>> {
        let mut bytes = [0u8; MERKLE_ROOT_LENGTH];
        unpacker.unpack_bytes(&mut bytes)?;
        Ok(Self(bytes))
    }
}

#[cfg(feature = "serde")]
mod dto {
    use super::*;

    use serde::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer};

    impl Serialize for MerkleRoot {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            self.to_string().serialize(serializer)
        }
    }

    impl<'de> Deserialize<'de> for MerkleRoot {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let s = String::deserialize(deserializer)?;
            let bytes = hex::decode(&s).map_err(D::Error::custom)?;
            MerkleRoot::try_from(bytes.as_slice()).map_err(D::Error::custom)
        }
    }
}
