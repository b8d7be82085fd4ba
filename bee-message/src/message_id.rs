// Copyright 2020-2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use crate::Error;

use packable::{error::UnpackError, packer::Packer, unpacker::Unpacker, Packable};

use core::{convert::TryFrom, fmt, str::FromStr};

/// The length, in bytes, of a [`MessageId`].
pub const MESSAGE_ID_LENGTH: usize = 32;

/// A message identifier, the BLAKE2b-256 hash of the packed message bytes.
///
/// The all-zero id is a distinguished "Null" value used to bootstrap a network: it is registered
/// as a solid entry point before the first milestone of a network's genesis is issued.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
pub struct MessageId([u8; MESSAGE_ID_LENGTH]);

impl Packable for MessageId {
    type UnpackError = Error;
    type UnpackVisitor = ();

    fn pack<P: Packer>(&self, packer: &mut P) -> Result<(), P::Error> {
        packer.pack_bytes(self.0)
    }

    fn unpack<U: Unpacker, const VERIFY: bool>(
        unpacker: &mut U,
        _visitor: &Self::UnpackVisitor,
    ) -> Result<Self, UnpackError<Self::UnpackError, U::Error>> {
        let mut bytes = [0u8; MESSAGE_ID_LENGTH];
        unpacker.unpack_bytes(&mut bytes)?;
        Ok(Self(bytes))
    }
}

impl MessageId {
    /// The all-zero [`MessageId`], used as the implicit parent of a network's first milestone.
    pub const NULL: Self = Self([0u8; MESSAGE_ID_LENGTH]);

    /// Creates a new [`MessageId`] from its raw bytes.
    pub fn new(bytes: [u8; MESSAGE_ID_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Returns the raw bytes of this [`MessageId`].
    pub fn as_bytes(&self) -> &[u8; MESSAGE_ID_LENGTH] {
        &self.0
    }

    /// Returns true if this is the distinguished [`MessageId::NULL`] value.
    pub fn is_null(&self) -> bool {
        self.0 == [0u8; MESSAGE_ID_LENGTH]
    }
}

impl From<[u8; MESSAGE_ID_LENGTH]> for MessageId {
    fn from(bytes: [u8; MESSAGE_ID_LENGTH]) -> Self {
        Self::new(bytes)
    }
}

impl AsRef<[u8]> for MessageId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl TryFrom<&[u8]> for MessageId {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let array: [u8; MESSAGE_ID_LENGTH] =
            bytes.try_into().map_err(|_| Error::InvalidMessageIdLength(bytes.len()))?;
        Ok(Self(array))
    }
}

impl FromStr for MessageId {
    type Err = Error;

    fn from_str(hex: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(hex).map_err(|_| Error::InvalidMessageIdLength(hex.len() / 2))?;
        Self::try_from(bytes.as_slice())
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl fmt::Debug for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MessageId({})", self)
    }
}

#[cfg(feature = "serde")]
mod dto {
    use super::*;

    use serde::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer};

    impl Serialize for MessageId {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            self.to_string().serialize(serializer)
        }
    }

    impl<'de> Deserialize<'de> for MessageId {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            String::deserialize(deserializer)?.parse().map_err(D::Error::custom)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_is_all_zero() {
        assert!(MessageId::NULL.is_null());
        assert_eq!(MessageId::NULL.as_bytes(), &[0u8; MESSAGE_ID_LENGTH]);
    }

    #[test]
    fn hex_round_trip() {
        let id = MessageId::new([7u8; MESSAGE_ID_LENGTH]);
        let hex = id.to_string();
        assert_eq!(hex.parse::<MessageId>().unwrap(), id);
    }

    #[test]
    fn rejects_wrong_length() {
        assert!(MessageId::try_from(&[0u8; 4][..]).is_err());
    }
}
