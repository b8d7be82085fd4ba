// Copyright 2020-2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

//! The merkle hash function used identically by the milestone builder and the white-flag engine,
//! selected by name at startup.

use crate::{merkle_hasher::MerkleHasher, Error};

use bee_message::MessageId;

use crypto::hashes::blake2b::Blake2b256;

/// A merkle hash function recognized by its configuration name.
///
/// The coordinator spec enumerates `blake2b-512`, `blake2b-384`, `blake2b-256` and `blake2s-256`;
/// only `blake2b-256` is backed by a hasher in this build (the only digest the rest of this
/// workspace pulls in `iota-crypto` for). The other three names parse but are rejected with
/// [`Error::UnsupportedHashFunction`], which is fatal at startup per the same rule that rejects an
/// unrecognized name outright.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum HashFunction {
    /// BLAKE2b with a 256-bit digest.
    Blake2b256,
}

impl HashFunction {
    /// Parses a configuration name into a [`HashFunction`].
    pub fn from_name(name: &str) -> Result<Self, Error> {
        match name {
            "blake2b-256" => Ok(Self::Blake2b256),
            "blake2b-512" | "blake2b-384" | "blake2s-256" => {
                Err(Error::UnsupportedHashFunction(name.to_owned()))
            }
            other => Err(Error::UnknownHashFunction(other.to_owned())),
        }
    }

    /// Computes the merkle root over `message_ids` using this hash function.
    pub fn digest(&self, message_ids: &[MessageId]) -> Vec<u8> {
        match self {
            Self::Blake2b256 => MerkleHasher::<Blake2b256>::new().digest(message_ids),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_recognized_name() {
        assert_eq!(HashFunction::from_name("blake2b-256").unwrap(), HashFunction::Blake2b256);
    }

    #[test]
    fn rejects_unsupported_recognized_name() {
        assert!(matches!(
            HashFunction::from_name("blake2b-512"),
            Err(Error::UnsupportedHashFunction(_))
        ));
    }

    #[test]
    fn rejects_unknown_name() {
        assert!(matches!(
            HashFunction::from_name("sha3-256"),
            Err(Error::UnknownHashFunction(_))
        ));
    }

    #[test]
    fn digest_is_32_bytes() {
        let function = HashFunction::from_name("blake2b-256").unwrap();
        assert_eq!(function.digest(&[MessageId::new([1u8; 32])]).len(), 32);
    }
}
