// Copyright 2020-2021 IOTA Stiftung
// SPDX-License-Identifier: Apache-2.0

use crate::Error;

use crypto::signatures::ed25519::{PublicKey, SecretKey, Signature};
use zeroize::Zeroizing;

/// Holds the coordinator's Ed25519 private key in memory and signs milestone essences with it.
///
/// The private key never leaves this type: [`CoordinatorSigner::sign`] is the only operation that
/// touches it after construction.
pub struct CoordinatorSigner {
    private_key: SecretKey,
}

impl CoordinatorSigner {
    /// Loads the private key from the hex-encoded 32-byte seed held in the environment variable
    /// `var_name` (the conventional name is `COO_PRV_KEY`).
    pub fn from_env_var(var_name: &str) -> Result<Self, Error> {
        let hex = std::env::var(var_name).map_err(|_| Error::EnvVarMissing(var_name.to_owned()))?;
        Self::from_hex(&hex)
    }

    /// Loads the private key from a hex-encoded 32-byte seed.
    pub fn from_hex(hex: &str) -> Result<Self, Error> {
        let bytes = Zeroizing::new(hex::decode(hex)?);

        let seed: [u8; 32] =
            bytes
                .as_slice()
                .try_into()
                .map_err(|_| Error::InvalidPrivateKeyLength {
                    expected: 32,
                    found: bytes.len(),
                })?;

        Ok(Self {
            private_key: SecretKey::from_bytes(seed),
        })
    }

    /// Returns the public key corresponding to the held private key.
    pub fn public_key(&self) -> PublicKey {
        self.private_key.public_key()
    }

    /// Signs `message` with the held private key.
    pub fn sign(&self, message: &[u8]) -> Signature {
        self.private_key.sign(message)
    }

    /// Confirms that the public key derived from the held private key matches `expected_hex`.
    ///
    /// Returns [`Error::PublicKeyMismatch`] on mismatch; a match is the success case.
    pub fn verify_public_key_hex(&self, expected_hex: &str) -> Result<(), Error> {
        let expected_bytes = hex::decode(expected_hex)?;
        let derived = self.public_key().to_bytes();

        if expected_bytes == derived {
            Ok(())
        } else {
            Err(Error::PublicKeyMismatch)
        }
    }
}

/// Verifies that `signature` is a valid Ed25519 signature of `message` under `public_key`.
pub fn verify(public_key: &PublicKey, signature: &Signature, message: &[u8]) -> bool {
    public_key.verify(signature, message)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_seed_hex() -> String {
        hex::encode([7u8; 32])
    }

    #[test]
    fn sign_and_verify_round_trip() {
        let signer = CoordinatorSigner::from_hex(&test_seed_hex()).unwrap();
        let message = b"milestone essence bytes";

        let signature = signer.sign(message);

        assert!(verify(&signer.public_key(), &signature, message));
    }

    #[test]
    fn verify_rejects_tampered_message() {
        let signer = CoordinatorSigner::from_hex(&test_seed_hex()).unwrap();
        let signature = signer.sign(b"original");

        assert!(!verify(&signer.public_key(), &signature, b"tampered"));
    }

    #[test]
    fn public_key_check_succeeds_on_match() {
        let signer = CoordinatorSigner::from_hex(&test_seed_hex()).unwrap();
        let expected = hex::encode(signer.public_key().to_bytes());

        assert!(signer.verify_public_key_hex(&expected).is_ok());
    }

    #[test]
    fn public_key_check_fails_on_mismatch() {
        let signer = CoordinatorSigner::from_hex(&test_seed_hex()).unwrap();
        let wrong = hex::encode([0u8; 32]);

        assert!(matches!(
            signer.verify_public_key_hex(&wrong),
            Err(Error::PublicKeyMismatch)
        ));
    }

    #[test]
    fn rejects_wrong_length_seed() {
        assert!(matches!(
            CoordinatorSigner::from_hex(&hex::encode([1u8; 16])),
            Err(Error::InvalidPrivateKeyLength { expected: 32, found: 16 })
        ));
    }
}
