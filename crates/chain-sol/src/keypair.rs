//! Ed25519 keypairs for transaction signers.

use std::fmt;

use ed25519_dalek::{Signer, SigningKey};
use rand::rngs::OsRng;
use zeroize::Zeroize;

use crate::address::pubkey_to_address;
use crate::error::SolError;

/// An Ed25519 keypair able to sign Solana messages.
///
/// The secret half is wiped when the keypair is dropped (`SigningKey` is
/// `ZeroizeOnDrop`).
pub struct SolKeypair {
    signing_key: SigningKey,
}

impl SolKeypair {
    /// Generate a brand-new keypair from the OS RNG.
    ///
    /// Every call yields an unrelated identity, which is what a fresh mint
    /// account needs.
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut OsRng),
        }
    }

    /// Build a keypair from a 32-byte Ed25519 seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        let mut copy = *seed;
        let signing_key = SigningKey::from_bytes(&copy);
        copy.zeroize();
        Self { signing_key }
    }

    /// Build a keypair from either a 32-byte seed or the 64-byte
    /// `seed || pubkey` layout written by `solana-keygen`.
    ///
    /// For the 64-byte form the trailing public key must match the seed.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SolError> {
        match bytes.len() {
            32 | 64 => {}
            n => {
                return Err(SolError::InvalidPrivateKey(format!(
                    "expected 32 or 64 bytes, got {n}"
                )))
            }
        }

        let mut seed = [0u8; 32];
        seed.copy_from_slice(&bytes[..32]);
        let keypair = Self::from_seed(&seed);
        seed.zeroize();

        if bytes.len() == 64 && bytes[32..] != keypair.pubkey() {
            return Err(SolError::InvalidPrivateKey(
                "public key half does not match secret half".into(),
            ));
        }

        Ok(keypair)
    }

    /// The 32-byte public key.
    pub fn pubkey(&self) -> [u8; 32] {
        self.signing_key.verifying_key().to_bytes()
    }

    /// The Base58 address of the public key.
    pub fn address(&self) -> String {
        pubkey_to_address(&self.pubkey())
    }

    /// Sign arbitrary message bytes, returning the 64-byte signature.
    pub fn sign(&self, message: &[u8]) -> [u8; 64] {
        self.signing_key.sign(message).to_bytes()
    }
}

impl fmt::Debug for SolKeypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SolKeypair")
            .field("pubkey", &self.address())
            .finish_non_exhaustive()
    }
}
