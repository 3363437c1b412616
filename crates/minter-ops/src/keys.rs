//! Operator wallet keys.

use ed25519_dalek::{Signer, SigningKey};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{OpsError, OpsResult};

/// An Ed25519 keypair for signing wallet external messages.
///
/// Built from the 32-byte secret seed, usually supplied hex-encoded through
/// the environment. The seed is zeroized on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct WalletKeypair {
    secret: [u8; 32],
    #[zeroize(skip)]
    public: [u8; 32],
    #[zeroize(skip)]
    signing_key: SigningKey,
}

impl WalletKeypair {
    /// Build from the raw 32-byte seed.
    pub fn from_secret(secret: [u8; 32]) -> Self {
        let signing_key = SigningKey::from_bytes(&secret);
        let public = signing_key.verifying_key().to_bytes();
        Self {
            secret,
            public,
            signing_key,
        }
    }

    /// Build from a hex-encoded seed.
    pub fn from_hex(text: &str) -> OpsResult<Self> {
        let bytes = hex::decode(text.trim())
            .map_err(|e| OpsError::InvalidKey(e.to_string()))?;
        let secret: [u8; 32] = bytes
            .try_into()
            .map_err(|_| OpsError::InvalidKey("secret key must be 32 bytes".into()))?;
        Ok(Self::from_secret(secret))
    }

    /// The 32-byte public key.
    pub fn public_key(&self) -> &[u8; 32] {
        &self.public
    }

    /// Sign `message`, producing a 64-byte signature.
    pub fn sign(&self, message: &[u8]) -> [u8; 64] {
        self.signing_key.sign(message).to_bytes()
    }
}
