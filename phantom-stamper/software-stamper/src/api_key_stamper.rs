use crate::signer;
use phantom_stamper_core::{Algorithm, PrivKeyBytes, Result, StampParams, Stamper};

/// Stamps with a fixed keypair given as a base58 secret key, e.g. a server-side api key.  It has
/// only the base Stamper capability, so it can't be handed to anything that rotates keys.
pub struct ApiKeyStamper {
    priv_key_bytes: PrivKeyBytes,
    public_key: String,
}

impl ApiKeyStamper {
    pub fn new(api_secret_key_base58: &str) -> Result<Self> {
        let priv_key_bytes = PrivKeyBytes::from_base58(api_secret_key_base58)?;
        let verifying_key =
            ed25519_dalek::SigningKey::from_bytes(priv_key_bytes.as_bytes()).verifying_key();
        let public_key = bs58::encode(verifying_key.to_bytes()).into_string();
        Ok(Self {
            priv_key_bytes,
            public_key,
        })
    }
    /// base58 encoding of the public key, which is what gets registered as the api key's authenticator.
    pub fn public_key(&self) -> &str {
        self.public_key.as_str()
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
impl Stamper for ApiKeyStamper {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Ed25519
    }
    async fn stamp(&self, stamp_params: &StampParams<'_>) -> Result<String> {
        signer::stamp(&self.priv_key_bytes, stamp_params)
    }
}
