use crate::{Algorithm, Error, Result, StampParams};
use base64::Engine;

/// Name of the HTTP header that carries an encoded stamp.
pub const STAMP_HEADER_NAME: &str = "X-Phantom-Stamp";

/// The signed envelope attached to an outbound request.  Its encoded form is
/// base64url(JSON(stamp)), with the public key and signature themselves base64url-encoded.
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(tag = "kind")]
pub enum Stamp {
    #[serde(rename = "PKI", rename_all = "camelCase")]
    PKI {
        public_key: String,
        signature: String,
        // Older stampers omit this field.
        #[serde(default)]
        algorithm: Algorithm,
    },
    #[serde(rename = "OIDC", rename_all = "camelCase")]
    OIDC {
        id_token: String,
        public_key: String,
        salt: String,
        #[serde(default)]
        algorithm: Algorithm,
        signature: String,
    },
}

impl Stamp {
    pub fn new(
        stamp_params: &StampParams<'_>,
        public_key_bytes: &[u8; 32],
        signature_bytes: &[u8; 64],
        algorithm: Algorithm,
    ) -> Self {
        let public_key = base64url_encode(public_key_bytes);
        let signature = base64url_encode(signature_bytes);
        match stamp_params {
            StampParams::PKI { .. } => Stamp::PKI {
                public_key,
                signature,
                algorithm,
            },
            StampParams::OIDC { id_token, salt, .. } => Stamp::OIDC {
                id_token: id_token.to_string(),
                public_key,
                salt: salt.to_string(),
                algorithm,
                signature,
            },
        }
    }
    pub fn kind(&self) -> &'static str {
        match self {
            Stamp::PKI { .. } => "PKI",
            Stamp::OIDC { .. } => "OIDC",
        }
    }
    pub fn algorithm(&self) -> Algorithm {
        match self {
            Stamp::PKI { algorithm, .. } | Stamp::OIDC { algorithm, .. } => *algorithm,
        }
    }
    /// The base64url-encoded public key, exactly as carried in the stamp.
    pub fn public_key_base64url(&self) -> &str {
        match self {
            Stamp::PKI { public_key, .. } | Stamp::OIDC { public_key, .. } => public_key.as_str(),
        }
    }
    pub fn public_key_bytes(&self) -> Result<[u8; 32]> {
        let byte_v = base64url_decode(self.public_key_base64url(), "stamp public key")?;
        <[u8; 32]>::try_from(byte_v.as_slice()).map_err(|_| {
            Error::Malformed(
                format!(
                    "stamp public key decoded to {} bytes; expected 32",
                    byte_v.len()
                )
                .into(),
            )
        })
    }
    /// The public key in the base58 encoding used by KeyRecord, for comparison against registered keys.
    pub fn public_key_base58(&self) -> Result<String> {
        Ok(bs58::encode(self.public_key_bytes()?).into_string())
    }
    pub fn signature_bytes(&self) -> Result<[u8; 64]> {
        let signature = match self {
            Stamp::PKI { signature, .. } | Stamp::OIDC { signature, .. } => signature,
        };
        let byte_v = base64url_decode(signature, "stamp signature")?;
        <[u8; 64]>::try_from(byte_v.as_slice()).map_err(|_| {
            Error::Malformed(
                format!(
                    "stamp signature decoded to {} bytes; expected 64",
                    byte_v.len()
                )
                .into(),
            )
        })
    }
    /// Produces the X-Phantom-Stamp header value.
    pub fn encoded(&self) -> Result<String> {
        let stamp_json = serde_json::to_string(self)?;
        Ok(base64url_encode(stamp_json.as_bytes()))
    }
    pub fn decoded_from_str(stamp_str: &str) -> Result<Self> {
        let stamp_json = base64url_decode(stamp_str, "stamp")?;
        serde_json::from_slice(&stamp_json).map_err(|e| {
            Error::Malformed(format!("stamp failed to decode into JSON: {}", e).into())
        })
    }
    /// Verifies that this stamp's signature is a valid signature over data by this stamp's public key.
    pub fn verify(&self, data: &[u8]) -> Result<()> {
        match self.algorithm() {
            Algorithm::Ed25519 => {
                let verifying_key =
                    ed25519_dalek::VerifyingKey::from_bytes(&self.public_key_bytes()?).map_err(
                        |e| {
                            Error::Malformed(
                                format!("stamp public key is not a valid Ed25519 key: {}", e)
                                    .into(),
                            )
                        },
                    )?;
                let signature = ed25519_dalek::Signature::from_bytes(&self.signature_bytes()?);
                use ed25519_dalek::Verifier;
                verifying_key
                    .verify(data, &signature)
                    .map_err(|e| Error::SignatureVerificationFailed(e.to_string().into()))
            }
        }
    }
}

fn base64url_encode(byte_v: &[u8]) -> String {
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(byte_v)
}

fn base64url_decode(s: &str, what: &'static str) -> Result<Vec<u8>> {
    base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(s)
        .map_err(|e| Error::Malformed(format!("{} is not valid base64url: {}", what, e).into()))
}
