use crate::{Error, Result};

/// Public information about one authenticator keypair.  This is what a stamper hands out through
/// `get_key_info`, and what gets registered with the organization service.
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyRecord {
    /// Opaque identifier, unique per generated keypair.  Derived from the public key.
    pub key_id: String,
    /// base58 encoding of the raw Ed25519 public key.
    pub public_key: String,
    /// Time at which the keypair was generated.
    #[serde(with = "crate::unix_milliseconds")]
    pub created_at: time::OffsetDateTime,
    /// Time at which the corresponding authenticator expires.  None means it doesn't expire.
    #[serde(
        rename = "expiresAt",
        default,
        skip_serializing_if = "Option::is_none",
        with = "crate::unix_milliseconds::option"
    )]
    pub expires_at_o: Option<time::OffsetDateTime>,
    /// Assigned by the organization service once the key has been registered remotely.
    #[serde(
        rename = "authenticatorId",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub authenticator_id_o: Option<String>,
}

impl KeyRecord {
    /// Decodes the base58 public key into its raw 32 bytes.
    pub fn public_key_bytes(&self) -> Result<[u8; 32]> {
        let public_key_byte_v = bs58::decode(self.public_key.as_str())
            .into_vec()
            .map_err(|e| {
                Error::Malformed(
                    format!("public key {:?} is not valid base58: {}", self.public_key, e).into(),
                )
            })?;
        <[u8; 32]>::try_from(public_key_byte_v.as_slice()).map_err(|_| {
            Error::Malformed(
                format!(
                    "public key {:?} decoded to {} bytes; expected 32",
                    self.public_key,
                    public_key_byte_v.len()
                )
                .into(),
            )
        })
    }
    /// Returns a copy of this record carrying the given authenticator id.
    pub fn with_authenticator_id(&self, authenticator_id: String) -> Self {
        Self {
            authenticator_id_o: Some(authenticator_id),
            ..self.clone()
        }
    }
}
