use crate::{KeyRecord, PrivKeyBytes};

/// A KeyRecord together with its secret key material.  This is the unit held in the active and
/// pending key slots, and the unit persisted by key storage.
#[derive(Clone, Debug, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyPairRecord {
    pub key_record: KeyRecord,
    #[serde(rename = "secretKey")]
    pub priv_key_bytes: PrivKeyBytes,
}

impl KeyPairRecord {
    pub fn key_id(&self) -> &str {
        self.key_record.key_id.as_str()
    }
    pub fn signing_key(&self) -> ed25519_dalek::SigningKey {
        ed25519_dalek::SigningKey::from_bytes(self.priv_key_bytes.as_bytes())
    }
}
