//! Ed25519 key generation and stamping.  Nothing in here knows about rotation; it operates on
//! whatever key material it's handed.

use base64::Engine;
use phantom_stamper_core::{
    Algorithm, Error, KeyPairRecord, KeyRecord, PrivKeyBytes, Result, Stamp, StampParams,
};

/// Number of base64url characters of the public key's SHA-256 digest used as the key id.
pub const KEY_ID_LEN: usize = 16;

/// Derives the key id for a raw public key: the first 16 characters of
/// base64url(SHA-256(public_key)).
pub fn key_id_for_public_key(public_key_bytes: &[u8; 32]) -> String {
    use sha2::Digest;
    let digest = sha2::Sha256::digest(public_key_bytes);
    let mut key_id = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(digest);
    key_id.truncate(KEY_ID_LEN);
    key_id
}

/// Generates a fresh Ed25519 keypair.  If key_lifetime_o is Some, the key expires that long
/// after created_at.
pub fn generate_key_pair(
    created_at: time::OffsetDateTime,
    key_lifetime_o: Option<time::Duration>,
) -> Result<KeyPairRecord> {
    let expires_at_o = match key_lifetime_o {
        Some(key_lifetime) => Some(created_at.checked_add(key_lifetime).ok_or_else(|| {
            Error::Unsupported(
                format!(
                    "key lifetime {} puts expiry out of range of created_at {}",
                    key_lifetime, created_at
                )
                .into(),
            )
        })?),
        None => None,
    };
    let signing_key = ed25519_dalek::SigningKey::generate(&mut rand::rngs::OsRng);
    let public_key_bytes = signing_key.verifying_key().to_bytes();
    let key_record = KeyRecord {
        key_id: key_id_for_public_key(&public_key_bytes),
        public_key: bs58::encode(public_key_bytes).into_string(),
        created_at,
        expires_at_o,
        authenticator_id_o: None,
    };
    Ok(KeyPairRecord {
        key_record,
        priv_key_bytes: PrivKeyBytes::new(signing_key.to_bytes()),
    })
}

/// Checks that a (presumably restored) record's public key and key id actually belong to its
/// secret key.
pub fn check_key_pair_record(key_pair_record: &KeyPairRecord) -> Result<()> {
    let public_key_bytes = key_pair_record.signing_key().verifying_key().to_bytes();
    if key_pair_record.key_record.public_key_bytes()? != public_key_bytes {
        return Err(Error::Malformed(
            format!(
                "key {} has a public key that doesn't match its secret key",
                key_pair_record.key_id()
            )
            .into(),
        ));
    }
    if key_pair_record.key_id() != key_id_for_public_key(&public_key_bytes) {
        return Err(Error::Malformed(
            format!(
                "key id {} doesn't match its public key",
                key_pair_record.key_id()
            )
            .into(),
        ));
    }
    Ok(())
}

/// Signs stamp_params.data() with the given secret key and produces the encoded stamp.  Ed25519 is
/// deterministic, so identical inputs produce identical stamps.
pub fn stamp(priv_key_bytes: &PrivKeyBytes, stamp_params: &StampParams<'_>) -> Result<String> {
    let signing_key = ed25519_dalek::SigningKey::from_bytes(priv_key_bytes.as_bytes());
    use ed25519_dalek::Signer;
    let signature = signing_key
        .try_sign(stamp_params.data())
        .map_err(|e| Error::SigningError(e.to_string().into()))?;
    Stamp::new(
        stamp_params,
        &signing_key.verifying_key().to_bytes(),
        &signature.to_bytes(),
        Algorithm::Ed25519,
    )
    .encoded()
}
