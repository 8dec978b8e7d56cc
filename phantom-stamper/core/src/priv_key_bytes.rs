/// Raw Ed25519 secret key bytes.  Zeroized on drop, redacted in Debug output, and serialized as
/// base58 (the same encoding used for api secret keys).
#[derive(Clone, zeroize::Zeroize, zeroize::ZeroizeOnDrop)]
pub struct PrivKeyBytes([u8; 32]);

impl PrivKeyBytes {
    pub fn new(byte_v: [u8; 32]) -> Self {
        Self(byte_v)
    }
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
    /// Parses a base58-encoded secret key.  Accepts either the 32 byte seed or the 64 byte
    /// seed-followed-by-public-key form produced by tweetnacl-style keypairs.
    pub fn from_base58(s: &str) -> crate::Result<Self> {
        let byte_v = zeroize::Zeroizing::new(bs58::decode(s).into_vec().map_err(|e| {
            crate::Error::Malformed(format!("secret key is not valid base58: {}", e).into())
        })?);
        if byte_v.len() != 32 && byte_v.len() != 64 {
            return Err(crate::Error::Malformed(
                format!(
                    "secret key decoded to {} bytes; expected 32 or 64",
                    byte_v.len()
                )
                .into(),
            ));
        }
        let mut seed = [0u8; 32];
        seed.copy_from_slice(&byte_v[..32]);
        Ok(Self(seed))
    }
    pub fn to_base58(&self) -> zeroize::Zeroizing<String> {
        zeroize::Zeroizing::new(bs58::encode(&self.0).into_string())
    }
}

impl std::fmt::Debug for PrivKeyBytes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PrivKeyBytes(<redacted>)")
    }
}

impl serde::Serialize for PrivKeyBytes {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.to_base58().as_str())
    }
}

impl<'de> serde::Deserialize<'de> for PrivKeyBytes {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = zeroize::Zeroizing::new(String::deserialize(deserializer)?);
        Self::from_base58(s.as_str()).map_err(serde::de::Error::custom)
    }
}
