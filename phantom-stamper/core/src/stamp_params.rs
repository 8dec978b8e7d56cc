/// What to stamp.  PKI stamps prove possession of the key; OIDC stamps additionally bind an
/// id token and salt issued by an identity provider.
#[derive(Clone, Copy, Debug)]
pub enum StampParams<'a> {
    PKI {
        data: &'a [u8],
    },
    OIDC {
        data: &'a [u8],
        id_token: &'a str,
        salt: &'a str,
    },
}

impl<'a> StampParams<'a> {
    pub fn pki(data: &'a [u8]) -> Self {
        Self::PKI { data }
    }
    /// The bytes that get signed.
    pub fn data(&self) -> &'a [u8] {
        match self {
            Self::PKI { data } => data,
            Self::OIDC { data, .. } => data,
        }
    }
}
