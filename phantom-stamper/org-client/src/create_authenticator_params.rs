use crate::{AuthenticatorKind, Error, Result};
use phantom_stamper_core::{Algorithm, KeyRecord};

/// The credential part of a createAuthenticator request.
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatorParams {
    pub authenticator_kind: AuthenticatorKind,
    /// base58 encoding of the raw public key.
    pub public_key: String,
    pub algorithm: Algorithm,
    #[serde(
        rename = "expiresAtMs",
        default,
        skip_serializing_if = "Option::is_none",
        with = "phantom_stamper_core::unix_milliseconds::option"
    )]
    pub expires_at_o: Option<time::OffsetDateTime>,
}

impl From<&KeyRecord> for AuthenticatorParams {
    fn from(key_record: &KeyRecord) -> Self {
        Self {
            authenticator_kind: AuthenticatorKind::Keypair,
            public_key: key_record.public_key.clone(),
            algorithm: Algorithm::Ed25519,
            expires_at_o: key_record.expires_at_o,
        }
    }
}

/// Longest authenticator name the organization service accepts.
pub const AUTHENTICATOR_NAME_MAX_LEN: usize = 64;

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAuthenticatorParams {
    pub organization_id: String,
    pub username: String,
    pub authenticator_name: String,
    pub authenticator: AuthenticatorParams,
    /// If true, the service drops the user's already-expired authenticators as part of this call.
    #[serde(
        rename = "replaceExpirable",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub replace_expirable_o: Option<bool>,
}

impl CreateAuthenticatorParams {
    /// Checks the constraints the organization service would otherwise reject the request for.
    pub fn validate(&self) -> Result<()> {
        if self.organization_id.is_empty() {
            return Err(Error::Validation("organizationId must not be empty".into()));
        }
        if self.username.is_empty() {
            return Err(Error::Validation("username must not be empty".into()));
        }
        if self.authenticator_name.is_empty() {
            return Err(Error::Validation(
                "authenticatorName must not be empty".into(),
            ));
        }
        let authenticator_name_len = self.authenticator_name.chars().count();
        if authenticator_name_len > AUTHENTICATOR_NAME_MAX_LEN {
            return Err(Error::Validation(
                format!(
                    "authenticator name cannot exceed {} characters; it has {}",
                    AUTHENTICATOR_NAME_MAX_LEN, authenticator_name_len
                )
                .into(),
            ));
        }
        if self.authenticator.public_key.is_empty() {
            return Err(Error::Validation("publicKey must not be empty".into()));
        }
        Ok(())
    }
}
