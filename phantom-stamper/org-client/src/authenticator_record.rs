use crate::AuthenticatorKind;
use phantom_stamper_core::Algorithm;

/// An authenticator as persisted by the organization service.
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatorRecord {
    /// Assigned by the organization service.
    pub id: String,
    pub organization_id: String,
    pub username: String,
    pub authenticator_name: String,
    pub authenticator_kind: AuthenticatorKind,
    pub public_key: String,
    pub algorithm: Algorithm,
    #[serde(
        rename = "expiresAtMs",
        default,
        skip_serializing_if = "Option::is_none",
        with = "phantom_stamper_core::unix_milliseconds::option"
    )]
    pub expires_at_o: Option<time::OffsetDateTime>,
    #[serde(with = "phantom_stamper_core::unix_milliseconds")]
    pub created_at: time::OffsetDateTime,
}

impl AuthenticatorRecord {
    /// An authenticator is expired at and after its expiry time.
    pub fn is_expired_at(&self, now: time::OffsetDateTime) -> bool {
        matches!(self.expires_at_o, Some(expires_at) if now >= expires_at)
    }
}
