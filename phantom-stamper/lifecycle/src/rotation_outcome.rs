use phantom_org_client::AuthenticatorRecord;
use phantom_stamper_core::{ExpirationInfo, KeyRecord};

#[derive(Clone, Debug)]
pub enum RotationOutcome {
    /// The active key isn't within its renewal window (or has no expiry, or has already expired).
    NotNeeded { expiration_info: ExpirationInfo },
    /// A new key was generated, registered, and promoted to active.
    Rotated {
        previous_key_id: String,
        /// The now-active key, carrying its authenticator id.
        key_record: KeyRecord,
        authenticator: AuthenticatorRecord,
    },
}

impl RotationOutcome {
    pub fn is_rotated(&self) -> bool {
        matches!(self, RotationOutcome::Rotated { .. })
    }
}
