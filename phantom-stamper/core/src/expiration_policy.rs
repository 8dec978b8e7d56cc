use crate::{ExpirationInfo, KeyRecord, AUTHENTICATOR_RENEWAL_WINDOW};

/// Decides when rotation of a key should begin: within a fixed lead-time window before its expiry.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ExpirationPolicy {
    pub renewal_window: time::Duration,
}

impl ExpirationPolicy {
    pub const fn new(renewal_window: time::Duration) -> Self {
        Self { renewal_window }
    }
    /// Pure function of its inputs.  Renewal is only due strictly before expiry; at the exact
    /// moment of expiry (and after) it's too late, and should_renew is false.
    pub fn evaluate(
        &self,
        key_record_o: Option<&KeyRecord>,
        now: time::OffsetDateTime,
    ) -> ExpirationInfo {
        let expires_at = match key_record_o.and_then(|key_record| key_record.expires_at_o) {
            Some(expires_at) => expires_at,
            None => return ExpirationInfo::non_expiring(),
        };
        let time_until_expiry = expires_at - now;
        ExpirationInfo {
            expires_at_o: Some(expires_at),
            time_until_expiry_o: Some(time_until_expiry),
            should_renew: time_until_expiry > time::Duration::ZERO
                && time_until_expiry <= self.renewal_window,
        }
    }
}

impl Default for ExpirationPolicy {
    fn default() -> Self {
        Self::new(AUTHENTICATOR_RENEWAL_WINDOW)
    }
}
