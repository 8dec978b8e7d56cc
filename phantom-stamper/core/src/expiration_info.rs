/// Derived view of a key's expiration status at a particular time.  Never stored.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ExpirationInfo {
    /// Copied from the evaluated key record; None if there was no record or it doesn't expire.
    pub expires_at_o: Option<time::OffsetDateTime>,
    /// `expires_at - now`, which is negative once the key has expired.  None if there's no expiry.
    pub time_until_expiry_o: Option<time::Duration>,
    /// True iff `0 < time_until_expiry <= renewal_window`.
    pub should_renew: bool,
}

impl ExpirationInfo {
    /// The result for a missing record or a record without an expiry.
    pub const fn non_expiring() -> Self {
        Self {
            expires_at_o: None,
            time_until_expiry_o: None,
            should_renew: false,
        }
    }
    /// True if the key has an expiry and it has been reached.  Note that a key at exactly its
    /// expiry time is expired, and is also not eligible for renewal.
    pub fn is_expired(&self) -> bool {
        matches!(self.time_until_expiry_o, Some(time_until_expiry) if time_until_expiry <= time::Duration::ZERO)
    }
}
