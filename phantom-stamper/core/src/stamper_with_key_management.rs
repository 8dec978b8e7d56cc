use crate::{ExpirationInfo, KeyRecord, Result, Stamper};

/// Extended capability of a stamper that owns its keypair and can rotate it.  Exactly one key is
/// active (used by `stamp`) at a time, and at most one generated key is pending promotion.
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
pub trait StamperWithKeyManagement: Stamper {
    /// Returns the active key, generating (and persisting) one first if none exists.  Idempotent.
    async fn init(&self) -> Result<KeyRecord>;
    /// Returns the active key, or None if the stamper hasn't been initialized.
    fn get_key_info(&self) -> Option<KeyRecord>;
    /// Returns the pending key, if a rotation is underway.
    fn get_pending_key_info(&self) -> Option<KeyRecord>;
    /// Evaluates the active key against this stamper's expiration policy.
    fn get_expiration_info(&self, now: time::OffsetDateTime) -> ExpirationInfo;
    /// Generates a fresh keypair and holds it as pending, replacing any earlier pending keypair.
    /// The active key is untouched and keeps signing.  Fails with NotInitialized if there's no
    /// active key.
    async fn generate_new_key_pair(&self) -> Result<KeyRecord>;
    /// Promotes the pending keypair to active, recording the authenticator id the organization
    /// service assigned to it.  Fails with NoPendingKey if there's no pending keypair.
    async fn switch_to_new_key_pair(&self, authenticator_id: &str) -> Result<KeyRecord>;
    /// Discards the pending keypair, if any.
    async fn discard_pending_key_pair(&self) -> Result<()>;
    /// Clears all keys and generates a new active keypair.
    async fn reset_key_pair(&self) -> Result<KeyRecord>;
    /// Clears all keys, e.g. on disconnect.
    async fn clear(&self) -> Result<()>;
}
