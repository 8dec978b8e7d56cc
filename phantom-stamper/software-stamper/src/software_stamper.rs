use crate::signer;
use phantom_key_store::{KeySlot, KeyStorage, KeyStore};
use phantom_stamper_core::{
    Algorithm, Clock, Error, ExpirationInfo, ExpirationPolicy, KeyPairRecord, KeyRecord, Result,
    StampParams, Stamper, StamperWithKeyManagement,
};
use std::sync::Arc;

/// Stamper whose Ed25519 keys are generated in-process and persisted through a KeyStorage.
///
/// Signing only ever reads the in-memory KeyStore, so it never waits on a rotation.  Mutations
/// (init, generate, switch, discard, reset, clear) are serialized with each other, and each one
/// writes to durable storage before updating memory, so a storage failure leaves the in-memory
/// state as it was.
pub struct SoftwareStamper {
    key_store: KeyStore,
    key_storage_a: Arc<dyn KeyStorage>,
    clock_a: Arc<dyn Clock>,
    key_lifetime_o: Option<time::Duration>,
    expiration_policy: ExpirationPolicy,
    mutation_l: tokio::sync::Mutex<()>,
}

impl SoftwareStamper {
    /// Keys generated by this stamper expire key_lifetime_o after their creation (never, if None).
    pub fn new(
        key_storage_a: Arc<dyn KeyStorage>,
        clock_a: Arc<dyn Clock>,
        key_lifetime_o: Option<time::Duration>,
        expiration_policy: ExpirationPolicy,
    ) -> Self {
        Self {
            key_store: KeyStore::new(),
            key_storage_a,
            clock_a,
            key_lifetime_o,
            expiration_policy,
            mutation_l: tokio::sync::Mutex::new(()),
        }
    }
    pub fn key_lifetime_o(&self) -> Option<time::Duration> {
        self.key_lifetime_o
    }
    pub fn expiration_policy(&self) -> &ExpirationPolicy {
        &self.expiration_policy
    }
    fn generate_key_pair(&self) -> Result<KeyPairRecord> {
        signer::generate_key_pair(self.clock_a.now_utc(), self.key_lifetime_o)
    }
    async fn generate_active_key_pair(&self) -> Result<KeyRecord> {
        let key_pair_record = self.generate_key_pair()?;
        self.key_storage_a
            .set_key_pair(KeySlot::Active, &key_pair_record)
            .await?;
        let key_pair_record_a = self.key_store.set_active(key_pair_record);
        tracing::info!(
            "generated active key {} (expires at {:?})",
            key_pair_record_a.key_id(),
            key_pair_record_a.key_record.expires_at_o
        );
        Ok(key_pair_record_a.key_record.clone())
    }
    /// Drops a pending keypair left in storage by an earlier process that never promoted it.
    async fn discard_leftover_pending_key_pair(&self) -> Result<()> {
        match self.key_storage_a.get_key_pair(KeySlot::Pending).await {
            Ok(None) => return Ok(()),
            Ok(Some(leftover)) => {
                tracing::warn!(
                    "discarding leftover pending key {} from an interrupted rotation",
                    leftover.key_id()
                );
            }
            Err(e) => {
                tracing::warn!("discarding unreadable leftover pending key: {}", e);
            }
        }
        self.key_storage_a
            .remove_key_pair(KeySlot::Pending)
            .await?;
        Ok(())
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
impl Stamper for SoftwareStamper {
    fn algorithm(&self) -> Algorithm {
        Algorithm::Ed25519
    }
    async fn stamp(&self, stamp_params: &StampParams<'_>) -> Result<String> {
        // The snapshot keeps the key alive even if a promotion happens while signing.
        let active_a = self.key_store.get_active().ok_or_else(|| {
            Error::NotInitialized("can't stamp; stamper has no active key".into())
        })?;
        signer::stamp(&active_a.priv_key_bytes, stamp_params)
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
impl StamperWithKeyManagement for SoftwareStamper {
    async fn init(&self) -> Result<KeyRecord> {
        let _mutation_g = self.mutation_l.lock().await;

        if let Some(active_a) = self.key_store.get_active() {
            tracing::debug!("stamper already initialized with key {}", active_a.key_id());
            return Ok(active_a.key_record.clone());
        }

        let key_record = match self.key_storage_a.get_key_pair(KeySlot::Active).await? {
            Some(stored) => {
                signer::check_key_pair_record(&stored)?;
                let key_pair_record_a = self.key_store.set_active(stored);
                tracing::debug!(
                    "restored active key {} from storage",
                    key_pair_record_a.key_id()
                );
                key_pair_record_a.key_record.clone()
            }
            None => self.generate_active_key_pair().await?,
        };
        self.discard_leftover_pending_key_pair().await?;
        Ok(key_record)
    }
    fn get_key_info(&self) -> Option<KeyRecord> {
        self.key_store
            .get_active()
            .map(|active_a| active_a.key_record.clone())
    }
    fn get_pending_key_info(&self) -> Option<KeyRecord> {
        self.key_store
            .get_pending()
            .map(|pending_a| pending_a.key_record.clone())
    }
    fn get_expiration_info(&self, now: time::OffsetDateTime) -> ExpirationInfo {
        let active_o = self.key_store.get_active();
        self.expiration_policy
            .evaluate(active_o.as_ref().map(|active_a| &active_a.key_record), now)
    }
    async fn generate_new_key_pair(&self) -> Result<KeyRecord> {
        let _mutation_g = self.mutation_l.lock().await;

        if self.key_store.get_active().is_none() {
            return Err(Error::NotInitialized(
                "can't generate a new keypair; stamper has no active key".into(),
            ));
        }
        let key_pair_record = self.generate_key_pair()?;
        let key_record = key_pair_record.key_record.clone();
        self.key_storage_a
            .set_key_pair(KeySlot::Pending, &key_pair_record)
            .await?;
        self.key_store.set_pending(key_pair_record);
        tracing::info!("generated pending key {}", key_record.key_id);
        Ok(key_record)
    }
    async fn switch_to_new_key_pair(&self, authenticator_id: &str) -> Result<KeyRecord> {
        let _mutation_g = self.mutation_l.lock().await;

        let pending_a = self.key_store.get_pending().ok_or_else(|| {
            Error::NoPendingKey(
                format!(
                    "can't switch to authenticator {}; no key is pending",
                    authenticator_id
                )
                .into(),
            )
        })?;
        let promoted = KeyPairRecord {
            key_record: pending_a
                .key_record
                .with_authenticator_id(authenticator_id.to_string()),
            priv_key_bytes: pending_a.priv_key_bytes.clone(),
        };
        self.key_storage_a
            .set_key_pair(KeySlot::Active, &promoted)
            .await?;
        let promoted_a = self.key_store.promote(authenticator_id)?;
        // The new key is already durably active; a stale pending slot gets discarded on next init.
        if let Err(e) = self.key_storage_a.remove_key_pair(KeySlot::Pending).await {
            tracing::warn!(
                "failed to remove promoted key {} from pending storage: {}",
                promoted_a.key_id(),
                e
            );
        }
        tracing::info!(
            "switched to key {} (authenticator {})",
            promoted_a.key_id(),
            authenticator_id
        );
        Ok(promoted_a.key_record.clone())
    }
    async fn discard_pending_key_pair(&self) -> Result<()> {
        let _mutation_g = self.mutation_l.lock().await;

        self.key_storage_a
            .remove_key_pair(KeySlot::Pending)
            .await?;
        if let Some(discarded_a) = self.key_store.discard_pending() {
            tracing::debug!("discarded pending key {}", discarded_a.key_id());
        }
        Ok(())
    }
    async fn reset_key_pair(&self) -> Result<KeyRecord> {
        let _mutation_g = self.mutation_l.lock().await;

        self.key_storage_a.clear().await?;
        self.key_store.clear();
        self.generate_active_key_pair().await
    }
    async fn clear(&self) -> Result<()> {
        let _mutation_g = self.mutation_l.lock().await;

        self.key_storage_a.clear().await?;
        self.key_store.clear();
        tracing::debug!("cleared all stamper keys");
        Ok(())
    }
}
