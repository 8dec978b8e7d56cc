use crate::{Error, Result};
use phantom_stamper_core::KeyPairRecord;
use std::sync::{Arc, RwLock};

#[derive(Default)]
struct KeySlots {
    active_o: Option<Arc<KeyPairRecord>>,
    pending_o: Option<Arc<KeyPairRecord>>,
}

/// In-memory holder of the active and pending keypairs.  Readers get an `Arc` snapshot of the
/// active keypair, so a signing operation that started before a promotion finishes with the key
/// it started with.  Promotion swaps both slots under a single write lock, so a reader sees
/// either the fully-old or the fully-new state.
#[derive(Default)]
pub struct KeyStore {
    key_slots_l: RwLock<KeySlots>,
}

impl KeyStore {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn get_active(&self) -> Option<Arc<KeyPairRecord>> {
        self.read().active_o.clone()
    }
    pub fn get_pending(&self) -> Option<Arc<KeyPairRecord>> {
        self.read().pending_o.clone()
    }
    /// Unconditionally replaces the active keypair.  Used for initialization.
    pub fn set_active(&self, key_pair_record: KeyPairRecord) -> Arc<KeyPairRecord> {
        let key_pair_record_a = Arc::new(key_pair_record);
        self.write().active_o = Some(key_pair_record_a.clone());
        key_pair_record_a
    }
    /// Unconditionally replaces the pending keypair, returning the one it displaced (if any).
    pub fn set_pending(&self, key_pair_record: KeyPairRecord) -> Option<Arc<KeyPairRecord>> {
        let discarded_o = self.write().pending_o.replace(Arc::new(key_pair_record));
        if let Some(discarded) = discarded_o.as_ref() {
            tracing::debug!(
                "discarded uncommitted pending key {} in favor of a newer one",
                discarded.key_id()
            );
        }
        discarded_o
    }
    /// Assigns the authenticator id to the pending keypair, makes it active, and clears the pending
    /// slot, all in one critical section.  Returns the newly active keypair.  The previously active
    /// keypair is dropped from the store (though any outstanding snapshot of it stays valid).
    pub fn promote(&self, authenticator_id: &str) -> Result<Arc<KeyPairRecord>> {
        let mut key_slots_g = self.write();
        let pending = key_slots_g.pending_o.take().ok_or_else(|| {
            Error::NoPendingKey(
                format!(
                    "can't promote to authenticator {}; no key is pending",
                    authenticator_id
                )
                .into(),
            )
        })?;
        let promoted_a = Arc::new(KeyPairRecord {
            key_record: pending
                .key_record
                .with_authenticator_id(authenticator_id.to_string()),
            priv_key_bytes: pending.priv_key_bytes.clone(),
        });
        key_slots_g.active_o = Some(promoted_a.clone());
        Ok(promoted_a)
    }
    /// Drops the pending keypair, returning it if there was one.
    pub fn discard_pending(&self) -> Option<Arc<KeyPairRecord>> {
        self.write().pending_o.take()
    }
    /// Drops both keypairs.
    pub fn clear(&self) {
        let mut key_slots_g = self.write();
        key_slots_g.active_o = None;
        key_slots_g.pending_o = None;
    }
    fn read(&self) -> std::sync::RwLockReadGuard<'_, KeySlots> {
        self.key_slots_l
            .read()
            .expect("programmer error: KeyStore lock poisoned")
    }
    fn write(&self) -> std::sync::RwLockWriteGuard<'_, KeySlots> {
        self.key_slots_l
            .write()
            .expect("programmer error: KeyStore lock poisoned")
    }
}
