use phantom_key_store::{Error, KeySlot, KeyStorage, Result};
use phantom_stamper_core::KeyPairRecord;
use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, Ordering},
        RwLock,
    },
};

/// Ephemeral, intra-process key storage that behaves like a string-valued secure store: each slot
/// is a JSON string under the entry name `{key_prefix}-{organization_id}-{slot}`.
pub struct KeyStorageMock {
    key_prefix: String,
    organization_id: String,
    entry_m: RwLock<HashMap<String, String>>,
    /// When set, all writes fail with a StorageError.  Reads are unaffected.
    fail_writes: AtomicBool,
}

impl KeyStorageMock {
    pub fn new(key_prefix: impl Into<String>, organization_id: impl Into<String>) -> Self {
        Self {
            key_prefix: key_prefix.into(),
            organization_id: organization_id.into(),
            entry_m: RwLock::new(HashMap::new()),
            fail_writes: AtomicBool::new(false),
        }
    }
    pub fn entry_name(&self, key_slot: KeySlot) -> String {
        format!(
            "{}-{}-{}",
            self.key_prefix,
            self.organization_id,
            key_slot.as_str()
        )
    }
    /// Returns the raw stored string for an entry, for inspection.
    pub fn raw_entry(&self, entry_name: &str) -> Option<String> {
        self.entry_m
            .read()
            .expect("programmer error: KeyStorageMock lock poisoned")
            .get(entry_name)
            .cloned()
    }
    /// Overwrites the raw stored string for an entry, e.g. to simulate corruption.
    pub fn set_raw_entry(&self, entry_name: String, value: String) {
        self.entry_m
            .write()
            .expect("programmer error: KeyStorageMock lock poisoned")
            .insert(entry_name, value);
    }
    pub fn entry_count(&self) -> usize {
        self.entry_m
            .read()
            .expect("programmer error: KeyStorageMock lock poisoned")
            .len()
    }
    pub fn set_fail_writes(&self, fail_writes: bool) {
        self.fail_writes.store(fail_writes, Ordering::SeqCst);
    }
    fn check_writable(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Error::StorageError(
                "simulated write failure in KeyStorageMock".into(),
            ));
        }
        Ok(())
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
impl KeyStorage for KeyStorageMock {
    async fn get_key_pair(&self, key_slot: KeySlot) -> Result<Option<KeyPairRecord>> {
        let entry_name = self.entry_name(key_slot);
        let stored_o = self.raw_entry(entry_name.as_str());
        let Some(stored) = stored_o else {
            return Ok(None);
        };
        let key_pair_record = serde_json::from_str(stored.as_str()).map_err(|e| {
            Error::RecordCorruption(
                format!("entry {:?} failed to parse: {}", entry_name, e).into(),
            )
        })?;
        Ok(Some(key_pair_record))
    }
    async fn set_key_pair(
        &self,
        key_slot: KeySlot,
        key_pair_record: &KeyPairRecord,
    ) -> Result<()> {
        self.check_writable()?;
        let stored = serde_json::to_string(key_pair_record)
            .map_err(|e| Error::StorageError(e.to_string().into()))?;
        tracing::trace!(
            "KeyStorageMock storing key {} in {} slot",
            key_pair_record.key_id(),
            key_slot
        );
        self.set_raw_entry(self.entry_name(key_slot), stored);
        Ok(())
    }
    async fn remove_key_pair(&self, key_slot: KeySlot) -> Result<()> {
        self.check_writable()?;
        self.entry_m
            .write()
            .expect("programmer error: KeyStorageMock lock poisoned")
            .remove(&self.entry_name(key_slot));
        Ok(())
    }
}
