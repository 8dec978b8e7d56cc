use crate::{KeySlot, Result};
use phantom_stamper_core::KeyPairRecord;

/// Durable storage for keypairs (secure enclave, keychain, encrypted local storage, ...).  Each
/// slot holds at most one keypair.  Implementations don't need to coordinate between slots;
/// KeyStore holds the authoritative in-memory state.
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
pub trait KeyStorage: Send + Sync {
    async fn get_key_pair(&self, key_slot: KeySlot) -> Result<Option<KeyPairRecord>>;
    /// Replaces whatever is in the slot.
    async fn set_key_pair(&self, key_slot: KeySlot, key_pair_record: &KeyPairRecord)
        -> Result<()>;
    /// Removing an empty slot is not an error.
    async fn remove_key_pair(&self, key_slot: KeySlot) -> Result<()>;
    async fn clear(&self) -> Result<()> {
        for key_slot in KeySlot::VARIANTS {
            self.remove_key_pair(key_slot).await?;
        }
        Ok(())
    }
}
