mod error;
mod key_slot;
mod key_storage;
mod key_store;

pub use crate::{error::Error, key_slot::KeySlot, key_storage::KeyStorage, key_store::KeyStore};
pub type Result<T> = std::result::Result<T, Error>;
