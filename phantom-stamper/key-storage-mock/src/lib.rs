mod key_storage_mock;

pub use crate::key_storage_mock::KeyStorageMock;
