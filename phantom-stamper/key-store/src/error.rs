use std::borrow::Cow;

#[derive(Clone, Debug, thiserror::Error)]
pub enum Error {
    #[error("No pending key: {0}")]
    NoPendingKey(Cow<'static, str>),
    #[error("Record corruption detected: {0}")]
    RecordCorruption(Cow<'static, str>),
    #[error("Storage error: {0}")]
    StorageError(Cow<'static, str>),
}

impl From<Error> for phantom_stamper_core::Error {
    fn from(e: Error) -> Self {
        match e {
            Error::NoPendingKey(description) => Self::NoPendingKey(description),
            Error::RecordCorruption(description) => {
                Self::StorageError(format!("record corruption detected: {}", description).into())
            }
            Error::StorageError(description) => Self::StorageError(description),
        }
    }
}
