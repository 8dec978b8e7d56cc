use std::borrow::Cow;

#[derive(Clone, Debug, thiserror::Error)]
pub enum Error {
    #[error("Malformed: {0}")]
    Malformed(Cow<'static, str>),
    #[error("No pending key: {0}")]
    NoPendingKey(Cow<'static, str>),
    #[error("Stamper not initialized: {0}")]
    NotInitialized(Cow<'static, str>),
    #[error("Signature verification failed: {0}")]
    SignatureVerificationFailed(Cow<'static, str>),
    #[error("Signing error: {0}")]
    SigningError(Cow<'static, str>),
    #[error("Storage error: {0}")]
    StorageError(Cow<'static, str>),
    #[error("Unsupported: {0}")]
    Unsupported(Cow<'static, str>),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Malformed(e.to_string().into())
    }
}
