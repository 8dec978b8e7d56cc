use std::borrow::Cow;

/// Failures surfaced by the organization service.  All of them abort the rotation attempt that
/// made the call, leaving the active key in place.
#[derive(Clone, Debug, thiserror::Error)]
pub enum Error {
    #[error("Authorization failure: {0}")]
    Authorization(Cow<'static, str>),
    #[error("Malformed response: {0}")]
    Malformed(Cow<'static, str>),
    #[error("Network failure: {0}")]
    Network(Cow<'static, str>),
    #[error(transparent)]
    Stamping(#[from] phantom_stamper_core::Error),
    #[error("Validation failure: {0}")]
    Validation(Cow<'static, str>),
}

impl Error {
    /// Classifies a non-success HTTP status returned by the organization service.
    pub fn from_http_status(status_code: u16, description: Cow<'static, str>) -> Self {
        match status_code {
            400 | 409 | 422 => Self::Validation(description),
            401 | 403 => Self::Authorization(description),
            _ => Self::Network(description),
        }
    }
}
