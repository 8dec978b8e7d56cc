use std::borrow::Cow;

#[derive(Clone, Debug, thiserror::Error)]
pub enum Error {
    #[error("Authenticator expired: {0}")]
    AuthenticatorExpired(Cow<'static, str>),
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(Cow<'static, str>),
    #[error("Not initialized: {0}")]
    NotInitialized(Cow<'static, str>),
    #[error("Rotation attempt aborted: {0}")]
    RotationAborted(Cow<'static, str>),
    #[error(transparent)]
    Registration(#[from] phantom_org_client::Error),
    #[error(transparent)]
    Stamper(#[from] phantom_stamper_core::Error),
}
