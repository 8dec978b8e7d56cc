use crate::{AuthenticatorRecord, CreateAuthenticatorParams, Result};

/// The remote organization service, as far as authenticator rotation is concerned.
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
pub trait OrganizationServiceClient: Send + Sync {
    /// Registers a new authenticator.  The request is stamped with the caller's currently
    /// active key.
    async fn create_authenticator(
        &self,
        create_authenticator_params: &CreateAuthenticatorParams,
    ) -> Result<AuthenticatorRecord>;
}
