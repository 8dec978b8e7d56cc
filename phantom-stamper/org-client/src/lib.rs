mod authenticator_kind;
mod authenticator_record;
mod create_authenticator_params;
mod error;
mod http_organization_service_client;
mod organization_service_client;
mod rpc;

pub use crate::{
    authenticator_kind::AuthenticatorKind,
    authenticator_record::AuthenticatorRecord,
    create_authenticator_params::{
        AuthenticatorParams, CreateAuthenticatorParams, AUTHENTICATOR_NAME_MAX_LEN,
    },
    error::Error,
    http_organization_service_client::HTTPOrganizationServiceClient,
    organization_service_client::OrganizationServiceClient,
    rpc::{RPCRequest, RPCResponse, CREATE_AUTHENTICATOR_METHOD},
};
pub type Result<T> = std::result::Result<T, Error>;

lazy_static::lazy_static! {
    /// Building a reqwest::Client is *incredibly* slow, so we use a global instance and then clone
    /// it per use, as the documentation indicates.
    pub(crate) static ref REQWEST_CLIENT: reqwest::Client = reqwest::Client::new();
}
