use crate::{
    AuthenticatorRecord, CreateAuthenticatorParams, Error, OrganizationServiceClient, RPCRequest,
    RPCResponse, Result, CREATE_AUTHENTICATOR_METHOD, REQWEST_CLIENT,
};
use phantom_stamper_core::{Clock, StampParams, Stamper, STAMP_HEADER_NAME};
use std::sync::Arc;

/// Talks to the organization service's RPC endpoint over HTTP.  Every request carries an
/// X-Phantom-Stamp header made by the given stamper over the exact request body.
pub struct HTTPOrganizationServiceClient {
    api_base_url: String,
    stamper_a: Arc<dyn Stamper>,
    clock_a: Arc<dyn Clock>,
}

impl HTTPOrganizationServiceClient {
    pub fn new(
        api_base_url: impl Into<String>,
        stamper_a: Arc<dyn Stamper>,
        clock_a: Arc<dyn Clock>,
    ) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            stamper_a,
            clock_a,
        }
    }
    pub fn rpc_url(&self) -> String {
        format!("{}/kms/rpc", self.api_base_url.trim_end_matches('/'))
    }
    /// Serializes and stamps a request, without sending it.
    pub async fn build_request<P: serde::Serialize + Sync>(
        &self,
        method: &str,
        params: &P,
    ) -> Result<reqwest::Request> {
        let rpc_request = RPCRequest {
            method: method.to_string(),
            params,
            timestamp_ms: self.clock_a.now_utc(),
        };
        let body = serde_json::to_string(&rpc_request)
            .map_err(|e| Error::Malformed(format!("failed to serialize request: {}", e).into()))?;
        let stamp = self
            .stamper_a
            .stamp(&StampParams::pki(body.as_bytes()))
            .await?;
        REQWEST_CLIENT
            .clone()
            .post(self.rpc_url())
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .header(STAMP_HEADER_NAME, stamp)
            .body(body)
            .build()
            .map_err(|e| Error::Network(format!("failed to build request: {}", e).into()))
    }
    async fn call<P: serde::Serialize + Sync, R: serde::de::DeserializeOwned>(
        &self,
        method: &str,
        params: &P,
    ) -> Result<R> {
        let request = self.build_request(method, params).await?;
        tracing::trace!("POST {} method: {}", request.url(), method);
        let response = REQWEST_CLIENT
            .clone()
            .execute(request)
            .await
            .map_err(|e| Error::Network(format!("{} request failed: {}", method, e).into()))?;
        let status = response.status();
        let body = response.text().await.map_err(|e| {
            Error::Network(format!("{} response body read error: {}", method, e).into())
        })?;
        if !status.is_success() {
            tracing::debug!("{} failed with HTTP status {}: {}", method, status, body);
            return Err(Error::from_http_status(
                status.as_u16(),
                format!("{} returned HTTP status {}: {}", method, status, body).into(),
            ));
        }
        let rpc_response: RPCResponse<R> = serde_json::from_str(body.as_str()).map_err(|e| {
            Error::Malformed(format!("{} response failed to parse: {}", method, e).into())
        })?;
        Ok(rpc_response.result)
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
impl OrganizationServiceClient for HTTPOrganizationServiceClient {
    async fn create_authenticator(
        &self,
        create_authenticator_params: &CreateAuthenticatorParams,
    ) -> Result<AuthenticatorRecord> {
        create_authenticator_params.validate()?;
        self.call(CREATE_AUTHENTICATOR_METHOD, create_authenticator_params)
            .await
    }
}
