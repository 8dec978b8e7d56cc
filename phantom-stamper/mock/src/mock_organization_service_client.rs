use crate::MockOrganizationService;
use phantom_org_client::{
    AuthenticatorRecord, CreateAuthenticatorParams, Error, OrganizationServiceClient, RPCRequest,
    Result, CREATE_AUTHENTICATOR_METHOD,
};
use phantom_stamper_core::{Clock, StampParams, Stamper};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

/// OrganizationServiceClient that stamps and serializes requests exactly like the HTTP client,
/// but hands them directly to a MockOrganizationService.
pub struct MockOrganizationServiceClient {
    mock_organization_service_a: Arc<MockOrganizationService>,
    stamper_a: Arc<dyn Stamper>,
    clock_a: Arc<dyn Clock>,
    /// Optional simulated network latency duration.  If present, then each request sleeps for
    /// this duration after being stamped and before reaching the service.
    simulated_latency_o: Option<std::time::Duration>,
    call_count: AtomicUsize,
}

impl MockOrganizationServiceClient {
    pub fn new(
        mock_organization_service_a: Arc<MockOrganizationService>,
        stamper_a: Arc<dyn Stamper>,
        clock_a: Arc<dyn Clock>,
        simulated_latency_o: Option<std::time::Duration>,
    ) -> Self {
        Self {
            mock_organization_service_a,
            stamper_a,
            clock_a,
            simulated_latency_o,
            call_count: AtomicUsize::new(0),
        }
    }
    /// Number of create_authenticator calls made through this client.
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
impl OrganizationServiceClient for MockOrganizationServiceClient {
    async fn create_authenticator(
        &self,
        create_authenticator_params: &CreateAuthenticatorParams,
    ) -> Result<AuthenticatorRecord> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        create_authenticator_params.validate()?;
        let body = serde_json::to_string(&RPCRequest {
            method: CREATE_AUTHENTICATOR_METHOD.to_string(),
            params: create_authenticator_params,
            timestamp_ms: self.clock_a.now_utc(),
        })
        .map_err(|e| Error::Malformed(format!("failed to serialize request: {}", e).into()))?;
        let stamp = self
            .stamper_a
            .stamp(&StampParams::pki(body.as_bytes()))
            .await?;
        if let Some(simulated_latency) = self.simulated_latency_o {
            tokio::time::sleep(simulated_latency).await;
        }
        self.mock_organization_service_a
            .handle_create_authenticator(stamp.as_str(), body.as_bytes())
    }
}
