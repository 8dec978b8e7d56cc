use phantom_org_client::{
    AuthenticatorKind, AuthenticatorRecord, CreateAuthenticatorParams, Error, RPCRequest, Result,
    CREATE_AUTHENTICATOR_METHOD,
};
use phantom_stamper_core::{Algorithm, Clock, Stamp};
use std::{
    collections::{HashMap, VecDeque},
    sync::{Arc, Mutex},
};

#[derive(Default)]
struct MockOrganization {
    /// Authenticators keyed by username.
    authenticator_vm: HashMap<String, Vec<AuthenticatorRecord>>,
}

#[derive(Default)]
struct State {
    organization_m: HashMap<String, MockOrganization>,
    next_authenticator_id: u64,
    injected_failure_q: VecDeque<Error>,
    request_count: usize,
}

/// Purely in-memory, intra-process organization service.  Holds the authenticators of each user
/// of each organization, and services createAuthenticator requests the way the real service does:
/// the request must be stamped by one of the organization's unexpired authenticators.
pub struct MockOrganizationService {
    clock_a: Arc<dyn Clock>,
    state_l: Mutex<State>,
}

impl MockOrganizationService {
    pub fn new(clock_a: Arc<dyn Clock>) -> Self {
        Self {
            clock_a,
            state_l: Mutex::new(State::default()),
        }
    }
    /// Creates an organization whose single user has a single authenticator with the given public
    /// key.  This is how a stamper's first key gets registered.
    pub fn create_organization(
        &self,
        organization_id: &str,
        username: &str,
        authenticator_name: &str,
        public_key: &str,
        expires_at_o: Option<time::OffsetDateTime>,
    ) -> Result<AuthenticatorRecord> {
        let mut state_g = self.state();
        if state_g.organization_m.contains_key(organization_id) {
            return Err(Error::Validation(
                format!("organization {} already exists", organization_id).into(),
            ));
        }
        let authenticator_record = AuthenticatorRecord {
            id: Self::next_authenticator_id(&mut state_g.next_authenticator_id),
            organization_id: organization_id.to_string(),
            username: username.to_string(),
            authenticator_name: authenticator_name.to_string(),
            authenticator_kind: AuthenticatorKind::Keypair,
            public_key: public_key.to_string(),
            algorithm: Algorithm::Ed25519,
            expires_at_o,
            created_at: self.clock_a.now_utc(),
        };
        let mut organization = MockOrganization::default();
        organization
            .authenticator_vm
            .insert(username.to_string(), vec![authenticator_record.clone()]);
        state_g
            .organization_m
            .insert(organization_id.to_string(), organization);
        tracing::debug!(
            "MockOrganizationService created organization {} with authenticator {}",
            organization_id,
            authenticator_record.id
        );
        Ok(authenticator_record)
    }
    /// All authenticators currently registered for the user, expired or not.
    pub fn authenticators(&self, organization_id: &str, username: &str) -> Vec<AuthenticatorRecord> {
        self.state()
            .organization_m
            .get(organization_id)
            .and_then(|organization| organization.authenticator_vm.get(username))
            .cloned()
            .unwrap_or_default()
    }
    /// The next request will fail with the given error before any other processing.  Injected
    /// failures are consumed in the order they were injected.
    pub fn inject_failure(&self, error: Error) {
        self.state().injected_failure_q.push_back(error);
    }
    /// Number of RPC requests received, including failed ones.
    pub fn request_count(&self) -> usize {
        self.state().request_count
    }
    /// Services a request to the RPC endpoint, given the X-Phantom-Stamp header and the exact
    /// request body.
    pub fn handle_create_authenticator(
        &self,
        stamp_header: &str,
        body: &[u8],
    ) -> Result<AuthenticatorRecord> {
        let now = self.clock_a.now_utc();
        let mut state_g = self.state();
        let state = &mut *state_g;
        state.request_count += 1;
        if let Some(injected_failure) = state.injected_failure_q.pop_front() {
            tracing::debug!(
                "MockOrganizationService returning injected failure: {}",
                injected_failure
            );
            return Err(injected_failure);
        }

        // Authenticate the request before looking at what it says.
        let stamp = Stamp::decoded_from_str(stamp_header)
            .map_err(|e| Error::Authorization(format!("unreadable stamp: {}", e).into()))?;
        stamp
            .verify(body)
            .map_err(|e| Error::Authorization(format!("invalid stamp: {}", e).into()))?;
        let stamp_public_key = stamp
            .public_key_base58()
            .map_err(|e| Error::Authorization(format!("invalid stamp: {}", e).into()))?;

        let rpc_request: RPCRequest<CreateAuthenticatorParams> = serde_json::from_slice(body)
            .map_err(|e| Error::Validation(format!("malformed request: {}", e).into()))?;
        if rpc_request.method != CREATE_AUTHENTICATOR_METHOD {
            return Err(Error::Validation(
                format!("unsupported method {:?}", rpc_request.method).into(),
            ));
        }
        let params = rpc_request.params;
        params.validate()?;

        let organization = state
            .organization_m
            .get_mut(params.organization_id.as_str())
            .ok_or_else(|| {
                Error::Authorization(
                    format!("unknown organization {}", params.organization_id).into(),
                )
            })?;
        if !organization
            .authenticator_vm
            .values()
            .flatten()
            .any(|authenticator| {
                authenticator.public_key == stamp_public_key && !authenticator.is_expired_at(now)
            })
        {
            return Err(Error::Authorization(
                "request was not stamped by an unexpired authenticator of the organization".into(),
            ));
        }
        if organization
            .authenticator_vm
            .values()
            .flatten()
            .any(|authenticator| authenticator.public_key == params.authenticator.public_key)
        {
            return Err(Error::Validation(
                format!(
                    "public key {} is already registered",
                    params.authenticator.public_key
                )
                .into(),
            ));
        }

        let authenticator_v = organization
            .authenticator_vm
            .entry(params.username.clone())
            .or_default();
        if params.replace_expirable_o == Some(true) {
            let count_before = authenticator_v.len();
            authenticator_v.retain(|authenticator| !authenticator.is_expired_at(now));
            tracing::debug!(
                "MockOrganizationService removed {} expired authenticator(s) of user {}",
                count_before - authenticator_v.len(),
                params.username
            );
        }
        let authenticator_record = AuthenticatorRecord {
            id: Self::next_authenticator_id(&mut state.next_authenticator_id),
            organization_id: params.organization_id,
            username: params.username,
            authenticator_name: params.authenticator_name,
            authenticator_kind: params.authenticator.authenticator_kind,
            public_key: params.authenticator.public_key,
            algorithm: params.authenticator.algorithm,
            expires_at_o: params.authenticator.expires_at_o,
            created_at: now,
        };
        authenticator_v.push(authenticator_record.clone());
        tracing::debug!(
            "MockOrganizationService registered authenticator {} for user {}",
            authenticator_record.id,
            authenticator_record.username
        );
        Ok(authenticator_record)
    }
    fn next_authenticator_id(next_authenticator_id: &mut u64) -> String {
        *next_authenticator_id += 1;
        format!("authenticator-{}", next_authenticator_id)
    }
    fn state(&self) -> std::sync::MutexGuard<'_, State> {
        self.state_l
            .lock()
            .expect("programmer error: MockOrganizationService lock poisoned")
    }
}
