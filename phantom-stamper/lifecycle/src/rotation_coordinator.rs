use crate::{Error, LifecycleConfig, Result, RotationOutcome, RotationState};
use futures::{
    future::{BoxFuture, Shared},
    FutureExt,
};
use phantom_org_client::{AuthenticatorParams, CreateAuthenticatorParams, OrganizationServiceClient};
use phantom_stamper_core::{ExpirationInfo, ExpirationPolicy, StamperWithKeyManagement};
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, Mutex,
};

type AttemptFuture = Shared<BoxFuture<'static, Result<RotationOutcome>>>;

struct InFlightAttempt {
    attempt_id: u64,
    attempt_f: AttemptFuture,
}

#[derive(Default)]
struct RotationStatus {
    rotation_state: RotationState,
    last_attempt_at_o: Option<time::OffsetDateTime>,
}

struct Inner {
    stamper_a: Arc<dyn StamperWithKeyManagement>,
    organization_service_client_a: Arc<dyn OrganizationServiceClient>,
    lifecycle_config: LifecycleConfig,
    expiration_policy: ExpirationPolicy,
    rotation_status_l: Mutex<RotationStatus>,
    in_flight_attempt_l: Mutex<Option<InFlightAttempt>>,
    next_attempt_id: AtomicU64,
}

/// Keeps the stamper's active key registered and renewed.  A rotation attempt generates a new
/// keypair (held as pending), registers its public key with the organization service, and only
/// then promotes it to active.  Any failure along the way discards the pending keypair, so the
/// previous key keeps signing.
///
/// At most one attempt is in flight at a time.  Calls made while an attempt is in flight don't
/// start another one; they wait for and return the in-flight attempt's result.  The attempt runs
/// on its own task, so it completes even if every caller waiting on it is dropped.
#[derive(Clone)]
pub struct RotationCoordinator {
    inner_a: Arc<Inner>,
}

impl RotationCoordinator {
    /// Renewal is decided by the renewal window in lifecycle_config, regardless of the stamper's
    /// own expiration policy.
    pub fn new(
        stamper_a: Arc<dyn StamperWithKeyManagement>,
        organization_service_client_a: Arc<dyn OrganizationServiceClient>,
        lifecycle_config: LifecycleConfig,
    ) -> Result<Self> {
        let expiration_policy = lifecycle_config.expiration_policy()?;
        Ok(Self {
            inner_a: Arc::new(Inner {
                stamper_a,
                organization_service_client_a,
                lifecycle_config,
                expiration_policy,
                rotation_status_l: Mutex::new(RotationStatus::default()),
                in_flight_attempt_l: Mutex::new(None),
                next_attempt_id: AtomicU64::new(0),
            }),
        })
    }
    pub fn lifecycle_config(&self) -> &LifecycleConfig {
        &self.inner_a.lifecycle_config
    }
    pub fn stamper(&self) -> &Arc<dyn StamperWithKeyManagement> {
        &self.inner_a.stamper_a
    }
    /// Evaluates the stamper's active key against this coordinator's renewal window.
    pub fn expiration_info(&self, now: time::OffsetDateTime) -> ExpirationInfo {
        self.inner_a.expiration_info(now)
    }
    /// State of the most recent rotation attempt.
    pub fn rotation_state(&self) -> RotationState {
        self.inner_a.rotation_status().rotation_state
    }
    /// Time (as passed to check_and_rotate_if_needed) of the most recent rotation attempt.
    /// Checks that found no rotation was needed don't count as attempts.
    pub fn last_attempt_at_o(&self) -> Option<time::OffsetDateTime> {
        self.inner_a.rotation_status().last_attempt_at_o
    }
    /// Rotates the active key if it's within its renewal window at time `now`.  Rotation is never
    /// retried here; calling this again after a failure starts a fresh attempt.
    pub async fn check_and_rotate_if_needed(
        &self,
        now: time::OffsetDateTime,
    ) -> Result<RotationOutcome> {
        let attempt_f = {
            let mut in_flight_attempt_g = self.inner_a.in_flight_attempt();
            match in_flight_attempt_g.as_ref() {
                Some(in_flight_attempt) => {
                    tracing::debug!(
                        "joining in-flight rotation attempt {}",
                        in_flight_attempt.attempt_id
                    );
                    in_flight_attempt.attempt_f.clone()
                }
                None => {
                    let attempt_id = self.inner_a.next_attempt_id.fetch_add(1, Ordering::SeqCst);
                    // The task can't clear the slot before it's filled, since the slot stays
                    // locked until then.
                    let attempt_h = tokio::spawn({
                        let inner_a = self.inner_a.clone();
                        async move {
                            let result = inner_a.check_and_rotate(now).await;
                            inner_a.clear_in_flight_attempt(attempt_id);
                            result
                        }
                    });
                    let inner_a = self.inner_a.clone();
                    let attempt_f = async move {
                        attempt_h.await.unwrap_or_else(|e| {
                            inner_a.clear_in_flight_attempt(attempt_id);
                            Err(Error::RotationAborted(
                                format!("rotation attempt {} task failed: {}", attempt_id, e)
                                    .into(),
                            ))
                        })
                    }
                    .boxed()
                    .shared();
                    *in_flight_attempt_g = Some(InFlightAttempt {
                        attempt_id,
                        attempt_f: attempt_f.clone(),
                    });
                    attempt_f
                }
            }
        };
        attempt_f.await
    }
    /// Makes sure the active authenticator is usable at time `now`, renewing it if it's due.
    ///
    /// Fails with AuthenticatorExpired if the active key has already expired, since a request
    /// stamped by it would be rejected and rotation can't recover from that.  A failed renewal is
    /// only logged, because the active key is still valid until it expires; the next check
    /// retries.
    pub async fn ensure_valid_authenticator(&self, now: time::OffsetDateTime) -> Result<()> {
        let key_record = self.inner_a.stamper_a.get_key_info().ok_or_else(|| {
            Error::NotInitialized("stamper has no active key to keep valid".into())
        })?;
        let expiration_info = self.inner_a.expiration_info(now);
        if expiration_info.is_expired() {
            return Err(Error::AuthenticatorExpired(
                format!(
                    "key {} expired at {:?}",
                    key_record.key_id, expiration_info.expires_at_o
                )
                .into(),
            ));
        }
        match self.check_and_rotate_if_needed(now).await {
            Ok(_) => Ok(()),
            Err(Error::Registration(e)) => {
                tracing::warn!(
                    "authenticator renewal failed; key {} stays active until it expires: {}",
                    key_record.key_id,
                    e
                );
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}

impl Inner {
    fn expiration_info(&self, now: time::OffsetDateTime) -> ExpirationInfo {
        self.expiration_policy
            .evaluate(self.stamper_a.get_key_info().as_ref(), now)
    }
    async fn check_and_rotate(&self, now: time::OffsetDateTime) -> Result<RotationOutcome> {
        let expiration_info = self.expiration_info(now);
        if !expiration_info.should_renew {
            tracing::debug!(
                "no rotation needed; time until expiry: {:?}",
                expiration_info.time_until_expiry_o
            );
            return Ok(RotationOutcome::NotNeeded { expiration_info });
        }

        {
            let mut rotation_status_g = self.rotation_status();
            rotation_status_g.rotation_state = RotationState::Generating;
            rotation_status_g.last_attempt_at_o = Some(now);
        }
        match self.rotate(now).await {
            Ok(rotation_outcome) => {
                self.set_rotation_state(RotationState::Promoted);
                Ok(rotation_outcome)
            }
            Err(e) => {
                self.set_rotation_state(RotationState::Failed);
                tracing::warn!("rotation attempt failed; previous key stays active: {}", e);
                if let Err(discard_error) = self.stamper_a.discard_pending_key_pair().await {
                    tracing::warn!(
                        "failed to discard pending key after failed rotation: {}",
                        discard_error
                    );
                }
                Err(e)
            }
        }
    }
    async fn rotate(&self, now: time::OffsetDateTime) -> Result<RotationOutcome> {
        let previous_key_record = self.stamper_a.get_key_info().ok_or_else(|| {
            Error::NotInitialized("stamper lost its active key during rotation".into())
        })?;

        let key_record = self.stamper_a.generate_new_key_pair().await?;
        tracing::debug!(
            "generated key {} to replace key {}",
            key_record.key_id,
            previous_key_record.key_id
        );

        self.set_rotation_state(RotationState::Registering);
        let create_authenticator_params = CreateAuthenticatorParams {
            organization_id: self.lifecycle_config.organization_id.clone(),
            username: self.lifecycle_config.username.clone(),
            authenticator_name: self.lifecycle_config.authenticator_name(now),
            authenticator: AuthenticatorParams::from(&key_record),
            replace_expirable_o: Some(true),
        };
        let authenticator = self
            .organization_service_client_a
            .create_authenticator(&create_authenticator_params)
            .await?;

        let key_record = self
            .stamper_a
            .switch_to_new_key_pair(authenticator.id.as_str())
            .await?;
        tracing::info!(
            "rotated from key {} to key {} (authenticator {})",
            previous_key_record.key_id,
            key_record.key_id,
            authenticator.id
        );
        Ok(RotationOutcome::Rotated {
            previous_key_id: previous_key_record.key_id,
            key_record,
            authenticator,
        })
    }
    fn set_rotation_state(&self, rotation_state: RotationState) {
        tracing::trace!("rotation state -> {}", rotation_state);
        self.rotation_status().rotation_state = rotation_state;
    }
    fn rotation_status(&self) -> std::sync::MutexGuard<'_, RotationStatus> {
        self.rotation_status_l
            .lock()
            .expect("programmer error: RotationCoordinator lock poisoned")
    }
    fn clear_in_flight_attempt(&self, attempt_id: u64) {
        let mut in_flight_attempt_g = self.in_flight_attempt();
        if in_flight_attempt_g
            .as_ref()
            .is_some_and(|in_flight_attempt| in_flight_attempt.attempt_id == attempt_id)
        {
            *in_flight_attempt_g = None;
        }
    }
    fn in_flight_attempt(&self) -> std::sync::MutexGuard<'_, Option<InFlightAttempt>> {
        self.in_flight_attempt_l
            .lock()
            .expect("programmer error: RotationCoordinator lock poisoned")
    }
}
