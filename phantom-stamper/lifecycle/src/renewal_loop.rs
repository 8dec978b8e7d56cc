use crate::{Error, RotationCoordinator};
use phantom_stamper_core::Clock;
use std::sync::Arc;

/// Spawns a task that calls `ensure_valid_authenticator` every `check_interval`, starting
/// immediately.  The task runs until it's aborted, or until the active key is found to be
/// expired or missing, since no later check could recover from either.
pub fn spawn_renewal_loop(
    rotation_coordinator: RotationCoordinator,
    check_interval: std::time::Duration,
    clock_a: Arc<dyn Clock>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(check_interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            let now = clock_a.now_utc();
            match rotation_coordinator.ensure_valid_authenticator(now).await {
                Ok(()) => {
                    tracing::trace!(
                        "renewal check at {} done; rotation state: {}",
                        now,
                        rotation_coordinator.rotation_state()
                    );
                }
                Err(e @ Error::AuthenticatorExpired(_)) | Err(e @ Error::NotInitialized(_)) => {
                    tracing::error!("stopping renewal loop: {}", e);
                    break;
                }
                Err(e) => {
                    tracing::error!("renewal check at {} failed: {}", now, e);
                }
            }
        }
    })
}
