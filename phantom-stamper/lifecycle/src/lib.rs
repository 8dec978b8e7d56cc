mod error;
mod lifecycle_config;
mod renewal_loop;
mod rotation_coordinator;
mod rotation_outcome;
mod rotation_state;

pub use crate::{
    error::Error,
    lifecycle_config::LifecycleConfig,
    renewal_loop::spawn_renewal_loop,
    rotation_coordinator::RotationCoordinator,
    rotation_outcome::RotationOutcome,
    rotation_state::RotationState,
};
pub type Result<T> = std::result::Result<T, Error>;
