//! Simulation errors.

use roomjoin_client::ServiceError;
use roomjoin_core::RequestError;
use thiserror::Error;

/// Failure to set up or finish a simulated join.
///
/// A rejected join is not an error; it is reported through the outcome.
#[derive(Debug, Error)]
pub enum SimError {
    /// Room identifier or nickname was invalid.
    #[error("invalid join request: {0}")]
    InvalidRequest(#[from] RequestError),

    /// The async worker or completion context failed.
    #[error("join service failed: {0}")]
    Service(#[from] ServiceError),
}
