//! Service error types.

use thiserror::Error;

/// Errors from driving a negotiation, never from the negotiation itself.
///
/// Join rejections are outcomes, not errors; these only cover the execution
/// machinery around the coordinator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// The completion context was dropped before the outcome was delivered.
    #[error("completion context closed before delivery")]
    ContextClosed,

    /// The negotiation worker panicked.
    #[error("negotiation worker panicked")]
    WorkerPanicked,

    /// The negotiation worker was aborted by the runtime.
    #[error("negotiation worker aborted")]
    WorkerAborted,
}
