//! Room join client
//!
//! Execution layer over [`roomjoin_core`]. The core negotiates; this crate
//! decides where the negotiation runs and where its outcome is applied.
//!
//! # Components
//!
//! - [`JoinService`]: dispatches Blocking/Async requests, applies registry
//!   glue and notifies the sink
//! - [`CompletionQueue`] / [`CompletionSender`]: single-owner handoff of
//!   async outcomes back to the caller's context
//! - [`JoinTicket`]: cancellation and delivery tracking for one join

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod completion;
mod error;
mod service;

pub use completion::{CompletionQueue, CompletionSender, completion_channel};
pub use error::ServiceError;
pub use roomjoin_core::{ExecutionMode, JoinOutcome, JoinRequest, RoomId};
pub use service::{JoinService, JoinTicket};
