//! Deterministic collaborators for room join negotiation.
//!
//! In-memory implementations of the core's collaborator traits. Every
//! collaborator records what it was asked so tests can assert on call counts
//! and ordering, and every answer is scripted up front so runs are
//! reproducible.
//!
//! - [`ScriptedTransport`]: answers join calls from a script of replies
//! - [`StaticDiscovery`]: fixed room metadata, optionally failing
//! - [`MemoryRegistry`]: lock-protected room registry
//! - [`RecordingSink`]: captures every notified outcome

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod discovery;
mod registry;
mod sink;
mod transport;

pub use discovery::StaticDiscovery;
pub use registry::MemoryRegistry;
pub use sink::RecordingSink;
pub use transport::{JoinCall, Reply, ScriptedTransport, SimSession};

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Lock a mutex, recovering the data if a panicking test poisoned it.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
