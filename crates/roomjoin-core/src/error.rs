//! Error types for the negotiation core.
//!
//! Only construction and collaborator failures are errors here. Rejections
//! from the service are classified into [`crate::ReasonCategory`] and reach
//! the caller inside a [`crate::JoinOutcome`], never as an `Err`.

use thiserror::Error;

/// Invalid input when building a room identifier or join request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    /// Room identifier was empty after trimming.
    #[error("room identifier is empty")]
    EmptyRoomId,

    /// Room identifier contained whitespace.
    #[error("room identifier contains whitespace: {0:?}")]
    WhitespaceInRoomId(String),

    /// Service domain was empty when building an identifier from parts.
    #[error("service domain is empty")]
    EmptyService,

    /// Nickname was empty after trimming.
    #[error("nickname is empty")]
    EmptyNickname,
}

/// Discovery collaborator could not answer a metadata query.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryError {
    /// The service did not answer in time.
    #[error("no response from discovery service")]
    NoResponse,

    /// The service answered with an error code.
    #[error("discovery rejected with code {code}")]
    Rejected {
        /// Protocol error code returned by the service.
        code: u16,
    },

    /// The service answered with something we could not interpret.
    #[error("malformed discovery response: {0}")]
    Malformed(String),
}
