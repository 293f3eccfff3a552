//! Terminal results of a negotiation.

use crate::ReasonCategory;

/// Generic message for outcomes that carry no usable detail.
const UNABLE_TO_JOIN: &str = "Unable to join the room.";

/// How a `Joined` outcome came about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOrigin {
    /// Membership already existed and was still active. The caller only
    /// re-activates the existing room.
    Resumed,
    /// A new membership was negotiated. The caller registers and activates
    /// it.
    Negotiated {
        /// Join calls issued, including the successful one.
        attempts: u32,
    },
}

/// The single value a negotiation produces.
///
/// Owns no resources; the live session of a fresh membership travels
/// separately in [`crate::Negotiation`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinOutcome {
    /// In the room under `nickname`.
    Joined {
        /// Effective in-room nickname.
        nickname: String,
        /// Whether the membership was resumed or newly negotiated.
        origin: JoinOrigin,
    },

    /// Room needs a password and none was supplied. No attempt was made.
    PasswordRequired,

    /// Service rejected the join for a reason retrying cannot fix.
    Rejected(ReasonCategory),

    /// Every candidate nickname was already taken.
    Exhausted {
        /// Join calls issued.
        attempts: u32,
    },

    /// Caller abandoned the negotiation before it resolved.
    Cancelled,
}

impl JoinOutcome {
    /// Whether the caller is now in the room.
    pub fn is_joined(&self) -> bool {
        matches!(self, Self::Joined { .. })
    }

    /// Effective nickname when joined.
    pub fn nickname(&self) -> Option<&str> {
        match self {
            Self::Joined { nickname, .. } => Some(nickname),
            _ => None,
        }
    }

    /// Human-readable message for every outcome except `Joined`.
    ///
    /// `Exhausted` and an unknown rejection share the generic text.
    pub fn user_message(&self) -> Option<String> {
        match self {
            Self::Joined { .. } => None,
            Self::PasswordRequired => {
                Some("This group chat room requires a password to enter.".to_string())
            },
            Self::Rejected(reason) => Some(reason.to_string()),
            Self::Exhausted { .. } => Some(UNABLE_TO_JOIN.to_string()),
            Self::Cancelled => Some("The join was cancelled.".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joined_has_no_message() {
        let outcome =
            JoinOutcome::Joined { nickname: "alice".into(), origin: JoinOrigin::Resumed };
        assert!(outcome.is_joined());
        assert_eq!(outcome.nickname(), Some("alice"));
        assert_eq!(outcome.user_message(), None);
    }

    #[test]
    fn exhaustion_and_unknown_share_the_generic_message() {
        let exhausted = JoinOutcome::Exhausted { attempts: 9 }.user_message();
        let unknown = JoinOutcome::Rejected(ReasonCategory::UnknownRejection).user_message();
        assert_eq!(exhausted, unknown);
        assert_eq!(exhausted.as_deref(), Some(UNABLE_TO_JOIN));
    }

    #[test]
    fn other_outcomes_have_distinct_messages() {
        let outcomes = [
            JoinOutcome::PasswordRequired,
            JoinOutcome::Cancelled,
            JoinOutcome::Exhausted { attempts: 9 },
            JoinOutcome::Rejected(ReasonCategory::NoResponse),
            JoinOutcome::Rejected(ReasonCategory::PasswordMismatch),
            JoinOutcome::Rejected(ReasonCategory::Forbidden),
            JoinOutcome::Rejected(ReasonCategory::RoomNotFound),
            JoinOutcome::Rejected(ReasonCategory::MembershipRequired),
        ];
        let messages: std::collections::HashSet<_> =
            outcomes.iter().filter_map(JoinOutcome::user_message).collect();
        assert_eq!(messages.len(), outcomes.len());
    }

    #[test]
    fn password_prompt_text() {
        insta::assert_snapshot!(
            JoinOutcome::PasswordRequired.user_message().unwrap_or_default(),
            @"This group chat room requires a password to enter."
        );
    }
}
