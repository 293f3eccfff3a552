//! Classification of join rejections.
//!
//! The session layer reports a rejected join with a numeric protocol code.
//! [`classify`] maps every code to a [`ReasonCategory`]. Exactly one category,
//! [`ReasonCategory::NicknameConflict`], can be resolved by retrying under a
//! different nickname; every other category ends the negotiation.

use thiserror::Error;

/// Code reported when the service never answered.
pub const CODE_NO_RESPONSE: u16 = 0;
/// Wrong or missing room password.
pub const CODE_NOT_AUTHORIZED: u16 = 401;
/// Caller is banned from the room.
pub const CODE_FORBIDDEN: u16 = 403;
/// Room does not exist.
pub const CODE_NOT_FOUND: u16 = 404;
/// Room is members-only and caller is not on the list.
pub const CODE_REGISTRATION_REQUIRED: u16 = 407;
/// Nickname already occupied in the room.
pub const CODE_CONFLICT: u16 = 409;

/// Semantic reason a join attempt was rejected.
///
/// The `Display` text is the user-facing message for the category.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReasonCategory {
    /// No response or timeout.
    #[error("No response from server.")]
    NoResponse,

    /// Supplied password did not match.
    #[error("The password did not match the room's password.")]
    PasswordMismatch,

    /// Caller is banned.
    #[error("You have been banned from this room.")]
    Forbidden,

    /// Room does not exist.
    #[error("The room you are trying to enter does not exist.")]
    RoomNotFound,

    /// Room requires membership.
    #[error("You are not a member of this room.\nThis room requires you to be a member to join.")]
    MembershipRequired,

    /// Nickname is taken. The only retryable category.
    #[error("That nickname is already in use in this room.")]
    NicknameConflict,

    /// Any code without a dedicated category.
    #[error("Unable to join the room.")]
    UnknownRejection,
}

impl ReasonCategory {
    /// Whether this category ends the negotiation.
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::NicknameConflict)
    }
}

/// Map a protocol rejection code to its category. Total over all codes.
pub fn classify(code: u16) -> ReasonCategory {
    match code {
        CODE_NO_RESPONSE => ReasonCategory::NoResponse,
        CODE_NOT_AUTHORIZED => ReasonCategory::PasswordMismatch,
        CODE_FORBIDDEN => ReasonCategory::Forbidden,
        CODE_NOT_FOUND => ReasonCategory::RoomNotFound,
        CODE_REGISTRATION_REQUIRED => ReasonCategory::MembershipRequired,
        CODE_CONFLICT => ReasonCategory::NicknameConflict,
        _ => ReasonCategory::UnknownRejection,
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn known_codes_map_to_dedicated_categories() {
        assert_eq!(classify(0), ReasonCategory::NoResponse);
        assert_eq!(classify(401), ReasonCategory::PasswordMismatch);
        assert_eq!(classify(403), ReasonCategory::Forbidden);
        assert_eq!(classify(404), ReasonCategory::RoomNotFound);
        assert_eq!(classify(407), ReasonCategory::MembershipRequired);
        assert_eq!(classify(409), ReasonCategory::NicknameConflict);
    }

    #[test]
    fn unlisted_codes_are_unknown() {
        for code in [1, 400, 402, 405, 406, 408, 410, 500, 503, u16::MAX] {
            assert_eq!(classify(code), ReasonCategory::UnknownRejection);
        }
    }

    #[test]
    fn only_conflict_is_retryable() {
        assert!(!ReasonCategory::NicknameConflict.is_terminal());
        assert!(ReasonCategory::NoResponse.is_terminal());
        assert!(ReasonCategory::UnknownRejection.is_terminal());
    }

    #[test]
    fn messages_follow_the_dialog_texts() {
        insta::assert_snapshot!(ReasonCategory::Forbidden, @"You have been banned from this room.");
        insta::assert_snapshot!(ReasonCategory::NoResponse, @"No response from server.");
        insta::assert_snapshot!(ReasonCategory::UnknownRejection, @"Unable to join the room.");
    }

    proptest! {
        #[test]
        fn prop_classify_is_deterministic(code in any::<u16>()) {
            prop_assert_eq!(classify(code), classify(code));
        }

        #[test]
        fn prop_every_code_but_409_is_terminal(code in any::<u16>()) {
            prop_assume!(code != CODE_CONFLICT);
            prop_assert!(classify(code).is_terminal());
        }
    }
}
