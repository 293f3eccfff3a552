//! Room identifiers.
//!
//! A [`RoomId`] is an opaque, immutable address of a room on a conference
//! service. Most identifiers have the `local@service` shape, but nothing in
//! negotiation depends on it; the shape is only exposed for display and for
//! building identifiers from a human room name.

use std::{fmt, str::FromStr};

use crate::RequestError;

/// Opaque identifier of a multi-party room.
///
/// Used as the key of the room registry. Two identifiers are equal iff their
/// trimmed text is equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomId(String);

impl RoomId {
    /// Parse an identifier from text.
    ///
    /// Surrounding whitespace is trimmed. Empty text or embedded whitespace
    /// is rejected.
    pub fn parse(text: &str) -> Result<Self, RequestError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(RequestError::EmptyRoomId);
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(RequestError::WhitespaceInRoomId(trimmed.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Build `escaped-name@service` from a human room name.
    ///
    /// The name is escaped so that whitespace, `@` and other reserved
    /// characters survive as part of the local part.
    pub fn from_name(room_name: &str, service: &str) -> Result<Self, RequestError> {
        let service = service.trim();
        if service.is_empty() {
            return Err(RequestError::EmptyService);
        }
        let local = escape_local_part(room_name.trim());
        if local.is_empty() {
            return Err(RequestError::EmptyRoomId);
        }
        Self::parse(&format!("{local}@{service}"))
    }

    /// Identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Part before the first `@`. `None` if the identifier has no `@`.
    pub fn local_part(&self) -> Option<&str> {
        self.0.split_once('@').map(|(local, _)| local)
    }

    /// Part after the first `@`. `None` if the identifier has no `@`.
    pub fn service(&self) -> Option<&str> {
        self.0.split_once('@').map(|(_, service)| service)
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for RoomId {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for RoomId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Escape a room name for use as the local part of an address.
///
/// Each reserved character becomes `\` followed by its two hex digits. Any
/// whitespace character is written as an escaped space.
pub fn escape_local_part(name: &str) -> String {
    let mut escaped = String::with_capacity(name.len());
    for c in name.chars() {
        match c {
            '"' => escaped.push_str("\\22"),
            '&' => escaped.push_str("\\26"),
            '\'' => escaped.push_str("\\27"),
            '/' => escaped.push_str("\\2f"),
            ':' => escaped.push_str("\\3a"),
            '<' => escaped.push_str("\\3c"),
            '>' => escaped.push_str("\\3e"),
            '@' => escaped.push_str("\\40"),
            '\\' => escaped.push_str("\\5c"),
            c if c.is_whitespace() => escaped.push_str("\\20"),
            c => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parse_trims_and_splits() {
        let room = RoomId::parse("  dev@conference.example.org ").unwrap();
        assert_eq!(room.as_str(), "dev@conference.example.org");
        assert_eq!(room.local_part(), Some("dev"));
        assert_eq!(room.service(), Some("conference.example.org"));
    }

    #[test]
    fn parse_accepts_opaque_text() {
        let room: RoomId = "lobby".parse().unwrap();
        assert_eq!(room.local_part(), None);
        assert_eq!(room.service(), None);
    }

    #[test]
    fn parse_rejects_empty_and_whitespace() {
        assert_eq!(RoomId::parse("   "), Err(RequestError::EmptyRoomId));
        assert!(matches!(RoomId::parse("a b@x"), Err(RequestError::WhitespaceInRoomId(_))));
    }

    #[test]
    fn from_name_escapes_reserved_characters() {
        let room = RoomId::from_name("Q&A: rust/async", "conference.example.org").unwrap();
        assert_eq!(room.as_str(), "Q\\26A\\3a\\20rust\\2fasync@conference.example.org");
        assert_eq!(room.service(), Some("conference.example.org"));
    }

    #[test]
    fn from_name_keeps_every_whitespace_kind() {
        let tab = RoomId::from_name("a\tb", "svc").unwrap();
        let newline = RoomId::from_name("a\nb", "svc").unwrap();
        let plain = RoomId::from_name("ab", "svc").unwrap();

        assert_eq!(tab.as_str(), "a\\20b@svc");
        assert_eq!(newline.as_str(), "a\\20b@svc");
        assert_ne!(tab, plain);
    }

    #[test]
    fn from_name_escapes_at_sign_and_backslash() {
        let room = RoomId::from_name("ops@night\\shift", "svc").unwrap();
        assert_eq!(room.as_str(), "ops\\40night\\5cshift@svc");
        assert_eq!(room.local_part(), Some("ops\\40night\\5cshift"));
        assert_eq!(room.service(), Some("svc"));
    }

    #[test]
    fn from_name_requires_service() {
        assert_eq!(RoomId::from_name("dev", " "), Err(RequestError::EmptyService));
        assert_eq!(RoomId::from_name("  ", "svc"), Err(RequestError::EmptyRoomId));
    }
}
