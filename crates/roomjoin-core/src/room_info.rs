//! Room metadata reported by the discovery collaborator.

use chrono::NaiveDateTime;

/// Feature flag advertised by password-protected rooms.
pub const FEATURE_PASSWORD_PROTECTED: &str = "muc_passwordprotected";

/// Format the service uses for creation timestamps.
const CREATION_DATE_FORMAT: &str = "%Y%m%dT%H:%M:%S";

/// Format used when showing a creation timestamp to the user.
const DISPLAY_DATE_FORMAT: &str = "%a %m/%d/%Y %-I:%M:%S %p";

/// Metadata about a room, as answered by service discovery.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoomInfo {
    /// Advertised feature flags.
    pub features: Vec<String>,
    /// Current occupant count, if the service reports it.
    pub occupants: Option<u32>,
    /// Raw creation timestamp text, if the service reports it.
    pub creation_date: Option<String>,
}

impl RoomInfo {
    /// Whether the room advertises `feature`.
    pub fn has_feature(&self, feature: &str) -> bool {
        self.features.iter().any(|f| f == feature)
    }

    /// Whether joining requires a password.
    pub fn is_password_protected(&self) -> bool {
        self.has_feature(FEATURE_PASSWORD_PROTECTED)
    }

    /// Parsed creation timestamp. `None` if absent or unparsable.
    pub fn creation_date(&self) -> Option<NaiveDateTime> {
        let raw = self.creation_date.as_deref()?;
        match NaiveDateTime::parse_from_str(raw.trim(), CREATION_DATE_FORMAT) {
            Ok(date) => Some(date),
            Err(e) => {
                tracing::debug!(raw, error = %e, "unparsable room creation date");
                None
            },
        }
    }

    /// Creation timestamp for display, or `"Not available"`.
    pub fn display_creation_date(&self) -> String {
        self.creation_date().map_or_else(
            || "Not available".to_string(),
            |date| date.format(DISPLAY_DATE_FORMAT).to_string(),
        )
    }
}
