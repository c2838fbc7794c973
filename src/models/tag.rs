//! Tag bindings and severity levels used when routing by tag.

use serde::{Deserialize, Serialize};

/// A configured destination for one tag.
///
/// Several bindings may share a tag, each one receives every message sent
/// to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagBinding {
    pub tag: String,
    pub channel: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub icon_emoji: Option<String>,
    #[serde(default)]
    pub parse: Option<String>,
}

/// Three-tier message severity, ordered from least to most urgent
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Info,
    Warn,
    Crit,
}

impl Severity {
    /// Map an inbound `level` string; unknown levels yield `None`
    pub fn from_level(level: &str) -> Option<Self> {
        match level {
            "info" => Some(Severity::Info),
            "warn" => Some(Severity::Warn),
            "crit" => Some(Severity::Crit),
            _ => None,
        }
    }

    /// Attachment color for this severity
    pub fn color(&self) -> &'static str {
        match self {
            Severity::Info => "#00ff00",
            Severity::Warn => "#ffdd00",
            Severity::Crit => "#ff0000",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_levels() {
        assert_eq!(Severity::from_level("info"), Some(Severity::Info));
        assert_eq!(Severity::from_level("warn"), Some(Severity::Warn));
        assert_eq!(Severity::from_level("crit"), Some(Severity::Crit));
    }

    #[test]
    fn test_unknown_levels() {
        for level in ["", "CRIT", "error", "critical", " info"] {
            assert_eq!(Severity::from_level(level), None, "{:?}", level);
        }
    }

    #[test]
    fn test_severity_order_and_colors() {
        assert!(Severity::Info < Severity::Warn);
        assert!(Severity::Warn < Severity::Crit);
        assert_eq!(Severity::Info.color(), "#00ff00");
        assert_eq!(Severity::Warn.color(), "#ffdd00");
        assert_eq!(Severity::Crit.color(), "#ff0000");
    }

    #[test]
    fn test_binding_optional_fields_default_to_none() {
        let binding: TagBinding =
            serde_json::from_str(r##"{"tag":"alerts","channel":"#alerts"}"##).unwrap();
        assert_eq!(binding.username, None);
        assert_eq!(binding.icon_emoji, None);
        assert_eq!(binding.parse, None);
    }
}
