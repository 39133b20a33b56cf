//! Session settings and configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::autosave::DEFAULT_AUTOSAVE_DELAY;
use crate::history::DEFAULT_HISTORY_LIMIT;

/// Tunable session behavior.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionSettings {
    /// Delay between the first dirtying edit and the autosave attempt
    pub autosave_delay_ms: u64,

    /// Maximum number of undo snapshots to keep
    pub history_limit: usize,

    /// Title used when the user clears the title field
    pub default_title: String,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            autosave_delay_ms: DEFAULT_AUTOSAVE_DELAY.as_millis() as u64,
            history_limit: DEFAULT_HISTORY_LIMIT,
            default_title: "untitled document".to_string(),
        }
    }
}

impl SessionSettings {
    pub fn autosave_delay(&self) -> Duration {
        Duration::from_millis(self.autosave_delay_ms)
    }
}

/// Everything a session needs to know about its document and owner.
///
/// Identity is explicit construction input; the engine never reads it from
/// ambient storage.
#[derive(Clone, Debug)]
pub struct SessionConfig {
    /// Store id of the document
    pub file_id: String,
    /// Key identifying the owning user to the store
    pub owner_key: String,
    pub settings: SessionSettings,
}

impl SessionConfig {
    pub fn new(file_id: impl Into<String>, owner_key: impl Into<String>) -> Self {
        Self {
            file_id: file_id.into(),
            owner_key: owner_key.into(),
            settings: SessionSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: SessionSettings) -> Self {
        self.settings = settings;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = SessionSettings::default();
        assert_eq!(settings.autosave_delay(), Duration::from_secs(5));
        assert_eq!(settings.history_limit, 100);
        assert_eq!(settings.default_title, "untitled document");
    }

    #[test]
    fn test_settings_round_trip_through_json() {
        let settings = SessionSettings {
            autosave_delay_ms: 1500,
            history_limit: 10,
            default_title: "scratch".to_string(),
        };
        let json = serde_json::to_string(&settings).unwrap();
        let back: SessionSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(back.autosave_delay_ms, 1500);
        assert_eq!(back.history_limit, 10);
        assert_eq!(back.default_title, "scratch");
    }
}
