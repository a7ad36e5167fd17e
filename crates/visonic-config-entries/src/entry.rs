//! Config Entry types
//!
//! A ConfigEntry represents a single configured integration instance. For
//! the Visonic bridge that is one cloud account plus one selected panel.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Source of the config entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConfigEntrySource {
    /// Configured via UI/API
    #[default]
    User,
    /// Imported from YAML config
    Import,
    /// System-created entry
    System,
}

/// A configuration entry for an integration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigEntry {
    /// Unique identifier (ULID)
    pub entry_id: String,

    /// Integration domain (e.g., "visonicalarm")
    pub domain: String,

    /// Human-readable display name
    pub title: String,

    /// Immutable configuration data collected by the config flow
    #[serde(default)]
    pub data: HashMap<String, serde_json::Value>,

    /// User-configurable options edited by the options flow
    #[serde(default)]
    pub options: HashMap<String, serde_json::Value>,

    /// Major schema version
    #[serde(default = "default_version")]
    pub version: u32,

    /// Optional unique identifier for duplicate prevention
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique_id: Option<String>,

    /// Origin type
    #[serde(default)]
    pub source: ConfigEntrySource,

    /// Creation timestamp
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp
    #[serde(default = "Utc::now")]
    pub modified_at: DateTime<Utc>,
}

fn default_version() -> u32 {
    1
}

impl ConfigEntry {
    /// Create a new config entry
    pub fn new(domain: impl Into<String>, title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            entry_id: ulid::Ulid::new().to_string(),
            domain: domain.into(),
            title: title.into(),
            data: HashMap::new(),
            options: HashMap::new(),
            version: 1,
            unique_id: None,
            source: ConfigEntrySource::User,
            created_at: now,
            modified_at: now,
        }
    }

    /// Set entry data
    pub fn with_data(mut self, data: HashMap<String, serde_json::Value>) -> Self {
        self.data = data;
        self
    }

    /// Set entry options
    pub fn with_options(mut self, options: HashMap<String, serde_json::Value>) -> Self {
        self.options = options;
        self
    }

    /// Set unique_id
    pub fn with_unique_id(mut self, unique_id: impl Into<String>) -> Self {
        self.unique_id = Some(unique_id.into());
        self
    }

    /// Set source
    pub fn with_source(mut self, source: ConfigEntrySource) -> Self {
        self.source = source;
        self
    }
}

/// Update data for a config entry
///
/// Unset fields leave the entry untouched; set fields replace wholesale.
#[derive(Debug, Default)]
pub struct ConfigEntryUpdate {
    pub title: Option<String>,
    pub data: Option<HashMap<String, serde_json::Value>>,
    pub options: Option<HashMap<String, serde_json::Value>>,
    pub unique_id: Option<Option<String>>,
}

impl ConfigEntryUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn data(mut self, data: HashMap<String, serde_json::Value>) -> Self {
        self.data = Some(data);
        self
    }

    pub fn options(mut self, options: HashMap<String, serde_json::Value>) -> Self {
        self.options = Some(options);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_config_entry_new() {
        let entry = ConfigEntry::new("visonicalarm", "123ABC");
        assert_eq!(entry.domain, "visonicalarm");
        assert_eq!(entry.title, "123ABC");
        assert_eq!(entry.version, 1);
        assert!(entry.data.is_empty());
        assert!(entry.options.is_empty());
        assert!(!entry.entry_id.is_empty());
    }

    #[test]
    fn test_config_entry_builder() {
        let mut data = HashMap::new();
        data.insert("host".to_string(), json!("visonic.tycomonitor.com"));

        let entry = ConfigEntry::new("visonicalarm", "123ABC")
            .with_data(data)
            .with_unique_id("user@example.com-123ABC")
            .with_source(ConfigEntrySource::Import);

        assert_eq!(
            entry.unique_id,
            Some("user@example.com-123ABC".to_string())
        );
        assert_eq!(entry.source, ConfigEntrySource::Import);
        assert!(entry.data.contains_key("host"));
    }

    #[test]
    fn test_distinct_entry_ids() {
        let a = ConfigEntry::new("visonicalarm", "A");
        let b = ConfigEntry::new("visonicalarm", "B");
        assert_ne!(a.entry_id, b.entry_id);
    }

    #[test]
    fn test_serde_roundtrip() {
        let entry = ConfigEntry::new("visonicalarm", "123ABC")
            .with_unique_id("user@example.com-123ABC")
            .with_options(HashMap::from([(
                "scan_interval".to_string(),
                json!(30),
            )]));

        let json = serde_json::to_string(&entry).unwrap();
        let parsed: ConfigEntry = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.domain, "visonicalarm");
        assert_eq!(parsed.title, "123ABC");
        assert_eq!(parsed.unique_id, Some("user@example.com-123ABC".to_string()));
        assert_eq!(parsed.options.get("scan_interval"), Some(&json!(30)));
    }
}
