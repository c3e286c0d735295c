//! Session configuration.

use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};

/// Settings of one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Name of the keyspace the session works on.
    pub keyspace: String,
    /// First identifier handed out by the default allocator.
    pub first_concept_id: u64,
    /// Longest label accepted, in characters.
    pub max_label_len: usize,
    /// Run key cardinality checks at commit.
    pub validate_on_commit: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            keyspace: "default".to_string(),
            first_concept_id: 1,
            max_label_len: 256,
            validate_on_commit: true,
        }
    }
}

impl SessionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_keyspace(mut self, keyspace: impl Into<String>) -> Self {
        self.keyspace = keyspace.into();
        self
    }

    pub fn with_first_concept_id(mut self, id: u64) -> Self {
        self.first_concept_id = id;
        self
    }

    pub fn with_max_label_len(mut self, len: usize) -> Self {
        self.max_label_len = len;
        self
    }

    pub fn with_validate_on_commit(mut self, enabled: bool) -> Self {
        self.validate_on_commit = enabled;
        self
    }

    /// Small limits for tests.
    pub fn testing() -> Self {
        Self {
            keyspace: "test".to_string(),
            first_concept_id: 1,
            max_label_len: 64,
            validate_on_commit: true,
        }
    }

    /// Parse a configuration; missing fields keep their defaults.
    pub fn from_json(input: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.keyspace.is_empty() {
            return Err(ConfigError::invalid("keyspace", "cannot be empty"));
        }
        if self.first_concept_id == 0 {
            return Err(ConfigError::invalid("first_concept_id", "must be positive"));
        }
        if self.max_label_len == 0 {
            return Err(ConfigError::invalid("max_label_len", "must be positive"));
        }
        Ok(())
    }
}
