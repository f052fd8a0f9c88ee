use crate::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolbarConfig {
    pub read_only: bool,
    pub hide_toolbar: bool,
    pub mobile_breakpoint: f32,
    pub rebuild_timeout_ms: u64,
    pub messages: HashMap<String, String>,
}

impl Default for ToolbarConfig {
    fn default() -> Self {
        Self {
            read_only: false,
            hide_toolbar: false,
            mobile_breakpoint: 650.0,
            rebuild_timeout_ms: 2000,
            messages: HashMap::new(),
        }
    }
}

impl ToolbarConfig {
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn rebuild_timeout(&self) -> Duration {
        Duration::from_millis(self.rebuild_timeout_ms)
    }

    pub fn message<'a>(&'a self, key: &'a str) -> &'a str {
        self.messages.get(key).map(String::as_str).unwrap_or(key)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !self.mobile_breakpoint.is_finite() || self.mobile_breakpoint < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "mobile_breakpoint must be a non-negative number, got {}",
                self.mobile_breakpoint
            )));
        }
        Ok(())
    }
}
