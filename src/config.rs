//! Configuration for a tee buffer.

use serde::{Deserialize, Serialize};

/// When the bulk write path hands control to the GUI event loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PumpPolicy {
    /// Process pending events after every completed line
    #[default]
    EveryLine,
    /// Never process events from inside a write
    Never,
}

impl PumpPolicy {
    /// Parse a policy from a string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "every_line" | "every-line" => Some(PumpPolicy::EveryLine),
            "never" => Some(PumpPolicy::Never),
            _ => None,
        }
    }
}

/// Settings applied when a tee is created.
///
/// Hosts usually embed this in their own settings file:
///
/// ```rust,ignore
/// let cfg: TeeConfig = serde_json::from_str(r#"{"label": "stderr", "pump": "never"}"#)?;
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeeConfig {
    /// Identifier used in error messages and trace events
    #[serde(default = "default_label")]
    pub label: String,
    /// Event pump policy for the bulk write path
    #[serde(default)]
    pub pump: PumpPolicy,
}

fn default_label() -> String {
    "tee".into()
}

impl Default for TeeConfig {
    fn default() -> Self {
        Self {
            label: default_label(),
            pump: PumpPolicy::default(),
        }
    }
}

impl TeeConfig {
    /// Create a config with the given label and default policies.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    /// Set the event pump policy.
    pub fn with_pump(mut self, pump: PumpPolicy) -> Self {
        self.pump = pump;
        self
    }
}
