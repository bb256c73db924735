//! Tunables for extraction and filling

use serde::{Deserialize, Serialize};

use crate::error::{AutofillError, Result};

/// Configuration passed in from the host as JSON.
/// Every field is optional; missing fields keep their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutofillConfig {
    /// Input types that carry no user data and never reach the manifest
    pub excluded_input_types: Vec<String>,
    /// Deepest heading level (h1..hN) treated as a section caption
    pub max_heading_level: u8,
    /// String values that check a checkbox (compared case sensitively)
    pub checkbox_truthy_values: Vec<String>,
}

impl Default for AutofillConfig {
    fn default() -> Self {
        Self {
            excluded_input_types: ["submit", "button", "reset", "image", "hidden"]
                .into_iter()
                .map(String::from)
                .collect(),
            max_heading_level: 3,
            checkbox_truthy_values: ["true", "1", "on"].into_iter().map(String::from).collect(),
        }
    }
}

impl AutofillConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(AutofillError::MalformedConfig)
    }

    pub fn is_excluded(&self, control_type: &str) -> bool {
        self.excluded_input_types
            .iter()
            .any(|t| t.eq_ignore_ascii_case(control_type))
    }

    pub fn is_heading_level(&self, level: u8) -> bool {
        (1..=self.max_heading_level).contains(&level)
    }
}
