//! Render Configuration

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::doctype::{Doctype, Serialization};
use crate::emit::EmitError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderConfig {
    #[serde(default)]
    pub doctype: Doctype,
    #[serde(default)]
    pub serialization: Serialization,
    #[serde(default)]
    pub deprecation: DeprecationPolicy,
}

/// How deprecated attributes are reported. No policy blocks emission.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeprecationPolicy {
    #[default]
    Warn,
    Log,
    Ignore,
}

impl RenderConfig {
    pub fn new(doctype: Doctype) -> Self {
        Self {
            doctype,
            ..Self::default()
        }
    }

    pub fn with_serialization(mut self, serialization: Serialization) -> Self {
        self.serialization = serialization;
        self
    }

    pub fn with_deprecation(mut self, deprecation: DeprecationPolicy) -> Self {
        self.deprecation = deprecation;
        self
    }

    pub fn from_json(json: &str) -> Result<Self, EmitError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, EmitError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}
