//! Diagram configuration documents

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::DiagramError;
use crate::layout::LayoutConfig;

use super::style::StyleConfig;

/// Style and layout settings, e.g.
///
/// ```yaml
/// style:
///   properClass: "#line:gray"
/// layout:
///   seed: 42
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DiagramConfig {
    pub style: StyleConfig,
    pub layout: LayoutConfig,
}

impl DiagramConfig {
    pub fn from_yaml_str(input: &str) -> Result<Self, DiagramError> {
        if input.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(input)
            .map_err(|e| DiagramError::config_error(format!("Invalid diagram config: {}", e)))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DiagramError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Loading diagram config");
        let input = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&input)
    }
}
