//! JSON output of the diagram view

use anyhow::Result;

use crate::core::Renderer;

use super::view::DiagramView;

#[derive(Debug, Clone)]
pub struct JsonRenderer {
    pretty: bool,
}

impl JsonRenderer {
    pub fn new() -> Self {
        Self { pretty: true }
    }

    pub fn compact() -> Self {
        Self { pretty: false }
    }
}

impl Default for JsonRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for JsonRenderer {
    type Output = String;

    fn render(&self, view: &DiagramView) -> Result<Self::Output> {
        let output = if self.pretty {
            serde_json::to_string_pretty(view)?
        } else {
            serde_json::to_string(view)?
        };
        Ok(output)
    }

    fn name(&self) -> &'static str {
        "json"
    }

    fn version(&self) -> &'static str {
        "1.0.0"
    }

    fn format(&self) -> &'static str {
        "json"
    }
}
