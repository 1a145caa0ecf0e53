//! Diagram definition documents
//!
//! ```yaml
//! name: People
//! expandSuperClasses: true        # root settings
//! listedClasses:                  # defaults for listed classes
//!   hideSuperClassStereotypes: true
//! expandedClasses:                # defaults for classes reached by expansion
//!   hideInnerProperties: true
//! classes:
//!   - uri: ex:Person
//!     expandOutLinks: true
//!     onlyOutLinks: [ex:worksAt]
//! ```

use std::path::Path;

use serde::Deserialize;
use tracing::{debug, span, Level};

use crate::core::{DiagramError, SchemaGraph};

use super::tree::{DefinitionRegistry, DefinitionSettings};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefinitionDocument {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(flatten)]
    pub settings: DefinitionSettings,
    #[serde(default)]
    pub listed_classes: DefinitionSettings,
    #[serde(default)]
    pub expanded_classes: DefinitionSettings,
    #[serde(default)]
    pub classes: Vec<ClassDefinition>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassDefinition {
    #[serde(default)]
    pub uri: String,
    #[serde(flatten)]
    pub settings: DefinitionSettings,
}

impl DefinitionDocument {
    pub fn from_yaml_str(input: &str) -> Result<Self, DiagramError> {
        if input.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(input).map_err(|e| {
            DiagramError::definition_error(format!("Invalid diagram definition: {}", e))
        })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DiagramError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Build and validate the definition registry
    ///
    /// Prefixed names are expanded against the graph. Listed classes the
    /// graph does not know are dropped with a warning.
    pub fn into_registry(self, graph: &dyn SchemaGraph) -> Result<DefinitionRegistry, DiagramError> {
        let span = span!(Level::INFO, "load_definition", classes = self.classes.len());
        let _enter = span.enter();

        let mut registry = DefinitionRegistry::new();
        registry.set_name(self.name);

        let groups = [
            (registry.root(), self.settings),
            (registry.listed_group(), self.listed_classes),
            (registry.expanded_group(), self.expanded_classes),
        ];
        for (id, mut settings) in groups {
            settings.expand_uris(graph);
            *registry.settings_mut(id) = settings;
        }

        for class in self.classes {
            if class.uri.trim().is_empty() {
                return Err(DiagramError::config_error(
                    "required definition field missing: every class entry needs a uri".to_string(),
                ));
            }
            let uri = graph.expand_prefix(class.uri.trim());
            let id = registry.listed_class(&uri);
            let mut settings = class.settings;
            settings.expand_uris(graph);
            *registry.settings_mut(id) = settings;
        }

        let recovered = registry.validate(graph)?;
        debug!(
            listed = registry.listed_classes().len(),
            dropped = recovered.len(),
            "Loaded diagram definition"
        );
        Ok(registry)
    }
}
