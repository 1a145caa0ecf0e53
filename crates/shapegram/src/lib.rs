//! Shapegram - class diagrams from SHACL shapes
//!
//! Composes a class diagram out of a class hierarchy, the SHACL shapes
//! constraining it and a diagram definition that says which classes to show
//! and how far to expand from them. Classes that a shape narrows beyond
//! plain membership appear as separate shape-specific variants.
//!
//! # Quick Start
//!
//! ```rust
//! let schema = r#"
//! prefixes:
//!   ex: http://example.org/
//! classes:
//!   - uri: ex:Person
//!   - uri: ex:Organization
//! shapes:
//!   - id: ex:PersonShape
//!     targetClass: ex:Person
//!     property:
//!       - path: ex:worksAt
//!         class: ex:Organization
//! "#;
//!
//! let plantuml = shapegram::render_plantuml(schema, None).unwrap();
//! assert!(plantuml.contains("class \"Person\""));
//! ```
//!
//! # Advanced Usage
//!
//! ```rust
//! use shapegram::prelude::*;
//!
//! let schema = SchemaDocument::from_yaml_str("classes: [{uri: ex:A}]")
//!     .unwrap()
//!     .into_schema()
//!     .unwrap();
//! let mut registry = DefinitionRegistry::new();
//! registry.listed_class("ex:A");
//!
//! let diagram = DiagramComposer::new().compose(&schema, &mut registry).unwrap();
//! let layout = GraphLayout::new(LayoutConfig::default()).layout(&diagram).unwrap();
//! let view = DiagramView::build(&diagram, &layout);
//! let output = PlantUmlRenderer::new().render(&view).unwrap();
//! assert!(output.contains("as n0"));
//! ```

pub mod core;
pub mod definition;
pub mod layout;
pub mod model;
pub mod render;
pub mod schema;

pub use core::*;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{
        DiagramError, LayoutAlgorithm, LinkDirection, Reach, Renderer, SchemaGraph, ShapeLink,
        StyleClass,
    };
    pub use crate::definition::{DefinitionDocument, DefinitionRegistry, Flag};
    pub use crate::layout::{GraphLayout, LayoutConfig, LayoutResult};
    pub use crate::model::{ClassNode, Diagram, DiagramComposer, PropertyOccurrence};
    pub use crate::render::{DiagramConfig, DiagramView, JsonRenderer, PlantUmlRenderer, StyleConfig};
    pub use crate::schema::{MemorySchema, PropertyPath, SchemaDocument, Shape, ShapeId};
}

/// Load both documents and compose the diagram
///
/// Without a definition every class targeted by a shape is listed and
/// out-links are expanded.
pub fn compose(schema_yaml: &str, definition_yaml: Option<&str>) -> Result<model::Diagram, DiagramError> {
    let schema = schema::SchemaDocument::from_yaml_str(schema_yaml)?.into_schema()?;
    let definition = match definition_yaml {
        Some(input) => definition::DefinitionDocument::from_yaml_str(input)?,
        None => definition::DefinitionDocument::default(),
    };
    let mut registry = definition.into_registry(&schema)?;
    model::DiagramComposer::new().compose(&schema, &mut registry)
}

/// Compose, lay out and render to PlantUML with the default config
///
/// # Example
/// ```rust
/// let output = shapegram::render_plantuml("classes: [{uri: ex:A}]", Some("classes: [{uri: ex:A}]")).unwrap();
/// assert!(output.starts_with("@startuml"));
/// ```
pub fn render_plantuml(schema_yaml: &str, definition_yaml: Option<&str>) -> anyhow::Result<String> {
    render_plantuml_with_config(schema_yaml, definition_yaml, &render::DiagramConfig::default())
}

/// Compose, lay out and render to PlantUML
pub fn render_plantuml_with_config(
    schema_yaml: &str,
    definition_yaml: Option<&str>,
    config: &render::DiagramConfig,
) -> anyhow::Result<String> {
    use crate::core::{LayoutAlgorithm as _, Renderer as _};

    let diagram = compose(schema_yaml, definition_yaml)?;
    let layout = layout::GraphLayout::new(config.layout.clone()).layout(&diagram)?;
    let view = render::DiagramView::build(&diagram, &layout);
    render::PlantUmlRenderer::with_style(config.style.clone()).render(&view)
}
