//! Core renderer trait for diagram output
//!
//! Renderers turn a [`crate::render::DiagramView`] into a concrete output
//! format (PlantUML source, JSON, ...).

use anyhow::Result;

use crate::render::DiagramView;

/// Core trait for diagram renderers
///
/// # Example
/// ```
/// use shapegram::core::Renderer;
/// use shapegram::render::{DiagramView, PlantUmlRenderer};
///
/// let renderer = PlantUmlRenderer::new();
/// let output = renderer.render(&DiagramView::default()).unwrap();
/// assert!(output.starts_with("@startuml"));
/// ```
pub trait Renderer: Send + Sync {
    /// The output type of this renderer
    type Output;

    /// Render the diagram view into the output format
    fn render(&self, view: &DiagramView) -> Result<Self::Output>;

    /// Get the name of this renderer
    fn name(&self) -> &'static str;

    /// Get the version of this renderer
    fn version(&self) -> &'static str;

    /// Get the supported output format
    fn format(&self) -> &'static str;
}
