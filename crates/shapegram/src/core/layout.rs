//! Core layout trait for diagram positioning

use anyhow::Result;

use crate::model::Diagram;

/// Core trait for layout algorithms
///
/// A layout algorithm places the included nodes of a composed [`Diagram`]
/// and answers direction queries for its edges.
pub trait LayoutAlgorithm: Send + Sync {
    /// The output type of this layout algorithm
    type Output;

    /// Arrange the nodes of the diagram
    fn layout(&self, diagram: &Diagram) -> Result<Self::Output>;

    /// Get the name of this layout algorithm
    fn name(&self) -> &'static str;

    /// Get the version of this layout algorithm
    fn version(&self) -> &'static str;
}
