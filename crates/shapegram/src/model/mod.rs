//! Diagram model
//!
//! Turns a schema graph plus a definition registry into a [`Diagram`]:
//! the closed set of class nodes with their bound views.

pub mod composer;
pub mod diagram;
pub mod node;
pub mod overlay;
pub mod property;
pub mod relations;

pub use composer::DiagramComposer;
pub use diagram::Diagram;
pub use node::{compose_label, compose_uri, decompose_uri, is_shape_specific, ClassNode, NodeKind, NodeViews};
pub use overlay::{SchemaOverlay, SyntheticClass};
pub use property::PropertyOccurrence;
pub use relations::ShapeResolver;
