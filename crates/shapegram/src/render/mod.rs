//! Diagram output
//!
//! A [`DiagramView`] is built from a composed diagram and its layout, then
//! handed to one of the renderers.

pub mod config;
pub mod json;
pub mod plantuml;
pub mod style;
pub mod view;

pub use config::DiagramConfig;
pub use json::JsonRenderer;
pub use plantuml::PlantUmlRenderer;
pub use style::StyleConfig;
pub use view::{AttributeView, DiagramView, LinkView, NodeView, SuperLinkView};
