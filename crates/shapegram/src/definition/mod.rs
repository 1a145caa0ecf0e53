//! Diagram definitions: which classes to show and how

mod document;
mod tree;

pub use document::*;
pub use tree::*;
