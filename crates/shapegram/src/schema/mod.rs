//! Schema graph implementation and loaders

mod document;
mod memory;
mod path;
mod shape;

pub use document::*;
pub use memory::*;
pub use path::*;
pub use shape::*;
