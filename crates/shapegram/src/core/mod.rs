//! Core abstractions for diagram composition
//!
//! Error kinds, logging setup, schema graph access and the traits the
//! layout and render stages implement.

mod error;
mod layout;
pub mod logging;
mod renderer;
mod schema;
mod types;

pub use error::*;
pub use layout::*;
pub use logging::*;
pub use renderer::*;
pub use schema::*;
pub use types::*;
