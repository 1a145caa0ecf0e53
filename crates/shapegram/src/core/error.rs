//! Core error types for diagram composition
//!
//! This module defines the error kinds raised while loading inputs,
//! composing the diagram model, laying it out and rendering it.

use thiserror::Error;

/// Core error types for diagram composition
#[derive(Error, Debug)]
pub enum DiagramError {
    #[error("Config error: {message}")]
    ConfigError { message: String },

    #[error("Unresolvable reference: {uri} ({message})")]
    UnresolvableReference { uri: String, message: String },

    #[error("Model inconsistency: {message}")]
    ModelInconsistency { message: String },

    #[error("Schema error: {message}")]
    SchemaError { message: String },

    #[error("Definition error: {message}")]
    DefinitionError { message: String },

    #[error("Layout error: {message}")]
    LayoutError { message: String },

    #[error("Render error: {message}")]
    RenderError { message: String },

    #[error("IO error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },
}

impl DiagramError {
    /// Create a new configuration error
    pub fn config_error(message: String) -> Self {
        Self::ConfigError { message }
    }

    /// Create a new unresolvable reference error
    pub fn unresolvable_reference(uri: String, message: String) -> Self {
        Self::UnresolvableReference { uri, message }
    }

    /// Create a new model inconsistency error
    pub fn model_inconsistency(message: String) -> Self {
        Self::ModelInconsistency { message }
    }

    /// Create a new schema error
    pub fn schema_error(message: String) -> Self {
        Self::SchemaError { message }
    }

    /// Create a new definition error
    pub fn definition_error(message: String) -> Self {
        Self::DefinitionError { message }
    }

    /// Create a new layout error
    pub fn layout_error(message: String) -> Self {
        Self::LayoutError { message }
    }

    /// Create a new render error
    pub fn render_error(message: String) -> Self {
        Self::RenderError { message }
    }

    /// Whether composition can continue after this error
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::UnresolvableReference { .. })
    }
}
