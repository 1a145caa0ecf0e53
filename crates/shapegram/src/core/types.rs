//! Core type definitions shared by the model, layout and render layers
//!
//! Edge directions produced by the layout engine and the style classes
//! assigned to nodes and links.

use serde::Serialize;
use std::fmt;

/// Compass direction hint for a drawn edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkDirection {
    Left,
    Right,
    Up,
    Down,
}

impl LinkDirection {
    /// Single-letter code used inside PlantUML arrows
    pub fn code(self) -> &'static str {
        match self {
            LinkDirection::Left => "l",
            LinkDirection::Right => "r",
            LinkDirection::Up => "u",
            LinkDirection::Down => "d",
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            LinkDirection::Left => LinkDirection::Right,
            LinkDirection::Right => LinkDirection::Left,
            LinkDirection::Up => LinkDirection::Down,
            LinkDirection::Down => LinkDirection::Up,
        }
    }

    /// Code for an optional direction; no direction renders as ""
    pub fn code_or_empty(direction: Option<Self>) -> &'static str {
        direction.map(Self::code).unwrap_or("")
    }
}

impl fmt::Display for LinkDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Visual style class of a node or an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StyleClass {
    ProperClass,
    ShapeSpecificClass,
    ProperOutLink,
    ShapeSpecificOutLink,
    ShapeSpecificInLink,
    SuperClassLink,
    IndirectSuperClassLink,
    ForbiddenLink,
}

impl StyleClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            StyleClass::ProperClass => "proper-class",
            StyleClass::ShapeSpecificClass => "shape-specific-class",
            StyleClass::ProperOutLink => "proper-out-link",
            StyleClass::ShapeSpecificOutLink => "shape-specific-out-link",
            StyleClass::ShapeSpecificInLink => "shape-specific-in-link",
            StyleClass::SuperClassLink => "superclass-link",
            StyleClass::IndirectSuperClassLink => "indirect-superclass-link",
            StyleClass::ForbiddenLink => "forbidden-link",
        }
    }

    /// Style of a property link
    ///
    /// Forbidden wins over a shape-specific target, which wins over a
    /// shape-specific source.
    pub fn for_property_link(
        forbidden: bool,
        source_shape_specific: bool,
        target_shape_specific: bool,
    ) -> Self {
        if forbidden {
            StyleClass::ForbiddenLink
        } else if target_shape_specific {
            StyleClass::ShapeSpecificInLink
        } else if source_shape_specific {
            StyleClass::ShapeSpecificOutLink
        } else {
            StyleClass::ProperOutLink
        }
    }
}

impl fmt::Display for StyleClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
