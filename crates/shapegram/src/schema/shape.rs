//! Shape records
//!
//! A [`Shape`] holds the subset of SHACL constraint components that the
//! diagram composer reads.

use std::fmt;

use crate::core::{local_name, ShapeLink};

/// Shape excluded from every relation walk
pub const PLACEHOLDER_SHAPE: &str = "http://purl.allotrope.org/shape/AFS_0000001";

/// Identity of a shape: a named IRI or a blank node label
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ShapeId {
    Iri(String),
    Blank(String),
}

impl ShapeId {
    pub fn iri(value: impl Into<String>) -> Self {
        ShapeId::Iri(value.into())
    }

    pub fn blank(value: impl Into<String>) -> Self {
        ShapeId::Blank(value.into())
    }

    /// Local name of a named shape; blank nodes have none
    pub fn local_name(&self) -> Option<&str> {
        match self {
            ShapeId::Iri(iri) => Some(local_name(iri)).filter(|name| !name.is_empty()),
            ShapeId::Blank(_) => None,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, ShapeId::Iri(iri) if iri == PLACEHOLDER_SHAPE)
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, ShapeId::Blank(_))
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeId::Iri(iri) => write!(f, "{}", iri),
            ShapeId::Blank(id) => write!(f, "_:{}", id),
        }
    }
}

/// SHACL property path, limited to predicates, inverses and alternatives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyPath {
    Predicate(String),
    Inverse(Box<PropertyPath>),
    Alternative(Vec<PropertyPath>),
}

impl PropertyPath {
    pub fn predicate(uri: impl Into<String>) -> Self {
        PropertyPath::Predicate(uri.into())
    }

    pub fn inverse(path: PropertyPath) -> Self {
        PropertyPath::Inverse(Box::new(path))
    }

    pub fn is_inverse(&self) -> bool {
        matches!(self, PropertyPath::Inverse(_))
    }

    /// Every predicate URI mentioned by the path
    pub fn predicates(&self) -> Vec<&str> {
        match self {
            PropertyPath::Predicate(uri) => vec![uri.as_str()],
            PropertyPath::Inverse(inner) => inner.predicates(),
            PropertyPath::Alternative(paths) => paths.iter().flat_map(|p| p.predicates()).collect(),
        }
    }

    /// Render the path, labelling each predicate with `label`
    pub fn render(&self, label: &dyn Fn(&str) -> String) -> String {
        match self {
            PropertyPath::Predicate(uri) => label(uri),
            PropertyPath::Inverse(inner) => format!("^ {}", inner.render(label)),
            PropertyPath::Alternative(paths) => paths
                .iter()
                .map(|p| p.render(label))
                .collect::<Vec<_>>()
                .join(" | "),
        }
    }

    /// Apply `f` to every predicate URI
    pub fn map_predicates(self, f: &dyn Fn(String) -> String) -> Self {
        match self {
            PropertyPath::Predicate(uri) => PropertyPath::Predicate(f(uri)),
            PropertyPath::Inverse(inner) => PropertyPath::inverse(inner.map_predicates(f)),
            PropertyPath::Alternative(paths) => {
                PropertyPath::Alternative(paths.into_iter().map(|p| p.map_predicates(f)).collect())
            }
        }
    }
}

/// A node or property shape
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub id: ShapeId,
    /// Declared `rdf:type sh:PropertyShape`
    pub declared_property_shape: bool,
    pub path: Option<PropertyPath>,
    pub target_classes: Vec<String>,
    pub classes: Vec<String>,
    pub datatypes: Vec<String>,
    pub has_values: Vec<String>,
    pub properties: Vec<ShapeId>,
    pub nodes: Vec<ShapeId>,
    pub qualified_value_shapes: Vec<ShapeId>,
    pub and: Vec<ShapeId>,
    pub or: Vec<ShapeId>,
    pub xone: Vec<ShapeId>,
    pub min_count: Option<u32>,
    pub max_count: Option<u32>,
    pub qualified_min_count: Option<u32>,
    pub qualified_max_count: Option<u32>,
    pub patterns: Vec<String>,
    pub sparql: Vec<String>,
}

impl Shape {
    pub fn new(id: ShapeId) -> Self {
        Self {
            id,
            declared_property_shape: false,
            path: None,
            target_classes: Vec::new(),
            classes: Vec::new(),
            datatypes: Vec::new(),
            has_values: Vec::new(),
            properties: Vec::new(),
            nodes: Vec::new(),
            qualified_value_shapes: Vec::new(),
            and: Vec::new(),
            or: Vec::new(),
            xone: Vec::new(),
            min_count: None,
            max_count: None,
            qualified_min_count: None,
            qualified_max_count: None,
            patterns: Vec::new(),
            sparql: Vec::new(),
        }
    }

    pub fn with_path(mut self, path: PropertyPath) -> Self {
        self.path = Some(path);
        self
    }

    pub fn with_target_class(mut self, uri: impl Into<String>) -> Self {
        self.target_classes.push(uri.into());
        self
    }

    pub fn with_class(mut self, uri: impl Into<String>) -> Self {
        self.classes.push(uri.into());
        self
    }

    pub fn with_datatype(mut self, uri: impl Into<String>) -> Self {
        self.datatypes.push(uri.into());
        self
    }

    pub fn with_has_value(mut self, value: impl Into<String>) -> Self {
        self.has_values.push(value.into());
        self
    }

    pub fn with_property(mut self, id: ShapeId) -> Self {
        self.properties.push(id);
        self
    }

    pub fn with_node(mut self, id: ShapeId) -> Self {
        self.nodes.push(id);
        self
    }

    pub fn with_qualified_value_shape(mut self, id: ShapeId) -> Self {
        self.qualified_value_shapes.push(id);
        self
    }

    pub fn with_and(mut self, ids: impl IntoIterator<Item = ShapeId>) -> Self {
        self.and.extend(ids);
        self
    }

    pub fn with_or(mut self, ids: impl IntoIterator<Item = ShapeId>) -> Self {
        self.or.extend(ids);
        self
    }

    pub fn with_xone(mut self, ids: impl IntoIterator<Item = ShapeId>) -> Self {
        self.xone.extend(ids);
        self
    }

    pub fn with_min_count(mut self, count: u32) -> Self {
        self.min_count = Some(count);
        self
    }

    pub fn with_max_count(mut self, count: u32) -> Self {
        self.max_count = Some(count);
        self
    }

    pub fn with_qualified_min_count(mut self, count: u32) -> Self {
        self.qualified_min_count = Some(count);
        self
    }

    pub fn with_qualified_max_count(mut self, count: u32) -> Self {
        self.qualified_max_count = Some(count);
        self
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.patterns.push(pattern.into());
        self
    }

    pub fn with_sparql(mut self, query: impl Into<String>) -> Self {
        self.sparql.push(query.into());
        self
    }

    pub fn as_property_shape(mut self) -> Self {
        self.declared_property_shape = true;
        self
    }

    /// Property shapes are declared as such or carry a path
    pub fn is_property_shape(&self) -> bool {
        self.declared_property_shape || self.path.is_some()
    }

    /// Whether the shape names a class, datatype or value
    pub fn has_object(&self) -> bool {
        !self.classes.is_empty()
            || !self.target_classes.is_empty()
            || !self.datatypes.is_empty()
            || !self.has_values.is_empty()
    }

    /// Constraints beyond plain class membership
    pub fn has_use_case_constraints(&self) -> bool {
        !self.sparql.is_empty() || !self.properties.is_empty() || !self.patterns.is_empty()
    }

    /// Shapes referenced through `link`
    pub fn links(&self, link: ShapeLink) -> &[ShapeId] {
        match link {
            ShapeLink::QualifiedValueShape => &self.qualified_value_shapes,
            ShapeLink::Node => &self.nodes,
            ShapeLink::And => &self.and,
            ShapeLink::Or => &self.or,
            ShapeLink::Xone => &self.xone,
            ShapeLink::Property => &self.properties,
        }
    }
}
