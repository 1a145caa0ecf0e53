//! Schema graph access
//!
//! The composer only sees the class hierarchy and the shapes through this
//! trait. [`crate::schema::MemorySchema`] is the bundled implementation.

use std::collections::BTreeSet;

use crate::schema::{Shape, ShapeId};

/// Whether a hierarchy query returns direct neighbours or the full closure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reach {
    Direct,
    Transitive,
}

/// Shape-to-shape references
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeLink {
    QualifiedValueShape,
    Node,
    And,
    Or,
    Xone,
    Property,
}

impl ShapeLink {
    /// Links that nest one shape inside another; `sh:property` is not one of them
    pub const NESTING: [ShapeLink; 5] = [
        ShapeLink::QualifiedValueShape,
        ShapeLink::Node,
        ShapeLink::And,
        ShapeLink::Or,
        ShapeLink::Xone,
    ];
}

/// Read access to a class hierarchy plus its constraint shapes
pub trait SchemaGraph {
    /// Whether `uri` names a class of the vocabulary
    fn has_class(&self, uri: &str) -> bool;

    fn super_classes(&self, uri: &str, reach: Reach) -> BTreeSet<String>;

    fn sub_classes(&self, uri: &str, reach: Reach) -> BTreeSet<String>;

    /// Human label of a resource (`skos:prefLabel`, then `rdfs:label`)
    fn label(&self, uri: &str) -> Option<String>;

    /// Expand a prefixed name; anything else is returned unchanged
    fn expand_prefix(&self, value: &str) -> String;

    /// Prefixed short form of a URI; unchanged when no prefix matches
    fn short_form(&self, uri: &str) -> String;

    /// All shape ids, sorted
    fn shape_ids(&self) -> Vec<ShapeId>;

    fn shape(&self, id: &ShapeId) -> Option<&Shape>;

    /// Shapes pointing at `id` through `link`, sorted
    fn referrers(&self, id: &ShapeId, link: ShapeLink) -> Vec<ShapeId>;

    /// Shapes declaring `uri` as `sh:targetClass` or `sh:class`
    fn shapes_for_class(&self, uri: &str) -> Vec<ShapeId> {
        self.shape_ids()
            .into_iter()
            .filter(|id| {
                self.shape(id).is_some_and(|shape| {
                    shape.target_classes.iter().any(|c| c == uri)
                        || shape.classes.iter().any(|c| c == uri)
                })
            })
            .collect()
    }

    /// Label with the local name and then the URI itself as fallbacks
    fn display_label(&self, uri: &str) -> String {
        self.label(uri).unwrap_or_else(|| {
            let name = local_name(uri);
            if name.is_empty() {
                uri.to_string()
            } else {
                name.to_string()
            }
        })
    }
}

/// Part of a URI after the last `#`, `/` or `:`
pub fn local_name(uri: &str) -> &str {
    uri.rsplit(&['#', '/', ':'][..]).next().unwrap_or(uri)
}
