//! Displayed properties
//!
//! A [`PropertyOccurrence`] is derived from one property shape and all
//! shapes related to it. Lower bounds take the maximum over all sources,
//! upper bounds the minimum. Without any source a bound stays unset,
//! which reads as optional and repeatable.

use std::collections::BTreeSet;

use crate::definition::PropertyFilter;
use crate::schema::ShapeId;

use super::relations::ShapeResolver;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyOccurrence {
    pub shape: ShapeId,
    pub label: String,
    /// Predicates mentioned by the path
    pub predicates: Vec<String>,
    pub inverse: bool,
    pub min_count: Option<u32>,
    pub max_count: Option<u32>,
    pub objects: BTreeSet<String>,
    /// Some related shape carries a qualified value shape
    pub qualified: bool,
}

impl PropertyOccurrence {
    /// Derive the occurrence backed by property shape `id`
    ///
    /// With `display_uri` predicates are labelled by their prefixed short
    /// form instead of their schema label.
    pub fn derive(resolver: &ShapeResolver<'_>, id: &ShapeId, display_uri: bool) -> Self {
        let graph = resolver.graph();
        let related: Vec<_> = resolver
            .related_shapes(id)
            .iter()
            .filter_map(|related| resolver.shape(related))
            .collect();

        let min_count = related
            .iter()
            .filter_map(|shape| shape.min_count.or(shape.qualified_min_count))
            .max();
        let max_count = related
            .iter()
            .filter_map(|shape| shape.max_count.or(shape.qualified_max_count))
            .min();
        let qualified = related
            .iter()
            .any(|shape| !shape.qualified_value_shapes.is_empty());

        let path = resolver.shape(id).and_then(|shape| shape.path.as_ref());
        let label = match path {
            Some(path) => path.render(&|uri: &str| {
                if display_uri {
                    graph.short_form(uri)
                } else {
                    graph.display_label(uri)
                }
            }),
            None => id.local_name().unwrap_or("[]").to_string(),
        };

        Self {
            shape: id.clone(),
            label,
            predicates: path
                .map(|p| p.predicates().into_iter().map(String::from).collect())
                .unwrap_or_default(),
            inverse: path.is_some_and(|p| p.is_inverse()),
            min_count,
            max_count,
            objects: resolver.objects(id),
            qualified,
        }
    }

    pub fn is_required(&self) -> bool {
        self.min_count.is_some_and(|min| min > 0)
    }

    pub fn is_multi_valued(&self) -> bool {
        self.max_count.map_or(true, |max| max > 1)
    }

    pub fn is_forbidden(&self) -> bool {
        self.max_count == Some(0)
    }

    pub fn has_objects(&self) -> bool {
        !self.objects.is_empty()
    }

    /// Whether the path passes a predicate filter
    pub fn admits(&self, filter: &PropertyFilter) -> bool {
        filter.admits(self.predicates.iter().map(String::as_str))
    }

    /// Cardinality text, e.g. `0..1` or `1..* (+)`
    pub fn cardinality(&self) -> String {
        let base = if self.is_forbidden() {
            "0"
        } else if self.is_multi_valued() {
            if self.is_required() {
                "1..*"
            } else {
                "*"
            }
        } else if self.is_required() {
            "1"
        } else {
            "0..1"
        };
        if self.qualified {
            format!("{} (+)", base)
        } else {
            base.to_string()
        }
    }

    /// PlantUML member icon
    pub fn icon(&self) -> String {
        if self.is_forbidden() {
            return "-{method}".to_string();
        }
        let kind = if self.is_required() { "{method}" } else { "{field}" };
        let visibility = if self.is_multi_valued() { "#" } else { "+" };
        format!("{}{}", kind, visibility)
    }

    /// Stable ordering key
    pub fn sort_key(&self) -> (&str, &ShapeId) {
        (&self.label, &self.shape)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{MemorySchema, PropertyPath, Shape};

    fn occurrence(min: Option<u32>, max: Option<u32>, qualified: bool) -> PropertyOccurrence {
        PropertyOccurrence {
            shape: ShapeId::blank("p"),
            label: "p".to_string(),
            predicates: vec!["ex:p".to_string()],
            inverse: false,
            min_count: min,
            max_count: max,
            objects: BTreeSet::new(),
            qualified,
        }
    }

    #[test]
    fn test_cardinality_text() {
        assert_eq!(occurrence(None, None, false).cardinality(), "*");
        assert_eq!(occurrence(Some(1), None, false).cardinality(), "1..*");
        assert_eq!(occurrence(Some(1), Some(1), false).cardinality(), "1");
        assert_eq!(occurrence(None, Some(1), false).cardinality(), "0..1");
        assert_eq!(occurrence(Some(0), Some(0), false).cardinality(), "0");
        assert_eq!(occurrence(Some(2), Some(5), true).cardinality(), "1..* (+)");
    }

    #[test]
    fn test_icons() {
        assert_eq!(occurrence(None, Some(0), false).icon(), "-{method}");
        assert_eq!(occurrence(Some(1), Some(1), false).icon(), "{method}+");
        assert_eq!(occurrence(None, None, false).icon(), "{field}#");
    }

    #[test]
    fn test_bounds_reconcile_over_related_shapes() {
        let schema = MemorySchema::new()
            .with_label("ex:p", "has p")
            .with_shape(
                Shape::new(ShapeId::blank("p"))
                    .with_path(PropertyPath::inverse(PropertyPath::predicate("ex:p")))
                    .with_min_count(1)
                    .with_max_count(3)
                    .with_qualified_value_shape(ShapeId::blank("q")),
            )
            .with_shape(
                Shape::new(ShapeId::blank("q"))
                    .with_qualified_min_count(2)
                    .with_qualified_max_count(1)
                    .with_class("ex:Thing"),
            );
        let resolver = ShapeResolver::new(&schema);
        let derived = PropertyOccurrence::derive(&resolver, &ShapeId::blank("p"), false);

        assert_eq!(derived.min_count, Some(2));
        assert_eq!(derived.max_count, Some(1));
        assert!(derived.qualified);
        assert!(derived.inverse);
        assert_eq!(derived.label, "^ has p");
        assert_eq!(derived.objects, BTreeSet::from(["ex:Thing".to_string()]));
        assert_eq!(derived.cardinality(), "1 (+)");
    }
}
