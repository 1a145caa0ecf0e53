//! In-memory schema graph
//!
//! Holds a prefix mapping, classes with their direct superclasses,
//! resource labels and shapes. Hierarchy closures are computed on demand
//! with a breadth-first walk, so cyclic `subClassOf` data terminates.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use tracing::trace;

use crate::core::{Reach, SchemaGraph, ShapeLink};

use super::shape::{Shape, ShapeId};

/// Schema graph backed by ordered maps
#[derive(Debug, Clone, Default)]
pub struct MemorySchema {
    prefixes: BTreeMap<String, String>,
    classes: BTreeMap<String, BTreeSet<String>>,
    labels: BTreeMap<String, String>,
    shapes: BTreeMap<ShapeId, Shape>,
}

impl MemorySchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_prefix(&mut self, prefix: impl Into<String>, namespace: impl Into<String>) {
        self.prefixes.insert(prefix.into(), namespace.into());
    }

    pub fn add_class(&mut self, uri: impl Into<String>) {
        self.classes.entry(uri.into()).or_default();
    }

    /// Declare `sub rdfs:subClassOf sup`; both become classes
    pub fn add_super_class(&mut self, sub: impl Into<String>, sup: impl Into<String>) {
        let sup = sup.into();
        self.add_class(sup.clone());
        self.classes.entry(sub.into()).or_default().insert(sup);
    }

    pub fn set_label(&mut self, uri: impl Into<String>, label: impl Into<String>) {
        self.labels.insert(uri.into(), label.into());
    }

    /// Add a shape, replacing any shape with the same id
    pub fn add_shape(&mut self, shape: Shape) {
        trace!(shape = %shape.id, "Adding shape");
        self.shapes.insert(shape.id.clone(), shape);
    }

    pub fn with_prefix(mut self, prefix: &str, namespace: &str) -> Self {
        self.add_prefix(prefix, namespace);
        self
    }

    pub fn with_class(mut self, uri: &str) -> Self {
        self.add_class(uri);
        self
    }

    pub fn with_super_class(mut self, sub: &str, sup: &str) -> Self {
        self.add_super_class(sub, sup);
        self
    }

    pub fn with_label(mut self, uri: &str, label: &str) -> Self {
        self.set_label(uri, label);
        self
    }

    pub fn with_shape(mut self, shape: Shape) -> Self {
        self.add_shape(shape);
        self
    }

    pub fn class_uris(&self) -> impl Iterator<Item = &str> {
        self.classes.keys().map(String::as_str)
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    pub fn prefixes(&self) -> &BTreeMap<String, String> {
        &self.prefixes
    }

    fn direct_subs(&self, uri: &str) -> BTreeSet<String> {
        self.classes
            .iter()
            .filter(|(_, supers)| supers.contains(uri))
            .map(|(sub, _)| sub.clone())
            .collect()
    }

    fn direct_supers(&self, uri: &str) -> BTreeSet<String> {
        self.classes.get(uri).cloned().unwrap_or_default()
    }

    fn closure(&self, start: &str, step: impl Fn(&str) -> BTreeSet<String>) -> BTreeSet<String> {
        let mut seen = BTreeSet::new();
        let mut queue: VecDeque<String> = step(start).into_iter().collect();
        while let Some(uri) = queue.pop_front() {
            if uri == start || !seen.insert(uri.clone()) {
                continue;
            }
            queue.extend(step(&uri));
        }
        seen
    }
}

impl SchemaGraph for MemorySchema {
    fn has_class(&self, uri: &str) -> bool {
        self.classes.contains_key(uri)
    }

    fn super_classes(&self, uri: &str, reach: Reach) -> BTreeSet<String> {
        match reach {
            Reach::Direct => self.direct_supers(uri),
            Reach::Transitive => self.closure(uri, |u| self.direct_supers(u)),
        }
    }

    fn sub_classes(&self, uri: &str, reach: Reach) -> BTreeSet<String> {
        match reach {
            Reach::Direct => self.direct_subs(uri),
            Reach::Transitive => self.closure(uri, |u| self.direct_subs(u)),
        }
    }

    fn label(&self, uri: &str) -> Option<String> {
        self.labels.get(uri).cloned()
    }

    fn expand_prefix(&self, value: &str) -> String {
        match value.split_once(':') {
            Some((prefix, local)) => match self.prefixes.get(prefix) {
                Some(namespace) => format!("{}{}", namespace, local),
                None => value.to_string(),
            },
            None => value.to_string(),
        }
    }

    fn short_form(&self, uri: &str) -> String {
        self.prefixes
            .iter()
            .filter(|(_, namespace)| !namespace.is_empty() && uri.starts_with(namespace.as_str()))
            .max_by_key(|(_, namespace)| namespace.len())
            .map(|(prefix, namespace)| format!("{}:{}", prefix, &uri[namespace.len()..]))
            .unwrap_or_else(|| uri.to_string())
    }

    fn shape_ids(&self) -> Vec<ShapeId> {
        self.shapes.keys().cloned().collect()
    }

    fn shape(&self, id: &ShapeId) -> Option<&Shape> {
        self.shapes.get(id)
    }

    fn referrers(&self, id: &ShapeId, link: ShapeLink) -> Vec<ShapeId> {
        self.shapes
            .values()
            .filter(|shape| shape.links(link).contains(id))
            .map(|shape| shape.id.clone())
            .collect()
    }
}
