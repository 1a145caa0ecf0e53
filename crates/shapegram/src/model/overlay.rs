//! Synthetic classes layered over a schema graph
//!
//! Shape-specific variants need a class with a label and a superclass
//! edge to their origin. They are recorded here so the input graph is
//! never modified.

use std::collections::{BTreeMap, BTreeSet};

use crate::core::{Reach, SchemaGraph, ShapeLink};
use crate::schema::{Shape, ShapeId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntheticClass {
    pub label: String,
    pub super_class: String,
}

/// Read-through view adding synthetic classes to a base graph
pub struct SchemaOverlay<'g> {
    base: &'g dyn SchemaGraph,
    synthetic: BTreeMap<String, SyntheticClass>,
}

impl<'g> SchemaOverlay<'g> {
    pub fn new(base: &'g dyn SchemaGraph) -> Self {
        Self {
            base,
            synthetic: BTreeMap::new(),
        }
    }

    pub fn add_class(&mut self, uri: String, label: String, super_class: String) {
        self.synthetic.insert(uri, SyntheticClass { label, super_class });
    }

    pub fn is_synthetic(&self, uri: &str) -> bool {
        self.synthetic.contains_key(uri)
    }

    pub fn synthetic_count(&self) -> usize {
        self.synthetic.len()
    }

    fn variants_of<'a>(&'a self, origins: &'a BTreeSet<String>) -> impl Iterator<Item = String> + 'a {
        self.synthetic
            .iter()
            .filter(move |(_, class)| origins.contains(&class.super_class))
            .map(|(uri, _)| uri.clone())
    }
}

impl SchemaGraph for SchemaOverlay<'_> {
    fn has_class(&self, uri: &str) -> bool {
        self.is_synthetic(uri) || self.base.has_class(uri)
    }

    fn super_classes(&self, uri: &str, reach: Reach) -> BTreeSet<String> {
        match self.synthetic.get(uri) {
            Some(class) => {
                let mut supers = BTreeSet::from([class.super_class.clone()]);
                if reach == Reach::Transitive {
                    supers.extend(self.base.super_classes(&class.super_class, Reach::Transitive));
                }
                supers
            }
            None => self.base.super_classes(uri, reach),
        }
    }

    fn sub_classes(&self, uri: &str, reach: Reach) -> BTreeSet<String> {
        let mut subs = self.base.sub_classes(uri, reach);
        let mut origins = BTreeSet::from([uri.to_string()]);
        if reach == Reach::Transitive {
            origins.extend(subs.iter().cloned());
        }
        let variants: Vec<String> = self.variants_of(&origins).collect();
        subs.extend(variants);
        subs
    }

    fn label(&self, uri: &str) -> Option<String> {
        match self.synthetic.get(uri) {
            Some(class) => Some(class.label.clone()),
            None => self.base.label(uri),
        }
    }

    fn expand_prefix(&self, value: &str) -> String {
        self.base.expand_prefix(value)
    }

    fn short_form(&self, uri: &str) -> String {
        self.base.short_form(uri)
    }

    fn shape_ids(&self) -> Vec<ShapeId> {
        self.base.shape_ids()
    }

    fn shape(&self, id: &ShapeId) -> Option<&Shape> {
        self.base.shape(id)
    }

    fn referrers(&self, id: &ShapeId, link: ShapeLink) -> Vec<ShapeId> {
        self.base.referrers(id, link)
    }

    fn shapes_for_class(&self, uri: &str) -> Vec<ShapeId> {
        self.base.shapes_for_class(uri)
    }
}
