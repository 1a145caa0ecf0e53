//! Shape relation resolver
//!
//! Walks the shape graph through nesting links (`sh:qualifiedValueShape`,
//! `sh:node` and the `sh:and` / `sh:or` / `sh:xone` lists). Shape graphs
//! can be cyclic, so every walk is an explicit worklist with a visited set.
//! The placeholder shape never appears in any result.

use std::collections::BTreeSet;

use crate::core::{SchemaGraph, ShapeLink};
use crate::schema::{Shape, ShapeId};

use super::node::compose_uri;

pub struct ShapeResolver<'g> {
    graph: &'g dyn SchemaGraph,
}

impl<'g> ShapeResolver<'g> {
    pub fn new(graph: &'g dyn SchemaGraph) -> Self {
        Self { graph }
    }

    pub fn graph(&self) -> &'g dyn SchemaGraph {
        self.graph
    }

    pub fn shape(&self, id: &ShapeId) -> Option<&'g Shape> {
        self.graph.shape(id)
    }

    /// Shapes nesting `id`, transitively
    pub fn parent_shapes(&self, id: &ShapeId) -> BTreeSet<ShapeId> {
        let mut found = BTreeSet::new();
        let mut worklist = vec![id.clone()];
        while let Some(current) = worklist.pop() {
            for link in ShapeLink::NESTING {
                for parent in self.graph.referrers(&current, link) {
                    if !parent.is_placeholder() && found.insert(parent.clone()) {
                        worklist.push(parent);
                    }
                }
            }
        }
        found
    }

    /// Non-property shapes nested in `id`, transitively
    pub fn child_shapes(&self, id: &ShapeId) -> BTreeSet<ShapeId> {
        let mut found = BTreeSet::new();
        let mut worklist = vec![id.clone()];
        while let Some(current) = worklist.pop() {
            for child in self.nested(&current) {
                if child.is_placeholder() || self.is_property_shape(child) {
                    continue;
                }
                if found.insert(child.clone()) {
                    worklist.push(child.clone());
                }
            }
        }
        found
    }

    /// Parents, the shape itself and the children of all of those
    pub fn related_shapes(&self, id: &ShapeId) -> BTreeSet<ShapeId> {
        let mut anchors = self.parent_shapes(id);
        anchors.insert(id.clone());
        let mut related = anchors.clone();
        for anchor in &anchors {
            related.extend(self.child_shapes(anchor));
        }
        related
    }

    /// Property shapes nested in `id` or in one of its child shapes
    ///
    /// These are where the child walk stops.
    pub fn property_members(&self, id: &ShapeId) -> BTreeSet<ShapeId> {
        let mut owners = self.child_shapes(id);
        owners.insert(id.clone());
        owners
            .iter()
            .flat_map(|owner| self.nested(owner))
            .filter(|member| !member.is_placeholder() && self.is_property_shape(member))
            .cloned()
            .collect()
    }

    /// A shape is a pure class shape when it targets a class or when no
    /// related shape adds SPARQL, property or pattern constraints
    pub fn is_pure_class(&self, id: &ShapeId) -> bool {
        if self
            .shape(id)
            .is_some_and(|shape| !shape.target_classes.is_empty())
        {
            return true;
        }
        !self
            .related_shapes(id)
            .iter()
            .filter_map(|related| self.shape(related))
            .any(Shape::has_use_case_constraints)
    }

    /// URI a shape uses when it refers to `origin`
    pub fn referenced_class_uri(&self, id: &ShapeId, origin: &str) -> String {
        if self.is_pure_class(id) {
            origin.to_string()
        } else {
            compose_uri(origin, id)
        }
    }

    /// Classes, datatypes and values reachable through related shapes
    pub fn objects(&self, id: &ShapeId) -> BTreeSet<String> {
        let mut objects = BTreeSet::new();
        for related in self.related_shapes(id) {
            let Some(shape) = self.shape(&related) else {
                continue;
            };
            if !shape.has_object() {
                continue;
            }
            for class in shape.target_classes.iter().chain(&shape.classes) {
                objects.insert(self.referenced_class_uri(&related, class));
            }
            objects.extend(shape.datatypes.iter().cloned());
            objects.extend(shape.has_values.iter().cloned());
        }
        objects
    }

    fn nested(&self, id: &ShapeId) -> Vec<&'g ShapeId> {
        match self.shape(id) {
            Some(shape) => ShapeLink::NESTING
                .iter()
                .flat_map(|link| shape.links(*link))
                .collect(),
            None => Vec::new(),
        }
    }

    fn is_property_shape(&self, id: &ShapeId) -> bool {
        self.shape(id).is_some_and(Shape::is_property_shape)
    }
}
