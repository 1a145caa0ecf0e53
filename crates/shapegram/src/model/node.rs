//! Diagram nodes
//!
//! A [`ClassNode`] is either a plain class or a shape-specific variant of
//! one. Before binding, a node can already report what it would link to;
//! that drives discovery. Binding against the final set of included URIs
//! fills the [`NodeViews`] a renderer reads.

use std::collections::BTreeSet;

use crate::core::{DiagramError, Reach, SchemaGraph, ShapeLink};
use crate::definition::{DefinitionId, DefinitionRegistry, FilterScope, Flag, PropertyFilter};
use crate::schema::ShapeId;

use super::property::PropertyOccurrence;
use super::relations::ShapeResolver;

const MARKER: &str = "---";

/// URI of the variant of `origin` constrained by `shape`
pub fn compose_uri(origin: &str, shape: &ShapeId) -> String {
    match shape {
        ShapeId::Iri(iri) => format!("{}{}uri:{}", origin, MARKER, iri),
        ShapeId::Blank(id) => format!("{}{}id:{}", origin, MARKER, id),
    }
}

/// Split a variant URI into its origin class and shape
pub fn decompose_uri(uri: &str) -> Option<(String, ShapeId)> {
    let (origin, rest) = uri.split_once(MARKER)?;
    let shape = if let Some(iri) = rest.strip_prefix("uri:") {
        ShapeId::iri(iri)
    } else if let Some(id) = rest.strip_prefix("id:") {
        ShapeId::blank(id)
    } else {
        return None;
    };
    Some((origin.to_string(), shape))
}

pub fn is_shape_specific(uri: &str) -> bool {
    uri.contains(MARKER)
}

/// Label of a variant: the origin label plus the shape's local name
pub fn compose_label(shape: &ShapeId, origin_label: &str) -> String {
    match shape.local_name() {
        Some(name) => format!("{} ({})", origin_label, name),
        None => format!("{} (...)", origin_label),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Class,
    ShapeSpecific { origin: String, shape: ShapeId },
}

/// Everything a node shows, derived at bind time
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeViews {
    pub super_classes: BTreeSet<String>,
    pub transitive_super_classes: BTreeSet<String>,
    pub sub_classes: BTreeSet<String>,
    pub transitive_sub_classes: BTreeSet<String>,
    pub included_properties: Vec<PropertyOccurrence>,
    pub inner_properties: Vec<PropertyOccurrence>,
    pub property_links: Vec<PropertyOccurrence>,
    pub super_class_links: Vec<String>,
    pub indirect_super_class_links: Vec<String>,
    pub super_class_stereotypes: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ClassNode {
    pub uri: String,
    pub label: String,
    pub kind: NodeKind,
    /// Shapes describing this node
    pub shapes: Vec<ShapeId>,
    pub definition: DefinitionId,
    views: NodeViews,
}

impl PartialEq for ClassNode {
    fn eq(&self, other: &Self) -> bool {
        self.uri == other.uri
    }
}

impl Eq for ClassNode {}

impl ClassNode {
    pub fn class(
        uri: impl Into<String>,
        label: impl Into<String>,
        shapes: Vec<ShapeId>,
        definition: DefinitionId,
    ) -> Self {
        Self {
            uri: uri.into(),
            label: label.into(),
            kind: NodeKind::Class,
            shapes,
            definition,
            views: NodeViews::default(),
        }
    }

    pub fn shape_specific(
        origin: &str,
        shape: ShapeId,
        label: impl Into<String>,
        definition: DefinitionId,
    ) -> Self {
        Self {
            uri: compose_uri(origin, &shape),
            label: label.into(),
            kind: NodeKind::ShapeSpecific {
                origin: origin.to_string(),
                shape: shape.clone(),
            },
            shapes: vec![shape],
            definition,
            views: NodeViews::default(),
        }
    }

    pub fn is_shape_specific(&self) -> bool {
        matches!(self.kind, NodeKind::ShapeSpecific { .. })
    }

    pub fn origin(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::ShapeSpecific { origin, .. } => Some(origin),
            NodeKind::Class => None,
        }
    }

    pub fn views(&self) -> &NodeViews {
        &self.views
    }

    pub fn included_properties(&self) -> &[PropertyOccurrence] {
        &self.views.included_properties
    }

    pub fn inner_properties(&self) -> &[PropertyOccurrence] {
        &self.views.inner_properties
    }

    pub fn property_links(&self) -> &[PropertyOccurrence] {
        &self.views.property_links
    }

    pub fn super_class_links(&self) -> &[String] {
        &self.views.super_class_links
    }

    pub fn indirect_super_class_links(&self) -> &[String] {
        &self.views.indirect_super_class_links
    }

    pub fn super_class_stereotypes(&self) -> &[String] {
        &self.views.super_class_stereotypes
    }

    /// Properties of the relevant shapes, filtered and sorted by label
    pub fn collect_included_properties(
        &self,
        resolver: &ShapeResolver<'_>,
        registry: &DefinitionRegistry,
    ) -> Result<Vec<PropertyOccurrence>, DiagramError> {
        let display_uri = registry.flag(self.definition, Flag::DisplayPropertyUri);
        let filter = registry.property_filter(self.definition, FilterScope::Properties)?;

        let mut ids = BTreeSet::new();
        for shape in &self.shapes {
            ids.extend(resolver.property_members(shape));
            for related in resolver.related_shapes(shape) {
                if let Some(related) = resolver.shape(&related) {
                    ids.extend(
                        related
                            .properties
                            .iter()
                            .filter(|id| !id.is_placeholder())
                            .cloned(),
                    );
                }
            }
        }

        let mut properties: Vec<PropertyOccurrence> = ids
            .iter()
            .map(|id| PropertyOccurrence::derive(resolver, id, display_uri))
            .filter(|property| property.admits(&filter))
            .collect();
        properties.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
        Ok(properties)
    }

    /// Included properties that point somewhere and pass the out-link filter
    pub fn collect_out_links(
        &self,
        resolver: &ShapeResolver<'_>,
        registry: &DefinitionRegistry,
    ) -> Result<Vec<PropertyOccurrence>, DiagramError> {
        let included = self.collect_included_properties(resolver, registry)?;
        let filter = registry.property_filter(self.definition, FilterScope::OutLinks)?;
        Ok(out_links(included, &filter))
    }

    /// Classes whose shapes declare one of this node's shapes as a property
    pub fn collect_in_link_uris(
        &self,
        resolver: &ShapeResolver<'_>,
        registry: &DefinitionRegistry,
    ) -> Result<BTreeSet<String>, DiagramError> {
        let filter = registry.property_filter(self.definition, FilterScope::OutLinks)?;
        let graph = resolver.graph();

        let mut uris = BTreeSet::new();
        for shape in &self.shapes {
            for related in resolver.related_shapes(shape) {
                let predicates = resolver
                    .shape(&related)
                    .and_then(|s| s.path.as_ref())
                    .map(|path| path.predicates())
                    .unwrap_or_default();
                if !filter.admits(predicates) {
                    continue;
                }
                for owner in graph.referrers(&related, ShapeLink::Property) {
                    uris.extend(resolver.objects(&owner));
                }
            }
        }
        uris.retain(|uri| !is_shape_specific(uri));
        Ok(uris)
    }

    /// Derive the views against the final set of included URIs
    pub fn bind(
        &mut self,
        resolver: &ShapeResolver<'_>,
        registry: &DefinitionRegistry,
        included: &BTreeSet<String>,
    ) -> Result<(), DiagramError> {
        let graph = resolver.graph();
        let flag = |flag: Flag| registry.flag(self.definition, flag);

        let super_classes = graph.super_classes(&self.uri, Reach::Direct);
        let included_properties = self.collect_included_properties(resolver, registry)?;
        let filter = registry.property_filter(self.definition, FilterScope::OutLinks)?;

        let property_links: Vec<PropertyOccurrence> = if flag(Flag::HideOutLinks) {
            Vec::new()
        } else {
            out_links(included_properties.clone(), &filter)
                .into_iter()
                .filter(|p| p.objects.iter().all(|o| included.contains(o)))
                .collect()
        };

        let inner_properties = if flag(Flag::HideInnerProperties) {
            Vec::new()
        } else {
            included_properties
                .iter()
                .filter(|p| !property_links.iter().any(|link| link.shape == p.shape))
                .cloned()
                .collect()
        };

        let super_class_links: Vec<String> = if flag(Flag::HideSuperClassLinks) {
            Vec::new()
        } else {
            super_classes
                .iter()
                .filter(|uri| included.contains(*uri))
                .cloned()
                .collect()
        };

        let indirect_super_class_links =
            if flag(Flag::HideSuperClassLinks) || flag(Flag::HideIndirectSuperClassLinks) {
                Vec::new()
            } else {
                indirect_links(graph, &super_classes, included)
            };

        let super_class_stereotypes = if flag(Flag::HideSuperClassStereotypes) {
            Vec::new()
        } else {
            match &self.kind {
                NodeKind::Class => super_classes
                    .iter()
                    .filter(|uri| !super_class_links.contains(uri))
                    .cloned()
                    .collect(),
                NodeKind::ShapeSpecific { origin, .. } => {
                    if super_class_links.contains(origin) {
                        Vec::new()
                    } else {
                        graph
                            .super_classes(origin, Reach::Direct)
                            .into_iter()
                            .collect()
                    }
                }
            }
        };

        self.views = NodeViews {
            transitive_super_classes: graph.super_classes(&self.uri, Reach::Transitive),
            sub_classes: graph.sub_classes(&self.uri, Reach::Direct),
            transitive_sub_classes: graph.sub_classes(&self.uri, Reach::Transitive),
            super_classes,
            included_properties,
            inner_properties,
            property_links,
            super_class_links,
            indirect_super_class_links,
            super_class_stereotypes,
        };
        Ok(())
    }
}

fn out_links(included: Vec<PropertyOccurrence>, filter: &PropertyFilter) -> Vec<PropertyOccurrence> {
    included
        .into_iter()
        .filter(|p| p.has_objects() && p.admits(filter))
        .collect()
}

/// First included ancestor on every upward branch of the elided superclasses
fn indirect_links(
    graph: &dyn SchemaGraph,
    super_classes: &BTreeSet<String>,
    included: &BTreeSet<String>,
) -> Vec<String> {
    let mut found = BTreeSet::new();
    let mut visited = BTreeSet::new();
    let mut worklist: Vec<String> = super_classes
        .iter()
        .filter(|uri| !included.contains(*uri))
        .cloned()
        .collect();

    while let Some(current) = worklist.pop() {
        if !visited.insert(current.clone()) {
            continue;
        }
        for sup in graph.super_classes(&current, Reach::Direct) {
            if included.contains(&sup) {
                found.insert(sup);
            } else {
                worklist.push(sup);
            }
        }
    }
    found.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{MemorySchema, PropertyPath, Shape};

    #[test]
    fn test_uri_round_trip() {
        for shape in [ShapeId::iri("http://ex.org/shapes#S"), ShapeId::blank("b12")] {
            let uri = compose_uri("http://ex.org/Org", &shape);
            assert!(is_shape_specific(&uri));
            assert_eq!(
                decompose_uri(&uri),
                Some(("http://ex.org/Org".to_string(), shape.clone()))
            );
        }
        assert_eq!(decompose_uri("http://ex.org/Org"), None);
        assert_eq!(decompose_uri("a---other:x"), None);
    }

    #[test]
    fn test_compose_label() {
        assert_eq!(compose_label(&ShapeId::iri("http://ex.org/S1"), "Org"), "Org (S1)");
        assert_eq!(compose_label(&ShapeId::blank("b0"), "Org"), "Org (...)");
    }

    #[test]
    fn test_indirect_links_skip_elided_classes() {
        let schema = MemorySchema::new()
            .with_super_class("ex:Dog", "ex:Mammal")
            .with_super_class("ex:Mammal", "ex:Animal")
            .with_super_class("ex:Mammal", "ex:Vertebrate")
            .with_super_class("ex:Vertebrate", "ex:Animal");
        let included = BTreeSet::from(["ex:Dog".to_string(), "ex:Animal".to_string()]);
        let supers = schema.super_classes("ex:Dog", Reach::Direct);
        assert_eq!(indirect_links(&schema, &supers, &included), vec!["ex:Animal".to_string()]);
    }

    #[test]
    fn test_bind_partitions_links_and_inner_properties() {
        let schema = MemorySchema::new()
            .with_class("ex:Person")
            .with_class("ex:Org")
            .with_shape(
                Shape::new(ShapeId::iri("ex:PersonShape"))
                    .with_target_class("ex:Person")
                    .with_property(ShapeId::blank("worksAt"))
                    .with_property(ShapeId::blank("knows")),
            )
            .with_shape(
                Shape::new(ShapeId::blank("worksAt"))
                    .with_path(PropertyPath::predicate("ex:worksAt"))
                    .with_class("ex:Org"),
            )
            .with_shape(
                Shape::new(ShapeId::blank("knows"))
                    .with_path(PropertyPath::predicate("ex:knows"))
                    .with_class("ex:Stranger"),
            );
        let resolver = ShapeResolver::new(&schema);
        let mut registry = DefinitionRegistry::new();
        let definition = registry.listed_class("ex:Person");
        let mut node = ClassNode::class(
            "ex:Person",
            "Person",
            vec![ShapeId::iri("ex:PersonShape")],
            definition,
        );
        let included = BTreeSet::from(["ex:Person".to_string(), "ex:Org".to_string()]);
        node.bind(&resolver, &registry, &included).unwrap();

        assert_eq!(node.included_properties().len(), 2);
        assert_eq!(node.property_links().len(), 1);
        assert_eq!(node.property_links()[0].label, "worksAt");
        assert_eq!(node.inner_properties().len(), 1);
        assert_eq!(node.inner_properties()[0].label, "knows");
    }
}
