//! Diagram composition
//!
//! Composition runs in four steps. Shape-specific variants are synthesized
//! into an overlay, the listed classes seed a frontier, the frontier is
//! expanded until it stops growing, and finally every node is bound
//! against the set of included URIs.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, span, trace, Level};

use crate::core::{DiagramError, Reach, SchemaGraph};
use crate::definition::{DefinitionRegistry, Flag};
use crate::schema::ShapeId;

use super::diagram::Diagram;
use super::node::{compose_label, compose_uri, is_shape_specific, ClassNode};
use super::overlay::SchemaOverlay;
use super::relations::ShapeResolver;

/// Builds a [`Diagram`] from a schema graph and a definition registry
#[derive(Debug, Clone, Copy, Default)]
pub struct DiagramComposer;

impl DiagramComposer {
    pub fn new() -> Self {
        Self
    }

    /// Compose the diagram
    ///
    /// The registry is validated first, then grows by one expanded
    /// definition per discovered class.
    pub fn compose(
        &self,
        graph: &dyn SchemaGraph,
        registry: &mut DefinitionRegistry,
    ) -> Result<Diagram, DiagramError> {
        let compose_span = span!(
            Level::INFO,
            "compose_diagram",
            shape_count = graph.shape_ids().len(),
            listed = registry.listed_classes().len()
        );
        let _enter = compose_span.enter();

        let recovered = registry.validate(graph)?;
        if !recovered.is_empty() {
            debug!(dropped = recovered.len(), "Continuing without unresolvable classes");
        }

        let mut overlay = SchemaOverlay::new(graph);
        let variants = self.synthesize_variants(graph, &mut overlay, registry)?;
        debug!(variant_count = variants.len(), "Synthesized shape-specific variants");

        if registry.listed_classes().is_empty() {
            self.seed_from_targets(graph, registry);
        }

        let resolver = ShapeResolver::new(&overlay);
        let mut nodes = self.discover(&resolver, &variants, registry)?;

        let included: BTreeSet<String> = nodes.iter().map(|node| node.uri.clone()).collect();
        let bind_span = span!(Level::DEBUG, "bind_nodes", node_count = nodes.len());
        let _bind_enter = bind_span.enter();
        for node in &mut nodes {
            node.bind(&resolver, registry, &included)?;
            if registry.flag(node.definition, Flag::DisplayClassUri) {
                node.label = overlay.short_form(&node.uri);
            }
        }
        drop(_bind_enter);

        let fallback_labels = fallback_labels(&overlay, &nodes, &variants);
        let diagram = Diagram::new(
            registry.name().map(String::from),
            nodes,
            variants,
            fallback_labels,
        );
        debug!(node_count = diagram.len(), "Diagram composed");
        Ok(diagram)
    }

    fn synthesize_variants(
        &self,
        graph: &dyn SchemaGraph,
        overlay: &mut SchemaOverlay<'_>,
        registry: &mut DefinitionRegistry,
    ) -> Result<BTreeMap<String, ClassNode>, DiagramError> {
        let resolver = ShapeResolver::new(graph);
        let mut variants = BTreeMap::new();

        for id in graph.shape_ids() {
            let Some(shape) = graph.shape(&id) else {
                continue;
            };
            if shape.classes.is_empty() || resolver.is_pure_class(&id) {
                continue;
            }
            let origins: BTreeSet<&String> =
                shape.target_classes.iter().chain(&shape.classes).collect();
            for origin in origins {
                if !graph.has_class(origin) {
                    return Err(DiagramError::model_inconsistency(format!(
                        "Class {} of shape {} not found in the schema",
                        origin, id
                    )));
                }
                let label = compose_label(&id, &graph.display_label(origin));
                let definition = if registry.is_listed(origin) {
                    registry.listed_class(&compose_uri(origin, &id))
                } else {
                    registry.expanded_class(&compose_uri(origin, &id))
                };
                let node = ClassNode::shape_specific(origin, id.clone(), label, definition);
                trace!(uri = %node.uri, "Registering variant");
                overlay.add_class(node.uri.clone(), node.label.clone(), origin.clone());
                variants.insert(node.uri.clone(), node);
            }
        }
        Ok(variants)
    }

    /// List every class a pure shape declares and expand out-links from the root
    fn seed_from_targets(&self, graph: &dyn SchemaGraph, registry: &mut DefinitionRegistry) {
        let root = registry.root();
        registry.set_flag(root, Flag::ExpandOutLinks, true);

        let resolver = ShapeResolver::new(graph);
        for id in graph.shape_ids() {
            if id.is_placeholder() || !resolver.is_pure_class(&id) {
                continue;
            }
            let Some(shape) = graph.shape(&id) else {
                continue;
            };
            for class in shape.target_classes.iter().chain(&shape.classes) {
                if graph.has_class(class) {
                    registry.listed_class(class);
                }
            }
        }
        debug!(seeded = registry.listed_classes().len(), "Seeded listed classes from shapes");
    }

    fn discover(
        &self,
        resolver: &ShapeResolver<'_>,
        variants: &BTreeMap<String, ClassNode>,
        registry: &mut DefinitionRegistry,
    ) -> Result<Vec<ClassNode>, DiagramError> {
        let discover_span = span!(Level::DEBUG, "discover_classes");
        let _enter = discover_span.enter();

        let mut nodes = Vec::new();
        let mut visited = BTreeSet::new();
        let mut frontier = Vec::new();
        for uri in registry.listed_classes() {
            if let Some(node) = materialize(resolver, variants, registry, &uri) {
                visited.insert(uri);
                frontier.push(node);
            }
        }

        let mut pass = 0;
        while !frontier.is_empty() {
            pass += 1;
            let mut related = BTreeSet::new();
            for node in &frontier {
                related.extend(related_uris(resolver, registry, node)?);
            }
            nodes.append(&mut frontier);

            for uri in related {
                if visited.contains(&uri) {
                    continue;
                }
                if let Some(node) = materialize(resolver, variants, registry, &uri) {
                    visited.insert(uri);
                    frontier.push(node);
                }
            }
            trace!(pass, discovered = frontier.len(), "Discovery pass finished");
        }
        debug!(pass_count = pass, node_count = nodes.len(), "Discovery converged");
        Ok(nodes)
    }
}

/// URIs a node asks to bring into the diagram
fn related_uris(
    resolver: &ShapeResolver<'_>,
    registry: &DefinitionRegistry,
    node: &ClassNode,
) -> Result<BTreeSet<String>, DiagramError> {
    let graph = resolver.graph();
    let flag = |flag: Flag| registry.flag(node.definition, flag);
    let mut related = BTreeSet::new();

    if flag(Flag::ExpandOutLinks) {
        for link in node.collect_out_links(resolver, registry)? {
            related.extend(link.objects);
        }
    }
    if flag(Flag::ExpandInLinks) {
        related.extend(node.collect_in_link_uris(resolver, registry)?);
    }

    let mut hierarchy = BTreeSet::new();
    if flag(Flag::ExpandTransitiveSuperClasses) {
        hierarchy.extend(graph.super_classes(&node.uri, Reach::Transitive));
    } else if flag(Flag::ExpandSuperClasses) {
        hierarchy.extend(graph.super_classes(&node.uri, Reach::Direct));
    }
    if flag(Flag::ExpandTransitiveSubClasses) {
        hierarchy.extend(graph.sub_classes(&node.uri, Reach::Transitive));
    } else if flag(Flag::ExpandSubClasses) {
        hierarchy.extend(graph.sub_classes(&node.uri, Reach::Direct));
    }
    related.extend(hierarchy.into_iter().filter(|uri| !is_shape_specific(uri)));
    Ok(related)
}

/// Node for `uri`: a synthesized variant, a plain class or nothing
fn materialize(
    resolver: &ShapeResolver<'_>,
    variants: &BTreeMap<String, ClassNode>,
    registry: &mut DefinitionRegistry,
    uri: &str,
) -> Option<ClassNode> {
    if uri.starts_with("---") {
        debug!(uri = %uri, "Skipping variant URI without origin");
        return None;
    }
    if let Some(variant) = variants.get(uri) {
        return Some(variant.clone());
    }
    let graph = resolver.graph();
    if !graph.has_class(uri) {
        trace!(uri = %uri, "Not a class, skipping");
        return None;
    }
    let shapes: Vec<ShapeId> = graph
        .shapes_for_class(uri)
        .into_iter()
        .filter(|id| !id.is_placeholder() && resolver.is_pure_class(id))
        .collect();
    let definition = registry.definition_for(uri);
    Some(ClassNode::class(uri, graph.display_label(uri), shapes, definition))
}

/// Labels for ranges and stereotypes that are not nodes or variants
fn fallback_labels(
    graph: &dyn SchemaGraph,
    nodes: &[ClassNode],
    variants: &BTreeMap<String, ClassNode>,
) -> BTreeMap<String, String> {
    let known: BTreeSet<&str> = nodes.iter().map(|node| node.uri.as_str()).collect();
    let ranges = nodes
        .iter()
        .flat_map(|node| node.included_properties())
        .flat_map(|property| property.objects.iter());
    let stereotypes = nodes
        .iter()
        .flat_map(|node| node.super_class_stereotypes());
    ranges
        .chain(stereotypes)
        .filter(|uri| !known.contains(uri.as_str()) && !variants.contains_key(*uri))
        .map(|uri| (uri.clone(), graph.display_label(uri)))
        .collect()
}
