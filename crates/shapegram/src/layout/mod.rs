//! Link direction hints
//!
//! Every connected component of the diagram with more than one node is
//! placed by a force-directed simulation. Link directions are then read
//! off the relative positions of the two ends, which keeps PlantUML from
//! stacking everything in one long row.

mod force;

use std::collections::BTreeMap;

use anyhow::Result;
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::unionfind::UnionFind;
use petgraph::visit::EdgeRef;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, span, trace, Level};

use crate::core::{DiagramError, LayoutAlgorithm, LinkDirection};
use crate::model::Diagram;

pub use force::ForcePlacement;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn add(self, other: Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }

    pub fn sub(self, other: Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }

    pub fn scale(self, factor: f64) -> Point {
        Point::new(self.x * factor, self.y * factor)
    }

    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }
}

/// Layout settings, read from the `layout` section of a diagram config
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutConfig {
    /// Compute direction hints at all
    pub apply_layout: bool,
    pub iterations: usize,
    pub box_width: f64,
    pub box_height: f64,
    /// Vertical bias of the direction classification, above 1
    pub up_down_preference: f64,
    pub seed: u64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            apply_layout: true,
            iterations: 1000,
            box_width: 800.0,
            box_height: 800.0,
            up_down_preference: 3.0,
            seed: 0,
        }
    }
}

/// Positions of laid-out nodes and the component of every node
#[derive(Debug, Clone, Default)]
pub struct LayoutResult {
    positions: BTreeMap<String, Point>,
    components: BTreeMap<String, usize>,
    bias: f64,
}

impl LayoutResult {
    /// A result without any direction hints
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn position(&self, uri: &str) -> Option<Point> {
        self.positions.get(uri).copied()
    }

    pub fn component(&self, uri: &str) -> Option<usize> {
        self.components.get(uri).copied()
    }

    pub fn positioned_count(&self) -> usize {
        self.positions.len()
    }

    /// Direction of the link `from -> to`
    ///
    /// `None` when either end has no position or the ends lie in different
    /// components.
    pub fn direction(&self, from: &str, to: &str) -> Option<LinkDirection> {
        if self.component(from)? != self.component(to)? {
            return None;
        }
        let delta = self.position(from)?.sub(self.position(to)?);
        Some(classify(delta, self.bias, from < to))
    }

    /// PlantUML direction code of the link `from -> to`, empty without a hint
    pub fn direction_code(&self, from: &str, to: &str) -> &'static str {
        LinkDirection::code_or_empty(self.direction(from, to))
    }
}

fn classify(delta: Point, bias: f64, ordered: bool) -> LinkDirection {
    if delta.x == 0.0 && delta.y == 0.0 {
        return if ordered {
            LinkDirection::Down
        } else {
            LinkDirection::Up
        };
    }
    if delta.x.abs() > delta.y.abs() * bias {
        if delta.x > 0.0 {
            LinkDirection::Left
        } else {
            LinkDirection::Right
        }
    } else if delta.y > 0.0 {
        LinkDirection::Up
    } else {
        LinkDirection::Down
    }
}

/// Component-wise force layout of a composed diagram
#[derive(Debug, Clone, Default)]
pub struct GraphLayout {
    config: LayoutConfig,
}

impl GraphLayout {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    fn validate_config(&self) -> Result<(), DiagramError> {
        let config = &self.config;
        if !(config.box_width > 0.0 && config.box_height > 0.0) {
            return Err(DiagramError::layout_error(format!(
                "layout box must be positive, got {}x{}",
                config.box_width, config.box_height
            )));
        }
        if !(config.up_down_preference >= 1.0) {
            return Err(DiagramError::layout_error(format!(
                "upDownPreference must be at least 1, got {}",
                config.up_down_preference
            )));
        }
        Ok(())
    }

    /// Undirected graph of the drawn links, self-loops and duplicates dropped
    fn link_graph<'d>(&self, diagram: &'d Diagram) -> UnGraph<&'d str, ()> {
        let mut graph = UnGraph::with_capacity(diagram.len(), 0);
        for node in diagram.nodes() {
            graph.add_node(node.uri.as_str());
        }
        for (index, node) in diagram.nodes().iter().enumerate() {
            let targets = node
                .property_links()
                .iter()
                .flat_map(|link| link.objects.iter())
                .chain(node.super_class_links());
            for target in targets {
                match diagram.node_index(target) {
                    Some(other) if other != index => {
                        graph.update_edge(NodeIndex::new(index), NodeIndex::new(other), ());
                    }
                    _ => {}
                }
            }
        }
        graph
    }
}

impl LayoutAlgorithm for GraphLayout {
    type Output = LayoutResult;

    fn layout(&self, diagram: &Diagram) -> Result<Self::Output> {
        let layout_span = span!(
            Level::INFO,
            "layout_diagram",
            node_count = diagram.len(),
            iterations = self.config.iterations
        );
        let _enter = layout_span.enter();

        if !self.config.apply_layout {
            debug!("Layout disabled, no direction hints");
            return Ok(LayoutResult::empty());
        }
        self.validate_config()?;

        let graph = self.link_graph(diagram);
        let mut sets = UnionFind::<usize>::new(graph.node_count());
        for edge in graph.edge_references() {
            sets.union(edge.source().index(), edge.target().index());
        }
        let labels = sets.into_labeling();

        let mut members: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for (index, label) in labels.iter().enumerate() {
            members.entry(*label).or_default().push(index);
        }

        let placement = ForcePlacement::new(
            self.config.iterations,
            self.config.box_width,
            self.config.box_height,
        );
        let mut result = LayoutResult {
            bias: self.config.up_down_preference,
            ..LayoutResult::default()
        };

        for (component, nodes) in members.values().enumerate() {
            if nodes.len() < 2 {
                continue;
            }
            let local: BTreeMap<usize, usize> = nodes
                .iter()
                .enumerate()
                .map(|(position, node)| (*node, position))
                .collect();
            let edges: Vec<(usize, usize)> = graph
                .edge_references()
                .filter_map(|edge| {
                    Some((
                        *local.get(&edge.source().index())?,
                        *local.get(&edge.target().index())?,
                    ))
                })
                .collect();
            trace!(component, size = nodes.len(), edge_count = edges.len(), "Placing component");

            // Each component starts from the same seed
            let mut rng = StdRng::seed_from_u64(self.config.seed);
            let points = placement.place(nodes.len(), &edges, &mut rng);
            for (node, point) in nodes.iter().zip(points) {
                let uri = graph[NodeIndex::new(*node)].to_string();
                result.components.insert(uri.clone(), component);
                result.positions.insert(uri, point);
            }
        }

        debug!(
            positioned = result.positioned_count(),
            component_count = members.len(),
            "Layout completed"
        );
        Ok(result)
    }

    fn name(&self) -> &'static str {
        "force"
    }

    fn version(&self) -> &'static str {
        "1.0.0"
    }
}


#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    fn point_strategy() -> impl Strategy<Value = Point> {
        (-1000.0f64..1000.0, -1000.0f64..1000.0).prop_map(|(x, y)| Point::new(x, y))
    }

    /// Reversing a link flips its direction.
    fn check_direction_is_antisymmetric(a: Point, b: Point) -> Result<(), TestCaseError> {
        let mut layout = LayoutResult {
            bias: 3.0,
            ..LayoutResult::default()
        };
        for (uri, point) in [("a", a), ("b", b)] {
            layout.positions.insert(uri.to_string(), point);
            layout.components.insert(uri.to_string(), 0);
        }
        let forward = layout.direction("a", "b");
        let backward = layout.direction("b", "a");
        prop_assert!(forward.is_some());
        prop_assert_eq!(forward.map(LinkDirection::opposite), backward);
        Ok(())
    }

    proptest! {
        #[test]
        fn direction_is_antisymmetric(a in point_strategy(), b in point_strategy()) {
            check_direction_is_antisymmetric(a, b)?;
        }

        #[test]
        fn coincident_direction_is_antisymmetric(a in point_strategy()) {
            check_direction_is_antisymmetric(a, a)?;
        }
    }
}
