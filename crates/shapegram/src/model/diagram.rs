//! Composed diagram

use std::collections::{BTreeMap, BTreeSet};

use super::node::ClassNode;

/// Nodes of a composed diagram, sorted by URI
///
/// Besides the included nodes the diagram keeps every synthesized variant,
/// so a range can be labelled even when its variant was not included, and
/// fallback labels for URIs that are not nodes at all.
#[derive(Debug, Clone, Default)]
pub struct Diagram {
    name: Option<String>,
    nodes: Vec<ClassNode>,
    index: BTreeMap<String, usize>,
    variants: BTreeMap<String, ClassNode>,
    fallback_labels: BTreeMap<String, String>,
}

impl Diagram {
    pub fn new(
        name: Option<String>,
        mut nodes: Vec<ClassNode>,
        variants: BTreeMap<String, ClassNode>,
        fallback_labels: BTreeMap<String, String>,
    ) -> Self {
        nodes.sort_by(|a, b| a.uri.cmp(&b.uri));
        let index = nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (node.uri.clone(), i))
            .collect();
        Self {
            name,
            nodes,
            index,
            variants,
            fallback_labels,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn nodes(&self) -> &[ClassNode] {
        &self.nodes
    }

    pub fn node(&self, uri: &str) -> Option<&ClassNode> {
        self.index.get(uri).map(|i| &self.nodes[*i])
    }

    /// Position of a node in URI order
    pub fn node_index(&self, uri: &str) -> Option<usize> {
        self.index.get(uri).copied()
    }

    pub fn is_included(&self, uri: &str) -> bool {
        self.index.contains_key(uri)
    }

    pub fn included_uris(&self) -> BTreeSet<String> {
        self.index.keys().cloned().collect()
    }

    pub fn variant(&self, uri: &str) -> Option<&ClassNode> {
        self.variants.get(uri)
    }

    pub fn variant_count(&self) -> usize {
        self.variants.len()
    }

    /// Label of any URI the diagram mentions
    pub fn class_label(&self, uri: &str) -> String {
        if let Some(node) = self.node(uri).or_else(|| self.variant(uri)) {
            return node.label.clone();
        }
        self.fallback_labels
            .get(uri)
            .cloned()
            .unwrap_or_else(|| uri.to_string())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::DefinitionRegistry;

    #[test]
    fn test_nodes_are_sorted_and_indexed() {
        let registry = DefinitionRegistry::new();
        let root = registry.root();
        let nodes = vec![
            ClassNode::class("ex:B", "B", Vec::new(), root),
            ClassNode::class("ex:A", "A", Vec::new(), root),
        ];
        let labels = BTreeMap::from([("xsd:string".to_string(), "string".to_string())]);
        let diagram = Diagram::new(None, nodes, BTreeMap::new(), labels);

        assert_eq!(diagram.len(), 2);
        assert_eq!(diagram.nodes()[0].uri, "ex:A");
        assert_eq!(diagram.node_index("ex:B"), Some(1));
        assert_eq!(diagram.class_label("ex:B"), "B");
        assert_eq!(diagram.class_label("xsd:string"), "string");
        assert_eq!(diagram.class_label("ex:Unknown"), "ex:Unknown");
    }
}
