//! Render-ready view of a composed diagram
//!
//! The view resolves everything a renderer needs: aliases, labels, style
//! classes and direction hints. Renderers only format it.

use serde::Serialize;

use crate::core::{LinkDirection, StyleClass};
use crate::layout::LayoutResult;
use crate::model::{ClassNode, Diagram};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub nodes: Vec<NodeView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeView {
    pub uri: String,
    /// Identifier used by links; stable for a given diagram
    pub alias: String,
    pub label: String,
    pub style: StyleClass,
    pub stereotypes: Vec<String>,
    pub attributes: Vec<AttributeView>,
    pub links: Vec<LinkView>,
    pub super_links: Vec<SuperLinkView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeView {
    pub label: String,
    pub icon: String,
    pub cardinality: String,
    /// Labels of the value classes, datatypes and values
    pub range: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkView {
    pub target: String,
    pub target_alias: String,
    pub label: String,
    pub cardinality: String,
    pub style: StyleClass,
    pub direction: Option<LinkDirection>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuperLinkView {
    pub target: String,
    pub target_alias: String,
    pub style: StyleClass,
    pub direction: Option<LinkDirection>,
}

impl DiagramView {
    pub fn build(diagram: &Diagram, layout: &LayoutResult) -> Self {
        Self {
            name: diagram.name().map(String::from),
            nodes: diagram
                .nodes()
                .iter()
                .enumerate()
                .map(|(index, node)| NodeView::build(diagram, layout, index, node))
                .collect(),
        }
    }

    pub fn node(&self, uri: &str) -> Option<&NodeView> {
        self.nodes.iter().find(|node| node.uri == uri)
    }

    pub fn link_count(&self) -> usize {
        self.nodes.iter().map(|node| node.links.len()).sum()
    }

    pub fn super_link_count(&self) -> usize {
        self.nodes.iter().map(|node| node.super_links.len()).sum()
    }
}

fn alias(index: usize) -> String {
    format!("n{}", index)
}

fn alias_of(diagram: &Diagram, uri: &str) -> String {
    diagram
        .node_index(uri)
        .map(alias)
        .unwrap_or_else(|| uri.to_string())
}

impl NodeView {
    fn build(diagram: &Diagram, layout: &LayoutResult, index: usize, node: &ClassNode) -> Self {
        let style = if node.is_shape_specific() {
            StyleClass::ShapeSpecificClass
        } else {
            StyleClass::ProperClass
        };

        let attributes = node
            .inner_properties()
            .iter()
            .map(|property| AttributeView {
                label: property.label.clone(),
                icon: property.icon(),
                cardinality: property.cardinality(),
                range: property
                    .objects
                    .iter()
                    .map(|uri| diagram.class_label(uri))
                    .collect(),
            })
            .collect();

        let links = node
            .property_links()
            .iter()
            .flat_map(|property| {
                property.objects.iter().map(move |target| {
                    let target_shape_specific = diagram
                        .node(target)
                        .is_some_and(ClassNode::is_shape_specific);
                    LinkView {
                        target: target.clone(),
                        target_alias: alias_of(diagram, target),
                        label: property.label.clone(),
                        cardinality: property.cardinality(),
                        style: StyleClass::for_property_link(
                            property.is_forbidden(),
                            node.is_shape_specific(),
                            target_shape_specific,
                        ),
                        direction: layout.direction(&node.uri, target),
                    }
                })
            })
            .collect();

        let direct = node
            .super_class_links()
            .iter()
            .map(|target| (target, StyleClass::SuperClassLink));
        let indirect = node
            .indirect_super_class_links()
            .iter()
            .map(|target| (target, StyleClass::IndirectSuperClassLink));
        let super_links = direct
            .chain(indirect)
            .map(|(target, style)| SuperLinkView {
                target: target.clone(),
                target_alias: alias_of(diagram, target),
                style,
                direction: layout.direction(&node.uri, target),
            })
            .collect();

        Self {
            uri: node.uri.clone(),
            alias: alias(index),
            label: node.label.clone(),
            style,
            stereotypes: node
                .super_class_stereotypes()
                .iter()
                .map(|uri| diagram.class_label(uri))
                .collect(),
            attributes,
            links,
            super_links,
        }
    }
}
