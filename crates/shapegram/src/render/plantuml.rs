//! PlantUML class diagram output

use std::collections::BTreeSet;
use std::fmt::Write;

use anyhow::Result;
use tracing::{debug, span, Level};

use crate::core::{DiagramError, LinkDirection, Renderer};

use super::style::StyleConfig;
use super::view::{DiagramView, NodeView};

/// Renders a [`DiagramView`] as PlantUML source
#[derive(Debug, Clone, Default)]
pub struct PlantUmlRenderer {
    style: StyleConfig,
}

impl PlantUmlRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_style(style: StyleConfig) -> Self {
        Self { style }
    }

    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    fn write_class(&self, out: &mut String, node: &NodeView) -> std::fmt::Result {
        let mut header = format!("class \"{}\" as {}", escape(&node.label), node.alias);
        if !node.stereotypes.is_empty() {
            write!(header, " <<{}>>", node.stereotypes.join(", "))?;
        }
        let style = self.style.style(node.style);
        if !style.is_empty() {
            write!(header, " {}", style)?;
        }
        writeln!(out, "{} {{", header)?;

        for attribute in &node.attributes {
            let line = self.style.inner_property(
                &attribute.icon,
                &attribute.label,
                &attribute.range.join(", "),
                &attribute.cardinality,
            );
            writeln!(out, "{}", line)?;
        }
        writeln!(out, "}}")
    }

    fn write_super_links(&self, out: &mut String, node: &NodeView) -> std::fmt::Result {
        for link in &node.super_links {
            writeln!(
                out,
                "{} -{}-|> {} {}",
                node.alias,
                LinkDirection::code_or_empty(link.direction),
                link.target_alias,
                self.style.style(link.style)
            )?;
        }
        Ok(())
    }

    fn write_property_links(&self, out: &mut String, node: &NodeView) -> std::fmt::Result {
        for link in &node.links {
            writeln!(
                out,
                "{} -{}-> \"{}\" {} {} : {}",
                node.alias,
                LinkDirection::code_or_empty(link.direction),
                link.cardinality,
                link.target_alias,
                self.style.style(link.style),
                link.label
            )?;
        }
        Ok(())
    }
}

/// Every link must end at a node of the view
fn check_link_targets(view: &DiagramView) -> Result<(), DiagramError> {
    let aliases: BTreeSet<&str> = view.nodes.iter().map(|node| node.alias.as_str()).collect();
    for node in &view.nodes {
        let targets = node
            .links
            .iter()
            .map(|link| (&link.target, &link.target_alias))
            .chain(node.super_links.iter().map(|link| (&link.target, &link.target_alias)));
        for (target, alias) in targets {
            if !aliases.contains(alias.as_str()) {
                return Err(DiagramError::render_error(format!(
                    "link from {} points to {}, which is not in the diagram",
                    node.uri, target
                )));
            }
        }
    }
    Ok(())
}

fn escape(label: &str) -> String {
    label.replace('"', "'")
}

impl Renderer for PlantUmlRenderer {
    type Output = String;

    fn render(&self, view: &DiagramView) -> Result<Self::Output> {
        let render_span = span!(Level::INFO, "render_plantuml", node_count = view.nodes.len());
        let _enter = render_span.enter();

        check_link_targets(view)?;

        let mut out = String::from("@startuml\n");
        if let Some(name) = &view.name {
            writeln!(out, "title {}", name)?;
        }
        if !self.style.global.is_empty() {
            writeln!(out, "{}", self.style.global.trim_end())?;
        }
        for node in &view.nodes {
            self.write_class(&mut out, node)?;
        }
        for node in &view.nodes {
            self.write_super_links(&mut out, node)?;
        }
        for node in &view.nodes {
            self.write_property_links(&mut out, node)?;
        }
        out.push_str("@enduml\n");

        debug!(
            links = view.link_count(),
            super_links = view.super_link_count(),
            "PlantUML rendered"
        );
        Ok(out)
    }

    fn name(&self) -> &'static str {
        "plantuml"
    }

    fn version(&self) -> &'static str {
        "1.0.0"
    }

    fn format(&self) -> &'static str {
        "plantuml"
    }
}
