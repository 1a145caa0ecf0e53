//! Schema documents
//!
//! A YAML (or JSON) description of a vocabulary and its shapes, loaded with
//! serde into a [`MemorySchema`]. Names may be written as prefixed names
//! and are expanded against the document's `prefixes`. Shapes can refer to
//! each other by id or nest inline; inline shapes without an id become blank
//! nodes.
//!
//! ```yaml
//! prefixes:
//!   ex: http://example.org/
//! classes:
//!   - uri: ex:Person
//!     label: Person
//!     superClasses: [ex:Agent]
//! shapes:
//!   - id: ex:PersonShape
//!     targetClass: ex:Person
//!     property:
//!       - path: ex:worksAt
//!         class: ex:Organization
//!         maxCount: 1
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, span, Level};

use crate::core::{DiagramError, SchemaGraph};

use super::memory::MemorySchema;
use super::path::PathParser;
use super::shape::{PropertyPath, Shape, ShapeId};

/// A single value or a list of values
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> Default for OneOrMany<T> {
    fn default() -> Self {
        OneOrMany::Many(Vec::new())
    }
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(value) => vec![value],
            OneOrMany::Many(values) => values,
        }
    }
}

/// Top-level schema document
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaDocument {
    #[serde(default)]
    pub prefixes: BTreeMap<String, String>,
    #[serde(default)]
    pub classes: Vec<ClassEntry>,
    #[serde(default)]
    pub resources: Vec<ResourceEntry>,
    #[serde(default)]
    pub shapes: Vec<ShapeEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassEntry {
    pub uri: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub pref_label: Option<String>,
    #[serde(default)]
    pub super_classes: OneOrMany<String>,
}

/// Labelled non-class resource, typically a property
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceEntry {
    pub uri: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub pref_label: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum ShapeKind {
    NodeShape,
    PropertyShape,
}

/// Shape reference: an id or an inline shape
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ShapeRef {
    Id(String),
    Inline(Box<ShapeEntry>),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeEntry {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<ShapeKind>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub target_class: OneOrMany<String>,
    #[serde(default)]
    pub class: OneOrMany<String>,
    #[serde(default)]
    pub datatype: OneOrMany<String>,
    #[serde(default)]
    pub has_value: OneOrMany<serde_yaml::Value>,
    #[serde(default)]
    pub property: OneOrMany<ShapeRef>,
    #[serde(default)]
    pub node: OneOrMany<ShapeRef>,
    #[serde(default)]
    pub qualified_value_shape: OneOrMany<ShapeRef>,
    #[serde(default)]
    pub and: Vec<ShapeRef>,
    #[serde(default)]
    pub or: Vec<ShapeRef>,
    #[serde(default)]
    pub xone: Vec<ShapeRef>,
    #[serde(default)]
    pub min_count: Option<u32>,
    #[serde(default)]
    pub max_count: Option<u32>,
    #[serde(default)]
    pub qualified_min_count: Option<u32>,
    #[serde(default)]
    pub qualified_max_count: Option<u32>,
    #[serde(default)]
    pub pattern: OneOrMany<String>,
    #[serde(default)]
    pub sparql: OneOrMany<String>,
}

impl SchemaDocument {
    /// Parse a YAML or JSON document
    pub fn from_yaml_str(input: &str) -> Result<Self, DiagramError> {
        serde_yaml::from_str(input)
            .map_err(|e| DiagramError::schema_error(format!("Invalid schema document: {}", e)))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DiagramError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Build the in-memory schema graph
    pub fn into_schema(self) -> Result<MemorySchema, DiagramError> {
        let span = span!(
            Level::INFO,
            "load_schema",
            classes = self.classes.len(),
            shapes = self.shapes.len()
        );
        let _enter = span.enter();

        let mut schema = MemorySchema::new();
        for (prefix, namespace) in &self.prefixes {
            schema.add_prefix(prefix.as_str(), namespace.as_str());
        }

        for class in self.classes {
            let uri = schema.expand_prefix(&class.uri);
            schema.add_class(uri.clone());
            for sup in class.super_classes.into_vec() {
                let sup = schema.expand_prefix(&sup);
                schema.add_super_class(uri.clone(), sup);
            }
            if let Some(label) = class.pref_label.or(class.label) {
                schema.set_label(uri, label);
            }
        }

        for resource in self.resources {
            if let Some(label) = resource.pref_label.or(resource.label) {
                let uri = schema.expand_prefix(&resource.uri);
                schema.set_label(uri, label);
            }
        }

        let mut loader = ShapeLoader {
            parser: PathParser::new(),
            shapes: Vec::new(),
            anonymous: 0,
        };
        for entry in self.shapes {
            loader.load(&schema, entry)?;
        }

        let count = loader.shapes.len();
        for shape in loader.shapes {
            schema.add_shape(shape);
        }
        debug!(shape_count = count, "Loaded schema shapes");

        Ok(schema)
    }
}

/// Flattens nested shape entries into shapes with ids
struct ShapeLoader {
    parser: PathParser,
    shapes: Vec<Shape>,
    anonymous: usize,
}

impl ShapeLoader {
    fn shape_id(&mut self, schema: &MemorySchema, id: Option<&str>) -> ShapeId {
        match id {
            Some(id) => match id.strip_prefix("_:") {
                Some(blank) => ShapeId::blank(blank),
                None => ShapeId::iri(schema.expand_prefix(id)),
            },
            None => {
                self.anonymous += 1;
                ShapeId::blank(format!("anon{}", self.anonymous))
            }
        }
    }

    fn resolve(&mut self, schema: &MemorySchema, reference: ShapeRef) -> Result<ShapeId, DiagramError> {
        match reference {
            ShapeRef::Id(id) => Ok(self.shape_id(schema, Some(&id))),
            ShapeRef::Inline(entry) => self.load(schema, *entry),
        }
    }

    fn resolve_all(
        &mut self,
        schema: &MemorySchema,
        references: Vec<ShapeRef>,
    ) -> Result<Vec<ShapeId>, DiagramError> {
        references
            .into_iter()
            .map(|reference| self.resolve(schema, reference))
            .collect()
    }

    fn load(&mut self, schema: &MemorySchema, entry: ShapeEntry) -> Result<ShapeId, DiagramError> {
        let id = self.shape_id(schema, entry.id.as_deref());
        let expand = |uris: OneOrMany<String>| -> Vec<String> {
            uris.into_vec().iter().map(|u| schema.expand_prefix(u)).collect()
        };

        let path = match entry.path {
            Some(text) => Some(self.parse_path(schema, &id, &text)?),
            None => None,
        };

        let has_values = entry
            .has_value
            .into_vec()
            .into_iter()
            .map(|value| literal_text(&id, value))
            .collect::<Result<Vec<_>, _>>()?;

        let mut shape = Shape::new(id.clone());
        shape.declared_property_shape = entry.kind == Some(ShapeKind::PropertyShape);
        shape.path = path;
        shape.target_classes = expand(entry.target_class);
        shape.classes = expand(entry.class);
        shape.datatypes = expand(entry.datatype);
        shape.has_values = has_values;
        shape.min_count = entry.min_count;
        shape.max_count = entry.max_count;
        shape.qualified_min_count = entry.qualified_min_count;
        shape.qualified_max_count = entry.qualified_max_count;
        shape.patterns = entry.pattern.into_vec();
        shape.sparql = entry.sparql.into_vec();
        shape.properties = self.resolve_all(schema, entry.property.into_vec())?;
        shape.nodes = self.resolve_all(schema, entry.node.into_vec())?;
        shape.qualified_value_shapes =
            self.resolve_all(schema, entry.qualified_value_shape.into_vec())?;
        shape.and = self.resolve_all(schema, entry.and)?;
        shape.or = self.resolve_all(schema, entry.or)?;
        shape.xone = self.resolve_all(schema, entry.xone)?;

        self.shapes.push(shape);
        Ok(id)
    }

    fn parse_path(
        &self,
        schema: &MemorySchema,
        id: &ShapeId,
        text: &str,
    ) -> Result<PropertyPath, DiagramError> {
        self.parser
            .parse_path(text)
            .map(|path| path.map_predicates(&|uri: String| schema.expand_prefix(&uri)))
            .map_err(|e| {
                DiagramError::schema_error(format!("Invalid path '{}' on shape {}: {}", text, id, e))
            })
    }
}

fn literal_text(id: &ShapeId, value: serde_yaml::Value) -> Result<String, DiagramError> {
    match value {
        serde_yaml::Value::String(text) => Ok(text),
        serde_yaml::Value::Number(number) => Ok(number.to_string()),
        serde_yaml::Value::Bool(flag) => Ok(flag.to_string()),
        other => Err(DiagramError::schema_error(format!(
            "Unsupported hasValue {:?} on shape {}",
            other, id
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Reach, ShapeLink};

    const DOC: &str = r#"
prefixes:
  ex: http://ex.org/
classes:
  - uri: ex:Person
    prefLabel: Person
    label: human
    superClasses: ex:Agent
  - uri: ex:Organization
resources:
  - uri: ex:worksAt
    label: works at
shapes:
  - id: ex:PersonShape
    targetClass: ex:Person
    property:
      - path: ex:worksAt
        class: ex:Organization
        maxCount: 1
      - _:named
  - id: _:named
    type: PropertyShape
    path: ^ex:employs | ex:memberOf
    hasValue: [42, true, text]
"#;

    #[test]
    fn test_load_classes_and_labels() {
        let schema = SchemaDocument::from_yaml_str(DOC).unwrap().into_schema().unwrap();
        assert!(schema.has_class("http://ex.org/Person"));
        assert!(schema.has_class("http://ex.org/Agent"));
        assert!(schema
            .super_classes("http://ex.org/Person", Reach::Direct)
            .contains("http://ex.org/Agent"));
        assert_eq!(schema.label("http://ex.org/Person").as_deref(), Some("Person"));
        assert_eq!(schema.label("http://ex.org/worksAt").as_deref(), Some("works at"));
    }

    #[test]
    fn test_inline_and_referenced_shapes() {
        let schema = SchemaDocument::from_yaml_str(DOC).unwrap().into_schema().unwrap();
        assert_eq!(schema.shape_count(), 3);

        let person = schema.shape(&ShapeId::iri("http://ex.org/PersonShape")).unwrap();
        assert_eq!(person.properties.len(), 2);
        assert_eq!(person.properties[0], ShapeId::blank("anon1"));

        let inline = schema.shape(&ShapeId::blank("anon1")).unwrap();
        assert_eq!(inline.classes, vec!["http://ex.org/Organization".to_string()]);
        assert_eq!(inline.max_count, Some(1));
        assert!(inline.is_property_shape());

        let named = schema.shape(&ShapeId::blank("named")).unwrap();
        assert_eq!(named.has_values, vec!["42", "true", "text"]);
        assert_eq!(
            named.path.as_ref().unwrap().predicates(),
            vec!["http://ex.org/employs", "http://ex.org/memberOf"]
        );
        assert_eq!(
            schema.referrers(&ShapeId::blank("named"), ShapeLink::Property),
            vec![ShapeId::iri("http://ex.org/PersonShape")]
        );
    }

    #[test]
    fn test_invalid_documents() {
        let bad_path = "shapes:\n  - id: _:s\n    path: \"ex:a |\"\n";
        let err = SchemaDocument::from_yaml_str(bad_path)
            .unwrap()
            .into_schema()
            .unwrap_err();
        assert!(format!("{}", err).contains("Invalid path"));

        let err = SchemaDocument::from_yaml_str("classes: 12").unwrap_err();
        assert!(format!("{}", err).contains("Schema error"));
    }
}
