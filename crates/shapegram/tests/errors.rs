//! Error reporting and recovery

use shapegram::definition::DefinitionDocument;
use shapegram::schema::SchemaDocument;
use shapegram::{compose, render_plantuml, DiagramError};

const SCHEMA: &str = r#"
prefixes:
  ex: http://example.org/
classes:
  - uri: ex:Person
  - uri: ex:Organization
shapes:
  - id: ex:PersonShape
    targetClass: ex:Person
    property:
      - path: ex:worksAt
        class: ex:Organization
"#;

#[test]
fn test_only_and_exclude_in_one_scope_is_config_error() {
    let definition = "onlyProperties: [ex:a]\nexcludeProperties: [ex:b]\n";
    let error = compose(SCHEMA, Some(definition)).unwrap_err();
    assert!(matches!(error, DiagramError::ConfigError { .. }));
    assert!(!error.is_recoverable());
}

#[test]
fn test_conflict_on_a_class_entry() {
    let definition = r#"
classes:
  - uri: ex:Person
    onlyOutLinks: [ex:worksAt]
    excludeOutLinks: [ex:knows]
"#;
    let error = compose(SCHEMA, Some(definition)).unwrap_err();
    assert!(error.to_string().starts_with("Config error:"));
}

#[test]
fn test_only_and_exclude_across_the_chain_is_config_error() {
    let definition = r#"
onlyProperties: [ex:worksAt]
classes:
  - uri: ex:Person
    excludeProperties: [ex:knows]
"#;
    let error = compose(SCHEMA, Some(definition)).unwrap_err();
    assert!(matches!(error, DiagramError::ConfigError { .. }));
}

#[test]
fn test_only_and_exclude_in_different_scopes_is_fine() {
    let definition = r#"
onlyProperties: [ex:worksAt]
classes:
  - uri: ex:Person
    excludeOutLinks: [ex:knows]
"#;
    assert!(compose(SCHEMA, Some(definition)).is_ok());
}

#[test]
fn test_unresolvable_listed_class_is_dropped() {
    let definition = "classes:\n  - uri: ex:Ghost\n  - uri: ex:Person\n";
    let diagram = compose(SCHEMA, Some(definition)).unwrap();
    assert_eq!(diagram.len(), 1);
    assert!(diagram.node("http://example.org/Person").is_some());
    assert!(diagram.node("http://example.org/Ghost").is_none());
}

#[test]
fn test_unresolvable_classes_are_reported_by_validation() {
    let schema = SchemaDocument::from_yaml_str(SCHEMA)
        .unwrap()
        .into_schema()
        .unwrap();
    let definition =
        DefinitionDocument::from_yaml_str("classes:\n  - uri: ex:Ghost\n  - uri: ex:Phantom\n")
            .unwrap();
    let mut registry = shapegram::definition::DefinitionRegistry::new();
    registry.listed_class("http://example.org/Ghost");
    registry.listed_class("http://example.org/Person");

    let recovered = registry.validate(&schema).unwrap();
    assert_eq!(recovered.len(), 1);
    assert!(recovered[0].is_recoverable());
    assert!(recovered[0].to_string().contains("http://example.org/Ghost"));
    assert_eq!(registry.listed_classes(), vec!["http://example.org/Person".to_string()]);

    let registry = definition.into_registry(&schema).unwrap();
    assert!(registry.listed_classes().is_empty());
}

#[test]
fn test_malformed_documents() {
    let schema_error = compose("classes: [", None).unwrap_err();
    assert!(matches!(schema_error, DiagramError::SchemaError { .. }));

    let definition_error = compose(SCHEMA, Some("classes: {uri: [")).unwrap_err();
    assert!(matches!(definition_error, DiagramError::DefinitionError { .. }));
}

#[test]
fn test_render_reports_composition_errors() {
    let error = render_plantuml(SCHEMA, Some("onlyOutLinks: [ex:a]\nexcludeOutLinks: [ex:b]\n"))
        .unwrap_err();
    let cause = error.downcast_ref::<DiagramError>().unwrap();
    assert!(matches!(cause, DiagramError::ConfigError { .. }));
}

#[test]
fn test_error_display() {
    let cases = [
        (DiagramError::config_error("bad".to_string()), "Config error: bad"),
        (
            DiagramError::unresolvable_reference("ex:A".to_string(), "missing".to_string()),
            "Unresolvable reference: ex:A (missing)",
        ),
        (
            DiagramError::model_inconsistency("dangling".to_string()),
            "Model inconsistency: dangling",
        ),
        (DiagramError::schema_error("s".to_string()), "Schema error: s"),
        (DiagramError::definition_error("d".to_string()), "Definition error: d"),
        (DiagramError::layout_error("l".to_string()), "Layout error: l"),
        (DiagramError::render_error("r".to_string()), "Render error: r"),
    ];
    for (error, expected) in cases {
        assert_eq!(error.to_string(), expected);
    }
}

#[test]
fn test_io_error_conversion() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
    let error: DiagramError = io.into();
    assert!(error.to_string().starts_with("IO error:"));
    assert!(!error.is_recoverable());
}
