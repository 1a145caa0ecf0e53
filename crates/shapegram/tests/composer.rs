//! Composition scenarios over small schema documents

use std::collections::BTreeSet;

use shapegram::compose;
use shapegram::model::{decompose_uri, is_shape_specific, Diagram};
use shapegram::schema::ShapeId;
use shapegram::StyleClass;
use shapegram::layout::LayoutResult;
use shapegram::render::DiagramView;

const EMPLOYMENT: &str = r#"
prefixes:
  ex: http://example.org/
classes:
  - uri: ex:Agent
  - uri: ex:Person
    superClasses: [ex:Agent]
  - uri: ex:Organization
    superClasses: [ex:Agent]
shapes:
  - id: ex:PersonShape
    targetClass: ex:Person
    property:
      - ex:WorksAtShape
  - id: ex:WorksAtShape
    type: PropertyShape
    path: ex:worksAt
    class: ex:Organization
    maxCount: 1
    pattern: "^ACME"
"#;

const PERSON: &str = "http://example.org/Person";
const ORGANIZATION: &str = "http://example.org/Organization";
const VARIANT: &str =
    "http://example.org/Organization---uri:http://example.org/WorksAtShape";

fn uris(diagram: &Diagram) -> Vec<&str> {
    diagram.nodes().iter().map(|node| node.uri.as_str()).collect()
}

#[test]
fn test_constrained_range_becomes_variant() {
    let diagram = compose(EMPLOYMENT, None).unwrap();
    assert_eq!(uris(&diagram), vec![VARIANT, PERSON]);

    let variant = diagram.node(VARIANT).unwrap();
    assert!(variant.is_shape_specific());
    assert_eq!(variant.origin(), Some(ORGANIZATION));
    assert_eq!(variant.label, "Organization (WorksAtShape)");

    let person = diagram.node(PERSON).unwrap();
    assert_eq!(person.property_links().len(), 1);
    let link = &person.property_links()[0];
    assert_eq!(link.label, "worksAt");
    assert_eq!(link.cardinality(), "0..1");
    assert!(link.objects.contains(VARIANT));
}

#[test]
fn test_link_into_variant_is_styled_as_in_link() {
    let diagram = compose(EMPLOYMENT, None).unwrap();
    let view = DiagramView::build(&diagram, &LayoutResult::empty());
    let person = view.node(PERSON).unwrap();
    assert_eq!(person.links.len(), 1);
    assert_eq!(person.links[0].style, StyleClass::ShapeSpecificInLink);
    assert_eq!(person.links[0].cardinality, "0..1");
    assert_eq!(view.node(VARIANT).unwrap().style, StyleClass::ShapeSpecificClass);
}

#[test]
fn test_variant_links_to_its_origin() {
    let definition = "expandSuperClasses: true\n";
    let diagram = compose(EMPLOYMENT, Some(definition)).unwrap();

    assert!(diagram.is_included(ORGANIZATION));
    let variant = diagram.node(VARIANT).unwrap();
    assert_eq!(variant.super_class_links(), [ORGANIZATION.to_string()]);
    assert!(variant.super_class_stereotypes().is_empty());
}

#[test]
fn test_variant_stereotypes_show_origin_supers() {
    let definition = r#"
classes:
  - uri: ex:Person
    expandOutLinks: true
"#;
    let diagram = compose(EMPLOYMENT, Some(definition)).unwrap();
    assert!(!diagram.is_included(ORGANIZATION));
    let variant = diagram.node(VARIANT).unwrap();
    assert_eq!(
        variant.super_class_stereotypes(),
        ["http://example.org/Agent".to_string()]
    );
    assert_eq!(diagram.class_label("http://example.org/Agent"), "Agent");
}

#[test]
fn test_only_out_links_keeps_other_properties_inner() {
    let schema = r#"
prefixes:
  ex: http://example.org/
classes:
  - uri: ex:Person
  - uri: ex:Name
  - uri: ex:Age
shapes:
  - id: ex:PersonShape
    targetClass: ex:Person
    property:
      - path: ex:hasName
        class: ex:Name
      - path: ex:hasAge
        class: ex:Age
"#;
    let definition = r#"
classes:
  - uri: ex:Person
    expandOutLinks: true
    onlyOutLinks: [ex:hasName]
"#;
    let diagram = compose(schema, Some(definition)).unwrap();
    assert_eq!(
        uris(&diagram),
        vec!["http://example.org/Name", "http://example.org/Person"]
    );

    let person = diagram.node("http://example.org/Person").unwrap();
    let links: Vec<&str> = person.property_links().iter().map(|p| p.label.as_str()).collect();
    let inner: Vec<&str> = person.inner_properties().iter().map(|p| p.label.as_str()).collect();
    assert_eq!(links, vec!["hasName"]);
    assert_eq!(inner, vec!["hasAge"]);
}

#[test]
fn test_expand_in_links() {
    let schema = r#"
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
    let definition = r#"
classes:
  - uri: ex:Organization
    expandInLinks: true
"#;
    let diagram = compose(schema, Some(definition)).unwrap();
    assert!(diagram.is_included(PERSON));
    let person = diagram.node(PERSON).unwrap();
    assert_eq!(person.property_links().len(), 1);
}

#[test]
fn test_indirect_super_class_links() {
    let schema = r#"
prefixes:
  ex: http://example.org/
classes:
  - uri: ex:Thing
  - uri: ex:Animal
    superClasses: [ex:Thing]
  - uri: ex:Dog
    superClasses: [ex:Animal]
"#;
    let definition = r#"
classes:
  - uri: ex:Dog
  - uri: ex:Thing
"#;
    let diagram = compose(schema, Some(definition)).unwrap();
    let dog = diagram.node("http://example.org/Dog").unwrap();
    assert!(dog.super_class_links().is_empty());
    assert_eq!(dog.indirect_super_class_links(), ["http://example.org/Thing".to_string()]);
    assert_eq!(dog.super_class_stereotypes(), ["http://example.org/Animal".to_string()]);

    let hidden = compose(
        schema,
        Some("hideIndirectSuperClassLinks: true\nclasses: [{uri: ex:Dog}, {uri: ex:Thing}]\n"),
    )
    .unwrap();
    assert!(hidden
        .node("http://example.org/Dog")
        .unwrap()
        .indirect_super_class_links()
        .is_empty());
}

#[test]
fn test_transitive_sub_class_expansion() {
    let schema = r#"
prefixes:
  ex: http://example.org/
classes:
  - uri: ex:Animal
  - uri: ex:Mammal
    superClasses: [ex:Animal]
  - uri: ex:Dog
    superClasses: [ex:Mammal]
"#;
    let direct = compose(schema, Some("classes: [{uri: ex:Animal, expandSubClasses: true}]")).unwrap();
    assert_eq!(direct.len(), 2);

    let transitive = compose(
        schema,
        Some("classes: [{uri: ex:Animal, expandTransitiveSubClasses: true}]"),
    )
    .unwrap();
    assert_eq!(transitive.len(), 3);
}

#[test]
fn test_no_dangling_links() {
    let diagram = compose(EMPLOYMENT, Some("expandSuperClasses: true\nexpandSubClasses: true\n")).unwrap();
    for node in diagram.nodes() {
        for link in node.property_links() {
            for object in &link.objects {
                assert!(diagram.is_included(object), "{} links to {}", node.uri, object);
            }
        }
        for target in node.super_class_links().iter().chain(node.indirect_super_class_links()) {
            assert!(diagram.is_included(target));
        }
    }
}

#[test]
fn test_inner_properties_and_links_partition_included() {
    let diagram = compose(EMPLOYMENT, None).unwrap();
    for node in diagram.nodes() {
        let inner: BTreeSet<&ShapeId> = node.inner_properties().iter().map(|p| &p.shape).collect();
        let links: BTreeSet<&ShapeId> = node.property_links().iter().map(|p| &p.shape).collect();
        let included: BTreeSet<&ShapeId> = node.included_properties().iter().map(|p| &p.shape).collect();
        assert!(inner.is_disjoint(&links));
        assert_eq!(inner.union(&links).cloned().collect::<BTreeSet<_>>(), included);
    }
}

#[test]
fn test_composition_is_idempotent() {
    let first = compose(EMPLOYMENT, Some("expandSuperClasses: true\n")).unwrap();
    let second = compose(EMPLOYMENT, Some("expandSuperClasses: true\n")).unwrap();
    assert_eq!(uris(&first), uris(&second));
    for (a, b) in first.nodes().iter().zip(second.nodes()) {
        assert_eq!(a.label, b.label);
        assert_eq!(a.views(), b.views());
    }
}

#[test]
fn test_cardinality_reconciles_nested_shapes() {
    let schema = r#"
prefixes:
  ex: http://example.org/
classes:
  - uri: ex:Team
shapes:
  - id: ex:TeamShape
    targetClass: ex:Team
    property:
      - path: ex:member
        and:
          - minCount: 1
            maxCount: 3
          - minCount: 2
            maxCount: 1
"#;
    let diagram = compose(schema, None).unwrap();
    let team = diagram.node("http://example.org/Team").unwrap();
    let member = &team.inner_properties()[0];
    assert_eq!(member.min_count, Some(2));
    assert_eq!(member.max_count, Some(1));
    assert_eq!(member.cardinality(), "1");
}

#[test]
fn test_cyclic_shape_references_terminate() {
    let schema = r#"
prefixes:
  ex: http://example.org/
classes:
  - uri: ex:Node
shapes:
  - id: ex:A
    targetClass: ex:Node
    and: [ex:B]
  - id: ex:B
    or: [ex:A]
    property:
      - path: ex:next
        class: ex:Node
"#;
    let diagram = compose(schema, None).unwrap();
    let node = diagram.node("http://example.org/Node").unwrap();
    assert_eq!(node.included_properties().len(), 1);
}

#[test]
fn test_variant_uris_round_trip() {
    let diagram = compose(EMPLOYMENT, None).unwrap();
    for node in diagram.nodes().iter().filter(|node| is_shape_specific(&node.uri)) {
        let (origin, shape) = decompose_uri(&node.uri).unwrap();
        assert_eq!(Some(origin.as_str()), node.origin());
        assert_eq!(shape, node.shapes[0]);
    }
}

#[test]
fn test_hide_flags() {
    let definition = r#"
hideInnerProperties: true
hideOutLinks: true
classes:
  - uri: ex:Person
    expandOutLinks: true
"#;
    let diagram = compose(EMPLOYMENT, Some(definition)).unwrap();
    let person = diagram.node(PERSON).unwrap();
    assert!(person.inner_properties().is_empty());
    assert!(person.property_links().is_empty());
    assert_eq!(person.included_properties().len(), 1);
}

const PEOPLE: &str = r#"
prefixes:
  ex: http://example.org/
classes:
  - uri: ex:Person
  - uri: ex:Name
  - uri: ex:Age
shapes:
  - id: ex:PersonShape
    targetClass: ex:Person
    property:
      - path: ex:hasName
        class: ex:Name
      - path: ex:hasAge
        class: ex:Age
"#;

fn labels(properties: &[shapegram::model::PropertyOccurrence]) -> Vec<&str> {
    properties.iter().map(|p| p.label.as_str()).collect()
}

#[test]
fn test_exclude_out_links() {
    let definition = r#"
classes:
  - uri: ex:Person
    expandOutLinks: true
    excludeOutLinks: [ex:hasAge]
"#;
    let diagram = compose(PEOPLE, Some(definition)).unwrap();
    assert_eq!(
        uris(&diagram),
        vec!["http://example.org/Name", "http://example.org/Person"]
    );

    let person = diagram.node(PERSON).unwrap();
    assert_eq!(labels(person.property_links()), vec!["hasName"]);
    assert_eq!(labels(person.inner_properties()), vec!["hasAge"]);

    let view = DiagramView::build(&diagram, &LayoutResult::empty());
    let person = view.node(PERSON).unwrap();
    assert_eq!(person.links.len(), 1);
    assert_eq!(person.links[0].label, "hasName");
    assert_eq!(person.attributes.len(), 1);
    assert_eq!(person.attributes[0].label, "hasAge");
}

#[test]
fn test_only_properties_removes_the_rest() {
    let definition = r#"
onlyProperties: [ex:hasName]
classes:
  - uri: ex:Person
    expandOutLinks: true
"#;
    let diagram = compose(PEOPLE, Some(definition)).unwrap();
    assert!(!diagram.is_included("http://example.org/Age"));

    let person = diagram.node(PERSON).unwrap();
    assert_eq!(labels(person.included_properties()), vec!["hasName"]);
    assert!(person.inner_properties().is_empty());

    let view = DiagramView::build(&diagram, &LayoutResult::empty());
    let person = view.node(PERSON).unwrap();
    assert!(person.attributes.is_empty());
    assert_eq!(person.links.len(), 1);
    assert_eq!(person.links[0].label, "hasName");
}

#[test]
fn test_display_property_uri() {
    let definition = r#"
classes:
  - uri: ex:Person
    displayPropertyUri: true
"#;
    let diagram = compose(PEOPLE, Some(definition)).unwrap();
    let person = diagram.node(PERSON).unwrap();
    assert_eq!(labels(person.inner_properties()), vec!["ex:hasAge", "ex:hasName"]);

    let view = DiagramView::build(&diagram, &LayoutResult::empty());
    let attributes: Vec<&str> = view
        .node(PERSON)
        .unwrap()
        .attributes
        .iter()
        .map(|a| a.label.as_str())
        .collect();
    assert_eq!(attributes, vec!["ex:hasAge", "ex:hasName"]);
}

#[test]
fn test_transitive_super_class_expansion() {
    let schema = r#"
prefixes:
  ex: http://example.org/
classes:
  - uri: ex:Animal
  - uri: ex:Mammal
    superClasses: [ex:Animal]
  - uri: ex:Dog
    superClasses: [ex:Mammal]
"#;
    let direct = compose(schema, Some("classes: [{uri: ex:Dog, expandSuperClasses: true}]")).unwrap();
    assert_eq!(
        uris(&direct),
        vec!["http://example.org/Dog", "http://example.org/Mammal"]
    );

    let transitive = compose(
        schema,
        Some("classes: [{uri: ex:Dog, expandTransitiveSuperClasses: true}]"),
    )
    .unwrap();
    assert_eq!(
        uris(&transitive),
        vec![
            "http://example.org/Animal",
            "http://example.org/Dog",
            "http://example.org/Mammal"
        ]
    );
    let mammal = transitive.node("http://example.org/Mammal").unwrap();
    assert_eq!(mammal.super_class_links(), ["http://example.org/Animal".to_string()]);
    let dog = transitive.node("http://example.org/Dog").unwrap();
    assert_eq!(dog.super_class_links(), ["http://example.org/Mammal".to_string()]);
    assert!(dog.indirect_super_class_links().is_empty());
}
