//! Projection tests over a fixture oracle with fixed hierarchies and
//! satisfiability results.

use mimizuku_owl::{
    Class, ClassExpression, DataProperty, ObjectProperty, ObjectPropertyExpression, OwlError,
    Reasoner,
};
use mimizuku_uml::{render, DomainIndex, DomainKey, UmlError};
use proptest::prelude::*;
use std::collections::{HashMap, HashSet, VecDeque};
use std::hash::Hash;

fn class(name: &str) -> Class {
    Class::from_iri(&format!("http://example.org/{}", name))
}

fn data_property(name: &str) -> DataProperty {
    DataProperty::from_iri(&format!("http://example.org/{}", name))
}

fn object_property(name: &str) -> ObjectPropertyExpression {
    ObjectPropertyExpression::Property(ObjectProperty::from_iri(&format!(
        "http://example.org/{}",
        name
    )))
}

fn object_root() -> ObjectPropertyExpression {
    ObjectPropertyExpression::Property(ObjectProperty::Top)
}

/// Oracle double returning fixed hierarchies and satisfiability results.
#[derive(Default)]
struct FixtureReasoner {
    subclasses: HashMap<Class, Vec<Class>>,
    unsatisfiable: HashSet<Class>,
    data_children: HashMap<DataProperty, Vec<DataProperty>>,
    data_domains: HashMap<DataProperty, Vec<ClassExpression>>,
    object_children: HashMap<ObjectPropertyExpression, Vec<ObjectPropertyExpression>>,
    object_domains: HashMap<ObjectPropertyExpression, Vec<ClassExpression>>,
    object_ranges: HashMap<ObjectPropertyExpression, Vec<ClassExpression>>,
    signature: Vec<Class>,
    failing: bool,
}

fn transitive<T: Clone + Eq + Hash>(children: &HashMap<T, Vec<T>>, node: &T) -> Vec<T> {
    let mut result = Vec::new();
    let mut seen = HashSet::new();
    let mut queue: VecDeque<T> = children.get(node).cloned().unwrap_or_default().into();
    while let Some(current) = queue.pop_front() {
        if seen.insert(current.clone()) {
            if let Some(more) = children.get(&current) {
                queue.extend(more.iter().cloned());
            }
            result.push(current);
        }
    }
    result
}

impl Reasoner for FixtureReasoner {
    fn is_satisfiable(&self, class: &Class) -> Result<bool, OwlError> {
        if self.failing {
            return Err(OwlError::ReasoningError("backend failure".to_string()));
        }
        Ok(!self.unsatisfiable.contains(class))
    }

    fn subclasses_of(&self, class: &Class, direct: bool) -> Result<Vec<Class>, OwlError> {
        if direct {
            Ok(self.subclasses.get(class).cloned().unwrap_or_default())
        } else {
            Ok(transitive(&self.subclasses, class))
        }
    }

    fn data_subproperties_of(
        &self,
        property: &DataProperty,
        direct: bool,
    ) -> Result<Vec<DataProperty>, OwlError> {
        if direct {
            Ok(self.data_children.get(property).cloned().unwrap_or_default())
        } else {
            Ok(transitive(&self.data_children, property))
        }
    }

    fn object_subproperties_of(
        &self,
        property: &ObjectPropertyExpression,
        direct: bool,
    ) -> Result<Vec<ObjectPropertyExpression>, OwlError> {
        if direct {
            Ok(self
                .object_children
                .get(property)
                .cloned()
                .unwrap_or_default())
        } else {
            Ok(transitive(&self.object_children, property))
        }
    }

    fn data_property_domains(
        &self,
        property: &DataProperty,
    ) -> Result<Vec<ClassExpression>, OwlError> {
        Ok(self.data_domains.get(property).cloned().unwrap_or_default())
    }

    fn object_property_domains(
        &self,
        property: &ObjectPropertyExpression,
    ) -> Result<Vec<ClassExpression>, OwlError> {
        Ok(self
            .object_domains
            .get(property)
            .cloned()
            .unwrap_or_default())
    }

    fn object_property_ranges(
        &self,
        property: &ObjectPropertyExpression,
    ) -> Result<Vec<ClassExpression>, OwlError> {
        Ok(self
            .object_ranges
            .get(property)
            .cloned()
            .unwrap_or_default())
    }

    fn classes_in_signature(&self) -> Result<Vec<Class>, OwlError> {
        Ok(self.signature.clone())
    }
}

fn render_to_string(fixture: &FixtureReasoner) -> String {
    let mut out = Vec::new();
    render(fixture, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn unsatisfiable_class_is_suppressed_but_reported() {
    let mut fixture = FixtureReasoner::default();
    fixture
        .subclasses
        .insert(Class::Thing, vec![class("Animal")]);
    fixture
        .subclasses
        .insert(class("Animal"), vec![class("Dog")]);
    fixture.unsatisfiable.insert(class("Dog"));
    fixture
        .data_children
        .insert(DataProperty::Top, vec![data_property("hasName")]);
    fixture.data_domains.insert(
        data_property("hasName"),
        vec![ClassExpression::Class(class("Animal"))],
    );
    fixture.signature = vec![class("Animal"), class("Dog")];

    let output = render_to_string(&fixture);
    assert_eq!(
        output,
        "@startuml\n\
         hide methods\n\
         class Animal<http://example.org/> {\n\
         \thasName\n\
         }\n\
         XXX: Dog\n\
         @enduml\n"
    );
}

#[test]
fn unsatisfiable_subtree_suppresses_satisfiable_descendants() {
    let mut fixture = FixtureReasoner::default();
    fixture.subclasses.insert(Class::Thing, vec![class("A")]);
    fixture.subclasses.insert(class("A"), vec![class("B")]);
    fixture.subclasses.insert(class("B"), vec![class("C")]);
    fixture.unsatisfiable.insert(class("B"));
    fixture.signature = vec![class("A"), class("B"), class("C")];

    let output = render_to_string(&fixture);
    assert!(output.contains("class A<"));
    assert!(!output.contains("class B<"));
    // C is satisfiable but unreachable once its parent is dropped.
    assert!(!output.contains("class C<"));
    assert!(output.contains("XXX: B\n"));
    assert!(!output.contains("XXX: C"));
}

#[test]
fn satisfiable_chain_emits_blocks_and_edges_in_preorder() {
    let mut fixture = FixtureReasoner::default();
    fixture.subclasses.insert(Class::Thing, vec![class("A")]);
    fixture.subclasses.insert(class("A"), vec![class("B")]);
    fixture.subclasses.insert(class("B"), vec![class("C")]);
    fixture.signature = vec![class("A"), class("B"), class("C")];

    let output = render_to_string(&fixture);
    assert_eq!(
        output,
        "@startuml\n\
         hide methods\n\
         class A<http://example.org/> {\n\
         }\n\
         class B<http://example.org/> {\n\
         }\n\
         A <|-- B\n\
         class C<http://example.org/> {\n\
         }\n\
         B <|-- C\n\
         @enduml\n"
    );
}

#[test]
fn multiple_parents_emit_one_block_per_edge() {
    let mut fixture = FixtureReasoner::default();
    fixture
        .subclasses
        .insert(Class::Thing, vec![class("A"), class("B")]);
    fixture.subclasses.insert(class("A"), vec![class("C")]);
    fixture.subclasses.insert(class("B"), vec![class("C")]);
    fixture.signature = vec![class("A"), class("B"), class("C")];

    let output = render_to_string(&fixture);
    assert_eq!(output.matches("class C<").count(), 2);
    assert!(output.contains("A <|-- C\n"));
    assert!(output.contains("B <|-- C\n"));
}

#[test]
fn self_reported_subclass_does_not_recurse() {
    let mut fixture = FixtureReasoner::default();
    fixture.subclasses.insert(Class::Thing, vec![class("A")]);
    // An equivalence makes the oracle report A as its own subclass.
    fixture.subclasses.insert(class("A"), vec![class("A")]);
    fixture.signature = vec![class("A")];

    let output = render_to_string(&fixture);
    assert_eq!(output.matches("class A<").count(), 1);
}

#[test]
fn disconnected_unsatisfiable_class_is_still_reported() {
    let mut fixture = FixtureReasoner::default();
    fixture.subclasses.insert(Class::Thing, vec![class("A")]);
    fixture.unsatisfiable.insert(class("Zombie"));
    // Zombie is in the signature but reachable from nowhere.
    fixture.signature = vec![class("A"), class("Zombie")];

    let output = render_to_string(&fixture);
    assert!(output.contains("XXX: Zombie\n"));
}

#[test]
fn domainless_properties_collect_in_undefined_block() {
    let mut fixture = FixtureReasoner::default();
    fixture.data_children.insert(
        DataProperty::Top,
        vec![data_property("orphan"), data_property("hasName")],
    );
    fixture.data_domains.insert(
        data_property("hasName"),
        vec![ClassExpression::Class(class("Animal"))],
    );
    fixture.subclasses.insert(Class::Thing, vec![class("Animal")]);
    fixture.signature = vec![class("Animal")];
    fixture
        .object_children
        .insert(object_root(), vec![object_property("owns")]);
    fixture.object_domains.insert(
        object_property("owns"),
        vec![ClassExpression::Class(class("Animal"))],
    );
    fixture.object_ranges.insert(
        object_property("owns"),
        vec![ClassExpression::Class(class("Animal"))],
    );

    let output = render_to_string(&fixture);
    assert!(output.contains("class UNDEFINED {\n\torphan\n}\n"));
    // hasName resolved to a class; it appears only inside the Animal block.
    assert_eq!(output.matches("\thasName\n").count(), 1);

    // UNDEFINED block sits after the diagnostics region and before the
    // relationship edges.
    let block = output.find("class UNDEFINED").unwrap();
    let edge = output.find(" o-- ").unwrap();
    assert!(block < edge);
}

#[test]
fn union_domain_fans_out_one_edge_per_disjunct() {
    let mut fixture = FixtureReasoner::default();
    fixture
        .object_children
        .insert(object_root(), vec![object_property("p")]);
    fixture.object_domains.insert(
        object_property("p"),
        vec![ClassExpression::UnionOf(vec![
            ClassExpression::Class(class("A")),
            ClassExpression::Class(class("B")),
        ])],
    );
    fixture.object_ranges.insert(
        object_property("p"),
        vec![ClassExpression::Class(class("X"))],
    );

    let output = render_to_string(&fixture);
    assert!(output.contains("A o-- X : p\n"));
    assert!(output.contains("B o-- X : p\n"));
    assert_eq!(output.matches(" o-- ").count(), 2);
}

#[test]
fn named_domain_with_no_range_points_at_shared_undefined() {
    let mut fixture = FixtureReasoner::default();
    fixture
        .object_children
        .insert(object_root(), vec![object_property("p")]);
    fixture.object_domains.insert(
        object_property("p"),
        vec![ClassExpression::Class(class("D"))],
    );

    let output = render_to_string(&fixture);
    assert!(output.contains("D o-- UNDEFINED : p\n"));
    assert!(!output.contains("UNDEFINED1"));
}

#[test]
fn anonymous_range_branch_resolves_to_undefined() {
    let mut fixture = FixtureReasoner::default();
    fixture
        .object_children
        .insert(object_root(), vec![object_property("p")]);
    fixture.object_domains.insert(
        object_property("p"),
        vec![ClassExpression::Class(class("D"))],
    );
    fixture.object_ranges.insert(
        object_property("p"),
        vec![ClassExpression::ComplementOf(Box::new(
            ClassExpression::Class(class("X")),
        ))],
    );

    let output = render_to_string(&fixture);
    assert!(output.contains("D o-- UNDEFINED : p\n"));
}

#[test]
fn fully_unconstrained_properties_get_unique_placeholders() {
    let mut fixture = FixtureReasoner::default();
    // Two distinct properties sharing the label `owns`.
    let owns_a = ObjectPropertyExpression::Property(ObjectProperty::from_iri(
        "http://a.example/owns",
    ));
    let owns_b = ObjectPropertyExpression::Property(ObjectProperty::from_iri(
        "http://b.example/owns",
    ));
    fixture
        .object_children
        .insert(object_root(), vec![owns_a, owns_b]);

    let output = render_to_string(&fixture);
    assert!(output.contains("UNDEFINED1 o-- UNDEFINED1 : owns\n"));
    assert!(output.contains("UNDEFINED2 o-- UNDEFINED2 : owns\n"));
}

#[test]
fn anonymous_domain_with_no_range_also_gets_placeholder() {
    let mut fixture = FixtureReasoner::default();
    fixture
        .object_children
        .insert(object_root(), vec![object_property("p")]);
    fixture.object_domains.insert(
        object_property("p"),
        vec![ClassExpression::IntersectionOf(vec![
            ClassExpression::Class(class("A")),
            ClassExpression::Class(class("B")),
        ])],
    );

    let output = render_to_string(&fixture);
    assert!(output.contains("UNDEFINED1 o-- UNDEFINED1 : p\n"));
}

#[test]
fn inverse_expression_labels_by_underlying_property() {
    let mut fixture = FixtureReasoner::default();
    let inverse = ObjectPropertyExpression::InverseOf(ObjectProperty::from_iri(
        "http://example.org/owns",
    ));
    fixture
        .object_children
        .insert(object_root(), vec![inverse.clone()]);
    fixture
        .object_domains
        .insert(inverse, vec![ClassExpression::Class(class("A"))]);

    let output = render_to_string(&fixture);
    assert!(output.contains("A o-- UNDEFINED : owns\n"));
}

#[test]
fn hyphens_are_stripped_from_labels() {
    let mut fixture = FixtureReasoner::default();
    fixture
        .subclasses
        .insert(Class::Thing, vec![class("pet-animal")]);
    fixture.signature = vec![class("pet-animal")];

    let output = render_to_string(&fixture);
    assert!(output.contains("class petanimal<http://example.org/> {\n"));
}

#[test]
fn rerun_on_unchanged_model_is_byte_identical() {
    let mut fixture = FixtureReasoner::default();
    fixture
        .subclasses
        .insert(Class::Thing, vec![class("A"), class("B")]);
    fixture
        .data_children
        .insert(DataProperty::Top, vec![data_property("orphan")]);
    fixture
        .object_children
        .insert(object_root(), vec![object_property("p")]);
    fixture.signature = vec![class("A"), class("B")];

    let first = render_to_string(&fixture);
    let second = render_to_string(&fixture);
    assert_eq!(first, second);
    // The placeholder counter is run-scoped, so the second run restarts at 1.
    assert_eq!(second.matches("UNDEFINED1").count(), 2);
}

#[test]
fn oracle_failure_is_fatal_and_keeps_partial_output() {
    let mut fixture = FixtureReasoner::default();
    fixture.subclasses.insert(Class::Thing, vec![class("A")]);
    fixture.signature = vec![class("A")];
    fixture.failing = true;

    let mut out = Vec::new();
    let error = render(&fixture, &mut out).unwrap_err();
    assert!(matches!(error, UmlError::Reasoner(_)));
    // Lines written before the failure stay written.
    let partial = String::from_utf8(out).unwrap();
    assert!(partial.starts_with("@startuml\nhide methods\n"));
}

#[test]
fn index_covers_transitively_fetched_subproperties() {
    let mut fixture = FixtureReasoner::default();
    fixture
        .data_children
        .insert(DataProperty::Top, vec![data_property("hasName")]);
    fixture.data_children.insert(
        data_property("hasName"),
        vec![data_property("hasNickname")],
    );
    fixture.data_domains.insert(
        data_property("hasNickname"),
        vec![ClassExpression::Class(class("Person"))],
    );

    let index = DomainIndex::build(&fixture).unwrap();
    let bucket = index.properties(&DomainKey::Class(class("Person").to_iri()));
    assert!(bucket.into_iter().any(|p| p == &data_property("hasNickname")));
    // hasName has no domain of its own.
    assert!(index
        .properties(&DomainKey::Undefined)
        .into_iter()
        .any(|p| p == &data_property("hasName")));
}

#[test]
fn bottom_sentinel_is_never_indexed() {
    let mut fixture = FixtureReasoner::default();
    fixture
        .data_children
        .insert(DataProperty::Top, vec![DataProperty::Bottom]);

    let index = DomainIndex::build(&fixture).unwrap();
    assert!(index.properties(&DomainKey::Undefined).is_empty());
}

proptest! {
    /// Index invariants over random flat property forests: a property with
    /// no domain lands in the UNDEFINED bucket and nowhere else; a property
    /// with named domains lands in each of them and never under UNDEFINED.
    #[test]
    fn index_invariants_hold_for_random_forests(
        domain_sets in prop::collection::vec(prop::collection::vec(0u8..4, 0..3), 1..8)
    ) {
        let mut fixture = FixtureReasoner::default();
        let properties: Vec<DataProperty> = (0..domain_sets.len())
            .map(|i| data_property(&format!("p{}", i)))
            .collect();
        fixture.data_children.insert(DataProperty::Top, properties.clone());
        for (property, domains) in properties.iter().zip(&domain_sets) {
            let expressions: Vec<ClassExpression> = domains
                .iter()
                .map(|c| ClassExpression::Class(class(&format!("C{}", c))))
                .collect();
            fixture.data_domains.insert(property.clone(), expressions);
        }

        let index = DomainIndex::build(&fixture).unwrap();
        for (property, domains) in properties.iter().zip(&domain_sets) {
            let in_undefined = index
                .properties(&DomainKey::Undefined)
                .into_iter()
                .any(|p| p == property);
            if domains.is_empty() {
                prop_assert!(in_undefined);
            } else {
                prop_assert!(!in_undefined);
                for domain in domains {
                    let key = DomainKey::Class(class(&format!("C{}", domain)).to_iri());
                    prop_assert!(index.properties(&key).into_iter().any(|p| p == property));
                }
            }
        }
    }
}
