//! OWLオントロジーローダー

use crate::model::{
    Axiom, Class, ClassExpression, DataProperty, ObjectProperty, ObjectPropertyExpression,
    Ontology, OwlIri, Triple,
};
use crate::vocab;
use crate::OwlError;
use oxrdf::{Subject, Term};
use oxttl::TurtleParser;
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::warn;

/// Ontology loader trait
pub trait OntologyLoader {
    fn load_document(&self, path: &Path) -> Result<Ontology, OwlError>;
}

/// Turtle / N-Triples document loader.
///
/// Lowers parsed RDF terms to plain string triples and reconstructs the OWL
/// axioms the projection consumes, including anonymous class expressions
/// (`owl:unionOf` / `owl:intersectionOf` lists, `owl:complementOf` and value
/// restrictions) reachable from blank nodes.
pub struct TurtleLoader;

impl OntologyLoader for TurtleLoader {
    fn load_document(&self, path: &Path) -> Result<Ontology, OwlError> {
        let file = File::open(path)
            .map_err(|e| OwlError::LoaderError(format!("{}: {}", path.display(), e)))?;
        self.load_reader(BufReader::new(file))
    }
}

impl TurtleLoader {
    pub fn load_reader<R: Read>(&self, read: R) -> Result<Ontology, OwlError> {
        let mut triples = Vec::new();
        for triple in TurtleParser::new().for_reader(read) {
            let triple = triple.map_err(|e| OwlError::ParseError(e.to_string()))?;
            if let Some(triple) = lower_triple(triple) {
                triples.push(triple);
            }
        }
        Ok(extract_ontology(&triples))
    }
}

/// Lower an `oxrdf` triple to the string form the axiom extraction walks.
/// Blank nodes keep their `_:` prefix so anonymous structures stay linkable.
fn lower_triple(triple: oxrdf::Triple) -> Option<Triple> {
    let subject = match triple.subject {
        Subject::NamedNode(node) => node.into_string(),
        Subject::BlankNode(node) => node.to_string(),
        _ => return None,
    };
    let object = match triple.object {
        Term::NamedNode(node) => node.into_string(),
        Term::BlankNode(node) => node.to_string(),
        Term::Literal(literal) => literal.value().to_string(),
        _ => return None,
    };
    Some(Triple {
        subject,
        predicate: triple.predicate.into_string(),
        object,
    })
}

fn is_blank(node: &str) -> bool {
    node.starts_with("_:")
}

/// Predicate-indexed view of one document, built in a single pass so that
/// declarations are visible regardless of their position in the stream.
#[derive(Default)]
struct TripleIndex<'a> {
    first: HashMap<&'a str, &'a str>,
    rest: HashMap<&'a str, &'a str>,
    union_of: HashMap<&'a str, &'a str>,
    intersection_of: HashMap<&'a str, &'a str>,
    complement_of: HashMap<&'a str, &'a str>,
    on_property: HashMap<&'a str, &'a str>,
    some_values_from: HashMap<&'a str, &'a str>,
    all_values_from: HashMap<&'a str, &'a str>,
    inverse_of: HashMap<&'a str, &'a str>,
    data_properties: HashSet<&'a str>,
    object_properties: HashSet<&'a str>,
}

fn build_index(triples: &[Triple]) -> TripleIndex<'_> {
    let mut index = TripleIndex::default();
    for triple in triples {
        let (s, o) = (triple.subject.as_str(), triple.object.as_str());
        match triple.predicate.as_str() {
            vocab::RDF_FIRST => {
                index.first.insert(s, o);
            }
            vocab::RDF_REST => {
                index.rest.insert(s, o);
            }
            vocab::OWL_UNION_OF => {
                index.union_of.insert(s, o);
            }
            vocab::OWL_INTERSECTION_OF => {
                index.intersection_of.insert(s, o);
            }
            vocab::OWL_COMPLEMENT_OF => {
                index.complement_of.insert(s, o);
            }
            vocab::OWL_ON_PROPERTY => {
                index.on_property.insert(s, o);
            }
            vocab::OWL_SOME_VALUES_FROM => {
                index.some_values_from.insert(s, o);
            }
            vocab::OWL_ALL_VALUES_FROM => {
                index.all_values_from.insert(s, o);
            }
            vocab::OWL_INVERSE_OF => {
                index.inverse_of.insert(s, o);
            }
            vocab::RDF_TYPE => match o {
                vocab::OWL_DATATYPE_PROPERTY => {
                    index.data_properties.insert(s);
                }
                vocab::OWL_OBJECT_PROPERTY => {
                    index.object_properties.insert(s);
                }
                _ => {}
            },
            _ => {}
        }
    }
    index
}

fn is_data_property(index: &TripleIndex<'_>, node: &str) -> bool {
    index.data_properties.contains(node)
        || node == vocab::OWL_TOP_DATA_PROPERTY
        || node == vocab::OWL_BOTTOM_DATA_PROPERTY
}

fn is_object_property(index: &TripleIndex<'_>, node: &str) -> bool {
    index.object_properties.contains(node)
        || node == vocab::OWL_TOP_OBJECT_PROPERTY
        || node == vocab::OWL_BOTTOM_OBJECT_PROPERTY
}

/// Walk an RDF list. `None` on a broken or cyclic structure.
fn collect_list<'a>(index: &TripleIndex<'a>, head: &'a str) -> Option<Vec<&'a str>> {
    let mut items = Vec::new();
    let mut node = head;
    let mut seen = HashSet::new();
    while node != vocab::RDF_NIL {
        if !seen.insert(node) {
            return None;
        }
        items.push(*index.first.get(node)?);
        node = index.rest.get(node)?;
    }
    Some(items)
}

fn resolve_object_property(
    index: &TripleIndex<'_>,
    node: &str,
) -> Option<ObjectPropertyExpression> {
    if !is_blank(node) {
        return Some(ObjectPropertyExpression::Property(ObjectProperty::from_iri(
            node,
        )));
    }
    let target = index.inverse_of.get(node)?;
    if is_blank(target) {
        return None;
    }
    Some(ObjectPropertyExpression::InverseOf(ObjectProperty::from_iri(
        target,
    )))
}

/// An object property that is either declared, a built-in sentinel, or an
/// anonymous inverse. Anything else is rejected so that untyped IRIs do not
/// silently become properties.
fn resolve_declared_object_property(
    index: &TripleIndex<'_>,
    node: &str,
) -> Option<ObjectPropertyExpression> {
    if is_object_property(index, node) || is_blank(node) {
        resolve_object_property(index, node)
    } else {
        None
    }
}

/// Reconstruct a class expression from an IRI or a blank node. `path` guards
/// against cyclic anonymous structures; `None` means the expression cannot be
/// rebuilt and the surrounding axiom must be dropped.
fn resolve_class_expression(
    index: &TripleIndex<'_>,
    node: &str,
    path: &mut Vec<String>,
) -> Option<ClassExpression> {
    if !is_blank(node) {
        return Some(ClassExpression::Class(Class::from_iri(node)));
    }
    if path.iter().any(|n| n == node) {
        return None;
    }
    path.push(node.to_string());

    let resolved = if let Some(head) = index.union_of.get(node) {
        collect_list(index, head)
            .and_then(|items| {
                items
                    .iter()
                    .map(|item| resolve_class_expression(index, item, path))
                    .collect::<Option<Vec<_>>>()
            })
            .map(ClassExpression::UnionOf)
    } else if let Some(head) = index.intersection_of.get(node) {
        collect_list(index, head)
            .and_then(|items| {
                items
                    .iter()
                    .map(|item| resolve_class_expression(index, item, path))
                    .collect::<Option<Vec<_>>>()
            })
            .map(ClassExpression::IntersectionOf)
    } else if let Some(target) = index.complement_of.get(node) {
        resolve_class_expression(index, target, path)
            .map(|inner| ClassExpression::ComplementOf(Box::new(inner)))
    } else if let Some(on_property) = index.on_property.get(node) {
        match resolve_object_property(index, on_property) {
            Some(property) => {
                if let Some(filler) = index.some_values_from.get(node) {
                    resolve_class_expression(index, filler, path).map(|filler| {
                        ClassExpression::SomeValuesFrom {
                            property,
                            filler: Box::new(filler),
                        }
                    })
                } else if let Some(filler) = index.all_values_from.get(node) {
                    resolve_class_expression(index, filler, path).map(|filler| {
                        ClassExpression::AllValuesFrom {
                            property,
                            filler: Box::new(filler),
                        }
                    })
                } else {
                    None
                }
            }
            None => None,
        }
    } else {
        None
    };

    path.pop();
    resolved
}

fn extract_ontology(triples: &[Triple]) -> Ontology {
    let index = build_index(triples);
    let mut ontology = Ontology::new();

    for triple in triples {
        let (s, o) = (triple.subject.as_str(), triple.object.as_str());
        match triple.predicate.as_str() {
            vocab::RDF_TYPE => match o {
                vocab::OWL_ONTOLOGY => {
                    if ontology.iri.is_none() && !is_blank(s) {
                        ontology.iri = Some(OwlIri::new(s.to_string()));
                    }
                }
                vocab::OWL_CLASS => {
                    if !is_blank(s) {
                        ontology.classes.insert(Class::from_iri(s));
                    }
                }
                vocab::OWL_OBJECT_PROPERTY => {
                    if !is_blank(s) {
                        ontology.object_properties.insert(ObjectProperty::from_iri(s));
                    }
                }
                vocab::OWL_DATATYPE_PROPERTY => {
                    if !is_blank(s) {
                        ontology.data_properties.insert(DataProperty::from_iri(s));
                    }
                }
                _ => {}
            },
            vocab::RDFS_SUBCLASS_OF => {
                let sub = resolve_class_expression(&index, s, &mut Vec::new());
                let sup = resolve_class_expression(&index, o, &mut Vec::new());
                match (sub, sup) {
                    (Some(sub), Some(sup)) => ontology.add_axiom(Axiom::SubClassOf(sub, sup)),
                    _ => warn!(subject = s, "dropping subClassOf with unresolvable expression"),
                }
            }
            vocab::OWL_EQUIVALENT_CLASS => {
                let lhs = resolve_class_expression(&index, s, &mut Vec::new());
                let rhs = resolve_class_expression(&index, o, &mut Vec::new());
                match (lhs, rhs) {
                    (Some(lhs), Some(rhs)) => {
                        ontology.add_axiom(Axiom::EquivalentClasses(vec![lhs, rhs]));
                    }
                    _ => warn!(subject = s, "dropping equivalentClass with unresolvable expression"),
                }
            }
            vocab::OWL_DISJOINT_WITH => {
                let lhs = resolve_class_expression(&index, s, &mut Vec::new());
                let rhs = resolve_class_expression(&index, o, &mut Vec::new());
                match (lhs, rhs) {
                    (Some(lhs), Some(rhs)) => {
                        ontology.add_axiom(Axiom::DisjointClasses(vec![lhs, rhs]));
                    }
                    _ => warn!(subject = s, "dropping disjointWith with unresolvable expression"),
                }
            }
            vocab::RDFS_SUBPROPERTY_OF => {
                if is_data_property(&index, s) && is_data_property(&index, o) {
                    ontology.add_axiom(Axiom::SubDataPropertyOf(
                        DataProperty::from_iri(s),
                        DataProperty::from_iri(o),
                    ));
                } else {
                    let child = resolve_declared_object_property(&index, s);
                    let parent = resolve_declared_object_property(&index, o);
                    match (child, parent) {
                        (Some(child), Some(parent)) => {
                            ontology.add_axiom(Axiom::SubObjectPropertyOf(child, parent));
                        }
                        _ => warn!(subject = s, "dropping subPropertyOf between undeclared properties"),
                    }
                }
            }
            vocab::RDFS_DOMAIN => {
                if is_data_property(&index, s) {
                    match resolve_class_expression(&index, o, &mut Vec::new()) {
                        Some(domain) => ontology
                            .add_axiom(Axiom::DataPropertyDomain(DataProperty::from_iri(s), domain)),
                        None => warn!(subject = s, "dropping domain with unresolvable expression"),
                    }
                } else if let Some(property) = resolve_declared_object_property(&index, s) {
                    match resolve_class_expression(&index, o, &mut Vec::new()) {
                        Some(domain) => {
                            ontology.add_axiom(Axiom::ObjectPropertyDomain(property, domain));
                        }
                        None => warn!(subject = s, "dropping domain with unresolvable expression"),
                    }
                } else {
                    warn!(subject = s, "domain asserted on undeclared property");
                }
            }
            vocab::RDFS_RANGE => {
                // Data ranges (datatypes) carry no projection information.
                if !is_data_property(&index, s) {
                    if let Some(property) = resolve_declared_object_property(&index, s) {
                        match resolve_class_expression(&index, o, &mut Vec::new()) {
                            Some(range) => {
                                ontology.add_axiom(Axiom::ObjectPropertyRange(property, range));
                            }
                            None => warn!(subject = s, "dropping range with unresolvable expression"),
                        }
                    }
                }
            }
            _ => {}
        }
    }

    ontology
}
