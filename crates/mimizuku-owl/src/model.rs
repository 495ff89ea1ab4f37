//! OWL オントロジーデータモデル

use crate::vocab;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// OWL IRI wrapper for type safety
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct OwlIri(pub String);

impl OwlIri {
    pub fn new(s: String) -> Self {
        Self(s)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Terminal fragment: the text after `#`, or after the last `/` when the
    /// IRI has no fragment separator.
    pub fn fragment(&self) -> &str {
        match self.0.rfind('#') {
            Some(i) => &self.0[i + 1..],
            None => match self.0.rfind('/') {
                Some(i) => &self.0[i + 1..],
                None => &self.0,
            },
        }
    }

    /// Everything up to and including the fragment separator.
    pub fn namespace(&self) -> &str {
        let fragment = self.fragment();
        &self.0[..self.0.len() - fragment.len()]
    }

    /// Diagram label: the fragment with hyphen characters removed.
    pub fn label(&self) -> String {
        self.fragment().replace('-', "")
    }
}

impl std::fmt::Display for OwlIri {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// OWL Class
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Class {
    /// Named class
    Named(OwlIri),
    /// owl:Thing (⊤)
    Thing,
    /// owl:Nothing (⊥)
    Nothing,
}

impl Class {
    pub fn from_iri(iri: &str) -> Self {
        match iri {
            vocab::OWL_THING => Self::Thing,
            vocab::OWL_NOTHING => Self::Nothing,
            _ => Self::Named(OwlIri::new(iri.to_string())),
        }
    }

    pub fn to_iri(&self) -> OwlIri {
        match self {
            Self::Named(iri) => iri.clone(),
            Self::Thing => OwlIri::new(vocab::OWL_THING.to_string()),
            Self::Nothing => OwlIri::new(vocab::OWL_NOTHING.to_string()),
        }
    }

    pub fn label(&self) -> String {
        match self {
            Self::Named(iri) => iri.label(),
            Self::Thing => "Thing".to_string(),
            Self::Nothing => "Nothing".to_string(),
        }
    }

    /// Namespace of a named class; the built-in sentinels are never emitted
    /// as diagram nodes and carry no namespace of their own.
    pub fn namespace(&self) -> Option<&str> {
        match self {
            Self::Named(iri) => Some(iri.namespace()),
            _ => None,
        }
    }
}

/// OWL data property with its top/bottom sentinels
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum DataProperty {
    /// Named data property
    Named(OwlIri),
    /// owl:topDataProperty
    Top,
    /// owl:bottomDataProperty
    Bottom,
}

impl DataProperty {
    pub fn from_iri(iri: &str) -> Self {
        match iri {
            vocab::OWL_TOP_DATA_PROPERTY => Self::Top,
            vocab::OWL_BOTTOM_DATA_PROPERTY => Self::Bottom,
            _ => Self::Named(OwlIri::new(iri.to_string())),
        }
    }

    pub fn is_bottom(&self) -> bool {
        matches!(self, Self::Bottom)
    }

    pub fn label(&self) -> String {
        match self {
            Self::Named(iri) => iri.label(),
            Self::Top => "topDataProperty".to_string(),
            Self::Bottom => "bottomDataProperty".to_string(),
        }
    }
}

/// OWL object property with its top/bottom sentinels
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum ObjectProperty {
    /// Named object property
    Named(OwlIri),
    /// owl:topObjectProperty
    Top,
    /// owl:bottomObjectProperty
    Bottom,
}

impl ObjectProperty {
    pub fn from_iri(iri: &str) -> Self {
        match iri {
            vocab::OWL_TOP_OBJECT_PROPERTY => Self::Top,
            vocab::OWL_BOTTOM_OBJECT_PROPERTY => Self::Bottom,
            _ => Self::Named(OwlIri::new(iri.to_string())),
        }
    }

    pub fn is_bottom(&self) -> bool {
        matches!(self, Self::Bottom)
    }

    pub fn label(&self) -> String {
        match self {
            Self::Named(iri) => iri.label(),
            Self::Top => "topObjectProperty".to_string(),
            Self::Bottom => "bottomObjectProperty".to_string(),
        }
    }
}

/// Object property expression: a named property or the inverse of one
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum ObjectPropertyExpression {
    Property(ObjectProperty),
    InverseOf(ObjectProperty),
}

impl ObjectPropertyExpression {
    /// The underlying named property. Relationship labels are always derived
    /// from this, even when the traversed expression is an inverse.
    pub fn named(&self) -> &ObjectProperty {
        match self {
            Self::Property(p) => p,
            Self::InverseOf(p) => p,
        }
    }
}

impl From<ObjectProperty> for ObjectPropertyExpression {
    fn from(property: ObjectProperty) -> Self {
        Self::Property(property)
    }
}

/// OWL class expression (the subset the loader reconstructs from RDF)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClassExpression {
    /// Named class (or one of the built-in sentinels)
    Class(Class),

    /// Union of classes: C1 ⊔ C2 ⊔ ... ⊔ Cn
    UnionOf(Vec<ClassExpression>),

    /// Intersection of classes: C1 ⊓ C2 ⊓ ... ⊓ Cn
    IntersectionOf(Vec<ClassExpression>),

    /// Complement of a class: ¬C
    ComplementOf(Box<ClassExpression>),

    /// Existential restriction: ∃R.C
    SomeValuesFrom {
        property: ObjectPropertyExpression,
        filler: Box<ClassExpression>,
    },

    /// Universal restriction: ∀R.C
    AllValuesFrom {
        property: ObjectPropertyExpression,
        filler: Box<ClassExpression>,
    },
}

impl ClassExpression {
    pub fn is_anonymous(&self) -> bool {
        !matches!(self, Self::Class(_))
    }

    pub fn as_named_class(&self) -> Option<&Class> {
        match self {
            Self::Class(class) => Some(class),
            _ => None,
        }
    }

    /// Disjunct set of this expression: a union contributes every branch
    /// (nested unions flatten), anything else is a singleton of itself.
    pub fn disjuncts(&self) -> Vec<&ClassExpression> {
        match self {
            Self::UnionOf(branches) => branches.iter().flat_map(|b| b.disjuncts()).collect(),
            _ => vec![self],
        }
    }
}

impl From<Class> for ClassExpression {
    fn from(class: Class) -> Self {
        Self::Class(class)
    }
}

/// OWL Axiom (the subset the projection consumes)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axiom {
    /// SubClassOf(C1 C2)
    SubClassOf(ClassExpression, ClassExpression),

    /// EquivalentClasses(C1 ... Cn)
    EquivalentClasses(Vec<ClassExpression>),

    /// DisjointClasses(C1 ... Cn)
    DisjointClasses(Vec<ClassExpression>),

    /// SubDataPropertyOf(P1 P2)
    SubDataPropertyOf(DataProperty, DataProperty),

    /// SubObjectPropertyOf(P1 P2)
    SubObjectPropertyOf(ObjectPropertyExpression, ObjectPropertyExpression),

    /// DataPropertyDomain(P C)
    DataPropertyDomain(DataProperty, ClassExpression),

    /// ObjectPropertyDomain(P C)
    ObjectPropertyDomain(ObjectPropertyExpression, ClassExpression),

    /// ObjectPropertyRange(P C)
    ObjectPropertyRange(ObjectPropertyExpression, ClassExpression),
}

/// RDF Triple representation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Triple {
    pub subject: String,
    pub predicate: String,
    pub object: String,
}

/// OWL Ontology
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ontology {
    /// Ontology IRI
    pub iri: Option<OwlIri>,

    /// All axioms in the ontology
    pub axioms: Vec<Axiom>,

    /// All classes mentioned in the ontology
    pub classes: HashSet<Class>,

    /// All data properties mentioned in the ontology
    pub data_properties: HashSet<DataProperty>,

    /// All object properties mentioned in the ontology
    pub object_properties: HashSet<ObjectProperty>,
}

impl Ontology {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_iri(iri: OwlIri) -> Self {
        Self {
            iri: Some(iri),
            ..Self::default()
        }
    }

    pub fn add_axiom(&mut self, axiom: Axiom) {
        // Extract classes and properties from the axiom
        match &axiom {
            Axiom::SubClassOf(c1, c2) => {
                self.collect_class_expression(c1);
                self.collect_class_expression(c2);
            }
            Axiom::EquivalentClasses(expressions) | Axiom::DisjointClasses(expressions) => {
                for expression in expressions {
                    self.collect_class_expression(expression);
                }
            }
            Axiom::SubDataPropertyOf(p1, p2) => {
                self.data_properties.insert(p1.clone());
                self.data_properties.insert(p2.clone());
            }
            Axiom::SubObjectPropertyOf(p1, p2) => {
                self.object_properties.insert(p1.named().clone());
                self.object_properties.insert(p2.named().clone());
            }
            Axiom::DataPropertyDomain(p, c) => {
                self.data_properties.insert(p.clone());
                self.collect_class_expression(c);
            }
            Axiom::ObjectPropertyDomain(p, c) | Axiom::ObjectPropertyRange(p, c) => {
                self.object_properties.insert(p.named().clone());
                self.collect_class_expression(c);
            }
        }

        self.axioms.push(axiom);
    }

    fn collect_class_expression(&mut self, expression: &ClassExpression) {
        match expression {
            ClassExpression::Class(class) => {
                self.classes.insert(class.clone());
            }
            ClassExpression::UnionOf(branches) | ClassExpression::IntersectionOf(branches) => {
                for branch in branches {
                    self.collect_class_expression(branch);
                }
            }
            ClassExpression::ComplementOf(inner) => {
                self.collect_class_expression(inner);
            }
            ClassExpression::SomeValuesFrom { property, filler }
            | ClassExpression::AllValuesFrom { property, filler } => {
                self.object_properties.insert(property.named().clone());
                self.collect_class_expression(filler);
            }
        }
    }

    /// Merge another ontology into this one. Axiom order is preserved per
    /// document; entity sets collapse duplicates.
    pub fn merge(&mut self, other: Ontology) {
        if self.iri.is_none() {
            self.iri = other.iri;
        }
        self.axioms.extend(other.axioms);
        self.classes.extend(other.classes);
        self.data_properties.extend(other.data_properties);
        self.object_properties.extend(other.object_properties);
    }
}
