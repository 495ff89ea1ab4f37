//! Asserted taxonomy リーナー

use crate::model::{
    Axiom, Class, ClassExpression, DataProperty, ObjectProperty, ObjectPropertyExpression,
    Ontology,
};
use crate::OwlError;
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};
use std::hash::Hash;

/// The oracle surface the projection core consults. Implementations are
/// authoritative: the core never retries a failing query and never caches
/// beyond one call per visited node.
pub trait Reasoner {
    /// Whether the class can have a consistent instance.
    fn is_satisfiable(&self, class: &Class) -> Result<bool, OwlError>;

    /// Subclasses of `class`: direct children only, or the full transitive
    /// closure when `direct` is false. Never includes `class` itself, except
    /// that a class proven equivalent to another may be reported as its own
    /// subclass.
    fn subclasses_of(&self, class: &Class, direct: bool) -> Result<Vec<Class>, OwlError>;

    fn data_subproperties_of(
        &self,
        property: &DataProperty,
        direct: bool,
    ) -> Result<Vec<DataProperty>, OwlError>;

    fn object_subproperties_of(
        &self,
        property: &ObjectPropertyExpression,
        direct: bool,
    ) -> Result<Vec<ObjectPropertyExpression>, OwlError>;

    /// Declared domain expressions of a data property, in axiom order.
    fn data_property_domains(
        &self,
        property: &DataProperty,
    ) -> Result<Vec<ClassExpression>, OwlError>;

    fn object_property_domains(
        &self,
        property: &ObjectPropertyExpression,
    ) -> Result<Vec<ClassExpression>, OwlError>;

    fn object_property_ranges(
        &self,
        property: &ObjectPropertyExpression,
    ) -> Result<Vec<ClassExpression>, OwlError>;

    /// Every class mentioned anywhere in the ontology, whether or not it is
    /// reachable from owl:Thing.
    fn classes_in_signature(&self) -> Result<Vec<Class>, OwlError>;
}

/// Taxonomy oracle over the asserted axioms of a classified model.
///
/// Subsumption follows asserted `SubClassOf`/`SubPropertyOf` edges only;
/// satisfiability is decided from asserted disjointness and owl:Nothing
/// subsumption. Richer backends can be substituted through [`Reasoner`].
pub struct AssertedReasoner {
    subclasses: HashMap<Class, BTreeSet<Class>>,
    parents: HashMap<Class, BTreeSet<Class>>,
    equivalents: HashMap<Class, BTreeSet<Class>>,
    disjoint_pairs: Vec<(Class, Class)>,
    data_children: HashMap<DataProperty, BTreeSet<DataProperty>>,
    object_children: HashMap<ObjectPropertyExpression, BTreeSet<ObjectPropertyExpression>>,
    data_domains: HashMap<DataProperty, Vec<ClassExpression>>,
    object_domains: HashMap<ObjectPropertyExpression, Vec<ClassExpression>>,
    object_ranges: HashMap<ObjectPropertyExpression, Vec<ClassExpression>>,
    signature: BTreeSet<Class>,
}

impl AssertedReasoner {
    /// Build the taxonomy once from a merged ontology. All query results are
    /// deterministically ordered by IRI.
    pub fn classify(ontology: &Ontology) -> Self {
        let mut reasoner = Self {
            subclasses: HashMap::new(),
            parents: HashMap::new(),
            equivalents: HashMap::new(),
            disjoint_pairs: Vec::new(),
            data_children: HashMap::new(),
            object_children: HashMap::new(),
            data_domains: HashMap::new(),
            object_domains: HashMap::new(),
            object_ranges: HashMap::new(),
            signature: ontology.classes.iter().cloned().collect(),
        };

        let mut data_parented: HashSet<DataProperty> = HashSet::new();
        let mut object_parented: HashSet<ObjectPropertyExpression> = HashSet::new();

        for axiom in &ontology.axioms {
            match axiom {
                Axiom::SubClassOf(sub, sup) => {
                    if let (Some(sub), Some(sup)) = (sub.as_named_class(), sup.as_named_class()) {
                        if sub != sup {
                            reasoner
                                .subclasses
                                .entry(sup.clone())
                                .or_default()
                                .insert(sub.clone());
                            reasoner
                                .parents
                                .entry(sub.clone())
                                .or_default()
                                .insert(sup.clone());
                        }
                    }
                }
                Axiom::EquivalentClasses(expressions) => {
                    let named: Vec<&Class> = expressions
                        .iter()
                        .filter_map(ClassExpression::as_named_class)
                        .collect();
                    for a in &named {
                        for b in &named {
                            if a != b {
                                reasoner
                                    .equivalents
                                    .entry((*a).clone())
                                    .or_default()
                                    .insert((*b).clone());
                            }
                        }
                    }
                }
                Axiom::DisjointClasses(expressions) => {
                    let named: Vec<&Class> = expressions
                        .iter()
                        .filter_map(ClassExpression::as_named_class)
                        .collect();
                    for (i, a) in named.iter().enumerate() {
                        for b in &named[i + 1..] {
                            reasoner.disjoint_pairs.push(((*a).clone(), (*b).clone()));
                        }
                    }
                }
                Axiom::SubDataPropertyOf(child, parent) => {
                    reasoner
                        .data_children
                        .entry(parent.clone())
                        .or_default()
                        .insert(child.clone());
                    if matches!(parent, DataProperty::Named(_)) {
                        data_parented.insert(child.clone());
                    }
                }
                Axiom::SubObjectPropertyOf(child, parent) => {
                    reasoner
                        .object_children
                        .entry(parent.clone())
                        .or_default()
                        .insert(child.clone());
                    if matches!(
                        parent,
                        ObjectPropertyExpression::Property(ObjectProperty::Named(_))
                    ) {
                        object_parented.insert(child.clone());
                    }
                }
                Axiom::DataPropertyDomain(property, domain) => {
                    push_unique(
                        reasoner.data_domains.entry(property.clone()).or_default(),
                        domain.clone(),
                    );
                }
                Axiom::ObjectPropertyDomain(property, domain) => {
                    push_unique(
                        reasoner.object_domains.entry(property.clone()).or_default(),
                        domain.clone(),
                    );
                }
                Axiom::ObjectPropertyRange(property, range) => {
                    push_unique(
                        reasoner.object_ranges.entry(property.clone()).or_default(),
                        range.clone(),
                    );
                }
            }
        }

        reasoner.collapse_mutual_subclasses();

        // Parentless named classes hang directly under owl:Thing.
        let signature = reasoner.signature.clone();
        for class in &signature {
            if matches!(class, Class::Named(_)) && !reasoner.has_named_parent(class) {
                reasoner
                    .subclasses
                    .entry(Class::Thing)
                    .or_default()
                    .insert(class.clone());
            }
        }

        // Parentless properties hang under their top sentinel.
        for property in &ontology.data_properties {
            if matches!(property, DataProperty::Named(_)) && !data_parented.contains(property) {
                reasoner
                    .data_children
                    .entry(DataProperty::Top)
                    .or_default()
                    .insert(property.clone());
            }
        }
        for property in &ontology.object_properties {
            let expression = ObjectPropertyExpression::Property(property.clone());
            if matches!(property, ObjectProperty::Named(_)) && !object_parented.contains(&expression)
            {
                reasoner
                    .object_children
                    .entry(ObjectPropertyExpression::Property(ObjectProperty::Top))
                    .or_default()
                    .insert(expression);
            }
        }

        reasoner
    }

    /// A pair of classes asserted as subclasses of each other is an
    /// equivalence in disguise; left as edges it would make the hierarchy
    /// walk oscillate between the two.
    fn collapse_mutual_subclasses(&mut self) {
        let mut mutual: Vec<(Class, Class)> = Vec::new();
        for (parent, children) in &self.subclasses {
            for child in children {
                if parent < child
                    && self
                        .subclasses
                        .get(child)
                        .map_or(false, |back| back.contains(parent))
                {
                    mutual.push((parent.clone(), child.clone()));
                }
            }
        }
        for (a, b) in mutual {
            if let Some(children) = self.subclasses.get_mut(&a) {
                children.remove(&b);
            }
            if let Some(children) = self.subclasses.get_mut(&b) {
                children.remove(&a);
            }
            if let Some(parents) = self.parents.get_mut(&a) {
                parents.remove(&b);
            }
            if let Some(parents) = self.parents.get_mut(&b) {
                parents.remove(&a);
            }
            self.equivalents.entry(a.clone()).or_default().insert(b.clone());
            self.equivalents.entry(b).or_default().insert(a);
        }
    }

    fn has_named_parent(&self, class: &Class) -> bool {
        self.parents
            .get(class)
            .map_or(false, |parents| parents.iter().any(|p| matches!(p, Class::Named(_))))
    }

    /// Superclass closure of a class, itself included, following asserted
    /// subsumption and equivalence.
    fn superclass_closure(&self, class: &Class) -> BTreeSet<Class> {
        let mut closure = BTreeSet::new();
        let mut queue = VecDeque::from([class.clone()]);
        while let Some(current) = queue.pop_front() {
            if !closure.insert(current.clone()) {
                continue;
            }
            if let Some(parents) = self.parents.get(&current) {
                queue.extend(parents.iter().cloned());
            }
            if let Some(equivalents) = self.equivalents.get(&current) {
                queue.extend(equivalents.iter().cloned());
            }
        }
        closure
    }
}

fn push_unique(list: &mut Vec<ClassExpression>, expression: ClassExpression) {
    if !list.contains(&expression) {
        list.push(expression);
    }
}

/// Descendants of `node` in a child map: direct children, or the full
/// transitive closure (cycle-safe) when `direct` is false.
fn descendants<T>(children: &HashMap<T, BTreeSet<T>>, node: &T, direct: bool) -> Vec<T>
where
    T: Clone + Ord + Hash,
{
    let mut result: BTreeSet<T> = BTreeSet::new();
    if direct {
        if let Some(direct_children) = children.get(node) {
            result.extend(direct_children.iter().cloned());
        }
    } else {
        let mut queue: VecDeque<T> = children
            .get(node)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default();
        while let Some(current) = queue.pop_front() {
            if result.insert(current.clone()) {
                if let Some(more) = children.get(&current) {
                    queue.extend(more.iter().cloned());
                }
            }
        }
    }
    result.into_iter().collect()
}

impl Reasoner for AssertedReasoner {
    fn is_satisfiable(&self, class: &Class) -> Result<bool, OwlError> {
        match class {
            Class::Thing => Ok(true),
            Class::Nothing => Ok(false),
            Class::Named(_) => {
                let closure = self.superclass_closure(class);
                if closure.contains(&Class::Nothing) {
                    return Ok(false);
                }
                Ok(!self
                    .disjoint_pairs
                    .iter()
                    .any(|(a, b)| closure.contains(a) && closure.contains(b)))
            }
        }
    }

    fn subclasses_of(&self, class: &Class, direct: bool) -> Result<Vec<Class>, OwlError> {
        if direct {
            let mut result: BTreeSet<Class> = self
                .subclasses
                .get(class)
                .map(|set| set.iter().cloned().collect())
                .unwrap_or_default();
            // Equivalence surfaces as a self-subclass; callers guard it.
            if self.equivalents.get(class).map_or(false, |set| !set.is_empty()) {
                result.insert(class.clone());
            }
            Ok(result.into_iter().collect())
        } else {
            Ok(descendants(&self.subclasses, class, false))
        }
    }

    fn data_subproperties_of(
        &self,
        property: &DataProperty,
        direct: bool,
    ) -> Result<Vec<DataProperty>, OwlError> {
        Ok(descendants(&self.data_children, property, direct))
    }

    fn object_subproperties_of(
        &self,
        property: &ObjectPropertyExpression,
        direct: bool,
    ) -> Result<Vec<ObjectPropertyExpression>, OwlError> {
        Ok(descendants(&self.object_children, property, direct))
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
        Ok(self.object_domains.get(property).cloned().unwrap_or_default())
    }

    fn object_property_ranges(
        &self,
        property: &ObjectPropertyExpression,
    ) -> Result<Vec<ClassExpression>, OwlError> {
        Ok(self.object_ranges.get(property).cloned().unwrap_or_default())
    }

    fn classes_in_signature(&self) -> Result<Vec<Class>, OwlError> {
        Ok(self.signature.iter().cloned().collect())
    }
}
