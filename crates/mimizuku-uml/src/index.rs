//! データプロパティのドメインインデックス

use crate::UmlError;
use mimizuku_owl::{Class, DataProperty, OwlIri, Reasoner};
use std::collections::{HashMap, HashSet};

/// Index key: a named class identity, or the shared bucket for properties
/// whose domain is absent or anonymous.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DomainKey {
    Class(OwlIri),
    Undefined,
}

/// Mapping from class identity to the data properties whose domain resolves
/// there. Built once per projection run, read-only afterwards; duplicates
/// collapse through set semantics.
#[derive(Debug, Default)]
pub struct DomainIndex {
    buckets: HashMap<DomainKey, HashSet<DataProperty>>,
}

impl DomainIndex {
    /// Walk the data property tree below owl:topDataProperty and resolve
    /// every declared domain into its buckets. The root itself is never
    /// indexed; the bottom sentinel is skipped entirely.
    pub fn build<R: Reasoner>(reasoner: &R) -> Result<Self, UmlError> {
        let mut index = Self::default();
        let mut visited = HashSet::new();
        for property in reasoner.data_subproperties_of(&DataProperty::Top, false)? {
            index.index_property(reasoner, &property, &mut visited)?;
        }
        Ok(index)
    }

    /// Each node fetches its transitive subproperties and recurses into all
    /// of them. Insertions are idempotent, so the visited set only bounds
    /// the walk on shared subtrees.
    fn index_property<R: Reasoner>(
        &mut self,
        reasoner: &R,
        property: &DataProperty,
        visited: &mut HashSet<DataProperty>,
    ) -> Result<(), UmlError> {
        if property.is_bottom() || !visited.insert(property.clone()) {
            return Ok(());
        }

        let domains = reasoner.data_property_domains(property)?;
        if domains.is_empty() {
            self.insert(DomainKey::Undefined, property.clone());
        }
        for domain in &domains {
            for branch in domain.disjuncts() {
                let key = match branch.as_named_class() {
                    Some(class) => DomainKey::Class(class.to_iri()),
                    None => DomainKey::Undefined,
                };
                self.insert(key, property.clone());
            }
        }

        for child in reasoner.data_subproperties_of(property, false)? {
            self.index_property(reasoner, &child, visited)?;
        }
        Ok(())
    }

    fn insert(&mut self, key: DomainKey, property: DataProperty) {
        self.buckets.entry(key).or_default().insert(property);
    }

    /// Properties of one bucket, sorted lexicographically by label so that
    /// emitted fields are reproducible.
    pub fn properties(&self, key: &DomainKey) -> Vec<&DataProperty> {
        let mut properties: Vec<&DataProperty> = self
            .buckets
            .get(key)
            .map(|set| set.iter().collect())
            .unwrap_or_default();
        properties.sort_by_key(|property| property.label());
        properties
    }

    /// Field labels for a class block.
    pub fn field_labels(&self, class: &Class) -> Vec<String> {
        self.properties(&DomainKey::Class(class.to_iri()))
            .iter()
            .map(|property| property.label())
            .collect()
    }

    /// Labels of the properties with no resolvable domain.
    pub fn undefined_labels(&self) -> Vec<String> {
        self.properties(&DomainKey::Undefined)
            .iter()
            .map(|property| property.label())
            .collect()
    }
}
