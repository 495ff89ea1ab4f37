//! オブジェクトプロパティ関係プロジェクタ

use crate::diagram::DiagramWriter;
use crate::{UmlError, UNDEFINED};
use mimizuku_owl::{ClassExpression, ObjectProperty, ObjectPropertyExpression, Reasoner};
use std::io::Write;

/// Projects object properties as `o--` relationship edges, one per resolved
/// (domain, range) pair.
pub struct RelationshipProjector<'a, R, W> {
    reasoner: &'a R,
    writer: &'a mut DiagramWriter<W>,
    /// Mints unique placeholder names for fully unconstrained relationships.
    /// Scoped to this projector, so repeated runs in one process start over.
    unknown_counter: u32,
}

impl<'a, R: Reasoner, W: Write> RelationshipProjector<'a, R, W> {
    pub fn new(reasoner: &'a R, writer: &'a mut DiagramWriter<W>) -> Self {
        Self {
            reasoner,
            writer,
            unknown_counter: 0,
        }
    }

    /// Walk the object property tree below owl:topObjectProperty. The walk
    /// is direct-only per level, unlike the transitive data property walk.
    pub fn project(&mut self) -> Result<(), UmlError> {
        let root = ObjectPropertyExpression::Property(ObjectProperty::Top);
        for child in self.reasoner.object_subproperties_of(&root, true)? {
            self.project_property(&child)?;
        }
        Ok(())
    }

    fn project_property(&mut self, property: &ObjectPropertyExpression) -> Result<(), UmlError> {
        if property.named().is_bottom() {
            return Ok(());
        }

        let domains = self.reasoner.object_property_domains(property)?;
        let ranges = self.reasoner.object_property_ranges(property)?;

        if domains.is_empty() {
            self.project_ranges(property, UNDEFINED, &ranges)?;
        }
        for domain in &domains {
            for branch in domain.disjuncts() {
                match branch.as_named_class() {
                    Some(class) => self.project_ranges(property, &class.label(), &ranges)?,
                    None => self.project_ranges(property, UNDEFINED, &ranges)?,
                }
            }
        }

        for child in self.reasoner.object_subproperties_of(property, true)? {
            self.project_property(&child)?;
        }
        Ok(())
    }

    /// Range handling for one resolved domain label. A relationship with
    /// neither domain nor range gets a freshly numbered placeholder pair
    /// instead of the shared UNDEFINED node.
    fn project_ranges(
        &mut self,
        property: &ObjectPropertyExpression,
        domain_label: &str,
        ranges: &[ClassExpression],
    ) -> Result<(), UmlError> {
        // Labels always come from the underlying named property, even when
        // the traversed expression is an inverse.
        let label = property.named().label();

        if ranges.is_empty() {
            if domain_label != UNDEFINED {
                self.writer.relationship(domain_label, UNDEFINED, &label)?;
            } else {
                self.unknown_counter += 1;
                let placeholder = format!("{}{}", UNDEFINED, self.unknown_counter);
                self.writer.relationship(&placeholder, &placeholder, &label)?;
            }
        } else {
            for range in ranges {
                for branch in range.disjuncts() {
                    match branch.as_named_class() {
                        Some(class) => {
                            self.writer.relationship(domain_label, &class.label(), &label)?;
                        }
                        None => {
                            self.writer.relationship(domain_label, UNDEFINED, &label)?;
                        }
                    }
                }
            }
        }
        Ok(())
    }
}
