//! クラス階層プロジェクタ

use crate::diagram::DiagramWriter;
use crate::index::DomainIndex;
use crate::{UmlError, UNDEFINED};
use mimizuku_owl::{Class, Reasoner};
use std::io::Write;

/// Projects the class hierarchy below owl:Thing as UML class blocks and
/// inheritance edges. Makes no attempt to deal sensibly with multiple
/// inheritance: a class reachable through several parents is emitted once
/// per parent edge.
pub struct HierarchyProjector<'a, R, W> {
    reasoner: &'a R,
    index: &'a DomainIndex,
    writer: &'a mut DiagramWriter<W>,
}

impl<'a, R: Reasoner, W: Write> HierarchyProjector<'a, R, W> {
    pub fn new(
        reasoner: &'a R,
        index: &'a DomainIndex,
        writer: &'a mut DiagramWriter<W>,
    ) -> Self {
        Self {
            reasoner,
            index,
            writer,
        }
    }

    /// Walk the hierarchy, then report every unsatisfiable class in the full
    /// signature, then emit the synthetic UNDEFINED block for domain-less
    /// data properties.
    pub fn project(&mut self) -> Result<(), UmlError> {
        // owl:Thing itself is skipped to keep the output readable.
        for child in self.reasoner.subclasses_of(&Class::Thing, true)? {
            self.project_class(None, &child)?;
        }

        // Independent of the walk above: a disconnected unsatisfiable class
        // is still reported.
        let mut unsatisfiable = Vec::new();
        for class in self.reasoner.classes_in_signature()? {
            if !self.reasoner.is_satisfiable(&class)? {
                unsatisfiable.push(class.label());
            }
        }
        unsatisfiable.sort();
        for label in &unsatisfiable {
            self.writer.unsatisfiable(label)?;
        }

        let orphaned = self.index.undefined_labels();
        if !orphaned.is_empty() {
            self.writer.class_block(UNDEFINED, None, &orphaned)?;
        }
        Ok(())
    }

    /// Preorder walk. An unsatisfiable class suppresses its entire subtree,
    /// even when individual descendants would be satisfiable on their own.
    fn project_class(&mut self, parent: Option<&Class>, class: &Class) -> Result<(), UmlError> {
        if !self.reasoner.is_satisfiable(class)? {
            return Ok(());
        }

        let fields = self.index.field_labels(class);
        self.writer
            .class_block(&class.label(), class.namespace(), &fields)?;
        if let Some(parent) = parent {
            self.writer.inheritance(&parent.label(), &class.label())?;
        }

        for child in self.reasoner.subclasses_of(class, true)? {
            // A class proven equivalent to another comes back as its own
            // subclass; recursing into it would never terminate.
            if &child != class {
                self.project_class(Some(class), &child)?;
            }
        }
        Ok(())
    }
}
