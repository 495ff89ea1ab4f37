//! 行指向ダイアグラムライター

use crate::hierarchy::HierarchyProjector;
use crate::index::DomainIndex;
use crate::relations::RelationshipProjector;
use crate::UmlError;
use mimizuku_owl::Reasoner;
use std::io::Write;

/// Line-oriented writer for the diagram text format. Owns the sink for the
/// duration of one run and never reads it back.
pub struct DiagramWriter<W> {
    out: W,
}

impl<W: Write> DiagramWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn begin(&mut self) -> Result<(), UmlError> {
        writeln!(self.out, "@startuml")?;
        writeln!(self.out, "hide methods")?;
        Ok(())
    }

    /// A class block: header with optional namespace in angle brackets, one
    /// tab-indented line per field.
    pub fn class_block(
        &mut self,
        label: &str,
        namespace: Option<&str>,
        fields: &[String],
    ) -> Result<(), UmlError> {
        match namespace {
            Some(namespace) => writeln!(self.out, "class {}<{}> {{", label, namespace)?,
            None => writeln!(self.out, "class {} {{", label)?,
        }
        for field in fields {
            writeln!(self.out, "\t{}", field)?;
        }
        writeln!(self.out, "}}")?;
        Ok(())
    }

    pub fn inheritance(&mut self, parent: &str, child: &str) -> Result<(), UmlError> {
        writeln!(self.out, "{} <|-- {}", parent, child)?;
        Ok(())
    }

    pub fn relationship(&mut self, domain: &str, range: &str, label: &str) -> Result<(), UmlError> {
        writeln!(self.out, "{} o-- {} : {}", domain, range, label)?;
        Ok(())
    }

    pub fn unsatisfiable(&mut self, label: &str) -> Result<(), UmlError> {
        writeln!(self.out, "XXX: {}", label)?;
        Ok(())
    }

    pub fn end(&mut self) -> Result<(), UmlError> {
        writeln!(self.out, "@enduml")?;
        self.out.flush()?;
        Ok(())
    }
}

/// Run the full projection in document order: domain index first, then the
/// class hierarchy, then relationship edges, wrapped between the diagram
/// markers. Lines already written stay written if a later phase fails.
pub fn render<R: Reasoner, W: Write>(reasoner: &R, out: W) -> Result<(), UmlError> {
    let mut writer = DiagramWriter::new(out);
    writer.begin()?;

    let index = DomainIndex::build(reasoner)?;
    HierarchyProjector::new(reasoner, &index, &mut writer).project()?;
    RelationshipProjector::new(reasoner, &mut writer).project()?;

    writer.end()?;
    Ok(())
}
