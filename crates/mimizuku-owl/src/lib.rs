//! OWL オントロジーモデルとタクソノミーオラクル
//!
//! このクレートは UML 投影の外部コラボレータを提供します:
//! - オントロジーデータモデル (classes, properties, expressions, axioms)
//! - Turtle / N-Triples ドキュメントローダーとマージ
//! - asserted taxonomy に基づく推論オラクル

pub mod loader;
pub mod model;
pub mod reasoner;
pub mod vocab;

pub use loader::{OntologyLoader, TurtleLoader};
pub use model::{
    Axiom, Class, ClassExpression, DataProperty, ObjectProperty, ObjectPropertyExpression,
    Ontology, OwlIri,
};
pub use reasoner::{AssertedReasoner, Reasoner};

// Error types
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OwlError {
    #[error("Loader error: {0}")]
    LoaderError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Reasoning error: {0}")]
    ReasoningError(String),
}
