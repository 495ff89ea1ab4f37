//! 分類済みオントロジーの UML クラス図プロジェクション
//!
//! このクレートは分類済みオントロジーを PlantUML テキストへ投影します:
//! - データプロパティのドメインインデックス
//! - クラス階層プロジェクタ (満たされないサブツリーの抑制付き)
//! - オブジェクトプロパティ関係プロジェクタ
//! - 行指向ダイアグラムライター

pub mod diagram;
pub mod hierarchy;
pub mod index;
pub mod relations;

pub use diagram::{render, DiagramWriter};
pub use hierarchy::HierarchyProjector;
pub use index::{DomainIndex, DomainKey};
pub use relations::RelationshipProjector;

// Error types
use thiserror::Error;

/// Bucket and node name shared by every anonymous or missing domain/range
/// position in the projection.
pub const UNDEFINED: &str = "UNDEFINED";

#[derive(Error, Debug)]
pub enum UmlError {
    #[error("Reasoner error: {0}")]
    Reasoner(#[from] mimizuku_owl::OwlError),

    #[error("Write error: {0}")]
    Write(#[from] std::io::Error),
}
