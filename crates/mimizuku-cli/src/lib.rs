//! # Mimizuku CLI Library
//!
//! 分類済み OWL オントロジーを PlantUML クラス図へ投影するコマンドライン
//! インターフェース

pub mod commands;

pub use commands::*;
