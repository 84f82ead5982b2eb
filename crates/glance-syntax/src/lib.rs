//! Colored token spans for the minimap, produced with tree-sitter.

mod highlight;
mod language;

pub use highlight::{SyntaxSystem, plain_spans};
pub use language::Language;
