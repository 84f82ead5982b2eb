//! Headless editor model hosting the minimap
//!
//! This crate provides:
//! - Documents loaded from disk with a memchr backed line index
//! - Collapsed fold regions
//! - An editor view that scrolls and reports its geometry

pub mod document;
pub mod folds;
pub mod line_index;
pub mod view;

pub use document::Document;
pub use folds::{FoldError, FoldModel};
pub use line_index::LineIndex;
pub use view::EditorView;
