//! Minimap rendering core for codeglance
//!
//! This crate provides:
//! - Glyph ink-weight heuristics
//! - An RGBA bitmap surface that only grows
//! - The fold-aware document renderer
//! - Scroll geometry shared by the bitmap and the viewport indicator
//! - The pointer state machine driving the indicator

pub mod bitmap;
pub mod color;
pub mod glyph;
pub mod host;
pub mod minimap;
pub mod overlay;
pub mod scroll;

pub use bitmap::BitmapBuffer;
pub use color::{Rgba, TokenSpan};
pub use host::{Cancellation, DocumentModel, EditorMetrics, FoldRegion, ScrollHost, VisibleArea};
pub use minimap::{Minimap, RenderOutcome};
pub use overlay::{
    CursorIcon, InteractionState, OverlayCommand, OverlayController, PointerButton, PointerEvent,
};
pub use scroll::ScrollState;
