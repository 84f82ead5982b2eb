mod panel;
mod render_job;

pub use panel::{GlancePanel, Indicator, PointerInput};
pub use render_job::RenderJob;
