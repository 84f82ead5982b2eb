use std::ops::Range;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use crossbeam_channel::bounded;
use glance_config::{ConfigService, Subscription};
use glance_render::{
    BitmapBuffer, CursorIcon, DocumentModel, EditorMetrics, Minimap, OverlayCommand,
    OverlayController, PointerEvent, RenderOutcome, ScrollHost, ScrollState, TokenSpan,
    VisibleArea,
};
use parking_lot::Mutex;

use crate::render_job::RenderJob;

/// Pointer activity over the minimap panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerInput {
    Press(PointerEvent),
    Drag(PointerEvent),
    Release(PointerEvent),
    Move(PointerEvent),
    Exit,
    Wheel(f32),
}

/// Where and how to paint the viewport indicator, in panel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Indicator {
    pub y: i32,
    pub height: i32,
    pub width: u32,
    pub rgb: [u8; 3],
    pub alpha: f32,
}

/// A minimap attached to one editor.
///
/// Ties the renderer, the scroll geometry and the indicator together, and
/// listens for configuration changes for as long as it lives. The image and
/// the pointer state sit behind separate locks so a background render never
/// blocks pointer handling.
#[derive(Debug)]
pub struct GlancePanel {
    config: Arc<ConfigService>,
    subscription: Subscription,
    minimap: Arc<Mutex<Minimap>>,
    scroll: Mutex<ScrollState>,
    overlay: Mutex<OverlayController>,
    in_flight: Mutex<Option<Arc<AtomicBool>>>,
}

impl GlancePanel {
    pub fn new(config: Arc<ConfigService>) -> Self {
        let subscription = config.subscribe();
        tracing::debug!("minimap panel registered as config observer {}", subscription.id);
        Self {
            config,
            subscription,
            minimap: Arc::new(Mutex::new(Minimap::new())),
            scroll: Mutex::new(ScrollState::new()),
            overlay: Mutex::new(OverlayController::new()),
            in_flight: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &Arc<ConfigService> {
        &self.config
    }

    pub fn is_visible(&self, line_count: usize, window_width: u32) -> bool {
        self.config.snapshot().should_display(line_count, window_width)
    }

    /// Repaint the minimap on the calling thread.
    pub fn render<D>(&self, document: &D, spans: &[TokenSpan], metrics: &EditorMetrics) -> RenderOutcome
    where
        D: DocumentModel + ?Sized,
    {
        self.cancel_in_flight();
        let config = self.config.snapshot();
        let outcome = self
            .minimap
            .lock()
            .update(document, spans, metrics, &config, &false);
        tracing::debug!("minimap render finished: {:?}", outcome);
        outcome
    }

    /// Repaint the minimap on a worker thread, cancelling any render still
    /// running from an earlier call.
    pub fn spawn_render<D>(&self, document: Arc<D>, spans: Vec<TokenSpan>, metrics: EditorMetrics) -> RenderJob
    where
        D: DocumentModel + Send + Sync + 'static,
    {
        let cancel = Arc::new(AtomicBool::new(false));
        if let Some(previous) = self.in_flight.lock().replace(Arc::clone(&cancel)) {
            previous.store(true, Ordering::Relaxed);
        }

        let config = self.config.snapshot();
        let minimap = Arc::clone(&self.minimap);
        let flag = Arc::clone(&cancel);
        let (sender, receiver) = bounded(1);

        let handle = thread::spawn(move || {
            let outcome = minimap
                .lock()
                .update(document.as_ref(), &spans, &metrics, &config, flag.as_ref());
            tracing::debug!("background minimap render finished: {:?}", outcome);
            let _ = sender.send(outcome);
        });

        RenderJob::new(cancel, receiver, handle)
    }

    /// Recompute scroll geometry from the editor and a fresh configuration.
    pub fn sync_geometry(&self, metrics: &EditorMetrics, area: VisibleArea) -> ScrollState {
        let config = self.config.snapshot();
        let mut scroll = self.scroll.lock();
        scroll.compute_dimensions(metrics, &config);
        scroll.recompute_visible(area);
        *scroll
    }

    pub fn scroll_state(&self) -> ScrollState {
        *self.scroll.lock()
    }

    /// Rows of the image to show in the panel.
    pub fn visible_rows(&self) -> Range<i32> {
        let scroll = self.scroll.lock();
        scroll.visible_start()..scroll.visible_end()
    }

    /// Run pointer input through the indicator state machine and carry out
    /// the resulting commands on `host`. Returns whether the panel needs a
    /// repaint.
    pub fn handle_pointer<H>(&self, input: PointerInput, host: &mut H) -> bool
    where
        H: ScrollHost + ?Sized,
    {
        let config = self.config.snapshot();
        let scroll = self.scroll_state();
        let commands = {
            let mut overlay = self.overlay.lock();
            match input {
                PointerInput::Press(event) => overlay.on_press(event, &scroll, &config),
                PointerInput::Drag(event) => overlay.on_drag(event, &scroll, &config),
                PointerInput::Release(event) => overlay.on_release(event, &scroll, &config),
                PointerInput::Move(event) => overlay.on_move(event, &scroll, &config),
                PointerInput::Exit => overlay.on_exit(),
                PointerInput::Wheel(delta) => overlay.on_wheel(delta),
            }
        };

        let mut repaint = false;
        for command in commands {
            match command {
                OverlayCommand::ScrollTo(y) => {
                    host.scroll_vertically(y);
                    repaint = true;
                }
                OverlayCommand::SetScrollAnimation(enabled) => host.set_scroll_animation(enabled),
                OverlayCommand::Resize(width) => {
                    if self.config.set_width(i64::from(width)) {
                        repaint = true;
                    }
                }
                OverlayCommand::ForwardWheel(delta) => {
                    host.forward_wheel(delta);
                    repaint = true;
                }
                OverlayCommand::Repaint => repaint = true,
            }
        }
        repaint
    }

    pub fn cursor(&self) -> CursorIcon {
        self.overlay.lock().cursor()
    }

    /// Drain configuration notifications. `true` means the minimap has to be
    /// laid out and rendered again.
    pub fn poll_config(&self) -> bool {
        let changes = self.subscription.receiver.try_iter().count();
        if changes > 0 {
            tracing::debug!("minimap configuration changed ({} notifications)", changes);
        }
        changes > 0
    }

    pub fn indicator(&self) -> Indicator {
        let config = self.config.snapshot();
        let scroll = self.scroll_state();
        Indicator {
            y: scroll.v_offset(),
            height: scroll.viewport_height(),
            width: config.width,
            rgb: config.viewport_rgb(),
            alpha: self.overlay.lock().alpha(),
        }
    }

    /// Read the current image under its lock.
    pub fn with_image<R>(&self, f: impl FnOnce(&BitmapBuffer) -> R) -> R {
        f(self.minimap.lock().image())
    }

    fn cancel_in_flight(&self) {
        if let Some(previous) = self.in_flight.lock().take() {
            previous.store(true, Ordering::Relaxed);
        }
    }
}

impl Drop for GlancePanel {
    fn drop(&mut self) {
        self.cancel_in_flight();
        self.config.unsubscribe(self.subscription.id);
        tracing::debug!("minimap panel observer {} released", self.subscription.id);
    }
}
