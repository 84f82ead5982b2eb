//! Pointer handling for the viewport indicator drawn over the minimap.
//!
//! The controller never touches the host directly. Every handler returns the
//! commands the host should carry out, in order.

use glance_config::{MinimapConfig, clamp_width};

use crate::scroll::ScrollState;

pub const DEFAULT_ALPHA: f32 = 0.15;
pub const HOVER_ALPHA: f32 = 0.25;
pub const DRAG_ALPHA: f32 = 0.35;

/// Width of the strip along the inner edge of the panel that starts a resize.
pub const RESIZE_GUTTER: i32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// A pointer event in panel coordinates. `screen_x` is the absolute
/// horizontal position, which stays meaningful while the panel itself
/// changes width under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    pub x: i32,
    pub y: i32,
    pub screen_x: i32,
    pub button: Option<PointerButton>,
}

impl PointerEvent {
    pub fn new(x: i32, y: i32, screen_x: i32) -> Self {
        Self {
            x,
            y,
            screen_x,
            button: None,
        }
    }

    pub fn with_button(mut self, button: PointerButton) -> Self {
        self.button = Some(button);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorIcon {
    #[default]
    Default,
    ResizeWest,
    ResizeEast,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    Resizing {
        start_x: i32,
        start_width: u32,
    },
    Dragging {
        start_y: i32,
        start_delta: i32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OverlayCommand {
    /// Scroll the editor so that this editor pixel row is at the top.
    ScrollTo(i32),
    SetScrollAnimation(bool),
    /// Store a new minimap width and notify configuration observers.
    Resize(u32),
    ForwardWheel(f32),
    /// The indicator changed appearance.
    Repaint,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverlayController {
    state: InteractionState,
    alpha: f32,
    cursor: CursorIcon,
}

impl Default for OverlayController {
    fn default() -> Self {
        Self {
            state: InteractionState::Idle,
            alpha: DEFAULT_ALPHA,
            cursor: CursorIcon::Default,
        }
    }
}

impl OverlayController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    /// Opacity the indicator should be painted with.
    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn cursor(&self) -> CursorIcon {
        self.cursor
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, InteractionState::Dragging { .. })
    }

    pub fn on_press(
        &mut self,
        event: PointerEvent,
        scroll: &ScrollState,
        config: &MinimapConfig,
    ) -> Vec<OverlayCommand> {
        if event.button != Some(PointerButton::Primary) {
            return Vec::new();
        }

        let mut commands = Vec::new();
        if in_resize_gutter(event.x, config) {
            self.state = InteractionState::Resizing {
                start_x: event.screen_x,
                start_width: config.width,
            };
        } else if scroll.indicator_contains(event.y) {
            self.state = InteractionState::Dragging {
                start_y: event.y,
                start_delta: scroll.v_offset(),
            };
            self.set_alpha(DRAG_ALPHA, &mut commands);
            // Animated scrolling lags behind the pointer.
            commands.push(OverlayCommand::SetScrollAnimation(false));
        } else if config.jump_on_mouse_down {
            commands.push(OverlayCommand::ScrollTo(scroll.jump_target(event.y)));
        }
        commands
    }

    pub fn on_drag(
        &mut self,
        event: PointerEvent,
        scroll: &ScrollState,
        config: &MinimapConfig,
    ) -> Vec<OverlayCommand> {
        match self.state {
            InteractionState::Idle => Vec::new(),
            InteractionState::Resizing {
                start_x,
                start_width,
            } => {
                let moved = (event.screen_x - start_x) as i64;
                let requested = if config.right_aligned {
                    start_width as i64 - moved
                } else {
                    start_width as i64 + moved
                };
                vec![OverlayCommand::Resize(clamp_width(requested))]
            }
            InteractionState::Dragging {
                start_y,
                start_delta,
            } => {
                let delta = start_delta + (event.y - start_y);
                vec![OverlayCommand::ScrollTo(scroll.drag_target(delta))]
            }
        }
    }

    pub fn on_release(
        &mut self,
        event: PointerEvent,
        scroll: &ScrollState,
        config: &MinimapConfig,
    ) -> Vec<OverlayCommand> {
        if matches!(event.button, Some(button) if button != PointerButton::Primary) {
            return Vec::new();
        }

        let mut commands = Vec::new();
        if !config.jump_on_mouse_down && self.state == InteractionState::Idle {
            commands.push(OverlayCommand::ScrollTo(scroll.jump_target(event.y)));
        }

        self.state = InteractionState::Idle;
        self.update_alpha(event.y, scroll, &mut commands);
        commands.push(OverlayCommand::SetScrollAnimation(true));
        commands
    }

    pub fn on_move(
        &mut self,
        event: PointerEvent,
        scroll: &ScrollState,
        config: &MinimapConfig,
    ) -> Vec<OverlayCommand> {
        self.cursor = if !in_resize_gutter(event.x, config) {
            CursorIcon::Default
        } else if config.right_aligned {
            CursorIcon::ResizeWest
        } else {
            CursorIcon::ResizeEast
        };

        let mut commands = Vec::new();
        self.update_alpha(event.y, scroll, &mut commands);
        commands
    }

    /// The pointer left the panel.
    pub fn on_exit(&mut self) -> Vec<OverlayCommand> {
        let mut commands = Vec::new();
        if !self.is_dragging() {
            self.set_alpha(DEFAULT_ALPHA, &mut commands);
        }
        commands
    }

    /// Wheel events scroll the editor as if the minimap were not there.
    pub fn on_wheel(&mut self, delta: f32) -> Vec<OverlayCommand> {
        vec![OverlayCommand::ForwardWheel(delta)]
    }

    fn update_alpha(&mut self, y: i32, scroll: &ScrollState, commands: &mut Vec<OverlayCommand>) {
        let alpha = if self.is_dragging() {
            DRAG_ALPHA
        } else if scroll.indicator_contains(y) {
            HOVER_ALPHA
        } else {
            DEFAULT_ALPHA
        };
        self.set_alpha(alpha, commands);
    }

    fn set_alpha(&mut self, alpha: f32, commands: &mut Vec<OverlayCommand>) {
        if self.alpha != alpha {
            self.alpha = alpha;
            commands.push(OverlayCommand::Repaint);
        }
    }
}

/// The gutter sits on the edge facing the editor.
fn in_resize_gutter(x: i32, config: &MinimapConfig) -> bool {
    if config.locked {
        return false;
    }

    if config.right_aligned {
        (0..RESIZE_GUTTER).contains(&x)
    } else {
        let width = config.width as i32;
        (width - RESIZE_GUTTER..=width).contains(&x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{EditorMetrics, VisibleArea};
    use glance_config::{MAX_WIDTH, MIN_WIDTH};

    fn config() -> MinimapConfig {
        MinimapConfig {
            pixels_per_line: 2,
            width: 110,
            ..MinimapConfig::default()
        }
    }

    /// 100 lines of 20px shown through a 400px viewport scrolled to `y`.
    fn scroll(config: &MinimapConfig, y: i32) -> ScrollState {
        let mut scroll = ScrollState::new();
        scroll.compute_dimensions(
            &EditorMetrics {
                line_height: 20.0,
                content_height: 2000.0,
            },
            config,
        );
        scroll.recompute_visible(VisibleArea { y, height: 400 });
        scroll
    }

    fn press(x: i32, y: i32) -> PointerEvent {
        PointerEvent::new(x, y, 1000 + x).with_button(PointerButton::Primary)
    }

    #[test]
    fn only_primary_button_presses_count() {
        let config = config();
        let scroll = scroll(&config, 0);
        let mut overlay = OverlayController::new();

        let event = PointerEvent::new(50, 10, 1050).with_button(PointerButton::Secondary);
        assert!(overlay.on_press(event, &scroll, &config).is_empty());
        assert_eq!(overlay.state(), InteractionState::Idle);
    }

    #[test]
    fn press_in_gutter_starts_resizing() {
        let config = config();
        let scroll = scroll(&config, 0);
        let mut overlay = OverlayController::new();

        assert!(overlay.on_press(press(3, 10), &scroll, &config).is_empty());
        assert_eq!(
            overlay.state(),
            InteractionState::Resizing {
                start_x: 1003,
                start_width: 110
            }
        );
    }

    #[test]
    fn locked_gutter_does_not_resize() {
        let config = MinimapConfig {
            locked: true,
            jump_on_mouse_down: false,
            ..config()
        };
        let scroll = scroll(&config, 600);
        let mut overlay = OverlayController::new();

        overlay.on_press(press(3, 300), &scroll, &config);
        assert_eq!(overlay.state(), InteractionState::Idle);

        let commands = overlay.on_drag(PointerEvent::new(-60, 300, 940), &scroll, &config);
        assert!(commands.is_empty());

        let moved = overlay.on_move(PointerEvent::new(3, 300, 1003), &scroll, &config);
        assert!(moved.is_empty());
        assert_eq!(overlay.cursor(), CursorIcon::Default);
    }

    #[test]
    fn resize_follows_alignment_and_clamps() {
        let config = config();
        let scroll = scroll(&config, 0);
        let mut overlay = OverlayController::new();

        // Right aligned: dragging left widens.
        overlay.on_press(press(2, 10), &scroll, &config);
        let commands = overlay.on_drag(PointerEvent::new(-28, 10, 972), &scroll, &config);
        assert_eq!(commands, vec![OverlayCommand::Resize(140)]);
        let commands = overlay.on_drag(PointerEvent::new(-900, 10, 100), &scroll, &config);
        assert_eq!(commands, vec![OverlayCommand::Resize(MAX_WIDTH)]);
        let commands = overlay.on_drag(PointerEvent::new(900, 10, 1900), &scroll, &config);
        assert_eq!(commands, vec![OverlayCommand::Resize(MIN_WIDTH)]);
        overlay.on_release(PointerEvent::new(0, 10, 1000), &scroll, &config);

        let left = MinimapConfig {
            right_aligned: false,
            ..config
        };
        overlay.on_press(press(108, 10), &scroll, &left);
        let commands = overlay.on_drag(PointerEvent::new(128, 10, 1128), &scroll, &left);
        assert_eq!(commands, vec![OverlayCommand::Resize(130)]);
    }

    #[test]
    fn gutter_sits_on_the_editor_side() {
        let right = config();
        assert!(in_resize_gutter(0, &right));
        assert!(in_resize_gutter(7, &right));
        assert!(!in_resize_gutter(8, &right));
        assert!(!in_resize_gutter(105, &right));

        let left = MinimapConfig {
            right_aligned: false,
            ..config()
        };
        assert!(!in_resize_gutter(0, &left));
        assert!(!in_resize_gutter(101, &left));
        assert!(in_resize_gutter(102, &left));
        assert!(in_resize_gutter(110, &left));
    }

    #[test]
    fn dragging_the_indicator_scrolls_by_delta_over_scale() {
        let config = config();
        let scroll = scroll(&config, 300);
        let mut overlay = OverlayController::new();

        // Indicator covers rows 30..70.
        let commands = overlay.on_press(press(50, 40), &scroll, &config);
        assert_eq!(
            commands,
            vec![OverlayCommand::Repaint, OverlayCommand::SetScrollAnimation(false)]
        );
        assert_eq!(overlay.alpha(), DRAG_ALPHA);
        assert_eq!(
            overlay.state(),
            InteractionState::Dragging {
                start_y: 40,
                start_delta: 30
            }
        );

        for d in [-30, -5, 0, 12, 50] {
            let commands = overlay.on_drag(PointerEvent::new(50, 40 + d, 1050), &scroll, &config);
            let expected = ((30 + d) as f32 / scroll.scale()).round() as i32;
            assert_eq!(commands, vec![OverlayCommand::ScrollTo(expected)]);
        }
    }

    #[test]
    fn release_ends_drag_and_restores_animation() {
        let config = config();
        let scroll = scroll(&config, 300);
        let mut overlay = OverlayController::new();

        overlay.on_press(press(50, 40), &scroll, &config);
        let commands = overlay.on_release(PointerEvent::new(50, 200, 1050), &scroll, &config);
        assert_eq!(
            commands,
            vec![OverlayCommand::Repaint, OverlayCommand::SetScrollAnimation(true)]
        );
        assert_eq!(overlay.state(), InteractionState::Idle);
        assert_eq!(overlay.alpha(), DEFAULT_ALPHA);
    }

    #[test]
    fn press_outside_indicator_jumps_immediately() {
        let config = config();
        let scroll = scroll(&config, 0);
        let mut overlay = OverlayController::new();

        let commands = overlay.on_press(press(50, 100), &scroll, &config);
        assert_eq!(commands, vec![OverlayCommand::ScrollTo(800)]);
        assert_eq!(overlay.state(), InteractionState::Idle);
    }

    #[test]
    fn click_without_jump_on_press_jumps_once_on_release() {
        let config = MinimapConfig {
            jump_on_mouse_down: false,
            ..config()
        };
        let scroll = scroll(&config, 0);
        let mut overlay = OverlayController::new();

        assert!(overlay.on_press(press(50, 100), &scroll, &config).is_empty());
        let commands = overlay.on_release(press(50, 100), &scroll, &config);
        let jumps: Vec<_> = commands
            .iter()
            .filter(|command| matches!(command, OverlayCommand::ScrollTo(_)))
            .collect();
        assert_eq!(jumps, vec![&OverlayCommand::ScrollTo(800)]);
    }

    #[test]
    fn secondary_click_never_jumps() {
        let config = MinimapConfig {
            jump_on_mouse_down: false,
            ..config()
        };
        let scroll = scroll(&config, 0);
        let mut overlay = OverlayController::new();

        let event = PointerEvent::new(50, 100, 1050).with_button(PointerButton::Secondary);
        assert!(overlay.on_press(event, &scroll, &config).is_empty());
        assert!(overlay.on_release(event, &scroll, &config).is_empty());
        assert_eq!(overlay.state(), InteractionState::Idle);
    }

    #[test]
    fn release_after_drag_does_not_jump() {
        let config = MinimapConfig {
            jump_on_mouse_down: false,
            ..config()
        };
        let scroll = scroll(&config, 0);
        let mut overlay = OverlayController::new();

        overlay.on_press(press(50, 10), &scroll, &config);
        overlay.on_drag(PointerEvent::new(50, 20, 1050), &scroll, &config);
        let commands = overlay.on_release(PointerEvent::new(50, 20, 1050), &scroll, &config);
        assert!(!commands
            .iter()
            .any(|command| matches!(command, OverlayCommand::ScrollTo(_))));
    }

    #[test]
    fn hover_changes_alpha_and_cursor() {
        let config = config();
        let scroll = scroll(&config, 0);
        let mut overlay = OverlayController::new();

        assert_eq!(
            overlay.on_move(PointerEvent::new(50, 10, 1050), &scroll, &config),
            vec![OverlayCommand::Repaint]
        );
        assert_eq!(overlay.alpha(), HOVER_ALPHA);
        assert_eq!(overlay.cursor(), CursorIcon::Default);

        // Same alpha again, nothing to repaint.
        assert!(overlay.on_move(PointerEvent::new(2, 20, 1002), &scroll, &config).is_empty());
        assert_eq!(overlay.cursor(), CursorIcon::ResizeWest);

        overlay.on_move(PointerEvent::new(50, 300, 1050), &scroll, &config);
        assert_eq!(overlay.alpha(), DEFAULT_ALPHA);

        let left = MinimapConfig {
            right_aligned: false,
            ..config
        };
        overlay.on_move(PointerEvent::new(109, 300, 1109), &scroll, &left);
        assert_eq!(overlay.cursor(), CursorIcon::ResizeEast);
    }

    #[test]
    fn exit_resets_alpha_unless_dragging() {
        let config = config();
        let scroll = scroll(&config, 0);
        let mut overlay = OverlayController::new();

        overlay.on_move(PointerEvent::new(50, 10, 1050), &scroll, &config);
        assert_eq!(overlay.on_exit(), vec![OverlayCommand::Repaint]);
        assert_eq!(overlay.alpha(), DEFAULT_ALPHA);

        overlay.on_press(press(50, 10), &scroll, &config);
        assert!(overlay.on_exit().is_empty());
        assert_eq!(overlay.alpha(), DRAG_ALPHA);
    }

    #[test]
    fn wheel_is_forwarded() {
        let mut overlay = OverlayController::new();
        assert_eq!(overlay.on_wheel(-3.0), vec![OverlayCommand::ForwardWheel(-3.0)]);
    }
}
