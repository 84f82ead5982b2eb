use crossbeam_channel::{Receiver, Sender, unbounded};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

pub const MIN_WIDTH: u32 = 50;
pub const MAX_WIDTH: u32 = 250;
pub const MIN_PIXELS_PER_LINE: u32 = 1;
pub const MAX_PIXELS_PER_LINE: u32 = 4;
pub const DEFAULT_VIEWPORT_COLOR: &str = "A0A0A0";

/// User facing minimap settings.
///
/// Values read from disk are normalized before they are handed out, so the
/// renderer and the overlay can rely on `width` and `pixels_per_line` being in
/// range and on `viewport_color` being six hex digits.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MinimapConfig {
    pub disabled: bool,
    pub pixels_per_line: u32,
    pub width: u32,
    pub clean: bool,
    pub right_aligned: bool,
    pub locked: bool,
    pub jump_on_mouse_down: bool,
    pub min_line_count: usize,
    pub min_window_width: u32,
    pub viewport_color: String,
}

impl Default for MinimapConfig {
    fn default() -> Self {
        Self {
            disabled: false,
            pixels_per_line: 3,
            width: 110,
            clean: true,
            right_aligned: true,
            locked: false,
            jump_on_mouse_down: true,
            min_line_count: 1,
            min_window_width: 0,
            viewport_color: DEFAULT_VIEWPORT_COLOR.to_string(),
        }
    }
}

impl MinimapConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path.as_ref())?;
        let mut config: Self = toml::from_str(&contents)?;
        config.normalize();
        Ok(config)
    }

    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        match Self::load(path) {
            Ok(config) => Ok(config),
            Err(ConfigError::Io(err)) if err.kind() == io::ErrorKind::NotFound => {
                Ok(Self::default())
            }
            Err(err) => Err(err),
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Clamp numeric fields and replace a malformed viewport color.
    pub fn normalize(&mut self) {
        self.width = clamp_width(self.width as i64);
        self.pixels_per_line = self
            .pixels_per_line
            .clamp(MIN_PIXELS_PER_LINE, MAX_PIXELS_PER_LINE);

        let color = self.viewport_color.trim();
        if is_hex_color(color) {
            self.viewport_color = color.to_ascii_uppercase();
        } else {
            self.viewport_color = DEFAULT_VIEWPORT_COLOR.to_string();
        }
    }

    /// Viewport indicator color as RGB bytes.
    pub fn viewport_rgb(&self) -> [u8; 3] {
        parse_hex_color(&self.viewport_color)
            .or_else(|| parse_hex_color(DEFAULT_VIEWPORT_COLOR))
            .unwrap_or([0xA0, 0xA0, 0xA0])
    }

    /// Whether a minimap should be shown for a document of `line_count` lines
    /// inside a window `window_width` pixels wide.
    pub fn should_display(&self, line_count: usize, window_width: u32) -> bool {
        !self.disabled && line_count >= self.min_line_count && window_width >= self.min_window_width
    }
}

impl fmt::Display for MinimapConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MinimapConfig(width={}, pixels_per_line={}, clean={})",
            self.width, self.pixels_per_line, self.clean
        )
    }
}

/// Clamp a possibly negative requested width into the supported range.
pub fn clamp_width(requested: i64) -> u32 {
    requested.clamp(MIN_WIDTH as i64, MAX_WIDTH as i64) as u32
}

fn is_hex_color(value: &str) -> bool {
    value.len() == 6 && value.chars().all(|ch| ch.is_ascii_hexdigit())
}

fn parse_hex_color(value: &str) -> Option<[u8; 3]> {
    if !is_hex_color(value) {
        return None;
    }
    let channel = |idx: usize| u8::from_str_radix(&value[idx..idx + 2], 16).ok();
    Some([channel(0)?, channel(2)?, channel(4)?])
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Failed to parse minimap configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Failed to serialize minimap configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigEvent {
    Changed,
}

/// Receiving end of a change subscription. Pass `id` back to
/// [`ConfigService::unsubscribe`] when the observer goes away.
#[derive(Debug)]
pub struct Subscription {
    pub id: u64,
    pub receiver: Receiver<ConfigEvent>,
}

/// Shared owner of the live configuration plus its observer list.
#[derive(Debug)]
pub struct ConfigService {
    config: RwLock<MinimapConfig>,
    observers: Mutex<Vec<(u64, Sender<ConfigEvent>)>>,
    next_id: AtomicU64,
}

impl Default for ConfigService {
    fn default() -> Self {
        Self::new(MinimapConfig::default())
    }
}

impl ConfigService {
    pub fn new(mut config: MinimapConfig) -> Self {
        config.normalize();
        Self {
            config: RwLock::new(config),
            observers: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Copy of the current settings. Callers re-read this on every operation.
    pub fn snapshot(&self) -> MinimapConfig {
        self.config.read().clone()
    }

    pub fn width(&self) -> u32 {
        self.config.read().width
    }

    /// Apply `change`, normalize the result and notify observers.
    pub fn update(&self, change: impl FnOnce(&mut MinimapConfig)) {
        {
            let mut config = self.config.write();
            change(&mut config);
            config.normalize();
        }
        self.notify_change();
    }

    /// Set the minimap width, clamped to the supported range. Observers are
    /// only notified when the stored width changes; returns whether it did.
    pub fn set_width(&self, requested: i64) -> bool {
        let width = clamp_width(requested);
        {
            let mut config = self.config.write();
            if config.width == width {
                return false;
            }
            config.width = width;
        }
        self.notify_change();
        true
    }

    pub fn subscribe(&self) -> Subscription {
        let (sender, receiver) = unbounded();
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.observers.lock().push((id, sender));
        Subscription { id, receiver }
    }

    pub fn unsubscribe(&self, id: u64) -> bool {
        let mut observers = self.observers.lock();
        let before = observers.len();
        observers.retain(|(observer, _)| *observer != id);
        before != observers.len()
    }

    pub fn observer_count(&self) -> usize {
        self.observers.lock().len()
    }

    pub fn notify_change(&self) {
        let mut observers = self.observers.lock();
        observers.retain(|(id, sender)| {
            let alive = sender.send(ConfigEvent::Changed).is_ok();
            if !alive {
                tracing::debug!("dropping disconnected config observer {}", id);
            }
            alive
        });
    }
}
