//! Viewer configuration (viewer.toml)
//!
//! Handles parsing, defaults, and validation of viewer settings. A config is
//! read once at construction and resolved against the host environment into
//! an immutable [`ResolvedConfig`].

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use spin360_shared::Size;
use spin360_shared::constants::{
    DEFAULT_AMOUNT, DEFAULT_CDN_FILTERS, DEFAULT_CDN_HOST, DEFAULT_CDN_OPERATION,
    DEFAULT_DRAG_SPEED, DEFAULT_FILENAME, DEFAULT_HINT_OFFSET, DEFAULT_SPEED, MAX_FRAMES,
    MAX_INDEX_ZERO_BASE, REFERENCE_FRAMES,
};

use crate::error::ConfigError;
use crate::frame::{EdgePolicy, Grid};
use crate::input::KeyboardMapping;

/// Viewer configuration.
///
/// Contains all settings organized into sections. Every field has a default,
/// so an empty file yields a 36-frame single-row viewer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ViewerConfig {
    /// Frame grid dimensions
    #[serde(default)]
    pub grid: GridConfig,
    /// Where frame images come from
    #[serde(default)]
    pub source: SourceConfig,
    /// Drag, swipe and keyboard behavior
    #[serde(default)]
    pub controls: ControlsConfig,
    /// Automatic spinning
    #[serde(default)]
    pub autoplay: AutoplayConfig,
    /// Presentation toggles
    #[serde(default)]
    pub display: DisplayConfig,
    /// Responsive image CDN rewriting (disabled when absent)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responsive: Option<ResponsiveConfig>,
    /// Drag-to-frame calibration
    #[serde(default)]
    pub drag: DragCalibration,
}

/// Frame grid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Elevation rows (default: 1)
    #[serde(default = "default_one")]
    pub rows: u32,
    /// Frames per row (default: `amount / rows`, or 36)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cols: Option<u32>,
    /// Total frame count; must equal `rows * cols` when both are given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<u32>,
    /// Starting row (default: 1)
    #[serde(default = "default_one")]
    pub start_row: u32,
    /// Starting column (default: 1)
    #[serde(default = "default_one")]
    pub start_col: u32,
}

/// Frame image source configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Prefix for relative filenames and list entries
    #[serde(default)]
    pub folder: String,
    /// Filename template containing `{index}` (default: `image-{index}.jpg`)
    #[serde(default = "default_filename")]
    pub filename: String,
    /// Explicit JSON array of image URLs, used instead of the template
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_list: Option<String>,
    /// Zero padding width of `{index}` (default: 0, no padding)
    #[serde(default)]
    pub index_zero_base: u32,
    /// Load only the first frame until it is shown (default: false)
    #[serde(default)]
    pub lazyload: bool,
}

/// Input control configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlsConfig {
    /// Spin with mouse drags (default: true)
    #[serde(default = "default_true")]
    pub draggable: bool,
    /// Spin with touch swipes (default: true)
    #[serde(default = "default_true")]
    pub swipeable: bool,
    /// Spin with the arrow keys (default: false)
    #[serde(default)]
    pub keys: bool,
    /// Pointer travel per frame, relative to 150 (default: 150)
    #[serde(default = "default_drag_speed")]
    pub drag_speed: f64,
    /// Invert drag direction (default: false)
    #[serde(default)]
    pub spin_reverse: bool,
    /// Invert which prev/next control is disabled at an edge (default: false)
    #[serde(default)]
    pub control_reverse: bool,
    /// Clamp columns instead of wrapping (default: false)
    #[serde(default)]
    pub stop_at_edges_x: bool,
    /// Clamp rows instead of wrapping (default: false)
    #[serde(default)]
    pub stop_at_edges_y: bool,
    /// Keys bound to next/prev (default: ArrowLeft/ArrowRight)
    #[serde(default)]
    pub key_mapping: KeyboardMapping,
}

/// Autoplay configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoplayConfig {
    /// Spin automatically once loaded (default: false, ignored on touch hosts)
    #[serde(default)]
    pub enabled: bool,
    /// Period base; one tick every `speed * 36 / amount` ms (default: 80)
    #[serde(default = "default_speed")]
    pub speed: f64,
    /// Spin backwards (default: false)
    #[serde(default)]
    pub reverse: bool,
}

/// Presentation toggles forwarded to the adapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Offer a full-screen view (default: false)
    #[serde(default)]
    pub full_screen: bool,
    /// Magnifier zoom factor, disabled when absent (ignored on touch hosts)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub magnifier: Option<f64>,
    /// Height/width aspect override used before the first frame arrives
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ratio: Option<f64>,
    /// Show the "drag to spin" hint while idle (default: true)
    #[serde(default = "default_true")]
    pub hint: bool,
    /// Distance of the hint from the bottom edge in pixels (default: 5)
    #[serde(default = "default_hint_offset")]
    pub hint_offset: f64,
    /// Hide the 360 badge shown from the first frame until interaction
    #[serde(default)]
    pub hide_logo: bool,
    /// Image shown in the badge once loaded, built-in mark when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_src: Option<String>,
    /// CSS `box-shadow` drawn over the normal view, e.g. `inset 0 0 100px #222`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub box_shadow: Option<String>,
}

/// Responsive image CDN settings.
///
/// Values are forwarded verbatim into
/// `https://{token}.{host}/{operation}/{size}/{filters}/{original}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponsiveConfig {
    pub token: String,
    /// Fixed size; derived from the container width when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default = "default_cdn_operation")]
    pub operation: String,
    #[serde(default = "default_cdn_filters")]
    pub filters: String,
    #[serde(default = "default_cdn_host")]
    pub host: String,
}

/// Calibration of the drag speed factor.
///
/// `factor = drag_speed / reference_speed * reference_frames / divisions
///           * gain * extent / reference_width`, floored at 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragCalibration {
    #[serde(default = "default_drag_speed")]
    pub reference_speed: f64,
    #[serde(default = "default_reference_frames")]
    pub reference_frames: f64,
    #[serde(default = "default_gain")]
    pub gain: f64,
    #[serde(default = "default_reference_width")]
    pub reference_width: f64,
}

fn default_one() -> u32 {
    1
}
fn default_true() -> bool {
    true
}
fn default_filename() -> String {
    DEFAULT_FILENAME.to_string()
}
fn default_drag_speed() -> f64 {
    DEFAULT_DRAG_SPEED
}
fn default_speed() -> f64 {
    DEFAULT_SPEED
}
fn default_cdn_operation() -> String {
    DEFAULT_CDN_OPERATION.to_string()
}
fn default_cdn_filters() -> String {
    DEFAULT_CDN_FILTERS.to_string()
}
fn default_cdn_host() -> String {
    DEFAULT_CDN_HOST.to_string()
}
fn default_reference_frames() -> f64 {
    REFERENCE_FRAMES
}
fn default_gain() -> f64 {
    25.0
}
fn default_reference_width() -> f64 {
    1500.0
}
fn default_hint_offset() -> f64 {
    DEFAULT_HINT_OFFSET
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            rows: default_one(),
            cols: None,
            amount: None,
            start_row: default_one(),
            start_col: default_one(),
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            folder: String::new(),
            filename: default_filename(),
            image_list: None,
            index_zero_base: 0,
            lazyload: false,
        }
    }
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            draggable: true,
            swipeable: true,
            keys: false,
            drag_speed: default_drag_speed(),
            spin_reverse: false,
            control_reverse: false,
            stop_at_edges_x: false,
            stop_at_edges_y: false,
            key_mapping: KeyboardMapping::default(),
        }
    }
}

impl Default for AutoplayConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            speed: default_speed(),
            reverse: false,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            full_screen: false,
            magnifier: None,
            ratio: None,
            hint: true,
            hint_offset: DEFAULT_HINT_OFFSET,
            hide_logo: false,
            logo_src: None,
            box_shadow: None,
        }
    }
}

impl Default for DragCalibration {
    fn default() -> Self {
        Self {
            reference_speed: default_drag_speed(),
            reference_frames: default_reference_frames(),
            gain: default_gain(),
            reference_width: default_reference_width(),
        }
    }
}

/// What the host page looks like when a viewer is created.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HostEnv {
    /// Container size in logical pixels
    pub container: Size,
    /// Device pixel ratio
    pub pixel_ratio: f64,
    /// Touch is the primary input (suppresses autoplay and the magnifier)
    pub touch_primary: bool,
}

impl Default for HostEnv {
    fn default() -> Self {
        Self {
            container: Size::new(800.0, 600.0),
            pixel_ratio: 1.0,
            touch_primary: false,
        }
    }
}

/// Validated, immutable configuration of one viewer instance.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub grid: Grid,
    pub start_row: u32,
    pub start_col: u32,
    pub column_policy: EdgePolicy,
    pub row_policy: EdgePolicy,
    pub spin_reverse: bool,
    pub control_reverse: bool,
    pub drag_speed: f64,
    pub drag: DragCalibration,
    pub draggable: bool,
    pub swipeable: bool,
    pub keys: bool,
    pub key_mapping: KeyboardMapping,
    pub autoplay: bool,
    pub autoplay_reverse: bool,
    pub autoplay_period: Duration,
    pub full_screen: bool,
    pub magnifier: Option<f64>,
    pub ratio: Option<f64>,
    pub hint: bool,
    pub hint_offset: f64,
    /// Show the 360 badge
    pub logo: bool,
    pub logo_src: Option<String>,
    /// Cleared in full-screen views
    pub box_shadow: Option<String>,
    pub source: SourceConfig,
    pub responsive: Option<ResponsiveConfig>,
}

impl ResolvedConfig {
    /// Total frame count (`rows * cols`).
    pub fn amount(&self) -> u32 {
        self.grid.amount()
    }
}

impl ViewerConfig {
    /// Parse a config from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Validate this config against a host and derive the values the viewer
    /// runs with.
    pub fn resolve(&self, host: &HostEnv) -> Result<ResolvedConfig, ConfigError> {
        let rows = self.grid.rows;
        let cols = match (self.grid.cols, self.grid.amount) {
            (Some(cols), _) => cols,
            (None, Some(amount)) if rows > 0 => amount / rows,
            (None, _) => DEFAULT_AMOUNT,
        };

        if rows == 0 || cols == 0 {
            return Err(ConfigError::EmptyGrid { rows, cols });
        }
        let total = rows
            .checked_mul(cols)
            .filter(|total| *total <= MAX_FRAMES)
            .ok_or(ConfigError::GridTooLarge {
                rows,
                cols,
                max: MAX_FRAMES,
            })?;
        if let Some(amount) = self.grid.amount
            && amount != total
        {
            return Err(ConfigError::AmountMismatch { amount, rows, cols });
        }

        let drag_speed = self.controls.drag_speed;
        if !(drag_speed.is_finite() && drag_speed > 0.0) {
            return Err(ConfigError::InvalidDragSpeed(drag_speed));
        }
        let speed = self.autoplay.speed;
        if !(speed.is_finite() && speed > 0.0) {
            return Err(ConfigError::InvalidSpeed(speed));
        }
        if self.source.index_zero_base > MAX_INDEX_ZERO_BASE {
            return Err(ConfigError::IndexZeroBase {
                got: self.source.index_zero_base,
                max: MAX_INDEX_ZERO_BASE,
            });
        }
        if let Some(ratio) = self.display.ratio
            && !(ratio.is_finite() && ratio > 0.0)
        {
            return Err(ConfigError::InvalidRatio(ratio));
        }
        if let Some(zoom) = self.display.magnifier
            && !(zoom.is_finite() && zoom > 0.0)
        {
            return Err(ConfigError::InvalidMagnifier(zoom));
        }
        let hint_offset = self.display.hint_offset;
        if !(hint_offset.is_finite() && hint_offset >= 0.0) {
            return Err(ConfigError::InvalidHintOffset(hint_offset));
        }

        let grid = Grid::new(rows, cols);
        let autoplay_period = autoplay_period(speed, grid.amount());

        if self.autoplay.enabled && host.touch_primary {
            tracing::debug!("Autoplay suppressed on touch-primary host");
        }

        Ok(ResolvedConfig {
            grid,
            start_row: self.grid.start_row.clamp(1, rows),
            start_col: self.grid.start_col.clamp(1, cols),
            column_policy: EdgePolicy::from_stop_at_edges(self.controls.stop_at_edges_x),
            row_policy: EdgePolicy::from_stop_at_edges(self.controls.stop_at_edges_y),
            spin_reverse: self.controls.spin_reverse,
            control_reverse: self.controls.control_reverse,
            drag_speed,
            drag: self.drag,
            draggable: self.controls.draggable,
            swipeable: self.controls.swipeable,
            keys: self.controls.keys,
            key_mapping: self.controls.key_mapping.clone(),
            autoplay: self.autoplay.enabled && !host.touch_primary,
            autoplay_reverse: self.autoplay.reverse,
            autoplay_period,
            full_screen: self.display.full_screen,
            magnifier: self.display.magnifier.filter(|_| !host.touch_primary),
            ratio: self.display.ratio,
            hint: self.display.hint,
            hint_offset,
            logo: !self.display.hide_logo,
            logo_src: self.display.logo_src.clone(),
            box_shadow: self.display.box_shadow.clone(),
            source: self.source.clone(),
            responsive: self.responsive.clone(),
        })
    }
}

/// Autoplay tick period: `speed * 36 / amount` milliseconds.
pub fn autoplay_period(speed: f64, amount: u32) -> Duration {
    let millis = speed * REFERENCE_FRAMES / amount.max(1) as f64;
    Duration::from_micros((millis * 1000.0).round() as u64)
}

/// Returns the platform-specific configuration directory.
///
/// On Windows: `%APPDATA%\spin360\config`
/// On macOS: `~/Library/Application Support/io.spin360.spin360`
/// On Linux: `~/.config/spin360`
///
/// Returns `None` if the home directory cannot be determined.
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("io.spin360", "", "spin360")
        .map(|dirs| dirs.config_dir().to_path_buf())
}

/// Path of `viewer.toml` in the platform configuration directory.
pub fn default_config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("viewer.toml"))
}

/// Loads a viewer config from a TOML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid TOML.
pub fn load(path: &Path) -> Result<ViewerConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    ViewerConfig::from_toml_str(&content)
}

/// Loads `viewer.toml` from the platform configuration directory.
///
/// Returns default values if the file doesn't exist or cannot be parsed.
pub fn load_default() -> ViewerConfig {
    let Some(path) = default_config_path() else {
        return ViewerConfig::default();
    };
    if !path.exists() {
        return ViewerConfig::default();
    }

    match load(&path) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("Ignoring {}: {}", path.display(), e);
            ViewerConfig::default()
        }
    }
}
