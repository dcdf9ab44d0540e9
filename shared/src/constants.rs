//! Centralized constants for the spin360 viewer.
//!
//! Single source of truth for defaults shared by the core and its hosts.

/// Placeholder replaced by the zero-padded frame index in filename templates.
pub const INDEX_PLACEHOLDER: &str = "{index}";

/// Default filename template when none is configured.
pub const DEFAULT_FILENAME: &str = "image-{index}.jpg";

/// Default number of frames in a single-row sequence.
pub const DEFAULT_AMOUNT: u32 = 36;

/// Default autoplay speed base. The tick period is `speed * 36 / amount` ms.
pub const DEFAULT_SPEED: f64 = 80.0;

/// Default drag speed. Higher values need more pointer travel per frame.
pub const DEFAULT_DRAG_SPEED: f64 = 150.0;

/// Reference frame count the autoplay period and drag calibration are
/// expressed against (one full turn of a 36-frame sequence).
pub const REFERENCE_FRAMES: f64 = 36.0;

/// Responsive widths are quantized up to multiples of this many pixels.
pub const RESPONSIVE_WIDTH_STEP: u32 = 100;

/// Default responsive image CDN host.
pub const DEFAULT_CDN_HOST: &str = "cloudimg.io";

/// Default responsive image operation.
pub const DEFAULT_CDN_OPERATION: &str = "width";

/// Default responsive image filters.
pub const DEFAULT_CDN_FILTERS: &str = "q35";

/// Default magnifier zoom factor when enabled without an explicit factor.
pub const DEFAULT_MAGNIFIER_ZOOM: f64 = 3.0;

/// DOM key code for the left arrow key.
pub const KEY_CODE_ARROW_LEFT: u32 = 37;

/// DOM key code for the right arrow key.
pub const KEY_CODE_ARROW_RIGHT: u32 = 39;

/// Widest zero padding accepted for templated filenames.
pub const MAX_INDEX_ZERO_BASE: u32 = 12;

/// Largest frame grid (`rows * cols`) a viewer accepts.
pub const MAX_FRAMES: u32 = 65_536;

/// Default gap between the hint and the bottom edge, in pixels.
pub const DEFAULT_HINT_OFFSET: f64 = 5.0;
