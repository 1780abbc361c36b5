//! Centralized constants used across the application.
//!
//! Sizes that depend on the loaded model are expressed as divisors of the
//! model's average bounding-box dimension so that icons, markers and labels
//! keep the same visual weight regardless of model scale.

/// Default window width in pixels
pub const DEFAULT_WINDOW_WIDTH: f32 = 1600.0;

/// Default window height in pixels
pub const DEFAULT_WINDOW_HEIGHT: f32 = 900.0;

/// Maximum number of annotations that can be placed on a model
pub const MAX_ANNOTATIONS: usize = 10;

/// Surface offset for placed annotations, as a fraction of the average model dimension
pub const SURFACE_OFFSET_FACTOR: f32 = 0.04;

/// Scale multiplier applied to an annotation icon while hovered
pub const ICON_HOVER_SCALE: f32 = 1.3;

/// Annotation icon size = average model dimension / this
pub const ICON_SCALE_DIVISOR: f32 = 30.0;

/// Annotation text panel sits this far below its icon (average dimension / this)
pub const TEXT_PANEL_DROP_DIVISOR: f32 = 20.0;

/// Measurement end markers are the model bounding box / this on each axis
pub const MEASURE_MARKER_DIVISOR: f32 = 90.0;

/// How long warnings stay on screen before auto-dismissing
pub const WARNING_DURATION_SECS: f32 = 5.0;

/// Two clicks closer together than this count as a double click
pub const DOUBLE_CLICK_WINDOW_SECS: f32 = 0.3;

/// Stable id of the "too many annotations" warning (used for deduplication)
pub const CAPACITY_WARNING_ID: &str = "annotation-capacity";

/// Id of the notice shown when a new model discards existing work
pub const MODEL_REPLACED_NOTICE_ID: &str = "model-replaced";

/// Smallest segment length worth drawing as a line
pub const MIN_DRAWN_SEGMENT_LENGTH: f32 = 1e-4;
