//! Constants used throughout the application

/// Number of landmarks reported for one hand
pub const NUM_HAND_LANDMARKS: usize = 21;

/// Landmark indices used by the gesture classifier and the tracker
pub const WRIST: usize = 0;
pub const THUMB_MCP: usize = 2;
pub const THUMB_TIP: usize = 4;
pub const INDEX_PIP: usize = 6;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_TIP: usize = 12;
pub const RING_PIP: usize = 14;
pub const RING_TIP: usize = 16;
pub const PINKY_PIP: usize = 18;
pub const PINKY_TIP: usize = 20;

/// Tip/joint pairs compared per finger, thumb first
pub const FINGER_TIP_JOINTS: [(usize, usize); 5] = [
    (THUMB_TIP, THUMB_MCP),
    (INDEX_TIP, INDEX_PIP),
    (MIDDLE_TIP, MIDDLE_PIP),
    (RING_TIP, RING_PIP),
    (PINKY_TIP, PINKY_PIP),
];

/// Landmark whose position becomes the pen
pub const TRACKING_LANDMARK: usize = INDEX_TIP;

/// Vertical clearance a fingertip needs above its joint (normalized height)
pub const DEFAULT_FINGER_MARGIN: f32 = 0.05;

/// Horizontal distance the thumb tip needs from the wrist (normalized width)
pub const DEFAULT_THUMB_MARGIN: f32 = 0.15;

/// Finger counts that act as commands
pub const PAUSE_FINGER_COUNT: u8 = 2;
pub const CLEAR_FINGER_COUNT: u8 = 5;

/// Minimum seconds between accepted clear gestures
pub const DEFAULT_CLEAR_COOLDOWN_SECS: f64 = 1.0;

/// Scheduler interval between ticks
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 10;

/// Default input frame size
pub const DEFAULT_FRAME_WIDTH: u32 = 640;
pub const DEFAULT_FRAME_HEIGHT: u32 = 480;

/// Default domain bounds matching the reference annotation layout
pub const DEFAULT_DOMAIN_X: (f64, f64) = (0.8, 1.8);
pub const DEFAULT_DOMAIN_Y: (f64, f64) = (6.4, 6.8);

/// InkML namespace written on exported documents
pub const INKML_NAMESPACE: &str = "http://www.w3.org/2003/InkML";

/// Annotation types never carried into an exported document
pub const EXCLUDED_ANNOTATION_TYPES: [&str; 2] = ["copyright", "writer"];

/// Annotation type holding the reference formula
pub const TRUTH_ANNOTATION_TYPE: &str = "truth";

/// File extension of trace documents
pub const INKML_EXTENSION: &str = "inkml";

/// Timestamp layout used in exported file names
pub const EXPORT_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Digits after the decimal point for exported coordinates
pub const COORDINATE_PRECISION: usize = 6;
