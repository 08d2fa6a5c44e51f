//! Configuration management for the air drawing application

use crate::{
    constants::{
        DEFAULT_CLEAR_COOLDOWN_SECS, DEFAULT_FINGER_MARGIN, DEFAULT_FRAME_HEIGHT, DEFAULT_FRAME_WIDTH,
        DEFAULT_THUMB_MARGIN, DEFAULT_TICK_INTERVAL_MS,
    },
    drawing::{ClearCooldown, DrawingStateMachine},
    gesture::{GestureClassifier, GestureThresholds},
    mapping::{CoordinateMapper, DomainBounds},
    Error, Result,
};
use serde::{Deserialize, Serialize};
use std::{
    path::{Path, PathBuf},
    time::Duration,
};

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Camera and frame configuration
    pub capture: CaptureConfig,

    /// Gesture classification margins
    pub gesture: GestureConfig,

    /// Drawing loop timing
    pub drawing: DrawingConfig,

    /// Pixel to domain mapping bounds
    pub mapping: DomainBounds,

    /// Input and output locations
    pub paths: PathsConfig,

    /// Hand landmark model configuration
    pub detection: DetectionConfig,
}

/// Camera and frame parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Camera index
    pub camera_index: i32,

    /// Frame width in pixels
    pub frame_width: u32,

    /// Frame height in pixels
    pub frame_height: u32,

    /// Mirror frames horizontally before inference
    pub mirror: bool,
}

/// Gesture classifier margins
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Clearance a fingertip needs above its joint (normalized height)
    pub finger_margin: f32,

    /// Horizontal thumb to wrist distance (normalized width)
    pub thumb_margin: f32,
}

/// Drawing loop configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawingConfig {
    /// Minimum seconds between accepted clear gestures
    pub clear_cooldown_secs: f64,

    /// Interval between ticks in milliseconds
    pub tick_interval_ms: u64,
}

/// Directory configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory holding reference documents
    pub data_dir: PathBuf,

    /// Directory exports are written to
    pub output_dir: PathBuf,
}

/// Hand landmark detection parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Path to the hand landmark ONNX model
    pub model: PathBuf,

    /// Minimum hand presence score (0.0-1.0)
    pub presence_threshold: f32,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            camera_index: 0,
            frame_width: DEFAULT_FRAME_WIDTH,
            frame_height: DEFAULT_FRAME_HEIGHT,
            mirror: true,
        }
    }
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            finger_margin: DEFAULT_FINGER_MARGIN,
            thumb_margin: DEFAULT_THUMB_MARGIN,
        }
    }
}

impl Default for DrawingConfig {
    fn default() -> Self {
        Self {
            clear_cooldown_secs: DEFAULT_CLEAR_COOLDOWN_SECS,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            output_dir: PathBuf::from("air_data"),
        }
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            model: PathBuf::from("assets/hand_landmark.onnx"),
            presence_threshold: 0.5,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;

        serde_yaml::from_str(&content).map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to a YAML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)?;

        Ok(())
    }

    /// Interval between ticks
    #[must_use]
    pub const fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.drawing.tick_interval_ms)
    }

    /// Minimum time between accepted clear gestures
    ///
    /// # Errors
    ///
    /// Returns an error if the value is negative, not finite or too large for a `Duration`
    pub fn clear_cooldown(&self) -> Result<Duration> {
        Duration::try_from_secs_f64(self.drawing.clear_cooldown_secs).map_err(|e| {
            Error::ConfigError(format!(
                "Clear cooldown must be 0 or more seconds, got {}: {e}",
                self.drawing.clear_cooldown_secs
            ))
        })
    }

    /// Build the drawing state machine described by this configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid
    pub fn create_state_machine(&self) -> Result<DrawingStateMachine> {
        self.validate()?;

        let classifier = GestureClassifier::new(GestureThresholds {
            finger_margin: self.gesture.finger_margin,
            thumb_margin: self.gesture.thumb_margin,
        });
        let mapper = CoordinateMapper::new(self.capture.frame_width, self.capture.frame_height, self.mapping)?;
        let cooldown = ClearCooldown::new(self.clear_cooldown()?);

        Ok(DrawingStateMachine::new(
            classifier,
            mapper,
            (self.capture.frame_width, self.capture.frame_height),
            cooldown,
        ))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        // Validate frame size
        if self.capture.frame_width == 0 || self.capture.frame_height == 0 {
            return Err(Error::ConfigError("Frame width and height must be greater than 0".to_string()));
        }

        // Validate gesture margins
        if !(self.gesture.finger_margin.is_finite() && self.gesture.finger_margin > 0.0) {
            return Err(Error::ConfigError("Finger margin must be greater than 0".to_string()));
        }
        if !(self.gesture.thumb_margin.is_finite() && self.gesture.thumb_margin > 0.0) {
            return Err(Error::ConfigError("Thumb margin must be greater than 0".to_string()));
        }

        // Validate timing
        self.clear_cooldown()?;
        if self.drawing.tick_interval_ms == 0 {
            return Err(Error::ConfigError("Tick interval must be greater than 0".to_string()));
        }

        self.mapping.validate()?;

        if !(0.0..=1.0).contains(&self.detection.presence_threshold) {
            return Err(Error::ConfigError(
                "Presence threshold must be between 0.0 and 1.0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Air drawing configuration

# Camera and frame
capture:
  camera_index: 0
  frame_width: 640
  frame_height: 480
  mirror: true

# Extended-finger margins (normalized frame units)
gesture:
  finger_margin: 0.05
  thumb_margin: 0.15

# Loop timing
drawing:
  clear_cooldown_secs: 1.0
  tick_interval_ms: 10

# Domain bounds of the reference annotation
mapping:
  x_min: 0.8
  x_max: 1.8
  y_min: 6.4
  y_max: 6.8

# Directories
paths:
  data_dir: "data"
  output_dir: "air_data"

# Hand landmark model
detection:
  model: "assets/hand_landmark.onnx"
  presence_threshold: 0.5
"#;
