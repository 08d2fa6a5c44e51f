//! Air drawing library: hand gestures in, ink trace documents out.
//!
//! A hand-pose provider reports 21 landmarks per frame. From them the
//! pipeline:
//! 1. Counts extended fingers to get a command (draw, pause with two
//!    fingers, clear with five)
//! 2. Runs the drawing state machine, which segments strokes and follows
//!    the index fingertip
//! 3. Maps fingertip pixels into the coordinate space of a reference
//!    annotation
//! 4. Exports the strokes as an InkML document that keeps the reference's
//!    metadata
//!
//! # Examples
//!
//! ## Driving the state machine
//!
//! ```
//! use air_ink::{config::Config, landmarks::Landmark};
//! use std::time::Instant;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut machine = Config::default().create_state_machine()?;
//!
//! // A relaxed hand with all fingertips level with their joints
//! let hand = vec![Landmark::new(0.5, 0.5, 0.0); 21];
//! let outcome = machine.update_raw(Some(&hand), Instant::now());
//! assert_eq!(outcome.finger_count, Some(0));
//!
//! // The first frame only seeds the pen position
//! assert!(machine.store().active().is_empty());
//! # Ok(())
//! # }
//! ```
//!
//! ## Exporting strokes
//!
//! ```no_run
//! use air_ink::{export::Exporter, inkml::SourceDocument, stroke::StrokeStore};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let source = SourceDocument::load("data/formula.inkml")?;
//! let store = StrokeStore::new();
//! let path = Exporter::new("air_data").export(&store, &source, &chrono::Local::now())?;
//! println!("Saved {}", path.display());
//! # Ok(())
//! # }
//! ```

/// Gesture classification from landmark geometry
pub mod gesture;

/// Hand landmark types
pub mod landmarks;

/// Pixel to domain coordinate mapping
pub mod mapping;

/// Stroke storage for a capture session
pub mod stroke;

/// Drawing state machine
pub mod drawing;

/// Ink markup reading and writing
pub mod inkml;

/// Writing sessions to the output directory
pub mod export;

/// Reference document navigation
pub mod catalog;

/// Hand trackers that feed the drawing loop
pub mod tracker;

/// Main application module
pub mod app;

/// Utility functions for coordinate conversion
pub mod utils;

/// Error types and result handling
pub mod error;

/// Constants used throughout the application
pub mod constants;

/// Configuration management
pub mod config;

/// Hand landmark detection with `ONNX` Runtime
#[cfg(feature = "vision")]
pub mod hand_detection;

/// Camera tracker and `highgui` front end
#[cfg(feature = "vision")]
pub mod display;

pub use error::{Error, Result};
