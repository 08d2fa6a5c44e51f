//! Hand trackers feeding the drawing loop.
//!
//! A tracker combines frame acquisition and landmark inference. Each poll
//! either yields at most one hand, reports that the source is exhausted, or
//! fails; a failure means the current tick is skipped.

use crate::{landmarks::Landmark, Error, Result};
use log::info;
use std::{collections::VecDeque, path::Path};

/// Result of polling a tracker once
#[derive(Debug, Clone, PartialEq)]
pub enum TrackerPoll {
    /// A hand was detected; landmarks are not validated yet
    Hand(Vec<Landmark>),
    /// The frame contained no hand
    NoHand,
    /// The source has no more frames
    Finished,
}

/// Source of per-frame hand landmarks
pub trait HandTracker {
    /// Acquire the next frame and run inference on it
    ///
    /// # Errors
    ///
    /// Returns an error if no frame could be acquired this tick
    fn poll(&mut self) -> Result<TrackerPoll>;
}

/// Plays back recorded landmark frames
///
/// The recording is a YAML list; each entry is `null` for a frame without a
/// hand, or a list of `[x, y, z]` triples.
#[derive(Debug, Clone, Default)]
pub struct ReplayTracker {
    frames: VecDeque<Option<Vec<Landmark>>>,
}

impl ReplayTracker {
    /// Tracker over in-memory frames
    #[must_use]
    pub fn new(frames: Vec<Option<Vec<Landmark>>>) -> Self {
        Self { frames: frames.into() }
    }

    /// Parse a recording from YAML text
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a list of frames
    pub fn from_yaml(text: &str) -> Result<Self> {
        let recorded: Vec<Option<Vec<Vec<f32>>>> = serde_yaml::from_str(text)
            .map_err(|e| Error::InvalidInput(format!("Failed to parse landmark recording: {e}")))?;

        let frames = recorded
            .into_iter()
            .enumerate()
            .map(|(index, frame)| {
                frame
                    .map(|points| points.iter().map(|p| recorded_point(index, p)).collect::<Result<Vec<_>>>())
                    .transpose()
            })
            .collect::<Result<_>>()?;
        Ok(Self { frames })
    }

    /// Load a recording from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        info!("Loading landmark recording: {}", path.as_ref().display());
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml(&text)
    }

    /// Frames not yet played
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

fn recorded_point(frame: usize, values: &[f32]) -> Result<Landmark> {
    match *values {
        [x, y] => Ok(Landmark::new(x, y, 0.0)),
        [x, y, z] => Ok(Landmark::new(x, y, z)),
        _ => Err(Error::InvalidInput(format!(
            "frame {frame}: landmark needs 2 or 3 values, got {}",
            values.len()
        ))),
    }
}

impl HandTracker for ReplayTracker {
    fn poll(&mut self) -> Result<TrackerPoll> {
        Ok(match self.frames.pop_front() {
            Some(Some(points)) => TrackerPoll::Hand(points),
            Some(None) => TrackerPoll::NoHand,
            None => TrackerPoll::Finished,
        })
    }
}
