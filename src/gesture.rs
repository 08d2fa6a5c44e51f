//! Gesture classification from hand landmark geometry.
//!
//! The classifier counts extended fingers. A non-thumb finger is extended
//! when its tip sits above its PIP joint by more than the finger margin.
//! The thumb folds sideways, so it must also be far enough from the wrist
//! horizontally, and its tip must sit above its lower joint.
//! All comparisons are strict: a value exactly at a threshold does not count.

use crate::{
    constants::{
        CLEAR_FINGER_COUNT, DEFAULT_FINGER_MARGIN, DEFAULT_THUMB_MARGIN, FINGER_TIP_JOINTS,
        PAUSE_FINGER_COUNT, THUMB_TIP, WRIST,
    },
    landmarks::LandmarkFrame,
    utils::safe_cast::usize_to_u8,
};

/// Margins used to decide whether a finger is extended
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureThresholds {
    /// Clearance a fingertip needs above its PIP joint (normalized height)
    pub finger_margin: f32,
    /// Horizontal distance the thumb tip needs from the wrist (normalized width)
    pub thumb_margin: f32,
}

impl Default for GestureThresholds {
    fn default() -> Self {
        Self {
            finger_margin: DEFAULT_FINGER_MARGIN,
            thumb_margin: DEFAULT_THUMB_MARGIN,
        }
    }
}

/// Command encoded by a finger count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    /// Keep or start drawing with the index fingertip
    Draw,
    /// Lift the pen
    Pause,
    /// Discard all strokes
    Clear,
}

impl Gesture {
    /// Map an extended-finger count to its command
    #[must_use]
    pub const fn from_count(count: u8) -> Self {
        match count {
            PAUSE_FINGER_COUNT => Self::Pause,
            CLEAR_FINGER_COUNT => Self::Clear,
            _ => Self::Draw,
        }
    }
}

/// Counts extended fingers on a landmark frame
#[derive(Debug, Clone, Copy, Default)]
pub struct GestureClassifier {
    thresholds: GestureThresholds,
}

impl GestureClassifier {
    /// Create a classifier with the given margins
    #[must_use]
    pub const fn new(thresholds: GestureThresholds) -> Self {
        Self { thresholds }
    }

    /// Margins in use
    #[must_use]
    pub const fn thresholds(&self) -> GestureThresholds {
        self.thresholds
    }

    /// Number of extended fingers, 0 through 5
    #[must_use]
    pub fn count_extended(&self, frame: &LandmarkFrame) -> u8 {
        let count = FINGER_TIP_JOINTS
            .iter()
            .filter(|&&(tip, joint)| self.is_extended(frame, tip, joint))
            .count();
        usize_to_u8(count).unwrap_or(CLEAR_FINGER_COUNT)
    }

    /// Count fingers and map the count to a command
    #[must_use]
    pub fn classify(&self, frame: &LandmarkFrame) -> (u8, Gesture) {
        let count = self.count_extended(frame);
        (count, Gesture::from_count(count))
    }

    fn is_extended(&self, frame: &LandmarkFrame, tip: usize, joint: usize) -> bool {
        let tip_point = frame[tip];
        let joint_point = frame[joint];

        if tip == THUMB_TIP {
            let wrist = frame[WRIST];
            (tip_point.x - wrist.x).abs() > self.thresholds.thumb_margin && tip_point.y < joint_point.y
        } else {
            tip_point.y < joint_point.y - self.thresholds.finger_margin
        }
    }
}
