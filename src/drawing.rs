//! Gesture-driven drawing state machine.
//!
//! One update per frame. The observation for the frame (no hand, or the
//! command derived from the finger count) is looked up in a single
//! transition table that yields the next state and the action applied to
//! the stroke store:
//!
//! | observation          | next state | action                                   |
//! |----------------------|------------|------------------------------------------|
//! | no hand              | `NoHand`   | finalize, forget previous point          |
//! | pause (2 fingers)    | `Paused`   | finalize, remember current               |
//! | clear (5, cooled)    | `Drawing`  | reset store, forget previous point       |
//! | anything else        | `Drawing`  | append if a previous point exists, remember current |
//!
//! A clear gesture that arrives inside the cooldown is treated as drawing.

use crate::{
    constants::{DEFAULT_CLEAR_COOLDOWN_SECS, TRACKING_LANDMARK},
    gesture::{Gesture, GestureClassifier},
    landmarks::{Landmark, LandmarkFrame},
    mapping::CoordinateMapper,
    stroke::StrokeStore,
};
use log::{debug, info};
use std::time::{Duration, Instant};

/// Pen state after a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawingState {
    /// No hand in view
    #[default]
    NoHand,
    /// Pen down, following the index fingertip
    Drawing,
    /// Pen lifted by the pause gesture
    Paused,
}

/// What the frame asked for, after cooldown gating
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// Hand not detected or landmarks unusable
    NoHand,
    /// Pause gesture
    Pause,
    /// Clear gesture outside the cooldown
    Clear,
    /// Any other finger count
    Draw,
}

/// Effect on the stroke store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Finalize the active segment and forget the previous point
    Lift,
    /// Finalize the active segment and remember the current point
    Pause,
    /// Discard all segments and forget the previous point
    Clear,
    /// Extend the active segment from the previous point
    Extend,
}

/// The transition table
#[must_use]
pub const fn transition(signal: Signal) -> (DrawingState, Action) {
    match signal {
        Signal::NoHand => (DrawingState::NoHand, Action::Lift),
        Signal::Pause => (DrawingState::Paused, Action::Pause),
        Signal::Clear => (DrawingState::Drawing, Action::Clear),
        Signal::Draw => (DrawingState::Drawing, Action::Extend),
    }
}

/// Minimum spacing between accepted clear gestures
#[derive(Debug, Clone, Copy)]
pub struct ClearCooldown {
    interval: Duration,
    last_clear: Option<Instant>,
}

impl Default for ClearCooldown {
    fn default() -> Self {
        Self::new(Duration::from_secs_f64(DEFAULT_CLEAR_COOLDOWN_SECS))
    }
}

impl ClearCooldown {
    /// Cooldown that has never fired
    #[must_use]
    pub const fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_clear: None,
        }
    }

    /// Whether a clear at `now` would be accepted
    #[must_use]
    pub fn is_ready(&self, now: Instant) -> bool {
        self.last_clear
            .map_or(true, |last| now.saturating_duration_since(last) > self.interval)
    }

    /// Record an accepted clear
    pub fn record(&mut self, now: Instant) {
        self.last_clear = Some(now);
    }

    /// Configured interval
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }
}

/// Result of one state machine update
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickOutcome {
    /// Extended fingers, when a usable hand was seen
    pub finger_count: Option<u8>,
    /// State after the update
    pub state: DrawingState,
    /// Action applied
    pub action: Action,
    /// Pixel position of the tracking fingertip
    pub pen: Option<(i32, i32)>,
    /// Pixel line drawn this frame, from the previous to the current point
    pub ink: Option<((i32, i32), (i32, i32))>,
}

/// Owns the capture session and turns frames into strokes
#[derive(Debug, Clone)]
pub struct DrawingStateMachine {
    classifier: GestureClassifier,
    mapper: CoordinateMapper,
    frame_size: (u32, u32),
    store: StrokeStore,
    state: DrawingState,
    previous_pixel: Option<(i32, i32)>,
    cooldown: ClearCooldown,
}

impl DrawingStateMachine {
    /// Create a machine for `frame_size` frames
    #[must_use]
    pub fn new(
        classifier: GestureClassifier,
        mapper: CoordinateMapper,
        frame_size: (u32, u32),
        cooldown: ClearCooldown,
    ) -> Self {
        Self {
            classifier,
            mapper,
            frame_size,
            store: StrokeStore::new(),
            state: DrawingState::NoHand,
            previous_pixel: None,
            cooldown,
        }
    }

    /// Current pen state
    #[must_use]
    pub const fn state(&self) -> DrawingState {
        self.state
    }

    /// Captured strokes
    #[must_use]
    pub const fn store(&self) -> &StrokeStore {
        &self.store
    }

    /// Pixel position remembered from the last drawing frame
    #[must_use]
    pub const fn previous_pixel(&self) -> Option<(i32, i32)> {
        self.previous_pixel
    }

    /// Update from landmarks that have not been validated yet
    ///
    /// Malformed landmark sets count as no hand for this frame.
    pub fn update_raw(&mut self, hand: Option<&[Landmark]>, now: Instant) -> TickOutcome {
        let frame = hand.and_then(|points| match LandmarkFrame::new(points) {
            Ok(frame) => Some(frame),
            Err(e) => {
                debug!("Treating frame as no hand: {e}");
                None
            }
        });
        self.update(frame.as_ref(), now)
    }

    /// Update from one frame observed at `now`
    pub fn update(&mut self, hand: Option<&LandmarkFrame>, now: Instant) -> TickOutcome {
        let observed = hand.and_then(|frame| {
            let (width, height) = self.frame_size;
            match frame.pixel(TRACKING_LANDMARK, width, height) {
                Ok(pen) => Some((self.classifier.classify(frame), pen)),
                Err(e) => {
                    debug!("Treating frame as no hand: {e}");
                    None
                }
            }
        });

        let signal = match observed {
            None => Signal::NoHand,
            Some(((_, Gesture::Pause), _)) => Signal::Pause,
            Some(((_, Gesture::Clear), _)) if self.cooldown.is_ready(now) => Signal::Clear,
            Some(_) => Signal::Draw,
        };

        let (state, action) = transition(signal);
        if state != self.state {
            debug!("Drawing state {:?} -> {:?}", self.state, state);
        }
        self.state = state;

        let pen = observed.map(|(_, pen)| pen);
        let ink = match action {
            Action::Lift => {
                self.store.finalize();
                self.previous_pixel = None;
                None
            }
            Action::Pause => {
                self.store.finalize();
                self.previous_pixel = pen;
                None
            }
            Action::Clear => {
                info!("Clear gesture accepted, discarding {} points", self.store.point_count());
                self.store.reset();
                self.previous_pixel = None;
                self.cooldown.record(now);
                None
            }
            Action::Extend => pen.and_then(|current| self.extend(current)),
        };

        TickOutcome {
            finger_count: observed.map(|((count, _), _)| count),
            state,
            action,
            pen,
            ink,
        }
    }

    fn extend(&mut self, current: (i32, i32)) -> Option<((i32, i32), (i32, i32))> {
        let ink = self.previous_pixel.map(|previous| {
            self.store.push_point(self.mapper.map(current.0, current.1));
            (previous, current)
        });
        self.previous_pixel = Some(current);
        ink
    }
}
