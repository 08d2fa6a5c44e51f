//! Hand landmark types produced by a hand-pose provider.
//!
//! A provider reports up to one hand per frame as 21 points. `x` and `y`
//! are normalized to the frame (0..1, origin top-left); `z` is the
//! provider's relative depth and is carried but unused by the classifier.

use crate::{
    constants::NUM_HAND_LANDMARKS,
    utils::normalized_to_pixel,
    Error, Result,
};
use serde::{Deserialize, Serialize};

/// One normalized 3-D landmark
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    /// Horizontal position, normalized to frame width
    pub x: f32,
    /// Vertical position, normalized to frame height
    pub y: f32,
    /// Relative depth
    pub z: f32,
}

impl Landmark {
    /// Create a landmark
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// A validated set of landmarks for a single detected hand
#[derive(Debug, Clone, PartialEq)]
pub struct LandmarkFrame {
    points: [Landmark; NUM_HAND_LANDMARKS],
}

impl LandmarkFrame {
    /// Build a frame from exactly 21 finite landmarks
    ///
    /// # Errors
    ///
    /// Returns [`Error::Landmark`] if the count is wrong or any coordinate is not finite
    pub fn new(points: &[Landmark]) -> Result<Self> {
        let points: [Landmark; NUM_HAND_LANDMARKS] = points.try_into().map_err(|_| {
            Error::Landmark(format!(
                "expected {NUM_HAND_LANDMARKS} landmarks, got {}",
                points.len()
            ))
        })?;

        if let Some(index) = points.iter().position(|p| !p.is_finite()) {
            return Err(Error::Landmark(format!("landmark {index} has a non-finite coordinate")));
        }

        Ok(Self { points })
    }

    /// Landmark at `index`, if within range
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Landmark> {
        self.points.get(index)
    }

    /// All landmarks in provider order
    #[must_use]
    pub const fn points(&self) -> &[Landmark; NUM_HAND_LANDMARKS] {
        &self.points
    }

    /// Pixel position of landmark `index` in a `width` x `height` frame
    ///
    /// # Errors
    ///
    /// Returns an error if `index` is out of range or the position does not fit in i32
    pub fn pixel(&self, index: usize, width: u32, height: u32) -> Result<(i32, i32)> {
        let point = self
            .get(index)
            .ok_or_else(|| Error::Landmark(format!("landmark index {index} out of range")))?;
        Ok((normalized_to_pixel(point.x, width)?, normalized_to_pixel(point.y, height)?))
    }
}

impl std::ops::Index<usize> for LandmarkFrame {
    type Output = Landmark;

    fn index(&self, index: usize) -> &Self::Output {
        &self.points[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::INDEX_TIP;

    fn flat_hand() -> Vec<Landmark> {
        vec![Landmark::new(0.5, 0.5, 0.0); NUM_HAND_LANDMARKS]
    }

    #[test]
    fn test_frame_requires_21_points() {
        assert!(LandmarkFrame::new(&flat_hand()).is_ok());
        assert!(LandmarkFrame::new(&flat_hand()[..20]).is_err());

        let mut extra = flat_hand();
        extra.push(Landmark::new(0.0, 0.0, 0.0));
        assert!(matches!(LandmarkFrame::new(&extra), Err(Error::Landmark(_))));
    }

    #[test]
    fn test_frame_rejects_non_finite() {
        let mut points = flat_hand();
        points[7].y = f32::NAN;
        let err = LandmarkFrame::new(&points).unwrap_err();
        assert!(err.to_string().contains("landmark 7"));
    }

    #[test]
    fn test_pixel_conversion() {
        let mut points = flat_hand();
        points[INDEX_TIP] = Landmark::new(0.25, 0.75, -0.1);
        let frame = LandmarkFrame::new(&points).unwrap();

        assert_eq!(frame.pixel(INDEX_TIP, 640, 480).unwrap(), (160, 360));
        assert!(frame.pixel(21, 640, 480).is_err());
    }
}
