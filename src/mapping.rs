//! Pixel to domain coordinate mapping.
//!
//! Captured strokes are stored in the coordinate space of the reference
//! annotation. Each axis is an independent affine map from `[0, extent]`
//! pixels onto `[min, max]` domain units. The bounds are calibration data
//! and come from configuration.

use crate::{
    constants::{DEFAULT_DOMAIN_X, DEFAULT_DOMAIN_Y, DEFAULT_FRAME_HEIGHT, DEFAULT_FRAME_WIDTH},
    stroke::Point,
    Error, Result,
};
use serde::{Deserialize, Serialize};

/// Domain bounds for both axes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DomainBounds {
    /// Domain x at pixel column 0
    pub x_min: f64,
    /// Domain x at pixel column `width`
    pub x_max: f64,
    /// Domain y at pixel row 0
    pub y_min: f64,
    /// Domain y at pixel row `height`
    pub y_max: f64,
}

impl Default for DomainBounds {
    fn default() -> Self {
        Self {
            x_min: DEFAULT_DOMAIN_X.0,
            x_max: DEFAULT_DOMAIN_X.1,
            y_min: DEFAULT_DOMAIN_Y.0,
            y_max: DEFAULT_DOMAIN_Y.1,
        }
    }
}

impl DomainBounds {
    /// Check that both axes span a finite, non-empty range
    ///
    /// # Errors
    ///
    /// Returns an error if any bound is not finite or an axis is degenerate
    pub fn validate(&self) -> Result<()> {
        let bounds = [self.x_min, self.x_max, self.y_min, self.y_max];
        if bounds.iter().any(|b| !b.is_finite()) {
            return Err(Error::ConfigError("Domain bounds must be finite".to_string()));
        }
        if self.x_min == self.x_max || self.y_min == self.y_max {
            return Err(Error::ConfigError(
                "Domain bounds must span a non-empty range on both axes".to_string(),
            ));
        }
        Ok(())
    }
}

/// Stateless pixel to domain transform for a fixed frame size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    width: f64,
    height: f64,
    bounds: DomainBounds,
}

impl Default for CoordinateMapper {
    fn default() -> Self {
        Self {
            width: f64::from(DEFAULT_FRAME_WIDTH),
            height: f64::from(DEFAULT_FRAME_HEIGHT),
            bounds: DomainBounds::default(),
        }
    }
}

impl CoordinateMapper {
    /// Create a mapper for `width` x `height` frames
    ///
    /// # Errors
    ///
    /// Returns an error if a frame dimension is zero or the bounds are invalid
    pub fn new(width: u32, height: u32, bounds: DomainBounds) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidInput(format!(
                "Frame dimensions must be non-zero, got {width}x{height}"
            )));
        }
        bounds.validate()?;

        Ok(Self {
            width: f64::from(width),
            height: f64::from(height),
            bounds,
        })
    }

    /// Bounds in use
    #[must_use]
    pub const fn bounds(&self) -> DomainBounds {
        self.bounds
    }

    /// Map a pixel position into domain space
    #[must_use]
    pub fn map(&self, x: i32, y: i32) -> Point {
        let b = &self.bounds;
        Point {
            x: b.x_min + (f64::from(x) / self.width) * (b.x_max - b.x_min),
            y: b.y_min + (f64::from(y) / self.height) * (b.y_max - b.y_min),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_mapping_corners() {
        let mapper = CoordinateMapper::default();

        let origin = mapper.map(0, 0);
        assert!((origin.x - 0.8).abs() < 1e-12);
        assert!((origin.y - 6.4).abs() < 1e-12);

        let far = mapper.map(640, 480);
        assert!((far.x - 1.8).abs() < 1e-12);
        assert!((far.y - 6.8).abs() < 1e-12);
    }

    #[test]
    fn test_mapping_midpoint() {
        let mapper = CoordinateMapper::new(
            200,
            100,
            DomainBounds {
                x_min: -1.0,
                x_max: 1.0,
                y_min: 10.0,
                y_max: 0.0,
            },
        )
        .unwrap();

        let p = mapper.map(100, 25);
        assert!((p.x - 0.0).abs() < 1e-12);
        assert!((p.y - 7.5).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_mapper() {
        assert!(CoordinateMapper::new(0, 480, DomainBounds::default()).is_err());

        let degenerate = DomainBounds {
            x_min: 1.0,
            x_max: 1.0,
            ..DomainBounds::default()
        };
        assert!(CoordinateMapper::new(640, 480, degenerate).is_err());

        let infinite = DomainBounds {
            y_max: f64::INFINITY,
            ..DomainBounds::default()
        };
        assert!(infinite.validate().is_err());
    }
}
