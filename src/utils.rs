//! Utility functions for coordinate conversion.

pub mod safe_cast;

use crate::Result;
use safe_cast::f64_to_i32;

/// Convert a normalized coordinate to a pixel index along an axis of `extent` pixels
///
/// Truncates toward zero, so values slightly outside `[0, 1]` land just outside the frame
/// instead of being clamped.
///
/// # Errors
///
/// Returns an error if the scaled value is not finite or does not fit in i32
pub fn normalized_to_pixel(value: f32, extent: u32) -> Result<i32> {
    f64_to_i32(f64::from(value) * f64::from(extent))
}
