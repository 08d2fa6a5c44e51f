//! Helper functions and utilities for tests

#![allow(dead_code)]

use air_ink::{
    constants::{
        DEFAULT_FRAME_HEIGHT, DEFAULT_FRAME_WIDTH, INDEX_PIP, INDEX_TIP, MIDDLE_PIP, NUM_HAND_LANDMARKS, PINKY_PIP,
        RING_PIP, THUMB_MCP, THUMB_TIP, WRIST,
    },
    landmarks::Landmark,
};

/// Reference document shaped like the CROHME training files
pub const SAMPLE_SOURCE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ink xmlns="http://www.w3.org/2003/InkML">
  <traceFormat>
    <channel name="X" type="decimal"/>
    <channel name="Y" type="decimal"/>
  </traceFormat>
  <annotation type="truth">$a+b$</annotation>
  <annotation type="UI" lang="en">2011_IVC_DEPT_F01_E01</annotation>
  <annotation type="Copyright">LUNAM/IRCCyN</annotation>
  <annotation type="WRITER">w123</annotation>
  <annotationXML type="truth" encoding="Content-MathML">
    <math xmlns="http://www.w3.org/1998/Math/MathML"><mi>a</mi></math>
  </annotationXML>
  <trace id="0">0.1 0.2, 0.3 0.4</trace>
  <traceGroup xml:id="7">
    <annotation type="truth">Segmentation</annotation>
    <traceView traceDataRef="0"/>
  </traceGroup>
</ink>"#;

/// Normalized coordinate at the center of pixel `px` on an axis of `extent` pixels
///
/// Centering keeps truncation back to `px` exact despite f32 rounding.
pub fn pixel_center(px: i32, extent: u32) -> f32 {
    ((f64::from(px) + 0.5) / f64::from(extent)) as f32
}

/// A hand with `fingers` extended and the index fingertip at pixel `tip`
///
/// Fingers extend in the order index, middle, ring, pinky, thumb, so any
/// non-zero count includes the index finger.
pub fn hand_with_fingers(fingers: u8, tip: (i32, i32)) -> Vec<Landmark> {
    let mut points = vec![Landmark::new(0.5, 0.5, 0.0); NUM_HAND_LANDMARKS];

    let tip_x = pixel_center(tip.0, DEFAULT_FRAME_WIDTH);
    let tip_y = pixel_center(tip.1, DEFAULT_FRAME_HEIGHT);
    points[INDEX_TIP] = Landmark::new(tip_x, tip_y, 0.0);
    points[INDEX_PIP] = Landmark::new(tip_x, if fingers >= 1 { tip_y + 0.3 } else { tip_y }, 0.0);

    // Remaining fingertips stay at the palm center; a low PIP joint extends them
    for (order, pip) in [MIDDLE_PIP, RING_PIP, PINKY_PIP].into_iter().enumerate() {
        let extended = usize::from(fingers) > order + 1;
        points[pip] = Landmark::new(0.5, if extended { 0.9 } else { 0.5 }, 0.0);
    }

    points[WRIST] = Landmark::new(0.5, 0.95, 0.0);
    points[THUMB_MCP] = Landmark::new(0.6, 0.9, 0.0);
    points[THUMB_TIP] = if fingers >= 5 {
        Landmark::new(0.8, 0.5, 0.0)
    } else {
        Landmark::new(0.5, 0.5, 0.0)
    };

    points
}

/// Hands for a sequence of `(finger count, index tip pixel)` frames
pub fn hand_sequence(frames: &[(u8, (i32, i32))]) -> Vec<Option<Vec<Landmark>>> {
    frames
        .iter()
        .map(|&(fingers, tip)| Some(hand_with_fingers(fingers, tip)))
        .collect()
}
