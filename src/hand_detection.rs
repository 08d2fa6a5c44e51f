//! Hand landmark detection using `ONNX` Runtime.
//!
//! The model takes one RGB frame resized to a square input and returns 21
//! landmarks (63 values, x/y/z in input pixels) plus a hand presence score.

use crate::{
    constants::NUM_HAND_LANDMARKS,
    landmarks::Landmark,
    utils::safe_cast::usize_to_i32,
    Error, Result,
};
use ndarray::{Array4, CowArray};
use opencv::core::{Mat, Size, Vec3f, CV_32F};
use opencv::imgproc::{self, InterpolationFlags};
use opencv::prelude::*;
use ort::{Environment, GraphOptimizationLevel, LoggingLevel, Session, SessionBuilder, Value};
use std::path::Path;
use std::sync::Arc;

/// Default hand landmark model input size
const DEFAULT_HAND_INPUT_SIZE: i32 = 224;

/// Values per landmark in the model output
const VALUES_PER_LANDMARK: usize = 3;

/// Hand landmark detector
pub struct HandLandmarkDetector {
    session: Session,
    input_size: i32,
    presence_threshold: f32,
}

impl HandLandmarkDetector {
    /// Create a detector from an `ONNX` model file
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The ONNX model file cannot be loaded
    /// - The ONNX runtime environment cannot be created
    pub fn new<P: AsRef<Path>>(model_path: P, presence_threshold: f32) -> Result<Self> {
        log::info!(
            "Initializing HandLandmarkDetector with model: {}",
            model_path.as_ref().display()
        );
        let environment = Arc::new(
            Environment::builder()
                .with_name("hand_landmarks")
                .with_log_level(LoggingLevel::Warning)
                .build()?,
        );

        let session = SessionBuilder::new(&environment)?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_model_from_file(model_path)?;

        if session.outputs.is_empty() {
            return Err(Error::InvalidInput("Hand landmark model has no outputs".to_string()));
        }

        Ok(Self {
            session,
            input_size: DEFAULT_HAND_INPUT_SIZE,
            presence_threshold,
        })
    }

    /// Detect one hand in a BGR frame
    ///
    /// Returns `None` when the presence score is below the threshold.
    ///
    /// # Errors
    ///
    /// Returns an error if preprocessing or inference fails
    pub fn detect(&self, frame: &Mat) -> Result<Option<Vec<Landmark>>> {
        let input = self.preprocess(frame)?;
        let outputs = self.forward(input)?;

        let presence = outputs
            .get(1)
            .and_then(|scores| scores.first().copied())
            .unwrap_or(1.0);
        if presence < self.presence_threshold {
            return Ok(None);
        }

        let landmarks = outputs
            .first()
            .ok_or_else(|| Error::InvalidInput("No landmark output from model".to_string()))?;
        Ok(Some(self.postprocess(landmarks)?))
    }

    /// Resize, convert to RGB and scale to [0, 1] as a 1xHxWx3 tensor
    #[allow(clippy::cast_sign_loss)] // Input size is a positive constant
    fn preprocess(&self, image: &Mat) -> Result<Array4<f32>> {
        let size = self.input_size as usize;
        let channels = 3;

        let mut resized = Mat::default();
        imgproc::resize(
            image,
            &mut resized,
            Size::new(self.input_size, self.input_size),
            0.0,
            0.0,
            InterpolationFlags::INTER_LINEAR as i32,
        )?;

        let mut rgb_image = Mat::default();
        imgproc::cvt_color(&resized, &mut rgb_image, imgproc::COLOR_BGR2RGB, 0)?;

        let mut float_image = Mat::default();
        rgb_image.convert_to(&mut float_image, CV_32F, 1.0 / 255.0, 0.0)?;

        let mut data = vec![0.0f32; size * size * channels];
        for row in 0..size {
            for col in 0..size {
                let pixel = float_image.at_2d::<Vec3f>(usize_to_i32(row)?, usize_to_i32(col)?)?;
                for ch in 0..channels {
                    data[(row * size + col) * channels + ch] = pixel[ch];
                }
            }
        }

        Array4::from_shape_vec((1, size, size, channels), data)
            .map_err(|e| Error::InvalidInput(format!("Failed to create input tensor: {e}")))
    }

    /// Run the model and flatten every output
    fn forward(&self, input: Array4<f32>) -> Result<Vec<Vec<f32>>> {
        let cow_array = CowArray::from(input.into_dyn());
        let input_tensor = Value::from_array(self.session.allocator(), &cow_array)?;

        let outputs = self.session.run(vec![input_tensor])?;

        outputs
            .iter()
            .map(|output| -> Result<Vec<f32>> {
                let tensor = output.try_extract::<f32>()?;
                let view = tensor.view();
                Ok(view.iter().copied().collect())
            })
            .collect()
    }

    /// Convert raw model output to normalized landmarks
    #[allow(clippy::cast_precision_loss)] // Input size is small
    fn postprocess(&self, raw: &[f32]) -> Result<Vec<Landmark>> {
        let expected = NUM_HAND_LANDMARKS * VALUES_PER_LANDMARK;
        if raw.len() < expected {
            return Err(Error::Landmark(format!(
                "model produced {} values, expected {expected}",
                raw.len()
            )));
        }

        let scale = self.input_size as f32;
        Ok(raw[..expected]
            .chunks_exact(VALUES_PER_LANDMARK)
            .map(|v| Landmark::new(v[0] / scale, v[1] / scale, v[2] / scale))
            .collect())
    }
}
