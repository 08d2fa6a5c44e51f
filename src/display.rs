//! Camera capture and the interactive `highgui` front end.

use crate::{
    app::{AirDrawApp, LoopControl, TickStatus},
    catalog::SourceCatalog,
    config::Config,
    drawing::{Action, DrawingState},
    hand_detection::HandLandmarkDetector,
    tracker::{HandTracker, TrackerPoll},
    utils::safe_cast::{u32_to_i32, usize_to_i32},
    Error, Result,
};
use log::{info, warn};
use opencv::{
    core::{self, Mat, Point, Scalar, CV_8UC3},
    highgui::{self, WINDOW_NORMAL},
    imgproc::{self, FONT_HERSHEY_SIMPLEX, LINE_8},
    prelude::*,
    videoio::{self, VideoCapture, CAP_PROP_BUFFERSIZE, CAP_PROP_FRAME_HEIGHT, CAP_PROP_FRAME_WIDTH},
};

const CAMERA_WINDOW: &str = "Air Drawing";
const REFERENCE_WINDOW: &str = "Reference";

/// Webcam frames run through the hand landmark model
pub struct CameraTracker {
    capture: VideoCapture,
    detector: HandLandmarkDetector,
    mirror: bool,
    frame: Mat,
}

impl CameraTracker {
    /// Open the configured camera and load the landmark model
    ///
    /// # Errors
    ///
    /// Returns an error if the camera or the model cannot be opened
    pub fn new(config: &Config) -> Result<Self> {
        let index = config.capture.camera_index;
        info!("Opening camera {}", index);
        let mut capture = VideoCapture::new(index, videoio::CAP_ANY)?;
        if !capture.is_opened()? {
            return Err(Error::Acquisition(format!("camera {index} could not be opened")));
        }
        capture.set(CAP_PROP_FRAME_WIDTH, f64::from(config.capture.frame_width))?;
        capture.set(CAP_PROP_FRAME_HEIGHT, f64::from(config.capture.frame_height))?;
        capture.set(CAP_PROP_BUFFERSIZE, 1.0)?;

        let detector = HandLandmarkDetector::new(&config.detection.model, config.detection.presence_threshold)?;

        Ok(Self {
            capture,
            detector,
            mirror: config.capture.mirror,
            frame: Mat::default(),
        })
    }

    /// Last frame acquired, mirrored when configured
    #[must_use]
    pub const fn frame(&self) -> &Mat {
        &self.frame
    }
}

impl HandTracker for CameraTracker {
    fn poll(&mut self) -> Result<TrackerPoll> {
        let mut raw = Mat::default();
        if !self.capture.read(&mut raw)? || raw.empty() {
            return Err(Error::Acquisition("no frame from camera".to_string()));
        }

        if self.mirror {
            core::flip(&raw, &mut self.frame, 1)?;
        } else {
            self.frame = raw;
        }

        Ok(match self.detector.detect(&self.frame)? {
            Some(points) => TrackerPoll::Hand(points),
            None => TrackerPoll::NoHand,
        })
    }
}

/// Ink canvas and windows
struct Overlay {
    ink: Mat,
    width: i32,
    height: i32,
}

impl Overlay {
    fn new(config: &Config) -> Result<Self> {
        let width = u32_to_i32(config.capture.frame_width)?;
        let height = u32_to_i32(config.capture.frame_height)?;
        highgui::named_window(CAMERA_WINDOW, WINDOW_NORMAL)?;
        highgui::named_window(REFERENCE_WINDOW, WINDOW_NORMAL)?;
        Ok(Self {
            ink: Mat::zeros(height, width, CV_8UC3)?.to_mat()?,
            width,
            height,
        })
    }

    fn clear(&mut self) -> Result<()> {
        self.ink = Mat::zeros(self.height, self.width, CV_8UC3)?.to_mat()?;
        Ok(())
    }

    fn render(&mut self, frame: &Mat, status: &TickStatus) -> Result<()> {
        let TickStatus::Processed(outcome) = status else {
            return Ok(());
        };

        if outcome.action == Action::Clear {
            self.clear()?;
        }
        if let Some((from, to)) = outcome.ink {
            imgproc::line(
                &mut self.ink,
                Point::new(from.0, from.1),
                Point::new(to.0, to.1),
                Scalar::new(255.0, 255.0, 255.0, 0.0),
                5,
                LINE_8,
                0,
            )?;
        }

        let mut display_frame = Mat::default();
        if frame.size()? == self.ink.size()? {
            core::bitwise_or(frame, &self.ink, &mut display_frame, &core::no_array())?;
        } else {
            display_frame = frame.try_clone()?;
        }

        if let Some((x, y)) = outcome.pen {
            imgproc::circle(
                &mut display_frame,
                Point::new(x, y),
                8,
                Scalar::new(0.0, 255.0, 0.0, 0.0),
                -1,
                LINE_8,
                0,
            )?;
        }

        let status_text = match (outcome.finger_count, outcome.state) {
            (Some(count), DrawingState::Paused) => format!("Fingers: {count} | Paused"),
            (Some(count), _) => format!("Fingers: {count} | Drawing"),
            (None, _) => "No hand".to_string(),
        };
        imgproc::put_text(
            &mut display_frame,
            &status_text,
            Point::new(10, 30),
            FONT_HERSHEY_SIMPLEX,
            1.0,
            Scalar::new(0.0, 255.0, 0.0, 0.0),
            2,
            LINE_8,
            false,
        )?;

        highgui::imshow(CAMERA_WINDOW, &display_frame)?;
        Ok(())
    }

    fn show_reference(&self, truth: &str, name: &str) -> Result<()> {
        let mut canvas = Mat::zeros(self.height, self.width, CV_8UC3)?.to_mat()?;
        for (line, text) in [name, truth].iter().enumerate() {
            imgproc::put_text(
                &mut canvas,
                text,
                Point::new(20, self.height / 2 + usize_to_i32(line)? * 40),
                FONT_HERSHEY_SIMPLEX,
                0.8,
                Scalar::new(255.0, 255.0, 255.0, 0.0),
                2,
                LINE_8,
                false,
            )?;
        }
        highgui::imshow(REFERENCE_WINDOW, &canvas)?;
        Ok(())
    }
}

fn show_current_reference(overlay: &Overlay, app: &AirDrawApp<CameraTracker>) -> Result<()> {
    let name = app
        .catalog()
        .current()
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let truth = app.reference().and_then(|doc| doc.truth().ok()).unwrap_or("");
    overlay.show_reference(truth, &name)
}

/// Run the interactive camera session
///
/// Keys: `s` save, `n` next reference, `p` previous reference, `q`/Esc quit.
///
/// # Errors
///
/// Returns an error if the camera, model or windows cannot be set up
pub fn run_camera(config: Config, catalog: SourceCatalog) -> Result<()> {
    let tracker = CameraTracker::new(&config)?;
    let mut overlay = Overlay::new(&config)?;
    let mut app = AirDrawApp::new(config, catalog, tracker)?;
    show_current_reference(&overlay, &app)?;

    app.run_with(|app, status| {
        overlay.render(app.tracker().frame(), status)?;

        let key = highgui::wait_key(1)?;
        if key == 27 || key == i32::from(b'q') {
            return Ok(LoopControl::Quit);
        }
        if key == i32::from(b's') {
            if let Err(e) = app.save() {
                warn!("Save failed: {e}");
            }
        } else if key == i32::from(b'n') {
            if app.next_reference() {
                show_current_reference(&overlay, app)?;
            }
        } else if key == i32::from(b'p') && app.previous_reference() {
            show_current_reference(&overlay, app)?;
        }
        Ok(LoopControl::Continue)
    })?;

    highgui::destroy_all_windows()?;
    Ok(())
}
