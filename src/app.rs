//! Main application module for air drawing.
//!
//! The app owns every piece of mutable session state: the drawing state
//! machine (strokes, previous point, clear cooldown), the reference catalog
//! and the tracker. A single cooperative loop drives it one tick at a time.

use crate::{
    catalog::SourceCatalog,
    config::Config,
    drawing::{DrawingStateMachine, TickOutcome},
    error::Result,
    export::Exporter,
    inkml::SourceDocument,
    tracker::{HandTracker, TrackerPoll},
};
use log::{debug, error, info, warn};
use std::{
    path::PathBuf,
    time::{Duration, Instant},
};

/// What happened during one tick
#[derive(Debug, Clone, PartialEq)]
pub enum TickStatus {
    /// A frame was processed
    Processed(TickOutcome),
    /// No frame could be acquired; state is unchanged
    Skipped,
    /// The tracker has no more frames
    Finished,
}

/// Whether the loop should keep going after a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    /// Schedule the next tick
    Continue,
    /// Stop the loop
    Quit,
}

/// Main application struct
pub struct AirDrawApp<T: HandTracker> {
    config: Config,
    catalog: SourceCatalog,
    reference: Option<SourceDocument>,
    machine: DrawingStateMachine,
    tracker: T,
    exporter: Exporter,
    ticks: u64,
    skipped: u64,
}

impl<T: HandTracker> AirDrawApp<T> {
    /// Create the application and load the current reference document
    ///
    /// A reference that fails to load is logged; capture still works.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid
    pub fn new(config: Config, catalog: SourceCatalog, tracker: T) -> Result<Self> {
        info!("Initializing air drawing application");
        let machine = config.create_state_machine()?;
        let exporter = Exporter::new(config.paths.output_dir.clone());

        let mut app = Self {
            config,
            catalog,
            reference: None,
            machine,
            tracker,
            exporter,
            ticks: 0,
            skipped: 0,
        };
        app.load_reference();
        Ok(app)
    }

    /// Run until the tracker finishes
    ///
    /// # Errors
    ///
    /// Returns an error only if the loop cannot continue
    pub fn run(&mut self) -> Result<()> {
        self.run_with(|_, _| Ok(LoopControl::Continue))
    }

    /// Run until the tracker finishes or `on_tick` asks to quit
    ///
    /// Each tick runs to completion before the next one is armed; the next
    /// tick starts one interval after the previous one ended.
    ///
    /// # Errors
    ///
    /// Returns any error raised by `on_tick`
    pub fn run_with<F>(&mut self, mut on_tick: F) -> Result<()>
    where
        F: FnMut(&mut Self, &TickStatus) -> Result<LoopControl>,
    {
        info!("Starting capture loop");
        let interval = self.config.tick_interval();

        loop {
            let status = self.tick(Instant::now());
            if status == TickStatus::Finished {
                info!("Tracker finished after {} ticks", self.ticks);
                break;
            }

            if on_tick(self, &status)? == LoopControl::Quit {
                info!("Exit requested");
                break;
            }

            std::thread::sleep(interval);
        }

        info!(
            "Capture loop stopped: {} ticks, {} skipped, {} points captured",
            self.ticks,
            self.skipped,
            self.machine.store().point_count()
        );
        Ok(())
    }

    /// Run one tick: acquire, infer, and update the drawing state
    pub fn tick(&mut self, now: Instant) -> TickStatus {
        let poll = match self.tracker.poll() {
            Ok(poll) => poll,
            Err(e) => {
                warn!("Skipping tick: {e}");
                self.skipped += 1;
                return TickStatus::Skipped;
            }
        };

        let outcome = match poll {
            TrackerPoll::Finished => return TickStatus::Finished,
            TrackerPoll::NoHand => self.machine.update_raw(None, now),
            TrackerPoll::Hand(points) => self.machine.update_raw(Some(&points), now),
        };
        self.ticks += 1;
        debug!(
            "Tick {}: fingers {:?}, {:?}, {:?}",
            self.ticks, outcome.finger_count, outcome.state, outcome.action
        );
        TickStatus::Processed(outcome)
    }

    /// Export the session against the current catalog document
    ///
    /// The document is re-read so the export carries its current metadata.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be loaded or the export fails;
    /// no output file exists in that case
    pub fn save(&self) -> Result<PathBuf> {
        let source = SourceDocument::load(self.catalog.current()).map_err(|e| {
            error!("Cannot export, failed to load {}: {e}", self.catalog.current().display());
            e
        })?;
        self.exporter
            .export(self.machine.store(), &source, &chrono::Local::now())
    }

    /// Switch to the next reference document
    pub fn next_reference(&mut self) -> bool {
        let moved = self.catalog.next();
        if moved {
            self.load_reference();
        }
        moved
    }

    /// Switch to the previous reference document
    pub fn previous_reference(&mut self) -> bool {
        let moved = self.catalog.previous();
        if moved {
            self.load_reference();
        }
        moved
    }

    /// Load the catalog's current document for display
    ///
    /// On failure the previously loaded reference stays in place.
    fn load_reference(&mut self) -> bool {
        let path = self.catalog.current().to_path_buf();
        let loaded = SourceDocument::load(&path).and_then(|doc| {
            doc.truth()?;
            Ok(doc)
        });

        match loaded {
            Ok(doc) => {
                info!("Reference {}: {}", path.display(), doc.truth().unwrap_or_default());
                self.reference = Some(doc);
                true
            }
            Err(e) => {
                error!("Error loading reference {}: {e}", path.display());
                false
            }
        }
    }

    /// Loaded reference document, if any loaded successfully
    #[must_use]
    pub const fn reference(&self) -> Option<&SourceDocument> {
        self.reference.as_ref()
    }

    /// Reference catalog
    #[must_use]
    pub const fn catalog(&self) -> &SourceCatalog {
        &self.catalog
    }

    /// Drawing state machine and its strokes
    #[must_use]
    pub const fn machine(&self) -> &DrawingStateMachine {
        &self.machine
    }

    /// Tracker feeding the loop
    #[must_use]
    pub const fn tracker(&self) -> &T {
        &self.tracker
    }

    /// Application configuration
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Ticks processed and ticks skipped so far
    #[must_use]
    pub const fn tick_counts(&self) -> (u64, u64) {
        (self.ticks, self.skipped)
    }

    /// Interval between ticks
    #[must_use]
    pub const fn tick_interval(&self) -> Duration {
        self.config.tick_interval()
    }
}
