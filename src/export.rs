//! Writing captured sessions to the output directory.
//!
//! Documents are written to a temporary file next to the target and
//! renamed into place, so a failed export never leaves a partial file.

use crate::{
    constants::{EXPORT_TIMESTAMP_FORMAT, INKML_EXTENSION},
    inkml::{SourceDocument, TraceSerializer},
    stroke::StrokeStore,
    Error, Result,
};
use chrono::{DateTime, TimeZone};
use log::{error, info};
use std::{
    fmt::Display,
    io::Write,
    path::{Path, PathBuf},
};

/// Base name used when the source document has no file name
const UNNAMED_SOURCE: &str = "session";

/// Output file name for an export of `base_name` captured at `at`
#[must_use]
pub fn output_file_name<Tz>(base_name: &str, at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    format!(
        "{base_name}_air_{}.{INKML_EXTENSION}",
        at.format(EXPORT_TIMESTAMP_FORMAT)
    )
}

/// Writes trace documents into one output directory
#[derive(Debug, Clone)]
pub struct Exporter {
    output_dir: PathBuf,
}

impl Exporter {
    /// Exporter writing into `output_dir`, created on first export
    pub fn new<P: Into<PathBuf>>(output_dir: P) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Directory exports are written to
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Export `store` with metadata from `source`, naming the file from `at`
    ///
    /// Returns the path of the written document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be rendered or written; no
    /// target file is left behind in that case
    pub fn export<Tz>(&self, store: &StrokeStore, source: &SourceDocument, at: &DateTime<Tz>) -> Result<PathBuf>
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let base_name = source.base_name().unwrap_or_else(|| UNNAMED_SOURCE.to_string());
        let target = self.output_dir.join(output_file_name(&base_name, at));

        match self.write_atomically(store, source, &target) {
            Ok(()) => {
                info!("Air drawing saved as {}", target.display());
                Ok(target)
            }
            Err(e) => {
                error!("Failed to save {}: {e}", target.display());
                Err(e)
            }
        }
    }

    fn write_atomically(&self, store: &StrokeStore, source: &SourceDocument, target: &Path) -> Result<()> {
        if !self.output_dir.exists() {
            info!("Creating output directory: {}", self.output_dir.display());
            std::fs::create_dir_all(&self.output_dir)?;
        }

        let document = TraceSerializer::new(source).to_bytes(store)?;

        let mut file = tempfile::NamedTempFile::new_in(&self.output_dir)?;
        file.write_all(&document)?;
        file.as_file().sync_all()?;
        file.persist(target)
            .map_err(|e| Error::Export(format!("could not move document into place: {}", e.error)))?;
        Ok(())
    }
}
