//! Conversion of generated decks through an external converter.
//!
//! Conversion failures propagate as errors. Removing the intermediate deck
//! afterwards is best effort: failures are logged and reported, never
//! returned as errors.

use crate::error::Result;
use crate::types::OutputFormat;
use std::path::{Path, PathBuf};

/// One conversion request: a deck, a destination directory and a format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionJob {
    pub source: PathBuf,
    pub out_dir: PathBuf,
    pub format: OutputFormat,
}

impl ConversionJob {
    pub fn new(source: impl Into<PathBuf>, out_dir: impl Into<PathBuf>, format: OutputFormat) -> Self {
        Self {
            source: source.into(),
            out_dir: out_dir.into(),
            format,
        }
    }
}

/// Something that turns a deck into another format.
///
/// Implementations block until the conversion finishes. Naming of the
/// produced file is left to the implementation.
pub trait Converter {
    fn convert(&self, job: &ConversionJob) -> Result<()>;
}

impl<C: Converter + ?Sized> Converter for &C {
    fn convert(&self, job: &ConversionJob) -> Result<()> {
        (**self).convert(job)
    }
}

/// Result of deleting an intermediate deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanupOutcome {
    Deleted,
    Failed,
}

/// Wraps a [`Converter`] with output directory creation and cleanup.
#[derive(Debug, Clone)]
pub struct FormatConverter<C> {
    converter: C,
}

impl<C: Converter> FormatConverter<C> {
    pub fn new(converter: C) -> Self {
        Self { converter }
    }

    /// Create the job's output directory if needed, then convert.
    pub fn convert(&self, job: &ConversionJob) -> Result<()> {
        std::fs::create_dir_all(&job.out_dir)?;
        log::debug!(
            "Converting {} to {} in {}",
            job.source.display(),
            job.format,
            job.out_dir.display()
        );
        self.converter.convert(job)
    }

    /// Delete a deck whose conversions are done. Never fails the batch.
    pub fn remove_intermediate(&self, path: &Path) -> CleanupOutcome {
        match std::fs::remove_file(path) {
            Ok(()) => CleanupOutcome::Deleted,
            Err(e) => {
                log::warn!("Could not delete {}: {}", path.display(), e);
                CleanupOutcome::Failed
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn inner(&self) -> &C {
        &self.converter
    }
}
