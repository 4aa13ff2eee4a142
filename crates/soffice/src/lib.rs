//! LibreOffice backend for converting decks.
//!
//! Runs `soffice --headless --convert-to <format> <deck> --outdir <dir>` and
//! waits for it to exit. LibreOffice picks the output file name.

use cert_core::{ConversionJob, Converter, Error, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Where LibreOffice lives in a standard macOS install.
pub const MACOS_BUNDLE_PATH: &str = "/Applications/LibreOffice.app/Contents/MacOS/soffice";

/// Program name looked up on `PATH` when nothing else is configured.
pub const DEFAULT_PROGRAM: &str = "soffice";

/// Converter that shells out to LibreOffice.
#[derive(Debug, Clone)]
pub struct SofficeConverter {
    program: PathBuf,
}

impl SofficeConverter {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Use the macOS application bundle if installed, else `soffice` on `PATH`.
    pub fn locate() -> Self {
        let bundle = Path::new(MACOS_BUNDLE_PATH);
        if bundle.exists() {
            Self::new(bundle)
        } else {
            Self::new(DEFAULT_PROGRAM)
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Command-line arguments for a job.
    pub fn args(job: &ConversionJob) -> Vec<OsString> {
        vec![
            OsString::from("--headless"),
            OsString::from("--convert-to"),
            OsString::from(job.format.as_str()),
            job.source.clone().into_os_string(),
            OsString::from("--outdir"),
            job.out_dir.clone().into_os_string(),
        ]
    }
}

impl Converter for SofficeConverter {
    fn convert(&self, job: &ConversionJob) -> Result<()> {
        log::debug!(
            "Running {} on {}",
            self.program.display(),
            job.source.display()
        );

        // Blocks until LibreOffice exits; stdout and stderr pass through.
        let status = Command::new(&self.program)
            .args(Self::args(job))
            .status()
            .map_err(|source| Error::ConverterLaunch {
                program: self.program.display().to_string(),
                source,
            })?;

        if !status.success() {
            return Err(Error::ConversionFailed {
                path: job.source.display().to_string(),
                code: status.code(),
            });
        }

        Ok(())
    }
}
