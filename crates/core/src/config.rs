//! Batch configuration.
//!
//! A `BatchConfig` is built once at startup, from defaults, an optional
//! TOML file and command-line overrides, then handed to the orchestrator.

use crate::error::{Error, Result};
use crate::types::OutputFormat;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default placeholder token replaced by the recipient's name.
pub const DEFAULT_PLACEHOLDER: &str = "{{NAME}}";

/// Everything a batch run needs to know.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Slide template containing the placeholder.
    pub template_path: PathBuf,

    /// Roster table.
    pub table_path: PathBuf,

    /// Where generated and converted files go.
    pub output_dirs: OutputDirs,

    /// Convert every generated deck to PDF.
    pub convert_to_pdf: bool,

    /// Convert every generated deck to PNG.
    pub convert_to_png: bool,

    /// Fixed prefix prepended to every generated file name.
    pub file_prefix: String,

    /// Literal token replaced in run text.
    pub placeholder: String,

    /// Roster column names.
    pub columns: RosterColumns,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            template_path: PathBuf::from("coupon.pptx"),
            table_path: PathBuf::from("test.csv"),
            output_dirs: OutputDirs::default(),
            convert_to_pdf: false,
            convert_to_png: false,
            file_prefix: String::new(),
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            columns: RosterColumns::default(),
        }
    }
}

impl BatchConfig {
    /// Load a configuration from a TOML file. Missing keys keep defaults.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::ConfigError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse a configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::ConfigError(e.to_string()))
    }

    /// Formats to produce for every record, PDF before PNG.
    pub fn enabled_formats(&self) -> Vec<OutputFormat> {
        let mut formats = Vec::new();
        if self.convert_to_pdf {
            formats.push(OutputFormat::Pdf);
        }
        if self.convert_to_png {
            formats.push(OutputFormat::Png);
        }
        formats
    }
}

/// Output directories, one per artifact kind.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OutputDirs {
    pub decks: PathBuf,
    pub pdf: PathBuf,
    pub png: PathBuf,
}

impl Default for OutputDirs {
    fn default() -> Self {
        Self {
            decks: PathBuf::from("out_pptx"),
            pdf: PathBuf::from("out_pdf"),
            png: PathBuf::from("out_png"),
        }
    }
}

impl OutputDirs {
    /// Directory receiving files of the given format.
    pub fn for_format(&self, format: OutputFormat) -> &Path {
        match format {
            OutputFormat::Pdf => &self.pdf,
            OutputFormat::Png => &self.png,
        }
    }
}

/// Header names of the roster columns holding the name parts.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RosterColumns {
    pub given: String,
    pub family: String,
}

impl Default for RosterColumns {
    fn default() -> Self {
        Self {
            given: "NOMBRE".to_string(),
            family: "APELLIDO".to_string(),
        }
    }
}
