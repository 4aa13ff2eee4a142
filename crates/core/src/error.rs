//! Error types for certificate generation.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while generating or converting certificate decks.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to open, read or write a file.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The roster table could not be parsed.
    #[error("Roster error: {0}")]
    RosterError(String),

    /// A required column is absent from the roster header.
    #[error("Roster is missing required column '{0}'")]
    MissingColumn(String),

    /// ZIP archive error (for PPTX).
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// XML parsing or writing error (for PPTX).
    #[error("XML error: {0}")]
    XmlError(String),

    /// The template is not a usable slide deck.
    #[error("Invalid template: {0}")]
    InvalidTemplate(String),

    /// The external converter could not be started.
    #[error("Failed to launch converter '{program}': {source}")]
    ConverterLaunch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The external converter ran but reported failure.
    #[error("Converter failed on {path} ({})", describe_exit(.code))]
    ConversionFailed { path: String, code: Option<i32> },

    /// Configuration file could not be loaded.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "terminated by signal".to_string(),
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::RosterError(err.to_string())
    }
}
