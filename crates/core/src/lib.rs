//! Core domain types, roster reading, file name sanitizing and conversion
//! plumbing for generating personalized certificate decks.

pub mod config;
pub mod convert;
pub mod error;
pub mod roster;
pub mod sanitize;
pub mod types;

pub use config::{BatchConfig, OutputDirs, RosterColumns};
pub use convert::{CleanupOutcome, ConversionJob, Converter, FormatConverter};
pub use error::{Error, Result};
pub use roster::{RosterReader, RosterRecord};
pub use sanitize::{deck_file_name, file_token};
pub use types::{OutputFormat, Paragraph, Shape, Slide, TextFrame, TextRun};
