//! PPTX (Office Open XML) backend for certificate generation.
//!
//! Opens .pptx templates (ZIP archives of XML parts), replaces placeholder
//! text inside slide text runs and writes the result as a new deck.

pub mod deck;
pub mod filler;
pub mod package;
pub mod parser;

#[cfg(any(test, feature = "test-fixtures"))]
pub mod testing;

pub use deck::Deck;
pub use filler::{FillReport, SplitPlaceholder, TemplateFiller, TemplateReport};
pub use package::Package;
