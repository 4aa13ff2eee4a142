//! Domain types for slide decks and conversion targets.

use std::fmt;

/// A target format for the external converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    /// Portable Document Format.
    Pdf,
    /// PNG raster image.
    Png,
}

impl OutputFormat {
    /// The format name passed to the converter, also used as file extension.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Png => "png",
        }
    }

    /// Human-readable label used in progress output.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pdf => "PDF",
            Self::Png => "PNG",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single slide read from a deck.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Slide {
    /// 1-based slide number in presentation order.
    pub number: usize,

    /// Top-level shapes in z-order.
    pub shapes: Vec<Shape>,
}

impl Slide {
    /// Create a new empty slide with the given number.
    pub fn new(number: usize) -> Self {
        Self {
            number,
            shapes: Vec::new(),
        }
    }

    /// Text frames of all shapes that carry one.
    pub fn text_frames(&self) -> impl Iterator<Item = &TextFrame> {
        self.shapes.iter().filter_map(|s| s.text_frame.as_ref())
    }

    /// All text runs on the slide, in document order.
    pub fn runs(&self) -> impl Iterator<Item = &TextRun> {
        self.text_frames()
            .flat_map(|tf| tf.paragraphs.iter())
            .flat_map(|p| p.runs.iter())
    }
}

/// A shape on a slide.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Shape {
    /// Shape name from its non-visual properties (may be empty).
    pub name: String,

    /// Text frame, if the shape has a text body.
    pub text_frame: Option<TextFrame>,
}

/// The text body of a shape.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextFrame {
    pub paragraphs: Vec<Paragraph>,
}

impl TextFrame {
    /// Paragraph texts joined with newlines.
    pub fn text(&self) -> String {
        self.paragraphs
            .iter()
            .map(Paragraph::text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A paragraph made of text runs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Paragraph {
    pub runs: Vec<TextRun>,
}

impl Paragraph {
    /// Concatenated text of every run.
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}

/// A run of uniformly formatted text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextRun {
    pub text: String,
}

impl TextRun {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}
