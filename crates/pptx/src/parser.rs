//! Slide and relationship XML handling.
//!
//! Reading builds the deck model; rewriting streams a slide's XML back out
//! event by event, touching only run text of top-level text shapes.

use cert_core::{Error, Paragraph, Result, Shape, Slide, TextFrame, TextRun};
use quick_xml::events::{BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

/// Element path, below the slide root, of text inside a run of a
/// top-level shape: `p:cSld/p:spTree/p:sp/p:txBody/a:p/a:r/a:t`.
const RUN_TEXT_PATH: [&[u8]; 7] = [b"cSld", b"spTree", b"sp", b"txBody", b"p", b"r", b"t"];

/// A package relationship entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub id: String,
    pub rel_type: String,
    pub target: String,
}

impl Relationship {
    /// Whether this relationship points at a slide (not a layout or master).
    pub fn is_slide(&self) -> bool {
        self.rel_type.ends_with("/slide")
    }
}

/// Outcome of rewriting one slide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReplacement {
    /// Rewritten XML, present only when something was replaced.
    pub xml: Option<String>,
    /// Number of placeholder occurrences replaced.
    pub count: usize,
}

/// Parse a `.rels` part.
pub fn parse_relationships(xml: &str) -> Result<Vec<Relationship>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    let mut rels = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if local_name(e.name().as_ref()) == b"Relationship" =>
            {
                rels.push(Relationship {
                    id: attribute(e, b"Id").unwrap_or_default(),
                    rel_type: attribute(e, b"Type").unwrap_or_default(),
                    target: attribute(e, b"Target").unwrap_or_default(),
                });
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!(
                    "Error parsing relationships: {}",
                    e
                )));
            }
            _ => {}
        }
    }

    Ok(rels)
}

/// Relationship ids of `p:sldIdLst/p:sldId` entries in `presentation.xml`,
/// in presentation order.
pub fn parse_slide_id_list(xml: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    let mut ids = Vec::new();
    let mut in_list = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) if local_name(e.name().as_ref()) == b"sldIdLst" => {
                in_list = true;
            }
            Ok(Event::End(ref e)) if local_name(e.name().as_ref()) == b"sldIdLst" => {
                in_list = false;
            }
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if in_list && local_name(e.name().as_ref()) == b"sldId" =>
            {
                if let Some(id) = attribute(e, b"r:id") {
                    ids.push(id);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!(
                    "Error parsing presentation: {}",
                    e
                )));
            }
            _ => {}
        }
    }

    Ok(ids)
}

/// Build the text model of one slide.
pub fn parse_slide(xml: &str, number: usize) -> Result<Slide> {
    let mut reader = Reader::from_str(xml);
    let mut slide = Slide::new(number);
    let mut stack: Vec<Vec<u8>> = Vec::new();
    let mut shape: Option<Shape> = None;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| Error::XmlError(format!("Error parsing slide {}: {}", number, e)))?;

        match event {
            Event::Start(ref e) => {
                open_element(&stack, e, &mut shape);
                stack.push(local_name(e.name().as_ref()).to_vec());
            }
            Event::Empty(ref e) => {
                open_element(&stack, e, &mut shape);
                if local_name(e.name().as_ref()) == b"sp" && stack.len() == 3 {
                    if let Some(done) = shape.take() {
                        slide.shapes.push(done);
                    }
                }
            }
            Event::End(_) => {
                let closed = stack.pop();
                // Back at shape-tree level: the top-level shape is complete
                if closed.as_deref() == Some(&b"sp"[..]) && stack.len() == 3 {
                    if let Some(done) = shape.take() {
                        slide.shapes.push(done);
                    }
                }
            }
            Event::Text(ref e) if in_run_text(&stack) => {
                let text = e
                    .unescape()
                    .map_err(|e| Error::XmlError(format!("Bad text in slide {}: {}", number, e)))?;
                if let Some(run) = current_run(&mut shape) {
                    run.text.push_str(&text);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(slide)
}

/// Update the shape under construction for an opening (or empty) element.
///
/// `stack` holds the ancestors of `e`, starting at the slide root.
fn open_element(stack: &[Vec<u8>], e: &BytesStart, shape: &mut Option<Shape>) {
    let qname = e.name();
    let name = local_name(qname.as_ref());
    let depth = stack.len();
    let parent = stack.last().map(Vec::as_slice).unwrap_or_default();

    match name {
        b"sp" if depth == 3 && parent == b"spTree" => {
            *shape = Some(Shape::default());
        }
        b"cNvPr" if depth == 5 && parent == b"nvSpPr" => {
            if let Some(shape) = shape.as_mut() {
                shape.name = attribute(e, b"name").unwrap_or_default();
            }
        }
        b"txBody" if depth == 4 && parent == b"sp" => {
            if let Some(shape) = shape.as_mut() {
                shape.text_frame = Some(TextFrame::default());
            }
        }
        b"p" if depth == 5 && parent == b"txBody" => {
            if let Some(tf) = shape.as_mut().and_then(|s| s.text_frame.as_mut()) {
                tf.paragraphs.push(Paragraph::default());
            }
        }
        b"r" if depth == 6 && parent == b"p" => {
            if let Some(p) = shape
                .as_mut()
                .and_then(|s| s.text_frame.as_mut())
                .and_then(|tf| tf.paragraphs.last_mut())
            {
                p.runs.push(TextRun::default());
            }
        }
        _ => {}
    }
}

fn current_run(shape: &mut Option<Shape>) -> Option<&mut TextRun> {
    shape
        .as_mut()?
        .text_frame
        .as_mut()?
        .paragraphs
        .last_mut()?
        .runs
        .last_mut()
}

/// Replace every occurrence of `token` with `value` inside run text.
///
/// Matching is confined to the text of a single run: a token split across
/// runs is left as is. All other markup is written back unchanged.
pub fn replace_in_runs(xml: &str, token: &str, value: &str) -> Result<RunReplacement> {
    let mut reader = Reader::from_str(xml);
    let mut writer = Writer::new(Vec::with_capacity(xml.len()));
    let mut stack: Vec<Vec<u8>> = Vec::new();
    let mut count = 0;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| Error::XmlError(format!("Error reading slide: {}", e)))?;

        match event {
            Event::Start(ref e) => {
                stack.push(local_name(e.name().as_ref()).to_vec());
            }
            Event::End(_) => {
                stack.pop();
            }
            Event::Text(ref e) if in_run_text(&stack) => {
                let text = e
                    .unescape()
                    .map_err(|e| Error::XmlError(format!("Bad run text: {}", e)))?;
                let hits = text.matches(token).count();
                if hits > 0 {
                    count += hits;
                    let replaced = text.replace(token, value);
                    writer
                        .write_event(Event::Text(BytesText::new(&replaced)))
                        .map_err(|e| Error::XmlError(format!("Error writing slide: {}", e)))?;
                    continue;
                }
            }
            Event::Eof => break,
            _ => {}
        }

        writer
            .write_event(event)
            .map_err(|e| Error::XmlError(format!("Error writing slide: {}", e)))?;
    }

    if count == 0 {
        return Ok(RunReplacement { xml: None, count });
    }

    let xml = String::from_utf8(writer.into_inner())
        .map_err(|e| Error::XmlError(format!("Rewritten slide is not UTF-8: {}", e)))?;
    Ok(RunReplacement {
        xml: Some(xml),
        count,
    })
}

/// Whether `stack` (from the slide root) sits inside top-level run text.
fn in_run_text(stack: &[Vec<u8>]) -> bool {
    stack.len() == RUN_TEXT_PATH.len() + 1
        && stack[1..]
            .iter()
            .zip(RUN_TEXT_PATH.iter())
            .all(|(have, want)| have.as_slice() == *want)
}

fn attribute(e: &BytesStart, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key)
        .map(|attr| String::from_utf8_lossy(&attr.value).to_string())
}

/// Extract the local name from a potentially namespaced XML element name.
pub(crate) fn local_name(name: &[u8]) -> &[u8] {
    if let Some(pos) = name.iter().position(|&b| b == b':') {
        &name[pos + 1..]
    } else {
        name
    }
}

/// Extract a slide number from a string like "rId2" or "slide3.xml".
pub(crate) fn extract_slide_number(s: &str) -> Option<usize> {
    let s = s.trim_end_matches(".xml").trim_end_matches(".rels");

    let digits: String = s.chars().rev().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    let digits: String = digits.chars().rev().collect();
    digits.parse().ok()
}
