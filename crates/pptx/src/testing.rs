//! In-memory PPTX fixtures for tests.

use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::ZipWriter;

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"/></Types>"#;

const PACKAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="ppt/presentation.xml"/></Relationships>"#;

const SLIDE_REL_TYPE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";

/// A top-level text shape; each inner slice is one paragraph's run texts.
///
/// Run texts are inserted verbatim, so they must already be XML-escaped.
pub fn text_shape(name: &str, paragraphs: &[&[&str]]) -> String {
    let mut xml = format!(
        r#"<p:sp><p:nvSpPr><p:cNvPr id="2" name="{}"/><p:cNvSpPr/><p:nvPr/></p:nvSpPr><p:spPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="100" cy="100"/></a:xfrm></p:spPr><p:txBody><a:bodyPr/><a:lstStyle/>"#,
        name
    );
    for runs in paragraphs {
        xml.push_str("<a:p>");
        for text in *runs {
            xml.push_str(r#"<a:r><a:rPr lang="es-ES" dirty="0"/><a:t>"#);
            xml.push_str(text);
            xml.push_str("</a:t></a:r>");
        }
        xml.push_str("</a:p>");
    }
    xml.push_str("</p:txBody></p:sp>");
    xml
}

/// A complete slide part wrapping the given shape markup.
pub fn slide_xml(shapes: &[String]) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"><p:cSld><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/>{}</p:spTree></p:cSld></p:sld>"#,
        shapes.concat()
    )
}

/// Build a PPTX archive with one part per slide, in the given order.
pub fn deck_bytes(slides: &[String]) -> Vec<u8> {
    let mut presentation = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:presentation xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"><p:sldIdLst>"#,
    );
    let mut rels = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );
    for idx in 1..=slides.len() {
        presentation.push_str(&format!(
            r#"<p:sldId id="{}" r:id="rId{}"/>"#,
            255 + idx,
            idx + 1
        ));
        rels.push_str(&format!(
            r#"<Relationship Id="rId{}" Type="{}" Target="slides/slide{}.xml"/>"#,
            idx + 1,
            SLIDE_REL_TYPE,
            idx
        ));
    }
    presentation.push_str("</p:sldIdLst></p:presentation>");
    rels.push_str("</Relationships>");

    let mut data = Vec::new();
    {
        let mut writer = ZipWriter::new(Cursor::new(&mut data));
        let options = FileOptions::default();

        let mut add = |name: &str, content: &str| {
            writer.start_file(name, options).unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        };
        add("[Content_Types].xml", CONTENT_TYPES);
        add("_rels/.rels", PACKAGE_RELS);
        add("ppt/presentation.xml", &presentation);
        add("ppt/_rels/presentation.xml.rels", &rels);
        for (idx, slide) in slides.iter().enumerate() {
            add(&format!("ppt/slides/slide{}.xml", idx + 1), slide);
        }

        writer.finish().unwrap();
    }
    data
}

/// Write a PPTX built by [`deck_bytes`] to `path`.
pub fn write_deck(path: &std::path::Path, slides: &[String]) {
    std::fs::write(path, deck_bytes(slides)).unwrap();
}
