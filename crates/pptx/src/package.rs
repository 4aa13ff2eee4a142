//! PPTX package access: the ZIP container and its parts.

use crate::parser::{extract_slide_number, parse_relationships, parse_slide_id_list};
use cert_core::{Error, Result};
use std::fs::File;
use std::io::{BufReader, Read, Seek, Write};
use std::path::Path;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

const PRESENTATION_PATH: &str = "ppt/presentation.xml";
const PRESENTATION_RELS_PATH: &str = "ppt/_rels/presentation.xml.rels";

/// One entry of the ZIP container.
#[derive(Debug, Clone)]
struct Part {
    name: String,
    data: Vec<u8>,
    compression: CompressionMethod,
    is_dir: bool,
}

/// A PPTX package held fully in memory.
///
/// Parts keep their archive order and compression method so that a saved
/// package differs from the loaded one only in replaced parts.
#[derive(Debug, Clone)]
pub struct Package {
    parts: Vec<Part>,
}

impl Package {
    /// Open a package from a file.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Load every part of a ZIP archive.
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        let mut archive = ZipArchive::new(reader)
            .map_err(|e| Error::ZipError(format!("Failed to open ZIP: {}", e)))?;

        let mut parts = Vec::with_capacity(archive.len());
        for i in 0..archive.len() {
            let mut entry = archive
                .by_index(i)
                .map_err(|e| Error::ZipError(format!("Failed to read entry {}: {}", i, e)))?;

            let mut data = Vec::new();
            entry
                .read_to_end(&mut data)
                .map_err(|e| Error::ZipError(format!("Failed to read '{}': {}", entry.name(), e)))?;

            parts.push(Part {
                name: entry.name().to_string(),
                data,
                compression: entry.compression(),
                is_dir: entry.is_dir(),
            });
        }

        log::debug!("Loaded package with {} parts", parts.len());
        Ok(Self { parts })
    }

    /// Names of all parts, in archive order.
    #[cfg(test)]
    pub(crate) fn part_names(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().map(|p| p.name.as_str())
    }

    /// Raw bytes of a part.
    pub fn part(&self, name: &str) -> Option<&[u8]> {
        self.parts
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.data.as_slice())
    }

    /// A part decoded as UTF-8 text.
    pub fn part_str(&self, name: &str) -> Result<&str> {
        let data = self
            .part(name)
            .ok_or_else(|| Error::ZipError(format!("File not found in archive '{}'", name)))?;
        std::str::from_utf8(data)
            .map_err(|e| Error::XmlError(format!("'{}' is not UTF-8: {}", name, e)))
    }

    /// Replace the content of an existing part.
    pub fn replace_part(&mut self, name: &str, data: Vec<u8>) -> Result<()> {
        let part = self
            .parts
            .iter_mut()
            .find(|p| p.name == name)
            .ok_or_else(|| Error::ZipError(format!("File not found in archive '{}'", name)))?;
        part.data = data;
        Ok(())
    }

    /// Slide part paths in presentation order.
    ///
    /// Follows `p:sldIdLst` in `presentation.xml` through its relationships.
    /// Without a slide list, slide relationships are ordered by number.
    pub fn slide_paths(&self) -> Result<Vec<String>> {
        let rels = parse_relationships(self.part_str(PRESENTATION_RELS_PATH)?)?;
        let slide_ids = match self.part(PRESENTATION_PATH) {
            Some(_) => parse_slide_id_list(self.part_str(PRESENTATION_PATH)?)?,
            None => Vec::new(),
        };

        if !slide_ids.is_empty() {
            return slide_ids
                .iter()
                .map(|id| {
                    rels.iter()
                        .find(|r| &r.id == id && r.is_slide())
                        .map(|r| resolve_target(&r.target))
                        .ok_or_else(|| {
                            Error::InvalidTemplate(format!("Slide relationship '{}' not found", id))
                        })
                })
                .collect();
        }

        let mut slides: Vec<(String, Option<usize>)> = rels
            .iter()
            .filter(|r| r.is_slide())
            .map(|r| {
                let order = extract_slide_number(&r.id).or_else(|| extract_slide_number(&r.target));
                (resolve_target(&r.target), order)
            })
            .collect();

        slides.sort_by(|a, b| match (a.1, b.1) {
            (Some(na), Some(nb)) => na.cmp(&nb),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.0.cmp(&b.0),
        });

        Ok(slides.into_iter().map(|(path, _)| path).collect())
    }

    /// Write the package as a ZIP archive.
    pub fn write_to<W: Write + Seek>(&self, writer: W) -> Result<W> {
        let mut zip = ZipWriter::new(writer);

        for part in &self.parts {
            let method = match part.compression {
                CompressionMethod::Stored => CompressionMethod::Stored,
                _ => CompressionMethod::Deflated,
            };
            let options = FileOptions::default().compression_method(method);

            if part.is_dir {
                zip.add_directory(part.name.as_str(), options)
                    .map_err(|e| Error::ZipError(format!("Failed to add '{}': {}", part.name, e)))?;
                continue;
            }

            zip.start_file(part.name.as_str(), options)
                .map_err(|e| Error::ZipError(format!("Failed to add '{}': {}", part.name, e)))?;
            zip.write_all(&part.data)?;
        }

        zip.finish()
            .map_err(|e| Error::ZipError(format!("Failed to finish ZIP: {}", e)))
    }

    /// Write the package to a new file at `path`.
    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        self.write_to(file)?;
        Ok(())
    }
}

/// Turn a relationship target of `presentation.xml` into a part name.
fn resolve_target(target: &str) -> String {
    match target.strip_prefix('/') {
        Some(absolute) => absolute.to_string(),
        None => format!("ppt/{}", target),
    }
}
