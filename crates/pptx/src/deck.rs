//! Editable slide decks.

use crate::package::Package;
use crate::parser::{parse_slide, replace_in_runs};
use cert_core::{Error, Result, Slide};
use std::io::{Read, Seek};
use std::path::Path;

/// A PPTX deck loaded for editing.
#[derive(Debug, Clone)]
pub struct Deck {
    package: Package,
    slide_paths: Vec<String>,
}

impl Deck {
    /// Open a deck from a file.
    pub fn open(path: &Path) -> Result<Self> {
        Self::from_package(Package::open(path)?)
    }

    /// Load a deck from a reader.
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        Self::from_package(Package::from_reader(reader)?)
    }

    fn from_package(package: Package) -> Result<Self> {
        let slide_paths = package.slide_paths()?;
        if let Some(missing) = slide_paths.iter().find(|p| package.part(p).is_none()) {
            return Err(Error::InvalidTemplate(format!(
                "Slide part '{}' is missing",
                missing
            )));
        }
        Ok(Self {
            package,
            slide_paths,
        })
    }

    pub fn slide_count(&self) -> usize {
        self.slide_paths.len()
    }

    /// Read the text model of every slide, in presentation order.
    pub fn slides(&self) -> Result<Vec<Slide>> {
        self.slide_paths
            .iter()
            .enumerate()
            .map(|(idx, path)| parse_slide(self.package.part_str(path)?, idx + 1))
            .collect()
    }

    /// Replace `token` with `value` in every run of every slide.
    ///
    /// Returns the number of occurrences replaced. Slides without a match
    /// are left byte-for-byte intact.
    pub fn replace_in_runs(&mut self, token: &str, value: &str) -> Result<usize> {
        let mut total = 0;
        for path in &self.slide_paths {
            let result = replace_in_runs(self.package.part_str(path)?, token, value)?;
            if let Some(xml) = result.xml {
                log::debug!("Replaced {} occurrence(s) in {}", result.count, path);
                self.package.replace_part(path, xml.into_bytes())?;
            }
            total += result.count;
        }
        Ok(total)
    }

    /// Write the deck as a new file.
    pub fn save(&self, path: &Path) -> Result<()> {
        self.package.save(path)
    }

    #[cfg(test)]
    pub(crate) fn write_to<W: std::io::Write + Seek>(&self, writer: W) -> Result<W> {
        self.package.write_to(writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{deck_bytes, slide_xml, text_shape};
    use std::io::Cursor;

    fn deck(slides: &[String]) -> Deck {
        Deck::from_reader(Cursor::new(deck_bytes(slides))).unwrap()
    }

    fn all_runs(deck: &Deck) -> Vec<String> {
        deck.slides()
            .unwrap()
            .iter()
            .flat_map(|s| s.runs().map(|r| r.text.clone()).collect::<Vec<_>>())
            .collect()
    }

    #[test]
    fn test_replace_across_slides() {
        let mut deck = deck(&[
            slide_xml(&[text_shape("Name", &[&["Awarded to {{NAME}}"]])]),
            slide_xml(&[text_shape("Title", &[&["Thanks"]])]),
            slide_xml(&[text_shape("Footer", &[&["{{NAME}}", " / {{NAME}}"]])]),
        ]);

        assert_eq!(deck.slide_count(), 3);
        assert_eq!(deck.replace_in_runs("{{NAME}}", "Ana Ruiz").unwrap(), 3);
        assert_eq!(
            all_runs(&deck),
            vec!["Awarded to Ana Ruiz", "Thanks", "Ana Ruiz", " / Ana Ruiz"]
        );
    }

    #[test]
    fn test_save_and_reopen() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("Ana_Ruiz.pptx");

        let mut deck = deck(&[slide_xml(&[text_shape("Name", &[&["{{NAME}}"]])])]);
        deck.replace_in_runs("{{NAME}}", "Ana Ruiz").unwrap();
        deck.save(&out).unwrap();

        let reopened = Deck::open(&out).unwrap();
        assert_eq!(all_runs(&reopened), vec!["Ana Ruiz"]);
    }

    #[test]
    fn test_no_placeholder_leaves_slides_untouched() {
        let slides = [slide_xml(&[text_shape("Title", &[&["Certificate"]])])];
        let mut deck = deck(&slides);

        assert_eq!(deck.replace_in_runs("{{NAME}}", "Ana").unwrap(), 0);

        let out = deck.write_to(Cursor::new(Vec::new())).unwrap().into_inner();
        let reopened = Package::from_reader(Cursor::new(out)).unwrap();
        assert_eq!(
            reopened.part("ppt/slides/slide1.xml"),
            Some(slides[0].as_bytes())
        );
    }

    #[test]
    fn test_missing_slide_part() {
        let mut package = Package::from_reader(Cursor::new(deck_bytes(&[slide_xml(&[])]))).unwrap();
        let rels = package
            .part_str("ppt/_rels/presentation.xml.rels")
            .unwrap()
            .replace("slides/slide1.xml", "slides/slide7.xml");
        package
            .replace_part("ppt/_rels/presentation.xml.rels", rels.into_bytes())
            .unwrap();

        let err = Deck::from_package(package).unwrap_err();
        assert!(matches!(err, Error::InvalidTemplate(_)));
    }
}
