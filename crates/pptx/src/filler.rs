//! Filling a slide template with a recipient's name.

use crate::deck::Deck;
use cert_core::{Error, Result};
use std::path::{Path, PathBuf};

/// Writes personalized copies of a template deck.
#[derive(Debug, Clone)]
pub struct TemplateFiller {
    template: PathBuf,
    placeholder: String,
}

/// What a single fill did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FillReport {
    pub replacements: usize,
}

/// A paragraph whose placeholder is split across runs and will not be
/// replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitPlaceholder {
    pub slide: usize,
    pub shape: String,
    pub text: String,
}

/// Placeholder usage found in a template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateReport {
    pub slides: usize,
    /// Occurrences that will be replaced.
    pub run_matches: usize,
    pub split: Vec<SplitPlaceholder>,
}

impl TemplateFiller {
    /// Create a filler. The placeholder must not be empty.
    pub fn new(template: impl Into<PathBuf>, placeholder: impl Into<String>) -> Result<Self> {
        let placeholder = placeholder.into();
        if placeholder.is_empty() {
            return Err(Error::ConfigError("placeholder must not be empty".to_string()));
        }
        Ok(Self {
            template: template.into(),
            placeholder,
        })
    }

    pub fn template(&self) -> &Path {
        &self.template
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    /// Write a copy of the template to `output` with the placeholder
    /// replaced by `full_name` in every run.
    ///
    /// The template is opened afresh on every call and never written.
    pub fn fill(&self, full_name: &str, output: &Path) -> Result<FillReport> {
        if same_file(&self.template, output) {
            return Err(Error::InvalidTemplate(format!(
                "output {} would overwrite the template",
                output.display()
            )));
        }

        let mut deck = Deck::open(&self.template)?;
        let replacements = deck.replace_in_runs(&self.placeholder, full_name)?;
        deck.save(output)?;

        log::debug!(
            "Wrote {} with {} replacement(s)",
            output.display(),
            replacements
        );
        Ok(FillReport { replacements })
    }

    /// Count replaceable placeholders and find ones split across runs.
    pub fn inspect(&self) -> Result<TemplateReport> {
        let deck = Deck::open(&self.template)?;
        let slides = deck.slides()?;
        let mut report = TemplateReport {
            slides: slides.len(),
            ..Default::default()
        };

        for slide in &slides {
            for shape in &slide.shapes {
                let Some(frame) = shape.text_frame.as_ref() else {
                    continue;
                };
                for paragraph in &frame.paragraphs {
                    let in_runs: usize = paragraph
                        .runs
                        .iter()
                        .map(|r| r.text.matches(self.placeholder.as_str()).count())
                        .sum();
                    let text = paragraph.text();
                    let joined = text.matches(self.placeholder.as_str()).count();

                    report.run_matches += in_runs;
                    if joined > in_runs {
                        report.split.push(SplitPlaceholder {
                            slide: slide.number,
                            shape: shape.name.clone(),
                            text,
                        });
                    }
                }
            }
        }

        Ok(report)
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{slide_xml, text_shape, write_deck};

    fn runs_of(path: &Path) -> Vec<String> {
        Deck::open(path)
            .unwrap()
            .slides()
            .unwrap()
            .iter()
            .flat_map(|s| s.runs().map(|r| r.text.clone()).collect::<Vec<_>>())
            .collect()
    }

    #[test]
    fn test_fill_replaces_every_occurrence() {
        let tmp = tempfile::tempdir().unwrap();
        let template = tmp.path().join("coupon.pptx");
        write_deck(
            &template,
            &[slide_xml(&[text_shape("Name", &[&["{{NAME}} and {{NAME}}"]])])],
        );

        let filler = TemplateFiller::new(&template, "{{NAME}}").unwrap();
        let out = tmp.path().join("Ana_Ruiz.pptx");
        let report = filler.fill("Ana Ruiz", &out).unwrap();

        assert_eq!(report.replacements, 2);
        assert_eq!(runs_of(&out), vec!["Ana Ruiz and Ana Ruiz"]);
    }

    #[test]
    fn test_fill_does_not_touch_template() {
        let tmp = tempfile::tempdir().unwrap();
        let template = tmp.path().join("coupon.pptx");
        write_deck(&template, &[slide_xml(&[text_shape("Name", &[&["{{NAME}}"]])])]);
        let before = std::fs::read(&template).unwrap();
        let modified = std::fs::metadata(&template).unwrap().modified().unwrap();

        let filler = TemplateFiller::new(&template, "{{NAME}}").unwrap();
        filler.fill("Ana Ruiz", &tmp.path().join("a.pptx")).unwrap();
        filler.fill("Leo Diaz", &tmp.path().join("b.pptx")).unwrap();

        assert_eq!(std::fs::read(&template).unwrap(), before);
        assert_eq!(
            std::fs::metadata(&template).unwrap().modified().unwrap(),
            modified
        );
        assert_eq!(runs_of(&tmp.path().join("b.pptx")), vec!["Leo Diaz"]);
    }

    #[test]
    fn test_fill_without_placeholder_keeps_text() {
        let tmp = tempfile::tempdir().unwrap();
        let template = tmp.path().join("plain.pptx");
        write_deck(
            &template,
            &[slide_xml(&[text_shape("Title", &[&["Certificate", " of merit"], &["2024"]])])],
        );

        let filler = TemplateFiller::new(&template, "{{NAME}}").unwrap();
        let out = tmp.path().join("out.pptx");
        let report = filler.fill("Ana Ruiz", &out).unwrap();

        assert_eq!(report.replacements, 0);
        assert_eq!(runs_of(&out), runs_of(&template));
    }

    #[test]
    fn test_fill_refuses_template_as_output() {
        let tmp = tempfile::tempdir().unwrap();
        let template = tmp.path().join("coupon.pptx");
        write_deck(&template, &[slide_xml(&[])]);

        let filler = TemplateFiller::new(&template, "{{NAME}}").unwrap();
        let err = filler
            .fill("Ana", &tmp.path().join(".").join("coupon.pptx"))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidTemplate(_)));
    }

    #[test]
    fn test_missing_template() {
        let tmp = tempfile::tempdir().unwrap();
        let filler = TemplateFiller::new(tmp.path().join("missing.pptx"), "{{NAME}}").unwrap();

        let err = filler.fill("Ana", &tmp.path().join("out.pptx")).unwrap_err();
        assert!(matches!(err, Error::IoError(_)));
        assert!(!tmp.path().join("out.pptx").exists());
    }

    #[test]
    fn test_empty_placeholder_rejected() {
        assert!(TemplateFiller::new("coupon.pptx", "").is_err());
    }

    #[test]
    fn test_inspect_reports_split_placeholder() {
        let tmp = tempfile::tempdir().unwrap();
        let template = tmp.path().join("coupon.pptx");
        write_deck(
            &template,
            &[
                slide_xml(&[text_shape("Name", &[&["{{NAME}}"]])]),
                slide_xml(&[text_shape("Footer", &[&["Signed: {{NA", "ME}}"]])]),
            ],
        );

        let report = TemplateFiller::new(&template, "{{NAME}}")
            .unwrap()
            .inspect()
            .unwrap();

        assert_eq!(report.slides, 2);
        assert_eq!(report.run_matches, 1);
        assert_eq!(
            report.split,
            vec![SplitPlaceholder {
                slide: 2,
                shape: "Footer".to_string(),
                text: "Signed: {{NAME}}".to_string(),
            }]
        );
    }
}
