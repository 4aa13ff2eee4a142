//! Batch orchestration: one deck per roster record, then conversions.

use anyhow::{Context, Result};
use cert_core::{
    deck_file_name, file_token, BatchConfig, CleanupOutcome, ConversionJob, Converter,
    FormatConverter, OutputFormat, RosterRecord,
};
use cert_pptx::TemplateFiller;
use std::path::PathBuf;

/// Counters for the closing log line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub records: usize,
    pub conversions: usize,
    pub deleted: usize,
    pub cleanup_failures: usize,
}

/// Drives the filler and converter over a roster, strictly in order.
pub struct Batch<'a, C> {
    config: &'a BatchConfig,
    filler: &'a TemplateFiller,
    converter: FormatConverter<C>,
    formats: Vec<OutputFormat>,
}

impl<'a, C: Converter> Batch<'a, C> {
    pub fn new(config: &'a BatchConfig, filler: &'a TemplateFiller, converter: C) -> Self {
        Self {
            config,
            filler,
            converter: FormatConverter::new(converter),
            formats: config.enabled_formats(),
        }
    }

    /// Process every record. The first fill or conversion error aborts
    /// the run; files written for earlier records stay on disk.
    pub fn run(&self, records: &[RosterRecord]) -> Result<BatchSummary> {
        let decks_dir = &self.config.output_dirs.decks;
        std::fs::create_dir_all(decks_dir)
            .with_context(|| format!("Failed to create deck directory: {}", decks_dir.display()))?;

        let mut summary = BatchSummary::default();
        for record in records {
            self.process(record, &mut summary)?;
            summary.records += 1;
        }

        Ok(summary)
    }

    fn process(&self, record: &RosterRecord, summary: &mut BatchSummary) -> Result<()> {
        let full_name = record.display_name();
        let deck_path = self.deck_path(&full_name);

        println!("Generating PPTX for {}", full_name);
        self.filler
            .fill(&full_name, &deck_path)
            .with_context(|| format!("Failed to generate deck for {}", full_name))?;

        if self.formats.is_empty() {
            return Ok(());
        }

        for &format in &self.formats {
            println!("  -> Converting to {}", format.label());
            let job = ConversionJob::new(
                &deck_path,
                self.config.output_dirs.for_format(format),
                format,
            );
            self.converter
                .convert(&job)
                .with_context(|| format!("Failed to convert deck for {}", full_name))?;
            summary.conversions += 1;
        }

        match self.converter.remove_intermediate(&deck_path) {
            CleanupOutcome::Deleted => {
                println!("Deleted PPTX: {}", deck_path.display());
                summary.deleted += 1;
            }
            CleanupOutcome::Failed => summary.cleanup_failures += 1,
        }

        Ok(())
    }

    fn deck_path(&self, full_name: &str) -> PathBuf {
        let token = file_token(full_name);
        self.config
            .output_dirs
            .decks
            .join(deck_file_name(&self.config.file_prefix, &token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cert_core::{Error, OutputDirs};
    use cert_pptx::testing::{slide_xml, text_shape, write_deck};
    use cert_pptx::Deck;
    use std::cell::RefCell;
    use std::path::Path;
    use tempfile::TempDir;

    /// Records jobs and writes a stand-in output file for each.
    #[derive(Default)]
    struct FakeConverter {
        jobs: RefCell<Vec<ConversionJob>>,
        fail_on_call: Option<usize>,
        consume_source: bool,
    }

    impl Converter for FakeConverter {
        fn convert(&self, job: &ConversionJob) -> cert_core::Result<()> {
            self.jobs.borrow_mut().push(job.clone());
            if self.fail_on_call == Some(self.jobs.borrow().len()) {
                return Err(Error::ConversionFailed {
                    path: job.source.display().to_string(),
                    code: Some(1),
                });
            }

            let stem = job.source.file_stem().unwrap_or_default();
            let out = job
                .out_dir
                .join(stem)
                .with_extension(job.format.as_str());
            std::fs::write(out, b"converted")?;
            if self.consume_source {
                std::fs::remove_file(&job.source)?;
            }
            Ok(())
        }
    }

    struct Fixture {
        tmp: TempDir,
        config: BatchConfig,
        filler: TemplateFiller,
    }

    impl Fixture {
        fn new(pdf: bool, png: bool) -> Self {
            let tmp = tempfile::tempdir().unwrap();
            let template = tmp.path().join("coupon.pptx");
            write_deck(
                &template,
                &[slide_xml(&[text_shape("Name", &[&["Awarded to {{NAME}}"]])])],
            );

            let config = BatchConfig {
                template_path: template.clone(),
                output_dirs: OutputDirs {
                    decks: tmp.path().join("out_pptx"),
                    pdf: tmp.path().join("out_pdf"),
                    png: tmp.path().join("out_png"),
                },
                convert_to_pdf: pdf,
                convert_to_png: png,
                ..Default::default()
            };
            let filler = TemplateFiller::new(&template, &config.placeholder).unwrap();

            Self {
                tmp,
                config,
                filler,
            }
        }

        fn path(&self, rel: &str) -> PathBuf {
            self.tmp.path().join(rel)
        }
    }

    fn records() -> Vec<RosterRecord> {
        vec![
            RosterRecord::new("Ana", "Ruiz"),
            RosterRecord::new("  Leo ", "Diaz "),
            RosterRecord::new("AC/DC", "Band"),
        ]
    }

    fn file_count(dir: &Path) -> usize {
        std::fs::read_dir(dir).map(|d| d.count()).unwrap_or(0)
    }

    #[test]
    fn test_no_conversion_keeps_decks() {
        let fx = Fixture::new(false, false);
        let converter = FakeConverter::default();

        let summary = Batch::new(&fx.config, &fx.filler, &converter)
            .run(&records())
            .unwrap();

        assert_eq!(summary.records, 3);
        assert_eq!(summary.deleted, 0);
        assert!(converter.jobs.borrow().is_empty());
        assert_eq!(file_count(&fx.path("out_pptx")), 3);
        assert!(fx.path("out_pptx/Leo_Diaz.pptx").exists());
        assert!(fx.path("out_pptx/AC-DC_Band.pptx").exists());
        assert!(!fx.path("out_pdf").exists());

        let deck = Deck::open(&fx.path("out_pptx/Ana_Ruiz.pptx")).unwrap();
        let slides = deck.slides().unwrap();
        assert_eq!(slides[0].runs().next().unwrap().text, "Awarded to Ana Ruiz");
    }

    #[test]
    fn test_prefix_in_file_names() {
        let mut fx = Fixture::new(false, false);
        fx.config.file_prefix = "cert_".to_string();

        Batch::new(&fx.config, &fx.filler, FakeConverter::default())
            .run(&records()[..1])
            .unwrap();

        assert!(fx.path("out_pptx/cert_Ana_Ruiz.pptx").exists());
    }

    #[test]
    fn test_conversion_deletes_deck() {
        let fx = Fixture::new(false, true);
        let converter = FakeConverter::default();

        let summary = Batch::new(&fx.config, &fx.filler, &converter)
            .run(&records())
            .unwrap();

        assert_eq!(summary.conversions, 3);
        assert_eq!(summary.deleted, 3);
        assert_eq!(file_count(&fx.path("out_pptx")), 0);
        assert!(fx.path("out_png/Ana_Ruiz.png").exists());

        let jobs = converter.jobs.borrow();
        assert_eq!(jobs[1].source, fx.path("out_pptx/Leo_Diaz.pptx"));
        assert_eq!(jobs[1].out_dir, fx.path("out_png"));
        assert_eq!(jobs[1].format, OutputFormat::Png);
    }

    #[test]
    fn test_both_formats_convert_before_delete() {
        let fx = Fixture::new(true, true);
        let converter = FakeConverter::default();

        let summary = Batch::new(&fx.config, &fx.filler, &converter)
            .run(&records()[..1])
            .unwrap();

        let formats: Vec<OutputFormat> = converter.jobs.borrow().iter().map(|j| j.format).collect();
        assert_eq!(formats, vec![OutputFormat::Pdf, OutputFormat::Png]);
        assert_eq!(summary.deleted, 1);
        assert!(fx.path("out_pdf/Ana_Ruiz.pdf").exists());
        assert!(fx.path("out_png/Ana_Ruiz.png").exists());
        assert!(!fx.path("out_pptx/Ana_Ruiz.pptx").exists());
    }

    #[test]
    fn test_conversion_failure_aborts_batch() {
        let fx = Fixture::new(true, false);
        let converter = FakeConverter {
            fail_on_call: Some(2),
            ..Default::default()
        };

        let err = Batch::new(&fx.config, &fx.filler, &converter)
            .run(&records())
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::ConversionFailed { .. })
        ));
        // Third record never started; first one's output stays
        assert_eq!(converter.jobs.borrow().len(), 2);
        assert!(fx.path("out_pdf/Ana_Ruiz.pdf").exists());
        assert!(fx.path("out_pptx/Leo_Diaz.pptx").exists());
        assert!(!fx.path("out_pptx/AC-DC_Band.pptx").exists());
    }

    #[test]
    fn test_cleanup_failure_continues() {
        let fx = Fixture::new(true, false);
        let converter = FakeConverter {
            consume_source: true,
            ..Default::default()
        };

        let summary = Batch::new(&fx.config, &fx.filler, &converter)
            .run(&records())
            .unwrap();

        assert_eq!(summary.records, 3);
        assert_eq!(summary.cleanup_failures, 3);
        assert_eq!(summary.deleted, 0);
        assert_eq!(converter.jobs.borrow().len(), 3);
    }

    #[test]
    fn test_duplicate_names_overwrite() {
        let fx = Fixture::new(false, false);
        let roster = vec![RosterRecord::new("Ana", "Ruiz"), RosterRecord::new("Ana ", " Ruiz")];

        let summary = Batch::new(&fx.config, &fx.filler, FakeConverter::default())
            .run(&roster)
            .unwrap();

        assert_eq!(summary.records, 2);
        assert_eq!(file_count(&fx.path("out_pptx")), 1);
    }

    #[test]
    fn test_missing_template_is_fatal() {
        let fx = Fixture::new(false, false);
        std::fs::remove_file(fx.filler.template()).unwrap();

        let err = Batch::new(&fx.config, &fx.filler, FakeConverter::default())
            .run(&records())
            .unwrap_err();

        assert!(err.to_string().contains("Ana Ruiz"));
        assert_eq!(file_count(&fx.path("out_pptx")), 0);
    }
}
