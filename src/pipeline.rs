//! End-to-end pipeline: text to extraction, schema and diagram.
//!
//! A [`Pipeline`] owns an explicit [`PipelineConfig`] and, optionally, an
//! external [`ConceptSource`]. When the configured backend is
//! [`ExtractionBackend::External`] and a source is attached, the source is
//! tried first; any [`SourceError`] is logged and the built-in rule-based
//! extractor takes over. The pipeline itself never fails.

use crate::config::{ExtractionBackend, PipelineConfig};
use crate::diagram::{self, RenderedDiagram};
use crate::error::SourceError;
use crate::extract::{Extraction, RuleBasedExtractor};
use crate::schema::Schema;
use crate::synthesize::{self, SynthesisOptions, SynthesisReport};
use serde::Serialize;

/// An external extraction backend
pub trait ConceptSource: Send + Sync {
    /// Short name used in logs and errors
    fn name(&self) -> &str;

    fn extract_concepts(&self, text: &str) -> Result<Extraction, SourceError>;
}

/// Everything one pipeline run produces
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineOutput {
    pub extraction: Extraction,
    pub schema: Schema,
    pub report: SynthesisReport,
    pub diagram: RenderedDiagram,
}

pub struct Pipeline {
    config: PipelineConfig,
    extractor: RuleBasedExtractor,
    source: Option<Box<dyn ConceptSource>>,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("config", &self.config)
            .field("source", &self.source.as_ref().map(|s| s.name().to_string()))
            .finish_non_exhaustive()
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            extractor: RuleBasedExtractor::from_config(&config.extraction),
            config,
            source: None,
        }
    }

    /// Attach an external concept source
    pub fn with_source(mut self, source: impl ConceptSource + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Stage 1: extract candidate concepts
    pub fn extract(&self, text: &str) -> Extraction {
        #[cfg(feature = "tracing")]
        let _span = tracing::info_span!("extract", bytes = text.len()).entered();

        if self.config.extraction.backend == ExtractionBackend::External {
            match &self.source {
                Some(source) => match source.extract_concepts(text) {
                    Ok(extraction) => {
                        log::debug!("concepts supplied by external source '{}'", source.name());
                        return extraction;
                    }
                    Err(e) => {
                        log::warn!("{}; falling back to rule-based extraction", e);
                    }
                },
                None => {
                    log::warn!("external backend configured but no source attached; using rule-based extraction");
                }
            }
        }
        self.extractor.extract(text)
    }

    /// Stage 2: synthesize a schema
    pub fn synthesize(&self, extraction: &Extraction) -> (Schema, SynthesisReport) {
        #[cfg(feature = "tracing")]
        let _span = tracing::info_span!("synthesize", entities = extraction.entities.len()).entered();

        let options = SynthesisOptions::from_config(&self.config.schema);
        let (schema, report) = synthesize::synthesize_with_report(extraction, &options);
        for dropped in &report.dropped_relationships {
            log::debug!(
                "dropped {} -> {}: {}",
                dropped.source_entity,
                dropped.target_entity,
                dropped.reason
            );
        }
        (schema, report)
    }

    /// Stage 3: emit, repair, validate and annotate the diagram
    pub fn render(&self, schema: &Schema) -> RenderedDiagram {
        #[cfg(feature = "tracing")]
        let _span = tracing::info_span!("render", tables = schema.tables.len()).entered();

        diagram::render(schema, &self.config.diagram)
    }

    pub fn run(&self, text: &str) -> PipelineOutput {
        let extraction = self.extract(text);
        let (schema, report) = self.synthesize(&extraction);
        let diagram = self.render(&schema);
        log::info!(
            "pipeline produced {} table(s); diagram valid: {}",
            schema.tables.len(),
            diagram.report.is_valid
        );
        PipelineOutput {
            extraction,
            schema,
            report,
            diagram,
        }
    }
}

/// Run the default pipeline over `text`
pub fn run(text: &str) -> PipelineOutput {
    Pipeline::default().run(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExtractionConfig;
    use crate::extract::{CandidateEntity, CandidateAttribute};

    struct FixedSource;

    impl ConceptSource for FixedSource {
        fn name(&self) -> &str {
            "fixed"
        }

        fn extract_concepts(&self, _text: &str) -> Result<Extraction, SourceError> {
            Ok(Extraction {
                entities: vec![CandidateEntity {
                    name: "Widget".to_string(),
                    attributes: vec![CandidateAttribute::primary_key("id")],
                    is_weak: false,
                    mention_count: 1,
                }],
                relationships: vec![],
            })
        }
    }

    struct DownSource;

    impl ConceptSource for DownSource {
        fn name(&self) -> &str {
            "down"
        }

        fn extract_concepts(&self, _text: &str) -> Result<Extraction, SourceError> {
            Err(SourceError::Unavailable {
                source_name: "down".to_string(),
                message: "connection refused".to_string(),
            })
        }
    }

    fn external() -> PipelineConfig {
        PipelineConfig {
            extraction: ExtractionConfig {
                backend: ExtractionBackend::External,
                ..ExtractionConfig::default()
            },
            ..PipelineConfig::default()
        }
    }

    const TEXT: &str = "Each order belongs to exactly one customer.";

    #[test]
    fn test_run_default() {
        let output = run(TEXT);
        assert!(output.schema.has_table("order"));
        assert!(output.schema.has_table("customer"));
        assert!(output.diagram.report.is_valid);
        assert!(output.diagram.markup.starts_with("erDiagram\n"));
    }

    #[test]
    fn test_external_source_preferred() {
        let pipeline = Pipeline::new(external()).with_source(FixedSource);
        let output = pipeline.run(TEXT);
        assert_eq!(output.schema.tables.len(), 1);
        assert!(output.schema.has_table("widget"));
    }

    #[test]
    fn test_source_ignored_for_rule_based_backend() {
        let pipeline = Pipeline::default().with_source(FixedSource);
        assert!(!pipeline.run(TEXT).schema.has_table("widget"));
    }

    #[test]
    fn test_failing_source_falls_back() {
        let pipeline = Pipeline::new(external()).with_source(DownSource);
        let output = pipeline.run(TEXT);
        assert!(output.schema.has_table("customer"));
    }

    #[test]
    fn test_external_without_source_falls_back() {
        let output = Pipeline::new(external()).run(TEXT);
        assert!(output.schema.has_table("order"));
    }

    #[test]
    fn test_schema_name_from_config() {
        let mut config = PipelineConfig::default();
        config.schema.default_name = "Shop".to_string();
        assert_eq!(Pipeline::new(config).run(TEXT).schema.name, "Shop");
    }
}
