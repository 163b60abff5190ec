//! # erscribe
//!
//! Rule-based inference of relational schemas and ER diagrams from
//! natural-language requirement text.
//!
//! The pipeline has three stages:
//!
//! 1. [`extract`] turns text into candidate entities, attributes and
//!    relationships.
//! 2. [`synthesize`] turns candidates into a normalized [`Schema`] with
//!    primary keys, foreign keys and junction tables.
//! 3. [`diagram`] serializes the schema as Mermaid `erDiagram` markup,
//!    auto-repairs it and validates it.
//!
//! None of the stages fail; degraded input gives degraded (possibly empty)
//! output. [`Pipeline`] runs all three with an explicit [`PipelineConfig`].
//!
//! ```
//! let output = erscribe::run(
//!     "A student enrolls in many courses and each course has many students.",
//! );
//! assert!(output.schema.has_table("student_course"));
//! assert!(output.diagram.report.is_valid);
//! ```

pub mod config;
pub mod diagram;
pub mod error;
pub mod extract;
pub mod pipeline;
pub mod schema;
pub mod synthesize;

pub use config::PipelineConfig;
pub use diagram::{auto_repair, emit, render, validate, RenderedDiagram, ValidationReport};
pub use error::{ConfigError, SchemaError, SourceError};
pub use extract::{extract, Extraction, RuleBasedExtractor};
pub use pipeline::{run, ConceptSource, Pipeline, PipelineOutput};
pub use schema::Schema;
pub use synthesize::{synthesize, synthesize_with_report, SynthesisOptions, SynthesisReport};
