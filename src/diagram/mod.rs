//! ER diagram emission, repair and validation.
//!
//! [`render`] is the usual entry point: it serializes a schema with [`emit`],
//! runs [`auto_repair`] over the result unconditionally, validates the
//! repaired markup and, when configured, appends the findings as `%%`
//! comment lines. Validation never blocks output.

mod emit;
mod glyph;
mod repair;
mod validate;

pub use emit::emit;
pub use glyph::glyph;
pub use repair::auto_repair;
pub use validate::{validate, validate_with, DiagramIssue, IssueKind, Severity, ValidationReport};

use crate::config::DiagramConfig;
use crate::schema::Schema;
use serde::Serialize;

/// Repaired markup plus the validation findings for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedDiagram {
    pub markup: String,
    pub report: ValidationReport,
}

pub fn render(schema: &Schema, config: &DiagramConfig) -> RenderedDiagram {
    let repaired = auto_repair(&emit(schema));
    let report = validate_with(&repaired, config);
    if !report.is_valid {
        log::warn!(
            "diagram for '{}' still has {} structural error(s) after repair",
            schema.name,
            report.error_count()
        );
    }
    let markup = if config.annotate {
        annotate(&repaired, &report)
    } else {
        repaired
    };
    RenderedDiagram { markup, report }
}

/// Append a validation report to markup as `%%` comment lines.
///
/// A clean report leaves the markup untouched.
pub fn annotate(markup: &str, report: &ValidationReport) -> String {
    if report.errors.is_empty() && report.warnings.is_empty() {
        return markup.to_string();
    }
    let mut out = markup.trim_end_matches('\n').to_string();
    out.push_str("\n\n");
    for line in &report.errors {
        out.push_str(&format!("%% ERROR: {}\n", line));
    }
    for line in &report.warnings {
        out.push_str(&format!("%% WARNING: {}\n", line));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Column, Table};

    fn wide_schema(tables: usize) -> Schema {
        let mut schema = Schema::new("Wide", "");
        for i in 0..tables {
            let mut table = Table::new(format!("t{}", i));
            table.add_column(Column::new("id", "INTEGER").primary_key());
            schema.tables.push(table);
        }
        schema
    }

    #[test]
    fn test_render_clean_schema() {
        let rendered = render(&wide_schema(2), &DiagramConfig::default());
        assert!(rendered.report.is_valid);
        assert!(!rendered.markup.contains("%%"));
        assert_eq!(auto_repair(&rendered.markup), rendered.markup);
    }

    #[test]
    fn test_render_annotates_warnings() {
        let rendered = render(&wide_schema(21), &DiagramConfig::default());
        assert!(rendered.report.is_valid);
        assert_eq!(rendered.report.warnings.len(), 1);
        assert!(rendered.markup.contains("%% WARNING: 21 entity blocks"));
        // annotations are comments, so the markup stays valid
        assert!(validate(&rendered.markup).is_valid);
    }

    #[test]
    fn test_annotation_can_be_disabled() {
        let config = DiagramConfig {
            annotate: false,
            ..DiagramConfig::default()
        };
        let rendered = render(&wide_schema(21), &config);
        assert!(!rendered.markup.contains("%%"));
        assert_eq!(rendered.report.warnings.len(), 1);
    }

    #[test]
    fn test_annotate_errors_with_fix_lines() {
        let markup = "erDiagram\n    a {\n";
        let report = validate(markup);
        let annotated = annotate(markup, &report);
        assert!(annotated.contains("%% ERROR: Line 2: Block 'a' has an unmatched"));
        assert!(annotated.contains("%% ERROR: Fix:"));
    }
}
