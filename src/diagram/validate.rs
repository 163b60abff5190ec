//! Structural validation of ER markup.
//!
//! The validator never changes the markup and never fails; it returns a
//! [`ValidationReport`] whose `is_valid` is false only when at least one
//! error-severity [`DiagramIssue`] was found.

use super::emit::HEADER;
use super::glyph::{parse_relationship, SEPARATORS};
use super::repair::first_unquoted_brace;
use crate::config::DiagramConfig;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

static ENTITY_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][\w-]*$").expect("entity name regex is valid"));

static ATTRIBUTE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^[A-Za-z][\w()\[\],.-]*\s+[A-Za-z_*][\w-]*(?:\s+(?:PK|FK|UK)(?:\s*,\s*(?:PK|FK|UK))*)?(?:\s+"[^"]*")?$"#)
        .expect("attribute regex is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// Every defect the validator knows about
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueKind {
    MissingHeader,
    DuplicateHeader,
    UnmatchedOpen { block: String },
    UnmatchedClose,
    DuplicateBlock { block: String },
    NestedBlock { block: String, parent: String },
    UnnamedBlock,
    InvalidBlockName { block: String },
    GluedMarkers,
    RelationshipInBlock { block: String },
    MissingOperator,
    InvalidOperator { operator: String },
    OperatorSpacing,
    UnknownEntity { entity: String },
    MissingLabel { source: String, target: String },
    UnquotedLabel,
    UnrecognizedAttribute { text: String },
    UnrecognizedLine { text: String },
    TooManyEntities { count: usize, limit: usize },
    TooManyRelationships { count: usize, limit: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramIssue {
    /// 1-based line number, if the issue belongs to one line
    pub line: Option<usize>,
    pub kind: IssueKind,
}

impl DiagramIssue {
    fn at(line: usize, kind: IssueKind) -> Self {
        Self {
            line: Some(line),
            kind,
        }
    }

    fn global(kind: IssueKind) -> Self {
        Self { line: None, kind }
    }

    pub fn severity(&self) -> Severity {
        match self.kind {
            IssueKind::DuplicateHeader
            | IssueKind::UnquotedLabel
            | IssueKind::UnrecognizedAttribute { .. }
            | IssueKind::UnrecognizedLine { .. }
            | IssueKind::TooManyEntities { .. }
            | IssueKind::TooManyRelationships { .. } => Severity::Warning,
            _ => Severity::Error,
        }
    }

    pub fn message(&self) -> String {
        match &self.kind {
            IssueKind::MissingHeader => format!("Missing '{}' header", HEADER),
            IssueKind::DuplicateHeader => format!("Repeated '{}' header", HEADER),
            IssueKind::UnmatchedOpen { block } => {
                format!("Block '{}' has an unmatched '{{' (never closed)", block)
            }
            IssueKind::UnmatchedClose => "Found an unmatched '}' with no open block".to_string(),
            IssueKind::DuplicateBlock { block } => format!("Duplicate block definition '{}'", block),
            IssueKind::NestedBlock { block, parent } => {
                format!("Block '{}' is opened inside block '{}'", block, parent)
            }
            IssueKind::UnnamedBlock => "Block opener without an entity name".to_string(),
            IssueKind::InvalidBlockName { block } => format!("Invalid entity name '{}'", block),
            IssueKind::GluedMarkers => {
                "Block markers share a line with other content".to_string()
            }
            IssueKind::RelationshipInBlock { block } => {
                format!("Relationship line inside block '{}'", block)
            }
            IssueKind::MissingOperator => {
                "Relationship has no '--' between its cardinality markers".to_string()
            }
            IssueKind::InvalidOperator { operator } => {
                format!("Invalid relationship operator '{}'", operator)
            }
            IssueKind::OperatorSpacing => {
                "Relationship operator must be surrounded by single spaces".to_string()
            }
            IssueKind::UnknownEntity { entity } => {
                format!("Relationship references unknown entity '{}'", entity)
            }
            IssueKind::MissingLabel { source, target } => {
                format!("Relationship between '{}' and '{}' has no label", source, target)
            }
            IssueKind::UnquotedLabel => "Relationship label is not double-quoted".to_string(),
            IssueKind::UnrecognizedAttribute { text } => {
                format!("Unrecognized attribute line '{}'", text)
            }
            IssueKind::UnrecognizedLine { text } => format!("Unrecognized line '{}'", text),
            IssueKind::TooManyEntities { count, limit } => format!(
                "{} entity blocks exceed the recommended maximum of {}; the diagram may render poorly",
                count, limit
            ),
            IssueKind::TooManyRelationships { count, limit } => format!(
                "{} relationships exceed the recommended maximum of {}; the diagram may render poorly",
                count, limit
            ),
        }
    }

    /// Suggested fix for errors the user can act on
    pub fn fix(&self) -> Option<String> {
        let fix = match &self.kind {
            IssueKind::MissingHeader => format!("add '{}' as the first line", HEADER),
            IssueKind::UnmatchedOpen { block } => format!("add a closing '}}' after the attributes of '{}'", block),
            IssueKind::UnmatchedClose => "remove the stray '}' or add the missing block opener".to_string(),
            IssueKind::DuplicateBlock { block } => format!("merge the attributes of '{}' into one block", block),
            IssueKind::NestedBlock { .. } | IssueKind::RelationshipInBlock { .. } => {
                "close the previous block with '}' first".to_string()
            }
            IssueKind::UnnamedBlock => "put the entity name before '{'".to_string(),
            IssueKind::GluedMarkers => "put '{' at the end of its line and '}' on a line of its own".to_string(),
            IssueKind::MissingOperator | IssueKind::InvalidOperator { .. } => {
                "use '--' between the cardinality markers, e.g. ||--o{".to_string()
            }
            IssueKind::OperatorSpacing => "write relationships as 'a ||--o{ b : \"label\"'".to_string(),
            IssueKind::UnknownEntity { entity } => format!("define a block for '{}'", entity),
            IssueKind::MissingLabel { .. } => "append a label such as ': \"relates to\"'".to_string(),
            _ => return None,
        };
        Some(format!("Fix: {}", fix))
    }
}

impl fmt::Display for DiagramIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "Line {}: {}", line, self.message()),
            None => f.write_str(&self.message()),
        }
    }
}

/// Outcome of validating one piece of markup.
///
/// `errors` holds one line per error, each optionally followed by a
/// `Fix:` line; `warnings` holds one line per warning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    #[serde(skip)]
    pub issues: Vec<DiagramIssue>,
}

impl ValidationReport {
    fn from_issues(issues: Vec<DiagramIssue>) -> Self {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();
        for issue in &issues {
            match issue.severity() {
                Severity::Error => {
                    errors.push(issue.to_string());
                    if let Some(fix) = issue.fix() {
                        errors.push(fix);
                    }
                }
                Severity::Warning => warnings.push(issue.to_string()),
            }
        }
        Self {
            is_valid: !issues.iter().any(|i| i.severity() == Severity::Error),
            errors,
            warnings,
            issues,
        }
    }

    /// Number of errors, not counting `Fix:` lines
    pub fn error_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity() == Severity::Error)
            .count()
    }

    pub fn has_issue(&self, predicate: impl Fn(&IssueKind) -> bool) -> bool {
        self.issues.iter().any(|i| predicate(&i.kind))
    }
}

/// Validate with the default thresholds
pub fn validate(markup: &str) -> ValidationReport {
    validate_with(markup, &DiagramConfig::default())
}

struct RelationshipRef {
    line: usize,
    source: String,
    target: String,
}

/// Validate with the block and relationship thresholds from `config`
pub fn validate_with(markup: &str, config: &DiagramConfig) -> ValidationReport {
    let mut issues = Vec::new();
    let mut header_seen = false;
    let mut stack: Vec<(String, usize)> = Vec::new();
    let mut blocks: HashSet<String> = HashSet::new();
    let mut block_count = 0usize;
    let mut relationships: Vec<RelationshipRef> = Vec::new();

    for (idx, raw) in markup.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with("%%") {
            continue;
        }

        if line == HEADER {
            if header_seen {
                issues.push(DiagramIssue::at(line_no, IssueKind::DuplicateHeader));
            }
            header_seen = true;
            continue;
        }
        if !header_seen {
            issues.push(DiagramIssue::at(line_no, IssueKind::MissingHeader));
            // report once
            header_seen = true;
        }

        if let Some(rel) = parse_relationship(line) {
            if let Some((block, _)) = stack.last() {
                issues.push(DiagramIssue::at(
                    line_no,
                    IssueKind::RelationshipInBlock {
                        block: block.clone(),
                    },
                ));
            }
            match rel.separator {
                None => issues.push(DiagramIssue::at(line_no, IssueKind::MissingOperator)),
                Some(sep) if !SEPARATORS.contains(&sep) => issues.push(DiagramIssue::at(
                    line_no,
                    IssueKind::InvalidOperator {
                        operator: sep.to_string(),
                    },
                )),
                Some(_) => {}
            }
            if !rel.spaced_outside || rel.spaced_inside {
                issues.push(DiagramIssue::at(line_no, IssueKind::OperatorSpacing));
            }
            match rel.label {
                None => issues.push(DiagramIssue::at(
                    line_no,
                    IssueKind::MissingLabel {
                        source: rel.source.to_string(),
                        target: rel.target.to_string(),
                    },
                )),
                Some(_) if !rel.label_is_quoted() => {
                    issues.push(DiagramIssue::at(line_no, IssueKind::UnquotedLabel))
                }
                Some(_) => {}
            }
            relationships.push(RelationshipRef {
                line: line_no,
                source: rel.source.to_string(),
                target: rel.target.to_string(),
            });
            continue;
        }

        if let Some(first) = first_unquoted_brace(line) {
            check_block_markers(line, line_no, first, &mut stack, &mut blocks, &mut block_count, &mut issues);
            continue;
        }

        if stack.is_empty() {
            issues.push(DiagramIssue::at(
                line_no,
                IssueKind::UnrecognizedLine {
                    text: line.to_string(),
                },
            ));
        } else if !ATTRIBUTE_RE.is_match(line) {
            issues.push(DiagramIssue::at(
                line_no,
                IssueKind::UnrecognizedAttribute {
                    text: line.to_string(),
                },
            ));
        }
    }

    if !header_seen {
        issues.push(DiagramIssue::global(IssueKind::MissingHeader));
    }
    for (block, line_no) in stack {
        issues.push(DiagramIssue::at(line_no, IssueKind::UnmatchedOpen { block }));
    }
    for rel in &relationships {
        for entity in [&rel.source, &rel.target] {
            if !blocks.contains(entity) {
                issues.push(DiagramIssue::at(
                    rel.line,
                    IssueKind::UnknownEntity {
                        entity: entity.clone(),
                    },
                ));
            }
        }
    }
    if block_count > config.max_entities {
        issues.push(DiagramIssue::global(IssueKind::TooManyEntities {
            count: block_count,
            limit: config.max_entities,
        }));
    }
    if relationships.len() > config.max_relationships {
        issues.push(DiagramIssue::global(IssueKind::TooManyRelationships {
            count: relationships.len(),
            limit: config.max_relationships,
        }));
    }

    let report = ValidationReport::from_issues(issues);
    log::debug!(
        "validated markup: {} error(s), {} warning(s)",
        report.error_count(),
        report.warnings.len()
    );
    report
}

/// Walk every brace on a non-relationship line, keeping the block stack
fn check_block_markers(
    line: &str,
    line_no: usize,
    first: (usize, char),
    stack: &mut Vec<(String, usize)>,
    blocks: &mut HashSet<String>,
    block_count: &mut usize,
    issues: &mut Vec<DiagramIssue>,
) {
    let canonical_opener = first.1 == '{' && first.0 == line.len() - 1;
    let canonical_closer = line == "}";
    if !canonical_opener && !canonical_closer {
        issues.push(DiagramIssue::at(line_no, IssueKind::GluedMarkers));
    }

    let mut rest = line;
    while let Some((i, brace)) = first_unquoted_brace(rest) {
        let before = rest[..i].trim();
        if brace == '{' {
            open_block(before, line_no, stack, blocks, block_count, issues);
        } else if stack.pop().is_none() {
            issues.push(DiagramIssue::at(line_no, IssueKind::UnmatchedClose));
        }
        rest = &rest[i + 1..];
    }
}

fn open_block(
    name: &str,
    line_no: usize,
    stack: &mut Vec<(String, usize)>,
    blocks: &mut HashSet<String>,
    block_count: &mut usize,
    issues: &mut Vec<DiagramIssue>,
) {
    if name.is_empty() {
        issues.push(DiagramIssue::at(line_no, IssueKind::UnnamedBlock));
    } else if !ENTITY_NAME_RE.is_match(name) {
        issues.push(DiagramIssue::at(
            line_no,
            IssueKind::InvalidBlockName {
                block: name.to_string(),
            },
        ));
    }
    if let Some((parent, _)) = stack.last() {
        issues.push(DiagramIssue::at(
            line_no,
            IssueKind::NestedBlock {
                block: name.to_string(),
                parent: parent.clone(),
            },
        ));
    }
    if !name.is_empty() && !blocks.insert(name.to_string()) {
        issues.push(DiagramIssue::at(
            line_no,
            IssueKind::DuplicateBlock {
                block: name.to_string(),
            },
        ));
    }
    *block_count += 1;
    stack.push((name.to_string(), line_no));
}
