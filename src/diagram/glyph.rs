//! Relationship glyphs and line-level parsing of ER markup

use crate::extract::Cardinality;
use once_cell::sync::Lazy;
use regex::Regex;

/// Mermaid crow's-foot glyph for a relationship kind.
///
/// An unspecified kind renders as one-to-one.
pub fn glyph(kind: Option<Cardinality>) -> &'static str {
    match kind {
        Some(Cardinality::OneToOne) | None => "||--||",
        Some(Cardinality::OneToMany) => "||--o{",
        Some(Cardinality::ManyToOne) => "}o--||",
        Some(Cardinality::ManyToMany) => "}o--o{",
    }
}

/// Canonical relationship separators; anything else is repaired to `--`
pub(crate) const SEPARATORS: &[&str] = &["--", ".."];

static RELATIONSHIP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^(?P<source>[A-Za-z_][\w-]*?)(?P<ws1>\s*)",
        r"(?P<left>\|o|\|\||\}o|\}\|)",
        r"(?P<ws2>\s*)(?P<sep>-{1,3}|—|–|={1,2}|\.\.)?(?P<ws3>\s*)",
        r"(?P<right>o\||\|\||o\{|\|\{)",
        r#"(?P<ws4>\s*)(?P<target>[A-Za-z_][\w-]*)\s*(?P<colon>:\s*(?P<label>.*?))?\s*$"#,
    ))
    .expect("relationship regex is valid")
});

/// A relationship line split into its parts, exactly as written
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RelationshipLine<'a> {
    pub source: &'a str,
    pub left: &'a str,
    pub separator: Option<&'a str>,
    pub right: &'a str,
    pub target: &'a str,
    /// Text after `:`; `None` if there is no `:` at all
    pub label: Option<&'a str>,
    /// Whitespace between each entity and its marker
    pub spaced_outside: bool,
    /// Whitespace inside the operator (`|| -- o{`)
    pub spaced_inside: bool,
}

impl RelationshipLine<'_> {
    /// Label text without surrounding quotes; embedded double quotes become single quotes
    pub fn label_text(&self) -> String {
        let raw = self.label.unwrap_or("").trim();
        let inner = raw
            .strip_prefix('"')
            .and_then(|s| s.strip_suffix('"'))
            .unwrap_or(raw);
        inner.replace('"', "'")
    }

    pub fn label_is_quoted(&self) -> bool {
        let raw = self.label.unwrap_or("").trim();
        raw.len() >= 2 && raw.starts_with('"') && raw.ends_with('"')
    }

    /// Canonical rendering: single spaces, `--` unless `..`, quoted label
    pub fn canonical(&self) -> String {
        let separator = match self.separator {
            Some("..") => "..",
            _ => "--",
        };
        format!(
            "{} {}{}{} {} : \"{}\"",
            self.source,
            self.left,
            separator,
            self.right,
            self.target,
            self.label_text()
        )
    }
}

/// Parse one (trimmed) line as a relationship, tolerating the defects
/// auto-repair knows how to fix
pub(crate) fn parse_relationship(line: &str) -> Option<RelationshipLine<'_>> {
    let caps = RELATIONSHIP_RE.captures(line.trim())?;
    let text = |name: &str| caps.name(name).map(|m| m.as_str());
    let spaced = |name: &str| text(name).map_or(false, |s| !s.is_empty());
    Some(RelationshipLine {
        source: text("source")?,
        left: text("left")?,
        separator: text("sep"),
        right: text("right")?,
        target: text("target")?,
        label: if text("colon").is_some() {
            Some(text("label").unwrap_or(""))
        } else {
            None
        },
        spaced_outside: spaced("ws1") && spaced("ws4"),
        spaced_inside: spaced("ws2") || spaced("ws3"),
    })
}
