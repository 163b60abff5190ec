//! Idempotent structural repair of ER markup.
//!
//! Repair works line by line and never needs the schema:
//!
//! 1. blocks glued onto one line (`a{name string}b{id int}`) are split so
//!    every `{` ends an opener line and every `}` stands alone, and a blank
//!    line follows each block terminator;
//! 2. relationship operators are normalized to `--` (`..` is kept), with
//!    single spaces around the operator;
//! 3. block bodies are indented by eight spaces, openers, closers and
//!    relationship lines by four;
//! 4. relationship labels are always present and double-quoted.
//!
//! A missing `erDiagram` header is inserted. Running the repair twice gives
//! the same text as running it once.

use super::emit::{BLOCK_INDENT, BODY_INDENT, HEADER};
use super::glyph::parse_relationship;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece {
    Blank,
    Header,
    Comment(String),
    Open(String),
    Close,
    Relationship(String),
    Text(String),
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Text after a leading `erDiagram` keyword, if the line starts with one
fn strip_header(line: &str) -> Option<&str> {
    let keyword = line.get(..HEADER.len())?;
    if !keyword.eq_ignore_ascii_case(HEADER) {
        return None;
    }
    let rest = &line[HEADER.len()..];
    match rest.chars().next() {
        None => Some(rest),
        Some(c) if c.is_whitespace() || c == '{' || c == '}' => Some(rest),
        Some(_) => None,
    }
}

/// First `{` or `}` outside double quotes
pub(crate) fn first_unquoted_brace(text: &str) -> Option<(usize, char)> {
    let mut quoted = false;
    for (i, c) in text.char_indices() {
        match c {
            '"' => quoted = !quoted,
            '{' | '}' if !quoted => return Some((i, c)),
            _ => {}
        }
    }
    None
}

/// Every fragment of a line is classified with the same rules a fresh line
/// gets, so a fragment moved onto its own line reads back identically
fn split_line(line: &str, pieces: &mut Vec<Piece>) {
    let mut rest = line.trim();
    while !rest.is_empty() {
        if rest.starts_with("%%") {
            pieces.push(Piece::Comment(rest.to_string()));
            return;
        }
        if let Some(rel) = parse_relationship(rest) {
            pieces.push(Piece::Relationship(rel.canonical()));
            return;
        }
        if let Some(after) = strip_header(rest) {
            pieces.push(Piece::Header);
            rest = after.trim();
            continue;
        }
        match first_unquoted_brace(rest) {
            None => {
                pieces.push(Piece::Text(collapse_whitespace(rest)));
                return;
            }
            Some((i, '{')) => {
                pieces.push(Piece::Open(collapse_whitespace(&rest[..i])));
                rest = rest[i + 1..].trim();
            }
            Some((i, _)) => {
                let body = rest[..i].trim();
                if let Some(rel) = parse_relationship(body) {
                    pieces.push(Piece::Relationship(rel.canonical()));
                } else if !body.is_empty() {
                    pieces.push(Piece::Text(collapse_whitespace(body)));
                }
                pieces.push(Piece::Close);
                rest = rest[i + 1..].trim();
            }
        }
    }
}

fn push_blank(out: &mut Vec<String>) {
    if out.last().map_or(false, |line| !line.is_empty()) {
        out.push(String::new());
    }
}

/// Repair the structure of ER markup. See the module docs for the rules.
pub fn auto_repair(markup: &str) -> String {
    let mut pieces = Vec::new();
    for line in markup.lines() {
        if line.trim().is_empty() {
            pieces.push(Piece::Blank);
        } else {
            split_line(line, &mut pieces);
        }
    }

    let mut out: Vec<String> = vec![HEADER.to_string()];
    let mut depth = 0usize;
    for piece in pieces {
        match piece {
            Piece::Blank => push_blank(&mut out),
            Piece::Header => {}
            Piece::Comment(text) if depth > 0 => out.push(format!("{}{}", BODY_INDENT, text)),
            Piece::Comment(text) => out.push(text),
            Piece::Open(name) if name.is_empty() => {
                out.push(format!("{}{{", BLOCK_INDENT));
                depth += 1;
            }
            Piece::Open(name) => {
                out.push(format!("{}{} {{", BLOCK_INDENT, name));
                depth += 1;
            }
            Piece::Close => {
                out.push(format!("{}}}", BLOCK_INDENT));
                depth = depth.saturating_sub(1);
                push_blank(&mut out);
            }
            Piece::Relationship(line) => out.push(format!("{}{}", BLOCK_INDENT, line)),
            Piece::Text(text) if depth > 0 => out.push(format!("{}{}", BODY_INDENT, text)),
            Piece::Text(text) => out.push(format!("{}{}", BLOCK_INDENT, text)),
        }
    }

    while out.last().map_or(false, |line| line.is_empty()) {
        out.pop();
    }
    let mut repaired = out.join("\n");
    repaired.push('\n');
    repaired
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glued_blocks_are_split() {
        let repaired = auto_repair("a{name string}b{id int}");
        assert_eq!(
            repaired,
            "erDiagram
    a {
        name string
    }

    b {
        id int
    }
"
        );
    }

    #[test]
    fn test_operators_and_labels() {
        let repaired = auto_repair("erDiagram\ncustomer||-o{order\norder }o—|| customer : belongs to\na ||..|| b : \"x\"");
        let lines: Vec<&str> = repaired.lines().collect();
        assert_eq!(lines[1], r#"    customer ||--o{ order : """#);
        assert_eq!(lines[2], r#"    order }o--|| customer : "belongs to""#);
        assert_eq!(lines[3], r#"    a ||..|| b : "x""#);
    }

    #[test]
    fn test_indentation() {
        let repaired = auto_repair("erDiagram\ncustomer {\nstring   name\n  number id PK\n}\n");
        assert_eq!(
            repaired,
            "erDiagram\n    customer {\n        string name\n        number id PK\n    }\n"
        );
    }

    #[test]
    fn test_header_inserted_once() {
        let repaired = auto_repair("\n\ncustomer {\n}\nerDiagram\n");
        assert_eq!(repaired.matches("erDiagram").count(), 1);
        assert!(repaired.starts_with("erDiagram\n"));
    }

    #[test]
    fn test_idempotent_on_messy_input() {
        let inputs = [
            "a{name string}b{id int}",
            "erDiagram a {\n x int }\n\n\n a||==o{b",
            "%% note\ncustomer {\n%% inner\nstring name\n",
            "}}\n{\nstray text here",
            "",
            "erDiagram\na {\nint x\n} %% note\n",
            "many1:M-\no{erDiagram",
            "erDiagram{a ||--|| b}",
            "erDiagram ||--o{ b : x",
        ];
        for input in inputs {
            let once = auto_repair(input);
            assert_eq!(auto_repair(&once), once, "input: {:?}", input);
        }
    }

    #[test]
    fn test_fragments_after_markers_read_as_fresh_lines() {
        let repaired = auto_repair("erDiagram\na {\nint x\n} %% note\n");
        assert!(repaired.ends_with("    }\n\n%% note\n"));

        let repaired = auto_repair("o{erDiagram");
        assert_eq!(repaired, "erDiagram\n    o {\n");

        let repaired = auto_repair("a { x ||--|| y }");
        assert!(repaired.contains("    a {\n    x ||--|| y : \"\"\n    }"));
    }

    #[test]
    fn test_braces_inside_labels_survive() {
        let repaired = auto_repair("erDiagram\na ||--o{ b : \"has {many}\"\n");
        assert!(repaired.contains(r#"a ||--o{ b : "has {many}""#));
    }
}
