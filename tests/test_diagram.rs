//! Tests for diagram emission, repair and validation

use erscribe::config::DiagramConfig;
use erscribe::diagram::{annotate, auto_repair, emit, render, validate, IssueKind};
use erscribe::{extract, synthesize, SynthesisOptions};

const MESSY: &[&str] = &[
    "a{name string}b{id int}",
    "erDiagram\ncustomer||-o{order\norder }o—|| customer : belongs to\n",
    "ERDIAGRAM\n\n\n   customer {\nstring name\n}}\n\n{",
    "erDiagram\n    a {\n        int id PK\n    }\n    a ||==o{ b\n%% trailing comment\n",
    "  \n\t\n",
    "just some words\nwith { a brace and \"a } quoted\" one",
    "erDiagram\na {\nint x\n} %% note\n",
    "many1:M-\no{erDiagram",
    "erDiagram{a ||--|| b}\nerDiagram ||--o{ b : x",
    "a { x ||--|| y } erDiagram %% trailing",
];

#[test]
fn test_glued_blocks_scenario() {
    let repaired = auto_repair("a{name string}b{id int}");
    assert_eq!(
        repaired,
        "erDiagram\n    a {\n        name string\n    }\n\n    b {\n        id int\n    }\n"
    );
    let report = validate(&repaired);
    assert!(report.is_valid, "{:?}", report.errors);
}

#[test]
fn test_repair_is_idempotent() {
    for input in MESSY {
        let once = auto_repair(input);
        let twice = auto_repair(&once);
        assert_eq!(once, twice, "input: {:?}", input);
        assert!(once.starts_with("erDiagram\n"));
        assert!(once.ends_with('\n'));
    }
}

#[test]
fn test_unmatched_markers_are_reported() {
    let cases = ["erDiagram\n    a {\n        string name\n", "erDiagram\n    }\n"];
    for markup in cases {
        let report = validate(markup);
        assert!(!report.is_valid);
        assert!(
            report.errors.iter().any(|e| e.contains("unmatched")),
            "{:?}",
            report.errors
        );
    }
}

#[test]
fn test_repair_fixes_operator_defects() {
    let markup = "erDiagram\n    a {\n    }\n\n    b {\n    }\n\n    a||-o{b\n";
    let before = validate(markup);
    assert!(before.has_issue(|k| *k == IssueKind::OperatorSpacing));
    assert!(before.has_issue(|k| matches!(k, IssueKind::MissingLabel { .. })));

    let after = validate(&auto_repair(markup));
    assert!(after.is_valid, "{:?}", after.errors);
}

#[test]
fn test_pipeline_markup_is_valid_and_stable() {
    let texts = [
        "A student enrolls in many courses and each course has many students.",
        "Each order belongs to exactly one customer.",
        "A hospital employs many doctors. Each doctor treats many patients. A patient has a name and a birthday.",
    ];
    for text in texts {
        let schema = synthesize(&extract(text), &SynthesisOptions::default());
        let markup = emit(&schema);
        assert_eq!(auto_repair(&markup), markup, "text: {}", text);
        let report = validate(&markup);
        assert!(report.is_valid, "{}: {:?}", text, report.errors);
    }
}

#[test]
fn test_many_to_many_drawn_through_junction() {
    let schema = synthesize(
        &extract("A student enrolls in many courses and each course has many students."),
        &SynthesisOptions::default(),
    );
    let markup = emit(&schema);
    assert!(markup.contains("student_course {"));
    assert!(markup.contains("number student_id PK, FK"));
    assert!(markup.contains("student ||--o{ student_course : \"has\""));
    assert!(markup.contains("course ||--o{ student_course : \"has\""));
    assert!(!markup.contains("}o--o{"));
}

#[test]
fn test_render_appends_report() {
    let schema = synthesize(
        &extract("Each order belongs to exactly one customer."),
        &SynthesisOptions::default(),
    );
    let config = DiagramConfig {
        max_entities: 1,
        ..DiagramConfig::default()
    };
    let rendered = render(&schema, &config);
    assert!(rendered.report.is_valid);
    assert!(rendered.markup.contains("%% WARNING:"));
    assert_eq!(
        rendered.markup,
        annotate(&auto_repair(&emit(&schema)), &rendered.report)
    );
}
