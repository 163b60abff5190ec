//! Ordered battery of surface matchers.
//!
//! Each matcher is an independent function over one tagged sentence. It sees
//! the mentions produced by the matchers before it (so attribute phrases are
//! not re-read as entities) and returns zero or more new mentions. Nothing is
//! revisited: the output of the battery is concatenated and later merged by
//! the [`ExtractionBuilder`](super::registry::ExtractionBuilder).

use super::constraints::Constraint;
use super::lexicon::{contains, POSSESSION_VERBS};
use super::normalize::{attribute_name, merge_key};
use super::phrase::{NounPhrase, Quantity};
use super::sentence::Sentence;
use super::tagger::Tag;
use super::types::{
    CandidateRelationship, Cardinality, DataType, Participation, ParticipationPair,
};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use std::ops::Range;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Mention {
    Entity {
        name: String,
        phrase: Option<usize>,
        weak: bool,
    },
    Attribute {
        entity: String,
        attribute: String,
        phrase: Option<usize>,
    },
    Constraint {
        entity: Option<String>,
        attribute: String,
        constraint: Constraint,
        phrase: Option<usize>,
    },
    Relationship(CandidateRelationship),
    /// Phrase consumed as a literal value ("defaults to pending")
    Literal { phrase: usize },
}

pub(crate) struct SentenceContext<'a> {
    pub sentence: &'a Sentence,
    pub tags: &'a [Tag],
    pub phrases: &'a [NounPhrase],
    /// First entity of the closest earlier sentence that had one
    pub previous_subject: Option<&'a str>,
}

/// Where the owner of an attribute mention came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OwnerSource {
    /// Possessive, "of X" or compound modifier right next to the attribute
    Adjacent,
    /// Subject of this or an earlier sentence
    Subject,
}

impl<'a> SentenceContext<'a> {
    fn word(&self, i: usize) -> &str {
        self.sentence
            .tokens
            .get(i)
            .map(|t| t.lower.as_str())
            .unwrap_or("")
    }

    fn is_entity_phrase(&self, p: usize) -> bool {
        let np = &self.phrases[p];
        !np.is_stop_noun() && !np.is_attribute_like()
    }

    /// Last entity-like phrase ending at or before `token`
    fn subject_before(&self, token: usize) -> Option<usize> {
        (0..self.phrases.len())
            .filter(|&p| self.phrases[p].end <= token && self.is_entity_phrase(p))
            .last()
    }

    fn first_entity_after(&self, token: usize) -> Option<usize> {
        (0..self.phrases.len()).find(|&p| self.phrases[p].start >= token && self.is_entity_phrase(p))
    }

    fn phrase_at_or_after(&self, token: usize) -> Option<usize> {
        self.phrases.iter().position(|np| np.start >= token)
    }

    fn phrase_ending_at(&self, token: usize) -> Option<usize> {
        self.phrases.iter().position(|np| np.end == token)
    }

    /// First entity-like phrase in front of phrase `before` (anywhere when `None`)
    fn sentence_subject(&self, before: Option<usize>) -> Option<String> {
        let limit = before.unwrap_or(self.phrases.len());
        (0..limit)
            .find(|&p| self.is_entity_phrase(p))
            .map(|p| self.phrases[p].entity_name())
            .or_else(|| self.previous_subject.map(str::to_string))
    }

    /// Resolve which entity an attribute phrase belongs to
    fn resolve_owner(&self, p: usize) -> (Option<String>, String, OwnerSource) {
        let np = &self.phrases[p];

        if p > 0 {
            let prev = &self.phrases[p - 1];
            if prev.possessive && prev.end == np.start {
                return (Some(prev.entity_name()), np.attribute_name(), OwnerSource::Adjacent);
            }
        }
        if self.word(np.end) == "of" {
            if let Some(q) = self.first_entity_after(np.end + 1) {
                if self.phrases[q].start <= np.end + 3 {
                    return (
                        Some(self.phrases[q].entity_name()),
                        np.attribute_name(),
                        OwnerSource::Adjacent,
                    );
                }
            }
        }
        if let Some(owner) = np.owner_modifier() {
            return (Some(owner), attribute_name(&[np.head()]), OwnerSource::Adjacent);
        }
        (self.sentence_subject(Some(p)), np.attribute_name(), OwnerSource::Subject)
    }
}

type Matcher = fn(&SentenceContext<'_>, &[Mention]) -> Vec<Mention>;

const MATCHERS: &[(&str, Matcher)] = &[
    ("attribute_list", match_attribute_lists),
    ("identification", match_identification),
    ("constraint", match_constraints),
    ("possession", match_possession),
    ("weak_entity", match_weak_entities),
    ("entity", match_entities),
    ("relationship", match_relationships),
];

/// Run every matcher over one sentence, in order
pub(crate) fn run_matchers(ctx: &SentenceContext<'_>) -> Vec<Mention> {
    let mut mentions: Vec<Mention> = Vec::new();
    for (name, matcher) in MATCHERS {
        let found = matcher(ctx, &mentions);
        if !found.is_empty() {
            log::trace!(
                "{} matcher produced {} mention(s) in \"{}\"",
                name,
                found.len(),
                ctx.sentence.text
            );
        }
        mentions.extend(found);
    }
    mentions
}

/// Phrases already claimed as attributes
fn attribute_phrases(prior: &[Mention]) -> HashSet<usize> {
    prior
        .iter()
        .filter_map(|m| match m {
            Mention::Attribute { phrase, .. } | Mention::Constraint { phrase, .. } => *phrase,
            Mention::Literal { phrase } => Some(*phrase),
            _ => None,
        })
        .collect()
}

fn entity_phrases(prior: &[Mention]) -> HashSet<usize> {
    prior
        .iter()
        .filter_map(|m| match m {
            Mention::Entity { phrase, .. } => *phrase,
            _ => None,
        })
        .collect()
}

fn attribute(entity: &str, attribute: String, phrase: usize) -> Mention {
    Mention::Attribute {
        entity: entity.to_string(),
        attribute,
        phrase: Some(phrase),
    }
}

const LIST_KEYWORDS: &[&str] = &[
    "attribute", "attributes", "field", "fields", "property", "properties", "column", "columns",
];

/// "X has the following attributes: a, b and c" / "the fields of X are a and b"
fn match_attribute_lists(ctx: &SentenceContext<'_>, _prior: &[Mention]) -> Vec<Mention> {
    let tokens = &ctx.sentence.tokens;
    let Some(k) = tokens.iter().position(|t| contains(LIST_KEYWORDS, &t.lower)) else {
        return Vec::new();
    };

    let keyword_phrase = ctx
        .phrases
        .iter()
        .find(|np| np.start <= k && k < np.end);
    let (owner, items_from) = if ctx.word(k + 1) == "of" {
        match ctx.first_entity_after(k + 2) {
            Some(q) => (Some(ctx.phrases[q].entity_name()), ctx.phrases[q].end),
            None => (None, k + 1),
        }
    } else if let Some(np) = keyword_phrase.filter(|np| np.words.len() > 1) {
        // "customer attributes include ..."
        let modifier = &np.words[..np.words.len() - 1];
        (
            Some(super::normalize::canonical_entity_name(modifier)),
            np.end,
        )
    } else {
        let owner = ctx
            .subject_before(k)
            .map(|p| ctx.phrases[p].entity_name())
            .or_else(|| ctx.previous_subject.map(str::to_string));
        (owner, k + 1)
    };
    let Some(owner) = owner else {
        return Vec::new();
    };

    ctx.phrases
        .iter()
        .enumerate()
        .filter(|(_, np)| np.start >= items_from)
        .filter(|(_, np)| !np.words.iter().all(|w| contains(LIST_KEYWORDS, w)))
        .map(|(p, np)| attribute(&owner, np.attribute_name(), p))
        .collect()
}

/// "X is identified by Y" / "the primary key of X is Y" / "Y is the primary key"
fn match_identification(ctx: &SentenceContext<'_>, _prior: &[Mention]) -> Vec<Mention> {
    let sentence = ctx.sentence;
    let mut out = Vec::new();
    let emit = |owner: String, p: usize, out: &mut Vec<Mention>| {
        let name = ctx.phrases[p].attribute_name();
        out.push(attribute(&owner, name.clone(), p));
        out.push(Mention::Constraint {
            entity: Some(owner),
            attribute: name,
            constraint: Constraint::PrimaryKey,
            phrase: Some(p),
        });
    };

    if let Some(k) = sentence.find_seq(&["identified", "by"], 0) {
        let owner = ctx
            .subject_before(k)
            .map(|p| ctx.phrases[p].entity_name())
            .or_else(|| ctx.previous_subject.map(str::to_string));
        if let (Some(owner), Some(p)) = (owner, ctx.phrase_at_or_after(k + 2)) {
            emit(owner, p, &mut out);
        }
    }

    if let Some(k) = sentence.find_seq(&["primary", "key"], 0) {
        let adjacent = if matches!(ctx.word(k + 2), "of" | "for") {
            ctx.first_entity_after(k + 3)
                .map(|q| ctx.phrases[q].entity_name())
        } else {
            ctx.phrase_ending_at(k)
                .filter(|&q| ctx.phrases[q].possessive)
                .map(|q| ctx.phrases[q].entity_name())
        };
        let owner = adjacent.or_else(|| ctx.sentence_subject(None));

        let before = if k >= 2
            && matches!(ctx.word(k - 1), "the" | "a")
            && matches!(ctx.word(k - 2), "is" | "as")
        {
            ctx.phrase_ending_at(k - 2)
        } else {
            None
        };
        let after = sentence
            .find("is", k + 2)
            .and_then(|i| ctx.phrase_at_or_after(i + 1));

        if let (Some(owner), Some(p)) = (owner, before.or(after)) {
            emit(owner, p, &mut out);
        }
    }

    out
}

const UNIQUE_CUES: &[&[&str]] = &[
    &["must", "be", "unique"],
    &["should", "be", "unique"],
    &["will", "be", "unique"],
    &["has", "to", "be", "unique"],
    &["needs", "to", "be", "unique"],
    &["is", "unique"],
    &["are", "unique"],
    &["must", "be", "distinct"],
];

const NOT_NULL_CUES: &[&[&str]] = &[
    &["cannot", "be", "null"],
    &["cannot", "be", "empty"],
    &["cannot", "be", "blank"],
    &["can't", "be", "null"],
    &["can't", "be", "empty"],
    &["must", "not", "be", "null"],
    &["must", "not", "be", "empty"],
    &["should", "not", "be", "null"],
    &["is", "not", "null"],
    &["is", "not", "optional"],
    &["is", "required"],
    &["are", "required"],
    &["is", "mandatory"],
    &["are", "mandatory"],
    &["must", "be", "provided"],
    &["must", "be", "specified"],
    &["must", "be", "present"],
    &["must", "be", "set"],
];

const NULLABLE_CUES: &[&[&str]] = &[
    &["is", "optional"],
    &["are", "optional"],
    &["is", "nullable"],
    &["can", "be", "null"],
    &["can", "be", "empty"],
    &["can", "be", "blank"],
    &["can", "be", "omitted"],
    &["may", "be", "null"],
    &["may", "be", "empty"],
    &["may", "be", "blank"],
    &["may", "be", "omitted"],
];

const PRIMARY_KEY_CUES: &[&[&str]] = &[
    &["is", "the", "primary", "key"],
    &["is", "a", "primary", "key"],
    &["serves", "as", "the", "primary", "key"],
    &["acts", "as", "the", "primary", "key"],
];

const DEFAULT_CUES: &[&[&str]] = &[
    &["defaults", "to"],
    &["default", "to"],
    &["has", "a", "default", "of"],
    &["has", "a", "default", "value", "of"],
    &["default", "value", "is"],
    &["default", "is"],
];

const TYPE_CUES: &[&[&str]] = &[
    &["is", "stored", "as", "a"],
    &["is", "stored", "as", "an"],
    &["is", "stored", "as"],
    &["stored", "as", "a"],
    &["stored", "as"],
    &["is", "a"],
    &["is", "an"],
    &["as", "a"],
    &["as", "an"],
    &["of", "type"],
];

fn type_word(word: &str) -> Option<DataType> {
    match word {
        "date" => Some(DataType::Date),
        "timestamp" | "datetime" | "time" => Some(DataType::Timestamp),
        "integer" | "int" | "number" | "count" => Some(DataType::Integer),
        "decimal" | "money" | "currency" | "float" | "amount" => Some(DataType::Decimal),
        "boolean" | "bool" | "flag" => Some(DataType::Boolean),
        "text" => Some(DataType::Text),
        "string" | "varchar" => Some(DataType::String),
        _ => None,
    }
}

/// Constraint cue starting at token `at` (right after an attribute phrase),
/// with the token index of any literal the cue consumed
fn constraint_after(ctx: &SentenceContext<'_>, at: usize) -> Option<(Constraint, Option<usize>)> {
    let at = if ctx.word(at) == "also" { at + 1 } else { at };
    let words: Vec<&str> = (at..at + 6).map(|i| ctx.word(i)).collect();
    let starts = |cue: &[&str]| words[..cue.len()] == *cue;

    if UNIQUE_CUES.iter().any(|&c| starts(c)) {
        return Some((Constraint::Unique, None));
    }
    if PRIMARY_KEY_CUES.iter().any(|&c| starts(c)) {
        return Some((Constraint::PrimaryKey, None));
    }
    if NOT_NULL_CUES.iter().any(|&c| starts(c)) && words[2] != "to" {
        return Some((Constraint::NotNull, None));
    }
    if NULLABLE_CUES.iter().any(|&c| starts(c)) {
        return Some((Constraint::Nullable, None));
    }
    if let Some(cue) = DEFAULT_CUES.iter().find(|&&c| starts(c)) {
        let index = at + cue.len();
        let value = ctx.sentence.tokens.get(index)?;
        return Some((Constraint::Default(value.text.clone()), Some(index)));
    }
    if let Some(cue) = TYPE_CUES.iter().find(|&&c| starts(c)) {
        let index = at + cue.len();
        return type_word(words[cue.len()]).map(|t| (Constraint::Type(t), Some(index)));
    }
    None
}

fn constraint_before(word: &str) -> Option<Constraint> {
    match word {
        "unique" => Some(Constraint::Unique),
        "optional" => Some(Constraint::Nullable),
        "required" | "mandatory" => Some(Constraint::NotNull),
        _ => None,
    }
}

/// "the email must be unique", "a unique username", "price defaults to 0"
fn match_constraints(ctx: &SentenceContext<'_>, _prior: &[Mention]) -> Vec<Mention> {
    let mut out = Vec::new();
    for (p, np) in ctx.phrases.iter().enumerate() {
        let mut found = Vec::new();
        let mut literal = None;
        if let Some((c, index)) = constraint_after(ctx, np.end) {
            found.push(c);
            literal = index.and_then(|i| ctx.phrases.iter().position(|q| q.start <= i && i < q.end));
        }
        if np.start > 0 {
            if let Some(c) = constraint_before(ctx.word(np.start - 1)) {
                found.push(c);
            }
        }
        if found.is_empty() || (np.is_stop_noun() && !np.is_attribute_like()) {
            continue;
        }

        let (owner, name, source) = ctx.resolve_owner(p);
        if !np.is_attribute_like() && source != OwnerSource::Adjacent {
            continue;
        }
        if let Some(owner) = &owner {
            out.push(attribute(owner, name.clone(), p));
        }
        for constraint in found {
            out.push(Mention::Constraint {
                entity: owner.clone(),
                attribute: name.clone(),
                constraint,
                phrase: Some(p),
            });
        }
        if let Some(phrase) = literal {
            out.push(Mention::Literal { phrase });
        }
    }
    out
}

/// Tokens allowed between the items of an attribute list
fn list_gap(ctx: &SentenceContext<'_>, from: usize, to: usize) -> bool {
    (from..to).all(|i| {
        matches!(
            ctx.tags[i],
            Tag::Determiner | Tag::Quantifier | Tag::Adjective | Tag::Number | Tag::Adverb | Tag::Punct
        ) || matches!(ctx.word(i), "and" | "or")
    })
}

/// "each customer has a name, an email and a phone number", "the customer's email"
fn match_possession(ctx: &SentenceContext<'_>, prior: &[Mention]) -> Vec<Mention> {
    let tokens = &ctx.sentence.tokens;
    let mut claimed = attribute_phrases(prior);
    let mut out = Vec::new();

    for v in 0..tokens.len() {
        let word = tokens[v].lower.as_str();
        if !contains(POSSESSION_VERBS, word) || (word != "with" && ctx.tags[v] != Tag::Verb) {
            continue;
        }
        let Some(subject) = ctx.subject_before(v) else {
            continue;
        };
        let owner = ctx.phrases[subject].entity_name();

        let mut cursor = v + 1;
        for (p, np) in ctx.phrases.iter().enumerate().filter(|(_, np)| np.start > v) {
            if !list_gap(ctx, cursor, np.start) {
                break;
            }
            cursor = np.end;
            if np.is_attribute_like() && claimed.insert(p) {
                out.push(attribute(&owner, np.attribute_name(), p));
            }
        }
    }

    for p in 1..ctx.phrases.len() {
        let (prev, np) = (&ctx.phrases[p - 1], &ctx.phrases[p]);
        if prev.possessive && prev.end == np.start && np.is_attribute_like() && claimed.insert(p) {
            out.push(attribute(&prev.entity_name(), np.attribute_name(), p));
        }
    }

    // "customer name" on its own: attribute `name` of Customer
    for (p, np) in ctx.phrases.iter().enumerate() {
        if !np.is_attribute_like() || claimed.contains(&p) {
            continue;
        }
        if let Some(owner) = np.owner_modifier() {
            claimed.insert(p);
            out.push(attribute(&owner, attribute_name(&[np.head()]), p));
        }
    }

    out
}

const WEAK_CUES: &[&[&str]] = &[
    &["depends", "on"],
    &["depend", "on"],
    &["dependent", "on"],
    &["exist", "without"],
    &["exists", "without"],
];

/// "X depends on Y", "X cannot exist without Y", "X is a weak entity of Y"
fn match_weak_entities(ctx: &SentenceContext<'_>, _prior: &[Mention]) -> Vec<Mention> {
    let sentence = ctx.sentence;
    let cue = WEAK_CUES
        .iter()
        .find_map(|seq| sentence.find_seq(seq, 0).map(|k| (k, seq.len())))
        .or_else(|| sentence.find_seq(&["weak", "entity"], 0).map(|k| (k, 2)));
    let Some((k, len)) = cue else {
        return Vec::new();
    };
    let Some(weak) = ctx.subject_before(k) else {
        return Vec::new();
    };
    let weak_name = ctx.phrases[weak].entity_name();
    let mut out = vec![Mention::Entity {
        name: weak_name.clone(),
        phrase: Some(weak),
        weak: true,
    }];

    if let Some(owner) = ctx.first_entity_after(k + len) {
        let owner_name = ctx.phrases[owner].entity_name();
        if merge_key(&owner_name) != merge_key(&weak_name) {
            out.push(Mention::Relationship(CandidateRelationship {
                source_entity: weak_name,
                target_entity: owner_name,
                cardinality: Cardinality::ManyToOne,
                participation: ParticipationPair {
                    source: Participation::Total,
                    target: Participation::Partial,
                },
                description: "depends on".to_string(),
            }));
        }
    }
    out
}

/// Every remaining entity-like noun phrase
fn match_entities(ctx: &SentenceContext<'_>, prior: &[Mention]) -> Vec<Mention> {
    let claimed = attribute_phrases(prior);
    let named = entity_phrases(prior);
    (0..ctx.phrases.len())
        .filter(|p| !claimed.contains(p) && !named.contains(p))
        .filter(|&p| ctx.is_entity_phrase(p))
        .map(|p| Mention::Entity {
            name: ctx.phrases[p].entity_name(),
            phrase: Some(p),
            weak: false,
        })
        .collect()
}

static EXPLICIT_CARDINALITY: Lazy<Vec<(Regex, Cardinality)>> = Lazy::new(|| {
    [
        (r"\bmany[- ]to[- ]many\b|\b[mn]\s*:\s*[mn]\b", Cardinality::ManyToMany),
        (r"\bone[- ]to[- ]many\b|\b1\s*:\s*(?:m|n|\*|many)\b", Cardinality::OneToMany),
        (r"\bmany[- ]to[- ]one\b|(?:\b[mn]|\*)\s*:\s*1\b", Cardinality::ManyToOne),
        (r"\bone[- ]to[- ]one\b|\b1\s*:\s*1\b", Cardinality::OneToOne),
    ]
    .into_iter()
    .map(|(pattern, cardinality)| {
        (
            Regex::new(pattern).expect("cardinality regex is valid"),
            cardinality,
        )
    })
    .collect()
});

/// Explicit cardinality phrasing anywhere in the sentence
pub(crate) fn explicit_cardinality(lower: &str) -> Option<Cardinality> {
    EXPLICIT_CARDINALITY
        .iter()
        .find(|(re, _)| re.is_match(lower))
        .map(|(_, cardinality)| *cardinality)
}

/// A plural noun directly after a verb or preposition reads as "many"
fn in_object_position(ctx: &SentenceContext<'_>, np: &NounPhrase) -> bool {
    let mut j = np.start;
    while j > 0 {
        j -= 1;
        match ctx.tags[j] {
            Tag::Determiner | Tag::Adjective | Tag::Number | Tag::Quantifier | Tag::Adverb => {
                continue
            }
            Tag::Verb | Tag::Preposition => return true,
            _ => return false,
        }
    }
    false
}

fn side_is_many(ctx: &SentenceContext<'_>, np: &NounPhrase) -> bool {
    match np.quantity {
        Quantity::Many => true,
        Quantity::One => false,
        Quantity::Unspecified => np.plural && in_object_position(ctx, np),
    }
}

fn lexical_cardinality(
    ctx: &SentenceContext<'_>,
    a: &NounPhrase,
    b: &NounPhrase,
    span: Range<usize>,
    many_and_multiple: bool,
) -> Option<Cardinality> {
    let words: Vec<&str> = span.map(|i| ctx.word(i)).collect();
    let has = |w: &str| words.contains(&w);
    let has_seq = |x: &str, y: &str| words.windows(2).any(|p| p[0] == x && p[1] == y);

    if has("belongs") || has("belong") || has("belonging") || has_seq("part", "of") || has_seq("owned", "by") {
        return Some(Cardinality::ManyToOne);
    }
    let many_a = side_is_many(ctx, a);
    let many_b = side_is_many(ctx, b);
    if many_and_multiple || (many_a && many_b) {
        return Some(Cardinality::ManyToMany);
    }
    if many_b {
        return Some(Cardinality::OneToMany);
    }
    if many_a {
        return Some(Cardinality::ManyToOne);
    }
    if b.quantity == Quantity::One || has_seq("has", "one") || has_seq("have", "one") {
        return Some(Cardinality::OneToOne);
    }
    None
}

fn participation(ctx: &SentenceContext<'_>, span: Range<usize>) -> Participation {
    let total = span
        .map(|i| ctx.word(i))
        .any(|w| matches!(w, "must" | "always" | "required"));
    if total {
        Participation::Total
    } else {
        Participation::Partial
    }
}

/// Verb phrase between two entity mentions, e.g. "enrolls in"
fn describe(ctx: &SentenceContext<'_>, span: Range<usize>) -> String {
    let words: Vec<&str> = span
        .filter(|&i| matches!(ctx.tags[i], Tag::Verb | Tag::Preposition))
        .map(|i| ctx.sentence.tokens[i].lower.as_str())
        .collect();
    if words.is_empty() {
        "relates to".to_string()
    } else {
        words.join(" ")
    }
}

fn pair_key(a: &str, b: &str) -> (String, String) {
    let (a, b) = (merge_key(a), merge_key(b));
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Relationships between consecutive distinct entity mentions
fn match_relationships(ctx: &SentenceContext<'_>, prior: &[Mention]) -> Vec<Mention> {
    let mut occurrences: Vec<(usize, &str)> = prior
        .iter()
        .filter_map(|m| match m {
            Mention::Entity {
                name,
                phrase: Some(p),
                ..
            } => Some((*p, name.as_str())),
            _ => None,
        })
        .collect();
    occurrences.sort_by_key(|(p, _)| ctx.phrases[*p].start);

    let related: HashSet<(String, String)> = prior
        .iter()
        .filter_map(|m| match m {
            Mention::Relationship(rel) => Some(pair_key(&rel.source_entity, &rel.target_entity)),
            _ => None,
        })
        .collect();

    let explicit = explicit_cardinality(&ctx.sentence.lower);
    let many_and_multiple = ctx.sentence.has_word("many") && ctx.sentence.has_word("multiple");

    let mut out = Vec::new();
    for pair in occurrences.windows(2) {
        let ((pa, a), (pb, b)) = (pair[0], pair[1]);
        if merge_key(a) == merge_key(b) || related.contains(&pair_key(a, b)) {
            continue;
        }
        let (npa, npb) = (&ctx.phrases[pa], &ctx.phrases[pb]);
        let span = npa.end..npb.start.max(npa.end);

        let cardinality = explicit
            .or_else(|| lexical_cardinality(ctx, npa, npb, span.clone(), many_and_multiple))
            .unwrap_or(Cardinality::OneToMany);

        out.push(Mention::Relationship(CandidateRelationship {
            source_entity: a.to_string(),
            target_entity: b.to_string(),
            cardinality,
            participation: ParticipationPair {
                source: participation(ctx, span.clone()),
                target: Participation::Partial,
            },
            description: describe(ctx, span),
        }));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::phrase::chunk;
    use crate::extract::tagger::{LexiconTagger, PosTagger};

    fn mentions(text: &str) -> Vec<Mention> {
        mentions_with_subject(text, None)
    }

    fn mentions_with_subject(text: &str, previous: Option<&str>) -> Vec<Mention> {
        let sentence = Sentence::new(text);
        let tags = LexiconTagger.tag(&sentence.tokens).unwrap();
        let phrases = chunk(&sentence, &tags);
        let ctx = SentenceContext {
            sentence: &sentence,
            tags: &tags,
            phrases: &phrases,
            previous_subject: previous,
        };
        run_matchers(&ctx)
    }

    fn relationships(mentions: &[Mention]) -> Vec<&CandidateRelationship> {
        mentions
            .iter()
            .filter_map(|m| match m {
                Mention::Relationship(rel) => Some(rel),
                _ => None,
            })
            .collect()
    }

    fn attributes(mentions: &[Mention]) -> Vec<(String, String)> {
        mentions
            .iter()
            .filter_map(|m| match m {
                Mention::Attribute {
                    entity, attribute, ..
                } => Some((entity.clone(), attribute.clone())),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_explicit_cardinality() {
        assert_eq!(explicit_cardinality("users and roles are many-to-many"), Some(Cardinality::ManyToMany));
        assert_eq!(explicit_cardinality("a 1:m link"), Some(Cardinality::OneToMany));
        assert_eq!(explicit_cardinality("one to one"), Some(Cardinality::OneToOne));
        assert_eq!(explicit_cardinality("m:1"), Some(Cardinality::ManyToOne));
        assert_eq!(explicit_cardinality("each order has one customer"), None);
    }

    #[test]
    fn test_belongs_to_is_many_to_one() {
        let found = mentions("Each order belongs to exactly one customer");
        let rels = relationships(&found);
        assert_eq!(rels.len(), 1);
        assert_eq!(rels[0].source_entity, "Order");
        assert_eq!(rels[0].target_entity, "Customer");
        assert_eq!(rels[0].cardinality, Cardinality::ManyToOne);
        assert_eq!(rels[0].description, "belongs to");
    }

    #[test]
    fn test_reciprocal_clauses_in_one_sentence() {
        let found = mentions("A student enrolls in many courses and each course has many students");
        let rels = relationships(&found);
        assert_eq!(rels.len(), 2);
        assert_eq!(rels[0].source_entity, "Student");
        assert_eq!(rels[0].cardinality, Cardinality::OneToMany);
        assert_eq!(rels[0].description, "enrolls in");
        assert_eq!(rels[1].source_entity, "Course");
        assert_eq!(rels[1].cardinality, Cardinality::OneToMany);
    }

    #[test]
    fn test_possession_list_yields_attributes() {
        let found = mentions("Each customer has a name, an email and a phone number");
        let attrs = attributes(&found);
        assert_eq!(
            attrs,
            vec![
                ("Customer".to_string(), "name".to_string()),
                ("Customer".to_string(), "email".to_string()),
                ("Customer".to_string(), "phone_number".to_string()),
            ]
        );
        assert!(relationships(&found).is_empty());
    }

    #[test]
    fn test_explicit_attribute_list() {
        let found = mentions("The attributes of a book are title, author and isbn");
        let attrs = attributes(&found);
        assert!(attrs.contains(&("Book".to_string(), "title".to_string())));
        assert!(attrs.contains(&("Book".to_string(), "author".to_string())));
        assert!(attrs.contains(&("Book".to_string(), "isbn".to_string())));
        // "author" was claimed as an attribute, so it is not an entity
        assert!(!found.iter().any(|m| matches!(m, Mention::Entity { name, .. } if name == "Author")));
    }

    #[test]
    fn test_constraint_uses_previous_subject() {
        let found = mentions_with_subject("The email must be unique", Some("Customer"));
        assert!(found.contains(&Mention::Constraint {
            entity: Some("Customer".to_string()),
            attribute: "email".to_string(),
            constraint: Constraint::Unique,
            phrase: Some(0),
        }));
    }

    #[test]
    fn test_primary_key_phrasing() {
        let found = mentions("The primary key of a book is its isbn");
        assert!(found.iter().any(|m| matches!(
            m,
            Mention::Constraint { entity: Some(e), attribute, constraint: Constraint::PrimaryKey, .. }
                if e == "Book" && attribute == "isbn"
        )));
    }

    #[test]
    fn test_weak_entity() {
        let found = mentions("A room depends on a hotel");
        assert!(found.contains(&Mention::Entity {
            name: "Room".to_string(),
            phrase: Some(0),
            weak: true,
        }));
        let rels = relationships(&found);
        assert_eq!(rels.len(), 1);
        assert_eq!(rels[0].cardinality, Cardinality::ManyToOne);
        assert_eq!(rels[0].participation.source, Participation::Total);
    }

    #[test]
    fn test_default_and_type_cues() {
        let found = mentions_with_subject("The status defaults to pending", Some("Order"));
        assert!(found.iter().any(|m| matches!(
            m,
            Mention::Constraint { constraint: Constraint::Default(v), .. } if v == "pending"
        )));
        let found = mentions_with_subject("The birthday is a date", Some("Person"));
        assert!(found.iter().any(|m| matches!(
            m,
            Mention::Constraint { constraint: Constraint::Type(DataType::Date), attribute, .. }
                if attribute == "birthday"
        )));
    }
}
