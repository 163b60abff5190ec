//! Part-of-speech tagging
//!
//! [`LexiconTagger`] is a small rule-based tagger: closed-class word lists,
//! a linking-verb lexicon gated on the previous tag, and a couple of suffix
//! rules. It is good enough to separate noun candidates from the verbs and
//! function words around them, which is all the matchers need.

use super::lexicon::{
    self, contains, ADJECTIVES, ADVERBS, AUXILIARIES, BE_FORMS, CONJUNCTIONS, DETERMINERS,
    EN_NOUNS, IRREGULAR_PARTICIPLES, MODALS, PREPOSITIONS, PRONOUNS, QUANTIFIERS,
};
use super::sentence::Token;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    Noun,
    Verb,
    Adjective,
    Adverb,
    Determiner,
    Quantifier,
    Preposition,
    Conjunction,
    Pronoun,
    Modal,
    Number,
    Punct,
}

/// Assigns one tag per token.
///
/// Returning `None`, or a vector whose length differs from `tokens`, tells
/// the extractor the tagger is unusable and the coarse fallback runs instead.
pub trait PosTagger: Send + Sync {
    fn tag(&self, tokens: &[Token]) -> Option<Vec<Tag>>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LexiconTagger;

impl PosTagger for LexiconTagger {
    fn tag(&self, tokens: &[Token]) -> Option<Vec<Tag>> {
        let mut tags: Vec<Tag> = Vec::with_capacity(tokens.len());
        for (i, token) in tokens.iter().enumerate() {
            let prev = tags.last().copied();
            let after_be = i > 0 && contains(BE_FORMS, &tokens[i - 1].lower);
            if after_be && is_passive_participle(&token.lower) {
                tags.push(Tag::Verb);
            } else {
                tags.push(tag_word(token, prev));
            }
        }
        split_noun_runs(tokens, &mut tags);
        Some(tags)
    }
}

fn tag_word(token: &Token, prev: Option<Tag>) -> Tag {
    let word = token.lower.as_str();

    if token.is_comma() {
        return Tag::Punct;
    }
    if word.chars().all(|c| c.is_ascii_digit()) {
        return Tag::Number;
    }
    if token.possessive {
        return Tag::Noun;
    }
    if contains(DETERMINERS, word) {
        return Tag::Determiner;
    }
    if contains(QUANTIFIERS, word) {
        return Tag::Quantifier;
    }
    if contains(MODALS, word) {
        return Tag::Modal;
    }
    if contains(AUXILIARIES, word) {
        return Tag::Verb;
    }
    if contains(PREPOSITIONS, word) {
        return Tag::Preposition;
    }
    if contains(CONJUNCTIONS, word) {
        return Tag::Conjunction;
    }
    if contains(PRONOUNS, word) {
        return Tag::Pronoun;
    }
    if contains(ADVERBS, word) || is_ly_adverb(word) {
        return Tag::Adverb;
    }
    if contains(ADJECTIVES, word) {
        return Tag::Adjective;
    }

    let after_subject = matches!(
        prev,
        Some(Tag::Noun | Tag::Pronoun | Tag::Modal | Tag::Adverb | Tag::Conjunction)
    );
    if after_subject && lexicon::is_known_verb(word) {
        return Tag::Verb;
    }
    let inflected = (word.ends_with("ed") && word.len() > 4)
        || (word.ends_with("ing") && word.len() > 5);
    if inflected && (after_subject || prev == Some(Tag::Verb)) {
        return Tag::Verb;
    }
    if prev == Some(Tag::Modal) {
        return Tag::Verb;
    }
    Tag::Noun
}

/// "written", "taken", "chosen": a participle that follows a form of "be"
fn is_passive_participle(word: &str) -> bool {
    contains(IRREGULAR_PARTICIPLES, word)
        || (word.len() > 4 && word.ends_with("en") && !contains(EN_NOUNS, word))
}

fn is_ly_adverb(word: &str) -> bool {
    word.len() > 4
        && word.ends_with("ly")
        && !word.ends_with("ply")
        && !["family", "assembly", "anomaly", "rally", "belly", "italy"].contains(&word)
}

/// Break up noun runs that swallowed an unknown verb.
///
/// "doctor treats patients" tags as three nouns when `treats` is not in the
/// lexicon; a third-person `-s` word sitting between two nouns after a
/// sentence start or determiner is re-tagged as a verb.
fn split_noun_runs(tokens: &[Token], tags: &mut [Tag]) {
    for i in 1..tokens.len() {
        if tags[i] != Tag::Noun || tags[i - 1] != Tag::Noun {
            continue;
        }
        let word = tokens[i].lower.as_str();
        if !word.ends_with('s') || word.ends_with("ss") || tokens[i].possessive {
            continue;
        }
        let subject_start = i == 1
            || matches!(
                tags[i - 2],
                Tag::Determiner | Tag::Quantifier | Tag::Punct | Tag::Conjunction
            );
        let object_follows = matches!(
            tags.get(i + 1),
            Some(Tag::Noun | Tag::Determiner | Tag::Quantifier | Tag::Number | Tag::Preposition)
        );
        if subject_start && object_follows {
            tags[i] = Tag::Verb;
        }
    }

    // plural subject + unknown base-form verb: "doctors treat patients"
    let mut i = 0;
    while i + 2 < tokens.len() {
        let run = tags[i] == Tag::Noun && tags[i + 1] == Tag::Noun && tags[i + 2] == Tag::Noun;
        let subject_start = i == 0
            || matches!(
                tags[i - 1],
                Tag::Determiner | Tag::Quantifier | Tag::Punct | Tag::Conjunction
            );
        if run && subject_start && tokens[i].lower.ends_with('s') {
            tags[i + 1] = Tag::Verb;
            i += 2;
        } else {
            i += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::sentence::tokenize;

    fn tags_for(text: &str) -> Vec<Tag> {
        LexiconTagger.tag(&tokenize(text)).unwrap()
    }

    #[test]
    fn test_tags_scenario_sentence() {
        let tags = tags_for("A student enrolls in many courses");
        assert_eq!(
            tags,
            vec![
                Tag::Determiner,
                Tag::Noun,
                Tag::Verb,
                Tag::Preposition,
                Tag::Quantifier,
                Tag::Noun
            ]
        );
    }

    #[test]
    fn test_lexicon_verb_after_verb_is_noun() {
        // "orders" and "reviews" are objects, not verbs
        let tags = tags_for("A customer places reviews");
        assert_eq!(tags[2], Tag::Verb);
        assert_eq!(tags[3], Tag::Noun);
    }

    #[test]
    fn test_unknown_third_person_verb() {
        let tags = tags_for("A doctor treats patients");
        assert_eq!(tags[2], Tag::Verb);
        let tags = tags_for("Doctors cure patients");
        assert_eq!(tags, vec![Tag::Noun, Tag::Verb, Tag::Noun]);
    }

    #[test]
    fn test_irregular_participle_after_be() {
        let tags = tags_for("many books are written by authors");
        assert_eq!(tags[3], Tag::Verb);
        let tags = tags_for("each loan is taken by a member");
        assert_eq!(tags[3], Tag::Verb);
        let tags = tags_for("the prizes were chosen by judges");
        assert_eq!(tags[3], Tag::Verb);
        // plain nouns after "be" are left alone
        let tags = tags_for("the guests are children");
        assert_eq!(tags[3], Tag::Noun);
    }

    #[test]
    fn test_compound_nouns_survive() {
        let tags = tags_for("a phone number");
        assert_eq!(tags, vec![Tag::Determiner, Tag::Noun, Tag::Noun]);
    }

    #[test]
    fn test_modal_and_adverbs() {
        let tags = tags_for("each order must belong to exactly one customer");
        assert_eq!(tags[2], Tag::Modal);
        assert_eq!(tags[3], Tag::Verb);
        assert_eq!(tags[5], Tag::Adverb);
        assert_eq!(tags[6], Tag::Quantifier);
    }
}
