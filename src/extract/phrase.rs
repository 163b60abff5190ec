//! Noun phrase chunking over a tagged sentence

use super::lexicon::{self, contains, ATTRIBUTE_WORDS, MANY_WORDS, ONE_WORDS, STOP_NOUNS};
use super::normalize::{attribute_name, canonical_entity_name, is_plural, singularize};
use super::sentence::Sentence;
use super::tagger::Tag;

/// Cardinality hint carried by the words in front of a noun phrase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantity {
    Many,
    One,
    Unspecified,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NounPhrase {
    /// Lower-cased words, possessive removed
    pub words: Vec<String>,
    /// First token index
    pub start: usize,
    /// One past the last token index
    pub end: usize,
    pub quantity: Quantity,
    pub plural: bool,
    /// Last word was written as a possessive
    pub possessive: bool,
}

impl NounPhrase {
    pub fn head(&self) -> &str {
        self.words.last().map(String::as_str).unwrap_or("")
    }

    pub fn entity_name(&self) -> String {
        canonical_entity_name(&self.words)
    }

    pub fn attribute_name(&self) -> String {
        attribute_name(&self.words)
    }

    /// Head noun reads as an attribute ("name", "phone number").
    ///
    /// A quantified-many attribute word ("many addresses") is treated as an
    /// entity so multi-valued attributes get their own table.
    pub fn is_attribute_like(&self) -> bool {
        let head = singularize(self.head());
        let attribute_head = contains(ATTRIBUTE_WORDS, &head)
            || contains(ATTRIBUTE_WORDS, self.head())
            || head.ends_with("_id")
            || head.ends_with("_at");
        attribute_head && self.quantity != Quantity::Many
    }

    /// Head noun can never name an entity
    pub fn is_stop_noun(&self) -> bool {
        let head = singularize(self.head());
        contains(STOP_NOUNS, &head)
            || head.chars().count() < 2
            || !head.chars().next().map_or(false, char::is_alphabetic)
            || lexicon::contains(lexicon::STOPWORDS, &head)
    }

    /// For "customer name": the non-attribute modifier naming the owner entity
    pub fn owner_modifier(&self) -> Option<String> {
        if self.words.len() < 2 {
            return None;
        }
        let modifier = &self.words[..self.words.len() - 1];
        let modifier_is_attribute = modifier
            .iter()
            .any(|w| contains(ATTRIBUTE_WORDS, &singularize(w)));
        if modifier_is_attribute || contains(STOP_NOUNS, &singularize(&modifier[0])) {
            return None;
        }
        Some(canonical_entity_name(modifier))
    }
}

/// Chunk maximal noun runs into phrases of at most two words.
///
/// A possessive word closes its phrase, so "customer's email" yields two
/// phrases. Longer runs are split into single-word phrases.
pub fn chunk(sentence: &Sentence, tags: &[Tag]) -> Vec<NounPhrase> {
    let tokens = &sentence.tokens;
    let mut phrases = Vec::new();
    let mut i = 0;

    while i < tokens.len() {
        if tags[i] != Tag::Noun {
            i += 1;
            continue;
        }
        let start = i;
        let mut end = i + 1;
        while end < tokens.len() && tags[end] == Tag::Noun && !tokens[end - 1].possessive {
            end += 1;
        }

        if end - start <= 2 {
            phrases.push(build(sentence, tags, start, end));
        } else {
            for k in start..end {
                phrases.push(build(sentence, tags, k, k + 1));
            }
        }
        i = end;
    }

    phrases
}

fn build(sentence: &Sentence, tags: &[Tag], start: usize, end: usize) -> NounPhrase {
    let words: Vec<String> = sentence.tokens[start..end]
        .iter()
        .map(|t| t.lower.clone())
        .collect();
    let head = words.last().cloned().unwrap_or_default();
    NounPhrase {
        plural: is_plural(&head),
        possessive: sentence.tokens[end - 1].possessive,
        quantity: quantity_before(sentence, tags, start),
        words,
        start,
        end,
    }
}

/// Look back over the modifiers in front of `start` for a quantity cue.
///
/// "one or more", "at least one" and "zero or more" read as many.
fn quantity_before(sentence: &Sentence, tags: &[Tag], start: usize) -> Quantity {
    let mut words: Vec<&str> = Vec::new();
    let mut j = start;
    while j > 0 && words.len() < 4 {
        let word = sentence.tokens[j - 1].lower.as_str();
        let modifier = matches!(
            tags[j - 1],
            Tag::Determiner | Tag::Quantifier | Tag::Adjective | Tag::Number | Tag::Adverb
        ) || matches!(word, "or" | "at");
        if !modifier {
            break;
        }
        words.push(word);
        j -= 1;
    }

    if words.iter().any(|w| contains(MANY_WORDS, w)) {
        return Quantity::Many;
    }
    if words
        .iter()
        .any(|w| w.chars().all(|c| c.is_ascii_digit()) && *w != "1")
    {
        return Quantity::Many;
    }
    if words.iter().any(|w| contains(ONE_WORDS, w) || *w == "1") {
        return Quantity::One;
    }
    Quantity::Unspecified
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::tagger::{LexiconTagger, PosTagger};

    fn phrases(text: &str) -> Vec<NounPhrase> {
        let sentence = Sentence::new(text);
        let tags = LexiconTagger.tag(&sentence.tokens).unwrap();
        chunk(&sentence, &tags)
    }

    #[test]
    fn test_quantities() {
        let nps = phrases("Each order belongs to exactly one customer");
        assert_eq!(nps.len(), 2);
        assert_eq!(nps[0].head(), "order");
        assert_eq!(nps[0].quantity, Quantity::Unspecified);
        assert_eq!(nps[1].head(), "customer");
        assert_eq!(nps[1].quantity, Quantity::One);
    }

    #[test]
    fn test_one_or_more_reads_as_many() {
        let nps = phrases("A playlist contains one or more songs");
        assert_eq!(nps[1].head(), "songs");
        assert_eq!(nps[1].quantity, Quantity::Many);
        assert!(nps[1].plural);
    }

    #[test]
    fn test_compound_and_possessive() {
        let nps = phrases("the customer's phone number");
        assert_eq!(nps.len(), 2);
        assert!(nps[0].possessive);
        assert_eq!(nps[1].attribute_name(), "phone_number");
        assert!(nps[1].is_attribute_like());
    }

    #[test]
    fn test_attribute_word_with_many_is_entity() {
        let nps = phrases("A customer has many addresses");
        assert!(!nps[1].is_attribute_like());
        assert_eq!(nps[1].entity_name(), "Address");
    }

    #[test]
    fn test_owner_modifier() {
        let nps = phrases("the customer name");
        assert_eq!(nps[0].owner_modifier(), Some("Customer".to_string()));
        let nps = phrases("the phone number");
        assert_eq!(nps[0].owner_modifier(), None);
    }
}
