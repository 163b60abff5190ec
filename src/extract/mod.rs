//! Concept extraction: natural-language text to candidate entities,
//! attributes and relationships.
//!
//! The extractor is rule based. Text is split into sentences, tokenized and
//! tagged with a [`PosTagger`]; noun phrases are chunked and handed to an
//! ordered battery of matchers (attribute lists, identification, constraint
//! cues, possession, weak entities, plain entities, relationships). Mentions
//! from every sentence are merged into one [`Extraction`] in first-seen order.
//!
//! If the tagger cannot produce tags for a sentence the whole text is run
//! through a coarse keyword pass instead, so extraction never fails outright.
//!
//! # Example
//!
//! ```
//! use erscribe::extract::{extract, Cardinality};
//!
//! let extraction = extract("Each order belongs to exactly one customer.");
//! assert_eq!(extraction.entities.len(), 2);
//! assert_eq!(extraction.relationships[0].cardinality, Cardinality::ManyToOne);
//! ```

pub mod classify;
pub mod constraints;
mod fallback;
pub(crate) mod lexicon;
pub mod normalize;
mod patterns;
pub mod phrase;
mod registry;
pub mod sentence;
pub mod tagger;
pub mod types;

pub use classify::classify;
pub use tagger::{LexiconTagger, PosTagger, Tag};
pub use types::{
    CandidateAttribute, CandidateEntity, CandidateRelationship, Cardinality, DataType, Extraction,
    Participation, ParticipationPair,
};

use crate::config::ExtractionConfig;
use patterns::{run_matchers, Mention, SentenceContext};
use registry::ExtractionBuilder;
use sentence::{split_sentences, Sentence};

/// Rule-based concept extractor
pub struct RuleBasedExtractor {
    tagger: Box<dyn PosTagger>,
    min_token_len: usize,
}

impl std::fmt::Debug for RuleBasedExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleBasedExtractor")
            .field("min_token_len", &self.min_token_len)
            .finish_non_exhaustive()
    }
}

impl Default for RuleBasedExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleBasedExtractor {
    pub fn new() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            tagger: Box::new(LexiconTagger),
            min_token_len: config.min_token_len,
        }
    }

    /// Replace the part-of-speech tagger
    pub fn with_tagger(mut self, tagger: impl PosTagger + 'static) -> Self {
        self.tagger = Box::new(tagger);
        self
    }

    /// Extract candidate concepts from free text.
    ///
    /// Never fails: empty or whitespace-only input gives an empty
    /// [`Extraction`], and an unusable tagger triggers the keyword fallback.
    pub fn extract(&self, text: &str) -> Extraction {
        let sentences: Vec<Sentence> = split_sentences(text)
            .iter()
            .map(|s| Sentence::new(s))
            .collect();
        if sentences.is_empty() {
            log::debug!("no sentences found in input");
            return Extraction::default();
        }

        let mut tagged = Vec::with_capacity(sentences.len());
        for sentence in &sentences {
            match self.tagger.tag(&sentence.tokens) {
                Some(tags) if tags.len() == sentence.tokens.len() => tagged.push(tags),
                _ => {
                    log::warn!(
                        "tagger produced no usable tags for \"{}\", using keyword fallback",
                        sentence.text
                    );
                    return fallback::coarse_extract(text, self.min_token_len);
                }
            }
        }

        let mut builder = ExtractionBuilder::new();
        let mut previous_subject: Option<String> = None;
        for (sentence, tags) in sentences.iter().zip(&tagged) {
            let phrases = phrase::chunk(sentence, tags);
            let ctx = SentenceContext {
                sentence,
                tags,
                phrases: &phrases,
                previous_subject: previous_subject.as_deref(),
            };
            let mentions = run_matchers(&ctx);
            log::debug!(
                "{} mention(s) from \"{}\"",
                mentions.len(),
                sentence.text
            );

            let subject = mentions
                .iter()
                .filter_map(|m| match m {
                    Mention::Entity {
                        name,
                        phrase: Some(p),
                        ..
                    } => Some((phrases[*p].start, name.clone())),
                    _ => None,
                })
                .min_by_key(|(start, _)| *start)
                .map(|(_, name)| name);
            if subject.is_some() {
                previous_subject = subject;
            }
            builder.absorb(mentions);
        }

        if builder.is_empty() {
            log::info!("no entities recognized; trying keyword fallback");
            return fallback::coarse_extract(text, self.min_token_len);
        }
        let extraction = builder.finish();
        log::info!(
            "extracted {} entities and {} relationships",
            extraction.entities.len(),
            extraction.relationships.len()
        );
        extraction
    }

    /// Extract from raw bytes; invalid UTF-8 sequences are replaced
    pub fn extract_bytes(&self, bytes: &[u8]) -> Extraction {
        self.extract(&String::from_utf8_lossy(bytes))
    }
}

/// Extract with the default rule-based extractor
pub fn extract(text: &str) -> Extraction {
    RuleBasedExtractor::new().extract(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::sentence::Token;

    struct BrokenTagger;

    impl PosTagger for BrokenTagger {
        fn tag(&self, _tokens: &[Token]) -> Option<Vec<Tag>> {
            None
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(extract("").is_empty());
        assert!(extract("   \n\t ").is_empty());
    }

    #[test]
    fn test_many_to_many_scenario() {
        let extraction =
            extract("A student enrolls in many courses and each course has many students.");
        let names: Vec<&str> = extraction.entities.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Student", "Course"]);
        assert_eq!(extraction.relationships.len(), 1);
        assert_eq!(extraction.relationships[0].cardinality, Cardinality::ManyToMany);
    }

    #[test]
    fn test_previous_subject_carries_constraints() {
        let extraction = extract("Each customer has an email. The email must be unique.");
        let customer = extraction.entity("Customer").unwrap();
        let email = customer.attribute("email").unwrap();
        assert!(email.is_unique);
        assert_eq!(email.inferred_data_type, DataType::String);
    }

    #[test]
    fn test_broken_tagger_uses_fallback() {
        let extractor = RuleBasedExtractor::new().with_tagger(BrokenTagger);
        let extraction = extractor.extract("Warehouses store products");
        let names: Vec<&str> = extraction.entities.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Warehouse", "Product"]);
        assert_eq!(extraction.relationships.len(), 1);
    }

    #[test]
    fn test_fallback_does_not_link_across_sentences() {
        let extractor = RuleBasedExtractor::new().with_tagger(BrokenTagger);
        let extraction = extractor.extract("Doctors treat patients. Hospitals employ nurses.");
        assert_eq!(extraction.entities.len(), 4);
        assert_eq!(extraction.relationships.len(), 2);
        assert!(!extraction
            .relationships
            .iter()
            .any(|r| r.source_entity == "Patient" && r.target_entity == "Hospital"));
    }

    #[test]
    fn test_passive_participle_is_not_an_entity() {
        let extraction = extract("A library has many books. Many books are written by authors.");
        assert!(extraction.entity("Written").is_none());
        assert!(extraction.entity("Author").is_some());
        assert!(extraction
            .relationships
            .iter()
            .all(|r| r.source_entity != "Written" && r.target_entity != "Written"));
    }

    #[test]
    fn test_accented_names_survive_extraction() {
        let extraction = extract("A café has many baristas.");
        assert!(extraction.entity("Café").is_some(), "{:?}", extraction.entities);
        assert!(extraction.entity("Barista").is_some());
        assert!(extraction.entity("Caf").is_none());
    }

    #[test]
    fn test_extract_bytes_lossy() {
        let extraction = RuleBasedExtractor::new().extract_bytes(b"A library has many books\xff");
        assert!(extraction.entity("Library").is_some());
    }
}
