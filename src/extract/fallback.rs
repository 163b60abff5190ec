//! Coarse keyword extraction used when no tagger output is available

use super::lexicon::{
    contains, is_known_verb, ATTRIBUTE_WORDS, AUXILIARIES, MODALS, STOPWORDS, STOP_NOUNS,
};
use super::normalize::{canonical_entity_name, merge_key, singularize};
use super::patterns::Mention;
use super::registry::ExtractionBuilder;
use super::sentence::{split_sentences, tokenize};
use super::types::{CandidateRelationship, Cardinality, Extraction, ParticipationPair};

fn is_candidate(word: &str, min_token_len: usize) -> bool {
    let singular = singularize(word);
    word.chars().count() >= min_token_len
        && word.chars().all(char::is_alphabetic)
        && !contains(STOPWORDS, word)
        && !contains(AUXILIARIES, word)
        && !contains(MODALS, word)
        && !is_known_verb(word)
        && !contains(STOP_NOUNS, &singular)
        && !contains(ATTRIBUTE_WORDS, &singular)
}

/// Every long non-stopword token becomes an entity; consecutive distinct
/// entities within one sentence are linked ONE_TO_MANY.
pub(crate) fn coarse_extract(text: &str, min_token_len: usize) -> Extraction {
    let mut builder = ExtractionBuilder::new();
    let mut order: Vec<String> = Vec::new();
    let mut links: Vec<(String, String)> = Vec::new();

    for sentence in split_sentences(text) {
        let mut previous: Option<String> = None;
        for token in tokenize(&sentence) {
            if token.is_comma() || !is_candidate(&token.lower, min_token_len) {
                continue;
            }
            let name = canonical_entity_name(&[token.lower.as_str()]);
            let key = merge_key(&name);
            if !order.iter().any(|n| merge_key(n) == key) {
                order.push(name.clone());
            }
            if let Some(prev) = previous.take() {
                if merge_key(&prev) != key {
                    links.push((prev, name.clone()));
                }
            }
            previous = Some(name.clone());
            builder.absorb(vec![Mention::Entity {
                name,
                phrase: None,
                weak: false,
            }]);
        }
    }

    for (source, target) in links {
        builder.add_relationship(CandidateRelationship {
            source_entity: source,
            target_entity: target,
            cardinality: Cardinality::OneToMany,
            participation: ParticipationPair::default(),
            description: "relates to".to_string(),
        });
    }

    log::warn!(
        "coarse keyword extraction found {} candidate entities",
        order.len()
    );
    builder.finish()
}
