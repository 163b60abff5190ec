//! Name normalization for entity and attribute mentions
//!
//! Entity mentions are merged on their canonical form: the last word is
//! singularized, every word is title-cased and the words are joined
//! (`"order items"` → `"OrderItem"`). Attribute mentions become lower-case
//! snake identifiers (`"phone number"` → `"phone_number"`).

use super::lexicon::{contains, IRREGULAR_PLURALS, INVARIANT_WORDS};

/// Singularize a single English word (lower-cased result).
///
/// Handles the regular `-ies`, `-sses`, `-xes`, `-ches`, `-shes` and `-s`
/// endings plus a short irregular table. Words ending in `ss`, `us` or `is`
/// are left alone.
pub fn singularize(word: &str) -> String {
    let lower = word.to_lowercase();

    if let Some((_, singular)) = IRREGULAR_PLURALS.iter().find(|(plural, _)| *plural == lower) {
        return singular.to_string();
    }
    if contains(INVARIANT_WORDS, &lower) || lower.chars().count() <= 3 {
        return lower;
    }

    if let Some(stem) = lower.strip_suffix("ies") {
        if stem.chars().count() >= 2 {
            return format!("{}y", stem);
        }
    }
    for suffix in ["sses", "xes", "zzes", "ches", "shes"] {
        if lower.ends_with(suffix) {
            return lower[..lower.len() - 2].to_string();
        }
    }
    if lower.ends_with("ss") || lower.ends_with("us") || lower.ends_with("is") {
        return lower;
    }
    match lower.strip_suffix('s') {
        Some(stem) => stem.to_string(),
        None => lower,
    }
}

/// True if the word looks like a plural form
pub fn is_plural(word: &str) -> bool {
    let lower = word.to_lowercase();
    singularize(&lower) != lower
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Canonical entity name for a multi-word mention.
///
/// ```
/// use erscribe::extract::normalize::canonical_entity_name;
///
/// assert_eq!(canonical_entity_name(&["students"]), "Student");
/// assert_eq!(canonical_entity_name(&["order", "items"]), "OrderItem");
/// ```
pub fn canonical_entity_name<S: AsRef<str>>(words: &[S]) -> String {
    let cleaned: Vec<String> = words
        .iter()
        .map(|w| clean_word(w.as_ref()))
        .filter(|w| !w.is_empty())
        .collect();

    let last = cleaned.len().saturating_sub(1);
    cleaned
        .iter()
        .enumerate()
        .map(|(i, w)| {
            if i == last {
                title_case(&singularize(w))
            } else {
                title_case(w)
            }
        })
        .collect()
}

/// Snake-case attribute name for a multi-word mention
pub fn attribute_name<S: AsRef<str>>(words: &[S]) -> String {
    words
        .iter()
        .map(|w| clean_word(w.as_ref()))
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

/// Case-folded merge key for an entity name
pub fn merge_key(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

fn clean_word(word: &str) -> String {
    let trimmed = word
        .trim_end_matches("'s")
        .trim_end_matches("’s")
        .trim_end_matches('\'');
    trimmed
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_')
        .flat_map(char::to_lowercase)
        .collect()
}
