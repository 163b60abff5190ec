//! Sentence splitting and tokenization

use once_cell::sync::Lazy;
use regex::Regex;

static TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\p{L}\p{N}]+(?:['’]\p{L}+)?(?:[-_:][\p{L}\p{N}*]+)*|,")
        .expect("token regex is valid")
});

/// A word (or comma) within a sentence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Surface text as written
    pub text: String,
    /// Lower-cased text with any possessive `'s` removed
    pub lower: String,
    /// Written as a possessive (`customer's`)
    pub possessive: bool,
}

impl Token {
    pub fn new(text: &str) -> Self {
        let folded = text.to_lowercase().replace('’', "'");
        let (lower, possessive) = match folded.strip_suffix("'s") {
            Some(stem) if !stem.is_empty() => (stem.to_string(), true),
            _ => (folded, false),
        };
        Self {
            text: text.to_string(),
            lower,
            possessive,
        }
    }

    pub fn is_comma(&self) -> bool {
        self.text == ","
    }

    pub fn is_alphabetic(&self) -> bool {
        !self.lower.is_empty() && self.lower.chars().all(|c| c.is_alphabetic())
    }
}

#[derive(Debug, Clone)]
pub struct Sentence {
    pub text: String,
    pub lower: String,
    pub tokens: Vec<Token>,
}

impl Sentence {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            lower: text.to_lowercase(),
            tokens: tokenize(text),
        }
    }

    /// Token index of `word` at or after `from`
    pub fn find(&self, word: &str, from: usize) -> Option<usize> {
        (from..self.tokens.len()).find(|&i| self.tokens[i].lower == word)
    }

    /// Token index where the word sequence `words` starts, at or after `from`
    pub fn find_seq(&self, words: &[&str], from: usize) -> Option<usize> {
        if words.is_empty() || self.tokens.len() < words.len() {
            return None;
        }
        (from..=self.tokens.len() - words.len()).find(|&i| {
            words
                .iter()
                .enumerate()
                .all(|(k, w)| self.tokens[i + k].lower == *w)
        })
    }

    pub fn has_word(&self, word: &str) -> bool {
        self.tokens.iter().any(|t| t.lower == word)
    }
}

/// Split text into sentences.
///
/// `!`, `?`, `;` and line breaks always end a sentence; `.` only does when it
/// is followed by whitespace or the end of input, so `3.5` stays intact.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        let ends = match c {
            '!' | '?' | ';' | '\n' | '\r' => true,
            '.' => chars.peek().map_or(true, |next| next.is_whitespace()),
            _ => false,
        };
        if ends {
            push_sentence(&mut sentences, &current);
            current.clear();
        } else {
            current.push(c);
        }
    }
    push_sentence(&mut sentences, &current);
    sentences
}

fn push_sentence(sentences: &mut Vec<String>, raw: &str) {
    let trimmed = raw.trim();
    if trimmed.chars().any(|c| c.is_alphabetic()) {
        sentences.push(trimmed.to_string());
    }
}

pub fn tokenize(sentence: &str) -> Vec<Token> {
    TOKEN_RE
        .find_iter(sentence)
        .map(|m| Token::new(m.as_str()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_sentences() {
        let sentences = split_sentences("A student has a name. Each course costs 3.5 credits!\nDone");
        assert_eq!(
            sentences,
            vec!["A student has a name", "Each course costs 3.5 credits", "Done"]
        );
    }

    #[test]
    fn test_split_sentences_skips_punctuation_only() {
        assert!(split_sentences("... !!! ;;").is_empty());
        assert!(split_sentences("").is_empty());
    }

    #[test]
    fn test_tokenize_keeps_compound_tokens() {
        let tokens = tokenize("Users and posts have a one-to-many (1:M) link, created_at too");
        let words: Vec<&str> = tokens.iter().map(|t| t.lower.as_str()).collect();
        assert_eq!(
            words,
            vec![
                "users", "and", "posts", "have", "a", "one-to-many", "1:m", "link", ",",
                "created_at", "too"
            ]
        );
    }

    #[test]
    fn test_tokenize_keeps_accented_words_whole() {
        let tokens = tokenize("Jeder Schüler besucht ein Café, naïve-ish");
        let words: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(
            words,
            vec!["Jeder", "Schüler", "besucht", "ein", "Café", ",", "naïve-ish"]
        );
        assert_eq!(tokens[1].lower, "schüler");
        assert!(tokens[4].is_alphabetic());
    }

    #[test]
    fn test_possessive_token() {
        let tokens = tokenize("the customer's email");
        assert_eq!(tokens[1].lower, "customer");
        assert!(tokens[1].possessive);
        assert!(!tokens[2].possessive);
    }

    #[test]
    fn test_find_seq() {
        let sentence = Sentence::new("Each order belongs to exactly one customer");
        assert_eq!(sentence.find_seq(&["belongs", "to"], 0), Some(2));
        assert_eq!(sentence.find_seq(&["belongs", "from"], 0), None);
        assert_eq!(sentence.find("customer", 0), Some(6));
    }
}
