//! Closed word lists used by the tagger and the surface matchers.
//!
//! All entries are lower-case. Lists are deliberately small; the extractor
//! prefers recall and tolerates false positives.

pub(crate) const DETERMINERS: &[&str] = &[
    "a", "an", "the", "this", "that", "these", "those", "its", "their", "his", "her", "our",
    "your", "my", "whose",
];

pub(crate) const QUANTIFIERS: &[&str] = &[
    "each", "every", "all", "many", "multiple", "several", "some", "any", "no", "one", "single",
    "more", "most", "various", "numerous", "few", "zero", "least", "both", "another", "other",
    "two", "three",
];

/// Quantifiers that put the "many" end on a relationship
pub(crate) const MANY_WORDS: &[&str] = &[
    "many", "multiple", "several", "numerous", "various", "more", "some", "few", "all",
];

/// Quantifiers that put an explicit "one" end on a relationship
pub(crate) const ONE_WORDS: &[&str] = &["one", "single", "exactly", "only"];

pub(crate) const PREPOSITIONS: &[&str] = &[
    "in", "on", "at", "to", "for", "of", "with", "by", "from", "into", "onto", "about", "under",
    "over", "between", "through", "within", "without", "per", "via", "across", "among", "as",
    "after", "before", "during", "like",
];

pub(crate) const CONJUNCTIONS: &[&str] = &[
    "and", "or", "but", "nor", "while", "whereas", "which", "who", "where", "when", "if", "so",
    "than", "because",
];

pub(crate) const PRONOUNS: &[&str] = &[
    "it", "they", "he", "she", "we", "you", "i", "them", "him", "us", "whom", "there", "itself",
    "themselves", "someone", "something", "anyone",
];

pub(crate) const MODALS: &[&str] = &[
    "must", "may", "can", "cannot", "can't", "should", "will", "could", "might", "shall", "would",
    "won't", "shouldn't",
];

pub(crate) const AUXILIARIES: &[&str] = &[
    "is", "are", "was", "were", "be", "been", "being", "am", "has", "have", "had", "having", "do",
    "does", "did", "isn't", "aren't", "doesn't", "don't",
];

/// Forms of "be" that introduce a passive participle
pub(crate) const BE_FORMS: &[&str] = &[
    "is", "are", "was", "were", "be", "been", "being", "am", "isn't", "aren't",
];

pub(crate) const IRREGULAR_PARTICIPLES: &[&str] = &[
    "written", "taken", "given", "made", "held", "done", "seen", "known", "shown", "sold",
    "bought", "built", "kept", "led", "paid", "sent", "spent", "taught", "told", "found",
    "brought", "chosen", "driven", "drawn", "grown", "run", "won", "read", "put", "set", "met",
];

/// `-en` words that stay nouns after "be"
pub(crate) const EN_NOUNS: &[&str] = &[
    "children", "women", "kitchen", "garden", "token", "citizen", "screen", "oxygen", "chicken",
    "kitten", "linen", "specimen",
];

pub(crate) const ADVERBS: &[&str] = &[
    "not", "also", "always", "never", "exactly", "optionally", "only", "usually", "often", "just",
    "then", "too", "very", "uniquely", "either", "neither", "least", "still",
];

pub(crate) const ADJECTIVES: &[&str] = &[
    "unique", "optional", "required", "mandatory", "primary", "foreign", "own", "new",
    "different", "same", "main", "current", "specific", "individual", "certain", "valid",
    "possible", "weak", "following", "separate", "related", "associated", "corresponding",
];

/// Base forms of verbs that commonly link entities in domain descriptions
pub(crate) const VERBS: &[&str] = &[
    "have", "contain", "belong", "own", "manage", "enroll", "enrol", "teach", "take", "write",
    "place", "make", "include", "receive", "send", "create", "assign", "register", "attend",
    "hold", "purchase", "buy", "sell", "book", "rent", "borrow", "lend", "employ", "work",
    "supervise", "lead", "report", "depend", "store", "track", "reference", "relate", "link",
    "associate", "consist", "comprise", "provide", "offer", "serve", "use", "submit", "review",
    "rate", "follow", "like", "post", "publish", "issue", "ship", "deliver", "pay", "generate",
    "process", "handle", "perform", "participate", "require", "need", "exist", "identify",
    "describe", "treat", "visit", "join", "organize", "host", "sponsor", "supply",
    "produce", "reserve", "check", "approve", "schedule", "allocate", "maintain",
    "operate", "drive", "prescribe", "diagnose", "cover", "insure", "subscribe",
    "author", "edit", "upload", "share", "comment", "tag", "answer", "ask", "live", "locate",
    "run", "play", "win", "coach", "train", "study", "support", "define", "allow", "get",
    "give", "keep", "see", "want", "become", "appear", "list", "specify",
];

/// Verbs whose object list usually names attributes of the subject
pub(crate) const POSSESSION_VERBS: &[&str] = &[
    "has", "have", "having", "contains", "contain", "includes", "include", "stores", "store",
    "records", "record", "with", "holds", "hold", "tracks", "track",
];

/// Nouns that never become entities
pub(crate) const STOP_NOUNS: &[&str] = &[
    "system", "database", "application", "app", "information", "data", "detail", "thing",
    "way", "lot", "part", "attribute", "field", "property", "column", "key", "characteristic",
    "entity", "table", "relationship", "relation", "instance", "example", "kind", "sort",
    "set", "list", "number", "time", "case", "option", "value", "type", "one", "many", "side",
    "end", "etc", "other", "each", "following", "record", "null",
];

/// Head nouns that read as attributes rather than entities
pub(crate) const ATTRIBUTE_WORDS: &[&str] = &[
    "id", "identifier", "name", "title", "email", "phone", "address", "description", "price",
    "amount", "cost", "date", "time", "status", "age", "quantity", "total", "salary", "balance",
    "rating", "score", "code", "url", "password", "username", "gender", "birthday", "dob",
    "notes", "note", "content", "summary", "bio", "biography", "isbn", "sku", "color", "colour",
    "size", "weight", "height", "width", "length", "capacity", "duration", "fee", "grade",
    "location", "city", "country", "zip", "zipcode", "postcode", "street", "number", "label",
    "slug", "year", "month", "budget", "credits", "credit", "stock", "tax", "discount", "rank",
    "priority", "deadline", "version", "nickname", "website", "timestamp", "currency", "surname",
    "firstname", "lastname", "text", "body", "level", "mileage", "model", "brand", "ssn",
    "nationality", "occupation", "language", "semester", "startdate", "enddate", "flag",
    "checksum", "hash", "token", "avatar", "photo", "image", "picture",
];

/// Irregular plural → singular pairs
pub(crate) const IRREGULAR_PLURALS: &[(&str, &str)] = &[
    ("people", "person"),
    ("children", "child"),
    ("men", "man"),
    ("women", "woman"),
    ("mice", "mouse"),
    ("geese", "goose"),
    ("feet", "foot"),
    ("teeth", "tooth"),
    ("movies", "movie"),
    ("cookies", "cookie"),
    ("indices", "index"),
    ("criteria", "criterion"),
    ("analyses", "analysis"),
    ("statuses", "status"),
    ("buses", "bus"),
    ("aliases", "alias"),
    ("quizzes", "quiz"),
    ("staff", "staff"),
];

/// Words that look plural but are not
pub(crate) const INVARIANT_WORDS: &[&str] = &[
    "series", "species", "news", "data", "status", "address", "business", "class", "process",
    "access", "campus", "bus", "analysis", "basis", "thesis", "canvas", "alias", "bonus",
    "census", "virus", "corpus", "genus", "apparatus", "progress", "success", "always",
    "various", "numerous", "previous", "famous", "its", "this", "has", "is", "was", "does",
    "sms", "gps",
];

/// Function words ignored by the coarse fallback
pub(crate) const STOPWORDS: &[&str] = &[
    "about", "above", "after", "again", "against", "also", "because", "before", "being",
    "below", "between", "both", "cannot", "could", "does", "doing", "down", "during", "each",
    "every", "exactly", "from", "further", "have", "having", "here", "into", "itself", "just",
    "least", "many", "more", "most", "multiple", "must", "only", "other", "over", "same",
    "several", "should", "some", "such", "than", "that", "their", "them", "then", "there",
    "these", "they", "this", "those", "through", "under", "until", "very", "what", "when",
    "where", "which", "while", "will", "with", "within", "without", "would", "your", "shall",
    "might", "whose", "were", "been", "belongs", "belong", "contains", "contain", "includes",
    "include", "various", "numerous", "always", "never", "optionally", "single", "zero",
    "three", "another", "whom", "once", "any", "all", "has", "is", "are", "was",
];

pub(crate) fn contains(list: &[&str], word: &str) -> bool {
    list.contains(&word)
}

/// True if `word` (any inflection) is a known linking verb
pub(crate) fn is_known_verb(word: &str) -> bool {
    if contains(VERBS, word) || contains(AUXILIARIES, word) {
        return true;
    }
    verb_stems(word).iter().any(|stem| contains(VERBS, stem))
}

/// Candidate base forms for an inflected verb
fn verb_stems(word: &str) -> Vec<String> {
    let mut stems = Vec::new();
    if let Some(stem) = word.strip_suffix("ies") {
        stems.push(format!("{}y", stem));
    }
    if let Some(stem) = word.strip_suffix("es") {
        stems.push(stem.to_string());
    }
    if let Some(stem) = word.strip_suffix('s') {
        stems.push(stem.to_string());
    }
    if let Some(stem) = word.strip_suffix("ied") {
        stems.push(format!("{}y", stem));
    }
    if let Some(stem) = word.strip_suffix("ed") {
        stems.push(stem.to_string());
        // doubled consonant: "enrolled" -> "enroll", "shipped" -> "ship"
        let mut chars = stem.chars().rev();
        if let (Some(a), Some(b)) = (chars.next(), chars.next()) {
            if a == b {
                stems.push(stem[..stem.len() - a.len_utf8()].to_string());
            }
        }
    }
    if let Some(stem) = word.strip_suffix('d') {
        stems.push(stem.to_string());
    }
    if let Some(stem) = word.strip_suffix("ing") {
        stems.push(stem.to_string());
        stems.push(format!("{}e", stem));
    }
    stems
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_known_verb_inflections() {
        assert!(is_known_verb("enrolls"));
        assert!(is_known_verb("enrolled"));
        assert!(is_known_verb("belongs"));
        assert!(is_known_verb("places"));
        assert!(is_known_verb("supplies"));
        assert!(is_known_verb("shipped"));
        assert!(is_known_verb("has"));
        assert!(!is_known_verb("student"));
        assert!(!is_known_verb("course"));
    }
}
