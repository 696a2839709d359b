//! Text primitives shared by every metric module.
//!
//! One tokenizer serves style matching, catchphrase mining and the
//! emotional detectors so that token boundaries agree everywhere. All
//! regexes are compiled once and shared.

use std::sync::LazyLock;

use regex::Regex;

/// `https?://` link detector.
static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://\S+").expect("valid URL regex"));

/// Emoji pictographs: presentation emoji plus the extended pictographic
/// block (covers hearts, hands, faces; excludes plain digits and `#`).
static EMOJI_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\p{Emoji_Presentation}\p{Extended_Pictographic}]").expect("valid emoji regex")
});

/// Returns `true` if the text contains an `http(s)` URL.
pub fn contains_url(text: &str) -> bool {
    URL_RE.is_match(text)
}

/// Counts emoji pictographs in the text.
pub fn count_emoji(text: &str) -> usize {
    EMOJI_RE.find_iter(text).count()
}

/// Removes emoji pictographs from the text.
pub fn strip_emoji(text: &str) -> String {
    EMOJI_RE.replace_all(text, "").into_owned()
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '\'' || c == '\u{2019}'
}

/// Lowercases, strips emoji, and splits on whitespace and punctuation
/// (brackets, quotes, dashes, slashes included). Empty fragments are
/// filtered out. Diacritics survive.
pub fn tokenize(text: &str) -> Vec<String> {
    strip_emoji(text)
        .to_lowercase()
        .split(|c: char| !is_word_char(c))
        .filter(|t| !t.is_empty())
        .map(|t| t.trim_matches(['\'', '\u{2019}']).to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Tokens with stopwords removed.
pub fn content_tokens(text: &str) -> Vec<String> {
    tokenize(text)
        .into_iter()
        .filter(|t| !crate::lexicons::is_stopword(t))
        .collect()
}

/// Consecutive token pairs joined with a space.
pub fn bigrams(tokens: &[String]) -> Vec<String> {
    tokens
        .windows(2)
        .map(|w| format!("{} {}", w[0], w[1]))
        .collect()
}

/// Consecutive token triples joined with spaces.
pub fn trigrams(tokens: &[String]) -> Vec<String> {
    tokens
        .windows(3)
        .map(|w| format!("{} {} {}", w[0], w[1], w[2]))
        .collect()
}

/// Count of content-word types (length > `min_len`) shared by both token
/// lists. Used by the overlap tests in the response classifiers.
pub fn shared_content_words(a: &[String], b: &[String], min_len: usize) -> usize {
    use std::collections::BTreeSet;
    let set_a: BTreeSet<&str> = a
        .iter()
        .filter(|t| t.chars().count() > min_len && !crate::lexicons::is_stopword(t))
        .map(String::as_str)
        .collect();
    let set_b: BTreeSet<&str> = b
        .iter()
        .filter(|t| t.chars().count() > min_len && !crate::lexicons::is_stopword(t))
        .map(String::as_str)
        .collect();
    set_a.intersection(&set_b).count()
}
