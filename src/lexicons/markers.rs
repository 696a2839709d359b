//! Marker lists for the behavioural detectors.
//!
//! Each list can be extended without touching detector code. Entries are
//! lowercase. Multi-word entries match as
//! substrings of the lowercased content; single-word entries match whole
//! tokens, so "koniec" never fires inside "koniecznie".

use std::sync::LazyLock;

use regex::Regex;

// ============================================================================
// Shared matching helpers
// ============================================================================

/// `true` when any list entry is present: spaced phrases as substring of
/// the lowercased content, single words as whole tokens.
pub fn contains_marker(content_lower: &str, tokens: &[String], list: &'static [&'static str]) -> bool {
    find_marker(content_lower, tokens, list).is_some()
}

/// First matching list entry, if any.
pub fn find_marker(
    content_lower: &str,
    tokens: &[String],
    list: &'static [&'static str],
) -> Option<&'static str> {
    list.iter()
        .find(|entry| {
            if entry.contains(' ') {
                content_lower.contains(*entry)
            } else {
                tokens.iter().any(|t| t == *entry)
            }
        })
        .copied()
}

/// Number of distinct list entries present.
pub fn count_markers(content_lower: &str, tokens: &[String], list: &[&str]) -> usize {
    list.iter()
        .filter(|entry| {
            if entry.contains(' ') {
                content_lower.contains(*entry)
            } else {
                tokens.iter().any(|t| t == *entry)
            }
        })
        .count()
}

// ============================================================================
// Demand markers (pursuit detection)
// ============================================================================

/// Lexical cues that the sender is actively chasing a response. Entries
/// keep their punctuation and match as substrings of the lowercased
/// content, so a plain greeting "hello" never fires while "hello?" does.
pub const DEMAND_MARKERS: &[&str] = &[
    "halo?",
    "haloo",
    "odpowiedz",
    "odpisz",
    "odezwij się",
    "jesteś tam?",
    "czemu nie odpisujesz",
    "czemu milczysz",
    "śpisz?",
    "hello?",
    "helloo",
    "are you there",
    "you there?",
    "answer me",
    "where are you?",
];

/// Punctuation-only demand markers; the whole trimmed message must equal
/// one of these.
pub const DEMAND_PUNCTUATION: &[&str] = &["??", "???", "????"];

/// `true` when the message reads as a demand for response.
pub fn is_demand_message(content: &str) -> bool {
    let trimmed = content.trim();
    if DEMAND_PUNCTUATION.contains(&trimmed) {
        return true;
    }
    let lower = trimmed.to_lowercase();
    DEMAND_MARKERS.iter().any(|m| lower.contains(m))
}

// ============================================================================
// Repair markers
// ============================================================================

/// Asterisk-correction: `*word` at start or after whitespace.
pub static ASTERISK_REPAIR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(^|\s)\*\p{L}").expect("valid asterisk repair regex"));

/// Phrases announcing a self-correction.
pub const SELF_REPAIR_PHRASES: &[&str] = &[
    "miało być",
    "chodziło mi o",
    "to znaczy",
    "znaczy się",
    "źle napisałem",
    "źle napisałam",
    "literówka",
    "i mean",
    "i meant",
    "meant to say",
    "typo",
    "autocorrect",
];

/// Other-repair initiators ("what?"-class). Matched as a prefix of the
/// message, a standalone token, or the exact trimmed content.
pub const OTHER_REPAIR_MARKERS: &[&str] = &[
    "co?",
    "że co",
    "nie rozumiem",
    "o co chodzi",
    "w sensie",
    "jak to",
    "what?",
    "huh",
    "what do you mean",
    "i don't understand",
    "i dont understand",
    "wait what",
    "??",
];

// ============================================================================
// Temporal focus markers
// ============================================================================

/// Past-focus unigrams.
pub const PAST_WORDS: &[&str] = &[
    "wczoraj", "kiedyś", "wtedy", "było", "byłam", "byłem", "byliśmy", "pamiętam", "pamiętasz",
    "dawniej", "wspominam", "zrobiłem", "zrobiłam", "poszedłem", "poszłam", "widziałem",
    "widziałam", "yesterday", "remember", "ago", "was", "were", "did", "happened", "previously",
    "before",
];

/// Past-focus phrases (matched over bigrams/trigrams).
pub const PAST_PHRASES: &[&str] = &[
    "rok temu",
    "tydzień temu",
    "miesiąc temu",
    "w zeszłym tygodniu",
    "w zeszłym roku",
    "used to",
    "last week",
    "last year",
    "last month",
    "back then",
];

/// Present-focus unigrams.
pub const PRESENT_WORDS: &[&str] = &[
    "teraz", "dzisiaj", "dziś", "obecnie", "aktualnie", "właśnie", "dzisiejszy", "now", "today",
    "currently", "tonight", "nowadays",
];

/// Present-focus phrases.
pub const PRESENT_PHRASES: &[&str] = &["w tej chwili", "na razie", "right now", "at the moment"];

/// Future-focus unigrams.
pub const FUTURE_WORDS: &[&str] = &[
    "jutro", "będzie", "będę", "będziesz", "będziemy", "planuję", "zamierzam", "niedługo",
    "wkrótce", "pojutrze", "zrobię", "pojadę", "pojedziemy", "zobaczymy", "tomorrow", "will",
    "gonna", "soon", "later", "someday", "planning", "shall",
];

/// Future-focus phrases.
pub const FUTURE_PHRASES: &[&str] = &[
    "za tydzień",
    "za miesiąc",
    "w przyszłym tygodniu",
    "w przyszłym roku",
    "going to",
    "next week",
    "next month",
    "next year",
    "one day",
];

// ============================================================================
// Pet names
// ============================================================================

static PET_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(kochanie|kochany|kochana|skarbie|skarbeczku|misiu|misiaczku|słonko|słoneczko|kotku|kociaku|koteczku|żabko|myszko|rybeńko|cukiereczku|babe|baby|honey|sweetie|sweetheart|darling|boo|cutie|pumpkin)\b",
    )
    .expect("valid pet name regex")
});

/// Pet names present in the content, lowercased, in match order.
pub fn pet_name_matches(content: &str) -> Vec<String> {
    PET_NAME_RE
        .find_iter(content)
        .map(|m| m.as_str().to_lowercase())
        .collect()
}

// ============================================================================
// Strong assertions and affection (deep scanner)
// ============================================================================

/// Declarations that invite contradiction when the sender keeps texting.
pub const STRONG_ASSERTIONS: &[&str] = &[
    "nie obchodzi mnie",
    "koniec",
    "odchodzę",
    "mam dość",
    "nie chcę cię znać",
    "nie odezwę się",
    "nie piszę więcej",
    "blokuję cię",
    "never again",
    "i don't care",
    "i dont care",
    "i'm done",
    "im done",
    "it's over",
    "its over",
    "we're done",
    "leave me alone",
    "don't text me",
];

/// Affectionate phrases; any of these inside a contradiction window
/// resolves the assertion.
pub const AFFECTIONATE_PHRASES: &[&str] = &[
    "kocham cię",
    "kocham",
    "tęsknię",
    "przepraszam",
    "przytul",
    "buziak",
    "miss you",
    "love you",
    "i love",
    "sorry",
    "forgive me",
];

// ============================================================================
// Response classification (shift/support, bids)
// ============================================================================

/// Question-opening words, both languages.
pub const QUESTION_WORDS: &[&str] = &[
    "co", "jak", "kiedy", "gdzie", "dlaczego", "czemu", "kto", "ile", "czy", "który", "która",
    "które", "skąd", "dokąd", "what", "how", "when", "where", "why", "who", "which", "whose",
    "do", "does", "did", "is", "are", "can", "could", "would", "will", "should",
];

/// Acknowledgement tokens that open a supportive response.
pub const ACKNOWLEDGEMENTS: &[&str] = &[
    "aha", "mhm", "rozumiem", "jasne", "okej", "ok", "dobra", "racja", "prawda", "fakt", "serio",
    "naprawdę", "wow", "yeah", "yes", "right", "true", "exactly", "totally", "really", "damn",
    "oh",
];

/// Disclosure openers that mark a message as a bid for attention.
pub const DISCLOSURE_OPENERS: &[&str] = &[
    "czuję",
    "czuję że",
    "myślę że",
    "wydaje mi się",
    "muszę ci powiedzieć",
    "muszę ci coś powiedzieć",
    "wiesz co",
    "słuchaj",
    "powiem ci",
    "zgadnij",
    "szczerze",
    "i feel",
    "i think",
    "i believe",
    "you know what",
    "guess what",
    "i need to tell",
    "listen",
    "honestly",
];

/// Dismissal tokens; a short reply that is only one of these turns away.
pub const DISMISSALS: &[&str] = &[
    "ok", "k", "kk", "aha", "mhm", "spoko", "dobra", "nieważne", "whatever", "nvm", "fine",
    "cool", "meh", "idk", "sure",
];

/// Apology tokens.
pub const APOLOGY_TOKENS: &[&str] = &[
    "przepraszam",
    "przebacz",
    "wybacz",
    "sorki",
    "sory",
    "sorry",
    "apologize",
    "apologies",
    "my bad",
];

/// First-person reference, all Polish declensions plus English forms.
pub const SELF_REFERENCE: &[&str] = &[
    "ja", "mnie", "mi", "mną", "mój", "moja", "moje", "mojego", "mojej", "moim", "moją", "moich",
    "moimi", "jestem", "i", "i'm", "i've", "i'll", "me", "my", "mine",
];

/// Second-person (partner) reference.
pub const PARTNER_REFERENCE: &[&str] = &[
    "ty", "cię", "ciebie", "ci", "tobą", "tobie", "twój", "twoja", "twoje", "twojego", "twojej",
    "twoim", "twoją", "you", "your", "yours", "u",
];

// ============================================================================
// Integrative complexity markers
// ============================================================================

/// Differentiation: holding more than one perspective.
pub const DIFFERENTIATION_PHRASES: &[&str] = &[
    "z drugiej strony",
    "z jednej strony",
    "ale też",
    "chociaż",
    "jednak",
    "mimo to",
    "mimo że",
    "natomiast",
    "on the other hand",
    "on one hand",
    "however",
    "although",
    "but also",
    "then again",
    "at the same time",
];

/// Integration: connecting perspectives into a conclusion.
pub const INTEGRATION_PHRASES: &[&str] = &[
    "dlatego",
    "w związku z tym",
    "biorąc pod uwagę",
    "podsumowując",
    "wynika z tego",
    "w efekcie",
    "dzięki temu",
    "therefore",
    "taking into account",
    "considering",
    "overall",
    "this means",
    "which explains",
    "as a result",
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::tokenize;

    #[test]
    fn test_demand_message() {
        assert!(is_demand_message("halo?"));
        assert!(is_demand_message("no odpisz wreszcie"));
        assert!(is_demand_message("??"));
        assert!(is_demand_message("are you there"));
        assert!(!is_demand_message("co robisz wieczorem"));
        // A single "?" is an ordinary question, not a demand
        assert!(!is_demand_message("?"));
    }

    #[test]
    fn test_marker_single_word_is_token_bound() {
        let content = "koniecznie musimy tam pojechać";
        let tokens = tokenize(content);
        assert!(find_marker(content, &tokens, STRONG_ASSERTIONS).is_none());

        let content = "to już koniec";
        let tokens = tokenize(content);
        assert_eq!(
            find_marker(content, &tokens, STRONG_ASSERTIONS),
            Some("koniec")
        );
    }

    #[test]
    fn test_marker_phrase_is_substring() {
        let content = "serio nie obchodzi mnie to wcale";
        let tokens = tokenize(content);
        assert_eq!(
            find_marker(content, &tokens, STRONG_ASSERTIONS),
            Some("nie obchodzi mnie")
        );
    }

    #[test]
    fn test_asterisk_repair_regex() {
        assert!(ASTERISK_REPAIR_RE.is_match("*jutro"));
        assert!(ASTERISK_REPAIR_RE.is_match("mialo byc *jutro"));
        assert!(ASTERISK_REPAIR_RE.is_match("*świetnie"));
        assert!(!ASTERISK_REPAIR_RE.is_match("2*3=6"));
        assert!(!ASTERISK_REPAIR_RE.is_match("gwiazdka * sama"));
    }

    #[test]
    fn test_pet_names() {
        assert_eq!(pet_name_matches("dobranoc Kochanie"), vec!["kochanie"]);
        assert_eq!(
            pet_name_matches("hej misiu, baby"),
            vec!["misiu", "baby"]
        );
        assert!(pet_name_matches("zwykła wiadomość").is_empty());
    }

    #[test]
    fn test_count_markers() {
        let content = "z jednej strony tak, z drugiej strony nie, jednak wątpię";
        let tokens = tokenize(content);
        assert_eq!(count_markers(content, &tokens, DIFFERENTIATION_PHRASES), 3);
    }
}
