//! Function-word categories for Language Style Matching.
//!
//! Nine categories, each a merged Polish + English table. Polish has no
//! articles, so demonstratives stand in for that category; conversations
//! where neither side uses them fall below the rate floor and the category
//! drops out of the LSM mean on its own.

use std::collections::HashSet;
use std::sync::LazyLock;

use super::freeze;

/// The nine LSM function-word categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FunctionCategory {
    Articles,
    Prepositions,
    AuxiliaryVerbs,
    Conjunctions,
    Negations,
    Quantifiers,
    PersonalPronouns,
    ImpersonalPronouns,
    Adverbs,
}

impl FunctionCategory {
    /// All categories in the order they are reported.
    pub fn all() -> &'static [FunctionCategory] {
        use FunctionCategory::*;
        &[
            Articles,
            Prepositions,
            AuxiliaryVerbs,
            Conjunctions,
            Negations,
            Quantifiers,
            PersonalPronouns,
            ImpersonalPronouns,
            Adverbs,
        ]
    }

    /// Stable identifier used as the map key in reports.
    pub fn key(&self) -> &'static str {
        match self {
            FunctionCategory::Articles => "articles",
            FunctionCategory::Prepositions => "prepositions",
            FunctionCategory::AuxiliaryVerbs => "auxiliary_verbs",
            FunctionCategory::Conjunctions => "conjunctions",
            FunctionCategory::Negations => "negations",
            FunctionCategory::Quantifiers => "quantifiers",
            FunctionCategory::PersonalPronouns => "personal_pronouns",
            FunctionCategory::ImpersonalPronouns => "impersonal_pronouns",
            FunctionCategory::Adverbs => "adverbs",
        }
    }
}

// English articles plus Polish demonstratives.
const ARTICLES: &[&str] = &[
    "a", "an", "the", "ten", "ta", "to", "ci", "te", "tego", "tej", "temu", "tym", "tą", "tamten",
    "tamta", "tamto", "tamte", "tamtego", "tamtej",
];

const PREPOSITIONS: &[&str] = &[
    "w", "we", "na", "do", "z", "ze", "za", "po", "o", "od", "pod", "nad", "przed", "przez",
    "przy", "bez", "dla", "między", "obok", "około", "u", "wśród", "in", "on", "at", "to", "from",
    "by", "with", "without", "for", "of", "about", "under", "over", "between", "through", "into",
    "onto", "during", "before", "after", "against",
];

const AUXILIARY_VERBS: &[&str] = &[
    "jest", "jestem", "jesteś", "jesteśmy", "jesteście", "są", "być", "był", "była", "było",
    "byli", "były", "będzie", "będę", "będziesz", "będziemy", "będą", "zostać", "został",
    "została", "am", "is", "are", "was", "were", "be", "been", "being", "have", "has", "had",
    "do", "does", "did", "will", "would", "shall", "should", "can", "could", "may", "might",
    "must",
];

const CONJUNCTIONS: &[&str] = &[
    "i", "oraz", "a", "ale", "lecz", "albo", "lub", "czy", "bo", "ponieważ", "więc", "zatem",
    "że", "żeby", "aby", "gdy", "kiedy", "jeśli", "jeżeli", "choć", "chociaż", "and", "but",
    "or", "nor", "so", "yet", "because", "although", "though", "while", "whereas", "if",
    "unless", "since", "that",
];

const NEGATIONS: &[&str] = &[
    "nie", "nigdy", "nic", "nikt", "nigdzie", "żaden", "żadna", "żadne", "ani", "no", "not",
    "never", "nothing", "nobody", "nowhere", "none", "neither", "don't", "doesn't", "didn't",
    "won't", "wouldn't", "can't", "couldn't", "isn't", "aren't", "wasn't", "weren't",
];

const QUANTIFIERS: &[&str] = &[
    "wszystko", "wszyscy", "wszystkie", "każdy", "każda", "każde", "kilka", "parę", "dużo",
    "mało", "trochę", "więcej", "mniej", "wiele", "większość", "all", "every", "each", "some",
    "any", "few", "many", "much", "more", "less", "most", "several", "lots", "plenty", "bit",
];

const PERSONAL_PRONOUNS: &[&str] = &[
    "ja", "mnie", "mi", "mną", "ty", "ciebie", "cię", "ci", "tobą", "tobie", "on", "ona", "ono",
    "jego", "go", "jej", "ją", "jemu", "mu", "nim", "nią", "my", "nas", "nam", "nami", "wy",
    "was", "wam", "wami", "oni", "one", "ich", "im", "nimi", "i", "me", "you", "he", "she",
    "him", "her", "we", "us", "they", "them",
];

const IMPERSONAL_PRONOUNS: &[&str] = &[
    "to", "coś", "cokolwiek", "nic", "wszystko", "ktoś", "nikt", "każdy", "it", "this", "that",
    "these", "those", "something", "anything", "everything", "nothing", "someone", "anyone",
    "everyone", "somebody", "anybody",
];

const ADVERBS: &[&str] = &[
    "bardzo", "tak", "też", "także", "również", "już", "jeszcze", "teraz", "potem", "zawsze",
    "często", "czasem", "rzadko", "tutaj", "tam", "dzisiaj", "wczoraj", "jutro", "szybko",
    "wolno", "dobrze", "źle", "naprawdę", "chyba", "może", "właśnie", "very", "so", "too",
    "also", "already", "still", "now", "then", "always", "often", "sometimes", "rarely", "here",
    "there", "today", "yesterday", "tomorrow", "quickly", "slowly", "well", "badly", "really",
    "maybe", "just", "quite", "rather",
];

static TABLES: LazyLock<[(FunctionCategory, HashSet<&'static str>); 9]> = LazyLock::new(|| {
    [
        (FunctionCategory::Articles, freeze(ARTICLES)),
        (FunctionCategory::Prepositions, freeze(PREPOSITIONS)),
        (FunctionCategory::AuxiliaryVerbs, freeze(AUXILIARY_VERBS)),
        (FunctionCategory::Conjunctions, freeze(CONJUNCTIONS)),
        (FunctionCategory::Negations, freeze(NEGATIONS)),
        (FunctionCategory::Quantifiers, freeze(QUANTIFIERS)),
        (FunctionCategory::PersonalPronouns, freeze(PERSONAL_PRONOUNS)),
        (
            FunctionCategory::ImpersonalPronouns,
            freeze(IMPERSONAL_PRONOUNS),
        ),
        (FunctionCategory::Adverbs, freeze(ADVERBS)),
    ]
});

/// Word table for one category.
pub fn category_words(category: FunctionCategory) -> &'static HashSet<&'static str> {
    &TABLES
        .iter()
        .find(|(c, _)| *c == category)
        .expect("all categories are tabled")
        .1
}
