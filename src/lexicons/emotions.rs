//! Emotional vocabulary: bilingual terms tagged with category and polarity.
//!
//! Feeds the intimacy progression, sentiment, emotional granularity and
//! deep-scanner scoring. Inflected Polish forms are listed explicitly; the
//! tokenizer does no stemming.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Coarse emotion family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmotionCategory {
    Joy,
    Sadness,
    Anger,
    Fear,
    Love,
    Surprise,
}

impl EmotionCategory {
    /// Number of distinct families; the granularity ceiling.
    pub const COUNT: usize = 6;
}

/// Valence of an emotion term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    Positive,
    Negative,
}

use EmotionCategory::*;
use Polarity::*;

type Entry = (&'static str, EmotionCategory, Polarity);

const TERMS: &[Entry] = &[
    // --- joy ---
    ("szczęśliwy", Joy, Positive),
    ("szczęśliwa", Joy, Positive),
    ("szczęście", Joy, Positive),
    ("radość", Joy, Positive),
    ("radosna", Joy, Positive),
    ("radosny", Joy, Positive),
    ("cieszę", Joy, Positive),
    ("cieszysz", Joy, Positive),
    ("zadowolony", Joy, Positive),
    ("zadowolona", Joy, Positive),
    ("super", Joy, Positive),
    ("świetnie", Joy, Positive),
    ("wspaniale", Joy, Positive),
    ("cudownie", Joy, Positive),
    ("happy", Joy, Positive),
    ("happiness", Joy, Positive),
    ("joy", Joy, Positive),
    ("glad", Joy, Positive),
    ("great", Joy, Positive),
    ("awesome", Joy, Positive),
    ("wonderful", Joy, Positive),
    ("amazing", Joy, Positive),
    ("excited", Joy, Positive),
    // --- sadness ---
    ("smutny", Sadness, Negative),
    ("smutna", Sadness, Negative),
    ("smutek", Sadness, Negative),
    ("smutno", Sadness, Negative),
    ("przykro", Sadness, Negative),
    ("płaczę", Sadness, Negative),
    ("płakać", Sadness, Negative),
    ("tęsknię", Sadness, Negative),
    ("tęskno", Sadness, Negative),
    ("samotny", Sadness, Negative),
    ("samotna", Sadness, Negative),
    ("przygnębiony", Sadness, Negative),
    ("przygnębiona", Sadness, Negative),
    ("sad", Sadness, Negative),
    ("sadness", Sadness, Negative),
    ("unhappy", Sadness, Negative),
    ("crying", Sadness, Negative),
    ("lonely", Sadness, Negative),
    ("miss", Sadness, Negative),
    ("depressed", Sadness, Negative),
    ("heartbroken", Sadness, Negative),
    // --- anger ---
    ("zły", Anger, Negative),
    ("zła", Anger, Negative),
    ("złość", Anger, Negative),
    ("wściekły", Anger, Negative),
    ("wściekła", Anger, Negative),
    ("wkurzony", Anger, Negative),
    ("wkurzona", Anger, Negative),
    ("wkurza", Anger, Negative),
    ("denerwuje", Anger, Negative),
    ("denerwujesz", Anger, Negative),
    ("nienawidzę", Anger, Negative),
    ("irytuje", Anger, Negative),
    ("angry", Anger, Negative),
    ("mad", Anger, Negative),
    ("furious", Anger, Negative),
    ("annoyed", Anger, Negative),
    ("annoying", Anger, Negative),
    ("hate", Anger, Negative),
    ("pissed", Anger, Negative),
    // --- fear ---
    ("boję", Fear, Negative),
    ("bałam", Fear, Negative),
    ("bałem", Fear, Negative),
    ("strach", Fear, Negative),
    ("przerażony", Fear, Negative),
    ("przerażona", Fear, Negative),
    ("martwię", Fear, Negative),
    ("martwisz", Fear, Negative),
    ("niepokój", Fear, Negative),
    ("stresuję", Fear, Negative),
    ("stres", Fear, Negative),
    ("afraid", Fear, Negative),
    ("scared", Fear, Negative),
    ("fear", Fear, Negative),
    ("worried", Fear, Negative),
    ("anxious", Fear, Negative),
    ("anxiety", Fear, Negative),
    ("terrified", Fear, Negative),
    ("stressed", Fear, Negative),
    // --- love ---
    ("kocham", Love, Positive),
    ("kochasz", Love, Positive),
    ("kochanie", Love, Positive),
    ("miłość", Love, Positive),
    ("uwielbiam", Love, Positive),
    ("przytul", Love, Positive),
    ("całuję", Love, Positive),
    ("buziaki", Love, Positive),
    ("love", Love, Positive),
    ("adore", Love, Positive),
    ("darling", Love, Positive),
    ("cuddle", Love, Positive),
    ("kisses", Love, Positive),
    ("xoxo", Love, Positive),
    // --- surprise ---
    ("zaskoczony", Surprise, Positive),
    ("zaskoczona", Surprise, Positive),
    ("niespodzianka", Surprise, Positive),
    ("niesamowite", Surprise, Positive),
    ("szok", Surprise, Positive),
    ("wow", Surprise, Positive),
    ("surprised", Surprise, Positive),
    ("surprise", Surprise, Positive),
    ("unbelievable", Surprise, Positive),
    ("incredible", Surprise, Positive),
    ("shocked", Surprise, Positive),
];

static INDEX: LazyLock<HashMap<&'static str, (EmotionCategory, Polarity)>> =
    LazyLock::new(|| TERMS.iter().map(|&(w, c, p)| (w, (c, p))).collect());

/// Looks up an emotion term; `None` for neutral vocabulary.
pub fn emotion_of(token: &str) -> Option<(EmotionCategory, Polarity)> {
    INDEX.get(token).copied()
}

/// Returns `true` if the token is in the emotional vocabulary.
pub fn is_emotional_word(token: &str) -> bool {
    INDEX.contains_key(token)
}
