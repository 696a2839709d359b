//! Temporal focus: past / present / future marker rates and orientation.

use indexmap::IndexMap;
use serde::Serialize;

use crate::lexicons::{
    FUTURE_PHRASES, FUTURE_WORDS, PAST_PHRASES, PAST_WORDS, PRESENT_PHRASES, PRESENT_WORDS,
};
use crate::model::ParsedConversation;
use crate::stats::{round1, round2};
use crate::text::{bigrams, tokenize, trigrams};
use crate::timeutil::month_key;

/// Minimum words per person.
const MIN_WORDS: usize = 500;

/// Temporal orientation band.
///
/// Serialized sentinels are the stable enumeration downstream consumers
/// match on; [`Orientation::label_pl`] carries the display string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    Prospective,
    PresentFocused,
    Retrospective,
}

impl Orientation {
    /// Band thresholds on the future index.
    pub fn of(future_index: f64) -> Self {
        if future_index >= 0.35 {
            Orientation::Prospective
        } else if future_index >= 0.20 {
            Orientation::PresentFocused
        } else {
            Orientation::Retrospective
        }
    }

    /// Polish display label.
    pub fn label_pl(&self) -> &'static str {
        match self {
            Orientation::Prospective => "prospektywna",
            Orientation::PresentFocused => "teraźniejsza",
            Orientation::Retrospective => "retrospektywna",
        }
    }
}

/// Temporal-focus profile of one participant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonTemporal {
    pub words: usize,
    pub past_per_1000: f64,
    pub present_per_1000: f64,
    pub future_per_1000: f64,
    /// `future / (past + present + future + 1e-3)`
    pub future_index: f64,
    pub orientation: Orientation,
}

/// Temporal-focus result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemporalAnalysis {
    pub per_person: IndexMap<String, PersonTemporal>,
    /// Combined future index per month
    pub monthly_future_index: IndexMap<String, f64>,
}

#[derive(Default, Clone, Copy)]
struct Hits {
    past: usize,
    present: usize,
    future: usize,
    words: usize,
}

fn scan(content: &str) -> Hits {
    let tokens = tokenize(content);
    let mut hits = Hits {
        words: tokens.len(),
        ..Hits::default()
    };

    for token in &tokens {
        if PAST_WORDS.contains(&token.as_str()) {
            hits.past += 1;
        }
        if PRESENT_WORDS.contains(&token.as_str()) {
            hits.present += 1;
        }
        if FUTURE_WORDS.contains(&token.as_str()) {
            hits.future += 1;
        }
    }
    for ngram in bigrams(&tokens).into_iter().chain(trigrams(&tokens)) {
        if PAST_PHRASES.contains(&ngram.as_str()) {
            hits.past += 1;
        }
        if PRESENT_PHRASES.contains(&ngram.as_str()) {
            hits.present += 1;
        }
        if FUTURE_PHRASES.contains(&ngram.as_str()) {
            hits.future += 1;
        }
    }
    hits
}

fn future_index(hits: Hits) -> f64 {
    hits.future as f64 / (hits.past as f64 + hits.present as f64 + hits.future as f64 + 1e-3)
}

pub fn analyze(conv: &ParsedConversation) -> Option<TemporalAnalysis> {
    let mut per_person_hits: IndexMap<String, Hits> = conv
        .participants
        .iter()
        .map(|p| (p.name.clone(), Hits::default()))
        .collect();
    let mut monthly_hits: IndexMap<String, Hits> = IndexMap::new();

    for msg in conv.user_messages() {
        if msg.content.is_empty() {
            continue;
        }
        let hits = scan(&msg.content);
        if let Some(person) = per_person_hits.get_mut(&msg.sender) {
            person.past += hits.past;
            person.present += hits.present;
            person.future += hits.future;
            person.words += hits.words;
        }
        let month = monthly_hits.entry(month_key(msg.timestamp)).or_default();
        month.past += hits.past;
        month.present += hits.present;
        month.future += hits.future;
        month.words += hits.words;
    }

    if per_person_hits.values().any(|h| h.words < MIN_WORDS) {
        return None;
    }

    let per_person = per_person_hits
        .into_iter()
        .map(|(name, hits)| {
            let per_1000 = |n: usize| round1(n as f64 / hits.words as f64 * 1000.0);
            let index = round2(future_index(hits));
            (
                name,
                PersonTemporal {
                    words: hits.words,
                    past_per_1000: per_1000(hits.past),
                    present_per_1000: per_1000(hits.present),
                    future_per_1000: per_1000(hits.future),
                    future_index: index,
                    orientation: Orientation::of(index),
                },
            )
        })
        .collect();

    monthly_hits.sort_keys();
    let monthly_future_index = monthly_hits
        .into_iter()
        .map(|(month, hits)| (month, round2(future_index(hits))))
        .collect();

    Some(TemporalAnalysis {
        per_person,
        monthly_future_index,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Participant, UnifiedMessage};
    use crate::parser::Platform;

    const MIN: i64 = 60 * 1000;

    #[test]
    fn test_orientation_bands() {
        assert_eq!(Orientation::of(0.35), Orientation::Prospective);
        assert_eq!(Orientation::of(0.20), Orientation::PresentFocused);
        assert_eq!(Orientation::of(0.0), Orientation::Retrospective);
    }

    #[test]
    fn test_scan_unigrams_and_phrases() {
        let hits = scan("pamiętam jak rok temu było super a jutro pojedziemy w góry");
        assert!(hits.past >= 2); // "pamiętam", "było", "rok temu"
        assert!(hits.future >= 2); // "jutro", "pojedziemy"
    }

    #[test]
    fn test_min_words_floor() {
        let messages = vec![
            UnifiedMessage::text("Ala", "krótko", 0),
            UnifiedMessage::text("Bartek", "też krótko", MIN),
        ];
        let conv = ParsedConversation::finalize(
            Platform::Messenger,
            "t".to_string(),
            vec![Participant::new("Ala"), Participant::new("Bartek")],
            messages,
            vec![],
        );
        assert!(analyze(&conv).is_none());
    }

    #[test]
    fn test_future_oriented_pair() {
        // Each message: 10 words, one future marker ("jutro")
        let text = "jutro zaplanujemy wspólnie kolejne duże wakacje nad polskim morzem razem";
        let messages: Vec<UnifiedMessage> = (0..120)
            .map(|i| {
                let sender = if i % 2 == 0 { "Ala" } else { "Bartek" };
                UnifiedMessage::text(sender, text, i as i64 * MIN)
            })
            .collect();
        let conv = ParsedConversation::finalize(
            Platform::Messenger,
            "t".to_string(),
            vec![Participant::new("Ala"), Participant::new("Bartek")],
            messages,
            vec![],
        );
        let result = analyze(&conv).expect("enough words");
        let ala = &result.per_person["Ala"];
        assert!(ala.words >= 500);
        assert_eq!(ala.orientation, Orientation::Prospective);
        assert_eq!(result.monthly_future_index.len(), 1);
        assert!(result.monthly_future_index["1970-01"] > 0.9);
    }
}
