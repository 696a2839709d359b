//! Emotional granularity: how differentiated a person's emotion
//! vocabulary is, not how much of it there is.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use serde::Serialize;

use crate::lexicons::{EmotionCategory, emotion_of};
use crate::model::ParsedConversation;
use crate::text::tokenize;

/// Minimum words and emotion hits per person.
const MIN_WORDS: usize = 200;
const MIN_HITS: usize = 5;

/// Granularity band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GranularityBand {
    High,
    Moderate,
    Low,
}

impl GranularityBand {
    fn of(score: i64) -> Self {
        if score >= 60 {
            GranularityBand::High
        } else if score >= 35 {
            GranularityBand::Moderate
        } else {
            GranularityBand::Low
        }
    }

    /// Polish display label.
    pub fn label_pl(&self) -> &'static str {
        match self {
            GranularityBand::High => "wysoka",
            GranularityBand::Moderate => "umiarkowana",
            GranularityBand::Low => "niska",
        }
    }
}

/// Granularity profile of one participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonGranularity {
    pub emotion_hits: usize,
    pub distinct_terms: usize,
    pub categories_used: usize,
    /// `clamp(round((0.6·terms/hits + 0.4·categories/6) · 100), 0, 100)`
    pub score: i64,
    pub band: GranularityBand,
}

/// Emotional-granularity result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GranularityAnalysis {
    pub per_person: IndexMap<String, PersonGranularity>,
}

pub fn analyze(conv: &ParsedConversation) -> Option<GranularityAnalysis> {
    struct Acc {
        words: usize,
        hits: usize,
        terms: BTreeSet<String>,
        categories: BTreeSet<&'static str>,
    }

    let mut accs: IndexMap<String, Acc> = conv
        .participants
        .iter()
        .map(|p| {
            (
                p.name.clone(),
                Acc {
                    words: 0,
                    hits: 0,
                    terms: BTreeSet::new(),
                    categories: BTreeSet::new(),
                },
            )
        })
        .collect();

    for msg in conv.user_messages() {
        let Some(acc) = accs.get_mut(&msg.sender) else {
            continue;
        };
        for token in tokenize(&msg.content) {
            acc.words += 1;
            if let Some((category, _)) = emotion_of(&token) {
                acc.hits += 1;
                acc.terms.insert(token);
                acc.categories.insert(category_key(category));
            }
        }
    }

    if accs.values().any(|a| a.words < MIN_WORDS || a.hits < MIN_HITS) {
        return None;
    }

    let per_person = accs
        .into_iter()
        .map(|(name, acc)| {
            let term_ratio = acc.terms.len() as f64 / acc.hits as f64;
            let category_ratio = acc.categories.len() as f64 / EmotionCategory::COUNT as f64;
            let score = ((0.6 * term_ratio + 0.4 * category_ratio) * 100.0)
                .round()
                .clamp(0.0, 100.0) as i64;
            (
                name,
                PersonGranularity {
                    emotion_hits: acc.hits,
                    distinct_terms: acc.terms.len(),
                    categories_used: acc.categories.len(),
                    score,
                    band: GranularityBand::of(score),
                },
            )
        })
        .collect();

    Some(GranularityAnalysis { per_person })
}

fn category_key(category: EmotionCategory) -> &'static str {
    match category {
        EmotionCategory::Joy => "joy",
        EmotionCategory::Sadness => "sadness",
        EmotionCategory::Anger => "anger",
        EmotionCategory::Fear => "fear",
        EmotionCategory::Love => "love",
        EmotionCategory::Surprise => "surprise",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Participant, UnifiedMessage};
    use crate::parser::Platform;

    const MIN: i64 = 60 * 1000;

    fn conv_repeated(text_a: &str, text_b: &str, n: usize) -> ParsedConversation {
        let mut messages = Vec::new();
        for i in 0..n {
            let base = i as i64 * 10 * MIN;
            messages.push(UnifiedMessage::text("Ala", text_a, base));
            messages.push(UnifiedMessage::text("Bartek", text_b, base + MIN));
        }
        ParsedConversation::finalize(
            Platform::Messenger,
            "t".to_string(),
            vec![Participant::new("Ala"), Participant::new("Bartek")],
            messages,
            vec![],
        )
    }

    #[test]
    fn test_floors() {
        assert!(analyze(&conv_repeated("super", "smutno", 4)).is_none());
    }

    #[test]
    fn test_varied_vocabulary_scores_higher() {
        // Ala names many distinct emotions; Bartek repeats one word.
        let varied = "cieszę się ale też boję i czasem martwię bo kocham i tęsknię za tobą \
                      mimo że złość też bywa i smutek przychodzi wieczorem do mnie często";
        let flat = "smutno mi dzisiaj bardzo i jutro pewnie też będzie smutno mi znowu \
                    wieczorem jak zawsze smutno i ciężko na sercu przez te wszystkie dni";
        let result = analyze(&conv_repeated(varied, flat, 12)).expect("enough data");
        let ala = &result.per_person["Ala"];
        let bartek = &result.per_person["Bartek"];
        assert!(ala.categories_used >= 4);
        assert!(bartek.categories_used <= 2);
        assert!(ala.score > bartek.score);
    }
}
