//! Language Style Matching (Ireland & Pennebaker).
//!
//! Dyadic function-word similarity over nine categories. Categories where
//! neither side reaches the rate floor are excluded; otherwise a pair of
//! near-zero rates would score a spurious perfect match.

use serde::Serialize;

use crate::lexicons::{FunctionCategory, category_words};
use crate::model::ParsedConversation;
use crate::stats::round2;
use crate::text::tokenize;

/// Minimum tokens per person.
const MIN_TOKENS: usize = 50;

/// Categories where both rates fall under this floor are skipped.
const RATE_FLOOR: f64 = 0.001;

/// Chameleon direction is only reported past this asymmetry.
const ASYMMETRY_FLOOR: f64 = 0.005;

/// Similarity band, after the published norms for established couples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LsmBand {
    VeryHigh,
    High,
    Moderate,
    Low,
    VeryLow,
}

impl LsmBand {
    fn of(overall: f64) -> Self {
        if overall >= 0.87 {
            LsmBand::VeryHigh
        } else if overall >= 0.80 {
            LsmBand::High
        } else if overall >= 0.65 {
            LsmBand::Moderate
        } else if overall >= 0.50 {
            LsmBand::Low
        } else {
            LsmBand::VeryLow
        }
    }

    /// Polish display label.
    pub fn label_pl(&self) -> &'static str {
        match self {
            LsmBand::VeryHigh => "bardzo wysokie",
            LsmBand::High => "wysokie",
            LsmBand::Moderate => "umiarkowane",
            LsmBand::Low => "niskie",
            LsmBand::VeryLow => "bardzo niskie",
        }
    }
}

/// One scored function-word category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryScore {
    pub category: FunctionCategory,
    /// Rates per token for each person, in participant order
    pub rates: [f64; 2],
    /// `1 − |a−b| / (a+b+1e-4)`, clamped to `[0, 1]`
    pub score: f64,
}

/// Language Style Matching result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LsmAnalysis {
    /// The two participants, in declaration order
    pub persons: [String; 2],
    /// Mean over the scored categories
    pub overall: f64,
    pub band: LsmBand,
    pub categories: Vec<CategoryScore>,
    /// Categories dropped by the rate floor
    pub skipped: Vec<FunctionCategory>,
    /// Whoever sits closer to the joint style profile; absent when the
    /// asymmetry is negligible
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chameleon: Option<String>,
    pub asymmetry: f64,
}

pub fn analyze(conv: &ParsedConversation) -> Option<LsmAnalysis> {
    if conv.participants.len() != 2 {
        return None;
    }
    let names = [
        conv.participants[0].name.clone(),
        conv.participants[1].name.clone(),
    ];

    let token_sets: Vec<Vec<String>> = names
        .iter()
        .map(|name| {
            let combined: String = conv
                .user_messages()
                .filter(|m| &m.sender == name)
                .map(|m| m.content.as_str())
                .collect::<Vec<_>>()
                .join(" ");
            tokenize(&combined)
        })
        .collect();

    if token_sets.iter().any(|t| t.len() < MIN_TOKENS) {
        return None;
    }

    let mut categories = Vec::new();
    let mut skipped = Vec::new();

    for &category in FunctionCategory::all() {
        let words = category_words(category);
        let rates: Vec<f64> = token_sets
            .iter()
            .map(|tokens| {
                let hits = tokens.iter().filter(|t| words.contains(t.as_str())).count();
                hits as f64 / tokens.len() as f64
            })
            .collect();

        if rates[0] < RATE_FLOOR && rates[1] < RATE_FLOOR {
            skipped.push(category);
            continue;
        }

        let score = 1.0 - (rates[0] - rates[1]).abs() / (rates[0] + rates[1] + 1e-4);
        let round4 = |x: f64| (x * 10_000.0).round() / 10_000.0;
        categories.push(CategoryScore {
            category,
            rates: [round4(rates[0]), round4(rates[1])],
            score: round2(score.clamp(0.0, 1.0)),
        });
    }

    if categories.is_empty() {
        return None;
    }

    let overall =
        round2(categories.iter().map(|c| c.score).sum::<f64>() / categories.len() as f64);

    // Adaptation direction: whoever's per-category profile sits closer to
    // the arithmetic mean of both profiles has adapted more.
    let distances: Vec<f64> = (0..2)
        .map(|i| {
            categories
                .iter()
                .map(|c| {
                    let mid = (c.rates[0] + c.rates[1]) / 2.0;
                    (c.rates[i] - mid).abs()
                })
                .sum::<f64>()
                / categories.len() as f64
        })
        .collect();
    let asymmetry = (distances[0] - distances[1]).abs();
    let chameleon = (asymmetry > ASYMMETRY_FLOOR).then(|| {
        if distances[0] < distances[1] {
            names[0].clone()
        } else {
            names[1].clone()
        }
    });

    Some(LsmAnalysis {
        persons: names,
        overall,
        band: LsmBand::of(overall),
        categories,
        skipped,
        chameleon,
        asymmetry: (asymmetry * 10_000.0).round() / 10_000.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Participant, UnifiedMessage};
    use crate::parser::Platform;

    fn conv_from(texts_a: &[&str], texts_b: &[&str]) -> ParsedConversation {
        let mut messages = Vec::new();
        let mut ts = 0i64;
        for t in texts_a {
            messages.push(UnifiedMessage::text("Ala", *t, ts));
            ts += 60_000;
        }
        for t in texts_b {
            messages.push(UnifiedMessage::text("Bartek", *t, ts));
            ts += 60_000;
        }
        ParsedConversation::finalize(
            Platform::Messenger,
            "t".to_string(),
            vec![Participant::new("Ala"), Participant::new("Bartek")],
            messages,
            vec![],
        )
    }

    fn filler(n: usize) -> String {
        // Function-word-rich Polish filler
        std::iter::repeat("ja nie wiem czy to jest bardzo dobre ale teraz już tak")
            .take(n)
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn test_self_comparison_is_perfect() {
        let text = filler(10);
        let conversation = conv_from(&[&text], &[&text]);
        let result = analyze(&conversation).expect("enough tokens");
        assert_eq!(result.overall, 1.0);
        assert!(result.chameleon.is_none());
    }

    #[test]
    fn test_requires_two_participants() {
        let mut conversation = conv_from(&[&filler(10)], &[&filler(10)]);
        conversation
            .participants
            .push(Participant::new("Cezary"));
        assert!(analyze(&conversation).is_none());
    }

    #[test]
    fn test_requires_min_tokens() {
        let conversation = conv_from(&["krótko"], &[&filler(10)]);
        assert!(analyze(&conversation).is_none());
    }

    #[test]
    fn test_floor_excludes_unused_category() {
        // Neither speaker uses English articles or Polish demonstratives:
        // the articles category must be skipped, not scored as 1.0.
        let a = "ja nie wiem czy jutro pojadę nad jezioro bo może będzie padać deszcz
                 i wtedy zostanę w domu ale zobaczymy jak będzie z pogodą rano
                 ja bardzo chcę pojechać nad wodę i odpocząć trochę od miasta
                 w sumie nie wiem czy mam siłę na taką wyprawę po całym tygodniu
                 no dobrze zatem ustalimy wszystkie szczegóły jutro wieczorem";
        let b = "ja też nie wiem czy dam radę ale bardzo chcę zobaczyć góry
                 może pojedziemy razem gdzieś daleko i odpoczniemy od wszystkiego
                 w sumie od dawna nigdzie nie byliśmy więc chyba trzeba jechać
                 zobaczymy jutro rano jak wstaniemy i jaka będzie pogoda
                 dobrze zatem napisz proszę wieczorem kiedy wszystko razem ustalicie";
        let conversation = conv_from(&[a], &[b]);
        let result = analyze(&conversation).expect("enough tokens");
        assert!(result.skipped.contains(&FunctionCategory::Articles));
        assert!(result
            .categories
            .iter()
            .all(|c| c.category != FunctionCategory::Articles));
        assert!(result.overall < 1.0);
    }

    #[test]
    fn test_band_thresholds() {
        assert_eq!(LsmBand::of(0.87), LsmBand::VeryHigh);
        assert_eq!(LsmBand::of(0.80), LsmBand::High);
        assert_eq!(LsmBand::of(0.65), LsmBand::Moderate);
        assert_eq!(LsmBand::of(0.50), LsmBand::Low);
        assert_eq!(LsmBand::of(0.49), LsmBand::VeryLow);
    }
}
