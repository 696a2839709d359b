//! Intimacy progression: a monthly composite of message length, emotional
//! density, informality and late-night activity, with its trend.

use indexmap::IndexMap;
use serde::Serialize;

use crate::lexicons::is_emotional_word;
use crate::model::ParsedConversation;
use crate::stats::{linear_slope, round1, round2};
use crate::text::{count_emoji, tokenize};
use crate::timeutil::{is_late_night, month_key};

/// Composite weights.
const W_LENGTH: f64 = 0.25;
const W_EMOTION: f64 = 0.30;
const W_INFORMALITY: f64 = 0.25;
const W_NIGHT: f64 = 0.20;

/// Intimacy trend band over the composite slope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IntimacyTrend {
    RapidlyIncreasing,
    Increasing,
    Stable,
    Decreasing,
    RapidlyDecreasing,
}

impl IntimacyTrend {
    fn of(slope: f64) -> Self {
        if slope > 2.0 {
            IntimacyTrend::RapidlyIncreasing
        } else if slope > 0.5 {
            IntimacyTrend::Increasing
        } else if slope > -0.5 {
            IntimacyTrend::Stable
        } else if slope > -2.0 {
            IntimacyTrend::Decreasing
        } else {
            IntimacyTrend::RapidlyDecreasing
        }
    }

    /// Polish display label.
    pub fn label_pl(&self) -> &'static str {
        match self {
            IntimacyTrend::RapidlyIncreasing => "dynamicznie rosnąca",
            IntimacyTrend::Increasing => "rosnąca",
            IntimacyTrend::Stable => "stabilna",
            IntimacyTrend::Decreasing => "malejąca",
            IntimacyTrend::RapidlyDecreasing => "wygasająca",
        }
    }
}

/// One month's raw accumulators and composite.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthIntimacy {
    pub messages: usize,
    pub words: usize,
    pub emotional_words: usize,
    /// Mean of per-message `exclamations + 2·emoji`
    pub informality: f64,
    /// Share of messages in the late-night band
    pub late_night_share: f64,
    /// Weighted composite, 0–100
    pub score: f64,
}

/// Intimacy progression result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntimacyAnalysis {
    pub monthly: IndexMap<String, MonthIntimacy>,
    pub slope: f64,
    pub trend: IntimacyTrend,
}

#[derive(Default)]
struct MonthAcc {
    messages: usize,
    words: usize,
    emotional: usize,
    informality_sum: f64,
    late_night: usize,
}

pub fn analyze(conv: &ParsedConversation) -> Option<IntimacyAnalysis> {
    let mut months: IndexMap<String, MonthAcc> = IndexMap::new();

    for msg in conv.user_messages() {
        let acc = months.entry(month_key(msg.timestamp)).or_default();
        acc.messages += 1;
        if is_late_night(msg.timestamp) {
            acc.late_night += 1;
        }
        if msg.content.is_empty() {
            continue;
        }
        let tokens = tokenize(&msg.content);
        acc.words += tokens.len();
        acc.emotional += tokens.iter().filter(|t| is_emotional_word(t)).count();
        let exclamations = msg.content.matches('!').count();
        acc.informality_sum += exclamations as f64 + 2.0 * count_emoji(&msg.content) as f64;
    }

    if months.len() < 2 {
        return None;
    }
    months.sort_keys();

    // Raw monthly factors, then normalise each to its observed maximum.
    struct Raw {
        length: f64,
        emotion: f64,
        informality: f64,
        night: f64,
    }
    let raws: Vec<Raw> = months
        .values()
        .map(|acc| Raw {
            length: acc.words as f64,
            emotion: if acc.words > 0 {
                acc.emotional as f64 / acc.words as f64
            } else {
                0.0
            },
            informality: acc.informality_sum / acc.messages.max(1) as f64,
            night: acc.late_night as f64 / acc.messages.max(1) as f64,
        })
        .collect();

    let max_of = |f: fn(&Raw) -> f64| {
        raws.iter()
            .map(f)
            .fold(0.0f64, f64::max)
            .max(f64::MIN_POSITIVE)
    };
    let (max_len, max_emo, max_inf, max_night) = (
        max_of(|r| r.length),
        max_of(|r| r.emotion),
        max_of(|r| r.informality),
        max_of(|r| r.night),
    );

    let mut monthly: IndexMap<String, MonthIntimacy> = IndexMap::new();
    let mut series = Vec::with_capacity(raws.len());
    for ((month, acc), raw) in months.into_iter().zip(&raws) {
        let score = 100.0
            * (W_LENGTH * raw.length / max_len
                + W_EMOTION * raw.emotion / max_emo
                + W_INFORMALITY * raw.informality / max_inf
                + W_NIGHT * raw.night / max_night);
        let score = round1(score);
        series.push(score);
        monthly.insert(
            month,
            MonthIntimacy {
                messages: acc.messages,
                words: acc.words,
                emotional_words: acc.emotional,
                informality: round2(raw.informality),
                late_night_share: round2(raw.night),
                score,
            },
        );
    }

    let slope = round2(linear_slope(&series));

    Some(IntimacyAnalysis {
        monthly,
        slope,
        trend: IntimacyTrend::of(slope),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Participant, UnifiedMessage};
    use crate::parser::Platform;

    const HOUR: i64 = 60 * 60 * 1000;
    const DAY: i64 = 24 * HOUR;
    const MONTH: i64 = 31 * DAY;
    // 2024-01-15 12:00 UTC
    const BASE: i64 = 1_705_276_800_000 + 12 * HOUR;

    fn conv(messages: Vec<UnifiedMessage>) -> ParsedConversation {
        ParsedConversation::finalize(
            Platform::Messenger,
            "t".to_string(),
            vec![Participant::new("Ala"), Participant::new("Bartek")],
            messages,
            vec![],
        )
    }

    #[test]
    fn test_single_month_is_absent() {
        let messages = vec![
            UnifiedMessage::text("Ala", "hej", BASE),
            UnifiedMessage::text("Bartek", "hej", BASE + HOUR),
        ];
        assert!(analyze(&conv(messages)).is_none());
    }

    #[test]
    fn test_trend_bands() {
        assert_eq!(IntimacyTrend::of(2.5), IntimacyTrend::RapidlyIncreasing);
        assert_eq!(IntimacyTrend::of(1.0), IntimacyTrend::Increasing);
        assert_eq!(IntimacyTrend::of(0.0), IntimacyTrend::Stable);
        assert_eq!(IntimacyTrend::of(-1.0), IntimacyTrend::Decreasing);
        assert_eq!(IntimacyTrend::of(-3.0), IntimacyTrend::RapidlyDecreasing);
    }

    #[test]
    fn test_growing_intimacy() {
        let mut messages = Vec::new();
        // Month 1: flat small talk. Month 3: emotional, exclamatory, long.
        for i in 0..10i64 {
            messages.push(UnifiedMessage::text("Ala", "ok", BASE + i * HOUR));
        }
        for i in 0..10i64 {
            messages.push(UnifiedMessage::text(
                "Ala",
                "dobrze było",
                BASE + MONTH + i * HOUR,
            ));
        }
        for i in 0..10i64 {
            messages.push(UnifiedMessage::text(
                "Ala",
                "kocham cię bardzo mocno! tęsknię za tobą całym sercem!",
                BASE + 2 * MONTH + i * HOUR,
            ));
        }
        let result = analyze(&conv(messages)).expect("three months");
        assert_eq!(result.monthly.len(), 3);
        let scores: Vec<f64> = result.monthly.values().map(|m| m.score).collect();
        assert!(scores[2] > scores[0]);
        assert!(result.slope > 0.0);
        assert!(matches!(
            result.trend,
            IntimacyTrend::Increasing | IntimacyTrend::RapidlyIncreasing
        ));
    }
}
