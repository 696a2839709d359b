//! Behavioural chronotype and social jet-lag from hourly activity.

use indexmap::IndexMap;
use serde::Serialize;

use crate::model::ParsedConversation;
use crate::stats::{circular_delta, circular_midpoint, round1, round2};
use crate::timeutil::{hour_of, is_weekend};

/// Minimum messages per person.
const MIN_MESSAGES: usize = 20;

/// Minimum samples in a weekday/weekend split before it gets its own
/// midpoint; below it the overall midpoint stands in.
const MIN_SPLIT: usize = 10;

/// Chronotype category by activity midpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Chronotype {
    EarlyBird,
    NightOwl,
    Intermediate,
}

impl Chronotype {
    fn of(midpoint: f64) -> Self {
        if midpoint < 10.0 {
            Chronotype::EarlyBird
        } else if midpoint >= 20.0 {
            Chronotype::NightOwl
        } else {
            Chronotype::Intermediate
        }
    }

    /// Polish display label.
    pub fn label_pl(&self) -> &'static str {
        match self {
            Chronotype::EarlyBird => "ranny ptaszek",
            Chronotype::NightOwl => "nocna sowa",
            Chronotype::Intermediate => "pośredni",
        }
    }
}

/// Social jet-lag severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JetLagLevel {
    Minimal,
    Low,
    Moderate,
    High,
}

impl JetLagLevel {
    fn of(hours: f64) -> Self {
        if hours < 1.0 {
            JetLagLevel::Minimal
        } else if hours < 2.0 {
            JetLagLevel::Low
        } else if hours < 4.0 {
            JetLagLevel::Moderate
        } else {
            JetLagLevel::High
        }
    }

    /// Polish display label.
    pub fn label_pl(&self) -> &'static str {
        match self {
            JetLagLevel::Minimal => "minimalny",
            JetLagLevel::Low => "niski",
            JetLagLevel::Moderate => "umiarkowany",
            JetLagLevel::High => "wysoki",
        }
    }
}

/// Chronotype profile of one participant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonChronotype {
    pub histogram: [u32; 24],
    /// Circular midpoint of the full histogram
    pub midpoint: f64,
    /// Most active hour
    pub peak_hour: u32,
    pub category: Chronotype,
    /// Circular distance between weekday and weekend midpoints
    pub social_jet_lag_h: f64,
    pub jet_lag_level: JetLagLevel,
}

/// Chronotype-compatibility result (dyads only).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChronotypeAnalysis {
    pub per_person: IndexMap<String, PersonChronotype>,
    /// Circular distance between the two midpoints
    pub delta_h: f64,
    /// Step-function score of the delta
    pub compatibility: i64,
    pub is_compatible: bool,
}

fn step_score(delta: f64) -> i64 {
    if delta <= 1.0 {
        95
    } else if delta <= 2.0 {
        80
    } else if delta <= 3.0 {
        60
    } else if delta <= 4.0 {
        40
    } else if delta <= 6.0 {
        20
    } else {
        5
    }
}

pub fn analyze(conv: &ParsedConversation) -> Option<ChronotypeAnalysis> {
    if conv.participants.len() != 2 {
        return None;
    }

    let mut profiles: IndexMap<String, PersonChronotype> = IndexMap::new();
    let mut midpoints = Vec::with_capacity(2);

    for participant in &conv.participants {
        let mut all = [0.0f64; 24];
        let mut weekday = [0.0f64; 24];
        let mut weekend = [0.0f64; 24];
        let mut histogram = [0u32; 24];
        let (mut weekday_n, mut weekend_n) = (0usize, 0usize);

        for msg in conv.user_messages().filter(|m| m.sender == participant.name) {
            let hour = hour_of(msg.timestamp) as usize;
            all[hour] += 1.0;
            histogram[hour] += 1;
            if is_weekend(msg.timestamp) {
                weekend[hour] += 1.0;
                weekend_n += 1;
            } else {
                weekday[hour] += 1.0;
                weekday_n += 1;
            }
        }

        let total: usize = histogram.iter().map(|&c| c as usize).sum();
        if total < MIN_MESSAGES {
            return None;
        }

        let midpoint = circular_midpoint(&all);
        // Sparse splits fall back to the overall midpoint.
        let weekday_mid = if weekday_n >= MIN_SPLIT {
            circular_midpoint(&weekday)
        } else {
            midpoint
        };
        let weekend_mid = if weekend_n >= MIN_SPLIT {
            circular_midpoint(&weekend)
        } else {
            midpoint
        };
        let jet_lag = circular_delta(weekday_mid, weekend_mid);

        // Ties resolve to the earliest hour.
        let mut peak_hour = 0u32;
        let mut peak_count = 0u32;
        for (hour, &count) in histogram.iter().enumerate() {
            if count > peak_count {
                peak_count = count;
                peak_hour = hour as u32;
            }
        }

        midpoints.push(midpoint);
        profiles.insert(
            participant.name.clone(),
            PersonChronotype {
                histogram,
                midpoint: round2(midpoint),
                peak_hour,
                category: Chronotype::of(midpoint),
                social_jet_lag_h: round1(jet_lag),
                jet_lag_level: JetLagLevel::of(jet_lag),
            },
        );
    }

    let delta = circular_delta(midpoints[0], midpoints[1]);
    let compatibility = step_score(delta);

    Some(ChronotypeAnalysis {
        per_person: profiles,
        delta_h: round2(delta),
        compatibility,
        is_compatible: compatibility >= 60,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Participant, UnifiedMessage};
    use crate::parser::Platform;

    const HOUR: i64 = 60 * 60 * 1000;
    const DAY: i64 = 24 * HOUR;
    // 2024-01-15 00:00 UTC, a Monday
    const MONDAY: i64 = 1_705_276_800_000;

    fn conv(messages: Vec<UnifiedMessage>) -> ParsedConversation {
        ParsedConversation::finalize(
            Platform::Messenger,
            "t".to_string(),
            vec![Participant::new("Ala"), Participant::new("Bartek")],
            messages,
            vec![],
        )
    }

    /// `n` messages at a fixed hour across consecutive weekdays.
    fn at_hour(sender: &str, hour: i64, n: usize) -> Vec<UnifiedMessage> {
        (0..n)
            .map(|i| {
                // Skip weekends: 5 weekdays per week
                let week = i / 5;
                let day = i % 5;
                UnifiedMessage::text(
                    sender,
                    "o stałej porze",
                    MONDAY + (week as i64 * 7 + day as i64) * DAY + hour * HOUR,
                )
            })
            .collect()
    }

    #[test]
    fn test_matching_midpoints_compatible() {
        let mut messages = at_hour("Ala", 21, 25);
        messages.extend(at_hour("Bartek", 21, 25));
        let result = analyze(&conv(messages)).expect("enough messages");
        assert!(result.delta_h < 0.5);
        assert_eq!(result.compatibility, 95);
        assert!(result.is_compatible);
    }

    #[test]
    fn test_opposed_midpoints_incompatible() {
        let mut messages = at_hour("Ala", 7, 25);
        messages.extend(at_hour("Bartek", 23, 25));
        let result = analyze(&conv(messages)).expect("enough messages");
        // 7 vs 23 on the circle: delta 8 -> score 5
        assert!(result.delta_h > 6.0);
        assert_eq!(result.compatibility, 5);
        assert!(!result.is_compatible);

        let ala = &result.per_person["Ala"];
        assert_eq!(ala.category, Chronotype::EarlyBird);
        assert_eq!(ala.peak_hour, 7);
        let bartek = &result.per_person["Bartek"];
        assert_eq!(bartek.category, Chronotype::NightOwl);
    }

    #[test]
    fn test_jet_lag_fallback_without_weekend_data() {
        let mut messages = at_hour("Ala", 9, 25);
        messages.extend(at_hour("Bartek", 9, 25));
        let result = analyze(&conv(messages)).expect("enough messages");
        // No weekend messages: split falls back, jet lag reads zero
        assert_eq!(result.per_person["Ala"].social_jet_lag_h, 0.0);
        assert_eq!(
            result.per_person["Ala"].jet_lag_level,
            JetLagLevel::Minimal
        );
    }

    #[test]
    fn test_jet_lag_with_shifted_weekends() {
        let mut messages = at_hour("Ala", 8, 15);
        // Weekend messages at 14:00 (Saturday + Sunday over several weeks)
        for w in 0..6i64 {
            messages.push(UnifiedMessage::text(
                "Ala",
                "weekendowo",
                MONDAY + (w * 7 + 5) * DAY + 14 * HOUR,
            ));
            messages.push(UnifiedMessage::text(
                "Ala",
                "weekendowo",
                MONDAY + (w * 7 + 6) * DAY + 14 * HOUR,
            ));
        }
        messages.extend(at_hour("Bartek", 9, 25));
        let result = analyze(&conv(messages)).expect("enough messages");
        let ala = &result.per_person["Ala"];
        assert!(ala.social_jet_lag_h >= 4.0);
        assert_eq!(ala.jet_lag_level, JetLagLevel::High);
    }

    #[test]
    fn test_floor_and_dyad_guard() {
        let messages = at_hour("Ala", 9, 25);
        // Bartek has nothing: floor fails
        assert!(analyze(&conv(messages)).is_none());
    }
}
