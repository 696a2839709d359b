//! Response-time distribution, longest silence, late-night share.
//!
//! A response is the gap between two adjacent user messages from different
//! senders. Gaps over 12 hours are not informative about responsiveness
//! (sleep, travel) and are excluded; the overnight logic in the dynamics
//! detectors judges those separately.

use indexmap::IndexMap;
use serde::Serialize;

use crate::model::ParsedConversation;
use crate::stats::{self, round1};
use crate::timeutil::{is_late_night, month_key};

/// Gaps above this are excluded from the response-time distribution.
const RESPONSE_CAP_MS: i64 = 12 * 60 * 60 * 1000;

/// Response-time asymmetry: points per order of magnitude between the
/// fastest and slowest median.
const RT_ASYMMETRY_SCALE: f64 = 30.0;

/// Response-time distribution of one participant, in seconds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonTiming {
    /// Number of measured responses
    pub responses: usize,
    pub mean_s: f64,
    pub median_s: f64,
    /// Mean after dropping the top and bottom 5%
    pub trimmed_mean_s: f64,
    pub std_dev_s: f64,
    pub p75_s: f64,
    pub p90_s: f64,
    pub p95_s: f64,
    pub fastest_s: f64,
    pub slowest_s: f64,
    /// Median response per month, for trend analysis downstream
    pub monthly_median_s: IndexMap<String, f64>,
}

/// The single largest gap between consecutive messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LongestSilence {
    pub duration_ms: i64,
    pub start_ts: i64,
    pub end_ts: i64,
    /// Who spoke last before the silence
    pub last_sender: String,
    /// Who broke it
    pub first_sender: String,
}

/// Timing profile of the conversation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimingAnalysis {
    pub per_person: IndexMap<String, PersonTiming>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longest_silence: Option<LongestSilence>,
    /// Share of each person's messages sent in hours 22..=03, percent
    pub late_night_share: IndexMap<String, f64>,
    /// `30 × log10(slowest median / fastest median)`, clamped to 0..=100;
    /// absent unless two people have measured medians
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rt_asymmetry: Option<f64>,
}

pub fn analyze(conv: &ParsedConversation) -> TimingAnalysis {
    let messages: Vec<_> = conv.user_messages().collect();

    let mut gaps: IndexMap<String, Vec<(i64, i64)>> = conv
        .participants
        .iter()
        .map(|p| (p.name.clone(), Vec::new()))
        .collect();

    for pair in messages.windows(2) {
        let (prev, cur) = (pair[0], pair[1]);
        if prev.sender == cur.sender {
            continue;
        }
        let gap = cur.timestamp - prev.timestamp;
        if gap < 0 || gap > RESPONSE_CAP_MS {
            continue;
        }
        if let Some(person_gaps) = gaps.get_mut(&cur.sender) {
            person_gaps.push((gap, cur.timestamp));
        }
    }

    let per_person: IndexMap<_, _> = gaps
        .into_iter()
        .map(|(name, person_gaps)| (name, summarize(&person_gaps)))
        .collect();

    let longest_silence = messages
        .windows(2)
        .max_by_key(|pair| pair[1].timestamp - pair[0].timestamp)
        .map(|pair| LongestSilence {
            duration_ms: pair[1].timestamp - pair[0].timestamp,
            start_ts: pair[0].timestamp,
            end_ts: pair[1].timestamp,
            last_sender: pair[0].sender.clone(),
            first_sender: pair[1].sender.clone(),
        });

    let medians: Vec<f64> = per_person
        .values()
        .filter(|p: &&PersonTiming| p.responses > 0)
        .map(|p| p.median_s.max(0.001))
        .collect();
    let rt_asymmetry = (medians.len() >= 2).then(|| {
        let fastest = medians.iter().copied().fold(f64::INFINITY, f64::min);
        let slowest = medians.iter().copied().fold(0.0f64, f64::max);
        round1((RT_ASYMMETRY_SCALE * (slowest / fastest).log10()).clamp(0.0, 100.0))
    });

    let mut late_night_share = IndexMap::new();
    for participant in &conv.participants {
        let (mut total, mut late) = (0usize, 0usize);
        for msg in messages.iter().filter(|m| m.sender == participant.name) {
            total += 1;
            if is_late_night(msg.timestamp) {
                late += 1;
            }
        }
        let share = if total > 0 {
            round1(late as f64 / total as f64 * 100.0)
        } else {
            0.0
        };
        late_night_share.insert(participant.name.clone(), share);
    }

    TimingAnalysis {
        per_person,
        longest_silence,
        late_night_share,
        rt_asymmetry,
    }
}

fn summarize(gaps: &[(i64, i64)]) -> PersonTiming {
    let seconds: Vec<f64> = gaps.iter().map(|(g, _)| *g as f64 / 1000.0).collect();

    let mut monthly: IndexMap<String, Vec<f64>> = IndexMap::new();
    for (gap, ts) in gaps {
        monthly
            .entry(month_key(*ts))
            .or_default()
            .push(*gap as f64 / 1000.0);
    }
    monthly.sort_keys();
    let monthly_median_s = monthly
        .into_iter()
        .map(|(month, values)| (month, round1(stats::median(&values))))
        .collect();

    let fastest = seconds.iter().copied().fold(f64::INFINITY, f64::min);
    let slowest = seconds.iter().copied().fold(0.0, f64::max);

    PersonTiming {
        responses: seconds.len(),
        mean_s: round1(stats::mean(&seconds)),
        median_s: round1(stats::median(&seconds)),
        trimmed_mean_s: round1(stats::trimmed_mean(&seconds, 0.05)),
        std_dev_s: round1(stats::std_dev(&seconds)),
        p75_s: round1(stats::percentile(&seconds, 75.0)),
        p90_s: round1(stats::percentile(&seconds, 90.0)),
        p95_s: round1(stats::percentile(&seconds, 95.0)),
        fastest_s: if seconds.is_empty() {
            0.0
        } else {
            round1(fastest)
        },
        slowest_s: round1(slowest),
        monthly_median_s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Participant, UnifiedMessage};
    use crate::parser::Platform;

    const SEC: i64 = 1000;
    const MIN: i64 = 60 * SEC;
    const HOUR: i64 = 60 * MIN;

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
    fn test_gap_assignment() {
        let conversation = conv(vec![
            UnifiedMessage::text("Ala", "a", 0),
            UnifiedMessage::text("Bartek", "b", 30 * SEC),
            UnifiedMessage::text("Ala", "c", 30 * SEC + 2 * MIN),
        ]);
        let result = analyze(&conversation);
        assert_eq!(result.per_person["Bartek"].responses, 1);
        assert_eq!(result.per_person["Bartek"].median_s, 30.0);
        assert_eq!(result.per_person["Ala"].responses, 1);
        assert_eq!(result.per_person["Ala"].median_s, 120.0);
        // 120 s vs 30 s: 30·log10(4) ≈ 18.1 points of asymmetry
        assert_eq!(result.rt_asymmetry, Some(18.1));
    }

    #[test]
    fn test_same_sender_gaps_ignored() {
        let conversation = conv(vec![
            UnifiedMessage::text("Ala", "a", 0),
            UnifiedMessage::text("Ala", "b", 10 * SEC),
        ]);
        let result = analyze(&conversation);
        assert_eq!(result.per_person["Ala"].responses, 0);
    }

    #[test]
    fn test_gaps_over_cap_excluded() {
        let conversation = conv(vec![
            UnifiedMessage::text("Ala", "a", 0),
            UnifiedMessage::text("Bartek", "b", 13 * HOUR),
            UnifiedMessage::text("Ala", "c", 13 * HOUR + MIN),
        ]);
        let result = analyze(&conversation);
        assert_eq!(result.per_person["Bartek"].responses, 0);
        assert_eq!(result.per_person["Ala"].responses, 1);
    }

    #[test]
    fn test_longest_silence() {
        let conversation = conv(vec![
            UnifiedMessage::text("Ala", "a", 0),
            UnifiedMessage::text("Bartek", "b", MIN),
            UnifiedMessage::text("Ala", "c", MIN + 48 * HOUR),
        ]);
        let silence = analyze(&conversation).longest_silence.unwrap();
        assert_eq!(silence.duration_ms, 48 * HOUR);
        assert_eq!(silence.last_sender, "Bartek");
        assert_eq!(silence.first_sender, "Ala");
    }

    #[test]
    fn test_late_night_share() {
        // 1_705_276_800_000 = 2024-01-15 00:00 UTC
        let base = 1_705_276_800_000;
        let conversation = conv(vec![
            UnifiedMessage::text("Ala", "night", base + 23 * HOUR), // 23:00
            UnifiedMessage::text("Ala", "day", base + 36 * HOUR),   // next day 12:00
        ]);
        let result = analyze(&conversation);
        assert_eq!(result.late_night_share["Ala"], 50.0);
    }

    #[test]
    fn test_monthly_median_series() {
        // Two months with different response speeds
        let jan = 1_705_276_800_000; // 2024-01-15
        let feb = 1_707_955_200_000; // 2024-02-15
        let conversation = conv(vec![
            UnifiedMessage::text("Ala", "a", jan),
            UnifiedMessage::text("Bartek", "b", jan + 10 * SEC),
            UnifiedMessage::text("Ala", "c", feb),
            UnifiedMessage::text("Bartek", "d", feb + 100 * SEC),
        ]);
        let result = analyze(&conversation);
        let monthly = &result.per_person["Bartek"].monthly_median_s;
        assert_eq!(monthly["2024-01"], 10.0);
        assert_eq!(monthly["2024-02"], 100.0);
    }
}
