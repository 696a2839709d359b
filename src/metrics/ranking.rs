//! Log-normal percentile mapping for the four headline metrics.
//!
//! Display artifacts only; nothing downstream consumes these beyond the
//! presentation layer. Medians and sigmas are hand-tuned against observed
//! export distributions.

use serde::Serialize;

use crate::model::ParsedConversation;
use crate::stats::{log_normal_percentile, median, round1};

/// Message volume: median 3000 messages, sigma 1.2.
const VOLUME_MEDIAN: f64 = 3000.0;
const VOLUME_SIGMA: f64 = 1.2;

/// Fastest median response: median 480 s, sigma 1.0 (inverted).
const RESPONSE_MEDIAN_S: f64 = 480.0;
const RESPONSE_SIGMA: f64 = 1.0;

/// Longest silence: median 12 h, sigma 0.8.
const SILENCE_MEDIAN_H: f64 = 12.0;
const SILENCE_SIGMA: f64 = 0.8;

/// Message-share asymmetry: median 20 points, sigma 0.9.
const ASYMMETRY_MEDIAN: f64 = 20.0;
const ASYMMETRY_SIGMA: f64 = 0.9;

/// Mirrors the timing module's informative-gap cap.
const RESPONSE_CAP_MS: i64 = 12 * 60 * 60 * 1000;

/// Percentile placements of the conversation's headline metrics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingAnalysis {
    /// Higher = more messages than typical conversations
    pub volume_percentile: f64,
    /// Higher = faster than typical (inverted scale)
    pub response_speed_percentile: f64,
    /// Higher = longer worst silence
    pub silence_percentile: f64,
    /// Higher = more one-sided
    pub asymmetry_percentile: f64,
}

pub fn analyze(conv: &ParsedConversation) -> RankingAnalysis {
    let messages: Vec<_> = conv.user_messages().collect();

    let volume_percentile =
        log_normal_percentile(messages.len() as f64, VOLUME_MEDIAN, VOLUME_SIGMA);

    // Fastest median response across participants.
    let mut gaps_by_person: Vec<(String, Vec<f64>)> = conv
        .participants
        .iter()
        .map(|p| (p.name.clone(), Vec::new()))
        .collect();
    for pair in messages.windows(2) {
        let (prev, cur) = (pair[0], pair[1]);
        let gap = cur.timestamp - prev.timestamp;
        if prev.sender == cur.sender || gap < 0 || gap > RESPONSE_CAP_MS {
            continue;
        }
        if let Some((_, gaps)) = gaps_by_person.iter_mut().find(|(n, _)| *n == cur.sender) {
            gaps.push(gap as f64 / 1000.0);
        }
    }
    let fastest_median = gaps_by_person
        .iter()
        .filter(|(_, gaps)| !gaps.is_empty())
        .map(|(_, gaps)| median(gaps))
        .fold(f64::INFINITY, f64::min);
    let response_speed_percentile = if fastest_median.is_finite() {
        100.0 - log_normal_percentile(fastest_median, RESPONSE_MEDIAN_S, RESPONSE_SIGMA)
    } else {
        0.0
    };

    let longest_silence_h = messages
        .windows(2)
        .map(|pair| pair[1].timestamp - pair[0].timestamp)
        .max()
        .unwrap_or(0) as f64
        / 3_600_000.0;
    let silence_percentile =
        log_normal_percentile(longest_silence_h, SILENCE_MEDIAN_H, SILENCE_SIGMA);

    // Asymmetry: message-share spread in percentage points.
    let asymmetry = if conv.participants.len() >= 2 && !messages.is_empty() {
        let shares: Vec<f64> = conv
            .participants
            .iter()
            .map(|p| {
                messages.iter().filter(|m| m.sender == p.name).count() as f64
                    / messages.len() as f64
                    * 100.0
            })
            .collect();
        let max = shares.iter().copied().fold(0.0f64, f64::max);
        let min = shares.iter().copied().fold(100.0f64, f64::min);
        max - min
    } else {
        0.0
    };
    let asymmetry_percentile =
        log_normal_percentile(asymmetry, ASYMMETRY_MEDIAN, ASYMMETRY_SIGMA);

    RankingAnalysis {
        volume_percentile: round1(volume_percentile),
        response_speed_percentile: round1(response_speed_percentile),
        silence_percentile: round1(silence_percentile),
        asymmetry_percentile: round1(asymmetry_percentile),
    }
}
