//! Integrative complexity: differentiation and integration phrase rates.

use indexmap::IndexMap;
use serde::Serialize;

use crate::lexicons::{DIFFERENTIATION_PHRASES, INTEGRATION_PHRASES, count_markers};
use crate::model::ParsedConversation;
use crate::stats::{linear_slope, round2};
use crate::text::tokenize;
use crate::timeutil::month_key;

/// Minimum messages per person.
const MIN_MESSAGES: usize = 30;

/// Minimum differentiation + integration hits across the pair.
const MIN_SIGNAL: usize = 3;

/// Scale factor mapping phrase density to the 0..=100 band.
const SCALE: f64 = 6.5;

/// Integrative-complexity profile of one participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonComplexity {
    pub differentiation: usize,
    pub integration: usize,
    pub messages: usize,
    /// `clamp(((diff + 2·integ) / messages) × 100 × 6.5, 0, 100)`, rounded
    pub score: i64,
}

/// Integrative-complexity result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComplexityAnalysis {
    pub per_person: IndexMap<String, PersonComplexity>,
    /// Combined score per month
    pub monthly: IndexMap<String, i64>,
    pub trend: f64,
}

fn score(diff: usize, integ: usize, messages: usize) -> i64 {
    if messages == 0 {
        return 0;
    }
    let raw = (diff as f64 + 2.0 * integ as f64) / messages as f64 * 100.0 * SCALE;
    (raw.round() as i64).clamp(0, 100)
}

pub fn analyze(conv: &ParsedConversation) -> Option<ComplexityAnalysis> {
    let mut counts: IndexMap<String, (usize, usize, usize)> = conv
        .participants
        .iter()
        .map(|p| (p.name.clone(), (0, 0, 0)))
        .collect();
    let mut monthly_hits: IndexMap<String, (usize, usize, usize)> = IndexMap::new();

    for msg in conv.user_messages() {
        if msg.content.is_empty() {
            if let Some(entry) = counts.get_mut(&msg.sender) {
                entry.2 += 1;
            }
            continue;
        }
        let lower = msg.content.to_lowercase();
        let tokens = tokenize(&lower);
        let diff = count_markers(&lower, &tokens, DIFFERENTIATION_PHRASES);
        let integ = count_markers(&lower, &tokens, INTEGRATION_PHRASES);

        if let Some(entry) = counts.get_mut(&msg.sender) {
            entry.0 += diff;
            entry.1 += integ;
            entry.2 += 1;
        }
        let month = monthly_hits.entry(month_key(msg.timestamp)).or_default();
        month.0 += diff;
        month.1 += integ;
        month.2 += 1;
    }

    let total_signal: usize = counts.values().map(|(d, i, _)| d + i).sum();
    if total_signal < MIN_SIGNAL {
        return None;
    }
    if counts.values().any(|(_, _, msgs)| *msgs < MIN_MESSAGES) {
        return None;
    }

    let per_person = counts
        .into_iter()
        .map(|(name, (differentiation, integration, messages))| {
            (
                name,
                PersonComplexity {
                    differentiation,
                    integration,
                    messages,
                    score: score(differentiation, integration, messages),
                },
            )
        })
        .collect();

    monthly_hits.sort_keys();
    let monthly: IndexMap<String, i64> = monthly_hits
        .into_iter()
        .map(|(month, (d, i, m))| (month, score(d, i, m)))
        .collect();
    let series: Vec<f64> = monthly.values().map(|&v| v as f64).collect();

    Some(ComplexityAnalysis {
        per_person,
        trend: round2(linear_slope(&series)),
        monthly,
    })
}
