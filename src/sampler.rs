//! Qualitative sampler: deterministic message selections and a plain-text
//! summary of the quantitative results, both consumed by an external
//! narrative generator.
//!
//! No randomness anywhere: stratified picks use even strides, so the same
//! conversation always yields the same samples.

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::{RapportError, Result};
use crate::metrics::QuantitativeAnalysis;
use crate::model::{ParsedConversation, UnifiedMessage};
use crate::timeutil::month_key;

/// Budgets per selection.
const OVERVIEW_BUDGET: usize = 250;
const DYNAMICS_BUDGET: usize = 200;
const PER_PERSON_BUDGET: usize = 150;

/// Oldest 75% of months share this fraction of the overview budget.
const OLD_SHARE: f64 = 0.40;

/// Minimum eligible messages for any sampling at all.
const MIN_ELIGIBLE: usize = 10;

/// Inflection: positions this close to a long gap qualify.
const GAP_NEIGHBOURHOOD: usize = 3;
const LONG_GAP_MS: i64 = 48 * 60 * 60 * 1000;

/// Inflection: month-over-month volume change past this fraction.
const VOLUME_SHIFT: f64 = 0.30;

/// Inflection: the longest messages, as a fraction of the corpus.
const LONGEST_SHARE: f64 = 0.05;

/// Group chats profile at most this many people.
const GROUP_PROFILE_CAP: usize = 8;

/// One sampled message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SampledMessage {
    pub index: usize,
    pub sender: String,
    pub timestamp: i64,
    pub content: String,
}

impl SampledMessage {
    fn of(msg: &UnifiedMessage) -> Self {
        Self {
            index: msg.index,
            sender: msg.sender.clone(),
            timestamp: msg.timestamp,
            content: msg.content.clone(),
        }
    }
}

/// The four message selections plus the rendered summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Samples {
    /// Month-stratified overview, recency-weighted
    pub overview: Vec<SampledMessage>,
    /// Messages around inflection points
    pub dynamics: Vec<SampledMessage>,
    /// Per-person stratified selections
    pub per_person: IndexMap<String, Vec<SampledMessage>>,
    /// Deterministic text summary of the quantitative results
    pub context_summary: String,
}

/// Evenly spaced `k`-element selection over a slice.
fn stride<'a, T>(items: &'a [T], k: usize) -> Vec<&'a T> {
    if k == 0 || items.is_empty() {
        return Vec::new();
    }
    if k >= items.len() {
        return items.iter().collect();
    }
    (0..k)
        .map(|i| &items[i * items.len() / k])
        .collect()
}

fn eligible(conv: &ParsedConversation) -> Vec<&UnifiedMessage> {
    conv.user_messages()
        .filter(|m| !m.content.is_empty())
        .collect()
}

/// Builds all selections.
pub fn sample(conv: &ParsedConversation, quant: &QuantitativeAnalysis) -> Result<Samples> {
    let pool = eligible(conv);
    if pool.len() < MIN_ELIGIBLE {
        return Err(RapportError::insufficient_data(format!(
            "only {} sampleable messages, need {}",
            pool.len(),
            MIN_ELIGIBLE
        )));
    }

    Ok(Samples {
        overview: overview(&pool),
        dynamics: dynamics(&pool),
        per_person: per_person(conv, &pool),
        context_summary: render_summary(conv, quant),
    })
}

/// Month-stratified overview: the oldest 75% of months share 40% of the
/// budget, the recent 25% get the remaining 60%. Rounding losses are
/// topped up from the global pool.
fn overview(pool: &[&UnifiedMessage]) -> Vec<SampledMessage> {
    let mut months: IndexMap<String, Vec<&UnifiedMessage>> = IndexMap::new();
    for msg in pool {
        months.entry(month_key(msg.timestamp)).or_default().push(*msg);
    }
    months.sort_keys();

    let month_count = months.len();
    let old_months = (month_count * 3) / 4;

    let mut chosen: Vec<&UnifiedMessage> = Vec::new();
    let old_budget = (OVERVIEW_BUDGET as f64 * OLD_SHARE) as usize;
    let recent_budget = OVERVIEW_BUDGET - old_budget;

    for (band_start, band_len, budget) in [
        (0, old_months, old_budget),
        (old_months, month_count - old_months, recent_budget),
    ] {
        if band_len == 0 {
            continue;
        }
        let per_month = (budget / band_len).max(1);
        for (_, msgs) in months.iter().skip(band_start).take(band_len) {
            chosen.extend(stride(msgs, per_month).iter().map(|m| **m));
        }
    }

    // Top up rounding losses from the not-yet-chosen remainder.
    if chosen.len() < OVERVIEW_BUDGET.min(pool.len()) {
        let missing = OVERVIEW_BUDGET.min(pool.len()) - chosen.len();
        let mut have: Vec<usize> = chosen.iter().map(|m| m.index).collect();
        have.sort_unstable();
        let rest: Vec<&UnifiedMessage> = pool
            .iter()
            .filter(|m| have.binary_search(&m.index).is_err())
            .copied()
            .collect();
        chosen.extend(stride(&rest, missing).iter().map(|m| **m));
    }

    chosen.sort_by_key(|m| m.index);
    chosen.truncate(OVERVIEW_BUDGET);
    chosen.into_iter().map(SampledMessage::of).collect()
}

/// Inflection candidates: reacted messages, the neighbourhood of long
/// gaps, months whose volume swung, and the longest messages.
fn dynamics(pool: &[&UnifiedMessage]) -> Vec<SampledMessage> {
    let mut candidate = vec![false; pool.len()];

    for (i, msg) in pool.iter().enumerate() {
        if !msg.reactions.is_empty() {
            candidate[i] = true;
        }
    }

    for i in 1..pool.len() {
        if pool[i].timestamp - pool[i - 1].timestamp >= LONG_GAP_MS {
            let lo = i.saturating_sub(GAP_NEIGHBOURHOOD);
            let hi = (i + GAP_NEIGHBOURHOOD).min(pool.len() - 1);
            for flag in &mut candidate[lo..=hi] {
                *flag = true;
            }
        }
    }

    // Months with >30% volume change against the previous month.
    let mut monthly: IndexMap<String, usize> = IndexMap::new();
    for msg in pool {
        *monthly.entry(month_key(msg.timestamp)).or_default() += 1;
    }
    monthly.sort_keys();
    let counts: Vec<(String, usize)> = monthly.into_iter().collect();
    let mut shifted_months: Vec<&str> = Vec::new();
    for w in counts.windows(2) {
        let (prev, cur) = (w[0].1 as f64, w[1].1 as f64);
        if prev > 0.0 && ((cur - prev) / prev).abs() > VOLUME_SHIFT {
            shifted_months.push(w[1].0.as_str());
        }
    }
    if !shifted_months.is_empty() {
        for (i, msg) in pool.iter().enumerate() {
            if shifted_months.contains(&month_key(msg.timestamp).as_str()) {
                candidate[i] = true;
            }
        }
    }

    // Top 5% longest.
    let top_n = ((pool.len() as f64 * LONGEST_SHARE).ceil() as usize).max(1);
    let mut by_length: Vec<(usize, usize)> = pool
        .iter()
        .enumerate()
        .map(|(i, m)| (m.content.chars().count(), i))
        .collect();
    by_length.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
    for &(_, i) in by_length.iter().take(top_n) {
        candidate[i] = true;
    }

    let candidates: Vec<&UnifiedMessage> = pool
        .iter()
        .enumerate()
        .filter(|(i, _)| candidate[*i])
        .map(|(_, m)| *m)
        .collect();

    stride(&candidates, DYNAMICS_BUDGET)
        .into_iter()
        .map(|m| SampledMessage::of(m))
        .collect()
}

/// Per-person stratified selections; group chats cover only the most
/// active eight.
fn per_person(
    conv: &ParsedConversation,
    pool: &[&UnifiedMessage],
) -> IndexMap<String, Vec<SampledMessage>> {
    let mut order: Vec<(&str, usize)> = conv
        .participants
        .iter()
        .map(|p| {
            let count = pool.iter().filter(|m| m.sender == p.name).count();
            (p.name.as_str(), count)
        })
        .collect();
    if conv.metadata.is_group {
        order.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
        order.truncate(GROUP_PROFILE_CAP);
    }

    order
        .into_iter()
        .filter(|(_, count)| *count > 0)
        .map(|(name, _)| {
            let own: Vec<&UnifiedMessage> = pool
                .iter()
                .filter(|m| m.sender == name)
                .copied()
                .collect();
            let picked = stride(&own, PER_PERSON_BUDGET)
                .into_iter()
                .map(|m| SampledMessage::of(m))
                .collect();
            (name.to_string(), picked)
        })
        .collect()
}

/// Renders the quantitative results as a compact, deterministic text
/// block for the narrative generator's context window.
pub fn render_summary(conv: &ParsedConversation, quant: &QuantitativeAnalysis) -> String {
    let mut out = String::new();
    let meta = &conv.metadata;

    out.push_str(&format!(
        "Rozmowa: {} | platforma {} | {} wiadomości | {} dni | {} uczestników\n",
        conv.title,
        conv.platform,
        meta.total_messages,
        meta.duration_days,
        conv.participants.len()
    ));

    for (name, vol) in &quant.volume {
        out.push_str(&format!(
            "{name}: {} wiad., {} słów, śr. {} słów/wiad., {} emoji, {} pytań, bogactwo {}\n",
            vol.messages,
            vol.words,
            vol.avg_words_per_message,
            vol.emoji,
            vol.questions,
            vol.vocabulary_richness
        ));
    }

    for (name, timing) in &quant.timing.per_person {
        out.push_str(&format!(
            "{name}: mediana odpowiedzi {} s, p90 {} s\n",
            timing.median_s, timing.p90_s
        ));
    }

    out.push_str(&format!(
        "Sesje: {} (śr. {} wiad.), konflikty: {}, wzajemność: {}\n",
        quant.engagement.sessions,
        quant.engagement.avg_messages_per_session,
        quant.conflict.total_conflicts,
        quant.reciprocity.overall
    ));

    if let Some(lsm) = &quant.lsm {
        out.push_str(&format!(
            "LSM: {} ({})\n",
            lsm.overall,
            lsm.band.label_pl()
        ));
    }
    if let Some(pursuit) = &quant.pursuit {
        out.push_str(&format!(
            "Pogoń-wycofanie: {} cykli, goni {}\n",
            pursuit.cycles.len(),
            pursuit.pursuer
        ));
    }
    if let Some(bids) = &quant.bids {
        out.push_str(&format!(
            "Zwroty ku sobie: {}% (benchmark 86%)\n",
            bids.overall_toward_rate
        ));
    }
    if let Some(chrono) = &quant.chronotype {
        out.push_str(&format!(
            "Chronotypy: delta {} h, zgodność {}\n",
            chrono.delta_h, chrono.compatibility
        ));
    }
    if let Some(intimacy) = &quant.intimacy {
        out.push_str(&format!(
            "Bliskość: trend {} (nachylenie {})\n",
            intimacy.trend.label_pl(),
            intimacy.slope
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Participant;
    use crate::parser::Platform;

    const MIN: i64 = 60 * 1000;
    const HOUR: i64 = 60 * MIN;
    const DAY: i64 = 24 * HOUR;

    fn conv(messages: Vec<UnifiedMessage>) -> ParsedConversation {
        ParsedConversation::finalize(
            Platform::Messenger,
            "t".to_string(),
            vec![Participant::new("Ala"), Participant::new("Bartek")],
            messages,
            vec![],
        )
    }

    fn big_conv(n: usize) -> ParsedConversation {
        let messages: Vec<UnifiedMessage> = (0..n)
            .map(|i| {
                let sender = if i % 2 == 0 { "Ala" } else { "Bartek" };
                UnifiedMessage::text(sender, format!("wiadomość numer {i}"), i as i64 * HOUR)
            })
            .collect();
        conv(messages)
    }

    #[test]
    fn test_stride_selection() {
        let items: Vec<i32> = (0..100).collect();
        let picked = stride(&items, 10);
        assert_eq!(picked.len(), 10);
        assert_eq!(*picked[0], 0);
        // Evenly spread, strictly increasing
        assert!(picked.windows(2).all(|w| w[1] > w[0]));

        assert_eq!(stride(&items, 200).len(), 100);
        assert!(stride(&items, 0).is_empty());
    }

    #[test]
    fn test_insufficient_data() {
        let conversation = big_conv(5);
        let quant = crate::metrics::analyze(&conversation);
        let err = sample(&conversation, &quant).unwrap_err();
        assert!(err.is_insufficient_data());
    }

    #[test]
    fn test_budgets_respected() {
        let conversation = big_conv(2000);
        let quant = crate::metrics::analyze(&conversation);
        let samples = sample(&conversation, &quant).expect("enough data");
        assert_eq!(samples.overview.len(), OVERVIEW_BUDGET);
        assert!(samples.dynamics.len() <= DYNAMICS_BUDGET);
        assert_eq!(samples.per_person["Ala"].len(), PER_PERSON_BUDGET);
        assert_eq!(samples.per_person["Bartek"].len(), PER_PERSON_BUDGET);
    }

    #[test]
    fn test_overview_is_chronological() {
        let conversation = big_conv(1000);
        let quant = crate::metrics::analyze(&conversation);
        let samples = sample(&conversation, &quant).expect("enough data");
        assert!(samples
            .overview
            .windows(2)
            .all(|w| w[0].index < w[1].index));
    }

    #[test]
    fn test_dynamics_picks_gap_neighbourhood() {
        let mut messages = Vec::new();
        for i in 0..30i64 {
            messages.push(UnifiedMessage::text("Ala", "przed przerwą", i * HOUR));
        }
        // 3-day gap, then more
        for i in 0..30i64 {
            messages.push(UnifiedMessage::text(
                "Bartek",
                "po przerwie",
                30 * HOUR + 3 * DAY + i * HOUR,
            ));
        }
        let conversation = conv(messages);
        let quant = crate::metrics::analyze(&conversation);
        let samples = sample(&conversation, &quant).expect("enough data");
        // The first message after the gap must be in the dynamics set
        assert!(samples.dynamics.iter().any(|m| m.content == "po przerwie"));
    }

    #[test]
    fn test_sampling_deterministic() {
        let conversation = big_conv(500);
        let quant = crate::metrics::analyze(&conversation);
        let first = sample(&conversation, &quant).expect("enough data");
        let second = sample(&conversation, &quant).expect("enough data");
        assert_eq!(first, second);
    }

    #[test]
    fn test_summary_mentions_participants() {
        let conversation = big_conv(100);
        let quant = crate::metrics::analyze(&conversation);
        let summary = render_summary(&conversation, &quant);
        assert!(summary.contains("Ala"));
        assert!(summary.contains("Bartek"));
        assert!(summary.contains("wiadomości"));
    }
}
