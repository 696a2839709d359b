//! Conflict detection: escalation spikes, cold silences, resolutions.
//!
//! Escalation watches for sudden message-length spikes from both sides in
//! a short window; cold silence looks for an intense exchange that stops
//! dead for a day or more; resolution checks whether the conversation
//! cooled down after the silence.

use indexmap::IndexMap;
use serde::Serialize;

use crate::model::{ParsedConversation, UnifiedMessage};
use crate::stats::mean;

/// Rolling baseline length per person.
const ROLLING_WINDOW: usize = 10;

/// Samples needed before a spike can fire.
const MIN_SAMPLES: usize = 5;

/// Spike threshold: word count above this multiple of the rolling average.
const SPIKE_MULTIPLIER: f64 = 2.0;

/// Two spikes must co-occur within this window.
const SPIKE_WINDOW_MS: i64 = 15 * 60 * 1000;

/// Escalation events within this span deduplicate.
const ESCALATION_DEDUP_MS: i64 = 4 * 60 * 60 * 1000;

/// Gap that counts as a cold silence.
const COLD_SILENCE_MS: i64 = 24 * 60 * 60 * 1000;

/// Message rate in the hour before a silence that marks it as a cut-off.
const INTENSE_RATE: usize = 8;

/// Messages inspected before/after a silence.
const EXCHANGE_DEPTH: usize = 5;

/// Cold-silence events within this span deduplicate.
const COLD_DEDUP_MS: i64 = 12 * 60 * 60 * 1000;

/// Conflict event type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictKind {
    Escalation,
    ColdSilence,
    Resolution,
}

/// One detected event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConflictEvent {
    pub kind: ConflictKind,
    pub timestamp: i64,
    /// 1..=3 for escalations and silences, 0 for resolutions
    pub severity: u8,
    /// Who was involved: spike senders, or silence edge senders, or the
    /// person who broke the silence
    pub participants: Vec<String>,
    /// Silence length, for cold-silence events
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<i64>,
}

/// Conflict profile of the conversation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConflictAnalysis {
    /// All events, chronological
    pub events: Vec<ConflictEvent>,
    pub escalations: usize,
    pub cold_silences: usize,
    pub resolutions: usize,
    /// Escalations plus cold silences
    pub total_conflicts: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub most_conflict_prone: Option<String>,
}

pub fn analyze(conv: &ParsedConversation) -> ConflictAnalysis {
    let messages: Vec<_> = conv.user_messages().cloned().collect();

    let mut events = Vec::new();
    events.extend(detect_escalations(&messages));
    events.extend(detect_cold_silences(&messages));
    events.sort_by_key(|e| e.timestamp);

    let escalations = events
        .iter()
        .filter(|e| e.kind == ConflictKind::Escalation)
        .count();
    let cold_silences = events
        .iter()
        .filter(|e| e.kind == ConflictKind::ColdSilence)
        .count();
    let resolutions = events
        .iter()
        .filter(|e| e.kind == ConflictKind::Resolution)
        .count();

    // Escalations weigh double in the blame tally.
    let mut tally: IndexMap<&str, usize> = IndexMap::new();
    for event in &events {
        let weight = match event.kind {
            ConflictKind::Escalation => 2,
            ConflictKind::ColdSilence => 1,
            ConflictKind::Resolution => 0,
        };
        if weight > 0 {
            for name in &event.participants {
                *tally.entry(name.as_str()).or_default() += weight;
            }
        }
    }
    let most_conflict_prone = tally
        .iter()
        .max_by_key(|&(_, &w)| w)
        .map(|(name, _)| (*name).to_string());

    ConflictAnalysis {
        escalations,
        cold_silences,
        resolutions,
        total_conflicts: escalations + cold_silences,
        most_conflict_prone,
        events,
    }
}

fn detect_escalations(messages: &[UnifiedMessage]) -> Vec<ConflictEvent> {
    let mut events = Vec::new();
    let mut windows: IndexMap<&str, Vec<f64>> = IndexMap::new();
    let mut spikes: Vec<(i64, &str)> = Vec::new();
    let mut last_event_ts: Option<i64> = None;

    for (i, msg) in messages.iter().enumerate() {
        if msg.content.is_empty() {
            continue;
        }
        let words = msg.word_count() as f64;
        let window = windows.entry(msg.sender.as_str()).or_default();

        let genuine_exchange = i > 0 && messages[i - 1].sender != msg.sender;
        let is_spike = window.len() >= MIN_SAMPLES
            && words > SPIKE_MULTIPLIER * mean(window)
            && genuine_exchange;

        window.push(words);
        if window.len() > ROLLING_WINDOW {
            window.remove(0);
        }

        if !is_spike {
            continue;
        }

        spikes.retain(|(ts, _)| msg.timestamp - ts <= SPIKE_WINDOW_MS);
        spikes.push((msg.timestamp, msg.sender.as_str()));

        let mut senders: Vec<&str> = spikes.iter().map(|(_, s)| *s).collect();
        senders.sort_unstable();
        senders.dedup();
        if senders.len() < 2 {
            continue;
        }

        if last_event_ts.is_some_and(|ts| msg.timestamp - ts < ESCALATION_DEDUP_MS) {
            continue;
        }
        last_event_ts = Some(msg.timestamp);

        events.push(ConflictEvent {
            kind: ConflictKind::Escalation,
            timestamp: msg.timestamp,
            severity: if spikes.len() == 2 { 2 } else { 3 },
            participants: senders.iter().map(|s| (*s).to_string()).collect(),
            duration_ms: None,
        });
    }

    events
}

fn detect_cold_silences(messages: &[UnifiedMessage]) -> Vec<ConflictEvent> {
    let mut events = Vec::new();
    let mut last_event_start: Option<i64> = None;

    for i in 0..messages.len().saturating_sub(1) {
        let gap = messages[i + 1].timestamp - messages[i].timestamp;
        if gap < COLD_SILENCE_MS {
            continue;
        }

        let silence_start = messages[i].timestamp;

        // The hour before the silence must have been busy...
        let hour_before = silence_start - 60 * 60 * 1000;
        let recent = messages[..=i]
            .iter()
            .rev()
            .take_while(|m| m.timestamp >= hour_before)
            .count();
        if recent < INTENSE_RATE {
            continue;
        }

        // ...and a genuine exchange, not a monologue.
        let tail_start = (i + 1).saturating_sub(EXCHANGE_DEPTH);
        let mut tail_senders: Vec<&str> = messages[tail_start..=i]
            .iter()
            .map(|m| m.sender.as_str())
            .collect();
        tail_senders.sort_unstable();
        tail_senders.dedup();
        if tail_senders.len() < 2 {
            continue;
        }

        if last_event_start.is_some_and(|ts| silence_start - ts < COLD_DEDUP_MS) {
            continue;
        }
        last_event_start = Some(silence_start);

        let hours = gap / (60 * 60 * 1000);
        let severity = if hours >= 72 {
            3
        } else if hours >= 48 {
            2
        } else {
            1
        };

        events.push(ConflictEvent {
            kind: ConflictKind::ColdSilence,
            timestamp: silence_start,
            severity,
            participants: vec![messages[i].sender.clone()],
            duration_ms: Some(gap),
        });

        // Resolution: the exchange cooled down after the silence.
        let pre: Vec<f64> = messages[tail_start..=i]
            .iter()
            .map(|m| m.word_count() as f64)
            .collect();
        let post: Vec<f64> = messages[i + 1..]
            .iter()
            .take(EXCHANGE_DEPTH)
            .map(|m| m.word_count() as f64)
            .collect();
        if !post.is_empty() && mean(&post) < mean(&pre) {
            events.push(ConflictEvent {
                kind: ConflictKind::Resolution,
                timestamp: messages[i + 1].timestamp,
                severity: 0,
                participants: vec![messages[i + 1].sender.clone()],
                duration_ms: None,
            });
        }
    }

    events
}
