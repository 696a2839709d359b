//! Engagement: double-texts, message ratio, reaction rates, sessions,
//! burst days.

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::Serialize;

use crate::model::ParsedConversation;
use crate::stats::round1;
use crate::timeutil::{day_key, segment_sessions, ENTER_AS_COMMA_MS};

/// Daily volume must exceed this multiple of the running average to count
/// as a burst day.
const BURST_MULTIPLIER: f64 = 3.0;

/// Engagement profile of one participant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonEngagement {
    /// Follow-up messages sent after the Enter-as-comma window expired
    /// without a reply in between
    pub double_texts: usize,
    /// Longest run of consecutive physical messages
    pub max_consecutive: usize,
    /// Share of the total message volume, `0..=1`
    pub message_ratio: f64,
    /// Sessions this person opened
    pub initiations: usize,
    /// Sessions this person had the last word in
    pub endings: usize,
    /// Reactions given per 1000 own messages
    pub reactions_given_rate: f64,
    /// Reactions received per 1000 own messages
    pub reactions_received_rate: f64,
}

/// A span of consecutive burst days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BurstSpan {
    pub start_day: String,
    pub end_day: String,
    pub days: usize,
    pub messages: usize,
}

/// Engagement profile of the conversation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngagementAnalysis {
    pub per_person: IndexMap<String, PersonEngagement>,
    pub sessions: usize,
    pub avg_messages_per_session: f64,
    pub bursts: Vec<BurstSpan>,
}

pub fn analyze(conv: &ParsedConversation) -> EngagementAnalysis {
    let messages: Vec<_> = conv.user_messages().cloned().collect();
    let total = messages.len();

    let mut per_person: IndexMap<String, PersonEngagement> = conv
        .participants
        .iter()
        .map(|p| {
            (
                p.name.clone(),
                PersonEngagement {
                    double_texts: 0,
                    max_consecutive: 0,
                    message_ratio: 0.0,
                    initiations: 0,
                    endings: 0,
                    reactions_given_rate: 0.0,
                    reactions_received_rate: 0.0,
                },
            )
        })
        .collect();

    // Double-texts: same sender as the previous message, past the
    // Enter-as-comma window. Quicker follow-ups are one logical message.
    for pair in messages.windows(2) {
        let (prev, cur) = (&pair[0], &pair[1]);
        if cur.sender == prev.sender && cur.timestamp - prev.timestamp >= ENTER_AS_COMMA_MS {
            if let Some(person) = per_person.get_mut(&cur.sender) {
                person.double_texts += 1;
            }
        }
    }

    // Longest consecutive run per sender.
    let mut run_sender: Option<&str> = None;
    let mut run_len = 0usize;
    for msg in &messages {
        if run_sender == Some(msg.sender.as_str()) {
            run_len += 1;
        } else {
            run_sender = Some(msg.sender.as_str());
            run_len = 1;
        }
        if let Some(person) = per_person.get_mut(&msg.sender) {
            person.max_consecutive = person.max_consecutive.max(run_len);
        }
    }

    // Ratios and reaction rates.
    let mut counts: IndexMap<&str, (usize, usize, usize)> = IndexMap::new();
    for msg in &messages {
        let entry = counts.entry(msg.sender.as_str()).or_default();
        entry.0 += 1;
        entry.2 += msg.reactions.len();
    }
    for msg in &messages {
        for reaction in &msg.reactions {
            if let Some(entry) = counts.get_mut(reaction.actor.as_str()) {
                entry.1 += 1;
            }
        }
    }
    for (name, (own, given, received)) in counts {
        if let Some(person) = per_person.get_mut(name) {
            person.message_ratio = own as f64 / total.max(1) as f64;
            let per_thousand = |n: usize| round1(n as f64 / own.max(1) as f64 * 1000.0);
            person.reactions_given_rate = per_thousand(given);
            person.reactions_received_rate = per_thousand(received);
        }
    }

    let sessions = segment_sessions(&messages, conv.platform.session_gap_ms());
    for session in &sessions {
        if let Some(person) = per_person.get_mut(&messages[session.first].sender) {
            person.initiations += 1;
        }
        if let Some(person) = per_person.get_mut(&messages[session.last].sender) {
            person.endings += 1;
        }
    }
    let avg_messages_per_session = if sessions.is_empty() {
        0.0
    } else {
        round1(total as f64 / sessions.len() as f64)
    };

    EngagementAnalysis {
        per_person,
        sessions: sessions.len(),
        avg_messages_per_session,
        bursts: detect_bursts(&messages),
    }
}

/// Flags days whose volume exceeds 3× the running average and merges
/// consecutive burst days into spans.
fn detect_bursts(messages: &[crate::model::UnifiedMessage]) -> Vec<BurstSpan> {
    let mut daily: IndexMap<String, usize> = IndexMap::new();
    for msg in messages {
        *daily.entry(day_key(msg.timestamp)).or_default() += 1;
    }
    daily.sort_keys();

    let mut bursts: Vec<BurstSpan> = Vec::new();
    let mut seen_days = 0usize;
    let mut seen_messages = 0usize;

    for (day, &count) in &daily {
        let is_burst = seen_days > 0 && {
            let running_avg = seen_messages as f64 / seen_days as f64;
            count as f64 > BURST_MULTIPLIER * running_avg
        };

        if is_burst {
            match bursts.last_mut() {
                Some(span) if is_next_day(&span.end_day, day) => {
                    span.end_day = day.clone();
                    span.days += 1;
                    span.messages += count;
                }
                _ => bursts.push(BurstSpan {
                    start_day: day.clone(),
                    end_day: day.clone(),
                    days: 1,
                    messages: count,
                }),
            }
        }

        seen_days += 1;
        seen_messages += count;
    }

    bursts
}

fn is_next_day(prev: &str, next: &str) -> bool {
    let parse = |s: &str| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok();
    match (parse(prev), parse(next)) {
        (Some(a), Some(b)) => b == a + chrono::Days::new(1),
        _ => false,
    }
}
