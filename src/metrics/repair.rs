//! Conversational repair: self-corrections and "what?"-style
//! clarification requests.

use indexmap::IndexMap;
use serde::Serialize;

use crate::lexicons::{
    ASTERISK_REPAIR_RE, OTHER_REPAIR_MARKERS, SELF_REPAIR_PHRASES, contains_marker,
};
use crate::model::ParsedConversation;
use crate::stats::{round1, round2};
use crate::text::tokenize;

/// Minimum messages per person to report that person.
const MIN_PERSON_MESSAGES: usize = 10;

/// Minimum messages and repair events for the overall result.
const MIN_TOTAL_MESSAGES: usize = 100;
const MIN_TOTAL_EVENTS: usize = 5;

/// Repair style band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RepairStyle {
    SelfCorrecting,
    Clarifying,
    Balanced,
}

impl RepairStyle {
    fn of(ratio: f64) -> Self {
        if ratio >= 0.7 {
            RepairStyle::SelfCorrecting
        } else if ratio <= 0.3 {
            RepairStyle::Clarifying
        } else {
            RepairStyle::Balanced
        }
    }

    /// Polish display label.
    pub fn label_pl(&self) -> &'static str {
        match self {
            RepairStyle::SelfCorrecting => "samonaprawiający",
            RepairStyle::Clarifying => "dopytujący",
            RepairStyle::Balanced => "zrównoważony",
        }
    }
}

/// Repair profile of one participant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonRepair {
    pub self_repairs: usize,
    pub other_repairs: usize,
    pub self_repairs_per_100: f64,
    pub other_repairs_per_100: f64,
    /// `self / (self + other + 1e-3)`
    pub repair_initiation_ratio: f64,
    pub style: RepairStyle,
}

/// Repair profile of the conversation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepairAnalysis {
    pub per_person: IndexMap<String, PersonRepair>,
    pub total_repairs: usize,
    /// `clamp(totalRepairs / totalMessages × 500, 0, 100)`
    pub mutual_repair_index: i64,
}

/// Self-correction: asterisk form or an announcing phrase.
fn is_self_repair(content: &str) -> bool {
    if ASTERISK_REPAIR_RE.is_match(content) {
        return true;
    }
    let lower = content.to_lowercase();
    let tokens = tokenize(&lower);
    contains_marker(&lower, &tokens, SELF_REPAIR_PHRASES)
}

/// Other-initiated repair: a clarification marker as prefix, token, or the
/// whole message.
fn is_other_repair(content: &str) -> bool {
    let trimmed = content.trim();
    let lower = trimmed.to_lowercase();
    OTHER_REPAIR_MARKERS.iter().any(|marker| {
        lower == *marker
            || lower.starts_with(marker)
            || tokenize(&lower).iter().any(|t| t == marker)
    })
}

pub fn analyze(conv: &ParsedConversation) -> Option<RepairAnalysis> {
    let messages: Vec<_> = conv.user_messages().collect();
    if messages.len() < MIN_TOTAL_MESSAGES {
        return None;
    }

    let mut counts: IndexMap<String, (usize, usize, usize)> = conv
        .participants
        .iter()
        .map(|p| (p.name.clone(), (0, 0, 0)))
        .collect();

    for msg in &messages {
        let Some(entry) = counts.get_mut(&msg.sender) else {
            continue;
        };
        entry.2 += 1;
        if msg.content.is_empty() {
            continue;
        }
        if is_self_repair(&msg.content) {
            entry.0 += 1;
        }
        if is_other_repair(&msg.content) {
            entry.1 += 1;
        }
    }

    let total_repairs: usize = counts.values().map(|(s, o, _)| s + o).sum();
    if total_repairs < MIN_TOTAL_EVENTS {
        return None;
    }

    let per_person = counts
        .into_iter()
        .filter(|(_, (_, _, msgs))| *msgs >= MIN_PERSON_MESSAGES)
        .map(|(name, (self_repairs, other_repairs, msgs))| {
            let ratio = round2(
                self_repairs as f64 / (self_repairs as f64 + other_repairs as f64 + 1e-3),
            );
            (
                name,
                PersonRepair {
                    self_repairs,
                    other_repairs,
                    self_repairs_per_100: round1(self_repairs as f64 / msgs as f64 * 100.0),
                    other_repairs_per_100: round1(other_repairs as f64 / msgs as f64 * 100.0),
                    repair_initiation_ratio: ratio,
                    style: RepairStyle::of(ratio),
                },
            )
        })
        .collect();

    let index = (total_repairs as f64 / messages.len() as f64 * 500.0).round() as i64;

    Some(RepairAnalysis {
        per_person,
        total_repairs,
        mutual_repair_index: index.clamp(0, 100),
    })
}
