//! Bid-response ratio (Gottman's "turning toward").
//!
//! A bid is an attempt to engage: a question, a disclosure opener, or a
//! shared link. The partner either turns toward it (timely, substantive
//! response on topic) or away.

use indexmap::IndexMap;
use serde::Serialize;

use crate::lexicons::{DISCLOSURE_OPENERS, DISMISSALS, contains_marker};
use crate::model::{ParsedConversation, UnifiedMessage};
use crate::stats::round1;
use crate::text::{shared_content_words, tokenize};

/// How many messages ahead a response may arrive.
const LOOKAHEAD: usize = 4;

/// Responses later than this turn away regardless of content.
const MAX_RESPONSE_MS: i64 = 4 * 60 * 60 * 1000;

/// Minimum substantive length of a toward-response.
const MIN_RESPONSE_CHARS: usize = 5;

/// Minimum total bids in the conversation.
const MIN_BIDS: usize = 10;

/// Published benchmark: stable couples turn toward ~86% of bids.
pub const GOTTMAN_BENCHMARK: f64 = 86.0;

/// Turning-toward band relative to the benchmark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BidBand {
    High,
    Moderate,
    Low,
}

impl BidBand {
    fn of(rate: f64) -> Self {
        if rate >= 80.0 {
            BidBand::High
        } else if rate >= 60.0 {
            BidBand::Moderate
        } else {
            BidBand::Low
        }
    }

    /// Polish display label.
    pub fn label_pl(&self) -> &'static str {
        match self {
            BidBand::High => "wysoki",
            BidBand::Moderate => "umiarkowany",
            BidBand::Low => "niski",
        }
    }
}

/// Bid statistics of one participant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonBids {
    pub bids_made: usize,
    pub turned_toward: usize,
    pub turned_away: usize,
    pub bids_received: usize,
    pub responded_to: usize,
    /// Share of own bids the partner acknowledged, percent
    pub bid_success_rate: f64,
    /// Share of the partner's bids one responded to, percent
    pub response_rate: f64,
}

/// Bid-response result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BidAnalysis {
    pub per_person: IndexMap<String, PersonBids>,
    pub total_bids: usize,
    /// Conversation-wide turning-toward rate, percent
    pub overall_toward_rate: f64,
    pub band: BidBand,
    /// Distance from the 86% benchmark, percentage points
    pub vs_benchmark: f64,
}

/// A message is a bid when it asks, discloses, or shares.
fn is_bid(msg: &UnifiedMessage) -> bool {
    if msg.content.is_empty() {
        return false;
    }
    if msg.content.contains('?') || msg.has_link {
        return true;
    }
    let lower = msg.content.to_lowercase();
    let tokens = tokenize(&lower);
    DISCLOSURE_OPENERS
        .iter()
        .any(|opener| lower.starts_with(opener))
        || tokens
            .first()
            .is_some_and(|t| DISCLOSURE_OPENERS.contains(&t.as_str()))
}

/// Whether `response` turns toward `bid`.
fn turns_toward(bid: &UnifiedMessage, response: &UnifiedMessage) -> bool {
    if response.timestamp - bid.timestamp > MAX_RESPONSE_MS {
        return false;
    }
    let content = response.content.trim();
    if content.chars().count() < MIN_RESPONSE_CHARS {
        return false;
    }

    let tokens = tokenize(content);
    let is_dismissal = tokens.len() <= 2
        && contains_marker(&content.to_lowercase(), &tokens, DISMISSALS);
    if is_dismissal {
        return false;
    }

    content.contains('?') || shared_content_words(&tokenize(&bid.content), &tokens, 3) >= 1
}

pub fn analyze(conv: &ParsedConversation) -> Option<BidAnalysis> {
    let messages: Vec<_> = conv.user_messages().collect();

    let mut per_person: IndexMap<String, PersonBids> = conv
        .participants
        .iter()
        .map(|p| {
            (
                p.name.clone(),
                PersonBids {
                    bids_made: 0,
                    turned_toward: 0,
                    turned_away: 0,
                    bids_received: 0,
                    responded_to: 0,
                    bid_success_rate: 0.0,
                    response_rate: 0.0,
                },
            )
        })
        .collect();

    let mut total_bids = 0usize;
    let mut total_toward = 0usize;

    for (i, msg) in messages.iter().enumerate() {
        if !is_bid(msg) {
            continue;
        }
        total_bids += 1;

        let response = messages
            .iter()
            .skip(i + 1)
            .take(LOOKAHEAD)
            .find(|m| m.sender != msg.sender);

        let toward = response.is_some_and(|r| turns_toward(msg, r));
        if toward {
            total_toward += 1;
        }

        if let Some(person) = per_person.get_mut(&msg.sender) {
            person.bids_made += 1;
            if toward {
                person.turned_toward += 1;
            } else {
                person.turned_away += 1;
            }
        }
        if let Some(responder) = response {
            if let Some(person) = per_person.get_mut(&responder.sender) {
                person.bids_received += 1;
                if toward {
                    person.responded_to += 1;
                }
            }
        }
    }

    if total_bids < MIN_BIDS {
        return None;
    }

    for person in per_person.values_mut() {
        if person.bids_made > 0 {
            person.bid_success_rate =
                round1(person.turned_toward as f64 / person.bids_made as f64 * 100.0);
        }
        if person.bids_received > 0 {
            person.response_rate =
                round1(person.responded_to as f64 / person.bids_received as f64 * 100.0);
        }
    }

    let overall = round1(total_toward as f64 / total_bids as f64 * 100.0);

    Some(BidAnalysis {
        per_person,
        total_bids,
        overall_toward_rate: overall,
        band: BidBand::of(overall),
        vs_benchmark: round1(overall - GOTTMAN_BENCHMARK),
    })
}
