//! Deep scanner: per-person dossiers mined for the downstream narrative
//! layer (confessions, contradictions, power moves, pet names, obsessions,
//! notable exchanges).

mod dossier;
mod render;

use indexmap::IndexMap;
use serde::Serialize;

use crate::model::ParsedConversation;

pub use render::render;

/// A quotable message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Quote {
    pub content: String,
    pub timestamp: i64,
    pub words: usize,
}

/// A quote scored for embarrassment potential.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredQuote {
    pub content: String,
    pub timestamp: i64,
    pub score: f64,
    /// What makes it quotable: `late_night`, `emotional`, or `rambling`
    pub reason: &'static str,
}

/// A strong declaration the sender then walked back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Contradiction {
    /// The declaration, truncated
    pub assertion: String,
    /// The matched assertion pattern
    pub pattern: String,
    pub timestamp: i64,
    /// Same-sender messages in the following 72 h
    pub followup_messages: usize,
    /// An affectionate message appeared in the window
    pub affectionate_followup: bool,
}

/// A recurring topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Obsession {
    pub phrase: String,
    pub count: usize,
}

/// Counted leverage behaviours.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PowerMoves {
    /// Times this person left the partner waiting 4+ hours
    pub left_on_read: usize,
    /// The longest such wait
    pub worst_left_on_read_ms: i64,
    /// Apologies not preceded by the partner's apology within 6 h
    pub apologies_first: usize,
    /// Runs of 3+ consecutive own messages
    pub double_text_chains: usize,
    pub longest_chain: usize,
}

/// Everything mined about one participant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonDossier {
    pub confessions: Vec<Quote>,
    pub embarrassing: Vec<ScoredQuote>,
    pub contradictions: Vec<Contradiction>,
    pub obsessions: Vec<Obsession>,
    pub power_moves: PowerMoves,
    /// Pet names this person uses, with counts
    pub pet_names: Vec<Obsession>,
}

/// A notable exchange (global, not per person).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterestingThread {
    pub start_ts: i64,
    pub end_ts: i64,
    pub messages: usize,
    pub late_night: bool,
    pub score: f64,
    /// First message of the exchange, truncated
    pub preview: String,
}

/// Deep-scan result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeepScan {
    pub per_person: IndexMap<String, PersonDossier>,
    pub threads: Vec<InterestingThread>,
}

/// Mines the full dossier set.
pub fn scan(conv: &ParsedConversation) -> DeepScan {
    let per_person = conv
        .participants
        .iter()
        .map(|p| (p.name.clone(), dossier::scan_person(conv, &p.name)))
        .collect();

    DeepScan {
        per_person,
        threads: dossier::interesting_threads(conv),
    }
}

/// Truncates to `max` characters on a char boundary.
pub(crate) fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => {
            let mut s = text[..idx].to_string();
            s.push('…');
            s
        }
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("abcdef", 3), "abc…");
        assert_eq!(truncate_chars("żółć żółć", 4), "żółć…");
    }
}
