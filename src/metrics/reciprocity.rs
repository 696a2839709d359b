//! Reciprocity index: how evenly the relationship's work is split.
//!
//! Four balance sub-scores blended into one 0–100 index. Below the volume
//! floor the index is reported as a flat 50 rather than omitted, by
//! contract with the downstream narrative layer.

use serde::Serialize;

use crate::model::ParsedConversation;
use crate::stats::{median, round1};
use crate::timeutil::segment_sessions;

/// Volume floor under which everything defaults to 50.
const MIN_MESSAGES: usize = 30;

/// Gaps above this are not responses (mirrors the timing module).
const RESPONSE_CAP_MS: i64 = 12 * 60 * 60 * 1000;

/// Weights of the four sub-scores.
const W_MESSAGES: f64 = 0.30;
const W_INITIATIONS: f64 = 0.25;
const W_RESPONSE_TIME: f64 = 0.15;
const W_REACTIONS: f64 = 0.30;

/// Reciprocity result. All scores are 0–100.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReciprocityAnalysis {
    pub message_balance: f64,
    pub initiation_balance: f64,
    pub response_time_symmetry: f64,
    pub reaction_balance: f64,
    pub overall: f64,
}

impl ReciprocityAnalysis {
    /// The neutral default used below the data floor.
    fn neutral() -> Self {
        Self {
            message_balance: 50.0,
            initiation_balance: 50.0,
            response_time_symmetry: 50.0,
            reaction_balance: 50.0,
            overall: 50.0,
        }
    }
}

/// `100 · (1 − 2·|share − 0.5|)` on the first party's share of a count
/// pair. Perfectly even halves score 100, a one-sided split scores 0.
fn balance_score(a: usize, b: usize) -> f64 {
    let total = a + b;
    if total == 0 {
        return 50.0;
    }
    let share = a as f64 / total as f64;
    100.0 * (1.0 - 2.0 * (share - 0.5).abs())
}

pub fn analyze(conv: &ParsedConversation) -> ReciprocityAnalysis {
    if conv.participants.len() != 2 || conv.metadata.total_messages < MIN_MESSAGES {
        return ReciprocityAnalysis::neutral();
    }

    let names = [
        conv.participants[0].name.as_str(),
        conv.participants[1].name.as_str(),
    ];
    let messages: Vec<_> = conv.user_messages().collect();

    let count_for = |name: &str| messages.iter().filter(|m| m.sender == name).count();
    let message_balance = balance_score(count_for(names[0]), count_for(names[1]));

    let sessions = segment_sessions(
        &messages.iter().map(|m| (*m).clone()).collect::<Vec<_>>(),
        conv.platform.session_gap_ms(),
    );
    let initiations_for = |name: &str| {
        sessions
            .iter()
            .filter(|s| messages[s.first].sender == name)
            .count()
    };
    let initiation_balance = balance_score(initiations_for(names[0]), initiations_for(names[1]));

    // Median response times, mirroring the timing module's gap rules.
    let mut gaps: [Vec<f64>; 2] = [Vec::new(), Vec::new()];
    for pair in messages.windows(2) {
        let (prev, cur) = (pair[0], pair[1]);
        let gap = cur.timestamp - prev.timestamp;
        if prev.sender == cur.sender || gap < 0 || gap > RESPONSE_CAP_MS {
            continue;
        }
        if let Some(i) = names.iter().position(|n| *n == cur.sender) {
            gaps[i].push(gap as f64);
        }
    }
    let medians = [median(&gaps[0]), median(&gaps[1])];
    let response_time_symmetry = match (gaps[0].is_empty(), gaps[1].is_empty()) {
        (true, true) => 50.0,
        (true, false) | (false, true) => 10.0,
        (false, false) => {
            let (lo, hi) = (medians[0].min(medians[1]), medians[0].max(medians[1]));
            if hi == 0.0 { 100.0 } else { 100.0 * lo / hi }
        }
    };

    let reactions_for = |name: &str| {
        messages
            .iter()
            .flat_map(|m| &m.reactions)
            .filter(|r| r.actor == name)
            .count()
    };
    let given = [reactions_for(names[0]), reactions_for(names[1])];
    // Some platforms strip reactions from exports; without any signal the
    // component stays neutral.
    let reaction_balance = if given[0] + given[1] == 0 {
        50.0
    } else {
        balance_score(given[0], given[1])
    };

    let overall = W_MESSAGES * message_balance
        + W_INITIATIONS * initiation_balance
        + W_RESPONSE_TIME * response_time_symmetry
        + W_REACTIONS * reaction_balance;

    ReciprocityAnalysis {
        message_balance: round1(message_balance),
        initiation_balance: round1(initiation_balance),
        response_time_symmetry: round1(response_time_symmetry),
        reaction_balance: round1(reaction_balance),
        overall: round1(overall),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Participant, Reaction, UnifiedMessage};
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
    fn test_balance_score() {
        assert_eq!(balance_score(10, 10), 100.0);
        assert_eq!(balance_score(10, 0), 0.0);
        assert!((balance_score(15, 5) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_below_floor_is_all_fifty() {
        let messages = vec![
            UnifiedMessage::text("Ala", "a", 0),
            UnifiedMessage::text("Bartek", "b", MIN),
        ];
        let result = analyze(&conv(messages));
        assert_eq!(result.overall, 50.0);
        assert_eq!(result.message_balance, 50.0);
        assert_eq!(result.reaction_balance, 50.0);
    }

    #[test]
    fn test_balanced_conversation_scores_high() {
        let mut messages = Vec::new();
        for i in 0..40i64 {
            let sender = if i % 2 == 0 { "Ala" } else { "Bartek" };
            let mut msg = UnifiedMessage::text(sender, "wiadomość", i * 10 * MIN);
            if i % 4 == 0 {
                msg.reactions.push(Reaction {
                    emoji: "❤".to_string(),
                    actor: if sender == "Ala" { "Bartek" } else { "Ala" }.to_string(),
                    timestamp: None,
                });
            }
            messages.push(msg);
        }
        let result = analyze(&conv(messages));
        assert_eq!(result.message_balance, 100.0);
        assert!(result.overall > 80.0);
    }

    #[test]
    fn test_fast_vs_slow_pair_symmetry() {
        // Ala answers in 3 s, Bartek in 23 min
        let mut messages = Vec::new();
        let mut ts = 0i64;
        for _ in 0..20 {
            messages.push(UnifiedMessage::text("Bartek", "pytanie", ts));
            ts += 3 * SEC;
            messages.push(UnifiedMessage::text("Ala", "odpowiedź", ts));
            ts += 23 * MIN;
        }
        let result = analyze(&conv(messages));
        // 3 s vs 1380 s: symmetry well under 15
        assert!(result.response_time_symmetry < 15.0);
        assert!(result.overall < 80.0);
    }

    #[test]
    fn test_one_sided_initiations() {
        let mut messages = Vec::new();
        for i in 0..20i64 {
            // Ala always opens after a long gap, Bartek replies
            let base = i * 10 * HOUR;
            messages.push(UnifiedMessage::text("Ala", "hej", base));
            messages.push(UnifiedMessage::text("Bartek", "hej hej", base + MIN));
        }
        let result = analyze(&conv(messages));
        assert_eq!(result.initiation_balance, 0.0);
    }
}
