//! Pursuit–withdrawal cycle detection.
//!
//! A pursuit is a burst of at least four logical messages from one sender;
//! a withdrawal is the silence of at least four hours that follows it.
//! Overnight silences are not withdrawals unless they outlast a normal
//! night, and short bursts must carry a demand marker so that an excited
//! multi-part story does not read as chasing.

use indexmap::IndexMap;
use serde::Serialize;

use crate::lexicons::is_demand_message;
use crate::model::ParsedConversation;
use crate::stats::{mean, round2};
use crate::timeutil::{ENTER_AS_COMMA_MS, consolidate, hour_of};

/// Same-sender messages within this window form one pursuit burst.
const BURST_WINDOW_MS: i64 = 30 * 60 * 1000;

/// Silence after the burst that counts as withdrawal.
const WITHDRAWAL_MS: i64 = 4 * 60 * 60 * 1000;

/// Minimum logical messages for a pursuit.
const MIN_LOGICAL: usize = 4;

/// Bursts of this many logical messages need no demand marker.
const UNCONDITIONAL_LOGICAL: usize = 6;

/// Overnight window: a gap starting in `21:00..09:00` local...
const NIGHT_START_HOUR: u32 = 21;
const NIGHT_END_HOUR: u32 = 9;

/// ...is suppressed unless it outlasts this cap. A full day of silence is
/// withdrawal even when it began at night.
const OVERNIGHT_CAP_MS: i64 = 12 * 60 * 60 * 1000;

/// Sentinel role when pursuit counts are too close to call.
pub const MUTUAL: &str = "mutual";

/// Minimum messages / cycles / participants to report.
const MIN_MESSAGES: usize = 50;
const MIN_CYCLES: usize = 2;

/// One pursuit–withdrawal cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cycle {
    pub pursuer: String,
    /// First message of the pursuit burst
    pub start_ts: i64,
    /// Withdrawal length
    pub silence_ms: i64,
    /// Logical messages in the burst
    pub logical_messages: usize,
    /// The next sender differed from the pursuer
    pub resolved: bool,
}

/// Pursuit–withdrawal result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PursuitAnalysis {
    pub cycles: Vec<Cycle>,
    pub cycles_per_person: IndexMap<String, usize>,
    /// Dominant pursuer, or [`MUTUAL`]
    pub pursuer: String,
    /// The counterpart role, or [`MUTUAL`]
    pub withdrawer: String,
    /// `(mean silence of the later half / mean of the earlier half) − 1`
    pub escalation_trend: f64,
}

/// `true` when the silence starting at `start_ts` with length `gap_ms` is
/// an ordinary night rather than a withdrawal.
fn overnight_suppressed(start_ts: i64, gap_ms: i64) -> bool {
    if gap_ms > OVERNIGHT_CAP_MS {
        return false;
    }
    let h = hour_of(start_ts);
    h >= NIGHT_START_HOUR || h < NIGHT_END_HOUR
}

pub fn analyze(conv: &ParsedConversation) -> Option<PursuitAnalysis> {
    let messages: Vec<_> = conv.user_messages().cloned().collect();
    if messages.len() < MIN_MESSAGES || conv.participants.len() < 2 {
        return None;
    }

    let bursts = consolidate(&messages, BURST_WINDOW_MS);

    let mut cycles: Vec<Cycle> = Vec::new();
    for burst in &bursts {
        // The logical count consolidates again under the Enter-as-comma
        // window; a burst can span 30-minute pauses between its parts.
        let slice = &messages[burst.first..=burst.last];
        let logical = consolidate(slice, ENTER_AS_COMMA_MS).len();
        if logical < MIN_LOGICAL {
            continue;
        }

        if logical < UNCONDITIONAL_LOGICAL
            && !slice.iter().any(|m| is_demand_message(&m.content))
        {
            continue;
        }

        let Some(next) = messages.get(burst.last + 1) else {
            continue;
        };
        let gap = next.timestamp - burst.end_ts;
        if gap < WITHDRAWAL_MS || overnight_suppressed(burst.end_ts, gap) {
            continue;
        }

        cycles.push(Cycle {
            pursuer: burst.sender.clone(),
            start_ts: burst.start_ts,
            silence_ms: gap,
            logical_messages: logical,
            resolved: next.sender != burst.sender,
        });
    }

    if cycles.len() < MIN_CYCLES {
        return None;
    }

    let mut cycles_per_person: IndexMap<String, usize> = conv
        .participants
        .iter()
        .map(|p| (p.name.clone(), 0))
        .collect();
    for cycle in &cycles {
        *cycles_per_person.entry(cycle.pursuer.clone()).or_default() += 1;
    }

    let top = cycles_per_person
        .iter()
        .max_by_key(|&(_, &c)| c)
        .map(|(name, &c)| (name.clone(), c))
        .expect("at least one participant");
    let bottom = cycles_per_person.values().copied().min().unwrap_or(0);

    let close_call = (top.1 - bottom) as f64 / cycles.len() as f64 * 100.0 < 20.0;
    let (pursuer, withdrawer) = if close_call {
        (MUTUAL.to_string(), MUTUAL.to_string())
    } else {
        let withdrawer = conv
            .participants
            .iter()
            .map(|p| p.name.clone())
            .find(|name| *name != top.0)
            .unwrap_or_else(|| MUTUAL.to_string());
        (top.0, withdrawer)
    };

    let silences: Vec<f64> = cycles.iter().map(|c| c.silence_ms as f64).collect();
    let mid = silences.len() / 2;
    let escalation_trend = if mid == 0 {
        0.0
    } else {
        let early = mean(&silences[..mid]);
        let late = mean(&silences[mid..]);
        if early > 0.0 {
            round2(late / early - 1.0)
        } else {
            0.0
        }
    };

    Some(PursuitAnalysis {
        cycles,
        cycles_per_person,
        pursuer,
        withdrawer,
        escalation_trend,
    })
}
