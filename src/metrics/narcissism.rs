//! Shift-vs-support response classification (Derber's conversational
//! narcissism, CNI).
//!
//! A response either supports the previous speaker's topic (question back,
//! acknowledgement, topic overlap) or shifts attention to the responder.
//! CNI is the shift share of the classified responses.

use indexmap::IndexMap;
use serde::Serialize;

use crate::lexicons::{ACKNOWLEDGEMENTS, PARTNER_REFERENCE, QUESTION_WORDS, SELF_REFERENCE};
use crate::model::ParsedConversation;
use crate::text::{shared_content_words, tokenize};

/// Responses slower than this say nothing about attention.
const MAX_RESPONSE_GAP_MS: i64 = 6 * 60 * 60 * 1000;

/// Minimum classified (shift + support) responses per person.
const MIN_CLASSIFIED: usize = 10;

/// Content-word overlap that marks topic continuity.
const SUPPORT_OVERLAP: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ResponseClass {
    Support,
    Shift,
    Ambiguous,
}

/// CNI level band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CniBand {
    High,
    Moderate,
    Low,
}

impl CniBand {
    fn of(cni: i64) -> Self {
        if cni >= 60 {
            CniBand::High
        } else if cni >= 40 {
            CniBand::Moderate
        } else {
            CniBand::Low
        }
    }

    /// Polish display label.
    pub fn label_pl(&self) -> &'static str {
        match self {
            CniBand::High => "wysoki",
            CniBand::Moderate => "umiarkowany",
            CniBand::Low => "niski",
        }
    }
}

/// Shift/support profile of one participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonCni {
    pub supports: usize,
    pub shifts: usize,
    pub ambiguous: usize,
    /// `shifts / (shifts + supports) × 100`, rounded
    pub cni: i64,
    pub band: CniBand,
}

/// Conversational narcissism result; per-person maps only carry people who
/// met the sample floor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CniAnalysis {
    pub per_person: IndexMap<String, PersonCni>,
}

fn classify(prev_tokens: &[String], cur: &str, cur_tokens: &[String]) -> ResponseClass {
    let overlap = shared_content_words(prev_tokens, cur_tokens, 2);

    let first = cur_tokens.first().map(String::as_str);
    let first_is = |list: &[&str]| first.is_some_and(|t| list.contains(&t));

    let support = cur.contains('?')
        || first_is(QUESTION_WORDS)
        || cur_tokens
            .iter()
            .take(4)
            .any(|t| PARTNER_REFERENCE.contains(&t.as_str()))
        || first_is(ACKNOWLEDGEMENTS)
        || overlap >= SUPPORT_OVERLAP;

    if support {
        ResponseClass::Support
    } else if first_is(SELF_REFERENCE) && overlap == 0 {
        ResponseClass::Shift
    } else {
        ResponseClass::Ambiguous
    }
}

pub fn analyze(conv: &ParsedConversation) -> Option<CniAnalysis> {
    let messages: Vec<_> = conv.user_messages().collect();

    let mut tallies: IndexMap<String, (usize, usize, usize)> = conv
        .participants
        .iter()
        .map(|p| (p.name.clone(), (0, 0, 0)))
        .collect();

    for pair in messages.windows(2) {
        let (prev, cur) = (pair[0], pair[1]);
        if prev.sender == cur.sender
            || cur.timestamp - prev.timestamp > MAX_RESPONSE_GAP_MS
            || prev.content.is_empty()
            || cur.content.is_empty()
        {
            continue;
        }

        let prev_tokens = tokenize(&prev.content);
        let cur_tokens = tokenize(&cur.content);
        let class = classify(&prev_tokens, &cur.content, &cur_tokens);

        if let Some(tally) = tallies.get_mut(&cur.sender) {
            match class {
                ResponseClass::Support => tally.0 += 1,
                ResponseClass::Shift => tally.1 += 1,
                ResponseClass::Ambiguous => tally.2 += 1,
            }
        }
    }

    let per_person: IndexMap<String, PersonCni> = tallies
        .into_iter()
        .filter(|(_, (supports, shifts, _))| supports + shifts >= MIN_CLASSIFIED)
        .map(|(name, (supports, shifts, ambiguous))| {
            let cni = (shifts as f64 / (shifts + supports) as f64 * 100.0).round() as i64;
            (
                name,
                PersonCni {
                    supports,
                    shifts,
                    ambiguous,
                    cni,
                    band: CniBand::of(cni),
                },
            )
        })
        .collect();

    if per_person.is_empty() {
        return None;
    }
    Some(CniAnalysis { per_person })
}
