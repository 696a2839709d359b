//! Lexicon-polarity sentiment over the bilingual emotional vocabulary.

use indexmap::IndexMap;
use serde::Serialize;

use crate::lexicons::{Polarity, emotion_of};
use crate::model::ParsedConversation;
use crate::stats::{linear_slope, round1, round2};
use crate::text::tokenize;
use crate::timeutil::month_key;

/// Minimum words per person.
const MIN_WORDS: usize = 100;

/// Sentiment profile of one participant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonSentiment {
    pub positive_hits: usize,
    pub negative_hits: usize,
    pub positive_per_1000: f64,
    pub negative_per_1000: f64,
    /// `(pos − neg) / (pos + neg + 1e-3)`, in `[-1, 1]`
    pub net_score: f64,
}

/// Sentiment result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentAnalysis {
    pub per_person: IndexMap<String, PersonSentiment>,
    /// Combined net score per month
    pub monthly_net: IndexMap<String, f64>,
    pub trend: f64,
}

#[derive(Default, Clone, Copy)]
struct Hits {
    positive: usize,
    negative: usize,
    words: usize,
}

fn net(hits: Hits) -> f64 {
    (hits.positive as f64 - hits.negative as f64)
        / (hits.positive as f64 + hits.negative as f64 + 1e-3)
}

pub fn analyze(conv: &ParsedConversation) -> Option<SentimentAnalysis> {
    let mut per_person_hits: IndexMap<String, Hits> = conv
        .participants
        .iter()
        .map(|p| (p.name.clone(), Hits::default()))
        .collect();
    let mut monthly_hits: IndexMap<String, Hits> = IndexMap::new();

    for msg in conv.user_messages() {
        if msg.content.is_empty() {
            continue;
        }
        let tokens = tokenize(&msg.content);
        let mut hits = Hits {
            words: tokens.len(),
            ..Hits::default()
        };
        for token in &tokens {
            match emotion_of(token) {
                Some((_, Polarity::Positive)) => hits.positive += 1,
                Some((_, Polarity::Negative)) => hits.negative += 1,
                None => {}
            }
        }

        if let Some(person) = per_person_hits.get_mut(&msg.sender) {
            person.positive += hits.positive;
            person.negative += hits.negative;
            person.words += hits.words;
        }
        let month = monthly_hits.entry(month_key(msg.timestamp)).or_default();
        month.positive += hits.positive;
        month.negative += hits.negative;
        month.words += hits.words;
    }

    if per_person_hits.values().any(|h| h.words < MIN_WORDS) {
        return None;
    }

    let per_person = per_person_hits
        .into_iter()
        .map(|(name, hits)| {
            let per_1000 = |n: usize| round1(n as f64 / hits.words.max(1) as f64 * 1000.0);
            (
                name,
                PersonSentiment {
                    positive_hits: hits.positive,
                    negative_hits: hits.negative,
                    positive_per_1000: per_1000(hits.positive),
                    negative_per_1000: per_1000(hits.negative),
                    net_score: round2(net(hits)),
                },
            )
        })
        .collect();

    monthly_hits.sort_keys();
    let monthly_net: IndexMap<String, f64> = monthly_hits
        .into_iter()
        .map(|(month, hits)| (month, round2(net(hits))))
        .collect();
    let series: Vec<f64> = monthly_net.values().copied().collect();

    Some(SentimentAnalysis {
        per_person,
        trend: round2(linear_slope(&series)),
        monthly_net,
    })
}
