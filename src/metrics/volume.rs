//! Per-person volume basics: message/word/character counts, extremes,
//! emoji, questions, media, reactions, top words and phrases, vocabulary
//! richness.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::Serialize;

use crate::lexicons::is_stopword;
use crate::model::ParsedConversation;
use crate::stats::{round1, round2};
use crate::text::{bigrams, count_emoji, tokenize, trigrams};

/// A counted word or phrase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Counted {
    pub text: String,
    pub count: usize,
}

/// Content extreme (longest or shortest message).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessageExtreme {
    pub content: String,
    pub length: usize,
    pub timestamp: i64,
}

/// Volume profile of one participant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonVolume {
    pub messages: usize,
    pub words: usize,
    pub characters: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longest_message: Option<MessageExtreme>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shortest_message: Option<MessageExtreme>,
    pub emoji: usize,
    pub questions: usize,
    pub media: usize,
    pub links: usize,
    pub reactions_given: usize,
    pub reactions_received: usize,
    pub avg_words_per_message: f64,
    pub avg_chars_per_message: f64,
    pub unique_words: usize,
    /// Guiraud's R: `unique / sqrt(total)`, stable across corpus lengths
    /// where a plain type-token ratio is not.
    pub vocabulary_richness: f64,
    pub top_words: Vec<Counted>,
    pub top_phrases: Vec<Counted>,
}

const TOP_WORDS: usize = 20;
const TOP_PHRASES: usize = 10;
const MIN_PHRASE_COUNT: usize = 2;

#[derive(Default)]
struct Accumulator {
    messages: usize,
    words: usize,
    characters: usize,
    longest: Option<MessageExtreme>,
    shortest: Option<MessageExtreme>,
    emoji: usize,
    questions: usize,
    media: usize,
    links: usize,
    reactions_given: usize,
    reactions_received: usize,
    word_counts: HashMap<String, usize>,
    phrase_counts: HashMap<String, usize>,
}

/// Accumulates volume statistics for every participant.
pub fn analyze(conv: &ParsedConversation) -> IndexMap<String, PersonVolume> {
    let mut acc: IndexMap<String, Accumulator> = conv
        .participants
        .iter()
        .map(|p| (p.name.clone(), Accumulator::default()))
        .collect();

    for msg in conv.user_messages() {
        // Result maps stay keyed by the participant list; reactions from
        // anyone outside it are ignored.
        for reaction in &msg.reactions {
            if let Some(actor) = acc.get_mut(&reaction.actor) {
                actor.reactions_given += 1;
            }
        }

        let Some(person) = acc.get_mut(&msg.sender) else {
            continue;
        };

        person.messages += 1;
        person.reactions_received += msg.reactions.len();
        let chars = msg.content.chars().count();
        person.words += msg.word_count();
        person.characters += chars;
        person.emoji += count_emoji(&msg.content);
        if msg.content.contains('?') {
            person.questions += 1;
        }
        if msg.has_media {
            person.media += 1;
        }
        if msg.has_link {
            person.links += 1;
        }

        if !msg.content.is_empty() {
            let extreme = || MessageExtreme {
                content: msg.content.clone(),
                length: chars,
                timestamp: msg.timestamp,
            };
            if person.longest.as_ref().is_none_or(|l| chars > l.length) {
                person.longest = Some(extreme());
            }
            if person.shortest.as_ref().is_none_or(|s| chars < s.length) {
                person.shortest = Some(extreme());
            }
        }

        let tokens = tokenize(&msg.content);
        for token in &tokens {
            if !is_stopword(token) && token.chars().count() > 2 {
                *person.word_counts.entry(token.clone()).or_default() += 1;
            }
        }
        for phrase in bigrams(&tokens).into_iter().chain(trigrams(&tokens)) {
            if phrase.split(' ').any(|t| !is_stopword(t)) {
                *person.phrase_counts.entry(phrase).or_default() += 1;
            }
        }
    }

    acc.into_iter()
        .map(|(name, a)| {
            let unique_words = a.word_counts.len();
            let msgs = a.messages.max(1) as f64;
            let richness = if a.words > 0 {
                unique_words as f64 / (a.words as f64).sqrt()
            } else {
                0.0
            };
            let profile = PersonVolume {
                messages: a.messages,
                words: a.words,
                characters: a.characters,
                longest_message: a.longest,
                shortest_message: a.shortest,
                emoji: a.emoji,
                questions: a.questions,
                media: a.media,
                links: a.links,
                reactions_given: a.reactions_given,
                reactions_received: a.reactions_received,
                avg_words_per_message: round1(a.words as f64 / msgs),
                avg_chars_per_message: round1(a.characters as f64 / msgs),
                unique_words,
                vocabulary_richness: round2(richness),
                top_words: top_n(a.word_counts, TOP_WORDS, 1),
                top_phrases: top_n(a.phrase_counts, TOP_PHRASES, MIN_PHRASE_COUNT),
            };
            (name, profile)
        })
        .collect()
}

/// Top `n` entries by count; count descending, text ascending for a
/// reproducible order.
fn top_n(counts: HashMap<String, usize>, n: usize, min_count: usize) -> Vec<Counted> {
    let mut entries: Vec<Counted> = counts
        .into_iter()
        .filter(|(_, count)| *count >= min_count)
        .map(|(text, count)| Counted { text, count })
        .collect();
    entries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.text.cmp(&b.text)));
    entries.truncate(n);
    entries
}
