//! Extraction passes behind the deep scanner.

use std::collections::HashMap;

use crate::lexicons::{
    AFFECTIONATE_PHRASES, APOLOGY_TOKENS, STRONG_ASSERTIONS, contains_marker, find_marker,
    is_emotional_word, is_stopword, pet_name_matches,
};
use crate::model::{ParsedConversation, UnifiedMessage};
use crate::stats::round2;
use crate::text::{bigrams, tokenize};
use crate::timeutil::hour_of;

use super::{
    Contradiction, InterestingThread, Obsession, PersonDossier, PowerMoves, Quote, ScoredQuote,
    truncate_chars,
};

const CONFESSION_MIN_WORDS: usize = 30;
const CONFESSION_LIMIT: usize = 15;
const QUOTE_TRUNCATE: usize = 250;

const EMBARRASSING_LIMIT: usize = 20;

const CONTRADICTION_WINDOW_MS: i64 = 72 * 60 * 60 * 1000;
const CONTRADICTION_MIN_FOLLOWUPS: usize = 8;
const CONTRADICTION_LIMIT: usize = 8;

const OBSESSION_BIGRAM_MIN: usize = 5;
const OBSESSION_UNIGRAM_MIN: usize = 15;
const OBSESSION_LIMIT: usize = 7;

const LEFT_ON_READ_MS: i64 = 4 * 60 * 60 * 1000;
const APOLOGY_WINDOW_MS: i64 = 6 * 60 * 60 * 1000;
const CHAIN_MIN: usize = 3;

const THREAD_GAP_MS: i64 = 30 * 60 * 1000;
const THREAD_MIN_MESSAGES: usize = 5;
const THREAD_LIMIT: usize = 5;

pub(super) fn scan_person(conv: &ParsedConversation, name: &str) -> PersonDossier {
    let own: Vec<&UnifiedMessage> = conv
        .user_messages()
        .filter(|m| m.sender == name)
        .collect();

    PersonDossier {
        confessions: confessions(&own),
        embarrassing: embarrassing(&own),
        contradictions: contradictions(&own),
        obsessions: obsessions(&own),
        power_moves: power_moves(conv, name),
        pet_names: pet_names(&own),
    }
}

fn confessions(own: &[&UnifiedMessage]) -> Vec<Quote> {
    let mut long: Vec<Quote> = own
        .iter()
        .filter(|m| m.word_count() >= CONFESSION_MIN_WORDS)
        .map(|m| Quote {
            content: truncate_chars(&m.content, QUOTE_TRUNCATE),
            timestamp: m.timestamp,
            words: m.word_count(),
        })
        .collect();
    long.sort_by(|a, b| b.words.cmp(&a.words).then(a.timestamp.cmp(&b.timestamp)));
    long.truncate(CONFESSION_LIMIT);
    long
}

/// Hour-of-day multiplier: deep-night messages embarrass the most.
fn night_factor(hour: u32) -> f64 {
    match hour {
        3..=5 => 3.0,
        1..=2 => 2.0,
        23 | 0 => 1.5,
        _ => 1.0,
    }
}

fn embarrassing(own: &[&UnifiedMessage]) -> Vec<ScoredQuote> {
    let mut scored: Vec<ScoredQuote> = own
        .iter()
        .filter(|m| !m.content.is_empty())
        .map(|m| {
            let tokens = tokenize(&m.content);
            let words = tokens.len().max(1);
            let emotional = tokens.iter().filter(|t| is_emotional_word(t)).count();
            let density = emotional as f64 / words as f64;
            let night = night_factor(hour_of(m.timestamp));
            let score = words as f64 * (0.3 + 2.0 * density) * night;

            let reason = if night > 1.0 {
                "late_night"
            } else if density > 0.1 {
                "emotional"
            } else {
                "rambling"
            };

            ScoredQuote {
                content: truncate_chars(&m.content, QUOTE_TRUNCATE),
                timestamp: m.timestamp,
                score: round2(score),
                reason,
            }
        })
        .collect();
    scored.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.timestamp.cmp(&b.timestamp))
    });
    scored.truncate(EMBARRASSING_LIMIT);
    scored
}

fn contradictions(own: &[&UnifiedMessage]) -> Vec<Contradiction> {
    let mut found = Vec::new();

    for (i, msg) in own.iter().enumerate() {
        if found.len() >= CONTRADICTION_LIMIT {
            break;
        }
        if msg.content.is_empty() {
            continue;
        }
        let lower = msg.content.to_lowercase();
        let tokens = tokenize(&lower);
        let Some(pattern) = find_marker(&lower, &tokens, STRONG_ASSERTIONS) else {
            continue;
        };

        let window_end = msg.timestamp + CONTRADICTION_WINDOW_MS;
        let followups: Vec<&&UnifiedMessage> = own[i + 1..]
            .iter()
            .take_while(|m| m.timestamp <= window_end)
            .collect();
        let affectionate = followups.iter().any(|m| {
            let lower = m.content.to_lowercase();
            let tokens = tokenize(&lower);
            contains_marker(&lower, &tokens, AFFECTIONATE_PHRASES)
        });

        if followups.len() >= CONTRADICTION_MIN_FOLLOWUPS || affectionate {
            found.push(Contradiction {
                assertion: truncate_chars(&msg.content, QUOTE_TRUNCATE),
                pattern: pattern.to_string(),
                timestamp: msg.timestamp,
                followup_messages: followups.len(),
                affectionate_followup: affectionate,
            });
        }
    }

    found
}

fn obsessions(own: &[&UnifiedMessage]) -> Vec<Obsession> {
    let mut unigram_counts: HashMap<String, usize> = HashMap::new();
    let mut bigram_counts: HashMap<String, usize> = HashMap::new();

    for msg in own {
        let tokens: Vec<String> = tokenize(&msg.content)
            .into_iter()
            .filter(|t| !is_stopword(t) && t.chars().count() > 2)
            .collect();
        for t in &tokens {
            *unigram_counts.entry(t.clone()).or_default() += 1;
        }
        for b in bigrams(&tokens) {
            *bigram_counts.entry(b).or_default() += 1;
        }
    }

    let mut result: Vec<Obsession> = bigram_counts
        .into_iter()
        .filter(|(_, c)| *c >= OBSESSION_BIGRAM_MIN)
        .map(|(phrase, count)| Obsession { phrase, count })
        .collect();

    // Unigrams already covered by a reported bigram stay out.
    let mut singles: Vec<Obsession> = unigram_counts
        .into_iter()
        .filter(|(word, c)| {
            *c >= OBSESSION_UNIGRAM_MIN
                && !result
                    .iter()
                    .any(|b| b.phrase.split(' ').any(|part| part == word))
        })
        .map(|(phrase, count)| Obsession { phrase, count })
        .collect();
    result.append(&mut singles);

    result.sort_by(|a, b| b.count.cmp(&a.count).then(a.phrase.cmp(&b.phrase)));
    result.truncate(OBSESSION_LIMIT);
    result
}

fn power_moves(conv: &ParsedConversation, name: &str) -> PowerMoves {
    let messages: Vec<&UnifiedMessage> = conv.user_messages().collect();
    let mut moves = PowerMoves::default();

    // Left-on-read: the partner double-texts after a 4h+ wait, so this
    // person sat on the message. Only meaningful in a dyad.
    if conv.participants.len() == 2 {
        for pair in messages.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let gap = b.timestamp - a.timestamp;
            if a.sender == b.sender && a.sender != name && gap >= LEFT_ON_READ_MS {
                moves.left_on_read += 1;
                moves.worst_left_on_read_ms = moves.worst_left_on_read_ms.max(gap);
            }
        }
    }

    // Apologies not answered to an earlier apology from the other side.
    for (i, msg) in messages.iter().enumerate() {
        if msg.sender != name || msg.content.is_empty() {
            continue;
        }
        let lower = msg.content.to_lowercase();
        let tokens = tokenize(&lower);
        if !contains_marker(&lower, &tokens, APOLOGY_TOKENS) {
            continue;
        }
        let preceded = messages[..i].iter().rev().any(|m| {
            if msg.timestamp - m.timestamp > APOLOGY_WINDOW_MS {
                return false;
            }
            if m.sender == name {
                return false;
            }
            let lower = m.content.to_lowercase();
            let tokens = tokenize(&lower);
            contains_marker(&lower, &tokens, APOLOGY_TOKENS)
        });
        if !preceded {
            moves.apologies_first += 1;
        }
    }

    // Double-text chains: runs of 3+ own messages.
    let mut run = 0usize;
    for msg in &messages {
        if msg.sender == name {
            run += 1;
            if run == CHAIN_MIN {
                moves.double_text_chains += 1;
            }
            moves.longest_chain = moves.longest_chain.max(run);
        } else {
            run = 0;
        }
    }

    moves
}

fn pet_names(own: &[&UnifiedMessage]) -> Vec<Obsession> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for msg in own {
        for name in pet_name_matches(&msg.content) {
            *counts.entry(name).or_default() += 1;
        }
    }
    let mut result: Vec<Obsession> = counts
        .into_iter()
        .map(|(phrase, count)| Obsession { phrase, count })
        .collect();
    result.sort_by(|a, b| b.count.cmp(&a.count).then(a.phrase.cmp(&b.phrase)));
    result
}

pub(super) fn interesting_threads(conv: &ParsedConversation) -> Vec<InterestingThread> {
    let messages: Vec<&UnifiedMessage> = conv.user_messages().collect();

    // Group into exchanges on sub-30-minute gaps.
    let mut exchanges: Vec<(usize, usize)> = Vec::new();
    let mut start = 0usize;
    for i in 1..messages.len() {
        if messages[i].timestamp - messages[i - 1].timestamp >= THREAD_GAP_MS {
            exchanges.push((start, i - 1));
            start = i;
        }
    }
    if !messages.is_empty() {
        exchanges.push((start, messages.len() - 1));
    }

    let mut threads: Vec<InterestingThread> = exchanges
        .into_iter()
        .filter(|(a, b)| b - a + 1 >= THREAD_MIN_MESSAGES)
        .map(|(a, b)| {
            let slice = &messages[a..=b];
            let count = slice.len();

            let mut words_total = 0usize;
            let mut emotional = 0usize;
            let lengths: Vec<f64> = slice
                .iter()
                .map(|m| {
                    let tokens = tokenize(&m.content);
                    words_total += tokens.len();
                    emotional += tokens.iter().filter(|t| is_emotional_word(t)).count();
                    tokens.len() as f64
                })
                .collect();
            let density = emotional as f64 / words_total.max(1) as f64;
            let variance = crate::stats::std_dev(&lengths).powi(2);
            let late_night = slice
                .iter()
                .any(|m| crate::timeutil::is_late_night(m.timestamp));
            let boost = if late_night { 1.5 } else { 1.0 };

            let score = (density * 100.0 + variance.sqrt() + count as f64) * boost;

            InterestingThread {
                start_ts: slice[0].timestamp,
                end_ts: slice[count - 1].timestamp,
                messages: count,
                late_night,
                score: round2(score),
                preview: truncate_chars(&slice[0].content, 120),
            }
        })
        .collect();

    threads.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.start_ts.cmp(&b.start_ts))
    });
    threads.truncate(THREAD_LIMIT);
    threads
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Participant;
    use crate::parser::Platform;

    const MIN: i64 = 60 * 1000;
    const HOUR: i64 = 60 * MIN;
    // 2024-01-15 12:00 UTC
    const NOON: i64 = 1_705_276_800_000 + 12 * HOUR;

    fn conv(messages: Vec<UnifiedMessage>) -> ParsedConversation {
        ParsedConversation::finalize(
            Platform::Messenger,
            "t".to_string(),
            vec![Participant::new("Ala"), Participant::new("Bartek")],
            messages,
            vec![],
        )
    }

    use crate::model::UnifiedMessage;

    fn long_text(words: usize) -> String {
        std::iter::repeat("słowo")
            .take(words)
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn test_confessions_threshold_and_truncation() {
        let messages = vec![
            UnifiedMessage::text("Ala", long_text(29), NOON),
            UnifiedMessage::text("Ala", long_text(300), NOON + MIN),
        ];
        let scan = super::super::scan(&conv(messages));
        let ala = &scan.per_person["Ala"];
        assert_eq!(ala.confessions.len(), 1);
        assert_eq!(ala.confessions[0].words, 300);
        assert!(ala.confessions[0].content.chars().count() <= QUOTE_TRUNCATE + 1);
    }

    #[test]
    fn test_night_factor() {
        assert_eq!(night_factor(4), 3.0);
        assert_eq!(night_factor(1), 2.0);
        assert_eq!(night_factor(23), 1.5);
        assert_eq!(night_factor(0), 1.5);
        assert_eq!(night_factor(14), 1.0);
    }

    #[test]
    fn test_embarrassing_prefers_late_night_emotion() {
        let base = NOON - 12 * HOUR; // midnight
        let messages = vec![
            UnifiedMessage::text("Ala", "kocham cię tęsknię strasznie kocham", base + 4 * HOUR),
            UnifiedMessage::text("Ala", "zwykła dzienna wiadomość o niczym", NOON),
        ];
        let scan = super::super::scan(&conv(messages));
        let ala = &scan.per_person["Ala"];
        assert_eq!(ala.embarrassing[0].reason, "late_night");
        assert!(ala.embarrassing[0].score > ala.embarrassing[1].score);
    }

    #[test]
    fn test_contradiction_by_affection() {
        let messages = vec![
            UnifiedMessage::text("Ala", "mam dość, koniec z nami", NOON),
            UnifiedMessage::text("Ala", "przepraszam, kocham cię", NOON + 2 * HOUR),
        ];
        let scan = super::super::scan(&conv(messages));
        let ala = &scan.per_person["Ala"];
        assert_eq!(ala.contradictions.len(), 1);
        assert!(ala.contradictions[0].affectionate_followup);
    }

    #[test]
    fn test_contradiction_by_volume() {
        let mut messages = vec![UnifiedMessage::text("Ala", "nie obchodzi mnie to już", NOON)];
        for i in 0..9i64 {
            messages.push(UnifiedMessage::text(
                "Ala",
                "jeszcze jedno zdanie w tej sprawie",
                NOON + (i + 1) * HOUR,
            ));
        }
        let scan = super::super::scan(&conv(messages));
        assert_eq!(scan.per_person["Ala"].contradictions.len(), 1);
        assert!(!scan.per_person["Ala"].contradictions[0].affectionate_followup);
    }

    #[test]
    fn test_no_contradiction_when_silent_after() {
        let messages = vec![
            UnifiedMessage::text("Ala", "koniec, odchodzę stąd", NOON),
            UnifiedMessage::text("Ala", "serio", NOON + MIN),
        ];
        let scan = super::super::scan(&conv(messages));
        assert!(scan.per_person["Ala"].contradictions.is_empty());
    }

    #[test]
    fn test_obsessions_bigrams_subsume_unigrams() {
        let mut messages = Vec::new();
        for i in 0..20i64 {
            messages.push(UnifiedMessage::text(
                "Ala",
                "silownia trening silownia trening",
                NOON + i * MIN,
            ));
        }
        let scan = super::super::scan(&conv(messages));
        let obsessions = &scan.per_person["Ala"].obsessions;
        assert!(obsessions.iter().any(|o| o.phrase.contains(' ')));
        // The covered unigrams must not appear separately
        assert!(obsessions.iter().all(|o| o.phrase != "silownia"));
    }

    #[test]
    fn test_left_on_read_credits_the_silent_side() {
        let messages = vec![
            UnifiedMessage::text("Ala", "napisz jak będziesz", NOON),
            UnifiedMessage::text("Ala", "halo?", NOON + 5 * HOUR),
            UnifiedMessage::text("Bartek", "sorki, zajęty byłem", NOON + 5 * HOUR + MIN),
        ];
        let scan = super::super::scan(&conv(messages));
        assert_eq!(scan.per_person["Bartek"].power_moves.left_on_read, 1);
        assert_eq!(
            scan.per_person["Bartek"].power_moves.worst_left_on_read_ms,
            5 * HOUR
        );
        assert_eq!(scan.per_person["Ala"].power_moves.left_on_read, 0);
    }

    #[test]
    fn test_apologies_first() {
        let messages = vec![
            UnifiedMessage::text("Ala", "przepraszam za wczoraj", NOON),
            UnifiedMessage::text("Bartek", "ja też przepraszam", NOON + MIN),
        ];
        let scan = super::super::scan(&conv(messages));
        assert_eq!(scan.per_person["Ala"].power_moves.apologies_first, 1);
        // Bartek's apology answers Ala's: not "first"
        assert_eq!(scan.per_person["Bartek"].power_moves.apologies_first, 0);
    }

    #[test]
    fn test_double_text_chains() {
        let messages = vec![
            UnifiedMessage::text("Ala", "raz", NOON),
            UnifiedMessage::text("Ala", "dwa", NOON + MIN),
            UnifiedMessage::text("Ala", "trzy", NOON + 2 * MIN),
            UnifiedMessage::text("Ala", "cztery", NOON + 3 * MIN),
            UnifiedMessage::text("Bartek", "no hej", NOON + 4 * MIN),
        ];
        let scan = super::super::scan(&conv(messages));
        let moves = &scan.per_person["Ala"].power_moves;
        assert_eq!(moves.double_text_chains, 1);
        assert_eq!(moves.longest_chain, 4);
    }

    #[test]
    fn test_pet_names_counted() {
        let messages = vec![
            UnifiedMessage::text("Ala", "dobranoc misiu", NOON),
            UnifiedMessage::text("Ala", "misiu śpisz już?", NOON + MIN),
            UnifiedMessage::text("Bartek", "dobranoc kochanie", NOON + 2 * MIN),
        ];
        let scan = super::super::scan(&conv(messages));
        assert_eq!(scan.per_person["Ala"].pet_names[0].phrase, "misiu");
        assert_eq!(scan.per_person["Ala"].pet_names[0].count, 2);
        assert_eq!(scan.per_person["Bartek"].pet_names[0].phrase, "kochanie");
    }

    #[test]
    fn test_interesting_threads() {
        let mut messages = Vec::new();
        // A tight emotional exchange of 6 messages
        for i in 0..6i64 {
            let sender = if i % 2 == 0 { "Ala" } else { "Bartek" };
            messages.push(UnifiedMessage::text(
                sender,
                "kocham cię ale się martwię i boję o nas",
                NOON + i * 2 * MIN,
            ));
        }
        // A lone message far away: no thread
        messages.push(UnifiedMessage::text("Ala", "hej", NOON + 10 * HOUR));
        let scan = super::super::scan(&conv(messages));
        assert_eq!(scan.threads.len(), 1);
        assert_eq!(scan.threads[0].messages, 6);
        assert!(scan.threads[0].score > 0.0);
    }
}
