//! WhatsApp TXT export parser.
//!
//! WhatsApp exports chats as plain text, one message per line with a
//! locale-dependent timestamp prefix:
//!
//! ```text
//! 26.10.2025, 20:40 - Ala: wiadomość
//! [10/26/25, 8:40:00 PM] Ala: message
//! [2025-10-26 20:40:00] Ala: message
//! ```
//!
//! Lines without a prefix continue the previous message. Lines whose body
//! has no `Name:` part, or whose content matches a known system phrase,
//! are classified as system events.

use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveTime};
use regex::Regex;

use crate::error::{ParseWarning, RapportError, Result};
use crate::model::{
    MessageKind, ParsedConversation, SYSTEM_SENDER, UnifiedMessage,
};
use crate::parser::{Parser, Platform};
use crate::text::contains_url;

/// A single message may grow past this many characters through continuation
/// lines; beyond it the content is truncated with an ellipsis.
const MAX_MESSAGE_CHARS: usize = 100_000;

/// Timestamp prefix covering all four locale families: dotted and slashed
/// day-first dates, US dates with AM/PM, ISO dates, bracketed or not, with
/// a literal dash or en/em-dash before the body.
static PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?x)^
        \[?
        (\d{1,4})([./-])(\d{1,2})(?:[./-])(\d{1,4})      # date components
        ,?\s+
        (\d{1,2}):(\d{2})(?::(\d{2}))?                   # time
        (?:\s?([AaPp])\.?[Mm]\.?)?                       # optional meridiem
        \]?
        \s*(?:[-\u{2013}\u{2014}]\s*)?                   # dash before body
        (.*)$",
    )
    .expect("valid WhatsApp prefix regex")
});

/// System event phrases, locale-agnostic substring matches (English and
/// Polish exports).
const SYSTEM_INDICATORS: &[&str] = &[
    // end-to-end encryption notice
    "end-to-end encrypted",
    "szyfrowanie całościowe",
    "zabezpieczone pełnym szyfrowaniem",
    // group membership events
    "created group",
    "created this group",
    "added you",
    "you were added",
    "utworzył grupę",
    "utworzyła grupę",
    "dodał cię",
    "dodała cię",
    "joined using this group's invite link",
    "dołączył do grupy",
    "left the group",
    "opuścił grupę",
    "opuściła grupę",
    "changed the subject",
    "zmienił temat",
    "zmieniła temat",
    "changed this group's icon",
    "changed their phone number",
    "zmienił numer telefonu",
    // deletion / security notices
    "security code changed",
    "kod bezpieczeństwa",
    // missed calls
    "missed voice call",
    "missed video call",
    "nieodebrane połączenie",
];

/// Media placeholder phrases; a body consisting only of one of these (after
/// the sender name) is a media message.
const MEDIA_INDICATORS: &[&str] = &[
    "<media omitted>",
    "<image omitted>",
    "<video omitted>",
    "<audio omitted>",
    "<sticker omitted>",
    "<gif omitted>",
    "image omitted",
    "video omitted",
    "audio omitted",
    "sticker omitted",
    "gif omitted",
    "<pominięto multimedia>",
    "<pominięto obraz>",
    "<pominięto film>",
    "<pominięto plik audio>",
];

/// Deletion placeholder phrases; the message was unsent.
const UNSENT_INDICATORS: &[&str] = &[
    "this message was deleted",
    "you deleted this message",
    "ta wiadomość została usunięta",
    "usunięto tę wiadomość",
];

/// Suffix marking a forwarded file attachment line.
const FILE_ATTACHED_SUFFIX: &str = "(file attached)";

/// Parser for WhatsApp TXT exports.
pub struct WhatsAppParser;

impl WhatsAppParser {
    pub fn new() -> Self {
        Self
    }
}

impl Default for WhatsAppParser {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Date handling
// ============================================================================

/// How the three numeric date components were interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DateReading {
    DayFirst,
    MonthFirst,
    IsoYearFirst,
    /// Day-first chosen by default; both readings were plausible.
    AmbiguousDayFirst,
}

/// Resolves the day/month/year order of a raw component triple.
///
/// A 4-digit first component forces ISO year-first. Otherwise:
/// first > 12 forces DD/MM, second > 12 forces MM/DD, and the tie defaults
/// to DD/MM (flagged ambiguous when the components differ).
fn resolve_date(a: u32, b: u32, c: u32, a_digits: usize) -> Option<(i32, u32, u32, DateReading)> {
    if a_digits == 4 {
        return Some((a as i32, b, c, DateReading::IsoYearFirst));
    }

    let year = expand_year(c);
    if a > 12 {
        Some((year, b, a, DateReading::DayFirst))
    } else if b > 12 {
        Some((year, a, b, DateReading::MonthFirst))
    } else if a == b {
        Some((year, b, a, DateReading::DayFirst))
    } else {
        Some((year, b, a, DateReading::AmbiguousDayFirst))
    }
}

/// Expands a 2-digit year: `00..=69` maps into 2000s, `70..=99` into 1900s.
fn expand_year(y: u32) -> i32 {
    match y {
        0..=69 => 2000 + y as i32,
        70..=99 => 1900 + y as i32,
        _ => y as i32,
    }
}

struct ParsedPrefix {
    timestamp: i64,
    ambiguous: Option<String>,
    body_start: usize,
}

/// Parses the timestamp prefix of a line; `None` means continuation line.
fn parse_prefix(line: &str) -> Option<ParsedPrefix> {
    let caps = PREFIX_RE.captures(line)?;

    let a: u32 = caps[1].parse().ok()?;
    let b: u32 = caps[3].parse().ok()?;
    let c: u32 = caps[4].parse().ok()?;
    let (year, month, day, reading) = resolve_date(a, b, c, caps[1].len())?;

    let mut hour: u32 = caps[5].parse().ok()?;
    let minute: u32 = caps[6].parse().ok()?;
    let second: u32 = caps.get(7).map_or(0, |m| m.as_str().parse().unwrap_or(0));

    if let Some(meridiem) = caps.get(8) {
        let pm = meridiem.as_str().eq_ignore_ascii_case("p");
        if pm && hour < 12 {
            hour += 12;
        } else if !pm && hour == 12 {
            hour = 0;
        }
    }

    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    let time = NaiveTime::from_hms_opt(hour, minute, second)?;
    let timestamp = date.and_time(time).and_utc().timestamp_millis();

    let ambiguous = (reading == DateReading::AmbiguousDayFirst)
        .then(|| format!("{}{sep}{}{sep}{}", &caps[1], &caps[3], &caps[4], sep = &caps[2]));

    Some(ParsedPrefix {
        timestamp,
        ambiguous,
        body_start: caps.get(9).map_or(line.len(), |m| m.start()),
    })
}

// ============================================================================
// Body classification
// ============================================================================

fn matches_any(haystack_lower: &str, phrases: &[&str]) -> bool {
    phrases.iter().any(|p| haystack_lower.contains(p))
}

/// Builds a message from a prefix-bearing line body.
fn classify_body(body: &str, timestamp: i64) -> UnifiedMessage {
    let lower = body.to_lowercase();

    // System events either have no `Name:` part or match a known phrase.
    let Some((name, content)) = split_sender(body) else {
        return system_message(body, timestamp);
    };
    if matches_any(&lower, SYSTEM_INDICATORS) {
        return system_message(body, timestamp);
    }

    let content = content.trim();
    let content_lower = content.to_lowercase();

    let kind = if matches_any(&content_lower, UNSENT_INDICATORS) {
        MessageKind::Unsent
    } else if matches_any(&content_lower, MEDIA_INDICATORS)
        || content_lower.ends_with(FILE_ATTACHED_SUFFIX)
    {
        MessageKind::Media
    } else {
        MessageKind::Text
    };

    let mut msg = UnifiedMessage::of_kind(name, kind, timestamp);
    if kind == MessageKind::Text {
        msg.content = content.to_string();
        msg.has_link = contains_url(content);
    }
    msg
}

fn system_message(body: &str, timestamp: i64) -> UnifiedMessage {
    let mut msg = UnifiedMessage::of_kind(SYSTEM_SENDER, MessageKind::System, timestamp);
    msg.content = body.trim().to_string();
    msg
}

/// Splits `Name: content`, rejecting bodies without the separator.
fn split_sender(body: &str) -> Option<(&str, &str)> {
    let idx = body.find(": ")?;
    let name = body[..idx].trim();
    if name.is_empty() {
        return None;
    }
    Some((name, &body[idx + 2..]))
}

// ============================================================================
// Parser
// ============================================================================

impl Parser for WhatsAppParser {
    fn name(&self) -> &'static str {
        "WhatsApp"
    }

    fn platform(&self) -> Platform {
        Platform::WhatsApp
    }

    fn parse_str(&self, content: &str) -> Result<ParsedConversation> {
        let content = content.strip_prefix('\u{FEFF}').unwrap_or(content);

        let mut messages: Vec<UnifiedMessage> = Vec::new();
        let mut warnings: Vec<ParseWarning> = Vec::new();
        let mut ambiguity_reported = false;
        let mut pending: Option<UnifiedMessage> = None;

        let flush = |pending: &mut Option<UnifiedMessage>,
                         warnings: &mut Vec<ParseWarning>,
                         line_no: usize,
                         messages: &mut Vec<UnifiedMessage>| {
            if let Some(mut msg) = pending.take() {
                if msg.content.chars().count() > MAX_MESSAGE_CHARS {
                    let cut = msg
                        .content
                        .char_indices()
                        .nth(MAX_MESSAGE_CHARS)
                        .map_or(msg.content.len(), |(i, _)| i);
                    msg.content.truncate(cut);
                    msg.content.push('…');
                    warnings.push(ParseWarning::Truncation { line: line_no });
                }
                messages.push(msg);
            }
        };

        for (line_no, raw_line) in content.lines().enumerate() {
            let line = raw_line.trim_end_matches('\r');
            match parse_prefix(line) {
                Some(prefix) => {
                    flush(&mut pending, &mut warnings, line_no, &mut messages);
                    if let Some(raw) = prefix.ambiguous {
                        if !ambiguity_reported {
                            warnings.push(ParseWarning::AmbiguousDate { raw });
                            ambiguity_reported = true;
                        }
                    }
                    pending = Some(classify_body(&line[prefix.body_start..], prefix.timestamp));
                }
                None => {
                    if let Some(msg) = pending.as_mut() {
                        msg.content.push('\n');
                        msg.content.push_str(line);
                    }
                    // Leading lines before any prefix are dropped.
                }
            }
        }
        let last_line = content.lines().count();
        flush(&mut pending, &mut warnings, last_line, &mut messages);

        if messages.is_empty() {
            return Err(RapportError::invalid_format(
                "WhatsApp TXT",
                "no line matched any known date format",
            ));
        }
        if !messages.iter().any(UnifiedMessage::is_user_message) {
            return Err(RapportError::empty_corpus("WhatsApp TXT"));
        }

        // Title falls out of the participants once finalize registers them.
        let mut conv = ParsedConversation::finalize(
            Platform::WhatsApp,
            String::new(),
            vec![],
            messages,
            warnings,
        );
        conv.title = conv
            .participants
            .iter()
            .map(|p| p.name.clone())
            .collect::<Vec<_>>()
            .join(", ");
        Ok(conv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> ParsedConversation {
        WhatsAppParser::new().parse_str(text).expect("parse failed")
    }

    #[test]
    fn test_eu_dot_format() {
        let conv = parse(
            "26.10.2025, 20:40 - Ala: czesc\n26.10.2025, 20:41 - Bartek: hej",
        );
        assert_eq!(conv.metadata.total_messages, 2);
        assert_eq!(conv.messages[0].sender, "Ala");
        assert_eq!(conv.messages[0].content, "czesc");
    }

    #[test]
    fn test_us_bracketed_ampm() {
        let conv = parse("[1/15/24, 10:30:45 PM] Alice: Hello");
        assert_eq!(conv.messages.len(), 1);
        // 1/15 -> second component > 12 forces month-first: Jan 15, 22:30:45

        let expected = NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(22, 30, 45)
            .unwrap()
            .and_utc()
            .timestamp_millis();
        assert_eq!(conv.messages[0].timestamp, expected);
    }

    #[test]
    fn test_iso_bracketed() {
        let conv = parse("[2024-01-15 10:30:00] Alice: Hello");
        let expected = NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap()
            .and_utc()
            .timestamp_millis();
        assert_eq!(conv.messages[0].timestamp, expected);
    }

    #[test]
    fn test_en_dash_separator() {
        let conv = parse("26.10.2025, 20:40 \u{2013} Ala: czesc");
        assert_eq!(conv.messages[0].sender, "Ala");
    }

    #[test]
    fn test_day_first_forced() {
        // 15 > 12 in the first component forces DD/MM
        let conv = parse("15/01/2024, 10:30 - Ala: czesc");
        let expected = NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap()
            .and_utc()
            .timestamp_millis();
        assert_eq!(conv.messages[0].timestamp, expected);
        assert!(conv.warnings.is_empty());
    }

    #[test]
    fn test_ambiguous_defaults_day_first_with_warning() {
        let conv = parse("03/04/2024, 10:30 - Ala: czesc");
        let expected = NaiveDate::from_ymd_opt(2024, 4, 3)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap()
            .and_utc()
            .timestamp_millis();
        assert_eq!(conv.messages[0].timestamp, expected);
        assert!(matches!(
            conv.warnings[0],
            ParseWarning::AmbiguousDate { .. }
        ));
    }

    #[test]
    fn test_two_digit_year_expansion() {
        assert_eq!(expand_year(24), 2024);
        assert_eq!(expand_year(69), 2069);
        assert_eq!(expand_year(70), 1970);
        assert_eq!(expand_year(99), 1999);
    }

    #[test]
    fn test_midnight_and_noon_meridiem() {
        let conv = parse(
            "[1/15/24, 12:00:00 AM] Alice: midnight\n[1/15/24, 12:00:00 PM] Alice: noon",
        );
        let midnight = conv.messages[0].timestamp;
        let noon = conv.messages[1].timestamp;
        assert_eq!(noon - midnight, 12 * 60 * 60 * 1000);
    }

    #[test]
    fn test_continuation_lines() {
        let conv = parse(
            "26.10.2025, 20:40 - Ala: pierwsza linia\ndruga linia\ntrzecia\n26.10.2025, 20:41 - Bartek: ok",
        );
        assert_eq!(conv.messages.len(), 2);
        assert_eq!(conv.messages[0].content, "pierwsza linia\ndruga linia\ntrzecia");
    }

    #[test]
    fn test_system_lines() {
        let conv = parse(
            "26.10.2025, 20:39 - Messages and calls are end-to-end encrypted. Tap to learn more.\n\
             26.10.2025, 20:40 - Ala: czesc",
        );
        assert_eq!(conv.messages[0].kind, MessageKind::System);
        assert_eq!(conv.messages[0].sender, SYSTEM_SENDER);
        assert_eq!(conv.metadata.total_messages, 1);
    }

    #[test]
    fn test_missed_call_is_system() {
        let conv = parse(
            "26.10.2025, 20:40 - Ala: Missed voice call\n26.10.2025, 20:41 - Ala: oddzwon",
        );
        assert_eq!(conv.messages[0].kind, MessageKind::System);
    }

    #[test]
    fn test_media_omitted() {
        let conv = parse(
            "26.10.2025, 20:40 - Ala: <Media omitted>\n26.10.2025, 20:41 - Ala: IMG-2031.jpg (file attached)\n26.10.2025, 20:42 - Ala: tekst",
        );
        assert_eq!(conv.messages[0].kind, MessageKind::Media);
        assert!(conv.messages[0].has_media);
        assert_eq!(conv.messages[1].kind, MessageKind::Media);
        assert_eq!(conv.messages[2].kind, MessageKind::Text);
    }

    #[test]
    fn test_deleted_message_is_unsent() {
        let conv = parse(
            "26.10.2025, 20:40 - Ala: This message was deleted\n26.10.2025, 20:41 - Ala: nowa",
        );
        assert_eq!(conv.messages[0].kind, MessageKind::Unsent);
        assert!(conv.messages[0].is_unsent);
    }

    #[test]
    fn test_link_detection() {
        let conv = parse("26.10.2025, 20:40 - Ala: zobacz https://example.com/x");
        assert!(conv.messages[0].has_link);
    }

    #[test]
    fn test_bom_tolerated() {
        let conv = parse("\u{FEFF}26.10.2025, 20:40 - Ala: czesc");
        assert_eq!(conv.messages.len(), 1);
    }

    #[test]
    fn test_invalid_format() {
        let err = WhatsAppParser::new()
            .parse_str("just some\nrandom text")
            .unwrap_err();
        assert!(err.is_invalid_format());
    }

    #[test]
    fn test_only_system_is_empty_corpus() {
        let err = WhatsAppParser::new()
            .parse_str("26.10.2025, 20:39 - Messages and calls are end-to-end encrypted.")
            .unwrap_err();
        assert!(err.is_empty_corpus());
    }

    #[test]
    fn test_truncation_warning() {
        let long_line = "x".repeat(MAX_MESSAGE_CHARS + 10);
        let input = format!("26.10.2025, 20:40 - Ala: start\n{long_line}");
        let conv = parse(&input);
        assert!(conv
            .warnings
            .iter()
            .any(|w| matches!(w, ParseWarning::Truncation { .. })));
        assert!(conv.messages[0].content.ends_with('…'));
        assert_eq!(
            conv.messages[0].content.chars().count(),
            MAX_MESSAGE_CHARS + 1
        );
    }

    #[test]
    fn test_colon_in_content() {
        let conv = parse("26.10.2025, 20:40 - Ala: godzina: 20:40");
        assert_eq!(conv.messages[0].sender, "Ala");
        assert_eq!(conv.messages[0].content, "godzina: 20:40");
    }
}
