//! Telegram JSON export parser.
//!
//! Telegram Desktop exports a single JSON object with chat metadata and a
//! `messages` array. `date_unixtime` (string seconds) is the authoritative
//! timestamp; the `text` field may be a plain string or an array mixing
//! strings with formatting fragments.

use serde::Deserialize;
use serde_json::Value;

use crate::error::{RapportError, Result};
use crate::model::{
    MessageKind, Participant, ParsedConversation, Reaction, SYSTEM_SENDER, UnifiedMessage,
};
use crate::parser::{Parser, Platform};
use crate::text::contains_url;

/// Parser for Telegram JSON exports.
pub struct TelegramParser;

impl TelegramParser {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TelegramParser {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct RawExport {
    name: Option<String>,
    messages: Option<Vec<RawMessage>>,
}

#[derive(Debug, Deserialize)]
struct RawMessage {
    #[serde(rename = "type")]
    msg_type: String,
    date_unixtime: Option<String>,
    from: Option<String>,
    from_id: Option<String>,
    actor: Option<String>,
    action: Option<String>,
    text: Option<Value>,
    media_type: Option<String>,
    photo: Option<String>,
    file: Option<String>,
    #[serde(default)]
    reactions: Option<Vec<RawReaction>>,
}

#[derive(Debug, Deserialize)]
struct RawReaction {
    emoji: Option<String>,
    #[serde(default)]
    recent: Option<Vec<RawReactor>>,
}

#[derive(Debug, Deserialize)]
struct RawReactor {
    from: Option<String>,
}

/// Extracts text from Telegram's string-or-array `text` field.
///
/// Arrays mix plain strings with `{"type": ..., "text": ...}` fragments;
/// fragment text is concatenated in order.
fn extract_text(text_value: &Value) -> String {
    match text_value {
        Value::String(s) => s.clone(),
        Value::Array(arr) => arr
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                Value::Object(obj) => obj
                    .get("text")
                    .and_then(|v| v.as_str())
                    .map(ToString::to_string),
                _ => None,
            })
            .collect::<String>(),
        _ => String::new(),
    }
}

fn parse_unixtime(ts: &str) -> Option<i64> {
    ts.parse::<i64>().ok().map(|secs| secs * 1000)
}

fn convert_message(raw: &RawMessage) -> Option<UnifiedMessage> {
    let timestamp = parse_unixtime(raw.date_unixtime.as_deref()?)?;

    if raw.msg_type != "message" {
        // Calls surface as service entries with an actor.
        let msg = if raw.action.as_deref() == Some("phone_call") {
            let actor = raw.actor.clone()?;
            UnifiedMessage::of_kind(actor, MessageKind::Call, timestamp)
        } else {
            let mut msg = UnifiedMessage::of_kind(SYSTEM_SENDER, MessageKind::System, timestamp);
            msg.content = raw.action.clone().unwrap_or_default();
            msg
        };
        return Some(msg);
    }

    let sender = raw.from.clone()?;
    let content = raw
        .text
        .as_ref()
        .map(extract_text)
        .unwrap_or_default()
        .trim()
        .to_string();

    let has_attachment = raw.photo.is_some() || raw.file.is_some() || raw.media_type.is_some();
    let kind = if raw.media_type.as_deref() == Some("sticker") {
        MessageKind::Sticker
    } else if has_attachment && content.is_empty() {
        MessageKind::Media
    } else {
        MessageKind::Text
    };

    let reactions = raw
        .reactions
        .as_deref()
        .unwrap_or_default()
        .iter()
        .filter_map(|r| {
            let emoji = r.emoji.clone()?;
            Some(
                r.recent
                    .as_deref()
                    .unwrap_or_default()
                    .iter()
                    .filter_map(|reactor| {
                        Some(Reaction {
                            emoji: emoji.clone(),
                            actor: reactor.from.clone()?,
                            timestamp: None,
                        })
                    })
                    .collect::<Vec<_>>(),
            )
        })
        .flatten()
        .collect();

    Some(UnifiedMessage {
        index: 0,
        sender,
        has_link: contains_url(&content),
        has_media: has_attachment && kind != MessageKind::Sticker,
        is_unsent: false,
        content,
        timestamp,
        kind,
        reactions,
    })
}

impl Parser for TelegramParser {
    fn name(&self) -> &'static str {
        "Telegram"
    }

    fn platform(&self) -> Platform {
        Platform::Telegram
    }

    fn parse_str(&self, content: &str) -> Result<ParsedConversation> {
        let raw: RawExport = serde_json::from_str(content).map_err(|e| {
            RapportError::invalid_format("Telegram JSON", format!("not a Telegram export: {e}"))
        })?;

        let raw_messages = raw
            .messages
            .ok_or_else(|| RapportError::invalid_format("Telegram JSON", "missing messages array"))?;

        // Personal-chat exports carry no participants list; collect senders
        // (with their from_id when present) in first-seen order.
        let mut participants: Vec<Participant> = Vec::new();
        for msg in &raw_messages {
            if msg.msg_type != "message" {
                continue;
            }
            if let Some(from) = msg.from.as_deref() {
                if !participants.iter().any(|p| p.name == from) {
                    participants.push(Participant {
                        name: from.to_string(),
                        id: msg.from_id.clone(),
                    });
                }
            }
        }

        let messages: Vec<UnifiedMessage> =
            raw_messages.iter().filter_map(convert_message).collect();

        if !messages.iter().any(UnifiedMessage::is_user_message) {
            return Err(RapportError::empty_corpus("Telegram JSON"));
        }

        let title = raw.name.unwrap_or_else(|| {
            participants
                .first()
                .map_or_else(String::new, |p| p.name.clone())
        });

        Ok(ParsedConversation::finalize(
            Platform::Telegram,
            title,
            participants,
            messages,
            vec![],
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(json: &str) -> ParsedConversation {
        TelegramParser::new().parse_str(json).expect("parse failed")
    }

    #[test]
    fn test_extract_text_string() {
        assert_eq!(extract_text(&json!("Hello world")), "Hello world");
    }

    #[test]
    fn test_extract_text_array_with_fragments() {
        let value = json!([
            "Check this: ",
            {"type": "link", "text": "https://example.com"},
            " cool!"
        ]);
        assert_eq!(extract_text(&value), "Check this: https://example.com cool!");
    }

    #[test]
    fn test_extract_text_null() {
        assert_eq!(extract_text(&json!(null)), "");
    }

    #[test]
    fn test_parse_basic() {
        let conv = parse(
            r#"{
            "name": "Ala",
            "type": "personal_chat",
            "id": 123,
            "messages": [
                {"id": 1, "type": "message", "date_unixtime": "1700000000", "from": "Ala", "from_id": "user1", "text": "hej"},
                {"id": 2, "type": "message", "date_unixtime": "1700000060", "from": "Bartek", "from_id": "user2", "text": "czesc"}
            ]
        }"#,
        );
        assert_eq!(conv.metadata.total_messages, 2);
        assert_eq!(conv.messages[0].timestamp, 1_700_000_000_000);
        assert_eq!(conv.participant_names(), vec!["Ala", "Bartek"]);
        assert_eq!(conv.participants[0].id.as_deref(), Some("user1"));
        assert_eq!(conv.title, "Ala");
    }

    #[test]
    fn test_service_entries() {
        let conv = parse(
            r#"{
            "name": "Ala", "type": "personal_chat", "id": 123,
            "messages": [
                {"id": 1, "type": "service", "date_unixtime": "1700000000", "actor": "Ala", "action": "phone_call"},
                {"id": 2, "type": "service", "date_unixtime": "1700000100", "actor": "Ala", "action": "pin_message"},
                {"id": 3, "type": "message", "date_unixtime": "1700000200", "from": "Ala", "text": "hej"}
            ]
        }"#,
        );
        assert_eq!(conv.messages[0].kind, MessageKind::Call);
        assert_eq!(conv.messages[0].sender, "Ala");
        assert_eq!(conv.messages[1].kind, MessageKind::System);
        assert_eq!(conv.metadata.total_messages, 2);
    }

    #[test]
    fn test_media_and_sticker() {
        let conv = parse(
            r#"{
            "name": "Ala", "type": "personal_chat", "id": 123,
            "messages": [
                {"id": 1, "type": "message", "date_unixtime": "1700000000", "from": "Ala", "text": "", "photo": "photos/p.jpg"},
                {"id": 2, "type": "message", "date_unixtime": "1700000100", "from": "Ala", "text": "", "media_type": "sticker", "file": "s.webp"},
                {"id": 3, "type": "message", "date_unixtime": "1700000200", "from": "Ala", "text": "podpis", "photo": "photos/q.jpg"}
            ]
        }"#,
        );
        assert_eq!(conv.messages[0].kind, MessageKind::Media);
        assert_eq!(conv.messages[1].kind, MessageKind::Sticker);
        assert_eq!(conv.messages[2].kind, MessageKind::Text);
        assert!(conv.messages[2].has_media);
    }

    #[test]
    fn test_reactions() {
        let conv = parse(
            r#"{
            "name": "Ala", "type": "personal_chat", "id": 123,
            "messages": [
                {"id": 1, "type": "message", "date_unixtime": "1700000000", "from": "Ala", "text": "hej",
                 "reactions": [{"type": "emoji", "count": 1, "emoji": "❤", "recent": [{"from": "Bartek", "date": "2023-11-14T00:00:00"}]}]}
            ]
        }"#,
        );
        assert_eq!(conv.messages[0].reactions.len(), 1);
        assert_eq!(conv.messages[0].reactions[0].emoji, "❤");
        assert_eq!(conv.messages[0].reactions[0].actor, "Bartek");
    }

    #[test]
    fn test_empty_corpus() {
        let err = TelegramParser::new()
            .parse_str(r#"{"name": "x", "type": "personal_chat", "id": 1, "messages": []}"#)
            .unwrap_err();
        assert!(err.is_empty_corpus());
    }

    #[test]
    fn test_invalid_format() {
        let err = TelegramParser::new().parse_str("[1,2,3]").unwrap_err();
        assert!(err.is_invalid_format());
    }
}
