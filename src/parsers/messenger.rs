//! Messenger / Instagram JSON export parser.
//!
//! Both platforms use the Meta "Download Your Information" format: a JSON
//! object with `participants[]`, `messages[]` (newest first) and `title`.
//! Every string field passes through [`fix_meta_encoding`] before use.

use serde::Deserialize;

use crate::error::{RapportError, Result};
use crate::model::{
    MessageKind, Participant, ParsedConversation, Reaction, UnifiedMessage,
};
use crate::parser::{Parser, Platform};
use crate::text::contains_url;

/// Parser for Meta JSON exports (Messenger and Instagram).
///
/// Instagram shares the wire format; [`MessengerParser::instagram`] only
/// changes the reported platform tag.
pub struct MessengerParser {
    platform: Platform,
}

impl MessengerParser {
    pub fn new() -> Self {
        Self {
            platform: Platform::Messenger,
        }
    }

    /// Same parser, tagged as Instagram.
    pub fn instagram() -> Self {
        Self {
            platform: Platform::Instagram,
        }
    }
}

impl Default for MessengerParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Fix Meta's broken encoding (Mojibake).
///
/// Meta exporters emit UTF-8 text that was read back as ISO-8859-1 and then
/// JSON-escaped, so each original UTF-8 byte surfaces as its own codepoint.
/// Example: "Привет" becomes "ÐŸÑ€Ð¸Ð²ÐµÑ‚".
///
/// The fix takes each char's low byte and re-decodes the byte stream as
/// UTF-8. Pure-ASCII input passes through unchanged, which makes the
/// operation idempotent on already-clean English text.
pub fn fix_meta_encoding(s: &str) -> String {
    // Fast path: mojibake only occurs with codepoints > 127
    if s.is_ascii() {
        return s.to_string();
    }

    let bytes: Vec<u8> = s.chars().map(|c| c as u8).collect();
    String::from_utf8(bytes).unwrap_or_else(|_| s.to_string())
}

// ============================================================================
// Raw export structures
// ============================================================================

#[derive(Debug, Deserialize)]
struct RawExport {
    participants: Option<Vec<RawParticipant>>,
    messages: Option<Vec<RawMessage>>,
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawParticipant {
    name: String,
}

#[derive(Debug, Deserialize)]
struct RawMessage {
    sender_name: Option<String>,
    timestamp_ms: Option<i64>,
    content: Option<String>,
    share: Option<RawShare>,
    sticker: Option<RawSticker>,
    #[serde(default)]
    photos: Option<Vec<RawMedia>>,
    #[serde(default)]
    videos: Option<Vec<RawMedia>>,
    #[serde(default)]
    audio_files: Option<Vec<RawMedia>>,
    call_duration: Option<i64>,
    is_unsent: Option<bool>,
    #[serde(default)]
    reactions: Option<Vec<RawReaction>>,
}

#[derive(Debug, Deserialize)]
struct RawShare {
    link: Option<String>,
    share_text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawSticker {
    #[allow(dead_code)]
    uri: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawMedia {
    #[allow(dead_code)]
    uri: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawReaction {
    reaction: String,
    actor: String,
    timestamp: Option<i64>,
}

// ============================================================================
// Classification
// ============================================================================

impl RawMessage {
    fn has_attachment(&self) -> bool {
        let non_empty = |m: &Option<Vec<RawMedia>>| m.as_ref().is_some_and(|v| !v.is_empty());
        non_empty(&self.photos) || non_empty(&self.videos) || non_empty(&self.audio_files)
    }
}

/// Converts one raw entry into a [`UnifiedMessage`].
///
/// Classification priority: unsent, call, sticker, share-link, media, text.
/// A message carrying both a caption and an attachment classifies by the
/// caption: non-empty content wins as `Text` with `has_media` set.
fn convert_message(raw: RawMessage) -> Option<UnifiedMessage> {
    let sender = fix_meta_encoding(raw.sender_name.as_deref()?);
    let timestamp = raw.timestamp_ms?;

    let content = raw
        .content
        .as_deref()
        .map(|c| fix_meta_encoding(c).trim().to_string())
        .unwrap_or_default();
    let attachment = raw.has_attachment();

    let kind = if raw.is_unsent == Some(true) {
        MessageKind::Unsent
    } else if raw.call_duration.is_some() {
        MessageKind::Call
    } else if raw.sticker.is_some() {
        MessageKind::Sticker
    } else if raw.share.as_ref().is_some_and(|s| s.link.is_some()) {
        MessageKind::Link
    } else if attachment && content.is_empty() {
        MessageKind::Media
    } else {
        MessageKind::Text
    };

    // Shared posts may carry a caption in share_text rather than content.
    let content = if content.is_empty() {
        raw.share
            .as_ref()
            .and_then(|s| s.share_text.as_deref())
            .map(|t| fix_meta_encoding(t).trim().to_string())
            .unwrap_or_default()
    } else {
        content
    };

    let has_link = kind == MessageKind::Link || contains_url(&content);

    let reactions = raw
        .reactions
        .unwrap_or_default()
        .into_iter()
        .map(|r| Reaction {
            emoji: fix_meta_encoding(&r.reaction),
            actor: fix_meta_encoding(&r.actor),
            timestamp: r.timestamp,
        })
        .collect();

    Some(UnifiedMessage {
        index: 0,
        sender,
        content,
        timestamp,
        kind,
        reactions,
        has_media: attachment || kind == MessageKind::Media,
        has_link,
        is_unsent: kind == MessageKind::Unsent,
    })
}

impl Parser for MessengerParser {
    fn name(&self) -> &'static str {
        match self.platform {
            Platform::Instagram => "Instagram",
            _ => "Messenger",
        }
    }

    fn platform(&self) -> Platform {
        self.platform
    }

    fn parse_str(&self, content: &str) -> Result<ParsedConversation> {
        let raw: RawExport = serde_json::from_str(content).map_err(|e| {
            RapportError::invalid_format("Messenger JSON", format!("not a Meta export: {e}"))
        })?;

        let raw_participants = raw.participants.ok_or_else(|| {
            RapportError::invalid_format("Messenger JSON", "missing participants array")
        })?;
        let raw_messages = raw
            .messages
            .ok_or_else(|| RapportError::invalid_format("Messenger JSON", "missing messages array"))?;

        let participants: Vec<Participant> = raw_participants
            .into_iter()
            .map(|p| Participant::new(fix_meta_encoding(&p.name)))
            .collect();

        let title = raw
            .title
            .as_deref()
            .map(fix_meta_encoding)
            .unwrap_or_else(|| {
                participants
                    .first()
                    .map_or_else(String::new, |p| p.name.clone())
            });

        // Export order is newest first; restore chronology before finalize
        // so source order breaks timestamp ties correctly.
        let mut messages: Vec<UnifiedMessage> = raw_messages
            .into_iter()
            .filter_map(convert_message)
            .collect();
        messages.reverse();

        if !messages.iter().any(UnifiedMessage::is_user_message) {
            return Err(RapportError::empty_corpus(self.name()));
        }

        Ok(ParsedConversation::finalize(
            self.platform,
            title,
            participants,
            messages,
            vec![],
        ))
    }
}
