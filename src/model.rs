//! Canonical conversation model.
//!
//! This module provides [`UnifiedMessage`], the universal representation for
//! chat messages from all supported platforms, and [`ParsedConversation`],
//! the immutable container every metric module consumes.
//!
//! All parsers convert their native format into this structure, enabling
//! uniform processing regardless of the original chat platform.
//!
//! # Invariants
//!
//! After [`ParsedConversation::finalize`]:
//!
//! - messages are sorted by ascending timestamp (ties keep source order)
//! - `index` is dense `0..N-1` and reflects the final order
//! - `metadata.total_messages` counts only non-system messages
//! - every non-empty sender appears in `participants` (system lines excepted)
//!
//! The conversation is never mutated after parsing; downstream modules hold
//! shared references only.

use serde::Serialize;

use crate::error::ParseWarning;
use crate::parser::Platform;

/// Sender name used for platform/system lines that have no human author.
pub const SYSTEM_SENDER: &str = "System";

/// Classified message variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    /// Plain text (possibly with an attachment alongside the caption)
    Text,
    /// Photo/video/audio with no caption
    Media,
    /// Sticker
    Sticker,
    /// Shared link
    Link,
    /// Voice/video call record
    Call,
    /// Platform notice (encryption banner, group events, ...)
    System,
    /// Message removed by its sender
    Unsent,
}

/// A single emoji reaction left on a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reaction {
    /// The reaction emoji
    pub emoji: String,
    /// Display name of the person who reacted
    pub actor: String,
    /// Reaction timestamp in epoch milliseconds, when the export carries one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

/// The canonical message every parser produces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnifiedMessage {
    /// Dense position in chronological order, assigned by `finalize`
    pub index: usize,
    /// Participant display name, or [`SYSTEM_SENDER`] for system lines
    pub sender: String,
    /// Trimmed text; empty for media-only messages. Diacritics and emoji
    /// are preserved.
    pub content: String,
    /// Milliseconds since epoch, UTC basis
    pub timestamp: i64,
    /// Classified variant
    pub kind: MessageKind,
    /// Reactions in export order
    pub reactions: Vec<Reaction>,
    /// Message carries a photo/video/audio attachment
    pub has_media: bool,
    /// Message carries a shared link
    pub has_link: bool,
    /// Message was unsent by its author
    pub is_unsent: bool,
}

impl UnifiedMessage {
    /// Creates a text message with no attachments or reactions.
    ///
    /// The `index` starts at 0 and is reassigned by
    /// [`ParsedConversation::finalize`].
    pub fn text(sender: impl Into<String>, content: impl Into<String>, timestamp: i64) -> Self {
        Self {
            index: 0,
            sender: sender.into(),
            content: content.into(),
            timestamp,
            kind: MessageKind::Text,
            reactions: Vec::new(),
            has_media: false,
            has_link: false,
            is_unsent: false,
        }
    }

    /// Creates a message of an arbitrary kind with empty content.
    pub fn of_kind(sender: impl Into<String>, kind: MessageKind, timestamp: i64) -> Self {
        Self {
            index: 0,
            sender: sender.into(),
            content: String::new(),
            timestamp,
            kind,
            reactions: Vec::new(),
            has_media: kind == MessageKind::Media,
            has_link: kind == MessageKind::Link,
            is_unsent: kind == MessageKind::Unsent,
        }
    }

    /// Returns `true` for messages written by a person rather than the
    /// platform.
    pub fn is_user_message(&self) -> bool {
        self.kind != MessageKind::System
    }

    /// Word count of the content (whitespace split, no tokenization).
    pub fn word_count(&self) -> usize {
        self.content.split_whitespace().count()
    }
}

/// A conversation participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Participant {
    /// Display name; the key for every per-person result map
    pub name: String,
    /// Opaque platform identifier, when the export carries one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl Participant {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: None,
        }
    }
}

/// First and last message instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    /// Epoch milliseconds of the earliest message
    pub start: i64,
    /// Epoch milliseconds of the latest message
    pub end: i64,
}

/// Derived conversation metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metadata {
    /// Count of messages whose kind is not `System`
    pub total_messages: usize,
    /// First/last message instants
    pub date_range: DateRange,
    /// More than two participants
    pub is_group: bool,
    /// Rounded whole days between start and end, minimum 1
    pub duration_days: i64,
}

/// A fully parsed, immutable conversation.
#[derive(Debug, Clone, Serialize)]
pub struct ParsedConversation {
    /// Source platform
    pub platform: Platform,
    /// Conversation title (thread name or counterpart)
    pub title: String,
    /// Participants in first-seen order
    pub participants: Vec<Participant>,
    /// Messages in ascending timestamp order, densely indexed
    pub messages: Vec<UnifiedMessage>,
    /// Derived metadata
    pub metadata: Metadata,
    /// Non-fatal diagnostics collected during parsing
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<ParseWarning>,
}

impl ParsedConversation {
    /// Assembles a conversation from raw parser output.
    ///
    /// Sorts by timestamp (stable, so source order breaks ties), assigns
    /// dense indices, registers any message sender missing from the
    /// participant list, and computes metadata.
    pub fn finalize(
        platform: Platform,
        title: String,
        mut participants: Vec<Participant>,
        mut messages: Vec<UnifiedMessage>,
        warnings: Vec<ParseWarning>,
    ) -> Self {
        messages.sort_by_key(|m| m.timestamp);
        for (i, msg) in messages.iter_mut().enumerate() {
            msg.index = i;
        }

        for msg in &messages {
            if msg.kind == MessageKind::System || msg.sender.is_empty() {
                continue;
            }
            if !participants.iter().any(|p| p.name == msg.sender) {
                participants.push(Participant::new(msg.sender.clone()));
            }
        }

        let metadata = compute_metadata(&participants, &messages);

        Self {
            platform,
            title,
            participants,
            messages,
            metadata,
            warnings,
        }
    }

    /// Merges multiple parts of the same export (e.g. Messenger's
    /// `message_1.json`, `message_2.json`) into one conversation.
    ///
    /// Concatenates messages, sorts, deduplicates on
    /// `(sender, timestamp, content prefix)`, re-indexes densely, unions the
    /// participant lists in first-seen order, and recomputes metadata. The
    /// title and platform of the first part win.
    pub fn merge(parts: Vec<ParsedConversation>) -> Option<ParsedConversation> {
        let mut parts = parts.into_iter();
        let first = parts.next()?;

        let platform = first.platform;
        let title = first.title.clone();

        let mut participants = first.participants;
        let mut messages = first.messages;
        let mut warnings = first.warnings;

        for part in parts {
            for p in part.participants {
                if !participants.iter().any(|q| q.name == p.name) {
                    participants.push(p);
                }
            }
            messages.extend(part.messages);
            warnings.extend(part.warnings);
        }

        messages.sort_by_key(|m| m.timestamp);
        messages.dedup_by(|a, b| {
            a.sender == b.sender && a.timestamp == b.timestamp && dedup_prefix(a) == dedup_prefix(b)
        });
        for (i, msg) in messages.iter_mut().enumerate() {
            msg.index = i;
        }

        let metadata = compute_metadata(&participants, &messages);

        Some(ParsedConversation {
            platform,
            title,
            participants,
            messages,
            metadata,
            warnings,
        })
    }

    /// Messages written by people, in order.
    pub fn user_messages(&self) -> impl Iterator<Item = &UnifiedMessage> {
        self.messages.iter().filter(|m| m.is_user_message())
    }

    /// Participant names in declaration order.
    pub fn participant_names(&self) -> Vec<&str> {
        self.participants.iter().map(|p| p.name.as_str()).collect()
    }
}

/// Comparison prefix used when deduplicating merged export parts.
fn dedup_prefix(msg: &UnifiedMessage) -> &str {
    let end = msg
        .content
        .char_indices()
        .nth(32)
        .map_or(msg.content.len(), |(i, _)| i);
    &msg.content[..end]
}

fn compute_metadata(participants: &[Participant], messages: &[UnifiedMessage]) -> Metadata {
    let total_messages = messages.iter().filter(|m| m.is_user_message()).count();
    let start = messages.first().map_or(0, |m| m.timestamp);
    let end = messages.last().map_or(0, |m| m.timestamp);

    const DAY_MS: f64 = 86_400_000.0;
    let duration_days = (((end - start) as f64 / DAY_MS).round() as i64).max(1);

    Metadata {
        total_messages,
        date_range: DateRange { start, end },
        is_group: participants.len() > 2,
        duration_days,
    }
}
