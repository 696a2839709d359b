//! Clock and calendar primitives.
//!
//! Timestamps in the model are epoch milliseconds. Parsers store wall-clock
//! instants as read from the export, so deriving clock components here is
//! deterministic and never consults the environment.

use chrono::{DateTime, Datelike, Timelike};

use crate::model::UnifiedMessage;

/// Gap that splits a conversation into sessions.
pub const SESSION_GAP_MS: i64 = 6 * 60 * 60 * 1000;

/// Enter-as-comma window: consecutive same-sender messages closer than this
/// count as one logical message.
pub const ENTER_AS_COMMA_MS: i64 = 2 * 60 * 1000;

fn datetime(ts_ms: i64) -> DateTime<chrono::Utc> {
    DateTime::from_timestamp_millis(ts_ms).unwrap_or_default()
}

/// `YYYY-MM-DD` key for the message's calendar day.
pub fn day_key(ts_ms: i64) -> String {
    datetime(ts_ms).format("%Y-%m-%d").to_string()
}

/// `YYYY-MM` key for the message's calendar month.
pub fn month_key(ts_ms: i64) -> String {
    datetime(ts_ms).format("%Y-%m").to_string()
}

/// Clock hour in `0..24`.
pub fn hour_of(ts_ms: i64) -> u32 {
    datetime(ts_ms).hour()
}

/// Day of week, `0` = Monday .. `6` = Sunday.
pub fn weekday_of(ts_ms: i64) -> u32 {
    datetime(ts_ms).weekday().num_days_from_monday()
}

/// `true` for Saturday and Sunday.
pub fn is_weekend(ts_ms: i64) -> bool {
    weekday_of(ts_ms) >= 5
}

/// Late-night band: hours 22..=23 and 0..=3.
pub fn is_late_night(ts_ms: i64) -> bool {
    let h = hour_of(ts_ms);
    h >= 22 || h <= 3
}

/// A contiguous run of messages separated from its neighbours by at least
/// the session gap. Indices point into the message slice the segmentation
/// ran over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub first: usize,
    pub last: usize,
}

impl Session {
    /// Number of messages in the session.
    pub fn message_count(&self) -> usize {
        self.last - self.first + 1
    }
}

/// Splits messages into sessions on gaps of at least `gap_ms`.
///
/// The first message of the transcript and the first after each boundary
/// are the session initiations; the message before each boundary is an
/// ending.
pub fn segment_sessions(messages: &[UnifiedMessage], gap_ms: i64) -> Vec<Session> {
    let mut sessions = Vec::new();
    let mut start = 0usize;
    for i in 1..messages.len() {
        if messages[i].timestamp - messages[i - 1].timestamp >= gap_ms {
            sessions.push(Session {
                first: start,
                last: i - 1,
            });
            start = i;
        }
    }
    if !messages.is_empty() {
        sessions.push(Session {
            first: start,
            last: messages.len() - 1,
        });
    }
    sessions
}

/// A burst of consecutive same-sender messages consolidated under the
/// Enter-as-comma convention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalMessage {
    /// Sender shared by the whole burst
    pub sender: String,
    /// Index of the first physical message (into the segmented slice)
    pub first: usize,
    /// Index of the last physical message
    pub last: usize,
    /// Physical messages consolidated
    pub physical: usize,
    /// Timestamp of the first physical message
    pub start_ts: i64,
    /// Timestamp of the last physical message
    pub end_ts: i64,
}

/// Consolidates consecutive same-sender messages closer than `window_ms`
/// into logical messages.
pub fn consolidate(messages: &[UnifiedMessage], window_ms: i64) -> Vec<LogicalMessage> {
    let mut logical: Vec<LogicalMessage> = Vec::new();
    for (i, msg) in messages.iter().enumerate() {
        match logical.last_mut() {
            Some(last)
                if last.sender == msg.sender
                    && msg.timestamp - messages[last.last].timestamp < window_ms =>
            {
                last.last = i;
                last.physical += 1;
                last.end_ts = msg.timestamp;
            }
            _ => logical.push(LogicalMessage {
                sender: msg.sender.clone(),
                first: i,
                last: i,
                physical: 1,
                start_ts: msg.timestamp,
                end_ts: msg.timestamp,
            }),
        }
    }
    logical
}
