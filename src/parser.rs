//! Unified parser trait for chat exports.
//!
//! This module provides a single entry point for parsing chat exports into
//! the canonical [`ParsedConversation`] model.
//!
//! # Example
//!
//! ```rust,no_run
//! # #[cfg(feature = "messenger")]
//! # fn main() -> rapport::Result<()> {
//! use rapport::parser::{Parser, Platform, create_parser};
//! use std::path::Path;
//!
//! let parser = create_parser(Platform::Messenger);
//! let conversation = parser.parse(Path::new("message_1.json"))?;
//! println!("{} messages", conversation.metadata.total_messages);
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "messenger"))]
//! # fn main() {}
//! ```
//!
//! # Platform Selection
//!
//! Use [`Platform`] to select parsers dynamically, or [`detect_platform`]
//! to infer the platform from a file's name and contents.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{RapportError, Result};
use crate::model::ParsedConversation;

/// Supported messaging platforms.
///
/// # Example
///
/// ```rust
/// use rapport::parser::Platform;
/// use std::str::FromStr;
///
/// let platform = Platform::from_str("messenger").unwrap();
/// assert_eq!(platform, Platform::Messenger);
///
/// // Aliases are supported
/// let platform = Platform::from_str("ig").unwrap();
/// assert_eq!(platform, Platform::Instagram);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum Platform {
    /// Facebook Messenger JSON exports ("Download Your Information")
    #[serde(alias = "fb")]
    Messenger,

    /// Instagram JSON exports; same wire format as Messenger
    #[serde(alias = "ig")]
    Instagram,

    /// WhatsApp TXT exports (iOS and Android, several locales)
    #[serde(alias = "wa")]
    WhatsApp,

    /// Telegram JSON exports from Telegram Desktop
    #[serde(alias = "tg")]
    Telegram,
}

impl Platform {
    /// Returns the default file extension for exports from this platform.
    pub fn default_extension(&self) -> &'static str {
        match self {
            Platform::WhatsApp => "txt",
            Platform::Messenger | Platform::Instagram | Platform::Telegram => "json",
        }
    }

    /// Session gap used for segmentation; Discord-style rapid-fire exports
    /// would use 2h, the platforms supported here all use 6h.
    pub fn session_gap_ms(&self) -> i64 {
        6 * 60 * 60 * 1000
    }

    /// Returns all platform names including aliases.
    pub fn all_names() -> &'static [&'static str] {
        &[
            "messenger",
            "fb",
            "instagram",
            "ig",
            "whatsapp",
            "wa",
            "telegram",
            "tg",
        ]
    }

    /// Returns all available platforms.
    pub fn all() -> &'static [Platform] {
        &[
            Platform::Messenger,
            Platform::Instagram,
            Platform::WhatsApp,
            Platform::Telegram,
        ]
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Platform::Messenger => write!(f, "Messenger"),
            Platform::Instagram => write!(f, "Instagram"),
            Platform::WhatsApp => write!(f, "WhatsApp"),
            Platform::Telegram => write!(f, "Telegram"),
        }
    }
}

impl std::str::FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "messenger" | "fb" | "facebook" => Ok(Platform::Messenger),
            "instagram" | "ig" => Ok(Platform::Instagram),
            "whatsapp" | "wa" => Ok(Platform::WhatsApp),
            "telegram" | "tg" => Ok(Platform::Telegram),
            _ => Err(format!(
                "Unknown platform: '{}'. Expected one of: {}",
                s,
                Platform::all_names().join(", ")
            )),
        }
    }
}

/// Unified trait for parsing chat exports.
///
/// Parsers must implement:
/// - [`name`](Parser::name) - Parser identifier
/// - [`platform`](Parser::platform) - Platform this parser handles
/// - [`parse_str`](Parser::parse_str) - Parse from a string
///
/// File reads go through the provided [`parse`](Parser::parse) and
/// [`parse_many`](Parser::parse_many); reading is eager, the whole byte
/// content is handed to `parse_str`.
pub trait Parser: Send + Sync {
    /// Returns the human-readable name of this parser.
    fn name(&self) -> &'static str;

    /// Returns the platform this parser handles.
    fn platform(&self) -> Platform;

    /// Parses export content already in memory.
    ///
    /// # Errors
    ///
    /// Returns [`RapportError::InvalidFormat`] when the content does not
    /// match the expected structure and [`RapportError::EmptyCorpus`] when
    /// no user messages remain after filtering system lines.
    fn parse_str(&self, content: &str) -> Result<ParsedConversation>;

    /// Parses a chat export file.
    fn parse(&self, path: &Path) -> Result<ParsedConversation> {
        let content = std::fs::read_to_string(path)?;
        self.parse_str(&content)
    }

    /// Parses a multi-part export (e.g. `message_1.json`, `message_2.json`)
    /// into one merged conversation.
    ///
    /// Parts are parsed independently, then merged: concatenated, sorted,
    /// deduplicated, densely re-indexed, metadata recomputed.
    fn parse_many(&self, paths: &[&Path]) -> Result<ParsedConversation> {
        let mut parts = Vec::with_capacity(paths.len());
        for path in paths {
            parts.push(self.parse(path)?);
        }
        ParsedConversation::merge(parts)
            .ok_or_else(|| RapportError::invalid_format(self.name(), "no input files"))
    }
}

/// Creates a parser for the specified platform.
///
/// # Panics
///
/// Panics if the corresponding parser feature is not enabled.
pub fn create_parser(platform: Platform) -> Box<dyn Parser> {
    match platform {
        #[cfg(feature = "messenger")]
        Platform::Messenger => Box::new(crate::parsers::MessengerParser::new()),
        #[cfg(feature = "messenger")]
        Platform::Instagram => Box::new(crate::parsers::MessengerParser::instagram()),
        #[cfg(feature = "whatsapp")]
        Platform::WhatsApp => Box::new(crate::parsers::WhatsAppParser::new()),
        #[cfg(feature = "telegram")]
        Platform::Telegram => Box::new(crate::parsers::TelegramParser::new()),
        // Fallback for when features are disabled
        #[allow(unreachable_patterns)]
        _ => panic!(
            "Parser for {:?} is not enabled. Enable the corresponding feature.",
            platform
        ),
    }
}

/// Infers the source platform from a file name and its contents.
///
/// Heuristics:
/// - `.txt` extension ⇒ WhatsApp
/// - JSON with a top-level `participants` array of `{name}` ⇒ Messenger
///   (Instagram shares the format and must be selected explicitly)
/// - JSON with `name`, `type`, numeric `id` and messages carrying `from`
///   plus `date_unixtime` ⇒ Telegram
///
/// # Errors
///
/// Returns [`RapportError::UnknownPlatform`] when no heuristic matches.
pub fn detect_platform(path: &Path, content: &str) -> Result<Platform> {
    if path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("txt"))
    {
        return Ok(Platform::WhatsApp);
    }

    let value: serde_json::Value =
        serde_json::from_str(content).map_err(|e| RapportError::UnknownPlatform {
            path: path.to_path_buf(),
            reason: format!("not a WhatsApp .txt and not valid JSON: {e}"),
        })?;

    let obj = value
        .as_object()
        .ok_or_else(|| RapportError::UnknownPlatform {
            path: path.to_path_buf(),
            reason: "top-level JSON value is not an object".to_string(),
        })?;

    if obj
        .get("participants")
        .and_then(|p| p.as_array())
        .is_some_and(|arr| arr.iter().all(|e| e.get("name").is_some()))
        && obj.get("messages").is_some()
    {
        return Ok(Platform::Messenger);
    }

    let telegram_shape = obj.get("name").is_some()
        && obj.get("type").is_some()
        && obj.get("id").is_some_and(|id| id.is_number());
    let telegram_messages = obj
        .get("messages")
        .and_then(|m| m.as_array())
        .is_some_and(|arr| {
            arr.iter()
                .any(|m| m.get("from").is_some() && m.get("date_unixtime").is_some())
        });
    if telegram_shape && telegram_messages {
        return Ok(Platform::Telegram);
    }

    Err(RapportError::UnknownPlatform {
        path: path.to_path_buf(),
        reason: "JSON structure matches neither Messenger nor Telegram exports".to_string(),
    })
}
