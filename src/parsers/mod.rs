//! Platform-specific export parsers.
//!
//! Each parser implements [`Parser`](crate::parser::Parser) and produces a
//! [`ParsedConversation`](crate::model::ParsedConversation). Encoding quirks
//! (notably Meta's double-encoded UTF-8) are handled here so downstream
//! modules only ever see clean text.

#[cfg(feature = "messenger")]
mod messenger;
#[cfg(feature = "telegram")]
mod telegram;
#[cfg(feature = "whatsapp")]
mod whatsapp;

#[cfg(feature = "messenger")]
pub use messenger::{MessengerParser, fix_meta_encoding};
#[cfg(feature = "telegram")]
pub use telegram::TelegramParser;
#[cfg(feature = "whatsapp")]
pub use whatsapp::WhatsAppParser;
