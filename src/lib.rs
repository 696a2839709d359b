//! # Rapport
//!
//! A Rust library that turns chat exports into a quantitative profile of
//! how two people communicate: who pursues whom, whose linguistic style
//! dominates, how response rhythms compare, when conflict escalates, and
//! how all of it drifts month over month.
//!
//! ## Overview
//!
//! Rapport handles exports from:
//! - **Messenger / Instagram** - Meta JSON ("Download Your Information"),
//!   including the double-encoded UTF-8 fix
//! - **WhatsApp** - TXT exports in several locale formats
//! - **Telegram** - JSON exports from Telegram Desktop
//!
//! The pipeline normalises each format into one
//! [`ParsedConversation`](model::ParsedConversation), then derives ~20
//! independent metric families plus a per-person dossier and deterministic
//! message samples for downstream narrative layers.
//!
//! The engine is deterministic by contract: identical input bytes produce
//! an identical report, with no clocks, no randomness, and no environment
//! reads past the bundled lexicons.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! # #[cfg(feature = "messenger")]
//! # fn main() -> rapport::Result<()> {
//! use rapport::engine::analyze_files;
//! use std::path::Path;
//!
//! let report = analyze_files(&[Path::new("message_1.json")], None)?;
//! println!("{} messages", report.conversation.metadata.total_messages);
//! if let Some(lsm) = &report.quantitative.lsm {
//!     println!("style matching: {}", lsm.overall);
//! }
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "messenger"))]
//! # fn main() {}
//! ```
//!
//! ## Module Structure
//!
//! - [`engine`] - **End-to-end entry points** (recommended)
//! - [`parser`] - [`Platform`](parser::Platform), the [`Parser`](parser::Parser)
//!   trait, [`create_parser`](parser::create_parser), [`detect_platform`](parser::detect_platform)
//! - [`parsers`] - Platform-specific implementations
//! - [`model`] - [`UnifiedMessage`](model::UnifiedMessage), [`ParsedConversation`](model::ParsedConversation)
//! - [`metrics`] - The quantitative modules and [`QuantitativeAnalysis`](metrics::QuantitativeAnalysis)
//! - [`scanner`] - Deep-scan dossiers and their text rendering
//! - [`sampler`] - Deterministic message selections for narrative layers
//! - [`lexicons`] - Bundled bilingual dictionaries
//! - [`text`], [`timeutil`], [`stats`] - Shared primitives
//! - [`error`] - Unified error types ([`RapportError`], [`Result`])

// Core modules (always available)
pub mod engine;
pub mod error;
pub mod lexicons;
pub mod metrics;
pub mod model;
pub mod sampler;
pub mod scanner;
pub mod stats;
pub mod text;
pub mod timeutil;

pub mod parser;

#[cfg(any(feature = "messenger", feature = "whatsapp", feature = "telegram"))]
pub mod parsers;

#[cfg(feature = "cli")]
pub mod cli;

// Re-export the main types at the crate root for convenience
pub use error::{RapportError, Result};
pub use model::{ParsedConversation, UnifiedMessage};

/// Convenient re-exports for common usage.
///
/// ```rust
/// use rapport::prelude::*;
/// ```
pub mod prelude {
    pub use crate::engine::{AnalysisReport, analyze_conversation, analyze_files};
    pub use crate::error::{RapportError, Result};
    pub use crate::metrics::QuantitativeAnalysis;
    pub use crate::model::{
        MessageKind, Metadata, Participant, ParsedConversation, Reaction, UnifiedMessage,
    };
    pub use crate::parser::{Parser, Platform, create_parser, detect_platform};

    #[cfg(feature = "messenger")]
    pub use crate::parsers::MessengerParser;
    #[cfg(feature = "telegram")]
    pub use crate::parsers::TelegramParser;
    #[cfg(feature = "whatsapp")]
    pub use crate::parsers::WhatsAppParser;

    pub use crate::sampler::Samples;
    pub use crate::scanner::DeepScan;
}
