//! Unified error types for rapport.
//!
//! This module provides a single [`RapportError`] enum that covers all error
//! cases in the library. This design follows the pattern used by popular
//! crates like `reqwest`, `serde_json`, and `csv`.
//!
//! # Error Handling Philosophy
//!
//! - **Fatal** failures (unreadable input, structurally invalid exports,
//!   empty corpora) abort the run and surface here.
//! - **Per-metric** shortfalls (too few messages for a detector) are not
//!   errors at all: the metric module returns `None` and the report simply
//!   omits that field.
//! - **Diagnostics** (truncated messages, ambiguous dates) are collected as
//!   [`ParseWarning`]s on the parsed conversation, never as errors.

use std::io;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// A specialized [`Result`] type for rapport operations.
pub type Result<T> = std::result::Result<T, RapportError>;

/// The error type for all rapport operations.
///
/// Each variant contains context about what went wrong and, where
/// applicable, the underlying source error.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RapportError {
    /// An I/O error occurred reading an export file.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON deserialization of an export failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Structural validation failed: missing participants list, no
    /// parseable lines, unknown date format on every sampled line.
    /// Fatal for the whole run.
    #[error("Invalid {format} format{}: {message}", path.as_ref().map(|p| format!(" (file: {})", p.display())).unwrap_or_default())]
    InvalidFormat {
        /// The format that was expected (e.g., "Messenger JSON")
        format: &'static str,
        /// Description of what's wrong
        message: String,
        /// The file path, if available
        path: Option<PathBuf>,
    },

    /// The export parsed structurally but no non-system messages remain.
    /// Fatal for the whole run.
    #[error("Empty corpus: {format} export contains no user messages")]
    EmptyCorpus {
        /// The format that was parsed
        format: &'static str,
    },

    /// A fallible component's preconditions were not met.
    ///
    /// Only the qualitative sampler surfaces this (it cannot produce a
    /// partial selection); metric modules signal the same condition by
    /// returning an absent result instead.
    #[error("Insufficient data: {what}")]
    InsufficientData {
        /// What was missing (e.g., "fewer than 10 sampleable messages")
        what: String,
    },

    /// The requested platform cannot be determined from the input.
    #[error("Could not detect platform for {}: {reason}", path.display())]
    UnknownPlatform {
        /// The input path
        path: PathBuf,
        /// Why detection failed
        reason: String,
    },
}

/// Non-fatal diagnostics emitted while parsing.
///
/// Warnings ride along on the parsed conversation; the engine never fails
/// because of one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParseWarning {
    /// A message exceeded the 100 000 character cap after continuation
    /// lines were appended and was truncated with an ellipsis.
    Truncation {
        /// Index of the affected line in the source file
        line: usize,
    },
    /// A date matched both DD/MM and MM/DD readings; the documented
    /// disambiguation rules chose one.
    AmbiguousDate {
        /// The raw date prefix as it appeared in the file
        raw: String,
    },
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl RapportError {
    /// Creates an invalid format error.
    pub fn invalid_format(format: &'static str, message: impl Into<String>) -> Self {
        RapportError::InvalidFormat {
            format,
            message: message.into(),
            path: None,
        }
    }

    /// Creates an invalid format error carrying the offending path.
    pub fn invalid_format_at(
        format: &'static str,
        message: impl Into<String>,
        path: PathBuf,
    ) -> Self {
        RapportError::InvalidFormat {
            format,
            message: message.into(),
            path: Some(path),
        }
    }

    /// Creates an empty corpus error.
    pub fn empty_corpus(format: &'static str) -> Self {
        RapportError::EmptyCorpus { format }
    }

    /// Creates an insufficient data error.
    pub fn insufficient_data(what: impl Into<String>) -> Self {
        RapportError::InsufficientData { what: what.into() }
    }

    /// Returns `true` if this is an IO error.
    pub fn is_io(&self) -> bool {
        matches!(self, RapportError::Io(_))
    }

    /// Returns `true` if this is an invalid format error.
    pub fn is_invalid_format(&self) -> bool {
        matches!(self, RapportError::InvalidFormat { .. })
    }

    /// Returns `true` if this is an empty corpus error.
    pub fn is_empty_corpus(&self) -> bool {
        matches!(self, RapportError::EmptyCorpus { .. })
    }

    /// Returns `true` if this is an insufficient data error.
    pub fn is_insufficient_data(&self) -> bool {
        matches!(self, RapportError::InsufficientData { .. })
    }
}

// ============================================================================
// Tests
// ============================================================================
