//! End-to-end analysis entry points.
//!
//! The engine is synchronous and deterministic: byte-identical input files
//! produce a byte-identical report, run after run. Parsers read eagerly;
//! no I/O happens past the parse stage.

use std::path::Path;

use serde::Serialize;

use crate::error::Result;
use crate::metrics::{self, QuantitativeAnalysis};
use crate::model::ParsedConversation;
use crate::parser::{Platform, create_parser, detect_platform};
use crate::sampler::{self, Samples};
use crate::scanner::{self, DeepScan};

/// The full analysis output.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    /// The parsed conversation (metadata, participants, warnings; the
    /// message list itself serializes with it)
    pub conversation: ParsedConversation,
    pub quantitative: QuantitativeAnalysis,
    pub deep_scan: DeepScan,
    /// Rendered dossier block for the narrative layer
    pub deep_scan_rendered: String,
    /// Absent when the corpus is too small to sample
    #[serde(skip_serializing_if = "Option::is_none")]
    pub samples: Option<Samples>,
}

/// Analyzes an already-parsed conversation.
pub fn analyze_conversation(conv: ParsedConversation) -> AnalysisReport {
    let quantitative = metrics::analyze(&conv);
    let deep_scan = scanner::scan(&conv);
    let deep_scan_rendered = scanner::render(&deep_scan);
    // Sampling legitimately fails on tiny corpora; the report then simply
    // lacks selections.
    let samples = sampler::sample(&conv, &quantitative).ok();

    AnalysisReport {
        conversation: conv,
        quantitative,
        deep_scan,
        deep_scan_rendered,
        samples,
    }
}

/// Reads, parses (merging multi-part exports), and analyzes.
///
/// With no `platform` override the first file's name and contents pick
/// the parser.
pub fn analyze_files(paths: &[&Path], platform: Option<Platform>) -> Result<AnalysisReport> {
    let conv = parse_files(paths, platform)?;
    Ok(analyze_conversation(conv))
}

/// Parses one or more files of the same platform into one conversation.
pub fn parse_files(paths: &[&Path], platform: Option<Platform>) -> Result<ParsedConversation> {
    let first = paths
        .first()
        .ok_or_else(|| crate::error::RapportError::invalid_format("input", "no input files"))?;

    let platform = match platform {
        Some(p) => p,
        None => {
            let content = std::fs::read_to_string(first)?;
            detect_platform(first, &content)?
        }
    };

    create_parser(platform).parse_many(paths)
}
