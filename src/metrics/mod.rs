//! Quantitative metric modules.
//!
//! Each submodule is independent: it consumes the immutable
//! [`ParsedConversation`] and the bundled lexicons, nothing else. Modules
//! whose preconditions fail return `None` and the corresponding field is
//! absent from [`QuantitativeAnalysis`]; the downstream narrative layer
//! tolerates any missing metric.
//!
//! Because every module is a pure function of the conversation, a caller
//! may schedule them concurrently; the default entry point here runs them
//! sequentially, which is already fast enough for 50k-message exports and
//! keeps accumulation order trivially deterministic.

pub mod bids;
pub mod chronotype;
pub mod complexity;
pub mod conflict;
pub mod engagement;
pub mod granularity;
pub mod heatmap;
pub mod intimacy;
pub mod lsm;
pub mod narcissism;
pub mod pursuit;
pub mod ranking;
pub mod reciprocity;
pub mod repair;
pub mod sentiment;
pub mod temporal;
pub mod timing;
pub mod volume;

use indexmap::IndexMap;
use serde::Serialize;

use crate::model::ParsedConversation;

/// The full quantitative profile of a conversation.
///
/// Always-present sections never fail; optional sections follow the
/// absent-result contract and are omitted from serialization when their
/// module's preconditions were not met.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuantitativeAnalysis {
    // Always present
    pub volume: IndexMap<String, volume::PersonVolume>,
    pub timing: timing::TimingAnalysis,
    pub engagement: engagement::EngagementAnalysis,
    pub heatmap: heatmap::HeatmapAnalysis,
    pub conflict: conflict::ConflictAnalysis,
    pub reciprocity: reciprocity::ReciprocityAnalysis,
    pub ranking: ranking::RankingAnalysis,

    // Absent when preconditions fail
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lsm: Option<lsm::LsmAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub narcissism: Option<narcissism::CniAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bids: Option<bids::BidAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pursuit: Option<pursuit::PursuitAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repair: Option<repair::RepairAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complexity: Option<complexity::ComplexityAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temporal: Option<temporal::TemporalAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chronotype: Option<chronotype::ChronotypeAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intimacy: Option<intimacy::IntimacyAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<sentiment::SentimentAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub granularity: Option<granularity::GranularityAnalysis>,
}

/// Runs every metric module over the conversation.
pub fn analyze(conv: &ParsedConversation) -> QuantitativeAnalysis {
    QuantitativeAnalysis {
        volume: volume::analyze(conv),
        timing: timing::analyze(conv),
        engagement: engagement::analyze(conv),
        heatmap: heatmap::analyze(conv),
        conflict: conflict::analyze(conv),
        reciprocity: reciprocity::analyze(conv),
        ranking: ranking::analyze(conv),
        lsm: lsm::analyze(conv),
        narcissism: narcissism::analyze(conv),
        bids: bids::analyze(conv),
        pursuit: pursuit::analyze(conv),
        repair: repair::analyze(conv),
        complexity: complexity::analyze(conv),
        temporal: temporal::analyze(conv),
        chronotype: chronotype::analyze(conv),
        intimacy: intimacy::analyze(conv),
        sentiment: sentiment::analyze(conv),
        granularity: granularity::analyze(conv),
    }
}
