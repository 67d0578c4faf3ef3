//! Output data models for the analysis pipeline.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The merged critique for one whole document, combining all of its
/// segments' chunk analyses. `BTreeMap` keys keep serialization
/// deterministic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateReport {
    /// Per-category score, 0–10. Categories with no valid contribution are 0.
    pub scores: BTreeMap<String, i64>,
    /// Aggregated independently from the category scores, not derived
    /// from their average.
    pub overall_score: i64,
    /// Per-category feedback, deduplicated and capped at 1200 characters.
    pub feedback: BTreeMap<String, String>,
    /// First 3 unique recommendations joined, capped at 1000 characters.
    pub recommendations: String,
    pub pros: Vec<String>,
    pub cons: Vec<String>,
}

/// Full result of analyzing one document: the aggregate report plus the raw
/// per-segment results (`None` where a segment's analysis failed), in
/// segment order.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentAnalysis {
    pub report: AggregateReport,
    pub chunk_results: Vec<Option<serde_json::Value>>,
    pub segment_count: usize,
}
