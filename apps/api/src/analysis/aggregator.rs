//! Aggregator — merges per-segment chunk analyses into one report.
//!
//! Numeric fields are averaged, textual fields are deduplicated and
//! concatenated with bounded length. Pure and deterministic: the same
//! ordered input always produces bit-identical output.

use serde_json::Value;
use std::collections::BTreeMap;

use crate::analysis::categories::ANALYSIS_CATEGORIES;
use crate::analysis::report::AggregateReport;

/// Per-category feedback is capped at this many characters after joining.
const MAX_FEEDBACK_CHARS: usize = 1200;
/// The joined recommendations string is capped at this many characters.
const MAX_RECOMMENDATIONS_CHARS: usize = 1000;
/// Only the first N unique recommendation entries are kept.
const MAX_RECOMMENDATIONS: usize = 3;

/// Merges the ordered per-segment results into a single report.
///
/// Entries that are `None` or not JSON objects contribute nothing. Returns
/// `None` only when no entry is a JSON object at all — total analysis
/// failure for the document.
///
/// Score values outside known categories are ignored; the rubric is the
/// closed list in `categories`, never inferred from model output. Means are
/// rounded with halves away from zero (8 and 7 average to 8).
pub fn aggregate(chunk_results: &[Option<Value>]) -> Option<AggregateReport> {
    let chunks: Vec<&serde_json::Map<String, Value>> = chunk_results
        .iter()
        .filter_map(|entry| entry.as_ref().and_then(Value::as_object))
        .collect();

    if chunks.is_empty() {
        return None;
    }

    let mut category_values: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    let mut overall_values: Vec<f64> = Vec::new();
    let mut feedback_pieces: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    let mut recommendations_all: Vec<String> = Vec::new();
    let mut pros_all: Vec<String> = Vec::new();
    let mut cons_all: Vec<String> = Vec::new();

    for chunk in &chunks {
        if let Some(scores) = chunk.get("scores").and_then(Value::as_object) {
            for cat in ANALYSIS_CATEGORIES {
                if let Some(v) = scores.get(cat).and_then(Value::as_f64) {
                    category_values.entry(cat).or_default().push(v);
                }
            }
        }

        if let Some(v) = chunk.get("overall_score").and_then(Value::as_f64) {
            overall_values.push(v);
        }

        if let Some(feedback) = chunk.get("feedback").and_then(Value::as_object) {
            for cat in ANALYSIS_CATEGORIES {
                if let Some(text) = feedback.get(cat).and_then(Value::as_str) {
                    if !text.is_empty() {
                        feedback_pieces.entry(cat).or_default().push(text.to_string());
                    }
                }
            }
        }

        if let Some(rec) = chunk.get("recommendations").and_then(Value::as_str) {
            if !rec.is_empty() {
                recommendations_all.push(rec.to_string());
            }
        }

        pros_all.extend(string_items(chunk.get("pros")));
        cons_all.extend(string_items(chunk.get("cons")));
    }

    let scores: BTreeMap<String, i64> = ANALYSIS_CATEGORIES
        .iter()
        .map(|&cat| {
            let mean = category_values
                .get(cat)
                .map(|vals| rounded_mean(vals))
                .unwrap_or(0);
            (cat.to_string(), mean)
        })
        .collect();

    let overall_score = if overall_values.is_empty() {
        0
    } else {
        rounded_mean(&overall_values)
    };

    let feedback: BTreeMap<String, String> = ANALYSIS_CATEGORIES
        .iter()
        .map(|&cat| {
            let pieces = feedback_pieces.remove(cat).unwrap_or_default();
            let joined = stable_dedup(pieces).join(" ");
            (cat.to_string(), truncate_chars(&joined, MAX_FEEDBACK_CHARS))
        })
        .collect();

    let recommendations = {
        let unique = stable_dedup(recommendations_all);
        let joined = unique
            .iter()
            .take(MAX_RECOMMENDATIONS)
            .cloned()
            .collect::<Vec<_>>()
            .join(" ");
        truncate_chars(&joined, MAX_RECOMMENDATIONS_CHARS)
    };

    Some(AggregateReport {
        scores,
        overall_score,
        feedback,
        recommendations,
        pros: dedup_preserving_order(pros_all),
        cons: dedup_preserving_order(cons_all),
    })
}

/// Arithmetic mean rounded to the nearest integer, halves away from zero.
fn rounded_mean(values: &[f64]) -> i64 {
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    mean.round() as i64
}

/// Non-empty string items of a JSON array, in order.
fn string_items(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Trims each piece, drops empties and exact duplicates, preserves
/// first-occurrence order.
fn stable_dedup(pieces: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::new();
    for piece in pieces {
        let trimmed = piece.trim();
        if !trimmed.is_empty() && seen.insert(trimmed.to_string()) {
            out.push(trimmed.to_string());
        }
    }
    out
}

/// Drops exact duplicates, preserving first-occurrence order (no trimming).
fn dedup_preserving_order(items: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    items.into_iter().filter(|i| seen.insert(i.clone())).collect()
}

/// Truncates to at most `max` characters. The cut may fall mid-word; that
/// keeps the operation total and deterministic.
fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
