//! The chunk-analysis pipeline: segment the document, request a critique per
//! segment, aggregate the parsed results into one report.

pub mod aggregator;
pub mod categories;
pub mod parser;
pub mod prompts;
pub mod report;
pub mod requester;
pub mod segmenter;

use tracing::info;

use crate::config::{DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE};
use crate::errors::AppError;
use crate::provider::CritiqueProvider;
use report::DocumentAnalysis;

/// Segmentation parameters for one analysis run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkSettings {
    pub size: usize,
    pub overlap: usize,
}

impl Default for ChunkSettings {
    fn default() -> Self {
        Self {
            size: DEFAULT_CHUNK_SIZE,
            overlap: DEFAULT_CHUNK_OVERLAP,
        }
    }
}

/// Runs the full pipeline for one document.
///
/// Segments are processed sequentially, in order; aggregation depends on
/// that order, so any future parallel dispatch must collect results into an
/// order-indexed buffer first. Per-segment failures are isolated; the
/// document fails only when every segment does.
pub async fn analyze_document(
    text: &str,
    target_role: Option<&str>,
    settings: ChunkSettings,
    provider: &dyn CritiqueProvider,
) -> Result<DocumentAnalysis, AppError> {
    let segments = segmenter::segment(text, settings.size, settings.overlap);
    if segments.is_empty() {
        return Err(AppError::UnprocessableEntity(
            "document contains no text to analyze".to_string(),
        ));
    }

    info!("analyzing {} segment(s)", segments.len());

    let mut chunk_results = Vec::with_capacity(segments.len());
    for seg in &segments {
        chunk_results.push(requester::request_critique(&seg.text, target_role, provider).await);
    }

    let report = aggregator::aggregate(&chunk_results).ok_or_else(|| {
        AppError::UnprocessableEntity("no segment produced a usable analysis".to_string())
    })?;

    Ok(DocumentAnalysis {
        report,
        segment_count: segments.len(),
        chunk_results,
    })
}
