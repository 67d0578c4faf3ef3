//! Critique requester — turns one segment into one parsed chunk analysis.
//!
//! Failure isolation happens here: a provider error or an unparseable
//! response marks that segment's analysis as absent (`None`) and the run
//! continues. One bad segment never aborts the document.

use serde_json::Value;
use tracing::warn;

use crate::analysis::parser::extract_first_json;
use crate::analysis::prompts::{CRITIQUE_PROMPT_TEMPLATE, CRITIQUE_SYSTEM};
use crate::provider::CritiqueProvider;

/// Builds the per-segment user prompt from the template.
pub fn build_segment_prompt(segment_text: &str, target_role: Option<&str>) -> String {
    let role_line = match target_role {
        Some(role) if !role.trim().is_empty() => format!("Target role: {}\n", role.trim()),
        _ => String::new(),
    };
    CRITIQUE_PROMPT_TEMPLATE
        .replace("{target_role_line}", &role_line)
        .replace("{resume_chunk}", segment_text)
}

/// Requests a critique for one segment and parses the response.
///
/// Returns `None` when the provider call fails or the response contains no
/// JSON object; both outcomes are logged and treated identically.
pub async fn request_critique(
    segment_text: &str,
    target_role: Option<&str>,
    provider: &dyn CritiqueProvider,
) -> Option<Value> {
    let prompt = build_segment_prompt(segment_text, target_role);

    let raw = match provider.generate(&prompt, Some(CRITIQUE_SYSTEM)).await {
        Ok(text) => text,
        Err(e) => {
            warn!("provider call failed for segment: {e}");
            return None;
        }
    };

    match extract_first_json(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("could not parse model response for segment: {e}");
            None
        }
    }
}
