//! The closed rubric of scoring categories.
//!
//! This list is shared verbatim between prompt construction
//! (`analysis::prompts`) and aggregation (`analysis::aggregator`). Category
//! names arriving from the model that are not in this list are ignored —
//! the rubric is never inferred from model output. Changing a category here
//! requires updating the schema block in `prompts.rs` to match; a test in
//! that module pins the two together.

/// The 8 rubric dimensions, in display order.
pub const ANALYSIS_CATEGORIES: [&str; 8] = [
    "Content Clarity & Impact",
    "Skills Presentation",
    "Experience Descriptions",
    "Tailoring",
    "Structure & Readability",
    "Achievements & Metrics",
    "ATS & Keywords",
    "Specific Improvements",
];
