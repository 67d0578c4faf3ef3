// All LLM prompt constants for the analysis pipeline.

/// System instruction for resume critique — fixed persona + JSON-only directive.
pub const CRITIQUE_SYSTEM: &str =
    "You are an expert resume reviewer with years of HR and recruitment experience. \
    Analyze the resume content provided by the user. \
    Output must be a valid JSON object ONLY. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Follow the structure strictly.";

/// Per-segment critique prompt template.
/// Replace `{target_role_line}` (may be empty) and `{resume_chunk}` before sending.
///
/// The schema block enumerates the rubric and must list exactly the
/// categories in `categories::ANALYSIS_CATEGORIES`; a test below pins this.
pub const CRITIQUE_PROMPT_TEMPLATE: &str = r#"Analyze the following resume segment as an expert reviewer. Return ONLY a JSON object — no markdown, no extra text.

Rules for the analysis:
- Be specific; do not generalize. Cover every detail the candidate should know about.
- Use a professional, human tone and be as informative as possible.
- Tailor the analysis toward the type of role the resume seems to target and say explicitly how well it aligns with that role.
- Where possible, benchmark strengths and weaknesses against common industry expectations for the candidate's field and seniority.
- Comment on language, tone, and action verbs, suggesting stronger alternatives where impact is lacking.
- Identify red flags (employment gaps, vague descriptions, outdated skills) and explain how recruiters or ATS systems interpret them.
- In the ATS & Keywords section, go beyond listing present/missing keywords: say exactly which words to add, where to place them, and why.
- Note any ATS parsing risks (tables, graphics, uncommon fonts, headers/footers).
- Suggest how to stand out to a human recruiter after passing ATS (storytelling, achievement framing).

Score each category individually first, then give the overall score.
If analysis fails return: { "error": "Resume could not be analyzed" }

Return a JSON object with this EXACT schema:
{
  "scores": {
    "Content Clarity & Impact": <int 0-10>,
    "Skills Presentation": <int 0-10>,
    "Experience Descriptions": <int 0-10>,
    "Tailoring": <int 0-10>,
    "Structure & Readability": <int 0-10>,
    "Achievements & Metrics": <int 0-10>,
    "ATS & Keywords": <int 0-10>,
    "Specific Improvements": <int 0-10>
  },
  "overall_score": <int 0-10>,
  "feedback": {
    "Content Clarity & Impact": "<text>",
    "Skills Presentation": "<text>",
    "Experience Descriptions": "<text>",
    "Tailoring": "<text>",
    "Structure & Readability": "<text>",
    "Achievements & Metrics": "<text>",
    "ATS & Keywords": "<text>",
    "Specific Improvements": "<text>"
  },
  "recommendations": "<summary>",
  "pros": ["<...>"],
  "cons": ["<...>"]
}

{target_role_line}Resume segment:
{resume_chunk}"#;
