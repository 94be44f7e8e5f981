// Prompt constants for the language-model calls.

/// System instruction for job-description keyword extraction.
pub const SKILLS_SYSTEM: &str =
    "Extract must-have and good-to-have skills from this job description.";
