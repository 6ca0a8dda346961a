// Shared prompt constants and prompt-building utilities.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON value. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Instruction appended to every rewrite prompt: the model may rephrase
/// and reorder, never invent.
pub const FACTUAL_INSTRUCTION: &str = "\
    CRITICAL: Preserve every factual claim exactly as stated in the source resume. \
    Do NOT invent employers, titles, dates, metrics, degrees, or skills the \
    candidate did not claim. Rephrasing and reordering are allowed; fabrication is not.";
