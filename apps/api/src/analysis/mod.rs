// Resume analysis engine.
// Implements: request validation, keyword extraction, resume tailoring,
// suggestion generation, section analysis, scoring, and aggregation.
// All LLM calls go through llm_client — no direct API calls here.

pub mod handlers;
pub mod keywords;
pub mod models;
pub mod pipeline;
pub mod prompts;
pub mod scoring;
pub mod sections;
pub mod tailor;
pub mod validate;
