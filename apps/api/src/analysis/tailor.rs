//! Resume tailoring and suggestion generation — the two rewrite-style
//! model operations. Both degrade instead of failing: tailoring falls back
//! to the original text, suggestions to a static list seeded with the
//! missing keywords.

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::warn;

use crate::analysis::models::{AnalysisRequest, ModelOutput};
use crate::analysis::prompts::{SUGGESTION_PROMPT_TEMPLATE, TAILOR_PROMPT_TEMPLATE, TAILOR_SYSTEM};
use crate::llm_client::prompts::{FACTUAL_INSTRUCTION, JSON_ONLY_SYSTEM};
use crate::llm_client::{strip_json_fences, TextModel};

/// Suggestions shorter than this are artifacts ("-", "OK"), not advice.
const MIN_SUGGESTION_LEN: usize = 4;

#[derive(Debug, Clone)]
pub struct TailorOutcome {
    pub text: String,
    pub degraded: bool,
}

#[derive(Debug, Clone)]
pub struct SuggestionOutcome {
    pub suggestions: Vec<String>,
    pub degraded: bool,
}

/// Rewrites the resume to align with the job description.
/// On any model failure the original text is returned unchanged.
pub async fn tailor_resume(
    model: &dyn TextModel,
    request: &AnalysisRequest,
    keywords: &BTreeMap<String, f32>,
) -> TailorOutcome {
    let keyword_list = keywords.keys().cloned().collect::<Vec<_>>().join(", ");

    let prompt = TAILOR_PROMPT_TEMPLATE
        .replace("{factual_instruction}", FACTUAL_INSTRUCTION)
        .replace("{job_description}", &request.job_description)
        .replace(
            "{target_role}",
            request.target_role.as_deref().unwrap_or("not specified"),
        )
        .replace(
            "{industry}",
            request.industry.as_deref().unwrap_or("not specified"),
        )
        .replace("{experience_level}", request.experience_level.as_str())
        .replace("{keywords}", &keyword_list)
        .replace("{resume_text}", &request.resume_text);

    match model.complete(&prompt, TAILOR_SYSTEM).await {
        Ok(reply) => {
            let text = reply.trim();
            if text.is_empty() {
                warn!("Tailoring reply was empty; returning original resume");
                TailorOutcome {
                    text: request.resume_text.clone(),
                    degraded: true,
                }
            } else {
                TailorOutcome {
                    text: text.to_string(),
                    degraded: false,
                }
            }
        }
        Err(e) => {
            warn!("Tailoring call failed: {e}; returning original resume");
            TailorOutcome {
                text: request.resume_text.clone(),
                degraded: true,
            }
        }
    }
}

/// Generates actionable improvement suggestions.
/// On any model failure a static fallback list is returned.
pub async fn generate_suggestions(
    model: &dyn TextModel,
    resume_text: &str,
    job_description: &str,
    missing_keywords: &[String],
) -> SuggestionOutcome {
    let prompt = SUGGESTION_PROMPT_TEMPLATE
        .replace("{job_description}", job_description)
        .replace("{resume_text}", resume_text)
        .replace("{missing_keywords}", &missing_keywords.join(", "));

    match model.complete(&prompt, JSON_ONLY_SYSTEM).await {
        Ok(reply) => match parse_suggestion_reply(&reply) {
            ModelOutput::Clean(suggestions) => SuggestionOutcome {
                suggestions,
                degraded: false,
            },
            ModelOutput::Partial(suggestions) => SuggestionOutcome {
                suggestions,
                degraded: true,
            },
            ModelOutput::Unusable => {
                warn!("Suggestion reply unusable; using fallback suggestions");
                SuggestionOutcome {
                    suggestions: fallback_suggestions(missing_keywords),
                    degraded: true,
                }
            }
        },
        Err(e) => {
            warn!("Suggestion call failed: {e}; using fallback suggestions");
            SuggestionOutcome {
                suggestions: fallback_suggestions(missing_keywords),
                degraded: true,
            }
        }
    }
}

/// Tolerant parse: a JSON array of strings, any JSON array with string
/// entries, or bulleted/numbered lines.
pub fn parse_suggestion_reply(reply: &str) -> ModelOutput<Vec<String>> {
    let text = strip_json_fences(reply);

    if let Ok(suggestions) = serde_json::from_str::<Vec<String>>(text) {
        let cleaned = clean_suggestions(suggestions.into_iter());
        return if cleaned.is_empty() {
            ModelOutput::Unusable
        } else {
            ModelOutput::Clean(cleaned)
        };
    }

    if let Ok(Value::Array(items)) = serde_json::from_str::<Value>(text) {
        let cleaned = clean_suggestions(
            items
                .into_iter()
                .filter_map(|v| v.as_str().map(String::from)),
        );
        return if cleaned.is_empty() {
            ModelOutput::Unusable
        } else {
            ModelOutput::Partial(cleaned)
        };
    }

    let cleaned = clean_suggestions(text.lines().map(strip_bullet));
    if cleaned.is_empty() {
        ModelOutput::Unusable
    } else {
        ModelOutput::Partial(cleaned)
    }
}

fn strip_bullet(line: &str) -> String {
    let line = line.trim().trim_start_matches(['-', '*', '•']).trim();
    // Numbered lists: "1. ..." / "2) ..."
    let line = line
        .split_once(|c: char| c == '.' || c == ')')
        .filter(|(prefix, _)| !prefix.is_empty() && prefix.chars().all(|c| c.is_ascii_digit()))
        .map(|(_, rest)| rest)
        .unwrap_or(line);
    line.trim().to_string()
}

fn clean_suggestions(items: impl Iterator<Item = String>) -> Vec<String> {
    items
        .map(|s| s.trim().to_string())
        .filter(|s| s.len() >= MIN_SUGGESTION_LEN)
        .collect()
}

/// Static suggestions used when the model cannot be asked, seeded with the
/// missing keywords so the advice still reflects this job description.
pub fn fallback_suggestions(missing_keywords: &[String]) -> Vec<String> {
    let mut suggestions = Vec::new();

    if !missing_keywords.is_empty() {
        let top: Vec<&str> = missing_keywords
            .iter()
            .take(5)
            .map(String::as_str)
            .collect();
        suggestions.push(format!(
            "Add the following keywords to your resume: {}",
            top.join(", ")
        ));
    }

    suggestions.extend(
        [
            "Use action verbs to start bullet points (e.g. 'Developed', 'Implemented', 'Led')",
            "Include specific metrics and quantifiable achievements",
            "Ensure your resume is ATS-friendly with clear section headers",
            "Highlight relevant experience that matches the job requirements",
            "Keep bullet points concise and impactful",
        ]
        .map(String::from),
    );

    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json_array_of_strings() {
        let reply = r#"["Add metrics to your bullets", "Lead with outcomes"]"#;
        let ModelOutput::Clean(suggestions) = parse_suggestion_reply(reply) else {
            panic!("expected clean parse");
        };
        assert_eq!(suggestions.len(), 2);
    }

    #[test]
    fn test_parse_mixed_array_keeps_strings() {
        let reply = r#"["Add metrics", 42, {"x": 1}, "Lead with outcomes"]"#;
        let ModelOutput::Partial(suggestions) = parse_suggestion_reply(reply) else {
            panic!("expected partial parse");
        };
        assert_eq!(suggestions.len(), 2);
    }

    #[test]
    fn test_parse_bulleted_lines() {
        let reply = "- Add metrics to your bullets\n* Lead with outcomes\n\n";
        let ModelOutput::Partial(suggestions) = parse_suggestion_reply(reply) else {
            panic!("expected partial parse");
        };
        assert_eq!(suggestions[0], "Add metrics to your bullets");
        assert_eq!(suggestions[1], "Lead with outcomes");
    }

    #[test]
    fn test_parse_numbered_lines() {
        let reply = "1. Add metrics\n2) Lead with outcomes";
        let suggestions = parse_suggestion_reply(reply).into_option().unwrap();
        assert_eq!(suggestions, vec!["Add metrics", "Lead with outcomes"]);
    }

    #[test]
    fn test_empty_reply_is_unusable() {
        assert_eq!(parse_suggestion_reply("  \n "), ModelOutput::Unusable);
        assert_eq!(parse_suggestion_reply("[]"), ModelOutput::Unusable);
    }

    #[test]
    fn test_fallback_lists_missing_keywords_first() {
        let missing = vec!["aws".to_string(), "docker".to_string()];
        let suggestions = fallback_suggestions(&missing);
        assert!(suggestions[0].contains("aws"));
        assert!(suggestions[0].contains("docker"));
        assert!(suggestions.len() > 1);
    }

    #[test]
    fn test_fallback_without_missing_keywords_is_static_only() {
        let suggestions = fallback_suggestions(&[]);
        assert_eq!(suggestions.len(), 5);
        assert!(!suggestions[0].contains("keywords to your resume"));
    }

    #[test]
    fn test_fallback_caps_listed_keywords_at_five() {
        let missing: Vec<String> = (0..8).map(|i| format!("skill{i}")).collect();
        let suggestions = fallback_suggestions(&missing);
        assert!(suggestions[0].contains("skill4"));
        assert!(!suggestions[0].contains("skill5"));
    }
}
