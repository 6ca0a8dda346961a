//! Keyword extraction — asks the model which skills a job description
//! demands, parses the reply tolerantly, and falls back to a curated
//! lexicon scan when the model is unreachable or its output is unusable.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::analysis::models::ModelOutput;
use crate::analysis::prompts::KEYWORD_PROMPT_TEMPLATE;
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{strip_json_fences, TextModel};

/// Longest keyword the parser will accept; anything beyond this is a
/// sentence the model failed to split, not a keyword.
const MAX_KEYWORD_LEN: usize = 64;

/// Weight assigned when the model lists a keyword without one.
const DEFAULT_WEIGHT: f32 = 0.5;

/// Extracted keyword inventory for one job description.
#[derive(Debug, Clone)]
pub struct KeywordExtraction {
    /// Lowercased keyword → weight in (0, 1].
    pub keywords: BTreeMap<String, f32>,
    /// True when the model failed or its reply deviated from the requested
    /// format and fallback data filled the gap.
    pub degraded: bool,
}

/// Extracts weighted keywords from a job description.
///
/// Never fails: a model error or unusable reply degrades to the lexicon
/// scan so the surrounding pipeline can keep going.
pub async fn extract_keywords(model: &dyn TextModel, job_description: &str) -> KeywordExtraction {
    let prompt = KEYWORD_PROMPT_TEMPLATE.replace("{job_description}", job_description);

    match model.complete(&prompt, JSON_ONLY_SYSTEM).await {
        Ok(reply) => match parse_keyword_reply(&reply) {
            ModelOutput::Clean(keywords) => KeywordExtraction {
                keywords,
                degraded: false,
            },
            ModelOutput::Partial(keywords) if !keywords.is_empty() => {
                warn!("Keyword reply only partially parseable; salvaged {} entries", keywords.len());
                KeywordExtraction {
                    keywords,
                    degraded: true,
                }
            }
            _ => {
                warn!("Keyword reply unusable; falling back to lexicon scan");
                KeywordExtraction {
                    keywords: lexicon_scan(job_description),
                    degraded: true,
                }
            }
        },
        Err(e) => {
            warn!("Keyword extraction call failed: {e}; falling back to lexicon scan");
            KeywordExtraction {
                keywords: lexicon_scan(job_description),
                degraded: true,
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct KeywordRow {
    keyword: String,
    #[serde(alias = "importance")]
    weight: Option<f32>,
}

/// Tolerant parse of a keyword reply.
///
/// Accepts, in order: a JSON object `{keyword: weight}`, a JSON array of
/// `{keyword, weight|importance}` rows, any JSON value with salvageable
/// entries, and finally `keyword: weight` / bulleted lines. Entries that
/// fail normalization are dropped rather than failing the parse.
pub fn parse_keyword_reply(reply: &str) -> ModelOutput<BTreeMap<String, f32>> {
    let text = strip_json_fences(reply);

    if let Ok(map) = serde_json::from_str::<BTreeMap<String, f32>>(text) {
        let total = map.len();
        let keywords = normalize_entries(map.into_iter());
        return tag_by_loss(keywords, total);
    }

    if let Ok(rows) = serde_json::from_str::<Vec<KeywordRow>>(text) {
        let total = rows.len();
        let keywords = normalize_entries(
            rows.into_iter()
                .map(|r| (r.keyword, r.weight.unwrap_or(DEFAULT_WEIGHT))),
        );
        return tag_by_loss(keywords, total);
    }

    if let Ok(value) = serde_json::from_str::<Value>(text) {
        return salvage_value(&value);
    }

    salvage_lines(text)
}

/// Strict parses above count dropped entries to distinguish Clean from Partial.
fn tag_by_loss(keywords: BTreeMap<String, f32>, parsed_total: usize) -> ModelOutput<BTreeMap<String, f32>> {
    if keywords.is_empty() && parsed_total > 0 {
        ModelOutput::Unusable
    } else if keywords.len() < parsed_total {
        ModelOutput::Partial(keywords)
    } else {
        ModelOutput::Clean(keywords)
    }
}

/// Pulls whatever keyword-shaped entries exist out of an arbitrary JSON value.
fn salvage_value(value: &Value) -> ModelOutput<BTreeMap<String, f32>> {
    let mut keywords = BTreeMap::new();

    match value {
        Value::Array(items) => {
            for item in items {
                match item {
                    Value::String(s) => push_keyword(&mut keywords, s, DEFAULT_WEIGHT),
                    Value::Object(obj) => {
                        let name = obj.get("keyword").and_then(Value::as_str);
                        let weight = obj
                            .get("weight")
                            .or_else(|| obj.get("importance"))
                            .and_then(Value::as_f64)
                            .map(|w| w as f32)
                            .unwrap_or(DEFAULT_WEIGHT);
                        if let Some(name) = name {
                            push_keyword(&mut keywords, name, weight);
                        }
                    }
                    _ => {}
                }
            }
        }
        Value::Object(obj) => {
            // Some replies wrap the mapping: {"keywords": {...}} or {"keywords": [...]}
            if let Some(inner) = obj.get("keywords") {
                return salvage_value(inner);
            }
            for (name, weight) in obj {
                if let Some(w) = weight.as_f64() {
                    push_keyword(&mut keywords, name, w as f32);
                }
            }
        }
        _ => {}
    }

    if keywords.is_empty() {
        ModelOutput::Unusable
    } else {
        // Reaching salvage at all means the reply deviated from the
        // requested shape.
        ModelOutput::Partial(keywords)
    }
}

/// Last resort: treat each line as `keyword: weight` or a bulleted keyword.
fn salvage_lines(text: &str) -> ModelOutput<BTreeMap<String, f32>> {
    let mut keywords = BTreeMap::new();

    for line in text.lines() {
        let line = line
            .trim()
            .trim_start_matches(['-', '*', '•'])
            .trim();
        if line.is_empty() {
            continue;
        }
        let (name, weight) = match line.rsplit_once(':') {
            Some((name, value)) => (name, value.trim().parse::<f32>().ok()),
            None => (line, None),
        };
        push_keyword(&mut keywords, name, weight.unwrap_or(DEFAULT_WEIGHT));
    }

    if keywords.is_empty() {
        ModelOutput::Unusable
    } else {
        ModelOutput::Partial(keywords)
    }
}

fn normalize_entries(entries: impl Iterator<Item = (String, f32)>) -> BTreeMap<String, f32> {
    let mut keywords = BTreeMap::new();
    for (name, weight) in entries {
        push_keyword(&mut keywords, &name, weight);
    }
    keywords
}

/// Canonicalizes one keyword: lowercase, trimmed, inner whitespace
/// collapsed, bounded length, weight clamped into (0, 1]. Entries that
/// cannot be canonicalized are dropped.
fn push_keyword(keywords: &mut BTreeMap<String, f32>, name: &str, weight: f32) {
    let canonical = name
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    if canonical.is_empty() || canonical.len() > MAX_KEYWORD_LEN {
        return;
    }
    if !weight.is_finite() || weight <= 0.0 {
        return;
    }

    keywords.insert(canonical, weight.min(1.0));
}

// ────────────────────────────────────────────────────────────────────────────
// Lexicon fallback
// ────────────────────────────────────────────────────────────────────────────

const TECHNICAL_KEYWORDS: &[&str] = &[
    "python",
    "java",
    "javascript",
    "typescript",
    "rust",
    "go",
    "react",
    "angular",
    "vue.js",
    "node.js",
    "sql",
    "postgresql",
    "mysql",
    "mongodb",
    "redis",
    "elasticsearch",
    "kafka",
    "spark",
    "hadoop",
    "aws",
    "azure",
    "gcp",
    "docker",
    "kubernetes",
    "terraform",
    "ci/cd",
    "git",
    "rest",
    "graphql",
    "api",
    "machine learning",
    "data science",
    "tensorflow",
    "pytorch",
    "scikit-learn",
    "html",
    "css",
];

const SOFT_SKILLS: &[&str] = &[
    "leadership",
    "communication",
    "teamwork",
    "problem solving",
    "analytical",
    "collaboration",
    "mentoring",
    "project management",
    "time management",
    "detail-oriented",
];

const TOOLS: &[&str] = &[
    "jira",
    "confluence",
    "slack",
    "figma",
    "excel",
    "powerpoint",
    "tableau",
    "grafana",
];

/// Deterministic keyword scan used when the model cannot be asked.
/// Weights mirror category importance: technical 0.8, tools 0.7, soft 0.6.
pub fn lexicon_scan(job_description: &str) -> BTreeMap<String, f32> {
    let jd_lower = job_description.to_lowercase();
    let mut keywords = BTreeMap::new();

    for (list, weight) in [
        (TECHNICAL_KEYWORDS, 0.8),
        (TOOLS, 0.7),
        (SOFT_SKILLS, 0.6),
    ] {
        for keyword in list {
            if jd_lower.contains(keyword) {
                keywords.insert(keyword.to_string(), weight);
            }
        }
    }

    keywords
}
