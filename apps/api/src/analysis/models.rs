//! Request and response shapes for the resume analysis API.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Candidate experience level. Unrecognized input coerces to `NotSpecified`
/// instead of failing the request — an unknown level is never worth a 400.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
    Entry,
    Mid,
    Senior,
    Lead,
    Executive,
    #[default]
    NotSpecified,
}

impl ExperienceLevel {
    /// Permissive parse: recognized aliases map to a level, anything else
    /// (including absence) to `NotSpecified`.
    pub fn parse_permissive(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_lowercase()).as_deref() {
            Some("entry") | Some("junior") => ExperienceLevel::Entry,
            Some("mid") | Some("intermediate") => ExperienceLevel::Mid,
            Some("senior") => ExperienceLevel::Senior,
            Some("lead") | Some("staff") | Some("principal") => ExperienceLevel::Lead,
            Some("executive") | Some("director") => ExperienceLevel::Executive,
            _ => ExperienceLevel::NotSpecified,
        }
    }

    /// Human-readable form used in prompts.
    pub fn as_str(&self) -> &'static str {
        match self {
            ExperienceLevel::Entry => "entry",
            ExperienceLevel::Mid => "mid",
            ExperienceLevel::Senior => "senior",
            ExperienceLevel::Lead => "lead",
            ExperienceLevel::Executive => "executive",
            ExperienceLevel::NotSpecified => "not specified",
        }
    }
}

/// Request body as it arrives on the wire. All fields optional so the
/// validator can report every missing field at once instead of letting
/// deserialization fail on the first.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAnalysisRequest {
    #[serde(default)]
    pub resume_text: Option<String>,
    #[serde(default)]
    pub job_description: Option<String>,
    #[serde(default)]
    pub target_role: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub experience_level: Option<String>,
}

/// A validated analysis request. Invariant: `resume_text` and
/// `job_description` are non-empty after trimming.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub resume_text: String,
    pub job_description: String,
    pub target_role: Option<String>,
    pub industry: Option<String>,
    pub experience_level: ExperienceLevel,
}

/// Full analysis response.
///
/// `keyword_matches` keys and `missing_keywords` entries are disjoint by
/// construction: a keyword lands in exactly one depending on whether it
/// occurs in the ORIGINAL resume.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    pub original_resume: String,
    pub tailored_resume: String,
    pub keyword_matches: BTreeMap<String, u32>,
    pub missing_keywords: Vec<String>,
    pub suggestions: Vec<String>,
    pub confidence_score: f32,
    pub analysis_summary: String,
}

/// Per-keyword detail for the detailed-analysis endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct KeywordReport {
    pub keyword: String,
    pub importance: f32,
    pub found_in_resume: bool,
    pub frequency: u32,
    /// Up to three snippets of surrounding resume text per occurrence.
    pub context: Vec<String>,
}

/// One resume section with its tailored rewrite and targeted improvements.
#[derive(Debug, Clone, Serialize)]
pub struct ResumeSection {
    pub section_name: String,
    pub original_content: String,
    pub tailored_content: String,
    pub improvements: Vec<String>,
}

/// Coarse market signals derived locally from the overall score.
#[derive(Debug, Clone, Serialize)]
pub struct IndustryInsights {
    pub trending_skills: Vec<String>,
    pub market_demand: String,
    pub competition_level: String,
}

/// Section-keyed breakdown returned by `/resume/detailed-analysis`.
#[derive(Debug, Clone, Serialize)]
pub struct DetailedAnalysisResponse {
    pub sections: Vec<ResumeSection>,
    pub keyword_analysis: Vec<KeywordReport>,
    pub overall_score: f32,
    pub recommendations: Vec<String>,
    pub industry_insights: IndustryInsights,
}

/// How much of a model reply survived tolerant parsing.
///
/// Model output is inherently fuzzy; parsers return best-effort data
/// tagged with fidelity instead of raising on malformed replies.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelOutput<T> {
    /// The whole reply parsed cleanly.
    Clean(T),
    /// Some rows were salvaged, the rest dropped.
    Partial(T),
    /// Nothing usable could be recovered.
    Unusable,
}

impl<T> ModelOutput<T> {
    pub fn into_option(self) -> Option<T> {
        match self {
            ModelOutput::Clean(v) | ModelOutput::Partial(v) => Some(v),
            ModelOutput::Unusable => None,
        }
    }

    /// True when the reply deviated from the requested format.
    pub fn degraded(&self) -> bool {
        !matches!(self, ModelOutput::Clean(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_experience_level_recognized_values() {
        assert_eq!(
            ExperienceLevel::parse_permissive(Some("entry")),
            ExperienceLevel::Entry
        );
        assert_eq!(
            ExperienceLevel::parse_permissive(Some("Senior")),
            ExperienceLevel::Senior
        );
        assert_eq!(
            ExperienceLevel::parse_permissive(Some("  staff ")),
            ExperienceLevel::Lead
        );
    }

    #[test]
    fn test_experience_level_unknown_defaults_to_not_specified() {
        assert_eq!(
            ExperienceLevel::parse_permissive(Some("wizard")),
            ExperienceLevel::NotSpecified
        );
        assert_eq!(
            ExperienceLevel::parse_permissive(None),
            ExperienceLevel::NotSpecified
        );
    }

    #[test]
    fn test_experience_level_serializes_snake_case() {
        let json = serde_json::to_string(&ExperienceLevel::NotSpecified).unwrap();
        assert_eq!(json, "\"not_specified\"");
    }

    #[test]
    fn test_raw_request_tolerates_missing_fields() {
        let raw: RawAnalysisRequest = serde_json::from_str("{}").unwrap();
        assert!(raw.resume_text.is_none());
        assert!(raw.job_description.is_none());
    }

    #[test]
    fn test_model_output_degraded_flags() {
        assert!(!ModelOutput::Clean(1).degraded());
        assert!(ModelOutput::Partial(1).degraded());
        assert!(ModelOutput::<i32>::Unusable.degraded());
        assert_eq!(ModelOutput::<i32>::Unusable.into_option(), None);
    }
}
