//! Request validation — checks every constraint and reports all violations
//! together, not just the first.

use crate::analysis::models::{AnalysisRequest, ExperienceLevel, RawAnalysisRequest};
use crate::errors::{AppError, FieldViolation};

/// Validates a raw request into an `AnalysisRequest`.
///
/// Rules: `resume_text` and `job_description` must be non-empty after
/// trimming. `target_role` and `industry` are trimmed; empty strings become
/// absent. `experience_level` never fails — unrecognized values coerce to
/// "not specified" so the happy path stays unblocked.
pub fn validate_request(raw: RawAnalysisRequest) -> Result<AnalysisRequest, AppError> {
    let mut violations = Vec::new();

    let resume_text = required_text(&mut violations, "resume_text", raw.resume_text);
    let job_description = required_text(&mut violations, "job_description", raw.job_description);

    if !violations.is_empty() {
        return Err(AppError::Validation(violations));
    }

    Ok(AnalysisRequest {
        resume_text,
        job_description,
        target_role: optional_text(raw.target_role),
        industry: optional_text(raw.industry),
        experience_level: ExperienceLevel::parse_permissive(raw.experience_level.as_deref()),
    })
}

fn required_text(
    violations: &mut Vec<FieldViolation>,
    field: &str,
    value: Option<String>,
) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.trim().to_string(),
        Some(_) => {
            violations.push(FieldViolation::new(field, "must not be empty"));
            String::new()
        }
        None => {
            violations.push(FieldViolation::new(field, "is required"));
            String::new()
        }
    }
}

fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(resume: Option<&str>, jd: Option<&str>) -> RawAnalysisRequest {
        RawAnalysisRequest {
            resume_text: resume.map(String::from),
            job_description: jd.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_request_passes() {
        let request = validate_request(raw(Some("resume"), Some("jd"))).unwrap();
        assert_eq!(request.resume_text, "resume");
        assert_eq!(request.job_description, "jd");
        assert_eq!(request.experience_level, ExperienceLevel::NotSpecified);
    }

    #[test]
    fn test_all_violations_reported_at_once() {
        let err = validate_request(raw(None, Some("   "))).unwrap_err();
        let AppError::Validation(violations) = err else {
            panic!("expected validation error");
        };
        assert_eq!(violations.len(), 2);
        assert_eq!(violations[0].field, "resume_text");
        assert_eq!(violations[1].field, "job_description");
    }

    #[test]
    fn test_whitespace_only_resume_is_rejected() {
        let err = validate_request(raw(Some("  \n "), Some("jd"))).unwrap_err();
        let AppError::Validation(violations) = err else {
            panic!("expected validation error");
        };
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "resume_text");
    }

    #[test]
    fn test_unknown_experience_level_is_permissive() {
        let mut input = raw(Some("resume"), Some("jd"));
        input.experience_level = Some("grandmaster".to_string());
        let request = validate_request(input).unwrap();
        assert_eq!(request.experience_level, ExperienceLevel::NotSpecified);
    }

    #[test]
    fn test_optional_fields_trim_to_absent() {
        let mut input = raw(Some("resume"), Some("jd"));
        input.target_role = Some("  ".to_string());
        input.industry = Some(" fintech ".to_string());
        let request = validate_request(input).unwrap();
        assert_eq!(request.target_role, None);
        assert_eq!(request.industry.as_deref(), Some("fintech"));
    }

    #[test]
    fn test_fields_are_trimmed() {
        let request = validate_request(raw(Some("  resume  "), Some("\njd\n"))).unwrap();
        assert_eq!(request.resume_text, "resume");
        assert_eq!(request.job_description, "jd");
    }
}
