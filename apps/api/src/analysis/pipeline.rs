//! Analysis pipeline — orchestrates the model operations and aggregates
//! their outputs into the response shapes.
//!
//! Flow: extract_keywords → scan_resume → (tailor ∥ suggestions) →
//!       confidence → summary.
//!
//! The pipeline never fails on model errors: each operation degrades to
//! its fallback and the summary carries an advisory note instead.

use tracing::info;

use crate::analysis::keywords::extract_keywords;
use crate::analysis::models::{
    AnalysisRequest, AnalysisResult, DetailedAnalysisResponse, IndustryInsights, KeywordReport,
    ResumeSection,
};
use crate::analysis::scoring::{build_summary, confidence_score, partition_matches, scan_resume};
use crate::analysis::sections::analyze_sections;
use crate::analysis::tailor::{generate_suggestions, tailor_resume};
use crate::llm_client::TextModel;

/// Suggestions reported per section in the detailed breakdown.
const MAX_SECTION_IMPROVEMENTS: usize = 3;
/// Skills surfaced as "trending" in the industry insights.
const MAX_TRENDING_SKILLS: usize = 5;

/// Runs the full analysis for `/resume/analyze` and `/resume/analyze-file`.
pub async fn run_analysis(model: &dyn TextModel, request: &AnalysisRequest) -> AnalysisResult {
    // Step 1: keyword inventory (feeds every later prompt)
    let extraction = extract_keywords(model, &request.job_description).await;
    info!(
        "Extracted {} keywords (degraded: {})",
        extraction.keywords.len(),
        extraction.degraded
    );

    // Step 2: occurrence scan of the ORIGINAL resume
    let hits = scan_resume(&request.resume_text, &extraction.keywords);
    let (keyword_matches, missing_keywords) = partition_matches(&hits);

    // Step 3: rewrite and advice are independent — run them concurrently
    let (tailored, suggested) = tokio::join!(
        tailor_resume(model, request, &extraction.keywords),
        generate_suggestions(
            model,
            &request.resume_text,
            &request.job_description,
            &missing_keywords,
        ),
    );

    // Step 4: local scoring and summary
    let confidence = confidence_score(&hits, &extraction.keywords);
    let degraded = extraction.degraded || tailored.degraded || suggested.degraded;
    let summary = build_summary(
        keyword_matches.len(),
        extraction.keywords.len(),
        missing_keywords.len(),
        confidence,
        degraded,
    );

    info!(
        "Analysis complete: {}/{} keywords matched, confidence {:.2}",
        keyword_matches.len(),
        extraction.keywords.len(),
        confidence
    );

    AnalysisResult {
        original_resume: request.resume_text.clone(),
        tailored_resume: tailored.text,
        keyword_matches,
        missing_keywords,
        suggestions: suggested.suggestions,
        confidence_score: confidence,
        analysis_summary: summary,
    }
}

/// Runs the section-keyed analysis for `/resume/detailed-analysis`.
///
/// Same orchestration as `run_analysis` plus a section pass: the resume is
/// split into named sections and each section gets its own tailored rewrite
/// and a short improvement list.
pub async fn run_detailed_analysis(
    model: &dyn TextModel,
    request: &AnalysisRequest,
) -> DetailedAnalysisResponse {
    // Keyword inventory and section split are independent of each other
    let (extraction, (sections, _sections_degraded)) = tokio::join!(
        extract_keywords(model, &request.job_description),
        analyze_sections(model, &request.resume_text),
    );

    let hits = scan_resume(&request.resume_text, &extraction.keywords);
    let (_, missing_keywords) = partition_matches(&hits);

    let keyword_analysis = extraction
        .keywords
        .iter()
        .map(|(keyword, weight)| {
            let hit = &hits[keyword];
            KeywordReport {
                keyword: keyword.clone(),
                importance: *weight,
                found_in_resume: hit.frequency > 0,
                frequency: hit.frequency,
                context: hit.contexts.clone(),
            }
        })
        .collect();

    // Per-section rewrite and advice
    let mut section_reports = Vec::with_capacity(sections.len());
    for section in &sections {
        let section_request = AnalysisRequest {
            resume_text: section.content.clone(),
            ..request.clone()
        };
        let (tailored, improvements) = tokio::join!(
            tailor_resume(model, &section_request, &extraction.keywords),
            generate_suggestions(
                model,
                &section.content,
                &request.job_description,
                &missing_keywords,
            ),
        );
        section_reports.push(ResumeSection {
            section_name: section.section_name.clone(),
            original_content: section.content.clone(),
            tailored_content: tailored.text,
            improvements: improvements
                .suggestions
                .into_iter()
                .take(MAX_SECTION_IMPROVEMENTS)
                .collect(),
        });
    }

    let overall_score = confidence_score(&hits, &extraction.keywords);

    let recommendations = generate_suggestions(
        model,
        &request.resume_text,
        &request.job_description,
        &missing_keywords,
    )
    .await
    .suggestions;

    info!(
        "Detailed analysis complete: {} sections, {} keywords, score {:.2}",
        section_reports.len(),
        extraction.keywords.len(),
        overall_score
    );

    DetailedAnalysisResponse {
        sections: section_reports,
        keyword_analysis,
        overall_score,
        recommendations,
        industry_insights: industry_insights(&extraction.keywords, overall_score),
    }
}

/// Coarse market signals derived from keyword weights and the overall score.
fn industry_insights(
    keywords: &std::collections::BTreeMap<String, f32>,
    overall_score: f32,
) -> IndustryInsights {
    let mut by_weight: Vec<(&String, &f32)> = keywords.iter().collect();
    by_weight.sort_by(|a, b| b.1.total_cmp(a.1).then_with(|| a.0.cmp(b.0)));

    let trending_skills = by_weight
        .into_iter()
        .take(MAX_TRENDING_SKILLS)
        .map(|(k, _)| k.clone())
        .collect();

    let market_demand = if overall_score > 0.7 {
        "High"
    } else if overall_score > 0.4 {
        "Medium"
    } else {
        "Low"
    };

    let competition_level = if overall_score > 0.8 {
        "High"
    } else if overall_score > 0.5 {
        "Medium"
    } else {
        "Low"
    };

    IndustryInsights {
        trending_skills,
        market_demand: market_demand.to_string(),
        competition_level: competition_level.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn keyword_map(entries: &[(&str, f32)]) -> BTreeMap<String, f32> {
        entries
            .iter()
            .map(|(k, w)| (k.to_string(), *w))
            .collect()
    }

    #[test]
    fn test_trending_skills_ranked_by_weight() {
        let keywords = keyword_map(&[("python", 0.9), ("jira", 0.3), ("docker", 0.7)]);
        let insights = industry_insights(&keywords, 0.5);
        assert_eq!(insights.trending_skills, vec!["python", "docker", "jira"]);
    }

    #[test]
    fn test_trending_skills_capped_at_five() {
        let keywords = keyword_map(&[
            ("a", 0.9),
            ("b", 0.8),
            ("c", 0.7),
            ("d", 0.6),
            ("e", 0.5),
            ("f", 0.4),
        ]);
        let insights = industry_insights(&keywords, 0.9);
        assert_eq!(insights.trending_skills.len(), 5);
        assert!(!insights.trending_skills.contains(&"f".to_string()));
    }

    #[test]
    fn test_market_signals_track_score_bands() {
        let keywords = keyword_map(&[("python", 0.9)]);
        let high = industry_insights(&keywords, 0.9);
        assert_eq!(high.market_demand, "High");
        assert_eq!(high.competition_level, "High");

        let mid = industry_insights(&keywords, 0.6);
        assert_eq!(mid.market_demand, "Medium");
        assert_eq!(mid.competition_level, "Medium");

        let low = industry_insights(&keywords, 0.2);
        assert_eq!(low.market_demand, "Low");
        assert_eq!(low.competition_level, "Low");
    }
}
