//! Occurrence scanning and scoring — pure-Rust, deterministic, no model
//! calls. Matches extracted keywords against the ORIGINAL resume text,
//! partitions found/missing, computes the confidence ratio, and renders
//! the templated analysis summary.

use std::collections::BTreeMap;

/// Characters of surrounding text captured on each side of a match.
const CONTEXT_RADIUS: usize = 50;
/// Max context snippets reported per keyword.
const MAX_CONTEXTS: usize = 3;

/// Occurrence record for one keyword in the resume.
#[derive(Debug, Clone, Default)]
pub struct KeywordHit {
    pub frequency: u32,
    pub contexts: Vec<String>,
}

/// Scans the resume for every extracted keyword.
///
/// Matching is case-insensitive on whitespace-collapsed text, so a keyword
/// split across a line break in the resume still counts. Keywords arrive
/// already lowercased and collapsed from the extraction boundary.
pub fn scan_resume(
    resume_text: &str,
    keywords: &BTreeMap<String, f32>,
) -> BTreeMap<String, KeywordHit> {
    let haystack = normalize_for_match(resume_text);

    keywords
        .keys()
        .map(|keyword| {
            let mut hit = KeywordHit::default();
            for (index, _) in haystack.match_indices(keyword.as_str()) {
                hit.frequency += 1;
                if hit.contexts.len() < MAX_CONTEXTS {
                    hit.contexts
                        .push(context_snippet(&haystack, index, keyword.len()));
                }
            }
            (keyword.clone(), hit)
        })
        .collect()
}

/// Splits hits into `(found with counts, missing)`. The two sides are
/// disjoint by construction.
pub fn partition_matches(
    hits: &BTreeMap<String, KeywordHit>,
) -> (BTreeMap<String, u32>, Vec<String>) {
    let mut matches = BTreeMap::new();
    let mut missing = Vec::new();

    for (keyword, hit) in hits {
        if hit.frequency > 0 {
            matches.insert(keyword.clone(), hit.frequency);
        } else {
            missing.push(keyword.clone());
        }
    }

    (matches, missing)
}

/// Confidence = Σ(weight of matched keywords) / Σ(all weights), clamped to
/// [0, 1]. Zero when no keywords were extracted.
pub fn confidence_score(
    hits: &BTreeMap<String, KeywordHit>,
    weights: &BTreeMap<String, f32>,
) -> f32 {
    let total: f32 = weights.values().sum();
    if total <= 0.0 {
        return 0.0;
    }

    let matched: f32 = weights
        .iter()
        .filter(|(keyword, _)| hits.get(*keyword).is_some_and(|h| h.frequency > 0))
        .map(|(_, weight)| weight)
        .sum();

    (matched / total).clamp(0.0, 1.0)
}

/// Renders the templated analysis summary. Local string work only.
pub fn build_summary(found: usize, total: usize, missing: usize, confidence: f32, degraded: bool) -> String {
    let mut summary = format!(
        "Resume analysis complete.\n\n\
         Keywords found: {found}/{total}\n\
         Missing keywords: {missing}\n\
         Confidence score: {:.0}%\n\n\
         The resume has been optimized to better match the job requirements. \
         Consider incorporating the missing keywords to improve your chances.",
        confidence * 100.0
    );

    if degraded {
        summary.push_str(
            "\n\nNote: the language model was partially unavailable for this \
             analysis; some results were produced by fallback heuristics.",
        );
    }

    summary
}

fn normalize_for_match(text: &str) -> String {
    text.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Extracts up to `CONTEXT_RADIUS` characters of context around a match,
/// snapped to UTF-8 char boundaries.
fn context_snippet(haystack: &str, index: usize, match_len: usize) -> String {
    let mut start = index.saturating_sub(CONTEXT_RADIUS);
    while !haystack.is_char_boundary(start) {
        start -= 1;
    }
    let mut end = (index + match_len + CONTEXT_RADIUS).min(haystack.len());
    while !haystack.is_char_boundary(end) {
        end += 1;
    }
    haystack[start..end].trim().to_string()
}
