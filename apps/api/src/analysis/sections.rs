//! Section analysis — asks the model to split a resume into named
//! sections; degrades to a local header-based splitter.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::analysis::models::ModelOutput;
use crate::analysis::prompts::SECTION_PROMPT_TEMPLATE;
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{strip_json_fences, TextModel};

/// A named slice of the resume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub section_name: String,
    pub content: String,
}

/// Header lines longer than this are treated as body text even when they
/// mention a section word ("10 years of experience with...").
const MAX_HEADER_LEN: usize = 40;

/// Known section headers and the words that signal them.
const SECTION_HEADERS: &[(&str, &[&str])] = &[
    ("Experience", &["experience", "work history", "employment", "career"]),
    ("Education", &["education", "academic", "degree", "university", "college"]),
    ("Skills", &["skills", "competencies", "expertise"]),
    ("Summary", &["summary", "objective", "profile", "about"]),
    ("Projects", &["projects", "portfolio", "achievements"]),
    ("Certifications", &["certifications", "certificates", "licenses"]),
];

/// Splits the resume into named sections, preferring the model's reading.
/// Returns the sections and whether the local fallback had to be used.
pub async fn analyze_sections(model: &dyn TextModel, resume_text: &str) -> (Vec<Section>, bool) {
    let prompt = SECTION_PROMPT_TEMPLATE.replace("{resume_text}", resume_text);

    match model.complete(&prompt, JSON_ONLY_SYSTEM).await {
        Ok(reply) => match parse_section_reply(&reply) {
            ModelOutput::Clean(sections) => (sections, false),
            ModelOutput::Partial(sections) => (sections, true),
            ModelOutput::Unusable => {
                warn!("Section reply unusable; using header-based splitter");
                (split_sections(resume_text), true)
            }
        },
        Err(e) => {
            warn!("Section analysis call failed: {e}; using header-based splitter");
            (split_sections(resume_text), true)
        }
    }
}

/// Tolerant parse: a JSON array of `{section_name, content}` rows, with a
/// per-item salvage pass for partially conforming arrays.
pub fn parse_section_reply(reply: &str) -> ModelOutput<Vec<Section>> {
    let text = strip_json_fences(reply);

    if let Ok(sections) = serde_json::from_str::<Vec<Section>>(text) {
        let cleaned = clean_sections(sections);
        return if cleaned.is_empty() {
            ModelOutput::Unusable
        } else {
            ModelOutput::Clean(cleaned)
        };
    }

    if let Ok(Value::Array(items)) = serde_json::from_str::<Value>(text) {
        let salvaged: Vec<Section> = items
            .iter()
            .filter_map(|item| {
                let name = item.get("section_name").and_then(Value::as_str)?;
                let content = item.get("content").and_then(Value::as_str)?;
                Some(Section {
                    section_name: name.to_string(),
                    content: content.to_string(),
                })
            })
            .collect();
        let cleaned = clean_sections(salvaged);
        return if cleaned.is_empty() {
            ModelOutput::Unusable
        } else {
            ModelOutput::Partial(cleaned)
        };
    }

    ModelOutput::Unusable
}

fn clean_sections(sections: Vec<Section>) -> Vec<Section> {
    sections
        .into_iter()
        .map(|s| Section {
            section_name: s.section_name.trim().to_string(),
            content: s.content.trim().to_string(),
        })
        .filter(|s| !s.section_name.is_empty() && !s.content.is_empty())
        .collect()
}

/// Local header-based splitter. Walks the resume line by line; a short
/// line containing a known section word starts a new section. Text before
/// any recognized header lands in "Summary".
pub fn split_sections(resume_text: &str) -> Vec<Section> {
    let mut sections: Vec<Section> = Vec::new();
    let mut current_name = "Summary".to_string();
    let mut current_lines: Vec<&str> = Vec::new();

    for line in resume_text.lines() {
        let trimmed = line.trim();
        if let Some(name) = header_name(trimmed) {
            if !current_lines.is_empty() {
                push_section(&mut sections, &current_name, &current_lines);
            }
            current_name = name.to_string();
            current_lines = Vec::new();
        } else if !trimmed.is_empty() {
            current_lines.push(trimmed);
        }
    }

    if !current_lines.is_empty() {
        push_section(&mut sections, &current_name, &current_lines);
    }

    sections
}

fn header_name(line: &str) -> Option<&'static str> {
    if line.is_empty() || line.len() > MAX_HEADER_LEN {
        return None;
    }
    let lower = line.to_lowercase();
    SECTION_HEADERS
        .iter()
        .find(|(_, markers)| markers.iter().any(|m| lower.contains(m)))
        .map(|(name, _)| *name)
}

fn push_section(sections: &mut Vec<Section>, name: &str, lines: &[&str]) {
    sections.push(Section {
        section_name: name.to_string(),
        content: lines.join("\n"),
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESUME: &str = "\
Jane Doe, backend engineer.

Work Experience
Built services at Acme Corp.
Scaled the billing pipeline.

Education
BSc Computer Science, State University.

Skills
Python, Docker, Kubernetes.";

    #[test]
    fn test_parse_clean_section_array() {
        let reply = r#"[{"section_name": "Experience", "content": "Built services."}]"#;
        let ModelOutput::Clean(sections) = parse_section_reply(reply) else {
            panic!("expected clean parse");
        };
        assert_eq!(sections[0].section_name, "Experience");
    }

    #[test]
    fn test_parse_salvages_partial_array() {
        let reply = r#"[{"section_name": "Skills", "content": "Python"}, {"oops": true}]"#;
        let ModelOutput::Partial(sections) = parse_section_reply(reply) else {
            panic!("expected partial parse");
        };
        assert_eq!(sections.len(), 1);
    }

    #[test]
    fn test_parse_prose_is_unusable() {
        assert_eq!(
            parse_section_reply("The resume has three sections."),
            ModelOutput::Unusable
        );
    }

    #[test]
    fn test_parse_drops_empty_sections() {
        let reply = r#"[{"section_name": "  ", "content": "x"}, {"section_name": "A", "content": ""}]"#;
        assert_eq!(parse_section_reply(reply), ModelOutput::Unusable);
    }

    #[test]
    fn test_split_recognizes_standard_headers() {
        let sections = split_sections(RESUME);
        let names: Vec<&str> = sections.iter().map(|s| s.section_name.as_str()).collect();
        assert_eq!(names, vec!["Summary", "Experience", "Education", "Skills"]);
        assert!(sections[1].content.contains("Acme Corp"));
        assert!(sections[3].content.contains("Kubernetes"));
    }

    #[test]
    fn test_split_long_lines_are_not_headers() {
        let text = "I gained experience with distributed systems over ten years at Acme.\nSkills\nRust";
        let sections = split_sections(text);
        // The first line mentions "experience" but is body text, not a header
        assert_eq!(sections[0].section_name, "Summary");
        assert_eq!(sections[1].section_name, "Skills");
    }

    #[test]
    fn test_split_empty_resume_yields_no_sections() {
        assert!(split_sections("").is_empty());
    }
}
