// All LLM prompt constants for the analysis module.
// Cross-cutting fragments (JSON-only system, factual constraint) live in
// llm_client::prompts.

/// Keyword extraction prompt template. Replace `{job_description}` before sending.
pub const KEYWORD_PROMPT_TEMPLATE: &str = r#"Extract the most important keywords, skills, and requirements from the following job description.
Focus on technical skills, soft skills, tools, technologies, and qualifications.

Return a JSON object mapping each keyword to a weight between 0 and 1, where the
weight reflects how important the keyword is for this role:
{
  "python": 0.9,
  "docker": 0.7,
  "communication": 0.5
}

Rules:
- Keywords must be lowercase.
- Use the exact term from the job description (e.g. "kubernetes", not "container orchestration").
- Weights must be greater than 0 and at most 1.

JOB DESCRIPTION:
{job_description}"#;

/// System prompt for resume tailoring — plain text out, facts preserved.
pub const TAILOR_SYSTEM: &str = "You are an expert resume writer and career coach. \
    You rewrite resumes to better match a specific job description. \
    Respond with the rewritten resume text only — no preamble, no commentary, \
    no markdown code fences.";

/// Resume tailoring prompt template.
/// Replace: {factual_instruction}, {job_description}, {target_role},
///          {industry}, {experience_level}, {keywords}, {resume_text}
pub const TAILOR_PROMPT_TEMPLATE: &str = r#"{factual_instruction}

Rewrite the resume below so it aligns more closely with the job description:
1. Incorporate the listed keywords naturally where the resume already supports them — never keyword-stuff.
2. Highlight the most relevant experience and skills.
3. Use strong action verbs and keep quantified achievements intact.
4. Keep the output ATS-friendly: plain text, clear section headers.
5. Keep the same general structure as the original.

JOB DESCRIPTION:
{job_description}

Target role: {target_role}
Industry: {industry}
Experience level: {experience_level}

KEYWORDS to incorporate naturally:
{keywords}

ORIGINAL RESUME:
{resume_text}"#;

/// Suggestion generation prompt template.
/// Replace: {job_description}, {resume_text}, {missing_keywords}
pub const SUGGESTION_PROMPT_TEMPLATE: &str = r#"Based on the resume and job description below, provide 5-7 specific, actionable suggestions to improve the resume's fit for this role.

Return a JSON array of strings, one suggestion per entry:
["Add a metrics-backed bullet about ...", "..."]

Focus on practical improvements the candidate can implement directly.

JOB DESCRIPTION:
{job_description}

RESUME:
{resume_text}

Keywords missing from the resume: {missing_keywords}"#;

/// Section analysis prompt template. Replace `{resume_text}` before sending.
pub const SECTION_PROMPT_TEMPLATE: &str = r#"Analyze the resume below and identify its main sections.

Return a JSON array with one object per section:
[
  {"section_name": "Experience", "content": "the full text of that section"}
]

Use conventional section names ("Summary", "Experience", "Education", "Skills",
"Projects", "Certifications") where they apply. Include ALL resume text in
exactly one section.

RESUME:
{resume_text}"#;
