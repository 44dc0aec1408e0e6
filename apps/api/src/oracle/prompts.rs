// All prompt templates for the oracle adapter.
// Reuses cross-cutting fragments from llm_client::prompts.

/// Validation prompt. Replace: {task}, {speech_note}, {answer}
pub const VALIDATION_PROMPT_TEMPLATE: &str = r#"You are checking one answer in a spoken resume interview.

TASK:
{task}

{speech_note}

Return a JSON object with this EXACT schema (no extra fields):
{
  "valid": true,
  "message": "one short sentence in Urdu telling the user whether the answer was understood",
  "extractedInfo": "the extracted value, in the language it was spoken"
}

Rules:
- "valid" is false when the answer is unrelated to the task, empty, or unintelligible.
- "extractedInfo" is an empty string when "valid" is false.

ANSWER:
{answer}"#;

/// Translation prompt. Replace: {text}
pub const TRANSLATION_PROMPT_TEMPLATE: &str = r#"Translate the following resume answer into clear, professional English.
If it is already English, only correct spelling and capitalization.
Keep names, places, and numbers as they are. Return the translation only.

TEXT:
{text}"#;

/// Professional summary prompt.
/// Replace: {name}, {profession}, {education}, {skills}, {experience}, {certifications}
pub const SUMMARY_PROMPT_TEMPLATE: &str = r#"Write a professional summary for a resume in English, 2 to 3 sentences, third person, no name.
The details below may be in Urdu; understand them and write in English.
Do not invent employers, degrees, or numbers that are not given.

Name: {name}
Profession: {profession}
Education: {education}
Skills: {skills}
Experience: {experience}
Certifications: {certifications}"#;

/// Additional skills prompt. Replace: {profession}, {skills}
pub const ADDITIONAL_SKILLS_PROMPT_TEMPLATE: &str = r#"A {profession} lists these skills on a resume: {skills}

Suggest 3 to 5 additional, closely related skills that someone in this profession typically has.
Do not repeat the listed skills.
Return one skill per line, each line starting with "- ", a few words each, nothing else."#;

/// Experience learnings prompt. Replace: {experience}, {profession}
pub const EXPERIENCE_LEARNINGS_PROMPT_TEMPLATE: &str = r#"A {profession} describes their work experience as: {experience}

Write 3 to 4 short resume bullet points describing what they learned and achieved through this experience.
Stay faithful to the description; do not invent employers or numbers.
Return one bullet per line, each line starting with "• ", nothing else."#;

/// Placeholder used in prompts for answers that are missing.
pub const NOT_PROVIDED: &str = "Not provided";
