// Shared prompt fragments.
// Each component that talks to the oracle keeps its own prompts.rs alongside it.
// This file contains the cross-cutting pieces.

/// System prompt that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// System prompt for free-text tasks (translation, prose, bullets).
pub const PLAIN_TEXT_SYSTEM: &str = "You are a careful resume writer for skilled workers in Pakistan. \
    Respond with the requested text only. \
    Do NOT add headings, quotation marks, markdown, or commentary.";

/// Reminder appended to every prompt that carries spoken input.
pub const SPEECH_INPUT_NOTE: &str = "\
    The answer was captured with Urdu speech recognition and may contain \
    misheard words, missing punctuation, or a mix of Urdu and English. \
    Interpret it charitably.";
