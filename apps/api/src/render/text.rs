//! Text shaping for the resume body: bullet extraction, casing, wrapping, and
//! reduction to the character set the built-in PDF fonts can show.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::render::font_metrics::{get_metrics, FontStyle};

static TRAILING_AND: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\s+and\s*$").unwrap());
static LEADING_AND: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^and\s+").unwrap());

/// Splits a comma-separated skills answer into display bullets.
///
/// Each token is trimmed, loses a dangling "and", and is sentence-cased.
/// Short all-caps words (acronyms such as "AC") keep their casing.
pub fn skill_bullets(skills: &str) -> Vec<String> {
    skills
        .split(',')
        .map(str::trim)
        .map(|token| TRAILING_AND.replace(token, ""))
        .map(|token| LEADING_AND.replace(&token, "").trim().to_string())
        .filter(|token| !token.is_empty() && !token.eq_ignore_ascii_case("and"))
        .map(|token| sentence_case(&token))
        .collect()
}

/// Splits an oracle-generated block into lines, dropping blank lines and any
/// leading list marker ("-", "•", "*").
pub fn marker_lines(block: &str) -> Vec<String> {
    block
        .lines()
        .map(|line| line.trim().trim_start_matches(&['-', '•', '*'][..]).trim())
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

fn sentence_case(token: &str) -> String {
    let cased: Vec<String> = token
        .split(' ')
        .enumerate()
        .map(|(i, word)| {
            if is_acronym(word) {
                word.to_string()
            } else if i == 0 {
                capitalize_first(&word.to_lowercase())
            } else {
                word.to_lowercase()
            }
        })
        .collect();
    cased.join(" ")
}

fn is_acronym(word: &str) -> bool {
    let len = word.chars().count();
    (2..=4).contains(&len) && word.chars().all(|c| c.is_ascii_uppercase())
}

fn capitalize_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Replaces characters the WinAnsi-encoded built-in fonts cannot show.
pub fn to_winansi(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            ' '..='~' | '\u{A0}'..='\u{FF}' => c,
            '•' | '–' | '—' | '‘' | '’' | '“' | '”' | '…' | '€' => c,
            '\t' | '\n' | '\r' => ' ',
            _ => '?',
        })
        .collect()
}

/// Greedy word wrap at `max_width_pt`. Words wider than a full line are split
/// by character. Always returns at least one line.
pub fn wrap_text(text: &str, style: FontStyle, size_pt: f32, max_width_pt: f32) -> Vec<String> {
    let metrics = get_metrics(style);
    let fits = |s: &str| metrics.measure_pt(s, size_pt) <= max_width_pt;

    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };
        if fits(&candidate) {
            current = candidate;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if fits(word) {
            current = word.to_string();
            continue;
        }

        for c in word.chars() {
            current.push(c);
            if !fits(&current) && current.chars().count() > 1 {
                current.pop();
                lines.push(std::mem::take(&mut current));
                current.push(c);
            }
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}
