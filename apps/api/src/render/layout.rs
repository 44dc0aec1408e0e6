//! Layout pass: turns resume fields into positioned draw operations.
//!
//! Coordinates are PDF points with the origin at the bottom-left of the page.
//! A text op's `y` is its baseline. Nothing here touches the PDF library, so the
//! whole pass is testable on plain values.

use crate::models::field::{FieldType, FIELD_COUNT};
use crate::render::font_metrics::{get_metrics, FontStyle};
use crate::render::text::{marker_lines, skill_bullets, to_winansi, wrap_text};

pub const SUMMARY_HEADING: &str = "PROFESSIONAL SUMMARY";
pub const SKILLS_HEADING: &str = "SKILLS";
pub const EXPERIENCE_HEADING: &str = "EXPERIENCE";
pub const EDUCATION_HEADING: &str = "EDUCATION";
pub const CERTIFICATIONS_HEADING: &str = "CERTIFICATIONS";
pub const FOOTER_TEXT: &str = "This resume was generated by AsaanCV";

/// Section headings in the order they appear on the page.
pub const SECTION_HEADINGS: [&str; 5] = [
    SUMMARY_HEADING,
    SKILLS_HEADING,
    EXPERIENCE_HEADING,
    EDUCATION_HEADING,
    CERTIFICATIONS_HEADING,
];

const BULLET: &str = "•";

// ────────────────────────────────────────────────────────────────────────────
// Page geometry
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct PageConfig {
    pub width_pt: f32,
    pub height_pt: f32,
    pub margin_pt: f32,
    pub name_size: f32,
    pub subtitle_size: f32,
    pub heading_size: f32,
    pub body_size: f32,
    pub footer_size: f32,
    /// Baseline-to-baseline distance as a multiple of the font size.
    pub leading: f32,
    pub section_gap_pt: f32,
    pub intra_gap_pt: f32,
    pub bullet_indent_pt: f32,
}

impl PageConfig {
    pub fn content_width(&self) -> f32 {
        self.width_pt - 2.0 * self.margin_pt
    }

    fn line_height(&self, size: f32) -> f32 {
        size * self.leading
    }
}

/// A4 portrait, 50pt margins on every side.
pub fn a4_page_config() -> PageConfig {
    PageConfig {
        width_pt: 595.28,
        height_pt: 841.89,
        margin_pt: 50.0,
        name_size: 16.0,
        subtitle_size: 12.0,
        heading_size: 14.0,
        body_size: 11.0,
        footer_size: 10.0,
        leading: 1.2,
        section_gap_pt: 14.0,
        intra_gap_pt: 5.0,
        bullet_indent_pt: 12.0,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Input and output types
// ────────────────────────────────────────────────────────────────────────────

/// Everything the renderer needs. Built by the assembler from an enriched resume.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResumeFields {
    pub translated_answers: [String; FIELD_COUNT],
    /// Untranslated answers. Only the contact entry is printed from here.
    pub original_answers: [String; FIELD_COUNT],
    pub professional_summary: String,
    pub additional_skills: String,
    pub experience_learnings: String,
}

impl ResumeFields {
    fn translated(&self, field: FieldType) -> &str {
        self.translated_answers[field.index()].trim()
    }

    fn original(&self, field: FieldType) -> &str {
        self.original_answers[field.index()].trim()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ink {
    Black,
    Accent,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Text {
        x: f32,
        y: f32,
        size: f32,
        style: FontStyle,
        ink: Ink,
        text: String,
    },
    /// Horizontal rule at height `y`.
    Rule { x1: f32, x2: f32, y: f32 },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub ops: Vec<DrawOp>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DocumentLayout {
    pub width_pt: f32,
    pub height_pt: f32,
    pub pages: Vec<Page>,
}

#[cfg(test)]
impl DocumentLayout {
    /// All text runs in paint order, across pages.
    pub fn text_runs(&self) -> impl Iterator<Item = &str> {
        self.pages.iter().flat_map(|p| &p.ops).filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            DrawOp::Rule { .. } => None,
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Layout
// ────────────────────────────────────────────────────────────────────────────

fn or_fallback<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() {
        fallback
    } else {
        value
    }
}

/// Lays out the full resume. Pure and deterministic.
pub fn layout_resume(fields: &ResumeFields, config: &PageConfig) -> DocumentLayout {
    let mut c = Composer::new(config);

    // Header
    c.centered(
        or_fallback(fields.translated(FieldType::Name), "Name"),
        FontStyle::Bold,
        config.name_size,
    );
    c.gap(config.intra_gap_pt * 0.5);
    let profession = format!(
        "[{}]",
        or_fallback(fields.translated(FieldType::Profession), "Profession")
    );
    c.centered(&profession, FontStyle::Regular, config.subtitle_size);
    c.centered(
        or_fallback(fields.translated(FieldType::Address), "Address"),
        FontStyle::Regular,
        config.subtitle_size,
    );
    c.centered(
        or_fallback(fields.original(FieldType::Contact), "Phone"),
        FontStyle::Regular,
        config.subtitle_size,
    );
    c.gap(config.section_gap_pt);

    c.heading(SUMMARY_HEADING);
    c.paragraph(fields.professional_summary.trim(), FontStyle::Regular);

    c.heading(SKILLS_HEADING);
    for skill in skill_bullets(fields.translated(FieldType::Skills)) {
        c.bullet(&skill);
    }
    for skill in marker_lines(&fields.additional_skills) {
        c.bullet(&skill);
    }

    c.heading(EXPERIENCE_HEADING);
    match fields.translated(FieldType::Experience) {
        "" => c.paragraph("No experience", FontStyle::Oblique),
        experience => c.paragraph(experience, FontStyle::Bold),
    }
    let learnings = marker_lines(&fields.experience_learnings);
    if !learnings.is_empty() {
        c.gap(config.intra_gap_pt);
    }
    for learning in learnings {
        c.bullet(&learning);
    }

    c.heading(EDUCATION_HEADING);
    c.paragraph(
        or_fallback(fields.translated(FieldType::Education), "Education"),
        FontStyle::Regular,
    );

    c.heading(CERTIFICATIONS_HEADING);
    c.paragraph(
        or_fallback(fields.translated(FieldType::Certifications), "No certifications"),
        FontStyle::Regular,
    );

    c.gap(config.section_gap_pt * 2.0);
    c.centered(FOOTER_TEXT, FontStyle::Oblique, config.footer_size);

    c.finish()
}

/// Cursor-driven writer. `cursor` is the top of the next line box.
struct Composer<'a> {
    config: &'a PageConfig,
    done: Vec<Page>,
    page: Page,
    cursor: f32,
}

impl<'a> Composer<'a> {
    fn new(config: &'a PageConfig) -> Self {
        Self {
            config,
            done: Vec::new(),
            page: Page::default(),
            cursor: config.height_pt - config.margin_pt,
        }
    }

    fn top(&self) -> f32 {
        self.config.height_pt - self.config.margin_pt
    }

    /// Starts a new page unless `needed` points still fit above the bottom margin.
    fn ensure_room(&mut self, needed: f32) {
        if self.cursor - needed >= self.config.margin_pt || self.page.ops.is_empty() {
            return;
        }
        self.done.push(std::mem::take(&mut self.page));
        self.cursor = self.top();
    }

    fn gap(&mut self, amount: f32) {
        self.cursor -= amount;
    }

    /// Reserves one line at `size` and returns its baseline.
    fn next_baseline(&mut self, size: f32) -> f32 {
        let height = self.config.line_height(size);
        self.ensure_room(height);
        // A gap may have pushed the cursor off a page that was then left empty.
        if self.page.ops.is_empty() && self.cursor - height < self.config.margin_pt {
            self.cursor = self.top();
        }
        let baseline = self.cursor - size;
        self.cursor -= height;
        baseline
    }

    fn text(&mut self, x: f32, y: f32, size: f32, style: FontStyle, ink: Ink, text: String) {
        self.page.ops.push(DrawOp::Text {
            x,
            y,
            size,
            style,
            ink,
            text,
        });
    }

    fn centered(&mut self, text: &str, style: FontStyle, size: f32) {
        let width = self.config.content_width();
        let metrics = get_metrics(style);
        for line in wrap_text(&to_winansi(text), style, size, width) {
            let slack = (width - metrics.measure_pt(&line, size)).max(0.0);
            let x = self.config.margin_pt + slack / 2.0;
            let y = self.next_baseline(size);
            self.text(x, y, size, style, Ink::Black, line);
        }
    }

    fn paragraph(&mut self, text: &str, style: FontStyle) {
        let size = self.config.body_size;
        let x = self.config.margin_pt;
        for line in wrap_text(&to_winansi(text), style, size, self.config.content_width()) {
            let y = self.next_baseline(size);
            self.text(x, y, size, style, Ink::Black, line);
        }
    }

    /// A bulleted item with a hanging indent.
    fn bullet(&mut self, text: &str) {
        let size = self.config.body_size;
        let marker_x = self.config.margin_pt;
        let text_x = marker_x + self.config.bullet_indent_pt;
        let width = self.config.content_width() - self.config.bullet_indent_pt;

        let lines = wrap_text(&to_winansi(text), FontStyle::Regular, size, width);
        for (i, line) in lines.into_iter().enumerate() {
            let y = self.next_baseline(size);
            if i == 0 {
                self.text(marker_x, y, size, FontStyle::Regular, Ink::Black, BULLET.to_string());
            }
            self.text(text_x, y, size, FontStyle::Regular, Ink::Black, line);
        }
    }

    /// Accent-coloured heading with a margin-to-margin rule beneath it.
    fn heading(&mut self, title: &str) {
        let cfg = self.config;
        self.gap(cfg.section_gap_pt);
        // Keep the heading on the same page as its first body line.
        self.ensure_room(
            cfg.line_height(cfg.heading_size) + cfg.intra_gap_pt + cfg.line_height(cfg.body_size),
        );

        let y = self.next_baseline(cfg.heading_size);
        self.text(
            cfg.margin_pt,
            y,
            cfg.heading_size,
            FontStyle::Bold,
            Ink::Accent,
            title.to_string(),
        );
        self.page.ops.push(DrawOp::Rule {
            x1: cfg.margin_pt,
            x2: cfg.width_pt - cfg.margin_pt,
            y: y - cfg.heading_size * 0.3,
        });
        self.gap(cfg.intra_gap_pt);
    }

    fn finish(mut self) -> DocumentLayout {
        self.done.push(self.page);
        DocumentLayout {
            width_pt: self.config.width_pt,
            height_pt: self.config.height_pt,
            pages: self.done,
        }
    }
}
