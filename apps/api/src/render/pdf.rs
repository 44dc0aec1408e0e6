//! Paint pass: draws a computed layout onto a PDF with the base-14 Helvetica faces.
//!
//! Output is byte-stable for a given layout. The document id and every date are
//! fixed, XMP metadata is off, and both strings of the file identifier (random
//! on every save) are overwritten with the document id afterwards.

use std::io::BufWriter;

use printpdf::{
    BuiltinFont, Color, CustomPdfConformance, IndirectFontRef, Line, Mm, PdfConformance,
    PdfDocument, PdfLayerReference, Point, Pt, Rgb,
};
use time::OffsetDateTime;

use crate::errors::AppError;
use crate::render::font_metrics::FontStyle;
use crate::render::layout::{DocumentLayout, DrawOp, Ink};

const DOCUMENT_ID: &str = "ASAANCVRESUME0000000000000000001";
const LAYER_NAME: &str = "Resume";
const RULE_THICKNESS_PT: f32 = 0.75;

struct Faces {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    oblique: IndirectFontRef,
}

impl Faces {
    fn get(&self, style: FontStyle) -> &IndirectFontRef {
        match style {
            FontStyle::Regular => &self.regular,
            FontStyle::Bold => &self.bold,
            FontStyle::Oblique => &self.oblique,
        }
    }
}

fn ink_color(ink: Ink) -> Color {
    match ink {
        Ink::Black => Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)),
        Ink::Accent => Color::Rgb(Rgb::new(0.0, 0.0, 1.0, None)),
    }
}

fn mm(pt: f32) -> Mm {
    Mm::from(Pt(pt))
}

/// Paints every page of `layout` and returns the saved PDF bytes.
pub fn paint(layout: &DocumentLayout, title: &str) -> Result<Vec<u8>, AppError> {
    let width = mm(layout.width_pt);
    let height = mm(layout.height_pt);

    let (doc, first_page, first_layer) = PdfDocument::new(title, width, height, LAYER_NAME);
    let doc = doc
        .with_document_id(DOCUMENT_ID.to_string())
        .with_creation_date(OffsetDateTime::UNIX_EPOCH)
        .with_mod_date(OffsetDateTime::UNIX_EPOCH)
        .with_metadata_date(OffsetDateTime::UNIX_EPOCH)
        .with_conformance(PdfConformance::Custom(CustomPdfConformance {
            requires_icc_profile: false,
            requires_xmp_metadata: false,
            ..Default::default()
        }));

    let font = |face: BuiltinFont| {
        doc.add_builtin_font(face)
            .map_err(|e| AppError::Render(format!("PDF font error: {e}")))
    };
    let faces = Faces {
        regular: font(BuiltinFont::Helvetica)?,
        bold: font(BuiltinFont::HelveticaBold)?,
        oblique: font(BuiltinFont::HelveticaOblique)?,
    };

    for (i, page) in layout.pages.iter().enumerate() {
        let layer = if i == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page_index, layer_index) = doc.add_page(width, height, LAYER_NAME);
            doc.get_page(page_index).get_layer(layer_index)
        };
        paint_page(&layer, &page.ops, &faces);
    }

    let mut buf = BufWriter::new(Vec::new());
    doc.save(&mut buf)
        .map_err(|e| AppError::Render(format!("PDF save error: {e}")))?;
    let mut bytes = buf
        .into_inner()
        .map_err(|e| AppError::Render(format!("PDF buffer error: {e}")))?;

    pin_file_id(&mut bytes)?;
    Ok(bytes)
}

fn paint_page(layer: &PdfLayerReference, ops: &[DrawOp], faces: &Faces) {
    layer.set_outline_color(ink_color(Ink::Black));
    layer.set_outline_thickness(RULE_THICKNESS_PT);

    let mut current_ink = None;
    for op in ops {
        match op {
            DrawOp::Text {
                x,
                y,
                size,
                style,
                ink,
                text,
            } => {
                if current_ink != Some(*ink) {
                    layer.set_fill_color(ink_color(*ink));
                    current_ink = Some(*ink);
                }
                layer.use_text(text.as_str(), *size, mm(*x), mm(*y), faces.get(*style));
            }
            DrawOp::Rule { x1, x2, y } => {
                layer.add_line(Line {
                    points: vec![
                        (Point::new(mm(*x1), mm(*y)), false),
                        (Point::new(mm(*x2), mm(*y)), false),
                    ],
                    is_closed: false,
                });
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// File identifier pinning
// ────────────────────────────────────────────────────────────────────────────

/// Overwrites both strings of the last `/ID` array with [`DOCUMENT_ID`].
///
/// The array may sit in a classic `trailer` or in a cross-reference stream
/// dictionary. Each string is rewritten in place only when its encoded length
/// matches the pinned id, so no xref offset moves.
fn pin_file_id(pdf: &mut [u8]) -> Result<(), AppError> {
    let id_key = last_id_key(pdf)
        .ok_or_else(|| AppError::Render("PDF file identifier not found".to_string()))?;

    let first = string_span(pdf, id_key + 3)
        .ok_or_else(|| AppError::Render("PDF file identifier is malformed".to_string()))?;
    let second = string_span(pdf, first.end + 1)
        .ok_or_else(|| AppError::Render("PDF file identifier is malformed".to_string()))?;

    for span in [first, second] {
        let pinned = match span.delimiter {
            b'(' => DOCUMENT_ID.as_bytes().to_vec(),
            _ => hex_encode(DOCUMENT_ID.as_bytes()),
        };
        if span.end - span.start != pinned.len() {
            return Err(AppError::Render(format!(
                "PDF file identifier has unexpected length {}",
                span.end - span.start
            )));
        }
        pdf[span.start..span.end].copy_from_slice(&pinned);
    }
    Ok(())
}

/// Position of the last `/ID` key that is followed by its array.
fn last_id_key(pdf: &[u8]) -> Option<usize> {
    pdf.windows(4).rposition(|w| {
        &w[..3] == b"/ID" && (w[3] == b'[' || w[3].is_ascii_whitespace())
    })
}

struct StringSpan {
    delimiter: u8,
    start: usize,
    end: usize,
}

/// Content span of the next literal `(..)` or hex `<..>` string at or after `from`,
/// skipping whitespace and an opening `[`.
fn string_span(pdf: &[u8], from: usize) -> Option<StringSpan> {
    let mut pos = from;
    while pos < pdf.len() && (pdf[pos].is_ascii_whitespace() || pdf[pos] == b'[') {
        pos += 1;
    }
    let delimiter = *pdf.get(pos)?;
    let close = match delimiter {
        b'(' => b')',
        b'<' => b'>',
        _ => return None,
    };
    let start = pos + 1;
    let len = pdf.get(start..)?.iter().position(|&b| b == close)?;
    Some(StringSpan {
        delimiter,
        start,
        end: start + len,
    })
}

fn hex_encode(bytes: &[u8]) -> Vec<u8> {
    bytes
        .iter()
        .flat_map(|b| format!("{b:02X}").into_bytes())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::layout::{a4_page_config, layout_resume, ResumeFields};

    fn pinned_array() -> String {
        format!("/ID[({DOCUMENT_ID})({DOCUMENT_ID})]")
    }

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|w| w == needle)
    }

    #[test]
    fn test_painted_pdf_carries_pinned_file_id() {
        let layout = layout_resume(&ResumeFields::default(), &a4_page_config());
        let bytes = paint(&layout, "Resume").unwrap();

        assert!(contains(&bytes, pinned_array().as_bytes()));
    }

    #[test]
    fn test_painting_twice_gives_identical_bytes() {
        let layout = layout_resume(&ResumeFields::default(), &a4_page_config());
        let first = paint(&layout, "Resume").unwrap();
        let second = paint(&layout, "Resume").unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_pin_file_id_in_xref_stream_dictionary() {
        let mut pdf = format!(
            "15 0 obj\n<</Root 14 0 R/Info 6 0 R/ID[({})({})]/Type/XRef>>",
            "HEIGIDGCBAAHFGBHAEFHCBHGAJHCJDHF", "IFGJFJGABCDEFGHIJABCDEFGHIJABCDE"
        )
        .into_bytes();

        pin_file_id(&mut pdf).unwrap();
        assert!(contains(&pdf, pinned_array().as_bytes()));
    }

    #[test]
    fn test_pin_file_id_hex_strings_with_spaces() {
        let random = "41".repeat(32);
        let mut pdf = format!("trailer\n<< /ID [ <{random}> <{random}> ] >>").into_bytes();

        pin_file_id(&mut pdf).unwrap();
        let hex = String::from_utf8(hex_encode(DOCUMENT_ID.as_bytes())).unwrap();
        assert!(contains(&pdf, format!("<{hex}> <{hex}>").as_bytes()));
    }

    #[test]
    fn test_pin_file_id_uses_last_array() {
        let earlier = "/ID[(AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA)(BBBBBBBBBBBBBBBBBBBBBBBBBBBBBBBB)]";
        let later = "/ID[(CCCCCCCCCCCCCCCCCCCCCCCCCCCCCCCC)(DDDDDDDDDDDDDDDDDDDDDDDDDDDDDDDD)]";
        let mut pdf = format!("{earlier} {later}").into_bytes();

        pin_file_id(&mut pdf).unwrap();
        assert_eq!(pdf, format!("{earlier} {}", pinned_array()).into_bytes());
    }

    #[test]
    fn test_pin_file_id_rejects_length_mismatch() {
        let mut pdf = b"<</ID[(AAAA)(BB)]>>".to_vec();
        assert!(matches!(pin_file_id(&mut pdf), Err(AppError::Render(_))));
    }

    #[test]
    fn test_pin_file_id_without_identifier_is_an_error() {
        let mut pdf = b"%PDF-1.3 no identifier here".to_vec();
        assert!(matches!(pin_file_id(&mut pdf), Err(AppError::Render(_))));
    }

    #[test]
    fn test_document_id_is_32_chars() {
        assert_eq!(DOCUMENT_ID.len(), 32);
    }
}
