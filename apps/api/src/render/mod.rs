// Document Renderer: resume fields in, PDF bytes out.
// Layout is computed first as plain draw operations, then painted with printpdf.
// Rendering is CPU-bound; async callers go through `render_off_thread`.

pub mod font_metrics;
pub mod layout;
pub mod pdf;
pub mod text;

pub use layout::ResumeFields;

use crate::errors::AppError;

const DOCUMENT_TITLE: &str = "Resume";

/// Renders the resume. Pure: no I/O, no oracle calls, same input gives the same bytes.
pub fn render(fields: &ResumeFields) -> Result<Vec<u8>, AppError> {
    let page = layout::a4_page_config();
    let document = layout::layout_resume(fields, &page);
    pdf::paint(&document, DOCUMENT_TITLE)
}

/// Runs `render` on the blocking pool.
pub async fn render_off_thread(fields: ResumeFields) -> Result<Vec<u8>, AppError> {
    tokio::task::spawn_blocking(move || render(&fields))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in render: {e}")))?
}
