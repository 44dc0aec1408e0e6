//! Resume Assembler — turns a committed draft into an enriched, rendered resume.
//!
//! Flow: summarize (raw answers) → translate ×8 (concurrent, order kept) →
//!       enrich ×2 (after fan-in, each only when its inputs exist) → render.
//!
//! Oracle trouble never fails assembly; the adapter has already substituted
//! fallbacks. The only errors are an invalid draft (caught when the draft is
//! built) and a render fault.

pub mod handlers;

use std::time::Instant;

use futures::future::join_all;
use tracing::info;

use crate::errors::AppError;
use crate::models::draft::{EnrichedResume, ResumeDraft};
use crate::models::field::{FieldType, FIELD_COUNT};
use crate::oracle::{Enrichment, OracleAdapter};
use crate::render::{render_off_thread, ResumeFields};

/// Assembles one resume. Each call owns all of its intermediate state.
pub async fn assemble(oracle: &OracleAdapter, draft: &ResumeDraft) -> Result<EnrichedResume, AppError> {
    assemble_answers(oracle, draft.answers()).await
}

/// Same as [`assemble`] on a bare answer array. Blank entries are allowed here
/// and simply skip the oracle.
pub(crate) async fn assemble_answers(
    oracle: &OracleAdapter,
    answers: &[String; FIELD_COUNT],
) -> Result<EnrichedResume, AppError> {
    let started = Instant::now();

    // 1. Summary comes from the untranslated answers.
    let professional_summary = oracle.summarize(answers).await;

    // 2. Fan out the eight translations; join_all yields results in input order.
    let translated = translate_all(oracle, answers).await;

    // 3 + 4. Enrichments need the translated values, so they start after the fan-in.
    let profession = translated[FieldType::Profession.index()].trim();
    let skills = translated[FieldType::Skills.index()].trim();
    let experience = translated[FieldType::Experience.index()].trim();

    let additional_skills = async {
        if profession.is_empty() || skills.is_empty() {
            return String::new();
        }
        oracle
            .enrich(Enrichment::AdditionalSkills { profession, skills })
            .await
    };
    let experience_learnings = async {
        if experience.is_empty() || profession.is_empty() {
            return String::new();
        }
        oracle
            .enrich(Enrichment::ExperienceLearnings {
                experience,
                profession,
            })
            .await
    };
    let (additional_skills, experience_learnings) =
        tokio::join!(additional_skills, experience_learnings);

    // 5. Render. The original contact answer is printed as spoken.
    let fields = ResumeFields {
        translated_answers: translated.clone(),
        original_answers: answers.clone(),
        professional_summary: professional_summary.clone(),
        additional_skills: additional_skills.clone(),
        experience_learnings: experience_learnings.clone(),
    };
    let document_bytes = render_off_thread(fields).await?;

    info!(
        "Resume assembled in {}ms ({} bytes, additional_skills={}, experience_learnings={})",
        started.elapsed().as_millis(),
        document_bytes.len(),
        !additional_skills.is_empty(),
        !experience_learnings.is_empty()
    );

    Ok(EnrichedResume {
        translated_answers: translated,
        professional_summary,
        additional_skills,
        experience_learnings,
        document_bytes,
    })
}

async fn translate_all(oracle: &OracleAdapter, answers: &[String; FIELD_COUNT]) -> [String; FIELD_COUNT] {
    let results = join_all(answers.iter().map(|answer| oracle.translate(answer))).await;

    let mut translated: [String; FIELD_COUNT] = Default::default();
    for (slot, text) in translated.iter_mut().zip(results) {
        *slot = text;
    }
    translated
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::oracle::fallback::summary_template;
    use crate::oracle::testing::{translation_input, StubOracle};

    const SUMMARY_MARKER: &str = "Write a professional summary";

    fn adapter(stub: &Arc<StubOracle>) -> OracleAdapter {
        OracleAdapter::new(stub.clone(), Duration::from_secs(30))
    }

    fn letters() -> [String; FIELD_COUNT] {
        std::array::from_fn(|i| ((b'A' + i as u8) as char).to_string())
    }

    /// Translations append `_t`; later fields finish first.
    fn scripted() -> Arc<StubOracle> {
        StubOracle::with_latency(|prompt| {
            if let Some(text) = translation_input(prompt) {
                let index = (text.as_bytes()[0] - b'A') as u64;
                let delay = Duration::from_millis((FIELD_COUNT as u64).saturating_sub(index) * 10);
                return (delay, Ok(format!("{text}_t")));
            }
            if prompt.contains(SUMMARY_MARKER) {
                return (Duration::ZERO, Ok("A dependable worker.".to_string()));
            }
            (Duration::ZERO, Ok("- Extra item".to_string()))
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_translations_keep_field_order_despite_completion_order() {
        let stub = scripted();
        let resume = assemble_answers(&adapter(&stub), &letters()).await.unwrap();

        let expected: Vec<String> = letters().iter().map(|l| format!("{l}_t")).collect();
        assert_eq!(resume.translated_answers.to_vec(), expected);
    }

    #[tokio::test(start_paused = true)]
    async fn test_summary_runs_first_on_raw_answers_and_enrichment_last() {
        let stub = scripted();
        let mut answers = letters();
        answers[FieldType::Profession.index()] = "الیکٹریشن".to_string();
        let resume = assemble_answers(&adapter(&stub), &answers).await.unwrap();

        let prompts = stub.prompts();
        assert!(prompts[0].contains(SUMMARY_MARKER));
        assert!(prompts[0].contains("الیکٹریشن"));

        let last_translation = prompts
            .iter()
            .rposition(|p| translation_input(p).is_some())
            .unwrap();
        let first_enrichment = prompts
            .iter()
            .position(|p| translation_input(p).is_none() && !p.contains(SUMMARY_MARKER))
            .unwrap();
        assert!(first_enrichment > last_translation);

        assert_eq!(resume.professional_summary, "A dependable worker.");
        assert_eq!(resume.additional_skills, "- Extra item");
        assert_eq!(resume.experience_learnings, "- Extra item");
        assert_eq!(stub.calls(), 1 + FIELD_COUNT + 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_enrichment_skipped_without_profession() {
        let stub = scripted();
        let mut answers = letters();
        answers[FieldType::Profession.index()] = String::new();
        let resume = assemble_answers(&adapter(&stub), &answers).await.unwrap();

        assert_eq!(resume.additional_skills, "");
        assert_eq!(resume.experience_learnings, "");
        assert_eq!(resume.translated_answers[FieldType::Profession.index()], "");
        // summary + seven non-empty translations, nothing else
        assert_eq!(stub.calls(), 1 + FIELD_COUNT - 1);
    }

    #[tokio::test]
    async fn test_unreachable_oracle_still_yields_document() {
        let stub = StubOracle::failing();
        let draft = ResumeDraft::new(vec![
            "Ali".to_string(),
            "Electrician".to_string(),
            "Matric".to_string(),
            "Wiring, repair".to_string(),
            "Two years".to_string(),
            "None".to_string(),
            "Lahore".to_string(),
            "0300 1234567".to_string(),
        ])
        .unwrap();

        let resume = assemble(&adapter(&stub), &draft).await.unwrap();

        assert_eq!(resume.translated_answers, *draft.answers());
        assert_eq!(resume.professional_summary, summary_template(draft.answers()));
        assert_eq!(resume.additional_skills, "");
        assert_eq!(resume.experience_learnings, "");
        assert!(resume.document_bytes.starts_with(b"%PDF"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_same_draft_gives_identical_bytes() {
        let stub = scripted();
        let oracle = adapter(&stub);
        let draft = ResumeDraft::new(letters().to_vec()).unwrap();

        let first = assemble(&oracle, &draft).await.unwrap();
        let second = assemble(&oracle, &draft).await.unwrap();
        assert_eq!(first.document_bytes, second.document_bytes);
        assert_eq!(first, second);
    }
}
