//! Resume Store — session-scoped persistence of generated resumes.
//!
//! Row data lives in PostgreSQL; the PDF itself lives in S3 under
//! `resumes/<session>/<id>.pdf`. Every read and delete is scoped by session id,
//! so one session can never see another session's resumes.

pub mod handlers;

use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::draft::{EnrichedResume, ResumeDraft};
use crate::models::resume::{ResumeRow, ResumeStats};

/// Where a resume's PDF is stored.
pub fn pdf_key(session_id: &str, resume_id: Uuid) -> String {
    format!("resumes/{session_id}/{resume_id}.pdf")
}

/// Parameters for persisting one generated resume.
pub struct NewResume<'a> {
    pub session_id: &'a str,
    pub draft: &'a ResumeDraft,
    pub resume: &'a EnrichedResume,
}

/// Uploads the PDF, then records the row. If the row cannot be written the
/// uploaded object is removed again.
pub async fn insert(
    pool: &PgPool,
    s3: &aws_sdk_s3::Client,
    s3_bucket: &str,
    params: NewResume<'_>,
) -> Result<ResumeRow, AppError> {
    let NewResume {
        session_id,
        draft,
        resume,
    } = params;
    let id = Uuid::new_v4();
    let key = pdf_key(session_id, id);

    s3.put_object()
        .bucket(s3_bucket)
        .key(&key)
        .body(ByteStream::from(resume.document_bytes.clone()))
        .content_type("application/pdf")
        .send()
        .await
        .map_err(|e| AppError::S3(format!("upload of {key} failed: {e}")))?;

    let row = sqlx::query_as::<_, ResumeRow>(
        r#"
        INSERT INTO resumes
            (id, session_id, answers, translated_answers, professional_summary,
             additional_skills, experience_learnings, s3_pdf_key)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(session_id)
    .bind(draft.answers().to_vec())
    .bind(resume.translated_answers.to_vec())
    .bind(&resume.professional_summary)
    .bind(&resume.additional_skills)
    .bind(&resume.experience_learnings)
    .bind(&key)
    .fetch_one(pool)
    .await;

    let row = match row {
        Ok(row) => row,
        Err(e) => {
            remove_object(s3, s3_bucket, &key).await;
            return Err(e.into());
        }
    };

    info!(
        "Stored resume {id} ({} bytes) at s3://{s3_bucket}/{key}",
        resume.document_bytes.len()
    );
    Ok(row)
}

/// All resumes of a session, newest first. No document bytes.
pub async fn list_for_session(pool: &PgPool, session_id: &str) -> Result<Vec<ResumeRow>, AppError> {
    Ok(sqlx::query_as::<_, ResumeRow>(
        "SELECT * FROM resumes WHERE session_id = $1 ORDER BY created_at DESC",
    )
    .bind(session_id)
    .fetch_all(pool)
    .await?)
}

/// The stored PDF of one resume, if it belongs to `session_id`.
pub async fn fetch_pdf(
    pool: &PgPool,
    s3: &aws_sdk_s3::Client,
    s3_bucket: &str,
    session_id: &str,
    resume_id: Uuid,
) -> Result<Bytes, AppError> {
    let key: Option<String> = sqlx::query_scalar(
        "SELECT s3_pdf_key FROM resumes WHERE id = $1 AND session_id = $2",
    )
    .bind(resume_id)
    .bind(session_id)
    .fetch_optional(pool)
    .await?;
    let key = key.ok_or_else(|| AppError::NotFound("Resume not found".to_string()))?;

    let object = s3
        .get_object()
        .bucket(s3_bucket)
        .key(&key)
        .send()
        .await
        .map_err(|e| AppError::S3(format!("download of {key} failed: {e}")))?;
    let body = object
        .body
        .collect()
        .await
        .map_err(|e| AppError::S3(format!("reading {key} failed: {e}")))?;

    Ok(body.into_bytes())
}

/// Deletes one resume of a session: the row first, then its object.
pub async fn delete(
    pool: &PgPool,
    s3: &aws_sdk_s3::Client,
    s3_bucket: &str,
    session_id: &str,
    resume_id: Uuid,
) -> Result<(), AppError> {
    let key: Option<String> = sqlx::query_scalar(
        "DELETE FROM resumes WHERE id = $1 AND session_id = $2 RETURNING s3_pdf_key",
    )
    .bind(resume_id)
    .bind(session_id)
    .fetch_optional(pool)
    .await?;
    let key = key.ok_or_else(|| AppError::NotFound("Resume not found".to_string()))?;

    remove_object(s3, s3_bucket, &key).await;
    info!("Deleted resume {resume_id}");
    Ok(())
}

/// Counts for one session. "Today" starts at midnight UTC.
pub async fn stats(pool: &PgPool, session_id: &str) -> Result<ResumeStats, AppError> {
    Ok(sqlx::query_as::<_, ResumeStats>(
        r#"
        SELECT
            COUNT(*) AS total_resumes,
            COUNT(*) FILTER (WHERE created_at >= date_trunc('day', NOW() AT TIME ZONE 'UTC') AT TIME ZONE 'UTC') AS today_resumes,
            MAX(created_at) AS last_created
        FROM resumes
        WHERE session_id = $1
        "#,
    )
    .bind(session_id)
    .fetch_one(pool)
    .await?)
}

/// Best effort: a leftover object is logged, not surfaced.
async fn remove_object(s3: &aws_sdk_s3::Client, s3_bucket: &str, key: &str) {
    if let Err(e) = s3.delete_object().bucket(s3_bucket).key(key).send().await {
        warn!("Could not remove s3://{s3_bucket}/{key}: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_key_is_scoped_by_session() {
        let id = Uuid::nil();
        assert_eq!(
            pdf_key("abc123", id),
            "resumes/abc123/00000000-0000-0000-0000-000000000000.pdf"
        );
    }
}
