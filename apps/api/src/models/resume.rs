use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A persisted resume. Document bytes live in object storage under `s3_pdf_key`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ResumeRow {
    pub id: Uuid,
    pub session_id: String,
    pub answers: Vec<String>,
    pub translated_answers: Vec<String>,
    pub professional_summary: String,
    pub additional_skills: String,
    pub experience_learnings: String,
    #[serde(skip_serializing)]
    pub s3_pdf_key: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SessionRow {
    pub session_id: String,
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ResumeStats {
    pub total_resumes: i64,
    pub today_resumes: i64,
    pub last_created: Option<DateTime<Utc>>,
}
