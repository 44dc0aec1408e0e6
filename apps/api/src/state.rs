use aws_sdk_s3::Client as S3Client;
use sqlx::PgPool;

use crate::config::Config;
use crate::oracle::OracleAdapter;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub s3: S3Client,
    /// Fallback-guarded access to the text oracle. Cheap to clone.
    pub oracle: OracleAdapter,
    pub config: Config,
}
