//! Persisted analysis rows and their queries.
//!
//! One row per analyzed document: the aggregate report flattened into JSON
//! text columns plus the raw per-chunk results, keyed by filename, role
//! hint, and timestamp.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

use crate::analysis::report::DocumentAnalysis;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AnalysisRow {
    pub id: String,
    pub filename: String,
    pub job_role: Option<String>,
    pub analysis_time: DateTime<Utc>,
    pub overall_score: i64,
    pub scores_json: String,
    pub feedback_json: String,
    pub recommendations: String,
    pub pros_json: String,
    pub cons_json: String,
    /// The ordered per-chunk parsed results as a JSON array (null entries
    /// for failed segments), kept for audit and re-aggregation.
    pub raw_response: String,
}

/// Listing view: report bodies omitted.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct AnalysisSummaryRow {
    pub id: String,
    pub filename: String,
    pub job_role: Option<String>,
    pub analysis_time: DateTime<Utc>,
    pub overall_score: i64,
}

impl AnalysisRow {
    /// Flattens a completed document analysis into a persistable row.
    pub fn from_analysis(
        filename: &str,
        job_role: Option<&str>,
        analysis: &DocumentAnalysis,
    ) -> Result<Self> {
        let report = &analysis.report;
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            filename: filename.to_string(),
            job_role: job_role.map(str::to_string),
            analysis_time: Utc::now(),
            overall_score: report.overall_score,
            scores_json: serde_json::to_string(&report.scores)?,
            feedback_json: serde_json::to_string(&report.feedback)?,
            recommendations: report.recommendations.clone(),
            pros_json: serde_json::to_string(&report.pros)?,
            cons_json: serde_json::to_string(&report.cons)?,
            raw_response: serde_json::to_string(&analysis.chunk_results)?,
        })
    }
}

pub async fn insert_analysis(pool: &SqlitePool, row: &AnalysisRow) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO analyses (
            id, filename, job_role, analysis_time, overall_score,
            scores_json, feedback_json, recommendations,
            pros_json, cons_json, raw_response
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&row.id)
    .bind(&row.filename)
    .bind(&row.job_role)
    .bind(row.analysis_time)
    .bind(row.overall_score)
    .bind(&row.scores_json)
    .bind(&row.feedback_json)
    .bind(&row.recommendations)
    .bind(&row.pros_json)
    .bind(&row.cons_json)
    .bind(&row.raw_response)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn list_analyses(pool: &SqlitePool) -> Result<Vec<AnalysisSummaryRow>, sqlx::Error> {
    sqlx::query_as(
        "SELECT id, filename, job_role, analysis_time, overall_score \
         FROM analyses ORDER BY analysis_time DESC",
    )
    .fetch_all(pool)
    .await
}

pub async fn get_analysis(
    pool: &SqlitePool,
    id: &str,
) -> Result<Option<AnalysisRow>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM analyses WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}
