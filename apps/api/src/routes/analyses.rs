//! Analysis endpoints: batch upload-and-analyze, listing, and fetch.

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use bytes::Bytes;
use serde::Serialize;
use tracing::{error, info, warn};

use crate::analysis::report::AggregateReport;
use crate::analysis::{analyze_document, ChunkSettings};
use crate::config::MAX_FILES_PER_BATCH;
use crate::errors::AppError;
use crate::extract::extract_text;
use crate::models::analysis::{
    get_analysis, insert_analysis, list_analyses, AnalysisRow, AnalysisSummaryRow,
};
use crate::state::AppState;
use crate::validation::{
    sanitize_filename, validate_chunk_params, validate_extracted_text, validate_target_role,
    validate_upload,
};

/// Outcome for one document in a batch. The batch itself always completes.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DocumentOutcome {
    Completed {
        filename: String,
        id: String,
        segment_count: usize,
        failed_segments: usize,
        report: AggregateReport,
    },
    Failed {
        filename: String,
        error: String,
    },
}

#[derive(Debug, Serialize)]
pub struct BatchResponse {
    pub provider: &'static str,
    pub documents: Vec<DocumentOutcome>,
}

struct UploadedFile {
    filename: String,
    bytes: Bytes,
}

struct BatchRequest {
    files: Vec<UploadedFile>,
    target_role: Option<String>,
    settings: ChunkSettings,
}

/// POST /api/v1/analyses
///
/// Multipart body: one or more `file` parts (pdf/txt) plus optional
/// `target_role`, `chunk_size`, and `chunk_overlap` text parts. Documents
/// are analyzed sequentially; per-document failures are reported inline and
/// never abort the batch.
pub async fn handle_analyze_batch(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<BatchResponse>, AppError> {
    let request = read_batch_request(multipart).await?;

    info!(
        "starting batch analysis: {} file(s), provider={}",
        request.files.len(),
        state.provider.name()
    );

    let mut documents = Vec::with_capacity(request.files.len());
    for file in &request.files {
        let outcome = analyze_one(&state, file, &request).await;
        documents.push(outcome);
    }

    Ok(Json(BatchResponse {
        provider: state.provider.name(),
        documents,
    }))
}

/// GET /api/v1/analyses
pub async fn handle_list_analyses(
    State(state): State<AppState>,
) -> Result<Json<Vec<AnalysisSummaryRow>>, AppError> {
    let rows = list_analyses(&state.db).await?;
    Ok(Json(rows))
}

/// GET /api/v1/analyses/:id
pub async fn handle_get_analysis(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<AnalysisRow>, AppError> {
    let row = get_analysis(&state.db, &id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Analysis {id} not found")))?;
    Ok(Json(row))
}

/// Drains the multipart stream and validates the batch-level inputs.
async fn read_batch_request(mut multipart: Multipart) -> Result<BatchRequest, AppError> {
    let mut files = Vec::new();
    let mut target_role: Option<String> = None;
    let mut chunk_size: Option<usize> = None;
    let mut chunk_overlap: Option<usize> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let filename = sanitize_filename(field.file_name().unwrap_or_default());
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;
                files.push(UploadedFile { filename, bytes });
            }
            "target_role" => {
                let value = read_text_field(field, "target_role").await?;
                if !value.trim().is_empty() {
                    target_role = Some(value.trim().to_string());
                }
            }
            "chunk_size" => {
                chunk_size = Some(read_usize_field(field, "chunk_size").await?);
            }
            "chunk_overlap" => {
                chunk_overlap = Some(read_usize_field(field, "chunk_overlap").await?);
            }
            other => {
                warn!("ignoring unknown multipart field '{other}'");
            }
        }
    }

    if files.is_empty() {
        return Err(AppError::Validation("No files uploaded".to_string()));
    }
    if files.len() > MAX_FILES_PER_BATCH {
        return Err(AppError::Validation(format!(
            "Too many files ({}). Maximum allowed: {MAX_FILES_PER_BATCH}",
            files.len()
        )));
    }

    if let Some(role) = &target_role {
        validate_target_role(role).map_err(AppError::Validation)?;
    }

    let defaults = ChunkSettings::default();
    let settings = ChunkSettings {
        size: chunk_size.unwrap_or(defaults.size),
        overlap: chunk_overlap.unwrap_or(defaults.overlap),
    };
    validate_chunk_params(settings.size, settings.overlap).map_err(AppError::Validation)?;

    Ok(BatchRequest {
        files,
        target_role,
        settings,
    })
}

async fn read_text_field(
    field: axum::extract::multipart::Field<'_>,
    name: &str,
) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid '{name}' field: {e}")))
}

async fn read_usize_field(
    field: axum::extract::multipart::Field<'_>,
    name: &str,
) -> Result<usize, AppError> {
    let text = read_text_field(field, name).await?;
    text.trim()
        .parse::<usize>()
        .map_err(|_| AppError::Validation(format!("'{name}' must be a non-negative integer")))
}

/// Runs intake + pipeline + persistence for one document. Every failure is
/// contained here and reported as a `Failed` outcome.
async fn analyze_one(
    state: &AppState,
    file: &UploadedFile,
    request: &BatchRequest,
) -> DocumentOutcome {
    let filename = &file.filename;

    let extension = match validate_upload(filename, file.bytes.len()) {
        Ok(ext) => ext,
        Err(reason) => return failed(filename, reason),
    };

    let text = extract_text(&file.bytes, &extension);
    if let Err(reason) = validate_extracted_text(&text, filename) {
        return failed(filename, reason);
    }

    let analysis = match analyze_document(
        &text,
        request.target_role.as_deref(),
        request.settings,
        state.provider.as_ref(),
    )
    .await
    {
        Ok(analysis) => analysis,
        Err(e) => return failed(filename, e.to_string()),
    };

    let failed_segments = analysis
        .chunk_results
        .iter()
        .filter(|r| r.is_none())
        .count();

    // Persistence failures are logged but never fail an analysis the
    // caller already paid for.
    let row = match AnalysisRow::from_analysis(filename, request.target_role.as_deref(), &analysis)
    {
        Ok(row) => row,
        Err(e) => {
            error!("could not serialize analysis row for '{filename}': {e}");
            return failed(filename, "failed to serialize analysis".to_string());
        }
    };
    if let Err(e) = insert_analysis(&state.db, &row).await {
        warn!("DB save error for '{filename}': {e}");
    }

    DocumentOutcome::Completed {
        filename: filename.clone(),
        id: row.id,
        segment_count: analysis.segment_count,
        failed_segments,
        report: analysis.report,
    }
}

fn failed(filename: &str, error: String) -> DocumentOutcome {
    warn!("analysis failed for '{filename}': {error}");
    DocumentOutcome::Failed {
        filename: filename.to_string(),
        error,
    }
}

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use std::sync::Arc;
    use tower::ServiceExt;

    use crate::analysis::testing::ScriptedProvider;
    use crate::config::Config;
    use crate::provider::ProviderKind;
    use crate::routes::build_router;
    use crate::state::AppState;

    fn test_config() -> Config {
        Config {
            provider: ProviderKind::OpenAi,
            model: None,
            openai_api_key: Some("test-key".to_string()),
            groq_api_key: None,
            database_url: "sqlite::memory:".to_string(),
            port: 0,
            rust_log: "info".to_string(),
        }
    }

    async fn test_state(provider: ScriptedProvider) -> AppState {
        // One connection only: every in-memory SQLite connection is its own
        // database, so a larger pool would lose the schema.
        let db = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        crate::db::init_schema(&db).await.unwrap();
        AppState {
            db,
            provider: Arc::new(provider),
            config: test_config(),
        }
    }

    /// Builds a multipart POST to the batch endpoint. Each part is
    /// (field name, filename — empty for plain text fields, content).
    fn multipart_request(parts: &[(&str, &str, &str)]) -> Request<Body> {
        let boundary = "batch-test-boundary";
        let mut body = String::new();
        for (name, filename, content) in parts {
            body.push_str(&format!("--{boundary}\r\n"));
            if filename.is_empty() {
                body.push_str(&format!(
                    "Content-Disposition: form-data; name=\"{name}\"\r\n\r\n"
                ));
            } else {
                body.push_str(&format!(
                    "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n\r\n"
                ));
            }
            body.push_str(content);
            body.push_str("\r\n");
        }
        body.push_str(&format!("--{boundary}--\r\n"));

        Request::builder()
            .method("POST")
            .uri("/api/v1/analyses")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn response_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_batch_reports_completed_and_failed_documents() {
        let provider = ScriptedProvider::new(vec![Ok(
            r#"{"overall_score": 7, "scores": {"Tailoring": 7}}"#.to_string(),
        )]);
        let app = build_router(test_state(provider).await);

        let resume = "Experienced backend engineer with strong systems background. ".repeat(3);
        let request = multipart_request(&[
            ("file", "good.txt", resume.as_str()),
            (
                "file",
                "bad.docx",
                "long enough to pass the size check, wrong extension either way. \
                 long enough to pass the size check, wrong extension either way.",
            ),
        ]);

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = response_json(response).await;
        let docs = json["documents"].as_array().unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0]["status"], "completed");
        assert_eq!(docs[0]["filename"], "good.txt");
        assert_eq!(docs[0]["report"]["overall_score"], 7);
        assert_eq!(docs[1]["status"], "failed");
        assert_eq!(docs[1]["filename"], "bad.docx");
        assert!(docs[1]["error"].as_str().unwrap().contains("not allowed"));
    }

    #[tokio::test]
    async fn test_upload_past_stock_body_limit_reaches_intake_validation() {
        // 3 MB: over the framework's stock 2 MB body cap, under the
        // configured 10 MB per-file bound. The rejection must come from
        // intake validation (text too long), not from the transport layer.
        let provider = ScriptedProvider::new(vec![]);
        let app = build_router(test_state(provider).await);

        let big = "a".repeat(3 * 1024 * 1024);
        let request = multipart_request(&[("file", "big.txt", big.as_str())]);

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = response_json(response).await;
        assert_eq!(json["documents"][0]["status"], "failed");
        assert!(json["documents"][0]["error"]
            .as_str()
            .unwrap()
            .contains("too long"));
    }

    #[tokio::test]
    async fn test_empty_batch_is_a_validation_error() {
        let provider = ScriptedProvider::new(vec![]);
        let app = build_router(test_state(provider).await);

        let request = multipart_request(&[("target_role", "", "Backend Engineer")]);
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
