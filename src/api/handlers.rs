//! API request handlers

use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{error, warn};
use uuid::Uuid;

use super::server::AppState;
use crate::error::{ImportError, ImportResult};
use crate::excel::{build_template, Upload, TEMPLATE_FILENAME, XLSX_CONTENT_TYPE};
use crate::types::ImportSummary;

/// Multipart field carrying the workbook
pub const UPLOAD_FIELD: &str = "file";

/// Standard API response wrapper
#[derive(Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub request_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            request_id: Uuid::new_v4().to_string(),
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            request_id: Uuid::new_v4().to_string(),
            data: None,
            error: Some(message.into()),
        }
    }
}

impl IntoResponse for ImportError {
    fn into_response(self) -> Response {
        let status = if self.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        if status.is_server_error() {
            error!(error = %self, "import failed");
        } else {
            warn!(error = %self, "import rejected");
        }

        (status, Json(ApiResponse::<()>::err(self.to_string()))).into_response()
    }
}

/// Root endpoint response
#[derive(Serialize)]
pub struct RootResponse {
    pub name: String,
    pub version: String,
    pub description: String,
    pub endpoints: Vec<EndpointInfo>,
}

#[derive(Serialize)]
pub struct EndpointInfo {
    pub path: String,
    pub method: String,
    pub description: String,
}

impl EndpointInfo {
    fn new(path: &str, method: &str, description: &str) -> Self {
        Self {
            path: path.to_string(),
            method: method.to_string(),
            description: description.to_string(),
        }
    }
}

/// GET / - Root info
pub async fn root(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(ApiResponse::ok(RootResponse {
        name: "Attendance Import Server".to_string(),
        version: state.version.clone(),
        description: "Subject and schedule import from Excel workbooks".to_string(),
        endpoints: vec![
            EndpointInfo::new("/health", "GET", "Health check endpoint"),
            EndpointInfo::new("/version", "GET", "Get server version"),
            EndpointInfo::new(
                "/api/import-excel",
                "POST",
                "Import a subject workbook (multipart field 'file', .xlsx/.xls)",
            ),
            EndpointInfo::new(
                "/api/download-template",
                "GET",
                "Download an example workbook in the import layout",
            ),
        ],
    }))
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub database: String,
    pub excel_import: String,
}

/// GET /health - Health check (pings the database)
pub async fn health(State(state): State<Arc<AppState>>) -> Response {
    match state.importer.store().ping().await {
        Ok(()) => Json(ApiResponse::ok(HealthResponse {
            status: "ok".to_string(),
            database: "connected".to_string(),
            excel_import: "available".to_string(),
        }))
        .into_response(),
        Err(e) => {
            error!(error = %e, "health check failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<HealthResponse>::err(e.to_string())),
            )
                .into_response()
        }
    }
}

/// Version response
#[derive(Serialize)]
pub struct VersionResponse {
    pub version: String,
    pub features: Vec<String>,
}

/// GET /version - Server version
pub async fn version(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(ApiResponse::ok(VersionResponse {
        version: state.version.clone(),
        features: vec!["import-excel".to_string(), "download-template".to_string()],
    }))
}

/// POST /api/import-excel - Import a subject workbook
pub async fn import_excel(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> ImportResult<Json<ApiResponse<ImportSummary>>> {
    let (filename, content) = read_upload(multipart).await?;
    let summary = state
        .importer
        .import(&Upload::new(&filename, &content))
        .await?;
    Ok(Json(ApiResponse::ok(summary)))
}

/// Pull the `file` field out of a multipart body
async fn read_upload(mut multipart: Multipart) -> ImportResult<(String, Vec<u8>)> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ImportError::Upload(e.to_string()))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let content = field
            .bytes()
            .await
            .map_err(|e| ImportError::Upload(e.to_string()))?;
        return Ok((filename, content.to_vec()));
    }
    Err(ImportError::MissingFile)
}

/// GET /api/download-template - Example workbook
pub async fn download_template() -> ImportResult<Response> {
    let bytes = build_template()?;
    let disposition = format!("attachment; filename=\"{}\"", TEMPLATE_FILENAME);
    Ok((
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}
