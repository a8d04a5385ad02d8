use axum::{
    extract::{multipart::MultipartError, Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use futures::TryStreamExt;
use std::sync::Arc;
use tokio_util::io::StreamReader;
use tracing::debug;
use uuid::Uuid;

use crate::core::error::AppError;
use crate::features::files::dtos::{FileResponseDto, UploadFileDto, UploadMeta};
use crate::features::files::services::FileService;
use crate::shared::constants::{DEFAULT_ENCODING, DEFAULT_MIME_TYPE, FILE_FIELD_NAME};
use crate::shared::types::{ApiResponse, Meta, PaginationQuery};

/// Upload one or more files
///
/// Accepts multipart/form-data with:
/// - `file`: a file to upload (required, may repeat)
/// - `isPrivate`: "true"/"false", applies to the files after it (optional)
/// - `createdBy`: uploader identifier, applies to the files after it (optional)
///
/// Each file is streamed to the storage disk as it arrives.
#[utoipa::path(
    post,
    path = "/api/files/upload",
    tag = "files",
    request_body(
        content = UploadFileDto,
        content_type = "multipart/form-data",
        description = "File upload form",
    ),
    responses(
        (status = 201, description = "Files uploaded successfully", body = ApiResponse<Vec<FileResponseDto>>),
        (status = 400, description = "Missing file or malformed form"),
        (status = 413, description = "Request body too large"),
        (status = 502, description = "Storage backend rejected the upload")
    )
)]
pub async fn upload_file(
    State(service): State<Arc<FileService>>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<Vec<FileResponseDto>>>), AppError> {
    let mut uploaded = Vec::new();
    let mut is_private: Option<bool> = None;
    let mut created_by: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            FILE_FIELD_NAME => {
                let meta = UploadMeta {
                    filename: field.file_name().map(|s| s.to_string()),
                    encoding: field
                        .headers()
                        .get("content-transfer-encoding")
                        .and_then(|v| v.to_str().ok())
                        .map(|s| s.to_string())
                        .unwrap_or_else(|| DEFAULT_ENCODING.to_string()),
                    mimetype: field
                        .content_type()
                        .map(|s| s.to_string())
                        .unwrap_or_else(|| DEFAULT_MIME_TYPE.to_string()),
                    is_private,
                    created_by: created_by.clone(),
                };

                let mut reader = StreamReader::new(Box::pin(field.map_err(std::io::Error::other)));
                let file = service.upload(&mut reader, meta).await?;
                uploaded.push(file);
            }
            "isPrivate" => {
                let text = field.text().await.map_err(multipart_error)?;
                is_private = Some(parse_flag(&text)?);
            }
            "createdBy" => {
                let text = field.text().await.map_err(multipart_error)?;
                created_by = Some(text).filter(|s| !s.is_empty());
            }
            _ => {
                // Ignore unknown fields
                debug!("Ignoring unknown field: {}", field_name);
            }
        }
    }

    if uploaded.is_empty() {
        return Err(AppError::BadRequest("File is required".to_string()));
    }

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(uploaded), None, None)),
    ))
}

/// List stored files, newest first
#[utoipa::path(
    get,
    path = "/api/files",
    tag = "files",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Page of file records", body = ApiResponse<Vec<FileResponseDto>>)
    )
)]
pub async fn list_files(
    State(service): State<Arc<FileService>>,
    Query(query): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<FileResponseDto>>>, AppError> {
    let (files, total) = service.list(&query).await?;

    Ok(Json(ApiResponse::success(
        Some(files),
        None,
        Some(Meta { total }),
    )))
}

/// Get a stored file record by id
#[utoipa::path(
    get,
    path = "/api/files/{id}",
    tag = "files",
    params(("id" = Uuid, Path, description = "File id")),
    responses(
        (status = 200, description = "File record", body = ApiResponse<FileResponseDto>),
        (status = 404, description = "File not found")
    )
)]
pub async fn get_file(
    State(service): State<Arc<FileService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<FileResponseDto>>, AppError> {
    let file = service.get(id).await?;

    Ok(Json(ApiResponse::success(Some(file), None, None)))
}

fn multipart_error(e: MultipartError) -> AppError {
    debug!("Failed to read multipart data: {}", e);
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(e.body_text())
    } else {
        AppError::BadRequest(format!("Failed to read multipart data: {}", e.body_text()))
    }
}

fn parse_flag(text: &str) -> Result<bool, AppError> {
    match text.trim().to_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" | "" => Ok(false),
        other => Err(AppError::BadRequest(format!(
            "isPrivate must be true or false, got '{}'",
            other
        ))),
    }
}
