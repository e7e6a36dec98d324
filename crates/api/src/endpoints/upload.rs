//! Upload endpoints for validated file storage.

use ajoclub_common::AppError;
use ajoclub_core::{Actor, UploadInput};
use ajoclub_db::entities::uploaded_file::{Model as UploadedFileModel, UploadPurpose};
use axum::{
    Router,
    extract::{DefaultBodyLimit, Multipart, Path, State},
    routing::{get, post},
};
use serde::Serialize;

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Largest accepted request body. The strictest per-purpose ceiling is
/// 20 MiB; the margin covers multipart framing.
const MAX_UPLOAD_BODY: usize = 25 * 1024 * 1024;

/// Create upload router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_files))
        .route(
            "/{id}",
            post(upload_file).get(show_file).delete(delete_file),
        )
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BODY))
}

/// Uploaded file metadata response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFileResponse {
    pub id: String,
    pub url: String,
    pub filename: String,
    pub size: i64,
    pub content_type: String,
    pub purpose: UploadPurpose,
    pub user_id: String,
    pub created_at: String,
}

impl From<UploadedFileModel> for UploadedFileResponse {
    fn from(f: UploadedFileModel) -> Self {
        Self {
            id: f.id,
            url: f.url,
            filename: f.filename,
            size: f.size,
            content_type: f.content_type,
            purpose: f.purpose,
            user_id: f.user_id,
            created_at: f.created_at.to_rfc3339(),
        }
    }
}

/// Response for a successful upload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub url: String,
    pub file_id: String,
    pub metadata: UploadedFileResponse,
}

/// Upload a file via multipart form. The path segment names the upload
/// purpose; an unknown purpose is rejected before the body is read.
async fn upload_file(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(purpose): Path<String>,
    mut multipart: Multipart,
) -> Result<ApiResponse<UploadResponse>, AppError> {
    let purpose = UploadPurpose::parse(&purpose)
        .ok_or_else(|| AppError::Validation(format!("Unknown upload purpose: {purpose}")))?;

    let mut file_data: Option<Vec<u8>> = None;
    let mut file_name: Option<String> = None;
    let mut content_type: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();

        if name == "file" {
            file_name = field.file_name().map(std::string::ToString::to_string);
            content_type = field.content_type().map(std::string::ToString::to_string);
            file_data = Some(
                field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?
                    .to_vec(),
            );
        }
    }

    let data = file_data.ok_or_else(|| AppError::BadRequest("No file provided".to_string()))?;
    let filename = file_name.unwrap_or_else(|| "unnamed".to_string());
    let content_type = content_type.unwrap_or_else(|| "application/octet-stream".to_string());

    let file = state
        .upload_service
        .upload(
            &Actor::from(&user),
            purpose,
            UploadInput {
                filename,
                content_type,
                data,
            },
        )
        .await?;

    Ok(ApiResponse::ok(UploadResponse {
        url: file.url.clone(),
        file_id: file.id.clone(),
        metadata: file.into(),
    }))
}

/// Fetch file metadata.
async fn show_file(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(file_id): Path<String>,
) -> Result<ApiResponse<UploadedFileResponse>, AppError> {
    let file = state.upload_service.get_metadata(&file_id).await?;

    if file.user_id != user.id && !Actor::from(&user).is_admin() {
        return Err(AppError::Forbidden("Not your file".to_string()));
    }

    Ok(ApiResponse::ok(file.into()))
}

/// List the caller's uploads.
async fn list_files(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> Result<ApiResponse<Vec<UploadedFileResponse>>, AppError> {
    let files = state
        .upload_service
        .list_for_user(&Actor::from(&user))
        .await?;
    Ok(ApiResponse::ok(files.into_iter().map(Into::into).collect()))
}

/// Delete a file's blob and metadata as a paired operation.
async fn delete_file(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(file_id): Path<String>,
) -> Result<ApiResponse<()>, AppError> {
    state
        .upload_service
        .delete(&Actor::from(&user), &file_id)
        .await?;
    Ok(ApiResponse::ok(()))
}
