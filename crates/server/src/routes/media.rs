use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use common::types::ActionOk;
use service::media::{extension_for, StoredMedia};
use tracing::info;

use crate::errors::JsonApiError;
use crate::routes::ServerState;

/// Stores the first file field of a multipart upload.
#[utoipa::path(post, path = "/admin/media", tag = "admin", responses(
    (status = 200, description = "Stored"),
    (status = 400, description = "Missing file, unsupported type or too large")
))]
pub async fn upload_media(State(state): State<ServerState>, mut multipart: Multipart) -> Result<Json<ActionOk<StoredMedia>>, JsonApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| JsonApiError::bad_request(format!("invalid multipart body: {e}")))?
    {
        if field.file_name().is_none() {
            continue;
        }
        let content_type = field.content_type().unwrap_or("application/octet-stream").to_string();
        if extension_for(&content_type).is_none() {
            return Err(JsonApiError::bad_request(format!("unsupported content type {content_type}")));
        }
        let bytes = field
            .bytes()
            .await
            .map_err(|e| JsonApiError::bad_request(format!("upload interrupted: {e}")))?;
        let stored = state.media.put(&content_type, &bytes).await?;
        info!(event = "media_uploaded", key = %stored.key, size = stored.size);
        return Ok(Json(ActionOk::new(stored)));
    }
    Err(JsonApiError::bad_request("no file field in upload"))
}

#[utoipa::path(delete, path = "/admin/media/{key}", tag = "admin", params(("key" = String, Path, description = "Media key returned by the upload")), responses((status = 200, description = "Deleted"), (status = 404, description = "Not Found")))]
pub async fn delete_media(State(state): State<ServerState>, Path(key): Path<String>) -> Result<Json<ActionOk<bool>>, JsonApiError> {
    if state.media.delete(&key).await? {
        Ok(Json(ActionOk::new(true)))
    } else {
        Err(JsonApiError::not_found("media not found"))
    }
}
