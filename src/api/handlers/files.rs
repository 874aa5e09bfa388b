use crate::api::error::AppError;
use crate::models::{ListFilesQuery, ListFilesResponse, UploadForm, UploadResponse};
use crate::services::catalog::ListQuery;
use crate::utils::validation::FALLBACK_FILENAME;
use axum::{
    Json,
    extract::{
        Multipart, Query, State,
        multipart::MultipartRejection,
        rejection::QueryRejection,
    },
};
use futures::TryStreamExt;
use tokio_util::io::StreamReader;

#[utoipa::path(
    post,
    path = "/upload",
    request_body(content = UploadForm, content_type = "multipart/form-data", description = "File upload"),
    responses(
        (status = 200, description = "File uploaded successfully", body = UploadResponse),
        (status = 400, description = "Body is not a readable multipart form"),
        (status = 500, description = "File could not be written to storage")
    ),
    tag = "files"
)]
pub async fn upload_file(
    State(state): State<crate::AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, AppError> {
    let mut multipart = multipart.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let result: Result<usize, AppError> = async {
        let mut stored = 0;

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?
        {
            if field.name() != Some("file") {
                continue;
            }

            let client_filename = field.file_name().unwrap_or(FALLBACK_FILENAME).to_string();
            let reader = StreamReader::new(field.map_err(std::io::Error::other));

            state.ingest.ingest(&client_filename, reader).await?;
            stored += 1;
        }

        Ok(stored)
    }
    .await;

    match result {
        Ok(stored) => {
            if stored == 0 {
                tracing::debug!("Upload carried no `file` field; nothing stored");
            }
            Ok(Json(UploadResponse::default()))
        }
        Err(e) => {
            // Drain what is left so the client sees the response instead of a reset.
            tracing::warn!("Upload failed early: {}. Consuming remaining stream...", e);
            while let Ok(Some(mut field)) = multipart.next_field().await {
                while let Ok(Some(_)) = field.chunk().await {}
            }
            Err(e)
        }
    }
}

#[utoipa::path(
    get,
    path = "/files",
    params(ListFilesQuery),
    responses(
        (status = 200, description = "One page of the storage directory", body = ListFilesResponse),
        (status = 500, description = "Storage directory could not be read")
    ),
    tag = "files"
)]
pub async fn list_files(
    State(state): State<crate::AppState>,
    query: Result<Query<ListFilesQuery>, QueryRejection>,
) -> Result<Json<ListFilesResponse>, AppError> {
    // An unparseable query string is treated like an empty one.
    let raw = query.map(|Query(q)| q).unwrap_or_default();
    let query = ListQuery::from(&raw);

    let page = state.catalog.list(&query).await?;

    Ok(Json(ListFilesResponse::success(page)))
}
