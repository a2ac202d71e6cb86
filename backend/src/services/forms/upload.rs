use crate::auth::Authenticated;
use crate::context::AppContext;
use crate::error::AppError;
use crate::ingestion::{IngestError, UploadedDocument};
use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use futures_util::StreamExt;
use log::info;

/// HTTP handler for `POST /form/upload`.
///
/// - On success: `200 OK` with `{"id": "<record id>"}` once the record is persisted.
/// - On failure: `400` for a malformed upload, `502` when a conversion service
///   fails, `500` when storage fails.
pub(crate) async fn process(
    _auth: Authenticated,
    context: web::Data<AppContext>,
    payload: Multipart,
) -> Result<HttpResponse, AppError> {
    let upload = read_upload(payload).await?;
    info!(
        "Received upload '{}' ({} bytes)",
        upload.file_name,
        upload.bytes.len()
    );
    let ingested = context.pipeline.ingest(upload).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "id": ingested.record.id })))
}

/// Collects the first `file` field of the multipart body.
async fn read_upload(mut payload: Multipart) -> Result<UploadedDocument, IngestError> {
    let mut upload: Option<UploadedDocument> = None;

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| IngestError::Multipart(e.to_string()))?;
        let field_name = field
            .content_disposition()
            .and_then(|cd| cd.get_name().map(|n| n.to_string()));

        match field_name.as_deref() {
            Some("file") if upload.is_none() => {
                let file_name = field
                    .content_disposition()
                    .and_then(|cd| cd.get_filename().map(|f| f.to_string()))
                    .unwrap_or_default();
                let mut bytes = Vec::new();
                while let Some(chunk) = field.next().await {
                    let chunk = chunk.map_err(|e| IngestError::Multipart(e.to_string()))?;
                    bytes.extend_from_slice(&chunk);
                }
                upload = Some(UploadedDocument { file_name, bytes });
            }
            _ => {}
        }
    }

    upload.ok_or(IngestError::MissingFile)
}
