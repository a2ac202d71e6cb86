use crate::ingestion::IngestError;
use actix_web::http::header::ContentType;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

/// Errors surfaced to HTTP callers. Every variant renders as a plain-text body.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Missing Authorization header")]
    AuthMissing,
    #[error("Invalid or expired token")]
    AuthInvalid,
    #[error("No such form")]
    RecordNotFound(String),
    #[error("Default document is not available")]
    DefaultDocumentMissing(#[source] std::io::Error),
    #[error("Failed to issue token: {0}")]
    TokenIssue(#[from] jsonwebtoken::errors::Error),
    #[error(transparent)]
    Ingest(#[from] IngestError),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::AuthMissing | AppError::AuthInvalid => StatusCode::UNAUTHORIZED,
            AppError::RecordNotFound(_) => StatusCode::NOT_FOUND,
            AppError::DefaultDocumentMissing(_) | AppError::TokenIssue(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Ingest(e) => match e {
                IngestError::MissingFile | IngestError::Multipart(_) => StatusCode::BAD_REQUEST,
                IngestError::Conversion(_) => StatusCode::BAD_GATEWAY,
                IngestError::StoreRaw { .. } | IngestError::Persist { .. } => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::plaintext())
            .body(format!("{}\n", self))
    }
}
