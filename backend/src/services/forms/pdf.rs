//! Serves the PDF of a record.
//!
//! The lookup never fails with `404`: when the record or its file is missing the
//! configured default document is served instead. Only a missing default
//! document turns into `500`.

use crate::auth::Authenticated;
use crate::context::AppContext;
use crate::error::AppError;
use crate::query::PdfLookup;
use actix_files::NamedFile;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{mime, web, HttpRequest, HttpResponse};
use log::warn;
use std::path::Path;

const DISPLAY_NAME: &str = "report.pdf";

pub(crate) async fn process(
    _auth: Authenticated,
    req: HttpRequest,
    id: web::Path<String>,
    context: web::Data<AppContext>,
) -> Result<HttpResponse, AppError> {
    let lookup = context.query.get_pdf_by_id(&id).await;
    let file = match open_pdf(lookup.path()).await {
        Ok(file) => file,
        Err(e) => match lookup {
            PdfLookup::Exact(path) => {
                warn!("Stored PDF {} vanished: {}", path.display(), e);
                open_default(&context).await?
            }
            PdfLookup::Fallback(_) => return Err(AppError::DefaultDocumentMissing(e)),
        },
    };
    Ok(file.into_response(&req))
}

async fn open_default(context: &AppContext) -> Result<NamedFile, AppError> {
    open_pdf(context.query.default_pdf())
        .await
        .map_err(AppError::DefaultDocumentMissing)
}

async fn open_pdf(path: &Path) -> std::io::Result<NamedFile> {
    let file = NamedFile::open_async(path).await?;
    Ok(file
        .set_content_type(mime::APPLICATION_PDF)
        .set_content_disposition(ContentDisposition {
            disposition: DispositionType::Inline,
            parameters: vec![DispositionParam::Filename(DISPLAY_NAME.to_string())],
        }))
}
