use crate::context::AppContext;
use crate::error::AppError;
use actix_web::http::header::ContentType;
use actix_web::{web, HttpResponse};

pub async fn process(context: web::Data<AppContext>) -> Result<HttpResponse, AppError> {
    let token = context.tokens.issue()?;
    Ok(HttpResponse::Ok()
        .insert_header(ContentType::plaintext())
        .body(token))
}
