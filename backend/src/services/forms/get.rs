use crate::auth::Authenticated;
use crate::context::AppContext;
use crate::error::AppError;
use actix_web::{web, HttpResponse};

pub(crate) async fn process(
    _auth: Authenticated,
    id: web::Path<String>,
    context: web::Data<AppContext>,
) -> Result<HttpResponse, AppError> {
    let record = context.query.get_by_id(&id).await?;
    Ok(HttpResponse::Ok().json(record))
}
