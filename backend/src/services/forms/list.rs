use crate::auth::Authenticated;
use crate::context::AppContext;
use actix_web::{web, HttpResponse, Responder};

pub(crate) async fn process(
    _auth: Authenticated,
    context: web::Data<AppContext>,
) -> impl Responder {
    HttpResponse::Ok().json(context.query.list_ids().await)
}
