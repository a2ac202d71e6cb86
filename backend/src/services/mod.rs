//! HTTP surface.
//!
//! - `token`: `GET /userToken`, unauthenticated token issuance.
//! - `forms`: `GET /forms` and everything under `/form`, all behind a bearer token.

pub mod forms;
pub mod token;

use actix_web::web;

/// Registers every route of the service.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(token::configure_routes())
        .service(forms::configure_list_route())
        .service(forms::configure_routes());
}
