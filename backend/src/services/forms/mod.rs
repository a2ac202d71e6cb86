//! # Form Service Module
//!
//! Endpoints over stored invoice records ("forms"). Every handler takes an
//! [`Authenticated`](crate::auth::Authenticated) argument, so requests without
//! a valid bearer token are answered with `401` before any work is done.
//!
//! ## Registered Routes:
//!
//! *   **`GET /forms`** (`list`): JSON array of record ids in insertion order.
//! *   **`POST /form/upload`** (`upload`): multipart upload with a `file` field.
//!     Runs the ingestion pipeline and answers `200` with `{"id": ...}` once the
//!     record is persisted.
//! *   **`GET /form/{id}`** (`get`): the full record, or `404 No such form`.
//! *   **`GET /form/{id}/dto`** (`dto`): the DTO projection of the record.
//! *   **`GET /form/{id}/pdf`** (`pdf`): the stored PDF, or the default document
//!     when none matches. Never answers `404`.

mod dto;
mod get;
mod list;
mod pdf;
mod upload;

use actix_web::web::{get, post, resource, scope};
use actix_web::{Resource, Scope};

const LIST_PATH: &str = "/forms";
const API_PATH: &str = "/form";

pub fn configure_list_route() -> Resource {
    resource(LIST_PATH).route(get().to(list::process))
}

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/upload", post().to(upload::process))
        .route("/{id}", get().to(get::process))
        .route("/{id}/dto", get().to(dto::process))
        .route("/{id}/pdf", get().to(pdf::process))
}
