mod issue;

use actix_web::web::{get, resource};
use actix_web::Resource;

const API_PATH: &str = "/userToken";

/// `GET /userToken` returns a freshly signed bearer token as plain text.
pub fn configure_routes() -> Resource {
    resource(API_PATH).route(get().to(issue::process))
}
