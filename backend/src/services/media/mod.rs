//! Media upload endpoint. One file per call; the response carries the public
//! locator the caller wires into a report before saving it.

mod upload;

use actix_web::web::{post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/media";

pub fn configure_routes() -> Scope {
    scope(API_PATH).route("/upload", post().to(upload::process))
}
