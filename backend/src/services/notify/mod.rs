//! Notification endpoints. Both routes answer 503 when no SMTP account was
//! configured at startup.
//!
//! - `POST /api/notify`: send an HTML message to a comma-separated recipient
//!   list, optionally referencing an attachment by locator link. The response
//!   lists the outcome for every recipient; failures are independent.
//! - `POST /api/notify/invite`: collaboration invitation — an `invite` JSON
//!   part plus an optional `file` part. The document is stored first and each
//!   recipient receives a link to it alongside the case number.

mod invite;
mod send;

use actix_web::web::{post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/notify";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", post().to(send::process))
        .route("/invite", post().to(invite::process))
}
