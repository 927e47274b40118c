//! Report capture, browsing and export.
//!
//! The provided routes are:
//! - `POST /api/reports/accident/submit`: multipart accident submission, a
//!   `report` JSON part plus media file parts. All uploads must succeed before
//!   the row is appended; any failure leaves the table untouched.
//! - `POST /api/reports/{kind}/save`: JSON submission for any kind. Required
//!   fields are checked first and a violation blocks the save outright.
//! - `GET /api/reports/{kind}?search=`: full-table fetch with an optional
//!   case-insensitive substring filter on the identity column.
//! - `POST /api/reports/{kind}/update/{record_id}`: overwrite one record,
//!   keyed by the system-generated id.
//! - `GET /api/reports/{kind}/{record_id}/document?format=html|pdf`: render
//!   the record as a styled HTML page or a paginated PDF download.

mod document;
mod list;
mod save;
mod submit;
mod update;

use actix_web::web::{get, post, scope};
use actix_web::{HttpResponse, Scope};
use thiserror::Error;

use crate::media::MediaError;
use crate::render::RenderError;
use crate::store::StoreError;

const API_PATH: &str = "/api/reports";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/accident/submit", post().to(submit::process))
        .route("/{kind}/save", post().to(save::process))
        .route("/{kind}", get().to(list::process))
        .route("/{kind}/update/{record_id}", post().to(update::process))
        .route("/{kind}/{record_id}/document", get().to(document::process))
}

#[derive(Debug, Error)]
pub(crate) enum ReportError {
    #[error("validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),
    #[error("invalid payload: {0}")]
    Payload(String),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Media(#[from] MediaError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

impl ReportError {
    pub(crate) fn to_response(&self) -> HttpResponse {
        match self {
            ReportError::Validation(_) | ReportError::Payload(_) => {
                HttpResponse::BadRequest().body(self.to_string())
            }
            ReportError::Store(StoreError::NotFound { .. }) => {
                HttpResponse::NotFound().body(self.to_string())
            }
            ReportError::Store(StoreError::AmbiguousMatch { .. }) => {
                HttpResponse::Conflict().body(self.to_string())
            }
            _ => HttpResponse::ServiceUnavailable().body(self.to_string()),
        }
    }
}

/// Dispatches a kind tag to the concrete report type, so the generic store and
/// renderer code can run monomorphized per kind.
macro_rules! with_report_kind {
    ($kind:expr, $r:ident => $body:expr) => {{
        use common::model::accident::AccidentReport;
        use common::model::claim::ClaimForm;
        use common::model::document::CaseDocument;
        use common::model::injury::InjuryAssessment;
        use common::model::report::ReportKind;
        use common::model::supplier::SupplierClaim;
        match $kind {
            ReportKind::Accident => {
                type $r = AccidentReport;
                $body
            }
            ReportKind::Injury => {
                type $r = InjuryAssessment;
                $body
            }
            ReportKind::Claim => {
                type $r = ClaimForm;
                $body
            }
            ReportKind::SupplierClaim => {
                type $r = SupplierClaim;
                $body
            }
            ReportKind::CaseDocument => {
                type $r = CaseDocument;
                $body
            }
        }
    }};
}
pub(crate) use with_report_kind;
