use actix_web::{web, HttpResponse, Responder};
use common::model::report::{Report, ReportKind};
use common::requests::SaveOutcome;
use log::info;

use crate::state::AppState;

use super::{with_report_kind, ReportError};

pub(crate) async fn process(
    state: web::Data<AppState>,
    kind: web::Path<String>,
    payload: web::Json<serde_json::Value>,
) -> impl Responder {
    let kind: ReportKind = match kind.parse() {
        Ok(kind) => kind,
        Err(e) => return HttpResponse::BadRequest().body(e.to_string()),
    };
    let payload = payload.into_inner();
    // Table IO is file-backed; keep it off the async workers.
    match web::block(move || save_report(&state, kind, payload)).await {
        Ok(Ok(record_id)) => HttpResponse::Created().json(SaveOutcome { record_id }),
        Ok(Err(e)) => e.to_response(),
        Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
    }
}

/// Validate, normalize, append. A validation failure means zero rows written.
pub(crate) fn save_report(
    state: &AppState,
    kind: ReportKind,
    payload: serde_json::Value,
) -> Result<String, ReportError> {
    with_report_kind!(kind, R => {
        let mut report: R = serde_json::from_value(payload)
            .map_err(|e| ReportError::Payload(e.to_string()))?;
        report.validate().map_err(ReportError::Validation)?;
        report.normalize();
        let record_id = state.workbook().append(&report)?;
        info!("saved {} record {record_id}", kind.table_name());
        Ok(record_id)
    })
}
