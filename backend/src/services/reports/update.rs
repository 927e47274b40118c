use actix_web::{web, HttpResponse, Responder};
use common::model::report::{Report, ReportKind};
use common::requests::SaveOutcome;
use log::info;

use crate::state::AppState;

use super::{with_report_kind, ReportError};

pub(crate) async fn process(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
    payload: web::Json<serde_json::Value>,
) -> impl Responder {
    let (kind, record_id) = path.into_inner();
    let kind: ReportKind = match kind.parse() {
        Ok(kind) => kind,
        Err(e) => return HttpResponse::BadRequest().body(e.to_string()),
    };
    let payload = payload.into_inner();
    let id = record_id.clone();
    match web::block(move || update_report(&state, kind, &id, payload)).await {
        Ok(Ok(())) => HttpResponse::Ok().json(SaveOutcome { record_id }),
        Ok(Err(e)) => e.to_response(),
        Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
    }
}

/// Overwrites one record, keyed by the system-generated id so a duplicated
/// human-entered identity can never make the update ambiguous.
pub(crate) fn update_report(
    state: &AppState,
    kind: ReportKind,
    record_id: &str,
    payload: serde_json::Value,
) -> Result<(), ReportError> {
    with_report_kind!(kind, R => {
        let mut report: R = serde_json::from_value(payload)
            .map_err(|e| ReportError::Payload(e.to_string()))?;
        report.validate().map_err(ReportError::Validation)?;
        report.normalize();
        state.workbook().update(record_id, &report)?;
        info!("updated {} record {record_id}", kind.table_name());
        Ok(())
    })
}
