use actix_web::{web, HttpResponse, Responder};
use common::model::report::{ReportKind, Stored};
use common::requests::ListQuery;

use crate::state::AppState;

use super::{with_report_kind, ReportError};

pub(crate) async fn process(
    state: web::Data<AppState>,
    kind: web::Path<String>,
    query: web::Query<ListQuery>,
) -> impl Responder {
    let kind: ReportKind = match kind.parse() {
        Ok(kind) => kind,
        Err(e) => return HttpResponse::BadRequest().body(e.to_string()),
    };
    let search = query.into_inner().search;
    match web::block(move || list_reports(&state, kind, search)).await {
        Ok(Ok(rows)) => HttpResponse::Ok().json(rows),
        Ok(Err(e)) => e.to_response(),
        Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
    }
}

/// Full-table fetch; filtering happens here, after the fetch, on the identity
/// column only.
pub(crate) fn list_reports(
    state: &AppState,
    kind: ReportKind,
    search: Option<String>,
) -> Result<serde_json::Value, ReportError> {
    with_report_kind!(kind, R => {
        let workbook = state.workbook();
        let rows: Vec<Stored<R>> = match search.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => workbook.search::<R>(term)?,
            _ => workbook.rows::<R>()?,
        };
        serde_json::to_value(rows).map_err(|e| ReportError::Payload(e.to_string()))
    })
}
