use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{web, HttpResponse, Responder};
use common::model::report::ReportKind;
use serde::Deserialize;

use crate::render::{html, pdf, Printable};
use crate::state::AppState;

use super::{with_report_kind, ReportError};

#[derive(Deserialize)]
pub(crate) struct DocumentQuery {
    format: Option<String>,
}

pub(crate) async fn process(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
    query: web::Query<DocumentQuery>,
) -> impl Responder {
    let (kind, record_id) = path.into_inner();
    let kind: ReportKind = match kind.parse() {
        Ok(kind) => kind,
        Err(e) => return HttpResponse::BadRequest().body(e.to_string()),
    };
    // Rendering is CPU-heavy (image rescaling, PDF layout) on top of file IO,
    // so both formats run on the blocking pool.
    match query.format.as_deref().unwrap_or("html") {
        "pdf" => {
            let id = record_id.clone();
            match web::block(move || render_record_pdf(&state, kind, &id)).await {
                Ok(Ok(bytes)) => HttpResponse::Ok()
                    .content_type("application/pdf")
                    .insert_header(ContentDisposition {
                        disposition: DispositionType::Attachment,
                        parameters: vec![DispositionParam::Filename(format!(
                            "{}_{record_id}.pdf",
                            kind.table_name()
                        ))],
                    })
                    .body(bytes),
                Ok(Err(e)) => e.to_response(),
                Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
            }
        }
        "html" => {
            match web::block(move || render_record_html(&state, kind, &record_id)).await {
                Ok(Ok(page)) => HttpResponse::Ok()
                    .content_type("text/html; charset=utf-8")
                    .body(page),
                Ok(Err(e)) => e.to_response(),
                Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
            }
        }
        other => HttpResponse::BadRequest().body(format!("unknown format `{other}`")),
    }
}

fn build_model(
    state: &AppState,
    kind: ReportKind,
    record_id: &str,
) -> Result<crate::render::DocumentModel, ReportError> {
    with_report_kind!(kind, R => {
        let stored = state.workbook().get::<R>(record_id)?;
        let mut model = stored.report.document();
        model.subtitle = format!("Record {}", stored.record_id);
        Ok(model)
    })
}

pub(crate) fn render_record_html(
    state: &AppState,
    kind: ReportKind,
    record_id: &str,
) -> Result<String, ReportError> {
    let model = build_model(state, kind, record_id)?;
    Ok(html::render_html(&model, state.media.as_ref())?)
}

pub(crate) fn render_record_pdf(
    state: &AppState,
    kind: ReportKind,
    record_id: &str,
) -> Result<Vec<u8>, ReportError> {
    let model = build_model(state, kind, record_id)?;
    Ok(pdf::render_pdf(&model, state.media.as_ref())?)
}
