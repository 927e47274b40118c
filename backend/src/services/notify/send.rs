use actix_web::{web, HttpResponse, Responder};
use common::requests::NotifyRequest;

use crate::mail::deliver_to_all;
use crate::state::AppState;

pub(crate) async fn process(
    state: web::Data<AppState>,
    payload: web::Json<NotifyRequest>,
) -> impl Responder {
    let Some(relay) = state.mailer.clone() else {
        return HttpResponse::ServiceUnavailable().body("mail relay is not configured");
    };
    let request = payload.into_inner();
    let body = match &request.attachment_url {
        Some(url) => format!(
            "{}<p>Attached document: <a href=\"{url}\">{url}</a></p>",
            request.body
        ),
        None => request.body.clone(),
    };

    // SMTP round-trips are blocking; keep them off the async workers.
    let outcome = web::block(move || {
        deliver_to_all(relay.as_ref(), &request.recipients, &request.subject, &body)
    })
    .await;

    match outcome {
        Ok(summary) => HttpResponse::Ok().json(summary),
        Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
    }
}
