use actix_multipart::Multipart;
use actix_web::{web, HttpResponse, Responder};
use common::requests::InviteRequest;
use futures_util::StreamExt;

use crate::mail::deliver_to_all;
use crate::state::AppState;

pub(crate) async fn process(state: web::Data<AppState>, payload: Multipart) -> impl Responder {
    let Some(relay) = state.mailer.clone() else {
        return HttpResponse::ServiceUnavailable().body("mail relay is not configured");
    };
    let (invite, document_url) = match collect_parts(&state, payload).await {
        Ok(parts) => parts,
        Err(message) => return HttpResponse::BadRequest().body(message),
    };

    let body = invitation_body(&invite, document_url.as_deref());
    let outcome = web::block(move || {
        deliver_to_all(relay.as_ref(), &invite.recipients, &invite.subject, &body)
    })
    .await;

    match outcome {
        Ok(summary) => HttpResponse::Ok().json(summary),
        Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
    }
}

/// Reads the `invite` JSON part and, when present, stores the `file` part so
/// the invitation can link to it. A failed upload aborts the invitation.
async fn collect_parts(
    state: &AppState,
    mut payload: Multipart,
) -> Result<(InviteRequest, Option<String>), String> {
    let mut invite: Option<InviteRequest> = None;
    let mut document_url: Option<String> = None;

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| e.to_string())?;
        let name = field
            .content_disposition()
            .and_then(|cd| cd.get_name().map(str::to_string));
        let file_name = field
            .content_disposition()
            .and_then(|cd| cd.get_filename().map(str::to_string))
            .unwrap_or_else(|| "document.pdf".to_string());

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            bytes.extend_from_slice(&chunk.map_err(|e| e.to_string())?);
        }

        match name.as_deref() {
            Some("invite") => {
                invite = Some(serde_json::from_slice(&bytes).map_err(|e| e.to_string())?);
            }
            Some("file") => {
                let mime = mime_guess::from_path(&file_name).first_or_octet_stream();
                let stored = state
                    .media
                    .put(&file_name, &bytes, mime.as_ref())
                    .map_err(|e| e.to_string())?;
                document_url = Some(stored.url);
            }
            _ => {}
        }
    }

    let invite = invite.ok_or("missing `invite` part")?;
    Ok((invite, document_url))
}

fn invitation_body(invite: &InviteRequest, document_url: Option<&str>) -> String {
    let mut body = format!(
        "<p>You have been invited to collaborate on case <strong>{}</strong>.</p>",
        invite.case_number
    );
    match document_url {
        Some(url) => body.push_str(&format!(
            "<p>Linked document: <a href=\"{url}\">{url}</a></p>"
        )),
        None => body.push_str("<p>No document was attached.</p>"),
    }
    body
}
