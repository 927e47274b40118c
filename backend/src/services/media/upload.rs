use actix_multipart::Multipart;
use actix_web::{web, HttpResponse, Responder};
use common::requests::UploadOutcome;
use futures_util::StreamExt;

use crate::media::MediaError;
use crate::state::AppState;

pub(crate) async fn process(state: web::Data<AppState>, payload: Multipart) -> impl Responder {
    match upload_one(&state, payload).await {
        Ok(outcome) => HttpResponse::Ok().json(outcome),
        Err(MediaError::Empty { .. }) => HttpResponse::BadRequest().body("missing `file` part"),
        Err(e) => HttpResponse::ServiceUnavailable().body(format!("upload failed: {e}")),
    }
}

async fn upload_one(state: &AppState, mut payload: Multipart) -> Result<UploadOutcome, MediaError> {
    let mut file_name = String::new();
    let mut bytes: Vec<u8> = Vec::new();

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| MediaError::Transport {
            name: file_name.clone(),
            message: e.to_string(),
        })?;
        let name = field
            .content_disposition()
            .and_then(|cd| cd.get_name().map(str::to_string));
        if name.as_deref() != Some("file") {
            continue;
        }
        file_name = field
            .content_disposition()
            .and_then(|cd| cd.get_filename().map(str::to_string))
            .unwrap_or_else(|| "upload.bin".to_string());
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|e| MediaError::Transport {
                name: file_name.clone(),
                message: e.to_string(),
            })?;
            bytes.extend_from_slice(&chunk);
        }
    }

    let mime = mime_guess::from_path(&file_name).first_or_octet_stream();
    state.media.put(&file_name, &bytes, mime.as_ref())
}
