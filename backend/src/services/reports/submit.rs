//! Multipart accident submission: one `report` JSON part plus any number of
//! media parts (`license_a`, `license_b`, `photo`, `video`, `voice`).
//!
//! Every upload must succeed before the row is appended, so a failed transfer
//! can never leave a row pointing at media that was not stored. Objects
//! already stored by the same batch are not rolled back; that gap is inherited
//! from the upstream store contract and recorded in DESIGN.md.

use actix_multipart::Multipart;
use actix_web::{web, HttpResponse, Responder};
use common::model::accident::AccidentReport;
use common::model::report::Report;
use common::requests::SaveOutcome;
use futures_util::StreamExt;
use log::info;

use crate::state::AppState;

use super::ReportError;

const FILE_PARTS: [&str; 5] = ["license_a", "license_b", "photo", "video", "voice"];

pub(crate) struct FilePart {
    pub field: String,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

pub(crate) async fn process(state: web::Data<AppState>, payload: Multipart) -> impl Responder {
    let (report, files) = match collect_submission(payload).await {
        Ok(parts) => parts,
        Err(e) => return e.to_response(),
    };
    // Uploads and the append are file IO; run them on the blocking pool.
    match web::block(move || finalize_submission(&state, report, files)).await {
        Ok(Ok(record_id)) => HttpResponse::Created().json(SaveOutcome { record_id }),
        Ok(Err(e)) => e.to_response(),
        Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
    }
}

/// Streams the multipart body into the `report` JSON and its file parts.
async fn collect_submission(
    mut payload: Multipart,
) -> Result<(AccidentReport, Vec<FilePart>), ReportError> {
    let mut report_json: Option<Vec<u8>> = None;
    let mut files: Vec<FilePart> = Vec::new();

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| ReportError::Payload(e.to_string()))?;
        let name = field
            .content_disposition()
            .and_then(|cd| cd.get_name().map(str::to_string));
        let file_name = field
            .content_disposition()
            .and_then(|cd| cd.get_filename().map(str::to_string))
            .unwrap_or_default();

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|e| ReportError::Payload(e.to_string()))?;
            bytes.extend_from_slice(&chunk);
        }

        match name.as_deref() {
            Some("report") => report_json = Some(bytes),
            Some(part) if FILE_PARTS.contains(&part) => files.push(FilePart {
                field: part.to_string(),
                file_name,
                bytes,
            }),
            _ => {}
        }
    }

    let raw = report_json.ok_or_else(|| ReportError::Payload("missing `report` part".to_string()))?;
    let report: AccidentReport =
        serde_json::from_slice(&raw).map_err(|e| ReportError::Payload(e.to_string()))?;
    Ok((report, files))
}

/// Validation first, then uploads, then exactly one append. Any failure along
/// the way means no row is written.
pub(crate) fn finalize_submission(
    state: &AppState,
    mut report: AccidentReport,
    files: Vec<FilePart>,
) -> Result<String, ReportError> {
    report.validate().map_err(ReportError::Validation)?;
    report.normalize();

    for part in &files {
        let mime = mime_guess::from_path(&part.file_name).first_or_octet_stream();
        let stored = state.media.put(&part.file_name, &part.bytes, mime.as_ref())?;
        match part.field.as_str() {
            "license_a" => report.driver_a.license_image_url = Some(stored.url),
            "license_b" => report.driver_b.license_image_url = Some(stored.url),
            "photo" => report.accident_image_urls.push(stored.url),
            "video" => report.accident_video_url = Some(stored.url),
            "voice" => report.voice_note_urls.push(stored.url),
            _ => {}
        }
    }

    let record_id = state.workbook().append(&report)?;
    info!(
        "accident submission {} saved with {} media object(s)",
        record_id,
        files.len()
    );
    Ok(record_id)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};

    use common::model::accident::{AccidentReport, Driver};
    use common::requests::UploadOutcome;
    use jiff::civil::{Date, Time};

    use crate::config::Config;
    use crate::media::{MediaError, ObjectStore};
    use crate::state::AppState;
    use crate::store::CsvWorkbook;

    use super::{finalize_submission, FilePart};

    struct RefusingStore;

    impl ObjectStore for RefusingStore {
        fn put(&self, name: &str, _bytes: &[u8], _mime: &str) -> Result<UploadOutcome, MediaError> {
            Err(MediaError::Transport {
                name: name.to_string(),
                message: "disk full".to_string(),
            })
        }

        fn local_path(&self, _url: &str) -> Option<PathBuf> {
            None
        }
    }

    fn state_with(dir: &std::path::Path, media: Arc<dyn ObjectStore>) -> AppState {
        AppState {
            config: Config {
                host: "127.0.0.1".to_string(),
                port: 0,
                data_dir: dir.to_path_buf(),
                media_dir: dir.to_path_buf(),
                public_base_url: "http://localhost:8080".to_string(),
                mail: None,
            },
            workbook: Mutex::new(CsvWorkbook::open(dir).unwrap()),
            media,
            mailer: None,
        }
    }

    fn sample() -> AccidentReport {
        AccidentReport {
            case_number: "CAS-2024-050".to_string(),
            accident_date: Date::constant(2024, 7, 2),
            accident_time: Time::constant(9, 10, 0, 0),
            road_name: "M3".to_string(),
            police_station: "Claremont SAPS".to_string(),
            police_reference_number: "CL/17/07".to_string(),
            speed_limit: 60,
            weather: common::model::accident::Weather::Clear,
            road_condition: common::model::accident::RoadCondition::Good,
            vehicles: Vec::new(),
            driver_a: Driver::default(),
            driver_b: Driver::default(),
            witnesses: Vec::new(),
            accident_image_urls: Vec::new(),
            accident_video_url: None,
            voice_note_urls: Vec::new(),
        }
    }

    #[test]
    fn failed_upload_leaves_no_row_behind() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_with(dir.path(), Arc::new(RefusingStore));
        let files = vec![FilePart {
            field: "photo".to_string(),
            file_name: "scene.jpg".to_string(),
            bytes: vec![0xFF, 0xD8],
        }];

        let result = finalize_submission(&state, sample(), files);
        assert!(result.is_err());
        let rows = state.workbook().rows::<AccidentReport>().unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn invalid_report_is_refused_before_any_upload() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_with(dir.path(), Arc::new(RefusingStore));
        let mut report = sample();
        report.case_number = String::new();

        let files = vec![FilePart {
            field: "photo".to_string(),
            file_name: "scene.jpg".to_string(),
            bytes: vec![0xFF, 0xD8],
        }];

        // The refusing store errors on any put, so a validation error here
        // proves uploads were never attempted.
        let err = finalize_submission(&state, report, files).unwrap_err();
        assert!(matches!(err, super::ReportError::Validation(_)));
    }
}
