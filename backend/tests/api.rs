//! HTTP-level tests driving the service through the public routes, with the
//! store and media directories on a temp filesystem and the mail relay
//! replaced by a test double.

use std::path::Path;
use std::sync::{Arc, Mutex};

use actix_web::{test, web, App};
use serde_json::{json, Value};

use backend::config::Config;
use backend::mail::{MailError, MailRelay};
use backend::media::DiskStore;
use backend::services;
use backend::state::AppState;
use backend::store::CsvWorkbook;

struct FlakyRelay {
    refuse: &'static str,
}

impl MailRelay for FlakyRelay {
    fn send(&self, to: &str, _subject: &str, _body: &str) -> Result<(), MailError> {
        if to == self.refuse {
            return Err(MailError::Transport("mailbox unavailable".to_string()));
        }
        Ok(())
    }
}

fn test_state(dir: &Path, mailer: Option<Arc<dyn MailRelay>>) -> web::Data<AppState> {
    let data_dir = dir.join("data");
    let media_dir = dir.join("media");
    let state = AppState {
        config: Config {
            host: "127.0.0.1".to_string(),
            port: 0,
            data_dir: data_dir.clone(),
            media_dir: media_dir.clone(),
            public_base_url: "http://localhost:8080".to_string(),
            mail: None,
        },
        workbook: Mutex::new(CsvWorkbook::open(&data_dir).unwrap()),
        media: Arc::new(DiskStore::open(&media_dir, "http://localhost:8080").unwrap()),
        mailer,
    };
    web::Data::new(state)
}

macro_rules! test_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data($state.clone())
                .service(services::reports::configure_routes())
                .service(services::media::configure_routes())
                .service(services::notify::configure_routes()),
        )
        .await
    };
}

fn claim_payload(claimant_id: &str) -> Value {
    json!({
        "claimant_name": "P. Dlamini",
        "claimant_id": claimant_id,
        "claim_number": "RAF-2024-117",
        "date_of_birth": "1988-06-14",
        "residential_address": "14 Kloof St, Gardens",
        "postal_address": "PO Box 441, Cape Town",
        "phone_number": "083 555 0190",
        "email_address": "p.dlamini@example.com",
        "occupation": "Electrician",
        "employer_name": "Atlantic Electrical",
        "employer_address": "2 Paarden Eiland Rd",
        "claim_description": "Loss of income following collision"
    })
}

#[actix_web::test]
async fn saved_claim_appears_in_the_listing() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(dir.path(), None);
    let app = test_app!(state);

    let save = test::TestRequest::post()
        .uri("/api/reports/claim/save")
        .set_json(claim_payload("8806140233081"))
        .to_request();
    let response = test::call_service(&app, save).await;
    assert_eq!(response.status(), 201);
    let outcome: Value = test::read_body_json(response).await;
    let record_id = outcome["record_id"].as_str().unwrap().to_string();

    let list = test::TestRequest::get()
        .uri("/api/reports/claim")
        .to_request();
    let rows: Vec<Value> = test::call_and_read_body_json(&app, list).await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["record_id"], record_id.as_str());
    assert_eq!(rows[0]["claimant_id"], "8806140233081");
}

#[actix_web::test]
async fn invalid_claim_is_rejected_and_nothing_is_stored() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(dir.path(), None);
    let app = test_app!(state);

    let mut payload = claim_payload("");
    payload["claimant_name"] = json!("");
    let save = test::TestRequest::post()
        .uri("/api/reports/claim/save")
        .set_json(payload)
        .to_request();
    let response = test::call_service(&app, save).await;
    assert_eq!(response.status(), 400);

    let list = test::TestRequest::get()
        .uri("/api/reports/claim")
        .to_request();
    let rows: Vec<Value> = test::call_and_read_body_json(&app, list).await;
    assert!(rows.is_empty());
}

#[actix_web::test]
async fn listing_filters_on_the_identity_column() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(dir.path(), None);
    let app = test_app!(state);

    for id in ["1001", "2002", "1203"] {
        let save = test::TestRequest::post()
            .uri("/api/reports/claim/save")
            .set_json(claim_payload(id))
            .to_request();
        assert_eq!(test::call_service(&app, save).await.status(), 201);
    }

    let list = test::TestRequest::get()
        .uri("/api/reports/claim?search=20")
        .to_request();
    let rows: Vec<Value> = test::call_and_read_body_json(&app, list).await;
    let ids: Vec<&str> = rows
        .iter()
        .map(|r| r["claimant_id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, ["2002", "1203"]);
}

#[actix_web::test]
async fn updating_a_missing_record_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(dir.path(), None);
    let app = test_app!(state);

    let update = test::TestRequest::post()
        .uri("/api/reports/claim/update/no-such-record")
        .set_json(claim_payload("8806140233081"))
        .to_request();
    let response = test::call_service(&app, update).await;
    assert_eq!(response.status(), 404);
}

#[actix_web::test]
async fn unknown_report_kind_is_a_bad_request() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(dir.path(), None);
    let app = test_app!(state);

    let save = test::TestRequest::post()
        .uri("/api/reports/parking-ticket/save")
        .set_json(json!({}))
        .to_request();
    let response = test::call_service(&app, save).await;
    assert_eq!(response.status(), 400);
}

#[actix_web::test]
async fn html_document_renders_for_a_stored_record() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(dir.path(), None);
    let app = test_app!(state);

    let save = test::TestRequest::post()
        .uri("/api/reports/claim/save")
        .set_json(claim_payload("8806140233081"))
        .to_request();
    let outcome: Value =
        test::call_and_read_body_json(&app, save).await;
    let record_id = outcome["record_id"].as_str().unwrap();

    let doc = test::TestRequest::get()
        .uri(&format!(
            "/api/reports/claim/{record_id}/document?format=html"
        ))
        .to_request();
    let response = test::call_service(&app, doc).await;
    assert_eq!(response.status(), 200);
    let body = test::read_body(response).await;
    let html = String::from_utf8(body.to_vec()).unwrap();
    assert!(html.contains("P. Dlamini"));
    assert!(html.contains("RAF-2024-117"));
}

#[actix_web::test]
async fn notify_reports_per_recipient_outcomes() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(dir.path(), Some(Arc::new(FlakyRelay { refuse: "b@x.com" })));
    let app = test_app!(state);

    let notify = test::TestRequest::post()
        .uri("/api/notify")
        .set_json(json!({
            "recipients": "a@x.com, b@x.com",
            "subject": "Case update",
            "body": "<p>New document available.</p>",
            "attachment_url": "http://localhost:8080/media/doc.pdf"
        }))
        .to_request();
    let summary: Value = test::call_and_read_body_json(&app, notify).await;
    assert_eq!(summary["sent"], 1);
    assert_eq!(summary["failed"], 1);
    assert_eq!(summary["outcomes"].as_array().unwrap().len(), 2);
}

#[actix_web::test]
async fn notify_without_a_relay_is_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(dir.path(), None);
    let app = test_app!(state);

    let notify = test::TestRequest::post()
        .uri("/api/notify")
        .set_json(json!({
            "recipients": "a@x.com",
            "subject": "s",
            "body": "b"
        }))
        .to_request();
    let response = test::call_service(&app, notify).await;
    assert_eq!(response.status(), 503);
}

#[actix_web::test]
async fn multipart_accident_submission_appends_one_row() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(dir.path(), None);
    let app = test_app!(state);

    let driver = json!({
        "name": "", "id_number": "", "injuries": "", "license_number": "",
        "license_date_issued": null, "license_endorsements": "",
        "physical_mental_defects": "", "residential_address": "",
        "work_address": "", "employed": "No", "employer": "",
        "medical_aid": "No", "medical_aid_company": "", "insured": "No",
        "insurance_company": "", "under_influence": "No",
        "license_image_url": null
    });
    let report = json!({
        "case_number": "CAS-2024-061",
        "accident_date": "2024-06-14",
        "accident_time": "17:45:00",
        "road_name": "N2 Settlers Way",
        "police_station": "Woodstock SAPS",
        "police_reference_number": "WS/302/06",
        "speed_limit": 80,
        "weather": "Clear",
        "road_condition": "Good",
        "driver_a": driver.clone(),
        "driver_b": driver
    });

    let boundary = "---------------------------boundary";
    let body = format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"report\"\r\nContent-Type: application/json\r\n\r\n{report}\r\n--{boundary}--\r\n"
    );
    let submit = test::TestRequest::post()
        .uri("/api/reports/accident/submit")
        .insert_header((
            "content-type",
            format!("multipart/form-data; boundary={boundary}"),
        ))
        .set_payload(body)
        .to_request();
    let response = test::call_service(&app, submit).await;
    assert_eq!(response.status(), 201);

    let list = test::TestRequest::get()
        .uri("/api/reports/accident")
        .to_request();
    let rows: Vec<Value> = test::call_and_read_body_json(&app, list).await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["case_number"], "CAS-2024-061");
}

#[actix_web::test]
async fn uploaded_media_gets_a_public_locator() {
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(dir.path(), None);
    let app = test_app!(state);

    let boundary = "---------------------------boundary";
    let body = format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"scene.jpg\"\r\nContent-Type: image/jpeg\r\n\r\nnot-really-a-jpeg\r\n--{boundary}--\r\n"
    );
    let upload = test::TestRequest::post()
        .uri("/api/media/upload")
        .insert_header((
            "content-type",
            format!("multipart/form-data; boundary={boundary}"),
        ))
        .set_payload(body)
        .to_request();
    let response = test::call_service(&app, upload).await;
    assert_eq!(response.status(), 200);
    let outcome: Value = test::read_body_json(response).await;
    let url = outcome["url"].as_str().unwrap();
    assert!(url.starts_with("http://localhost:8080/media/"));
    assert!(!outcome["md5"].as_str().unwrap().is_empty());
}
