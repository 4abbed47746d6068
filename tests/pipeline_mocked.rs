/// Integration tests with a mocked calculation service.
/// Exercises the full submit/render/persist/visualize pipeline without
/// hitting a real backend.
use std::time::Duration;

use panchanga_client::api_client::PanchangaApiClient;
use panchanga_client::errors::AppError;
use panchanga_client::session::{Session, ALERT_PANCHANGA_FAILED, SOLAR_FALLBACK_TITLE};
use panchanga_client::store::{
    FileChannel, InsightStore, MemoryChannel, StorageChannel, INSIGHT_KEY,
};
use panchanga_client::view::{VisualState, EXPORT_LABEL_IDLE};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A storage channel that always fails, for isolation tests.
struct BrokenChannel;

impl StorageChannel for BrokenChannel {
    fn name(&self) -> &str {
        "broken"
    }

    fn write(&self, _key: &str, _value: &str) -> Result<(), AppError> {
        Err(AppError::Storage("unavailable".to_string()))
    }

    fn read(&self, _key: &str) -> Result<Option<String>, AppError> {
        Err(AppError::Storage("unavailable".to_string()))
    }
}

fn memory_store() -> InsightStore {
    InsightStore::new(vec![Box::new(MemoryChannel::new())])
}

fn session_for(server: &MockServer, store: InsightStore) -> Session {
    let client = PanchangaApiClient::new(server.uri()).unwrap();
    let mut session = Session::new(client, store);
    session.form.title = "My Event".to_string();
    session.form.date = "2024-01-15".to_string();
    session.form.time = "14:30".to_string();
    session.form.location = "Bengaluru".to_string();
    session
}

fn panchanga_success_body() -> serde_json::Value {
    json!({
        "success": true,
        "data": {
            "samvatsara": "Krodhi",
            "saka_year": 1946,
            "masa": "Pausha",
            "paksha": "Shukla",
            "tithi": "Panchami",
            "vara": "Monday",
            "nakshatra": "Rohini",
            "yoga": "Siddha",
            "karana": 3,
            "rashi": {"name": "Vrishabha"},
            "lagna": {"name": "Mesha"},
            "sunrise": "06:42:10",
            "sunset": "18:05:33",
            "next_birthday": "2025-01-04",
            "address": "Bengaluru, India",
            "timezone": "Asia/Kolkata",
            "angular": {
                "sun_sidereal": 15.0,
                "moon_sidereal": 345.0,
                "phase_angle": 90.0,
                "ayanamsha": 24.118
            }
        }
    })
}

async fn mount_panchanga_success(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/panchanga"))
        .respond_with(ResponseTemplate::new(200).set_body_json(panchanga_success_body()))
        .mount(server)
        .await;
}

async fn mount_visualization_success(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/skyshot"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "image_data": "data:image/png;base64,SKY",
            "nakshatra": "Rohini",
            "moon_longitude": 48.3,
            "phase_angle": 120.0
        })))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/solar-system"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "image_data": "data:image/png;base64,SOL"
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn submit_success_populates_all_regions() {
    let server = MockServer::start().await;
    mount_panchanga_success(&server).await;
    mount_visualization_success(&server).await;

    let mut session = session_for(&server, memory_store());
    session.submit().await;

    assert!(!session.screen.loader.visible);
    assert!(session.screen.alerts.is_empty());

    let result = &session.screen.result;
    assert!(result.visible);
    assert!(result.focus_requested);
    assert_eq!(result.heading, "My Event");
    assert_eq!(result.fields.tithi, "Panchami");
    assert_eq!(result.fields.saka_year, "1946");
    assert_eq!(result.fields.rashi, "Vrishabha");
    assert_eq!(result.fields.location, "Bengaluru, India (Asia/Kolkata)");

    let cards = session.screen.facts.cards.as_ref().unwrap();
    assert!(session.screen.facts.visible);
    assert_eq!(cards.sun_sign, "Mesha (Aries)");
    assert_eq!(cards.moon_sign, "Meena (Pisces)");
    assert_eq!(cards.moon_phase, "90.0° separation");
    assert_eq!(cards.ayanamsha, "24.12°");

    match &session.screen.skyshot.state {
        VisualState::Loaded(content) => {
            assert_eq!(content.title, "Rohini");
            assert_eq!(content.image, "data:image/png;base64,SKY");
            assert_eq!(
                content.caption.as_deref(),
                Some("Moon Position: 48.3° Sidereal | Phase: 120°")
            );
        }
        other => panic!("skyshot not loaded: {:?}", other),
    }
    match &session.screen.solar_system.state {
        VisualState::Loaded(content) => {
            assert_eq!(content.title, "My Event");
            assert_eq!(content.image, "data:image/png;base64,SOL");
            assert_eq!(content.caption, None);
        }
        other => panic!("solar system not loaded: {:?}", other),
    }

    let stored = session.stored_insight().unwrap();
    let payload: serde_json::Value = serde_json::from_str(&stored).unwrap();
    assert_eq!(payload["input_datetime"], "2024-01-15 14:30");
    assert_eq!(payload["tithi"], "Panchami");
}

#[tokio::test]
async fn submit_writes_both_storage_channels() {
    let server = MockServer::start().await;
    mount_panchanga_success(&server).await;
    mount_visualization_success(&server).await;

    let dir = tempfile::tempdir().unwrap();
    let mut session = session_for(&server, InsightStore::standard(dir.path()));
    session.submit().await;

    // The persistent channel holds the payload on its own
    let file_only = FileChannel::new(dir.path());
    let stored = file_only.read(INSIGHT_KEY).unwrap().unwrap();
    let payload: serde_json::Value = serde_json::from_str(&stored).unwrap();
    assert_eq!(payload["input_datetime"], "2024-01-15 14:30");
}

#[tokio::test]
async fn logical_failure_alerts_without_rendering() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/panchanga"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "error": "No location found"
        })))
        .mount(&server)
        .await;

    let mut session = session_for(&server, memory_store());
    session.submit().await;

    assert!(!session.screen.loader.visible);
    assert!(!session.screen.result.visible);
    assert_eq!(session.screen.alerts, vec!["Error: No location found"]);
    assert!(session.stored_insight().is_none());
    assert_eq!(session.screen.skyshot.state, VisualState::Hidden);
}

#[tokio::test]
async fn transport_failure_alerts_generic_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/panchanga"))
        .respond_with(ResponseTemplate::new(500).set_body_string("not json"))
        .mount(&server)
        .await;

    let mut session = session_for(&server, memory_store());
    session.submit().await;

    assert!(!session.screen.loader.visible);
    assert!(!session.screen.result.visible);
    assert_eq!(session.screen.alerts, vec![ALERT_PANCHANGA_FAILED]);
}

#[tokio::test]
async fn double_submit_leaves_loader_hidden() {
    let server = MockServer::start().await;
    mount_panchanga_success(&server).await;
    mount_visualization_success(&server).await;

    let mut session = session_for(&server, memory_store());
    session.submit().await;
    session.submit().await;

    assert!(!session.screen.loader.visible);
    assert!(session.screen.result.visible);
}

#[tokio::test]
async fn one_failing_channel_blocks_neither_storage_nor_rendering() {
    let server = MockServer::start().await;
    mount_panchanga_success(&server).await;
    mount_visualization_success(&server).await;

    let store = InsightStore::new(vec![
        Box::new(BrokenChannel),
        Box::new(MemoryChannel::new()),
    ]);
    let mut session = session_for(&server, store);
    session.submit().await;

    assert!(session.screen.result.visible);
    let stored = session.stored_insight().unwrap();
    assert!(stored.contains("\"input_datetime\":\"2024-01-15 14:30\""));
}

#[tokio::test]
async fn solar_system_resolving_first_interferes_with_nothing() {
    let server = MockServer::start().await;
    mount_panchanga_success(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/skyshot"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_json(json!({
                    "success": true,
                    "image_data": "data:image/png;base64,SKY",
                    "nakshatra": "Rohini"
                })),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/solar-system"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "image_data": "data:image/png;base64,SOL"
        })))
        .mount(&server)
        .await;

    let mut session = session_for(&server, memory_store());
    session.submit().await;

    match &session.screen.skyshot.state {
        VisualState::Loaded(content) => {
            assert_eq!(content.title, "Rohini");
            // No longitude/phase in the envelope: no caption, still loaded
            assert_eq!(content.caption, None);
        }
        other => panic!("skyshot not loaded: {:?}", other),
    }
    match &session.screen.solar_system.state {
        VisualState::Loaded(content) => assert_eq!(content.image, "data:image/png;base64,SOL"),
        other => panic!("solar system not loaded: {:?}", other),
    }
}

#[tokio::test]
async fn failed_skyshot_hides_its_panel_entirely() {
    let server = MockServer::start().await;
    mount_panchanga_success(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/skyshot"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "error": "render failed"
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/solar-system"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "image_data": "data:image/png;base64,SOL"
        })))
        .mount(&server)
        .await;

    let mut session = session_for(&server, memory_store());
    session.submit().await;

    assert_eq!(session.screen.skyshot.state, VisualState::Hidden);
    assert!(matches!(
        session.screen.solar_system.state,
        VisualState::Loaded(_)
    ));
    // Visualization failures degrade silently
    assert!(session.screen.alerts.is_empty());
}

#[tokio::test]
async fn solar_system_title_falls_back_when_event_title_empty() {
    let server = MockServer::start().await;
    mount_visualization_success(&server).await;

    let mut session = session_for(&server, memory_store());
    session.form.title = String::new();
    session.load_visualizations().await;

    match &session.screen.solar_system.state {
        VisualState::Loaded(content) => assert_eq!(content.title, SOLAR_FALLBACK_TITLE),
        other => panic!("solar system not loaded: {:?}", other),
    }
}

#[tokio::test]
async fn visualization_requests_reflect_current_form_edits() {
    let server = MockServer::start().await;
    mount_visualization_success(&server).await;

    let mut session = session_for(&server, memory_store());
    session.form.location = "Ujjain".to_string();
    session.load_visualizations().await;

    let requests = server.received_requests().await.unwrap();
    let skyshot_bodies: Vec<String> = requests
        .iter()
        .filter(|r| r.url.path() == "/api/skyshot")
        .map(|r| String::from_utf8(r.body.clone()).unwrap())
        .collect();
    assert_eq!(skyshot_bodies.len(), 1);
    assert!(skyshot_bodies[0].contains("Ujjain"));
}

#[tokio::test]
async fn repeated_visualization_load_hits_cache() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/skyshot"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "image_data": "data:image/png;base64,SKY",
            "nakshatra": "Rohini"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/solar-system"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "image_data": "data:image/png;base64,SOL"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut session = session_for(&server, memory_store());
    session.load_visualizations().await;
    session.load_visualizations().await;

    assert!(matches!(
        session.screen.skyshot.state,
        VisualState::Loaded(_)
    ));
    assert!(matches!(
        session.screen.solar_system.state,
        VisualState::Loaded(_)
    ));
}

#[tokio::test]
async fn export_saves_sanitized_filename_and_restores_control() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate-ical"))
        .respond_with(
            ResponseTemplate::new(200).set_body_bytes(b"BEGIN:VCALENDAR\r\nEND:VCALENDAR\r\n".to_vec()),
        )
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut session = session_for(&server, memory_store());
    let saved = session.export_ical(dir.path()).await.unwrap();

    assert_eq!(saved.file_name().unwrap(), "My_Event.ics");
    assert_eq!(
        std::fs::read(&saved).unwrap(),
        b"BEGIN:VCALENDAR\r\nEND:VCALENDAR\r\n"
    );
    assert_eq!(session.screen.export.label, EXPORT_LABEL_IDLE);
    assert!(session.screen.export.enabled);
    assert!(session.screen.alerts.is_empty());
}

#[tokio::test]
async fn export_failure_surfaces_error_and_restores_control() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate-ical"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "Missing required fields"
        })))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut session = session_for(&server, memory_store());
    let saved = session.export_ical(dir.path()).await;

    assert!(saved.is_none());
    assert_eq!(
        session.screen.alerts,
        vec!["Error generating iCal: Missing required fields"]
    );
    assert_eq!(session.screen.export.label, EXPORT_LABEL_IDLE);
    assert!(session.screen.export.enabled);
}

#[tokio::test]
async fn handoff_carries_persisted_payload_verbatim() {
    let server = MockServer::start().await;
    mount_panchanga_success(&server).await;
    mount_visualization_success(&server).await;
    Mock::given(method("POST"))
        .and(path("/insights"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>insights</html>"))
        .mount(&server)
        .await;

    let mut session = session_for(&server, memory_store());
    session.submit().await;
    let stored = session.stored_insight().unwrap();

    let page = session.handoff().await.unwrap();
    assert_eq!(page, "<html>insights</html>");

    let requests = server.received_requests().await.unwrap();
    let handoff = requests
        .iter()
        .find(|r| r.url.path() == "/insights")
        .expect("insights request sent");
    let pairs: Vec<(String, String)> = url::form_urlencoded::parse(&handoff.body)
        .into_owned()
        .collect();
    assert_eq!(pairs.len(), 1);
    assert_eq!(pairs[0].0, "panchanga_data");
    assert_eq!(pairs[0].1, stored);
}

#[tokio::test]
async fn handoff_without_stored_payload_is_a_storage_error() {
    let server = MockServer::start().await;
    let session = session_for(&server, memory_store());

    let outcome = session.handoff().await;
    assert!(matches!(outcome, Err(AppError::Storage(_))));
}
