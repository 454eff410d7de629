//! Wire-level tests for `VerificationClient` against an in-process server.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use checkpoint_core::ports::VerificationPort;
use checkpoint_core::{
    CapturedImage, CheckpointService, ConsoleDisplay, DeviceConfig, Error, GateOutcome, Led,
    ScanEvent, TokenId, VerificationClient,
};
use parking_lot::Mutex;
use serde_json::{json, Value};
use tokio::net::TcpListener;

const API_KEY: &str = "gate-test-key";

/// Requests seen by the fake service: (endpoint, X-API-Key, JSON body).
type Seen = Arc<Mutex<Vec<(String, Option<String>, Value)>>>;

#[derive(Clone)]
struct FakeService {
    seen: Seen,
    heartbeat_status: StatusCode,
    verify_status: StatusCode,
    verify_body: String,
    verify_delay: Duration,
}

impl FakeService {
    fn granting() -> Self {
        Self {
            seen: Arc::default(),
            heartbeat_status: StatusCode::OK,
            verify_status: StatusCode::OK,
            verify_body: json!({
                "success": true,
                "gate_action": "granted",
                "action": "check_in",
                "student": {"name": "Juan Dela Cruz"},
                "timestamp": "2025-01-10 08:00:00",
                "sms_sent": false
            })
            .to_string(),
            verify_delay: Duration::ZERO,
        }
    }

    fn record(&self, endpoint: &str, headers: &HeaderMap, body: Value) {
        let key = headers
            .get("x-api-key")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        self.seen.lock().push((endpoint.to_string(), key, body));
    }
}

async fn heartbeat(
    State(svc): State<FakeService>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    svc.record("heartbeat.php", &headers, body);
    (svc.heartbeat_status, Json(json!({"success": true})))
}

async fn verify_entry(
    State(svc): State<FakeService>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    svc.record("verify-entry.php", &headers, body);
    tokio::time::sleep(svc.verify_delay).await;
    (
        svc.verify_status,
        [("content-type", "application/json")],
        svc.verify_body.clone(),
    )
}

struct TestServer {
    base_url: String,
    seen: Seen,
    handle: tokio::task::JoinHandle<()>,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn start_server(service: FakeService) -> TestServer {
    let seen = service.seen.clone();
    let app = Router::new()
        .route("/api/heartbeat.php", post(heartbeat))
        .route("/api/verify-entry.php", post(verify_entry))
        .with_state(service);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestServer {
        base_url: format!("http://{addr}/api"),
        seen,
        handle,
    }
}

fn client(base_url: &str) -> VerificationClient {
    VerificationClient::new(&DeviceConfig {
        api_base_url: base_url.to_string(),
        api_key: API_KEY.to_string(),
        verify_timeout_secs: 1,
        ..Default::default()
    })
    .unwrap()
}

fn scan(token: &str, image: Option<&str>) -> ScanEvent {
    ScanEvent::new(
        TokenId::parse(token).unwrap(),
        image.map(|b64| CapturedImage::from_base64(b64.to_string())),
    )
}

#[tokio::test]
async fn test_heartbeat_sends_key_and_status() {
    let server = start_server(FakeService::granting()).await;

    client(&server.base_url)
        .send_heartbeat("10.0.0.7")
        .await
        .unwrap();

    let seen = server.seen.lock().clone();
    assert_eq!(seen.len(), 1);
    let (endpoint, key, body) = &seen[0];
    assert_eq!(endpoint, "heartbeat.php");
    assert_eq!(key.as_deref(), Some(API_KEY));
    assert_eq!(body, &json!({"status": "online", "ip_address": "10.0.0.7"}));
}

#[tokio::test]
async fn test_heartbeat_rejected() {
    let server = start_server(FakeService {
        heartbeat_status: StatusCode::UNAUTHORIZED,
        ..FakeService::granting()
    })
    .await;

    let err = client(&server.base_url)
        .send_heartbeat("unknown")
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Status { status: 401, .. }), "{err}");
}

#[tokio::test]
async fn test_verify_entry_with_photo() {
    let server = start_server(FakeService::granting()).await;

    let response = client(&server.base_url)
        .verify_entry(&scan("0012345678", Some("SlBFRw==")))
        .await
        .unwrap();

    assert!(response.is_granted());
    assert_eq!(response.student_name(), "Juan Dela Cruz");
    assert_eq!(response.timestamp_or_empty(), "2025-01-10 08:00:00");

    let seen = server.seen.lock().clone();
    let (endpoint, key, body) = &seen[0];
    assert_eq!(endpoint, "verify-entry.php");
    assert_eq!(key.as_deref(), Some(API_KEY));
    assert_eq!(
        body,
        &json!({"student_id": "0012345678", "face_image": "SlBFRw=="})
    );
}

#[tokio::test]
async fn test_verify_entry_without_photo_sends_null() {
    let server = start_server(FakeService::granting()).await;

    client(&server.base_url)
        .verify_entry(&scan("0012345678", None))
        .await
        .unwrap();

    let seen = server.seen.lock().clone();
    let body = &seen[0].2;
    assert!(body.get("face_image").is_some_and(Value::is_null), "{body}");
}

#[tokio::test]
async fn test_denial_body_on_error_status_is_parsed() {
    let server = start_server(FakeService {
        verify_status: StatusCode::FORBIDDEN,
        verify_body: json!({
            "success": false,
            "gate_action": "denied",
            "message": "Student not enrolled"
        })
        .to_string(),
        ..FakeService::granting()
    })
    .await;

    let response = client(&server.base_url)
        .verify_entry(&scan("999", None))
        .await
        .unwrap();

    assert!(!response.is_granted());
    assert_eq!(response.message_or_default(), "Student not enrolled");
}

#[tokio::test]
async fn test_loose_flags_do_not_spoil_grant() {
    let server = start_server(FakeService {
        verify_body: json!({
            "success": 1,
            "gate_action": "granted",
            "student": {"name": "Juan Dela Cruz"},
            "sms_sent": null
        })
        .to_string(),
        ..FakeService::granting()
    })
    .await;

    let response = client(&server.base_url)
        .verify_entry(&scan("0012345678", None))
        .await
        .unwrap();

    assert!(response.is_granted());
    assert_eq!(response.sms_status(), Some("SMS notification could not be sent"));
}

#[tokio::test]
async fn test_garbled_body_is_an_error() {
    let server = start_server(FakeService {
        verify_body: "<html>502 Bad Gateway</html>".to_string(),
        ..FakeService::granting()
    })
    .await;

    let err = client(&server.base_url)
        .verify_entry(&scan("999", None))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Json(_)), "{err}");
}

#[tokio::test]
async fn test_slow_service_times_out() {
    let server = start_server(FakeService {
        verify_delay: Duration::from_secs(3),
        ..FakeService::granting()
    })
    .await;

    let err = client(&server.base_url)
        .verify_entry(&scan("999", None))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Http(ref e) if e.is_timeout()), "{err}");
}

#[tokio::test]
async fn test_unreachable_service() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = client(&format!("http://{addr}/api"));
    assert!(matches!(client.send_heartbeat("unknown").await, Err(Error::Http(_))));
    assert!(matches!(
        client.verify_entry(&scan("1", None)).await,
        Err(Error::Http(_))
    ));
}

/// Actuator that only remembers which LEDs were lit.
#[derive(Clone, Default)]
struct LedLog(Arc<Mutex<Vec<(Led, bool)>>>);

impl checkpoint_core::ports::ActuatorPort for LedLog {
    async fn beep(&self, _duration: Duration) {}

    async fn set_led(&self, led: Led, on: bool) {
        self.0.lock().push((led, on));
    }
}

#[tokio::test]
async fn test_service_over_http_denies_on_garbled_reply() {
    let server = start_server(FakeService {
        verify_body: "not json".to_string(),
        ..FakeService::granting()
    })
    .await;

    let leds = LedLog::default();
    let service = CheckpointService::new(
        checkpoint_core::LineTokenReader::new(tokio::io::BufReader::new(&b""[..])),
        NoCamera,
        leds.clone(),
        client(&server.base_url),
        ConsoleDisplay::new(),
        Duration::from_secs(60),
    );

    let report = service
        .process_token(TokenId::parse("0012345678").unwrap())
        .await;

    assert_eq!(report.outcome, Some(GateOutcome::NoResponse));
    assert!(!report.image_attached);
    assert_eq!(*leds.0.lock(), vec![(Led::Red, true), (Led::Red, false)]);
    assert_eq!(server.seen.lock().len(), 1);
}

struct NoCamera;

impl checkpoint_core::ports::CameraPort for NoCamera {
    async fn capture(&self) -> checkpoint_core::Result<CapturedImage> {
        Err(Error::Camera("camera disconnected".to_string()))
    }
}
