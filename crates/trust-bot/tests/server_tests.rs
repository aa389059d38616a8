//! End-to-end tests of the slash command server against a mocked status API.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use chat::{ChatAdapter, ChatError, ChatMessage};
use serde_json::{json, Value};
use tokio::sync::Mutex;
use tower::ServiceExt;
use trust::{TrustClient, TrustConfig};
use trust_bot::signature::{sign, SIGNATURE_HEADER, TIMESTAMP_HEADER};
use trust_bot::{build_router, AppState, CommandHandler};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Default)]
struct Recorder {
    sent: Mutex<Vec<ChatMessage>>,
}

#[async_trait]
impl ChatAdapter for Recorder {
    fn name(&self) -> &'static str {
        "recorder"
    }

    async fn send(&self, message: &ChatMessage) -> Result<(), ChatError> {
        self.sent.lock().await.push(message.clone());
        Ok(())
    }
}

impl Recorder {
    /// Wait for the spawned handler to deliver `count` messages.
    async fn wait_for(&self, count: usize) -> Vec<ChatMessage> {
        for _ in 0..100 {
            {
                let sent = self.sent.lock().await;
                if sent.len() >= count {
                    return sent.clone();
                }
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        self.sent.lock().await.clone()
    }
}

fn state(api_url: &str, recorder: Arc<Recorder>, secret: Option<&str>) -> AppState {
    let config = TrustConfig::with_api_url(api_url);
    let client = TrustClient::new(&config).unwrap();
    AppState {
        handler: CommandHandler::new(Arc::new(client), config),
        adapter: recorder,
        signing_secret: secret.map(str::to_string),
        max_request_age_secs: 300,
    }
}

fn command_request(body: &'static str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/slack/commands")
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health() {
    let app = build_router(state("http://127.0.0.1:9", Arc::default(), None));
    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["status"], "healthy");
}

#[tokio::test]
async fn test_status_command_posts_attachment() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/instances/NA1/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "key": "NA1",
            "releaseVersion": "Spring '24",
            "Incidents": [],
            "Maintenances": []
        })))
        .mount(&server)
        .await;

    let recorder = Arc::new(Recorder::default());
    let app = build_router(state(&server.uri(), recorder.clone(), None));

    let response = app
        .oneshot(command_request(
            "command=%2Ftrust&text=status+na1&channel_id=C1&user_id=U1",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["response_type"], "in_channel");

    let sent = recorder.wait_for(1).await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].channel, "C1");
    assert_eq!(sent[0].attachments[0].title.as_deref(), Some("NA1 status"));
    assert_eq!(
        sent[0].attachments[0].text.as_deref(),
        Some("No incidents reported")
    );
}

#[tokio::test]
async fn test_unknown_instance_reply() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/instances/XX1/status"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let recorder = Arc::new(Recorder::default());
    let app = build_router(state(&server.uri(), recorder.clone(), None));

    app.oneshot(command_request("text=version+xx1&channel_id=C1&user_id=U1"))
        .await
        .unwrap();

    let sent = recorder.wait_for(1).await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].text.as_deref(), Some("<@U1> Unknown instance \"xx1\""));
}

#[tokio::test]
async fn test_unrecognized_text_gets_usage() {
    let recorder = Arc::new(Recorder::default());
    let app = build_router(state("http://127.0.0.1:9", recorder.clone(), None));

    let response = app
        .oneshot(command_request("text=hello&channel_id=C1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["response_type"], "ephemeral");
    assert_eq!(body["text"], trust_bot::USAGE);
    assert!(recorder.sent.lock().await.is_empty());
}

#[tokio::test]
async fn test_missing_channel_is_rejected() {
    let app = build_router(state("http://127.0.0.1:9", Arc::default(), None));
    let response = app.oneshot(command_request("text=metrics")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_signature_required_when_secret_set() {
    let app = build_router(state("http://127.0.0.1:9", Arc::default(), Some("secret")));

    let response = app
        .clone()
        .oneshot(command_request("text=hello&channel_id=C1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = "text=hello&channel_id=C1";
    let timestamp = chrono::Utc::now().timestamp().to_string();
    let request = Request::builder()
        .method("POST")
        .uri("/slack/commands")
        .header(TIMESTAMP_HEADER, &timestamp)
        .header(SIGNATURE_HEADER, "v0=00")
        .body(Body::from(body))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let signature = sign("secret", &timestamp, body.as_bytes()).unwrap();
    let request = Request::builder()
        .method("POST")
        .uri("/slack/commands")
        .header(TIMESTAMP_HEADER, &timestamp)
        .header(SIGNATURE_HEADER, signature)
        .body(Body::from(body))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_stale_signed_request_is_rejected() {
    let app = build_router(state("http://127.0.0.1:9", Arc::default(), Some("secret")));

    let body = "text=metrics&channel_id=C1";
    let timestamp = (chrono::Utc::now().timestamp() - 600).to_string();
    let signature = sign("secret", &timestamp, body.as_bytes()).unwrap();
    let request = Request::builder()
        .method("POST")
        .uri("/slack/commands")
        .header(TIMESTAMP_HEADER, &timestamp)
        .header(SIGNATURE_HEADER, signature)
        .body(Body::from(body))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
