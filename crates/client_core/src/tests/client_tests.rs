use super::*;

use std::{collections::HashMap, time::Duration};

use axum::{
    extract::Multipart,
    http::StatusCode as HttpStatus,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use shared::{
    domain::{ImageMime, StyleId},
    error::{ErrorKind, GENERIC_SERVICE_FAILURE, TRANSPORT_FAILURE},
};
use tokio::{
    net::TcpListener,
    sync::{oneshot, Mutex},
};

const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nstylized";

#[derive(Debug)]
struct ReceivedField {
    file_name: Option<String>,
    content_type: Option<String>,
    data: Vec<u8>,
}

async fn spawn_backend(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}")
}

fn client_for(base_url: &str, request_timeout_secs: u64) -> StylizationClient {
    StylizationClient::new(&ClientSettings {
        api_base_url: base_url.to_string(),
        request_timeout_secs,
    })
    .expect("client")
}

fn request(style: StyleId, seed: Option<u64>) -> StylizeRequest {
    StylizeRequest {
        image: Arc::new(UploadSelection {
            file_name: "portrait.jpg".to_string(),
            mime: ImageMime::Jpeg,
            bytes: Arc::from(b"jpeg-bytes".to_vec()),
        }),
        parameters: StyleParameters {
            style,
            strength: 0.65,
            guidance_scale: 7.0,
            seed,
        },
    }
}

/// Backend that records the multipart body and answers with `PNG_BYTES`.
async fn spawn_recording_backend() -> (String, oneshot::Receiver<HashMap<String, ReceivedField>>) {
    let (tx, rx) = oneshot::channel();
    let tx = Arc::new(Mutex::new(Some(tx)));
    let app = Router::new().route(
        "/stylize",
        post(move |mut multipart: Multipart| {
            let tx = tx.clone();
            async move {
                let mut received = HashMap::new();
                while let Some(field) = multipart.next_field().await.expect("field") {
                    let name = field.name().unwrap_or_default().to_string();
                    let file_name = field.file_name().map(str::to_string);
                    let content_type = field.content_type().map(str::to_string);
                    let data = field.bytes().await.expect("field bytes").to_vec();
                    received.insert(
                        name,
                        ReceivedField {
                            file_name,
                            content_type,
                            data,
                        },
                    );
                }
                if let Some(tx) = tx.lock().await.take() {
                    let _ = tx.send(received);
                }
                Json(json!({
                    "style": "naruto",
                    "image_base64": STANDARD.encode(PNG_BYTES),
                    "metadata": { "strength": 0.65, "guidance_scale": 7.0, "seed": null }
                }))
            }
        }),
    );
    (spawn_backend(app).await, rx)
}

async fn spawn_failing_backend(status: HttpStatus, body: &'static str) -> String {
    let app = Router::new().route(
        "/stylize",
        post(move || async move { (status, body).into_response() }),
    );
    spawn_backend(app).await
}

#[tokio::test]
async fn sends_multipart_contract_and_decodes_result() {
    let (base_url, received_rx) = spawn_recording_backend().await;
    let client = client_for(&base_url, 5);

    let image = client
        .stylize(request(StyleId::Naruto, None))
        .await
        .expect("stylize");

    assert_eq!(image.bytes(), PNG_BYTES);
    let payload = image
        .data_uri()
        .strip_prefix("data:image/png;base64,")
        .map(str::to_string)
        .expect("data uri prefix");
    assert_eq!(STANDARD.decode(payload).expect("decode"), PNG_BYTES);

    let received = received_rx.await.expect("multipart body");
    let image_field = &received["image"];
    assert_eq!(image_field.data, b"jpeg-bytes");
    assert_eq!(image_field.file_name.as_deref(), Some("portrait.jpg"));
    assert_eq!(image_field.content_type.as_deref(), Some("image/jpeg"));
    assert_eq!(received["style"].data, b"naruto");
    assert_eq!(received["strength"].data, b"0.65");
    assert_eq!(received["guidance_scale"].data, b"7.0");
    assert!(!received.contains_key("seed"));
}

#[tokio::test]
async fn forwards_seed_when_set() {
    let (base_url, received_rx) = spawn_recording_backend().await;
    let client = client_for(&base_url, 5);

    client
        .stylize(request(StyleId::Davinci, Some(42)))
        .await
        .expect("stylize");

    let received = received_rx.await.expect("multipart body");
    assert_eq!(received["seed"].data, b"42");
    assert_eq!(received["style"].data, b"davinci");
}

#[tokio::test]
async fn surfaces_service_detail_verbatim() {
    let base_url =
        spawn_failing_backend(HttpStatus::SERVICE_UNAVAILABLE, r#"{"detail":"model overloaded"}"#)
            .await;
    let client = client_for(&base_url, 5);

    let err = client
        .stylize(request(StyleId::Ghibli, None))
        .await
        .expect_err("service error");

    assert_eq!(err.to_string(), "model overloaded");
    assert_eq!(err.kind(), ErrorKind::Service);
    assert_eq!(err.status(), Some(503));
}

#[tokio::test]
async fn unparsable_error_body_falls_back_to_generic_message() {
    let base_url =
        spawn_failing_backend(HttpStatus::INTERNAL_SERVER_ERROR, "<html>Bad Gateway</html>").await;
    let client = client_for(&base_url, 5);

    let err = client
        .stylize(request(StyleId::Ghibli, None))
        .await
        .expect_err("malformed error");

    assert_eq!(err.to_string(), GENERIC_SERVICE_FAILURE);
    assert_eq!(err.to_string(), "Backend failed to stylize the image.");
    assert_eq!(err.kind(), ErrorKind::MalformedServiceResponse);
}

#[tokio::test]
async fn non_string_detail_falls_back_to_generic_message() {
    let base_url = spawn_failing_backend(
        HttpStatus::UNPROCESSABLE_ENTITY,
        r#"{"detail":[{"loc":["body","image"],"msg":"field required"}]}"#,
    )
    .await;
    let client = client_for(&base_url, 5);

    let err = client
        .stylize(request(StyleId::Ghibli, None))
        .await
        .expect_err("malformed error");

    assert_eq!(err.to_string(), GENERIC_SERVICE_FAILURE);
}

#[tokio::test]
async fn padded_detail_is_not_trimmed() {
    let base_url = spawn_failing_backend(
        HttpStatus::SERVICE_UNAVAILABLE,
        r#"{"detail":"  model overloaded\n"}"#,
    )
    .await;
    let client = client_for(&base_url, 5);

    let err = client
        .stylize(request(StyleId::Ghibli, None))
        .await
        .expect_err("service error");

    assert_eq!(err.to_string(), "  model overloaded\n");
    assert_eq!(err.kind(), ErrorKind::Service);
}

#[tokio::test]
async fn array_error_body_falls_back_to_generic_message() {
    let base_url =
        spawn_failing_backend(HttpStatus::BAD_REQUEST, r#"["model overloaded"]"#).await;
    let client = client_for(&base_url, 5);

    let err = client
        .stylize(request(StyleId::Ghibli, None))
        .await
        .expect_err("malformed error");

    assert_eq!(err.to_string(), GENERIC_SERVICE_FAILURE);
    assert_eq!(err.kind(), ErrorKind::MalformedServiceResponse);
}

#[tokio::test]
async fn unreachable_backend_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    let client = client_for(&format!("http://{addr}"), 5);

    let err = client
        .stylize(request(StyleId::Ghibli, None))
        .await
        .expect_err("transport error");

    assert!(matches!(err, StylizeError::Transport(_)));
    assert_eq!(err.to_string(), TRANSPORT_FAILURE);
}

#[tokio::test]
async fn slow_backend_times_out_as_transport_error() {
    let app = Router::new().route(
        "/stylize",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(json!({ "image_base64": STANDARD.encode(PNG_BYTES) }))
        }),
    );
    let base_url = spawn_backend(app).await;
    let client = client_for(&base_url, 1);

    let err = client
        .stylize(request(StyleId::Ghibli, None))
        .await
        .expect_err("timeout");

    assert_eq!(err.kind(), ErrorKind::Transport);
}

#[tokio::test]
async fn success_with_bad_base64_is_an_invalid_payload() {
    let app = Router::new().route(
        "/stylize",
        post(|| async { Json(json!({ "image_base64": "not base64 at all!" })) }),
    );
    let base_url = spawn_backend(app).await;
    let client = client_for(&base_url, 5);

    let err = client
        .stylize(request(StyleId::Ghibli, None))
        .await
        .expect_err("invalid payload");

    assert!(matches!(err, StylizeError::InvalidPayload { .. }));
}

#[tokio::test]
async fn health_reports_backend_styles() {
    let app = Router::new().route(
        "/health",
        get(|| async {
            Json(json!({
                "status": "ok",
                "device": "cuda",
                "available_styles": ["ghibli", "naruto"]
            }))
        }),
    );
    let base_url = spawn_backend(app).await;
    let client = client_for(&format!("{base_url}/"), 5);

    let health = client.health().await.expect("health");
    assert_eq!(health.status, "ok");
    assert_eq!(health.device.as_deref(), Some("cuda"));
    assert_eq!(health.available_styles, vec!["ghibli", "naruto"]);
}

#[test]
fn service_error_classification() {
    assert!(matches!(
        service_error(StatusCode::BAD_REQUEST, br#"{"detail":"Unknown style \"x\"."}"#),
        StylizeError::Service { status: 400, .. }
    ));
    assert!(matches!(
        service_error(StatusCode::BAD_GATEWAY, b""),
        StylizeError::MalformedServiceResponse { status: 502 }
    ));
    assert!(matches!(
        service_error(StatusCode::BAD_GATEWAY, br#"{"error":"nope"}"#),
        StylizeError::MalformedServiceResponse { status: 502 }
    ));
    assert!(matches!(
        service_error(StatusCode::BAD_REQUEST, br#"["model overloaded"]"#),
        StylizeError::MalformedServiceResponse { status: 400 }
    ));
    match service_error(StatusCode::BAD_REQUEST, br#"{"detail":"  model overloaded\n"}"#) {
        StylizeError::Service { detail, .. } => assert_eq!(detail, "  model overloaded\n"),
        other => panic!("unexpected error: {other:?}"),
    }
}
