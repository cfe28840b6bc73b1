use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::{Multipart, Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde_json::{json, Value};

use pdfedit_client::ApiClient;
use pdfedit_shared::api::{ConvertFormat, ConvertResult};
use pdfedit_shared::{Annotation, AnnotationBody, AnnotationId, ApiError};

#[derive(Clone, Default)]
struct Backend {
    saved: Arc<Mutex<Vec<Value>>>,
}

async fn upload(mut multipart: Multipart) -> Json<Value> {
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() != Some("file") {
            continue;
        }
        let name = field.file_name().unwrap_or("unnamed").to_string();
        let size = field.bytes().await.map(|bytes| bytes.len()).unwrap_or(0);
        return Json(json!({
            "success": true,
            "fileId": "f-1",
            "filename": name,
            "fileSize": size,
            "pageCount": 3,
        }));
    }
    Json(json!({ "success": false, "error": "No file provided" }))
}

async fn edit(
    State(backend): State<Backend>,
    Path(file_id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    assert_eq!(body["fileId"], file_id.as_str());
    match body["operation"].as_str() {
        Some("save") => {
            let annotations = body["annotations"].as_array().cloned().unwrap_or_default();
            *backend.saved.lock().unwrap() = annotations;
            Json(json!({ "success": true })).into_response()
        }
        Some("download") if file_id == "linked" => Json(json!({
            "success": true,
            "downloadUrl": "/api/download/linked_edited.pdf",
        }))
        .into_response(),
        Some("download") if file_id == "dangling" => Json(json!({
            "success": true,
            "downloadUrl": "/api/download/gone.pdf",
        }))
        .into_response(),
        Some("download") => (
            [(header::CONTENT_TYPE, "application/pdf")],
            b"%PDF-1.4 edited".to_vec(),
        )
            .into_response(),
        _ => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "success": false, "error": "Unknown operation" })),
        )
            .into_response(),
    }
}

async fn ai(Path((_file_id, task)): Path<(String, String)>, body: Option<Json<Value>>) -> Response {
    let body = body.map(|Json(body)| body).unwrap_or(Value::Null);
    let reply = match task.as_str() {
        "summarize" => json!({ "success": true, "summary": "A short summary." }),
        "extract" => json!({ "success": true, "keyPoints": "First point\n\n  Second point  \n" }),
        "grammar" => {
            let text = body["text"].as_str().unwrap_or_default().replace("teh", "the");
            json!({ "success": true, "correctedText": text })
        }
        "chat" => json!({ "success": true, "answer": format!("You asked: {}", body["question"].as_str().unwrap_or_default()) }),
        _ => return StatusCode::NOT_FOUND.into_response(),
    };
    Json(reply).into_response()
}

async fn compress(Path(file_id): Path<String>) -> Response {
    if file_id == "missing" {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "success": false, "error": "File not found" })),
        )
            .into_response();
    }
    Json(json!({
        "success": true,
        "reductionPercent": 42.5,
        "downloadUrl": format!("/api/download/{file_id}_compressed.pdf"),
    }))
    .into_response()
}

async fn convert(Json(body): Json<Value>) -> Json<Value> {
    match body["format"].as_str() {
        Some("images") => Json(json!({ "success": true, "files": ["page_1.png", "page_2.png"] })),
        Some(format) => Json(json!({ "success": true, "downloadUrl": format!("/api/download/out.{format}") })),
        None => Json(json!({ "success": false, "error": "No format" })),
    }
}

async fn stored_file(Path(name): Path<String>) -> Response {
    if name != "linked_edited.pdf" {
        return StatusCode::NOT_FOUND.into_response();
    }
    (
        [(header::CONTENT_TYPE, "application/pdf")],
        b"%PDF-1.4 linked".to_vec(),
    )
        .into_response()
}

async fn spawn_backend() -> (String, Backend) {
    let backend = Backend::default();
    let app = Router::new()
        .route("/api/upload", post(upload))
        .route("/api/pdf/:file_id/edit", post(edit))
        .route("/api/pdf/:file_id/ai/:task", post(ai))
        .route("/api/pdf/:file_id/compress", post(compress))
        .route("/api/pdf/:file_id/convert", post(convert))
        .route("/api/download/:name", get(stored_file))
        .with_state(backend.clone());
    let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}/"), backend)
}

fn text_annotation(id: u64) -> Annotation {
    Annotation {
        id: AnnotationId::new(id),
        page: 1,
        timestamp: Utc::now(),
        body: AnnotationBody::Text {
            x: 100.0,
            y: 120.0,
            text: "Approved".into(),
            font_size: 16.0,
            color: "#000000".into(),
        },
    }
}

#[tokio::test]
async fn upload_returns_receipt() {
    let (base, _) = spawn_backend().await;
    let api = ApiClient::new(base);
    let receipt = api
        .upload("report.pdf", "application/pdf", b"%PDF-1.4".to_vec())
        .await
        .unwrap();
    assert_eq!(receipt.file_id, "f-1");
    assert_eq!(receipt.filename.as_deref(), Some("report.pdf"));
    assert_eq!(receipt.file_size, Some(8));
    assert_eq!(receipt.page_count, Some(3));
}

#[tokio::test]
async fn save_sends_the_full_annotation_list() {
    let (base, backend) = spawn_backend().await;
    let api = ApiClient::new(base);
    api.save("f-1", &[text_annotation(1), text_annotation(2)])
        .await
        .unwrap();

    let saved = backend.saved.lock().unwrap().clone();
    assert_eq!(saved.len(), 2);
    assert_eq!(saved[0]["type"], "text");
    assert_eq!(saved[0]["x"], 100.0);
    assert_eq!(saved[0]["fontSize"], 16.0);
    assert_eq!(saved[1]["id"], 2);
}

#[tokio::test]
async fn download_returns_binary_payload() {
    let (base, _) = spawn_backend().await;
    let api = ApiClient::new(base);
    let bytes = api.download("f-1").await.unwrap();
    assert_eq!(bytes, b"%PDF-1.4 edited");
}

#[tokio::test]
async fn download_follows_a_returned_link() {
    let (base, _) = spawn_backend().await;
    let api = ApiClient::new(base);
    let bytes = api.download("linked").await.unwrap();
    assert_eq!(bytes, b"%PDF-1.4 linked");

    let err = api.download("dangling").await.unwrap_err();
    assert_eq!(err, ApiError::Status(404));
}

#[test]
fn links_resolve_against_the_api_base() {
    let api = ApiClient::new("http://localhost:5000/");
    assert_eq!(
        api.resolve("/api/download/a.pdf"),
        "http://localhost:5000/api/download/a.pdf"
    );
    assert_eq!(
        api.resolve("api/download/a.pdf"),
        "http://localhost:5000/api/download/a.pdf"
    );
    assert_eq!(
        api.resolve("https://cdn.example.com/a.pdf"),
        "https://cdn.example.com/a.pdf"
    );
}

#[tokio::test]
async fn ai_endpoints_decode_their_bodies() {
    let (base, _) = spawn_backend().await;
    let api = ApiClient::new(base);
    assert_eq!(api.summarize("f-1").await.unwrap(), "A short summary.");
    assert_eq!(
        api.extract_key_points("f-1").await.unwrap(),
        vec!["First point".to_string(), "Second point".to_string()]
    );
    assert_eq!(
        api.check_grammar("f-1", "teh cat").await.unwrap(),
        "the cat"
    );
    assert_eq!(
        api.chat("f-1", "What is this?").await.unwrap(),
        "You asked: What is this?"
    );
}

#[tokio::test]
async fn compress_reports_reduction() {
    let (base, _) = spawn_backend().await;
    let api = ApiClient::new(base);
    let report = api.compress("f-1").await.unwrap();
    assert_eq!(report.reduction_percent, 42.5);
    assert_eq!(report.download_url, "/api/download/f-1_compressed.pdf");
}

#[tokio::test]
async fn error_envelope_on_failed_status_is_an_application_error() {
    let (base, _) = spawn_backend().await;
    let api = ApiClient::new(base);
    let err = api.compress("missing").await.unwrap_err();
    assert_eq!(err, ApiError::Application("File not found".into()));
}

#[tokio::test]
async fn convert_yields_link_or_file_list() {
    let (base, _) = spawn_backend().await;
    let api = ApiClient::new(base);
    assert_eq!(
        api.convert("f-1", ConvertFormat::Docx).await.unwrap(),
        ConvertResult::Download("/api/download/out.docx".into())
    );
    assert_eq!(
        api.convert("f-1", ConvertFormat::Images).await.unwrap(),
        ConvertResult::Files(vec!["page_1.png".into(), "page_2.png".into()])
    );
}

#[tokio::test]
async fn unknown_route_is_a_status_error() {
    let (base, _) = spawn_backend().await;
    let api = ApiClient::new(base);
    let err = api.summarize("f-1/unknown").await.unwrap_err();
    assert_eq!(err, ApiError::Status(404));
}

#[tokio::test]
async fn closed_port_is_a_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let api = ApiClient::new(format!("http://{addr}"));
    let err = api.summarize("f-1").await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
}
