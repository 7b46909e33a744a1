// tests/common/mod.rs
//! A stand-in recognition service for exercising the real upload client.
#![allow(dead_code)]

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

#[derive(Clone)]
pub enum Reply {
    Json(Value),
    Status(u16),
    Text(&'static str),
}

#[derive(Debug, Clone)]
pub struct CapturedPart {
    pub name: Option<String>,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Clone)]
struct MockState {
    reply: Reply,
    parts: Arc<Mutex<Vec<CapturedPart>>>,
    hits: Arc<AtomicUsize>,
}

pub struct MockService {
    pub base_url: String,
    state: MockState,
}

impl MockService {
    pub fn hits(&self) -> usize {
        self.state.hits.load(Ordering::SeqCst)
    }

    pub fn parts(&self) -> Vec<CapturedPart> {
        self.state.parts.lock().unwrap().clone()
    }
}

async fn extract_dishes(State(state): State<MockState>, mut multipart: Multipart) -> Response {
    state.hits.fetch_add(1, Ordering::SeqCst);
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().map(str::to_string);
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.map(|b| b.to_vec()).unwrap_or_default();
        state.parts.lock().unwrap().push(CapturedPart {
            name,
            file_name,
            content_type,
            bytes,
        });
    }

    match state.reply {
        Reply::Json(body) => (StatusCode::OK, Json(body)).into_response(),
        Reply::Status(code) => StatusCode::from_u16(code)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            .into_response(),
        Reply::Text(body) => (StatusCode::OK, body).into_response(),
    }
}

/// Serve `POST /extract-dishes` on an ephemeral local port.
pub async fn spawn_service(reply: Reply) -> MockService {
    let state = MockState {
        reply,
        parts: Arc::new(Mutex::new(Vec::new())),
        hits: Arc::new(AtomicUsize::new(0)),
    };
    let app = Router::new()
        .route("/", get(|| async { "menu recognition" }))
        .route("/extract-dishes", post(extract_dishes))
        .with_state(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockService {
        base_url: format!("http://{}", addr),
        state,
    }
}

/// A base URL nothing listens on.
pub async fn dead_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

pub fn jpeg_fixture(name: &str) -> PathBuf {
    let path = std::env::temp_dir()
        .join(format!("menusnap-it-{}-{}.jpg", std::process::id(), name));
    std::fs::write(&path, [0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F']).unwrap();
    path
}
