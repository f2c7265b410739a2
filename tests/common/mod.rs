//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use catalog_storefront::config::CatalogConfig;
use catalog_storefront::{Catalog, HttpServer, Shutdown};
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

/// One request seen by the mock products API.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: &'static str,
    pub path: String,
    pub content_type: Option<String>,
    pub body: Option<Value>,
}

#[derive(Default)]
struct ApiState {
    products: Mutex<Vec<Value>>,
    next_id: AtomicU64,
    requests: Mutex<Vec<Recorded>>,
    fail_writes: AtomicBool,
    list_delays: Mutex<VecDeque<Duration>>,
    get_delays: Mutex<VecDeque<Duration>>,
}

impl ApiState {
    fn record(&self, method: &'static str, path: String, headers: Option<&HeaderMap>, body: Option<Value>) {
        let content_type = headers
            .and_then(|h| h.get(header::CONTENT_TYPE))
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        self.requests.lock().unwrap().push(Recorded {
            method,
            path,
            content_type,
            body,
        });
    }
}

pub fn product(id: u64, title: &str, price: f64, img: &str, description: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "price": price,
        "img": img,
        "description": description,
    })
}

/// In-memory products API speaking the same JSON as the real one.
pub struct MockApi {
    pub addr: SocketAddr,
    state: Arc<ApiState>,
}

impl MockApi {
    pub async fn start(seed: Vec<Value>) -> Self {
        let max_id = seed.iter().filter_map(|p| p["id"].as_u64()).max().unwrap_or(0);
        let state = Arc::new(ApiState {
            products: Mutex::new(seed),
            next_id: AtomicU64::new(max_id),
            ..ApiState::default()
        });

        let app = Router::new()
            .route("/products", get(list_products).post(create_product))
            .route("/products/{id}", get(get_product).delete(delete_product))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, state }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn count(&self, method: &str, path: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    /// Make every create and delete answer 500.
    pub fn fail_writes(&self, fail: bool) {
        self.state.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Hold the next list response back. The body is still taken on arrival.
    pub fn delay_next_list(&self, delay: Duration) {
        self.state.list_delays.lock().unwrap().push_back(delay);
    }

    /// Hold the next single-product response back. The body is still taken on arrival.
    pub fn delay_next_get(&self, delay: Duration) {
        self.state.get_delays.lock().unwrap().push_back(delay);
    }

    /// Add a product behind the storefront's back.
    pub fn insert(&self, product: Value) {
        self.state.products.lock().unwrap().push(product);
    }

    pub fn products(&self) -> Vec<Value> {
        self.state.products.lock().unwrap().clone()
    }
}

async fn list_products(State(state): State<Arc<ApiState>>) -> Json<Value> {
    state.record("GET", "/products".into(), None, None);
    let products = state.products.lock().unwrap().clone();
    let delay = state.list_delays.lock().unwrap().pop_front();
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
    Json(Value::Array(products))
}

async fn get_product(State(state): State<Arc<ApiState>>, Path(id): Path<u64>) -> Response {
    state.record("GET", format!("/products/{}", id), None, None);
    let found = state
        .products
        .lock()
        .unwrap()
        .iter()
        .find(|p| p["id"].as_u64() == Some(id))
        .cloned();
    let delay = state.get_delays.lock().unwrap().pop_front();
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
    match found {
        Some(product) => Json(product).into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({"error": "not found"}))).into_response(),
    }
}

async fn create_product(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let body: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    state.record("POST", "/products".into(), Some(&headers), Some(body.clone()));

    if state.fail_writes.load(Ordering::SeqCst) {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    let id = state.next_id.fetch_add(1, Ordering::SeqCst) + 1;
    let mut created = body;
    created["id"] = json!(id);
    state.products.lock().unwrap().push(created.clone());
    (StatusCode::CREATED, Json(created)).into_response()
}

async fn delete_product(State(state): State<Arc<ApiState>>, Path(id): Path<u64>) -> Response {
    state.record("DELETE", format!("/products/{}", id), None, None);

    if state.fail_writes.load(Ordering::SeqCst) {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    let mut products = state.products.lock().unwrap();
    let before = products.len();
    products.retain(|p| p["id"].as_u64() != Some(id));
    if products.len() == before {
        return StatusCode::NOT_FOUND.into_response();
    }
    Json(json!({})).into_response()
}

/// Start a raw backend that answers every connection with the same response.
pub async fn start_programmable_backend(status: u16, body: &'static str) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    tokio::spawn(async move {
                        let mut buf = [0u8; 4096];
                        let _ = socket.read(&mut buf).await;

                        let status_text = match status {
                            200 => "200 OK",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };
                        let response = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// A running storefront in front of some API.
pub struct Storefront {
    pub addr: SocketAddr,
    pub catalog: Arc<Catalog>,
    pub config_tx: mpsc::UnboundedSender<CatalogConfig>,
    shutdown: Shutdown,
}

impl Storefront {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for Storefront {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

pub fn config_for(api_base: &str) -> CatalogConfig {
    let mut config = CatalogConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.api.base_url = api_base.to_string();
    config.api.request_timeout_secs = Some(5);
    config
}

/// Start the storefront. Requests are accepted once pre-rendering finished.
pub async fn start_storefront(config: CatalogConfig) -> Storefront {
    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = HttpServer::new(config).unwrap();
    let catalog = server.catalog().clone();
    let (config_tx, config_rx) = mpsc::unbounded_channel();
    let shutdown = Shutdown::new();
    let shutdown_rx = shutdown.subscribe();

    tokio::spawn(async move {
        server.run(listener, config_rx, shutdown_rx).await.unwrap();
    });

    Storefront {
        addr,
        catalog,
        config_tx,
        shutdown,
    }
}

/// Browser-like client that does not follow redirects.
pub fn browser() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}

pub async fn wait_for<F: Fn() -> bool>(condition: F, timeout: Duration) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    condition()
}
