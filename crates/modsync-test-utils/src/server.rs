//! [`FixtureServer`]: a loopback HTTP server for sync scenarios.
//!
//! An axum router answers every path from a table of [`Route`] entries that
//! can be swapped while the server runs. Requests are recorded in arrival
//! order. The server runs on its own thread with a current-thread tokio
//! runtime, so blocking test code can talk to it directly.

use std::collections::HashMap;
use std::future::IntoFuture;
use std::io;
use std::net::{SocketAddr, TcpListener};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::extract::State;
use axum::http::{StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use futures_util::stream;
use modsync_fs::compute_bytes_hash;
use serde_json::{Value, json};
use tokio::sync::oneshot;

/// Path of the manifest endpoint relative to the base URL.
pub const MANIFEST_PATH: &str = "/api/mods-manifest";

/// How the server answers a path.
#[derive(Debug, Clone)]
pub enum Route {
    /// `200 OK` with the given body
    Ok(Vec<u8>),
    /// The given status with an empty body
    Status(u16),
    /// The given status with the given body
    Reply { status: u16, body: Vec<u8> },
    /// `200 OK` declaring `declared_len` bytes, then failing after `body`
    Truncated { body: Vec<u8>, declared_len: usize },
    /// Wait before answering `200 OK` with an empty body
    Stall(Duration),
}

#[derive(Debug, Default)]
struct Shared {
    routes: HashMap<String, Route>,
    requests: Vec<String>,
}

type SharedState = Arc<Mutex<Shared>>;

/// A running fixture server. Stops when dropped.
pub struct FixtureServer {
    addr: SocketAddr,
    shared: SharedState,
    shutdown: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl FixtureServer {
    /// Bind an ephemeral loopback port and start serving.
    pub fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .expect("FixtureServer::start: failed to bind loopback port");
        listener
            .set_nonblocking(true)
            .expect("FixtureServer::start: failed to make listener non-blocking");
        let addr = listener
            .local_addr()
            .expect("FixtureServer::start: no local address");

        let shared = SharedState::default();
        let app = Router::new()
            .fallback(dispatch)
            .with_state(Arc::clone(&shared));
        let (shutdown, stop) = oneshot::channel::<()>();

        let handle = thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("FixtureServer::start: failed to build tokio runtime");

            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::from_std(listener)
                    .expect("FixtureServer::start: failed to register listener");
                // Dropping the runtime afterwards cancels in-flight handlers
                tokio::select! {
                    _ = axum::serve(listener, app).into_future() => {}
                    _ = stop => {}
                }
            });
        });

        Self {
            addr,
            shared,
            shutdown: Some(shutdown),
            handle: Some(handle),
        }
    }

    /// `http://127.0.0.1:<port>`, without a trailing slash.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url(), path)
    }

    /// Install or replace the route for `path`.
    pub fn route(&self, path: &str, route: Route) {
        self.shared
            .lock()
            .unwrap()
            .routes
            .insert(path.to_string(), route);
    }

    /// Serve `manifest` as the manifest endpoint's JSON body.
    pub fn serve_manifest(&self, manifest: &Value) {
        self.route(MANIFEST_PATH, Route::Ok(manifest.to_string().into_bytes()));
    }

    /// Serve `content` under `/mods/<filename>` and return the matching
    /// manifest entry.
    pub fn host_artifact(&self, filename: &str, content: &[u8]) -> Value {
        let path = Self::artifact_path(filename);
        self.route(&path, Route::Ok(content.to_vec()));
        artifact_entry(filename, content, &self.url(&path))
    }

    /// Download path used by [`FixtureServer::host_artifact`].
    pub fn artifact_path(filename: &str) -> String {
        format!("/mods/{}", filename)
    }

    /// Every requested path, in arrival order.
    pub fn requests(&self) -> Vec<String> {
        self.shared.lock().unwrap().requests.clone()
    }

    /// Number of requests received for `path`.
    pub fn hits(&self, path: &str) -> usize {
        self.shared
            .lock()
            .unwrap()
            .requests
            .iter()
            .filter(|p| p.as_str() == path)
            .count()
    }
}

impl Drop for FixtureServer {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// A successful manifest body listing `entries`.
pub fn manifest_json(entries: Vec<Value>) -> Value {
    json!({
        "success": true,
        "server_ip": "127.0.0.1",
        "mods_count": entries.len(),
        "mods": entries,
    })
}

/// A manifest entry describing `content` served at `url`.
pub fn artifact_entry(filename: &str, content: &[u8], url: &str) -> Value {
    let project_name = filename
        .trim_start_matches("blockcraft-")
        .trim_end_matches(".jar");
    json!({
        "filename": filename,
        "project_name": project_name,
        "download_url": url,
        "size": content.len(),
        "sha1": compute_bytes_hash(content).as_str(),
    })
}

async fn dispatch(State(shared): State<SharedState>, uri: Uri) -> Response {
    let path = uri.path().to_string();
    let route = {
        let mut shared = shared.lock().unwrap();
        shared.requests.push(path.clone());
        shared.routes.get(&path).cloned()
    };

    match route {
        Some(Route::Ok(body)) => octet_stream(StatusCode::OK, body),
        Some(Route::Status(code)) => status(code).into_response(),
        Some(Route::Reply { status: code, body }) => octet_stream(status(code), body),
        Some(Route::Truncated { body, declared_len }) => truncated(body, declared_len),
        Some(Route::Stall(delay)) => {
            tokio::time::sleep(delay).await;
            StatusCode::OK.into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

fn status(code: u16) -> StatusCode {
    StatusCode::from_u16(code).expect("Route status must be a valid HTTP status code")
}

fn octet_stream(status: StatusCode, body: Vec<u8>) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/octet-stream")],
        body,
    )
        .into_response()
}

/// Declares the full length, sends `body`, then aborts the connection.
fn truncated(body: Vec<u8>, declared_len: usize) -> Response {
    let chunks: Vec<io::Result<Vec<u8>>> = vec![
        Ok(body),
        Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "connection dropped mid-body",
        )),
    ];

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/octet-stream")
        .header(header::CONTENT_LENGTH, declared_len)
        .body(Body::from_stream(stream::iter(chunks)))
        .expect("truncated response parts are valid")
}
