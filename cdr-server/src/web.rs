use axum::{
    debug_handler,
    extract::{DefaultBodyLimit, Path, Query, State},
    http::{header, HeaderValue, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use log::{debug, error, info};
use serde::{Deserialize, Serialize};
use std::{io, net::SocketAddr};
use thiserror::Error;
use tokio::{net::TcpListener, sync::broadcast};
use tokio_graceful_shutdown::SubsystemHandle;

use cdr_core::{parse_content, ParseReport};

use crate::storage::{
    save_report, ListFilesOptions, RecordFilters, RecordSearchOptions, SharedStorage,
};
use crate::Session;

const UPLOAD_URI: &str = "/api/cdr/upload";
const FILES_URI: &str = "/api/cdr/files";
const FILE_URI: &str = "/api/cdr/files/{file_id}";
const RECORDS_URI: &str = "/api/cdr/records";

/// Largest accepted request body. Uploads carry whole CDR files, which
/// outgrow axum's 2 MiB default.
pub const MAX_BODY_BYTES: usize = 256 * 1024 * 1024;

#[derive(Error, Debug)]
pub enum WebError {
    #[error("Socket operation failed")]
    Io(#[from] io::Error),
}

#[derive(Clone)]
pub struct Web {
    session: Session,
    shutdown_tx: broadcast::Sender<()>,
}

impl Web {
    pub fn new(session: Session) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);

        Web {
            session,
            shutdown_tx,
        }
    }

    fn storage(&self) -> &SharedStorage {
        &self.session.storage
    }

    /// All API routes with state attached
    pub fn router(self) -> Router {
        Router::new()
            .route(UPLOAD_URI, post(upload))
            .route(FILES_URI, get(list_files))
            .route(FILE_URI, get(get_file))
            .route(RECORDS_URI, get(search_records))
            .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
            .layer(middleware::from_fn(no_cache_middleware))
            .with_state(self)
    }

    pub async fn run(self, subsys: SubsystemHandle) -> Result<(), WebError> {
        let args = self.session.args();
        let addr = SocketAddr::new(args.address, args.port);
        let listener = TcpListener::bind(addr).await.map_err(WebError::Io)?;

        let mut shutdown_rx = self.shutdown_tx.subscribe();
        let shutdown_tx = self.shutdown_tx.clone(); // self is consumed by router() below

        let app = self.router();

        info!("Starting HTTP web server on {}", addr);

        tokio::select! { biased;
            _ = subsys.on_shutdown_requested() => {
                let _ = shutdown_tx.send(());
            },
            r = axum::serve(listener, app)
                    .with_graceful_shutdown(
                        async move {
                            _ = shutdown_rx.recv().await;
                        }
                    ) => {
                return r.map_err(WebError::Io);
            }
        }
        Ok(())
    }
}

/// Middleware to add no-cache headers to API responses
async fn no_cache_middleware(
    request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("no-cache, no-store, must-revalidate"),
    );
    response
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}

fn lock_poisoned() -> Response {
    error!("Storage lock poisoned");
    error_response(StatusCode::INTERNAL_SERVER_ERROR, "storage unavailable")
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadRequest {
    file_name: Option<String>,
    content: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UploadResponse {
    file_id: u64,
    #[serde(flatten)]
    report: ParseReport,
}

/// POST /api/cdr/upload - Decode a file and store its records
/// Body: `{ "fileName": "cdr.dat", "content": "<file text>" }`
#[debug_handler]
async fn upload(State(state): State<Web>, body: axum::body::Bytes) -> Response {
    if body.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "Request body is empty");
    }

    let request: UploadRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            debug!("Rejected upload body: {}", e);
            return error_response(StatusCode::BAD_REQUEST, "Invalid JSON payload");
        }
    };

    let content = match request.content {
        Some(content) if !content.is_empty() => content,
        _ => return error_response(StatusCode::BAD_REQUEST, "content is required"),
    };

    debug!(
        "POST upload: {:?} ({} bytes)",
        request.file_name,
        content.len()
    );

    let report = parse_content(request.file_name.as_deref(), &content);

    let Ok(mut storage) = state.storage().write() else {
        return lock_poisoned();
    };
    match save_report(storage.as_mut(), &report) {
        Ok(summary) => Json(UploadResponse {
            file_id: summary.id,
            report,
        })
        .into_response(),
        Err(e) => {
            error!("Failed to store upload: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string())
        }
    }
}

/// GET /api/cdr/files - List uploaded files
#[debug_handler]
async fn list_files(
    State(state): State<Web>,
    Query(options): Query<ListFilesOptions>,
) -> Response {
    debug!("GET files {:?}", options);

    let Ok(storage) = state.storage().read() else {
        return lock_poisoned();
    };
    Json(storage.list_files(&options)).into_response()
}

/// GET /api/cdr/files/{file_id} - Get file details
#[debug_handler]
async fn get_file(State(state): State<Web>, Path(file_id): Path<u64>) -> Response {
    debug!("GET file {}", file_id);

    let Ok(storage) = state.storage().read() else {
        return lock_poisoned();
    };
    match storage.get_file(file_id) {
        Some(details) => Json(details).into_response(),
        None => error_response(StatusCode::NOT_FOUND, &format!("File {} not found", file_id)),
    }
}

/// GET /api/cdr/records - Search stored records
#[debug_handler]
async fn search_records(
    State(state): State<Web>,
    Query(filters): Query<RecordFilters>,
    Query(options): Query<RecordSearchOptions>,
) -> Response {
    debug!("GET records {:?} {:?}", filters, options);

    let Ok(storage) = state.storage().read() else {
        return lock_poisoned();
    };
    Json(storage.search_records(&filters, &options)).into_response()
}
