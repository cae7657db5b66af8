use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{SecondsFormat, Utc};
use log::{error, info, warn};
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};

use colorsense_engine::chat::{ChatError, ChatService};
use colorsense_engine::query::{parse_list_params, QueryService};

const GENERIC_ERROR: &str = "Internal server error. Please try again.";
const FETCH_ERROR: &str = "Error fetching colors from database";

/// Shared by every handler.
pub struct AppState {
    pub query: QueryService,
    pub chat: ChatService,
    started: Instant,
}

impl AppState {
    pub fn new(query: QueryService, chat: ChatService) -> Self {
        Self {
            query,
            chat,
            started: Instant::now(),
        }
    }
}

/// Client-visible failure, rendered as `{success: false, message}`.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(&'static str),
    Internal(&'static str),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            Self::NotFound(message) => (StatusCode::NOT_FOUND, message.to_string()),
            Self::Internal(message) => (StatusCode::INTERNAL_SERVER_ERROR, message.to_string()),
        };
        (status, Json(json!({ "success": false, "message": message }))).into_response()
    }
}

impl From<ChatError> for ApiError {
    fn from(err: ChatError) -> Self {
        match err {
            ChatError::MissingMessage | ChatError::MalformedTipsRequest => {
                Self::BadRequest(err.to_string())
            }
            ChatError::NotConfigured => {
                error!("Chat request rejected: {err}");
                Self::Internal("Chat service is not configured")
            }
            ChatError::EmptyResponse => {
                warn!("Chat request failed: {err}");
                Self::Internal("No response from AI model")
            }
            ChatError::Model(_) => {
                error!("Chat request failed: {err}");
                Self::Internal(GENERIC_ERROR)
            }
        }
    }
}

pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/api/colors", get(list_colors))
        .route("/api/colors/{code}", get(color_detail))
        .route("/api/colors/{code}/palette", get(color_palette))
        .route("/api/colorsense", post(colorsense_chat))
        .fallback(route_not_found)
        .layer(cors)
        .with_state(state)
}

/// Binds and serves until Ctrl-C.
pub async fn serve(state: Arc<AppState>, host: &str, port: u16) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind((host, port))
        .await
        .with_context(|| format!("failed to bind {host}:{port}"))?;
    info!("ColorSense API listening on http://{}", listener.local_addr()?);
    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("Failed to install Ctrl-C handler: {err}");
        std::future::pending::<()>().await;
    }
    info!("Received Ctrl-C, shutting down");
}

/// Runs a storage call off the async workers. Failures are logged and
/// reported with the generic fetch message.
async fn run_blocking<T, F>(task: F) -> Result<T, ApiError>
where
    F: FnOnce() -> anyhow::Result<T> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(task).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => {
            error!("Error fetching colors: {err:#}");
            Err(ApiError::Internal(FETCH_ERROR))
        }
        Err(err) => {
            error!("Storage task failed: {err}");
            Err(ApiError::Internal(GENERIC_ERROR))
        }
    }
}

async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    let store = state.query.store().clone();
    let database = match tokio::task::spawn_blocking(move || store.ping()).await {
        Ok(Ok(())) => "connected",
        _ => "disconnected",
    };
    Json(json!({
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        "uptime_secs": state.started.elapsed().as_secs_f64(),
        "database": database,
    }))
}

async fn list_colors(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, ApiError> {
    let query = state.query.clone();
    let page = run_blocking(move || {
        let (filter, page) = parse_list_params(&params)?;
        query.list_colors(&filter, page)
    })
    .await?;
    Ok(Json(json!({
        "success": true,
        "colors": page.colors,
        "pagination": page.pagination,
    })))
}

async fn color_detail(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let query = state.query.clone();
    let color = run_blocking(move || query.color_by_code(&code))
        .await?
        .ok_or(ApiError::NotFound("Color not found"))?;
    Ok(Json(json!({ "success": true, "color": color })))
}

async fn color_palette(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let query = state.query.clone();
    let palette = run_blocking(move || query.palette_for_code(&code))
        .await?
        .ok_or(ApiError::NotFound("Color not found"))?;
    Ok(Json(json!({ "success": true, "palette": palette })))
}

async fn colorsense_chat(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let body = match payload {
        Ok(Json(Value::Object(body))) if !body.is_empty() => body,
        _ => return Err(ApiError::BadRequest("No JSON data provided".to_string())),
    };
    let message = body
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let chat = state.chat.clone();
    let reply = tokio::task::spawn_blocking(move || chat.respond(&message))
        .await
        .map_err(|err| {
            error!("Chat task failed: {err}");
            ApiError::Internal(GENERIC_ERROR)
        })??;
    Ok(Json(json!({ "success": true, "textOutput": reply })))
}

async fn route_not_found(uri: Uri) -> ApiError {
    warn!("Route not found: {uri}");
    ApiError::NotFound("Route not found")
}

#[cfg(test)]
mod tests {
    use anyhow::{bail, Result};
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request};
    use tower::ServiceExt;

    use colorsense_contracts::records::{build_record, CatalogColor};
    use colorsense_engine::providers::TextGenerator;
    use colorsense_engine::store::{ColorStore, SqliteColorStore};

    use super::*;

    struct EchoGenerator;

    impl TextGenerator for EchoGenerator {
        fn name(&self) -> &str {
            "echo"
        }

        fn generate_text(&self, prompt: &str) -> Result<String> {
            if prompt.contains("explode") {
                bail!("upstream timeout");
            }
            Ok(format!("  Consider Hale Navy (HC-154) for: {}  ", prompt.len()))
        }
    }

    fn app(generator: Option<Arc<dyn TextGenerator>>) -> Result<Router> {
        let store = SqliteColorStore::open_in_memory()?;
        for (name, code, hex) in [
            ("Simply White", "OC-117", "F2F1E6"),
            ("Hale Navy", "HC-154", "2D3142"),
            ("Caviar", "2130-10", "010000"),
        ] {
            store.insert_one(&build_record(&CatalogColor {
                name: name.to_string(),
                code: code.to_string(),
                hex: hex.to_string(),
            })?)?;
        }
        let store: Arc<dyn ColorStore> = Arc::new(store);
        let state = AppState::new(QueryService::new(store), ChatService::new(generator));
        Ok(build_router(Arc::new(state)))
    }

    fn default_app() -> Result<Router> {
        app(Some(Arc::new(EchoGenerator)))
    }

    async fn send(router: Router, request: Request<Body>) -> Result<(StatusCode, Value)> {
        let response = router.oneshot(request).await?;
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await?;
        Ok((status, serde_json::from_slice(&bytes)?))
    }

    async fn get_json(router: Router, uri: &str) -> Result<(StatusCode, Value)> {
        send(router, Request::builder().uri(uri).body(Body::empty())?).await
    }

    async fn post_chat(router: Router, body: &str) -> Result<(StatusCode, Value)> {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/colorsense")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))?;
        send(router, request).await
    }

    #[tokio::test]
    async fn list_returns_page_and_pagination() -> Result<()> {
        let (status, body) = get_json(default_app()?, "/api/colors?per_page=2").await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["colors"].as_array().map(Vec::len), Some(2));
        assert_eq!(body["colors"][0]["suggestedRooms"][0], json!("Living Room"));
        assert!(body["colors"][0].get("id").is_none());
        assert_eq!(
            body["pagination"],
            json!({ "total": 3, "page": 1, "per_page": 2, "total_pages": 2 })
        );
        Ok(())
    }

    #[tokio::test]
    async fn list_applies_query_and_filters() -> Result<()> {
        let (_, body) = get_json(default_app()?, "/api/colors?query=NAVY").await?;
        assert_eq!(body["pagination"]["total"], json!(1));
        assert_eq!(body["colors"][0]["code"], json!("HC-154"));

        let (_, body) =
            get_json(default_app()?, "/api/colors?family=red&room=Accent%20Wall").await?;
        assert_eq!(body["colors"][0]["name"], json!("Caviar"));
        assert_eq!(body["pagination"]["total"], json!(1));
        Ok(())
    }

    #[tokio::test]
    async fn list_rejects_malformed_numbers_as_server_error() -> Result<()> {
        let (status, body) = get_json(default_app()?, "/api/colors?page=two").await?;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            json!({ "success": false, "message": "Error fetching colors from database" })
        );
        Ok(())
    }

    #[tokio::test]
    async fn detail_and_palette_resolve_codes() -> Result<()> {
        let (status, body) = get_json(default_app()?, "/api/colors/HC-154").await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["color"]["name"], json!("Hale Navy"));

        let (status, body) = get_json(default_app()?, "/api/colors/HC-154/palette").await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["palette"].as_array().map(Vec::len), Some(6));
        assert_eq!(body["palette"][1]["type"], json!("Complementary"));
        assert_eq!(body["palette"][1]["code"], json!("CP-HC-154"));

        let (status, body) = get_json(default_app()?, "/api/colors/NOPE-1").await?;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], json!("Color not found"));
        Ok(())
    }

    #[tokio::test]
    async fn chat_general_message_returns_trimmed_text() -> Result<()> {
        let (status, body) =
            post_chat(default_app()?, r#"{"message": "Calm blue for a bedroom?"}"#).await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], json!(true));
        let text = body["textOutput"].as_str().unwrap_or_default();
        assert!(text.starts_with("Consider Hale Navy (HC-154) for:"));
        assert_eq!(text, text.trim());
        Ok(())
    }

    #[tokio::test]
    async fn chat_client_errors_are_bad_requests() -> Result<()> {
        let cases = [
            ("not json", "No JSON data provided"),
            ("{}", "No JSON data provided"),
            (r#"{"message": "   "}"#, "No message provided"),
            (r#"{"other": 1}"#, "No message provided"),
            (
                r#"{"message": "Generate 3 specific tips for using Simply White"}"#,
                "Could not extract color information from request",
            ),
        ];
        for (payload, expected) in cases {
            let (status, body) = post_chat(default_app()?, payload).await?;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{payload}");
            assert_eq!(body["message"], json!(expected), "{payload}");
        }
        Ok(())
    }

    #[tokio::test]
    async fn chat_model_failures_are_server_errors() -> Result<()> {
        let (status, body) = post_chat(default_app()?, r#"{"message": "explode"}"#).await?;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], json!(GENERIC_ERROR));

        let (status, body) = post_chat(app(None)?, r#"{"message": "hello"}"#).await?;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["success"], json!(false));
        Ok(())
    }

    #[tokio::test]
    async fn health_reports_database_and_unknown_routes_404() -> Result<()> {
        let (status, body) = get_json(default_app()?, "/health").await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], json!("ok"));
        assert_eq!(body["database"], json!("connected"));

        let (status, body) = get_json(default_app()?, "/api/unknown").await?;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "success": false, "message": "Route not found" }));
        Ok(())
    }
}
