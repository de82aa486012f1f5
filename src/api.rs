use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Extension, Path};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use serde_json::Value;
use tower_http::cors::CorsLayer;

use crate::error::AppError;
use crate::registry::execute::execute;
use crate::registry::params::{
    ListSubcommandsParams, PresetNameParams, RenderParams, SubcommandIdParams,
};
use crate::registry::{catalog, Command, CommandOutput, CommandResult};
use crate::state::AppState;

// ── Response types ───────────────────────────────────────────────

#[derive(Serialize)]
struct ApiOk<T: Serialize> {
    ok: bool,
    data: T,
}

#[derive(Serialize)]
struct ApiErr {
    ok: bool,
    error: String,
}

fn ok_json<T: Serialize>(data: T) -> impl IntoResponse {
    Json(ApiOk { ok: true, data })
}

fn err_json(status: StatusCode, msg: String) -> impl IntoResponse {
    (status, Json(ApiErr { ok: false, error: msg }))
}

fn status_for(err: &AppError) -> StatusCode {
    match err {
        AppError::NotFound { .. } => StatusCode::NOT_FOUND,
        AppError::IoError { .. } | AppError::ApiError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        AppError::ValidationError { .. } => StatusCode::BAD_REQUEST,
    }
}

// ── API command response ─────────────────────────────────────────

/// Full typed response from `POST /api/tools/{name}`: the human-readable
/// `message` plus the typed `result` (discriminated by `command`).
#[derive(Serialize)]
pub struct CommandResponse {
    pub message: String,
    pub result: CommandResult,
}

impl From<CommandOutput> for CommandResponse {
    fn from(output: CommandOutput) -> Self {
        Self {
            message: output.message,
            result: output.result,
        }
    }
}

/// The `data` payload of a result, without its `command` tag.
fn result_data(result: &CommandResult) -> Value {
    serde_json::to_value(result)
        .ok()
        .and_then(|v| v.get("data").cloned())
        .unwrap_or(Value::Null)
}

/// Run a command and answer with just its data.
fn respond(state: &Arc<AppState>, cmd: Command) -> Response {
    match execute(state, cmd) {
        Ok(output) => ok_json(result_data(&output.result)).into_response(),
        Err(e) => err_json(status_for(&e), e.to_string()).into_response(),
    }
}

// ── Handlers ─────────────────────────────────────────────────────

async fn post_render(
    Extension(state): Extension<Arc<AppState>>,
    Json(body): Json<Value>,
) -> Response {
    match serde_json::from_value::<RenderParams>(body) {
        Ok(params) => respond(&state, Command::Render(params)),
        Err(e) => err_json(StatusCode::BAD_REQUEST, e.to_string()).into_response(),
    }
}

async fn get_subcommands(Extension(state): Extension<Arc<AppState>>) -> Response {
    respond(&state, Command::ListSubcommands(ListSubcommandsParams::default()))
}

async fn get_subcommand(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<String>,
) -> Response {
    respond(&state, Command::GetSubcommand(SubcommandIdParams { id }))
}

async fn get_presets(Extension(state): Extension<Arc<AppState>>) -> Response {
    respond(&state, Command::ListPresets)
}

async fn get_preset(
    Extension(state): Extension<Arc<AppState>>,
    Path(name): Path<String>,
) -> Response {
    respond(&state, Command::GetPreset(PresetNameParams { name }))
}

async fn get_draft(Extension(state): Extension<Arc<AppState>>) -> Response {
    respond(&state, Command::GetDraft)
}

async fn get_tools() -> impl IntoResponse {
    ok_json(catalog::to_json_schema())
}

async fn post_tool(
    Extension(state): Extension<Arc<AppState>>,
    Path(name): Path<String>,
    body: Option<Json<Value>>,
) -> Response {
    let input = body.map_or(Value::Null, |Json(v)| v);
    let cmd = match catalog::deserialize_from_tool_call(&name, &input) {
        Ok(cmd) => cmd,
        Err(e) => return err_json(StatusCode::BAD_REQUEST, e).into_response(),
    };
    match execute(&state, cmd) {
        Ok(output) => ok_json(CommandResponse::from(output)).into_response(),
        Err(e) => err_json(status_for(&e), e.to_string()).into_response(),
    }
}

// ── Server startup ───────────────────────────────────────────────

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/render", post(post_render))
        .route("/api/subcommands", get(get_subcommands))
        .route("/api/subcommands/{id}", get(get_subcommand))
        .route("/api/presets", get(get_presets))
        .route("/api/presets/{name}", get(get_preset))
        .route("/api/draft", get(get_draft))
        .route("/api/tools", get(get_tools))
        .route("/api/tools/{name}", post(post_tool))
        .layer(CorsLayer::permissive())
        .layer(Extension(state))
}

/// Bind the HTTP API and serve it on a background task. Returns the bound
/// port, which differs from `addr`'s when that asks for port 0.
pub async fn start_api_server(state: Arc<AppState>, addr: SocketAddr) -> Result<u16, String> {
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| format!("Failed to bind API server: {e}"))?;
    let port = listener
        .local_addr()
        .map_err(|e| format!("Failed to get API server port: {e}"))?
        .port();

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!(error = %e, "API server error");
        }
    });

    tracing::info!(host = %addr.ip(), port, "API server listening");
    Ok(port)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::settings::AppSettings;

    async fn spawn() -> String {
        let state = Arc::new(AppState::new(AppSettings::default(), std::env::temp_dir()));
        let port = start_api_server(state, SocketAddr::from(([127, 0, 0, 1], 0)))
            .await
            .unwrap();
        format!("http://127.0.0.1:{port}")
    }

    #[tokio::test]
    async fn render_returns_command_and_lines() {
        let base = spawn().await;
        let body: Value = reqwest::Client::new()
            .post(format!("{base}/api/render"))
            .json(&serde_json::json!({
                "chain": [
                    { "subcommandId": "as", "config": { "target": "@a" } },
                    { "subcommandId": "at", "config": {} },
                    { "subcommandId": "not_a_subcommand", "config": {} }
                ],
                "runCommand": "say hi"
            }))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["ok"], true);
        assert_eq!(body["data"]["command"], "execute as @a at @s run say hi");
        assert_eq!(body["data"]["lines"][1], "run say hi");
    }

    #[tokio::test]
    async fn render_with_empty_body_uses_placeholder() {
        let base = spawn().await;
        let body: Value = reqwest::Client::new()
            .post(format!("{base}/api/render"))
            .json(&serde_json::json!({}))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["data"]["command"], "execute run say Hello!");
    }

    #[tokio::test]
    async fn unknown_subcommand_is_404() {
        let base = spawn().await;
        let resp = reqwest::get(format!("{base}/api/subcommands/fly")).await.unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::NOT_FOUND);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["ok"], false);
    }

    #[tokio::test]
    async fn tools_edit_the_session_draft() {
        let base = spawn().await;
        let client = reqwest::Client::new();
        let added: Value = client
            .post(format!("{base}/api/tools/add_step"))
            .json(&serde_json::json!({ "subcommandId": "positioned", "config": { "y": "100" } }))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(added["data"]["result"]["command"], "AddStep");

        let draft: Value = client
            .post(format!("{base}/api/tools/render_draft"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(
            draft["data"]["result"]["data"]["command"],
            "execute positioned ~ 100 ~ run say Hello!"
        );

        let tools: Value = reqwest::get(format!("{base}/api/tools"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert!(tools["data"].as_array().unwrap().len() > 10);
    }
}
