//! HTTP gateway for the chat front end: inbound events in, render requests out.
//! Run with: BOT_TOKEN=... cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT.
//! Also serves the stored history for other tooling.

use actix_web::{
    delete, get, post,
    web::{Data, Json, Path},
    App, HttpRequest, HttpResponse, HttpServer, Responder,
};
use bracket_bot::{Bot, ChatId, Config, Event, HistoryStore, JsonFileHistory, TournamentId};
use serde::Deserialize;
use std::sync::RwLock;
use std::time::Duration;

/// In-memory state: all chat sessions plus the history file.
type AppState = Data<RwLock<Bot<JsonFileHistory>>>;

const TOKEN_HEADER: &str = "X-Bot-Token";

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

/// Path segment: chat id (e.g. /api/chats/{chat_id}/events)
#[derive(Deserialize)]
struct ChatPath {
    chat_id: ChatId,
}

/// Path segment: stored tournament id (e.g. /api/history/{id})
#[derive(Deserialize)]
struct HistoryPath {
    id: TournamentId,
}

/// Requests must carry the configured token.
fn authorized(req: &HttpRequest, config: &Config) -> bool {
    req.headers()
        .get(TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == config.bot_token)
}

fn unauthorized() -> HttpResponse {
    HttpResponse::Unauthorized().json(serde_json::json!({ "error": "Invalid bot token" }))
}

fn lock_error() -> HttpResponse {
    HttpResponse::InternalServerError().body("lock error")
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "bracket-bot",
    })
}

/// Deliver one chat event; returns the replies to render, in order.
#[post("/api/chats/{chat_id}/events")]
async fn api_chat_event(
    state: AppState,
    config: Data<Config>,
    req: HttpRequest,
    path: Path<ChatPath>,
    body: Json<Event>,
) -> HttpResponse {
    if !authorized(&req, &config) {
        return unauthorized();
    }
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    let replies = g.handle(path.chat_id, body.into_inner());
    HttpResponse::Ok().json(replies)
}

/// List stored tournaments, oldest first.
#[get("/api/history")]
async fn api_list_history(state: AppState, config: Data<Config>, req: HttpRequest) -> HttpResponse {
    if !authorized(&req, &config) {
        return unauthorized();
    }
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.history().list() {
        Ok(summaries) => HttpResponse::Ok().json(summaries),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({ "error": e.to_string() })),
    }
}

/// Get one stored tournament (404 if not found).
#[get("/api/history/{id}")]
async fn api_get_history(
    state: AppState,
    config: Data<Config>,
    req: HttpRequest,
    path: Path<HistoryPath>,
) -> HttpResponse {
    if !authorized(&req, &config) {
        return unauthorized();
    }
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.history().get(&path.id) {
        Ok(Some(record)) => HttpResponse::Ok().json(record),
        Ok(None) => HttpResponse::NotFound().json(serde_json::json!({ "error": "No tournament" })),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({ "error": e.to_string() })),
    }
}

/// Delete one stored tournament (404 if it was not there).
#[delete("/api/history/{id}")]
async fn api_delete_history(
    state: AppState,
    config: Data<Config>,
    req: HttpRequest,
    path: Path<HistoryPath>,
) -> HttpResponse {
    if !authorized(&req, &config) {
        return unauthorized();
    }
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return lock_error(),
    };
    match g.history_mut().delete(&path.id) {
        Ok(true) => {
            log::info!("Deleted tournament {} via API", path.id);
            HttpResponse::NoContent().finish()
        }
        Ok(false) => HttpResponse::NotFound().json(serde_json::json!({ "error": "No tournament" })),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({ "error": e.to_string() })),
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Configuration error: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
        }
    };

    let history = JsonFileHistory::new(&config.history_file);
    log::info!("History file: {}", history.path().display());
    let bot = match config.seed {
        Some(seed) => {
            log::info!("Using fixed bracket seed {}", seed);
            Bot::with_seed(history, seed)
        }
        None => Bot::new(history),
    };
    let state = Data::new(RwLock::new(bot));

    // Background task: every 30 minutes, drop sessions idle for longer than the timeout
    let state_cleanup = state.clone();
    let timeout = config.session_timeout;
    actix_web::rt::spawn(async move {
        let mut interval = actix_web::rt::time::interval(Duration::from_secs(30 * 60));
        loop {
            interval.tick().await;
            let mut g = match state_cleanup.write() {
                Ok(guard) => guard,
                Err(_) => continue,
            };
            let removed = g.prune_inactive(timeout);
            if removed > 0 {
                log::info!("Cleaned up {} inactive session(s)", removed);
            }
        }
    });

    let bind = (config.host.clone(), config.port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);
    let config = Data::new(config);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(config.clone())
            .service(api_health)
            .service(api_chat_event)
            .service(api_list_history)
            .service(api_get_history)
            .service(api_delete_history)
    })
    .bind(bind)?
    .run()
    .await
}
