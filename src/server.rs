use crate::config::Settings;
use crate::engine::AssignmentCounter;
use crate::error::{FootpathError, Result};
use crate::server_handlers::*;
use crate::session::SessionRegistry;
use crate::store;
use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer};
use log::info;
use rusqlite::Connection;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

/// Shared state handed to every handler through `web::Data`.
pub struct AppState {
    pub settings: Settings,
    pub counter: AssignmentCounter,
    pub sessions: SessionRegistry,
    blocking: Arc<Semaphore>,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        let sessions = SessionRegistry::new(settings.seed)
            .with_idle_limit(Duration::from_secs(settings.session_idle_secs));
        AppState {
            settings,
            counter: AssignmentCounter::new(),
            sessions,
            blocking: Arc::new(Semaphore::new(std::cmp::max(1, num_cpus::get()))),
        }
    }

    /// Open a short-lived connection to the configured DB.
    pub fn connect(&self) -> Result<Connection> {
        store::open_connection(&self.settings.db_path)
    }
}

/// Run `f` on the blocking pool with a fresh DB connection. At most one
/// blocking job per CPU runs at a time.
pub async fn run_blocking<F, T>(state: web::Data<AppState>, f: F) -> Result<T>
where
    F: FnOnce(&Connection, &AppState) -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    let permit = state
        .blocking
        .clone()
        .acquire_owned()
        .await
        .map_err(|e| FootpathError::Io(std::io::Error::other(e)))?;
    let handle = tokio::task::spawn_blocking(move || {
        let _permit = permit;
        let conn = state.connect()?;
        f(&conn, &state)
    });
    match handle.await {
        Ok(res) => res,
        Err(e) => Err(FootpathError::Io(std::io::Error::other(e))),
    }
}

/// Map an error to its HTTP status with a `{"error": ...}` body.
pub fn error_response(e: &FootpathError) -> HttpResponse {
    let body = json!({"error": e.to_string(), "kind": error_kind(e)});
    match e {
        FootpathError::NoLines
        | FootpathError::NoStations(_)
        | FootpathError::NoLocations(_)
        | FootpathError::NoRoutes { .. }
        | FootpathError::UnknownPath(_)
        | FootpathError::SessionNotFound(_) => HttpResponse::NotFound().json(body),
        FootpathError::SameSourceDestination(_)
        | FootpathError::StationNotOnLine { .. }
        | FootpathError::Config(_) => HttpResponse::BadRequest().json(body),
        FootpathError::InvalidStage { .. } => HttpResponse::Conflict().json(body),
        FootpathError::Store(_) | FootpathError::Io(_) => HttpResponse::ServiceUnavailable().json(body),
    }
}

fn error_kind(e: &FootpathError) -> &'static str {
    if e.is_empty_result() {
        "not_found"
    } else if e.is_transient() {
        "unavailable"
    } else {
        "invalid"
    }
}

/// Register every route. Shared by `run_server` and the handler tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/lines", web::get().to(lines_handler))
        .route("/lines/{line}/stations", web::get().to(stations_handler))
        .route("/sessions", web::post().to(create_session_handler))
        .route("/sessions/{id}", web::get().to(get_session_handler))
        .route("/sessions/{id}", web::delete().to(delete_session_handler))
        .route("/sessions/{id}/station", web::post().to(select_station_handler))
        .route("/sessions/{id}/locations", web::get().to(locations_handler))
        .route("/sessions/{id}/pair", web::post().to(choose_pair_handler))
        .route("/sessions/{id}/back", web::post().to(back_handler))
        .route("/sessions/{id}/results", web::get().to(results_handler))
        .route("/sessions/{id}/paths/{label}", web::get().to(path_details_handler))
        .route("/sessions/{id}/another", web::post().to(choose_another_handler))
        .route("/sessions/{id}/restart", web::post().to(restart_handler))
        .route("/routes/generate", web::post().to(generate_routes_handler))
        .route("/counters", web::get().to(counters_handler))
        .route("/help", web::get().to(help_handler));
}

pub async fn run_server(settings: Settings) -> std::io::Result<()> {
    let bind = settings.bind.clone();
    let state = web::Data::new(AppState::new(settings));
    info!("serving on http://{} (db: {})", bind, state.settings.db_path.display());
    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind(bind)?
    .run()
    .await
}
