use crate::server::{error_response, run_blocking, AppState};
use crate::session::SessionId;
use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
pub struct StationSelection {
    pub line: String,
    pub station: String,
}

#[derive(Debug, Deserialize)]
pub struct PairSelection {
    pub start: String,
    pub end: String,
}

/// POST /sessions
pub async fn create_session_handler(state: web::Data<AppState>) -> impl Responder {
    let id = state.sessions.create();
    match state.sessions.with_session(id, |s| Ok(s.summary())) {
        Ok(summary) => HttpResponse::Created().json(summary),
        Err(e) => error_response(&e),
    }
}

/// GET /sessions/{id}
pub async fn get_session_handler(state: web::Data<AppState>, path: web::Path<SessionId>) -> impl Responder {
    match state.sessions.with_session(path.into_inner(), |s| Ok(s.summary())) {
        Ok(summary) => HttpResponse::Ok().json(summary),
        Err(e) => error_response(&e),
    }
}

/// DELETE /sessions/{id}
pub async fn delete_session_handler(state: web::Data<AppState>, path: web::Path<SessionId>) -> impl Responder {
    let id = path.into_inner();
    if state.sessions.remove(id) {
        HttpResponse::Ok().json(json!({"status": "ok", "removed": id}))
    } else {
        error_response(&crate::error::FootpathError::SessionNotFound(id))
    }
}

/// POST /sessions/{id}/station  {"line": "Purple Line", "station": "MG Road"}
pub async fn select_station_handler(
    state: web::Data<AppState>,
    path: web::Path<SessionId>,
    body: web::Json<StationSelection>,
) -> impl Responder {
    let id = path.into_inner();
    let sel = body.into_inner();
    let res = run_blocking(state, move |conn, st| {
        st.sessions.with_session(id, |s| {
            s.select_station(conn, &sel.line, &sel.station)?;
            Ok(s.summary())
        })
    })
    .await;
    match res {
        Ok(summary) => HttpResponse::Ok().json(summary),
        Err(e) => error_response(&e),
    }
}

/// GET /sessions/{id}/locations
pub async fn locations_handler(state: web::Data<AppState>, path: web::Path<SessionId>) -> impl Responder {
    let id = path.into_inner();
    match run_blocking(state, move |conn, st| st.sessions.with_session(id, |s| s.locations(conn))).await {
        Ok(locations) => HttpResponse::Ok().json(locations),
        Err(e) => error_response(&e),
    }
}

/// POST /sessions/{id}/pair  {"start": "...", "end": "..."}
/// Answers with the locked shortest path; the live table comes from
/// `/results`.
pub async fn choose_pair_handler(
    state: web::Data<AppState>,
    path: web::Path<SessionId>,
    body: web::Json<PairSelection>,
) -> impl Responder {
    let id = path.into_inner();
    let pair = body.into_inner();
    let res = run_blocking(state, move |conn, st| {
        st.sessions.with_session(id, |s| s.choose_pair(conn, &pair.start, &pair.end))
    })
    .await;
    match res {
        Ok(shortest) => HttpResponse::Ok().json(json!({"status": "ok", "stage": "results", "shortest": shortest})),
        Err(e) => error_response(&e),
    }
}

/// POST /sessions/{id}/back
pub async fn back_handler(state: web::Data<AppState>, path: web::Path<SessionId>) -> impl Responder {
    let res = state.sessions.with_session(path.into_inner(), |s| {
        s.back()?;
        Ok(s.summary())
    });
    match res {
        Ok(summary) => HttpResponse::Ok().json(summary),
        Err(e) => error_response(&e),
    }
}

/// GET /sessions/{id}/results
/// Clients poll this every `refresh_ms`.
pub async fn results_handler(state: web::Data<AppState>, path: web::Path<SessionId>) -> impl Responder {
    let refresh_ms = state.settings.refresh_ms;
    let res = state.sessions.with_session(path.into_inner(), |s| s.results(&state.counter));
    match res {
        Ok(view) => HttpResponse::Ok().json(json!({"refresh_ms": refresh_ms, "results": view})),
        Err(e) => error_response(&e),
    }
}

/// GET /sessions/{id}/paths/{label}
pub async fn path_details_handler(
    state: web::Data<AppState>,
    path: web::Path<(SessionId, String)>,
) -> impl Responder {
    let (id, label) = path.into_inner();
    match state.sessions.with_session(id, |s| s.path_details(&label)) {
        Ok(row) => HttpResponse::Ok().json(row),
        Err(e) => error_response(&e),
    }
}

/// POST /sessions/{id}/another
pub async fn choose_another_handler(state: web::Data<AppState>, path: web::Path<SessionId>) -> impl Responder {
    let res = state.sessions.with_session(path.into_inner(), |s| {
        s.choose_another()?;
        Ok(s.summary())
    });
    match res {
        Ok(summary) => HttpResponse::Ok().json(summary),
        Err(e) => error_response(&e),
    }
}

/// POST /sessions/{id}/restart
pub async fn restart_handler(state: web::Data<AppState>, path: web::Path<SessionId>) -> impl Responder {
    let res = state.sessions.with_session(path.into_inner(), |s| {
        s.restart();
        Ok(s.summary())
    });
    match res {
        Ok(summary) => HttpResponse::Ok().json(summary),
        Err(e) => error_response(&e),
    }
}

/// GET /counters
pub async fn counters_handler(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(state.counter.snapshot())
}
