use crate::server::{error_response, run_blocking, AppState};
use crate::session::{list_lines, list_stations};
use actix_web::{web, HttpResponse, Responder};
use std::collections::HashMap;

/// GET /lines
pub async fn lines_handler(state: web::Data<AppState>) -> impl Responder {
    match run_blocking(state, |conn, _| list_lines(conn)).await {
        Ok(lines) => HttpResponse::Ok().json(lines),
        Err(e) => error_response(&e),
    }
}

/// GET /lines/{line}/stations?search=maj
/// An unmatched search returns the whole line with `search_fallback: true`.
pub async fn stations_handler(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<HashMap<String, String>>,
) -> impl Responder {
    let line = path.into_inner();
    let search = query.get("search").cloned();
    match run_blocking(state, move |conn, _| list_stations(conn, &line, search.as_deref())).await {
        Ok(listing) => HttpResponse::Ok().json(listing),
        Err(e) => error_response(&e),
    }
}
