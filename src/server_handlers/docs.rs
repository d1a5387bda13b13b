use actix_web::{HttpResponse, Responder};
use serde_json::json;

/// GET /help
pub async fn help_handler() -> impl Responder {
    let help = json!({
        "description": "Dynamic footpath allocation: pick a line and station, then a source and destination inside it. Results show every candidate path with a live crowd estimate frozen at arrival, the shortest path and the assigned best path.",
        "flow": ["station_selection", "route_selection", "results"],
        "endpoints": {
            "GET /lines": "lines with colour labels",
            "GET /lines/{line}/stations?search=": "stations on a line, optional substring search",
            "POST /sessions": "start a session",
            "GET /sessions/{id}": "session summary",
            "DELETE /sessions/{id}": "end a session",
            "POST /sessions/{id}/station": "{\"line\", \"station\"} -> route_selection",
            "GET /sessions/{id}/locations": "internal locations of the selected station",
            "POST /sessions/{id}/pair": "{\"start\", \"end\"} -> results",
            "POST /sessions/{id}/back": "route_selection -> station_selection",
            "GET /sessions/{id}/results": "frozen table plus refreshing series",
            "GET /sessions/{id}/paths/{label}": "one frozen row",
            "POST /sessions/{id}/another": "results -> route_selection",
            "POST /sessions/{id}/restart": "any stage -> station_selection",
            "POST /routes/generate": "{\"seed\"?} regenerate the routes table",
            "GET /counters": "assignment counts per path"
        },
        "example_pair": {"start": "Entry A - Outer Ring Road", "end": "Platform 1 - Towards Bommasandra"}
    });
    HttpResponse::Ok().json(help)
}
