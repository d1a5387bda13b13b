//! Synthetic route table.
//!
//! For every station and every ordered pair of distinct locations inside it,
//! invent a handful of alternative walking paths with randomized distances.
//! Generation is pure over its inputs and RNG; persisting the result is a
//! single `replace_routes` call.

use crate::error::Result;
use crate::models::{Location, LocationKind, Route, Station};
use crate::store::{self, queries};
use log::info;
use rand::Rng;
use rusqlite::Connection;
use serde::Serialize;

/// Assumed walking speed in meters per minute.
pub const WALKING_SPEED_M_PER_MIN: u32 = 70;
pub const MIN_WALK_TIME_MIN: u32 = 2;
/// Inclusive range of the distance step between consecutive alternatives.
pub const EXTRA_STEP_RANGE: (u32, u32) = (10, 50);

/// Whole minutes needed to walk `distance_m`, never below two.
pub fn walking_time(distance_m: u32) -> u32 {
    (distance_m / WALKING_SPEED_M_PER_MIN).max(MIN_WALK_TIME_MIN)
}

/// Entry → platform trips get four alternatives, everything else two.
pub fn alternatives_for(start: &Location, end: &Location) -> usize {
    if start.kind == LocationKind::Entry && end.kind == LocationKind::Platform {
        4
    } else {
        2
    }
}

pub fn path_label(index: usize, start: &Location, end: &Location) -> String {
    format!("Route {}: {} → {}", index + 1, start.short_name(), end.short_name())
}

/// Routes for one station. Fewer than two locations yields nothing.
pub fn generate_station_routes<R: Rng + ?Sized>(
    station: &Station,
    locations: &[Location],
    rng: &mut R,
) -> Vec<Route> {
    let mut out = Vec::new();
    if locations.len() < 2 {
        return out;
    }
    let (base_min, base_max) = station.size.distance_range();

    for start in locations {
        for end in locations {
            if start.name == end.name {
                continue;
            }
            let base_distance = rng.gen_range(base_min..=base_max);
            // One step per pair keeps alternatives non-decreasing in index order.
            let step = rng.gen_range(EXTRA_STEP_RANGE.0..=EXTRA_STEP_RANGE.1);
            for i in 0..alternatives_for(start, end) {
                let distance = base_distance + step * i as u32;
                out.push(Route {
                    station: station.name.clone(),
                    start: start.name.clone(),
                    end: end.name.clone(),
                    label: path_label(i, start, end),
                    base_distance_m: distance,
                    base_time_min: walking_time(distance),
                });
            }
        }
    }
    out
}

#[derive(Debug, Clone, Serialize)]
pub struct StationSummary {
    pub station: String,
    pub locations: usize,
    pub routes: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    pub generated_at: chrono::DateTime<chrono::Utc>,
    pub stations: Vec<StationSummary>,
    pub total_routes: usize,
}

/// Generate routes for every station in `network`, keeping station order.
pub fn generate_all<R: Rng + ?Sized>(
    network: &[(Station, Vec<Location>)],
    rng: &mut R,
) -> (Vec<Route>, GenerationReport) {
    let mut routes = Vec::new();
    let mut stations = Vec::new();
    for (station, locations) in network {
        let generated = generate_station_routes(station, locations, rng);
        if locations.len() >= 2 {
            info!("generated {} routes for station: {}", generated.len(), station.name);
        }
        stations.push(StationSummary {
            station: station.name.clone(),
            locations: locations.len(),
            routes: generated.len(),
        });
        routes.extend(generated);
    }
    let report = GenerationReport {
        generated_at: chrono::Utc::now(),
        total_routes: routes.len(),
        stations,
    };
    (routes, report)
}

/// Read every station and its locations, regenerate the whole route table
/// and replace the stored one.
pub fn regenerate<R: Rng + ?Sized>(conn: &Connection, rng: &mut R) -> Result<GenerationReport> {
    let mut network = Vec::new();
    for station in store::get_all_stations(conn)? {
        let locations = queries::get_locations_unsorted(conn, &station.name)?;
        network.push((station, locations));
    }
    let (routes, report) = generate_all(&network, rng);
    store::replace_routes(conn, &routes)?;
    info!("finished: inserted {} routes into 'routes' table", report.total_routes);
    Ok(report)
}
