//! Per-rider session: the three selection stages and the state locked in
//! while a rider looks at results.

pub mod registry;

pub use registry::SessionRegistry;

use crate::engine::jitter::{self, CrowdSeries, LoadSeries};
use crate::engine::{assign, shortest_index, Assignment, AssignmentCounter, LiveRoute, Trip};
use crate::error::{FootpathError, Result};
use crate::models::{line_label, CandidateRoute, Location, StationSize};
use crate::store::MetroStore;
use chrono::{DateTime, Utc};
use log::{info, warn};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

pub type SessionId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    StationSelection,
    RouteSelection,
    Results,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::StationSelection => "station_selection",
            Stage::RouteSelection => "route_selection",
            Stage::Results => "results",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LineOption {
    pub name: String,
    pub label: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct StationListing {
    pub line: String,
    pub stations: Vec<String>,
    /// The search matched nothing and the full list is returned instead.
    pub search_fallback: bool,
}

/// Lines with their display labels. An empty table is an error.
pub fn list_lines<S: MetroStore + ?Sized>(store: &S) -> Result<Vec<LineOption>> {
    let lines = store.lines()?;
    if lines.is_empty() {
        return Err(FootpathError::NoLines);
    }
    Ok(lines
        .into_iter()
        .map(|name| LineOption { label: line_label(&name), name })
        .collect())
}

/// Stations on `line`, optionally filtered by a case-insensitive substring.
pub fn list_stations<S: MetroStore + ?Sized>(store: &S, line: &str, search: Option<&str>) -> Result<StationListing> {
    let all = store.stations(line)?;
    if all.is_empty() {
        return Err(FootpathError::NoStations(line.to_string()));
    }
    let needle = search.map(|s| s.trim().to_lowercase()).unwrap_or_default();
    if needle.is_empty() {
        return Ok(StationListing { line: line.to_string(), stations: all, search_fallback: false });
    }
    let matched: Vec<String> = all.iter().filter(|s| s.to_lowercase().contains(&needle)).cloned().collect();
    if matched.is_empty() {
        Ok(StationListing { line: line.to_string(), stations: all, search_fallback: true })
    } else {
        Ok(StationListing { line: line.to_string(), stations: matched, search_fallback: false })
    }
}

/// What a results refresh hands back. `routes`, `shortest` and `best` are
/// frozen; only the last bucket of each series changes between calls.
#[derive(Debug, Clone, Serialize)]
pub struct ResultsView {
    pub trip: Trip,
    pub routes: Vec<LiveRoute>,
    pub shortest: CandidateRoute,
    pub best: LiveRoute,
    pub crowd_slots: &'static [&'static str],
    pub crowd_series: Vec<CrowdSeries>,
    pub load_hours: &'static [&'static str],
    pub load_series: LoadSeries,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub id: SessionId,
    pub created_at: DateTime<Utc>,
    pub stage: Stage,
    pub line: Option<String>,
    pub station: Option<String>,
    pub station_size: Option<StationSize>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub shortest: Option<CandidateRoute>,
    pub best: Option<LiveRoute>,
}

#[derive(Debug)]
pub struct Session {
    id: SessionId,
    created_at: DateTime<Utc>,
    stage: Stage,
    line: Option<String>,
    station: Option<String>,
    station_size: Option<StationSize>,
    start: Option<String>,
    end: Option<String>,
    base_routes: Option<Vec<CandidateRoute>>,
    shortest: Option<CandidateRoute>,
    assignment: Option<Assignment>,
    crowd_base: Option<Vec<CrowdSeries>>,
    load_base: Option<LoadSeries>,
    rng: ChaCha8Rng,
}

impl Session {
    /// New session in `station_selection`. A seed makes every random value
    /// of the session reproducible.
    pub fn new(id: SessionId, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => ChaCha8Rng::seed_from_u64(s),
            None => ChaCha8Rng::from_entropy(),
        };
        Session {
            id,
            created_at: Utc::now(),
            stage: Stage::StationSelection,
            line: None,
            station: None,
            station_size: None,
            start: None,
            end: None,
            base_routes: None,
            shortest: None,
            assignment: None,
            crowd_base: None,
            load_base: None,
            rng,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn locked_shortest(&self) -> Option<&CandidateRoute> {
        self.shortest.as_ref()
    }

    pub fn locked_best(&self) -> Option<&LiveRoute> {
        self.assignment.as_ref().map(|a| a.best_route())
    }

    fn expect_stage(&self, expected: Stage) -> Result<()> {
        if self.stage == expected {
            Ok(())
        } else {
            Err(FootpathError::InvalidStage { expected: expected.as_str(), actual: self.stage.as_str() })
        }
    }

    fn clear_trip(&mut self) {
        self.base_routes = None;
        self.shortest = None;
        self.assignment = None;
        self.crowd_base = None;
    }

    fn selected_station(&self) -> Result<&str> {
        self.station.as_deref().ok_or(FootpathError::InvalidStage {
            expected: Stage::RouteSelection.as_str(),
            actual: self.stage.as_str(),
        })
    }

    /// Pick a station on a line and move to `route_selection`.
    pub fn select_station<S: MetroStore + ?Sized>(&mut self, store: &S, line: &str, station: &str) -> Result<()> {
        self.expect_stage(Stage::StationSelection)?;
        let stations = store.stations(line)?;
        if stations.is_empty() {
            return Err(FootpathError::NoStations(line.to_string()));
        }
        if !stations.iter().any(|s| s == station) {
            return Err(FootpathError::StationNotOnLine { line: line.to_string(), station: station.to_string() });
        }
        let size = store.station_size(station)?;

        self.line = Some(line.to_string());
        self.station = Some(station.to_string());
        self.station_size = Some(size);
        self.start = None;
        self.end = None;
        self.clear_trip();
        self.load_base = None;
        self.stage = Stage::RouteSelection;
        info!("session {}: selected station {} ({}) on {}", self.id, station, size, line);
        Ok(())
    }

    /// Internal locations of the selected station.
    pub fn locations<S: MetroStore + ?Sized>(&self, store: &S) -> Result<Vec<Location>> {
        self.expect_stage(Stage::RouteSelection)?;
        let station = self.selected_station()?;
        let locations = store.locations(station)?;
        if locations.is_empty() {
            warn!("session {}: station {} has no internal locations", self.id, station);
            return Err(FootpathError::NoLocations(station.to_string()));
        }
        Ok(locations)
    }

    /// Fix the source and destination, load their candidate routes and lock
    /// the shortest one. Moves to `results` only when routes exist; the
    /// station load series is re-seeded for every new pair.
    pub fn choose_pair<S: MetroStore + ?Sized>(&mut self, store: &S, start: &str, end: &str) -> Result<CandidateRoute> {
        self.expect_stage(Stage::RouteSelection)?;
        if start == end {
            return Err(FootpathError::SameSourceDestination(start.to_string()));
        }
        let station = self.selected_station()?.to_string();
        let routes = store.routes(&station, start, end)?;
        let idx = match shortest_index(&routes) {
            Some(i) => i,
            None => {
                warn!("session {}: no routes from '{}' to '{}' at {}", self.id, start, end, station);
                return Err(FootpathError::NoRoutes { station, start: start.to_string(), end: end.to_string() });
            }
        };

        let shortest = routes[idx].clone();
        self.start = Some(start.to_string());
        self.end = Some(end.to_string());
        self.clear_trip();
        self.load_base = None;
        self.shortest = Some(shortest.clone());
        self.base_routes = Some(routes);
        self.stage = Stage::Results;
        Ok(shortest)
    }

    /// Back from `route_selection` to `station_selection`. The chosen line
    /// and station stay around so a client can pre-fill its form.
    pub fn back(&mut self) -> Result<()> {
        self.expect_stage(Stage::RouteSelection)?;
        self.stage = Stage::StationSelection;
        Ok(())
    }

    fn trip(&self) -> Result<Trip> {
        match (&self.station, &self.start, &self.end) {
            (Some(station), Some(start), Some(end)) => Ok(Trip {
                station: station.clone(),
                start: start.clone(),
                end: end.clone(),
            }),
            _ => Err(FootpathError::InvalidStage {
                expected: Stage::Results.as_str(),
                actual: self.stage.as_str(),
            }),
        }
    }

    /// Render the results stage. The first call runs the assignment and seeds
    /// the display series; later calls reuse both and only re-jitter the last
    /// bucket of each series.
    pub fn results(&mut self, counter: &AssignmentCounter) -> Result<ResultsView> {
        self.expect_stage(Stage::Results)?;
        let trip = self.trip()?;

        if self.assignment.is_none() {
            let candidates = self.base_routes.as_deref().unwrap_or(&[]);
            let assignment = assign(&trip, candidates, counter, &mut self.rng)?;
            info!(
                "session {}: assigned '{}' ({} min live) at {}",
                self.id,
                assignment.best_route().label,
                assignment.best_route().live_time_min,
                trip.station
            );
            self.assignment = Some(assignment);
        }
        let assignment = match &self.assignment {
            Some(a) => a.clone(),
            None => return Err(FootpathError::NoRoutes { station: trip.station, start: trip.start, end: trip.end }),
        };

        if self.crowd_base.is_none() {
            let rng = &mut self.rng;
            let seeded: Vec<CrowdSeries> = assignment
                .rows
                .iter()
                .map(|r| jitter::seed_crowd_series(&r.label, r.crowd_pct, rng))
                .collect();
            self.crowd_base = Some(seeded);
        }
        if self.load_base.is_none() {
            let size = self.station_size.unwrap_or(StationSize::Small);
            self.load_base = Some(jitter::seed_load_series(&trip.station, size, &mut self.rng));
        }

        let rng = &mut self.rng;
        let crowd_series: Vec<CrowdSeries> = self
            .crowd_base
            .iter()
            .flatten()
            .map(|s| jitter::refresh_crowd_series(s, rng))
            .collect();
        let load_series = match &self.load_base {
            Some(base) => jitter::refresh_load_series(base, rng),
            None => LoadSeries { station: trip.station.clone(), values: Vec::new() },
        };
        let shortest = match &self.shortest {
            Some(s) => s.clone(),
            None => return Err(FootpathError::NoRoutes { station: trip.station, start: trip.start, end: trip.end }),
        };

        Ok(ResultsView {
            trip,
            best: assignment.best_route().clone(),
            routes: assignment.rows,
            shortest,
            crowd_slots: &jitter::CROWD_SLOTS,
            crowd_series,
            load_hours: &jitter::LOAD_HOURS,
            load_series,
        })
    }

    /// The frozen row of one path, as it was at assignment time.
    pub fn path_details(&self, label: &str) -> Result<LiveRoute> {
        self.expect_stage(Stage::Results)?;
        self.assignment
            .as_ref()
            .and_then(|a| a.find(label))
            .cloned()
            .ok_or_else(|| FootpathError::UnknownPath(label.to_string()))
    }

    /// Back to `route_selection` for the same station. Drops the routes and
    /// everything locked for them.
    pub fn choose_another(&mut self) -> Result<()> {
        self.expect_stage(Stage::Results)?;
        self.clear_trip();
        self.stage = Stage::RouteSelection;
        Ok(())
    }

    /// Start over from `station_selection`, forgetting every selection. The
    /// assignment counter is not touched.
    pub fn restart(&mut self) {
        self.line = None;
        self.station = None;
        self.station_size = None;
        self.start = None;
        self.end = None;
        self.clear_trip();
        self.load_base = None;
        self.stage = Stage::StationSelection;
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            id: self.id,
            created_at: self.created_at,
            stage: self.stage,
            line: self.line.clone(),
            station: self.station.clone(),
            station_size: self.station_size,
            start: self.start.clone(),
            end: self.end.clone(),
            shortest: self.shortest.clone(),
            best: self.locked_best().cloned(),
        }
    }
}
