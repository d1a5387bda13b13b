pub mod db;
pub mod queries;
pub mod insertions;

pub use db::{init_db, open_connection, seed_demo};
pub use insertions::{insert_location, insert_station, replace_routes};
pub use queries::{get_all_stations, get_lines, get_locations, get_routes, get_station_size, get_stations};

use crate::error::Result;
use crate::models::{CandidateRoute, Location, StationSize};
use rusqlite::Connection;

/// Read side of the store as the session stages see it. Implemented for a
/// SQLite connection; tests substitute their own in-memory version.
pub trait MetroStore {
    fn lines(&self) -> Result<Vec<String>>;
    fn stations(&self, line: &str) -> Result<Vec<String>>;
    fn station_size(&self, station: &str) -> Result<StationSize>;
    fn locations(&self, station: &str) -> Result<Vec<Location>>;
    fn routes(&self, station: &str, start: &str, end: &str) -> Result<Vec<CandidateRoute>>;
}

impl MetroStore for Connection {
    fn lines(&self) -> Result<Vec<String>> {
        get_lines(self)
    }

    fn stations(&self, line: &str) -> Result<Vec<String>> {
        get_stations(self, line)
    }

    fn station_size(&self, station: &str) -> Result<StationSize> {
        get_station_size(self, station)
    }

    fn locations(&self, station: &str) -> Result<Vec<Location>> {
        get_locations(self, station)
    }

    fn routes(&self, station: &str, start: &str, end: &str) -> Result<Vec<CandidateRoute>> {
        get_routes(self, station, start, end)
    }
}
