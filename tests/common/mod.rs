#![allow(dead_code)]

use footpath::models::{CandidateRoute, Location, StationSize};
use footpath::store::{self, MetroStore};
use footpath::Result;
use rusqlite::Connection;
use std::cell::Cell;
use std::collections::HashMap;
use std::path::PathBuf;

/// In-memory store that counts how often routes are queried.
#[derive(Default)]
pub struct FakeStore {
    pub lines: HashMap<String, Vec<String>>,
    pub sizes: HashMap<String, StationSize>,
    pub locations: HashMap<String, Vec<String>>,
    pub routes: HashMap<(String, String, String), Vec<CandidateRoute>>,
    pub route_queries: Cell<usize>,
}

impl FakeStore {
    pub fn sample() -> Self {
        let mut s = FakeStore::default();
        s.lines.insert("Yellow Line".into(), vec!["BTM Layout".into(), "Silk Board".into()]);
        s.lines.insert("Green Line".into(), vec!["Jayanagar".into()]);
        s.sizes.insert("BTM Layout".into(), StationSize::Small);
        s.locations.insert(
            "BTM Layout".into(),
            vec!["Entry A - Outer Ring Road".into(), "Platform 1 - Towards Bommasandra".into(), "Exit - Silk Board".into()],
        );
        s.routes.insert(
            ("BTM Layout".into(), "Entry A - Outer Ring Road".into(), "Platform 1 - Towards Bommasandra".into()),
            vec![
                route("Route 1: Entry A → Platform 1", 180, 2),
                route("Route 2: Entry A → Platform 1", 150, 2),
                route("Route 3: Entry A → Platform 1", 150, 2),
                route("Route 4: Entry A → Platform 1", 260, 3),
            ],
        );
        s
    }
}

pub fn route(label: &str, d: u32, t: u32) -> CandidateRoute {
    CandidateRoute { label: label.into(), base_distance_m: d, base_time_min: t }
}

impl MetroStore for FakeStore {
    fn lines(&self) -> Result<Vec<String>> {
        let mut v: Vec<String> = self.lines.keys().cloned().collect();
        v.sort();
        Ok(v)
    }

    fn stations(&self, line: &str) -> Result<Vec<String>> {
        Ok(self.lines.get(line).cloned().unwrap_or_default())
    }

    fn station_size(&self, station: &str) -> Result<StationSize> {
        Ok(self.sizes.get(station).copied().unwrap_or(StationSize::Small))
    }

    fn locations(&self, station: &str) -> Result<Vec<Location>> {
        Ok(self
            .locations
            .get(station)
            .map(|v| v.iter().map(Location::new).collect())
            .unwrap_or_default())
    }

    fn routes(&self, station: &str, start: &str, end: &str) -> Result<Vec<CandidateRoute>> {
        self.route_queries.set(self.route_queries.get() + 1);
        Ok(self
            .routes
            .get(&(station.to_string(), start.to_string(), end.to_string()))
            .cloned()
            .unwrap_or_default())
    }
}

/// SQLite file under the temp dir, removed when dropped.
pub struct TempDb {
    pub path: PathBuf,
}

impl Drop for TempDb {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

/// Fresh SQLite file under the temp dir with the demo network loaded.
pub fn demo_db(name: &str) -> TempDb {
    let path = std::env::temp_dir().join(format!("footpath_{}_{}.db", name, std::process::id()));
    let _ = std::fs::remove_file(&path);
    let conn = Connection::open(&path).expect("open temp db");
    store::init_db(&conn).expect("init db");
    store::seed_demo(&conn).expect("seed demo");
    TempDb { path }
}
