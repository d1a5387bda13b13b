// Core data structures shared by the generator, the engine and the API

use serde::{Deserialize, Serialize};
use std::fmt;

/// Size category of a station. Drives both the generator's distance range and
/// the baseline of the simulated passenger load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StationSize {
    Small,
    Medium,
    Big,
}

impl StationSize {
    /// Parse the value stored in the `station_size` column. Anything that is
    /// not `big` or `medium` falls back to `small`.
    pub fn from_db(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "big" => StationSize::Big,
            "medium" => StationSize::Medium,
            _ => StationSize::Small,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StationSize::Small => "small",
            StationSize::Medium => "medium",
            StationSize::Big => "big",
        }
    }

    /// Inclusive base distance range in meters used by the route generator.
    pub fn distance_range(&self) -> (u32, u32) {
        match self {
            StationSize::Small => (90, 240),
            StationSize::Medium => (160, 360),
            StationSize::Big => (220, 480),
        }
    }

    /// Baseline hourly passengers for the simulated station load.
    pub fn base_load(&self) -> i32 {
        match self {
            StationSize::Small => 250,
            StationSize::Medium => 450,
            StationSize::Big => 700,
        }
    }
}

impl fmt::Display for StationSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Station {
    pub name: String,
    pub line: String,
    pub size: StationSize,
}

/// What a location inside a station is used for. Assigned once when the
/// location is loaded; the generator only looks at this, never the name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationKind {
    Entry,
    Platform,
    Concourse,
    Exit,
    Other,
}

const KIND_WORDS: [(&str, LocationKind); 4] = [
    ("Entry", LocationKind::Entry),
    ("Platform", LocationKind::Platform),
    ("Concourse", LocationKind::Concourse),
    ("Exit", LocationKind::Exit),
];

impl LocationKind {
    /// Classify a stored name such as "Entry A - Street Level" or
    /// "Platform 2 - Towards Whitefield". Words are matched case-sensitively
    /// anywhere in the name; when several appear, the earliest one wins, so
    /// "Platform Entry Hall" is a platform.
    pub fn classify(name: &str) -> Self {
        KIND_WORDS
            .iter()
            .filter_map(|(word, kind)| name.find(*word).map(|pos| (pos, *kind)))
            .min_by_key(|(pos, _)| *pos)
            .map(|(_, kind)| kind)
            .unwrap_or(LocationKind::Other)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub kind: LocationKind,
}

impl Location {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let kind = LocationKind::classify(&name);
        Location { name, kind }
    }

    /// Text before the first `-`, trimmed. Used in generated path labels.
    pub fn short_name(&self) -> &str {
        self.name.split('-').next().unwrap_or(&self.name).trim()
    }
}

/// A synthetic walking path between two locations of the same station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub station: String,
    pub start: String,
    pub end: String,
    pub label: String,
    pub base_distance_m: u32,
    pub base_time_min: u32,
}

/// One candidate row as returned by the store for a (station, start, end)
/// triple, in retrieval order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateRoute {
    pub label: String,
    pub base_distance_m: u32,
    pub base_time_min: u32,
}

impl From<&Route> for CandidateRoute {
    fn from(r: &Route) -> Self {
        CandidateRoute {
            label: r.label.clone(),
            base_distance_m: r.base_distance_m,
            base_time_min: r.base_time_min,
        }
    }
}

/// Display label for a metro line, tagged with its colour when the name
/// carries one.
pub fn line_label(line: &str) -> String {
    if line.contains("Purple") {
        format!("🟣 {}", line)
    } else if line.contains("Green") {
        format!("🟢 {}", line)
    } else if line.contains("Yellow") {
        format!("🟡 {}", line)
    } else {
        line.to_string()
    }
}
