use thiserror::Error;

/// Every failure the crate can report. Empty-result variants are recoverable
/// by going back to an earlier selection stage.
#[derive(Error, Debug)]
pub enum FootpathError {
    #[error("no lines found in the stations table")]
    NoLines,
    #[error("no stations found for line '{0}'")]
    NoStations(String),
    #[error("station '{station}' is not on line '{line}'")]
    StationNotOnLine { line: String, station: String },
    #[error("no internal locations found for station '{0}'")]
    NoLocations(String),
    #[error("no walking paths found from '{start}' to '{end}' at '{station}'")]
    NoRoutes {
        station: String,
        start: String,
        end: String,
    },
    #[error("source and destination cannot be the same ('{0}')")]
    SameSourceDestination(String),
    #[error("unknown path '{0}' for this session")]
    UnknownPath(String),
    #[error("operation requires stage '{expected}' but session is in '{actual}'")]
    InvalidStage {
        expected: &'static str,
        actual: &'static str,
    },
    #[error("session {0} not found")]
    SessionNotFound(u64),
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("store unavailable: {0}")]
    Store(#[from] rusqlite::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl FootpathError {
    /// True for "nothing found" conditions.
    pub fn is_empty_result(&self) -> bool {
        matches!(
            self,
            FootpathError::NoLines
                | FootpathError::NoStations(_)
                | FootpathError::NoLocations(_)
                | FootpathError::NoRoutes { .. }
                | FootpathError::SessionNotFound(_)
                | FootpathError::UnknownPath(_)
        )
    }

    /// Store and io failures may go away on their own; callers are free to
    /// retry them. Nothing in this crate retries.
    pub fn is_transient(&self) -> bool {
        matches!(self, FootpathError::Store(_) | FootpathError::Io(_))
    }
}

pub type Result<T> = std::result::Result<T, FootpathError>;
