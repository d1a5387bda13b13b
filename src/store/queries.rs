use crate::error::Result;
use crate::models::{CandidateRoute, Location, Station, StationSize};
use rusqlite::{params, Connection, OptionalExtension};

pub fn get_lines(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT DISTINCT TRIM(line_name) AS line_name FROM stations ORDER BY line_name",
    )?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn get_stations(conn: &Connection, line: &str) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT DISTINCT station_name FROM stations WHERE TRIM(line_name) = ?1 ORDER BY station_name",
    )?;
    let rows = stmt.query_map(params![line.trim()], |row| row.get::<_, String>(0))?;
    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Size of a station by name. A station missing from the table reads as
/// `small`.
pub fn get_station_size(conn: &Connection, station: &str) -> Result<StationSize> {
    let size: Option<String> = conn
        .query_row(
            "SELECT station_size FROM stations WHERE station_name = ?1 LIMIT 1",
            params![station],
            |row| row.get(0),
        )
        .optional()?;
    Ok(size.map(|s| StationSize::from_db(&s)).unwrap_or(StationSize::Small))
}

pub fn get_locations(conn: &Connection, station: &str) -> Result<Vec<Location>> {
    let mut stmt = conn.prepare(
        "SELECT location_name FROM station_locations WHERE station_name = ?1 ORDER BY location_name",
    )?;
    let rows = stmt.query_map(params![station], |row| row.get::<_, String>(0))?;
    let mut out = Vec::new();
    for r in rows {
        out.push(Location::new(r?));
    }
    Ok(out)
}

/// Candidate routes for a triple in insertion order, which is the order the
/// engine breaks ties by.
pub fn get_routes(conn: &Connection, station: &str, start: &str, end: &str) -> Result<Vec<CandidateRoute>> {
    let mut stmt = conn.prepare(
        "SELECT path_name, base_distance, base_time FROM routes
         WHERE station_name = ?1 AND start_location = ?2 AND end_location = ?3
         ORDER BY id",
    )?;
    let rows = stmt.query_map(params![station, start, end], |row| {
        Ok(CandidateRoute {
            label: row.get(0)?,
            base_distance_m: row.get(1)?,
            base_time_min: row.get(2)?,
        })
    })?;
    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Every station with its size, trimmed. A station listed on two lines
/// appears once.
pub fn get_all_stations(conn: &Connection) -> Result<Vec<Station>> {
    let mut stmt = conn.prepare(
        "SELECT TRIM(station_name), MIN(TRIM(line_name)), TRIM(station_size)
         FROM stations GROUP BY TRIM(station_name) ORDER BY MIN(rowid)",
    )?;
    let rows = stmt.query_map([], |row| {
        let size: String = row.get(2)?;
        Ok(Station {
            name: row.get(0)?,
            line: row.get(1)?,
            size: StationSize::from_db(&size),
        })
    })?;
    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Location names for a station in the order they were stored. The
/// generator uses this ordering; listing for riders uses `get_locations`.
pub fn get_locations_unsorted(conn: &Connection, station: &str) -> Result<Vec<Location>> {
    let mut stmt = conn.prepare(
        "SELECT location_name FROM station_locations WHERE station_name = ?1 ORDER BY rowid",
    )?;
    let rows = stmt.query_map(params![station], |row| row.get::<_, String>(0))?;
    let mut out = Vec::new();
    for r in rows {
        out.push(Location::new(r?));
    }
    Ok(out)
}

pub fn count_routes(conn: &Connection) -> Result<usize> {
    let n: i64 = conn.query_row("SELECT COUNT(*) FROM routes", [], |row| row.get(0))?;
    Ok(n as usize)
}
