use crate::error::Result;
use crate::models::{Route, StationSize};
use rusqlite::{params, Connection};

pub fn insert_station(conn: &Connection, line: &str, station: &str, size: StationSize) -> Result<()> {
    conn.execute(
        "INSERT INTO stations (line_name, station_name, station_size) VALUES (?1, ?2, ?3)",
        params![line, station, size.as_str()],
    )?;
    Ok(())
}

pub fn insert_location(conn: &Connection, station: &str, location: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO station_locations (station_name, location_name) VALUES (?1, ?2)",
        params![station, location],
    )?;
    Ok(())
}

/// Delete every stored route and insert `routes` in their given order, in one
/// transaction. Returns the number of rows inserted.
pub fn replace_routes(conn: &Connection, routes: &[Route]) -> Result<usize> {
    let tx = conn.unchecked_transaction()?;
    tx.execute("DELETE FROM routes", [])?;
    {
        let mut stmt = tx.prepare(
            "INSERT INTO routes
             (station_name, start_location, end_location, path_name, base_distance, base_time)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )?;
        for r in routes {
            stmt.execute(params![
                r.station,
                r.start,
                r.end,
                r.label,
                r.base_distance_m,
                r.base_time_min,
            ])?;
        }
    }
    tx.commit()?;
    Ok(routes.len())
}
