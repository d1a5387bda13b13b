use crate::error::Result;
use rusqlite::Connection;
use std::fs;
use std::path::Path;

/// Open a connection to the footpath DB, creating the parent directory of a
/// file path when needed.
pub fn open_connection(path: &Path) -> Result<Connection> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            fs::create_dir_all(dir)?;
        }
    }
    let conn = Connection::open(path)?;
    Ok(conn)
}

/// Create the three tables if they do not exist yet.
pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS stations (
            line_name TEXT NOT NULL,
            station_name TEXT NOT NULL,
            station_size TEXT NOT NULL DEFAULT 'small'
        );

        CREATE TABLE IF NOT EXISTS station_locations (
            station_name TEXT NOT NULL,
            location_name TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS routes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            station_name TEXT NOT NULL,
            start_location TEXT NOT NULL,
            end_location TEXT NOT NULL,
            path_name TEXT NOT NULL,
            base_distance INTEGER NOT NULL,
            base_time INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_routes_triple
            ON routes (station_name, start_location, end_location);",
    )?;
    Ok(())
}

/// Small sample network so a fresh DB can be explored end to end.
pub fn seed_demo(conn: &Connection) -> Result<()> {
    use super::insertions::{insert_location, insert_station};
    use crate::models::StationSize;

    let stations = [
        ("Purple Line", "Majestic", StationSize::Big),
        ("Green Line", "Majestic", StationSize::Big),
        ("Purple Line", "MG Road", StationSize::Medium),
        ("Purple Line", "Indiranagar", StationSize::Medium),
        ("Green Line", "Jayanagar", StationSize::Small),
        ("Yellow Line", "BTM Layout", StationSize::Small),
    ];
    for (line, station, size) in stations {
        insert_station(conn, line, station, size)?;
    }

    let locations = [
        ("Majestic", "Entry A - Bus Stand"),
        ("Majestic", "Entry B - Railway Station"),
        ("Majestic", "Concourse - Interchange"),
        ("Majestic", "Platform 1 - Purple Line"),
        ("Majestic", "Platform 2 - Green Line"),
        ("MG Road", "Entry A - Boulevard"),
        ("MG Road", "Concourse"),
        ("MG Road", "Platform 1 - Towards Whitefield"),
        ("MG Road", "Exit C - Brigade Road"),
        ("Indiranagar", "Entry A - CMH Road"),
        ("Indiranagar", "Platform 1 - Towards Challaghatta"),
        ("Indiranagar", "Exit B - 100 Feet Road"),
        ("Jayanagar", "Entry - South End Circle"),
        ("Jayanagar", "Platform - Towards Silk Institute"),
        ("BTM Layout", "Entry A - Outer Ring Road"),
        ("BTM Layout", "Platform 1 - Towards Bommasandra"),
        ("BTM Layout", "Exit - Silk Board"),
    ];
    for (station, location) in locations {
        insert_location(conn, station, location)?;
    }
    Ok(())
}
