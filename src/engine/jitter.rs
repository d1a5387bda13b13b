//! Presentation-only series layered on top of a frozen assignment.
//!
//! Both series are seeded once per session and afterwards only their last
//! bucket moves. Every refresh starts from the seeded base, so the last value
//! wobbles around it instead of drifting.

use crate::models::StationSize;
use rand::Rng;
use serde::Serialize;

pub const CROWD_SLOTS: [&str; 8] = [
    "6-8 AM", "8-10 AM", "10-12 PM", "12-2 PM", "2-4 PM", "4-6 PM", "6-8 PM", "8-10 PM",
];

pub const LOAD_HOURS: [&str; 15] = [
    "6-7", "7-8", "8-9", "9-10", "10-11", "11-12", "12-13", "13-14", "14-15", "15-16", "16-17",
    "17-18", "18-19", "19-20", "20-21",
];

const CROWD_SEED_SPREAD: i32 = 15;
const CROWD_REFRESH_SPREAD: i32 = 5;
const LOAD_REFRESH_SPREAD: i32 = 25;
const LOAD_FLOOR: i32 = 60;
const LOAD_REFRESH_FLOOR: i32 = 50;

/// Crowd percentage per time slot for one path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrowdSeries {
    pub path: String,
    pub values: Vec<u32>,
}

/// Passengers per hour for one station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadSeries {
    pub station: String,
    pub values: Vec<i32>,
}

fn is_peak_hour(idx: usize) -> bool {
    (2..=4).contains(&idx) || (11..=13).contains(&idx)
}

/// Spread a locked crowd percentage over the day, ±15 per slot.
pub fn seed_crowd_series<R: Rng + ?Sized>(path: &str, locked_crowd: u32, rng: &mut R) -> CrowdSeries {
    let values = (0..CROWD_SLOTS.len())
        .map(|_| {
            let v = locked_crowd as i32 + rng.gen_range(-CROWD_SEED_SPREAD..=CROWD_SEED_SPREAD);
            v.clamp(0, 100) as u32
        })
        .collect();
    CrowdSeries { path: path.to_string(), values }
}

/// Copy of `base` with only the last slot moved by ±5, kept in [0, 100].
pub fn refresh_crowd_series<R: Rng + ?Sized>(base: &CrowdSeries, rng: &mut R) -> CrowdSeries {
    let mut out = base.clone();
    if let Some(last) = out.values.last_mut() {
        let v = *last as i32 + rng.gen_range(-CROWD_REFRESH_SPREAD..=CROWD_REFRESH_SPREAD);
        *last = v.clamp(0, 100) as u32;
    }
    out
}

/// Hourly passenger load: a size-dependent baseline, raised in the morning
/// and evening peaks and lowered elsewhere, never below 60.
pub fn seed_load_series<R: Rng + ?Sized>(station: &str, size: StationSize, rng: &mut R) -> LoadSeries {
    let base = size.base_load();
    let values = (0..LOAD_HOURS.len())
        .map(|idx| {
            let v = if is_peak_hour(idx) {
                base + rng.gen_range(300..450)
            } else {
                base - rng.gen_range(80..220)
            };
            v.max(LOAD_FLOOR)
        })
        .collect();
    LoadSeries { station: station.to_string(), values }
}

/// Copy of `base` with only the last hour moved by ±25, never below 50.
pub fn refresh_load_series<R: Rng + ?Sized>(base: &LoadSeries, rng: &mut R) -> LoadSeries {
    let mut out = base.clone();
    if let Some(last) = out.values.last_mut() {
        *last = (*last + rng.gen_range(-LOAD_REFRESH_SPREAD..=LOAD_REFRESH_SPREAD)).max(LOAD_REFRESH_FLOOR);
    }
    out
}
