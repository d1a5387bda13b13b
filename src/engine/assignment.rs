use super::counter::{AssignmentCounter, PathKey};
use crate::error::{FootpathError, Result};
use crate::models::CandidateRoute;
use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Half-open range of the random part of a live crowd estimate.
pub const CROWD_DRAW_RANGE: (u32, u32) = (30, 70);
/// Crowd points added for every earlier assignment of the same path.
pub const CROWD_PER_ASSIGNMENT: u32 = 8;
pub const CROWD_MIN: u32 = 5;
pub const CROWD_MAX: u32 = 95;

/// The (station, source, destination) a rider asked about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trip {
    pub station: String,
    pub start: String,
    pub end: String,
}

impl Trip {
    pub fn key_for(&self, path: &str) -> PathKey {
        PathKey::new(&self.station, &self.start, &self.end, path)
    }
}

/// A candidate with its frozen live values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveRoute {
    pub label: String,
    pub base_distance_m: u32,
    pub base_time_min: u32,
    pub crowd_pct: u32,
    pub live_time_min: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub rows: Vec<LiveRoute>,
    pub best: usize,
    /// Counter value of the best path right after this assignment.
    pub best_assignments: u32,
}

impl Assignment {
    pub fn best_route(&self) -> &LiveRoute {
        &self.rows[self.best]
    }

    pub fn find(&self, label: &str) -> Option<&LiveRoute> {
        self.rows.iter().find(|r| r.label == label)
    }
}

/// Crowd percentage for a random draw and the number of earlier
/// assignments of the same path.
pub fn crowd_percentage(draw: u32, prior_assignments: u32) -> u32 {
    draw.saturating_add(prior_assignments.saturating_mul(CROWD_PER_ASSIGNMENT))
        .clamp(CROWD_MIN, CROWD_MAX)
}

/// `base_time × (1 + crowd/100)` rounded to one decimal, halves to even.
pub fn live_time(base_time_min: u32, crowd_pct: u32) -> f64 {
    let t = base_time_min as f64 * (1.0 + crowd_pct as f64 / 100.0);
    (t * 10.0).round_ties_even() / 10.0
}

/// Index of the candidate with the smallest base distance, first one wins
/// ties.
pub fn shortest_index(candidates: &[CandidateRoute]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, c) in candidates.iter().enumerate() {
        match best {
            None => best = Some(i),
            Some(b) if c.base_distance_m < candidates[b].base_distance_m => best = Some(i),
            Some(_) => {}
        }
    }
    best
}

/// Index of the row with the smallest live time, first one wins ties.
pub fn best_index(rows: &[LiveRoute]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, r) in rows.iter().enumerate() {
        match best {
            None => best = Some(i),
            Some(b) if r.live_time_min < rows[b].live_time_min => best = Some(i),
            Some(_) => {}
        }
    }
    best
}

/// Compute the live table for `candidates` and pick the best path.
///
/// The counts of every candidate are read and the winner's count bumped
/// while holding the counter lock, so the next caller sees this assignment.
pub fn assign<R: Rng + ?Sized>(
    trip: &Trip,
    candidates: &[CandidateRoute],
    counter: &AssignmentCounter,
    rng: &mut R,
) -> Result<Assignment> {
    if candidates.is_empty() {
        return Err(FootpathError::NoRoutes {
            station: trip.station.clone(),
            start: trip.start.clone(),
            end: trip.end.clone(),
        });
    }

    counter.transaction(|table| {
        let rows: Vec<LiveRoute> = candidates
            .iter()
            .map(|c| {
                let draw = rng.gen_range(CROWD_DRAW_RANGE.0..CROWD_DRAW_RANGE.1);
                let prior = table.get(&trip.key_for(&c.label));
                let crowd = crowd_percentage(draw, prior);
                LiveRoute {
                    label: c.label.clone(),
                    base_distance_m: c.base_distance_m,
                    base_time_min: c.base_time_min,
                    crowd_pct: crowd,
                    live_time_min: live_time(c.base_time_min, crowd),
                }
            })
            .collect();

        let best = best_index(&rows).ok_or_else(|| FootpathError::NoRoutes {
            station: trip.station.clone(),
            start: trip.start.clone(),
            end: trip.end.clone(),
        })?;
        let best_assignments = table.increment(trip.key_for(&rows[best].label));
        debug!(
            "assigned '{}' at {} ({} -> {}), count now {}",
            rows[best].label, trip.station, trip.start, trip.end, best_assignments
        );
        Ok(Assignment { rows, best, best_assignments })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn cand(label: &str, d: u32, t: u32) -> CandidateRoute {
        CandidateRoute { label: label.into(), base_distance_m: d, base_time_min: t }
    }

    fn trip() -> Trip {
        Trip { station: "MG Road".into(), start: "Entry A".into(), end: "Platform 1".into() }
    }

    #[test]
    fn test_crowd_clamped_and_monotone_in_prior() {
        for draw in 30..70 {
            let mut prev = 0;
            for prior in 0..20 {
                let c = crowd_percentage(draw, prior);
                assert!((5..=95).contains(&c));
                assert!(c >= prev);
                prev = c;
            }
        }
        assert_eq!(crowd_percentage(0, 0), 5);
        assert_eq!(crowd_percentage(69, 10), 95);
    }

    #[test]
    fn test_three_prior_assignments_shift_crowd() {
        for draw in 30..=70 {
            let c = crowd_percentage(draw, 3);
            assert_eq!(c, draw + 24);
            assert!((54..=94).contains(&c));
        }
    }

    #[test]
    fn test_live_time_rounding_and_monotonicity() {
        assert_eq!(live_time(3, 50), 4.5);
        assert_eq!(live_time(2, 33), 2.7);
        assert_eq!(live_time(5, 0), 5.0);
        assert_eq!(live_time(5, 45), 7.2);
        assert_eq!(live_time(5, 46), 7.3);
        assert_eq!(live_time(3, 15), 3.4);
        assert_eq!(live_time(5, 5), 5.2);
        let mut prev = 0.0;
        for crowd in 5..=95 {
            let t = live_time(4, crowd);
            assert!(t >= prev);
            prev = t;
        }
    }

    #[test]
    fn test_shortest_breaks_ties_by_order() {
        let c = vec![cand("Route 1", 200, 2), cand("Route 2", 150, 2), cand("Route 3", 150, 2)];
        assert_eq!(shortest_index(&c), Some(1));
        assert_eq!(shortest_index(&[]), None);
    }

    #[test]
    fn test_best_breaks_ties_by_order() {
        let row = |label: &str, t: f64| LiveRoute {
            label: label.into(),
            base_distance_m: 100,
            base_time_min: 2,
            crowd_pct: 50,
            live_time_min: t,
        };
        let rows = vec![row("a", 3.4), row("b", 3.0), row("c", 3.0)];
        assert_eq!(best_index(&rows), Some(1));
    }

    #[test]
    fn test_assign_without_candidates_reports_no_route() {
        let counter = AssignmentCounter::new();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let err = assign(&trip(), &[], &counter, &mut rng).unwrap_err();
        assert!(matches!(err, FootpathError::NoRoutes { .. }));
        assert!(counter.snapshot().is_empty());
    }

    #[test]
    fn test_assign_increments_best_only() {
        let counter = AssignmentCounter::new();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let c = vec![cand("Route 1", 150, 2), cand("Route 2", 190, 2), cand("Route 3", 230, 3)];
        let a = assign(&trip(), &c, &counter, &mut rng).unwrap();

        assert_eq!(a.rows.len(), 3);
        let best = a.best_route();
        assert!(a.rows.iter().all(|r| r.live_time_min >= best.live_time_min));
        assert_eq!(a.best_assignments, 1);
        assert_eq!(counter.get(&trip().key_for(&best.label)), 1);
        let total: u32 = counter.snapshot().iter().map(|e| e.count).sum();
        assert_eq!(total, 1);
        for r in &a.rows {
            assert!((30..70).contains(&r.crowd_pct));
            assert_eq!(r.live_time_min, live_time(r.base_time_min, r.crowd_pct));
        }
    }

    #[test]
    fn test_repeated_assignment_spreads_load() {
        // Two identical paths: whichever wins keeps gaining +8 per win, so
        // neither can win every one of many rounds.
        let counter = AssignmentCounter::new();
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let c = vec![cand("Route 1", 200, 10), cand("Route 2", 200, 10)];
        for _ in 0..40 {
            assign(&trip(), &c, &counter, &mut rng).unwrap();
        }
        let r1 = counter.get(&trip().key_for("Route 1"));
        let r2 = counter.get(&trip().key_for("Route 2"));
        assert_eq!(r1 + r2, 40);
        assert!(r1 > 0 && r2 > 0);
    }
}
