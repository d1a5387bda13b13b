//! Process-wide tally of how many times each path was assigned as "best".
//!
//! One mutex guards the whole table. The engine reads the counts of every
//! candidate and bumps the winner inside one `transaction`, so concurrent
//! sessions never lose an increment.

use serde::Serialize;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PathKey {
    pub station: String,
    pub start: String,
    pub end: String,
    pub path: String,
}

impl PathKey {
    pub fn new(station: &str, start: &str, end: &str, path: &str) -> Self {
        PathKey {
            station: station.to_string(),
            start: start.to_string(),
            end: end.to_string(),
            path: path.to_string(),
        }
    }
}

/// The locked view handed to a transaction.
#[derive(Debug, Default)]
pub struct CounterTable {
    counts: HashMap<PathKey, u32>,
}

impl CounterTable {
    pub fn get(&self, key: &PathKey) -> u32 {
        self.counts.get(key).copied().unwrap_or(0)
    }

    /// Add one and return the new count.
    pub fn increment(&mut self, key: PathKey) -> u32 {
        let c = self.counts.entry(key).or_insert(0);
        *c += 1;
        *c
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CounterEntry {
    #[serde(flatten)]
    pub key: PathKey,
    pub count: u32,
}

#[derive(Debug, Default)]
pub struct AssignmentCounter {
    table: Mutex<CounterTable>,
}

impl AssignmentCounter {
    pub fn new() -> Self {
        AssignmentCounter::default()
    }

    /// Run `f` with exclusive access to the table.
    pub fn transaction<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&mut CounterTable) -> T,
    {
        // A panic inside another transaction leaves the counts themselves
        // consistent, so a poisoned lock is still usable.
        let mut guard = match self.table.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut *guard)
    }

    pub fn get(&self, key: &PathKey) -> u32 {
        self.transaction(|t| t.get(key))
    }

    pub fn increment(&self, key: PathKey) -> u32 {
        self.transaction(|t| t.increment(key))
    }

    /// Copy of every non-zero counter, sorted by count descending then key.
    pub fn snapshot(&self) -> Vec<CounterEntry> {
        let mut out: Vec<CounterEntry> = self.transaction(|t| {
            t.counts
                .iter()
                .map(|(k, c)| CounterEntry { key: k.clone(), count: *c })
                .collect()
        });
        out.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.key.station.cmp(&b.key.station))
                .then_with(|| a.key.start.cmp(&b.key.start))
                .then_with(|| a.key.end.cmp(&b.key.end))
                .then_with(|| a.key.path.cmp(&b.key.path))
        });
        out
    }
}
