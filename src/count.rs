//! Component H: applies the tab-counting contract to a materialized
//! [`SessionState`] and persists historical observations for the CLI's
//! `history` subcommand.

use std::fs::OpenOptions;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::model::SessionState;

/// `count = Σ over non-deleted windows of (count of non-deleted tabs)`.
pub fn count_tabs(state: &SessionState) -> usize {
    state.count_tabs()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountObservation {
    pub timestamp: u64,
    pub count: usize,
}

/// A newline-delimited JSON log of `(timestamp, count)` observations. No
/// retention or rotation policy -- it only appends and reads back in order.
pub struct HistoricalCounts<'a> {
    path: &'a Path,
}

impl<'a> HistoricalCounts<'a> {
    pub fn new(path: &'a Path) -> Self {
        Self { path }
    }

    pub fn append(&self, observation: CountObservation) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.path)?;
        let line = serde_json::to_string(&observation)?;
        writeln!(file, "{line}")
    }

    /// Reads back all recorded observations in append order. An empty or
    /// missing log yields an empty list, not an error.
    pub fn read_all(&self) -> std::io::Result<Vec<CountObservation>> {
        let file = match std::fs::File::open(self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };
        let mut observations = Vec::new();
        for line in BufReader::new(file).lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            if let Ok(observation) = serde_json::from_str(&line) {
                observations.push(observation);
            }
        }
        Ok(observations)
    }
}
