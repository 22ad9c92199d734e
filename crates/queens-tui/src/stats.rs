use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

/// Per-board-size statistics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SizeStats {
    /// Sessions finished by the player (auto-solves excluded)
    pub solved: usize,
    /// Sessions handed to the auto-solver
    pub auto_solved: usize,
    /// Fastest player solve in seconds
    pub best_time_secs: Option<u64>,
    /// Total player solve time in seconds
    pub total_time_secs: u64,
    /// Hints requested across all sessions of this size
    pub total_hints: usize,
    /// Moves made across all sessions of this size
    pub total_moves: usize,
}

impl SizeStats {
    pub fn avg_time_secs(&self) -> Option<u64> {
        if self.solved > 0 {
            Some(self.total_time_secs / self.solved as u64)
        } else {
            None
        }
    }
}

/// All persisted statistics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Stats {
    /// Keyed by board size rendered as a string (stable JSON keys)
    pub by_size: HashMap<String, SizeStats>,
    pub total_solved: usize,
    pub total_auto_solved: usize,
}

/// Loads, updates, and persists [`Stats`] as JSON in the platform data dir.
pub struct StatsManager {
    stats: Stats,
    path: PathBuf,
}

impl StatsManager {
    fn default_path() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("queens_stats.json")
    }

    /// Load stats from disk, starting fresh if missing or unreadable.
    pub fn load() -> Self {
        Self::load_from(Self::default_path())
    }

    pub fn load_from(path: PathBuf) -> Self {
        let stats = fs::read_to_string(&path)
            .ok()
            .and_then(|json| serde_json::from_str(&json).ok())
            .unwrap_or_default();
        Self { stats, path }
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    pub fn for_size(&self, size: usize) -> Option<&SizeStats> {
        self.stats.by_size.get(&size.to_string())
    }

    /// Record a finished session and persist.
    pub fn record_solve(
        &mut self,
        size: usize,
        time_secs: u64,
        hints_used: usize,
        moves: usize,
        auto_solved: bool,
    ) {
        let entry = self.stats.by_size.entry(size.to_string()).or_default();
        entry.total_hints += hints_used;
        entry.total_moves += moves;
        if auto_solved {
            entry.auto_solved += 1;
            self.stats.total_auto_solved += 1;
        } else {
            entry.solved += 1;
            entry.total_time_secs += time_secs;
            entry.best_time_secs = Some(match entry.best_time_secs {
                Some(best) => best.min(time_secs),
                None => time_secs,
            });
            self.stats.total_solved += 1;
        }
        self.save();
    }

    fn save(&self) {
        if let Ok(json) = serde_json::to_string_pretty(&self.stats) {
            // Stats are best-effort; failure to persist never disturbs play
            let _ = fs::write(&self.path, json);
        }
    }
}

/// Format seconds as MM:SS
pub fn format_time(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
