//! Historical season statistics loaded from CSV exports.
//!
//! The data directory holds one folder per season (`2023-24`, `2024-25`, ...),
//! each with a fixed set of CSV files. Every loader degrades to an empty
//! table: a missing season, a missing file and an unreadable file all give
//! no rows, the last one with a warning.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::{Number, Value};
use tracing::{debug, warn};

use crate::cache::{cell_f64, Record, Table};

const PLAYER_STATS_FILE: &str = "player_stats.csv";
const TEAM_STATS_FILE: &str = "team_stats.csv";
const TEAM_ELO_FILE: &str = "team_elo.csv";
const FIXTURE_DIFFICULTY_FILE: &str = "fixture_difficulty.csv";
const GAMEWEEK_STATS_FILE: &str = "player_gameweek_stats.csv";

/// Season folders are named after their starting year.
const SEASON_PREFIX: &str = "20";

const GAMEWEEK_COLUMN: &str = "gameweek";
const PLAYER_ID_COLUMN: &str = "player_id";

/// Reads per-season CSV tables from a data directory.
#[derive(Debug, Clone)]
pub struct SeasonLoader {
    data_dir: PathBuf,
    seasons: Vec<String>,
}

impl SeasonLoader {
    /// Scan `data_dir` for season folders. A missing directory has no seasons.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        let seasons = scan_seasons(&data_dir);
        debug!(?data_dir, count = seasons.len(), "Scanned season data");
        Self { data_dir, seasons }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Available seasons, oldest first.
    pub fn seasons(&self) -> &[String] {
        &self.seasons
    }

    pub fn latest_season(&self) -> Option<&str> {
        self.seasons.last().map(String::as_str)
    }

    pub fn load_player_stats(&self, season: Option<&str>) -> Table {
        self.load(PLAYER_STATS_FILE, season)
    }

    pub fn load_team_stats(&self, season: Option<&str>) -> Table {
        self.load(TEAM_STATS_FILE, season)
    }

    pub fn load_elo_ratings(&self, season: Option<&str>) -> Table {
        self.load(TEAM_ELO_FILE, season)
    }

    pub fn load_fixture_difficulty(&self, season: Option<&str>) -> Table {
        self.load(FIXTURE_DIFFICULTY_FILE, season)
    }

    /// Per-gameweek player stats, optionally for a single gameweek.
    pub fn load_gameweek_stats(&self, season: Option<&str>, gameweek: Option<i64>) -> Table {
        let mut table = self.load(GAMEWEEK_STATS_FILE, season);
        let Some(gameweek) = gameweek else {
            return table;
        };

        if !table.is_empty() && !table.columns().contains(&GAMEWEEK_COLUMN) {
            warn!(file = GAMEWEEK_STATS_FILE, "No gameweek column to filter on");
            return Table::new();
        }
        table.retain(|row| cell_matches(row, GAMEWEEK_COLUMN, gameweek));
        table
    }

    /// A player's last `num_gw` gameweeks, most recent first.
    pub fn player_form_trend(&self, player_id: i64, num_gw: usize, season: Option<&str>) -> Table {
        let mut table = self.load_gameweek_stats(season, None);
        if table.is_empty() {
            return table;
        }

        table.retain(|row| cell_matches(row, PLAYER_ID_COLUMN, player_id));
        table.sort_by_number_desc(GAMEWEEK_COLUMN);
        table.truncate(num_gw);
        table
    }

    fn load(&self, file: &str, season: Option<&str>) -> Table {
        let Some(season) = season.or_else(|| self.latest_season()) else {
            return Table::new();
        };

        let path = self.data_dir.join(season).join(file);
        if !path.exists() {
            debug!(?path, "Season file not present");
            return Table::new();
        }

        match read_table(&path) {
            Ok(table) => {
                debug!(?path, rows = table.len(), "Loaded season table");
                table
            }
            Err(e) => {
                warn!(?path, error = %e, "Failed to load season table");
                Table::new()
            }
        }
    }
}

fn scan_seasons(data_dir: &Path) -> Vec<String> {
    let entries = match std::fs::read_dir(data_dir) {
        Ok(entries) => entries,
        Err(_) => return Vec::new(),
    };

    let mut seasons: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|t| t.is_dir()).unwrap_or(false))
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| name.starts_with(SEASON_PREFIX))
        .collect();
    seasons.sort();
    seasons
}

/// Read a CSV file with a header row into a table of typed cells.
fn read_table(path: &Path) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;

    let headers: Vec<String> = reader
        .headers()
        .context("Failed to read CSV header")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("Malformed CSV row {}", line + 1))?;
        let row: Record = headers
            .iter()
            .zip(record.iter())
            .map(|(header, cell)| (header.clone(), typed_cell(cell)))
            .collect();
        rows.push(row);
    }

    Ok(Table::from_rows(rows))
}

/// Integer, then float, then text. An empty cell is null.
fn typed_cell(raw: &str) -> Value {
    let cell = raw.trim();
    if cell.is_empty() {
        return Value::Null;
    }
    if let Ok(n) = cell.parse::<i64>() {
        return Value::from(n);
    }
    if let Some(n) = cell.parse::<f64>().ok().and_then(Number::from_f64) {
        return Value::Number(n);
    }
    Value::String(raw.to_string())
}

fn cell_matches(row: &Record, column: &str, expected: i64) -> bool {
    cell_f64(row, column)
        .map(|v| v.partial_cmp(&(expected as f64)) == Some(Ordering::Equal))
        .unwrap_or(false)
}
