//! Command implementations.
//!
//! Each command loads what it needs through the core library and prints
//! either a text table or, with `--json`, the underlying records.

use anyhow::{bail, Context, Result};
use serde::Serialize;
use tracing::{info, warn};

use fplhub_core::analysis::{
    self, best_value_players, compare_players, filter_players, fixture_breakdown,
    team_fdr_summaries, top_performers, transfer_suggestions, ChartSpec, PlayerFilter,
    PlayerMetric, SquadSummary,
};
use fplhub_core::cache::{Record, Table};
use fplhub_core::models::{current_gameweek, find_team, Player};
use fplhub_core::utils::{format_age, format_price};
use fplhub_core::{ApiClient, Config, LocalStore, SeasonLoader};

use crate::table::TextTable;

/// Chart kinds the `chart` command can build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ChartChoice {
    PointsDistribution,
    ValueVsPoints,
    XgXa,
    FormTrend,
    Radar,
    FdrHeatmap,
    Comparison,
}

pub struct Runner {
    config: Config,
    json: bool,
}

impl Runner {
    pub fn new(config: Config, json: bool) -> Self {
        Self { config, json }
    }

    fn client(&self) -> Result<ApiClient> {
        ApiClient::from_config(&self.config).context("Failed to create API client")
    }

    fn season_loader(&self) -> SeasonLoader {
        SeasonLoader::new(self.config.season_data_dir())
    }

    fn emit<T: Serialize + ?Sized>(&self, value: &T, table: TextTable) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else if table.is_empty() {
            println!("No results.");
        } else {
            println!("{}", table.render());
        }
        Ok(())
    }

    // ========================================================================
    // Players
    // ========================================================================

    pub fn players(&self, filter: &PlayerFilter, sort: PlayerMetric, limit: usize) -> Result<()> {
        let players = self.client()?.get_players()?;
        let filtered = filter_players(&players, filter);
        info!(total = players.len(), matched = filtered.len(), "Filtered players");

        if !self.json {
            println!("{} players found", filtered.len());
        }
        let ranked = top_performers(&filtered, sort, limit);
        self.emit(&ranked, player_table(&ranked))
    }

    pub fn top(&self, metric: PlayerMetric, n: usize) -> Result<()> {
        let players = self.client()?.get_players()?;
        let top = top_performers(&players, metric, n);

        let mut table = TextTable::new(&["Name", "Pos", "Team", "Price", metric.column()]);
        for p in &top {
            table.push(vec![
                p.display_name(),
                p.position_display().to_string(),
                p.team_display().to_string(),
                format_price(p.price),
                format_number(metric.value(p)),
            ]);
        }
        self.emit(&top, table)
    }

    pub fn best_value(&self, min_minutes: f64) -> Result<()> {
        let players = self.client()?.get_players()?;
        let best = best_value_players(&players, min_minutes);

        let mut table = TextTable::new(&["Name", "Pos", "Team", "Price", "Pts", "Pts/£m"]);
        for p in &best {
            table.push(vec![
                p.display_name(),
                p.position_display().to_string(),
                p.team_display().to_string(),
                format_price(p.price),
                format_number(p.total_points),
                format!("{:.1}", p.points_per_million),
            ]);
        }
        self.emit(&best, table)
    }

    pub fn compare(&self, names: &[String]) -> Result<()> {
        let players = self.client()?.get_players()?;
        let picked = compare_players(&players, names);
        warn_unmatched(names, &picked);

        let mut table = TextTable::new(&[
            "Name", "Pos", "Team", "Price", "Pts", "G", "A", "CS", "Bonus", "xG", "xA",
        ]);
        for p in &picked {
            table.push(vec![
                p.display_name(),
                p.position_display().to_string(),
                p.team_display().to_string(),
                format_price(p.price),
                format_number(p.total_points),
                format_number(p.goals_scored),
                format_number(p.assists),
                format_number(p.clean_sheets),
                format_number(p.bonus),
                format!("{:.2}", p.xg),
                format!("{:.2}", p.xa),
            ]);
        }
        self.emit(&picked, table)
    }

    pub fn squad(&self, names: &[String], budget: f64, suggestions: usize) -> Result<()> {
        let players = self.client()?.get_players()?;
        let squad = compare_players(&players, names);
        warn_unmatched(names, &squad);

        let summary = SquadSummary::from_players(&squad);
        let picks = transfer_suggestions(&players, names, budget, suggestions);

        if self.json {
            #[derive(Serialize)]
            struct SquadReport<'a> {
                summary: &'a SquadSummary,
                suggestions: &'a [Player],
            }
            let report = SquadReport {
                summary: &summary,
                suggestions: &picks,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
            return Ok(());
        }

        println!("Players:    {}", summary.player_count);
        println!("Total cost: {}", format_price(summary.total_cost));
        println!("Points:     {}", format_number(summary.total_points));
        println!("Avg form:   {:.1}", summary.average_form);
        let positions: Vec<String> = summary
            .position_counts
            .iter()
            .map(|(position, count)| format!("{} {}", position, count))
            .collect();
        println!("Positions:  {}", positions.join(", "));
        println!();
        println!("Transfer suggestions (budget {}):", format_price(budget));

        let mut table = TextTable::new(&["Name", "Pos", "Team", "Price", "Form", "Pts"]);
        for p in &picks {
            table.push(vec![
                p.display_name(),
                p.position_display().to_string(),
                p.team_display().to_string(),
                format_price(p.price),
                format!("{:.1}", p.form),
                format_number(p.total_points),
            ]);
        }
        self.emit(&picks, table)
    }

    pub fn history(&self, player: &str, gameweeks: usize) -> Result<()> {
        let mut client = self.client()?;
        let players = client.get_players()?;
        let player = find_player(&players, player)?;
        let summary = client.get_player_summary(player.id)?;
        let recent = summary.recent(gameweeks);

        let mut table = TextTable::new(&["GW", "Venue", "Pts", "Min", "G", "A", "Bonus", "Price"]);
        for gw in &recent {
            table.push(vec![
                gw.round.to_string(),
                if gw.was_home { "H" } else { "A" }.to_string(),
                gw.total_points.to_string(),
                gw.minutes.to_string(),
                gw.goals_scored.to_string(),
                gw.assists.to_string(),
                gw.bonus.to_string(),
                format_price(gw.value as f64 / 10.0),
            ]);
        }
        self.emit(&recent, table)
    }

    // ========================================================================
    // Fixtures and gameweeks
    // ========================================================================

    pub fn fixtures(&self, team: &str, gameweeks: usize) -> Result<()> {
        let mut client = self.client()?;
        let teams = client.get_teams()?;
        let team = find_team(&teams, team)
            .with_context(|| format!("Unknown team '{}'", team))?
            .clone();

        let mut rows = client.get_fixtures_with_fdr(team.id, gameweeks)?;
        rows.truncate(gameweeks);

        let mut table = TextTable::new(&["GW", "Opponent", "Venue", "Difficulty"]);
        for row in &rows {
            table.push(vec![
                row.gameweek.to_string(),
                row.opponent.clone(),
                row.home_away.to_string(),
                format!("{} ({})", row.fdr, row.difficulty),
            ]);
        }
        self.emit(&rows, table)?;

        if !self.json && !rows.is_empty() {
            let breakdown = fixture_breakdown(&rows);
            let by_fdr: Vec<String> = breakdown
                .by_fdr
                .iter()
                .map(|(fdr, count)| format!("{} {}", fdr, count))
                .collect();
            println!();
            println!("{}: {}", team.name, by_fdr.join(", "));
            println!("Home {} / Away {}", breakdown.home, breakdown.away);
        }
        Ok(())
    }

    pub fn fdr(&self, gameweeks: usize) -> Result<()> {
        let all = self.client()?.get_all_fixtures_with_fdr(gameweeks)?;
        let summaries = team_fdr_summaries(&all);

        let mut table = TextTable::new(&["Team", "GW1", "GW2", "GW3", "GW4", "GW5", "Avg"]);
        for summary in &summaries {
            let mut cells = vec![summary.team.clone()];
            cells.extend(summary.gameweeks.iter().map(|d| d.to_string()));
            cells.push(format!("{:.2}", summary.avg_difficulty));
            table.push(cells);
        }
        self.emit(&summaries, table)
    }

    pub fn gameweeks(&self) -> Result<()> {
        let gameweeks = self.client()?.get_gameweeks()?;
        if let Some(current) = current_gameweek(&gameweeks) {
            info!(gameweek = current.id, "Current gameweek");
        }

        let mut table = TextTable::new(&["GW", "Name", "Deadline", "Status", "Avg", "High"]);
        for gw in &gameweeks {
            table.push(vec![
                gw.id.to_string(),
                gw.name.clone(),
                gw.formatted_deadline(),
                gw.status().to_string(),
                gw.average_entry_score.map(|s| s.to_string()).unwrap_or_default(),
                gw.highest_score.map(|s| s.to_string()).unwrap_or_default(),
            ]);
        }
        self.emit(&gameweeks, table)
    }

    // ========================================================================
    // Season data
    // ========================================================================

    pub fn seasons(&self) -> Result<()> {
        let loader = self.season_loader();
        if self.json {
            println!("{}", serde_json::to_string_pretty(loader.seasons())?);
            return Ok(());
        }

        if loader.seasons().is_empty() {
            println!("No season data in {}", loader.data_dir().display());
            return Ok(());
        }
        for season in loader.seasons() {
            let marker = if Some(season.as_str()) == loader.latest_season() {
                " (latest)"
            } else {
                ""
            };
            println!("{}{}", season, marker);
        }
        Ok(())
    }

    /// Recent gameweeks for a player from the season CSVs. `player` is a
    /// numeric id or a web name resolved through the API.
    pub fn form(&self, player: &str, gameweeks: usize, season: Option<&str>) -> Result<()> {
        let player_id = match player.parse::<i64>() {
            Ok(id) => id,
            Err(_) => {
                let players = self.client()?.get_players()?;
                find_player(&players, player)?.id
            }
        };

        let trend = self.season_loader().player_form_trend(player_id, gameweeks, season);
        self.emit(trend.rows(), record_table(&trend))
    }

    // ========================================================================
    // Charts
    // ========================================================================

    pub fn chart(
        &self,
        kind: ChartChoice,
        names: &[String],
        metric: PlayerMetric,
        season: Option<&str>,
    ) -> Result<()> {
        let mut client = self.client()?;

        let spec: ChartSpec = match kind {
            ChartChoice::FdrHeatmap => {
                analysis::charts::fdr_heatmap(&client.get_all_fixtures_with_fdr(5)?)
            }
            ChartChoice::PointsDistribution => {
                analysis::charts::points_distribution_chart(&client.get_players()?)
            }
            ChartChoice::ValueVsPoints => {
                analysis::charts::value_vs_points_chart(&client.get_players()?)
            }
            ChartChoice::XgXa => analysis::charts::xg_xa_chart(&client.get_players()?),
            ChartChoice::Radar => {
                let players = client.get_players()?;
                let name = names.first().context("Radar chart needs a player name")?;
                analysis::charts::radar_chart(players.iter().find(|p| p.web_name == *name))
            }
            ChartChoice::Comparison => {
                analysis::charts::comparison_bar_chart(&client.get_players()?, names, metric)
            }
            ChartChoice::FormTrend => {
                let players = client.get_players()?;
                let selected = names
                    .iter()
                    .map(|name| find_player(&players, name).map(|p| (p.id, p.web_name.clone())))
                    .collect::<Result<Vec<_>>>()?;
                let stats = self.season_loader().load_gameweek_stats(season, None);
                analysis::charts::form_trend_chart(&stats, &selected)
            }
        };

        println!("{}", serde_json::to_string_pretty(&spec)?);
        Ok(())
    }

    // ========================================================================
    // Cache
    // ========================================================================

    pub fn cache_status(&self) -> Result<()> {
        let store = LocalStore::open(self.config.cache_dir()?)?;
        println!("Cache directory: {}", store.cache_dir().display());

        let mut table = TextTable::new(&["Key", "Upstream timestamp", "Age"]);
        for (key, timestamp) in store.tracked() {
            let age = match store.entry_age(key) {
                Ok(Some(age)) => format_age(age),
                Ok(None) => "missing".to_string(),
                Err(e) => {
                    warn!(key, error = %e, "Could not read entry age");
                    "unknown".to_string()
                }
            };
            table.push(vec![key.to_string(), timestamp.to_string(), age]);
        }

        if table.is_empty() {
            println!("No tracked entries.");
        } else {
            println!("{}", table.render());
        }
        Ok(())
    }

    pub fn cache_clear(&self) -> Result<()> {
        let mut store = LocalStore::open(self.config.cache_dir()?)?;
        let removed = store.clear()?;
        println!("Removed {} cache files from {}", removed, store.cache_dir().display());
        Ok(())
    }

    // ========================================================================
    // Config
    // ========================================================================

    pub fn config_show(&self) -> Result<()> {
        println!("# {}", Config::config_path()?.display());
        println!("{}", serde_json::to_string_pretty(&self.config)?);
        println!("# cache dir: {}", self.config.cache_dir()?.display());
        println!("# season data dir: {}", self.config.season_data_dir().display());
        Ok(())
    }

    pub fn config_init(&self) -> Result<()> {
        let path = Config::config_path()?;
        if path.exists() {
            bail!("Config file already exists: {}", path.display());
        }
        self.config.save()?;
        println!("Wrote {}", path.display());
        Ok(())
    }
}

fn player_table(players: &[Player]) -> TextTable {
    let mut table = TextTable::new(&[
        "Name", "Pos", "Team", "Price", "Form", "Pts", "Pts/£m", "G", "A", "xG", "xA",
    ]);
    for p in players {
        table.push(vec![
            p.display_name(),
            p.position_display().to_string(),
            p.team_display().to_string(),
            format_price(p.price),
            format!("{:.1}", p.form),
            format_number(p.total_points),
            format!("{:.1}", p.points_per_million),
            format_number(p.goals_scored),
            format_number(p.assists),
            format!("{:.2}", p.xg),
            format!("{:.2}", p.xa),
        ]);
    }
    table
}

/// Render CSV-loaded rows with the table's own columns.
fn record_table(table: &Table) -> TextTable {
    let columns = table.columns();
    let mut out = TextTable::new(&columns);
    for row in table.rows() {
        out.push(columns.iter().map(|c| cell_text(row, c)).collect());
    }
    out
}

fn cell_text(row: &Record, column: &str) -> String {
    match row.get(column) {
        None | Some(serde_json::Value::Null) => String::new(),
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Whole numbers without a trailing `.0`.
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.1}", value)
    }
}

/// Look a player up by web name (case-insensitive) or numeric id.
fn find_player<'a>(players: &'a [Player], query: &str) -> Result<&'a Player> {
    let query = query.trim();
    if let Some(p) = players.iter().find(|p| p.web_name.eq_ignore_ascii_case(query)) {
        return Ok(p);
    }
    if let Ok(id) = query.parse::<i64>() {
        if let Some(p) = players.iter().find(|p| p.id == id) {
            return Ok(p);
        }
    }
    bail!("Unknown player '{}'", query)
}

fn warn_unmatched(names: &[String], found: &[Player]) {
    for name in names {
        if !found.iter().any(|p| p.web_name == *name) {
            warn!(player = %name, "No player with that name");
        }
    }
}
