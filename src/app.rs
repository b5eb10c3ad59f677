use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;
use std::time::{Duration, Instant};

use crate::model::config::AppConfig;
use crate::model::metrics::Metrics;
use crate::model::simulation::Simulation;
use crate::model::snapshot::to_json_line;

/// Headless driver around a [`Simulation`].
///
/// Owns the only mutable handle on the population and hands out read-only
/// snapshots; rendering, if any, happens on the other end of `emit_every`.
pub struct App {
    pub running: bool,
    pub config: AppConfig,
    pub sim: Simulation,
    pub metrics: Metrics,
    /// Emit a JSON snapshot every this many ticks.
    pub emit_every: Option<u64>,
    last_tick: Option<Instant>,
}

impl App {
    pub fn new(config: AppConfig) -> Result<Self> {
        config.validate().context("invalid configuration")?;
        let sim = Simulation::from_config(&config)?;

        tracing::info!(
            population = sim.blops().len(),
            species = config.species.len(),
            width = config.world.width,
            height = config.world.height,
            seed = ?config.world.seed,
            fingerprint = %config.fingerprint(),
            "Simulation ready"
        );
        tracing::info!("Relations:\n{}", sim.relations());

        Ok(Self {
            running: true,
            config,
            sim,
            metrics: Metrics::new(),
            emit_every: None,
            last_tick: None,
        })
    }

    /// Reads `path` as TOML. A missing file yields the defaults; a file that
    /// fails to parse or validate is an error.
    pub fn load_config(path: &Path) -> Result<AppConfig> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "No config file, using defaults");
            return Ok(AppConfig::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        AppConfig::from_toml(&content).with_context(|| format!("loading {}", path.display()))
    }

    /// Nominal tick length at the configured frame rate.
    #[must_use]
    pub fn fixed_dt(&self) -> f64 {
        1.0 / self.config.target_fps as f64
    }

    /// Advances one tick of `dt` seconds and records its timing.
    pub fn step(&mut self, dt: f64) {
        let start = Instant::now();
        self.sim.advance(dt);
        self.metrics
            .record_tick(start.elapsed(), dt, self.sim.blops().len());
    }

    /// Advances one tick using the wall-clock time since the previous call;
    /// the first call uses [`App::fixed_dt`].
    pub fn step_realtime(&mut self) {
        let now = Instant::now();
        let dt = self
            .last_tick
            .map_or(self.fixed_dt(), |prev| now.duration_since(prev).as_secs_f64());
        self.last_tick = Some(now);
        self.step(dt);
    }

    fn maybe_emit<W: Write>(&self, out: &mut W) -> Result<()> {
        let Some(every) = self.emit_every else {
            return Ok(());
        };
        if every > 0 && self.sim.tick().is_multiple_of(every) {
            let snapshot = self.sim.snapshot(|s| self.config.species_color(s));
            writeln!(out, "{}", to_json_line(&snapshot)?)?;
        }
        Ok(())
    }

    /// Runs `ticks` fixed-`dt` ticks as fast as possible.
    pub fn run_headless<W: Write>(&mut self, ticks: u64, out: &mut W) -> Result<()> {
        let dt = self.fixed_dt();
        for _ in 0..ticks {
            if !self.running {
                break;
            }
            self.step(dt);
            self.maybe_emit(out)?;
        }
        out.flush()?;
        Ok(())
    }

    /// Runs `ticks` ticks paced at `target_fps`, feeding the measured elapsed
    /// time into each tick.
    pub async fn run_realtime<W: Write>(&mut self, ticks: u64, out: &mut W) -> Result<()> {
        let period = Duration::from_secs_f64(self.fixed_dt());
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        for _ in 0..ticks {
            if !self.running {
                break;
            }
            interval.tick().await;
            self.step_realtime();
            self.maybe_emit(out)?;
        }
        out.flush()?;
        Ok(())
    }

    /// Logs per-species population figures.
    pub fn log_summary(&self) {
        for stats in self.sim.stats() {
            let name = self
                .config
                .species
                .get(stats.species.index())
                .map_or("?", |s| s.name.as_str());
            tracing::info!(
                species = name,
                count = stats.count,
                centroid_x = stats.centroid.0,
                centroid_y = stats.centroid.1,
                mean_speed = stats.mean_speed,
                "Species summary"
            );
        }
        tracing::info!(
            ticks = self.metrics.tick_count(),
            mean_tick_us = self.metrics.mean_tick_duration().as_micros() as u64,
            wall_ms = self.metrics.elapsed().as_millis() as u64,
            "Run finished"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.world.per_species = 10;
        config.world.seed = Some(3);
        config
    }

    #[test]
    fn test_run_headless_counts_ticks() {
        let mut app = App::new(small_config()).unwrap();
        let mut sink = Vec::new();
        app.run_headless(30, &mut sink).unwrap();
        assert_eq!(app.sim.tick(), 30);
        assert_eq!(app.metrics.tick_count(), 30);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_emit_every_writes_json_lines() {
        let mut app = App::new(small_config()).unwrap();
        app.emit_every = Some(10);
        let mut sink = Vec::new();
        app.run_headless(25, &mut sink).unwrap();
        let text = String::from_utf8(sink).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["tick"], 10);
        assert_eq!(first["blops"].as_array().unwrap().len(), 40);
    }

    #[test]
    fn test_invalid_config_fails_fast() {
        let mut config = small_config();
        config.relations.pop();
        assert!(App::new(config).is_err());
    }

    #[test]
    fn test_missing_config_file_uses_defaults() {
        let config = App::load_config(Path::new("definitely/not/here.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[tokio::test]
    async fn test_run_realtime_uses_measured_dt() {
        let mut app = App::new(small_config()).unwrap();
        let mut sink = Vec::new();
        app.run_realtime(3, &mut sink).await.unwrap();
        assert_eq!(app.sim.tick(), 3);
    }
}
