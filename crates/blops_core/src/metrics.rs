//! Tick timing and rate tracking.
//!
//! Provides structured logging of simulation throughput. The rolling rate is
//! what a frontend would show as its FPS counter.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Default number of ticks between periodic log lines (10 s at 60 Hz).
pub const DEFAULT_LOG_INTERVAL: u64 = 600;

#[derive(Debug, Default)]
struct RateWindow {
    frames: u64,
    elapsed: f64,
    current: f64,
}

/// Metrics collector for simulation statistics.
pub struct Metrics {
    tick_count: AtomicU64,
    entity_count: AtomicU64,
    total_tick_nanos: AtomicU64,
    log_interval: u64,
    rate: Mutex<RateWindow>,
    start_time: Instant,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    #[must_use]
    pub fn new() -> Self {
        Self::with_log_interval(DEFAULT_LOG_INTERVAL)
    }

    /// Log every `interval` ticks; 0 disables periodic logging.
    #[must_use]
    pub fn with_log_interval(interval: u64) -> Self {
        Self {
            tick_count: AtomicU64::new(0),
            entity_count: AtomicU64::new(0),
            total_tick_nanos: AtomicU64::new(0),
            log_interval: interval,
            rate: Mutex::new(RateWindow::default()),
            start_time: Instant::now(),
        }
    }

    /// Records a completed tick.
    ///
    /// `duration` is the compute time of the tick, `dt` the simulated seconds
    /// it advanced; the rate estimate is built from the latter.
    pub fn record_tick(&self, duration: Duration, dt: f64, entities: usize) {
        let tick = self.tick_count.fetch_add(1, Ordering::Relaxed) + 1;
        self.entity_count.store(entities as u64, Ordering::Relaxed);
        self.total_tick_nanos
            .fetch_add(duration.as_nanos() as u64, Ordering::Relaxed);

        let rate = {
            let mut window = self.rate.lock().unwrap_or_else(|e| e.into_inner());
            window.frames += 1;
            window.elapsed += dt;
            if window.elapsed >= 1.0 {
                window.current = window.frames as f64 / window.elapsed;
                window.frames = 0;
                window.elapsed = 0.0;
            }
            window.current
        };

        if self.log_interval > 0 && tick.is_multiple_of(self.log_interval) {
            tracing::info!(
                tick = tick,
                entities = entities,
                tick_rate = rate,
                mean_tick_us = self.mean_tick_duration().as_micros() as u64,
                "Simulation tick"
            );
        }
    }

    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.tick_count.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn entity_count(&self) -> u64 {
        self.entity_count.load(Ordering::Relaxed)
    }

    /// Ticks per simulated second over the last completed window of at least
    /// one second; 0 until the first window closes.
    #[must_use]
    pub fn tick_rate(&self) -> f64 {
        self.rate.lock().unwrap_or_else(|e| e.into_inner()).current
    }

    /// Mean compute time per tick so far.
    #[must_use]
    pub fn mean_tick_duration(&self) -> Duration {
        let ticks = self.tick_count();
        if ticks == 0 {
            return Duration::ZERO;
        }
        Duration::from_nanos(self.total_tick_nanos.load(Ordering::Relaxed) / ticks)
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

/// Initialize tracing subscriber for logging.
///
/// Honors `RUST_LOG`; defaults to `info`. Safe to call more than once.
pub fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .finish(),
    )
    .ok();
}
