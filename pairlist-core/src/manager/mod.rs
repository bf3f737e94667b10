//! Pipeline manager: owns the stage chain and the providers, runs refreshes,
//! and publishes the current pair list to any number of readers.
//!
//! # Concurrency
//!
//! The chain, the published list and the last-refresh time share one
//! `RwLock`. A refresh snapshots the chain (stages are `Arc`s), runs it with
//! no lock held, then swaps the result in under a short write lock. Readers
//! therefore see either the previous list or the new one, never a partial
//! chain. Two concurrent `refresh` calls are not serialized against each
//! other; whichever publishes last wins.
//!
//! Setting a provider updates the stages in place, so a refresh that is
//! already running sees it from the next stage it enters.

mod scheduler;
mod stats;

pub use stats::PairlistStatistics;

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, SecondsFormat, Utc};
use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::components::factory;
use crate::components::filter::{apply_chain, Collaborators, PairFilter, StageError};
use crate::config::{ConfigError, PairlistConfig};
use crate::data::{
    PerformanceProvider, ProviderError, RemotePairProvider, TickerProvider, UniverseProvider,
};
use crate::domain::{Symbol, TickerMap};

use scheduler::AutoRefresh;

/// Refresh interval used until a config or `start_auto_refresh` sets one.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(1800);

/// Errors that abort a refresh. The previously published list is kept.
#[derive(Debug, thiserror::Error)]
pub enum RefreshError {
    #[error("market provider failed: {0}")]
    Universe(#[source] ProviderError),
    #[error("ticker provider failed: {0}")]
    Tickers(#[source] ProviderError),
    #[error(transparent)]
    Stage(#[from] StageError),
}

/// Outcome of one `refresh` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshReport {
    /// Active symbols handed to the first stage.
    pub initial: usize,
    /// Length of the list now published.
    pub published: usize,
    pub stages_run: usize,
    pub elapsed_ms: u64,
    /// True when the universe was empty and the previous list was kept.
    pub retained: bool,
}

struct SharedState {
    filters: Vec<Arc<dyn PairFilter>>,
    pairs: Vec<Symbol>,
    last_refresh: DateTime<Utc>,
}

#[derive(Default)]
struct Providers {
    universe: Option<Arc<dyn UniverseProvider>>,
    tickers: Option<Arc<dyn TickerProvider>>,
    metadata: Option<Arc<dyn UniverseProvider>>,
    performance: Option<Arc<dyn PerformanceProvider>>,
    remote_pairs: Option<Arc<dyn RemotePairProvider>>,
}

impl Providers {
    /// Metadata falls back to the universe provider.
    fn collaborators(&self) -> Collaborators {
        Collaborators {
            metadata: self.metadata.clone().or_else(|| self.universe.clone()),
            performance: self.performance.clone(),
            remote_pairs: self.remote_pairs.clone(),
        }
    }
}

struct Inner {
    state: RwLock<SharedState>,
    providers: RwLock<Providers>,
    refresh_interval_secs: AtomicU64,
    refresh_count: AtomicU64,
    filter_executions: AtomicU64,
    auto_refresh_running: AtomicBool,
}

impl Inner {
    fn refresh(&self) -> Result<RefreshReport, RefreshError> {
        let started = Instant::now();

        let (universe, ticker_source) = {
            let providers = self.providers.read();
            (providers.universe.clone(), providers.tickers.clone())
        };

        let initial: Vec<Symbol> = match &universe {
            Some(provider) => provider
                .instruments()
                .map_err(RefreshError::Universe)?
                .into_iter()
                .filter(|inst| inst.active)
                .map(|inst| inst.symbol)
                .collect(),
            None => Vec::new(),
        };

        if initial.is_empty() {
            warn!("No pairs available from market provider, keeping previous pair list");
            return Ok(RefreshReport {
                initial: 0,
                published: self.state.read().pairs.len(),
                stages_run: 0,
                elapsed_ms: elapsed_ms(started),
                retained: true,
            });
        }

        let initial_count = initial.len();
        info!(initial = initial_count, "Starting pair list refresh");

        let tickers = match &ticker_source {
            Some(provider) => provider.tickers().map_err(RefreshError::Tickers)?,
            None => TickerMap::new(),
        };
        debug!(count = tickers.len(), "Fetched tickers");

        let chain: Vec<Arc<dyn PairFilter>> = self.state.read().filters.clone();
        let (pairs, stages_run) = apply_chain(&chain, initial, &tickers)?;

        let published = pairs.len();
        {
            let mut state = self.state.write();
            state.pairs = pairs;
            state.last_refresh = Utc::now();
        }
        self.refresh_count.fetch_add(1, Ordering::Relaxed);
        self.filter_executions
            .fetch_add(stages_run as u64, Ordering::Relaxed);

        let elapsed_ms = elapsed_ms(started);
        info!(pairs = published, stages_run, elapsed_ms, "Pair list refreshed");

        Ok(RefreshReport {
            initial: initial_count,
            published,
            stages_run,
            elapsed_ms,
            retained: false,
        })
    }

    /// Hand current collaborators to every stage in the chain, including
    /// stages a running refresh is executing right now.
    fn reattach(&self) {
        let collaborators = self.providers.read().collaborators();
        if collaborators.is_empty() {
            return;
        }
        for stage in self.state.read().filters.iter() {
            stage.attach(&collaborators);
        }
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

/// Thread-safe owner of the selection pipeline.
///
/// All operations take `&self`; share it across threads behind an `Arc`.
/// Dropping the manager stops the auto-refresh thread.
pub struct PairListManager {
    inner: Arc<Inner>,
    scheduler: Mutex<Option<AutoRefresh>>,
}

impl Default for PairListManager {
    fn default() -> Self {
        Self::new()
    }
}

impl PairListManager {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                state: RwLock::new(SharedState {
                    filters: Vec::new(),
                    pairs: Vec::new(),
                    last_refresh: Utc::now(),
                }),
                providers: RwLock::new(Providers::default()),
                refresh_interval_secs: AtomicU64::new(DEFAULT_REFRESH_INTERVAL.as_secs()),
                refresh_count: AtomicU64::new(0),
                filter_executions: AtomicU64::new(0),
                auto_refresh_running: AtomicBool::new(false),
            }),
            scheduler: Mutex::new(None),
        }
    }

    // ─── Chain ───────────────────────────────────────────────────────

    /// Replace the chain with the stages declared in `config`.
    ///
    /// Entries the factory rejects are skipped; the others load in order.
    /// Returns the number of stages loaded.
    pub fn load_from_config(&self, config: &PairlistConfig) -> usize {
        let mut filters: Vec<Arc<dyn PairFilter>> =
            Vec::with_capacity(config.pairlist_filters.len());
        for entry in &config.pairlist_filters {
            match factory::create_from_config(entry) {
                Ok(stage) => {
                    info!(filter = stage.name(), "Loaded filter");
                    filters.push(Arc::from(stage));
                }
                Err(e) => warn!(error = %e, "Skipping filter entry"),
            }
        }

        let loaded = filters.len();
        self.inner.state.write().filters = filters;
        // Attach after install so a provider set concurrently is not missed.
        self.inner.reattach();

        if let Some(secs) = config.refresh_period {
            self.inner
                .refresh_interval_secs
                .store(secs, Ordering::Relaxed);
        }

        info!(filters = loaded, "PairListManager configured");
        loaded
    }

    /// Same as `load_from_config`, from a raw JSON document.
    pub fn load_from_json(&self, config: &Value) -> Result<usize, ConfigError> {
        let config = PairlistConfig::from_json_value(config.clone())?;
        Ok(self.load_from_config(&config))
    }

    /// Append a stage to the end of the chain, attaching current collaborators.
    pub fn add_filter(&self, stage: Box<dyn PairFilter>) {
        info!(filter = stage.name(), "Added filter");
        self.inner.state.write().filters.push(Arc::from(stage));
        self.inner.reattach();
    }

    pub fn clear_filters(&self) {
        self.inner.state.write().filters.clear();
    }

    /// Stage names in chain order.
    pub fn filter_names(&self) -> Vec<String> {
        self.inner
            .state
            .read()
            .filters
            .iter()
            .map(|f| f.name().to_string())
            .collect()
    }

    // ─── Providers ───────────────────────────────────────────────────

    pub fn set_market_provider(&self, provider: Arc<dyn UniverseProvider>) {
        self.inner.providers.write().universe = Some(provider);
        self.inner.reattach();
    }

    pub fn set_ticker_provider(&self, provider: Arc<dyn TickerProvider>) {
        self.inner.providers.write().tickers = Some(provider);
    }

    /// Dedicated metadata source for age and market-cap stages. Without one
    /// they query the market provider.
    pub fn set_metadata_provider(&self, provider: Arc<dyn UniverseProvider>) {
        self.inner.providers.write().metadata = Some(provider);
        self.inner.reattach();
    }

    pub fn set_performance_provider(&self, provider: Arc<dyn PerformanceProvider>) {
        self.inner.providers.write().performance = Some(provider);
        self.inner.reattach();
    }

    pub fn set_remote_pair_provider(&self, provider: Arc<dyn RemotePairProvider>) {
        self.inner.providers.write().remote_pairs = Some(provider);
        self.inner.reattach();
    }

    // ─── Refresh ─────────────────────────────────────────────────────

    /// Rebuild the pair list from fresh provider data.
    ///
    /// An empty universe keeps the previous list and is not an error. Any
    /// provider failure aborts the refresh, also keeping the previous list.
    pub fn refresh(&self) -> Result<RefreshReport, RefreshError> {
        self.inner.refresh()
    }

    pub fn get_pairs(&self) -> Vec<Symbol> {
        self.inner.state.read().pairs.clone()
    }

    pub fn get_pair_count(&self) -> usize {
        self.inner.state.read().pairs.len()
    }

    pub fn has_pair(&self, pair: &str) -> bool {
        self.inner.state.read().pairs.iter().any(|p| p == pair)
    }

    pub fn last_refresh_time(&self) -> DateTime<Utc> {
        self.inner.state.read().last_refresh
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.inner.refresh_interval_secs.load(Ordering::Relaxed))
    }

    // ─── Auto refresh ────────────────────────────────────────────────

    /// Start refreshing every `interval` (whole seconds, at least one) on a
    /// background thread. The first refresh runs immediately.
    ///
    /// Does nothing if auto refresh is already running.
    pub fn start_auto_refresh(&self, interval: Duration) -> std::io::Result<()> {
        let mut scheduler = self.scheduler.lock();
        if scheduler.is_some() {
            warn!("Auto refresh already running");
            return Ok(());
        }

        let secs = match interval.as_secs() {
            0 => {
                warn!(
                    requested_ms = interval.as_millis() as u64,
                    "Refresh interval below one second, using 1s"
                );
                1
            }
            secs => secs,
        };
        self.inner
            .refresh_interval_secs
            .store(secs, Ordering::Relaxed);
        self.inner.auto_refresh_running.store(true, Ordering::Release);

        match AutoRefresh::spawn(Arc::clone(&self.inner)) {
            Ok(handle) => {
                *scheduler = Some(handle);
                info!(interval_secs = secs, "Started auto refresh");
                Ok(())
            }
            Err(e) => {
                self.inner.auto_refresh_running.store(false, Ordering::Release);
                Err(e)
            }
        }
    }

    /// Stop the background thread, waiting for an in-flight refresh to finish.
    pub fn stop_auto_refresh(&self) {
        let mut scheduler = self.scheduler.lock();
        let Some(handle) = scheduler.take() else {
            return;
        };
        handle.stop();
        self.inner.auto_refresh_running.store(false, Ordering::Release);
        info!("Stopped auto refresh");
    }

    pub fn is_auto_refreshing(&self) -> bool {
        self.inner.auto_refresh_running.load(Ordering::Acquire)
    }

    // ─── Statistics ──────────────────────────────────────────────────

    pub fn get_statistics(&self) -> PairlistStatistics {
        let state = self.inner.state.read();
        PairlistStatistics {
            pair_count: state.pairs.len(),
            filter_count: state.filters.len(),
            refresh_count: self.inner.refresh_count.load(Ordering::Relaxed),
            total_filter_executions: self.inner.filter_executions.load(Ordering::Relaxed),
            last_refresh_time: state
                .last_refresh
                .to_rfc3339_opts(SecondsFormat::Secs, true),
            auto_refresh_running: self.is_auto_refreshing(),
            refresh_interval: self.inner.refresh_interval_secs.load(Ordering::Relaxed),
            filters: state.filters.iter().map(|f| f.name().to_string()).collect(),
        }
    }
}

impl Drop for PairListManager {
    fn drop(&mut self) {
        self.stop_auto_refresh();
    }
}
