// ── Effect coordinator ──
//
// Reacts to applied actions: load triggers call the data source and feed
// the outcome back into the action queue, composite actions fan out into
// primitive loads. Also owns the two standing timers (auto-refresh and
// real-time status updates).
//
// Concurrency per load kind is "exhaust": while a request of a kind is in
// flight, further triggers of that kind are dropped, not queued.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use crate::action::{Action, LoadKind};
use crate::config::StoreConfig;
use crate::model::TimeRange;
use crate::source::DataSource;
use crate::state::DashboardState;

/// Range used by refresh-all unless configured to follow the selection.
pub const REFRESH_ALL_RANGE: TimeRange = TimeRange::TwentyFourHours;

/// Primitive loads a composite action expands into. Empty for every other
/// action.
///
/// `RefreshAllData` yields all four loads at [`REFRESH_ALL_RANGE`], or at the
/// selected range when `refresh_uses_selected_range` is set.
/// `SetTimeRange` yields the three windowed loads at the new range; nodes are
/// not time-windowed and are not reloaded.
pub fn fan_out(
    action: &Action,
    state: &DashboardState,
    refresh_uses_selected_range: bool,
) -> Vec<Action> {
    match action {
        Action::RefreshAllData => {
            let range = if refresh_uses_selected_range {
                state.selected_time_range
            } else {
                REFRESH_ALL_RANGE
            };
            LoadKind::ALL.iter().map(|k| k.trigger(range)).collect()
        }
        Action::SetTimeRange(range) => LoadKind::ALL
            .iter()
            .filter(|k| k.is_windowed())
            .map(|k| k.trigger(*range))
            .collect(),
        _ => Vec::new(),
    }
}

// ── EffectCoordinator ────────────────────────────────────────────

/// Runs side effects for applied actions and feeds results back to the
/// store's action queue.
pub struct EffectCoordinator<S> {
    source: Arc<S>,
    tx: mpsc::UnboundedSender<Action>,
    in_flight: InFlightFlags,
    refresh_uses_selected_range: bool,
    cancel: CancellationToken,
}

impl<S> Clone for EffectCoordinator<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            tx: self.tx.clone(),
            in_flight: Arc::clone(&self.in_flight),
            refresh_uses_selected_range: self.refresh_uses_selected_range,
            cancel: self.cancel.clone(),
        }
    }
}

impl<S: DataSource> EffectCoordinator<S> {
    pub fn new(
        source: Arc<S>,
        tx: mpsc::UnboundedSender<Action>,
        refresh_uses_selected_range: bool,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            source,
            tx,
            in_flight: Arc::new(std::array::from_fn(|_| AtomicBool::new(false))),
            refresh_uses_selected_range,
            cancel,
        }
    }

    /// React to `action`, which the store has just applied producing `state`.
    pub fn handle(&self, action: &Action, state: &DashboardState) {
        if let Some((kind, range)) = action.load_request() {
            self.start_load(kind, range.unwrap_or_default());
            return;
        }
        for load in fan_out(action, state, self.refresh_uses_selected_range) {
            self.emit(load);
        }
    }

    /// Whether a request of `kind` is currently outstanding.
    pub fn is_in_flight(&self, kind: LoadKind) -> bool {
        self.flag(kind).load(Ordering::Acquire)
    }

    fn flag(&self, kind: LoadKind) -> &AtomicBool {
        &self.in_flight[slot_index(kind)]
    }

    fn emit(&self, action: Action) {
        trace!(action = action.tag(), "effect emitted action");
        // Only fails once the reducer loop is gone.
        let _ = self.tx.send(action);
    }

    fn start_load(&self, kind: LoadKind, range: TimeRange) {
        let Some(slot) = InFlightSlot::claim(&self.in_flight, kind) else {
            debug!(%kind, "load already in flight, ignoring trigger");
            return;
        };

        let this = self.clone();
        tokio::spawn(async move {
            // Released after the outcome is queued, also on panic or abort.
            let _slot = slot;
            let mut load = tokio::spawn({
                let this = this.clone();
                async move { this.run_load(kind, range).await }
            });
            let joined = tokio::select! {
                biased;
                () = this.cancel.cancelled() => None,
                joined = &mut load => Some(joined),
            };
            match joined {
                Some(Ok(action)) => this.emit(action),
                Some(Err(e)) => {
                    warn!(%kind, error = %e, "load task died");
                    this.emit(kind.failure(format!("Failed to load {kind}")));
                }
                None => load.abort(),
            }
        });
    }

    async fn run_load(&self, kind: LoadKind, range: TimeRange) -> Action {
        let source = &self.source;
        let result = match kind {
            LoadKind::EdgeNodes => source.edge_nodes().await.map(Action::LoadEdgeNodesSuccess),
            LoadKind::Metrics => source.metrics(range).await.map(Action::LoadMetricsSuccess),
            LoadKind::TrafficData => source
                .traffic_data(range)
                .await
                .map(Action::LoadTrafficDataSuccess),
            LoadKind::GeographicStats => source
                .geographic_stats(range)
                .await
                .map(Action::LoadGeographicStatsSuccess),
        };
        result.unwrap_or_else(|e| {
            warn!(%kind, error = %e, "load failed");
            kind.failure(e.message)
        })
    }

    // ── Standing timers ──────────────────────────────────────────

    /// Spawn the auto-refresh and real-time timers configured in `config`.
    /// A zero interval leaves that timer off.
    pub fn spawn_timers(
        &self,
        state: watch::Receiver<Arc<DashboardState>>,
        config: &StoreConfig,
    ) -> Vec<JoinHandle<()>> {
        let mut handles = Vec::new();

        if !config.auto_refresh_interval.is_zero() {
            handles.push(tokio::spawn(auto_refresh_task(
                self.tx.clone(),
                state,
                config.auto_refresh_interval,
                self.cancel.clone(),
            )));
        }

        if !config.realtime_interval.is_zero() {
            handles.push(tokio::spawn(realtime_task(
                Arc::clone(&self.source),
                self.tx.clone(),
                config.realtime_initial_delay,
                config.realtime_interval,
                self.cancel.clone(),
            )));
        }

        handles
    }
}

// ── In-flight slots ──────────────────────────────────────────────

type InFlightFlags = Arc<[AtomicBool; 4]>;

fn slot_index(kind: LoadKind) -> usize {
    match kind {
        LoadKind::EdgeNodes => 0,
        LoadKind::Metrics => 1,
        LoadKind::TrafficData => 2,
        LoadKind::GeographicStats => 3,
    }
}

/// Exclusive claim on one kind's in-flight flag. Dropping it clears the flag.
struct InFlightSlot {
    flags: InFlightFlags,
    index: usize,
}

impl InFlightSlot {
    fn claim(flags: &InFlightFlags, kind: LoadKind) -> Option<Self> {
        let index = slot_index(kind);
        flags[index]
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        Some(Self {
            flags: Arc::clone(flags),
            index,
        })
    }
}

impl Drop for InFlightSlot {
    fn drop(&mut self) {
        self.flags[self.index].store(false, Ordering::Release);
    }
}

// ── Background tasks ─────────────────────────────────────────────

/// Emit refresh-all on every tick while auto-refresh is enabled. The first
/// tick fires immediately.
async fn auto_refresh_task(
    tx: mpsc::UnboundedSender<Action>,
    state: watch::Receiver<Arc<DashboardState>>,
    period: Duration,
    cancel: CancellationToken,
) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                let enabled = state.borrow().auto_refresh;
                if !enabled {
                    trace!("auto-refresh disabled, skipping tick");
                    continue;
                }
                debug!("auto-refresh tick");
                if tx.send(Action::RefreshAllData).is_err() {
                    break;
                }
            }
        }
    }
}

/// Poll the source for a random node status change. Failures are dropped.
async fn realtime_task<S: DataSource>(
    source: Arc<S>,
    tx: mpsc::UnboundedSender<Action>,
    initial_delay: Duration,
    period: Duration,
    cancel: CancellationToken,
) {
    let mut interval = tokio::time::interval_at(Instant::now() + initial_delay, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                let update = tokio::select! {
                    biased;
                    () = cancel.cancelled() => break,
                    update = source.random_status_update() => update,
                };
                match update {
                    Ok(update) => {
                        if tx.send(Action::UpdateNodeStatus(update)).is_err() {
                            break;
                        }
                    }
                    Err(e) => debug!(error = %e, "real-time update failed"),
                }
            }
        }
    }
}
