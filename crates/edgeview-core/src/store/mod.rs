// ── Dashboard store ──
//
// Explicitly constructed state container. Owns the single
// `DashboardState`, the action queue feeding the transition function,
// and the effect coordinator with its standing timers.
//
// One reducer task drains the queue, so actions are applied strictly in
// arrival order and the state has exactly one writer.

mod fetch;

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, watch, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::action::{Action, LoadKind};
use crate::config::StoreConfig;
use crate::effects::EffectCoordinator;
use crate::error::CoreError;
use crate::model::TimeRange;
use crate::source::{DataSource, MockDataSource};
use crate::state::{reduce, DashboardState};
use crate::stream::StateStream;

const APPLIED_CHANNEL_SIZE: usize = 256;

// ── Store ────────────────────────────────────────────────────────

/// The dashboard's state container.
///
/// Cheaply cloneable via `Arc<StoreInner>`. Create with [`new()`](Self::new),
/// then [`start()`](Self::start) the reducer loop and timers. Actions
/// dispatched before `start()` are queued and applied once it runs.
pub struct Store<S = MockDataSource> {
    inner: Arc<StoreInner<S>>,
}

impl<S> Clone for Store<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct StoreInner<S> {
    config: StoreConfig,
    state_tx: watch::Sender<Arc<DashboardState>>,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: Mutex<Option<mpsc::UnboundedReceiver<Action>>>,
    applied_tx: broadcast::Sender<Action>,
    effects: EffectCoordinator<S>,
    cancel: CancellationToken,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl<S: DataSource> Store<S> {
    /// Create a store holding the initial snapshot. Does NOT spawn anything.
    pub fn new(config: StoreConfig, source: S) -> Self {
        Self::with_state(config, source, DashboardState::initial())
    }

    /// Create a store seeded with `state`, e.g. the user's preferred range
    /// and auto-refresh setting. Reset still returns the documented initial
    /// snapshot.
    pub fn with_state(config: StoreConfig, source: S, state: DashboardState) -> Self {
        let (state_tx, _) = watch::channel(Arc::new(state));
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let (applied_tx, _) = broadcast::channel(APPLIED_CHANNEL_SIZE);
        let cancel = CancellationToken::new();
        let effects = EffectCoordinator::new(
            Arc::new(source),
            action_tx.clone(),
            config.refresh_uses_selected_range,
            cancel.clone(),
        );

        Self {
            inner: Arc::new(StoreInner {
                config,
                state_tx,
                action_tx,
                action_rx: Mutex::new(Some(action_rx)),
                applied_tx,
                effects,
                cancel,
                task_handles: Mutex::new(Vec::new()),
            }),
        }
    }

    // ── Lifecycle ────────────────────────────────────────────────

    /// Spawn the reducer loop and the standing timers. Calling it again is
    /// a no-op.
    pub async fn start(&self) {
        let Some(rx) = self.inner.action_rx.lock().await.take() else {
            debug!("store already started");
            return;
        };

        let mut handles = self.inner.task_handles.lock().await;
        handles.push(tokio::spawn(reducer_task(self.clone(), rx)));
        handles.extend(
            self.inner
                .effects
                .spawn_timers(self.inner.state_tx.subscribe(), &self.inner.config),
        );

        info!(
            auto_refresh_secs = self.inner.config.auto_refresh_interval.as_secs(),
            realtime_secs = self.inner.config.realtime_interval.as_secs(),
            "dashboard store started"
        );
    }

    /// Cancel the reducer loop, timers, and in-flight loads, and wait for
    /// the background tasks to finish. Later dispatches fail.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();

        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            let _ = handle.await;
        }
        info!("dashboard store stopped");
    }

    pub fn is_stopped(&self) -> bool {
        self.inner.cancel.is_cancelled()
    }

    // ── Intents ──────────────────────────────────────────────────

    /// Queue `action` for the transition function.
    pub fn dispatch(&self, action: Action) -> Result<(), CoreError> {
        if self.is_stopped() {
            return Err(CoreError::StoreStopped);
        }
        debug!(action = action.tag(), "dispatch");
        self.inner
            .action_tx
            .send(action)
            .map_err(|_| CoreError::StoreStopped)
    }

    /// Dispatch the four primitive loads at `range`: the dashboard's
    /// initial load.
    pub fn load_all(&self, range: TimeRange) -> Result<(), CoreError> {
        for kind in LoadKind::ALL {
            self.dispatch(kind.trigger(range))?;
        }
        Ok(())
    }

    // ── One-shot convenience ─────────────────────────────────────

    /// Start from `state` without timers, run `f`, shut down.
    ///
    /// Meant for the CLI, which needs a single load cycle and no background
    /// polling.
    pub async fn oneshot<F, Fut, T>(
        config: StoreConfig,
        source: S,
        state: DashboardState,
        f: F,
    ) -> Result<T, CoreError>
    where
        F: FnOnce(Store<S>) -> Fut,
        Fut: Future<Output = Result<T, CoreError>>,
    {
        let store = Store::with_state(config.without_timers(), source, state);
        store.start().await;
        let result = f(store.clone()).await;
        store.shutdown().await;
        result
    }

    // ── State observation ────────────────────────────────────────

    /// The current snapshot.
    pub fn state(&self) -> Arc<DashboardState> {
        self.inner.state_tx.borrow().clone()
    }

    /// Subscribe to snapshot changes.
    pub fn subscribe(&self) -> StateStream {
        StateStream::new(self.inner.state_tx.subscribe())
    }

    /// Subscribe to the feed of applied actions, in application order.
    pub fn actions(&self) -> broadcast::Receiver<Action> {
        self.inner.applied_tx.subscribe()
    }

    /// Apply one action: reduce, publish, broadcast, run effects.
    fn apply(&self, action: &Action) {
        let current = self.state();
        let next = reduce(&current, action);
        let changed = !Arc::ptr_eq(&current, &next);
        if changed {
            self.inner.state_tx.send_replace(Arc::clone(&next));
        }
        debug!(action = action.tag(), changed, "applied");

        let _ = self.inner.applied_tx.send(action.clone());
        self.inner.effects.handle(action, &next);
    }
}

// ── Background tasks ─────────────────────────────────────────────

/// Sole consumer of the action queue.
async fn reducer_task<S: DataSource>(store: Store<S>, mut rx: mpsc::UnboundedReceiver<Action>) {
    let cancel = store.inner.cancel.clone();

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            action = rx.recv() => {
                let Some(action) = action else { break };
                store.apply(&action);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::config::MockConfig;
    use crate::selectors::node_status_counts;

    fn quiet_store(latency_scale: f64) -> Store {
        Store::new(
            StoreConfig::default().without_timers(),
            MockDataSource::new(MockConfig {
                latency_scale,
                ..MockConfig::instant(42)
            }),
        )
    }

    fn drain(rx: &mut broadcast::Receiver<Action>) -> Vec<Action> {
        let mut out = Vec::new();
        while let Ok(action) = rx.try_recv() {
            out.push(action);
        }
        out
    }

    #[tokio::test(start_paused = true)]
    async fn initial_load_populates_every_slice() {
        let store = quiet_store(1.0);
        store.start().await;
        store.load_all(TimeRange::OneHour).expect("dispatch");

        let mut stream = store.subscribe();
        let state = stream
            .wait_until(|s| {
                s.last_refresh.is_some()
                    && s.metrics.is_some()
                    && !s.traffic_data.is_empty()
                    && !s.geographic_stats.is_empty()
            })
            .await
            .expect("store alive");

        assert_eq!(node_status_counts(&state).total, 6);
        assert_eq!(state.traffic_data.len(), 12);
        assert_eq!(state.geographic_stats.len(), 5);
        assert!(!state.loading);
        assert!(state.error.is_none());
        store.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn set_time_range_emits_exactly_three_loads() {
        let store = quiet_store(0.0);
        let mut actions = store.actions();
        store.start().await;
        store
            .dispatch(Action::SetTimeRange(TimeRange::OneHour))
            .expect("dispatch");

        tokio::time::sleep(Duration::from_secs(1)).await;
        let triggers: Vec<_> = drain(&mut actions)
            .into_iter()
            .filter(|a| a.load_request().is_some())
            .collect();
        assert_eq!(
            triggers,
            vec![
                Action::LoadMetrics(TimeRange::OneHour),
                Action::LoadTrafficData(TimeRange::OneHour),
                Action::LoadGeographicStats(TimeRange::OneHour),
            ]
        );
        assert_eq!(store.state().selected_time_range, TimeRange::OneHour);
        store.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn duplicate_trigger_yields_one_success() {
        let store = quiet_store(1.0);
        let mut actions = store.actions();
        store.start().await;
        store
            .dispatch(Action::LoadMetrics(TimeRange::SixHours))
            .expect("dispatch");
        store
            .dispatch(Action::LoadMetrics(TimeRange::SixHours))
            .expect("dispatch");

        tokio::time::sleep(Duration::from_secs(2)).await;
        let successes = drain(&mut actions)
            .iter()
            .filter(|a| matches!(a, Action::LoadMetricsSuccess(_)))
            .count();
        assert_eq!(successes, 1);
        store.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn actions_are_applied_in_dispatch_order() {
        let store = quiet_store(0.0);
        let mut actions = store.actions();
        let sent = vec![
            Action::ToggleAutoRefresh,
            Action::SetTimeRange(TimeRange::SevenDays),
            Action::ClearError,
            Action::ToggleAutoRefresh,
        ];
        // Queued before start: applied once the loop runs.
        for action in &sent {
            store.dispatch(action.clone()).expect("dispatch");
        }
        store.start().await;
        tokio::time::sleep(Duration::from_millis(10)).await;

        let applied: Vec<_> = drain(&mut actions)
            .into_iter()
            .filter(|a| a.load_request().is_none() && a.load_success().is_none())
            .collect();
        assert_eq!(applied, sent);
        assert!(store.state().auto_refresh);
        store.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn failures_surface_in_state_until_cleared() {
        let store = Store::new(
            StoreConfig::default().without_timers(),
            MockDataSource::new(MockConfig {
                failure_rate: 1.0,
                ..MockConfig::instant(1)
            }),
        );
        store.start().await;
        store.dispatch(Action::LoadEdgeNodes).expect("dispatch");

        let mut stream = store.subscribe();
        let state = stream
            .wait_until(|s| s.error.is_some())
            .await
            .expect("store alive");
        assert_eq!(state.error.as_deref(), Some("Failed to load edge nodes"));
        assert!(!state.loading);

        store.dispatch(Action::ClearError).expect("dispatch");
        let state = stream
            .wait_until(|s| s.error.is_none())
            .await
            .expect("store alive");
        assert!(state.edge_nodes.is_empty());
        store.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn timers_drive_refresh_and_realtime_updates() {
        let store = Store::new(
            StoreConfig::default(),
            MockDataSource::new(MockConfig::instant(3)),
        );
        let mut actions = store.actions();
        store.start().await;

        tokio::time::sleep(Duration::from_secs(6)).await;
        let seen = drain(&mut actions);
        assert_eq!(
            seen.iter().filter(|a| **a == Action::RefreshAllData).count(),
            1
        );
        assert!(seen.iter().any(|a| matches!(a, Action::UpdateNodeStatus(_))));
        assert_eq!(store.state().edge_nodes.len(), 6);
        store.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn seeded_state_disables_the_first_auto_refresh() {
        let store = Store::with_state(
            StoreConfig {
                realtime_interval: Duration::ZERO,
                ..StoreConfig::default()
            },
            MockDataSource::new(MockConfig::instant(2)),
            DashboardState {
                auto_refresh: false,
                ..DashboardState::initial()
            },
        );
        let mut actions = store.actions();
        store.start().await;
        tokio::time::sleep(Duration::from_secs(61)).await;
        assert!(drain(&mut actions).is_empty());

        store.dispatch(Action::ResetDashboard).expect("dispatch");
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert!(drain(&mut actions).contains(&Action::RefreshAllData));
        store.shutdown().await;
    }

    #[tokio::test]
    async fn dispatch_after_shutdown_fails() {
        let store = quiet_store(0.0);
        store.start().await;
        store.start().await;
        store.shutdown().await;
        assert!(store.is_stopped());
        assert!(matches!(
            store.dispatch(Action::RefreshAllData),
            Err(CoreError::StoreStopped)
        ));
    }

    #[tokio::test]
    async fn oneshot_runs_closure_and_stops() {
        let source = MockDataSource::new(MockConfig::instant(8));
        let seeded = DashboardState {
            selected_time_range: TimeRange::SixHours,
            ..DashboardState::initial()
        };
        let stopped = Store::oneshot(StoreConfig::default(), source, seeded, |store| {
            async move {
                let state = store.fetch(&LoadKind::ALL, TimeRange::SixHours).await?;
                assert_eq!(state.edge_nodes.len(), 6);
                assert_eq!(state.selected_time_range, TimeRange::SixHours);
                Ok(store)
            }
        })
        .await
        .expect("oneshot");
        assert!(stopped.is_stopped());
    }
}
