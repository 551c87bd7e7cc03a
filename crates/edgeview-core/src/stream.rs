// ── Reactive snapshot stream ──
//
// Subscription type for consuming dashboard snapshots from the Store.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::state::DashboardState;

/// A subscription to dashboard snapshots.
///
/// Provides both point-in-time snapshot access and change notification via
/// [`changed()`](Self::changed) or by converting to a `Stream`.
pub struct StateStream {
    current: Arc<DashboardState>,
    receiver: watch::Receiver<Arc<DashboardState>>,
}

impl StateStream {
    pub(crate) fn new(mut receiver: watch::Receiver<Arc<DashboardState>>) -> Self {
        let current = receiver.borrow_and_update().clone();
        Self { current, receiver }
    }

    /// The snapshot captured at creation time or by the last `changed()`.
    pub fn current(&self) -> &Arc<DashboardState> {
        &self.current
    }

    /// The latest published snapshot.
    pub fn latest(&self) -> Arc<DashboardState> {
        self.receiver.borrow().clone()
    }

    /// Wait for the next snapshot. Returns `None` once the store is gone.
    pub async fn changed(&mut self) -> Option<Arc<DashboardState>> {
        self.receiver.changed().await.ok()?;
        let snap = self.receiver.borrow_and_update().clone();
        self.current = Arc::clone(&snap);
        Some(snap)
    }

    /// Wait until a snapshot satisfies `predicate`, checking the latest one
    /// first. Returns `None` if the store goes away before that happens.
    pub async fn wait_until<F>(&mut self, mut predicate: F) -> Option<Arc<DashboardState>>
    where
        F: FnMut(&DashboardState) -> bool,
    {
        let latest = self.receiver.borrow_and_update().clone();
        self.current = latest;
        if predicate(&self.current) {
            return Some(Arc::clone(&self.current));
        }
        loop {
            let snap = self.changed().await?;
            if predicate(&snap) {
                return Some(snap);
            }
        }
    }

    /// Convert into a `Stream` for use with `StreamExt` combinators.
    pub fn into_stream(self) -> StateWatchStream {
        StateWatchStream {
            inner: WatchStream::new(self.receiver),
        }
    }
}

/// `Stream` adapter backed by a `watch::Receiver`.
///
/// Yields the current snapshot first, then one item per published change.
pub struct StateWatchStream {
    inner: WatchStream<Arc<DashboardState>>,
}

impl Stream for StateWatchStream {
    type Item = Arc<DashboardState>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn changed_tracks_the_sender() {
        let (tx, rx) = watch::channel(Arc::new(DashboardState::initial()));
        let mut stream = StateStream::new(rx);
        assert!(stream.current().auto_refresh);

        tx.send_replace(Arc::new(DashboardState {
            auto_refresh: false,
            ..DashboardState::initial()
        }));
        let snap = stream.changed().await.expect("sender alive");
        assert!(!snap.auto_refresh);
        assert!(!stream.current().auto_refresh);

        drop(tx);
        assert!(stream.changed().await.is_none());
    }

    #[tokio::test]
    async fn wait_until_sees_an_already_matching_snapshot() {
        let (_tx, rx) = watch::channel(Arc::new(DashboardState::initial()));
        let mut stream = StateStream::new(rx);
        let snap = stream.wait_until(|s| s.auto_refresh).await;
        assert!(snap.is_some());
    }

    #[tokio::test]
    async fn wait_until_returns_none_when_store_drops() {
        let (tx, rx) = watch::channel(Arc::new(DashboardState::initial()));
        let mut stream = StateStream::new(rx);
        drop(tx);
        assert!(stream.wait_until(|s| s.loading).await.is_none());
    }

    #[test]
    fn changed_stays_pending_until_a_publish() {
        let (tx, rx) = watch::channel(Arc::new(DashboardState::initial()));
        let mut stream = StateStream::new(rx);

        let mut next = tokio_test::task::spawn(stream.changed());
        tokio_test::assert_pending!(next.poll());

        tx.send_replace(Arc::new(DashboardState {
            loading: true,
            ..DashboardState::initial()
        }));
        assert!(next.is_woken());
        let snap = tokio_test::assert_ready!(next.poll());
        assert!(snap.is_some_and(|s| s.loading));
    }

    #[tokio::test]
    async fn into_stream_yields_current_then_each_change() {
        use tokio_stream::StreamExt;

        let (tx, rx) = watch::channel(Arc::new(DashboardState::initial()));
        let mut states = StateStream::new(rx).into_stream();

        let first = states.next().await.expect("current snapshot");
        assert!(first.auto_refresh);

        tx.send_replace(Arc::new(DashboardState {
            auto_refresh: false,
            ..DashboardState::initial()
        }));
        let second = states.next().await.expect("published change");
        assert!(!second.auto_refresh);

        drop(tx);
        assert!(states.next().await.is_none());
    }

    #[tokio::test]
    async fn store_subscription_streams_dispatched_changes() {
        use tokio_stream::StreamExt;

        use crate::action::Action;
        use crate::config::{MockConfig, StoreConfig};
        use crate::source::MockDataSource;
        use crate::store::Store;

        let store = Store::new(
            StoreConfig::default().without_timers(),
            MockDataSource::new(MockConfig::instant(2)),
        );
        store.start().await;
        let mut states = store.subscribe().into_stream();
        assert!(states.next().await.is_some_and(|s| s.auto_refresh));

        store.dispatch(Action::ToggleAutoRefresh).expect("store running");
        let toggled = tokio::time::timeout(std::time::Duration::from_secs(1), states.next())
            .await
            .expect("change published");
        assert!(toggled.is_some_and(|s| !s.auto_refresh));
        store.shutdown().await;
    }
}
