// ── Request/response helper over the action pipeline ──
//
// `fetch` dispatches load triggers and waits on the applied-action feed for
// each requested kind to finish. The loads still flow through the queue,
// the transition function, and the exhaust policy like any other trigger.

use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

use super::Store;
use crate::action::LoadKind;
use crate::error::CoreError;
use crate::model::TimeRange;
use crate::source::{DataSource, SourceError};
use crate::state::DashboardState;

impl<S: DataSource> Store<S> {
    /// Load `kinds` at `range` and return the snapshot once all of them have
    /// completed. Fails with the first load failure observed.
    pub async fn fetch(
        &self,
        kinds: &[LoadKind],
        range: TimeRange,
    ) -> Result<Arc<DashboardState>, CoreError> {
        let mut feed = self.actions();
        let mut pending: Vec<LoadKind> = Vec::with_capacity(kinds.len());
        for &kind in kinds {
            if !pending.contains(&kind) {
                pending.push(kind);
            }
        }
        for kind in &pending {
            self.dispatch(kind.trigger(range))?;
        }

        let cancel = self.inner.cancel.clone();
        let mut failure: Option<String> = None;

        while !pending.is_empty() {
            let received = tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(CoreError::StoreStopped),
                received = feed.recv() => received,
            };

            match received {
                Ok(action) => {
                    if let Some(kind) = action.load_success() {
                        pending.retain(|k| *k != kind);
                    } else if let Some((kind, message)) = action.load_failure() {
                        pending.retain(|k| *k != kind);
                        failure.get_or_insert_with(|| message.to_owned());
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "applied-action feed lagged during fetch");
                    // Whatever is no longer in flight finished while we lagged.
                    pending.retain(|k| self.inner.effects.is_in_flight(*k));
                }
                Err(RecvError::Closed) => return Err(CoreError::StoreStopped),
            }
        }

        if let Some(message) = failure {
            return Err(CoreError::Source(SourceError::new(message)));
        }
        debug!(kinds = kinds.len(), %range, "fetch complete");
        Ok(self.state())
    }
}
