//! Data bridge: forwards store snapshots and applied actions to the UI.
//!
//! Runs as a background task. Sends the current snapshot once, then every
//! published snapshot as [`Action::StateChanged`] and every applied store
//! action's tag as [`Action::ActionApplied`] until cancelled.

use tokio::sync::{broadcast::error::RecvError, mpsc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use edgeview_core::{DataSource, Store};

use crate::action::Action;

pub async fn spawn_data_bridge<S: DataSource>(
    store: Store<S>,
    action_tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
) {
    let mut states = store.subscribe();
    let mut applied = store.actions();

    // Push the initial snapshot so the screen renders immediately.
    let _ = action_tx.send(Action::StateChanged(states.latest()));

    loop {
        tokio::select! {
            biased;

            () = cancel.cancelled() => break,

            changed = states.changed() => match changed {
                Some(state) => {
                    if action_tx.send(Action::StateChanged(state)).is_err() {
                        break;
                    }
                }
                None => {
                    debug!("state stream closed");
                    break;
                }
            },

            received = applied.recv() => match received {
                Ok(action) => {
                    let _ = action_tx.send(Action::ActionApplied(action.tag()));
                }
                Err(RecvError::Lagged(skipped)) => warn!(skipped, "action feed lagged"),
                Err(RecvError::Closed) => break,
            },
        }
    }

    debug!("data bridge stopped");
}
