// ── Core error types ──
//
// User-facing errors from edgeview-core. Data source failures inside the
// pipeline never surface here: the effect coordinator turns them into
// failure actions. `CoreError` covers the container itself and callers
// that talk to a source directly.

use thiserror::Error;

use crate::source::SourceError;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Data source ──────────────────────────────────────────────────
    #[error(transparent)]
    Source(#[from] SourceError),

    // ── Store lifecycle ──────────────────────────────────────────────
    #[error("Dashboard store has been shut down")]
    StoreStopped,
}
