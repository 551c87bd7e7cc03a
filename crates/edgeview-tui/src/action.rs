//! UI action enum: the messages flowing through the TUI event loop.
//!
//! Key presses, timer events, and store updates all become an [`Action`]
//! sent over the app's action channel. Store intents are wrapped in
//! [`Action::Dispatch`] and forwarded to the core store untouched.

use std::sync::Arc;

use edgeview_core::{Action as StoreAction, DashboardState};

#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ──
    Quit,
    Tick,
    Render,
    Resize(u16, u16),

    // ── Overlays ──
    ToggleHelp,
    CloseOverlay,

    // ── Store traffic ──
    /// Forward an intent to the store.
    Dispatch(StoreAction),
    /// A new snapshot was published.
    StateChanged(Arc<DashboardState>),
    /// The store applied an action; carries its tag for the activity log.
    ActionApplied(&'static str),
}
