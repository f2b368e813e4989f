//! A live editing session: the editor reducer running in its own store.
//!
//! Each session owns its store, so the pending notification timer is scoped
//! to the session and dies with it.

use super::actions::EditorAction;
use super::environment::EditorEnvironment;
use super::reducer::LayoutEditorReducer;
use super::types::{EditorState, LayoutSummary, SessionInput};
use crate::error::LayoutError;
use crate::notifier::NOTIFY_EFFECT;
use crate::types::{Seat, SeatLayout};
use ferry_seating_runtime::{Store, StoreError};
use thiserror::Error;
use tokio::sync::broadcast;

type EditorStore = Store<EditorState, EditorAction, EditorEnvironment, LayoutEditorReducer>;

/// Errors from session operations
#[derive(Debug, Error)]
pub enum SessionError {
    /// The session could not be opened
    #[error(transparent)]
    Layout(#[from] LayoutError),

    /// The session has been closed
    #[error("Editing session is closed")]
    Closed,

    /// The store failed to run an action
    #[error("Store error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for SessionError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::ShutdownInProgress => Self::Closed,
            other => Self::Store(other),
        }
    }
}

/// An open seat layout editing session.
///
/// # Example
///
/// ```ignore
/// let session = LayoutEditorSession::open(input, env).await?;
/// session.send(EditorAction::SetMode(EditorMode::Edit)).await?;
/// session.send(EditorAction::CellTapped(GridPosition::new(3, 2))).await?;
/// session.send(EditorAction::Save).await?;
/// session.close();
/// ```
pub struct LayoutEditorSession {
    store: EditorStore,
}

impl LayoutEditorSession {
    /// Build the initial state and start the session.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Layout`] if the saved layout is malformed.
    pub async fn open(input: SessionInput, env: EditorEnvironment) -> Result<Self, SessionError> {
        let vessel_id = input.vessel_id;
        let state = EditorState::open(input, &env)?;
        let store = Store::new(state, LayoutEditorReducer::new(), env);
        store.send(EditorAction::SessionStarted).await?;
        tracing::info!(%vessel_id, "Seat layout session opened");
        Ok(Self { store })
    }

    /// Dispatch an action.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Closed`] once the session has been closed.
    pub async fn send(&self, action: EditorAction) -> Result<(), SessionError> {
        self.store.send(action).await.map_err(SessionError::from)
    }

    /// Read the current state via a closure
    pub async fn state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&EditorState) -> T,
    {
        self.store.state(f).await
    }

    /// Current layout and seats, as they would be emitted
    pub async fn snapshot(&self) -> (SeatLayout, Vec<Seat>) {
        self.store.state(|s| (s.layout(), s.seats())).await
    }

    /// Current seat statistics
    pub async fn summary(&self) -> LayoutSummary {
        self.store.state(EditorState::summary).await
    }

    /// Whether a change notification is waiting for its quiescence window
    #[must_use]
    pub fn has_pending_notification(&self) -> bool {
        self.store.is_scheduled(NOTIFY_EFFECT)
    }

    /// Observe actions produced by effects (flushes, save results)
    #[must_use]
    pub fn subscribe_actions(&self) -> broadcast::Receiver<EditorAction> {
        self.store.subscribe_actions()
    }

    /// End the session: cancel the pending notification and reject further
    /// actions. A save already in flight still reaches the host.
    pub fn close(&self) {
        if !self.store.is_shut_down() {
            tracing::info!("Seat layout session closed");
            self.store.shutdown();
        }
    }

    /// Whether [`close`](Self::close) has been called
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.store.is_shut_down()
    }
}

impl Drop for LayoutEditorSession {
    fn drop(&mut self) {
        self.close();
    }
}
