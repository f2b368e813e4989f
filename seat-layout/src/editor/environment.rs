//! Injected dependencies of the layout editor.

use crate::layout::{SeatIdGenerator, UuidSeatIds};
use crate::settings::EditorSettings;
use crate::types::{Seat, SeatLayout};
use ferry_seating_core::environment::{Clock, SystemClock};
use futures::future::BoxFuture;
use std::sync::Arc;

/// The host side of an editing session.
///
/// `on_change` receives debounced live state for preview; `save` is an
/// explicit commit. The engine never talks to storage itself.
///
/// Note: `save` returns `BoxFuture` instead of being an async fn so the
/// trait stays dyn-compatible.
pub trait LayoutSink: Send + Sync {
    /// Live, unsaved state
    fn on_change(&self, layout: SeatLayout, seats: Vec<Seat>);

    /// Persist the layout and seats.
    ///
    /// # Errors
    ///
    /// Any error is surfaced to the user; local state is left untouched.
    fn save(&self, layout: SeatLayout, seats: Vec<Seat>) -> BoxFuture<'static, anyhow::Result<()>>;
}

/// Environment for the layout editor reducer
#[derive(Clone)]
pub struct EditorEnvironment {
    /// Clock for timestamps
    pub clock: Arc<dyn Clock>,
    /// Id source for new seats
    pub ids: Arc<dyn SeatIdGenerator>,
    /// Host callbacks
    pub sink: Arc<dyn LayoutSink>,
    /// Session settings
    pub settings: EditorSettings,
}

impl EditorEnvironment {
    /// Creates a new `EditorEnvironment`
    #[must_use]
    pub fn new(
        clock: Arc<dyn Clock>,
        ids: Arc<dyn SeatIdGenerator>,
        sink: Arc<dyn LayoutSink>,
        settings: EditorSettings,
    ) -> Self {
        Self {
            clock,
            ids,
            sink,
            settings,
        }
    }

    /// Environment with the system clock and random seat ids
    #[must_use]
    pub fn production(sink: Arc<dyn LayoutSink>, settings: EditorSettings) -> Self {
        Self::new(Arc::new(SystemClock), Arc::new(UuidSeatIds), sink, settings)
    }
}
