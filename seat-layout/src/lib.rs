//! # Ferry Seat Layout
//!
//! Seat layout and arrangement engine for ferry vessels.
//!
//! Turns a vessel's declared seating capacity into an addressable seat map,
//! lets an operator reshape it interactively, and keeps it consistent as the
//! declared capacity changes, without losing operator edits and without
//! redundant writes to the host.
//!
//! # Architecture
//!
//! ```text
//! capacity + vessel type
//!          │
//!          ▼
//!   ┌──────────────┐    ┌────────────┐    ┌─────────────┐
//!   │  Generator   │──▶ │ GridModel  │──▶ │ Synthesizer │
//!   └──────────────┘    └────────────┘    └─────────────┘
//!                         ▲      │
//!            Reconciler ──┘      ▼
//!                         ┌────────────┐    ┌─────────────┐
//!     EditorAction ─────▶ │  Reducer   │──▶ │  Notifier   │──▶ on_change / save
//!                         └────────────┘    └─────────────┘
//! ```
//!
//! - [`layout`]: the pure grid model and algorithms
//! - [`editor`]: the interaction reducer and the [`LayoutEditorSession`]
//! - [`notifier`]: change fingerprinting and debounce bookkeeping
//!
//! # Example
//!
//! ```ignore
//! let env = EditorEnvironment::production(sink, EditorSettings::from_env());
//! let session = LayoutEditorSession::open(
//!     SessionInput::new(vessel_id, 120, VesselType::Luxury),
//!     env,
//! )
//! .await?;
//! session.send(EditorAction::TogglePremiumRow { row: 4 }).await?;
//! session.send(EditorAction::Save).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod editor;
pub mod error;
pub mod layout;
pub mod notifier;
pub mod settings;
pub mod types;

#[cfg(any(test, feature = "test-utils"))]
pub mod mocks;

pub use editor::{
    EditorAction, EditorEnvironment, EditorMode, EditorState, LayoutEditorReducer,
    LayoutEditorSession, LayoutSink, SessionError, SessionInput,
};
pub use error::{LayoutError, Result};
pub use layout::{GridModel, LayoutConfig, LayoutData};
pub use settings::EditorSettings;
pub use types::{
    GridPosition, LayoutId, Seat, SeatClass, SeatId, SeatLayout, SeatType, VesselId, VesselType,
};
