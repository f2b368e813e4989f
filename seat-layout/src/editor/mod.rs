//! Interactive layout editor.
//!
//! Mode-scoped cell taps, shape and zone edits, the seat-edit form round
//! trip, confirmations, debounced change notification and save.

pub mod actions;
pub mod environment;
pub mod reducer;
pub mod session;
pub mod types;

#[cfg(test)]
mod tests;

pub use actions::EditorAction;
pub use environment::{EditorEnvironment, LayoutSink};
pub use reducer::LayoutEditorReducer;
pub use session::{LayoutEditorSession, SessionError};
pub use types::{
    Confirmation, EditorMode, EditorState, LayoutMeta, LayoutSummary, SeatEdit, SeatEditForm,
    SeatEditRequest, SessionInput,
};
