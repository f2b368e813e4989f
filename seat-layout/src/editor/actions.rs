//! Actions for the layout editor.

use super::types::{EditorMode, SeatEdit};
use crate::error::LayoutError;
use crate::types::{GridPosition, SeatId};
use chrono::{DateTime, Utc};

/// Everything that can happen to an editing session.
///
/// User intents come from the host; the `*Succeeded`/`*Failed` and
/// `FlushChanges` actions are fed back by effects.
#[derive(Clone, Debug)]
pub enum EditorAction {
    // Session
    /// The session store is live; schedules the first notification
    SessionStarted,
    /// Declared capacity changed outside the editor
    CapacityChanged {
        /// New capacity
        capacity: u32,
    },

    // Interaction
    /// Switch tap interpretation
    SetMode(EditorMode),
    /// A grid cell was tapped
    CellTapped(GridPosition),
    /// Empty the arrange-mode selection
    ClearSelection,
    /// Select every seat (arrange mode)
    SelectAll,
    /// Ask to delete the selected seats
    RemoveSelected,

    // Seat-edit form
    /// The form saved a seat
    SeatEditSubmitted(SeatEdit),
    /// The form asked to delete a seat
    SeatDeleteRequested {
        /// Seat to delete
        seat_id: SeatId,
    },
    /// The form was closed without changes
    SeatEditDismissed,

    // Shape and zones
    /// Change both dimensions
    Resize {
        /// New row count
        rows: u32,
        /// New column count
        columns: u32,
    },
    /// Change the row count
    SetRows {
        /// New row count
        rows: u32,
    },
    /// Change the column count
    SetColumns {
        /// New column count
        columns: u32,
    },
    /// Toggle the vertical aisle left of a column
    ToggleAisle {
        /// Column index
        column: u32,
    },
    /// Toggle the horizontal aisle above a row
    ToggleRowAisle {
        /// Row index
        row: u32,
    },
    /// Toggle a premium row
    TogglePremiumRow {
        /// Row index
        row: u32,
    },
    /// Toggle a seat number in the disabled set
    ToggleDisabledSeat {
        /// Seat number
        seat_number: String,
    },
    /// Toggle a seat number in the crew set
    ToggleCrewSeat {
        /// Seat number
        seat_number: String,
    },
    /// Ask to discard the grid and regenerate the default
    ResetToDefault,

    // Confirmation
    /// Accept the pending confirmation
    Confirm,
    /// Reject the pending confirmation
    Dismiss,
    /// Clear the current alert
    DismissAlert,

    // Persistence
    /// Commit the layout through the host
    Save,
    /// The host stored the layout
    SaveSucceeded {
        /// Label the layout was saved under
        layout_name: String,
        /// Save time
        saved_at: DateTime<Utc>,
    },
    /// The host failed to store the layout
    SaveFailed {
        /// Failure
        error: LayoutError,
    },

    // Notification
    /// Debounce window elapsed for `revision`
    FlushChanges {
        /// Revision the flush was scheduled for
        revision: u64,
    },
}
