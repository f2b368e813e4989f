//! Error types for the seat layout engine.

use thiserror::Error;

/// Errors raised by layout operations.
///
/// The editor keeps the most recent user-facing error in
/// `EditorState::alert`, so the type is `Clone` and compares by value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// Requested grid size is outside 1..=50 rows or 1..=20 columns
    #[error("Layout must have 1-{max_rows} rows and 1-{max_columns} columns (got {rows}x{columns})")]
    InvalidDimensions {
        /// Requested rows
        rows: u32,
        /// Requested columns
        columns: u32,
        /// Upper bound on rows
        max_rows: u32,
        /// Upper bound on columns
        max_columns: u32,
    },

    /// An aisle, premium row or row aisle refers outside the grid
    #[error("{kind} {index} is outside the layout (limit {limit})")]
    ReferenceOutOfRange {
        /// What kind of reference ("aisle", "row aisle", "premium row")
        kind: &'static str,
        /// Offending index
        index: u32,
        /// Current bound
        limit: u32,
    },

    /// Adding a seat would exceed the declared capacity
    #[error("Seat capacity reached: the vessel is declared for {capacity} seats")]
    CapacityReached {
        /// Declared seating capacity
        capacity: u32,
    },

    /// The seat-edit form contained invalid values
    #[error("Invalid seat details: {0}")]
    InvalidSeatInput(String),

    /// No seat with the given id exists in the grid
    #[error("Seat {0} is not part of this layout")]
    UnknownSeat(String),

    /// A seat cannot be moved onto an occupied cell
    #[error("Row {row}, column {column} is already occupied")]
    CellOccupied {
        /// Target row
        row: u32,
        /// Target column
        column: u32,
    },

    /// Persisted `layout_data` could not be understood
    #[error("Malformed layout data: {0}")]
    MalformedLayoutData(String),

    /// The host failed to persist the layout
    #[error("Failed to save seat layout: {0}")]
    SaveFailed(String),
}

impl From<serde_json::Error> for LayoutError {
    fn from(error: serde_json::Error) -> Self {
        Self::MalformedLayoutData(error.to_string())
    }
}

/// Result alias for layout operations.
pub type Result<T> = std::result::Result<T, LayoutError>;
