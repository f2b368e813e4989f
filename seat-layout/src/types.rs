//! Domain types for the seat layout engine.
//!
//! Identifiers, vessel categories, the `Seat` entity and the persisted
//! `SeatLayout` envelope exchanged with the host.

use crate::layout::LayoutData;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// ============================================================================
// Identifiers
// ============================================================================

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            #[doc = concat!("Creates a new random `", stringify!($name), "`")]
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            #[doc = concat!("Create a `", stringify!($name), "` from a `Uuid`")]
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Get the inner UUID
            #[must_use]
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }
    };
}

uuid_id!(
    /// Unique identifier for a vessel
    VesselId
);

uuid_id!(
    /// Unique identifier for a persisted seat layout
    LayoutId
);

uuid_id!(
    /// Unique identifier for a seat.
    ///
    /// Once a seat is bound to a grid cell its id never changes while it
    /// stays the occupant of that cell.
    SeatId
);

// ============================================================================
// Enumerations
// ============================================================================

/// Vessel category, used to pick default premium rows
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum VesselType {
    /// Conventional passenger ferry
    #[default]
    Standard,
    /// Fast passenger craft
    Express,
    /// Luxury ferry, three premium rows by default
    Luxury,
    /// Mixed passenger/vehicle ferry, two premium rows by default
    Mixed,
    /// Cargo vessel with limited passenger seating
    Cargo,
}

/// Seat classification
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SeatType {
    /// Regular passenger seat
    #[default]
    Standard,
    /// Premium seat, sold at the premium multiplier
    Premium,
    /// Reserved for crew, not sellable
    Crew,
    /// Out of service, not sellable
    Disabled,
}

/// Fare class of a seat
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SeatClass {
    /// Economy
    #[default]
    Economy,
    /// Business
    Business,
    /// First
    First,
}

// ============================================================================
// Positions
// ============================================================================

/// A 1-indexed grid coordinate.
///
/// Ordering is row-major: row ascending, then column ascending.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GridPosition {
    /// Row, starting at 1
    pub row: u32,
    /// Column, starting at 1
    pub column: u32,
}

impl GridPosition {
    /// Creates a new position
    #[must_use]
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }
}

impl fmt::Display for GridPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row {}, column {}", self.row, self.column)
    }
}

// ============================================================================
// Entities
// ============================================================================

/// A seat on a vessel.
///
/// Position-derived fields (`row_number`, `position_x`, `position_y`,
/// `seat_number`, `is_window`, `is_aisle`) and the classification fields are
/// maintained by the synthesizer; see [`crate::layout::synthesizer`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Seat {
    /// Stable identifier
    pub id: SeatId,
    /// Owning vessel
    pub vessel_id: VesselId,
    /// Layout this seat was last saved with
    pub layout_id: Option<LayoutId>,
    /// Row (1-indexed)
    pub row_number: u32,
    /// Column (1-indexed)
    pub position_x: u32,
    /// Mirrors `row_number`
    pub position_y: u32,
    /// Display number, e.g. "C12"
    pub seat_number: String,
    /// First or last column
    pub is_window: bool,
    /// Column borders a vertical aisle
    pub is_aisle: bool,
    /// Classification
    pub seat_type: SeatType,
    /// Fare class
    pub seat_class: SeatClass,
    /// Premium flag
    pub is_premium: bool,
    /// Out of service flag
    pub is_disabled: bool,
    /// Fare multiplier
    pub price_multiplier: f64,
    /// Set once the seat has been saved through the seat-edit form.
    /// Explicit edits win over position-derived classification.
    #[serde(default)]
    pub is_customized: bool,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last edit time
    pub updated_at: DateTime<Utc>,
}

impl Seat {
    /// Current position of the seat
    #[must_use]
    pub const fn position(&self) -> GridPosition {
        GridPosition::new(self.row_number, self.position_x)
    }

    /// Whether the seat counts against the declared capacity
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.is_disabled && !matches!(self.seat_type, SeatType::Crew | SeatType::Disabled)
    }

    /// Fare for this seat given a base fare in cents, rounded to the nearest cent
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn fare_cents(&self, base_cents: u64) -> u64 {
        (base_cents as f64 * self.price_multiplier).round().max(0.0) as u64
    }
}

/// Persisted layout envelope.
///
/// The host owns persistence; the engine produces this value on every change
/// notification and save.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeatLayout {
    /// Layout identifier
    pub id: LayoutId,
    /// Owning vessel
    pub vessel_id: VesselId,
    /// Human label, regenerated on each save
    pub layout_name: String,
    /// Grid shape and zones
    pub layout_data: LayoutData,
    /// Whether this is the vessel's active layout
    pub is_active: bool,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last update time
    pub updated_at: DateTime<Utc>,
}

impl SeatLayout {
    /// Parse a layout received from the host as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`crate::LayoutError::MalformedLayoutData`] if the JSON does
    /// not describe a layout.
    pub fn from_json(json: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
