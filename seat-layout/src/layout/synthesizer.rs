//! Derived seat attributes.
//!
//! Synthesis is a pure function of a seat, its cell and the config: it never
//! touches ids or timestamps, so re-running it is a no-op.

use super::config::{LayoutConfig, SeatOverride};
use crate::types::{GridPosition, Seat, SeatClass, SeatId, SeatType, VesselId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Price multipliers applied by classification
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pricing {
    /// Multiplier for standard, crew and disabled seats
    pub standard: f64,
    /// Multiplier for seats in premium rows
    pub premium: f64,
}

impl Pricing {
    /// Pricing with the given premium multiplier
    #[must_use]
    pub const fn with_premium(premium: f64) -> Self {
        Self {
            standard: 1.0,
            premium,
        }
    }
}

impl Default for Pricing {
    fn default() -> Self {
        Self::with_premium(1.5)
    }
}

/// Source of ids for newly created seats
pub trait SeatIdGenerator: Send + Sync {
    /// Next unused seat id
    fn next_id(&self) -> SeatId;
}

/// Random v4 seat ids
#[derive(Clone, Copy, Debug, Default)]
pub struct UuidSeatIds;

impl SeatIdGenerator for UuidSeatIds {
    fn next_id(&self) -> SeatId {
        SeatId::new()
    }
}

/// Everything needed to mint new seats for one vessel
#[derive(Clone, Copy)]
pub struct SeatFactory<'a> {
    /// Vessel the seats belong to
    pub vessel_id: VesselId,
    /// Id source
    pub ids: &'a dyn SeatIdGenerator,
    /// Classification multipliers
    pub pricing: Pricing,
    /// Creation timestamp
    pub now: DateTime<Utc>,
}

impl SeatFactory<'_> {
    /// A new seat at `position`, classified by `config`
    #[must_use]
    pub fn create(&self, position: GridPosition, config: &LayoutConfig) -> Seat {
        new_seat(
            self.ids.next_id(),
            self.vessel_id,
            position,
            config,
            self.pricing,
            self.now,
        )
    }
}

/// Letter for a 1-indexed column: 1 is 'A', 2 is 'B' and so on
#[must_use]
pub fn column_letter(column: u32) -> char {
    char::from_u32(u32::from('A') + column.saturating_sub(1)).unwrap_or('?')
}

/// Display number for a cell, e.g. "C12" for row 12, column 3
#[must_use]
pub fn seat_number_for(position: GridPosition) -> String {
    format!("{}{}", column_letter(position.column), position.row)
}

/// Recompute the derived attributes of `seat` for `position`.
///
/// Position-derived fields are always refreshed. Classification follows the
/// config unless the seat has been customized through the seat-edit form, in
/// which case its number and classification are kept as edited.
#[must_use]
pub fn synthesize(seat: &Seat, position: GridPosition, config: &LayoutConfig, pricing: Pricing) -> Seat {
    let mut next = seat.clone();
    next.row_number = position.row;
    next.position_x = position.column;
    next.position_y = position.row;
    next.is_window = position.column == 1 || position.column == config.columns;
    next.is_aisle = config.aisles.contains(&position.column);

    if !seat.is_customized {
        next.seat_number = seat_number_for(position);
        classify(&mut next, config, pricing);
    }
    next
}

/// Bring a customized seat in line with the override now held for its
/// number. Fare class and multiplier stay as edited.
///
/// Non-customized seats need no help: [`synthesize`] reclassifies them.
#[must_use]
pub fn sync_override(seat: &Seat, config: &LayoutConfig) -> Seat {
    let mut next = seat.clone();
    match config.override_for(&seat.seat_number) {
        Some(SeatOverride::Disabled) => next.seat_type = SeatType::Disabled,
        Some(SeatOverride::Crew) => next.seat_type = SeatType::Crew,
        None if matches!(seat.seat_type, SeatType::Crew | SeatType::Disabled) => {
            next.seat_type = if config.is_premium_row(seat.row_number) {
                SeatType::Premium
            } else {
                SeatType::Standard
            };
        },
        None => {},
    }
    next.is_disabled = next.seat_type == SeatType::Disabled;
    next.is_premium = next.seat_type == SeatType::Premium;
    next
}

/// A fresh standard seat at `position`, classified by the config
#[must_use]
pub fn new_seat(
    id: SeatId,
    vessel_id: VesselId,
    position: GridPosition,
    config: &LayoutConfig,
    pricing: Pricing,
    now: DateTime<Utc>,
) -> Seat {
    let blank = Seat {
        id,
        vessel_id,
        layout_id: None,
        row_number: position.row,
        position_x: position.column,
        position_y: position.row,
        seat_number: String::new(),
        is_window: false,
        is_aisle: false,
        seat_type: SeatType::Standard,
        seat_class: SeatClass::Economy,
        is_premium: false,
        is_disabled: false,
        price_multiplier: pricing.standard,
        is_customized: false,
        created_at: now,
        updated_at: now,
    };
    synthesize(&blank, position, config, pricing)
}

fn classify(seat: &mut Seat, config: &LayoutConfig, pricing: Pricing) {
    let (seat_type, is_premium) = match config.override_for(&seat.seat_number) {
        Some(SeatOverride::Disabled) => (SeatType::Disabled, false),
        Some(SeatOverride::Crew) => (SeatType::Crew, false),
        None if config.is_premium_row(seat.row_number) => (SeatType::Premium, true),
        None => (SeatType::Standard, false),
    };
    seat.seat_type = seat_type;
    seat.is_premium = is_premium;
    seat.is_disabled = seat_type == SeatType::Disabled;
    if is_premium {
        seat.seat_class = SeatClass::Business;
        seat.price_multiplier = pricing.premium;
    } else {
        seat.seat_class = SeatClass::Economy;
        seat.price_multiplier = pricing.standard;
    }
}
