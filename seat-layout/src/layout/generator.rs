//! Default layout generation from declared capacity.
//!
//! The search keeps a ferry-like shape (rows at least as many as columns for
//! typical capacities) and minimizes wasted cells:
//!
//! - `need = ceil(capacity / 50)` is the fewest columns that fit in 50 rows
//! - `shape = clamp(isqrt(capacity), 1, 10)` caps the column count
//! - columns range over `max(need, ceil(shape / 2))..=min(20, max(shape, need))`
//! - rows are `ceil(capacity / columns)`; ties on waste go to more columns

use super::config::{LayoutConfig, MAX_COLUMNS, MAX_ROWS};
use crate::types::VesselType;
use std::collections::BTreeSet;

/// Largest capacity a single grid can hold
pub const MAX_CAPACITY: u32 = MAX_ROWS * MAX_COLUMNS;

/// Widest layout the shape heuristic picks on its own
const SHAPE_COLUMN_CAP: u32 = 10;

/// Minimum column count before a default centre aisle is added
const AISLE_THRESHOLD: u32 = 4;

/// Rows and columns for a grid holding `capacity` seats.
///
/// Zero capacity yields 1x1; anything above [`MAX_CAPACITY`] yields the
/// largest grid.
#[must_use]
pub fn default_dimensions(capacity: u32) -> (u32, u32) {
    if capacity == 0 {
        return (1, 1);
    }
    let capacity = capacity.min(MAX_CAPACITY);

    let need = capacity.div_ceil(MAX_ROWS);
    let shape = capacity.isqrt().clamp(1, SHAPE_COLUMN_CAP);
    let max_columns = shape.max(need).min(MAX_COLUMNS);
    let min_columns = need.max(shape.div_ceil(2)).min(max_columns);

    let mut best = (capacity.div_ceil(max_columns), max_columns);
    for columns in (min_columns..=max_columns).rev() {
        let rows = capacity.div_ceil(columns);
        if rows * columns - capacity < best.0 * best.1 - capacity {
            best = (rows, columns);
        }
    }
    best
}

/// Default aisle set: one centre aisle when the grid is wide enough
#[must_use]
pub fn default_aisles(columns: u32) -> BTreeSet<u32> {
    if columns > AISLE_THRESHOLD {
        BTreeSet::from([columns.div_ceil(2)])
    } else {
        BTreeSet::new()
    }
}

/// Default premium rows for a vessel category, clipped to `rows`
#[must_use]
pub fn default_premium_rows(vessel_type: VesselType, rows: u32) -> BTreeSet<u32> {
    let premium: &[u32] = match vessel_type {
        VesselType::Luxury => &[1, 2, 3],
        VesselType::Mixed => &[1, 2],
        VesselType::Standard | VesselType::Express | VesselType::Cargo => &[1],
    };
    premium.iter().copied().filter(|&row| row <= rows).collect()
}

/// Starting configuration for a vessel.
///
/// Used when a session opens without persisted data and on reset.
#[must_use]
pub fn default_config(capacity: u32, vessel_type: VesselType) -> LayoutConfig {
    let (rows, columns) = default_dimensions(capacity);
    LayoutConfig {
        rows,
        columns,
        aisles: default_aisles(columns),
        row_aisles: BTreeSet::new(),
        premium_rows: default_premium_rows(vessel_type, rows),
        disabled_seats: BTreeSet::new(),
        crew_seats: BTreeSet::new(),
    }
}
