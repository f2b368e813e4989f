//! Grid shape and zone designations.

use crate::error::{LayoutError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Largest number of rows a layout may have
pub const MAX_ROWS: u32 = 50;

/// Largest number of columns a layout may have
pub const MAX_COLUMNS: u32 = 20;

/// Pure description of a seat grid: dimensions plus zone metadata.
///
/// Holds no seat entities. Sets are ordered so that serialized output is
/// stable, which the change notifier relies on for fingerprinting.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Number of rows, `1..=MAX_ROWS`
    pub rows: u32,
    /// Number of columns, `1..=MAX_COLUMNS`
    pub columns: u32,
    /// Columns with a vertical aisle immediately to their left, `2..=columns`
    #[serde(default)]
    pub aisles: BTreeSet<u32>,
    /// Rows with a horizontal aisle immediately above them, `2..=rows`
    #[serde(default, rename = "rowAisles")]
    pub row_aisles: BTreeSet<u32>,
    /// Premium rows, `1..=rows`
    #[serde(default)]
    pub premium_rows: BTreeSet<u32>,
    /// Seat numbers marked out of service
    #[serde(default)]
    pub disabled_seats: BTreeSet<String>,
    /// Seat numbers reserved for crew
    #[serde(default)]
    pub crew_seats: BTreeSet<String>,
}

/// Seat-number override kinds held by the config
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeatOverride {
    /// Listed in `disabled_seats`
    Disabled,
    /// Listed in `crew_seats`
    Crew,
}

impl LayoutConfig {
    /// Empty config with the given dimensions.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidDimensions`] if either dimension is out
    /// of range.
    pub fn new(rows: u32, columns: u32) -> Result<Self> {
        check_dimensions(rows, columns)?;
        Ok(Self {
            rows,
            columns,
            aisles: BTreeSet::new(),
            row_aisles: BTreeSet::new(),
            premium_rows: BTreeSet::new(),
            disabled_seats: BTreeSet::new(),
            crew_seats: BTreeSet::new(),
        })
    }

    /// Total number of cells in the grid
    #[must_use]
    pub const fn cell_count(&self) -> u32 {
        self.rows * self.columns
    }

    /// Check every bound this config must satisfy.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidDimensions`] or
    /// [`LayoutError::ReferenceOutOfRange`] for the first violation found.
    pub fn validate(&self) -> Result<()> {
        check_dimensions(self.rows, self.columns)?;
        check_references("aisle", &self.aisles, 2, self.columns)?;
        check_references("row aisle", &self.row_aisles, 2, self.rows)?;
        check_references("premium row", &self.premium_rows, 1, self.rows)?;
        Ok(())
    }

    /// Change the dimensions and prune references that fall outside them.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidDimensions`] and leaves the config
    /// untouched if the new size is out of range.
    pub fn resize(&mut self, rows: u32, columns: u32) -> Result<()> {
        check_dimensions(rows, columns)?;
        self.rows = rows;
        self.columns = columns;
        self.prune();
        Ok(())
    }

    /// Drop aisle and premium references outside the current bounds.
    ///
    /// Seat-number overrides are not positional and are kept.
    pub fn prune(&mut self) {
        let (rows, columns) = (self.rows, self.columns);
        self.aisles.retain(|c| (2..=columns).contains(c));
        self.row_aisles.retain(|r| (2..=rows).contains(r));
        self.premium_rows.retain(|r| (1..=rows).contains(r));
    }

    /// Toggle the vertical aisle left of `column`. Returns whether the aisle
    /// is now present.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::ReferenceOutOfRange`] unless `2 <= column <= columns`.
    pub fn toggle_aisle(&mut self, column: u32) -> Result<bool> {
        check_reference("aisle", column, 2, self.columns)?;
        Ok(toggle(&mut self.aisles, column))
    }

    /// Toggle the horizontal aisle above `row`. Returns whether the aisle is
    /// now present.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::ReferenceOutOfRange`] unless `2 <= row <= rows`.
    pub fn toggle_row_aisle(&mut self, row: u32) -> Result<bool> {
        check_reference("row aisle", row, 2, self.rows)?;
        Ok(toggle(&mut self.row_aisles, row))
    }

    /// Toggle premium designation of `row`. Returns whether the row is now
    /// premium.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::ReferenceOutOfRange`] unless `1 <= row <= rows`.
    pub fn toggle_premium_row(&mut self, row: u32) -> Result<bool> {
        check_reference("premium row", row, 1, self.rows)?;
        Ok(toggle(&mut self.premium_rows, row))
    }

    /// Whether `row` is a premium row
    #[must_use]
    pub fn is_premium_row(&self, row: u32) -> bool {
        self.premium_rows.contains(&row)
    }

    /// Override currently applied to `seat_number`, disabled taking precedence
    #[must_use]
    pub fn override_for(&self, seat_number: &str) -> Option<SeatOverride> {
        if self.disabled_seats.contains(seat_number) {
            Some(SeatOverride::Disabled)
        } else if self.crew_seats.contains(seat_number) {
            Some(SeatOverride::Crew)
        } else {
            None
        }
    }

    /// Replace the override for `seat_number`, keeping the two sets disjoint
    pub fn set_override(&mut self, seat_number: &str, value: Option<SeatOverride>) {
        self.disabled_seats.remove(seat_number);
        self.crew_seats.remove(seat_number);
        match value {
            Some(SeatOverride::Disabled) => {
                self.disabled_seats.insert(seat_number.to_string());
            },
            Some(SeatOverride::Crew) => {
                self.crew_seats.insert(seat_number.to_string());
            },
            None => {},
        }
    }

    /// Toggle `seat_number` in the disabled set. Returns whether it is now
    /// disabled.
    pub fn toggle_disabled_seat(&mut self, seat_number: &str) -> bool {
        let disabled = self.override_for(seat_number) == Some(SeatOverride::Disabled);
        self.set_override(seat_number, (!disabled).then_some(SeatOverride::Disabled));
        !disabled
    }

    /// Toggle `seat_number` in the crew set. Returns whether it is now crew.
    pub fn toggle_crew_seat(&mut self, seat_number: &str) -> bool {
        let crew = self.crew_seats.contains(seat_number);
        self.set_override(seat_number, (!crew).then_some(SeatOverride::Crew));
        !crew
    }
}

fn toggle(set: &mut BTreeSet<u32>, value: u32) -> bool {
    if set.remove(&value) {
        false
    } else {
        set.insert(value);
        true
    }
}

fn check_dimensions(rows: u32, columns: u32) -> Result<()> {
    if (1..=MAX_ROWS).contains(&rows) && (1..=MAX_COLUMNS).contains(&columns) {
        Ok(())
    } else {
        Err(LayoutError::InvalidDimensions {
            rows,
            columns,
            max_rows: MAX_ROWS,
            max_columns: MAX_COLUMNS,
        })
    }
}

fn check_reference(kind: &'static str, index: u32, min: u32, limit: u32) -> Result<()> {
    if (min..=limit).contains(&index) {
        Ok(())
    } else {
        Err(LayoutError::ReferenceOutOfRange { kind, index, limit })
    }
}

fn check_references(kind: &'static str, set: &BTreeSet<u32>, min: u32, limit: u32) -> Result<()> {
    set.iter()
        .try_for_each(|&index| check_reference(kind, index, min, limit))
}
