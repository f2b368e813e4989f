//! Capacity reconciliation.
//!
//! Brings the number of active seats in a grid to a target capacity. Seats
//! that survive are never modified; removal walks spatially from the back of
//! the vessel (highest row, then highest column).

use super::config::{LayoutConfig, MAX_COLUMNS, MAX_ROWS};
use super::generator::default_dimensions;
use super::grid::GridModel;
use super::synthesizer::{seat_number_for, SeatFactory};
use crate::types::GridPosition;
use serde::{Deserialize, Serialize};

/// Whether reconciliation may enlarge the grid
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GrowthPolicy {
    /// Enlarge rows/columns when empty cells run out (capacity change,
    /// session open, reset)
    Grow,
    /// Only fill existing empty cells (after an explicit resize)
    FillOnly,
}

/// What a reconciliation pass did
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileOutcome {
    /// Seats created
    pub added: u32,
    /// Seats removed
    pub removed: u32,
    /// Whether the grid dimensions were enlarged
    pub grew: bool,
    /// Active seats still missing when the grid ran out of room
    pub shortfall: u32,
}

impl ReconcileOutcome {
    /// Whether the grid was changed at all
    #[must_use]
    pub const fn changed(&self) -> bool {
        self.added > 0 || self.removed > 0 || self.grew
    }
}

/// Make `grid`'s active seat count equal `target`.
///
/// Growing fills empty cells row-major with new standard seats; cells whose
/// seat number carries a crew/disabled override are skipped. Shrinking
/// removes active seats only. Never leaves more than `target` active seats.
pub fn reconcile(
    config: &mut LayoutConfig,
    grid: &mut GridModel,
    target: u32,
    policy: GrowthPolicy,
    factory: &SeatFactory<'_>,
) -> ReconcileOutcome {
    let active = grid.active_seat_count();
    let mut outcome = ReconcileOutcome::default();

    if active > target {
        outcome.removed = shrink(grid, active - target);
    } else if active < target {
        let missing = target - active;
        if policy == GrowthPolicy::Grow {
            outcome.grew = grow(config, grid, target, missing, factory);
        }
        outcome.added = fill(config, grid, missing, factory);
        outcome.shortfall = missing - outcome.added;
    }

    if outcome.shortfall > 0 {
        tracing::warn!(
            target,
            shortfall = outcome.shortfall,
            rows = config.rows,
            columns = config.columns,
            ?policy,
            "Layout has no room for the declared capacity"
        );
    } else if outcome.changed() {
        tracing::debug!(
            target,
            added = outcome.added,
            removed = outcome.removed,
            grew = outcome.grew,
            "Reconciled seat count with capacity"
        );
    }
    outcome
}

fn shrink(grid: &mut GridModel, excess: u32) -> u32 {
    let victims: Vec<GridPosition> = grid
        .seats()
        .filter(|seat| seat.is_active())
        .map(crate::types::Seat::position)
        .collect();

    let mut removed = 0;
    for position in victims.into_iter().rev().take(excess as usize) {
        if grid.remove_at(position).is_some() {
            removed += 1;
        }
    }
    removed
}

fn fillable_cells(config: &LayoutConfig, grid: &GridModel) -> Vec<GridPosition> {
    grid.empty_cells()
        .filter(|&position| config.override_for(&seat_number_for(position)).is_none())
        .collect()
}

fn grow(
    config: &mut LayoutConfig,
    grid: &mut GridModel,
    target: u32,
    missing: u32,
    factory: &SeatFactory<'_>,
) -> bool {
    let mut grew = false;
    loop {
        let room = u32::try_from(fillable_cells(config, grid).len()).unwrap_or(u32::MAX);
        if room >= missing {
            break;
        }

        let (rows, columns) = default_dimensions(target.saturating_add(grid.inactive_seat_count()));
        let mut next = (config.rows.max(rows), config.columns.max(columns));
        if next == (config.rows, config.columns) {
            next = if config.rows < MAX_ROWS {
                (config.rows + 1, config.columns)
            } else if config.columns < MAX_COLUMNS {
                (config.rows, config.columns + 1)
            } else {
                break;
            };
        }

        if config.resize(next.0, next.1).is_err() {
            break;
        }
        grid.refresh(config, factory.pricing);
        grew = true;
    }
    grew
}

fn fill(config: &LayoutConfig, grid: &mut GridModel, missing: u32, factory: &SeatFactory<'_>) -> u32 {
    let mut added = 0;
    for position in fillable_cells(config, grid) {
        if added == missing {
            break;
        }
        let seat = factory.create(position, config);
        if seat.is_active() && grid.place(seat).is_ok() {
            added += 1;
        }
    }
    added
}
