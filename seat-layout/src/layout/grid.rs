//! The cell matrix binding grid positions to seats.

use super::config::LayoutConfig;
use super::synthesizer::{synthesize, Pricing};
use crate::error::{LayoutError, Result};
use crate::types::{GridPosition, Seat, SeatId};

/// A `rows x columns` matrix of cells, each empty or holding a seat.
///
/// Storage is row-major and 0-indexed; the API is 1-indexed. A bound seat's
/// `row_number`/`position_x` always equal the coordinates of its cell.
#[derive(Clone, Debug, PartialEq)]
pub struct GridModel {
    rows: u32,
    columns: u32,
    cells: Vec<Option<Seat>>,
}

impl GridModel {
    /// Grid of the config's size with every cell empty
    #[must_use]
    pub fn empty(config: &LayoutConfig) -> Self {
        Self {
            rows: config.rows,
            columns: config.columns,
            cells: vec![None; config.cell_count() as usize],
        }
    }

    /// Build a grid from `config` and existing seats.
    ///
    /// Each seat is bound to the cell matching its `(row_number, position_x)`
    /// after re-synthesis. Seats outside the grid are dropped, and when two
    /// seats claim one cell the first wins. No seats are created.
    #[must_use]
    pub fn regenerate<'a, I>(config: &LayoutConfig, seats: I, pricing: Pricing) -> Self
    where
        I: IntoIterator<Item = &'a Seat>,
    {
        let mut grid = Self::empty(config);
        let mut dropped = 0_usize;
        for seat in seats {
            let position = seat.position();
            match grid.index(position) {
                Some(index) if grid.cells[index].is_none() => {
                    grid.cells[index] = Some(synthesize(seat, position, config, pricing));
                },
                _ => dropped += 1,
            }
        }
        if dropped > 0 {
            tracing::debug!(
                dropped,
                rows = config.rows,
                columns = config.columns,
                "Seats outside the grid or on a claimed cell were dropped"
            );
        }
        grid
    }

    /// Regenerate in place from the seats currently bound
    pub fn refresh(&mut self, config: &LayoutConfig, pricing: Pricing) {
        let seats: Vec<Seat> = std::mem::take(&mut self.cells).into_iter().flatten().collect();
        *self = Self::regenerate(config, &seats, pricing);
    }

    /// Number of rows
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of columns
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Whether `position` lies inside the grid
    #[must_use]
    pub const fn contains(&self, position: GridPosition) -> bool {
        position.row >= 1
            && position.row <= self.rows
            && position.column >= 1
            && position.column <= self.columns
    }

    fn index(&self, position: GridPosition) -> Option<usize> {
        self.contains(position)
            .then(|| ((position.row - 1) * self.columns + (position.column - 1)) as usize)
    }

    fn position_of(&self, index: usize) -> GridPosition {
        let columns = self.columns as usize;
        GridPosition::new(
            u32::try_from(index / columns + 1).unwrap_or(u32::MAX),
            u32::try_from(index % columns + 1).unwrap_or(u32::MAX),
        )
    }

    /// Seat bound at `position`, if any
    #[must_use]
    pub fn seat_at(&self, position: GridPosition) -> Option<&Seat> {
        self.index(position).and_then(|i| self.cells[i].as_ref())
    }

    /// Seat with the given id, if bound
    #[must_use]
    pub fn find(&self, id: SeatId) -> Option<&Seat> {
        self.seats().find(|seat| seat.id == id)
    }

    /// Bind `seat` to the cell at its own position.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidSeatInput`] if the position is outside
    /// the grid, or [`LayoutError::CellOccupied`] if another seat is there.
    pub fn place(&mut self, seat: Seat) -> Result<()> {
        let position = seat.position();
        let index = self.index(position).ok_or_else(|| {
            LayoutError::InvalidSeatInput(format!(
                "{position} is outside the {}x{} layout",
                self.rows, self.columns
            ))
        })?;
        match &self.cells[index] {
            Some(occupant) if occupant.id != seat.id => Err(LayoutError::CellOccupied {
                row: position.row,
                column: position.column,
            }),
            _ => {
                self.cells[index] = Some(seat);
                Ok(())
            },
        }
    }

    /// Clear the cell at `position`, returning its seat
    pub fn remove_at(&mut self, position: GridPosition) -> Option<Seat> {
        self.index(position).and_then(|i| self.cells[i].take())
    }

    /// Clear the cell holding seat `id`, returning the seat
    pub fn remove(&mut self, id: SeatId) -> Option<Seat> {
        let position = self.find(id)?.position();
        self.remove_at(position)
    }

    /// Bound seats in row-major order
    pub fn seats(&self) -> impl Iterator<Item = &Seat> + '_ {
        self.cells.iter().flatten()
    }

    /// Bound seats in row-major order, cloned
    #[must_use]
    pub fn to_seats(&self) -> Vec<Seat> {
        self.seats().cloned().collect()
    }

    /// Empty cells in row-major order
    pub fn empty_cells(&self) -> impl Iterator<Item = GridPosition> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_none())
            .map(|(index, _)| self.position_of(index))
    }

    /// Number of bound seats
    #[must_use]
    pub fn seat_count(&self) -> usize {
        self.seats().count()
    }

    /// Number of bound seats counted against capacity
    #[must_use]
    pub fn active_seat_count(&self) -> u32 {
        u32::try_from(self.seats().filter(|seat| seat.is_active()).count()).unwrap_or(u32::MAX)
    }

    /// Number of bound seats not counted against capacity
    #[must_use]
    pub fn inactive_seat_count(&self) -> u32 {
        u32::try_from(self.seat_count()).unwrap_or(u32::MAX) - self.active_seat_count()
    }
}
