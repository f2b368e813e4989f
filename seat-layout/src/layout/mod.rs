//! Grid model and the pure algorithms over it.
//!
//! Nothing here is asynchronous or holds shared state; the editor drives
//! these functions from its reducer.

pub mod config;
pub mod generator;
pub mod grid;
pub mod persistence;
pub mod reconciler;
pub mod synthesizer;

pub use config::{LayoutConfig, SeatOverride, MAX_COLUMNS, MAX_ROWS};
pub use generator::{default_config, default_dimensions, MAX_CAPACITY};
pub use grid::GridModel;
pub use persistence::{FloorData, LayoutData, MAIN_DECK};
pub use reconciler::{reconcile, GrowthPolicy, ReconcileOutcome};
pub use synthesizer::{
    column_letter, new_seat, seat_number_for, sync_override, synthesize, Pricing, SeatFactory, SeatIdGenerator,
    UuidSeatIds,
};
