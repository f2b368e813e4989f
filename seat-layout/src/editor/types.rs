//! Editor state and the values exchanged with the host.

use super::environment::EditorEnvironment;
use crate::error::{LayoutError, Result};
use crate::layout::{
    default_config, reconcile, GridModel, GrowthPolicy, LayoutConfig, LayoutData, ReconcileOutcome,
    SeatFactory,
};
use crate::notifier::{fingerprint, ChangeNotifier};
use crate::types::{
    GridPosition, LayoutId, Seat, SeatClass, SeatId, SeatLayout, SeatType, VesselId, VesselType,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// ============================================================================
// Session input
// ============================================================================

/// What the host hands the editor when a session opens
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionInput {
    /// Vessel being edited
    pub vessel_id: VesselId,
    /// Declared seating capacity
    pub seating_capacity: u32,
    /// Vessel category
    pub vessel_type: VesselType,
    /// Previously saved layout, if any
    #[serde(default)]
    pub initial_layout: Option<SeatLayout>,
    /// Previously saved seats
    #[serde(default)]
    pub initial_seats: Vec<Seat>,
}

impl SessionInput {
    /// Input for a vessel with no saved layout
    #[must_use]
    pub const fn new(vessel_id: VesselId, seating_capacity: u32, vessel_type: VesselType) -> Self {
        Self {
            vessel_id,
            seating_capacity,
            vessel_type,
            initial_layout: None,
            initial_seats: Vec::new(),
        }
    }

    /// Attach a saved layout and its seats
    #[must_use]
    pub fn with_saved(mut self, layout: SeatLayout, seats: Vec<Seat>) -> Self {
        self.initial_layout = Some(layout);
        self.initial_seats = seats;
        self
    }
}

// ============================================================================
// Interaction
// ============================================================================

/// How cell taps are interpreted
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditorMode {
    /// Taps do nothing
    #[default]
    View,
    /// Taps create seats or open the seat-edit form
    Edit,
    /// Taps toggle seats in the selection
    Arrange,
}

/// A seat handed to the external seat-edit form
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeatEditRequest {
    /// Snapshot of the seat being edited
    pub seat: Seat,
}

impl SeatEditRequest {
    /// Form pre-filled from the seat
    #[must_use]
    pub fn form(&self) -> SeatEditForm {
        SeatEditForm::from_seat(&self.seat)
    }
}

/// Raw values from the seat-edit form, before validation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeatEditForm {
    /// Seat being edited
    pub seat_id: SeatId,
    /// Display number as typed
    pub seat_number: String,
    /// Row as typed
    pub row_number: i64,
    /// Column as typed
    pub position_x: i64,
    /// Chosen classification
    pub seat_type: SeatType,
    /// Chosen fare class
    pub seat_class: SeatClass,
    /// Chosen multiplier
    pub price_multiplier: f64,
}

impl SeatEditForm {
    /// Form pre-filled with a seat's current values
    #[must_use]
    pub fn from_seat(seat: &Seat) -> Self {
        Self {
            seat_id: seat.id,
            seat_number: seat.seat_number.clone(),
            row_number: i64::from(seat.row_number),
            position_x: i64::from(seat.position_x),
            seat_type: seat.seat_type,
            seat_class: seat.seat_class,
            price_multiplier: seat.price_multiplier,
        }
    }

    /// Check the form and produce an edit the engine can apply.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::InvalidSeatInput`] for a blank seat number, a
    /// non-positive row or column, or a multiplier that is not a positive
    /// finite number.
    pub fn validate(self) -> Result<SeatEdit> {
        let seat_number = self.seat_number.trim();
        if seat_number.is_empty() {
            return Err(LayoutError::InvalidSeatInput(
                "seat number must not be blank".to_string(),
            ));
        }
        let row = positive("row", self.row_number)?;
        let column = positive("column", self.position_x)?;
        if !self.price_multiplier.is_finite() || self.price_multiplier <= 0.0 {
            return Err(LayoutError::InvalidSeatInput(format!(
                "price multiplier must be positive (got {})",
                self.price_multiplier
            )));
        }
        Ok(SeatEdit {
            seat_id: self.seat_id,
            seat_number: seat_number.to_string(),
            position: GridPosition::new(row, column),
            seat_type: self.seat_type,
            seat_class: self.seat_class,
            price_multiplier: self.price_multiplier,
        })
    }
}

fn positive(field: &str, value: i64) -> Result<u32> {
    u32::try_from(value)
        .ok()
        .filter(|v| *v > 0)
        .ok_or_else(|| LayoutError::InvalidSeatInput(format!("{field} must be positive (got {value})")))
}

/// A validated seat edit. Only [`SeatEditForm::validate`] builds one.
#[derive(Clone, Debug, PartialEq)]
pub struct SeatEdit {
    seat_id: SeatId,
    seat_number: String,
    position: GridPosition,
    seat_type: SeatType,
    seat_class: SeatClass,
    price_multiplier: f64,
}

impl SeatEdit {
    /// Seat being edited
    #[must_use]
    pub const fn seat_id(&self) -> SeatId {
        self.seat_id
    }

    /// New display number, trimmed
    #[must_use]
    pub fn seat_number(&self) -> &str {
        &self.seat_number
    }

    /// Target cell
    #[must_use]
    pub const fn position(&self) -> GridPosition {
        self.position
    }

    /// New classification
    #[must_use]
    pub const fn seat_type(&self) -> SeatType {
        self.seat_type
    }

    /// New fare class
    #[must_use]
    pub const fn seat_class(&self) -> SeatClass {
        self.seat_class
    }

    /// New multiplier
    #[must_use]
    pub const fn price_multiplier(&self) -> f64 {
        self.price_multiplier
    }

    /// `seat` with this edit applied, marked customized
    #[must_use]
    pub fn apply(&self, seat: &Seat, now: DateTime<Utc>) -> Seat {
        let mut edited = seat.clone();
        edited.seat_number.clone_from(&self.seat_number);
        edited.row_number = self.position.row;
        edited.position_x = self.position.column;
        edited.position_y = self.position.row;
        edited.seat_type = self.seat_type;
        edited.seat_class = self.seat_class;
        edited.is_premium = self.seat_type == SeatType::Premium;
        edited.is_disabled = self.seat_type == SeatType::Disabled;
        edited.price_multiplier = self.price_multiplier;
        edited.is_customized = true;
        edited.updated_at = now;
        edited
    }
}

/// A destructive or questionable operation awaiting the user's answer
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Confirmation {
    /// Delete the selected seats
    RemoveSelected {
        /// Number of selected seats
        count: usize,
    },
    /// Discard the grid and regenerate the default layout
    ResetToDefault,
    /// Save although active seats differ from the declared capacity
    SaveWithCapacityMismatch {
        /// Active seats in the grid
        active: u32,
        /// Declared capacity
        declared: u32,
    },
}

/// Seat statistics for display
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutSummary {
    /// Declared capacity
    pub capacity: u32,
    /// Seats in the grid
    pub total_seats: u32,
    /// Seats counted against capacity
    pub active_seats: u32,
    /// Premium seats
    pub premium_seats: u32,
    /// Crew seats
    pub crew_seats: u32,
    /// Disabled seats
    pub disabled_seats: u32,
    /// Window seats
    pub window_seats: u32,
    /// Aisle seats
    pub aisle_seats: u32,
    /// Cells without a seat
    pub empty_cells: u32,
}

impl LayoutSummary {
    /// Whether active seats equal the declared capacity
    #[must_use]
    pub const fn matches_capacity(&self) -> bool {
        self.active_seats == self.capacity
    }
}

// ============================================================================
// State
// ============================================================================

/// Metadata of the layout being edited
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutMeta {
    /// Layout id, stable for the session
    pub id: LayoutId,
    /// Current label
    pub name: String,
    /// Whether the layout is the vessel's active one
    pub is_active: bool,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last save time
    pub updated_at: DateTime<Utc>,
}

/// State of one editing session
#[derive(Clone, Debug)]
pub struct EditorState {
    /// Vessel being edited
    pub vessel_id: VesselId,
    /// Vessel category
    pub vessel_type: VesselType,
    /// Declared seating capacity
    pub capacity: u32,
    /// Layout metadata
    pub meta: LayoutMeta,
    /// Grid shape and zones
    pub config: LayoutConfig,
    /// Cells and seats
    pub grid: GridModel,
    /// Tap interpretation
    pub mode: EditorMode,
    /// Seats selected in arrange mode
    pub selection: BTreeSet<SeatId>,
    /// Seat currently open in the seat-edit form
    pub editing: Option<SeatEditRequest>,
    /// Operation awaiting confirmation
    pub pending_confirmation: Option<Confirmation>,
    /// Most recent user-facing error
    pub alert: Option<LayoutError>,
    /// A save is in flight
    pub saving: bool,
    /// Result of the most recent reconciliation
    pub last_reconcile: Option<ReconcileOutcome>,
    /// Debounce and dedup bookkeeping
    pub notifier: ChangeNotifier,
}

impl EditorState {
    /// Build the state for a new session.
    ///
    /// With a saved layout the grid is rebuilt from it without
    /// reconciliation, and the notifier is seeded so an unchanged layout is
    /// never re-emitted. Without one the default layout is generated and
    /// filled to capacity.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::MalformedLayoutData`] if the saved layout data
    /// is invalid.
    pub fn open(input: SessionInput, env: &EditorEnvironment) -> Result<Self> {
        let now = env.clock.now();
        let pricing = env.settings.pricing();
        let SessionInput {
            vessel_id,
            seating_capacity,
            vessel_type,
            initial_layout,
            initial_seats,
        } = input;

        let foreign = initial_seats.iter().filter(|s| s.vessel_id != vessel_id).count();
        if foreign > 0 {
            tracing::warn!(%vessel_id, foreign, "Ignoring seats that belong to another vessel");
        }
        let seats = initial_seats.iter().filter(|s| s.vessel_id == vessel_id);

        if let Some(layout) = initial_layout {
            let config = layout.layout_data.into_config()?;
            let grid = GridModel::regenerate(&config, seats, pricing);
            let mut state = Self::assemble(
                vessel_id,
                vessel_type,
                seating_capacity,
                LayoutMeta {
                    id: layout.id,
                    name: layout.layout_name,
                    is_active: layout.is_active,
                    created_at: layout.created_at,
                    updated_at: layout.updated_at,
                },
                config,
                grid,
            );
            state.notifier = ChangeNotifier::seeded(fingerprint(&state.layout_data(), &state.seats()));
            tracing::debug!(
                %vessel_id,
                rows = state.config.rows,
                columns = state.config.columns,
                seats = state.grid.seat_count(),
                "Opened saved layout"
            );
            return Ok(state);
        }

        let mut config = default_config(seating_capacity, vessel_type);
        let mut grid = GridModel::regenerate(&config, seats, pricing);
        let factory = SeatFactory {
            vessel_id,
            ids: env.ids.as_ref(),
            pricing,
            now,
        };
        let outcome = reconcile(&mut config, &mut grid, seating_capacity, GrowthPolicy::Grow, &factory);
        let name = env
            .settings
            .layout_name(config.rows, config.columns, grid.active_seat_count());
        let mut state = Self::assemble(
            vessel_id,
            vessel_type,
            seating_capacity,
            LayoutMeta {
                id: LayoutId::new(),
                name,
                is_active: true,
                created_at: now,
                updated_at: now,
            },
            config,
            grid,
        );
        state.last_reconcile = Some(outcome);
        tracing::debug!(
            %vessel_id,
            rows = state.config.rows,
            columns = state.config.columns,
            seats = state.grid.seat_count(),
            "Generated default layout"
        );
        Ok(state)
    }

    fn assemble(
        vessel_id: VesselId,
        vessel_type: VesselType,
        capacity: u32,
        meta: LayoutMeta,
        config: LayoutConfig,
        grid: GridModel,
    ) -> Self {
        Self {
            vessel_id,
            vessel_type,
            capacity,
            meta,
            config,
            grid,
            mode: EditorMode::default(),
            selection: BTreeSet::new(),
            editing: None,
            pending_confirmation: None,
            alert: None,
            saving: false,
            last_reconcile: None,
            notifier: ChangeNotifier::default(),
        }
    }

    /// Persisted `layout_data` for the current grid
    #[must_use]
    pub fn layout_data(&self) -> LayoutData {
        LayoutData::new(
            &self.config,
            u32::try_from(self.grid.seat_count()).unwrap_or(u32::MAX),
        )
    }

    /// Layout envelope for the current grid
    #[must_use]
    pub fn layout(&self) -> SeatLayout {
        SeatLayout {
            id: self.meta.id,
            vessel_id: self.vessel_id,
            layout_name: self.meta.name.clone(),
            layout_data: self.layout_data(),
            is_active: self.meta.is_active,
            created_at: self.meta.created_at,
            updated_at: self.meta.updated_at,
        }
    }

    /// Seats in row-major order, tagged with this layout's id
    #[must_use]
    pub fn seats(&self) -> Vec<Seat> {
        self.grid
            .seats()
            .map(|seat| Seat {
                layout_id: Some(self.meta.id),
                ..seat.clone()
            })
            .collect()
    }

    /// Seats counted against capacity
    #[must_use]
    pub fn active_seat_count(&self) -> u32 {
        self.grid.active_seat_count()
    }

    /// Whether another seat may be activated
    #[must_use]
    pub fn has_room(&self) -> bool {
        self.active_seat_count() < self.capacity
    }

    /// Seat statistics
    #[must_use]
    pub fn summary(&self) -> LayoutSummary {
        let count = |pred: fn(&Seat) -> bool| {
            u32::try_from(self.grid.seats().filter(|s| pred(s)).count()).unwrap_or(u32::MAX)
        };
        LayoutSummary {
            capacity: self.capacity,
            total_seats: count(|_| true),
            active_seats: self.active_seat_count(),
            premium_seats: count(|s| s.is_premium),
            crew_seats: count(|s| s.seat_type == SeatType::Crew),
            disabled_seats: count(|s| s.is_disabled || s.seat_type == SeatType::Disabled),
            window_seats: count(|s| s.is_window),
            aisle_seats: count(|s| s.is_aisle),
            empty_cells: u32::try_from(self.grid.empty_cells().count()).unwrap_or(u32::MAX),
        }
    }
}
