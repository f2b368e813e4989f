//! Reducer for the layout editor.
//!
//! All grid mutations are synchronous; every one of them bumps the notifier
//! revision and (re)schedules the debounced flush under [`NOTIFY_EFFECT`].
//! The only other effects are the host callbacks.

use super::actions::EditorAction;
use super::environment::EditorEnvironment;
use super::types::{Confirmation, EditorMode, EditorState, SeatEdit, SeatEditRequest};
use crate::error::{LayoutError, Result};
use crate::layout::{
    default_config, reconcile, sync_override, synthesize, GridModel, GrowthPolicy, LayoutConfig,
    SeatFactory, SeatOverride,
};
use crate::notifier::{fingerprint, NOTIFY_EFFECT};
use crate::types::{GridPosition, SeatId, SeatType, VesselId};
use ferry_seating_core::{async_effect, debounce, effect::Effect, reducer::Reducer, smallvec, SmallVec};
use std::sync::Arc;

type Effects = SmallVec<[Effect<EditorAction>; 4]>;

/// Reducer for a seat layout editing session
#[derive(Clone, Copy, Debug, Default)]
pub struct LayoutEditorReducer;

impl LayoutEditorReducer {
    /// Creates a new `LayoutEditorReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn factory(env: &EditorEnvironment, vessel_id: VesselId) -> SeatFactory<'_> {
        SeatFactory {
            vessel_id,
            ids: env.ids.as_ref(),
            pricing: env.settings.pricing(),
            now: env.clock.now(),
        }
    }

    /// Record a mutation and (re)schedule the change notification
    fn changed(state: &mut EditorState, env: &EditorEnvironment) -> Effects {
        let revision = state.notifier.touch();
        smallvec![debounce! {
            id: NOTIFY_EFFECT,
            duration: env.settings.notify_debounce(),
            action: EditorAction::FlushChanges { revision }
        }]
    }

    fn reject(state: &mut EditorState, error: LayoutError) -> Effects {
        tracing::warn!(error = %error, "Rejected layout operation");
        state.alert = Some(error);
        SmallVec::new()
    }

    /// Drop selection entries and the open edit for seats no longer in the grid
    fn forget_missing(state: &mut EditorState) {
        let grid = &state.grid;
        state.selection.retain(|id| grid.find(*id).is_some());
        if state
            .editing
            .as_ref()
            .is_some_and(|request| grid.find(request.seat.id).is_none())
        {
            state.editing = None;
        }
    }

    // ========================================================================
    // Interaction
    // ========================================================================

    fn set_mode(state: &mut EditorState, mode: EditorMode) -> Effects {
        if state.mode == mode {
            return SmallVec::new();
        }
        match state.mode {
            EditorMode::Arrange => state.selection.clear(),
            EditorMode::Edit => state.editing = None,
            EditorMode::View => {},
        }
        tracing::debug!(from = ?state.mode, to = ?mode, "Editor mode changed");
        state.mode = mode;
        SmallVec::new()
    }

    fn tap(state: &mut EditorState, position: GridPosition, env: &EditorEnvironment) -> Effects {
        if !state.grid.contains(position) {
            tracing::warn!(%position, "Tap outside the grid ignored");
            return SmallVec::new();
        }

        match state.mode {
            EditorMode::View => SmallVec::new(),
            EditorMode::Edit => {
                if let Some(seat) = state.grid.seat_at(position) {
                    state.editing = Some(SeatEditRequest { seat: seat.clone() });
                    return SmallVec::new();
                }
                let seat = Self::factory(env, state.vessel_id).create(position, &state.config);
                // Seats born disabled or crew do not count against capacity
                if seat.is_active() && !state.has_room() {
                    let capacity = state.capacity;
                    return Self::reject(state, LayoutError::CapacityReached { capacity });
                }
                if let Err(error) = state.grid.place(seat) {
                    return Self::reject(state, error);
                }
                tracing::debug!(%position, "Seat created");
                Self::changed(state, env)
            },
            EditorMode::Arrange => {
                if let Some(id) = state.grid.seat_at(position).map(|seat| seat.id) {
                    if !state.selection.remove(&id) {
                        state.selection.insert(id);
                    }
                }
                SmallVec::new()
            },
        }
    }

    fn request_remove_selected(state: &mut EditorState) -> Effects {
        if !state.selection.is_empty() {
            state.pending_confirmation = Some(Confirmation::RemoveSelected {
                count: state.selection.len(),
            });
        }
        SmallVec::new()
    }

    fn remove_selected(state: &mut EditorState, env: &EditorEnvironment) -> Effects {
        let selected = std::mem::take(&mut state.selection);
        let removed = selected
            .into_iter()
            .filter(|id| state.grid.remove(*id).is_some())
            .count();
        Self::forget_missing(state);
        tracing::debug!(removed, "Removed selected seats");
        Self::changed(state, env)
    }

    // ========================================================================
    // Seat-edit form
    // ========================================================================

    fn submit_edit(state: &mut EditorState, edit: &SeatEdit, env: &EditorEnvironment) -> Effects {
        match Self::apply_edit(state, edit, env) {
            Ok(()) => {
                state.editing = None;
                tracing::debug!(seat_id = %edit.seat_id(), position = %edit.position(), "Seat edited");
                Self::changed(state, env)
            },
            Err(error) => Self::reject(state, error),
        }
    }

    fn apply_edit(state: &mut EditorState, edit: &SeatEdit, env: &EditorEnvironment) -> Result<()> {
        let current = state
            .grid
            .find(edit.seat_id())
            .cloned()
            .ok_or_else(|| LayoutError::UnknownSeat(edit.seat_id().to_string()))?;

        let target = edit.position();
        if !state.grid.contains(target) {
            return Err(LayoutError::InvalidSeatInput(format!(
                "{target} is outside the {}x{} layout",
                state.config.rows, state.config.columns
            )));
        }
        if state.grid.seat_at(target).is_some_and(|occupant| occupant.id != current.id) {
            return Err(LayoutError::CellOccupied {
                row: target.row,
                column: target.column,
            });
        }
        let number = edit.seat_number();
        if state.grid.seats().any(|seat| seat.id != current.id && seat.seat_number == number) {
            return Err(LayoutError::InvalidSeatInput(format!(
                "seat number {number} is already in use"
            )));
        }

        let edited = edit.apply(&current, env.clock.now());
        if !current.is_active() && edited.is_active() && !state.has_room() {
            return Err(LayoutError::CapacityReached {
                capacity: state.capacity,
            });
        }

        if current.seat_number != edited.seat_number {
            state.config.set_override(&current.seat_number, None);
        }
        let seat_override = match edited.seat_type {
            SeatType::Disabled => Some(SeatOverride::Disabled),
            SeatType::Crew => Some(SeatOverride::Crew),
            SeatType::Standard | SeatType::Premium => None,
        };
        state.config.set_override(&edited.seat_number, seat_override);

        let pricing = env.settings.pricing();
        state.grid.remove(current.id);
        state.grid.place(synthesize(&edited, target, &state.config, pricing))?;
        state.grid.refresh(&state.config, pricing);
        Ok(())
    }

    fn delete_seat(state: &mut EditorState, seat_id: SeatId, env: &EditorEnvironment) -> Effects {
        if state.grid.remove(seat_id).is_none() {
            return Self::reject(state, LayoutError::UnknownSeat(seat_id.to_string()));
        }
        state.editing = None;
        Self::forget_missing(state);
        tracing::debug!(%seat_id, "Seat deleted");
        Self::changed(state, env)
    }

    // ========================================================================
    // Shape and zones
    // ========================================================================

    fn resize(state: &mut EditorState, rows: u32, columns: u32, env: &EditorEnvironment) -> Effects {
        if (rows, columns) == (state.config.rows, state.config.columns) {
            return SmallVec::new();
        }
        if let Err(error) = state.config.resize(rows, columns) {
            return Self::reject(state, error);
        }
        state.grid.refresh(&state.config, env.settings.pricing());

        if state.active_seat_count() != state.capacity {
            let factory = Self::factory(env, state.vessel_id);
            let outcome = reconcile(
                &mut state.config,
                &mut state.grid,
                state.capacity,
                GrowthPolicy::FillOnly,
                &factory,
            );
            state.last_reconcile = Some(outcome);
        }
        Self::forget_missing(state);
        tracing::debug!(rows, columns, "Layout resized");
        Self::changed(state, env)
    }

    /// Apply a config change and re-synthesize every seat
    fn reshape<F>(state: &mut EditorState, env: &EditorEnvironment, change: F) -> Effects
    where
        F: FnOnce(&mut LayoutConfig) -> Result<bool>,
    {
        match change(&mut state.config) {
            Ok(_) => {
                state.grid.refresh(&state.config, env.settings.pricing());
                Self::changed(state, env)
            },
            Err(error) => Self::reject(state, error),
        }
    }

    /// Flip a per-number override. Customized seats carrying the number are
    /// retyped too. Nothing changes if the flip would reactivate a seat
    /// beyond the declared capacity.
    fn toggle_override(
        state: &mut EditorState,
        seat_number: &str,
        kind: SeatOverride,
        env: &EditorEnvironment,
    ) -> Effects {
        let pricing = env.settings.pricing();
        let mut config = state.config.clone();
        let enabled = match kind {
            SeatOverride::Disabled => config.toggle_disabled_seat(seat_number),
            SeatOverride::Crew => config.toggle_crew_seat(seat_number),
        };

        let mut grid = state.grid.clone();
        let customized: Vec<_> = grid
            .seats()
            .filter(|seat| seat.is_customized && seat.seat_number == seat_number)
            .map(|seat| seat.id)
            .collect();
        for id in customized {
            if let Some(seat) = grid.remove(id) {
                if let Err(error) = grid.place(sync_override(&seat, &config)) {
                    return Self::reject(state, error);
                }
            }
        }
        grid.refresh(&config, pricing);

        let (before, after) = (state.active_seat_count(), grid.active_seat_count());
        if after > before && after > state.capacity {
            let capacity = state.capacity;
            return Self::reject(state, LayoutError::CapacityReached { capacity });
        }

        state.config = config;
        state.grid = grid;
        tracing::debug!(seat_number, ?kind, enabled, "Seat override toggled");
        Self::changed(state, env)
    }

    fn reconcile_capacity(state: &mut EditorState, capacity: u32, env: &EditorEnvironment) -> Effects {
        tracing::debug!(from = state.capacity, to = capacity, "Declared capacity changed");
        state.capacity = capacity;
        let factory = Self::factory(env, state.vessel_id);
        let outcome = reconcile(
            &mut state.config,
            &mut state.grid,
            capacity,
            GrowthPolicy::Grow,
            &factory,
        );
        state.last_reconcile = Some(outcome);
        Self::forget_missing(state);
        Self::changed(state, env)
    }

    fn reset(state: &mut EditorState, env: &EditorEnvironment) -> Effects {
        state.config = default_config(state.capacity, state.vessel_type);
        state.grid = GridModel::empty(&state.config);
        let factory = Self::factory(env, state.vessel_id);
        let outcome = reconcile(
            &mut state.config,
            &mut state.grid,
            state.capacity,
            GrowthPolicy::Grow,
            &factory,
        );
        state.last_reconcile = Some(outcome);
        state.selection.clear();
        state.editing = None;
        tracing::info!(
            rows = state.config.rows,
            columns = state.config.columns,
            "Layout reset to default"
        );
        Self::changed(state, env)
    }

    // ========================================================================
    // Persistence and notification
    // ========================================================================

    fn save(state: &mut EditorState, env: &EditorEnvironment) -> Effects {
        if state.saving {
            tracing::debug!("Save already in flight, ignoring");
            return SmallVec::new();
        }
        let active = state.active_seat_count();
        if active != state.capacity {
            tracing::warn!(active, declared = state.capacity, "Saving with capacity mismatch needs confirmation");
            state.pending_confirmation = Some(Confirmation::SaveWithCapacityMismatch {
                active,
                declared: state.capacity,
            });
            return SmallVec::new();
        }
        Self::begin_save(state, env)
    }

    fn begin_save(state: &mut EditorState, env: &EditorEnvironment) -> Effects {
        if state.saving {
            return SmallVec::new();
        }
        state.saving = true;

        let saved_at = env.clock.now();
        let layout_name =
            env.settings
                .layout_name(state.config.rows, state.config.columns, state.active_seat_count());
        let mut layout = state.layout();
        layout.layout_name.clone_from(&layout_name);
        layout.updated_at = saved_at;
        let seats = state.seats();
        let sink = Arc::clone(&env.sink);

        tracing::info!(layout_id = %layout.id, seats = seats.len(), "Saving seat layout");

        smallvec![async_effect! {
            match sink.save(layout, seats).await {
                Ok(()) => Some(EditorAction::SaveSucceeded { layout_name, saved_at }),
                Err(error) => Some(EditorAction::SaveFailed {
                    error: LayoutError::SaveFailed(error.to_string()),
                }),
            }
        }]
    }

    fn flush(state: &mut EditorState, revision: u64, env: &EditorEnvironment) -> Effects {
        if state.notifier.is_stale(revision) {
            tracing::trace!(revision, latest = state.notifier.revision(), "Stale flush ignored");
            return SmallVec::new();
        }
        let layout = state.layout();
        let seats = state.seats();
        if !state.notifier.should_emit(fingerprint(&layout.layout_data, &seats)) {
            tracing::debug!(revision, "Layout unchanged, notification suppressed");
            return SmallVec::new();
        }

        tracing::debug!(revision, seats = seats.len(), "Emitting layout change");
        let sink = Arc::clone(&env.sink);
        smallvec![async_effect! {
            sink.on_change(layout, seats);
            None
        }]
    }
}

impl Reducer for LayoutEditorReducer {
    type State = EditorState;
    type Action = EditorAction;
    type Environment = EditorEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            EditorAction::SessionStarted => Self::changed(state, env),
            EditorAction::CapacityChanged { capacity } => Self::reconcile_capacity(state, capacity, env),

            EditorAction::SetMode(mode) => Self::set_mode(state, mode),
            EditorAction::CellTapped(position) => Self::tap(state, position, env),
            EditorAction::ClearSelection => {
                state.selection.clear();
                SmallVec::new()
            },
            EditorAction::SelectAll => {
                state.selection = state.grid.seats().map(|seat| seat.id).collect();
                SmallVec::new()
            },
            EditorAction::RemoveSelected => Self::request_remove_selected(state),

            EditorAction::SeatEditSubmitted(edit) => Self::submit_edit(state, &edit, env),
            EditorAction::SeatDeleteRequested { seat_id } => Self::delete_seat(state, seat_id, env),
            EditorAction::SeatEditDismissed => {
                state.editing = None;
                SmallVec::new()
            },

            EditorAction::Resize { rows, columns } => Self::resize(state, rows, columns, env),
            EditorAction::SetRows { rows } => {
                let columns = state.config.columns;
                Self::resize(state, rows, columns, env)
            },
            EditorAction::SetColumns { columns } => {
                let rows = state.config.rows;
                Self::resize(state, rows, columns, env)
            },
            EditorAction::ToggleAisle { column } => {
                Self::reshape(state, env, |config| config.toggle_aisle(column))
            },
            EditorAction::ToggleRowAisle { row } => {
                Self::reshape(state, env, |config| config.toggle_row_aisle(row))
            },
            EditorAction::TogglePremiumRow { row } => {
                Self::reshape(state, env, |config| config.toggle_premium_row(row))
            },
            EditorAction::ToggleDisabledSeat { seat_number } => {
                Self::toggle_override(state, &seat_number, SeatOverride::Disabled, env)
            },
            EditorAction::ToggleCrewSeat { seat_number } => {
                Self::toggle_override(state, &seat_number, SeatOverride::Crew, env)
            },
            EditorAction::ResetToDefault => {
                state.pending_confirmation = Some(Confirmation::ResetToDefault);
                SmallVec::new()
            },

            EditorAction::Confirm => match state.pending_confirmation.take() {
                Some(Confirmation::RemoveSelected { .. }) => Self::remove_selected(state, env),
                Some(Confirmation::ResetToDefault) => Self::reset(state, env),
                Some(Confirmation::SaveWithCapacityMismatch { .. }) => Self::begin_save(state, env),
                None => SmallVec::new(),
            },
            EditorAction::Dismiss => {
                state.pending_confirmation = None;
                SmallVec::new()
            },
            EditorAction::DismissAlert => {
                state.alert = None;
                SmallVec::new()
            },

            EditorAction::Save => Self::save(state, env),
            EditorAction::SaveSucceeded {
                layout_name,
                saved_at,
            } => {
                state.saving = false;
                state.meta.name = layout_name;
                state.meta.updated_at = saved_at;
                tracing::info!(layout_id = %state.meta.id, name = %state.meta.name, "Seat layout saved");
                SmallVec::new()
            },
            EditorAction::SaveFailed { error } => {
                state.saving = false;
                tracing::error!(error = %error, "Seat layout save failed");
                state.alert = Some(error);
                SmallVec::new()
            },

            EditorAction::FlushChanges { revision } => Self::flush(state, revision, env),
        }
    }
}
