//! Reducer tests for the layout editor.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]

use super::*;
use crate::error::LayoutError;
use crate::layout::{LayoutData, SeatOverride, MAX_ROWS};
use crate::mocks::{RecordingSink, SequentialSeatIds};
use crate::notifier::NOTIFY_EFFECT;
use crate::settings::EditorSettings;
use crate::types::{GridPosition, SeatClass, SeatLayout, SeatType, VesselId, VesselType};
use ferry_seating_core::environment::Clock;
use ferry_seating_testing::{assertions, test_clock, ReducerTest};
use std::collections::BTreeSet;
use std::sync::Arc;

fn test_env() -> EditorEnvironment {
    EditorEnvironment::new(
        Arc::new(test_clock()),
        Arc::new(SequentialSeatIds::new()),
        Arc::new(RecordingSink::new()),
        EditorSettings::default(),
    )
}

fn open(capacity: u32, vessel_type: VesselType) -> EditorState {
    EditorState::open(
        SessionInput::new(VesselId::new(), capacity, vessel_type),
        &test_env(),
    )
    .unwrap()
}

/// 19 seats on a 5x4 grid, cell (5, 4) empty
fn nearly_full() -> EditorState {
    let state = open(19, VesselType::Standard);
    assert_eq!((state.config.rows, state.config.columns), (5, 4));
    assert!(state.grid.seat_at(GridPosition::new(5, 4)).is_none());
    state
}

fn in_mode(mut state: EditorState, mode: EditorMode) -> EditorState {
    state.mode = mode;
    state
}

fn seat_id_at(state: &EditorState, row: u32, column: u32) -> crate::types::SeatId {
    state.grid.seat_at(GridPosition::new(row, column)).unwrap().id
}

// ============================================================================
// Session open
// ============================================================================

#[test]
fn test_open_generates_default_layout_at_capacity() {
    let state = open(40, VesselType::Luxury);
    assert_eq!(state.active_seat_count(), 40);
    assert_eq!(state.config.premium_rows, BTreeSet::from([1, 2, 3]));
    assert_eq!(state.mode, EditorMode::View);
    assert!(state.alert.is_none());
}

#[test]
fn test_open_saved_layout_respects_manual_deletions() {
    let fresh = open(20, VesselType::Standard);
    let mut seats = fresh.seats();
    seats.truncate(15);
    let layout = fresh.layout();

    let state = EditorState::open(
        SessionInput::new(fresh.vessel_id, 20, VesselType::Standard).with_saved(layout.clone(), seats),
        &test_env(),
    )
    .unwrap();

    assert_eq!(state.active_seat_count(), 15);
    assert_eq!(state.meta.id, layout.id);
    assert_eq!(state.config, fresh.config);
}

#[test]
fn test_open_rejects_malformed_layout_data() {
    let fresh = open(20, VesselType::Standard);
    let mut layout = fresh.layout();
    layout.layout_data = LayoutData::new(&fresh.config, 0);
    layout.layout_data.config.rows = MAX_ROWS + 1;

    let result = EditorState::open(
        SessionInput::new(fresh.vessel_id, 20, VesselType::Standard).with_saved(layout, Vec::new()),
        &test_env(),
    );
    assert!(matches!(result, Err(LayoutError::MalformedLayoutData(_))));
}

#[test]
fn test_saved_layout_is_not_re_emitted() {
    let fresh = open(12, VesselType::Mixed);
    let input = SessionInput::new(fresh.vessel_id, 12, VesselType::Mixed)
        .with_saved(fresh.layout(), fresh.seats());
    let state = EditorState::open(input, &test_env()).unwrap();

    ReducerTest::new(LayoutEditorReducer::new())
        .with_env(test_env())
        .given_state(state)
        .when_action(EditorAction::SessionStarted)
        .when_action(EditorAction::FlushChanges { revision: 1 })
        .then_effects(|effects| assertions::assert_no_effects(effects))
        .run();
}

#[test]
fn test_fresh_layout_is_emitted_once() {
    ReducerTest::new(LayoutEditorReducer::new())
        .with_env(test_env())
        .given_state(open(12, VesselType::Mixed))
        .when_action(EditorAction::SessionStarted)
        .when_action(EditorAction::FlushChanges { revision: 1 })
        .then_effects(|effects| {
            assertions::assert_effects_count(effects, 1);
            assertions::assert_has_future_effect(effects);
        })
        .run();
}

// ============================================================================
// Modes and taps
// ============================================================================

#[test]
fn test_view_mode_taps_are_no_ops() {
    let state = nearly_full();
    let before = state.grid.clone();

    ReducerTest::new(LayoutEditorReducer::new())
        .with_env(test_env())
        .given_state(state)
        .when_action(EditorAction::CellTapped(GridPosition::new(5, 4)))
        .then_state(move |state| {
            assert_eq!(state.grid, before);
            assert!(state.editing.is_none());
        })
        .then_effects(|effects| assertions::assert_no_effects(effects))
        .run();
}

#[test]
fn test_edit_tap_on_empty_cell_at_capacity_is_rejected() {
    let mut state = in_mode(nearly_full(), EditorMode::Edit);
    state.capacity = 19;
    let before = state.grid.clone();

    ReducerTest::new(LayoutEditorReducer::new())
        .with_env(test_env())
        .given_state(state)
        .when_action(EditorAction::CellTapped(GridPosition::new(5, 4)))
        .then_state(move |state| {
            assert_eq!(state.grid, before);
            assert_eq!(state.alert, Some(LayoutError::CapacityReached { capacity: 19 }));
        })
        .then_effects(|effects| assertions::assert_no_effects(effects))
        .run();
}

#[test]
fn test_edit_tap_at_capacity_creates_seat_born_disabled() {
    let mut state = in_mode(nearly_full(), EditorMode::Edit);
    state.config.set_override("D5", Some(SeatOverride::Disabled));

    ReducerTest::new(LayoutEditorReducer::new())
        .with_env(test_env())
        .given_state(state)
        .when_action(EditorAction::CellTapped(GridPosition::new(5, 4)))
        .then_state(|state| {
            let seat = state.grid.seat_at(GridPosition::new(5, 4)).unwrap();
            assert_eq!(seat.seat_type, SeatType::Disabled);
            assert!(seat.is_disabled);
            assert_eq!(state.active_seat_count(), 19);
            assert!(state.alert.is_none());
        })
        .then_effects(|effects| assertions::assert_has_debounce(effects, NOTIFY_EFFECT))
        .run();
}

#[test]
fn test_edit_tap_on_empty_cell_creates_seat() {
    let mut state = in_mode(nearly_full(), EditorMode::Edit);
    state.capacity = 20;

    ReducerTest::new(LayoutEditorReducer::new())
        .with_env(test_env())
        .given_state(state)
        .when_action(EditorAction::CellTapped(GridPosition::new(5, 4)))
        .then_state(|state| {
            let seat = state.grid.seat_at(GridPosition::new(5, 4)).unwrap();
            assert_eq!(seat.seat_number, "D5");
            assert!(seat.is_window);
            assert_eq!(seat.created_at, test_clock().now());
            assert_eq!(state.active_seat_count(), 20);
        })
        .then_effects(|effects| {
            assertions::assert_effects_count(effects, 1);
            assertions::assert_has_debounce(effects, NOTIFY_EFFECT);
        })
        .run();
}

#[test]
fn test_edit_tap_on_seat_opens_form() {
    let state = in_mode(nearly_full(), EditorMode::Edit);
    let expected = seat_id_at(&state, 2, 3);

    ReducerTest::new(LayoutEditorReducer::new())
        .with_env(test_env())
        .given_state(state)
        .when_action(EditorAction::CellTapped(GridPosition::new(2, 3)))
        .then_state(move |state| {
            let request = state.editing.as_ref().unwrap();
            assert_eq!(request.seat.id, expected);
            assert_eq!(request.form().seat_number, "C2");
        })
        .then_effects(|effects| assertions::assert_no_effects(effects))
        .run();
}

#[test]
fn test_leaving_arrange_mode_clears_selection() {
    ReducerTest::new(LayoutEditorReducer::new())
        .with_env(test_env())
        .given_state(in_mode(nearly_full(), EditorMode::Arrange))
        .when_action(EditorAction::CellTapped(GridPosition::new(1, 1)))
        .when_action(EditorAction::SetMode(EditorMode::Edit))
        .then_state(|state| {
            assert_eq!(state.mode, EditorMode::Edit);
            assert!(state.selection.is_empty());
        })
        .run();
}

// ============================================================================
// Arrange mode
// ============================================================================

#[test]
fn test_arrange_taps_toggle_selection() {
    let state = in_mode(nearly_full(), EditorMode::Arrange);
    let kept = seat_id_at(&state, 1, 2);

    ReducerTest::new(LayoutEditorReducer::new())
        .with_env(test_env())
        .given_state(state)
        .when_action(EditorAction::CellTapped(GridPosition::new(1, 1)))
        .when_action(EditorAction::CellTapped(GridPosition::new(1, 2)))
        .when_action(EditorAction::CellTapped(GridPosition::new(1, 1)))
        .when_action(EditorAction::CellTapped(GridPosition::new(5, 4)))
        .then_state(move |state| {
            assert_eq!(state.selection, BTreeSet::from([kept]));
        })
        .then_effects(|effects| assertions::assert_no_effects(effects))
        .run();
}

#[test]
fn test_bulk_remove_requires_confirmation() {
    ReducerTest::new(LayoutEditorReducer::new())
        .with_env(test_env())
        .given_state(in_mode(nearly_full(), EditorMode::Arrange))
        .when_action(EditorAction::CellTapped(GridPosition::new(1, 1)))
        .when_action(EditorAction::CellTapped(GridPosition::new(2, 2)))
        .when_action(EditorAction::RemoveSelected)
        .then_state(|state| {
            assert_eq!(
                state.pending_confirmation,
                Some(Confirmation::RemoveSelected { count: 2 })
            );
            assert_eq!(state.active_seat_count(), 19);
        })
        .then_effects(|effects| assertions::assert_no_effects(effects))
        .run();
}

#[test]
fn test_confirmed_bulk_remove_clears_cells() {
    ReducerTest::new(LayoutEditorReducer::new())
        .with_env(test_env())
        .given_state(in_mode(nearly_full(), EditorMode::Arrange))
        .when_action(EditorAction::CellTapped(GridPosition::new(1, 1)))
        .when_action(EditorAction::CellTapped(GridPosition::new(2, 2)))
        .when_action(EditorAction::RemoveSelected)
        .when_action(EditorAction::Confirm)
        .then_state(|state| {
            assert!(state.pending_confirmation.is_none());
            assert!(state.selection.is_empty());
            assert!(state.grid.seat_at(GridPosition::new(1, 1)).is_none());
            assert!(state.grid.seat_at(GridPosition::new(2, 2)).is_none());
            assert_eq!(state.active_seat_count(), 17);
        })
        .then_effects(|effects| assertions::assert_has_debounce(effects, NOTIFY_EFFECT))
        .run();
}

#[test]
fn test_dismissed_bulk_remove_keeps_seats() {
    ReducerTest::new(LayoutEditorReducer::new())
        .with_env(test_env())
        .given_state(in_mode(nearly_full(), EditorMode::Arrange))
        .when_action(EditorAction::SelectAll)
        .when_action(EditorAction::RemoveSelected)
        .when_action(EditorAction::Dismiss)
        .then_state(|state| {
            assert!(state.pending_confirmation.is_none());
            assert_eq!(state.selection.len(), 19);
            assert_eq!(state.active_seat_count(), 19);
        })
        .run();
}

// ============================================================================
// Seat-edit form
// ============================================================================

fn edit_of(state: &EditorState, row: u32, column: u32, change: impl FnOnce(&mut SeatEditForm)) -> SeatEdit {
    let mut form = SeatEditForm::from_seat(state.grid.seat_at(GridPosition::new(row, column)).unwrap());
    change(&mut form);
    form.validate().unwrap()
}

#[test]
fn test_manual_disable_survives_unrelated_config_change() {
    let state = nearly_full();
    let edit = edit_of(&state, 2, 2, |form| form.seat_type = SeatType::Disabled);

    ReducerTest::new(LayoutEditorReducer::new())
        .with_env(test_env())
        .given_state(state)
        .when_action(EditorAction::SeatEditSubmitted(edit))
        .when_action(EditorAction::ToggleAisle { column: 4 })
        .then_state(|state| {
            let seat = state.grid.seat_at(GridPosition::new(2, 2)).unwrap();
            assert_eq!(seat.seat_type, SeatType::Disabled);
            assert!(seat.is_disabled);
            assert!(seat.is_customized);
            assert!(state.config.disabled_seats.contains("B2"));
            assert_eq!(state.active_seat_count(), 18);
            assert!(state.editing.is_none());
        })
        .then_effects(|effects| assertions::assert_has_debounce(effects, NOTIFY_EFFECT))
        .run();
}

#[test]
fn test_edit_moves_seat_to_empty_cell() {
    let state = nearly_full();
    let id = seat_id_at(&state, 1, 1);
    let edit = edit_of(&state, 1, 1, |form| {
        form.row_number = 5;
        form.position_x = 4;
        form.seat_number = "VIP".to_string();
    });

    ReducerTest::new(LayoutEditorReducer::new())
        .with_env(test_env())
        .given_state(state)
        .when_action(EditorAction::SeatEditSubmitted(edit))
        .then_state(move |state| {
            assert!(state.grid.seat_at(GridPosition::new(1, 1)).is_none());
            let moved = state.grid.seat_at(GridPosition::new(5, 4)).unwrap();
            assert_eq!(moved.id, id);
            assert_eq!(moved.seat_number, "VIP");
            assert_eq!((moved.row_number, moved.position_x, moved.position_y), (5, 4, 5));
        })
        .run();
}

#[test]
fn test_edit_onto_occupied_cell_is_rejected() {
    let state = nearly_full();
    let before = state.grid.clone();
    let edit = edit_of(&state, 1, 1, |form| form.position_x = 2);

    ReducerTest::new(LayoutEditorReducer::new())
        .with_env(test_env())
        .given_state(state)
        .when_action(EditorAction::SeatEditSubmitted(edit))
        .then_state(move |state| {
            assert_eq!(state.grid, before);
            assert_eq!(state.alert, Some(LayoutError::CellOccupied { row: 1, column: 2 }));
        })
        .then_effects(|effects| assertions::assert_no_effects(effects))
        .run();
}

#[test]
fn test_edit_to_number_held_by_another_seat_is_rejected() {
    let state = nearly_full();
    let before = state.grid.clone();
    let edit = edit_of(&state, 1, 1, |form| {
        form.seat_number = "B1".to_string();
        form.seat_type = SeatType::Disabled;
    });

    ReducerTest::new(LayoutEditorReducer::new())
        .with_env(test_env())
        .given_state(state)
        .when_action(EditorAction::SeatEditSubmitted(edit))
        .then_state(move |state| {
            assert!(matches!(state.alert, Some(LayoutError::InvalidSeatInput(_))));
            assert_eq!(state.grid, before);
            assert!(state.config.disabled_seats.is_empty());
            assert_eq!(state.active_seat_count(), 19);
        })
        .then_effects(|effects| assertions::assert_no_effects(effects))
        .run();
}

#[test]
fn test_edit_outside_grid_is_rejected() {
    let state = nearly_full();
    let edit = edit_of(&state, 1, 1, |form| form.row_number = 9);

    ReducerTest::new(LayoutEditorReducer::new())
        .with_env(test_env())
        .given_state(state)
        .when_action(EditorAction::SeatEditSubmitted(edit))
        .then_state(|state| {
            assert!(matches!(state.alert, Some(LayoutError::InvalidSeatInput(_))));
            assert!(state.grid.seat_at(GridPosition::new(1, 1)).is_some());
        })
        .run();
}

#[test]
fn test_reactivating_seat_at_capacity_is_rejected() {
    let mut state = nearly_full();
    state.config.toggle_disabled_seat("A1");
    state.grid.refresh(&state.config, EditorSettings::default().pricing());
    state.capacity = 18;
    let edit = edit_of(&state, 1, 1, |form| form.seat_type = SeatType::Standard);

    ReducerTest::new(LayoutEditorReducer::new())
        .with_env(test_env())
        .given_state(state)
        .when_action(EditorAction::SeatEditSubmitted(edit))
        .then_state(|state| {
            assert_eq!(state.alert, Some(LayoutError::CapacityReached { capacity: 18 }));
            assert_eq!(state.active_seat_count(), 18);
        })
        .run();
}

#[test]
fn test_delete_from_form() {
    let state = in_mode(nearly_full(), EditorMode::Edit);
    let id = seat_id_at(&state, 3, 3);

    ReducerTest::new(LayoutEditorReducer::new())
        .with_env(test_env())
        .given_state(state)
        .when_action(EditorAction::CellTapped(GridPosition::new(3, 3)))
        .when_action(EditorAction::SeatDeleteRequested { seat_id: id })
        .then_state(move |state| {
            assert!(state.grid.find(id).is_none());
            assert!(state.editing.is_none());
            assert_eq!(state.active_seat_count(), 18);
        })
        .then_effects(|effects| assertions::assert_has_debounce(effects, NOTIFY_EFFECT))
        .run();
}

#[test]
fn test_delete_unknown_seat_alerts() {
    ReducerTest::new(LayoutEditorReducer::new())
        .with_env(test_env())
        .given_state(nearly_full())
        .when_action(EditorAction::SeatDeleteRequested {
            seat_id: crate::types::SeatId::new(),
        })
        .then_state(|state| assert!(matches!(state.alert, Some(LayoutError::UnknownSeat(_)))))
        .run();
}

// ============================================================================
// Shape and zones
// ============================================================================

#[test]
fn test_shrinking_resize_reports_shortfall() {
    ReducerTest::new(LayoutEditorReducer::new())
        .with_env(test_env())
        .given_state(open(20, VesselType::Standard))
        .when_action(EditorAction::SetColumns { columns: 3 })
        .then_state(|state| {
            assert_eq!((state.config.rows, state.config.columns), (5, 3));
            assert_eq!(state.grid.seat_count(), 15);
            let outcome = state.last_reconcile.unwrap();
            assert_eq!(outcome.shortfall, 5);
            assert!(!outcome.grew);
            assert!(state.grid.seats().all(|seat| seat.position_x <= 3));
            assert!(state.grid.seats().filter(|seat| seat.position_x == 3).all(|seat| seat.is_window));
        })
        .then_effects(|effects| assertions::assert_has_debounce(effects, NOTIFY_EFFECT))
        .run();
}

#[test]
fn test_growing_resize_leaves_balanced_grid_alone() {
    ReducerTest::new(LayoutEditorReducer::new())
        .with_env(test_env())
        .given_state(open(20, VesselType::Standard))
        .when_action(EditorAction::SetRows { rows: 6 })
        .then_state(|state| {
            assert_eq!(state.active_seat_count(), 20);
            assert_eq!(state.grid.empty_cells().count(), 4);
        })
        .run();
}

#[test]
fn test_resize_refills_after_manual_deletions() {
    let mut state = open(20, VesselType::Standard);
    let id = seat_id_at(&state, 1, 1);
    state.grid.remove(id);

    ReducerTest::new(LayoutEditorReducer::new())
        .with_env(test_env())
        .given_state(state)
        .when_action(EditorAction::SetRows { rows: 6 })
        .then_state(|state| {
            assert_eq!(state.active_seat_count(), 20);
            assert!(state.grid.seat_at(GridPosition::new(1, 1)).is_some());
            assert_eq!(state.last_reconcile.unwrap().added, 1);
        })
        .run();
}

#[test]
fn test_invalid_resize_is_rejected() {
    let state = open(20, VesselType::Standard);
    let before = state.config.clone();

    ReducerTest::new(LayoutEditorReducer::new())
        .with_env(test_env())
        .given_state(state)
        .when_action(EditorAction::Resize { rows: 0, columns: 30 })
        .then_state(move |state| {
            assert_eq!(state.config, before);
            assert!(matches!(state.alert, Some(LayoutError::InvalidDimensions { .. })));
        })
        .then_effects(|effects| assertions::assert_no_effects(effects))
        .run();
}

#[test]
fn test_aisle_out_of_range_is_rejected() {
    ReducerTest::new(LayoutEditorReducer::new())
        .with_env(test_env())
        .given_state(open(20, VesselType::Standard))
        .when_action(EditorAction::ToggleAisle { column: 1 })
        .then_state(|state| {
            assert!(matches!(
                state.alert,
                Some(LayoutError::ReferenceOutOfRange { kind: "aisle", .. })
            ));
        })
        .then_effects(|effects| assertions::assert_no_effects(effects))
        .run();
}

#[test]
fn test_toggle_aisle_marks_aisle_seats() {
    ReducerTest::new(LayoutEditorReducer::new())
        .with_env(test_env())
        .given_state(open(20, VesselType::Standard))
        .when_action(EditorAction::ToggleAisle { column: 3 })
        .then_state(|state| {
            assert!(state.grid.seats().filter(|s| s.position_x == 3).all(|s| s.is_aisle));
            assert!(state.grid.seats().filter(|s| s.position_x != 3).all(|s| !s.is_aisle));
        })
        .then_effects(|effects| assertions::assert_has_debounce(effects, NOTIFY_EFFECT))
        .run();
}

#[test]
fn test_toggle_premium_row_reclassifies_row() {
    ReducerTest::new(LayoutEditorReducer::new())
        .with_env(test_env())
        .given_state(open(20, VesselType::Standard))
        .when_action(EditorAction::TogglePremiumRow { row: 4 })
        .then_state(|state| {
            for seat in state.grid.seats().filter(|s| s.row_number == 4) {
                assert_eq!(seat.seat_type, SeatType::Premium);
                assert_eq!(seat.price_multiplier, 1.5);
            }
            assert_eq!(state.summary().premium_seats, 8);
        })
        .run();
}

#[test]
fn test_crew_override_removes_seat_from_capacity() {
    ReducerTest::new(LayoutEditorReducer::new())
        .with_env(test_env())
        .given_state(open(20, VesselType::Standard))
        .when_action(EditorAction::ToggleCrewSeat {
            seat_number: "A5".to_string(),
        })
        .then_state(|state| {
            let summary = state.summary();
            assert_eq!(summary.crew_seats, 1);
            assert_eq!(summary.active_seats, 19);
            assert!(!summary.matches_capacity());
        })
        .run();
}

#[test]
fn test_override_toggle_cannot_reactivate_beyond_capacity() {
    let disable_a1 = || EditorAction::ToggleDisabledSeat {
        seat_number: "A1".to_string(),
    };

    ReducerTest::new(LayoutEditorReducer::new())
        .with_env(test_env())
        .given_state(nearly_full())
        .when_action(disable_a1())
        .when_action(EditorAction::SetMode(EditorMode::Edit))
        .when_action(EditorAction::CellTapped(GridPosition::new(5, 4)))
        .when_action(disable_a1())
        .then_state(|state| {
            assert_eq!(state.alert, Some(LayoutError::CapacityReached { capacity: 19 }));
            assert!(state.config.disabled_seats.contains("A1"));
            assert!(state.grid.seat_at(GridPosition::new(1, 1)).unwrap().is_disabled);
            assert!(state.grid.seat_at(GridPosition::new(5, 4)).is_some());
            assert_eq!(state.active_seat_count(), 19);
        })
        .then_effects(|effects| assertions::assert_no_effects(effects))
        .run();
}

#[test]
fn test_override_toggle_retypes_customized_seat() {
    let state = nearly_full();
    let edit = edit_of(&state, 2, 2, |form| form.seat_class = SeatClass::First);
    let disable_b2 = || EditorAction::ToggleDisabledSeat {
        seat_number: "B2".to_string(),
    };

    ReducerTest::new(LayoutEditorReducer::new())
        .with_env(test_env())
        .given_state(state)
        .when_action(EditorAction::SeatEditSubmitted(edit))
        .when_action(disable_b2())
        .then_state(|state| {
            let seat = state.grid.seat_at(GridPosition::new(2, 2)).unwrap();
            assert!(seat.is_customized);
            assert_eq!(seat.seat_type, SeatType::Disabled);
            assert!(seat.is_disabled);
            assert_eq!(seat.seat_class, SeatClass::First);
            assert!(state.config.disabled_seats.contains("B2"));
            assert_eq!(state.active_seat_count(), 18);
        })
        .then_effects(|effects| assertions::assert_has_debounce(effects, NOTIFY_EFFECT))
        .run();

    let state = nearly_full();
    let edit = edit_of(&state, 2, 2, |form| form.seat_class = SeatClass::First);
    ReducerTest::new(LayoutEditorReducer::new())
        .with_env(test_env())
        .given_state(state)
        .when_action(EditorAction::SeatEditSubmitted(edit))
        .when_action(disable_b2())
        .when_action(disable_b2())
        .then_state(|state| {
            let seat = state.grid.seat_at(GridPosition::new(2, 2)).unwrap();
            assert_eq!(seat.seat_type, SeatType::Standard);
            assert!(seat.is_active());
            assert_eq!(seat.seat_class, SeatClass::First);
            assert!(state.config.disabled_seats.is_empty());
            assert_eq!(state.active_seat_count(), 19);
        })
        .run();
}

// ============================================================================
// Capacity reconciliation
// ============================================================================

#[test]
fn test_capacity_increase_grows_grid() {
    ReducerTest::new(LayoutEditorReducer::new())
        .with_env(test_env())
        .given_state(open(20, VesselType::Standard))
        .when_action(EditorAction::CapacityChanged { capacity: 45 })
        .then_state(|state| {
            assert_eq!(state.capacity, 45);
            assert_eq!(state.active_seat_count(), 45);
            assert!(state.last_reconcile.unwrap().grew);
        })
        .then_effects(|effects| assertions::assert_has_debounce(effects, NOTIFY_EFFECT))
        .run();
}

#[test]
fn test_capacity_decrease_keeps_front_seats() {
    let state = in_mode(open(20, VesselType::Standard), EditorMode::Arrange);
    let front = seat_id_at(&state, 1, 1);
    let back = seat_id_at(&state, 5, 4);
    let mut state = state;
    state.selection.insert(back);

    ReducerTest::new(LayoutEditorReducer::new())
        .with_env(test_env())
        .given_state(state)
        .when_action(EditorAction::CapacityChanged { capacity: 12 })
        .then_state(move |state| {
            assert_eq!(state.active_seat_count(), 12);
            assert!(state.grid.find(front).is_some());
            assert!(state.grid.find(back).is_none());
            assert!(state.selection.is_empty());
            assert_eq!(state.last_reconcile.unwrap().removed, 8);
        })
        .run();
}

#[test]
fn test_confirmed_reset_regenerates_default() {
    let mut state = open(20, VesselType::Luxury);
    state.config.toggle_aisle(2).unwrap();
    state.grid = crate::layout::GridModel::empty(&state.config);

    ReducerTest::new(LayoutEditorReducer::new())
        .with_env(test_env())
        .given_state(state)
        .when_action(EditorAction::ResetToDefault)
        .when_action(EditorAction::Confirm)
        .then_state(|state| {
            assert_eq!(state.config, crate::layout::default_config(20, VesselType::Luxury));
            assert_eq!(state.active_seat_count(), 20);
            assert!(state.pending_confirmation.is_none());
        })
        .then_effects(|effects| assertions::assert_has_debounce(effects, NOTIFY_EFFECT))
        .run();
}

// ============================================================================
// Save
// ============================================================================

#[test]
fn test_save_starts_single_request() {
    ReducerTest::new(LayoutEditorReducer::new())
        .with_env(test_env())
        .given_state(open(20, VesselType::Standard))
        .when_action(EditorAction::Save)
        .then_state(|state| assert!(state.saving))
        .then_effects(|effects| {
            assertions::assert_effects_count(effects, 1);
            assertions::assert_has_future_effect(effects);
        })
        .run();
}

#[test]
fn test_save_while_busy_is_ignored() {
    ReducerTest::new(LayoutEditorReducer::new())
        .with_env(test_env())
        .given_state(open(20, VesselType::Standard))
        .when_action(EditorAction::Save)
        .when_action(EditorAction::Save)
        .then_state(|state| assert!(state.saving))
        .then_effects(|effects| assertions::assert_no_effects(effects))
        .run();
}

#[test]
fn test_save_with_mismatch_asks_first() {
    let mut state = open(20, VesselType::Standard);
    state.capacity = 24;

    ReducerTest::new(LayoutEditorReducer::new())
        .with_env(test_env())
        .given_state(state)
        .when_action(EditorAction::Save)
        .then_state(|state| {
            assert!(!state.saving);
            assert_eq!(
                state.pending_confirmation,
                Some(Confirmation::SaveWithCapacityMismatch {
                    active: 20,
                    declared: 24
                })
            );
        })
        .then_effects(|effects| assertions::assert_no_effects(effects))
        .run();
}

#[test]
fn test_confirmed_mismatch_saves() {
    let mut state = open(20, VesselType::Standard);
    state.capacity = 24;

    ReducerTest::new(LayoutEditorReducer::new())
        .with_env(test_env())
        .given_state(state)
        .when_action(EditorAction::Save)
        .when_action(EditorAction::Confirm)
        .then_state(|state| assert!(state.saving))
        .then_effects(|effects| assertions::assert_has_future_effect(effects))
        .run();
}

#[test]
fn test_failed_save_keeps_grid_and_alerts() {
    let state = open(20, VesselType::Standard);
    let before = state.grid.clone();
    let name = state.meta.name.clone();

    ReducerTest::new(LayoutEditorReducer::new())
        .with_env(test_env())
        .given_state(state)
        .when_action(EditorAction::Save)
        .when_action(EditorAction::SaveFailed {
            error: LayoutError::SaveFailed("timeout".to_string()),
        })
        .then_state(move |state| {
            assert!(!state.saving);
            assert_eq!(state.grid, before);
            assert_eq!(state.meta.name, name);
            assert_eq!(state.alert, Some(LayoutError::SaveFailed("timeout".to_string())));
        })
        .run();
}

#[test]
fn test_successful_save_renames_layout() {
    ReducerTest::new(LayoutEditorReducer::new())
        .with_env(test_env())
        .given_state(open(20, VesselType::Standard))
        .when_action(EditorAction::Save)
        .when_action(EditorAction::SaveSucceeded {
            layout_name: "Seat Layout 5x4 (20 seats)".to_string(),
            saved_at: test_clock().now(),
        })
        .then_state(|state| {
            assert!(!state.saving);
            assert_eq!(state.meta.name, "Seat Layout 5x4 (20 seats)");
            let layout: SeatLayout = state.layout();
            assert_eq!(layout.layout_name, "Seat Layout 5x4 (20 seats)");
        })
        .run();
}

// ============================================================================
// Notification
// ============================================================================

#[test]
fn test_stale_flush_is_ignored() {
    ReducerTest::new(LayoutEditorReducer::new())
        .with_env(test_env())
        .given_state(open(20, VesselType::Standard))
        .when_action(EditorAction::ToggleAisle { column: 2 })
        .when_action(EditorAction::ToggleAisle { column: 3 })
        .when_action(EditorAction::FlushChanges { revision: 1 })
        .then_effects(|effects| assertions::assert_no_effects(effects))
        .run();
}

#[test]
fn test_unchanged_flush_is_suppressed() {
    ReducerTest::new(LayoutEditorReducer::new())
        .with_env(test_env())
        .given_state(open(20, VesselType::Standard))
        .when_action(EditorAction::ToggleAisle { column: 2 })
        .when_action(EditorAction::FlushChanges { revision: 1 })
        .when_action(EditorAction::ToggleAisle { column: 2 })
        .when_action(EditorAction::ToggleAisle { column: 2 })
        .when_action(EditorAction::FlushChanges { revision: 3 })
        .then_effects(|effects| assertions::assert_no_effects(effects))
        .run();
}

#[test]
fn test_alert_can_be_dismissed() {
    let mut state = open(20, VesselType::Standard);
    state.alert = Some(LayoutError::CapacityReached { capacity: 20 });

    ReducerTest::new(LayoutEditorReducer::new())
        .with_env(test_env())
        .given_state(state)
        .when_action(EditorAction::DismissAlert)
        .then_state(|state| assert!(state.alert.is_none()))
        .run();
}
