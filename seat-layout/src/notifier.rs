//! Change notification bookkeeping.
//!
//! Every mutation bumps a revision and schedules a debounced flush tagged
//! with it. A flush only emits if its revision is still the latest and the
//! content fingerprint differs from the last emission.

use crate::layout::LayoutData;
use crate::types::{Seat, SeatClass, SeatId, SeatType};
use ferry_seating_core::effect::EffectId;
use serde::Serialize;
use xxhash_rust::xxh3::xxh3_64;

/// Key of the pending notification timer
pub const NOTIFY_EFFECT: EffectId = EffectId::new("seat-layout.notify");

/// Fields of a seat that take part in change detection
#[derive(Serialize)]
struct SeatProjection<'a> {
    id: SeatId,
    seat_number: &'a str,
    row_number: u32,
    position_x: u32,
    seat_type: SeatType,
    seat_class: SeatClass,
    is_premium: bool,
    is_disabled: bool,
    is_window: bool,
    is_aisle: bool,
    price_multiplier: f64,
}

impl<'a> From<&'a Seat> for SeatProjection<'a> {
    fn from(seat: &'a Seat) -> Self {
        Self {
            id: seat.id,
            seat_number: &seat.seat_number,
            row_number: seat.row_number,
            position_x: seat.position_x,
            seat_type: seat.seat_type,
            seat_class: seat.seat_class,
            is_premium: seat.is_premium,
            is_disabled: seat.is_disabled,
            is_window: seat.is_window,
            is_aisle: seat.is_aisle,
            price_multiplier: seat.price_multiplier,
        }
    }
}

/// Content fingerprint of a layout and its seats.
///
/// Returns `None` if the snapshot cannot be serialized, which callers treat
/// as "changed".
#[must_use]
pub fn fingerprint(layout_data: &LayoutData, seats: &[Seat]) -> Option<u64> {
    let projection: Vec<SeatProjection<'_>> = seats.iter().map(SeatProjection::from).collect();
    match serde_json::to_vec(&(layout_data, projection)) {
        Ok(bytes) => Some(xxh3_64(&bytes)),
        Err(error) => {
            tracing::warn!(error = %error, "Could not fingerprint layout snapshot");
            None
        },
    }
}

/// Per-session notifier state
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChangeNotifier {
    revision: u64,
    last_emitted: Option<u64>,
}

impl ChangeNotifier {
    /// Notifier that treats `fingerprint` as already emitted
    #[must_use]
    pub const fn seeded(fingerprint: Option<u64>) -> Self {
        Self {
            revision: 0,
            last_emitted: fingerprint,
        }
    }

    /// Record a mutation and return the revision a flush must carry
    pub const fn touch(&mut self) -> u64 {
        self.revision += 1;
        self.revision
    }

    /// Latest revision
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Whether a flush for `revision` has been superseded
    #[must_use]
    pub const fn is_stale(&self, revision: u64) -> bool {
        revision != self.revision
    }

    /// Decide whether a snapshot with `fingerprint` should be emitted, and
    /// remember it if so
    pub fn should_emit(&mut self, fingerprint: Option<u64>) -> bool {
        match fingerprint {
            Some(current) if self.last_emitted == Some(current) => false,
            _ => {
                self.last_emitted = fingerprint;
                true
            },
        }
    }
}
