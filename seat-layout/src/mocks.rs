//! Test doubles for the editor environment.
//!
//! Available with the `test-utils` feature.

use crate::editor::LayoutSink;
use crate::layout::SeatIdGenerator;
use crate::types::{Seat, SeatId, SeatLayout};
use futures::future::BoxFuture;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use uuid::Uuid;

/// A `(layout, seats)` pair handed to the sink
pub type Snapshot = (SeatLayout, Vec<Seat>);

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Sink that records every call.
///
/// Saves succeed immediately unless told to fail or to hold.
#[derive(Debug)]
pub struct RecordingSink {
    changes: Mutex<Vec<Snapshot>>,
    saves: Mutex<Vec<Snapshot>>,
    fail_saves: AtomicBool,
    gate: watch::Sender<bool>,
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingSink {
    /// Creates a new `RecordingSink`
    #[must_use]
    pub fn new() -> Self {
        Self {
            changes: Mutex::new(Vec::new()),
            saves: Mutex::new(Vec::new()),
            fail_saves: AtomicBool::new(false),
            gate: watch::Sender::new(true),
        }
    }

    /// Make subsequent saves fail (or succeed again)
    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Keep saves pending until [`release_saves`](Self::release_saves)
    pub fn hold_saves(&self) {
        self.gate.send_replace(false);
    }

    /// Let held saves complete
    pub fn release_saves(&self) {
        self.gate.send_replace(true);
    }

    /// Snapshots received through `on_change`
    #[must_use]
    pub fn changes(&self) -> Vec<Snapshot> {
        lock(&self.changes).clone()
    }

    /// Number of `on_change` calls
    #[must_use]
    pub fn change_count(&self) -> usize {
        lock(&self.changes).len()
    }

    /// Most recent `on_change` snapshot
    #[must_use]
    pub fn last_change(&self) -> Option<Snapshot> {
        lock(&self.changes).last().cloned()
    }

    /// Snapshots received through `save`, including failed attempts
    #[must_use]
    pub fn saves(&self) -> Vec<Snapshot> {
        lock(&self.saves).clone()
    }

    /// Number of `save` calls
    #[must_use]
    pub fn save_count(&self) -> usize {
        lock(&self.saves).len()
    }
}

impl LayoutSink for RecordingSink {
    fn on_change(&self, layout: SeatLayout, seats: Vec<Seat>) {
        lock(&self.changes).push((layout, seats));
    }

    fn save(&self, layout: SeatLayout, seats: Vec<Seat>) -> BoxFuture<'static, anyhow::Result<()>> {
        lock(&self.saves).push((layout, seats));
        let fail = self.fail_saves.load(Ordering::SeqCst);
        let mut gate = self.gate.subscribe();
        Box::pin(async move {
            // A closed channel means the sink is gone; finish rather than hang.
            let _ = gate.wait_for(|open| *open).await;
            if fail {
                anyhow::bail!("storage unavailable");
            }
            Ok(())
        })
    }
}

/// Deterministic seat ids: 1, 2, 3, ... as UUIDs
#[derive(Debug, Default)]
pub struct SequentialSeatIds {
    next: AtomicU64,
}

impl SequentialSeatIds {
    /// Creates a new `SequentialSeatIds` starting at 1
    #[must_use]
    pub const fn new() -> Self {
        Self {
            next: AtomicU64::new(0),
        }
    }
}

impl SeatIdGenerator for SequentialSeatIds {
    fn next_id(&self) -> SeatId {
        let n = self.next.fetch_add(1, Ordering::SeqCst) + 1;
        SeatId::from_uuid(Uuid::from_u128(u128::from(n)))
    }
}
