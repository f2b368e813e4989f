//! Editor settings.
//!
//! Loads settings from environment variables with sensible defaults.

use crate::layout::Pricing;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Shortest accepted notification debounce
pub const MIN_NOTIFY_DEBOUNCE_MS: u64 = 200;

/// Longest accepted notification debounce
pub const MAX_NOTIFY_DEBOUNCE_MS: u64 = 1000;

const DEFAULT_NOTIFY_DEBOUNCE_MS: u64 = 400;
const DEFAULT_PREMIUM_MULTIPLIER: f64 = 1.5;
const DEFAULT_LAYOUT_NAME_PREFIX: &str = "Seat Layout";

/// Settings for a layout editing session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorSettings {
    /// Quiescence window before a change notification is emitted, in
    /// milliseconds (clamped to 200..=1000)
    pub notify_debounce_ms: u64,
    /// Price multiplier for premium seats
    pub premium_price_multiplier: f64,
    /// Prefix of generated layout names
    pub layout_name_prefix: String,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            notify_debounce_ms: DEFAULT_NOTIFY_DEBOUNCE_MS,
            premium_price_multiplier: DEFAULT_PREMIUM_MULTIPLIER,
            layout_name_prefix: DEFAULT_LAYOUT_NAME_PREFIX.to_string(),
        }
    }
}

impl EditorSettings {
    /// Load settings from environment variables.
    ///
    /// - `SEAT_LAYOUT_NOTIFY_DEBOUNCE_MS` (default 400)
    /// - `SEAT_LAYOUT_PREMIUM_MULTIPLIER` (default 1.5)
    /// - `SEAT_LAYOUT_NAME_PREFIX` (default "Seat Layout")
    ///
    /// Unparseable values fall back to their defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load settings through an arbitrary key lookup
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            notify_debounce_ms: lookup("SEAT_LAYOUT_NOTIFY_DEBOUNCE_MS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.notify_debounce_ms),
            premium_price_multiplier: lookup("SEAT_LAYOUT_PREMIUM_MULTIPLIER")
                .and_then(|s| s.parse().ok())
                .filter(|m: &f64| m.is_finite() && *m > 0.0)
                .unwrap_or(defaults.premium_price_multiplier),
            layout_name_prefix: lookup("SEAT_LAYOUT_NAME_PREFIX")
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(defaults.layout_name_prefix),
        }
    }

    /// Notification debounce, clamped to the accepted range
    #[must_use]
    pub fn notify_debounce(&self) -> Duration {
        Duration::from_millis(
            self.notify_debounce_ms
                .clamp(MIN_NOTIFY_DEBOUNCE_MS, MAX_NOTIFY_DEBOUNCE_MS),
        )
    }

    /// Classification multipliers
    #[must_use]
    pub const fn pricing(&self) -> Pricing {
        Pricing::with_premium(self.premium_price_multiplier)
    }

    /// Human label for a saved layout
    #[must_use]
    pub fn layout_name(&self, rows: u32, columns: u32, active_seats: u32) -> String {
        format!(
            "{} {rows}x{columns} ({active_seats} seats)",
            self.layout_name_prefix
        )
    }
}
