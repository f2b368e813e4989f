//! Persisted `layout_data` shape.
//!
//! The wire format carries the config at the top level plus a `floors`
//! array whose single "Main Deck" entry mirrors it. The mirror is rebuilt on
//! every serialization and ignored on load.

use super::config::LayoutConfig;
use crate::error::{LayoutError, Result};
use serde::{Deserialize, Serialize};

/// Name of the single deck every layout currently has
pub const MAIN_DECK: &str = "Main Deck";

/// One deck of a vessel
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloorData {
    /// Deck number, starting at 1
    pub floor_number: u32,
    /// Deck label
    pub floor_name: String,
    /// Deck grid
    #[serde(flatten)]
    pub config: LayoutConfig,
    /// Whether the deck is in use
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Seats on the deck
    #[serde(default)]
    pub seat_count: u32,
}

const fn default_true() -> bool {
    true
}

/// `SeatLayout::layout_data`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutData {
    /// Top-level grid description
    #[serde(flatten)]
    pub config: LayoutConfig,
    /// Deck mirror, reserved for multi-deck vessels
    #[serde(default)]
    pub floors: Vec<FloorData>,
}

impl LayoutData {
    /// Layout data for `config` with the main deck mirror filled in
    #[must_use]
    pub fn new(config: &LayoutConfig, seat_count: u32) -> Self {
        Self {
            config: config.clone(),
            floors: vec![FloorData {
                floor_number: 1,
                floor_name: MAIN_DECK.to_string(),
                config: config.clone(),
                is_active: true,
                seat_count,
            }],
        }
    }

    /// Parse `layout_data` from a loosely typed JSON value
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::MalformedLayoutData`] if required fields are
    /// missing or have the wrong type.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Whether the deck mirror agrees with the top-level config
    #[must_use]
    pub fn is_mirrored(&self) -> bool {
        matches!(self.floors.as_slice(), [floor] if floor.config == self.config)
    }

    /// Validated config for an editing session.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::MalformedLayoutData`] if the config breaks any
    /// dimension or reference bound.
    pub fn into_config(self) -> Result<LayoutConfig> {
        if !self.is_mirrored() {
            tracing::warn!(
                floors = self.floors.len(),
                "Deck mirror disagrees with layout data, using top-level fields"
            );
        }
        self.config
            .validate()
            .map_err(|error| LayoutError::MalformedLayoutData(error.to_string()))?;
        Ok(self.config)
    }
}
