//! Engine configuration with builder-style overrides.

use bevy_ecs::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::clock::ONE_HOUR_MS;
use crate::ecs::Tier;

/// Tunable engine parameters. Serializes so deployments can carry their
/// configuration alongside scenario definitions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Resource)]
pub struct EngineConfig {
    /// Minimum hours on shift before a rest break may be granted.
    pub min_break_shift_hours: f64,
    /// Fixed rest break duration; the revert fires at this deadline
    /// unconditionally.
    pub break_duration_ms: u64,
    /// Fallback travel estimate when the estimator abstains.
    pub default_travel_minutes: f64,
    /// Tier given to units first seen through a location report.
    pub default_tier: Tier,
    /// Shift length given to units first seen through a location report.
    pub default_shift_length_hours: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_break_shift_hours: 12.0,
            break_duration_ms: 2 * ONE_HOUR_MS,
            default_travel_minutes: 12.0,
            default_tier: Tier::Bls,
            default_shift_length_hours: 8,
        }
    }
}

impl EngineConfig {
    pub fn with_min_break_shift_hours(mut self, hours: f64) -> Self {
        self.min_break_shift_hours = hours;
        self
    }

    pub fn with_break_duration_ms(mut self, duration_ms: u64) -> Self {
        self.break_duration_ms = duration_ms;
        self
    }

    pub fn with_default_travel_minutes(mut self, minutes: f64) -> Self {
        self.default_travel_minutes = minutes;
        self
    }

    pub fn with_upsert_defaults(mut self, tier: Tier, shift_length_hours: u32) -> Self {
        self.default_tier = tier;
        self.default_shift_length_hours = shift_length_hours;
        self
    }
}
