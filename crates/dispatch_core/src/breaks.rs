//! Rest breaks: time-boxed, precondition-gated, auto-reverted.
//!
//! A granted break schedules a [EventKind::BreakExpired] deadline on the
//! clock. The revert fires unconditionally at the deadline and simply sets
//! `on_break = false`, so a unit that left `available` in the meantime (the
//! status update already cleared its break flag) sees a harmless no-op.

use bevy_ecs::prelude::{Entity, World};
use tracing::info;

use crate::clock::{DispatchClock, EventKind, EventSubject, ONE_HOUR_MS};
use crate::config::EngineConfig;
use crate::ecs::{Ambulance, AmbulanceStatus};
use crate::error::DispatchError;

/// Grant a rest break if the unit is available and deep enough into its
/// shift; schedules the unconditional revert.
pub fn request_break(world: &mut World, ambulance_entity: Entity) -> Result<(), DispatchError> {
    let config = *world.resource::<EngineConfig>();
    let now_ms = world.resource::<DispatchClock>().now();

    {
        let ambulance = world
            .get::<Ambulance>(ambulance_entity)
            .ok_or(DispatchError::AmbulanceNotFound)?;
        if ambulance.status != AmbulanceStatus::Available || ambulance.on_break {
            return Err(DispatchError::AmbulanceBusy);
        }
        let hours_on_shift =
            now_ms.saturating_sub(ambulance.shift_start_ms) as f64 / ONE_HOUR_MS as f64;
        if hours_on_shift < config.min_break_shift_hours {
            return Err(DispatchError::BreakTooEarly {
                hours_on_shift,
                required_hours: config.min_break_shift_hours,
            });
        }
    }

    world
        .get_mut::<Ambulance>(ambulance_entity)
        .ok_or(DispatchError::AmbulanceNotFound)?
        .on_break = true;
    world.resource_mut::<DispatchClock>().schedule_in(
        config.break_duration_ms,
        EventKind::BreakExpired,
        Some(EventSubject::Ambulance(ambulance_entity)),
    );
    info!(ambulance = ?ambulance_entity, "break granted");
    Ok(())
}
