//! Event-gated systems run off the deadline clock.

pub mod break_expired;

use bevy_ecs::prelude::{Res, Schedule};
use bevy_ecs::schedule::IntoSystemConfigs;

use crate::clock::{CurrentEvent, EventKind};
use break_expired::break_expired_system;

fn is_break_expired(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::BreakExpired)
        .unwrap_or(false)
}

/// Builds the engine schedule: every clock-driven system, gated on its event
/// kind so only the relevant handler runs per popped event.
pub fn engine_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems(break_expired_system.run_if(is_break_expired));
    schedule
}
