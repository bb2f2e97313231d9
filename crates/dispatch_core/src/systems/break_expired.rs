//! System reverting an expired rest break.

use bevy_ecs::prelude::{Query, Res};
use tracing::debug;

use crate::clock::{CurrentEvent, EventKind, EventSubject};
use crate::ecs::Ambulance;

/// Unconditional revert: the deadline fires exactly once per granted break,
/// regardless of any intervening manual state change, and only ever clears
/// the flag.
pub fn break_expired_system(event: Res<CurrentEvent>, mut ambulances: Query<&mut Ambulance>) {
    if event.0.kind != EventKind::BreakExpired {
        return;
    }
    let Some(EventSubject::Ambulance(entity)) = event.0.subject else {
        return;
    };
    if let Ok(mut ambulance) = ambulances.get_mut(entity) {
        ambulance.on_break = false;
        debug!(ambulance = ?entity, "break expired");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy_ecs::prelude::{Schedule, World};

    use crate::clock::{DispatchClock, EventKind, EventSubject};
    use crate::ecs::{AmbulanceStatus, Tier};

    #[test]
    fn revert_clears_on_break() {
        let mut world = World::new();
        world.insert_resource(DispatchClock::default());
        let entity = world
            .spawn(Ambulance {
                name: "Medic-1".to_string(),
                status: AmbulanceStatus::Available,
                tier: Tier::Bls,
                shift_length_hours: 24,
                shift_start_ms: 0,
                last_call_end_ms: None,
                on_break: true,
                active_request: None,
            })
            .id();

        world
            .resource_mut::<DispatchClock>()
            .schedule_at(100, EventKind::BreakExpired, Some(EventSubject::Ambulance(entity)));
        let event = world
            .resource_mut::<DispatchClock>()
            .pop_next()
            .expect("break expired event");
        world.insert_resource(CurrentEvent(event));

        let mut schedule = Schedule::default();
        schedule.add_systems(break_expired_system);
        schedule.run(&mut world);

        assert!(!world.get::<Ambulance>(entity).expect("unit").on_break);
    }

    #[test]
    fn revert_for_a_despawned_unit_is_a_no_op() {
        let mut world = World::new();
        world.insert_resource(DispatchClock::default());
        let entity = world.spawn_empty().id();
        world.despawn(entity);

        world.insert_resource(CurrentEvent(crate::clock::Event {
            timestamp: 0,
            kind: EventKind::BreakExpired,
            subject: Some(EventSubject::Ambulance(entity)),
        }));

        let mut schedule = Schedule::default();
        schedule.add_systems(break_expired_system);
        schedule.run(&mut world);
    }
}
