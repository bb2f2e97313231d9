//! Fleet registry: ambulance records, the status state machine, and the
//! name index.
//!
//! Status updates are the only place the ambulance→request coupling runs:
//! a transition to `en_route` advances the linked non-terminal request to
//! `in_progress`, and a transition to `completed` completes it and stamps
//! `last_call_end`.

use std::collections::HashMap;

use bevy_ecs::prelude::{Entity, Resource, World};
use tracing::info;

use crate::bus::{self, DispatchEvent};
use crate::clock::DispatchClock;
use crate::config::EngineConfig;
use crate::ecs::{Ambulance, AmbulanceStatus, Position, RequestStatus, Tier, TransportRequest};
use crate::error::DispatchError;
use crate::spatial::GeoPoint;

/// Secondary index: unique display name → ambulance entity.
#[derive(Debug, Default, Resource)]
pub struct FleetIndex {
    by_name: HashMap<String, Entity>,
}

impl FleetIndex {
    pub fn insert(&mut self, name: &str, entity: Entity) {
        self.by_name.insert(name.to_string(), entity);
    }

    pub fn get(&self, name: &str) -> Option<Entity> {
        self.by_name.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

/// Attributes for explicit registration.
#[derive(Debug, Clone)]
pub struct NewAmbulance {
    pub name: String,
    pub tier: Tier,
    pub position: GeoPoint,
    pub shift_length_hours: u32,
}

/// Register an ambulance with full attributes. An existing record with the
/// same name is updated in place (registration corrects upsert defaults).
pub fn register_ambulance(
    world: &mut World,
    new: NewAmbulance,
    now_ms: u64,
) -> Result<Entity, DispatchError> {
    if new.name.trim().is_empty() {
        return Err(DispatchError::Validation("ambulance name".to_string()));
    }

    if let Some(entity) = world.resource::<FleetIndex>().get(&new.name) {
        {
            let mut ambulance = world
                .get_mut::<Ambulance>(entity)
                .ok_or(DispatchError::AmbulanceNotFound)?;
            ambulance.tier = new.tier;
            ambulance.shift_length_hours = new.shift_length_hours;
        }
        if let Some(mut position) = world.get_mut::<Position>(entity) {
            position.0 = new.position;
        }
        return Ok(entity);
    }

    let entity = world
        .spawn((
            Ambulance {
                name: new.name.clone(),
                status: AmbulanceStatus::Available,
                tier: new.tier,
                shift_length_hours: new.shift_length_hours,
                shift_start_ms: now_ms,
                last_call_end_ms: None,
                on_break: false,
                active_request: None,
            },
            Position(new.position),
        ))
        .id();
    world.resource_mut::<FleetIndex>().insert(&new.name, entity);
    Ok(entity)
}

/// Record a location report. Unknown names create a new record with the
/// configured defaults (upsert semantics). Emits a `locationUpdate` event.
pub fn update_location(
    world: &mut World,
    name: &str,
    point: GeoPoint,
    now_ms: u64,
) -> Result<Entity, DispatchError> {
    if name.trim().is_empty() {
        return Err(DispatchError::Validation("ambulance name".to_string()));
    }

    let entity = match world.resource::<FleetIndex>().get(name) {
        Some(entity) => {
            if let Some(mut position) = world.get_mut::<Position>(entity) {
                position.0 = point;
            }
            entity
        }
        None => {
            let config = *world.resource::<EngineConfig>();
            register_ambulance(
                world,
                NewAmbulance {
                    name: name.to_string(),
                    tier: config.default_tier,
                    position: point,
                    shift_length_hours: config.default_shift_length_hours,
                },
                now_ms,
            )?
        }
    };

    bus::emit(
        world,
        DispatchEvent::LocationUpdate {
            name: name.to_string(),
            latitude: point.lat,
            longitude: point.lng,
        },
    );
    Ok(entity)
}

/// Apply a status update from the field. The raw value must name one of the
/// six states; anything else fails with `InvalidStatus` and changes nothing.
///
/// Side effects, in order: leaving `available` clears `on_break`; the linked
/// request advances per the coupling rule; `completed` stamps
/// `last_call_end` and releases the unit↔request link; a `statusUpdate`
/// event is emitted.
pub fn update_status(
    world: &mut World,
    entity: Entity,
    raw_status: &str,
) -> Result<AmbulanceStatus, DispatchError> {
    let status = AmbulanceStatus::parse(raw_status)
        .ok_or_else(|| DispatchError::InvalidStatus(raw_status.to_string()))?;

    let now_ms = world.resource::<DispatchClock>().now();
    let linked_request = {
        let mut ambulance = world
            .get_mut::<Ambulance>(entity)
            .ok_or(DispatchError::AmbulanceNotFound)?;
        ambulance.status = status;
        if status != AmbulanceStatus::Available {
            // on_break is only meaningful while available; a late BreakExpired
            // revert then becomes a no-op.
            ambulance.on_break = false;
        }
        if status == AmbulanceStatus::Completed {
            ambulance.last_call_end_ms = Some(now_ms);
            ambulance.active_request.take()
        } else {
            ambulance.active_request
        }
    };

    if let Some(request_entity) = linked_request {
        couple_request(world, request_entity, status);
    }

    info!(ambulance = ?entity, status = status.as_str(), "ambulance status updated");
    bus::emit(
        world,
        DispatchEvent::StatusUpdate {
            ambulance: entity,
            status,
        },
    );
    Ok(status)
}

/// Advance the linked request as a side effect of the ambulance transition.
fn couple_request(world: &mut World, request_entity: Entity, status: AmbulanceStatus) {
    let Some(mut request) = world.get_mut::<TransportRequest>(request_entity) else {
        return;
    };
    if request.status.is_terminal() {
        return;
    }
    match status {
        AmbulanceStatus::EnRoute => request.status = RequestStatus::InProgress,
        AmbulanceStatus::Completed => request.status = RequestStatus::Completed,
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::{EventSinkResource, RecordedEvents, TracingSink};

    fn test_world() -> World {
        let mut world = World::new();
        world.insert_resource(DispatchClock::default());
        world.insert_resource(EngineConfig::default());
        world.insert_resource(FleetIndex::default());
        world.insert_resource(EventSinkResource::new(Box::new(TracingSink)));
        world.insert_resource(RecordedEvents::default());
        world
    }

    fn point() -> GeoPoint {
        GeoPoint::new(37.7749, -122.4194)
    }

    #[test]
    fn location_report_for_unknown_name_creates_a_record() {
        let mut world = test_world();
        let entity = update_location(&mut world, "Medic-9", point(), 1_000).expect("upsert");

        let ambulance = world.get::<Ambulance>(entity).expect("ambulance");
        assert_eq!(ambulance.name, "Medic-9");
        assert_eq!(ambulance.status, AmbulanceStatus::Available);
        assert_eq!(ambulance.tier, EngineConfig::default().default_tier);
        assert_eq!(ambulance.shift_start_ms, 1_000);
        assert_eq!(world.resource::<FleetIndex>().get("Medic-9"), Some(entity));

        let events = &world.resource::<RecordedEvents>().0;
        assert!(matches!(events[0], DispatchEvent::LocationUpdate { .. }));
    }

    #[test]
    fn registration_corrects_upsert_defaults() {
        let mut world = test_world();
        let upserted = update_location(&mut world, "Medic-9", point(), 0).expect("upsert");
        let registered = register_ambulance(
            &mut world,
            NewAmbulance {
                name: "Medic-9".to_string(),
                tier: Tier::Cct,
                position: point(),
                shift_length_hours: 12,
            },
            500,
        )
        .expect("register");

        assert_eq!(upserted, registered, "same record, not a duplicate");
        let ambulance = world.get::<Ambulance>(registered).expect("ambulance");
        assert_eq!(ambulance.tier, Tier::Cct);
        assert_eq!(ambulance.shift_length_hours, 12);
    }

    #[test]
    fn unknown_status_value_is_rejected() {
        let mut world = test_world();
        let entity = update_location(&mut world, "Medic-1", point(), 0).expect("upsert");

        let err = update_status(&mut world, entity, "warp_speed").unwrap_err();
        assert_eq!(err, DispatchError::InvalidStatus("warp_speed".to_string()));
        let ambulance = world.get::<Ambulance>(entity).expect("ambulance");
        assert_eq!(ambulance.status, AmbulanceStatus::Available);
    }

    #[test]
    fn leaving_available_clears_on_break() {
        let mut world = test_world();
        let entity = update_location(&mut world, "Medic-1", point(), 0).expect("upsert");
        world.get_mut::<Ambulance>(entity).expect("ambulance").on_break = true;

        update_status(&mut world, entity, "en_route").expect("status");
        assert!(!world.get::<Ambulance>(entity).expect("ambulance").on_break);
    }

    #[test]
    fn completed_stamps_last_call_end() {
        let mut world = test_world();
        let entity = update_location(&mut world, "Medic-1", point(), 0).expect("upsert");
        world.resource_mut::<DispatchClock>().advance_to(9_000);

        update_status(&mut world, entity, "completed").expect("status");
        let ambulance = world.get::<Ambulance>(entity).expect("ambulance");
        assert_eq!(ambulance.last_call_end_ms, Some(9_000));
        assert_eq!(ambulance.active_request, None);
    }
}
