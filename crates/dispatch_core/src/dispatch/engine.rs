//! Atomic assignment: snapshot, rank, verify, commit.
//!
//! The candidate snapshot and the commit happen under the same exclusive
//! world access, which is the serialization boundary required for the
//! no-double-assign invariant. The winner is still re-verified immediately
//! before the write; a stale winner is dropped and the refreshed pool
//! re-ranked rather than ever overwriting an existing commitment.

use bevy_ecs::prelude::{Entity, World};
use tracing::{debug, info};

use crate::bus::{self, DispatchEvent};
use crate::clock::DispatchClock;
use crate::config::EngineConfig;
use crate::dispatch::eligibility::is_eligible;
use crate::dispatch::ranking::{rank, RankedCandidate};
use crate::ecs::{Ambulance, AmbulanceStatus, Position, RequestStatus, Tier, TransportRequest};
use crate::error::DispatchError;
use crate::routing::TravelEstimatorResource;
use crate::spatial::GeoPoint;

/// Outcome of a successful assignment commit.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub request: Entity,
    pub ambulance: Entity,
    pub ambulance_name: String,
    pub needs_approval: bool,
}

/// Match a pending request to the best eligible unit and commit the pair.
///
/// An empty fleet (or one with every unit busy) reports
/// `NoAvailableAmbulances`; available units that all fail the tier rules
/// report `NoEligibleAmbulance`. Either way the request is left pending and
/// is not retried by the engine.
pub fn assign_ambulance(
    world: &mut World,
    request_entity: Entity,
) -> Result<Assignment, DispatchError> {
    let (requested_tier, hospital_location, status) = {
        let request = world
            .get::<TransportRequest>(request_entity)
            .ok_or(DispatchError::RequestNotFound)?;
        (
            request.requested_tier,
            request.hospital_location,
            request.status,
        )
    };
    if status != RequestStatus::Pending {
        return Err(DispatchError::Validation(
            "request is no longer pending".to_string(),
        ));
    }

    let now_ms = world.resource::<DispatchClock>().now();
    let default_travel_minutes = world.resource::<EngineConfig>().default_travel_minutes;

    // Snapshot the dispatchable pool before applying the tier rules, so the
    // two empty-pool failures stay distinguishable.
    let available: Vec<(Entity, Tier, u32, u64, GeoPoint)> = world
        .query::<(Entity, &Ambulance, &Position)>()
        .iter(world)
        .filter(|(_, ambulance, _)| {
            ambulance.is_dispatchable() && ambulance.active_request.is_none()
        })
        .map(|(entity, ambulance, position)| {
            (
                entity,
                ambulance.tier,
                ambulance.shift_length_hours,
                ambulance.idle_ms(now_ms),
                position.0,
            )
        })
        .collect();

    if available.is_empty() {
        debug!(request = ?request_entity, "no available ambulances");
        return Err(DispatchError::NoAvailableAmbulances);
    }

    let pool: Vec<(Entity, u32, u64, GeoPoint)> = available
        .into_iter()
        .filter(|(_, tier, _, _, _)| is_eligible(*tier, requested_tier))
        .map(|(entity, _, shift, idle, origin)| (entity, shift, idle, origin))
        .collect();

    if pool.is_empty() {
        debug!(request = ?request_entity, tier = requested_tier.level(), "no eligible ambulance");
        return Err(DispatchError::NoEligibleAmbulance);
    }

    let estimator = world.resource::<TravelEstimatorResource>();
    let mut candidates: Vec<RankedCandidate> = pool
        .into_iter()
        .map(|(entity, shift_length_hours, idle_ms, origin)| RankedCandidate {
            ambulance: entity,
            shift_length_hours,
            idle_ms,
            travel_minutes: estimator
                .estimate_minutes(origin, hospital_location)
                .unwrap_or(default_travel_minutes),
        })
        .collect();
    rank(&mut candidates);

    // Re-verify each winner right before the write; drop stale entries and
    // fall through to the next-ranked unit.
    while let Some(winner) = candidates.first().cloned() {
        let verified = world
            .get::<Ambulance>(winner.ambulance)
            .map(|a| a.is_dispatchable() && a.active_request.is_none())
            .unwrap_or(false);
        if !verified {
            candidates.remove(0);
            continue;
        }
        return Ok(commit(world, request_entity, winner.ambulance, requested_tier));
    }

    Err(DispatchError::CommitConflict)
}

fn commit(
    world: &mut World,
    request_entity: Entity,
    winner: Entity,
    requested_tier: Tier,
) -> Assignment {
    let (winner_tier, winner_name) = {
        let mut ambulance = world
            .get_mut::<Ambulance>(winner)
            .expect("winner verified above");
        ambulance.status = AmbulanceStatus::EnRoute;
        ambulance.active_request = Some(request_entity);
        (ambulance.tier, ambulance.name.clone())
    };
    let needs_approval = winner_tier.level() > requested_tier.level();
    {
        let mut request = world
            .get_mut::<TransportRequest>(request_entity)
            .expect("request checked above");
        request.status = RequestStatus::Assigned;
        request.assigned = Some(winner);
        request.needs_approval = needs_approval;
    }

    info!(
        request = ?request_entity,
        ambulance = %winner_name,
        needs_approval,
        "assignment committed"
    );
    bus::emit(
        world,
        DispatchEvent::AssignmentMade {
            request: request_entity,
            ambulance: winner,
            needs_approval,
        },
    );

    Assignment {
        request: request_entity,
        ambulance: winner,
        ambulance_name: winner_name,
        needs_approval,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::requests::{self, NewTransportRequest};
    use crate::test_helpers::{create_test_world, spawn_available_ambulance, test_point};

    fn pending_request(world: &mut World, call_type: &str) -> Entity {
        requests::register_hospital(world, "general", test_point());
        requests::create_request(
            world,
            NewTransportRequest {
                patient_name: "Jordan Reyes".to_string(),
                patient_age: 58,
                chief_complaint: "post-op transfer".to_string(),
                call_type: call_type.to_string(),
                hospital_id: "general".to_string(),
            },
            0,
        )
        .expect("create request")
    }

    #[test]
    fn commit_links_both_sides_of_the_pair() {
        let mut world = create_test_world();
        let unit = spawn_available_ambulance(&mut world, "Medic-1", Tier::Als, test_point());
        let request = pending_request(&mut world, "ALS");

        let assignment = assign_ambulance(&mut world, request).expect("assign");
        assert_eq!(assignment.ambulance, unit);
        assert_eq!(assignment.ambulance_name, "Medic-1");
        assert!(!assignment.needs_approval);

        let ambulance = world.get::<Ambulance>(unit).expect("unit");
        assert_eq!(ambulance.status, AmbulanceStatus::EnRoute);
        assert_eq!(ambulance.active_request, Some(request));
        let request = world.get::<TransportRequest>(request).expect("request");
        assert_eq!(request.status, RequestStatus::Assigned);
        assert_eq!(request.assigned, Some(unit));
    }

    #[test]
    fn needs_approval_tracks_the_tier_gap() {
        let mut world = create_test_world();
        spawn_available_ambulance(&mut world, "Medic-1", Tier::Als, test_point());
        let request = pending_request(&mut world, "BLS");

        let assignment = assign_ambulance(&mut world, request).expect("assign");
        assert!(assignment.needs_approval);
    }

    #[test]
    fn empty_pool_leaves_the_request_pending() {
        let mut world = create_test_world();
        let request = pending_request(&mut world, "BLS");

        let err = assign_ambulance(&mut world, request).unwrap_err();
        assert_eq!(err, DispatchError::NoAvailableAmbulances);
        let request = world.get::<TransportRequest>(request).expect("request");
        assert_eq!(request.status, RequestStatus::Pending);
        assert_eq!(request.assigned, None);
    }

    #[test]
    fn tier_mismatch_is_reported_apart_from_an_empty_fleet() {
        let mut world = create_test_world();
        spawn_available_ambulance(&mut world, "Medic-1", Tier::Als, test_point());
        let request = pending_request(&mut world, "CCT");

        let err = assign_ambulance(&mut world, request).unwrap_err();
        assert_eq!(err, DispatchError::NoEligibleAmbulance);
    }

    #[test]
    fn unknown_request_is_reported() {
        let mut world = create_test_world();
        let ghost = world.spawn_empty().id();
        world.despawn(ghost);
        let err = assign_ambulance(&mut world, ghost).unwrap_err();
        assert_eq!(err, DispatchError::RequestNotFound);
    }
}
