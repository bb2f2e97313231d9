//! Test helpers for common test setup and utilities.
//!
//! This module provides shared test utilities to reduce duplication across test files.

use bevy_ecs::prelude::{Entity, World};

use crate::bus::RecordedEvents;
use crate::clock::DispatchClock;
use crate::config::EngineConfig;
use crate::ecs::{Ambulance, AmbulanceStatus, Position, Tier};
use crate::engine::DispatchEngine;
use crate::fleet::FleetIndex;
use crate::inventory::{NotificationLog, SupplyStore};
use crate::requests::HospitalDirectory;
use crate::spatial::GeoPoint;

/// A standard test location used across test files for consistency
/// (downtown San Francisco).
pub fn test_point() -> GeoPoint {
    GeoPoint::new(37.7749, -122.4194)
}

/// A location a few kilometres from [test_point].
pub fn test_near_point() -> GeoPoint {
    GeoPoint::new(37.7849, -122.4094)
}

/// A location tens of kilometres from [test_point] (Oakland).
pub fn test_distant_point() -> GeoPoint {
    GeoPoint::new(37.8044, -122.2712)
}

/// Create a basic test world with every engine resource inserted.
///
/// This is a convenience function for tests that drive operation modules
/// directly. For end-to-end flows, use [test_engine] instead.
pub fn create_test_world() -> World {
    let mut world = World::new();
    world.insert_resource(DispatchClock::default());
    world.insert_resource(EngineConfig::default());
    world.insert_resource(FleetIndex::default());
    world.insert_resource(HospitalDirectory::default());
    world.insert_resource(SupplyStore::default());
    world.insert_resource(NotificationLog::default());
    world.insert_resource(crate::bus::EventSinkResource::new(Box::new(
        crate::bus::TracingSink,
    )));
    world.insert_resource(crate::routing::TravelEstimatorResource::new(Box::new(
        crate::routing::FixedEstimate::default(),
    )));
    world.insert_resource(RecordedEvents::default());
    world
}

/// An engine with event recording enabled, for asserting on push deliveries.
pub fn test_engine() -> DispatchEngine {
    let mut engine = DispatchEngine::new();
    engine.world_mut().insert_resource(RecordedEvents::default());
    engine
}

/// Spawn an available, off-break unit with the given tier and position,
/// registered in the fleet index.
pub fn spawn_available_ambulance(
    world: &mut World,
    name: &str,
    tier: Tier,
    position: GeoPoint,
) -> Entity {
    let entity = world
        .spawn((
            Ambulance {
                name: name.to_string(),
                status: AmbulanceStatus::Available,
                tier,
                shift_length_hours: 12,
                shift_start_ms: 0,
                last_call_end_ms: None,
                on_break: false,
                active_request: None,
            },
            Position(position),
        ))
        .id();
    world.resource_mut::<FleetIndex>().insert(name, entity);
    entity
}
