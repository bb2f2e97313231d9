#![allow(dead_code)]

use bevy_ecs::prelude::Entity;

use dispatch_core::ecs::{Ambulance, Tier};
use dispatch_core::engine::DispatchEngine;
use dispatch_core::fleet::NewAmbulance;
use dispatch_core::requests::NewTransportRequest;
use dispatch_core::spatial::GeoPoint;

use super::world::HOSPITAL;

/// Register an available unit at the given offset (degrees) from the test
/// hospital. Offsets keep relative distances obvious in test bodies.
pub fn register_unit(
    engine: &mut DispatchEngine,
    name: &str,
    tier: Tier,
    shift_length_hours: u32,
    lat_offset: f64,
) -> Entity {
    let base = super::world::hospital_point();
    engine
        .register_ambulance(
            engine.now_ms(),
            NewAmbulance {
                name: name.to_string(),
                tier,
                position: GeoPoint::new(base.lat + lat_offset, base.lng),
                shift_length_hours,
            },
        )
        .expect("register unit")
}

/// A valid request payload for the default test hospital.
pub fn transport_request(call_type: &str) -> NewTransportRequest {
    NewTransportRequest {
        patient_name: "Jordan Reyes".to_string(),
        patient_age: 58,
        chief_complaint: "post-op transfer".to_string(),
        call_type: call_type.to_string(),
        hospital_id: HOSPITAL.to_string(),
    }
}

/// Backdate a unit's idle anchor so it ranks as idle for `idle_ms` at `now`.
pub fn set_idle_since(engine: &mut DispatchEngine, unit: Entity, now_ms: u64, idle_ms: u64) {
    let mut ambulance = engine
        .world_mut()
        .get_mut::<Ambulance>(unit)
        .expect("unit exists");
    ambulance.last_call_end_ms = Some(now_ms.saturating_sub(idle_ms));
}
