//! Request ledger: transport-request records and read queries.
//!
//! Only the dispatch commit moves `pending → assigned`; the fleet coupling
//! rule owns `assigned → in_progress → completed`. A request that never
//! finds an eligible unit stays pending until an external caller re-submits.

use std::collections::HashMap;

use bevy_ecs::prelude::{Entity, Resource, World};

use crate::ecs::{Ambulance, Position, RequestStatus, Tier, TransportRequest};
use crate::error::DispatchError;
use crate::spatial::GeoPoint;

/// Known hospitals: id → coordinates. Requests and dashboard queries resolve
/// destinations through this directory.
#[derive(Debug, Default, Resource)]
pub struct HospitalDirectory {
    hospitals: HashMap<String, GeoPoint>,
}

impl HospitalDirectory {
    pub fn insert(&mut self, id: &str, location: GeoPoint) {
        self.hospitals.insert(id.to_string(), location);
    }

    pub fn get(&self, id: &str) -> Option<GeoPoint> {
        self.hospitals.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.hospitals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hospitals.is_empty()
    }
}

/// Register (or move) a hospital in the directory.
pub fn register_hospital(world: &mut World, id: &str, location: GeoPoint) {
    world
        .resource_mut::<HospitalDirectory>()
        .insert(id, location);
}

/// Validated input for a new transport request.
#[derive(Debug, Clone)]
pub struct NewTransportRequest {
    pub patient_name: String,
    pub patient_age: u32,
    pub chief_complaint: String,
    /// One of `Wheelchair` / `BLS` / `ALS` / `CCT`.
    pub call_type: String,
    pub hospital_id: String,
}

/// Create a pending transport request. Fails without state change on missing
/// fields, an unknown call type, or an unresolved hospital.
pub fn create_request(
    world: &mut World,
    new: NewTransportRequest,
    now_ms: u64,
) -> Result<Entity, DispatchError> {
    if new.patient_name.trim().is_empty() {
        return Err(DispatchError::Validation("patient name".to_string()));
    }
    if new.chief_complaint.trim().is_empty() {
        return Err(DispatchError::Validation("chief complaint".to_string()));
    }

    let requested_tier = Tier::from_call_type(&new.call_type)
        .ok_or_else(|| DispatchError::InvalidCallType(new.call_type.clone()))?;
    let hospital_location = world
        .resource::<HospitalDirectory>()
        .get(&new.hospital_id)
        .ok_or_else(|| DispatchError::HospitalNotFound(new.hospital_id.clone()))?;

    let entity = world
        .spawn(TransportRequest {
            patient_name: new.patient_name,
            patient_age: new.patient_age,
            chief_complaint: new.chief_complaint,
            requested_tier,
            hospital_id: new.hospital_id,
            hospital_location,
            status: RequestStatus::Pending,
            assigned: None,
            needs_approval: false,
            created_at_ms: now_ms,
        })
        .id();
    Ok(entity)
}

/// One row of the pending-transports dashboard query.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingTransport {
    pub request: Entity,
    pub status: RequestStatus,
    pub ambulance_name: Option<String>,
    pub ambulance_position: Option<GeoPoint>,
}

/// All non-completed requests destined for the given hospital, with the
/// assigned unit's name and last reported position where one is committed.
pub fn pending_transports(world: &mut World, hospital_id: &str) -> Vec<PendingTransport> {
    let rows: Vec<(Entity, RequestStatus, Option<Entity>)> = world
        .query::<(Entity, &TransportRequest)>()
        .iter(world)
        .filter(|(_, request)| {
            request.hospital_id == hospital_id && !request.status.is_terminal()
        })
        .map(|(entity, request)| (entity, request.status, request.assigned))
        .collect();

    rows.into_iter()
        .map(|(request, status, assigned)| {
            let ambulance_name = assigned
                .and_then(|e| world.get::<Ambulance>(e))
                .map(|a| a.name.clone());
            let ambulance_position = assigned
                .and_then(|e| world.get::<Position>(e))
                .map(|p| p.0);
            PendingTransport {
                request,
                status,
                ambulance_name,
                ambulance_position,
            }
        })
        .collect()
}
