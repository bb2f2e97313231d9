//! Patient care records and the structured supply-usage payload.
//!
//! The usage report arrives as loose JSON from the field client; it is
//! parsed into a typed record up front so a malformed payload fails with an
//! error attributable to this operation instead of vanishing into a log
//! line. The care record itself is persisted even when the payload is bad —
//! clinical narrative must never be lost to an inventory bug.

use std::collections::BTreeMap;

use bevy_ecs::prelude::{Component, Entity, World};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::DispatchError;
use crate::inventory;

/// Structured supply-usage report: supply name → units consumed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplyUsage {
    pub items: BTreeMap<String, i64>,
}

/// Parse a loose JSON payload into a [SupplyUsage]. The payload must be an
/// object whose values are integers; anything else is malformed.
pub fn parse_supply_usage(value: &serde_json::Value) -> Result<SupplyUsage, DispatchError> {
    let object = value
        .as_object()
        .ok_or_else(|| DispatchError::MalformedSupplyUsage("expected an object".to_string()))?;

    let mut items = BTreeMap::new();
    for (name, raw) in object {
        let used = raw.as_i64().ok_or_else(|| {
            DispatchError::MalformedSupplyUsage(format!(
                "supply {:?} has non-integer quantity {}",
                name, raw
            ))
        })?;
        items.insert(name.clone(), used);
    }
    Ok(SupplyUsage { items })
}

/// Clinical record linked to a transport request. Read-only with respect to
/// dispatch; its usage report is the trigger for inventory decrement.
#[derive(Debug, Clone, Component)]
pub struct PatientCareRecord {
    pub request: Entity,
    pub patient_name: String,
    pub chief_complaint: String,
    pub narrative: Option<String>,
    pub supply_usage: SupplyUsage,
    pub created_at_ms: u64,
}

/// Input for a care-record submission; `supply_usage` is the raw payload.
#[derive(Debug, Clone)]
pub struct NewCareRecord {
    pub request: Entity,
    pub patient_name: String,
    pub chief_complaint: String,
    pub narrative: Option<String>,
    pub supply_usage: serde_json::Value,
}

/// Persist a care record and consume its reported supplies.
///
/// Partial-failure policy: the record is persisted first; a malformed usage
/// payload then fails with `MalformedSupplyUsage` (record kept, stock
/// untouched), and per-entry inventory misses are logged and skipped.
pub fn submit_care_record(
    world: &mut World,
    new: NewCareRecord,
    now_ms: u64,
) -> Result<Entity, DispatchError> {
    if new.patient_name.trim().is_empty() {
        return Err(DispatchError::Validation("patient name".to_string()));
    }
    if new.chief_complaint.trim().is_empty() {
        return Err(DispatchError::Validation("chief complaint".to_string()));
    }
    let request = world
        .get::<crate::ecs::TransportRequest>(new.request)
        .ok_or(DispatchError::RequestNotFound)?;
    let ambulance = request.assigned;

    let parsed = parse_supply_usage(&new.supply_usage);
    let supply_usage = match &parsed {
        Ok(usage) => usage.clone(),
        Err(err) => {
            warn!(%err, request = ?new.request, "care record kept; usage payload rejected");
            SupplyUsage::default()
        }
    };

    let record = world
        .spawn(PatientCareRecord {
            request: new.request,
            patient_name: new.patient_name,
            chief_complaint: new.chief_complaint,
            narrative: new.narrative,
            supply_usage: supply_usage.clone(),
            created_at_ms: now_ms,
        })
        .id();

    let usage = parsed?;
    if let Some(ambulance) = ambulance {
        inventory::consume_supplies(world, ambulance, &usage);
    } else {
        warn!(request = ?new.request, "care record without an assigned unit; no stock to decrement");
    }
    Ok(record)
}
