//! Dashboard query: closest available unit per tier.
//!
//! Uses straight-line distance and a fixed 50 km/h linear model — a coarse
//! read-only view, deliberately distinct from the pluggable estimator used
//! during assignment ranking.

use bevy_ecs::prelude::{Entity, World};

use crate::ecs::{Ambulance, Position, Tier};
use crate::error::DispatchError;
use crate::requests::HospitalDirectory;
use crate::spatial::{self, GeoPoint};

/// Nominal road speed for the dashboard ETA model.
pub const DASHBOARD_SPEED_KMH: f64 = 50.0;

#[derive(Debug, Clone, PartialEq)]
pub struct ClosestUnit {
    pub ambulance: Entity,
    pub name: String,
    pub distance_km: f64,
    pub eta_minutes: u64,
}

/// For each of the four tiers, the nearest unit that is available and off
/// break, or `None` when no unit of that tier qualifies.
pub fn closest_available_by_tier(
    world: &mut World,
    hospital_id: &str,
) -> Result<Vec<(Tier, Option<ClosestUnit>)>, DispatchError> {
    let hospital = world
        .resource::<HospitalDirectory>()
        .get(hospital_id)
        .ok_or_else(|| DispatchError::HospitalNotFound(hospital_id.to_string()))?;

    let units: Vec<(Entity, Tier, String, GeoPoint)> = world
        .query::<(Entity, &Ambulance, &Position)>()
        .iter(world)
        .filter(|(_, ambulance, _)| ambulance.is_dispatchable())
        .map(|(entity, ambulance, position)| {
            (entity, ambulance.tier, ambulance.name.clone(), position.0)
        })
        .collect();

    let mut rows = Vec::with_capacity(Tier::ALL.len());
    for tier in Tier::ALL {
        let mut best: Option<ClosestUnit> = None;
        for (entity, unit_tier, name, point) in &units {
            if *unit_tier != tier {
                continue;
            }
            let distance_km = spatial::distance_km(*point, hospital);
            if best.as_ref().map_or(true, |b| distance_km < b.distance_km) {
                best = Some(ClosestUnit {
                    ambulance: *entity,
                    name: name.clone(),
                    distance_km,
                    eta_minutes: spatial::linear_eta_minutes(distance_km, DASHBOARD_SPEED_KMH),
                });
            }
        }
        rows.push((tier, best));
    }
    Ok(rows)
}
