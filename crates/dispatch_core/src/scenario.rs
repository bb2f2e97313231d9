//! Scenario setup: seed an engine with a demo fleet, hospitals, and supplies.
//!
//! Samples unit positions uniformly inside a geographic bounding box and
//! cycles tiers so every capability level is represented. Intended for the
//! demo binary, benches, and load-style tests.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::engine::DispatchEngine;
use crate::error::DispatchError;
use crate::fleet::NewAmbulance;
use crate::ecs::Tier;
use crate::spatial::GeoPoint;

/// Default bounding box: San Francisco Bay Area (approx).
const DEFAULT_LAT_MIN: f64 = 37.6;
const DEFAULT_LAT_MAX: f64 = 37.85;
const DEFAULT_LNG_MIN: f64 = -122.55;
const DEFAULT_LNG_MAX: f64 = -122.35;

/// Parameters for seeding a demo fleet.
#[derive(Debug, Clone)]
pub struct FleetParams {
    pub num_ambulances: usize,
    pub num_hospitals: usize,
    /// Random seed for reproducibility (optional; if None, uses entropy).
    pub seed: Option<u64>,
    /// Bounding box for random positions (lat/lng degrees).
    pub lat_min: f64,
    pub lat_max: f64,
    pub lng_min: f64,
    pub lng_max: f64,
    pub shift_length_hours: u32,
    /// Starting stock and par level applied to every seeded supply row.
    pub supply_quantity: i64,
    pub supply_par_level: i64,
}

impl Default for FleetParams {
    fn default() -> Self {
        Self {
            num_ambulances: 12,
            num_hospitals: 3,
            seed: None,
            lat_min: DEFAULT_LAT_MIN,
            lat_max: DEFAULT_LAT_MAX,
            lng_min: DEFAULT_LNG_MIN,
            lng_max: DEFAULT_LNG_MAX,
            shift_length_hours: 12,
            supply_quantity: 10,
            supply_par_level: 4,
        }
    }
}

impl FleetParams {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_fleet_size(mut self, num_ambulances: usize) -> Self {
        self.num_ambulances = num_ambulances;
        self
    }

    pub fn with_hospitals(mut self, num_hospitals: usize) -> Self {
        self.num_hospitals = num_hospitals;
        self
    }

    pub fn with_shift_length_hours(mut self, hours: u32) -> Self {
        self.shift_length_hours = hours;
        self
    }
}

/// Supplies stocked on every seeded unit.
pub const SEED_SUPPLIES: [&str; 4] = ["oxygen", "gauze", "saline", "epinephrine"];

fn random_point<R: Rng>(rng: &mut R, params: &FleetParams) -> GeoPoint {
    let lat = rng.gen_range(params.lat_min..=params.lat_max);
    let lng = rng.gen_range(params.lng_min..=params.lng_max);
    GeoPoint::new(lat, lng)
}

/// Seed `engine` with hospitals and a mixed-tier fleet. Unit names are
/// "Medic-01".. and hospital ids "hospital-1".. ; tiers cycle through all
/// four levels so each tier has coverage when the fleet is large enough.
pub fn build_fleet(engine: &mut DispatchEngine, params: FleetParams) -> Result<(), DispatchError> {
    let mut rng: StdRng = match params.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let now_ms = engine.now_ms();

    for i in 0..params.num_hospitals {
        let point = random_point(&mut rng, &params);
        engine.register_hospital(&format!("hospital-{}", i + 1), point);
    }

    for i in 0..params.num_ambulances {
        let tier = Tier::ALL[i % Tier::ALL.len()];
        let position = random_point(&mut rng, &params);
        let entity = engine.register_ambulance(
            now_ms,
            NewAmbulance {
                name: format!("Medic-{:02}", i + 1),
                tier,
                position,
                shift_length_hours: params.shift_length_hours,
            },
        )?;
        for supply in SEED_SUPPLIES {
            engine.set_supply_level(
                entity,
                supply,
                params.supply_quantity,
                params.supply_par_level,
            );
        }
    }
    Ok(())
}
