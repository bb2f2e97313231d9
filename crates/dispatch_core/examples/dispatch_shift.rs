//! Run a seeded fleet through a short shift and print what happened.
//!
//! Run with: cargo run -p dispatch_core --example dispatch_shift

use dispatch_core::clock::{ONE_HOUR_MS, ONE_MIN_MS};
use dispatch_core::engine::{DispatchEngine, DispatchOutcome};
use dispatch_core::requests::NewTransportRequest;
use dispatch_core::scenario::{build_fleet, FleetParams};

fn main() {
    const FLEET_SIZE: usize = 12;
    const HOSPITALS: usize = 3;
    const CALLS: usize = 8;

    let mut engine = DispatchEngine::new();
    build_fleet(
        &mut engine,
        FleetParams::default()
            .with_seed(123)
            .with_fleet_size(FLEET_SIZE)
            .with_hospitals(HOSPITALS)
            .with_shift_length_hours(12),
    )
    .expect("seed fleet");

    println!(
        "--- Dispatch shift ({} units, {} hospitals, seed 123) ---",
        FLEET_SIZE, HOSPITALS
    );

    let call_types = ["Wheelchair", "BLS", "ALS", "CCT"];
    let mut assigned = 0usize;
    let mut pending = 0usize;
    let mut now_ms = 0u64;

    for i in 0..CALLS {
        now_ms += 5 * ONE_MIN_MS;
        let outcome = engine
            .create_transport_request(
                now_ms,
                NewTransportRequest {
                    patient_name: format!("Patient {}", i + 1),
                    patient_age: 40 + i as u32,
                    chief_complaint: "interfacility transfer".to_string(),
                    call_type: call_types[i % call_types.len()].to_string(),
                    hospital_id: format!("hospital-{}", i % HOSPITALS + 1),
                },
            )
            .expect("create request");

        match outcome {
            DispatchOutcome::Assigned(a) => {
                assigned += 1;
                println!(
                    "  call {} ({}) -> {}{}",
                    i + 1,
                    call_types[i % call_types.len()],
                    a.ambulance_name,
                    if a.needs_approval { " (needs approval)" } else { "" }
                );
                // Drive the call through its lifecycle so the unit frees up.
                for status in ["en_route", "on_scene", "transporting", "completed"] {
                    now_ms += 10 * ONE_MIN_MS;
                    engine
                        .update_status(now_ms, a.ambulance, status)
                        .expect("status update");
                }
                now_ms += ONE_MIN_MS;
                engine
                    .update_status(now_ms, a.ambulance, "available")
                    .expect("back in service");
            }
            DispatchOutcome::Pending { request } => {
                pending += 1;
                println!(
                    "  call {} ({}) -> pending ({:?})",
                    i + 1,
                    call_types[i % call_types.len()],
                    request
                );
            }
        }
    }

    println!("\nAssigned: {}  Pending: {}", assigned, pending);

    // Late in the shift a unit takes its rest break.
    now_ms = 13 * ONE_HOUR_MS;
    let medic = engine.ambulance_by_name("Medic-01").expect("unit");
    match engine.request_break(now_ms, medic) {
        Ok(()) => println!("Medic-01 on break at hour 13"),
        Err(err) => println!("Medic-01 break refused: {}", err),
    }
    for (tier, unit) in engine
        .closest_available(now_ms + 2 * ONE_HOUR_MS + ONE_MIN_MS, "hospital-1")
        .expect("dashboard query")
    {
        match unit {
            Some(u) => println!(
                "closest {:?}: {} at {:.1} km (eta {} min)",
                tier, u.name, u.distance_km, u.eta_minutes
            ),
            None => println!("closest {:?}: none available", tier),
        }
    }

    let unread = engine.unread_notifications();
    println!("Unread supply notifications: {}", unread.len());
}
