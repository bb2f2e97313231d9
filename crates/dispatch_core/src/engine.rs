//! The dispatch coordinator: owns the world, the clock, and the schedule.
//!
//! `DispatchEngine` is the mutual-exclusion scope required by the
//! no-double-assign invariant: every operation takes `&mut self`, so the
//! candidate snapshot and the commit of an assignment are serialized against
//! any other mutation. Callers supply wall-derived engine time (`now_ms`);
//! each operation first drains due clock deadlines, so break reverts fire
//! before the operation observes state.

use bevy_ecs::prelude::{Entity, Schedule, World};

use crate::breaks;
use crate::bus::{EventSink, EventSinkResource, TracingSink};
use crate::care::{self, NewCareRecord, SupplyUsage};
use crate::clock::{CurrentEvent, DispatchClock};
use crate::closest::{self, ClosestUnit};
use crate::config::EngineConfig;
use crate::dispatch::{self, Assignment};
use crate::ecs::{AmbulanceStatus, Tier};
use crate::error::DispatchError;
use crate::fleet::{self, FleetIndex, NewAmbulance};
use crate::inventory::{self, Notification, NotificationLog, SupplyStore};
use crate::requests::{self, HospitalDirectory, NewTransportRequest, PendingTransport};
use crate::routing::{
    build_travel_estimator, FixedEstimate, TravelEstimator, TravelEstimatorKind,
    TravelEstimatorResource,
};
use crate::spatial::GeoPoint;
use crate::systems::engine_schedule;

/// Outcome of a create-and-dispatch call: either a committed assignment or a
/// request recorded pending because no eligible unit existed.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    Assigned(Assignment),
    Pending { request: Entity },
}

pub struct DispatchEngine {
    world: World,
    schedule: Schedule,
}

impl Default for DispatchEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl DispatchEngine {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        let mut world = World::new();
        world.insert_resource(DispatchClock::default());
        world.insert_resource(config);
        world.insert_resource(FleetIndex::default());
        world.insert_resource(HospitalDirectory::default());
        world.insert_resource(SupplyStore::default());
        world.insert_resource(NotificationLog::default());
        world.insert_resource(EventSinkResource::new(Box::new(TracingSink)));
        world.insert_resource(TravelEstimatorResource::new(Box::new(
            FixedEstimate::default(),
        )));
        Self {
            world,
            schedule: engine_schedule(),
        }
    }

    /// Replace the push-delivery channel.
    pub fn set_event_sink(&mut self, sink: Box<dyn EventSink>) {
        self.world.insert_resource(EventSinkResource::new(sink));
    }

    /// Replace the travel-time estimator used by assignment ranking.
    pub fn set_travel_estimator(&mut self, estimator: Box<dyn TravelEstimator>) {
        self.world
            .insert_resource(TravelEstimatorResource::new(estimator));
    }

    /// Build and install the estimator a [TravelEstimatorKind] describes.
    pub fn set_travel_estimator_kind(&mut self, kind: &TravelEstimatorKind) {
        self.set_travel_estimator(build_travel_estimator(kind));
    }

    /// Direct world access, for scenario builders and tests.
    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn now_ms(&self) -> u64 {
        self.world.resource::<DispatchClock>().now()
    }

    /// Move engine time forward, firing every deadline that has come due (in
    /// deadline order) before settling at `now_ms`. Never moves backwards.
    pub fn advance_to(&mut self, now_ms: u64) {
        loop {
            let event = self
                .world
                .resource_mut::<DispatchClock>()
                .pop_due(now_ms);
            let Some(event) = event else {
                break;
            };
            self.world.insert_resource(CurrentEvent(event));
            self.schedule.run(&mut self.world);
        }
        self.world
            .resource_mut::<DispatchClock>()
            .advance_to(now_ms);
    }

    // ── Fleet ──────────────────────────────────────────────────────────

    pub fn register_hospital(&mut self, id: &str, location: GeoPoint) {
        requests::register_hospital(&mut self.world, id, location);
    }

    pub fn register_ambulance(
        &mut self,
        now_ms: u64,
        new: NewAmbulance,
    ) -> Result<Entity, DispatchError> {
        self.advance_to(now_ms);
        fleet::register_ambulance(&mut self.world, new, now_ms)
    }

    /// Location report; unknown names create a new record (upsert).
    pub fn report_location(
        &mut self,
        now_ms: u64,
        name: &str,
        point: GeoPoint,
    ) -> Result<Entity, DispatchError> {
        self.advance_to(now_ms);
        fleet::update_location(&mut self.world, name, point, now_ms)
    }

    pub fn update_status(
        &mut self,
        now_ms: u64,
        ambulance: Entity,
        raw_status: &str,
    ) -> Result<AmbulanceStatus, DispatchError> {
        self.advance_to(now_ms);
        fleet::update_status(&mut self.world, ambulance, raw_status)
    }

    pub fn ambulance_by_name(&self, name: &str) -> Option<Entity> {
        self.world.resource::<FleetIndex>().get(name)
    }

    // ── Requests & dispatch ────────────────────────────────────────────

    /// Create a transport request and immediately try to dispatch it.
    /// Validation failures create nothing; an empty eligible pool leaves the
    /// request pending and reports it as such.
    pub fn create_transport_request(
        &mut self,
        now_ms: u64,
        new: NewTransportRequest,
    ) -> Result<DispatchOutcome, DispatchError> {
        self.advance_to(now_ms);
        let request = requests::create_request(&mut self.world, new, now_ms)?;
        match dispatch::assign_ambulance(&mut self.world, request) {
            Ok(assignment) => Ok(DispatchOutcome::Assigned(assignment)),
            Err(DispatchError::NoAvailableAmbulances | DispatchError::NoEligibleAmbulance) => {
                Ok(DispatchOutcome::Pending { request })
            }
            Err(err) => Err(err),
        }
    }

    /// Re-run dispatch for an already-recorded pending request.
    pub fn assign_ambulance(
        &mut self,
        now_ms: u64,
        request: Entity,
    ) -> Result<Assignment, DispatchError> {
        self.advance_to(now_ms);
        dispatch::assign_ambulance(&mut self.world, request)
    }

    /// Dashboard read; drains due deadlines first so the board never shows
    /// rest state past its revert.
    pub fn pending_transports(&mut self, now_ms: u64, hospital_id: &str) -> Vec<PendingTransport> {
        self.advance_to(now_ms);
        requests::pending_transports(&mut self.world, hospital_id)
    }

    pub fn closest_available(
        &mut self,
        now_ms: u64,
        hospital_id: &str,
    ) -> Result<Vec<(Tier, Option<ClosestUnit>)>, DispatchError> {
        self.advance_to(now_ms);
        closest::closest_available_by_tier(&mut self.world, hospital_id)
    }

    // ── Breaks ─────────────────────────────────────────────────────────

    pub fn request_break(&mut self, now_ms: u64, ambulance: Entity) -> Result<(), DispatchError> {
        self.advance_to(now_ms);
        breaks::request_break(&mut self.world, ambulance)
    }

    // ── Inventory & care records ───────────────────────────────────────

    pub fn set_supply_level(&mut self, ambulance: Entity, supply: &str, quantity: i64, par: i64) {
        self.world
            .resource_mut::<SupplyStore>()
            .set_level(ambulance, supply, quantity, par);
    }

    pub fn consume_supplies(&mut self, now_ms: u64, ambulance: Entity, usage: &SupplyUsage) {
        self.advance_to(now_ms);
        inventory::consume_supplies(&mut self.world, ambulance, usage);
    }

    pub fn submit_care_record(
        &mut self,
        now_ms: u64,
        new: NewCareRecord,
    ) -> Result<Entity, DispatchError> {
        self.advance_to(now_ms);
        care::submit_care_record(&mut self.world, new, now_ms)
    }

    pub fn unread_notifications(&self) -> Vec<Notification> {
        self.world
            .resource::<NotificationLog>()
            .unread()
            .cloned()
            .collect()
    }

    pub fn mark_notification_read(&mut self, id: u64) -> Result<(), DispatchError> {
        self.world.resource_mut::<NotificationLog>().mark_read(id)
    }
}
