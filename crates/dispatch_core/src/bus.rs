//! Event delivery to external listeners: fire-and-forget, failures logged.
//!
//! The sink is a boxed trait object resource so the push channel (websocket,
//! message queue, stdout) stays a pluggable collaborator. Delivery is
//! at-least-once, best-effort: a failed delivery is warned about and dropped,
//! never retried by the engine. When a [RecordedEvents] resource is present,
//! every emitted event is also mirrored there for assertions.

use bevy_ecs::prelude::{Entity, Resource, World};
use thiserror::Error;
use tracing::warn;

use crate::ecs::AmbulanceStatus;

/// Payloads pushed to external listeners.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchEvent {
    LocationUpdate {
        name: String,
        latitude: f64,
        longitude: f64,
    },
    StatusUpdate {
        ambulance: Entity,
        status: AmbulanceStatus,
    },
    AssignmentMade {
        request: Entity,
        ambulance: Entity,
        needs_approval: bool,
    },
    NewNotification {
        ambulance: Entity,
        supply_name: String,
        current_quantity: i64,
        par_level: i64,
        timestamp_ms: u64,
    },
}

#[derive(Debug, Clone, Error, PartialEq)]
#[error("event delivery failed: {0}")]
pub struct SinkError(pub String);

/// Delivery channel for [DispatchEvent]s. Implementations must be `Send +
/// Sync` so the sink can be stored as a shared resource.
pub trait EventSink: Send + Sync {
    fn deliver(&mut self, event: DispatchEvent) -> Result<(), SinkError>;
}

/// Resource wrapper for the boxed sink.
#[derive(Resource)]
pub struct EventSinkResource(pub Box<dyn EventSink>);

impl EventSinkResource {
    pub fn new(sink: Box<dyn EventSink>) -> Self {
        Self(sink)
    }
}

/// Optional capture buffer: when inserted, [emit] appends a copy of every
/// event here so tests can assert on emissions without a custom sink.
#[derive(Debug, Default, Resource)]
pub struct RecordedEvents(pub Vec<DispatchEvent>);

/// Emit an event through the world's sink. Fire-and-forget: delivery
/// failures are observable in the log but never fail the caller.
pub fn emit(world: &mut World, event: DispatchEvent) {
    if let Some(mut recorded) = world.get_resource_mut::<RecordedEvents>() {
        recorded.0.push(event.clone());
    }
    let mut sink = world.resource_mut::<EventSinkResource>();
    if let Err(err) = sink.0.deliver(event) {
        warn!(%err, "dropping undeliverable dispatch event");
    }
}

/// Default sink: logs every event at debug level.
#[derive(Debug, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn deliver(&mut self, event: DispatchEvent) -> Result<(), SinkError> {
        tracing::debug!(?event, "dispatch event");
        Ok(())
    }
}
