#![allow(dead_code)]

use dispatch_core::bus::RecordedEvents;
use dispatch_core::config::EngineConfig;
use dispatch_core::engine::DispatchEngine;
use dispatch_core::spatial::GeoPoint;

/// Builder for engines used in integration tests: event recording enabled,
/// one hospital registered, configurable engine knobs.
#[derive(Debug, Default)]
pub struct TestEngineBuilder {
    config: EngineConfig,
    hospitals: Vec<(String, GeoPoint)>,
}

pub const HOSPITAL: &str = "general";

/// Downtown San Francisco; all test geometry is relative to this point.
pub fn hospital_point() -> GeoPoint {
    GeoPoint::new(37.7749, -122.4194)
}

impl TestEngineBuilder {
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
            hospitals: vec![(HOSPITAL.to_string(), hospital_point())],
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_hospital(mut self, id: &str, point: GeoPoint) -> Self {
        self.hospitals.push((id.to_string(), point));
        self
    }

    pub fn build(self) -> DispatchEngine {
        let mut engine = DispatchEngine::with_config(self.config);
        engine
            .world_mut()
            .insert_resource(RecordedEvents::default());
        for (id, point) in self.hospitals {
            engine.register_hospital(&id, point);
        }
        engine
    }
}

/// Shorthand for the default test engine.
pub fn test_engine() -> DispatchEngine {
    TestEngineBuilder::new().build()
}

/// Events recorded since engine construction.
pub fn recorded(engine: &DispatchEngine) -> Vec<dispatch_core::bus::DispatchEvent> {
    engine.world().resource::<RecordedEvents>().0.clone()
}
