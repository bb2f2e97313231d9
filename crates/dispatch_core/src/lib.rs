//! Emergency ambulance-transport dispatch engine.
//!
//! State lives in a `bevy_ecs` world owned by [engine::DispatchEngine];
//! timed behavior (break reverts) runs off a deadline clock drained before
//! every operation. See the module docs for the state-machine and ranking
//! rules.

pub mod breaks;
pub mod bus;
pub mod care;
pub mod clock;
pub mod closest;
pub mod config;
pub mod dispatch;
pub mod ecs;
pub mod engine;
pub mod error;
pub mod fleet;
pub mod inventory;
pub mod requests;
pub mod routing;
pub mod scenario;
pub mod spatial;
pub mod systems;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;
