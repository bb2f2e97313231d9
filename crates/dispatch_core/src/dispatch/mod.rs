pub mod eligibility;
pub mod engine;
pub mod ranking;

pub use eligibility::is_eligible;
pub use engine::{assign_ambulance, Assignment};
pub use ranking::{dispatch_order, RankedCandidate};
