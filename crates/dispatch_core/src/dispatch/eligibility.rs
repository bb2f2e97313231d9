//! Tier eligibility: which units may cover which calls.

use crate::ecs::Tier;

/// A unit of tier T covers a request of tier R iff T = R, or T = R+1 for
/// R below CCT. The asymmetry is deliberate: a call may be covered by the
/// next tier up, never by a lower one, and CCT calls accept only CCT units.
pub fn is_eligible(ambulance_tier: Tier, requested_tier: Tier) -> bool {
    let t = ambulance_tier.level();
    let r = requested_tier.level();
    t == r || (t == r + 1 && requested_tier != Tier::Cct)
}
