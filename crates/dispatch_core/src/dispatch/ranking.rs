//! Candidate ranking: the composite fairness/efficiency ordering.
//!
//! Candidates sort by shift length ascending (equitable workload), then idle
//! time descending (rotation), then travel time ascending (proximity as the
//! final tiebreak). Each key is compared in strict priority order.

use std::cmp::Ordering;

use bevy_ecs::prelude::Entity;

/// One eligible unit with the three ranking keys resolved.
#[derive(Debug, Clone)]
pub struct RankedCandidate {
    pub ambulance: Entity,
    pub shift_length_hours: u32,
    pub idle_ms: u64,
    pub travel_minutes: f64,
}

/// Strict composite ordering; the minimum under this order wins the dispatch.
pub fn dispatch_order(a: &RankedCandidate, b: &RankedCandidate) -> Ordering {
    a.shift_length_hours
        .cmp(&b.shift_length_hours)
        .then_with(|| b.idle_ms.cmp(&a.idle_ms))
        .then_with(|| {
            a.travel_minutes
                .partial_cmp(&b.travel_minutes)
                .unwrap_or(Ordering::Equal)
        })
}

/// Sort candidates into dispatch order, best first.
pub fn rank(candidates: &mut [RankedCandidate]) {
    candidates.sort_by(dispatch_order);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(raw: u32, shift: u32, idle_ms: u64, travel: f64) -> RankedCandidate {
        RankedCandidate {
            ambulance: Entity::from_raw(raw),
            shift_length_hours: shift,
            idle_ms,
            travel_minutes: travel,
        }
    }

    #[test]
    fn shorter_shift_wins_over_everything() {
        let mut candidates = vec![
            candidate(1, 12, 5_000_000, 1.0),
            candidate(2, 8, 1_000, 100.0),
        ];
        rank(&mut candidates);
        assert_eq!(candidates[0].ambulance, Entity::from_raw(2));
    }

    #[test]
    fn longer_idle_breaks_shift_ties() {
        let mut candidates = vec![
            candidate(1, 8, 1_000, 1.0),
            candidate(2, 8, 9_000, 50.0),
        ];
        rank(&mut candidates);
        assert_eq!(candidates[0].ambulance, Entity::from_raw(2));
    }

    #[test]
    fn travel_time_is_the_final_tiebreak() {
        let mut candidates = vec![
            candidate(1, 8, 5_000, 20.0),
            candidate(2, 8, 5_000, 5.0),
        ];
        rank(&mut candidates);
        assert_eq!(candidates[0].ambulance, Entity::from_raw(2));
    }

    #[test]
    fn ordering_is_transitive_across_all_three_keys() {
        let mut candidates = vec![
            candidate(1, 10, 1_000, 1.0),
            candidate(2, 8, 1_000, 9.0),
            candidate(3, 8, 4_000, 9.0),
            candidate(4, 8, 4_000, 2.0),
        ];
        rank(&mut candidates);
        let order: Vec<Entity> = candidates.iter().map(|c| c.ambulance).collect();
        assert_eq!(
            order,
            vec![
                Entity::from_raw(4),
                Entity::from_raw(3),
                Entity::from_raw(2),
                Entity::from_raw(1),
            ]
        );
    }
}
