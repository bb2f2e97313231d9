//! Components: ambulances, transport requests, and their status machines.

use bevy_ecs::prelude::{Component, Entity};
use serde::{Deserialize, Serialize};

use crate::spatial::GeoPoint;

/// Ambulance capability class. Level 1 is the lowest (wheelchair van),
/// level 4 (critical care transport) the highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tier {
    Wheelchair,
    Bls,
    Als,
    Cct,
}

impl Tier {
    pub const ALL: [Tier; 4] = [Tier::Wheelchair, Tier::Bls, Tier::Als, Tier::Cct];

    /// Numeric designation level, 1..=4.
    pub fn level(self) -> u8 {
        match self {
            Tier::Wheelchair => 1,
            Tier::Bls => 2,
            Tier::Als => 3,
            Tier::Cct => 4,
        }
    }

    /// Call-type name as it appears on incoming requests.
    pub fn call_type(self) -> &'static str {
        match self {
            Tier::Wheelchair => "Wheelchair",
            Tier::Bls => "BLS",
            Tier::Als => "ALS",
            Tier::Cct => "CCT",
        }
    }

    pub fn from_call_type(call_type: &str) -> Option<Tier> {
        match call_type {
            "Wheelchair" => Some(Tier::Wheelchair),
            "BLS" => Some(Tier::Bls),
            "ALS" => Some(Tier::Als),
            "CCT" => Some(Tier::Cct),
            _ => None,
        }
    }
}

/// The six named operational states of an ambulance. The cycle closes back to
/// `Available` only through an explicit status update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmbulanceStatus {
    Available,
    EnRoute,
    OnScene,
    ArrivedAtPatient,
    Transporting,
    Completed,
}

impl AmbulanceStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AmbulanceStatus::Available => "available",
            AmbulanceStatus::EnRoute => "en_route",
            AmbulanceStatus::OnScene => "on_scene",
            AmbulanceStatus::ArrivedAtPatient => "arrived_at_patient",
            AmbulanceStatus::Transporting => "transporting",
            AmbulanceStatus::Completed => "completed",
        }
    }

    pub fn parse(value: &str) -> Option<AmbulanceStatus> {
        match value {
            "available" => Some(AmbulanceStatus::Available),
            "en_route" => Some(AmbulanceStatus::EnRoute),
            "on_scene" => Some(AmbulanceStatus::OnScene),
            "arrived_at_patient" => Some(AmbulanceStatus::ArrivedAtPatient),
            "transporting" => Some(AmbulanceStatus::Transporting),
            "completed" => Some(AmbulanceStatus::Completed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Component)]
pub struct Ambulance {
    /// Unique display name (radio call sign).
    pub name: String,
    pub status: AmbulanceStatus,
    pub tier: Tier,
    pub shift_length_hours: u32,
    /// Engine time when the current shift began.
    pub shift_start_ms: u64,
    /// Engine time when the last call was completed, if any.
    pub last_call_end_ms: Option<u64>,
    /// Valid only while `status == Available`.
    pub on_break: bool,
    /// The request this unit is currently committed to, if any.
    pub active_request: Option<Entity>,
}

impl Ambulance {
    /// Start of the current idle period: the later of shift start and last
    /// call end.
    pub fn idle_since_ms(&self) -> u64 {
        self.last_call_end_ms
            .map_or(self.shift_start_ms, |end| end.max(self.shift_start_ms))
    }

    /// Idle milliseconds as of `now_ms`; never negative.
    pub fn idle_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.idle_since_ms())
    }

    /// Eligible to receive a dispatch: available and not resting.
    pub fn is_dispatchable(&self) -> bool {
        self.status == AmbulanceStatus::Available && !self.on_break
    }
}

/// Last reported geographic position of an ambulance.
#[derive(Debug, Clone, Copy, PartialEq, Component)]
pub struct Position(pub GeoPoint);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    Assigned,
    InProgress,
    Completed,
}

impl RequestStatus {
    pub fn is_terminal(self) -> bool {
        self == RequestStatus::Completed
    }
}

#[derive(Debug, Clone, Component)]
pub struct TransportRequest {
    pub patient_name: String,
    pub patient_age: u32,
    pub chief_complaint: String,
    pub requested_tier: Tier,
    pub hospital_id: String,
    pub hospital_location: GeoPoint,
    pub status: RequestStatus,
    /// The committed ambulance, set on assignment and kept afterwards.
    pub assigned: Option<Entity>,
    /// True iff the assigned tier exceeds the requested tier.
    pub needs_approval: bool,
    pub created_at_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_levels_span_one_to_four() {
        let levels: Vec<u8> = Tier::ALL.iter().map(|t| t.level()).collect();
        assert_eq!(levels, vec![1, 2, 3, 4]);
    }

    #[test]
    fn call_type_round_trips() {
        for tier in Tier::ALL {
            assert_eq!(Tier::from_call_type(tier.call_type()), Some(tier));
        }
        assert_eq!(Tier::from_call_type("Helicopter"), None);
    }

    #[test]
    fn status_parse_accepts_only_the_six_named_states() {
        for status in [
            AmbulanceStatus::Available,
            AmbulanceStatus::EnRoute,
            AmbulanceStatus::OnScene,
            AmbulanceStatus::ArrivedAtPatient,
            AmbulanceStatus::Transporting,
            AmbulanceStatus::Completed,
        ] {
            assert_eq!(AmbulanceStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(AmbulanceStatus::parse("enroute"), None);
        assert_eq!(AmbulanceStatus::parse("on break"), None);
    }

    #[test]
    fn idle_time_uses_the_later_of_shift_start_and_last_call_end() {
        let mut ambulance = Ambulance {
            name: "Medic-1".to_string(),
            status: AmbulanceStatus::Available,
            tier: Tier::Als,
            shift_length_hours: 12,
            shift_start_ms: 1_000,
            last_call_end_ms: None,
            on_break: false,
            active_request: None,
        };
        assert_eq!(ambulance.idle_ms(5_000), 4_000);

        ambulance.last_call_end_ms = Some(3_000);
        assert_eq!(ambulance.idle_ms(5_000), 2_000);

        // A stale last_call_end before shift start does not win.
        ambulance.last_call_end_ms = Some(500);
        assert_eq!(ambulance.idle_ms(5_000), 4_000);

        // Never negative, even if now precedes the idle anchor.
        assert_eq!(ambulance.idle_ms(0), 0);
    }
}
