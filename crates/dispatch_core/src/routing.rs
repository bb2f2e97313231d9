//! Pluggable travel-time estimators: trait abstraction for routing backends.
//!
//! Three implementations, selectable via [TravelEstimatorKind]:
//!
//! - **[FixedEstimate]**: constant stub pending a real routing provider.
//! - **[HaversineEstimate]**: straight-line distance over a nominal speed.
//! - **`OsrmEstimator`** (feature `osrm`): queries a local/remote OSRM HTTP
//!   endpoint for a road-network duration.
//!
//! The estimator is stored as a `Box<dyn TravelEstimator>` resource; ranking
//! calls it against an immutable candidate snapshot, so a slow backend delays
//! only its own assignment.

use bevy_ecs::prelude::Resource;
use serde::{Deserialize, Serialize};

use crate::spatial::{self, GeoPoint};

/// Trait for travel-time backends. Returns `None` when no estimate is
/// available; the caller substitutes its configured fallback.
pub trait TravelEstimator: Send + Sync {
    fn estimate_minutes(&self, origin: GeoPoint, destination: GeoPoint) -> Option<f64>;
}

/// Resource wrapping a boxed estimator.
#[derive(Resource)]
pub struct TravelEstimatorResource(pub Box<dyn TravelEstimator>);

impl TravelEstimatorResource {
    pub fn new(estimator: Box<dyn TravelEstimator>) -> Self {
        Self(estimator)
    }
}

impl std::ops::Deref for TravelEstimatorResource {
    type Target = dyn TravelEstimator;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

/// Which estimator backend to use. Serializes into scenario parameter sets.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub enum TravelEstimatorKind {
    /// Constant estimate in minutes, regardless of geography.
    Fixed { minutes: f64 },
    /// Haversine distance over a nominal road speed.
    Haversine { speed_kmh: f64 },
    /// OSRM HTTP endpoint (e.g. `"http://localhost:5000"`).
    #[cfg(feature = "osrm")]
    Osrm { endpoint: String },
}

impl Default for TravelEstimatorKind {
    fn default() -> Self {
        TravelEstimatorKind::Fixed {
            minutes: FixedEstimate::DEFAULT_MINUTES,
        }
    }
}

/// Build a boxed estimator from its kind descriptor.
pub fn build_travel_estimator(kind: &TravelEstimatorKind) -> Box<dyn TravelEstimator> {
    match kind {
        TravelEstimatorKind::Fixed { minutes } => Box::new(FixedEstimate(*minutes)),
        TravelEstimatorKind::Haversine { speed_kmh } => Box::new(HaversineEstimate {
            speed_kmh: *speed_kmh,
        }),
        #[cfg(feature = "osrm")]
        TravelEstimatorKind::Osrm { endpoint } => Box::new(osrm::OsrmEstimator::new(endpoint)),
    }
}

/// Constant-estimate stub: every trip takes the same number of minutes.
#[derive(Debug, Clone, Copy)]
pub struct FixedEstimate(pub f64);

impl FixedEstimate {
    pub const DEFAULT_MINUTES: f64 = 12.0;
}

impl Default for FixedEstimate {
    fn default() -> Self {
        Self(Self::DEFAULT_MINUTES)
    }
}

impl TravelEstimator for FixedEstimate {
    fn estimate_minutes(&self, _origin: GeoPoint, _destination: GeoPoint) -> Option<f64> {
        Some(self.0)
    }
}

/// Straight-line estimate over a nominal road speed.
#[derive(Debug, Clone, Copy)]
pub struct HaversineEstimate {
    pub speed_kmh: f64,
}

impl TravelEstimator for HaversineEstimate {
    fn estimate_minutes(&self, origin: GeoPoint, destination: GeoPoint) -> Option<f64> {
        if self.speed_kmh <= 0.0 {
            return None;
        }
        Some(spatial::distance_km(origin, destination) / self.speed_kmh * 60.0)
    }
}

#[cfg(feature = "osrm")]
pub mod osrm {
    //! OSRM-backed estimator over the `/route/v1/driving` endpoint.

    use std::time::Duration;

    use reqwest::blocking::Client;
    use reqwest::Url;
    use serde::Deserialize;
    use thiserror::Error;
    use tracing::warn;

    use super::TravelEstimator;
    use crate::spatial::GeoPoint;

    const REQUEST_TIMEOUT: Duration = Duration::from_secs(3);

    #[derive(Debug, Error)]
    pub enum OsrmError {
        #[error("OSRM HTTP error: {0}")]
        Http(#[from] reqwest::Error),
        #[error("OSRM API error: {0}")]
        Api(String),
        #[error("OSRM returned no route")]
        NoRoute,
    }

    #[derive(Debug, Deserialize)]
    struct OsrmRouteResponse {
        code: String,
        #[serde(default)]
        routes: Vec<OsrmRoute>,
    }

    #[derive(Debug, Deserialize)]
    struct OsrmRoute {
        duration: f64,
    }

    /// Thin HTTP client asking OSRM for a driving duration.
    #[derive(Debug, Clone)]
    pub struct OsrmEstimator {
        client: Client,
        endpoint: String,
    }

    impl OsrmEstimator {
        /// Create an estimator for the given OSRM endpoint
        /// (e.g. `http://localhost:5000`).
        pub fn new(endpoint: &str) -> Self {
            let client = Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .expect("failed to build OSRM client");
            Self {
                client,
                endpoint: endpoint.trim_end_matches('/').to_string(),
            }
        }

        /// Fastest-route duration in minutes between two coordinates.
        pub fn route_minutes(
            &self,
            origin: GeoPoint,
            destination: GeoPoint,
        ) -> Result<f64, OsrmError> {
            let coords = format!(
                "{:.6},{:.6};{:.6},{:.6}",
                origin.lng, origin.lat, destination.lng, destination.lat
            );
            let base = format!("{}/route/v1/driving/{}", self.endpoint, coords);
            let mut url = Url::parse(&base)
                .map_err(|err| OsrmError::Api(format!("failed to build OSRM URL: {}", err)))?;
            url.query_pairs_mut().append_pair("overview", "false");

            let response = self.client.get(url).send()?;
            let parsed: OsrmRouteResponse = response.json()?;
            if parsed.code != "Ok" {
                return Err(OsrmError::Api(parsed.code));
            }
            parsed
                .routes
                .first()
                .map(|route| route.duration / 60.0)
                .ok_or(OsrmError::NoRoute)
        }
    }

    impl TravelEstimator for OsrmEstimator {
        fn estimate_minutes(&self, origin: GeoPoint, destination: GeoPoint) -> Option<f64> {
            match self.route_minutes(origin, destination) {
                Ok(minutes) => Some(minutes),
                Err(err) => {
                    warn!(%err, "OSRM estimate failed; falling back");
                    None
                }
            }
        }
    }
}
