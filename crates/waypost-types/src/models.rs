use chrono::{DateTime, Utc};
use thiserror::Error;

/// A latitude/longitude pair. Locations carry either both or neither.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("latitude and longitude must be given together")]
pub struct MismatchedCoordinates;

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Pair up two optional halves, rejecting a lone latitude or longitude.
    pub fn from_pair(
        latitude: Option<f64>,
        longitude: Option<f64>,
    ) -> Result<Option<Self>, MismatchedCoordinates> {
        match (latitude, longitude) {
            (Some(latitude), Some(longitude)) => Ok(Some(Self { latitude, longitude })),
            (None, None) => Ok(None),
            _ => Err(MismatchedCoordinates),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub username: String,
    pub password_hash: String,
    pub email: String,
    pub nickname: String,
}

/// Everything needed to post a new location.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationInput {
    pub name: String,
    pub description: String,
    pub city: String,
    pub country: String,
    pub street_address: String,
    /// Wire-format posting time, see [`crate::timestamp`].
    pub posted_at: String,
    /// Nickname of the posting account.
    pub author: String,
    pub coordinates: Option<Coordinates>,
    pub weather: Option<f64>,
}

/// Fields rewritten by a location update.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationUpdate {
    pub name: String,
    pub description: String,
    pub city: String,
    pub country: String,
    pub street_address: String,
    pub coordinates: Option<Coordinates>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub city: String,
    pub country: String,
    pub street_address: String,
    pub posted_at: DateTime<Utc>,
    pub author: String,
    pub coordinates: Option<Coordinates>,
    pub weather: Option<f64>,
    pub visit_count: i64,
    pub modified_at: Option<DateTime<Utc>>,
    pub modification_reason: Option<String>,
}

/// One entry of the most-visited ranking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationRank {
    pub id: i64,
    pub name: String,
    pub visit_count: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tour {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub location_ids: Vec<i64>,
}

/// A tour with its locations resolved, in tour order.
#[derive(Debug, Clone, PartialEq)]
pub struct TourView {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub locations: Vec<Location>,
}
