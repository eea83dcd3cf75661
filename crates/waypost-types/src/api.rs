//! Request and response bodies. Field names follow the JSON the mobile
//! client already speaks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Location, LocationRank, TourView};
use crate::timestamp;

// -- Registration --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub email: String,
    #[serde(rename = "userNickname")]
    pub nickname: String,
}

// -- Locations --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateLocationRequest {
    #[serde(rename = "locationName")]
    pub name: String,
    #[serde(rename = "locationDescription")]
    pub description: String,
    #[serde(rename = "locationCity")]
    pub city: String,
    #[serde(rename = "locationCountry")]
    pub country: String,
    #[serde(rename = "locationStreetAddress")]
    pub street_address: String,
    #[serde(rename = "originalPostingTime")]
    pub posted_at: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct CreateLocationResponse {
    #[serde(rename = "locationID")]
    pub id: i64,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateLocationRequest {
    #[serde(rename = "locationName")]
    pub name: String,
    #[serde(rename = "locationDescription")]
    pub description: String,
    #[serde(rename = "locationCity")]
    pub city: String,
    #[serde(rename = "locationCountry")]
    pub country: String,
    #[serde(rename = "locationStreetAddress")]
    pub street_address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(rename = "modificationReason")]
    pub reason: String,
}

#[derive(Debug, Serialize)]
pub struct LocationResponse {
    #[serde(rename = "locationID")]
    pub id: i64,
    #[serde(rename = "locationName")]
    pub name: String,
    #[serde(rename = "locationDescription")]
    pub description: String,
    #[serde(rename = "locationCity")]
    pub city: String,
    #[serde(rename = "locationCountry")]
    pub country: String,
    #[serde(rename = "locationStreetAddress")]
    pub street_address: String,
    #[serde(rename = "originalPoster")]
    pub author: String,
    #[serde(rename = "originalPostingTime", with = "timestamp::wire")]
    pub posted_at: DateTime<Utc>,
    #[serde(rename = "timesVisited")]
    pub visit_count: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather: Option<f64>,
    #[serde(
        rename = "lastModified",
        skip_serializing_if = "Option::is_none",
        serialize_with = "timestamp::wire::option::serialize"
    )]
    pub modified_at: Option<DateTime<Utc>>,
    #[serde(rename = "modificationReason", skip_serializing_if = "Option::is_none")]
    pub modification_reason: Option<String>,
}

impl From<Location> for LocationResponse {
    fn from(location: Location) -> Self {
        Self {
            id: location.id,
            name: location.name,
            description: location.description,
            city: location.city,
            country: location.country,
            street_address: location.street_address,
            author: location.author,
            posted_at: location.posted_at,
            visit_count: location.visit_count,
            latitude: location.coordinates.map(|c| c.latitude),
            longitude: location.coordinates.map(|c| c.longitude),
            weather: location.weather,
            modified_at: location.modified_at,
            modification_reason: location.modification_reason,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TopLocationResponse {
    #[serde(rename = "locationID")]
    pub id: i64,
    #[serde(rename = "locationName")]
    pub name: String,
    #[serde(rename = "timesVisited")]
    pub visit_count: i64,
}

impl From<LocationRank> for TopLocationResponse {
    fn from(rank: LocationRank) -> Self {
        Self {
            id: rank.id,
            name: rank.name,
            visit_count: rank.visit_count,
        }
    }
}

// -- Tours --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateTourRequest {
    #[serde(rename = "tourName")]
    pub name: String,
    #[serde(rename = "tourDescription")]
    pub description: String,
    #[serde(rename = "locationIDs")]
    pub location_ids: Vec<i64>,
}

#[derive(Debug, Serialize)]
pub struct CreateTourResponse {
    #[serde(rename = "tourID")]
    pub id: i64,
}

#[derive(Debug, Serialize)]
pub struct TourResponse {
    #[serde(rename = "tourID")]
    pub id: i64,
    #[serde(rename = "tourName")]
    pub name: String,
    #[serde(rename = "tourDescription")]
    pub description: String,
    pub locations: Vec<LocationResponse>,
}

impl From<TourView> for TourResponse {
    fn from(tour: TourView) -> Self {
        Self {
            id: tour.id,
            name: tour.name,
            description: tour.description,
            locations: tour.locations.into_iter().map(LocationResponse::from).collect(),
        }
    }
}
