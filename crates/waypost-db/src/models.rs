//! Database row types map directly to SQLite rows.
//! Distinct from waypost-types models to keep the DB layer independent.
//! Each row type pairs a fixed column list with one mapping function.

use rusqlite::Row;

use waypost_types::models::{Account, Coordinates, Location, Tour};
use waypost_types::timestamp;

use crate::error::StoreError;

pub struct UserRow {
    pub username: String,
    pub password: String,
    pub salt: String,
    pub email: String,
    pub nickname: String,
}

impl UserRow {
    pub const COLUMNS: &'static str = "username, password, salt, email, nickname";

    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            username: row.get(0)?,
            password: row.get(1)?,
            salt: row.get(2)?,
            email: row.get(3)?,
            nickname: row.get(4)?,
        })
    }
}

impl From<UserRow> for Account {
    fn from(row: UserRow) -> Self {
        Self {
            username: row.username,
            password_hash: row.password,
            email: row.email,
            nickname: row.nickname,
        }
    }
}

pub struct LocationRow {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub city: String,
    pub country: String,
    pub street_address: String,
    pub posted_at: i64,
    pub author: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub weather: Option<f64>,
    pub visit_count: i64,
    pub modified_at: Option<i64>,
    pub modification_reason: Option<String>,
}

impl LocationRow {
    pub const COLUMNS: &'static str = "id, name, description, city, country, street_address, \
         posted_at, author, latitude, longitude, weather, visit_count, modified_at, modification_reason";

    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            description: row.get(2)?,
            city: row.get(3)?,
            country: row.get(4)?,
            street_address: row.get(5)?,
            posted_at: row.get(6)?,
            author: row.get(7)?,
            latitude: row.get(8)?,
            longitude: row.get(9)?,
            weather: row.get(10)?,
            visit_count: row.get(11)?,
            modified_at: row.get(12)?,
            modification_reason: row.get(13)?,
        })
    }
}

impl TryFrom<LocationRow> for Location {
    type Error = StoreError;

    fn try_from(row: LocationRow) -> Result<Self, Self::Error> {
        let coordinates = Coordinates::from_pair(row.latitude, row.longitude).map_err(|_| {
            StoreError::DataIntegrity(format!("location {} has half a coordinate pair", row.id))
        })?;
        if coordinates.is_none() && row.weather.is_some() {
            return Err(StoreError::DataIntegrity(format!(
                "location {} has weather without coordinates",
                row.id
            )));
        }

        let posted_at = timestamp::from_millis(row.posted_at)
            .map_err(|e| StoreError::DataIntegrity(format!("location {}: {}", row.id, e)))?;
        let modified_at = row
            .modified_at
            .map(timestamp::from_millis)
            .transpose()
            .map_err(|e| StoreError::DataIntegrity(format!("location {}: {}", row.id, e)))?;

        Ok(Self {
            id: row.id,
            name: row.name,
            description: row.description,
            city: row.city,
            country: row.country,
            street_address: row.street_address,
            posted_at,
            author: row.author,
            coordinates,
            weather: row.weather,
            visit_count: row.visit_count,
            modified_at,
            modification_reason: row.modification_reason,
        })
    }
}

pub struct TourRow {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub location_ids: String,
}

impl TourRow {
    pub const COLUMNS: &'static str = "id, name, description, location_ids";

    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            description: row.get(2)?,
            location_ids: row.get(3)?,
        })
    }
}

impl TryFrom<TourRow> for Tour {
    type Error = StoreError;

    fn try_from(row: TourRow) -> Result<Self, Self::Error> {
        let location_ids = decode_location_ids(&row.location_ids)
            .map_err(|e| StoreError::DataIntegrity(format!("tour {}: {}", row.id, e)))?;

        Ok(Self {
            id: row.id,
            name: row.name,
            description: row.description,
            location_ids,
        })
    }
}

/// `[3, 1, 7]` -> `"3,1,7"`
pub fn encode_location_ids(ids: &[i64]) -> String {
    ids.iter()
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// Inverse of [`encode_location_ids`]. Empty segments (e.g. a trailing comma) are skipped.
pub fn decode_location_ids(raw: &str) -> Result<Vec<i64>, std::num::ParseIntError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::parse)
        .collect()
}
