use chrono::Utc;
use rusqlite::Connection;
use tracing::debug;

use waypost_types::models::{Location, LocationInput, LocationRank, LocationUpdate};
use waypost_types::timestamp;

use crate::error::{Result, StoreError};
use crate::models::LocationRow;
use crate::{Database, OptionalExt};

/// Size of the most-visited ranking served to clients.
pub const TOP_LOCATIONS: u32 = 5;

impl Database {
    // -- Writes --

    /// Insert a new location with a visit count of 1. Returns the assigned id.
    pub fn create_location(&self, input: &LocationInput) -> Result<i64> {
        if input.name.is_empty() {
            return Err(StoreError::Validation("location name is required".into()));
        }
        if input.coordinates.is_none() && input.weather.is_some() {
            return Err(StoreError::Validation("weather requires coordinates".into()));
        }
        let posted_at = timestamp::parse(&input.posted_at)
            .map_err(|e| StoreError::Validation(e.to_string()))?;

        let latitude = input.coordinates.map(|c| c.latitude);
        let longitude = input.coordinates.map(|c| c.longitude);

        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO locations (name, description, city, country, street_address,
                                        posted_at, author, latitude, longitude, weather, visit_count)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, 1)",
                rusqlite::params![
                    input.name,
                    input.description,
                    input.city,
                    input.country,
                    input.street_address,
                    timestamp::to_millis(&posted_at),
                    input.author,
                    latitude,
                    longitude,
                    input.weather,
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// Add one visit. Visiting an id that does not exist is a silent no-op.
    pub fn visit_location(&self, id: i64) -> Result<()> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE locations SET visit_count = visit_count + 1 WHERE id = ?1",
                [id],
            )?;
            if changed == 0 {
                debug!("Visit for unknown location {}", id);
            }
            Ok(())
        })
    }

    /// Rewrite the descriptive fields of a location and stamp the modification.
    /// Weather survives while coordinates are present and is cleared with them.
    pub fn update_location(&self, id: i64, update: &LocationUpdate, reason: &str) -> Result<()> {
        if update.name.is_empty() {
            return Err(StoreError::Validation("location name is required".into()));
        }
        if reason.is_empty() {
            return Err(StoreError::Validation("modification reason is required".into()));
        }

        let latitude = update.coordinates.map(|c| c.latitude);
        let longitude = update.coordinates.map(|c| c.longitude);
        let modified_at = timestamp::to_millis(&Utc::now());

        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE locations
                 SET name = ?1, description = ?2, city = ?3, country = ?4, street_address = ?5,
                     latitude = ?6, longitude = ?7,
                     weather = CASE WHEN ?6 IS NULL THEN NULL ELSE weather END,
                     modified_at = ?8, modification_reason = ?9
                 WHERE id = ?10",
                rusqlite::params![
                    update.name,
                    update.description,
                    update.city,
                    update.country,
                    update.street_address,
                    latitude,
                    longitude,
                    modified_at,
                    reason,
                    id,
                ],
            )?;
            if changed == 0 {
                return Err(StoreError::LocationNotFound(id));
            }
            Ok(())
        })
    }

    // -- Reads --

    pub fn get_location(&self, id: i64) -> Result<Option<Location>> {
        self.with_conn(|conn| query_location(conn, id))
    }

    /// Every stored location, in no particular order.
    pub fn list_locations(&self) -> Result<Vec<Location>> {
        self.with_conn(|conn| {
            let sql = format!("SELECT {} FROM locations", LocationRow::COLUMNS);
            let mut stmt = conn.prepare(&sql)?;

            let rows = stmt
                .query_map([], LocationRow::from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            rows.into_iter().map(Location::try_from).collect()
        })
    }

    /// Up to `limit` locations by visit count, highest first; ties go to the older id.
    pub fn top_locations(&self, limit: u32) -> Result<Vec<LocationRank>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, name, visit_count FROM locations
                 ORDER BY visit_count DESC, id ASC
                 LIMIT ?1",
            )?;

            let rows = stmt
                .query_map([limit], |row| {
                    Ok(LocationRank {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        visit_count: row.get(2)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    pub fn location_exists(&self, id: i64) -> Result<bool> {
        self.with_conn(|conn| location_exists(conn, id))
    }
}

pub(crate) fn query_location(conn: &Connection, id: i64) -> Result<Option<Location>> {
    let sql = format!("SELECT {} FROM locations WHERE id = ?1", LocationRow::COLUMNS);
    let mut stmt = conn.prepare(&sql)?;

    stmt.query_row([id], LocationRow::from_row)
        .optional()?
        .map(Location::try_from)
        .transpose()
}

pub(crate) fn location_exists(conn: &Connection, id: i64) -> Result<bool> {
    let found = conn
        .query_row("SELECT 1 FROM locations WHERE id = ?1", [id], |_| Ok(()))
        .optional()?;
    Ok(found.is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use waypost_types::models::Coordinates;

    const POSTED: &str = "2021-03-04T10:15:30.123Z";

    fn input(name: &str) -> LocationInput {
        LocationInput {
            name: name.into(),
            description: "Cathedral by the market square".into(),
            city: "Oulu".into(),
            country: "Finland".into(),
            street_address: "Kirkkokatu 3".into(),
            posted_at: POSTED.into(),
            author: "Al".into(),
            coordinates: None,
            weather: None,
        }
    }

    fn update(name: &str, coordinates: Option<Coordinates>) -> LocationUpdate {
        LocationUpdate {
            name: name.into(),
            description: "Rebuilt".into(),
            city: "Oulu".into(),
            country: "Finland".into(),
            street_address: "Kirkkokatu 5".into(),
            coordinates,
        }
    }

    fn visit_count(db: &Database, id: i64) -> i64 {
        db.get_location(id).unwrap().unwrap().visit_count
    }

    #[test]
    fn create_then_get_returns_input() {
        let db = Database::open_in_memory().unwrap();
        let mut loc = input("Tuomiokirkko");
        loc.coordinates = Some(Coordinates::new(65.0137, 25.4717));
        loc.weather = Some(-4.25);

        let id = db.create_location(&loc).unwrap();
        let stored = db.get_location(id).unwrap().unwrap();

        assert_eq!(stored.id, id);
        assert_eq!(stored.name, loc.name);
        assert_eq!(stored.description, loc.description);
        assert_eq!(stored.city, loc.city);
        assert_eq!(stored.country, loc.country);
        assert_eq!(stored.street_address, loc.street_address);
        assert_eq!(timestamp::format(&stored.posted_at), POSTED);
        assert_eq!(stored.author, "Al");
        assert_eq!(stored.coordinates, loc.coordinates);
        assert_eq!(stored.weather, Some(-4.25));
        assert_eq!(stored.visit_count, 1);
        assert_eq!(stored.modified_at, None);
        assert_eq!(stored.modification_reason, None);
    }

    #[test]
    fn ids_increase_monotonically() {
        let db = Database::open_in_memory().unwrap();
        let a = db.create_location(&input("a")).unwrap();
        let b = db.create_location(&input("b")).unwrap();
        let c = db.create_location(&input("c")).unwrap();
        assert!(a < b && b < c);
    }

    #[test]
    fn get_unknown_is_none() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.get_location(42).unwrap().is_none());
        assert!(!db.location_exists(42).unwrap());
    }

    // Deliberate deviation: a malformed timestamp used to be stored as epoch zero.
    #[test]
    fn malformed_timestamp_fails_create() {
        let db = Database::open_in_memory().unwrap();
        let mut loc = input("Pier");
        loc.posted_at = "04.03.2021 10:15".into();

        let err = db.create_location(&loc).unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        assert!(db.list_locations().unwrap().is_empty());
    }

    #[test]
    fn weather_without_coordinates_is_rejected() {
        let db = Database::open_in_memory().unwrap();
        let mut loc = input("Pier");
        loc.weather = Some(3.0);

        assert!(matches!(db.create_location(&loc), Err(StoreError::Validation(_))));
        assert!(db.list_locations().unwrap().is_empty());
    }

    #[test]
    fn empty_name_is_rejected() {
        let db = Database::open_in_memory().unwrap();
        assert!(matches!(db.create_location(&input("")), Err(StoreError::Validation(_))));
    }

    #[test]
    fn list_returns_every_location() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.list_locations().unwrap().is_empty());

        for name in ["a", "b", "c"] {
            db.create_location(&input(name)).unwrap();
        }

        let mut names: Vec<_> = db.list_locations().unwrap().into_iter().map(|l| l.name).collect();
        names.sort();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn visits_add_exactly_one_each() {
        let db = Database::open_in_memory().unwrap();
        let id = db.create_location(&input("Pier")).unwrap();

        for _ in 0..7 {
            db.visit_location(id).unwrap();
        }

        assert_eq!(visit_count(&db, id), 8);
    }

    #[test]
    fn visiting_unknown_id_succeeds_and_changes_nothing() {
        let db = Database::open_in_memory().unwrap();
        let id = db.create_location(&input("Pier")).unwrap();
        let before = db.list_locations().unwrap();

        db.visit_location(id + 100).unwrap();

        assert_eq!(db.list_locations().unwrap(), before);
    }

    #[test]
    fn update_rewrites_fields_and_stamps_modification() {
        let db = Database::open_in_memory().unwrap();
        let id = db.create_location(&input("Pier")).unwrap();
        db.visit_location(id).unwrap();

        let coords = Some(Coordinates::new(60.17, 24.94));
        db.update_location(id, &update("New pier", coords), "renamed").unwrap();

        let stored = db.get_location(id).unwrap().unwrap();
        assert_eq!(stored.name, "New pier");
        assert_eq!(stored.description, "Rebuilt");
        assert_eq!(stored.street_address, "Kirkkokatu 5");
        assert_eq!(stored.coordinates, coords);
        assert_eq!(stored.visit_count, 2);
        assert_eq!(stored.modification_reason.as_deref(), Some("renamed"));
        assert!(stored.modified_at.is_some());
        assert_eq!(timestamp::format(&stored.posted_at), POSTED);
    }

    #[test]
    fn update_keeps_weather_with_coordinates_and_clears_it_without() {
        let db = Database::open_in_memory().unwrap();
        let mut loc = input("Pier");
        loc.coordinates = Some(Coordinates::new(65.0, 25.0));
        loc.weather = Some(12.5);
        let id = db.create_location(&loc).unwrap();

        db.update_location(id, &update("Pier", Some(Coordinates::new(65.1, 25.1))), "moved")
            .unwrap();
        assert_eq!(db.get_location(id).unwrap().unwrap().weather, Some(12.5));

        db.update_location(id, &update("Pier", None), "unknown spot").unwrap();
        let stored = db.get_location(id).unwrap().unwrap();
        assert_eq!(stored.coordinates, None);
        assert_eq!(stored.weather, None);
    }

    #[test]
    fn update_unknown_or_invalid_is_rejected() {
        let db = Database::open_in_memory().unwrap();
        let id = db.create_location(&input("Pier")).unwrap();

        assert!(matches!(
            db.update_location(id + 1, &update("x", None), "why"),
            Err(StoreError::LocationNotFound(missing)) if missing == id + 1
        ));
        assert!(matches!(
            db.update_location(id, &update("", None), "why"),
            Err(StoreError::Validation(_))
        ));
        assert!(matches!(
            db.update_location(id, &update("x", None), ""),
            Err(StoreError::Validation(_))
        ));
        assert_eq!(db.get_location(id).unwrap().unwrap().name, "Pier");
    }

    #[test]
    fn top_locations_sorted_and_bounded() {
        let db = Database::open_in_memory().unwrap();
        let visits = [3, 0, 9, 5, 1, 7, 2];
        let mut ids = Vec::new();
        for (i, n) in visits.iter().enumerate() {
            let id = db.create_location(&input(&format!("loc{}", i))).unwrap();
            for _ in 0..*n {
                db.visit_location(id).unwrap();
            }
            ids.push(id);
        }

        let top = db.top_locations(TOP_LOCATIONS).unwrap();
        assert_eq!(top.len(), 5);
        let counts: Vec<_> = top.iter().map(|r| r.visit_count).collect();
        assert_eq!(counts, vec![10, 8, 6, 4, 3]);
        assert_eq!(top[0].id, ids[2]);
        assert_eq!(top[0].name, "loc2");
    }

    #[test]
    fn top_locations_returns_all_when_fewer() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.top_locations(TOP_LOCATIONS).unwrap().is_empty());

        let a = db.create_location(&input("a")).unwrap();
        let b = db.create_location(&input("b")).unwrap();
        db.visit_location(b).unwrap();

        let top = db.top_locations(TOP_LOCATIONS).unwrap();
        assert_eq!(top.iter().map(|r| r.id).collect::<Vec<_>>(), vec![b, a]);
    }

    #[test]
    fn top_location_ties_break_by_id() {
        let db = Database::open_in_memory().unwrap();
        let ids: Vec<_> = (0..3)
            .map(|i| db.create_location(&input(&format!("loc{}", i))).unwrap())
            .collect();

        let top = db.top_locations(TOP_LOCATIONS).unwrap();
        assert_eq!(top.iter().map(|r| r.id).collect::<Vec<_>>(), ids);
    }
}
