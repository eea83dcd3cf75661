use waypost_types::models::{Tour, TourView};

use crate::Database;
use crate::error::{Result, StoreError};
use crate::locations::{location_exists, query_location};
use crate::models::{TourRow, encode_location_ids};

impl Database {
    /// Create a tour over existing locations. Ids keep their order and are
    /// not deduplicated. Returns the assigned tour id.
    ///
    /// A tour must name at least one location: an empty id list is rejected
    /// with `Validation` rather than stored as an empty tour.
    pub fn create_tour(&self, name: &str, description: &str, location_ids: &[i64]) -> Result<i64> {
        if name.is_empty() {
            return Err(StoreError::Validation("tour name is required".into()));
        }
        if location_ids.is_empty() {
            return Err(StoreError::Validation("a tour needs at least one location".into()));
        }

        self.with_conn(|conn| {
            for id in location_ids {
                if !location_exists(conn, *id)? {
                    return Err(StoreError::UnknownLocation(*id));
                }
            }

            conn.execute(
                "INSERT INTO tours (name, description, location_ids) VALUES (?1, ?2, ?3)",
                (name, description, encode_location_ids(location_ids)),
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// Every tour with its locations resolved in tour order.
    pub fn list_tours(&self) -> Result<Vec<TourView>> {
        self.with_conn(|conn| {
            let sql = format!("SELECT {} FROM tours ORDER BY id", TourRow::COLUMNS);
            let mut stmt = conn.prepare(&sql)?;

            let rows = stmt
                .query_map([], TourRow::from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            let mut views = Vec::with_capacity(rows.len());
            for row in rows {
                let tour = Tour::try_from(row)?;

                let mut locations = Vec::with_capacity(tour.location_ids.len());
                for id in &tour.location_ids {
                    let location = query_location(conn, *id)?.ok_or_else(|| {
                        StoreError::DataIntegrity(format!("tour {} references missing location {}", tour.id, id))
                    })?;
                    locations.push(location);
                }

                views.push(TourView {
                    id: tour.id,
                    name: tour.name,
                    description: tour.description,
                    locations,
                });
            }

            Ok(views)
        })
    }
}
