use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use rusqlite_migration::{Migrations, M};

use crate::app::{Result, ScoutError};
use crate::domain::{Brand, GpuCanonicalRecord, SoldListing};
use crate::store::Store;

const GPU_COLUMNS: &str = "identifier, general_model, image, brand, manufacturer, memory_type,
     memory_size, product_code, power_consumption, dimensions, created_at";

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.run_migrations()?;
        Ok(store)
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.run_migrations()?;
        Ok(store)
    }

    fn run_migrations(&self) -> Result<()> {
        let migrations = Migrations::new(vec![M::up(include_str!(
            "../../migrations/001-initial/up.sql"
        ))]);

        let mut conn = self.lock()?;

        conn.execute("PRAGMA foreign_keys = ON", [])?;
        migrations
            .to_latest(&mut conn)
            .map_err(|_| ScoutError::Database(rusqlite::Error::InvalidQuery))?;

        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|e| {
            ScoutError::Database(rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(1),
                Some(e.to_string()),
            ))
        })
    }

    fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| s.parse::<DateTime<Utc>>().ok())
    }

    fn gpu_from_row(row: &Row<'_>) -> rusqlite::Result<GpuCanonicalRecord> {
        Ok(GpuCanonicalRecord {
            identifier: row.get(0)?,
            general_model: row.get(1)?,
            image: row.get(2)?,
            brand: Brand::parse(&row.get::<_, String>(3)?),
            manufacturer: row.get(4)?,
            memory_type: row.get(5)?,
            memory_size: row.get(6)?,
            product_code: row.get(7)?,
            power_consumption: row.get(8)?,
            dimensions: row.get(9)?,
            created_at: row
                .get::<_, String>(10)
                .ok()
                .and_then(|s| Self::parse_datetime(&s))
                .unwrap_or_else(Utc::now),
        })
    }

    fn listing_from_row(row: &Row<'_>) -> rusqlite::Result<SoldListing> {
        Ok(SoldListing {
            identifier: row.get(0)?,
            vendor_name: row.get(1)?,
            link: row.get(2)?,
            price: row.get(3)?,
            original_name: row.get(4)?,
            variant_label: row.get(5)?,
            scraped_at: row
                .get::<_, String>(6)
                .ok()
                .and_then(|s| Self::parse_datetime(&s))
                .unwrap_or_else(Utc::now),
        })
    }
}

impl Store for SqliteStore {
    fn upsert_canonical_record(&self, record: &GpuCanonicalRecord) -> Result<bool> {
        let conn = self.lock()?;

        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM gpus WHERE identifier = ?1)",
            params![record.identifier],
            |row| row.get(0),
        )?;

        if exists {
            // Canonical attributes are fixed at first sight. Only fields that
            // enrichment can supply may fill a gap later.
            conn.execute(
                "UPDATE gpus SET
                    memory_type = COALESCE(memory_type, ?2),
                    memory_size = COALESCE(memory_size, ?3),
                    power_consumption = COALESCE(power_consumption, ?4),
                    dimensions = COALESCE(dimensions, ?5)
                 WHERE identifier = ?1",
                params![
                    record.identifier,
                    record.memory_type,
                    record.memory_size,
                    record.power_consumption,
                    record.dimensions,
                ],
            )?;
            return Ok(false);
        }

        conn.execute(
            &format!(
                "INSERT INTO gpus ({GPU_COLUMNS})
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)"
            ),
            params![
                record.identifier,
                record.general_model,
                record.image,
                record.brand.as_str(),
                record.manufacturer,
                record.memory_type,
                record.memory_size,
                record.product_code,
                record.power_consumption,
                record.dimensions,
                record.created_at.to_rfc3339(),
            ],
        )?;

        Ok(true)
    }

    fn get_gpu(&self, identifier: &str) -> Result<Option<GpuCanonicalRecord>> {
        let conn = self.lock()?;

        let result = conn
            .query_row(
                &format!("SELECT {GPU_COLUMNS} FROM gpus WHERE identifier = ?1"),
                params![identifier],
                Self::gpu_from_row,
            )
            .optional()?;

        Ok(result)
    }

    fn get_all_gpus(&self) -> Result<Vec<GpuCanonicalRecord>> {
        let conn = self.lock()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {GPU_COLUMNS} FROM gpus ORDER BY brand, general_model, identifier"
        ))?;

        let gpus = stmt
            .query_map([], Self::gpu_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(gpus)
    }

    fn insert_sold_listing(&self, listing: &SoldListing) -> Result<i64> {
        let conn = self.lock()?;

        conn.execute(
            "INSERT INTO sold_by (identifier_id, vendor_name, link, price, original_name, variant_label, scraped_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                listing.identifier,
                listing.vendor_name,
                listing.link,
                listing.price,
                listing.original_name,
                listing.variant_label,
                listing.scraped_at.to_rfc3339(),
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    fn get_sold_listings(&self, identifier: &str) -> Result<Vec<SoldListing>> {
        let conn = self.lock()?;

        let mut stmt = conn.prepare(
            "SELECT identifier_id, vendor_name, link, price, original_name, variant_label, scraped_at
             FROM sold_by WHERE identifier_id = ?1 ORDER BY scraped_at DESC, id DESC",
        )?;

        let listings = stmt
            .query_map(params![identifier], Self::listing_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(listings)
    }

    fn count_sold_listings(&self, identifier: &str) -> Result<i64> {
        let conn = self.lock()?;

        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM sold_by WHERE identifier_id = ?1",
            params![identifier],
            |row| row.get(0),
        )?;

        Ok(count)
    }
}
