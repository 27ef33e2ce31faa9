pub mod sqlite;

use crate::app::Result;
use crate::domain::{GpuCanonicalRecord, SoldListing};

pub use sqlite::SqliteStore;

pub trait Store {
    // Canonical GPU operations
    /// Insert the record. For an existing one, only empty memory, power and
    /// dimension columns are filled; everything else stays as first stored.
    /// Returns true when a new row was created.
    fn upsert_canonical_record(&self, record: &GpuCanonicalRecord) -> Result<bool>;
    fn get_gpu(&self, identifier: &str) -> Result<Option<GpuCanonicalRecord>>;
    fn get_all_gpus(&self) -> Result<Vec<GpuCanonicalRecord>>;

    // Listing operations
    fn insert_sold_listing(&self, listing: &SoldListing) -> Result<i64>;
    fn get_sold_listings(&self, identifier: &str) -> Result<Vec<SoldListing>>;
    fn count_sold_listings(&self, identifier: &str) -> Result<i64>;
}
