use anyhow::Result;

use colorsense_contracts::query::ColorFilter;
use colorsense_contracts::records::ColorRecord;

mod migrations;
mod sqlite;

pub use sqlite::SqliteColorStore;

/// Persistent collection of color records.
///
/// Records keep insertion order. Codes are not unique: repeated ingestion
/// runs append duplicates.
pub trait ColorStore: Send + Sync {
    fn insert_one(&self, record: &ColorRecord) -> Result<()>;
    fn count(&self, filter: &ColorFilter) -> Result<u64>;
    /// Matching records in insertion order, after skipping `skip`, at most `limit`.
    fn find(&self, filter: &ColorFilter, skip: u64, limit: u64) -> Result<Vec<ColorRecord>>;
    /// The earliest inserted record with this exact code.
    fn find_by_code(&self, code: &str) -> Result<Option<ColorRecord>>;
    fn ping(&self) -> Result<()>;
}
