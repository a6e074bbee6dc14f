//! Service layer the pipeline talks to.
//!
//! `DnaService` wraps `DnaDb`. All repo methods are implemented as
//! `impl DnaService` blocks under [`crate::repos`].

use crate::DnaDb;
use crate::error::DatabaseError;

/// Narrow persistence interface for objects and steps.
pub struct DnaService {
    db: DnaDb,
}

impl DnaService {
    /// Create a new service over a local database file (or `":memory:"`).
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn new_local(db_path: &str) -> Result<Self, DatabaseError> {
        let db = DnaDb::open_local(db_path).await?;
        Ok(Self { db })
    }

    /// Create from an existing `DnaDb`.
    #[must_use]
    pub const fn from_db(db: DnaDb) -> Self {
        Self { db }
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &DnaDb {
        &self.db
    }
}
