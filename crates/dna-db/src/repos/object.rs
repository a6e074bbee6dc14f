//! Object repository: the catalog the pipeline reads data locations from.

use chrono::Utc;

use dna_core::entities::{DataObject, NewObject};

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_datetime, parse_opt_enum};
use crate::service::DnaService;

const SELECT_COLS: &str =
    "id, category, name, connector, system_id, data_layer, data_path, created_at";

fn row_to_object(row: &libsql::Row) -> Result<DataObject, DatabaseError> {
    Ok(DataObject {
        id: row.get(0)?,
        category: row.get(1)?,
        name: row.get(2)?,
        connector: row.get(3)?,
        system_id: row.get(4)?,
        data_layer: parse_opt_enum(row, 5)?,
        data_path: get_opt_string(row, 6)?,
        created_at: parse_datetime(&row.get::<String>(7)?)?,
    })
}

impl DnaService {
    pub async fn create_object(&self, new: &NewObject) -> Result<DataObject, DatabaseError> {
        let now = Utc::now();

        self.db()
            .conn()
            .execute(
                "INSERT INTO objects (category, name, connector, system_id, data_layer, data_path, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                libsql::params![
                    new.category.as_str(),
                    new.name.as_str(),
                    new.connector.as_str(),
                    new.system_id,
                    new.data_layer.map(|l| l.as_str()),
                    new.data_path.as_deref(),
                    now.to_rfc3339()
                ],
            )
            .await?;
        let id = self.db().conn().last_insert_rowid();

        tracing::info!(object_id = id, name = %new.name, "registered object");
        self.get_object(id).await
    }

    pub async fn get_object(&self, id: i64) -> Result<DataObject, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM objects WHERE id = ?1"),
                [id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_object(&row)
    }

    pub async fn list_objects(&self) -> Result<Vec<DataObject>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(&format!("SELECT {SELECT_COLS} FROM objects ORDER BY id"), ())
            .await?;

        let mut objects = Vec::new();
        while let Some(row) = rows.next().await? {
            objects.push(row_to_object(&row)?);
        }
        Ok(objects)
    }

    /// Point an object at a new data file.
    pub async fn set_object_data_path(
        &self,
        id: i64,
        data_path: &str,
    ) -> Result<DataObject, DatabaseError> {
        let changed = self
            .db()
            .conn()
            .execute(
                "UPDATE objects SET data_path = ?1 WHERE id = ?2",
                libsql::params![data_path, id],
            )
            .await?;
        if changed == 0 {
            return Err(DatabaseError::NoResult);
        }
        self.get_object(id).await
    }
}
