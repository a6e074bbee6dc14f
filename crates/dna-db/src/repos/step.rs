//! Transformation step repository: append, ordered listing, partial updates.
//!
//! Order is assigned at insert time as `count(steps of object) + 1` and never
//! renumbered, so after a delete the sequence is sparse and may even repeat a
//! value. Listings sort by `(step_order, id)`.

use chrono::Utc;

use dna_core::entities::{StepEvent, TransformationStep};
use dna_core::enums::StepStatus;
use dna_core::{HEADER_PROMOTION_DESCRIPTION, HEADER_PROMOTION_NAME};

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_datetime, parse_enum};
use crate::service::DnaService;

const SELECT_COLS: &str = "id, object_id, step_name, step_description, step_order, \
     step_command, status, created_at, updated_at";

fn row_to_step(row: &libsql::Row) -> Result<TransformationStep, DatabaseError> {
    Ok(TransformationStep {
        id: row.get(0)?,
        object_id: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        order: row.get(4)?,
        command: get_opt_string(row, 5)?,
        status: parse_enum(&row.get::<String>(6)?)?,
        created_at: parse_datetime(&row.get::<String>(7)?)?,
        updated_at: parse_datetime(&row.get::<String>(8)?)?,
    })
}

fn row_to_event(row: &libsql::Row) -> Result<StepEvent, DatabaseError> {
    Ok(StepEvent {
        id: row.get(0)?,
        step_id: row.get(1)?,
        from_status: parse_enum(&row.get::<String>(2)?)?,
        to_status: parse_enum(&row.get::<String>(3)?)?,
        detail: get_opt_string(row, 4)?,
        created_at: parse_datetime(&row.get::<String>(5)?)?,
    })
}

impl DnaService {
    /// Append a step to the end of an object's pipeline.
    ///
    /// The count and insert run as one statement.
    pub async fn append_step(
        &self,
        object_id: i64,
        name: &str,
        description: &str,
    ) -> Result<TransformationStep, DatabaseError> {
        let now = Utc::now().to_rfc3339();

        self.db()
            .conn()
            .execute(
                "INSERT INTO transformation_steps
                    (object_id, step_name, step_description, step_order, status, created_at, updated_at)
                 VALUES (
                    ?1, ?2, ?3,
                    (SELECT COUNT(*) FROM transformation_steps WHERE object_id = ?1) + 1,
                    ?4, ?5, ?5
                 )",
                libsql::params![
                    object_id,
                    name,
                    description,
                    StepStatus::Open.as_str(),
                    now
                ],
            )
            .await?;
        let id = self.db().conn().last_insert_rowid();

        let step = self.get_step(id).await?;
        tracing::info!(step_id = id, object_id, order = step.order, "appended step");
        Ok(step)
    }

    /// Append the "First Row Promote to Header" preset step.
    pub async fn append_header_promotion(
        &self,
        object_id: i64,
    ) -> Result<TransformationStep, DatabaseError> {
        self.append_step(object_id, HEADER_PROMOTION_NAME, HEADER_PROMOTION_DESCRIPTION)
            .await
    }

    pub async fn get_step(&self, id: i64) -> Result<TransformationStep, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM transformation_steps WHERE id = ?1"),
                [id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_step(&row)
    }

    /// All steps of an object in replay order.
    pub async fn list_steps(
        &self,
        object_id: i64,
    ) -> Result<Vec<TransformationStep>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM transformation_steps
                     WHERE object_id = ?1 ORDER BY step_order, id"
                ),
                [object_id],
            )
            .await?;

        let mut steps = Vec::new();
        while let Some(row) = rows.next().await? {
            steps.push(row_to_step(&row)?);
        }
        Ok(steps)
    }

    /// Delete one step. Remaining steps keep their order values.
    pub async fn remove_step(&self, id: i64) -> Result<(), DatabaseError> {
        let removed = self
            .db()
            .conn()
            .execute("DELETE FROM transformation_steps WHERE id = ?1", [id])
            .await?;
        if removed == 0 {
            return Err(DatabaseError::NoResult);
        }
        self.db()
            .conn()
            .execute("DELETE FROM step_events WHERE step_id = ?1", [id])
            .await?;

        tracing::info!(step_id = id, "removed step");
        Ok(())
    }

    /// Persist a new status and record the change in the step's history.
    ///
    /// `detail` carries the failure reason, if any.
    pub async fn set_step_status(
        &self,
        id: i64,
        status: StepStatus,
        detail: Option<&str>,
    ) -> Result<TransformationStep, DatabaseError> {
        let current = self.get_step(id).await?;

        if !current.status.can_transition_to(status) {
            return Err(DatabaseError::InvalidState(format!(
                "Cannot transition step {id} from {} to {status}",
                current.status
            )));
        }

        let now = Utc::now();
        self.db()
            .conn()
            .execute(
                "UPDATE transformation_steps SET status = ?1, updated_at = ?2 WHERE id = ?3",
                libsql::params![status.as_str(), now.to_rfc3339(), id],
            )
            .await?;

        self.db()
            .conn()
            .execute(
                "INSERT INTO step_events (step_id, from_status, to_status, detail, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                libsql::params![
                    id,
                    current.status.as_str(),
                    status.as_str(),
                    detail,
                    now.to_rfc3339()
                ],
            )
            .await?;

        tracing::info!(step_id = id, from = %current.status, to = %status, "step status changed");
        Ok(TransformationStep {
            status,
            updated_at: now,
            ..current
        })
    }

    /// Persist (or clear) the step's accepted command.
    pub async fn set_step_command(
        &self,
        id: i64,
        command: Option<&str>,
    ) -> Result<TransformationStep, DatabaseError> {
        let now = Utc::now();
        let changed = self
            .db()
            .conn()
            .execute(
                "UPDATE transformation_steps SET step_command = ?1, updated_at = ?2 WHERE id = ?3",
                libsql::params![command, now.to_rfc3339(), id],
            )
            .await?;
        if changed == 0 {
            return Err(DatabaseError::NoResult);
        }
        self.get_step(id).await
    }

    /// Status history of a step, oldest first.
    pub async fn list_step_events(&self, step_id: i64) -> Result<Vec<StepEvent>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT id, step_id, from_status, to_status, detail, created_at
                 FROM step_events WHERE step_id = ?1 ORDER BY id",
                [step_id],
            )
            .await?;

        let mut events = Vec::new();
        while let Some(row) = rows.next().await? {
            events.push(row_to_event(&row)?);
        }
        Ok(events)
    }
}
