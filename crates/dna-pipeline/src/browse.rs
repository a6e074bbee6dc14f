//! Paged view of an object's raw data.

use dna_core::responses::ObjectPreview;
use dna_synth::TextGenerator;

use crate::{Pipeline, PipelineError};

pub const DEFAULT_PAGE_LIMIT: usize = 15;
pub const MAX_PAGE_LIMIT: usize = 500;

impl<G: TextGenerator> Pipeline<G> {
    /// Rows `offset..offset + limit` of the object's raw file. No step is
    /// applied and nothing is persisted.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::InvalidInput`] if `limit` is outside `1..=500`
    /// - [`PipelineError::NotFound`] for a missing object or data file
    /// - [`PipelineError::Upstream`] if the file cannot be read
    /// - [`PipelineError::Storage`] if the step store fails
    pub async fn preview_object(
        &self,
        object_id: i64,
        offset: usize,
        limit: usize,
    ) -> Result<ObjectPreview, PipelineError> {
        if !(1..=MAX_PAGE_LIMIT).contains(&limit) {
            return Err(PipelineError::InvalidInput(format!(
                "limit must be between 1 and {MAX_PAGE_LIMIT}, got {limit}"
            )));
        }

        let object = self.object(object_id).await?;
        let path = self.data_file(&object)?;
        let dataset = self
            .store
            .load(&path)
            .map_err(|e| PipelineError::Upstream(format!("Failed to load data: {e}")))?;

        tracing::debug!(object_id, offset, limit, total_rows = dataset.row_count(), "object previewed");
        Ok(ObjectPreview {
            object_id,
            columns: dataset.column_names(),
            rows: dataset.page(offset, limit),
            offset,
            limit,
            total_rows: dataset.row_count(),
        })
    }
}
