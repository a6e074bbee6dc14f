//! Single-step preview.

use dna_core::dataset::Dataset;
use dna_core::entities::TransformationStep;
use dna_core::enums::StepStatus;
use dna_core::responses::StepPreview;
use dna_db::error::DatabaseError;
use dna_synth::{SynthError, Synthesis, TextGenerator};

use crate::{Pipeline, PipelineError};

const PREVIEW_MESSAGE: &str = "Step previewed successfully.";

impl<G: TextGenerator> Pipeline<G> {
    /// Run one step against its object's raw dataset and record the outcome.
    ///
    /// The step ends up `Success` or `Failed`; a failure is written to the
    /// store before the error is returned. Previewing again starts over, and a
    /// failed synthesis clears any command cached by an earlier preview.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::NotFound`] for a missing step, object, or data file
    /// - [`PipelineError::InvalidInput`] for an empty description
    /// - [`PipelineError::Upstream`] if loading, synthesis, or execution fails
    /// - [`PipelineError::Storage`] if the step store fails
    pub async fn preview_step(&self, step_id: i64) -> Result<StepPreview, PipelineError> {
        let step = match self.service.get_step(step_id).await {
            Ok(step) => step,
            Err(DatabaseError::NoResult) => {
                return Err(PipelineError::NotFound(format!(
                    "Transformation step {step_id} not found"
                )));
            }
            Err(e) => return Err(e.into()),
        };

        match self.run(&step).await {
            Ok(preview) => {
                self.service
                    .set_step_status(step.id, StepStatus::Success, None)
                    .await?;
                tracing::info!(
                    step_id,
                    rows = preview.total_rows,
                    pass_through = preview.command.is_none(),
                    "step previewed"
                );
                Ok(preview)
            }
            Err(err) => {
                tracing::warn!(step_id, status = err.status_code(), error = %err, "step preview failed");
                self.service
                    .set_step_status(step.id, StepStatus::Failed, Some(&err.to_string()))
                    .await?;
                Err(err)
            }
        }
    }

    async fn run(&self, step: &TransformationStep) -> Result<StepPreview, PipelineError> {
        let object = self.object(step.object_id).await?;
        let data_path = self.data_file(&object)?;

        if step.description.trim().is_empty() {
            return Err(PipelineError::InvalidInput(format!(
                "Step {} has an empty description",
                step.id
            )));
        }

        let dataset = self
            .store
            .load(&data_path)
            .map_err(|e| PipelineError::Upstream(format!("Failed to load data: {e}")))?;

        let synthesis = match self
            .synthesizer
            .synthesize(&step.description, &dataset.column_names())
            .await
        {
            Ok(synthesis) => synthesis,
            Err(e) => {
                // Publish skips command-less steps; drop the earlier preview's command.
                if step.command.is_some() {
                    self.service.set_step_command(step.id, None).await?;
                    tracing::info!(step_id = step.id, "cleared cached command");
                }
                return Err(match e {
                    SynthError::Rejected { .. } => {
                        PipelineError::Upstream(format!("Synthesis rejected: {e}"))
                    }
                    SynthError::Upstream(_) => PipelineError::Upstream(e.to_string()),
                });
            }
        };

        let command = match synthesis {
            Synthesis::PassThrough => return Ok(self.render(step.id, &dataset, None)),
            Synthesis::Command(command) => command,
        };

        self.service
            .set_step_command(step.id, Some(&command))
            .await?;

        let result = dna_transform::execute(&command, dataset)
            .map_err(|e| PipelineError::Upstream(format!("Failed to execute command: {e}")))?;

        Ok(self.render(step.id, &result, Some(command)))
    }

    fn render(&self, step_id: i64, dataset: &Dataset, command: Option<String>) -> StepPreview {
        StepPreview {
            step_id,
            columns: dataset.column_names(),
            rows: dataset.head(self.preview_limit),
            total_rows: dataset.row_count(),
            command,
            message: PREVIEW_MESSAGE.to_string(),
        }
    }
}
