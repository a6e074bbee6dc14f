//! Bronze-to-silver publish.

use dna_core::responses::PublishResult;
use dna_db::error::DatabaseError;
use dna_synth::TextGenerator;

use crate::Pipeline;

impl<G: TextGenerator> Pipeline<G> {
    /// Replay an object's stored commands over its raw data and write the
    /// result to the silver tier.
    ///
    /// Failures come back as a failed [`PublishResult`]; nothing is written
    /// unless every command applies. Steps without a command (pass-through or
    /// never previewed) are skipped. No text generation happens here.
    pub async fn publish(&self, object_id: i64) -> PublishResult {
        let result = self.replay(object_id).await;
        if result.is_success() {
            tracing::info!(
                object_id,
                steps_applied = result.steps_applied,
                output = result.output_path.as_deref().unwrap_or_default(),
                "published object"
            );
        } else {
            tracing::warn!(
                object_id,
                failed_step = result.failed_step,
                message = %result.message,
                "publish failed"
            );
        }
        result
    }

    async fn replay(&self, object_id: i64) -> PublishResult {
        let object = match self.service.get_object(object_id).await {
            Ok(object) => object,
            Err(DatabaseError::NoResult) => return PublishResult::failed("Object not found."),
            Err(e) => return PublishResult::failed(format!("Failed to load object: {e}")),
        };

        let steps = match self.service.list_steps(object_id).await {
            Ok(steps) if steps.is_empty() => {
                return PublishResult::failed("No transformation steps found for this object.");
            }
            Ok(steps) => steps,
            Err(e) => return PublishResult::failed(format!("Failed to load steps: {e}")),
        };

        let Some(input) = self.raw_path(&object) else {
            return PublishResult::failed("Original file not found.");
        };

        let mut dataset = match self.store.load(&input) {
            Ok(dataset) => dataset,
            Err(e) => return PublishResult::failed(format!("Failed to load data: {e}")),
        };

        let mut applied = 0;
        for step in &steps {
            let Some(command) = step.command.as_deref() else {
                tracing::debug!(step_id = step.id, "no command stored, skipping");
                continue;
            };
            dataset = match dna_transform::execute(command, dataset) {
                Ok(next) => next,
                Err(e) => {
                    return PublishResult::failed_at_step(
                        step.id,
                        format!("Failed to apply step {}: {e}", step.id),
                        applied,
                    );
                }
            };
            applied += 1;
        }

        let output = match self.store.silver_path(&input) {
            Ok(path) => path,
            Err(e) => {
                return PublishResult::failed(format!("Failed to write to silver layer: {e}"));
            }
        };
        if let Err(e) = self.store.write(&dataset, &output) {
            return PublishResult::failed(format!("Failed to write to silver layer: {e}"));
        }

        PublishResult::success(output.display().to_string(), applied)
    }
}
