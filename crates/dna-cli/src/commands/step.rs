use anyhow::Context;
use serde::Serialize;

use dna_config::DnaConfig;
use dna_core::entities::StepSummary;
use dna_core::responses::StepPreview;
use dna_pipeline::PipelineError;

use crate::cli::subcommands::StepCommands;
use crate::cli::{GlobalFlags, OutputFormat};
use crate::context::AppContext;
use crate::output::{output, render_rows};

#[derive(Debug, Serialize)]
struct StepRemovedResponse {
    id: i64,
    message: &'static str,
}

/// Handle `dna step`.
pub async fn handle(
    action: &StepCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        StepCommands::Add {
            object_id,
            name,
            description,
        } => {
            let step = ctx
                .service()
                .append_step(*object_id, name, description)
                .await?;
            output(&step, flags.format)
        }
        StepCommands::PromoteHeader { object_id } => {
            let step = ctx.service().append_header_promotion(*object_id).await?;
            output(&step, flags.format)
        }
        StepCommands::List { object_id, brief } => {
            let steps = ctx.service().list_steps(*object_id).await?;
            if *brief {
                let summaries: Vec<StepSummary> = steps.iter().map(StepSummary::from).collect();
                output(&summaries, flags.format)
            } else {
                output(&steps, flags.format)
            }
        }
        StepCommands::Remove { id } => {
            ctx.service()
                .remove_step(*id)
                .await
                .with_context(|| format!("transformation step {id} not found"))?;
            output(
                &StepRemovedResponse {
                    id: *id,
                    message: "Transformation step removed successfully.",
                },
                flags.format,
            )
        }
        StepCommands::Preview { id } => preview(*id, ctx, flags).await,
        StepCommands::History { id } => {
            ctx.service()
                .get_step(*id)
                .await
                .with_context(|| format!("transformation step {id} not found"))?;
            output(&ctx.service().list_step_events(*id).await?, flags.format)
        }
    }
}

async fn preview(id: i64, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    // An unknown step falls through so the pipeline reports it.
    let lock = match ctx.service().get_step(id).await {
        Ok(step) => Some(ctx.lock_object(step.object_id).await?),
        Err(_) => None,
    };

    let result = ctx.pipeline.preview_step(id).await;
    drop(lock);

    let preview = result.map_err(|e| preview_error(id, e, &ctx.config))?;
    print_preview(&preview, flags)
}

/// Status code in the context; a missing API key is named on upstream failures.
fn preview_error(id: i64, err: PipelineError, config: &DnaConfig) -> anyhow::Error {
    let code = err.status_code();
    let hint = match (&err, config.require_llm()) {
        (PipelineError::Upstream(_), Err(missing)) => format!("; {missing}"),
        _ => String::new(),
    };
    anyhow::Error::new(err).context(format!("preview of step {id} failed ({code}){hint}"))
}

fn print_preview(preview: &StepPreview, flags: &GlobalFlags) -> anyhow::Result<()> {
    if flags.format != OutputFormat::Table {
        return output(preview, flags.format);
    }

    println!("{}", render_rows(&preview.columns, &preview.rows)?);
    if !flags.quiet {
        println!();
        println!(
            "{} ({} of {} rows)",
            preview.message,
            preview.rows.len(),
            preview.total_rows
        );
        if let Some(command) = &preview.command {
            println!("command: {command}");
        }
    }
    Ok(())
}
