use std::path::Path;

use anyhow::Context;

use dna_core::entities::NewObject;
use dna_core::responses::{IngestResponse, ObjectPreview};

use crate::cli::{GlobalFlags, OutputFormat};
use crate::cli::subcommands::ObjectCommands;
use crate::context::AppContext;
use crate::output::{output, render_rows};

/// Handle `dna object`.
pub async fn handle(
    action: &ObjectCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        ObjectCommands::Ingest { path, name } => ingest(path, name.as_deref(), ctx, flags).await,
        ObjectCommands::List => output(&ctx.service().list_objects().await?, flags.format),
        ObjectCommands::Get { id } => {
            let object = ctx
                .service()
                .get_object(*id)
                .await
                .with_context(|| format!("object {id} not found"))?;
            output(&object, flags.format)
        }
        ObjectCommands::Preview { id, offset, limit } => {
            let page = ctx
                .pipeline
                .preview_object(*id, *offset, *limit)
                .await
                .map_err(|e| {
                    let code = e.status_code();
                    anyhow::Error::new(e).context(format!("preview of object {id} failed ({code})"))
                })?;
            print_page(&page, flags)
        }
    }
}

fn print_page(page: &ObjectPreview, flags: &GlobalFlags) -> anyhow::Result<()> {
    if flags.format != OutputFormat::Table {
        return output(page, flags.format);
    }

    println!("{}", render_rows(&page.columns, &page.rows)?);
    if !flags.quiet {
        println!();
        println!(
            "rows {}-{} of {}",
            page.offset + usize::from(!page.rows.is_empty()),
            page.offset + page.rows.len(),
            page.total_rows
        );
    }
    Ok(())
}

async fn ingest(
    source: &Path,
    name: Option<&str>,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let ingested = ctx
        .store()
        .ingest(source)
        .with_context(|| format!("failed to ingest {}", source.display()))?;

    let name = object_name(source, name);
    let data_path = ingested.path.to_string_lossy();
    let object = ctx
        .service()
        .create_object(&NewObject::uploaded_file(&name, &data_path))
        .await?;

    output(
        &IngestResponse {
            object,
            columns: ingested.columns,
            row_count: ingested.row_count,
        },
        flags.format,
    )
}

/// Explicit name, else the source file name.
fn object_name(source: &Path, name: Option<&str>) -> String {
    name.map(str::to_string).unwrap_or_else(|| {
        source
            .file_name()
            .map_or_else(|| source.display().to_string(), |n| n.to_string_lossy().into_owned())
    })
}
