use crate::cli::GlobalFlags;
use crate::cli::root_commands::PublishArgs;
use crate::context::AppContext;
use crate::output::output;

/// Handle `dna publish`.
///
/// The result is printed either way; a failed publish also exits non-zero.
pub async fn handle(args: &PublishArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let lock = ctx.lock_object(args.object_id).await?;
    let result = ctx.pipeline.publish(args.object_id).await;
    drop(lock);

    output(&result, flags.format)?;
    if !result.is_success() {
        anyhow::bail!("publish of object {} failed: {}", args.object_id, result.message);
    }
    Ok(())
}
