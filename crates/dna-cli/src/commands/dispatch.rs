use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(command: Commands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Object { action } => commands::object::handle(&action, ctx, flags).await,
        Commands::Step { action } => commands::step::handle(&action, ctx, flags).await,
        Commands::Publish(args) => commands::publish::handle(&args, ctx, flags).await,
    }
}
