use clap::{Args, Subcommand};

use crate::cli::subcommands::{ObjectCommands, StepCommands};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Data objects registered in the lake.
    Object {
        #[command(subcommand)]
        action: ObjectCommands,
    },
    /// Transformation steps of an object.
    Step {
        #[command(subcommand)]
        action: StepCommands,
    },
    /// Replay an object's steps over its raw data and write the silver tier.
    Publish(PublishArgs),
}

/// Arguments for `dna publish`.
#[derive(Clone, Debug, Args)]
pub struct PublishArgs {
    /// Object ID.
    pub object_id: i64,
}
