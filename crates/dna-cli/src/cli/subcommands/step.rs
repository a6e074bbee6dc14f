use clap::Subcommand;

/// Transformation step commands.
#[derive(Clone, Debug, Subcommand)]
pub enum StepCommands {
    /// Append a step to an object's pipeline.
    Add {
        object_id: i64,
        #[arg(long)]
        name: String,
        /// What the step should do, in plain language.
        #[arg(long)]
        description: String,
    },
    /// Append the preset that turns the first data row into the header.
    PromoteHeader { object_id: i64 },
    /// List an object's steps in replay order.
    List {
        object_id: i64,
        /// Only id, name, description, and order.
        #[arg(long)]
        brief: bool,
    },
    /// Remove a step. Remaining steps keep their order.
    Remove { id: i64 },
    /// Synthesize and run one step against the object's raw data.
    Preview { id: i64 },
    /// Status changes recorded for a step.
    History { id: i64 },
}
