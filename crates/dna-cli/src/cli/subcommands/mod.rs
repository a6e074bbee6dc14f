mod object;
mod step;

pub use object::ObjectCommands;
pub use step::StepCommands;
