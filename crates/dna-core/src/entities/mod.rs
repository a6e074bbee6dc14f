//! Entity structs for the pipeline's persisted records.
//!
//! Each entity maps to a table in the libSQL database (see `dna-db`
//! migrations). All structs derive `Serialize`, `Deserialize`, and
//! `JsonSchema` for JSON output and schema validation.

mod object;
mod step;

pub use object::{DataObject, NewObject};
pub use step::{StepEvent, StepSummary, TransformationStep};
