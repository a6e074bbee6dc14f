//! Repository modules implementing persistence for pipeline entities.
//!
//! Each module adds methods to `DnaService` via `impl DnaService` blocks.

pub mod object;
pub mod step;
