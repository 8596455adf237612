// condflow/src/pipeline/mod.rs

//! Defines the `Pipeline<V, Err>` struct, its builder surface, and its
//! evaluation logic.

pub mod definition;
pub mod evaluation;

pub use definition::Pipeline;
