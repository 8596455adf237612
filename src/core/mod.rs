// condflow/src/core/mod.rs

pub mod body;
pub mod pattern;
pub mod step;
pub mod subject;

// Re-export key types for easier access from other condflow modules.
pub use body::{Body, BodyBuilder, BoundTail, Effect, Tail};
pub use pattern::Pattern;
pub use step::{Binding, BindingExpr, Condition, GuardClause, PatternClause, Step, SubjectFn};
pub use subject::{Captures, Subject};
