// src/lib.rs

//! Condflow: a small, type-safe evaluator for conditional data pipelines.
//!
//! Condflow threads a value through an ordered list of steps, where a step
//! is either an unconditional transform or one of several branch forms:
//!  - Binary and negated-binary conditions (missing else-body = identity).
//!  - Guarded dispatch: ordered predicate clauses, first true wins.
//!  - Pattern dispatch: a subject evaluated once and matched structurally
//!    against ordered clauses, with captured bindings visible to the body.
//!  - Fallible binding chains: a short-circuiting conjunction of pattern
//!    bindings followed by a primary body, with pattern-dispatch fallback
//!    for the first failing binding.
//!
//! The value returned by a selected branch becomes the input to the next
//! step; unselected branches leave the value unchanged. Evaluation is
//! sequential, synchronous, and all-or-nothing: a dispatch step whose
//! clauses all refuse fails with the matching fallthrough error.

pub mod core;
pub mod error;
pub mod pipeline;
pub mod registry;

// --- Re-exports for the Public API ---

// Core types that users interact with frequently.
pub use crate::core::body::{Body, BodyBuilder};
pub use crate::core::pattern::Pattern;
pub use crate::core::step::{Binding, GuardClause, PatternClause, Step};
pub use crate::core::subject::{Captures, Subject};

// The main Pipeline struct; its methods double as the builder surface.
pub use crate::pipeline::Pipeline;

pub use crate::error::{CondflowError, CondflowResult};

// The condflow registry for managing and dispatching pipelines by value type.
pub use crate::registry::Condflow;

/*
    Core workflow:
    1. Create a `Pipeline<V, MyErr>` (MyErr: From<CondflowError>).
    2. Append steps: `.call(...)`, `.binary(...)`, `.guarded_dispatch(...)`,
       `.pattern_dispatch(...)`, `.fallible_binding_chain(...)`.
    3. Build branch bodies with `Body::just(...)` or
       `Body::builder().effect(...).finish(...)`; clause matchers with
       `Pattern::equals(...)`, `Pattern::bind(...)`, `Pattern::matching(...)`.
    4. Call `pipeline.evaluate(initial)` to obtain the final value, or
       register the pipeline in a `Condflow` registry and dispatch by type.
*/
