// condflow/src/error.rs

use anyhow::Error as AnyhowError;
use thiserror::Error;

/// Errors the evaluation engine itself can raise.
///
/// Fallthrough variants carry a debug rendering of the unmatched value or
/// subject so diagnostics can point at the datum that matched nothing.
/// Failures raised by user-supplied predicates, patterns, or body
/// sub-operations are never wrapped here; they propagate as the pipeline's
/// own `Err` type.
#[derive(Debug, Error)]
pub enum CondflowError {
  #[error("No guard predicate matched in guarded dispatch at step {step_index} (value: {value})")]
  GuardFallthrough { step_index: usize, value: String },

  #[error("Subject matched no clause pattern in pattern dispatch at step {step_index} (subject: {subject})")]
  PatternFallthrough { step_index: usize, subject: String },

  #[error("Binding failed and no fallback clause matched at step {step_index} (subject: {subject})")]
  FallbackFallthrough { step_index: usize, subject: String },

  #[error("No capture named '{name}' is bound in this clause")]
  CaptureMissing { name: &'static str },

  #[error("Capture '{name}' is not of the expected type {expected_type}")]
  CaptureTypeMismatch {
    name: &'static str,
    expected_type: &'static str,
  },

  #[error("No pipeline registered for value type {value_type}")]
  PipelineMissing { value_type: &'static str },

  #[error("Value type mismatch during registry dispatch (expected {expected_type})")]
  ValueTypeMismatch { expected_type: &'static str },

  #[error("Error in external operation. Source: {source}")]
  External {
    #[source]
    source: AnyhowError,
  },

  #[error("Internal condflow error: {0}")]
  Internal(String),
}

// The conversion condflow provides for external errors, so closures written
// against anyhow can use `?` inside pipelines whose Err is CondflowError.
impl From<AnyhowError> for CondflowError {
  fn from(err: AnyhowError) -> Self {
    CondflowError::External { source: err }
  }
}

pub type CondflowResult<T, E = CondflowError> = std::result::Result<T, E>;
