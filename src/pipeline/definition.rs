// condflow/src/pipeline/definition.rs

//! Contains the `Pipeline<V, Err>` struct definition and the builder surface
//! through which callers append steps.
//!
//! The builder is deliberately dumb: it only assembles the step list. All
//! selection semantics live in `evaluation.rs`, so two step lists with the
//! same shape evaluate identically no matter which surface produced them.

use crate::core::body::Body;
use crate::core::step::{Binding, GuardClause, PatternClause, Step};
use crate::core::subject::Subject;
use crate::error::CondflowError;

/// The core pipeline type: an ordered list of steps threading a value of
/// type `V`.
///
/// `V` must be `'static + Send + Sync`; each step consumes the previous
/// value and produces the next, so `V` needs no `Clone`.
/// `Err` must be `std::error::Error + Send + Sync + 'static` and
/// `From<CondflowError>`, so fallthrough and capture-access errors raised by
/// the engine convert into the caller's error type.
pub struct Pipeline<V, Err>
where
  V: 'static + Send + Sync,
  Err: std::error::Error + From<CondflowError> + Send + Sync + 'static,
{
  pub(crate) steps: Vec<Step<V, Err>>,
}

impl<V, Err> Pipeline<V, Err>
where
  V: 'static + Send + Sync,
  Err: std::error::Error + From<CondflowError> + Send + Sync + 'static,
{
  /// Creates an empty pipeline. Evaluating it returns the initial value.
  pub fn new() -> Self {
    Self { steps: Vec::new() }
  }

  /// Number of steps appended so far.
  pub fn len(&self) -> usize {
    self.steps.len()
  }

  pub fn is_empty(&self) -> bool {
    self.steps.is_empty()
  }

  /// Appends a pre-built step. The typed methods below are the usual way in.
  pub fn push_step(&mut self, step: Step<V, Err>) -> &mut Self {
    self.steps.push(step);
    self
  }

  /// Appends an unconditional transform.
  pub fn call(&mut self, transform: impl Fn(V) -> Result<V, Err> + Send + Sync + 'static) -> &mut Self {
    self.push_step(Step::Call {
      transform: Box::new(transform),
    })
  }

  /// Appends a binary branch with an implicit identity else-body.
  pub fn binary(
    &mut self,
    condition: impl Fn(&V) -> Result<bool, Err> + Send + Sync + 'static,
    then_body: Body<V, Err>,
  ) -> &mut Self {
    self.push_step(Step::Binary {
      condition: Box::new(condition),
      then_body,
      else_body: None,
    })
  }

  /// Appends a binary branch with an explicit else-body.
  pub fn binary_else(
    &mut self,
    condition: impl Fn(&V) -> Result<bool, Err> + Send + Sync + 'static,
    then_body: Body<V, Err>,
    else_body: Body<V, Err>,
  ) -> &mut Self {
    self.push_step(Step::Binary {
      condition: Box::new(condition),
      then_body,
      else_body: Some(else_body),
    })
  }

  /// Appends a negated binary branch (then-body runs when the condition is
  /// false) with an implicit identity else-body.
  pub fn negated_binary(
    &mut self,
    condition: impl Fn(&V) -> Result<bool, Err> + Send + Sync + 'static,
    then_body: Body<V, Err>,
  ) -> &mut Self {
    self.push_step(Step::NegatedBinary {
      condition: Box::new(condition),
      then_body,
      else_body: None,
    })
  }

  /// Appends a negated binary branch with an explicit else-body.
  pub fn negated_binary_else(
    &mut self,
    condition: impl Fn(&V) -> Result<bool, Err> + Send + Sync + 'static,
    then_body: Body<V, Err>,
    else_body: Body<V, Err>,
  ) -> &mut Self {
    self.push_step(Step::NegatedBinary {
      condition: Box::new(condition),
      then_body,
      else_body: Some(else_body),
    })
  }

  /// Appends a guarded dispatch over the given clauses. Clauses are tried in
  /// the order given; evaluation fails with
  /// [`CondflowError::GuardFallthrough`] if none of the predicates holds.
  pub fn guarded_dispatch(&mut self, clauses: Vec<GuardClause<V, Err>>) -> &mut Self {
    self.push_step(Step::GuardedDispatch { clauses })
  }

  /// Appends a pattern dispatch. `subject` is evaluated exactly once when
  /// the step is reached; evaluation fails with
  /// [`CondflowError::PatternFallthrough`] if no clause pattern accepts it.
  pub fn pattern_dispatch(
    &mut self,
    subject: impl Fn(&V) -> Result<Subject, Err> + Send + Sync + 'static,
    clauses: Vec<PatternClause<V, Err>>,
  ) -> &mut Self {
    self.push_step(Step::PatternDispatch {
      subject: Box::new(subject),
      clauses,
    })
  }

  /// Appends a fallible binding chain with no fallback clauses. A failing
  /// binding makes evaluation fail with
  /// [`CondflowError::FallbackFallthrough`].
  pub fn fallible_binding_chain(&mut self, bindings: Vec<Binding<V, Err>>, body: Body<V, Err>) -> &mut Self {
    self.push_step(Step::FallibleBindingChain {
      bindings,
      body,
      fallback: None,
    })
  }

  /// Appends a fallible binding chain whose failing subjects are routed
  /// through `fallback` using pattern-dispatch selection.
  pub fn fallible_binding_chain_else(
    &mut self,
    bindings: Vec<Binding<V, Err>>,
    body: Body<V, Err>,
    fallback: Vec<PatternClause<V, Err>>,
  ) -> &mut Self {
    self.push_step(Step::FallibleBindingChain {
      bindings,
      body,
      fallback: Some(fallback),
    })
  }
}

impl<V, Err> Default for Pipeline<V, Err>
where
  V: 'static + Send + Sync,
  Err: std::error::Error + From<CondflowError> + Send + Sync + 'static,
{
  fn default() -> Self {
    Self::new()
  }
}

impl<V, Err> std::fmt::Debug for Pipeline<V, Err>
where
  V: 'static + Send + Sync,
  Err: std::error::Error + From<CondflowError> + Send + Sync + 'static,
{
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Pipeline")
      .field("value_type", &std::any::type_name::<V>())
      .field("steps", &self.steps)
      .finish()
  }
}
