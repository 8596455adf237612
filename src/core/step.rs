// condflow/src/core/step.rs

//! Defines `Step`, the closed sum of evaluation units a pipeline is made of,
//! together with the clause and binding types used by its dispatch kinds.
//!
//! Keeping `Step` a closed enum lets the evaluator dispatch with an
//! exhaustive match, so a new step kind cannot be added without the compiler
//! pointing at every place that must handle it.

use crate::core::body::{Body, Tail};
use crate::core::pattern::Pattern;
use crate::core::subject::{Captures, Subject};

/// A branch condition, evaluated against the current threaded value.
pub type Condition<V, Err> = Box<dyn Fn(&V) -> Result<bool, Err> + Send + Sync + 'static>;

/// A subject expression for pattern dispatch, evaluated exactly once per
/// step against the current threaded value.
pub type SubjectFn<V, Err> = Box<dyn Fn(&V) -> Result<Subject, Err> + Send + Sync + 'static>;

/// The right-hand expression of a binding in a fallible binding chain. It
/// sees the current threaded value and everything earlier bindings captured.
pub type BindingExpr<V, Err> =
  Box<dyn Fn(&V, &Captures) -> Result<Subject, Err> + Send + Sync + 'static>;

/// One clause of a guarded dispatch: an independent predicate and the body
/// selected if the predicate is the first to hold.
pub struct GuardClause<V, Err> {
  pub(crate) predicate: Condition<V, Err>,
  pub(crate) body: Body<V, Err>,
}

impl<V, Err> GuardClause<V, Err> {
  pub fn new(
    predicate: impl Fn(&V) -> Result<bool, Err> + Send + Sync + 'static,
    body: Body<V, Err>,
  ) -> Self {
    Self {
      predicate: Box::new(predicate),
      body,
    }
  }
}

/// One clause of a pattern dispatch (or of a binding chain's fallback list):
/// a structural pattern and the body selected on the first match.
pub struct PatternClause<V, Err> {
  pub(crate) pattern: Pattern,
  pub(crate) body: Body<V, Err>,
}

impl<V, Err> PatternClause<V, Err> {
  pub fn new(pattern: Pattern, body: Body<V, Err>) -> Self {
    Self { pattern, body }
  }
}

/// One binding of a fallible binding chain: evaluate `expr`, match the
/// result against `pattern`, accumulate its captures or divert to the
/// fallback clauses.
pub struct Binding<V, Err> {
  pub(crate) pattern: Pattern,
  pub(crate) expr: BindingExpr<V, Err>,
}

impl<V, Err> Binding<V, Err> {
  pub fn new(
    pattern: Pattern,
    expr: impl Fn(&V, &Captures) -> Result<Subject, Err> + Send + Sync + 'static,
  ) -> Self {
    Self {
      pattern,
      expr: Box::new(expr),
    }
  }
}

/// One evaluation unit of a pipeline.
///
/// A `Binary`/`NegatedBinary` step with no else-body behaves as if its
/// else-body were the identity: the unselected side leaves the threaded
/// value unchanged.
pub enum Step<V, Err> {
  /// Unconditional transform; always selected.
  Call { transform: Tail<V, Err> },
  /// Condition true selects the then-body, false the else-body (or identity).
  Binary {
    condition: Condition<V, Err>,
    then_body: Body<V, Err>,
    else_body: Option<Body<V, Err>>,
  },
  /// Strictly `Binary` with the branches swapped.
  NegatedBinary {
    condition: Condition<V, Err>,
    then_body: Body<V, Err>,
    else_body: Option<Body<V, Err>>,
  },
  /// First clause whose predicate holds wins; none is a fallthrough error.
  GuardedDispatch { clauses: Vec<GuardClause<V, Err>> },
  /// Subject evaluated once, matched against clause patterns in order.
  PatternDispatch {
    subject: SubjectFn<V, Err>,
    clauses: Vec<PatternClause<V, Err>>,
  },
  /// Short-circuiting conjunction of bindings, then the primary body; a
  /// failing binding diverts its subject to the fallback clauses.
  FallibleBindingChain {
    bindings: Vec<Binding<V, Err>>,
    body: Body<V, Err>,
    fallback: Option<Vec<PatternClause<V, Err>>>,
  },
}

impl<V, Err> Step<V, Err> {
  /// Short name of the step kind, used in spans and error logs.
  pub fn kind_name(&self) -> &'static str {
    match self {
      Step::Call { .. } => "call",
      Step::Binary { .. } => "binary",
      Step::NegatedBinary { .. } => "negated_binary",
      Step::GuardedDispatch { .. } => "guarded_dispatch",
      Step::PatternDispatch { .. } => "pattern_dispatch",
      Step::FallibleBindingChain { .. } => "fallible_binding_chain",
    }
  }
}

// Boxed closures do not implement Debug; summarize the shape instead.
impl<V, Err> std::fmt::Debug for Step<V, Err> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let mut s = f.debug_struct("Step");
    s.field("kind", &self.kind_name());
    match self {
      Step::GuardedDispatch { clauses } => {
        s.field("clauses", &clauses.len());
      }
      Step::PatternDispatch { clauses, .. } => {
        s.field("clauses", &clauses.len());
      }
      Step::FallibleBindingChain { bindings, fallback, .. } => {
        s.field("bindings", &bindings.len());
        s.field("fallback_clauses", &fallback.as_ref().map(Vec::len));
      }
      _ => {}
    }
    s.finish()
  }
}
