// condflow/src/pipeline/evaluation.rs

//! Contains `Pipeline::evaluate()`, the step dispatch and the
//! branch-selection rules for every step kind.
//!
//! Evaluation is strictly sequential and synchronous: steps run in
//! declaration order, each consuming the previous threaded value; within a
//! branch-bearing step, clauses are tried in declaration order and selection
//! stops at the first match. Bodies of unselected branches are never touched.

use crate::core::body::Body;
use crate::core::step::{Binding, Condition, GuardClause, PatternClause, Step};
use crate::core::subject::{Captures, Subject};
use crate::error::CondflowError;
use crate::pipeline::definition::Pipeline;
use std::fmt;
use tracing::{event, instrument, span, Level};

// The `V: Debug` bound exists so fallthrough errors can carry a rendering of
// the value that matched nothing; it is required only here, not for building
// a pipeline.
impl<V, Err> Pipeline<V, Err>
where
  V: 'static + Send + Sync + fmt::Debug,
  Err: std::error::Error + From<CondflowError> + Send + Sync + 'static,
{
  /// Evaluates the pipeline against `initial`, threading the result of each
  /// step into the next and returning the final value.
  ///
  /// Fails by propagating the first error raised by a user-supplied
  /// condition, subject expression, effect, or tail, or with a
  /// `CondflowError` fallthrough (converted into `Err`) when a dispatch
  /// step selects nothing. There is no partial result.
  #[instrument(
        name = "Pipeline::evaluate",
        skip_all,
        fields(
            value_type = %std::any::type_name::<V>(),
            error_type = %std::any::type_name::<Err>(),
            num_steps = self.steps.len(),
        ),
        err(Display)
    )]
  pub fn evaluate(&self, initial: V) -> Result<V, Err> {
    event!(Level::DEBUG, "Pipeline evaluation starting.");
    let mut current = initial;

    for (step_index, step) in self.steps.iter().enumerate() {
      let step_span = span!(
        Level::INFO,
        "pipeline_step",
        step_index,
        kind = step.kind_name()
      );
      let _step_span_guard = step_span.enter();
      event!(Level::DEBUG, "Evaluating step.");

      current = Self::apply_step(current, step, step_index)?;
      event!(Level::DEBUG, "Step evaluated.");
    }

    event!(Level::DEBUG, "Pipeline evaluation completed.");
    Ok(current)
  }

  fn apply_step(value: V, step: &Step<V, Err>, step_index: usize) -> Result<V, Err> {
    match step {
      Step::Call { transform } => transform(value),
      Step::Binary {
        condition,
        then_body,
        else_body,
      } => Self::apply_binary(value, condition, then_body, else_body.as_ref(), false),
      // A negated binary is strictly a binary with the branches swapped;
      // the condition is still evaluated exactly once.
      Step::NegatedBinary {
        condition,
        then_body,
        else_body,
      } => Self::apply_binary(value, condition, then_body, else_body.as_ref(), true),
      Step::GuardedDispatch { clauses } => Self::select_guarded(value, clauses, step_index),
      Step::PatternDispatch { subject, clauses } => {
        let subject_value = subject(&value)?;
        Self::select_pattern(value, subject_value, clauses, step_index)
      }
      Step::FallibleBindingChain {
        bindings,
        body,
        fallback,
      } => Self::run_binding_chain(value, bindings, body, fallback.as_deref(), step_index),
    }
  }

  fn apply_binary(
    value: V,
    condition: &Condition<V, Err>,
    then_body: &Body<V, Err>,
    else_body: Option<&Body<V, Err>>,
    negated: bool,
  ) -> Result<V, Err> {
    let held = condition(&value)?;
    let take_then = held != negated;
    event!(Level::TRACE, condition = held, take_then, "Binary condition evaluated.");

    if take_then {
      then_body.apply(value, &Captures::empty())
    } else if let Some(body) = else_body {
      body.apply(value, &Captures::empty())
    } else {
      // Implicit identity else: the value passes through unchanged.
      event!(Level::TRACE, "No else-body; threading value unchanged.");
      Ok(value)
    }
  }

  fn select_guarded(value: V, clauses: &[GuardClause<V, Err>], step_index: usize) -> Result<V, Err> {
    for (clause_index, clause) in clauses.iter().enumerate() {
      if (clause.predicate)(&value)? {
        event!(Level::INFO, clause_index, "Guard clause selected.");
        return clause.body.apply(value, &Captures::empty());
      }
      event!(Level::TRACE, clause_index, "Guard predicate did not hold.");
    }

    event!(Level::ERROR, "No guard predicate matched.");
    Err(Err::from(CondflowError::GuardFallthrough {
      step_index,
      value: format!("{:?}", value),
    }))
  }

  fn select_pattern(
    value: V,
    subject: Subject,
    clauses: &[PatternClause<V, Err>],
    step_index: usize,
  ) -> Result<V, Err> {
    match Self::first_match(&subject, clauses) {
      Some((clause_index, body, captures)) => {
        event!(Level::INFO, clause_index, captures = captures.len(), "Pattern clause selected.");
        body.apply(value, &captures)
      }
      None => {
        event!(Level::ERROR, subject = %subject.rendered(), "Subject matched no clause pattern.");
        Err(Err::from(CondflowError::PatternFallthrough {
          step_index,
          subject: subject.rendered().to_string(),
        }))
      }
    }
  }

  fn run_binding_chain(
    value: V,
    bindings: &[Binding<V, Err>],
    body: &Body<V, Err>,
    fallback: Option<&[PatternClause<V, Err>]>,
    step_index: usize,
  ) -> Result<V, Err> {
    let mut captures = Captures::empty();

    // Bindings must short-circuit on the first failure: later binding
    // expressions may depend on captures from earlier ones.
    for (binding_index, binding) in bindings.iter().enumerate() {
      let subject = (binding.expr)(&value, &captures)?;
      match binding.pattern.probe(&subject) {
        Some(bound) => {
          event!(Level::TRACE, binding_index, bound = bound.len(), "Binding matched.");
          captures.merge(bound);
        }
        None => {
          event!(
            Level::DEBUG,
            binding_index,
            subject = %subject.rendered(),
            "Binding failed; diverting to fallback clauses."
          );
          return Self::apply_fallback(value, subject, fallback, step_index);
        }
      }
    }

    event!(Level::INFO, bindings = bindings.len(), "All bindings matched; applying primary body.");
    body.apply(value, &captures)
  }

  // Fallback selection deliberately reuses pattern-dispatch rules, with the
  // failing binding's subject as the dispatched datum. Fallback bodies see
  // only the fallback pattern's captures, never the partial chain bindings.
  fn apply_fallback(
    value: V,
    subject: Subject,
    fallback: Option<&[PatternClause<V, Err>]>,
    step_index: usize,
  ) -> Result<V, Err> {
    let Some(clauses) = fallback else {
      event!(Level::ERROR, subject = %subject.rendered(), "Binding failed and no fallback list was supplied.");
      return Err(Err::from(CondflowError::FallbackFallthrough {
        step_index,
        subject: subject.rendered().to_string(),
      }));
    };

    match Self::first_match(&subject, clauses) {
      Some((clause_index, body, captures)) => {
        event!(Level::INFO, clause_index, "Fallback clause selected.");
        body.apply(value, &captures)
      }
      None => {
        event!(Level::ERROR, subject = %subject.rendered(), "No fallback clause matched.");
        Err(Err::from(CondflowError::FallbackFallthrough {
          step_index,
          subject: subject.rendered().to_string(),
        }))
      }
    }
  }

  /// First clause whose pattern accepts `subject`, in declaration order.
  /// Later clauses are never probed once one matches.
  fn first_match<'clauses>(
    subject: &Subject,
    clauses: &'clauses [PatternClause<V, Err>],
  ) -> Option<(usize, &'clauses Body<V, Err>, Captures)> {
    clauses.iter().enumerate().find_map(|(clause_index, clause)| {
      clause
        .pattern
        .probe(subject)
        .map(|captures| (clause_index, &clause.body, captures))
    })
  }
}
