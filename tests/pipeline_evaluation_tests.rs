// tests/pipeline_evaluation_tests.rs
mod common; // Reference the common module

use common::*;
use condflow::{Body, GuardClause, Pattern, PatternClause, Pipeline, Subject};

#[test]
fn test_empty_pipeline_returns_initial_value() {
  setup_tracing();
  let pipeline = Pipeline::<i32, TestError>::new();
  assert!(pipeline.is_empty());
  assert_eq!(pipeline.evaluate(41), Ok(41));
}

#[test]
fn test_all_call_pipeline_is_left_to_right_composition() {
  setup_tracing();
  let mut pipeline = Pipeline::<i32, TestError>::new();
  pipeline
    .call(|v| Ok(v + 1))
    .call(|v| Ok(v * 3))
    .call(|v| Ok(v - 2));

  // Must equal ((4 + 1) * 3) - 2, i.e. strict left-to-right composition.
  assert_eq!(pipeline.evaluate(4), Ok(13));
}

#[test]
fn test_call_may_change_representation_within_value_type() {
  setup_tracing();
  let mut pipeline = Pipeline::<String, TestError>::new();
  pipeline
    .call(|s: String| Ok(s.to_uppercase()))
    .call(|s: String| Ok(format!("[{}]", s)));

  assert_eq!(pipeline.evaluate("flow".to_string()), Ok("[FLOW]".to_string()));
}

#[test]
fn test_binary_false_without_else_is_identity() {
  setup_tracing();
  let mut pipeline = Pipeline::<i32, TestError>::new();
  pipeline.binary(always(false), Body::just(increment()));

  assert_eq!(pipeline.evaluate(7), Ok(7));
}

#[test]
fn test_negated_binary_true_without_else_is_identity() {
  setup_tracing();
  let mut pipeline = Pipeline::<i32, TestError>::new();
  pipeline.negated_binary(always(true), Body::just(increment()));

  assert_eq!(pipeline.evaluate(7), Ok(7));
}

#[test]
fn test_binary_selects_then_and_else_bodies() {
  setup_tracing();
  let mut thenward = Pipeline::<i32, TestError>::new();
  thenward.binary_else(always(true), Body::just(add(10)), Body::just(add(100)));
  assert_eq!(thenward.evaluate(1), Ok(11));

  let mut elseward = Pipeline::<i32, TestError>::new();
  elseward.binary_else(always(false), Body::just(add(10)), Body::just(add(100)));
  assert_eq!(elseward.evaluate(1), Ok(101));
}

#[test]
fn test_negated_binary_is_binary_with_branches_swapped() {
  setup_tracing();
  let mut negated = Pipeline::<i32, TestError>::new();
  negated.negated_binary_else(always(false), Body::just(add(10)), Body::just(add(100)));
  // Condition false -> then-body for the negated form.
  assert_eq!(negated.evaluate(1), Ok(11));

  let mut swapped = Pipeline::<i32, TestError>::new();
  swapped.binary_else(always(false), Body::just(add(100)), Body::just(add(10)));
  assert_eq!(swapped.evaluate(1), Ok(11));
}

#[test]
fn test_condition_sees_the_current_threaded_value() {
  setup_tracing();
  let mut pipeline = Pipeline::<i32, TestError>::new();
  pipeline
    .call(add(5))
    .binary(|v| Ok(*v > 4), Body::just(add(1)))
    .binary(|v| Ok(*v > 100), Body::just(add(1000)));

  // First condition sees 5 (not the initial 0), second sees 6.
  assert_eq!(pipeline.evaluate(0), Ok(6));
}

#[test]
fn test_effects_run_in_order_before_the_tail() {
  setup_tracing();
  let recorder = Recorder::new();
  let tail_recorder = recorder.clone();

  let body = Body::builder()
    .effect(recorder.effect("e1"))
    .effect(recorder.effect("e2"))
    .finish(move |v: i32| {
      tail_recorder.record(format!("tail({})", v));
      Ok(v + 1)
    });

  let mut pipeline = Pipeline::<i32, TestError>::new();
  pipeline.binary(always(true), body);

  assert_eq!(pipeline.evaluate(5), Ok(6));
  assert_eq!(recorder.entries(), vec!["e1", "e2", "tail(5)"]);
}

#[test]
fn test_unselected_body_runs_nothing_at_all() {
  setup_tracing();
  let recorder = Recorder::new();

  let body = Body::builder()
    .effect(recorder.effect("e1"))
    .effect(recorder.effect("e2"))
    .finish(recorder.marking_transform("tail"));

  let mut pipeline = Pipeline::<i32, TestError>::new();
  pipeline.binary(always(false), body);

  assert_eq!(pipeline.evaluate(5), Ok(5));
  assert!(recorder.is_empty(), "unselected body must not execute any sub-operation");
}

#[test]
fn test_steps_evaluate_strictly_in_declaration_order() {
  setup_tracing();
  let recorder = Recorder::new();
  let condition_recorder = recorder.clone();

  let mut pipeline = Pipeline::<i32, TestError>::new();
  pipeline
    .call(recorder.marking_transform("step0"))
    .binary(
      move |_| {
        condition_recorder.record("step1:condition");
        Ok(true)
      },
      Body::just(recorder.marking_transform("step1:then")),
    )
    .call(recorder.marking_transform("step2"));

  assert_eq!(pipeline.evaluate(0), Ok(0));
  assert_eq!(
    recorder.entries(),
    vec!["step0", "step1:condition", "step1:then", "step2"]
  );
}

// The round-trip scenario from the shared public example: every step kind
// that touches the value advances it by one hop, ending at 9.
#[test]
fn test_shared_round_trip_scenario_ends_at_nine() {
  setup_tracing();
  let mut pipeline = Pipeline::<i32, TestError>::new();
  pipeline
    .call(increment()) // 1 -> 2
    .binary(always(true), Body::just(increment())) // -> 3
    .binary(always(false), Body::just(increment())) // -> 3 (unchanged)
    .binary(always(true), Body::just(increment())) // -> 4
    .binary(always(true), Body::just(add(3))) // -> 7
    .negated_binary(always(true), Body::just(add(3))) // -> 7 (condition held, body skipped)
    .guarded_dispatch(vec![GuardClause::new(always(true), Body::just(increment()))]) // -> 8
    .pattern_dispatch(
      |_| Ok(Subject::of(true)),
      vec![PatternClause::new(Pattern::equals(true), Body::just(increment()))],
    ); // -> 9

  assert_eq!(pipeline.evaluate(1), Ok(9));
}

#[test]
fn test_pipeline_is_reusable_across_evaluations() {
  setup_tracing();
  let mut pipeline = Pipeline::<i32, TestError>::new();
  pipeline.call(add(2)).binary(|v| Ok(v % 2 == 0), Body::just(add(10)));

  assert_eq!(pipeline.evaluate(0), Ok(12));
  assert_eq!(pipeline.evaluate(1), Ok(3));
  assert_eq!(pipeline.evaluate(0), Ok(12));
}
