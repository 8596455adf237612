// tests/common/mod.rs
#![allow(dead_code)] // Allow unused helpers in this common test module

use condflow::CondflowError;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::Level;

// --- Common Error Type for Tests ---
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)] // Clone, PartialEq, Eq for assertions
pub enum TestError {
  #[error("condflow engine error: {0}")] // Stored as String so TestError stays Eq
  Engine(String),

  #[error("Test handler failed: {0}")]
  Handler(String),
}

impl From<CondflowError> for TestError {
  fn from(err: CondflowError) -> Self {
    // Keep the Debug rendering so assertions can check the variant name and
    // its diagnostic fields.
    TestError::Engine(format!("{:?}", err))
  }
}

// --- Common Transform / Condition Helpers (for Pipeline<i32, TestError>) ---

pub fn increment() -> impl Fn(i32) -> Result<i32, TestError> + Send + Sync + 'static {
  |value| Ok(value + 1)
}

pub fn add(amount: i32) -> impl Fn(i32) -> Result<i32, TestError> + Send + Sync + 'static {
  move |value| Ok(value + amount)
}

pub fn always(held: bool) -> impl Fn(&i32) -> Result<bool, TestError> + Send + Sync + 'static {
  move |_| Ok(held)
}

// --- Execution-Order Recorder ---

/// Shared log of labels, used to assert both execution order and
/// non-execution of unselected branches.
#[derive(Clone, Default)]
pub struct Recorder {
  entries: Arc<Mutex<Vec<String>>>,
}

impl Recorder {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn record(&self, label: impl Into<String>) {
    self.entries.lock().push(label.into());
  }

  /// A body effect that records `label` when it runs.
  pub fn effect(&self, label: &'static str) -> impl Fn() -> Result<(), TestError> + Send + Sync + 'static {
    let recorder = self.clone();
    move || {
      recorder.record(label);
      Ok(())
    }
  }

  /// An i32 transform that records `label` and passes the value through.
  pub fn marking_transform(
    &self,
    label: &'static str,
  ) -> impl Fn(i32) -> Result<i32, TestError> + Send + Sync + 'static {
    let recorder = self.clone();
    move |value| {
      recorder.record(label);
      Ok(value)
    }
  }

  pub fn entries(&self) -> Vec<String> {
    self.entries.lock().clone()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.lock().is_empty()
  }
}

// --- Helper for Tracing Setup (call once per test run if needed) ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok(); // Allow multiple initializations in tests (ok if fails)
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

// --- Assertion helper for engine fallthrough errors ---

/// Asserts that `err` is a `TestError::Engine` whose rendering mentions
/// every one of `needles` (variant name, step index, offending datum...).
pub fn assert_engine_error(err: &TestError, needles: &[&str]) {
  match err {
    TestError::Engine(rendering) => {
      for needle in needles {
        assert!(
          rendering.contains(needle),
          "expected engine error mentioning '{}', got: {}",
          needle,
          rendering
        );
      }
    }
    other => panic!("Expected TestError::Engine, got {:?}", other),
  }
}
