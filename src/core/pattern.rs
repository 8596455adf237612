// condflow/src/core/pattern.rs

//! The explicit matcher abstraction used by pattern dispatch and by the
//! binding half of fallible binding chains.
//!
//! A `Pattern` is a probe closure over a type-erased [`Subject`] that either
//! refuses the subject (`None`) or accepts it and hands back the values it
//! extracted (`Some(Captures)`). Predicate and destructuring live in one
//! probe, so clause selection needs no language-level match syntax.

use crate::core::subject::{Captures, Subject};
use std::any::Any;
use std::sync::Arc;

type Probe = Arc<dyn Fn(&Subject) -> Option<Captures> + Send + Sync + 'static>;

/// A structural matcher: predicate and value extraction in one probe.
#[derive(Clone)]
pub struct Pattern {
  probe: Probe,
}

impl Pattern {
  /// Builds a pattern from a raw probe closure. This is the escape hatch for
  /// shapes the convenience constructors below do not cover (tuple
  /// destructuring, nested matches, and so on).
  pub fn matching(probe: impl Fn(&Subject) -> Option<Captures> + Send + Sync + 'static) -> Self {
    Self {
      probe: Arc::new(probe),
    }
  }

  /// Matches any subject, capturing nothing. The wildcard clause.
  pub fn any() -> Self {
    Self::matching(|_| Some(Captures::empty()))
  }

  /// Matches a subject of type `T` structurally equal to `expected`.
  /// Captures nothing.
  pub fn equals<T>(expected: T) -> Self
  where
    T: Any + PartialEq + Send + Sync + 'static,
  {
    Self::matching(move |subject| {
      let candidate = subject.downcast_ref::<T>()?;
      (*candidate == expected).then(Captures::empty)
    })
  }

  /// Matches any subject of type `T` and captures it whole under `name`.
  pub fn bind<T>(name: &'static str) -> Self
  where
    T: Any + Clone + Send + Sync + 'static,
  {
    Self::matching(move |subject| {
      let candidate = subject.downcast_ref::<T>()?;
      Some(Captures::single(name, candidate.clone()))
    })
  }

  /// Matches a subject of type `T` for which `extract` yields a value, and
  /// captures that value under `name`. Returning `None` from `extract`
  /// refuses the subject, so this doubles as a guarded destructuring form.
  pub fn bind_with<T, U>(
    name: &'static str,
    extract: impl Fn(&T) -> Option<U> + Send + Sync + 'static,
  ) -> Self
  where
    T: Any + Send + Sync + 'static,
    U: Any + Send + Sync + 'static,
  {
    Self::matching(move |subject| {
      let candidate = subject.downcast_ref::<T>()?;
      extract(candidate).map(|extracted| Captures::single(name, extracted))
    })
  }

  /// Matches a subject of type `T` satisfying `predicate`. Captures nothing.
  pub fn check<T>(predicate: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self
  where
    T: Any + Send + Sync + 'static,
  {
    Self::matching(move |subject| {
      let candidate = subject.downcast_ref::<T>()?;
      predicate(candidate).then(Captures::empty)
    })
  }

  /// Probes `subject`. `Some` means the pattern accepted it; the returned
  /// captures become visible inside the selected clause body.
  pub fn probe(&self, subject: &Subject) -> Option<Captures> {
    (self.probe)(subject)
  }
}

impl std::fmt::Debug for Pattern {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Pattern").finish_non_exhaustive()
  }
}
