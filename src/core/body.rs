// condflow/src/core/body.rs

//! Defines `Body`, the ordered block of sub-operations a selected branch
//! runs, and the single application rule shared by every branch-bearing step
//! kind.
//!
//! A body is non-empty by construction: zero or more *effects* followed by
//! exactly one *tail*. Effects run in declaration order purely for side
//! effect; the tail is then invoked with the threaded value prepended as its
//! leading argument, and its result becomes the next threaded value. The rule
//! is identical no matter which step kind selected the body.

use crate::core::subject::Captures;

/// A non-final sub-operation. Its result is discarded.
pub type Effect<Err> = Box<dyn Fn() -> Result<(), Err> + Send + Sync + 'static>;

/// A final sub-operation receiving the threaded value.
pub type Tail<V, Err> = Box<dyn Fn(V) -> Result<V, Err> + Send + Sync + 'static>;

/// A final sub-operation receiving the threaded value and the captures
/// extracted by the pattern that selected this body.
pub type BoundTail<V, Err> = Box<dyn Fn(V, &Captures) -> Result<V, Err> + Send + Sync + 'static>;

enum TailKind<V, Err> {
  Plain(Tail<V, Err>),
  Bound(BoundTail<V, Err>),
}

/// An ordered, non-empty sequence of sub-operations.
pub struct Body<V, Err> {
  effects: Vec<Effect<Err>>,
  tail: TailKind<V, Err>,
}

impl<V, Err> Body<V, Err> {
  /// A body consisting of a single tail. The common case.
  pub fn just(tail: impl Fn(V) -> Result<V, Err> + Send + Sync + 'static) -> Self {
    Self {
      effects: Vec::new(),
      tail: TailKind::Plain(Box::new(tail)),
    }
  }

  /// A single-tail body whose tail uses the selecting pattern's captures.
  pub fn just_bound(tail: impl Fn(V, &Captures) -> Result<V, Err> + Send + Sync + 'static) -> Self {
    Self {
      effects: Vec::new(),
      tail: TailKind::Bound(Box::new(tail)),
    }
  }

  /// Starts a multi-statement body. Effects added to the builder run in the
  /// order they were added, before the tail.
  pub fn builder() -> BodyBuilder<V, Err> {
    BodyBuilder::new()
  }

  /// Applies this body to the threaded value: every effect in declaration
  /// order, then the tail with `value` as leading argument. This is the
  /// branch applier shared by all step kinds; it only ever runs on a body
  /// that selection actually picked.
  pub(crate) fn apply(&self, value: V, captures: &Captures) -> Result<V, Err> {
    for effect in &self.effects {
      effect()?;
    }
    match &self.tail {
      TailKind::Plain(tail) => tail(value),
      TailKind::Bound(tail) => tail(value, captures),
    }
  }

}

/// Accumulates effects for a multi-statement [`Body`], finished by its tail.
pub struct BodyBuilder<V, Err> {
  effects: Vec<Effect<Err>>,
  _phantom_value: std::marker::PhantomData<fn() -> V>,
}

impl<V, Err> BodyBuilder<V, Err> {
  pub fn new() -> Self {
    Self {
      effects: Vec::new(),
      _phantom_value: std::marker::PhantomData,
    }
  }

  /// Appends a non-final sub-operation.
  pub fn effect(mut self, effect: impl Fn() -> Result<(), Err> + Send + Sync + 'static) -> Self {
    self.effects.push(Box::new(effect));
    self
  }

  /// Finishes the body with a plain tail.
  pub fn finish(self, tail: impl Fn(V) -> Result<V, Err> + Send + Sync + 'static) -> Body<V, Err> {
    Body {
      effects: self.effects,
      tail: TailKind::Plain(Box::new(tail)),
    }
  }

  /// Finishes the body with a capture-aware tail.
  pub fn finish_bound(
    self,
    tail: impl Fn(V, &Captures) -> Result<V, Err> + Send + Sync + 'static,
  ) -> Body<V, Err> {
    Body {
      effects: self.effects,
      tail: TailKind::Bound(Box::new(tail)),
    }
  }
}

impl<V, Err> Default for BodyBuilder<V, Err> {
  fn default() -> Self {
    Self::new()
  }
}

impl<V, Err> std::fmt::Debug for Body<V, Err> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Body")
      .field("effects", &self.effects.len())
      .field(
        "tail",
        match self.tail {
          TailKind::Plain(_) => &"plain",
          TailKind::Bound(_) => &"bound",
        },
      )
      .finish()
  }
}
