// condflow/src/core/subject.rs

//! Defines `Subject`, the type-erased datum that patterns are matched
//! against, and `Captures`, the named values a successful match extracts.
//!
//! The evaluator threads a strongly typed value `V` between steps, but the
//! subject of a pattern dispatch (and the right-hand side of a binding in a
//! fallible binding chain) may be of any type, step by step. `Subject` erases
//! that type while keeping a debug rendering around so fallthrough errors can
//! still name the datum that matched nothing.

use crate::error::{CondflowError, CondflowResult};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A type-erased value to be probed by `Pattern`s.
///
/// Constructed by subject expressions and binding expressions at evaluation
/// time. The rendering is captured eagerly; the workload is a handful of
/// steps per pipeline, not a hot loop.
pub struct Subject {
  value: Box<dyn Any + Send + Sync>,
  rendered: String,
}

impl Subject {
  /// Wraps a value, capturing its `Debug` rendering for diagnostics.
  pub fn of<T: Any + fmt::Debug + Send + Sync>(value: T) -> Self {
    let rendered = format!("{:?}", value);
    Self {
      value: Box::new(value),
      rendered,
    }
  }

  /// Wraps a value that does not implement `Debug`. Diagnostics will show
  /// the type name instead of the value.
  pub fn opaque<T: Any + Send + Sync>(value: T) -> Self {
    Self {
      value: Box::new(value),
      rendered: format!("<{}>", std::any::type_name::<T>()),
    }
  }

  /// Attempts to view the erased value as a `T`.
  pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
    self.value.downcast_ref::<T>()
  }

  /// Whether the erased value is a `T`.
  pub fn is<T: Any>(&self) -> bool {
    self.value.is::<T>()
  }

  /// The rendering captured at construction, used in fallthrough errors.
  pub fn rendered(&self) -> &str {
    &self.rendered
  }
}

impl fmt::Debug for Subject {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.rendered)
  }
}

/// Named values extracted by a matching pattern, visible inside the clause
/// body that the match selected.
///
/// In a fallible binding chain, captures accumulate across bindings: each
/// binding expression sees everything bound so far, and the primary body sees
/// all of them. A later capture shadows an earlier one of the same name.
#[derive(Clone, Default)]
pub struct Captures {
  slots: Vec<(&'static str, Arc<dyn Any + Send + Sync>)>,
}

impl Captures {
  pub fn empty() -> Self {
    Self::default()
  }

  /// A capture set holding a single named value.
  pub fn single<T: Any + Send + Sync>(name: &'static str, value: T) -> Self {
    let mut captures = Self::empty();
    captures.insert(name, value);
    captures
  }

  pub fn insert<T: Any + Send + Sync>(&mut self, name: &'static str, value: T) {
    self.slots.push((name, Arc::new(value)));
  }

  /// Typed access to a capture. Missing names and type mismatches surface as
  /// `CondflowError`, so clause bodies can use `?` directly.
  pub fn get<T: Any + Send + Sync>(&self, name: &'static str) -> CondflowResult<&T> {
    let slot = self
      .slots
      .iter()
      .rev()
      .find(|(slot_name, _)| *slot_name == name)
      .ok_or(CondflowError::CaptureMissing { name })?;
    slot
      .1
      .downcast_ref::<T>()
      .ok_or(CondflowError::CaptureTypeMismatch {
        name,
        expected_type: std::any::type_name::<T>(),
      })
  }

  /// Non-erroring variant of [`Captures::get`].
  pub fn try_get<T: Any + Send + Sync>(&self, name: &'static str) -> Option<&T> {
    self.get(name).ok()
  }

  /// Appends all of `other`'s captures after this set's own.
  pub fn merge(&mut self, other: Captures) {
    self.slots.extend(other.slots);
  }

  pub fn len(&self) -> usize {
    self.slots.len()
  }

  pub fn is_empty(&self) -> bool {
    self.slots.is_empty()
  }
}

impl fmt::Debug for Captures {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_list()
      .entries(self.slots.iter().map(|(name, _)| name))
      .finish()
  }
}
