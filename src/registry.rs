// condflow/src/registry.rs

//! Defines the `Condflow<E>` struct, a type-keyed registry for managing and
//! evaluating pipelines. Pipelines are
//! `crate::pipeline::definition::Pipeline<V, PipelineError>`, keyed by their
//! threaded value type `V`; the registry returns results with an
//! application-level error type `E`.

use crate::error::CondflowError;
use crate::pipeline::definition::Pipeline as CorePipeline;

use parking_lot::RwLock;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{event, instrument, Level};

/// Type-erased trait for pipeline evaluation by the registry.
/// `ApplicationError` is the error type returned by `Condflow::run`.
trait AnyPipelineRunner<ApplicationError>: Send + Sync
where
  ApplicationError: std::error::Error + Send + Sync + 'static,
{
  /// Evaluates the pipeline with a type-erased, owned initial value.
  /// `initial` is expected to contain a `V`; the returned box contains the
  /// final `V`.
  fn evaluate_erased(&self, initial: Box<dyn Any + Send>) -> Result<Box<dyn Any + Send>, ApplicationError>;
}

/// Wrapper making a `CorePipeline<V, PipelineError>` runnable by
/// `Condflow<ApplicationError>`.
struct PipelineWrapper<V, PipelineError, ApplicationError>
where
  V: 'static + Send + Sync + fmt::Debug,
  PipelineError: std::error::Error + From<CondflowError> + Send + Sync + 'static,
  ApplicationError: std::error::Error + From<PipelineError> + From<CondflowError> + Send + Sync + 'static,
{
  pipeline: Arc<CorePipeline<V, PipelineError>>,
  _phantom_errs: PhantomData<fn() -> (PipelineError, ApplicationError)>,
}

impl<V, PipelineError, ApplicationError> AnyPipelineRunner<ApplicationError>
  for PipelineWrapper<V, PipelineError, ApplicationError>
where
  V: 'static + Send + Sync + fmt::Debug,
  PipelineError: std::error::Error + From<CondflowError> + Send + Sync + 'static,
  ApplicationError: std::error::Error + From<PipelineError> + From<CondflowError> + Send + Sync + 'static,
{
  #[instrument(
        name = "PipelineWrapper::evaluate_erased",
        skip_all,
        fields(
            target_value_type = %std::any::type_name::<V>(),
            pipeline_error_type = %std::any::type_name::<PipelineError>(),
            application_error_type = %std::any::type_name::<ApplicationError>(),
        ),
        err(Display)
    )]
  fn evaluate_erased(&self, initial: Box<dyn Any + Send>) -> Result<Box<dyn Any + Send>, ApplicationError> {
    event!(Level::TRACE, "Attempting to downcast owned initial value.");

    let typed_initial = match initial.downcast::<V>() {
      Ok(boxed_value) => *boxed_value,
      Err(_) => {
        let expected_type = std::any::type_name::<V>();
        event!(Level::ERROR, "Initial value type mismatch. Expected {}.", expected_type);
        return Err(ApplicationError::from(CondflowError::ValueTypeMismatch {
          expected_type,
        }));
      }
    };

    event!(Level::DEBUG, "Initial value downcast successful. Evaluating wrapped pipeline.");
    let final_value = self
      .pipeline
      .evaluate(typed_initial)
      .map_err(ApplicationError::from)?;
    Ok(Box::new(final_value))
  }
}

/// The condflow registry.
/// `ApplicationError` is the error type that `Condflow::run` will return.
/// It must be constructible from `CondflowError` to handle registry-level
/// errors (pipeline not found, type mismatches).
pub struct Condflow<ApplicationError = CondflowError>
where
  ApplicationError: std::error::Error + From<CondflowError> + Send + Sync + 'static,
{
  registry: RwLock<HashMap<TypeId, Arc<dyn AnyPipelineRunner<ApplicationError>>>>,
}

impl<ApplicationError> Condflow<ApplicationError>
where
  ApplicationError: std::error::Error + From<CondflowError> + Send + Sync + 'static,
{
  /// Creates a new, empty registry.
  pub fn new() -> Self {
    Self {
      registry: RwLock::new(HashMap::new()),
    }
  }

  /// Registers a `CorePipeline<V, PipelineError>`, keyed by `V`. A later
  /// registration for the same `V` replaces the earlier one.
  pub fn register_pipeline<V, PipelineError>(&self, pipeline: CorePipeline<V, PipelineError>)
  where
    V: 'static + Send + Sync + fmt::Debug,
    PipelineError: std::error::Error + From<CondflowError> + Send + Sync + 'static,
    ApplicationError: From<PipelineError>,
  {
    event!(
      Level::DEBUG,
      value_type = %std::any::type_name::<V>(),
      pipeline_error = %std::any::type_name::<PipelineError>(),
      "Registering pipeline."
    );
    let wrapper = PipelineWrapper::<V, PipelineError, ApplicationError> {
      pipeline: Arc::new(pipeline),
      _phantom_errs: PhantomData,
    };
    self
      .registry
      .write()
      .insert(TypeId::of::<V>(), Arc::new(wrapper));
  }

  /// Evaluates the pipeline registered for the value type `V`.
  pub fn run<V>(&self, initial: V) -> Result<V, ApplicationError>
  where
    V: 'static + Send + Sync + fmt::Debug,
  {
    event!(Level::DEBUG, value_type = %std::any::type_name::<V>(), "Attempting to run pipeline.");
    let type_id = TypeId::of::<V>();

    let runner_arc = self.registry.read().get(&type_id).cloned().ok_or_else(|| {
      let value_type = std::any::type_name::<V>();
      event!(Level::ERROR, "No pipeline registered for value type {}.", value_type);
      ApplicationError::from(CondflowError::PipelineMissing { value_type })
    })?;

    let erased_final = runner_arc.evaluate_erased(Box::new(initial))?;
    match erased_final.downcast::<V>() {
      Ok(boxed_value) => Ok(*boxed_value),
      Err(_) => {
        // The runner was registered under V's TypeId, so this indicates a
        // registry invariant violation rather than a caller mistake.
        event!(Level::ERROR, "Final value failed to downcast back to the registered type.");
        Err(ApplicationError::from(CondflowError::ValueTypeMismatch {
          expected_type: std::any::type_name::<V>(),
        }))
      }
    }
  }
}

impl<ApplicationError> Default for Condflow<ApplicationError>
where
  ApplicationError: std::error::Error + From<CondflowError> + Send + Sync + 'static,
{
  fn default() -> Self {
    Self::new()
  }
}

impl Condflow<CondflowError> {
  pub fn new_default() -> Self {
    Condflow::<CondflowError>::new()
  }
}
