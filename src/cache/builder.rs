//! View Builder Module
//!
//! The collaborator the cache calls to construct a view for a key.

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};

use thiserror::Error;

// == Build Error ==
/// Failure to construct a view.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// No view (or no resource backing it) exists for the key
    #[error("no view registered for '{0}'")]
    NotFound(String),

    /// The view exists but could not be built
    #[error("failed to build view '{key}': {reason}")]
    Failed { key: String, reason: String },
}

impl BuildError {
    /// Shorthand for a [`BuildError::Failed`] on `key`.
    pub fn failed(key: &str, reason: impl Into<String>) -> Self {
        BuildError::Failed {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

// == View Builder ==
/// Synchronously constructs the view identified by `key`.
///
/// Builders are shared between the cache owner and the preload workers, so
/// they must be `Send + Sync`. Any `Fn(&str) -> Result<V, BuildError>` closure
/// is a builder.
pub trait ViewBuilder<V>: Send + Sync {
    fn build(&self, key: &str) -> Result<V, BuildError>;
}

impl<V, F> ViewBuilder<V> for F
where
    F: Fn(&str) -> Result<V, BuildError> + Send + Sync,
{
    fn build(&self, key: &str) -> Result<V, BuildError> {
        self(key)
    }
}

/// Runs `builder` for `key`, reporting a panic inside the builder as
/// [`BuildError::Failed`] instead of unwinding into the caller.
pub fn build_guarded<V>(builder: &dyn ViewBuilder<V>, key: &str) -> Result<V, BuildError> {
    catch_unwind(AssertUnwindSafe(|| builder.build(key)))
        .unwrap_or_else(|payload| Err(BuildError::failed(key, panic_reason(payload.as_ref()))))
}

fn panic_reason(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|msg| format!("builder panicked: {msg}"))
        .or_else(|| {
            payload
                .downcast_ref::<String>()
                .map(|msg| format!("builder panicked: {msg}"))
        })
        .unwrap_or_else(|| "builder panicked".to_string())
}
