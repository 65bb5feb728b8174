//! What a step hands back to the pipeline runtime

use param_validation::ValidationError;
use serde::Serialize;
use thiserror::Error;

/// Name of the success continuation
pub const DONE: &str = "done";

/// Error surfaced to the caller of a failed step
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("{errmsg} (errno {errno})")]
pub struct StepError {
    pub errno: i32,
    pub errmsg: String,
}

impl StepError {
    pub fn new(errno: i32, errmsg: impl Into<String>) -> Self {
        Self {
            errno,
            errmsg: errmsg.into(),
        }
    }
}

impl From<&ValidationError> for StepError {
    fn from(error: &ValidationError) -> Self {
        Self::new(error.errno(), error.message())
    }
}

impl From<ValidationError> for StepError {
    fn from(error: ValidationError) -> Self {
        Self::from(&error)
    }
}

/// Outcome of running a step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Continuation {
    /// Continue with the named next step
    Done { name: String },
    /// Abort the request with this error
    Error(StepError),
}

impl Continuation {
    /// The `done` continuation
    pub fn done() -> Self {
        Continuation::Done {
            name: DONE.to_string(),
        }
    }

    pub fn error(error: impl Into<StepError>) -> Self {
        Continuation::Error(error.into())
    }

    /// Continuation name the runtime resolves to the next step
    pub fn name(&self) -> &str {
        match self {
            Continuation::Done { name } => name,
            Continuation::Error(_) => "error",
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, Continuation::Done { .. })
    }
}
