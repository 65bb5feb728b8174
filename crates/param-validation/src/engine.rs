//! Schema evaluator
//!
//! Runs the method guard once, then validates fields strictly in
//! declaration order, writing coerced values back into the input mapping
//! as it goes. The first failure ends the evaluation.
//!
//! There is no rollback: when a later field fails, values coerced for
//! earlier fields stay in the mapping. Callers abort the request on error,
//! so the partially-coerced mapping is never consumed as valid input.

use crate::error::ValidationError;
use crate::field::{FieldOutcome, validate_field};
use crate::method::check_method;
use param_ir::Map;
use param_schema::Schema;
use std::sync::Arc;
use tracing::{debug, trace};

/// Lifecycle of one evaluation
#[derive(Debug, Clone, PartialEq)]
pub enum EvaluationState {
    /// Schema and input bound; nothing checked yet
    Pending,
    /// Fields before `next` have been validated
    Running { next: usize },
    /// Every field passed
    Succeeded,
    /// Evaluation stopped at this error
    Failed(ValidationError),
}

impl EvaluationState {
    /// Whether no further steps will run
    pub fn is_terminal(&self) -> bool {
        matches!(self, EvaluationState::Succeeded | EvaluationState::Failed(_))
    }
}

/// Summary of a successful evaluation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EvaluationReport {
    /// Fields whose input entry was replaced by a coerced value
    pub coerced: Vec<String>,
    /// Fields accepted unchanged
    pub accepted: Vec<String>,
    /// Optional fields absent from the input
    pub skipped: Vec<String>,
}

impl EvaluationReport {
    /// Number of fields that were evaluated
    pub fn fields_evaluated(&self) -> usize {
        self.coerced.len() + self.accepted.len() + self.skipped.len()
    }
}

/// One pass of a schema over one input mapping.
///
/// The evaluation holds the only mutable borrow of the mapping for its
/// whole lifetime, so no reader can observe it half-coerced.
#[derive(Debug)]
pub struct Evaluation<'a> {
    schema: &'a Schema,
    input: &'a mut Map,
    method: &'a str,
    state: EvaluationState,
    report: EvaluationReport,
}

impl<'a> Evaluation<'a> {
    /// Bind a schema, an input mapping and the request method
    pub fn new(schema: &'a Schema, input: &'a mut Map, method: &'a str) -> Self {
        Self {
            schema,
            input,
            method,
            state: EvaluationState::Pending,
            report: EvaluationReport::default(),
        }
    }

    /// Current state
    pub fn state(&self) -> &EvaluationState {
        &self.state
    }

    /// Progress made so far
    pub fn report(&self) -> &EvaluationReport {
        &self.report
    }

    /// Advance by one unit of work: the method guard from `Pending`, or a
    /// single field from `Running`. Terminal states do not change.
    pub fn step(&mut self) -> &EvaluationState {
        self.state = match std::mem::replace(&mut self.state, EvaluationState::Pending) {
            EvaluationState::Pending => match check_method(self.schema, self.method) {
                Ok(()) => self.after_field(0),
                Err(error) => EvaluationState::Failed(error),
            },
            EvaluationState::Running { next } => self.evaluate_field(next),
            terminal => terminal,
        };
        &self.state
    }

    /// Step until a terminal state is reached
    ///
    /// # Errors
    ///
    /// The error that moved the evaluation to `Failed`.
    pub fn run(mut self) -> Result<EvaluationReport, ValidationError> {
        while !self.state.is_terminal() {
            self.step();
        }
        match self.state {
            EvaluationState::Failed(error) => Err(error),
            _ => Ok(self.report),
        }
    }

    fn evaluate_field(&mut self, index: usize) -> EvaluationState {
        let Some(spec) = self.schema.fields().get(index) else {
            return EvaluationState::Succeeded;
        };

        match validate_field(spec, self.schema.patterns(), self.input) {
            Ok(FieldOutcome::Skipped) => {
                self.report.skipped.push(spec.name.clone());
            }
            Ok(FieldOutcome::Accepted) => {
                trace!(field = %spec.name, "Field accepted");
                self.report.accepted.push(spec.name.clone());
            }
            Ok(FieldOutcome::Coerced(value)) => {
                trace!(field = %spec.name, field_type = %spec.field_type, "Field coerced");
                self.input.insert(spec.name.clone(), value);
                self.report.coerced.push(spec.name.clone());
            }
            Err(error) => {
                debug!(
                    field = %spec.name,
                    kind = %error.kind(),
                    errno = error.errno(),
                    diagnostic = error.diagnostic().unwrap_or(""),
                    "Field validation failed"
                );
                return EvaluationState::Failed(error);
            }
        }
        self.after_field(index + 1)
    }

    fn after_field(&self, next: usize) -> EvaluationState {
        if next >= self.schema.len() {
            EvaluationState::Succeeded
        } else {
            EvaluationState::Running { next }
        }
    }
}

/// Reusable evaluator bound to one shared, immutable schema
#[derive(Debug, Clone)]
pub struct SchemaEvaluator {
    schema: Arc<Schema>,
}

impl SchemaEvaluator {
    /// Create an evaluator for a shared schema
    pub fn new(schema: Arc<Schema>) -> Self {
        Self { schema }
    }

    /// The schema this evaluator applies
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Validate and coerce `input` in place for a request using `method`.
    ///
    /// # Errors
    ///
    /// The first failure from the method guard or a field, in declaration
    /// order. `input` may already hold coerced values for earlier fields.
    pub fn evaluate(
        &self,
        input: &mut Map,
        method: &str,
    ) -> Result<EvaluationReport, ValidationError> {
        let result = Evaluation::new(&self.schema, input, method).run();
        match &result {
            Ok(report) => debug!(
                schema = self.schema.name().unwrap_or("-"),
                coerced = report.coerced.len(),
                skipped = report.skipped.len(),
                "Input validated"
            ),
            Err(error) => debug!(
                schema = self.schema.name().unwrap_or("-"),
                field = error.field().unwrap_or("-"),
                "Input rejected"
            ),
        }
        result
    }
}

impl From<Schema> for SchemaEvaluator {
    fn from(schema: Schema) -> Self {
        Self::new(Arc::new(schema))
    }
}
