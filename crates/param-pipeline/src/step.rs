//! Pipeline steps
//!
//! [`InputStep`] validates the request input against its schema and
//! coerces it in place. It moves the input mapping out of the context for
//! the duration of the evaluation and always puts it back, including on
//! failure, where earlier fields may already hold coerced values.

use crate::config::StepConfig;
use crate::context::Context;
use crate::continuation::{Continuation, StepError};
use crate::Result;
use param_ir::{Map, Value};
use param_schema::{ERRNO_CONFIG, Schema, SchemaLoader};
use param_validation::SchemaEvaluator;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// A unit of request processing
pub trait Step: Send + Sync {
    /// Step name used in logs and by the runtime
    fn name(&self) -> &str;

    /// Run against a request context and pick the continuation
    fn exec(&self, ctx: &mut dyn Context) -> Continuation;
}

/// Validates and coerces the request input mapping
#[derive(Debug, Clone)]
pub struct InputStep {
    name: String,
    config: StepConfig,
    evaluator: SchemaEvaluator,
}

impl InputStep {
    pub const DEFAULT_NAME: &'static str = "input";

    /// Step over an already-built schema with default settings
    pub fn new(schema: Arc<Schema>) -> Self {
        Self {
            name: Self::DEFAULT_NAME.to_string(),
            config: StepConfig::default(),
            evaluator: SchemaEvaluator::new(schema),
        }
    }

    /// Build the step from its configuration value: step settings at the
    /// top level and the schema under `input` (or the value itself when it
    /// is a bare schema).
    ///
    /// # Errors
    ///
    /// Returns a schema error for malformed schemas, including patterns
    /// that do not compile, and a config error for malformed settings.
    pub fn from_config(config: &Value) -> Result<Self> {
        let settings = StepConfig::from_value(config)?;
        let schema = SchemaLoader::new().load_from_value(config)?;
        Ok(Self::new(Arc::new(schema)).with_config(settings))
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn with_config(mut self, config: StepConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &StepConfig {
        &self.config
    }

    pub fn schema(&self) -> &Arc<Schema> {
        self.evaluator.schema()
    }

    fn request_method(&self, ctx: &dyn Context) -> String {
        ctx.get(&self.config.method_path())
            .and_then(Value::as_text)
            .unwrap_or_else(|| self.config.default_method.clone())
    }

    /// Move the input mapping out of the context. A missing or non-map
    /// input evaluates as empty and is left where it was.
    fn take_input(&self, ctx: &mut dyn Context, path: &[&str]) -> Option<Map> {
        let is_map = match ctx.get(path) {
            Some(Value::Map(_)) => true,
            Some(other) => {
                warn!(
                    step = %self.name,
                    found = other.type_name(),
                    "Request input is not a mapping, validating as empty"
                );
                false
            }
            None => false,
        };
        if !is_map {
            return None;
        }
        match ctx.take(path) {
            Some(Value::Map(map)) => Some(map),
            _ => None,
        }
    }
}

impl Step for InputStep {
    fn name(&self) -> &str {
        &self.name
    }

    fn exec(&self, ctx: &mut dyn Context) -> Continuation {
        let method = self.request_method(ctx);
        let path = self.config.input_path();
        let taken = self.take_input(ctx, &path);
        let owned = taken.is_some();
        let mut input = taken.unwrap_or_default();

        debug!(step = %self.name, %method, fields = input.len(), "Validating request input");
        let result = self.evaluator.evaluate(&mut input, &method);

        if owned {
            if let Err(e) = ctx.set(&path, Value::Map(input)) {
                error!(step = %self.name, error = %e, "Failed to store request input");
                return Continuation::error(StepError::new(ERRNO_CONFIG, e.to_string()));
            }
        }

        match result {
            Ok(_) => Continuation::done(),
            Err(e) => {
                if e.is_configuration_defect() {
                    error!(
                        step = %self.name,
                        field = e.field().unwrap_or("-"),
                        diagnostic = e.diagnostic().unwrap_or(""),
                        "Schema configuration defect"
                    );
                }
                Continuation::error(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::MapContext;
    use param_ir::{Format, decode::decode};
    use param_schema::{FieldSpec, FieldType};

    fn context(json: &str) -> MapContext {
        MapContext::from(decode(Format::Json, json).unwrap())
    }

    fn age_step() -> InputStep {
        InputStep::new(Arc::new(
            Schema::new().add_field(
                FieldSpec::new("age")
                    .with_type(FieldType::Int)
                    .with_range(0_i64, 150_i64)
                    .with_error(1002, "bad age"),
            ),
        ))
    }

    #[test]
    fn test_done_writes_coerced_input_back() {
        let mut ctx = context(r#"{"input": {"age": "30"}}"#);
        let continuation = age_step().exec(&mut ctx);
        assert_eq!(continuation, Continuation::done());
        assert_eq!(ctx.get(&["input", "age"]), Some(&Value::Integer(30)));
    }

    #[test]
    fn test_error_continuation_keeps_input() {
        let mut ctx = context(r#"{"input": {"age": "300"}}"#);
        let continuation = age_step().exec(&mut ctx);
        assert_eq!(continuation, Continuation::Error(StepError::new(1002, "bad age")));
        assert_eq!(ctx.get(&["input", "age"]), Some(&Value::from("300")));
    }

    #[test]
    fn test_method_defaults_to_get() {
        let step = InputStep::new(Arc::new(Schema::new().with_method("GET")));
        let mut ctx = MapContext::new();
        assert!(step.exec(&mut ctx).is_done());

        let step = InputStep::new(Arc::new(Schema::new().with_method("POST")));
        assert!(!step.exec(&mut ctx).is_done());
    }

    #[test]
    fn test_method_read_from_context() {
        let step = InputStep::new(Arc::new(Schema::new().with_method("POST")));
        let mut ctx = context(r#"{"request": {"method": "POST"}}"#);
        assert!(step.exec(&mut ctx).is_done());
    }

    #[test]
    fn test_missing_input_validates_as_empty() {
        let step = InputStep::new(Arc::new(
            Schema::new().add_field(FieldSpec::new("q").required().with_error(5, "q required")),
        ));
        let mut ctx = MapContext::new();
        assert_eq!(
            step.exec(&mut ctx),
            Continuation::Error(StepError::new(5, "q required"))
        );
        assert!(ctx.get(&["input"]).is_none());
    }

    #[test]
    fn test_non_map_input_left_in_place() {
        let mut ctx = context(r#"{"input": "flat"}"#);
        assert!(age_step().exec(&mut ctx).is_done());
        assert_eq!(ctx.get(&["input"]), Some(&Value::from("flat")));
    }

    #[test]
    fn test_custom_paths() {
        let config = decode(
            Format::Yaml,
            "inputPath: [body]\nmethodPath: [verb]\ninput:\n  method: PUT\n  fields:\n    - name: n\n      type: long\n",
        )
        .unwrap();
        let step = InputStep::from_config(&config).unwrap().with_name("update");
        assert_eq!(step.name(), "update");

        let mut ctx = context(r#"{"verb": "PUT", "body": {"n": "9"}}"#);
        assert!(step.exec(&mut ctx).is_done());
        assert_eq!(ctx.get(&["body", "n"]), Some(&Value::Integer(9)));
    }

    #[test]
    fn test_pattern_compile_error_surfaces_as_config_errno() {
        let step = InputStep::new(Arc::new(
            Schema::new().add_field(FieldSpec::new("code").with_pattern("(")),
        ));
        let mut ctx = context(r#"{"input": {"code": "x"}}"#);
        match step.exec(&mut ctx) {
            Continuation::Error(e) => assert_eq!(e.errno, ERRNO_CONFIG),
            other => panic!("expected error continuation, got {other:?}"),
        }
    }
}
