//! Input step driven through the `Step` and `Context` traits

use param_ir::{FileHandle, Format, Value, decode::decode};
use param_pipeline::{Context, Continuation, InputStep, MapContext, Step, StepError};

const SIGNUP_STEP: &str = r#"
input:
  method: POST
  fields:
    - name: username
      required: true
      pattern: "^[a-z]{3,16}$"
      errno: 1001
      errmsg: invalid username
    - name: age
      type: int
      minValue: 13
      maxValue: 150
      errno: 1002
      errmsg: invalid age
    - name: prefs
      type: yaml
    - name: avatar
      type: file
"#;

fn signup_step() -> anyhow::Result<Box<dyn Step>> {
    let config = decode(Format::Yaml, SIGNUP_STEP)?;
    Ok(Box::new(InputStep::from_config(&config)?))
}

fn request(input: serde_json::Value) -> anyhow::Result<MapContext> {
    let root = serde_json::json!({ "request": { "method": "POST" }, "input": input });
    Ok(MapContext::from(serde_json::from_value::<Value>(root)?))
}

#[test]
fn successful_request_continues_with_done() -> anyhow::Result<()> {
    let step = signup_step()?;
    let mut ctx = request(serde_json::json!({
        "username": "erin",
        "age": 33,
        "prefs": "theme: dark\nsizes: [1, 2]"
    }))?;
    ctx.set(
        &["input", "avatar"],
        Value::File(FileHandle::new("me.jpg", 1024).with_location("/tmp/upload-1")),
    )?;

    let continuation = step.exec(&mut ctx);

    assert_eq!(continuation.name(), "done");
    assert_eq!(ctx.get(&["input", "age"]), Some(&Value::Integer(33)));
    assert_eq!(
        ctx.get(&["input", "prefs", "theme"]),
        Some(&Value::from("dark"))
    );
    assert!(matches!(ctx.get(&["input", "avatar"]), Some(Value::File(_))));
    Ok(())
}

#[test]
fn first_failure_becomes_error_continuation() -> anyhow::Result<()> {
    let step = signup_step()?;
    let mut ctx = request(serde_json::json!({ "username": "x", "age": 5 }))?;

    assert_eq!(
        step.exec(&mut ctx),
        Continuation::Error(StepError::new(1001, "invalid username"))
    );
    Ok(())
}

#[test]
fn partially_coerced_input_is_written_back() -> anyhow::Result<()> {
    let step = signup_step()?;
    let mut ctx = request(serde_json::json!({
        "username": "frank",
        "age": "40",
        "prefs": "[unclosed"
    }))?;

    let continuation = step.exec(&mut ctx);

    assert_eq!(continuation.name(), "error");
    assert_eq!(ctx.get(&["input", "age"]), Some(&Value::Integer(40)));
    assert_eq!(ctx.get(&["input", "prefs"]), Some(&Value::from("[unclosed")));
    Ok(())
}

#[test]
fn wrong_method_is_generic_error() -> anyhow::Result<()> {
    let step = signup_step()?;
    let mut ctx = request(serde_json::json!({ "username": "gina" }))?;
    ctx.set(&["request", "method"], Value::from("GET"))?;

    match step.exec(&mut ctx) {
        Continuation::Error(error) => {
            assert_eq!(error.errno, param_schema::ERRNO_INPUT);
            assert_eq!(error.errmsg, param_validation::METHOD_MISMATCH_MESSAGE);
        }
        other => panic!("expected error continuation, got {other:?}"),
    }
    Ok(())
}

#[test]
fn malformed_schema_fails_at_build_time() -> anyhow::Result<()> {
    let config = decode(Format::Json, r#"{"fields": [{"name": "code", "pattern": "[a-"}]}"#)?;
    let error = InputStep::from_config(&config).unwrap_err();
    assert!(matches!(
        error,
        param_pipeline::Error::Schema(param_schema::Error::Pattern { .. })
    ));
    Ok(())
}
