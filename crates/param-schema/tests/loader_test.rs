//! Integration tests for schema loading from files

use param_schema::{Bound, Error, FieldType, SchemaLoader};
use std::io::Write;
use std::path::PathBuf;

fn data_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

#[test]
fn loads_step_configuration_from_yaml_file() -> anyhow::Result<()> {
    let schema = SchemaLoader::new().load_from_file(&data_path("signup.yaml"))?;

    assert_eq!(schema.name(), Some("signup"));
    assert_eq!(schema.method(), Some("POST"));
    let names: Vec<&str> = schema.fields().iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["username", "age", "newsletter", "profile"]);

    let age = schema.field("age").unwrap();
    assert_eq!(age.field_type, FieldType::Int);
    assert_eq!(age.int_bounds(), (13, 150));
    assert_eq!(age.errmsg(), "parameter error: age");

    assert_eq!(schema.field("profile").unwrap().field_type, FieldType::Json);
    assert!(schema.patterns().contains("^[a-z][a-z0-9_]{2,15}$"));
    Ok(())
}

#[test]
fn loads_bare_schema_from_json_file() -> anyhow::Result<()> {
    let schema = SchemaLoader::new().load_from_file(&data_path("upload.json"))?;

    assert_eq!(schema.name(), Some("upload"));
    let file = schema.field("file").unwrap();
    assert_eq!(file.field_type, FieldType::File);
    assert!(file.required);
    assert_eq!(file.errno, 2001);

    let size = schema.field("size").unwrap();
    assert_eq!(size.field_type, FieldType::Long);
    assert_eq!(size.max_value, Some(Bound::Integer(10_485_760)));
    assert_eq!(size.long_bounds(), (i64::MIN, 10_485_760));

    assert_eq!(schema.field("ratio").unwrap().field_type, FieldType::Float);
    Ok(())
}

#[test]
fn reports_malformed_pattern_in_file() -> anyhow::Result<()> {
    let mut file = tempfile::Builder::new().suffix(".yml").tempfile()?;
    writeln!(file, "fields:\n  - name: code\n    pattern: \"(\"")?;

    match SchemaLoader::new().load_from_file(file.path()) {
        Err(Error::Pattern { field, pattern, .. }) => {
            assert_eq!(field, "code");
            assert_eq!(pattern, "(");
        }
        other => panic!("expected pattern error, got {other:?}"),
    }
    Ok(())
}

#[test]
fn missing_file_is_io_error() {
    let result = SchemaLoader::new().load_from_file(&data_path("does-not-exist.yaml"));
    assert!(matches!(result, Err(Error::Io(_))));
}
