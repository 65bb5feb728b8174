//! # param-cli
//!
//! Command-line front end for the request input validator.
//!
//! `param validate` runs the input step of a step configuration against a
//! JSON or YAML input document and prints the continuation. `param check`
//! loads a schema and prints its field summary.

use anyhow::{Context as _, Result, bail};
use clap::{Parser, Subcommand};
use param_ir::decode::decode;
use param_ir::{FileHandle, Format, Map, Value};
use param_pipeline::{Context, Continuation, InputStep, MapContext, Step};
use param_schema::SchemaLoader;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Input was valid and the step continued with `done`
const EXIT_DONE: u8 = 0;
/// The step continued with a validation error
const EXIT_REJECTED: u8 = 1;
/// Configuration or input files could not be used
const EXIT_CONFIG: u8 = 2;

#[derive(Parser)]
#[command(name = "param")]
#[command(about = "Validate and coerce request parameters against a declarative schema")]
#[command(version)]
struct Cli {
    /// Log level when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate an input document against a step configuration
    Validate {
        /// Step configuration or bare schema (.json, .yaml, .yml)
        #[arg(short, long)]
        config: PathBuf,

        /// Input document holding the request parameters
        #[arg(short, long)]
        input: PathBuf,

        /// Request method; the step's default applies when omitted
        #[arg(short, long)]
        method: Option<String>,

        /// Attach an uploaded file as NAME=PATH (repeatable)
        #[arg(short, long = "file", value_name = "NAME=PATH")]
        files: Vec<String>,

        /// Pretty-print the JSON result
        #[arg(long)]
        pretty: bool,
    },

    /// Load a schema and print its fields
    Check {
        /// Step configuration or bare schema (.json, .yaml, .yml)
        #[arg(short, long)]
        config: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let outcome = match cli.command {
        Commands::Validate {
            config,
            input,
            method,
            files,
            pretty,
        } => validate(&config, &input, method, &files, pretty),
        Commands::Check { config } => check(&config),
    };

    match outcome {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(EXIT_CONFIG)
        }
    }
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_document(path: &Path) -> Result<Value> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let format = Format::from_extension(path.extension().and_then(|e| e.to_str()));
    decode(format, &text).with_context(|| format!("decoding {}", path.display()))
}

/// Build a file handle from a `NAME=PATH` argument
fn parse_file_arg(arg: &str) -> Result<(String, FileHandle)> {
    let Some((name, path)) = arg.split_once('=') else {
        bail!("--file expects NAME=PATH, got '{arg}'");
    };
    if name.is_empty() {
        bail!("--file expects a non-empty field name, got '{arg}'");
    }
    let path = PathBuf::from(path);
    let metadata =
        std::fs::metadata(&path).with_context(|| format!("reading {}", path.display()))?;
    if !metadata.is_file() {
        bail!("{} is not a regular file", path.display());
    }
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok((
        name.to_string(),
        FileHandle::new(filename, metadata.len()).with_location(path),
    ))
}

fn validate(
    config: &Path,
    input: &Path,
    method: Option<String>,
    files: &[String],
    pretty: bool,
) -> Result<u8> {
    let step = InputStep::from_config(&read_document(config)?)
        .with_context(|| format!("loading step configuration {}", config.display()))?;

    let mut params = match read_document(input)? {
        Value::Map(map) => map,
        Value::Null => Map::new(),
        other => bail!(
            "input document must be a mapping, found {}",
            other.type_name()
        ),
    };
    for arg in files {
        let (name, handle) = parse_file_arg(arg)?;
        params.insert(name, Value::File(handle));
    }

    let mut ctx = MapContext::new();
    let input_path = step.config().input_path();
    ctx.set(&input_path, Value::Map(params))?;
    if let Some(method) = method {
        ctx.set(&step.config().method_path(), Value::String(method))?;
    }

    tracing::info!(step = step.name(), config = %config.display(), "Running input step");
    let continuation = step.exec(&mut ctx);

    let (output, code) = match &continuation {
        Continuation::Done { name } => {
            let coerced = ctx.get(&input_path).cloned().unwrap_or_default();
            (
                serde_json::json!({ "continuation": name, "input": coerced }),
                EXIT_DONE,
            )
        }
        Continuation::Error(error) => (
            serde_json::json!({
                "continuation": continuation.name(),
                "errno": error.errno,
                "errmsg": error.errmsg,
            }),
            EXIT_REJECTED,
        ),
    };
    print_json(&output, pretty)?;
    Ok(code)
}

fn check(config: &Path) -> Result<u8> {
    let schema = SchemaLoader::new()
        .load_from_file(config)
        .with_context(|| format!("loading schema {}", config.display()))?;

    let fields: Vec<_> = schema
        .fields()
        .iter()
        .map(|field| {
            serde_json::json!({
                "name": field.name,
                "type": field.field_type.to_string(),
                "required": field.required,
                "pattern": field.pattern(),
                "errno": field.errno,
                "errmsg": field.errmsg(),
            })
        })
        .collect();
    let summary = serde_json::json!({
        "name": schema.name(),
        "method": schema.method(),
        "fields": fields,
    });
    print_json(&summary, true)?;
    Ok(EXIT_DONE)
}

fn print_json(value: &serde_json::Value, pretty: bool) -> Result<()> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{text}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_file_arg() -> Result<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        file.write_all(b"hello")?;
        let arg = format!("avatar={}", file.path().display());

        let (name, handle) = parse_file_arg(&arg)?;
        assert_eq!(name, "avatar");
        assert_eq!(handle.size, 5);
        assert_eq!(handle.location.as_deref(), Some(file.path()));
        Ok(())
    }

    #[test]
    fn test_parse_file_arg_rejects_bad_syntax() {
        assert!(parse_file_arg("no-separator").is_err());
        assert!(parse_file_arg("=/tmp/x").is_err());
        assert!(parse_file_arg("f=/definitely/not/here").is_err());
    }

    #[test]
    fn test_cli_parses_repeated_files() {
        let cli = Cli::try_parse_from([
            "param", "validate", "-c", "step.yaml", "-i", "in.json", "--file", "a=x", "--file",
            "b=y", "--method", "POST",
        ])
        .unwrap();
        match cli.command {
            Commands::Validate { files, method, .. } => {
                assert_eq!(files, vec!["a=x", "b=y"]);
                assert_eq!(method.as_deref(), Some("POST"));
            }
            Commands::Check { .. } => panic!("expected validate"),
        }
        assert_eq!(cli.log_level, "warn");
    }
}
