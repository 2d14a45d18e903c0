#![allow(clippy::print_stdout)]

mod error;

use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use openapi_spec_validator::{DefaultReader, OasError, Reader, SpecValidator, SpecVersion};
use tracing_subscriber::EnvFilter;

use crate::error::CliError;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SchemaArg {
    Detect,
    #[value(name = "2.0")]
    V20,
    #[value(name = "3.0")]
    V30,
    #[value(name = "3.1")]
    V31,
    #[value(name = "3.2")]
    V32,
}

impl SchemaArg {
    fn resolve(self) -> Option<SpecVersion> {
        match self {
            SchemaArg::Detect => None,
            SchemaArg::V20 => Some(SpecVersion::V2),
            SchemaArg::V30 => Some(SpecVersion::V30),
            SchemaArg::V31 => Some(SpecVersion::V31),
            SchemaArg::V32 => Some(SpecVersion::V32),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum SubschemaErrors {
    BestMatch,
    All,
}

impl SubschemaErrors {
    fn parse_legacy(raw: &str) -> Result<SubschemaErrors, CliError> {
        match raw {
            "best-match" => Ok(SubschemaErrors::BestMatch),
            "all" => Ok(SubschemaErrors::All),
            other => Err(CliError::UnknownSubschemaErrorsValue(other.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ValidationErrors {
    First,
    All,
}

/// A command-line tool for validating OpenAPI/Swagger documents.
#[derive(Parser)]
#[command(name = "openapi-spec-validator")]
struct Cli {
    /// One or more OpenAPI documents to validate. `-` or `/-` reads stdin.
    #[arg(value_parser, required_unless_present("version"))]
    files: Vec<String>,

    #[arg(long, value_enum, default_value_t = SchemaArg::Detect)]
    schema: SchemaArg,

    #[arg(long, value_enum, default_value_t = SubschemaErrors::BestMatch, conflicts_with = "errors")]
    subschema_errors: SubschemaErrors,

    /// Deprecated alias of `--subschema-errors`.
    #[arg(long)]
    errors: Option<String>,

    #[arg(long, value_enum, default_value_t = ValidationErrors::First)]
    validation_errors: ValidationErrors,

    /// Show the crate version and exit.
    #[arg(short = 'V', long = "version")]
    version: bool,
}

fn warn_deprecated() -> bool {
    std::env::var("OPENAPI_SPEC_VALIDATOR_WARN_DEPRECATED")
        .map(|v| v != "0")
        .unwrap_or(true)
}

/// Renders one error according to `mode`. `SchemaError.causes` stands in for
/// the JSON Schema engine's composite/`context` errors; the `jsonschema`
/// crate's flat `iter_errors` never populates it today, so `best-match` and
/// `all` render identically until a composite error actually carries nested
/// causes — the branch exists for when that changes, not speculatively.
fn render(error: &OasError, mode: SubschemaErrors, indent: usize) -> String {
    let prefix = "  ".repeat(indent);
    let mut rendered = format!("{prefix}{error}");
    if let OasError::SchemaError { causes, .. } = error {
        match mode {
            SubschemaErrors::BestMatch => {
                if let Some(first) = causes.first() {
                    rendered.push('\n');
                    rendered.push_str(&render(first, mode, indent + 1));
                }
            }
            SubschemaErrors::All => {
                for cause in causes {
                    rendered.push('\n');
                    rendered.push_str(&render(cause, mode, indent + 1));
                }
            }
        }
    }
    rendered
}

fn validate_one(path: &str, version: Option<SpecVersion>) -> Result<Vec<OasError>, String> {
    let document = DefaultReader.read_document(path).map_err(|error| error.to_string())?;
    let validator = match version {
        Some(version) => SpecValidator::for_version(document, "", version),
        None => SpecValidator::new(document, "").map_err(|error| error.to_string())?,
    };
    Ok(validator.into_errors())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();

    if cli.version {
        println!(concat!("openapi-spec-validator ", env!("CARGO_PKG_VERSION")));
        return ExitCode::SUCCESS;
    }

    let subschema_errors = match &cli.errors {
        Some(raw) => match SubschemaErrors::parse_legacy(raw) {
            Ok(mode) => {
                if warn_deprecated() {
                    eprintln!("warning: --errors is deprecated, use --subschema-errors instead");
                }
                mode
            }
            Err(error) => {
                eprintln!("error: {error}");
                return ExitCode::from(2);
            }
        },
        None => cli.subschema_errors,
    };

    let version = cli.schema.resolve();
    let mut all_valid = true;

    for path in &cli.files {
        match validate_one(path, version) {
            Ok(errors) if errors.is_empty() => {
                println!("{path} - VALID");
            }
            Ok(errors) => {
                all_valid = false;
                println!("{path} - INVALID. Errors:");
                let to_print: Box<dyn Iterator<Item = &OasError>> = match cli.validation_errors {
                    ValidationErrors::First => Box::new(errors.iter().take(1)),
                    ValidationErrors::All => Box::new(errors.iter()),
                };
                for (index, error) in to_print.enumerate() {
                    println!("{}. {}", index + 1, render(error, subschema_errors, 0));
                }
            }
            Err(message) => {
                all_valid = false;
                println!("{path} - INVALID. Errors:");
                println!("1. {message}");
            }
        }
    }

    if all_valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}
