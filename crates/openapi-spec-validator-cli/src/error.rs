use thiserror::Error;

/// CLI-specific argument failures `clap`'s declarative validation cannot
/// express on its own: the deprecated `--errors` flag accepts a raw string
/// (for backward compatibility with the flag it replaces) rather than a
/// `ValueEnum`, so its value is checked by hand.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("unknown value '{0}' for --errors/--subschema-errors (expected 'best-match' or 'all')")]
    UnknownSubschemaErrorsValue(String),
}
