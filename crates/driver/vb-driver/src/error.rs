use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;
use vb_lower::LowerError;

/// Configuration could not be read or is invalid
#[derive(Error, Debug, Diagnostic)]
pub enum ConfigError {
    #[error("cannot read {}", path.display())]
    #[diagnostic(code(config::read))]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    #[diagnostic(code(config::parse))]
    Parse(#[from] toml::de::Error),

    #[error("option-base must be 0 or 1, found {0}")]
    #[diagnostic(code(config::invalid_base))]
    InvalidBase(u8),
}

/// Failure of one pipeline run
#[derive(Error, Debug, Diagnostic)]
pub enum DriverError {
    #[error("{file} has {count} parse error(s); refusing to lower")]
    #[diagnostic(
        code(driver::diagnostics),
        help("fix the reported parse errors first")
    )]
    Diagnostics { file: String, count: usize },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Lower(#[from] LowerError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error("cannot write output")]
    #[diagnostic(code(driver::io))]
    Io(#[from] std::io::Error),
}
