//! Pipeline driver
//!
//! Gates a parsed file on its diagnostics, lowers it with options from
//! `vbx.toml` and writes the program for the external renderer.

mod config;
mod error;

pub use config::{CompareSetting, LoweringConfig, OutputConfig, TranspileConfig};
pub use error::{ConfigError, DriverError};

use anyhow::{Context, Result};
use std::path::Path;
use tracing::{info, instrument, warn};
use tracing_subscriber::EnvFilter;
use vb_ir::IrProgram;
use vb_syntax::{ParsedFile, Severity};

/// Environment variable holding the log filter
pub const LOG_ENV: &str = "VBX_LOG";

/// How a lowered program is written out
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON consumed by the renderer
    #[default]
    Json,
    /// Human-readable pseudo code
    Pretty,
}

/// Installs a stderr subscriber filtered by `VBX_LOG`, `warn` by default
///
/// Safe to call more than once; later calls leave the first subscriber in
/// place.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}

/// Lowers one parsed file
///
/// # Errors
///
/// [`DriverError::Diagnostics`] when the parser reported errors,
/// [`DriverError::Lower`] when lowering fails.
#[instrument(skip_all, fields(file = %parsed.name))]
pub fn transpile(parsed: &ParsedFile, config: &TranspileConfig) -> Result<IrProgram, DriverError> {
    for diagnostic in &parsed.diagnostics {
        if diagnostic.severity == Severity::Warning {
            warn!(%diagnostic, "parse warning");
        }
    }
    let count = parsed.error_count();
    if count > 0 {
        return Err(DriverError::Diagnostics {
            file: parsed.name.clone(),
            count,
        });
    }
    let program = vb_lower::lower_file(&parsed.tree, &config.lower_options())?;
    info!(ty = %program.ty.name, "transpiled");
    Ok(program)
}

/// Renders a program in `format`
///
/// # Errors
///
/// Fails only when JSON serialization fails.
pub fn render(program: &IrProgram, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => program.to_json().context("failed to serialize program"),
        OutputFormat::Pretty => Ok(program.to_string()),
    }
}

/// Loads the configuration at `config` (defaults when absent), lowers
/// `parsed` and writes the result to `output`
///
/// # Errors
///
/// Any configuration, lowering or I/O failure, with context.
pub fn transpile_to_path(
    parsed: &ParsedFile,
    config: Option<&Path>,
    format: OutputFormat,
    output: impl AsRef<Path>,
) -> Result<()> {
    let output = output.as_ref();
    let config = match config {
        Some(path) => TranspileConfig::load(path)
            .with_context(|| format!("failed to load configuration {}", path.display()))?,
        None => TranspileConfig::default(),
    };
    let program =
        transpile(parsed, &config).with_context(|| format!("failed to lower {}", parsed.name))?;
    let rendered = render(&program, format)?;
    std::fs::write(output, rendered)
        .map_err(DriverError::from)
        .with_context(|| format!("failed to write {}", output.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use vb_span::Span;
    use vb_syntax::token::BlockType;
    use vb_syntax::{Decl, Diagnostic, File, NodeKind, TreeBuilder};

    fn empty_module() -> ParsedFile {
        let mut builder = TreeBuilder::new();
        let end = builder
            .alloc(
                NodeKind::EndBlockDeclaration,
                Span::default(),
                Decl::EndBlock {
                    block: BlockType::Module,
                },
            )
            .unwrap();
        let declarations = builder
            .collection(
                NodeKind::DeclarationCollection,
                Span::default(),
                vec![Some(end)],
                Vec::new(),
            )
            .unwrap();
        let root = builder
            .alloc(
                NodeKind::File,
                Span::default(),
                File {
                    declarations: Some(declarations),
                },
            )
            .unwrap();
        ParsedFile::new("Empty.bas", builder.finish(root).unwrap())
    }

    #[test]
    fn test_errors_block_lowering() {
        let mut parsed = empty_module();
        parsed
            .diagnostics
            .push(Diagnostic::warning(Span::default(), "unused label"));
        assert!(transpile(&parsed, &TranspileConfig::default()).is_ok());
        parsed
            .diagnostics
            .push(Diagnostic::error(Span::default(), "expected End If"));
        let error = transpile(&parsed, &TranspileConfig::default()).unwrap_err();
        assert!(matches!(error, DriverError::Diagnostics { count: 1, .. }));
    }

    #[test]
    fn test_bare_file_gets_configured_name() {
        let mut config = TranspileConfig::default();
        config.output.class_name = "Legacy".to_string();
        config.output.namespace = Some("Converted".to_string());
        let program = transpile(&empty_module(), &config).unwrap();
        assert_eq!(program.ty.name, "Legacy");
        assert_eq!(program.namespace.as_deref(), Some("Converted"));
        assert!(program.ty.members.is_empty());
    }

    #[test]
    fn test_writes_json_and_pretty_output() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("vbx.toml");
        std::fs::write(&config_path, "[output]\nclass-name = \"Program\"\n").unwrap();

        let json = dir.path().join("out.json");
        transpile_to_path(&empty_module(), Some(&config_path), OutputFormat::Json, &json).unwrap();
        let written = std::fs::read_to_string(&json).unwrap();
        assert!(written.contains("\"name\": \"Program\""));

        let pretty = dir.path().join("out.cs");
        transpile_to_path(&empty_module(), None, OutputFormat::Pretty, &pretty).unwrap();
        let written = std::fs::read_to_string(&pretty).unwrap();
        assert!(written.contains("static class Module1"));
    }

    #[test]
    fn test_bad_config_is_reported_with_context() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("vbx.toml");
        std::fs::write(&config_path, "[lowering]\noption-base = 7\n").unwrap();
        let error = transpile_to_path(
            &empty_module(),
            Some(&config_path),
            OutputFormat::Json,
            dir.path().join("out.json"),
        )
        .unwrap_err();
        assert!(error.to_string().starts_with("failed to load configuration"));
    }
}
