//! Runs one `rtti-check` subcommand and collects what to print.

use crate::args::{CheckArgs, CliArgs, Command, CompatArgs, PrintArgs};
use anyhow::{Context, Result, anyhow};
use rtti_solver::{
    EngineError, Type, TypeEngine, TypeFormatter, TypeTable, Value, WireDocument, WireRef,
};
use std::path::Path;
use tracing::{debug, info};

/// What a subcommand decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Conforms,
    /// The value does not conform; carries the rendered diagnostic.
    Violation(String),
    Compatible,
    Incompatible,
    /// A printed descriptor.
    Printed(String),
}

impl Verdict {
    /// Only violations fail the process.
    pub fn is_success(&self) -> bool {
        !matches!(self, Verdict::Violation(_))
    }
}

pub fn run(args: &CliArgs) -> Result<Verdict> {
    let mut engine = TypeEngine::with_options(args.engine_options());
    match &args.command {
        Command::Check(check) => run_check(&mut engine, check),
        Command::Compat(compat) => run_compat(&mut engine, compat),
        Command::Print(print) => run_print(print),
    }
}

fn run_check(engine: &mut TypeEngine, args: &CheckArgs) -> Result<Verdict> {
    let table = load_table(&args.types)?;
    let ty = select(&table, args.root)?;

    let source = std::fs::read_to_string(&args.value)
        .with_context(|| format!("failed to read value {}", args.value.display()))?;
    let json: serde_json::Value = serde_json::from_str(&source)
        .with_context(|| format!("failed to parse value {}", args.value.display()))?;
    let value = Value::from_json(&json);

    match engine.assert_type(value, ty, args.location()) {
        Ok(_) => Ok(Verdict::Conforms),
        Err(EngineError::Violation(violation)) => Ok(Verdict::Violation(violation.to_string())),
        Err(err) => Err(err).context("value check failed"),
    }
}

fn run_compat(engine: &mut TypeEngine, args: &CompatArgs) -> Result<Verdict> {
    let table = load_table(&args.types)?;
    let source = select(&table, Some(args.source))?;
    let target = select(&table, Some(args.target))?;
    let compatible = engine
        .is_compatible(source, target)
        .context("compatibility check failed")?;
    let stats = engine.cache_stats();
    debug!(
        judgments = engine.uncached_judgments(),
        cache_entries = stats.entries,
        "compatibility decided"
    );
    Ok(if compatible {
        Verdict::Compatible
    } else {
        Verdict::Incompatible
    })
}

fn run_print(args: &PrintArgs) -> Result<Verdict> {
    let table = load_table(&args.types)?;
    let ty = select(&table, args.root)?;
    Ok(Verdict::Printed(TypeFormatter::new().format(ty)))
}

fn load_table(path: &Path) -> Result<TypeTable> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read descriptors {}", path.display()))?;
    let document = WireDocument::from_json_str(&source)
        .with_context(|| format!("failed to parse descriptors {}", path.display()))?;
    let table = document
        .decode()
        .with_context(|| format!("failed to decode descriptors {}", path.display()))?;
    info!(path = %path.display(), descriptors = table.len(), "loaded descriptor document");
    Ok(table)
}

fn select(table: &TypeTable, index: Option<u32>) -> Result<&Type> {
    match index {
        None => Ok(table.root()),
        Some(index) => table.get(WireRef(index)).ok_or_else(|| {
            anyhow!(
                "descriptor {index} is out of range for a document of {} descriptors",
                table.len()
            )
        }),
    }
}
