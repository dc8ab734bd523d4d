use clap::{Args, Parser, Subcommand};
use rtti_common::SourceLocation;
use rtti_solver::EngineOptions;
use std::path::PathBuf;

/// CLI arguments for the rtti-check binary.
#[derive(Parser, Debug)]
#[command(
    name = "rtti-check",
    version,
    about = "Check values and descriptors against serialized type contracts"
)]
pub struct CliArgs {
    /// Disable colored output.
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    /// Only `any` is accepted as a universal source; `void` and `null`
    /// sources are related like any other type.
    #[arg(long = "strict-nullable-sources", global = true)]
    pub strict_nullable_sources: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl CliArgs {
    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions::default().with_strict_nullable_sources(self.strict_nullable_sources)
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check a JSON value against a descriptor.
    Check(CheckArgs),
    /// Decide whether one descriptor is assignable to another.
    Compat(CompatArgs),
    /// Print a descriptor.
    Print(PrintArgs),
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Descriptor document (JSON).
    #[arg(long)]
    pub types: PathBuf,

    /// Value to check (JSON).
    #[arg(long)]
    pub value: PathBuf,

    /// Descriptor to check against; defaults to the document root.
    #[arg(long)]
    pub root: Option<u32>,

    /// Source file reported with a violation.
    #[arg(long)]
    pub file: Option<String>,

    #[arg(long, default_value_t = 0)]
    pub line: u32,

    #[arg(long, default_value_t = 0)]
    pub column: u32,
}

impl CheckArgs {
    pub fn location(&self) -> SourceLocation {
        match &self.file {
            Some(file) => SourceLocation::new(file.clone(), self.line, self.column),
            None => SourceLocation::unknown(),
        }
    }
}

#[derive(Args, Debug)]
pub struct CompatArgs {
    /// Descriptor document (JSON).
    #[arg(long)]
    pub types: PathBuf,

    /// Index of the source descriptor.
    #[arg(long)]
    pub source: u32,

    /// Index of the target descriptor.
    #[arg(long)]
    pub target: u32,
}

#[derive(Args, Debug)]
pub struct PrintArgs {
    /// Descriptor document (JSON).
    #[arg(long)]
    pub types: PathBuf,

    /// Descriptor to print; defaults to the document root.
    #[arg(long)]
    pub root: Option<u32>,
}
