use anyhow::Result;
use clap::Parser;
use std::io::IsTerminal;

use rtti_cli::args::CliArgs;
use rtti_cli::driver;
use rtti_cli::reporter::Reporter;

/// Exit status when a value violates its type.
const EXIT_VIOLATION: i32 = 1;

fn main() -> Result<()> {
    // RTTI_LOG / RUST_LOG, RTTI_LOG_FORMAT=text|tree|json.
    rtti_cli::tracing_config::init_tracing();

    let args = CliArgs::parse();
    let color = !args.no_color && std::io::stdout().is_terminal();

    let verdict = driver::run(&args)?;
    println!("{}", Reporter::new(color).render(&verdict));

    if !verdict.is_success() {
        std::process::exit(EXIT_VIOLATION);
    }
    Ok(())
}
