#![allow(clippy::print_stderr)]

use anyhow::Result;
use clap::Parser;
use std::io::IsTerminal;

use objrest::cli::args::CliArgs;
use objrest::cli::driver;
use objrest::cli::reporter::Reporter;

const EXIT_DIAGNOSTICS: i32 = 1;

fn main() -> Result<()> {
    // Zero cost unless OBJREST_LOG or RUST_LOG is set.
    objrest::tracing_config::init_tracing();

    let args = CliArgs::parse();
    let result = driver::compile(&args)?;

    if result.has_errors() {
        let reporter = Reporter::new(std::io::stderr().is_terminal());
        eprint!("{}", reporter.render(&driver::input_name(&args), &result.diagnostics));
        std::process::exit(EXIT_DIAGNOSTICS);
    }

    driver::write_output(&args, &result.output)
}
