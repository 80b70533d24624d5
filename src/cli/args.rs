use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for the objrest binary.
#[derive(Parser, Debug)]
#[command(
    name = "objrest",
    version,
    about = "Lower object rest/spread in an ESTree program to ES2015 JavaScript"
)]
pub struct CliArgs {
    /// ESTree JSON of the program to transform (`-` reads stdin).
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// JSON file with plugin options, e.g. `{ "useBuiltIns": true }`.
    #[arg(long, value_name = "FILE")]
    pub options: Option<PathBuf>,

    /// Merge with `Object.assign` instead of the `_extends` helper.
    /// Overrides `useBuiltIns` from `--options`.
    #[arg(long = "use-built-ins", alias = "useBuiltIns")]
    pub use_built_ins: bool,

    /// Do not prepend runtime helper declarations to the output.
    #[arg(long = "no-helpers")]
    pub no_helpers: bool,

    /// Write the output here instead of stdout.
    #[arg(short = 'o', long = "out", value_name = "FILE")]
    pub out: Option<PathBuf>,
}

impl CliArgs {
    pub fn reads_stdin(&self) -> bool {
        self.input.as_os_str() == "-"
    }
}
