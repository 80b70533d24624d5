use anyhow::{Context, Result, bail};
use std::io::{Read, Write};

use crate::cli::args::CliArgs;
use objrest_ast::{Printer, load_program};
use objrest_common::Diagnostic;
use objrest_transform::options::USE_BUILT_INS;
use objrest_transform::{Helper, HelperRegistry, ObjectRestSpread, TransformError};
use serde_json::Value;

/// Outcome of transforming one program.
#[derive(Debug, Default)]
pub struct CompileResult {
    /// Generated JavaScript, helper prelude included. Empty when
    /// `diagnostics` is not.
    pub output: String,
    pub diagnostics: Vec<Diagnostic>,
    /// Helpers the pass requested, in first-use order.
    pub helpers: Vec<Helper>,
}

impl CompileResult {
    fn failed(error: &TransformError) -> Self {
        tracing::debug!(code = error.code(), "[driver] {error}");
        CompileResult {
            diagnostics: vec![error.to_diagnostic()],
            ..CompileResult::default()
        }
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

/// Read the input and options named by `args` and transform the program.
pub fn compile(args: &CliArgs) -> Result<CompileResult> {
    let source = read_input(args)?;
    let options = load_options(args)?;
    compile_source(&source, &options, !args.no_helpers)
        .with_context(|| format!("failed to transform {}", input_name(args)))
}

/// Transform an ESTree JSON program with raw plugin options.
///
/// Invalid options and malformed patterns come back as diagnostics; only
/// input that cannot be read as an ESTree program is an `Err`.
pub fn compile_source(source: &str, options: &Value, with_helpers: bool) -> Result<CompileResult> {
    let (mut arena, root) = load_program(source).context("input is not an ESTree program")?;

    let mut pass = match ObjectRestSpread::from_json(options, HelperRegistry::new()) {
        Ok(pass) => pass,
        Err(error) => return Ok(CompileResult::failed(&error)),
    };
    let stats = match pass.run(&mut arena, root) {
        Ok(stats) => stats,
        Err(error) => return Ok(CompileResult::failed(&error)),
    };
    tracing::info!(
        visits = stats.visits,
        rewrites = stats.rewrites,
        "[driver] transformed program"
    );

    let registry = pass.into_helpers();
    let mut output = String::new();
    if with_helpers {
        output.push_str(&registry.prelude());
    }
    output.push_str(&Printer::print(&arena, root));

    Ok(CompileResult {
        output,
        diagnostics: Vec::new(),
        helpers: registry.used().collect(),
    })
}

/// Write generated code to `--out`, or stdout.
pub fn write_output(args: &CliArgs, output: &str) -> Result<()> {
    match &args.out {
        Some(path) => std::fs::write(path, output)
            .with_context(|| format!("failed to write {}", path.display())),
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(output.as_bytes())
                .and_then(|()| stdout.flush())
                .context("failed to write to stdout")
        }
    }
}

pub fn input_name(args: &CliArgs) -> String {
    if args.reads_stdin() {
        "<stdin>".to_string()
    } else {
        args.input.display().to_string()
    }
}

fn read_input(args: &CliArgs) -> Result<String> {
    let source = if args.reads_stdin() {
        let mut source = String::new();
        std::io::stdin()
            .read_to_string(&mut source)
            .context("failed to read stdin")?;
        source
    } else {
        std::fs::read_to_string(&args.input)
            .with_context(|| format!("failed to read {}", args.input.display()))?
    };
    if source.trim().is_empty() {
        bail!("{} is empty", input_name(args));
    }
    Ok(source)
}

/// Plugin options from `--options`, with `--use-built-ins` forced on top.
///
/// A non-object options file is passed through untouched so the pass reports
/// it.
fn load_options(args: &CliArgs) -> Result<Value> {
    let mut options = match &args.options {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("{} is not valid JSON", path.display()))?
        }
        None => Value::Null,
    };
    if args.use_built_ins {
        if options.is_null() {
            options = Value::Object(serde_json::Map::new());
        }
        if let Some(map) = options.as_object_mut() {
            map.insert(USE_BUILT_INS.to_string(), Value::Bool(true));
        }
    }
    Ok(options)
}
