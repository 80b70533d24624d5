use clap::Parser;
use objrest::cli::args::CliArgs;
use objrest::cli::driver::{self, compile, compile_source};
use objrest::cli::reporter::Reporter;
use objrest::tracing_config::{LogFormat, LogSettings};
use objrest::transform::Helper;
use serde_json::json;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

/// `const { a, ...rest } = { ...defaults, a: 1 };`
const REST_AND_SPREAD: &str = r#"{
  "type": "File",
  "program": {
    "type": "Program",
    "sourceType": "module",
    "body": [{
      "type": "VariableDeclaration",
      "kind": "const",
      "declarations": [{
        "type": "VariableDeclarator",
        "id": {
          "type": "ObjectPattern",
          "properties": [
            {
              "type": "ObjectProperty",
              "key": { "type": "Identifier", "name": "a" },
              "value": { "type": "Identifier", "name": "a" },
              "computed": false,
              "shorthand": true
            },
            { "type": "RestElement", "argument": { "type": "Identifier", "name": "rest" } }
          ]
        },
        "init": {
          "type": "ObjectExpression",
          "properties": [
            { "type": "SpreadElement", "argument": { "type": "Identifier", "name": "defaults" } },
            {
              "type": "ObjectProperty",
              "key": { "type": "Identifier", "name": "a" },
              "value": { "type": "NumericLiteral", "value": 1 },
              "computed": false,
              "shorthand": false
            }
          ]
        }
      }]
    }]
  }
}"#;

const LOWERED: &str = "const _ref = _extends({}, defaults, { a: 1 }), a = _ref.a;\n\
                       const rest = _objectWithoutProperties(_ref, [\"a\"]);\n";

/// `const { ...rest, a } = obj;`
const MISPLACED_REST: &str = r#"{
  "type": "Program",
  "body": [{
    "type": "VariableDeclaration",
    "kind": "const",
    "declarations": [{
      "type": "VariableDeclarator",
      "id": {
        "type": "ObjectPattern",
        "properties": [
          { "type": "RestElement", "argument": { "type": "Identifier", "name": "rest" } },
          {
            "type": "Property",
            "key": { "type": "Identifier", "name": "a" },
            "value": { "type": "Identifier", "name": "a" },
            "shorthand": true
          }
        ]
      },
      "init": { "type": "Identifier", "name": "obj" }
    }]
  }]
}"#;

fn write_file(dir: &TempDir, name: &str, contents: &str) -> String {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).expect("write fixture");
    path.display().to_string()
}

fn parse(args: &[&str]) -> CliArgs {
    CliArgs::try_parse_from(std::iter::once("objrest").chain(args.iter().copied()))
        .expect("valid arguments")
}

#[test]
fn test_args_parse_all_flags() {
    let args = parse(&[
        "input.json",
        "--options",
        "opts.json",
        "--use-built-ins",
        "--no-helpers",
        "-o",
        "out.js",
    ]);
    assert_eq!(args.input, Path::new("input.json"));
    assert_eq!(args.options.as_deref(), Some(Path::new("opts.json")));
    assert!(args.use_built_ins);
    assert!(args.no_helpers);
    assert_eq!(args.out.as_deref(), Some(Path::new("out.js")));
    assert!(!args.reads_stdin());
    assert!(parse(&["-"]).reads_stdin());
}

#[test]
fn test_args_require_input() {
    assert!(CliArgs::try_parse_from(["objrest"]).is_err());
}

#[test]
fn test_compile_prepends_helpers_in_first_use_order() {
    let dir = TempDir::new().expect("temp dir");
    let input = write_file(&dir, "input.json", REST_AND_SPREAD);
    let result = compile(&parse(&[&input])).expect("compiles");

    assert!(!result.has_errors());
    assert_eq!(
        result.helpers,
        vec![Helper::ObjectWithoutProperties, Helper::Extends]
    );
    let expected_prelude = format!(
        "{}{}",
        Helper::ObjectWithoutProperties.source(),
        Helper::Extends.source()
    );
    assert_eq!(result.output, format!("{expected_prelude}{LOWERED}"));
}

#[test]
fn test_compile_without_helpers() {
    let dir = TempDir::new().expect("temp dir");
    let input = write_file(&dir, "input.json", REST_AND_SPREAD);
    let result = compile(&parse(&[&input, "--no-helpers"])).expect("compiles");
    assert_eq!(result.output, LOWERED);
}

#[test]
fn test_use_built_ins_flag_overrides_options_file() {
    let dir = TempDir::new().expect("temp dir");
    let input = write_file(&dir, "input.json", REST_AND_SPREAD);
    let options = write_file(&dir, "options.json", r#"{ "useBuiltIns": false }"#);
    let result = compile(&parse(&[&input, "--options", &options, "--use-built-ins", "--no-helpers"]))
        .expect("compiles");
    assert_eq!(
        result.output,
        "const _ref = Object.assign({}, defaults, { a: 1 }), a = _ref.a;\n\
         const rest = _objectWithoutProperties(_ref, [\"a\"]);\n"
    );
    assert_eq!(result.helpers, vec![Helper::ObjectWithoutProperties]);
}

#[test]
fn test_invalid_options_become_diagnostics() {
    let dir = TempDir::new().expect("temp dir");
    let input = write_file(&dir, "input.json", REST_AND_SPREAD);
    let options = write_file(&dir, "options.json", r#"{ "useBuiltIns": 1 }"#);
    let result = compile(&parse(&[&input, "--options", &options])).expect("compiles");
    assert!(result.has_errors());
    assert!(result.output.is_empty());
    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].code, 9001);
    assert!(result.diagnostics[0].message_text.contains("number 1"));
}

#[test]
fn test_misplaced_rest_becomes_diagnostic() {
    let result = compile_source(MISPLACED_REST, &json!(null), true).expect("loads");
    assert!(result.has_errors());
    assert_eq!(result.diagnostics[0].code, 9101);

    let rendered = Reporter::new(false).render("input.json", &result.diagnostics);
    assert!(
        rendered.starts_with("input.json - error OR9101: A rest element must be last"),
        "{rendered}"
    );
    assert!(rendered.ends_with('\n'));
}

#[test]
fn test_malformed_input_is_an_error() {
    let dir = TempDir::new().expect("temp dir");
    let input = write_file(&dir, "input.json", r#"{ "type": "WhileStatement" }"#);
    let err = compile(&parse(&[&input])).expect_err("not a program");
    let chain = format!("{err:#}");
    assert!(chain.contains("failed to transform"), "{chain}");

    let missing = dir.path().join("missing.json").display().to_string();
    let err = compile(&parse(&[&missing])).expect_err("missing input");
    assert!(format!("{err:#}").contains("failed to read"));

    let empty = write_file(&dir, "empty.json", "  \n");
    let err = compile(&parse(&[&empty])).expect_err("empty input");
    assert!(err.to_string().ends_with("is empty"));
}

#[test]
fn test_write_output_to_file() {
    let dir = TempDir::new().expect("temp dir");
    let input = write_file(&dir, "input.json", REST_AND_SPREAD);
    let out = dir.path().join("out.js").display().to_string();
    let args = parse(&[&input, "--no-helpers", "-o", &out]);
    let result = compile(&args).expect("compiles");
    driver::write_output(&args, &result.output).expect("writes");
    assert_eq!(std::fs::read_to_string(&out).expect("read output"), LOWERED);
}

#[test]
fn test_log_format_names() {
    assert_eq!(LogFormat::parse("tree"), LogFormat::Tree);
    assert_eq!(LogFormat::parse(" JSON "), LogFormat::Json);
    assert_eq!(LogFormat::parse("text"), LogFormat::Text);
    assert_eq!(LogFormat::parse(""), LogFormat::Text);
}

#[test]
fn test_log_settings_resolution() {
    let env = |pairs: &'static [(&'static str, &'static str)]| {
        move |name: &str| {
            pairs
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| value.to_string())
        }
    };

    assert_eq!(LogSettings::resolve(env(&[("OBJREST_LOG_FORMAT", "json")])), None);
    assert_eq!(
        LogSettings::resolve(env(&[("RUST_LOG", "info")])),
        Some(LogSettings {
            directives: "info".to_string(),
            format: LogFormat::Text,
        })
    );
    assert_eq!(
        LogSettings::resolve(env(&[
            ("RUST_LOG", "info"),
            ("OBJREST_LOG", "objrest_transform=trace"),
            ("OBJREST_LOG_FORMAT", "tree"),
        ])),
        Some(LogSettings {
            directives: "objrest_transform=trace".to_string(),
            format: LogFormat::Tree,
        })
    );
}

#[test]
fn test_binary_exit_codes() {
    let dir = TempDir::new().expect("temp dir");
    let good = write_file(&dir, "good.json", REST_AND_SPREAD);
    let output = Command::new(env!("CARGO_BIN_EXE_objrest"))
        .args([good.as_str(), "--no-helpers"])
        .env_remove("OBJREST_LOG")
        .env_remove("RUST_LOG")
        .output()
        .expect("run objrest");
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), LOWERED);

    let bad = write_file(&dir, "bad.json", MISPLACED_REST);
    let output = Command::new(env!("CARGO_BIN_EXE_objrest"))
        .arg(&bad)
        .env_remove("OBJREST_LOG")
        .env_remove("RUST_LOG")
        .output()
        .expect("run objrest");
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("OR9101"), "{stderr}");
}
