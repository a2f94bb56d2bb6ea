use flq_core::{Query, deflatten_json, flat_filter, flatten_json};
use serde_json::Value;
use std::env;
use std::fs;
use std::io::{self, Read};
use std::process::ExitCode;

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn print_help() {
    println!(
        "flq {VERSION} - flat-path JSON toolkit

Usage: flq [OPTIONS] <COMMAND> [ARGS]

Commands:
  flatten [FILE]          Flatten nested JSON to path/leaf pairs
  deflatten [FILE]        Rebuild nested JSON from path/leaf pairs
  filter <QUERY> [FILE]   Keep array elements matching a JSON query

Arguments:
  [FILE]     Input JSON file (reads from stdin if omitted)
  <QUERY>    JSON query object (e.g. '{{\"boxes.apples.status\": \"rotten\"}}')

Options:
  -h, --help     Show this help message
  -V, --version  Show version"
    );
}

fn print_version() {
    println!("flq {VERSION}");
}

const USAGE_HINT: &str = "Usage: flq [OPTIONS] <COMMAND> [ARGS]\n\nFor more information, try '--help'";

enum ParsedArgs {
    Help,
    Version,
    Flatten { file: Option<String> },
    Deflatten { file: Option<String> },
    Filter { query: String, file: Option<String> },
}

fn parse_args() -> Result<ParsedArgs, String> {
    let args: Vec<String> = env::args().skip(1).collect();

    if args.is_empty() {
        return Err(format!("missing required argument: <COMMAND>\n\n{USAGE_HINT}"));
    }

    let mut positional = Vec::new();

    for arg in &args {
        match arg.as_str() {
            "-h" | "--help" => return Ok(ParsedArgs::Help),
            "-V" | "--version" => return Ok(ParsedArgs::Version),
            s if s.starts_with('-') => {
                return Err(format!("unknown option: {s}\n\n{USAGE_HINT}"));
            }
            _ => positional.push(arg.clone()),
        }
    }

    let mut iter = positional.into_iter();
    let Some(command) = iter.next() else {
        return Err(format!("missing required argument: <COMMAND>\n\n{USAGE_HINT}"));
    };

    let parsed = match command.as_str() {
        "flatten" => ParsedArgs::Flatten { file: iter.next() },
        "deflatten" => ParsedArgs::Deflatten { file: iter.next() },
        "filter" => {
            let Some(query) = iter.next() else {
                return Err(format!("filter requires a <QUERY> argument\n\n{USAGE_HINT}"));
            };
            ParsedArgs::Filter {
                query,
                file: iter.next(),
            }
        }
        other => {
            return Err(format!("unknown command: {other}\n\n{USAGE_HINT}"));
        }
    };

    if iter.next().is_some() {
        return Err(format!("too many arguments\n\n{USAGE_HINT}"));
    }

    Ok(parsed)
}

fn read_input(file: Option<&str>) -> Result<String, String> {
    match file {
        Some(path) => {
            fs::read_to_string(path).map_err(|e| format!("error reading file '{path}': {e}"))
        }
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| format!("error reading stdin: {e}"))?;
            Ok(buffer)
        }
    }
}

fn print_pretty(value: &Value) -> Result<(), String> {
    let output = serde_json::to_string_pretty(value)
        .map_err(|e| format!("error serializing output: {e}"))?;
    println!("{output}");
    Ok(())
}

fn run() -> Result<(), String> {
    let args = parse_args()?;

    match args {
        ParsedArgs::Help => {
            print_help();
            Ok(())
        }
        ParsedArgs::Version => {
            print_version();
            Ok(())
        }
        ParsedArgs::Flatten { file } => {
            let input = read_input(file.as_deref())?;
            let flat = flatten_json(&input, "").map_err(|e| e.to_string())?;
            print_pretty(&Value::Object(flat))
        }
        ParsedArgs::Deflatten { file } => {
            let input = read_input(file.as_deref())?;
            let value = deflatten_json(&input).map_err(|e| e.to_string())?;
            print_pretty(&value)
        }
        ParsedArgs::Filter { query, file } => {
            let input = read_input(file.as_deref())?;

            let query_value: Value = serde_json::from_str(&query)
                .map_err(|e| format!("error parsing query: {e}"))?;
            let compiled = Query::parse(&query_value).map_err(|e| e.to_string())?;

            let data: Value = serde_json::from_str(&input)
                .map_err(|e| format!("error parsing JSON: {e}"))?;
            let kept = flat_filter(&data, &compiled).map_err(|e| e.to_string())?;

            print_pretty(&Value::Array(kept))
        }
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("flq: {e}");
            ExitCode::FAILURE
        }
    }
}
