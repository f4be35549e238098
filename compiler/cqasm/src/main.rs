// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use clap::Parser;
use cqasm::{analysis_to_json, parse_to_json};
use cqasm_data_structures::language::Dialect;
use std::{path::PathBuf, process::ExitCode};

#[derive(Debug, Parser)]
#[command(name = "cqasm", version, about = "cQASM front-end", long_about = None)]
struct Cli {
    /// The cQASM file to process.
    file: PathBuf,

    /// Print the result as JSON instead of human-readable output.
    #[arg(long)]
    json: bool,

    /// Stop after parsing; do not run semantic analysis.
    #[arg(long)]
    parse_only: bool,

    /// Force a dialect instead of selecting one from the version header.
    #[arg(long, value_parser = parse_dialect)]
    dialect: Option<Dialect>,
}

fn parse_dialect(value: &str) -> Result<Dialect, String> {
    match value {
        "1" | "v1" => Ok(Dialect::V1),
        "3" | "v3" => Ok(Dialect::V3),
        _ => Err(format!("unknown dialect `{value}`, expected `v1` or `v3`")),
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    if cli.parse_only {
        let result = match cli.dialect {
            Some(Dialect::V1) => cqasm::v1::parse_file(&cli.file),
            Some(Dialect::V3) | None => cqasm::v3::parse_file(&cli.file),
        };
        if cli.json {
            println!("{}", parse_to_json(&result));
        } else if result.failed() {
            for error in &result.errors {
                eprintln!("{error}");
            }
        } else {
            println!("{}", result.program);
        }
        return exit_code(result.failed());
    }

    let result = match cli.dialect {
        Some(Dialect::V1) => cqasm::v1::analyze_file(&cli.file),
        Some(Dialect::V3) => cqasm::v3::analyze_file(&cli.file),
        None => cqasm::analyze_file(&cli.file),
    };
    if cli.json {
        println!("{}", analysis_to_json(&result));
    } else if result.failed() {
        for message in result.error_messages() {
            eprintln!("{message}");
        }
    } else {
        println!("{}", result.program);
    }
    exit_code(result.failed())
}

fn exit_code(failed: bool) -> ExitCode {
    if failed {
        ExitCode::from(2)
    } else {
        ExitCode::SUCCESS
    }
}
