// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use clap::{Parser, Subcommand};
use log::{error, info};
use regdiff::core::config::RunnerConfig;
use regdiff::core::error::{HarnessError, Result};
use regdiff::core::fixture::{suites, FixtureRunner, FixtureTable, RowStatus};
use regdiff::core::machine::Machine;
use regdiff::core::register::RegisterMask;
use regdiff::core::spec::parse_spec;
use std::path::PathBuf;

/// Z80 register-change spec checker
#[derive(Parser)]
#[command(name = "regdiff")]
#[command(about = "Z80 register-change spec checker", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse a spec string (e.g. "acehixa'c'e'h'") and print its mask
    Parse {
        /// Spec string; quote it so the shell keeps the apostrophes
        spec: String,
    },
    /// Decode a 3-byte mask into register names
    ///
    /// Bytes are low byte first and may be written as $96, 0x96 or 150.
    Decode {
        /// Byte 0 (F A C B E D L H)
        #[arg(value_parser = parse_byte)]
        b0: u8,
        /// Byte 1 (IX IY F' A' C' B' E' D')
        #[arg(value_parser = parse_byte)]
        b1: u8,
        /// Byte 2 (L' H')
        #[arg(value_parser = parse_byte)]
        b2: u8,
    },
    /// Run fixture tables
    Run {
        /// TOML fixture table to run (repeatable)
        #[arg(short = 't', long = "table")]
        tables: Vec<PathBuf>,

        /// Skip the built-in parser/differ/check tables
        #[arg(long)]
        no_builtin: bool,

        /// Stop at the first failing row
        #[arg(long)]
        fail_fast: bool,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

fn parse_byte(text: &str) -> std::result::Result<u8, String> {
    let parsed = if let Some(hex) = text.strip_prefix('$') {
        u8::from_str_radix(hex, 16)
    } else if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        u8::from_str_radix(hex, 16)
    } else {
        text.parse()
    };
    parsed.map_err(|e| format!("invalid byte {:?}: {}", text, e))
}

fn format_bytes(mask: RegisterMask) -> String {
    let [b0, b1, b2] = mask.to_bytes();
    format!("${:02X} ${:02X} ${:02X}", b0, b1, b2)
}

fn main() -> Result<()> {
    // Load .env file if present (REGDIFF_FAIL_FAST, RUST_LOG)
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Warning: Failed to load .env file: {}", e);
        }
    }

    // Initialize logger with default level INFO
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    match args.command {
        Command::Parse { spec } => {
            let mask = parse_spec(&spec).map_err(|e| {
                error!("Failed to parse {:?}: {}", spec, e);
                HarnessError::MalformedSpec(e)
            })?;
            println!("{}  \"{}\"", format_bytes(mask), mask);
            Ok(())
        }
        Command::Decode { b0, b1, b2 } => {
            let bytes = [b0, b1, b2];
            let mask = RegisterMask::from_bytes(bytes).ok_or(HarnessError::InvalidMask { bytes })?;
            println!("\"{}\"", mask);
            Ok(())
        }
        Command::Run {
            tables,
            no_builtin,
            fail_fast,
            json,
        } => run(tables, no_builtin, fail_fast, json),
    }
}

fn run(paths: Vec<PathBuf>, no_builtin: bool, fail_fast: bool, json: bool) -> Result<()> {
    info!("regdiff v{}", env!("CARGO_PKG_VERSION"));

    let mut config = RunnerConfig::from_env();
    if fail_fast {
        config.halt_on_first_failure = true;
    }

    let mut tables = if no_builtin {
        Vec::new()
    } else {
        suites::builtin_tables()
    };
    for path in &paths {
        info!("Loading fixture table from: {}", path.display());
        let table = FixtureTable::load(path).map_err(|e| {
            error!("Failed to load {}: {}", path.display(), e);
            e
        })?;
        tables.push(table);
    }

    let runner = FixtureRunner::new(config);
    let mut machine = Machine::new();
    let report = runner.run_all(&tables, &mut machine);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for outcome in report.failed_rows() {
            let (kind, detail) = match &outcome.status {
                RowStatus::ConfigurationError { detail } => ("CONFIG", detail.as_str()),
                RowStatus::Failed { detail } => ("FAIL", detail.as_str()),
                _ => continue,
            };
            println!(
                "{:<6} {}#{} {}: {}",
                kind, outcome.table, outcome.index, outcome.name, detail
            );
        }
        println!("{}", report);
    }

    if report.is_success() {
        info!("All fixture rows passed");
        Ok(())
    } else {
        Err(HarnessError::FixturesFailed {
            failed: report.failures(),
            total: report.total(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_takes_three_bytes() {
        let args = Args::try_parse_from(["regdiff", "decode", "$96", "0x59", "2"]).unwrap();
        match args.command {
            Command::Decode { b0, b1, b2 } => assert_eq!([b0, b1, b2], [0x96, 0x59, 0x02]),
            _ => panic!("expected decode"),
        }
    }

    #[test]
    fn test_decode_rejects_missing_bytes() {
        assert!(Args::try_parse_from(["regdiff", "decode"]).is_err());
        assert!(Args::try_parse_from(["regdiff", "decode", "1", "2"]).is_err());
        assert!(Args::try_parse_from(["regdiff", "decode", "1", "2", "3", "4"]).is_err());
    }

    #[test]
    fn test_decode_rejects_bad_byte() {
        assert!(Args::try_parse_from(["regdiff", "decode", "$1FF", "0", "0"]).is_err());
        assert!(Args::try_parse_from(["regdiff", "decode", "zz", "0", "0"]).is_err());
    }

    #[test]
    fn test_parse_byte_forms() {
        assert_eq!(parse_byte("$96"), Ok(0x96));
        assert_eq!(parse_byte("0x59"), Ok(0x59));
        assert_eq!(parse_byte("150"), Ok(150));
        assert!(parse_byte("256").is_err());
    }
}
