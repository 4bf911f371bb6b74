//! # fluxcsv
//!
//! A CLI tool for reading annotated CSV query responses.
//!
//! ## Overview
//!
//! fluxcsv is built on top of fluxcsvlib. It reads an annotated CSV response
//! from a file or stdin and renders every table it contains as aligned text,
//! passes the response through untouched, or re-emits the decoded records as
//! JSON lines.
//!
//! ## Usage
//!
//! ```bash
//! # Render a saved response as tables
//! fluxcsv response.csv
//!
//! # Pipe a response in
//! curl -s ... | fluxcsv
//!
//! # One JSON object per record
//! fluxcsv response.csv --output json
//!
//! # Narrow columns, show decoder logs
//! fluxcsv response.csv --no-min-widths -v
//! ```

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use console::style;
use fluxcsvlib::{Decoder, FormatOptions, Source, TableFormatter};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Build the clap Command structure
fn build_command() -> Command {
    Command::new("fluxcsv")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Render annotated CSV query responses as aligned text tables")
        .arg(
            Arg::new("input")
                .help("Response file to read (reads stdin when absent or '-')"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_parser(["table", "raw", "json"])
                .default_value("table")
                .help("Output format"),
        )
        .arg(
            Arg::new("no-min-widths")
                .long("no-min-widths")
                .action(ArgAction::SetTrue)
                .help("Size columns by header and first row only"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .help("Log decoder activity to stderr (-v debug, -vv trace)"),
        )
}

/// Install the stderr log subscriber. `-v` flags override `RUST_LOG`.
fn init_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn open_input(matches: &ArgMatches) -> Result<Box<dyn Source>> {
    match matches.get_one::<String>("input").map(String::as_str) {
        None | Some("-") => {
            debug!("reading stdin");
            Ok(Box::new(io::stdin()))
        }
        Some(path) => {
            debug!(path, "reading file");
            let file = File::open(path).with_context(|| format!("cannot open {path}"))?;
            Ok(Box::new(file))
        }
    }
}

fn write_table(source: Box<dyn Source>, options: FormatOptions) -> Result<()> {
    let mut decoder = Decoder::new(source);
    let stdout = io::stdout();
    let mut formatter = TableFormatter::with_options(BufWriter::new(stdout.lock()), options);
    formatter.write(&mut decoder)?;
    Ok(())
}

fn write_raw(mut source: Box<dyn Source>) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    io::copy(&mut source, &mut out)?;
    out.flush()?;
    source.close()?;
    Ok(())
}

fn write_json(source: Box<dyn Source>) -> Result<()> {
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for record in Decoder::new(source) {
        serde_json::to_writer(&mut out, &record?)?;
        writeln!(out)?;
    }
    out.flush()?;
    Ok(())
}

fn run(matches: &ArgMatches) -> Result<()> {
    let source = open_input(matches)?;

    let mut options = FormatOptions::new();
    if matches.get_flag("no-min-widths") {
        options = options.without_min_widths();
    }

    match matches
        .get_one::<String>("output")
        .map(String::as_str)
        .unwrap_or("table")
    {
        "raw" => write_raw(source),
        "json" => write_json(source),
        _ => write_table(source, options),
    }
}

fn main() -> ExitCode {
    let matches = build_command().get_matches();
    init_logging(matches.get_count("verbose"));

    match run(&matches) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {err:#}", style("Error:").red().bold());
            ExitCode::FAILURE
        }
    }
}
