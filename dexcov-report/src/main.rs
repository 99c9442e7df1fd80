//! `dexcov-report` merges the coverage snapshots collected from an instrumented Android app, and reports the cumulative
//! method and instruction coverage of the app's classes.
//!
//! The classes and methods of the app are given as class listings extracted from its dex files. After every snapshot
//! merged, a line with the totals so far is printed, and at the end a histogram of the method coverage.

#![recursion_limit = "128"] // needed for error_chain.
#![allow(unknown_lints, dangerous_implicit_autorefs)] // triggered inside clap 2.x `crate_authors!`.

#[macro_use]
extern crate clap;
#[macro_use]
extern crate error_chain;
#[macro_use]
extern crate log;
extern crate dexcov;
extern crate env_logger;
extern crate natord;
#[macro_use]
extern crate serde_json;
extern crate termcolor;

#[macro_use]
mod ui;
mod argparse;
mod error;
mod reader;

use argparse::Config;
use clap::ArgMatches;
use dexcov::{discovery, Engine, MergeTally};
use error::Result;
use log::LevelFilter;

use std::env;
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::process::exit;

/// Program entry. Calls [`run()`] and prints any error returned to `stderr`.
///
/// [`run()`]: ./fn.run.html
fn main() {
    if let Err(error) = run() {
        ui::print_error(&error).expect("error while printing error 🤷");
        exit(1);
    }
}

/// Runs the `dexcov-report` program.
fn run() -> Result<()> {
    let matches = parse_args();
    let config = Config::parse(&matches)?;
    init_logger(config.verbose);
    debug!("config = {:?}", config);

    let mut engine = Engine::new(config.filter.clone());
    for path in &config.classes {
        progress!("Loading", "{}", path.display());
        let listings = discovery::from_reader(BufReader::new(File::open(path)?))?;
        engine.load(listings);
    }
    if engine.model().is_empty() {
        warning!("no data");
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();

    let reader = config.reader();
    for path in &config.coverage {
        progress!("Merging", "{}", path.display());
        let snapshots = reader.parse(path)?;
        if !config.json {
            writeln!(out, "Coverage data after adding {}", path.display())?;
        }
        let mut tally = MergeTally::default();
        for snapshot in &snapshots {
            tally += engine.merge_snapshot(snapshot);
            if !config.json {
                writeln!(out, "{}\t{}\t{}\t{}", snapshot.timestamp, snapshot.pid, snapshot.kind, engine.report().terse())?;
            }
        }
        if config.verbose {
            ui::print_skipped(path, &tally)?;
        }
    }

    let report = engine.report();
    let histogram = engine.histogram();
    if config.json {
        let value = json!({
            "report": serde_json::to_value(&report)?,
            "histogram": serde_json::to_value(&histogram)?,
        });
        serde_json::to_writer_pretty(&mut out, &value)?;
        writeln!(out)?;
        return Ok(());
    }

    if config.verbose && !engine.model().is_empty() {
        write!(out, "{}", report.table())?;
    }
    write!(out, "\n{}", histogram)?;
    Ok(())
}

/// Installs the logger. Diagnostics about skipped coverage records are only shown in verbose mode. `RUST_LOG` takes
/// precedence over both.
fn init_logger(verbose: bool) {
    let mut builder = env_logger::Builder::new();
    builder.filter(None, if verbose { LevelFilter::Debug } else { LevelFilter::Warn });
    if let Ok(filters) = env::var("RUST_LOG") {
        builder.parse(&filters);
    }
    builder.init();
}

/// Parses the command line arguments using `clap`.
fn parse_args() -> ArgMatches<'static> {
    argparse::app().get_matches()
}
