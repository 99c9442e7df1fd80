extern crate dexcov;
extern crate diff;
extern crate env_logger;
#[macro_use]
extern crate serde_json;
extern crate termcolor;

use dexcov::{discovery, record, Engine, PackageFilter, Result};
use serde_json::{Value, from_reader, to_value, to_string_pretty};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use std::fs::{File, read_dir};
use std::io::{self, Write};
use std::path::Path;
use std::process::exit;

fn main() {
    env_logger::init();
    run().expect("IO");
}

fn run() -> io::Result<()> {
    let mut failed_tests = 0;

    let stdout = StandardStream::stdout(ColorChoice::Auto);
    let mut lock = stdout.lock();

    let mut paths = Vec::new();
    for entry in read_dir("test-data")? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            paths.push(entry.path());
        }
    }
    paths.sort();

    for path in paths {
        write!(lock, "test {} ... ", path.display())?;
        lock.flush()?;
        if !print_test_result(&mut lock, test(&path))? {
            failed_tests += 1;
        }
    }

    if failed_tests != 0 {
        writeln!(lock, "\ntest result: {} failed.\n", failed_tests)?;
        exit(101);
    } else {
        writeln!(lock, "\ntest result: ok.\n")?;
    }

    Ok(())
}

fn test(path: &Path) -> Result<(Value, Value)> {
    let filter_path = path.join("filter.json");
    let filter: PackageFilter = if filter_path.exists() {
        from_reader(File::open(filter_path)?)?
    } else {
        PackageFilter::new()
    };

    let mut engine = Engine::new(filter);
    engine.load(discovery::from_reader(File::open(path.join("classes.json"))?)?);
    for snapshot in record::snapshots_from_reader(File::open(path.join("snapshots.json"))?)? {
        engine.merge_snapshot(&snapshot);
    }

    let actual = json!({
        "report": to_value(&engine.report())?,
        "histogram": to_value(&engine.histogram())?,
    });
    let expected = from_reader(File::open(path.join("expected.json"))?)?;

    Ok((actual, expected))
}

fn print_test_result<W: Write + WriteColor>(mut lock: W, result: Result<(Value, Value)>) -> io::Result<bool> {
    Ok(match result {
        Ok((actual, expected)) => {
            let success = actual == expected;
            if success {
                lock.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
                writeln!(lock, "ok")?;
            } else {
                lock.set_color(ColorSpec::new().set_fg(Some(Color::Red)))?;
                writeln!(lock, "FAILED")?;
                let actual = to_string_pretty(&actual).expect("JSON");
                let expected = to_string_pretty(&expected).expect("JSON");
                for d in diff::lines(&actual, &expected) {
                    let (color, prefix, line) = match d {
                        diff::Result::Left(line) => (Color::Green, '+', line),
                        diff::Result::Both(line, _) => (Color::White, ' ', line),
                        diff::Result::Right(line) => (Color::Red, '-', line),
                    };
                    lock.set_color(ColorSpec::new().set_fg(Some(color)))?;
                    writeln!(lock, "{} {}", prefix, line)?;
                }
                writeln!(lock)?;
            }
            lock.reset()?;
            success
        },
        Err(e) => {
            lock.set_color(ColorSpec::new().set_fg(Some(Color::Magenta)))?;
            writeln!(lock, "ERRORED")?;
            lock.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_intense(true).set_bold(true))?;
            write!(lock, "error: ")?;
            lock.reset()?;
            writeln!(lock, "{}\n", e)?;
            false
        },
    })
}
