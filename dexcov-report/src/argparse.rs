//! Turns the command line arguments into a [`Config`].
//!
//! [`Config`]: ./struct.Config.html

use error::{ErrorKind, Result};
use reader::{DumpReader, ReportReader, SnapshotReader, list_snapshots};

use clap::{App, ArgMatches};
use dexcov::PackageFilter;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// How the coverage data files are laid out.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum DataFormat {
    /// Each file is a dump of several snapshots.
    Dump,
    /// Each file is a single periodic snapshot.
    Periodic,
}

/// A `--cov` or `--covlist` argument.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum CoverageSource {
    /// A single coverage data dump.
    File(PathBuf),
    /// A file listing coverage data dumps.
    List(PathBuf),
}

/// Configuration of a run.
#[derive(Clone, Debug)]
pub struct Config {
    /// Class listings, one per binary.
    pub classes: Vec<PathBuf>,
    /// Coverage data files, in merge order.
    pub coverage: Vec<PathBuf>,
    pub format: DataFormat,
    pub filter: PackageFilter,
    pub verbose: bool,
    pub json: bool,
}

impl Config {
    /// Reads the configuration from the command line.
    ///
    /// # Errors
    ///
    /// Fails if no class listing or no coverage data is given, or some input file does not exist.
    pub fn parse(matches: &ArgMatches) -> Result<Config> {
        let mut classes = Vec::new();
        for path in matches.values_of_os("classes").into_iter().flat_map(|a| a) {
            classes.push(existing_file(Path::new(path))?);
        }
        ensure!(!classes.is_empty(), ErrorKind::NoClassListing);

        let mut coverage = Vec::new();
        for source in coverage_sources(matches) {
            match source {
                CoverageSource::File(path) => coverage.push(existing_file(&path)?),
                CoverageSource::List(path) => coverage.extend(read_list(&path)?),
            }
        }

        let format = match matches.value_of_os("moni") {
            Some(dir) => {
                coverage.extend(list_snapshots(Path::new(dir))?);
                DataFormat::Periodic
            },
            None => DataFormat::Dump,
        };
        ensure!(!coverage.is_empty(), ErrorKind::NoCoverageData);

        let mut filter = PackageFilter::new();
        for prefix in matches.values_of("include").into_iter().flat_map(|a| a) {
            filter.include(prefix);
        }
        for prefix in matches.values_of("exclude").into_iter().flat_map(|a| a) {
            filter.exclude(prefix);
        }

        Ok(Config {
            classes,
            coverage,
            format,
            filter,
            verbose: matches.is_present("verbose"),
            json: matches.is_present("json"),
        })
    }

    /// Creates the reader for the coverage data files.
    pub fn reader(&self) -> Box<dyn ReportReader> {
        match self.format {
            DataFormat::Dump => Box::new(DumpReader),
            DataFormat::Periodic => Box::new(SnapshotReader),
        }
    }
}

/// Describes the command line arguments using `clap`.
pub fn app() -> App<'static, 'static> {
    clap_app!(("dexcov-report") =>
        (author: crate_authors!(", "))
        (about: crate_description!())
        (version: crate_version!())
        (@setting DeriveDisplayOrder)
        (@setting ArgRequiredElseHelp)
        (@arg classes: -c --classes [FILE]... number_of_values(1) "Class listing (*.json) of a dex file, can be given multiple times")
        (@arg cov: --cov [FILE]... number_of_values(1) "A coverage data dump")
        (@arg covlist: --covlist [FILE]... number_of_values(1) "A file listing coverage data dumps, one per line, relative to the list file")
        (@arg moni: --moni [DIR] conflicts_with[cov covlist] "A directory of periodic coverage snapshots (*_coverage.dat)")
        (@arg include: --include [PREFIX]... number_of_values(1) "Only report classes in this package")
        (@arg exclude: --exclude [PREFIX]... number_of_values(1) "Do not report classes in this package")
        (@arg verbose: -v --verbose "Print per-class statistics and diagnostics about skipped coverage data")
        (@arg json: --json "Print the final report and histogram as JSON")
    )
}

/// Collects the `--cov` and `--covlist` arguments, in the order they appear on the command line.
pub fn coverage_sources(matches: &ArgMatches) -> Vec<CoverageSource> {
    let mut sources = Vec::new();
    if let (Some(indices), Some(values)) = (matches.indices_of("cov"), matches.values_of_os("cov")) {
        sources.extend(indices.zip(values).map(|(i, v)| (i, CoverageSource::File(PathBuf::from(v)))));
    }
    if let (Some(indices), Some(values)) = (matches.indices_of("covlist"), matches.values_of_os("covlist")) {
        sources.extend(indices.zip(values).map(|(i, v)| (i, CoverageSource::List(PathBuf::from(v)))));
    }
    sources.sort_by_key(|&(i, _)| i);
    sources.into_iter().map(|(_, source)| source).collect()
}

/// Ensures the path is a regular file.
fn existing_file(path: &Path) -> Result<PathBuf> {
    ensure!(path.is_file(), ErrorKind::NotAFile(path.to_owned()));
    Ok(path.to_owned())
}

/// Reads a list of coverage data files. Every file must exist.
fn read_list(list_path: &Path) -> Result<Vec<PathBuf>> {
    let list = BufReader::new(File::open(list_path)?);
    let parent = list_path.parent().unwrap_or_else(|| Path::new(""));
    let mut files = Vec::new();
    for path in parse_list(list, list_path, parent)? {
        files.push(existing_file(&path)?);
    }
    Ok(files)
}

/// Parses a list of files, one per line, relative to `parent`. Blank lines are skipped.
///
/// # Errors
///
/// Returns [`MalformedList`] if a line is not valid UTF-8.
///
/// [`MalformedList`]: ../error/enum.ErrorKind.html#variant.MalformedList
pub fn parse_list<R: BufRead>(list: R, list_path: &Path, parent: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for (index, line) in list.split(b'\n').enumerate() {
        let line = String::from_utf8(line?).map_err(|_| ErrorKind::MalformedList(list_path.to_owned(), index + 1))?;
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }
        files.push(parent.join(line));
    }
    Ok(files)
}
