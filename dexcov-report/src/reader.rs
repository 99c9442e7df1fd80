//! Readers of coverage data files.
//!
//! Coverage data comes in two flavors:
//!
//! * A dump file, containing all snapshots taken by the app as a JSON array, in merge order.
//! * A directory of periodic snapshots. Each file `«timestamp»_coverage.dat` holds one JSON snapshot, and the files
//!   are merged in increasing timestamp order.

use error::{ErrorKind, Result};

use dexcov::Snapshot;
use dexcov::record::{snapshot_from_reader, snapshots_from_reader};
use natord;

use std::cmp::Ordering;
use std::fs::{File, read_dir};
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// File name suffix of a periodic snapshot.
pub const SNAPSHOT_SUFFIX: &str = "_coverage.dat";

/// Parses a coverage data file into snapshots.
pub trait ReportReader {
    /// Reads all snapshots from the file, in the order they should be merged.
    fn parse(&self, path: &Path) -> Result<Vec<Snapshot>>;
}

/// Reads a dump file.
#[derive(Copy, Clone, Debug, Default)]
pub struct DumpReader;

impl ReportReader for DumpReader {
    fn parse(&self, path: &Path) -> Result<Vec<Snapshot>> {
        debug!("reading dump {}", path.display());
        let file = BufReader::new(File::open(path)?);
        Ok(snapshots_from_reader(file)?)
    }
}

/// Reads a periodic snapshot. The timestamp is taken from the file name.
#[derive(Copy, Clone, Debug, Default)]
pub struct SnapshotReader;

impl ReportReader for SnapshotReader {
    fn parse(&self, path: &Path) -> Result<Vec<Snapshot>> {
        debug!("reading snapshot {}", path.display());
        let file = BufReader::new(File::open(path)?);
        let mut snapshot = snapshot_from_reader(file)?;
        snapshot.timestamp = timestamp_of(path);
        Ok(vec![snapshot])
    }
}

/// Extracts the timestamp from the file name `«timestamp»_coverage.dat`. Returns 0 if it is not a number.
pub fn timestamp_of(path: &Path) -> u64 {
    path.file_name()
        .and_then(|name| name.to_str())
        .and_then(|name| name.split('_').next())
        .and_then(|prefix| prefix.parse().ok())
        .unwrap_or(0)
}

/// Orders snapshot files by timestamp, then naturally by file name.
pub fn compare_snapshots(lhs: &Path, rhs: &Path) -> Ordering {
    timestamp_of(lhs).cmp(&timestamp_of(rhs)).then_with(|| {
        let lhs = lhs.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
        let rhs = rhs.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
        natord::compare(&lhs, &rhs)
    })
}

/// Lists all periodic snapshots in the directory, in merge order.
pub fn list_snapshots(dir: &Path) -> Result<Vec<PathBuf>> {
    ensure!(dir.is_dir(), ErrorKind::NotADirectory(dir.to_owned()));

    let mut files = Vec::new();
    for entry in read_dir(dir)? {
        let path = entry?.path();
        let is_snapshot = path.file_name().and_then(|n| n.to_str()).map_or(false, |n| n.ends_with(SNAPSHOT_SUFFIX));
        if is_snapshot && path.is_file() {
            files.push(path);
        }
    }
    files.sort_by(|a, b| compare_snapshots(a, b));
    Ok(files)
}
