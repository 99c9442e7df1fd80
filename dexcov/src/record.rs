//! Coverage records, as produced by the report readers.

#[cfg(all(feature = "serde", feature = "serde_json"))]
use error::Result;
use identity::MethodIdentity;

#[cfg(all(feature = "serde", feature = "serde_json"))]
use std::io::Read;

/// One observation of which code units of a method have been executed.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CoverageRecord {
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub identity: MethodIdentity,

    /// One `'0'`/`'1'` character per code unit, possibly several `_`-separated candidates. See the [`bits`] module.
    ///
    /// [`bits`]: ../bits/index.html
    pub bits: String,
}

impl CoverageRecord {
    pub fn new<S: Into<String>>(identity: MethodIdentity, bits: S) -> CoverageRecord {
        CoverageRecord {
            identity,
            bits: bits.into(),
        }
    }
}

/// All coverage records dumped by a process at one moment.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Snapshot {
    /// When the snapshot was taken. Snapshots are merged in increasing timestamp order.
    #[cfg_attr(feature = "serde", serde(default))]
    pub timestamp: u64,

    /// The process which produced the snapshot.
    #[cfg_attr(feature = "serde", serde(default))]
    pub pid: u32,

    /// What triggered the dump, e.g. `periodic` or `exit`.
    #[cfg_attr(feature = "serde", serde(rename = "type", default))]
    pub kind: String,

    pub records: Vec<CoverageRecord>,
}

/// Reads a JSON array of snapshots.
#[cfg(all(feature = "serde", feature = "serde_json"))]
pub fn snapshots_from_reader<R: Read>(reader: R) -> Result<Vec<Snapshot>> {
    Ok(::serde_json::from_reader(reader)?)
}

/// Reads a single JSON snapshot.
#[cfg(all(feature = "serde", feature = "serde_json"))]
pub fn snapshot_from_reader<R: Read>(reader: R) -> Result<Snapshot> {
    Ok(::serde_json::from_reader(reader)?)
}

#[cfg(all(test, feature = "serde", feature = "serde_json"))]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_from_reader() {
        let json = br#"{
            "timestamp": 1500000000,
            "pid": 4242,
            "type": "periodic",
            "records": [
                {"class": "com.app.Foo", "method": "bar", "descriptor": "(I)V", "bits": "1001_10"}
            ]
        }"#;
        let snapshot = snapshot_from_reader(&json[..]).unwrap();
        assert_eq!(snapshot.timestamp, 1500000000);
        assert_eq!(snapshot.pid, 4242);
        assert_eq!(snapshot.kind, "periodic");
        assert_eq!(snapshot.records, vec![CoverageRecord::new(MethodIdentity::new("com.app.Foo", "bar", "(I)V"), "1001_10")]);
    }

    #[test]
    fn test_snapshot_defaults() {
        let snapshots = snapshots_from_reader(&br#"[{"records": []}]"#[..]).unwrap();
        assert_eq!(snapshots, vec![Snapshot::default()]);
    }

    #[test]
    fn test_malformed() {
        assert!(snapshots_from_reader(&b"[{"[..]).is_err());
    }
}
