//! Merge coverage records into the coverage model.

use bits;
use discovery::ClassListing;
use filter::PackageFilter;
use identity::type_to_class_name;
use model::{CoverageModel, MethodCoverage, Registration};
use record::{CoverageRecord, Snapshot};
use report::{Histogram, Report};

use std::ops::AddAssign;

//----------------------------------------------------------------------------------------------------------------------
//{{{ Outcomes

/// Reason why a coverage record was not merged.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Skipped {
    /// The class of the method is excluded by the package filter.
    Filtered,
    /// The method is not known, either never discovered or discovered more than once.
    UnknownMethod,
    /// The method is abstract or native.
    NoImplementation,
    /// The bit string does not match the length of the method body, typically because the binary and the coverage data
    /// come from different builds.
    LengthMismatch {
        /// Length of the method body in code units.
        expected: usize,
        /// Length of the string that was checked. A matching `_` segment is never a mismatch, so this is always the
        /// length of the whole reported string, `_` separators included.
        actual: usize,
    },
}

/// Result of merging one coverage record.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum MergeOutcome {
    Applied,
    Skipped(Skipped),
}

/// Number of records of each outcome, when merging a snapshot.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct MergeTally {
    pub applied: usize,
    pub filtered: usize,
    pub unknown_method: usize,
    pub no_implementation: usize,
    pub length_mismatch: usize,
}

impl MergeTally {
    fn record(&mut self, outcome: MergeOutcome) {
        let counter = match outcome {
            MergeOutcome::Applied => &mut self.applied,
            MergeOutcome::Skipped(Skipped::Filtered) => &mut self.filtered,
            MergeOutcome::Skipped(Skipped::UnknownMethod) => &mut self.unknown_method,
            MergeOutcome::Skipped(Skipped::NoImplementation) => &mut self.no_implementation,
            MergeOutcome::Skipped(Skipped::LengthMismatch { .. }) => &mut self.length_mismatch,
        };
        *counter += 1;
    }

    /// Number of records merged or skipped.
    pub fn total(&self) -> usize {
        self.applied + self.filtered + self.skipped()
    }

    /// Number of records skipped for a reason other than the package filter.
    pub fn skipped(&self) -> usize {
        self.unknown_method + self.no_implementation + self.length_mismatch
    }
}

impl AddAssign for MergeTally {
    fn add_assign(&mut self, other: MergeTally) {
        self.applied += other.applied;
        self.filtered += other.filtered;
        self.unknown_method += other.unknown_method;
        self.no_implementation += other.no_implementation;
        self.length_mismatch += other.length_mismatch;
    }
}

/// Statistics of loading class listings.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct LoadSummary {
    pub classes: usize,
    pub duplicated_classes: usize,
    pub excluded_classes: usize,
    /// Number of methods inserted, including those dropped later for being ambiguous.
    pub methods: usize,
    pub ambiguous_methods: usize,
}

//}}}
//----------------------------------------------------------------------------------------------------------------------
//{{{ Engine

/// Owns the coverage model of a run, and merges coverage records into it.
///
/// # Examples
///
/// ```rust
/// use dexcov::{CoverageRecord, Engine, MergeOutcome, MethodIdentity, PackageFilter};
/// use dexcov::discovery::{ClassListing, MethodListing};
///
/// let mut engine = Engine::new(PackageFilter::new());
/// engine.load(vec![ClassListing {
///     name: "Lcom/app/Main;".to_owned(),
///     methods: vec![MethodListing {
///         name: "run".to_owned(),
///         descriptor: "()V".to_owned(),
///         code: Some(vec![1, 1, 1, 1]),
///     }],
/// }]);
///
/// let id = MethodIdentity::new("com.app.Main", "run", "()V");
/// assert_eq!(engine.merge(&CoverageRecord::new(id.clone(), "1000")), MergeOutcome::Applied);
/// assert_eq!(engine.merge(&CoverageRecord::new(id, "0011")), MergeOutcome::Applied);
/// assert_eq!(engine.report().total.instructions_covered, 3);
/// ```
#[derive(Clone, Debug, Default)]
pub struct Engine {
    model: CoverageModel,
    filter: PackageFilter,
}

impl Engine {
    /// Creates an engine with an empty model.
    pub fn new(filter: PackageFilter) -> Engine {
        Engine {
            model: CoverageModel::new(),
            filter,
        }
    }

    pub fn model(&self) -> &CoverageModel {
        &self.model
    }

    pub fn filter(&self) -> &PackageFilter {
        &self.filter
    }

    /// Registers the classes and methods discovered in a binary.
    ///
    /// Duplicated classes and methods are skipped with a warning, see [`Registration`]. Classes excluded by the package
    /// filter are registered without any methods.
    ///
    /// [`Registration`]: ../model/enum.Registration.html
    pub fn load<I: IntoIterator<Item = ClassListing>>(&mut self, listings: I) -> LoadSummary {
        let mut summary = LoadSummary::default();

        for listing in listings {
            let class_name = type_to_class_name(&listing.name).into_owned();
            if self.model.add_class(class_name.as_str()) == Registration::RejectedDuplicate {
                warn!("ignoring duplicated class {}", class_name);
                summary.duplicated_classes += 1;
                continue;
            }
            summary.classes += 1;

            if !self.filter.included(&class_name) {
                trace!("class excluded: {}", class_name);
                summary.excluded_classes += 1;
                continue;
            }

            for method in listing.methods {
                let identity = method.identity(&class_name);
                let coverage = match method.code {
                    Some(units) => MethodCoverage::new(identity, units),
                    None => MethodCoverage::without_body(identity),
                };
                match self.model.add_method(coverage) {
                    Registration::Inserted => summary.methods += 1,
                    Registration::RemovedAsAmbiguous => {
                        warn!("duplicated method {}.{}{}, dropping all definitions", class_name, method.name, method.descriptor);
                        summary.ambiguous_methods += 1;
                    },
                    Registration::RejectedDuplicate => {
                        warn!("duplicated method {}.{}{}", class_name, method.name, method.descriptor);
                    },
                }
            }
        }

        debug!("load summary: {:?}", summary);
        summary
    }

    /// Merges a coverage record.
    ///
    /// Covered flags are only ever set, so a record can never undo the coverage recorded by an earlier one.
    ///
    /// # Panics
    ///
    /// Panics if the instruction widths of the method disagree with its length after the length has been validated,
    /// which is a bug.
    pub fn merge(&mut self, record: &CoverageRecord) -> MergeOutcome {
        let identity = &record.identity;
        if !self.filter.included(identity.class_name()) {
            trace!("record filtered: {}", identity);
            return MergeOutcome::Skipped(Skipped::Filtered);
        }

        let method = match self.model.method_mut(identity) {
            Some(method) => method,
            None => {
                info!("no method {}", identity);
                return MergeOutcome::Skipped(Skipped::UnknownMethod);
            },
        };

        if method.is_abstract_or_native() {
            info!("no implementation for method {}", identity);
            return MergeOutcome::Skipped(Skipped::NoImplementation);
        }

        let expected = method.code_units_len();
        let bits = match bits::decode(&record.bits, expected) {
            Some(bits) => bits,
            None => {
                info!("inconsistent bytecode length of {}, expecting {}, got {:?}", identity, expected, record.bits);
                return MergeOutcome::Skipped(Skipped::LengthMismatch {
                    expected,
                    actual: record.bits.len(),
                });
            },
        };

        method.apply(&bits);
        MergeOutcome::Applied
    }

    /// Merges all records of a snapshot, in order.
    pub fn merge_snapshot(&mut self, snapshot: &Snapshot) -> MergeTally {
        let mut tally = MergeTally::default();
        for record in &snapshot.records {
            tally.record(self.merge(record));
        }
        debug!("snapshot {} (pid {}, {}): {:?}", snapshot.timestamp, snapshot.pid, snapshot.kind, tally);
        tally
    }

    /// Summarizes the coverage of the classes included by the filter.
    pub fn report(&self) -> Report {
        Report::summarize(self.model.classes(), &self.filter)
    }

    /// Computes the coverage histogram of the classes included by the filter.
    pub fn histogram(&self) -> Histogram {
        let filter = &self.filter;
        Histogram::build(self.model.classes().filter(|class| filter.included(class.name())))
    }
}

//}}}
