//! Cumulative instruction-level coverage of Dalvik methods.
//!
//! The crate merges per-method coverage bit strings, collected over a series of snapshots from an instrumented app,
//! into a [`CoverageModel`] built from the statically discovered methods, and summarizes the result as a [`Report`] and
//! a [`Histogram`].
//!
//! [`CoverageModel`]: ./model/struct.CoverageModel.html
//! [`Report`]: ./report/struct.Report.html
//! [`Histogram`]: ./report/struct.Histogram.html

#![recursion_limit="128"] // needed for error_chain.

#[macro_use]
extern crate error_chain;
#[macro_use]
extern crate log;
#[cfg(feature = "serde")]
#[macro_use]
extern crate serde;
#[cfg(feature = "serde_json")]
extern crate serde_json;
extern crate fixedbitset;

pub mod error;
pub mod identity;
pub mod filter;
pub mod bits;
pub mod model;
pub mod discovery;
pub mod record;
pub mod engine;
pub mod report;

pub use engine::{Engine, MergeOutcome, MergeTally, Skipped};
pub use error::{ErrorKind, Result};
pub use filter::PackageFilter;
pub use identity::MethodIdentity;
pub use model::{ClassCoverage, CoverageModel, MethodCoverage, Registration};
pub use record::{CoverageRecord, Snapshot};
pub use report::{Histogram, Report};
