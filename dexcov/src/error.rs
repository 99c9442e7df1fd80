//! Errors related to the `dexcov` crate.
//!
//! Please see documentation of the [`error-chain` crate](https://docs.rs/error-chain/0.12.0/error_chain/) for detailed
//! usage.
//!
//! Anomalies in the coverage data itself (unknown methods, mismatched bit lengths, duplicated registrations) are not
//! errors. They are reported as [`MergeOutcome`]s and [`Registration`]s and the offending input is skipped.
//!
//! [`MergeOutcome`]: ../engine/enum.MergeOutcome.html
//! [`Registration`]: ../model/enum.Registration.html

use std::io;

error_chain! {
    foreign_links {
        Io(io::Error) /** Wrapper of standard I/O error. */;
        Json(::serde_json::Error) #[cfg(feature="serde_json")] /** Wrapper of JSON error. */;
    }
}
