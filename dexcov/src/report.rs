//! Coverage report.
//!
//! The [`Report`] structure contains per-class and total method and instruction counts, and the [`Histogram`] shows how
//! the instruction coverage of the methods is distributed. Both can be serialized via serde, or printed as the
//! tab-separated text produced by [`Report::table()`], [`Report::terse()`] and the `Display` implementation of
//! [`Histogram`].
//!
//! [`Report`]: ./struct.Report.html
//! [`Histogram`]: ./struct.Histogram.html
//! [`Report::table()`]: ./struct.Report.html#method.table
//! [`Report::terse()`]: ./struct.Report.html#method.terse

use filter::PackageFilter;
use model::ClassCoverage;

use std::{f64, fmt};
use std::ops::AddAssign;

/// Divides `a` by `b`, returning NaN if `b` is zero so that "no data" is not confused with "no coverage".
pub fn safe_div(a: usize, b: usize) -> f64 {
    if b == 0 {
        f64::NAN
    } else {
        a as f64 / b as f64
    }
}

//----------------------------------------------------------------------------------------------------------------------
//{{{ Summary

/// Statistical summary of a class, or of all classes.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Summary {
    /// Number of methods, including abstract and native methods.
    pub methods_count: usize,

    /// Number of methods having a body.
    pub concrete_methods_count: usize,

    /// Number of concrete methods with at least one covered instruction.
    pub methods_covered: usize,

    /// Number of instructions in the concrete methods.
    pub instructions_count: usize,

    /// Number of covered instructions.
    pub instructions_covered: usize,
}

impl Summary {
    /// Produces the summary of a class.
    pub fn of_class(class: &ClassCoverage) -> Summary {
        let mut summary = Summary {
            methods_count: class.len(),
            ..Summary::default()
        };
        for method in class.methods().filter(|m| !m.is_abstract_or_native()) {
            summary.concrete_methods_count += 1;
            summary.methods_covered += method.is_covered() as usize;
            summary.instructions_count += method.instructions_count();
            summary.instructions_covered += method.instructions_covered();
        }
        summary
    }

    /// Ratio of covered methods among all methods.
    pub fn method_ratio(&self) -> f64 {
        safe_div(self.methods_covered, self.methods_count)
    }

    /// Ratio of covered methods among the concrete methods.
    pub fn concrete_method_ratio(&self) -> f64 {
        safe_div(self.methods_covered, self.concrete_methods_count)
    }

    /// Ratio of covered instructions.
    pub fn instruction_ratio(&self) -> f64 {
        safe_div(self.instructions_covered, self.instructions_count)
    }
}

impl AddAssign for Summary {
    fn add_assign(&mut self, other: Summary) {
        self.methods_count += other.methods_count;
        self.concrete_methods_count += other.concrete_methods_count;
        self.methods_covered += other.methods_covered;
        self.instructions_count += other.instructions_count;
        self.instructions_covered += other.instructions_covered;
    }
}

//}}}
//----------------------------------------------------------------------------------------------------------------------
//{{{ Report

/// Summary of a single class.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ClassSummary {
    pub name: String,
    pub summary: Summary,
}

/// A coverage report.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Report {
    /// Classes in the report, sorted by name.
    pub classes: Vec<ClassSummary>,

    /// Sum of all classes.
    pub total: Summary,
}

impl Report {
    /// Summarizes the classes included by the filter.
    pub fn summarize<'a, I: IntoIterator<Item = &'a ClassCoverage>>(classes: I, filter: &PackageFilter) -> Report {
        let mut report = Report::default();
        for class in classes {
            if !filter.included(class.name()) {
                continue;
            }
            let summary = Summary::of_class(class);
            report.total += summary;
            report.classes.push(ClassSummary {
                name: class.name().to_owned(),
                summary,
            });
        }
        report.classes.sort_by(|a, b| a.name.cmp(&b.name));
        report
    }

    /// Formats the report as a table with one row per class, followed by the totals.
    pub fn table(&self) -> Table {
        Table(self)
    }

    /// Formats the totals and ratios in a single line.
    pub fn terse(&self) -> Terse {
        Terse(&self.total)
    }
}

/// Per-class table returned by [`Report::table()`](./struct.Report.html#method.table).
#[derive(Copy, Clone, Debug)]
pub struct Table<'a>(&'a Report);

impl<'a> fmt::Display for Table<'a> {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fn write_row(fmt: &mut fmt::Formatter, width: usize, name: &str, s: &Summary) -> fmt::Result {
            writeln!(
                fmt,
                "{:<width$}:\t{}\t{}\t{}\t{}\t{}",
                name,
                s.methods_count,
                s.concrete_methods_count,
                s.methods_covered,
                s.instructions_count,
                s.instructions_covered,
                width = width,
            )
        }

        let width = self.0.classes.iter().map(|c| c.name.len()).max().unwrap_or(0);
        writeln!(fmt, "{:<width$}:\tMeth\tConM\tCovM\tInsn\tCovI", "Name", width = width)?;
        for class in &self.0.classes {
            write_row(fmt, width, &class.name, &class.summary)?;
        }
        write_row(fmt, width, "", &self.0.total)
    }
}

/// Single-line totals returned by [`Report::terse()`](./struct.Report.html#method.terse).
#[derive(Copy, Clone, Debug)]
pub struct Terse<'a>(&'a Summary);

impl<'a> fmt::Display for Terse<'a> {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        let s = self.0;
        write!(
            fmt,
            "{}\t{}\t{}\t{}\t{}\t{:.6}\t{:.6}\t{:.6}",
            s.methods_count,
            s.concrete_methods_count,
            s.methods_covered,
            s.instructions_count,
            s.instructions_covered,
            s.method_ratio(),
            s.concrete_method_ratio(),
            s.instruction_ratio(),
        )
    }
}

//}}}
//----------------------------------------------------------------------------------------------------------------------
//{{{ Histogram

/// Number of concrete methods per instruction coverage range.
///
/// Bucket `i < 10` counts the methods with coverage in `[10*i %, 10*(i+1) %)`, and bucket 10 counts the fully covered
/// methods.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Histogram {
    pub buckets: [usize; 11],
}

impl Histogram {
    /// Builds the histogram of all concrete methods in the classes. Methods without instructions are skipped.
    pub fn build<'a, I: IntoIterator<Item = &'a ClassCoverage>>(classes: I) -> Histogram {
        let mut histogram = Histogram::default();
        for class in classes {
            for method in class.methods().filter(|m| !m.is_abstract_or_native()) {
                if let Some(bucket) = Histogram::bucket_of(method.instructions_covered(), method.instructions_count()) {
                    histogram.buckets[bucket] += 1;
                }
            }
        }
        histogram
    }

    /// Finds the bucket of a method with `covered` out of `total` instructions covered.
    ///
    /// The percentage is floored before bucketing, using integers to avoid rounding a ratio like 69.9999% up to 70%.
    /// Returns `None` if `total` is zero.
    pub fn bucket_of(covered: usize, total: usize) -> Option<usize> {
        if total == 0 {
            return None;
        }
        let percent = covered * 100 / total;
        Some(percent / 10)
    }
}

impl fmt::Display for Histogram {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        for (i, count) in self.buckets.iter().enumerate() {
            writeln!(fmt, "{:>3}% {}", i * 10, count)?;
        }
        Ok(())
    }
}

//}}}

#[cfg(test)]
mod tests {
    use super::*;
    use model::CoverageModel;

    #[test]
    fn test_safe_div() {
        assert!(safe_div(0, 0).is_nan());
        assert!(safe_div(3, 0).is_nan());
        assert_eq!(safe_div(5, 10), 0.5);
        assert_eq!(safe_div(0, 4), 0.0);
    }

    #[test]
    fn test_bucket_of() {
        assert_eq!(Histogram::bucket_of(0, 7), Some(0));
        assert_eq!(Histogram::bucket_of(3, 4), Some(7));
        assert_eq!(Histogram::bucket_of(9999, 10000), Some(9));
        assert_eq!(Histogram::bucket_of(10, 10), Some(10));
        assert_eq!(Histogram::bucket_of(7, 10), Some(7));
        assert_eq!(Histogram::bucket_of(0, 0), None);
    }

    #[test]
    fn test_terse_nan() {
        let report = Report::summarize(CoverageModel::new().classes(), &PackageFilter::new());
        assert_eq!(report.terse().to_string(), "0\t0\t0\t0\t0\tNaN\tNaN\tNaN");
    }

    #[test]
    fn test_terse() {
        let total = Summary {
            methods_count: 4,
            concrete_methods_count: 2,
            methods_covered: 1,
            instructions_count: 8,
            instructions_covered: 2,
        };
        assert_eq!(Terse(&total).to_string(), "4\t2\t1\t8\t2\t0.250000\t0.500000\t0.250000");
    }

    #[test]
    fn test_table() {
        let report = Report {
            classes: vec![
                ClassSummary {
                    name: "a.Bc".to_owned(),
                    summary: Summary {
                        methods_count: 2,
                        concrete_methods_count: 1,
                        methods_covered: 1,
                        instructions_count: 3,
                        instructions_covered: 2,
                    },
                },
                ClassSummary {
                    name: "a.D".to_owned(),
                    summary: Summary::default(),
                },
            ],
            total: Summary {
                methods_count: 2,
                concrete_methods_count: 1,
                methods_covered: 1,
                instructions_count: 3,
                instructions_covered: 2,
            },
        };
        assert_eq!(
            report.table().to_string(),
            "Name:\tMeth\tConM\tCovM\tInsn\tCovI\n\
             a.Bc:\t2\t1\t1\t3\t2\n\
             a.D :\t0\t0\t0\t0\t0\n    \
             :\t2\t1\t1\t3\t2\n"
        );
    }

    #[test]
    fn test_histogram_display() {
        let mut histogram = Histogram::default();
        histogram.buckets[7] = 2;
        histogram.buckets[10] = 1;
        let text = histogram.to_string();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 11);
        assert_eq!(lines[0], "  0% 0");
        assert_eq!(lines[7], " 70% 2");
        assert_eq!(lines[10], "100% 1");
    }
}
