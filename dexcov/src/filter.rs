//! Package inclusion filter.

use std::collections::BTreeSet;

/// Decides which classes take part in merging and reporting, by matching class names against package prefixes.
///
/// When both lists are given the whitelist takes precedence: a class matching a whitelisted prefix is included even if
/// it also matches a blacklisted one, and a class matching neither list is included.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub struct PackageFilter {
    #[cfg_attr(feature = "serde", serde(rename = "include", default))]
    whitelist: Option<BTreeSet<String>>,
    #[cfg_attr(feature = "serde", serde(rename = "exclude", default))]
    blacklist: Option<BTreeSet<String>>,
}

impl PackageFilter {
    /// Creates a filter which includes everything.
    pub fn new() -> PackageFilter {
        PackageFilter::default()
    }

    /// Adds a prefix to the whitelist.
    pub fn include<S: Into<String>>(&mut self, prefix: S) -> &mut PackageFilter {
        self.whitelist.get_or_insert_with(BTreeSet::new).insert(prefix.into());
        self
    }

    /// Adds a prefix to the blacklist.
    pub fn exclude<S: Into<String>>(&mut self, prefix: S) -> &mut PackageFilter {
        self.blacklist.get_or_insert_with(BTreeSet::new).insert(prefix.into());
        self
    }

    /// Checks whether the class should be included.
    pub fn included(&self, class_name: &str) -> bool {
        fn matches(prefixes: &BTreeSet<String>, class_name: &str) -> bool {
            prefixes.iter().any(|prefix| class_name.starts_with(prefix.as_str()))
        }

        match (&self.whitelist, &self.blacklist) {
            (&Some(ref white), &Some(ref black)) => matches(white, class_name) || !matches(black, class_name),
            (&Some(ref white), &None) => matches(white, class_name),
            (&None, &Some(ref black)) => !matches(black, class_name),
            (&None, &None) => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_lists() {
        let filter = PackageFilter::new();
        assert!(filter.included("com.app.Foo"));
        assert!(filter.included(""));
    }

    #[test]
    fn test_whitelist_only() {
        let mut filter = PackageFilter::new();
        filter.include("com.app").include("org.lib");
        assert!(filter.included("com.app.Foo"));
        assert!(filter.included("org.lib.internal.Bar"));
        assert!(!filter.included("com.other.Foo"));
    }

    #[test]
    fn test_blacklist_only() {
        let mut filter = PackageFilter::new();
        filter.exclude("android.");
        assert!(!filter.included("android.app.Activity"));
        assert!(filter.included("com.app.Foo"));
    }

    #[test]
    fn test_whitelist_wins_over_blacklist() {
        let mut filter = PackageFilter::new();
        filter.include("com.app").exclude("com.app.internal");
        assert!(filter.included("com.app.internal.Foo"));
        assert!(filter.included("org.unrelated.Bar"));

        let mut filter = PackageFilter::new();
        filter.include("com.app").exclude("org.lib");
        assert!(!filter.included("org.lib.Baz"));
        assert!(filter.included("net.other.Qux"));
    }
}
