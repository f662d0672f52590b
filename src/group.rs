use std::collections::BTreeMap;

use crate::parse::Entry;

/// Entries keyed by package. Packages iterate in ascending order, entries
/// within a package keep the order they were parsed in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageMap {
    packages: BTreeMap<String, Vec<Entry>>,
}

impl PackageMap {
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Entry])> {
        self.packages
            .iter()
            .map(|(name, entries)| (name.as_str(), entries.as_slice()))
    }

    pub fn package_count(&self) -> usize {
        self.packages.len()
    }

    pub fn entry_count(&self) -> usize {
        self.packages.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

pub fn group_by_package(entries: impl IntoIterator<Item = Entry>) -> PackageMap {
    let mut packages: BTreeMap<String, Vec<Entry>> = BTreeMap::new();
    for entry in entries {
        packages
            .entry(entry.package().to_string())
            .or_default()
            .push(entry);
    }
    PackageMap { packages }
}

impl FromIterator<Entry> for PackageMap {
    fn from_iter<I: IntoIterator<Item = Entry>>(iter: I) -> Self {
        group_by_package(iter)
    }
}
