//! Reconciliation of extracted entries against an output tree.
//!
//! Every package maps to `<root>/<package path>/`. Generate mode writes one
//! file per entry. Compare mode reads the same files and reports entries
//! whose file is missing or differs, plus `.java`/`.kt` files in the
//! package directory that no entry claimed. Mismatches are written to the
//! report sink as they are found and collected into the returned result, so
//! a single run surfaces all of them.

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::error::RunFailure;
use crate::group::PackageMap;
use crate::parse::Entry;

const SOURCE_SUFFIXES: &[&str] = &[".java", ".kt"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// No output directory: entries go to the report sink.
    Print,
    Generate(PathBuf),
    Compare(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mismatch {
    MissingTarget {
        package: String,
        file_name: String,
        path: PathBuf,
    },
    ContentMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },
    StaleFile {
        path: PathBuf,
    },
}

impl Mismatch {
    pub fn path(&self) -> &Path {
        match self {
            Mismatch::MissingTarget { path, .. }
            | Mismatch::ContentMismatch { path, .. }
            | Mismatch::StaleFile { path } => path,
        }
    }
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mismatch::MissingTarget {
                package, file_name, ..
            } => {
                if package.is_empty() {
                    write!(f, "Missing target: {file_name}")
                } else {
                    write!(f, "Missing target: {package}.{file_name}")
                }
            }
            Mismatch::ContentMismatch {
                path,
                expected,
                actual,
            } => {
                writeln!(f, "Not equal for: {}", path.display())?;
                writeln!(f, "Expect (sha256 {}):\n\n{expected}", digest(expected))?;
                write!(f, "But found (sha256 {}):\n\n{actual}", digest(actual))
            }
            Mismatch::StaleFile { path } => write!(f, "Mismatch file: {}", path.display()),
        }
    }
}

fn digest(text: &str) -> String {
    hex::encode(Sha256::digest(text.as_bytes()))
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconciliationResult {
    mismatches: Vec<Mismatch>,
}

impl ReconciliationResult {
    pub fn merge(mut self, other: ReconciliationResult) -> Self {
        self.mismatches.extend(other.mismatches);
        self
    }

    pub fn mismatches(&self) -> &[Mismatch] {
        &self.mismatches
    }

    pub fn count(&self) -> usize {
        self.mismatches.len()
    }

    pub fn is_success(&self) -> bool {
        self.mismatches.is_empty()
    }

    pub fn into_outcome(self) -> Result<(), RunFailure> {
        if self.is_success() {
            Ok(())
        } else {
            Err(RunFailure {
                mismatches: self.count(),
            })
        }
    }
}

pub fn package_dir(root: &Path, package: &str) -> PathBuf {
    package
        .split('.')
        .filter(|seg| !seg.is_empty())
        .fold(root.to_path_buf(), |dir, seg| dir.join(seg))
}

/// Reconciles every package of `map`, in package order, against `mode`.
pub fn reconcile<W: Write>(
    map: &PackageMap,
    mode: &Mode,
    out: &mut W,
) -> Result<ReconciliationResult> {
    map.iter().try_fold(
        ReconciliationResult::default(),
        |total, (package, entries)| -> Result<ReconciliationResult> {
            let found = reconcile_package(package, entries, mode, out)?;
            Ok(total.merge(found))
        },
    )
}

pub fn reconcile_package<W: Write>(
    package: &str,
    entries: &[Entry],
    mode: &Mode,
    out: &mut W,
) -> Result<ReconciliationResult> {
    match mode {
        Mode::Print => {
            print_package(entries, out)?;
            Ok(ReconciliationResult::default())
        }
        Mode::Generate(root) => {
            generate_package(&package_dir(root, package), entries)?;
            Ok(ReconciliationResult::default())
        }
        Mode::Compare(root) => {
            compare_package(package, &package_dir(root, package), entries, out)
        }
    }
}

fn print_package<W: Write>(entries: &[Entry], out: &mut W) -> Result<()> {
    for entry in entries {
        writeln!(
            out,
            "-- package: {}, name: {}",
            entry.package(),
            entry.file_name()
        )?;
        write!(out, "{}", entry.source())?;
        if !entry.source().ends_with('\n') {
            writeln!(out)?;
        }
    }
    Ok(())
}

fn generate_package(dir: &Path, entries: &[Entry]) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
    for entry in entries {
        let path = dir.join(entry.file_name());
        fs::write(&path, entry.source())
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }
    tracing::debug!(dir = %dir.display(), files = entries.len(), "generated package");
    Ok(())
}

fn compare_package<W: Write>(
    package: &str,
    dir: &Path,
    entries: &[Entry],
    out: &mut W,
) -> Result<ReconciliationResult> {
    let mut candidates = list_file_names(dir)?;
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

    let mut found = Vec::new();
    for entry in entries {
        let path = dir.join(entry.file_name());
        let existing = match fs::read(&path) {
            Ok(bytes) => Some(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", path.display()));
            }
        };

        let mismatch = match existing {
            None => Some(Mismatch::MissingTarget {
                package: package.to_string(),
                file_name: entry.file_name().to_string(),
                path,
            }),
            Some(bytes) if bytes != entry.source().as_bytes() => {
                Some(Mismatch::ContentMismatch {
                    path,
                    expected: entry.source().to_string(),
                    actual: String::from_utf8_lossy(&bytes).into_owned(),
                })
            }
            Some(_) => None,
        };
        if let Some(mismatch) = mismatch {
            record(&mut found, mismatch, out)?;
        }
        candidates.remove(OsStr::new(entry.file_name()));
    }

    for name in candidates {
        let path = dir.join(&name);
        if is_source_file(&path) {
            record(&mut found, Mismatch::StaleFile { path }, out)?;
        }
    }

    tracing::debug!(
        package,
        entries = entries.len(),
        mismatches = found.len(),
        "compared package"
    );
    Ok(ReconciliationResult { mismatches: found })
}

fn record<W: Write>(found: &mut Vec<Mismatch>, mismatch: Mismatch, out: &mut W) -> Result<()> {
    tracing::debug!(path = %mismatch.path().display(), "mismatch");
    writeln!(out, "{mismatch}")?;
    found.push(mismatch);
    Ok(())
}

fn list_file_names(dir: &Path) -> Result<BTreeSet<OsString>> {
    let read_dir = match fs::read_dir(dir) {
        Ok(rd) => rd,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeSet::new()),
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to list {}", dir.display()));
        }
    };

    let mut names = BTreeSet::new();
    for item in read_dir {
        let item = item.with_context(|| format!("Failed to list {}", dir.display()))?;
        names.insert(item.file_name());
    }
    Ok(names)
}

fn is_source_file(path: &Path) -> bool {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default();
    SOURCE_SUFFIXES.iter().any(|suffix| name.ends_with(suffix)) && path.is_file()
}
