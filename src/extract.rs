use anyhow::Result;
use std::io::Write;
use std::path::Path;

use crate::archive::{ResolvedJar, list_classes};
use crate::config::RunConfig;
use crate::group::{PackageMap, group_by_package};
use crate::javap::Javap;
use crate::parse::{Entry, parse_output};
use crate::reconcile::{ReconciliationResult, reconcile};

/// Something that turns a batch of class names into raw javap text.
pub trait Disassembler {
    fn disassemble(&self, jar_path: &Path, class_names: &[String]) -> Result<String>;
}

impl Disassembler for Javap {
    fn disassemble(&self, jar_path: &Path, class_names: &[String]) -> Result<String> {
        Javap::disassemble(self, jar_path, class_names)
    }
}

/// Disassembles `class_names` in batches of `batch_size`, parsing each
/// batch before the next process is started.
pub fn extract_entries<D: Disassembler + ?Sized>(
    disassembler: &D,
    jar_path: &Path,
    class_names: &[String],
    batch_size: usize,
) -> Result<Vec<Entry>> {
    let mut entries = Vec::new();
    for (idx, batch) in class_names.chunks(batch_size.max(1)).enumerate() {
        let raw = disassembler.disassemble(jar_path, batch)?;
        let parsed = parse_output(&raw);
        tracing::debug!(
            batch = idx,
            classes = batch.len(),
            entries = parsed.len(),
            "parsed javap batch"
        );
        entries.extend(parsed);
    }
    Ok(entries)
}

pub fn extract_package_map<D: Disassembler + ?Sized>(
    disassembler: &D,
    jar_path: &Path,
    batch_size: usize,
) -> Result<PackageMap> {
    let classes = list_classes(jar_path)?;
    tracing::info!(jar = %jar_path.display(), classes = classes.len(), "listed classes");
    let entries = extract_entries(disassembler, jar_path, &classes, batch_size)?;
    Ok(group_by_package(entries))
}

/// Extracts every public entry of the configured archive, then reconciles
/// the whole package map according to the configured mode.
pub fn run<D: Disassembler + ?Sized, W: Write>(
    config: &RunConfig,
    disassembler: &D,
    out: &mut W,
) -> Result<ReconciliationResult> {
    let jar = ResolvedJar::open(&config.source, config.kind)?;
    let map = extract_package_map(disassembler, jar.path(), config.batch_size)?;
    if map.is_empty() {
        tracing::warn!(source = %config.source.display(), "no public classes found");
    }
    tracing::info!(
        packages = map.package_count(),
        entries = map.entry_count(),
        "extracted public entries"
    );
    reconcile(&map, &config.mode, out)
}
