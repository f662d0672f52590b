//! Jar listing and aar unpacking.

use anyhow::{Context, Result};
use memmap2::Mmap;
use std::fs::File;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use zip::ZipArchive;

use crate::config::InputKind;
use crate::error::ConfigError;

const INNER_JAR: &str = "classes.jar";

fn open_archive(path: &Path) -> Result<(File, Mmap)> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    // SAFETY: The file is opened read-only and outlives every view of the map.
    let mmap = unsafe { Mmap::map(&file) }
        .with_context(|| format!("Failed to mmap {}", path.display()))?;
    Ok((file, mmap))
}

/// Fully qualified names of every `.class` entry, in archive order.
pub fn list_classes(jar_path: &Path) -> Result<Vec<String>> {
    let (_file, mmap) = open_archive(jar_path)?;
    let mut archive = ZipArchive::new(Cursor::new(&mmap[..]))
        .with_context(|| format!("Failed to read zip(jar): {}", jar_path.display()))?;

    let mut classes = Vec::new();
    for i in 0..archive.len() {
        let entry = archive.by_index(i)?;
        let name = entry.name();
        if let Some(stem) = name.strip_suffix(".class") {
            classes.push(stem.replace(['/', '\\'], "."));
        }
    }
    Ok(classes)
}

/// Copies `classes.jar` out of an aar into `dest_dir`.
pub fn extract_inner_jar(aar_path: &Path, dest_dir: &Path) -> Result<PathBuf> {
    let (_file, mmap) = open_archive(aar_path)?;
    let mut archive = ZipArchive::new(Cursor::new(&mmap[..]))
        .with_context(|| format!("Failed to read zip(aar): {}", aar_path.display()))?;

    let mut entry = match archive.by_name(INNER_JAR) {
        Ok(entry) => entry,
        Err(zip::result::ZipError::FileNotFound) => {
            return Err(ConfigError::MissingInnerJar(aar_path.to_path_buf()).into());
        }
        Err(e) => {
            return Err(e).with_context(|| {
                format!("Failed to read {INNER_JAR} in {}", aar_path.display())
            });
        }
    };

    let target = dest_dir.join(INNER_JAR);
    let mut out = File::create(&target)
        .with_context(|| format!("Failed to create {}", target.display()))?;
    std::io::copy(&mut entry, &mut out)
        .with_context(|| format!("Failed to extract {INNER_JAR} from {}", aar_path.display()))?;
    Ok(target)
}

/// A jar ready for javap. Aar inputs keep their temporary directory alive
/// for as long as this value lives.
#[derive(Debug)]
pub struct ResolvedJar {
    path: PathBuf,
    _workdir: Option<TempDir>,
}

impl ResolvedJar {
    pub fn open(source: &Path, kind: InputKind) -> Result<Self> {
        match kind {
            InputKind::Jar => Ok(Self {
                path: source.to_path_buf(),
                _workdir: None,
            }),
            InputKind::Aar => {
                let workdir = tempfile::Builder::new()
                    .prefix("api-snapshot-")
                    .tempdir()
                    .context("Failed to create temporary directory")?;
                let path = extract_inner_jar(source, workdir.path())?;
                tracing::debug!(aar = %source.display(), jar = %path.display(), "unpacked aar");
                Ok(Self {
                    path,
                    _workdir: Some(workdir),
                })
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
