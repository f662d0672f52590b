use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

#[derive(Debug, Clone)]
pub struct Javap {
    bin: PathBuf,
}

impl Javap {
    pub fn new(bin: PathBuf) -> Self {
        Self { bin }
    }

    pub fn bin(&self) -> &Path {
        &self.bin
    }

    /// Disassembles the public members of `class_names` from `jar_path`.
    ///
    /// javap exits non-zero when any class in the batch cannot be loaded but
    /// still prints the ones it found, so that case only logs stderr.
    pub fn disassemble(&self, jar_path: &Path, class_names: &[String]) -> Result<String> {
        let output = Command::new(&self.bin)
            .arg("-public")
            .arg("-cp")
            .arg(jar_path)
            .args(class_names)
            .output()
            .with_context(|| {
                format!(
                    "Failed to execute {} (ensure a JDK is installed or set API_SNAPSHOT_JAVAP)",
                    self.bin.display()
                )
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::warn!(
                status = ?output.status.code(),
                classes = class_names.len(),
                "javap reported errors: {}",
                stderr.trim()
            );
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
