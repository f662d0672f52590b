//! Error kinds that decide how a run ends.
//!
//! Configuration problems abort before any class is disassembled. A run
//! failure is only raised after every package has been reconciled, so it
//! carries the total number of mismatches found.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("path {} is not a jar or aar file", .0.display())]
    UnsupportedInput(PathBuf),

    #[error("invalid batch size {value:?}: expected a positive integer")]
    InvalidBatchSize { value: String },

    #[error("aar {} does not contain classes.jar", .0.display())]
    MissingInnerJar(PathBuf),
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Comparison failed: {mismatches}")]
pub struct RunFailure {
    pub mismatches: usize,
}
