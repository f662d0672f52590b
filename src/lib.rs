//! # api-snapshot
//!
//! Extracts the public API of a jar or aar with `javap` and keeps it as a
//! tree of per-class source files that can be regenerated or verified.
//!
//! ## Architecture
//!
//! - **cli**: Command-line surface
//! - **config**: Validated run configuration and javap resolution
//! - **error**: Configuration errors and the aggregated run failure
//! - **archive**: Class listing for jars, `classes.jar` extraction for aars
//! - **javap**: javap process integration
//! - **parse**: javap output splitting and per-class entry parsing
//! - **group**: Grouping of entries by package
//! - **extract**: Batched disassembly driving parse and group
//! - **reconcile**: Generate, compare or print the grouped entries

pub mod archive;
pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod group;
pub mod javap;
pub mod parse;
pub mod reconcile;
