use clap::{ArgAction, Parser};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "api-snapshot")]
#[command(about = "Generate or compare the public API entries of a jar or aar")]
#[command(help_template = "{usage-heading} {usage}\n\n{all-args}")]
#[command(disable_help_flag = true)]
pub struct Cli {
    /// Path to a .jar or .aar file
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Folder for generated/compared public entries; entries are printed when absent
    #[arg(short = 'o', value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Compare generated entries with the existing files instead of writing them
    #[arg(
        short = 'c',
        value_name = "true|false",
        action = ArgAction::Set,
        default_value_t = false
    )]
    pub compare: bool,

    /// Show this help message and exit
    #[arg(short = 'h', action = ArgAction::Help)]
    pub help: Option<bool>,
}
