use std::env;
use std::path::{Path, PathBuf};

use crate::cli::Cli;
use crate::error::ConfigError;
use crate::reconcile::Mode;

pub const DEFAULT_BATCH_SIZE: usize = 30;

const JAVAP_ENV: &str = "API_SNAPSHOT_JAVAP";
const BATCH_SIZE_ENV: &str = "API_SNAPSHOT_BATCH_SIZE";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Jar,
    Aar,
}

impl InputKind {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let name = path.to_string_lossy();
        if name.ends_with(".jar") {
            Ok(Self::Jar)
        } else if name.ends_with(".aar") {
            Ok(Self::Aar)
        } else {
            Err(ConfigError::UnsupportedInput(path.to_path_buf()))
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub source: PathBuf,
    pub kind: InputKind,
    pub mode: Mode,
    pub batch_size: usize,
}

impl RunConfig {
    pub fn new(
        source: PathBuf,
        output: Option<PathBuf>,
        compare: bool,
    ) -> Result<Self, ConfigError> {
        let kind = InputKind::from_path(&source)?;
        let mode = match output {
            Some(dir) if compare => Mode::Compare(dir),
            Some(dir) => Mode::Generate(dir),
            None => {
                if compare {
                    tracing::warn!("-c true has no effect without -o, printing entries instead");
                }
                Mode::Print
            }
        };

        Ok(Self {
            source,
            kind,
            mode,
            batch_size: DEFAULT_BATCH_SIZE,
        })
    }

    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let mut config = Self::new(cli.path.clone(), cli.output.clone(), cli.compare)?;
        if let Ok(raw) = env::var(BATCH_SIZE_ENV) {
            config.batch_size = parse_batch_size(&raw)?;
        }
        Ok(config)
    }
}

pub fn parse_batch_size(raw: &str) -> Result<usize, ConfigError> {
    match raw.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ConfigError::InvalidBatchSize {
            value: raw.to_string(),
        }),
    }
}

pub fn resolve_javap_path() -> PathBuf {
    if let Ok(p) = env::var(JAVAP_ENV) {
        return PathBuf::from(p);
    }

    if let Ok(home) = env::var("JAVA_HOME") {
        let candidate = Path::new(&home).join("bin").join(javap_file_name());
        if candidate.exists() {
            return candidate;
        }
    }

    PathBuf::from(javap_file_name())
}

fn javap_file_name() -> &'static str {
    if cfg!(windows) { "javap.exe" } else { "javap" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_kind_follows_extension() {
        assert_eq!(
            InputKind::from_path(Path::new("libs/core.jar")).unwrap(),
            InputKind::Jar
        );
        assert_eq!(
            InputKind::from_path(Path::new("libs/ui.aar")).unwrap(),
            InputKind::Aar
        );
        assert!(matches!(
            InputKind::from_path(Path::new("libs/core.zip")),
            Err(ConfigError::UnsupportedInput(_))
        ));
    }

    #[test]
    fn output_and_compare_select_mode() {
        let print = RunConfig::new("a.jar".into(), None, false).unwrap();
        assert_eq!(print.mode, Mode::Print);

        let generate = RunConfig::new("a.jar".into(), Some("out".into()), false).unwrap();
        assert_eq!(generate.mode, Mode::Generate(PathBuf::from("out")));

        let compare = RunConfig::new("a.jar".into(), Some("out".into()), true).unwrap();
        assert_eq!(compare.mode, Mode::Compare(PathBuf::from("out")));
        assert_eq!(compare.batch_size, DEFAULT_BATCH_SIZE);
    }

    #[test]
    fn compare_without_output_falls_back_to_print() {
        let config = RunConfig::new("a.aar".into(), None, true).unwrap();
        assert_eq!(config.mode, Mode::Print);
    }

    #[test]
    fn batch_size_must_be_positive() {
        assert_eq!(parse_batch_size("12").unwrap(), 12);
        assert_eq!(parse_batch_size(" 7 ").unwrap(), 7);
        assert!(parse_batch_size("0").is_err());
        assert!(parse_batch_size("many").is_err());
    }
}
