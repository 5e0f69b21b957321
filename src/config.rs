//! Optional TOML configuration, merged underneath the command line.

use crate::cli::CollectArgs;
use crate::collector::CollectOptions;
use anyhow::Context;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "collect-code.toml";
pub const DEFAULT_OUTPUT: &str = "result.txt";
pub const DEFAULT_SUFFIX: &str = ".cs";

/// Values read from a configuration file. Every key is optional.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub root: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub suffix: Option<String>,
    pub max_depth: Option<usize>,
    pub follow_links: Option<bool>,
    pub skip_hidden: Option<bool>,
    pub respect_gitignore: Option<bool>,
    pub skip_binary: Option<bool>,
    pub create_dirs: Option<bool>,
}

impl FileConfig {
    pub fn from_toml(text: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Reads and parses `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_toml(&text)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    /// Loads `path` if given, otherwise the default file in the current
    /// directory when it exists, otherwise an empty config.
    pub fn discover(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.is_file() {
                    log::debug!("using config file {}", default.display());
                    Self::load(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}

/// The effective settings for one `collect` run.
#[derive(Debug, Clone)]
pub struct Settings {
    pub options: CollectOptions,
    pub create_dirs: bool,
}

impl Settings {
    /// Command line first, then the config file, then the built-in defaults.
    pub fn resolve(args: &CollectArgs, file: FileConfig) -> Self {
        let root = args
            .root
            .clone()
            .or(file.root)
            .unwrap_or_else(|| PathBuf::from("."));
        let output = args
            .output
            .clone()
            .or(file.output)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));
        let suffix = args
            .suffix
            .clone()
            .or(file.suffix)
            .unwrap_or_else(|| DEFAULT_SUFFIX.to_string());

        let mut options = CollectOptions::new(root, output, &suffix);
        options.max_depth = args.max_depth.or(file.max_depth);
        options.follow_links = args.follow_links || file.follow_links.unwrap_or(false);
        options.skip_hidden = args.skip_hidden || file.skip_hidden.unwrap_or(false);
        options.respect_gitignore =
            args.respect_gitignore || file.respect_gitignore.unwrap_or(false);
        options.skip_binary = args.skip_binary || file.skip_binary.unwrap_or(false);

        Self {
            options,
            create_dirs: args.create_dirs || file.create_dirs.unwrap_or(false),
        }
    }
}

/// Template written by `collect-code init`.
pub fn default_config_toml() -> String {
    format!(
        r#"# collect-code configuration. Command line flags override these values.

# Directory to scan.
root = "."

# File the collected sources are written to.
output = "{DEFAULT_OUTPUT}"

# Only files whose name ends with this suffix are collected (case-sensitive).
suffix = "{DEFAULT_SUFFIX}"

# Limit how deep the walk descends. Omit for no limit.
# max_depth = 8

follow_links = false
skip_hidden = false
respect_gitignore = false
skip_binary = false

# Create the output file's parent directory when it is missing.
create_dirs = false
"#
    )
}
