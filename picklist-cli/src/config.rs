/// Config file loading and creation for the picklist CLI.
///
/// Config lives at ~/.config/picklist/config.toml.
/// All fields are optional. CLI args override config values.
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::bail;

#[derive(Debug, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PicklistConfig {
    pub strategy: Option<String>,
    pub seed: Option<u64>,
    pub rounds: Option<usize>,
    pub trials: Option<usize>,
    pub max_steps: Option<usize>,
    pub good_threshold_base: Option<f64>,
    pub good_threshold_decay: Option<f64>,
    pub parallel: Option<bool>,
}

const DEFAULT_CONFIG_TEMPLATE: &str = "\
# picklist configuration
# All values here can be overridden by CLI flags.

# Ranking strategy: \"point-tally\", \"randomized\", \"greedy\", or \"all\"
# strategy = \"randomized\"

# Seed for the randomized search. Leave unset to draw a fresh seed per run.
# seed = 25

# Randomized search: outer rounds and random permutations tried per round
# rounds = 100
# trials = 1000

# A trial counts as good when its compliance exceeds
# good_threshold_base * good_threshold_decay ^ team_count percent.
# good_threshold_base = 98.8
# good_threshold_decay = 0.988

# Run randomized trials on all cores
# parallel = true

# Greedy insertion: budget of insertions plus repairs
# max_steps = 10000
";

/// Returns the default config path: ~/.config/picklist/config.toml
pub fn config_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| bail("HOME environment variable not set"));
    PathBuf::from(home).join(".config").join("picklist").join("config.toml")
}

pub fn parse_config(content: &str) -> Result<PicklistConfig, toml::de::Error> {
    toml::from_str(content)
}

/// Load config from a file path. Returns default (all None) if file doesn't exist.
pub fn load_config(path: &Path) -> PicklistConfig {
    match std::fs::read_to_string(path) {
        Ok(content) => parse_config(&content)
            .unwrap_or_else(|e| bail(format!("Failed to parse config at {}: {e}", path.display()))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => PicklistConfig::default(),
        Err(e) => bail(format!("Failed to read config at {}: {e}", path.display())),
    }
}

/// Create the default config file at `path`. Errors if it already exists.
pub fn create_default_config(path: &Path) {
    if path.exists() {
        bail(format!("Config file already exists at {}", path.display()));
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .unwrap_or_else(|e| bail(format!("Failed to create directory {}: {e}", parent.display())));
    }

    std::fs::write(path, DEFAULT_CONFIG_TEMPLATE)
        .unwrap_or_else(|e| bail(format!("Failed to write config to {}: {e}", path.display())));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_template_parses_to_empty_config() {
        assert_eq!(parse_config(DEFAULT_CONFIG_TEMPLATE).unwrap(), PicklistConfig::default());
    }

    #[test]
    fn test_parse_partial_config() {
        let cfg = parse_config("strategy = \"greedy\"\nseed = 7\nparallel = false\n").unwrap();
        assert_eq!(cfg.strategy.as_deref(), Some("greedy"));
        assert_eq!(cfg.seed, Some(7));
        assert_eq!(cfg.parallel, Some(false));
        assert_eq!(cfg.rounds, None);
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        assert!(parse_config("endpoint = \"http://localhost\"").is_err());
    }

    #[test]
    fn test_missing_file_loads_default() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config(&dir.path().join("nope.toml"));
        assert_eq!(cfg, PicklistConfig::default());
    }

    #[test]
    fn test_create_then_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        create_default_config(&path);
        assert!(path.exists());
        assert_eq!(load_config(&path), PicklistConfig::default());
    }

    #[test]
    fn test_load_reads_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "rounds = 12\ntrials = 300\nmax_steps = 50\n").unwrap();
        let cfg = load_config(&path);
        assert_eq!(cfg.rounds, Some(12));
        assert_eq!(cfg.trials, Some(300));
        assert_eq!(cfg.max_steps, Some(50));
    }
}
