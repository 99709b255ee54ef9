//! Configuration loading

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{SyncError, SyncResult};

use super::types::Config;

/// Project-level config file, looked up in the consumer root
pub const PROJECT_CONFIG_FILE: &str = "synec.toml";

/// Non-fatal configuration warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> SyncResult<(Config, Vec<ConfigWarning>)> {
    let content = fs::read_to_string(path)?;

    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(&content);

    let config: Config = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| SyncError::Config {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;

    config.validate(path)?;

    let warnings = unknown_paths
        .into_iter()
        .map(|path_str| {
            let key = path_str
                .split('.')
                .next_back()
                .unwrap_or(path_str.as_str())
                .to_string();
            ConfigWarning {
                key: key.clone(),
                file: path.to_path_buf(),
                line: find_line_number(&content, &key),
                suggestion: suggest_key(&key),
            }
        })
        .collect();

    Ok((config, warnings))
}

/// Project config, then user config, then defaults; env overrides on top.
///
/// A malformed config file is an error rather than a silent fallback, since
/// it usually points at the wrong package manager or file names.
pub fn discover(consumer_root: &Path) -> SyncResult<(Config, Vec<ConfigWarning>)> {
    let project_config = consumer_root.join(PROJECT_CONFIG_FILE);
    if project_config.is_file() {
        let (config, warnings) = load_with_warnings(&project_config)?;
        return Ok((with_env_overrides(config), warnings));
    }

    if let Some(user_config_dir) = dirs::config_dir() {
        let user_config = user_config_dir.join("synec/config.toml");
        if user_config.is_file() {
            let (config, warnings) = load_with_warnings(&user_config)?;
            return Ok((with_env_overrides(config), warnings));
        }
    }

    Ok((with_env_overrides(Config::default()), Vec::new()))
}

/// Apply environment variable overrides (SYNEC_* prefix)
pub fn with_env_overrides(mut config: Config) -> Config {
    // SYNEC_NPM
    if let Ok(npm) = std::env::var("SYNEC_NPM") {
        if let Err(e) = config.set_npm_program(npm) {
            tracing::warn!(error = %e, "ignoring SYNEC_NPM");
        }
    }

    // SYNEC_REMOVAL_PROTECTION_MS
    if let Ok(ms) = std::env::var("SYNEC_REMOVAL_PROTECTION_MS") {
        match ms.trim().parse::<u64>() {
            Ok(ms) => {
                if let Err(e) = config.set_removal_protection(std::time::Duration::from_millis(ms))
                {
                    tracing::warn!(error = %e, "ignoring SYNEC_REMOVAL_PROTECTION_MS");
                }
            }
            Err(_) => tracing::warn!(value = %ms, "SYNEC_REMOVAL_PROTECTION_MS is not a number"),
        }
    }

    // SYNEC_PRODUCTION
    if let Ok(val) = std::env::var("SYNEC_PRODUCTION") {
        config.set_production(parse_flag(&val));
    }

    // SYNEC_SCRIPT
    if let Ok(val) = std::env::var("SYNEC_SCRIPT") {
        config.set_script(parse_flag(&val));
    }

    config
}

fn parse_flag(val: &str) -> bool {
    val.to_lowercase() != "false" && val != "0"
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    for (i, line) in content.lines().enumerate() {
        if line.contains(needle) {
            return Some(i + 1);
        }
    }
    None
}

fn suggest_key(unknown: &str) -> Option<String> {
    const CANDIDATES: &[&str] = &[
        "package",
        "manifest_file",
        "dependency_dir",
        "marker_file",
        "ignore_file",
        "source_extensions",
        "install",
        "npm",
        "lock_file",
        "watch",
        "removal_protection_ms",
        "run",
        "script",
        "production",
    ];

    let mut best: Option<(&str, usize)> = None;
    for candidate in CANDIDATES {
        let dist = levenshtein(unknown, candidate);
        best = match best {
            None => Some((candidate, dist)),
            Some((_, best_dist)) if dist < best_dist => Some((candidate, dist)),
            Some(current) => Some(current),
        };
    }

    match best {
        Some((candidate, dist)) if dist <= 2 => Some(candidate.to_string()),
        _ => None,
    }
}

fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    let mut prev: Vec<usize> = (0..=b_bytes.len()).collect();
    let mut curr = vec![0usize; b_bytes.len() + 1];

    for (i, &ac) in a_bytes.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &bc) in b_bytes.iter().enumerate() {
            let cost = if ac == bc { 0 } else { 1 };
            curr[j + 1] =
                std::cmp::min(std::cmp::min(prev[j + 1] + 1, curr[j] + 1), prev[j] + cost);
        }
        prev.clone_from_slice(&curr);
    }

    prev[b_bytes.len()]
}
