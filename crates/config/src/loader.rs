use std::path::{Path, PathBuf};

use tracing::debug;

use crate::{env_subst::substitute_env, schema::SitediffConfig};

/// Standard config file names, checked in order.
const CONFIG_FILENAMES: &[&str] = &[
    "sitediff.toml",
    "sitediff.yaml",
    "sitediff.yml",
    "sitediff.json",
    // The original JS tool kept its settings here.
    "config.json",
];

/// Load config from the given path (any supported format).
pub fn load_config(path: &Path) -> anyhow::Result<SitediffConfig> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;
    let raw = substitute_env(&raw);
    parse_config(&raw, path)
}

/// Discover and load config from standard locations.
///
/// Search order:
/// 1. `./sitediff.{toml,yaml,yml,json}` or `./config.json` (project-local)
/// 2. `~/.config/sitediff/sitediff.{toml,...}` (user-global)
///
/// A run without config has nothing to capture, so a missing file is an
/// error rather than a default.
pub fn discover_and_load() -> anyhow::Result<SitediffConfig> {
    let Some(path) = find_config_file() else {
        anyhow::bail!(
            "no config file found; create sitediff.toml or pass --config (looked for {})",
            CONFIG_FILENAMES.join(", ")
        );
    };
    debug!(path = %path.display(), "loading config");
    load_config(&path)
}

/// Find the first config file in standard locations.
fn find_config_file() -> Option<PathBuf> {
    // Project-local
    for name in CONFIG_FILENAMES {
        let p = PathBuf::from(name);
        if p.exists() {
            return Some(p);
        }
    }

    // User-global: ~/.config/sitediff/
    if let Some(dirs) = directories::ProjectDirs::from("", "", "sitediff") {
        let config_dir = dirs.config_dir();
        for name in CONFIG_FILENAMES {
            let p = config_dir.join(name);
            if p.exists() {
                return Some(p);
            }
        }
    }

    None
}

fn parse_config(raw: &str, path: &Path) -> anyhow::Result<SitediffConfig> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match ext {
        "toml" => Ok(toml::from_str(raw)?),
        "yaml" | "yml" => Ok(serde_yaml::from_str(raw)?),
        "json" => Ok(serde_json::from_str(raw)?),
        _ => anyhow::bail!("unsupported config format: .{ext}"),
    }
}
