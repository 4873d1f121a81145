use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::{env_subst::substitute_env, schema::DocmillConfig};

/// Standard config file names, checked in order.
const CONFIG_FILENAMES: &[&str] = &["docmill.toml", "docmill.yaml", "docmill.yml", "docmill.json"];

/// Load config from the given path (any supported format).
pub fn load_config(path: &Path) -> anyhow::Result<DocmillConfig> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;
    let raw = substitute_env(&raw);
    parse_config(&raw, path)
}

/// Discover and load config from standard locations.
///
/// Search order:
/// 1. `./docmill.{toml,yaml,yml,json}` (project-local)
/// 2. `~/.config/docmill/docmill.{toml,yaml,yml,json}` (user-global)
///
/// Returns `DocmillConfig::default()` if no config file is found.
pub fn discover_and_load() -> DocmillConfig {
    if let Some(path) = find_config_file() {
        debug!(path = %path.display(), "loading config");
        match load_config(&path) {
            Ok(cfg) => return cfg,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
            },
        }
    } else {
        debug!("no config file found, using defaults");
    }
    DocmillConfig::default()
}

/// Returns the user-global config directory (`~/.config/docmill/`).
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "docmill").map(|d| d.config_dir().to_path_buf())
}

fn find_config_file() -> Option<PathBuf> {
    for name in CONFIG_FILENAMES {
        let p = PathBuf::from(name);
        if p.exists() {
            return Some(p);
        }
    }

    if let Some(dir) = config_dir() {
        for name in CONFIG_FILENAMES {
            let p = dir.join(name);
            if p.exists() {
                return Some(p);
            }
        }
    }

    None
}

fn parse_config(raw: &str, path: &Path) -> anyhow::Result<DocmillConfig> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match ext {
        "toml" => Ok(toml::from_str(raw)?),
        "yaml" | "yml" => Ok(serde_yaml::from_str(raw)?),
        "json" => Ok(serde_json::from_str(raw)?),
        _ => anyhow::bail!("unsupported config format: .{ext}"),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use {super::*, std::io::Write};

    fn write_config(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn loads_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            &dir,
            "docmill.toml",
            "[channel]\nbase_url = \"https://example.test/v1\"\n",
        );
        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.channel.base_url, "https://example.test/v1");
    }

    #[test]
    fn loads_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            &dir,
            "docmill.json",
            r#"{"pipeline": {"stage_timeout_secs": 30}}"#,
        );
        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.pipeline.stage_timeout_secs, 30);
    }

    #[test]
    fn loads_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "docmill.yaml", "agents:\n  model: gpt-4o\n");
        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.agents.model, "gpt-4o");
    }

    #[test]
    fn env_substitution_applies() {
        // PATH is present in any test environment.
        let path_var = std::env::var("PATH").unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "docmill.toml", "[channel]\nbase_url = \"${PATH}\"\n");
        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.channel.base_url, path_var);
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(load_config(Path::new("/nonexistent/docmill.toml")).is_err());
    }

    #[test]
    fn unknown_extension_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir, "docmill.ini", "x=1");
        assert!(load_config(&path).is_err());
    }
}
