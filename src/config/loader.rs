use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::config::types::{AppConfig, Defaults, SourceConfig, ThemeConfig};

/// One config file as written. Sections left out stay `None` so a repo-local
/// file can override only what it mentions.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    defaults: Option<Defaults>,
    source: Option<SourceConfig>,
    theme: Option<ThemeConfig>,
}

/// Discover and load the app config.
///
/// Priority:
/// 1. `--config` flag (explicit path)
/// 2. `.replay-board.toml` in the current Git repository
/// 3. `$REPLAY_BOARD_CONFIG` environment variable
/// 4. `$XDG_CONFIG_HOME/replay-board/config.toml`
/// 5. `~/.config/replay-board/config.toml`
///
/// When both a global and a repo-local file exist, each section present in
/// the local file replaces the global one wholesale.
pub fn load_config(explicit_path: Option<&Path>) -> Result<AppConfig> {
    if let Some(path) = explicit_path {
        return read_config_file(path).map(|file| merge(ConfigFile::default(), file));
    }

    let global = find_global_config()
        .map(|p| read_config_file(&p))
        .transpose()?
        .unwrap_or_default();
    let local = find_repo_local_config()
        .map(|p| read_config_file(&p))
        .transpose()?
        .unwrap_or_default();

    Ok(merge(global, local))
}

fn read_config_file(path: &Path) -> Result<ConfigFile> {
    let contents =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    tracing::debug!("loading config from {}", path.display());
    toml::from_str(&contents).with_context(|| format!("parsing TOML from {}", path.display()))
}

fn merge(global: ConfigFile, local: ConfigFile) -> AppConfig {
    AppConfig {
        defaults: local.defaults.or(global.defaults).unwrap_or_default(),
        source: local.source.or(global.source).unwrap_or_default(),
        theme: local.theme.or(global.theme).unwrap_or_default(),
    }
}

fn find_repo_local_config() -> Option<PathBuf> {
    // Walk up from CWD looking for `.replay-board.toml`, stopping at the git root.
    let mut dir = std::env::current_dir().ok()?;
    loop {
        let candidate = dir.join(".replay-board.toml");
        if candidate.is_file() {
            return Some(candidate);
        }
        if dir.join(".git").exists() || !dir.pop() {
            return None;
        }
    }
}

fn find_global_config() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("REPLAY_BOARD_CONFIG") {
        let p = PathBuf::from(&path);
        if p.is_file() {
            return Some(p);
        }
    }

    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        let p = PathBuf::from(xdg).join("replay-board/config.toml");
        if p.is_file() {
            return Some(p);
        }
    }

    let home = std::env::var("HOME").ok().map(PathBuf::from)?;
    let p = home.join(".config/replay-board/config.toml");
    p.is_file().then_some(p)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::IssueState;

    fn file(toml_src: &str) -> ConfigFile {
        toml::from_str(toml_src).unwrap()
    }

    #[test]
    fn local_sections_replace_global_ones() {
        let global = file(
            r#"
[defaults]
labels = ["has-replay", "bug"]

[source]
api_base = "https://global.example"
"#,
        );
        let local = file(
            r#"
[defaults]
state = "closed"
"#,
        );
        let config = merge(global, local);
        // Local [defaults] wins wholesale, so its labels fall back to the default.
        assert_eq!(config.defaults.state, IssueState::Closed);
        assert_eq!(config.defaults.labels, vec!["has-replay".to_owned()]);
        // [source] only exists globally.
        assert_eq!(
            config.source.api_base.as_deref(),
            Some("https://global.example")
        );
    }

    #[test]
    fn empty_files_give_defaults() {
        let config = merge(ConfigFile::default(), ConfigFile::default());
        assert_eq!(config.source.host, "github.com");
        assert_eq!(config.defaults.date_format, "relative");
    }
}
