use std::io::Write;

use replay_board::color::Color;
use replay_board::config::loader::load_config;
use replay_board::config::types::AppConfig;
use replay_board::filter::DEFAULT_LABEL;
use replay_board::types::IssueState;

#[test]
fn empty_config_uses_defaults() {
    let config: AppConfig = toml::from_str("").unwrap();
    assert_eq!(config.defaults.labels, vec![DEFAULT_LABEL.to_owned()]);
    assert_eq!(config.defaults.state, IssueState::Open);
    assert_eq!(config.defaults.date_format, "relative");
    assert_eq!(config.source.host, "github.com");
    assert_eq!(config.source.limit, 100);
    assert!(config.source.api_base.is_none());
    assert!(config.theme.open.is_none());
}

#[test]
fn parse_unknown_keys_ignored() {
    let toml = r#"
unknown_top_level = "should be ignored"

[defaults]
org = "replayio"
"#;
    let config: AppConfig = toml::from_str(toml).unwrap();
    assert_eq!(config.defaults.org, "replayio");
}

#[test]
fn parse_defaults_and_source() {
    let toml = r#"
[defaults]
labels = ["has-replay", "bug"]
state = "closed"
org = "replayio"
repo = "devtools"
date_format = "%d/%m/%Y"
refetch_interval_minutes = 5

[source]
api_base = "https://oss.example.dev"
limit = 50
cache_ttl_minutes = 1
"#;
    let config: AppConfig = toml::from_str(toml).unwrap();
    assert_eq!(config.defaults.state, IssueState::Closed);
    assert_eq!(config.defaults.refetch_interval_minutes, 5);
    assert_eq!(config.source.api_base.as_deref(), Some("https://oss.example.dev"));
    assert_eq!(config.source.limit, 50);
    assert_eq!(config.source.host, "github.com");

    let spec = config.defaults.initial_filters();
    assert_eq!(spec.labels.iter().collect::<Vec<_>>(), vec!["has-replay", "bug"]);
    assert_eq!(spec.org, "replayio");
    assert_eq!(spec.repo, "devtools");
    assert_eq!(spec.state, IssueState::Closed);
}

#[test]
fn parse_theme_colors() {
    let toml = r##"
[theme]
open = "#3fb950"
closed = "#fff"
accent = "6"
"##;
    let config: AppConfig = toml::from_str(toml).unwrap();
    assert_eq!(
        config.theme.open,
        Some(Color::Hex {
            r: 0x3f,
            g: 0xb9,
            b: 0x50
        })
    );
    assert_eq!(
        config.theme.closed,
        Some(Color::Hex {
            r: 0xff,
            g: 0xff,
            b: 0xff
        })
    );
    assert_eq!(config.theme.accent, Some(Color::Ansi256(6)));
}

#[test]
fn invalid_color_is_an_error() {
    let toml = r#"
[theme]
open = "green-ish"
"#;
    assert!(toml::from_str::<AppConfig>(toml).is_err());
}

#[test]
fn load_config_from_explicit_path() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[defaults]
labels = ["needs-triage"]

[source]
host = "github.example.com"
"#
    )
    .unwrap();

    let config = load_config(Some(file.path())).unwrap();
    assert_eq!(config.defaults.labels, vec!["needs-triage".to_owned()]);
    assert_eq!(config.source.host, "github.example.com");
    assert_eq!(config.source.cache_ttl_minutes, 5);
}

#[test]
fn load_config_missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_config(Some(&dir.path().join("absent.toml"))).unwrap_err();
    assert!(format!("{err:#}").contains("absent.toml"));
}

#[test]
fn load_config_malformed_toml_is_an_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[defaults\nlabels = ").unwrap();
    assert!(load_config(Some(file.path())).is_err());
}
