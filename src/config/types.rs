use serde::Deserialize;

use crate::color::Color;
use crate::filter::{DEFAULT_LABEL, FilterSpec};
use crate::types::IssueState;

/// `[theme]` values are strings such as `"#3fb950"` or `"245"`.
pub(crate) mod color_de {
    use serde::{Deserialize, Deserializer, de::Error};

    use crate::color::Color;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Color>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(deserializer)?
            .map(|raw| raw.parse::<Color>())
            .transpose()
            .map_err(D::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub defaults: Defaults,
    pub source: SourceConfig,
    pub theme: ThemeConfig,
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Initial filter values and display preferences.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Defaults {
    pub labels: Vec<String>,
    pub state: IssueState,
    pub org: String,
    pub repo: String,
    /// `"relative"` or a strftime pattern.
    pub date_format: String,
    /// Background refetch interval; 0 disables it.
    pub refetch_interval_minutes: u32,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            labels: vec![DEFAULT_LABEL.to_owned()],
            state: IssueState::Open,
            org: String::new(),
            repo: String::new(),
            date_format: "relative".to_owned(),
            refetch_interval_minutes: 0,
        }
    }
}

impl Defaults {
    pub fn initial_filters(&self) -> FilterSpec {
        FilterSpec::new(self.labels.iter().cloned(), &self.org, &self.repo, self.state)
    }
}

// ---------------------------------------------------------------------------
// Source
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Base URL of a server exposing `/api/search` and `/api/issues`. When
    /// unset, issues are fetched from GitHub's GraphQL API directly.
    pub api_base: Option<String>,
    /// GitHub or GitHub Enterprise host for the GraphQL backend.
    pub host: String,
    /// Maximum number of issues per fetch.
    pub limit: u32,
    pub cache_ttl_minutes: u32,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            api_base: None,
            host: "github.com".to_owned(),
            limit: 100,
            cache_ttl_minutes: 5,
        }
    }
}

// ---------------------------------------------------------------------------
// Theme
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    #[serde(default, deserialize_with = "color_de::deserialize")]
    pub open: Option<Color>,
    #[serde(default, deserialize_with = "color_de::deserialize")]
    pub closed: Option<Color>,
    #[serde(default, deserialize_with = "color_de::deserialize")]
    pub accent: Option<Color>,
    #[serde(default, deserialize_with = "color_de::deserialize")]
    pub text: Option<Color>,
    #[serde(default, deserialize_with = "color_de::deserialize")]
    pub faint: Option<Color>,
    #[serde(default, deserialize_with = "color_de::deserialize")]
    pub error: Option<Color>,
    #[serde(default, deserialize_with = "color_de::deserialize")]
    pub selected_bg: Option<Color>,
}
