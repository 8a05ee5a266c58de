//! Run configuration
//!
//! Values are layered: `storyscaffold.toml` (or `--config`), then the
//! `STORYBOOK_*_TAGS` environment variables, then command-line flags.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use scaffold_transform::{parse_tag_list, TagPolicy};
use serde::{Deserialize, Serialize};

/// Config file picked up from the working directory
pub const DEFAULT_CONFIG_FILE: &str = "storyscaffold.toml";

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config '{path}': {source}")]
    Read {
        /// Config path
        path: PathBuf,
        /// I/O failure
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for [`ScaffoldConfig`]
    #[error("invalid config '{path}': {source}")]
    Parse {
        /// Config path
        path: PathBuf,
        /// Deserialization failure
        #[source]
        source: toml::de::Error,
    },

    /// Unknown body strategy name
    #[error("unknown strategy '{0}', expected 'playwright' or 'smoke'")]
    UnknownStrategy(String),
}

/// Which body strategy generates the test cases
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    /// Visit each story in a Playwright page
    #[default]
    Playwright,
    /// Call `__test(id)` only
    Smoke,
}

impl FromStr for StrategyKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "playwright" => Ok(Self::Playwright),
            "smoke" => Ok(Self::Smoke),
            other => Err(ConfigError::UnknownStrategy(other.to_string())),
        }
    }
}

/// Settings for one `storyscaffold` run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScaffoldConfig {
    /// Prepended to every resolved title
    pub title_prefix: Option<String>,
    /// Root that auto titles are computed relative to
    pub stories_dir: Option<PathBuf>,
    /// Stories need one of these tags (if any are given)
    pub include_tags: Vec<String>,
    /// Stories with any of these tags get no test
    pub exclude_tags: Vec<String>,
    /// Stories with any of these tags get a skipped test
    pub skip_tags: Vec<String>,
    /// Emit only the generated tests
    pub clear_body: bool,
    /// Emit a skipped placeholder when nothing qualifies
    pub insert_test_if_empty: bool,
    /// Body strategy
    pub strategy: StrategyKind,
    /// Reset the page before each test
    pub page_setup: bool,
}

/// Values supplied on the command line (or through their env fallbacks)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    /// Comma-separated include tags
    pub include_tags: Option<String>,
    /// Comma-separated exclude tags
    pub exclude_tags: Option<String>,
    /// Comma-separated skip tags
    pub skip_tags: Option<String>,
    /// Title prefix
    pub title_prefix: Option<String>,
    /// Stories root
    pub stories_dir: Option<PathBuf>,
    /// Strategy
    pub strategy: Option<StrategyKind>,
    /// Set when the flag was given
    pub clear_body: bool,
    /// Set when the flag was given
    pub insert_test_if_empty: bool,
    /// Set when the flag was given
    pub page_setup: bool,
}

impl ScaffoldConfig {
    /// Parse config from TOML text
    ///
    /// # Errors
    /// Returns the TOML error for malformed input or unknown keys
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Load config from a file
    ///
    /// # Errors
    /// [`ConfigError::Read`] or [`ConfigError::Parse`]
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load the explicit config, else `storyscaffold.toml` in `dir` if present,
    /// else defaults
    ///
    /// # Errors
    /// Fails if the chosen file cannot be read or parsed
    pub fn discover(explicit: Option<&Path>, dir: &Path) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let candidate = dir.join(DEFAULT_CONFIG_FILE);
        if candidate.is_file() {
            tracing::debug!(path = %candidate.display(), "using config file");
            return Self::load(&candidate);
        }
        Ok(Self::default())
    }

    /// Apply command-line overrides
    #[must_use]
    pub fn with_overrides(mut self, overrides: &Overrides) -> Self {
        if let Some(raw) = &overrides.include_tags {
            self.include_tags = parse_tag_list(raw);
        }
        if let Some(raw) = &overrides.exclude_tags {
            self.exclude_tags = parse_tag_list(raw);
        }
        if let Some(raw) = &overrides.skip_tags {
            self.skip_tags = parse_tag_list(raw);
        }
        if let Some(prefix) = &overrides.title_prefix {
            self.title_prefix = Some(prefix.clone());
        }
        if let Some(dir) = &overrides.stories_dir {
            self.stories_dir = Some(dir.clone());
        }
        if let Some(strategy) = overrides.strategy {
            self.strategy = strategy;
        }
        self.clear_body |= overrides.clear_body;
        self.insert_test_if_empty |= overrides.insert_test_if_empty;
        self.page_setup |= overrides.page_setup;
        self
    }

    /// Tag policy for this run
    #[must_use]
    pub fn tag_policy(&self) -> TagPolicy {
        TagPolicy::new()
            .with_include(self.include_tags.iter().cloned())
            .with_exclude(self.exclude_tags.iter().cloned())
            .with_skip(self.skip_tags.iter().cloned())
    }
}
