//! Configuration management for usta.
//!
//! Configuration is read from `~/.config/usta/config.toml` (or the path given
//! with `--config`). If the default file doesn't exist, a default configuration
//! with comments is created. Command-line flags override file values.

pub mod crawl;
pub mod site;

pub use crawl::{CrawlConfig, OutputConfig, RetryConfig};
pub use site::SiteConfig;

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Main configuration struct.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub site: SiteConfig,
    pub crawl: CrawlConfig,
    pub retry: RetryConfig,
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, the default path is used and
    /// a commented default file is created there if it is missing.
    /// Missing fields in the config file will use default values.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let config_path = Self::default_config_path()?;
                if !config_path.exists() {
                    Self::write_default(&config_path)?;
                    Self::default()
                } else {
                    Self::from_file(&config_path)?
                }
            }
        };

        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the default config file path: `~/.config/usta/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("usta").join("config.toml"))
    }

    /// Check values that serde cannot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.site.listing_url.contains(site::PAGE_PLACEHOLDER) {
            return Err(ConfigError::Invalid(format!(
                "site.listing_url must contain {}",
                site::PAGE_PLACEHOLDER
            )));
        }
        if !self.site.contact_url.contains(site::ID_PLACEHOLDER) {
            return Err(ConfigError::Invalid(format!(
                "site.contact_url must contain {}",
                site::ID_PLACEHOLDER
            )));
        }
        if self.retry.max_attempts == 0 {
            return Err(ConfigError::Invalid(
                "retry.max_attempts must be at least 1".into(),
            ));
        }
        if self.crawl.empty_page_limit == 0 {
            return Err(ConfigError::Invalid(
                "crawl.empty_page_limit must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Write a default config file with comments.
    pub fn write_default(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(())
    }

    /// Generate the default config file content with comments.
    fn default_config_content() -> String {
        r##"# usta configuration
#
# Every value below is the built-in default; delete what you don't change.

[site]
base_url = "https://avtotemir.az"

# {page} is replaced with the listing page number
listing_url = "https://avtotemir.az/all?page={page}"

# {id} is replaced with the master id
contact_url = "https://avtotemir.az/contact-phone/{id}/master"

user_agent = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/142.0.0.0 Safari/537.36"
accept_language = "en-GB,en-US;q=0.9,en;q=0.8,ru;q=0.7,az;q=0.6"

# Request timeouts in seconds
timeout_secs = 30
contact_timeout_secs = 15

# Extra headers sent with every request
[site.headers]
DNT = "1"

[crawl]
start_page = 1
# end_page = 50
# Without end_page the crawl stops after 100 pages unless max_pages says otherwise
# max_pages = 100

# Stop after this many listing pages in a row come back empty
empty_page_limit = 3

# Politeness delays in milliseconds
listing_delay_ms = 1000
page_delay_ms = 2000
contact_delay_ms = 500

[retry]
# Attempts per request, including the first one
max_attempts = 3
# Waits between attempts: base, base * multiplier, ... capped at max
base_delay_ms = 1000
multiplier = 2.0
max_delay_ms = 8000

[output]
json_path = "avtotemir_masters.json"
csv_path = "avtotemir_masters.csv"
"##
        .to_string()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
