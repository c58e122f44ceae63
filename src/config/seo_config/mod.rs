//! Audit configuration support
//!
//! Loads configuration from `seo.toml` or `.seorc.json` in the working
//! directory, or from an explicit path.
//!
//! # Configuration Format
//!
//! ```toml
//! # seo.toml
//!
//! checks = ["*"]
//! exclude_checks = ["performance-ttfb"]
//! urls = ["https://example.com/", "https://example.com/blog"]
//!
//! [http]
//! timeout_secs = 30
//! follow_redirects = true
//! headers = { "Accept-Language" = "en" }
//!
//! [resolve]
//! "example.com" = "10.0.0.5"
//!
//! [scan]
//! workers = 8
//!
//! [thresholds.content-length]
//! min_length = 1500
//! ```

use crate::checks::CheckConfig;
use crate::http::FetchOptions;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Preferred config file name
pub const CONFIG_FILE: &str = "seo.toml";

/// JSON config file, used when no TOML config exists
pub const JSON_CONFIG_FILE: &str = ".seorc.json";

/// Wildcard entry of the `checks` allow-list
pub const ALL_CHECKS: &str = "*";

/// Written by `seo init`
pub const EXAMPLE_CONFIG: &str = r#"# seo-audit configuration

# Checks to run; "*" runs every built-in check
checks = ["*"]

# Checks to skip, applied after `checks`
exclude_checks = []

# Pages audited by `seo scan`
urls = [
    # "https://example.com/",
]

[http]
timeout_secs = 30
follow_redirects = true
max_redirects = 10
# user_agent = "seo-audit"
# headers = { "Accept-Language" = "en" }

# Send requests for a host to a fixed IP, e.g. a staging server
[resolve]
# "example.com" = "127.0.0.1"

[scan]
workers = 4

[thresholds.content-length]
min_length = 2100
"#;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("Invalid IP address '{value}' for host '{host}' in [resolve]")]
    InvalidResolve { host: String, value: String },
}

/// Audit configuration loaded from seo.toml or .seorc.json
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeoConfig {
    /// Allow-list of check ids; `"*"` enables every check
    #[serde(default = "default_checks")]
    pub checks: Vec<String>,

    /// Deny-list of check ids, applied after the allow-list
    #[serde(default)]
    pub exclude_checks: Vec<String>,

    /// Targets of a full scan
    #[serde(default)]
    pub urls: Vec<String>,

    #[serde(default)]
    pub http: HttpConfig,

    /// Host name -> IP address DNS overrides
    #[serde(default)]
    pub resolve: BTreeMap<String, String>,

    #[serde(default)]
    pub scan: ScanConfig,

    /// Per-check threshold overrides, keyed by check id
    #[serde(default)]
    pub thresholds: HashMap<String, HashMap<String, Value>>,
}

/// HTTP client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_true")]
    pub follow_redirects: bool,

    #[serde(default = "default_max_redirects")]
    pub max_redirects: u32,

    #[serde(default)]
    pub user_agent: Option<String>,

    /// Extra headers sent with every request
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

/// Full scan settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Pages audited in parallel
    #[serde(default = "default_workers")]
    pub workers: usize,
}

fn default_checks() -> Vec<String> {
    vec![ALL_CHECKS.to_string()]
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

fn default_max_redirects() -> u32 {
    10
}

fn default_workers() -> usize {
    4
}

impl Default for SeoConfig {
    fn default() -> Self {
        Self {
            checks: default_checks(),
            exclude_checks: Vec::new(),
            urls: Vec::new(),
            http: HttpConfig::default(),
            resolve: BTreeMap::new(),
            scan: ScanConfig::default(),
            thresholds: HashMap::new(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            follow_redirects: true,
            max_redirects: default_max_redirects(),
            user_agent: None,
            headers: BTreeMap::new(),
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
        }
    }
}

impl SeoConfig {
    /// Build fetcher options from the `[http]` and `[resolve]` sections
    pub fn fetch_options(&self) -> Result<FetchOptions, ConfigError> {
        let mut dns_overrides = HashMap::new();
        for (host, value) in &self.resolve {
            let ip: IpAddr = value.trim().parse().map_err(|_| ConfigError::InvalidResolve {
                host: host.clone(),
                value: value.clone(),
            })?;
            dns_overrides.insert(host.clone(), ip);
        }

        let mut options = FetchOptions {
            timeout: Duration::from_secs(self.http.timeout_secs),
            follow_redirects: self.http.follow_redirects,
            max_redirects: self.http.max_redirects,
            headers: self.http.headers.clone(),
            dns_overrides,
            ..Default::default()
        };
        if let Some(agent) = &self.http.user_agent {
            options.user_agent = agent.clone();
        }
        Ok(options)
    }

    /// Options for one check from its `[thresholds.<id>]` table
    pub fn check_config(&self, id: &str) -> CheckConfig {
        let mut config = CheckConfig::new();
        if let Some(thresholds) = self.thresholds.get(id) {
            for (key, value) in thresholds {
                config = config.with_option(key.clone(), value.clone());
            }
        }
        config
    }

    /// Whether the allow-list enables every check
    pub fn allows_all(&self) -> bool {
        self.checks.iter().any(|c| c == ALL_CHECKS)
    }
}

/// Load configuration from `dir`.
///
/// Tries `seo.toml`, then `.seorc.json`. A file that fails to parse is
/// skipped with a warning; with no usable file the defaults apply.
pub fn load_config(dir: &Path) -> SeoConfig {
    for name in [CONFIG_FILE, JSON_CONFIG_FILE] {
        let path = dir.join(name);
        if !path.exists() {
            continue;
        }
        match load_config_file(&path) {
            Ok(config) => {
                debug!("Loaded config from {}", path.display());
                return config;
            }
            Err(e) => {
                warn!("{}", e);
            }
        }
    }

    debug!("No config found, using defaults");
    SeoConfig::default()
}

/// Load configuration from an explicit file. JSON is used for `.json`
/// files, TOML for everything else.
pub fn load_config_file(path: &Path) -> Result<SeoConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let parsed: Result<SeoConfig, String> = if is_json {
        serde_json::from_str(&content).map_err(|e| e.to_string())
    } else {
        toml::from_str(&content).map_err(|e| e.to_string())
    };

    parsed.map_err(|message| ConfigError::Parse {
        path: path.to_path_buf(),
        message,
    })
}
