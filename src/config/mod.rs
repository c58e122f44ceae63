//! Configuration module for seo-audit
//!
//! This module handles:
//! - Audit configuration (seo.toml / .seorc.json)
//! - Check allow/deny lists and threshold overrides
//! - HTTP client and DNS override settings

mod seo_config;

pub use seo_config::{
    load_config, load_config_file, ConfigError, HttpConfig, ScanConfig, SeoConfig, ALL_CHECKS,
    CONFIG_FILE, EXAMPLE_CONFIG, JSON_CONFIG_FILE,
};
