//! Check registry
//!
//! Resolves the allow-list and deny-list against the registration table
//! and hands out fresh check instances in a fixed order: by category,
//! then by id.

use crate::checks::base::{Category, CheckConfig, CheckId, CheckUnit};
use crate::config::{SeoConfig, ALL_CHECKS};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::warn;

/// Constructor for one check, fed its threshold overrides
pub type CheckConstructor = fn(&CheckConfig) -> Arc<dyn CheckUnit>;

/// One row of the registration table
#[derive(Clone, Copy)]
pub struct CheckRegistration {
    pub id: CheckId,
    pub category: Category,
    pub build: CheckConstructor,
}

impl CheckRegistration {
    pub fn new(id: CheckId, category: Category, build: CheckConstructor) -> Self {
        Self {
            id,
            category,
            build,
        }
    }
}

pub struct CheckRegistry {
    registrations: Vec<CheckRegistration>,
    include: Vec<String>,
    exclude: HashSet<String>,
    configs: HashMap<String, CheckConfig>,
}

impl CheckRegistry {
    /// Registry over `registrations` with every check enabled
    pub fn new(registrations: Vec<CheckRegistration>) -> Self {
        let mut registry = Self {
            registrations: Vec::new(),
            include: vec![ALL_CHECKS.to_string()],
            exclude: HashSet::new(),
            configs: HashMap::new(),
        };
        for registration in registrations {
            registry.register(registration);
        }
        registry
    }

    /// Registry over the built-in checks with every check enabled
    pub fn builtin() -> Self {
        Self::new(super::builtin_checks())
    }

    /// Built-in checks filtered and configured by `config`
    pub fn from_config(config: &SeoConfig) -> Self {
        let mut registry = Self::builtin()
            .with_include(config.checks.iter().cloned())
            .with_exclude(config.exclude_checks.iter().cloned());

        for id in config.thresholds.keys() {
            if !registry.is_registered(id) {
                warn!("Ignoring thresholds for unknown check '{}'", id);
            }
        }
        let ids: Vec<CheckId> = registry.registrations.iter().map(|r| r.id).collect();
        for id in ids {
            registry.configs.insert(id.to_string(), config.check_config(id));
        }
        registry
    }

    /// Add a check; a duplicate id keeps the first registration
    pub fn register(&mut self, registration: CheckRegistration) {
        if self.is_registered(registration.id) {
            warn!("Check '{}' is already registered", registration.id);
            return;
        }
        self.registrations.push(registration);
        self.registrations.sort_by_key(|r| (r.category, r.id));
    }

    /// Replace the allow-list. `"*"` enables every registered check.
    pub fn with_include(mut self, ids: impl IntoIterator<Item = String>) -> Self {
        self.include = ids.into_iter().collect();
        self.warn_unknown(&self.include, "checks");
        self
    }

    /// Replace the deny-list, applied after the allow-list
    pub fn with_exclude(mut self, ids: impl IntoIterator<Item = String>) -> Self {
        let exclude: Vec<String> = ids.into_iter().collect();
        self.warn_unknown(&exclude, "exclude_checks");
        self.exclude = exclude.into_iter().collect();
        self
    }

    /// Set the options passed to one check's constructor
    pub fn with_check_config(mut self, id: &str, config: CheckConfig) -> Self {
        self.configs.insert(id.to_string(), config);
        self
    }

    pub fn is_registered(&self, id: &str) -> bool {
        self.registrations.iter().any(|r| r.id == id)
    }

    fn warn_unknown(&self, ids: &[String], list: &str) {
        for id in ids {
            if id != ALL_CHECKS && !self.is_registered(id) {
                warn!("Ignoring unknown check '{}' in {}", id, list);
            }
        }
    }

    /// Registrations that survive the allow-list and deny-list, in run order
    pub fn active_registrations(&self) -> Vec<&CheckRegistration> {
        let allow_all = self.include.iter().any(|id| id == ALL_CHECKS);
        self.registrations
            .iter()
            .filter(|r| allow_all || self.include.iter().any(|id| id == r.id))
            .filter(|r| !self.exclude.contains(r.id))
            .collect()
    }

    /// Ids of the active checks, in run order
    pub fn active_ids(&self) -> Vec<CheckId> {
        self.active_registrations().iter().map(|r| r.id).collect()
    }

    /// Fresh instances of the active checks, in run order
    pub fn list_active_checks(&self) -> Vec<Arc<dyn CheckUnit>> {
        let default_config = CheckConfig::default();
        self.active_registrations()
            .into_iter()
            .map(|r| {
                let config = self.configs.get(r.id).unwrap_or(&default_config);
                (r.build)(config)
            })
            .collect()
    }

    /// Number of checks a run executes at most
    pub fn count(&self) -> usize {
        self.active_registrations().len()
    }
}

impl Default for CheckRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
