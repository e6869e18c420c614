//! Flat key/value settings store.
//!
//! Settings live in a JSON object file colocated with the running process.
//! Values may be strings, booleans, or numbers; lists are comma-separated
//! strings. A missing or malformed *file* is fatal, a missing or malformed
//! *key* never is — it reads as false / empty.

use crate::error::{MirrorError, MirrorResult};
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Configuration keys read by the mirror.
pub mod keys {
    /// Repositories whose publishing is mirrored.
    pub const SOURCE_PUBLICATIONS: &str = "SourcePublications";
    /// Repositories publishing is mirrored to.
    pub const TARGET_PUBLICATIONS: &str = "TargetPublications";
    /// Verbose diagnostic logging of each stage.
    pub const PUBLISH_LOGGING_ENABLED: &str = "PublishLoggingEnabled";
    /// Force child-repository propagation on the mirrored instruction.
    pub const FORCE_PUBLISH_TO_CHILD_PUBLICATIONS: &str = "ForcePublishToChildPublications";
    /// Force workflow-version inclusion on a mirrored publish.
    pub const FORCE_PUBLISH_WORKFLOW_VERSION: &str = "ForcePublishWorkflowVersion";
    /// Force dynamic/minor-version inclusion on a mirrored publish.
    pub const FORCE_PUBLISH_MINOR_VERSION: &str = "ForcePublishMinorVersion";
    /// Abort mirroring unless the derived instruction propagates to children.
    pub const ONLY_MIRROR_IF_PUBLISH_TO_CHILDREN_SELECTED: &str =
        "OnlyMirrorIfPublishToChildrenSelected";
}

/// A flat key/value settings store.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    values: HashMap<String, Value>,
}

impl Settings {
    /// Loads settings from a JSON object file.
    ///
    /// A file that cannot be read or parsed is a fatal configuration error.
    pub fn load(path: impl AsRef<Path>) -> MirrorResult<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| {
            MirrorError::Config(format!("cannot read settings file {}: {e}", path.display()))
        })?;
        let values: HashMap<String, Value> = serde_json::from_str(&raw).map_err(|e| {
            MirrorError::Config(format!("cannot parse settings file {}: {e}", path.display()))
        })?;
        Ok(Self { values })
    }

    /// Builds a settings store from already-materialized values.
    #[must_use]
    pub fn from_values(values: HashMap<String, Value>) -> Self {
        Self { values }
    }

    /// Returns the raw value for a key as a string, if present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        match self.values.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Returns a boolean value. Missing or malformed keys read as false.
    #[must_use]
    pub fn get_bool(&self, key: &str) -> bool {
        match self.values.get(key) {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => s.trim().eq_ignore_ascii_case("true"),
            _ => false,
        }
    }

    /// Returns a comma-separated list value. Missing keys read as empty;
    /// entries are trimmed and empty entries dropped.
    #[must_use]
    pub fn get_list(&self, key: &str) -> Vec<String> {
        let Some(raw) = self.get(key) else {
            return Vec::new();
        };
        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}
