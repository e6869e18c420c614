//! Mirror configuration.
//!
//! Loaded once at process start and immutable thereafter. The engine reads
//! it on every notification but never writes it; the process-wide copy is
//! installed through a `OnceLock` so initialization is race-free even when
//! the host fires the first notifications concurrently.

use crate::error::MirrorResult;
use crate::settings::{keys, Settings};
use pubmirror_types::Repository;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, OnceLock};
use tracing::warn;

static INSTALLED: OnceLock<Arc<MirrorConfig>> = OnceLock::new();

/// Configuration of the mirroring engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MirrorConfig {
    /// Repositories (titles or id strings) whose publishing is mirrored.
    pub source_publications: Vec<String>,
    /// Repositories (titles or id strings) publishing is mirrored to.
    pub target_publications: Vec<String>,
    /// Verbose diagnostic logging of each stage.
    pub logging_enabled: bool,
    /// Force child-repository propagation on the mirrored instruction.
    pub force_include_children: bool,
    /// Force workflow-version inclusion on a mirrored publish.
    pub force_include_workflow_version: bool,
    /// Force dynamic/minor-version inclusion on a mirrored publish.
    pub force_include_minor_version: bool,
    /// Abort mirroring unless the derived instruction propagates to children.
    pub only_mirror_if_child_propagation: bool,
}

impl MirrorConfig {
    /// Builds the configuration from a flat settings store. Missing keys
    /// yield empty lists / false, never an error.
    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            source_publications: settings.get_list(keys::SOURCE_PUBLICATIONS),
            target_publications: settings.get_list(keys::TARGET_PUBLICATIONS),
            logging_enabled: settings.get_bool(keys::PUBLISH_LOGGING_ENABLED),
            force_include_children: settings.get_bool(keys::FORCE_PUBLISH_TO_CHILD_PUBLICATIONS),
            force_include_workflow_version: settings.get_bool(keys::FORCE_PUBLISH_WORKFLOW_VERSION),
            force_include_minor_version: settings.get_bool(keys::FORCE_PUBLISH_MINOR_VERSION),
            only_mirror_if_child_propagation: settings
                .get_bool(keys::ONLY_MIRROR_IF_PUBLISH_TO_CHILDREN_SELECTED),
        }
    }

    /// Loads the configuration from a settings file.
    pub fn load(path: impl AsRef<Path>) -> MirrorResult<Self> {
        Ok(Self::from_settings(&Settings::load(path)?))
    }

    /// Whether the given repository is one whose publishing is mirrored.
    #[must_use]
    pub fn is_source_repository(&self, repository: &Repository) -> bool {
        self.source_publications
            .iter()
            .any(|p| repository.matches_identifier(p))
    }

    /// Whether any identifier appears in both the source and target sets.
    /// Such an overlap lets a mirrored publish trigger further mirroring;
    /// nothing downstream suppresses the re-entry.
    #[must_use]
    pub fn has_mirror_overlap(&self) -> bool {
        self.source_publications
            .iter()
            .any(|s| self.target_publications.contains(s))
    }

    /// Installs this configuration as the process-wide copy, at most once.
    /// Later calls return the copy installed first.
    pub fn install(self) -> Arc<MirrorConfig> {
        let config = INSTALLED.get_or_init(|| {
            if self.has_mirror_overlap() {
                warn!(
                    "source and target publication sets overlap; a mirrored \
                     publish can re-trigger mirroring"
                );
            }
            Arc::new(self)
        });
        Arc::clone(config)
    }

    /// Returns the installed process-wide configuration, if any.
    #[must_use]
    pub fn installed() -> Option<Arc<MirrorConfig>> {
        INSTALLED.get().cloned()
    }
}
