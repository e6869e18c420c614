//! Repository resolution.
//!
//! Configured repository identifiers (titles or id strings) are matched by
//! exact equality against the host's full directory listing. The result
//! follows the listing order, not the order of the identifiers.

use crate::host::RepositoryDirectory;
use pubmirror_types::Repository;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::error;

/// Resolves repository identifiers to concrete repository handles.
pub struct RepositoryResolver {
    directory: Arc<dyn RepositoryDirectory>,
}

impl RepositoryResolver {
    /// Creates a resolver over the host's repository directory.
    pub fn new(directory: Arc<dyn RepositoryDirectory>) -> Self {
        Self { directory }
    }

    /// Resolves the given identifiers against the full directory listing.
    ///
    /// A repository is included when any identifier equals its title or its
    /// id string; each repository appears at most once even if several
    /// identifiers match it. A listing failure is logged and yields an
    /// empty result.
    pub async fn resolve(&self, identifiers: &[String]) -> Vec<Repository> {
        if identifiers.is_empty() {
            return Vec::new();
        }

        let listing = match self.directory.list().await {
            Ok(listing) => listing,
            Err(e) => {
                error!("failed to list repositories: {e}");
                return Vec::new();
            }
        };

        let mut seen = HashSet::new();
        listing
            .into_iter()
            .filter(|repository| {
                identifiers
                    .iter()
                    .any(|identifier| repository.matches_identifier(identifier))
                    && seen.insert(repository.id)
            })
            .collect()
    }
}
