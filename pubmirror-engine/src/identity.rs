//! Cross-repository item identity resolution.
//!
//! An item published in one repository is addressed in a sibling
//! repository by keeping its item ID and kind and substituting the
//! repository component. Whether the counterpart actually exists is only
//! answerable by the host; a lookup failure against one repository must
//! never abort resolution for the remaining ones.

use crate::host::ItemDirectory;
use pubmirror_types::{Item, ItemUri, RepositoryId};
use std::sync::Arc;
use tracing::error;

/// Resolves "the same item" in other repositories.
pub struct IdentityMapper {
    items: Arc<dyn ItemDirectory>,
}

impl IdentityMapper {
    /// Creates an identity mapper over the host's item directory.
    pub fn new(items: Arc<dyn ItemDirectory>) -> Self {
        Self { items }
    }

    /// The candidate address of `item` in `repository`. Deterministic and
    /// purely syntactic; existence is not checked.
    #[must_use]
    pub fn candidate_uri(item: &Item, repository: RepositoryId) -> ItemUri {
        item.uri.in_repository(repository)
    }

    /// Resolves the counterpart of `item` in `repository`, if one exists.
    /// Lookup failures are logged and read as absent.
    pub async fn resolve(&self, item: &Item, repository: RepositoryId) -> Option<Item> {
        let candidate = Self::candidate_uri(item, repository);

        match self.items.exists(&candidate).await {
            Ok(true) => match self.items.get(&candidate).await {
                Ok(found) => Some(found),
                Err(e) => {
                    error!("failed to fetch {candidate}: {e}");
                    None
                }
            },
            Ok(false) => None,
            Err(e) => {
                error!("existence check failed for {candidate}: {e}");
                None
            }
        }
    }

    /// Resolves the counterpart of `item` in each repository, preserving
    /// repository order and omitting absent entries. The result may be
    /// shorter than the input.
    pub async fn resolve_all(&self, item: &Item, repositories: &[RepositoryId]) -> Vec<Item> {
        let mut resolved = Vec::with_capacity(repositories.len());
        for repository in repositories {
            if let Some(found) = self.resolve(item, *repository).await {
                resolved.push(found);
            }
        }
        resolved
    }
}
