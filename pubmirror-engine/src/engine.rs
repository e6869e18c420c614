//! The mirroring decision engine.
//!
//! One invocation per transaction-committed notification. Each invocation
//! walks Received → Filtered → Resolved → Guarded → Dispatched, exiting
//! early with a skip at any stage. At most one dispatch is issued per
//! notification, and a dispatch failure is contained: the original
//! transaction that triggered mirroring must never be affected by it.
//!
//! The engine holds no mutable state. Per-transaction data lives in locals
//! of `handle`; concurrency across notifications is the host's concern.

use crate::config::MirrorConfig;
use crate::fmt::comma_list;
use crate::host::{EventSubscription, ItemDirectory, PublishService, RepositoryDirectory};
use crate::identity::IdentityMapper;
use crate::instruction;
use crate::resolver::RepositoryResolver;
use pubmirror_types::{
    Item, MirrorInstruction, PublishPriority, RepositoryId, TargetType, Transaction,
};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, info, trace};

/// Why a transaction was not mirrored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The owning repository is not a configured source.
    NotSourceRepository,
    /// The original transaction had no delivery targets.
    NoTransactionTargets,
    /// No configured target repository resolved.
    NoMirrorRepositories,
    /// The item has no counterpart in any resolved repository.
    NoMirrorItems,
    /// The child-propagation guard tripped on the derived instruction.
    ChildPropagationNotSelected,
    /// No delivery target coerced to a usable target type.
    NoUsableTargets,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            SkipReason::NotSourceRepository => "repository is not a mirror source",
            SkipReason::NoTransactionTargets => "transaction has no delivery targets",
            SkipReason::NoMirrorRepositories => "no mirror repositories resolved",
            SkipReason::NoMirrorItems => "no mirror items resolved",
            SkipReason::ChildPropagationNotSelected => "child propagation not selected",
            SkipReason::NoUsableTargets => "no usable target types",
        };
        write!(f, "{reason}")
    }
}

/// Outcome of handling one notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MirrorOutcome {
    /// One mirrored dispatch was issued.
    Dispatched {
        /// Number of mirror items dispatched.
        items: usize,
        /// Number of coerced targets dispatched to.
        targets: usize,
    },
    /// The transaction was not mirrored.
    Skipped(SkipReason),
    /// The dispatch was attempted and failed; logged and contained.
    Failed,
}

/// The mirroring decision engine.
pub struct MirrorEngine {
    config: Arc<MirrorConfig>,
    identity: IdentityMapper,
    repositories: RepositoryResolver,
    publisher: Arc<dyn PublishService>,
}

impl MirrorEngine {
    /// Creates an engine over the host seams.
    pub fn new(
        config: Arc<MirrorConfig>,
        items: Arc<dyn ItemDirectory>,
        directory: Arc<dyn RepositoryDirectory>,
        publisher: Arc<dyn PublishService>,
    ) -> Self {
        Self {
            config,
            identity: IdentityMapper::new(items),
            repositories: RepositoryResolver::new(directory),
            publisher,
        }
    }

    /// The engine's configuration.
    #[must_use]
    pub fn config(&self) -> &MirrorConfig {
        &self.config
    }

    /// Drains committed transactions from the subscription until the host
    /// shuts down. The binding loop only; all decisions live in `handle`.
    pub async fn run(&self, subscription: Arc<dyn EventSubscription>) {
        while let Some(transaction) = subscription.recv_committed().await {
            self.handle(&transaction).await;
        }
    }

    /// Handles one committed transaction. Never propagates an error to the
    /// caller; every failure mode is logged and contained.
    pub async fn handle(&self, txn: &Transaction) -> MirrorOutcome {
        // Filtered
        if !self.config.is_source_repository(&txn.source_repository) {
            trace!(
                "skipping {}: {} is not a mirror source",
                txn.triggering_item.uri,
                txn.source_repository
            );
            return MirrorOutcome::Skipped(SkipReason::NotSourceRepository);
        }

        if self.config.logging_enabled {
            debug!("repository {} is in the mirror source set", txn.source_repository);
            info!(
                "{} event [initiated by]: {} -- [delivery targets]: {} -- \
                 [original item]: {} -- [all items in transaction]: {}",
                txn.kind(),
                txn.initiator,
                comma_list(txn.targets.iter().map(|t| format!("{} ({})", t.title(), t.id()))),
                txn.triggering_item,
                comma_list(&txn.affected_items),
            );
        }

        // Resolved
        let mirror_repositories = self
            .repositories
            .resolve(&self.config.target_publications)
            .await;
        if self.config.logging_enabled {
            debug!(
                "resolved {} mirror repositories: {}",
                mirror_repositories.len(),
                comma_list(&mirror_repositories)
            );
        }

        let repository_ids: Vec<RepositoryId> =
            mirror_repositories.iter().map(|r| r.id).collect();
        let mirror_items = self
            .identity
            .resolve_all(&txn.triggering_item, &repository_ids)
            .await;
        if self.config.logging_enabled {
            debug!(
                "resolved {} mirror items: {}",
                mirror_items.len(),
                comma_list(mirror_items.iter().map(|i| i.uri))
            );
        }

        if txn.targets.is_empty() {
            return self.skip(SkipReason::NoTransactionTargets);
        }
        if mirror_repositories.is_empty() {
            return self.skip(SkipReason::NoMirrorRepositories);
        }
        if mirror_items.is_empty() {
            return self.skip(SkipReason::NoMirrorItems);
        }

        // Guarded
        let derived = instruction::derive(&txn.instruction, &self.config);
        if instruction::propagation_guard_trips(&derived, &self.config) {
            return self.skip(SkipReason::ChildPropagationNotSelected);
        }

        // Dispatched
        let targets: Vec<TargetType> = txn
            .targets
            .iter()
            .filter_map(|t| t.as_target_type().cloned())
            .collect();
        if targets.is_empty() {
            return self.skip(SkipReason::NoUsableTargets);
        }

        self.dispatch(txn, &derived, &mirror_items, &targets).await
    }

    fn skip(&self, reason: SkipReason) -> MirrorOutcome {
        if self.config.logging_enabled {
            debug!("not mirroring: {reason}");
        }
        MirrorOutcome::Skipped(reason)
    }

    async fn dispatch(
        &self,
        txn: &Transaction,
        derived: &MirrorInstruction,
        items: &[Item],
        targets: &[TargetType],
    ) -> MirrorOutcome {
        if self.config.logging_enabled {
            info!(
                "mirroring {} of items {} -- to targets {}",
                txn.kind(),
                comma_list(items.iter().map(|i| i.uri)),
                comma_list(targets.iter()),
            );
        }

        let result = match derived {
            MirrorInstruction::Publish(publish) => {
                self.publisher
                    .publish(items, publish, targets, PublishPriority::Low)
                    .await
            }
            MirrorInstruction::Unpublish(unpublish) => {
                self.publisher
                    .unpublish(items, unpublish, targets, PublishPriority::Low)
                    .await
            }
        };

        match result {
            Ok(()) => MirrorOutcome::Dispatched {
                items: items.len(),
                targets: targets.len(),
            },
            Err(e) => {
                error!(
                    "mirror {} dispatch failed: {e} -- items: {} -- targets: {}",
                    txn.kind(),
                    comma_list(items.iter().map(|i| i.uri)),
                    comma_list(targets.iter().map(|t| t.id)),
                );
                MirrorOutcome::Failed
            }
        }
    }
}
