//! Host runtime seams.
//!
//! The engine never talks to a concrete content-management runtime; it
//! consumes these narrow capability traits and lets the host binding
//! implement them. All calls are potentially blocking I/O and are awaited
//! inline within the per-notification handler.

use crate::error::MirrorResult;
use async_trait::async_trait;
use pubmirror_types::{
    Item, ItemUri, PublishInstruction, PublishPriority, Repository, TargetType, Transaction,
    UnpublishInstruction,
};

/// Item existence checks and fetches, keyed by full item address.
#[async_trait]
pub trait ItemDirectory: Send + Sync {
    /// Whether an object exists at the given address.
    async fn exists(&self, uri: &ItemUri) -> MirrorResult<bool>;

    /// Fetches the object at the given address.
    async fn get(&self, uri: &ItemUri) -> MirrorResult<Item>;
}

/// The host's repository listing service.
#[async_trait]
pub trait RepositoryDirectory: Send + Sync {
    /// Lists all repositories. Order is the host's directory order and is
    /// preserved by the resolver.
    async fn list(&self) -> MirrorResult<Vec<Repository>>;
}

/// The publish/unpublish execution service — the dispatch sink.
#[async_trait]
pub trait PublishService: Send + Sync {
    /// Publishes the given items to the given targets.
    async fn publish(
        &self,
        items: &[Item],
        instruction: &PublishInstruction,
        targets: &[TargetType],
        priority: PublishPriority,
    ) -> MirrorResult<()>;

    /// Unpublishes the given items from the given targets.
    async fn unpublish(
        &self,
        items: &[Item],
        instruction: &UnpublishInstruction,
        targets: &[TargetType],
        priority: PublishPriority,
    ) -> MirrorResult<()>;
}

/// The host's transaction-committed notification stream.
#[async_trait]
pub trait EventSubscription: Send + Sync {
    /// Receives the next committed transaction.
    /// Returns `None` if the host is shutting down.
    async fn recv_committed(&self) -> Option<Transaction>;
}

/// Mock host implementations for testing.
pub mod mock {
    use super::*;
    use pubmirror_types::{MirrorInstruction, TransactionKind};
    use std::collections::{HashMap, HashSet, VecDeque};
    use std::sync::Mutex;

    /// In-memory item and repository directory.
    #[derive(Default)]
    pub struct MockHost {
        repositories: Mutex<Vec<Repository>>,
        items: Mutex<HashMap<ItemUri, Item>>,
        failing_uris: Mutex<HashSet<ItemUri>>,
        fail_listing: Mutex<bool>,
    }

    impl MockHost {
        /// Creates an empty mock host.
        pub fn new() -> Self {
            Self::default()
        }

        /// Registers a repository in directory order.
        pub fn add_repository(&self, repository: Repository) {
            self.repositories.lock().unwrap().push(repository);
        }

        /// Registers an item at its address.
        pub fn add_item(&self, item: Item) {
            self.items.lock().unwrap().insert(item.uri, item);
        }

        /// Makes lookups against the given address fail.
        pub fn fail_lookup(&self, uri: ItemUri) {
            self.failing_uris.lock().unwrap().insert(uri);
        }

        /// Makes the repository listing fail.
        pub fn fail_listing(&self) {
            *self.fail_listing.lock().unwrap() = true;
        }
    }

    #[async_trait]
    impl ItemDirectory for MockHost {
        async fn exists(&self, uri: &ItemUri) -> MirrorResult<bool> {
            if self.failing_uris.lock().unwrap().contains(uri) {
                return Err(crate::error::MirrorError::Lookup(format!(
                    "lookup refused for {uri}"
                )));
            }
            Ok(self.items.lock().unwrap().contains_key(uri))
        }

        async fn get(&self, uri: &ItemUri) -> MirrorResult<Item> {
            if self.failing_uris.lock().unwrap().contains(uri) {
                return Err(crate::error::MirrorError::Lookup(format!(
                    "lookup refused for {uri}"
                )));
            }
            self.items
                .lock()
                .unwrap()
                .get(uri)
                .cloned()
                .ok_or_else(|| crate::error::MirrorError::Lookup(format!("no object at {uri}")))
        }
    }

    #[async_trait]
    impl RepositoryDirectory for MockHost {
        async fn list(&self) -> MirrorResult<Vec<Repository>> {
            if *self.fail_listing.lock().unwrap() {
                return Err(crate::error::MirrorError::Lookup(
                    "repository listing unavailable".to_string(),
                ));
            }
            Ok(self.repositories.lock().unwrap().clone())
        }
    }

    /// One recorded dispatch.
    #[derive(Debug, Clone)]
    pub struct DispatchRecord {
        /// Publish or unpublish.
        pub kind: TransactionKind,
        /// The items dispatched.
        pub items: Vec<Item>,
        /// The derived instruction used.
        pub instruction: MirrorInstruction,
        /// The coerced targets.
        pub targets: Vec<TargetType>,
        /// The dispatch priority.
        pub priority: PublishPriority,
    }

    /// Publish service that records every dispatch.
    #[derive(Default)]
    pub struct MockPublishService {
        records: Mutex<Vec<DispatchRecord>>,
        fail: Mutex<bool>,
    }

    impl MockPublishService {
        /// Creates a recording publish service.
        pub fn new() -> Self {
            Self::default()
        }

        /// Makes subsequent dispatches fail.
        pub fn fail_dispatches(&self) {
            *self.fail.lock().unwrap() = true;
        }

        /// Returns all recorded dispatches.
        pub fn records(&self) -> Vec<DispatchRecord> {
            self.records.lock().unwrap().clone()
        }

        /// Number of dispatches recorded.
        pub fn dispatch_count(&self) -> usize {
            self.records.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl PublishService for MockPublishService {
        async fn publish(
            &self,
            items: &[Item],
            instruction: &PublishInstruction,
            targets: &[TargetType],
            priority: PublishPriority,
        ) -> MirrorResult<()> {
            if *self.fail.lock().unwrap() {
                return Err(crate::error::MirrorError::Dispatch(
                    "publish rejected".to_string(),
                ));
            }
            self.records.lock().unwrap().push(DispatchRecord {
                kind: TransactionKind::Publish,
                items: items.to_vec(),
                instruction: MirrorInstruction::Publish(*instruction),
                targets: targets.to_vec(),
                priority,
            });
            Ok(())
        }

        async fn unpublish(
            &self,
            items: &[Item],
            instruction: &UnpublishInstruction,
            targets: &[TargetType],
            priority: PublishPriority,
        ) -> MirrorResult<()> {
            if *self.fail.lock().unwrap() {
                return Err(crate::error::MirrorError::Dispatch(
                    "unpublish rejected".to_string(),
                ));
            }
            self.records.lock().unwrap().push(DispatchRecord {
                kind: TransactionKind::Unpublish,
                items: items.to_vec(),
                instruction: MirrorInstruction::Unpublish(*instruction),
                targets: targets.to_vec(),
                priority,
            });
            Ok(())
        }
    }

    /// Subscription backed by a queue of transactions. `recv_committed`
    /// drains the queue and then reports shutdown.
    #[derive(Default)]
    pub struct MockSubscription {
        queue: tokio::sync::Mutex<VecDeque<Transaction>>,
    }

    impl MockSubscription {
        /// Creates a subscription pre-loaded with the given transactions.
        pub fn with_transactions(transactions: Vec<Transaction>) -> Self {
            Self {
                queue: tokio::sync::Mutex::new(transactions.into()),
            }
        }
    }

    #[async_trait]
    impl EventSubscription for MockSubscription {
        async fn recv_committed(&self) -> Option<Transaction> {
            self.queue.lock().await.pop_front()
        }
    }
}
