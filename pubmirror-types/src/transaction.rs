//! Publish and unpublish transactions as observed at commit time.
//!
//! A transaction is the unit the mirror reacts to. It carries the
//! triggering item, the full dependency-expanded item set the host actually
//! published, the delivery targets, the initiating identity, and the
//! resolve instruction the user selected. Publish and unpublish are
//! distinguished by the instruction tag, not by downcasting: the version
//! inclusion flags exist on publish instructions only.

use crate::{Item, Repository, TargetId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a transaction publishes or unpublishes content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Publish,
    Unpublish,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionKind::Publish => write!(f, "publish"),
            TransactionKind::Unpublish => write!(f, "unpublish"),
        }
    }
}

/// Resolve configuration for a publish call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishInstruction {
    /// Propagate the publish into child repositories.
    pub include_child_repositories: bool,
    /// Publish the dynamic (minor) version instead of the last major one.
    pub include_dynamic_version: bool,
    /// Publish the workflow version of items currently in workflow.
    pub include_workflow_version: bool,
}

/// Resolve configuration for an unpublish call. Unpublish has no version
/// selection; only child propagation applies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnpublishInstruction {
    /// Propagate the unpublish into child repositories.
    pub include_child_repositories: bool,
}

/// The instruction of a publish or unpublish transaction, tagged by kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "resolve", rename_all = "lowercase")]
pub enum MirrorInstruction {
    Publish(PublishInstruction),
    Unpublish(UnpublishInstruction),
}

impl MirrorInstruction {
    /// The kind of transaction this instruction belongs to.
    #[must_use]
    pub fn kind(&self) -> TransactionKind {
        match self {
            MirrorInstruction::Publish(_) => TransactionKind::Publish,
            MirrorInstruction::Unpublish(_) => TransactionKind::Unpublish,
        }
    }

    /// Whether the instruction propagates into child repositories.
    #[must_use]
    pub fn include_child_repositories(&self) -> bool {
        match self {
            MirrorInstruction::Publish(p) => p.include_child_repositories,
            MirrorInstruction::Unpublish(u) => u.include_child_repositories,
        }
    }
}

/// A concrete target type the publish service accepts for dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetType {
    /// The target type's identifier.
    pub id: TargetId,
    /// The target type's display title.
    pub title: String,
}

impl TargetType {
    /// Creates a target type handle.
    #[must_use]
    pub fn new(id: TargetId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
        }
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.title, self.id)
    }
}

/// A delivery target as handed over by the host. Only target types can be
/// passed back to the publish service; other destination representations
/// are dropped during coercion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "target", rename_all = "lowercase")]
pub enum DeliveryTarget {
    /// A directly addressable target type.
    TargetType(TargetType),
    /// A grouping of targets the publish service cannot be handed directly.
    Group(TargetType),
}

impl DeliveryTarget {
    /// The target's identifier.
    #[must_use]
    pub fn id(&self) -> TargetId {
        match self {
            DeliveryTarget::TargetType(t) | DeliveryTarget::Group(t) => t.id,
        }
    }

    /// The target's display title.
    #[must_use]
    pub fn title(&self) -> &str {
        match self {
            DeliveryTarget::TargetType(t) | DeliveryTarget::Group(t) => &t.title,
        }
    }

    /// Coerces to a usable target type, if this target is one.
    #[must_use]
    pub fn as_target_type(&self) -> Option<&TargetType> {
        match self {
            DeliveryTarget::TargetType(t) => Some(t),
            DeliveryTarget::Group(_) => None,
        }
    }
}

/// Priority of a publish or unpublish dispatch. Mirrored dispatches are
/// always issued at low priority so they never starve user-initiated work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublishPriority {
    Low,
    Normal,
    High,
}

impl fmt::Display for PublishPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublishPriority::Low => write!(f, "low"),
            PublishPriority::Normal => write!(f, "normal"),
            PublishPriority::High => write!(f, "high"),
        }
    }
}

/// The identity that started a transaction (user or process).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Initiator {
    /// Opaque identity string.
    pub id: String,
    /// Display name.
    pub title: String,
}

impl Initiator {
    /// Creates an initiator handle.
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }
}

impl fmt::Display for Initiator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.title, self.id)
    }
}

/// One publish or unpublish operation as observed at commit time.
///
/// Transactions are transient: one instance per host notification, dropped
/// when handling completes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The instruction the user selected, tagged publish/unpublish.
    pub instruction: MirrorInstruction,
    /// The repository the transaction was started in.
    pub source_repository: Repository,
    /// The item the host notified about.
    pub triggering_item: Item,
    /// The full dependency-expanded item set actually being published.
    /// Superset of the triggering item; used for diagnostics only.
    #[serde(default)]
    pub affected_items: Vec<Item>,
    /// Delivery targets of the original transaction.
    #[serde(default)]
    pub targets: Vec<DeliveryTarget>,
    /// Who started the transaction.
    pub initiator: Initiator,
}

impl Transaction {
    /// Creates a publish transaction.
    #[must_use]
    pub fn publish(
        instruction: PublishInstruction,
        source_repository: Repository,
        triggering_item: Item,
    ) -> Self {
        Self {
            instruction: MirrorInstruction::Publish(instruction),
            source_repository,
            triggering_item,
            affected_items: Vec::new(),
            targets: Vec::new(),
            initiator: Initiator::default(),
        }
    }

    /// Creates an unpublish transaction.
    #[must_use]
    pub fn unpublish(
        instruction: UnpublishInstruction,
        source_repository: Repository,
        triggering_item: Item,
    ) -> Self {
        Self {
            instruction: MirrorInstruction::Unpublish(instruction),
            source_repository,
            triggering_item,
            affected_items: Vec::new(),
            targets: Vec::new(),
            initiator: Initiator::default(),
        }
    }

    /// Sets the delivery targets.
    #[must_use]
    pub fn with_targets(mut self, targets: Vec<DeliveryTarget>) -> Self {
        self.targets = targets;
        self
    }

    /// Sets the dependency-expanded item set.
    #[must_use]
    pub fn with_affected_items(mut self, items: Vec<Item>) -> Self {
        self.affected_items = items;
        self
    }

    /// Sets the initiating identity.
    #[must_use]
    pub fn with_initiator(mut self, initiator: Initiator) -> Self {
        self.initiator = initiator;
        self
    }

    /// The kind of this transaction.
    #[must_use]
    pub fn kind(&self) -> TransactionKind {
        self.instruction.kind()
    }
}
