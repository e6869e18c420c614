use pretty_assertions::assert_eq;
use pubmirror_engine::host::mock::{MockHost, MockPublishService, MockSubscription};
use pubmirror_engine::{MirrorConfig, MirrorEngine, MirrorOutcome, SkipReason};
use pubmirror_types::{
    DeliveryTarget, Initiator, Item, ItemId, ItemKind, ItemUri, MirrorInstruction,
    PublishInstruction, PublishPriority, Repository, RepositoryId, TargetId, TargetType,
    Transaction, TransactionKind, UnpublishInstruction,
};
use std::sync::Arc;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("pubmirror_engine=debug")
        .try_init();
}

fn repo(id: u32, title: &str) -> Repository {
    Repository::new(RepositoryId::new(id), title)
}

fn page(repo: u32, item: u32, title: &str) -> Item {
    Item::new(
        ItemUri::new(RepositoryId::new(repo), ItemId::new(item), ItemKind::Page),
        title,
    )
}

fn live_target(id: u32) -> DeliveryTarget {
    DeliveryTarget::TargetType(TargetType::new(TargetId::new(id), "Live"))
}

fn make_config() -> MirrorConfig {
    MirrorConfig {
        source_publications: vec!["English".to_string()],
        target_publications: vec!["French".to_string(), "German".to_string()],
        logging_enabled: true,
        ..Default::default()
    }
}

/// English repo 5 is the source; French (6) and German (7) are targets.
fn make_host() -> Arc<MockHost> {
    let host = Arc::new(MockHost::new());
    host.add_repository(repo(5, "English"));
    host.add_repository(repo(6, "French"));
    host.add_repository(repo(7, "German"));
    host
}

fn make_engine(
    config: MirrorConfig,
    host: &Arc<MockHost>,
    publisher: &Arc<MockPublishService>,
) -> MirrorEngine {
    MirrorEngine::new(
        Arc::new(config),
        Arc::clone(host) as Arc<dyn pubmirror_engine::host::ItemDirectory>,
        Arc::clone(host) as Arc<dyn pubmirror_engine::host::RepositoryDirectory>,
        Arc::clone(publisher) as Arc<dyn pubmirror_engine::host::PublishService>,
    )
}

fn publish_txn(item: Item) -> Transaction {
    Transaction::publish(PublishInstruction::default(), repo(5, "English"), item.clone())
        .with_targets(vec![live_target(1)])
        .with_affected_items(vec![item])
        .with_initiator(Initiator::new("user:12", "Editor"))
}

fn unpublish_txn(item: Item) -> Transaction {
    Transaction::unpublish(UnpublishInstruction::default(), repo(5, "English"), item)
        .with_targets(vec![live_target(1)])
        .with_initiator(Initiator::new("user:12", "Editor"))
}

// ── Construction ─────────────────────────────────────────────────

#[tokio::test]
async fn engine_exposes_its_configuration() {
    let host = make_host();
    let publisher = Arc::new(MockPublishService::new());
    let engine = make_engine(make_config(), &host, &publisher);

    assert_eq!(engine.config().source_publications, vec!["English"]);
    assert_eq!(engine.config().target_publications, vec!["French", "German"]);
}

// ── Scenario A: counterparts in every target repository ──────────

#[tokio::test]
async fn mirrors_to_all_repositories_where_the_item_exists() {
    init_tracing();
    let host = make_host();
    host.add_item(page(6, 100, "Accueil"));
    host.add_item(page(7, 100, "Startseite"));
    let publisher = Arc::new(MockPublishService::new());
    let engine = make_engine(make_config(), &host, &publisher);

    let outcome = engine.handle(&publish_txn(page(5, 100, "Home"))).await;

    assert_eq!(outcome, MirrorOutcome::Dispatched { items: 2, targets: 1 });
    let records = publisher.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].kind, TransactionKind::Publish);
    assert_eq!(
        records[0].items.iter().map(|i| i.uri.repository).collect::<Vec<_>>(),
        vec![RepositoryId::new(6), RepositoryId::new(7)]
    );
    assert_eq!(records[0].targets, vec![TargetType::new(TargetId::new(1), "Live")]);
    assert_eq!(records[0].priority, PublishPriority::Low);
}

// ── Scenario B: counterpart missing in one repository ────────────

#[tokio::test]
async fn missing_counterparts_are_silently_omitted() {
    let host = make_host();
    host.add_item(page(6, 100, "Accueil"));
    let publisher = Arc::new(MockPublishService::new());
    let engine = make_engine(make_config(), &host, &publisher);

    let outcome = engine.handle(&publish_txn(page(5, 100, "Home"))).await;

    assert_eq!(outcome, MirrorOutcome::Dispatched { items: 1, targets: 1 });
    let records = publisher.records();
    assert_eq!(records[0].items.len(), 1);
    assert_eq!(records[0].items[0].uri.repository, RepositoryId::new(6));
}

// ── Scenario C: forced child propagation ─────────────────────────

#[tokio::test]
async fn forced_children_flag_is_set_on_the_mirrored_instruction() {
    let host = make_host();
    host.add_item(page(6, 100, "Accueil"));
    let publisher = Arc::new(MockPublishService::new());
    let config = MirrorConfig {
        force_include_children: true,
        ..make_config()
    };
    let engine = make_engine(config, &host, &publisher);

    let txn = publish_txn(page(5, 100, "Home"));
    let outcome = engine.handle(&txn).await;

    assert!(matches!(outcome, MirrorOutcome::Dispatched { .. }));
    let records = publisher.records();
    assert!(records[0].instruction.include_child_repositories());
    // The original transaction's instruction is untouched.
    assert!(!txn.instruction.include_child_repositories());
}

// ── Scenario D: propagation guard ────────────────────────────────

#[tokio::test]
async fn guard_skips_when_child_propagation_is_required_but_absent() {
    let host = make_host();
    host.add_item(page(6, 100, "Accueil"));
    let publisher = Arc::new(MockPublishService::new());
    let config = MirrorConfig {
        only_mirror_if_child_propagation: true,
        ..make_config()
    };
    let engine = make_engine(config, &host, &publisher);

    let outcome = engine.handle(&publish_txn(page(5, 100, "Home"))).await;

    assert_eq!(
        outcome,
        MirrorOutcome::Skipped(SkipReason::ChildPropagationNotSelected)
    );
    assert_eq!(publisher.dispatch_count(), 0);
}

#[tokio::test]
async fn guard_is_satisfied_by_the_forced_flag() {
    let host = make_host();
    host.add_item(page(6, 100, "Accueil"));
    let publisher = Arc::new(MockPublishService::new());
    let config = MirrorConfig {
        force_include_children: true,
        only_mirror_if_child_propagation: true,
        ..make_config()
    };
    let engine = make_engine(config, &host, &publisher);

    let outcome = engine.handle(&publish_txn(page(5, 100, "Home"))).await;
    assert!(matches!(outcome, MirrorOutcome::Dispatched { .. }));
}

// ── Scenario E: dispatch failure is contained ────────────────────

#[tokio::test]
async fn dispatch_failure_is_logged_and_contained() {
    init_tracing();
    let host = make_host();
    host.add_item(page(6, 100, "Accueil"));
    let publisher = Arc::new(MockPublishService::new());
    publisher.fail_dispatches();
    let engine = make_engine(make_config(), &host, &publisher);

    let outcome = engine.handle(&publish_txn(page(5, 100, "Home"))).await;

    assert_eq!(outcome, MirrorOutcome::Failed);
    assert_eq!(publisher.dispatch_count(), 0);
}

// ── Source filter ────────────────────────────────────────────────

#[tokio::test]
async fn non_source_repositories_skip_without_side_effects() {
    let host = make_host();
    host.add_item(page(6, 100, "Accueil"));
    let publisher = Arc::new(MockPublishService::new());
    let engine = make_engine(make_config(), &host, &publisher);

    let txn = Transaction::publish(
        PublishInstruction::default(),
        repo(6, "French"),
        page(6, 100, "Accueil"),
    )
    .with_targets(vec![live_target(1)]);
    let outcome = engine.handle(&txn).await;

    assert_eq!(outcome, MirrorOutcome::Skipped(SkipReason::NotSourceRepository));
    assert_eq!(publisher.dispatch_count(), 0);
}

#[tokio::test]
async fn source_filter_accepts_id_strings() {
    let host = make_host();
    host.add_item(page(6, 100, "Accueil"));
    let publisher = Arc::new(MockPublishService::new());
    let config = MirrorConfig {
        source_publications: vec!["5".to_string()],
        ..make_config()
    };
    let engine = make_engine(config, &host, &publisher);

    let outcome = engine.handle(&publish_txn(page(5, 100, "Home"))).await;
    assert!(matches!(outcome, MirrorOutcome::Dispatched { .. }));
}

// ── Emptiness skips ──────────────────────────────────────────────

#[tokio::test]
async fn no_delivery_targets_skips() {
    let host = make_host();
    host.add_item(page(6, 100, "Accueil"));
    let publisher = Arc::new(MockPublishService::new());
    let engine = make_engine(make_config(), &host, &publisher);

    let txn = publish_txn(page(5, 100, "Home")).with_targets(vec![]);
    let outcome = engine.handle(&txn).await;

    assert_eq!(outcome, MirrorOutcome::Skipped(SkipReason::NoTransactionTargets));
    assert_eq!(publisher.dispatch_count(), 0);
}

#[tokio::test]
async fn unresolvable_target_repositories_skip() {
    let host = make_host();
    let publisher = Arc::new(MockPublishService::new());
    let config = MirrorConfig {
        target_publications: vec!["Dutch".to_string()],
        ..make_config()
    };
    let engine = make_engine(config, &host, &publisher);

    let outcome = engine.handle(&publish_txn(page(5, 100, "Home"))).await;
    assert_eq!(outcome, MirrorOutcome::Skipped(SkipReason::NoMirrorRepositories));
}

#[tokio::test]
async fn repository_listing_failure_skips_for_this_transaction() {
    let host = make_host();
    host.fail_listing();
    let publisher = Arc::new(MockPublishService::new());
    let engine = make_engine(make_config(), &host, &publisher);

    let outcome = engine.handle(&publish_txn(page(5, 100, "Home"))).await;
    assert_eq!(outcome, MirrorOutcome::Skipped(SkipReason::NoMirrorRepositories));
    assert_eq!(publisher.dispatch_count(), 0);
}

#[tokio::test]
async fn no_counterparts_anywhere_skips() {
    let host = make_host();
    let publisher = Arc::new(MockPublishService::new());
    let engine = make_engine(make_config(), &host, &publisher);

    let outcome = engine.handle(&publish_txn(page(5, 100, "Home"))).await;
    assert_eq!(outcome, MirrorOutcome::Skipped(SkipReason::NoMirrorItems));
}

#[tokio::test]
async fn group_only_targets_skip_instead_of_dispatching() {
    let host = make_host();
    host.add_item(page(6, 100, "Accueil"));
    let publisher = Arc::new(MockPublishService::new());
    let engine = make_engine(make_config(), &host, &publisher);

    let txn = publish_txn(page(5, 100, "Home")).with_targets(vec![DeliveryTarget::Group(
        TargetType::new(TargetId::new(9), "All Channels"),
    )]);
    let outcome = engine.handle(&txn).await;

    assert_eq!(outcome, MirrorOutcome::Skipped(SkipReason::NoUsableTargets));
    assert_eq!(publisher.dispatch_count(), 0);
}

#[tokio::test]
async fn mixed_targets_coerce_to_the_usable_subset() {
    let host = make_host();
    host.add_item(page(6, 100, "Accueil"));
    let publisher = Arc::new(MockPublishService::new());
    let engine = make_engine(make_config(), &host, &publisher);

    let txn = publish_txn(page(5, 100, "Home")).with_targets(vec![
        DeliveryTarget::Group(TargetType::new(TargetId::new(9), "All Channels")),
        live_target(1),
    ]);
    let outcome = engine.handle(&txn).await;

    assert_eq!(outcome, MirrorOutcome::Dispatched { items: 1, targets: 1 });
    assert_eq!(publisher.records()[0].targets.len(), 1);
}

// ── Unpublish mirroring ──────────────────────────────────────────

#[tokio::test]
async fn unpublish_is_mirrored_as_unpublish() {
    let host = make_host();
    host.add_item(page(6, 100, "Accueil"));
    let publisher = Arc::new(MockPublishService::new());
    let engine = make_engine(make_config(), &host, &publisher);

    let outcome = engine.handle(&unpublish_txn(page(5, 100, "Home"))).await;

    assert_eq!(outcome, MirrorOutcome::Dispatched { items: 1, targets: 1 });
    let records = publisher.records();
    assert_eq!(records[0].kind, TransactionKind::Unpublish);
    assert_eq!(records[0].priority, PublishPriority::Low);
}

#[tokio::test]
async fn unpublish_ignores_version_overrides() {
    let host = make_host();
    host.add_item(page(6, 100, "Accueil"));
    let publisher = Arc::new(MockPublishService::new());
    let config = MirrorConfig {
        force_include_children: true,
        force_include_minor_version: true,
        force_include_workflow_version: true,
        ..make_config()
    };
    let engine = make_engine(config, &host, &publisher);

    engine.handle(&unpublish_txn(page(5, 100, "Home"))).await;

    match publisher.records()[0].instruction {
        MirrorInstruction::Unpublish(u) => assert!(u.include_child_repositories),
        _ => panic!("expected an unpublish dispatch"),
    }
}

// ── Dispatch cardinality ─────────────────────────────────────────

#[tokio::test]
async fn at_most_one_dispatch_per_notification() {
    let host = make_host();
    host.add_item(page(6, 100, "Accueil"));
    host.add_item(page(7, 100, "Startseite"));
    let publisher = Arc::new(MockPublishService::new());
    let engine = make_engine(make_config(), &host, &publisher);

    engine.handle(&publish_txn(page(5, 100, "Home"))).await;
    assert_eq!(publisher.dispatch_count(), 1);

    engine.handle(&publish_txn(page(5, 100, "Home"))).await;
    assert_eq!(publisher.dispatch_count(), 2);
}

// ── The binding loop ─────────────────────────────────────────────

#[tokio::test]
async fn run_drains_the_subscription() {
    let host = make_host();
    host.add_item(page(6, 100, "Accueil"));
    host.add_item(page(6, 101, "Contact"));
    let publisher = Arc::new(MockPublishService::new());
    let engine = make_engine(make_config(), &host, &publisher);

    let subscription = Arc::new(MockSubscription::with_transactions(vec![
        publish_txn(page(5, 100, "Home")),
        // Not a source repository; skipped without a dispatch.
        Transaction::publish(
            PublishInstruction::default(),
            repo(7, "German"),
            page(7, 100, "Startseite"),
        )
        .with_targets(vec![live_target(1)]),
        unpublish_txn(page(5, 101, "Contact")),
    ]));

    engine.run(subscription).await;

    let records = publisher.records();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].kind, TransactionKind::Publish);
    assert_eq!(records[1].kind, TransactionKind::Unpublish);
}
