//! 按领域并发预热测试

use campus_cache::backend::{CacheStore, MemoryStore};
use campus_cache::domain::Domain;
use campus_cache::sync::warmup::{CacheWarmer, DomainOutcome, WarmupStatus};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[path = "../common/mod.rs"]
mod common;

use common::{sample_fixture, setup_logging, test_config, FakeProviders};

fn warmer_with(fake: FakeProviders) -> (Arc<MemoryStore>, CacheWarmer) {
    setup_logging();
    let store = Arc::new(MemoryStore::new(10_000));
    let warmer = CacheWarmer::new(store.clone(), fake.into_providers(), &test_config());
    (store, warmer)
}

async fn snapshot(store: &MemoryStore) -> Vec<(String, Vec<u8>)> {
    let mut entries = Vec::new();
    for key in store.keys("*").await.unwrap() {
        let value = store.get(&key).await.unwrap().unwrap();
        entries.push((key, value));
    }
    entries
}

#[tokio::test]
async fn test_warm_all_populates_every_domain() {
    let (store, warmer) = warmer_with(FakeProviders::new(sample_fixture()));

    let report = warmer.warm_all().await.unwrap();
    assert!(report.is_success());
    assert_eq!(report.outcomes.len(), 5);
    assert_eq!(report.outcomes[&Domain::Users], DomainOutcome::Completed { entries: 6 });
    assert_eq!(report.outcomes[&Domain::Courses], DomainOutcome::Completed { entries: 3 });
    assert_eq!(report.outcomes[&Domain::Departments], DomainOutcome::Completed { entries: 2 });
    assert_eq!(report.outcomes[&Domain::Permissions], DomainOutcome::Completed { entries: 3 });
    assert_eq!(report.outcomes[&Domain::Config], DomainOutcome::Completed { entries: 5 });
    assert_eq!(report.total_entries(), 19);
    assert!(report.finished_at >= report.started_at);

    for key in [
        "user:1",
        "user:2",
        "user:permissions:1",
        "user:permissions:3",
        "user:statistics",
        "course:10",
        "course:statistics",
        "department:100",
        "department:hierarchy",
        "permission:1001",
        "permission:tree",
        "system:config",
        "dict:user_status",
        "dict:semester",
    ] {
        assert!(store.exists(key).await.unwrap(), "missing {}", key);
    }

    // 非活跃记录不写入
    assert!(!store.exists("user:3").await.unwrap());
    assert!(!store.exists("course:12").await.unwrap());
}

#[tokio::test]
async fn test_cached_values_are_json_snapshots() {
    let (store, warmer) = warmer_with(FakeProviders::new(sample_fixture()));
    warmer.warm_all().await.unwrap();

    let bytes = store.get("user:1").await.unwrap().unwrap();
    let user: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(user["id"], 1);
    assert_eq!(user["username"], "admin");

    let bytes = store.get("user:statistics").await.unwrap().unwrap();
    let stats: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(stats["active_users"], 2);

    let bytes = store.get("dict:user_status").await.unwrap().unwrap();
    let dict: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(dict["data"]["1"], "启用");
}

#[tokio::test]
async fn test_warm_domain_is_idempotent() {
    for domain in Domain::ALL {
        let (store, warmer) = warmer_with(FakeProviders::new(sample_fixture()));

        let first_count = warmer.warm_domain(domain).await.unwrap();
        let first = snapshot(&store).await;
        let second_count = warmer.warm_domain(domain).await.unwrap();
        let second = snapshot(&store).await;

        assert_eq!(first_count, second_count, "domain {}", domain);
        assert_eq!(first, second, "domain {}", domain);
    }
}

#[tokio::test]
async fn test_warm_all_is_bounded_by_slowest_domain() {
    let fake = FakeProviders::new(sample_fixture())
        .with_delay(Domain::Users, Duration::from_millis(100))
        .with_delay(Domain::Courses, Duration::from_millis(200))
        .with_delay(Domain::Departments, Duration::from_millis(300))
        .with_delay(Domain::Permissions, Duration::from_millis(150))
        .with_delay(Domain::Config, Duration::from_millis(50));
    let (_, warmer) = warmer_with(fake);

    let start = Instant::now();
    let report = warmer.warm_all().await.unwrap();
    let elapsed = start.elapsed();

    assert!(report.is_success());
    // 最慢领域两次读取共 600 毫秒，串行执行需要 1.8 秒以上
    assert!(elapsed >= Duration::from_millis(600), "elapsed {:?}", elapsed);
    assert!(elapsed < Duration::from_millis(1500), "elapsed {:?}", elapsed);
}

#[tokio::test]
async fn test_failing_domain_does_not_affect_siblings() {
    let fake = FakeProviders::new(sample_fixture()).failing(Domain::Courses);
    let (store, warmer) = warmer_with(fake);

    let report = warmer.warm_all().await.unwrap();
    assert!(!report.is_success());
    assert_eq!(report.failed_domains(), vec![Domain::Courses]);
    assert!(matches!(
        report.outcomes[&Domain::Courses],
        DomainOutcome::Failed { .. }
    ));

    assert!(store.keys("course:*").await.unwrap().is_empty());
    assert!(store.exists("user:statistics").await.unwrap());
    assert!(store.exists("department:hierarchy").await.unwrap());
    assert!(store.exists("permission:tree").await.unwrap());
    assert!(store.exists("system:config").await.unwrap());

    assert!(matches!(
        warmer.status(Domain::Courses).await,
        WarmupStatus::Failed { .. }
    ));
    assert_eq!(
        warmer.status(Domain::Config).await,
        WarmupStatus::Completed { entries: 5 }
    );
}

#[tokio::test]
async fn test_single_user_permission_failure_is_skipped() {
    let fake = FakeProviders::new(sample_fixture()).failing_permissions_of(2);
    let (store, warmer) = warmer_with(fake);

    let entries = warmer.warm_domain(Domain::Users).await.unwrap();
    assert_eq!(entries, 5);
    assert!(store.exists("user:permissions:1").await.unwrap());
    assert!(!store.exists("user:permissions:2").await.unwrap());
    assert!(store.exists("user:2").await.unwrap());
}

#[tokio::test]
async fn test_dashboard_subset_only_touches_configured_domains() {
    let (store, warmer) = warmer_with(FakeProviders::new(sample_fixture()));

    let report = warmer.warm_dashboard_subset().await.unwrap();
    let domains: Vec<Domain> = report.outcomes.keys().copied().collect();
    assert_eq!(
        domains,
        vec![Domain::Users, Domain::Courses, Domain::Departments]
    );
    assert!(store.keys("permission:*").await.unwrap().is_empty());
    assert!(!store.exists("system:config").await.unwrap());

    let report = warmer.warm_basic_stats_subset().await.unwrap();
    assert_eq!(report.outcomes.len(), 3);
}
