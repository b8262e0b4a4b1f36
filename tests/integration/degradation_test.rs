//! 缓存后端缺失时的降级测试

use campus_cache::backend::{build_store, build_store_with_fallback, CacheStore, NoopStore};
use campus_cache::config::{AppConfig, StoreConfig, StoreKind};
use campus_cache::domain::Domain;
use campus_cache::manager::CacheManager;
use campus_cache::sync::invalidation::{CacheInvalidator, CacheStatus};
use campus_cache::sync::warmup::CacheWarmer;
use secrecy::SecretString;
use std::sync::Arc;

#[path = "../common/mod.rs"]
mod common;

use common::{sample_fixture, setup_logging, test_config, FakeProviders};

fn unreachable_redis() -> StoreConfig {
    StoreConfig {
        kind: StoreKind::Redis,
        connection_string: SecretString::new("redis://127.0.0.1:1".to_string().into()),
        connection_timeout_ms: 300,
        ..StoreConfig::default()
    }
}

#[tokio::test]
async fn test_noop_store_warmup_succeeds_without_caching() {
    setup_logging();
    let store: Arc<dyn CacheStore> = Arc::new(NoopStore);
    let warmer = CacheWarmer::new(
        store.clone(),
        FakeProviders::new(sample_fixture()).into_providers(),
        &test_config(),
    );

    let report = warmer.warm_all().await.unwrap();
    assert!(report.is_success());
    assert_eq!(report.total_entries(), 19);

    let invalidator = CacheInvalidator::new(store.clone());
    assert!(!invalidator.is_warmed_up().await);
    let stats = invalidator.statistics().await;
    assert_eq!(stats.total_keys, 0);
    assert_eq!(stats.status, CacheStatus::NotWarmed);
    assert!(store.get("user:1").await.unwrap().is_none());
}

#[tokio::test]
async fn test_none_store_kind_selects_noop() {
    let config = StoreConfig {
        kind: StoreKind::None,
        ..StoreConfig::default()
    };
    let store = build_store(&config).await.unwrap();
    assert_eq!(store.name(), "noop");
}

#[tokio::test]
async fn test_unreachable_redis_is_an_error_without_fallback() {
    setup_logging();
    assert!(build_store(&unreachable_redis()).await.is_err());
}

#[tokio::test]
async fn test_unreachable_redis_falls_back_to_noop() {
    setup_logging();
    let store = build_store_with_fallback(&unreachable_redis()).await;
    assert_eq!(store.name(), "noop");
}

#[tokio::test]
async fn test_manager_degrades_and_keeps_serving_statistics() {
    setup_logging();
    let config = AppConfig {
        store: unreachable_redis(),
        ..AppConfig::default()
    };
    let manager = CacheManager::from_config(
        config,
        FakeProviders::new(sample_fixture()).into_providers(),
    )
    .await
    .unwrap();
    assert_eq!(manager.store().name(), "noop");

    let report = manager.startup().await.unwrap().unwrap();
    assert!(report.is_success());
    assert!(!manager.invalidator().is_warmed_up().await);

    let stats = manager.dashboard_stats_cached().await;
    assert_eq!(stats.total_students, 1200);
}

#[tokio::test]
async fn test_failed_domain_leaves_warmer_usable() {
    setup_logging();
    let store: Arc<dyn CacheStore> = Arc::new(NoopStore);
    let warmer = CacheWarmer::new(
        store,
        FakeProviders::new(sample_fixture())
            .failing(Domain::Config)
            .into_providers(),
        &test_config(),
    );

    let report = warmer.warm_all().await.unwrap();
    assert_eq!(report.failed_domains(), vec![Domain::Config]);
    assert!(warmer.warm_domain(Domain::Users).await.is_ok());
}
