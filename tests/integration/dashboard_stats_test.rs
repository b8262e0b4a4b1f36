//! 仪表板统计推导测试

use campus_cache::config::HeuristicsConfig;
use campus_cache::snapshot::UserStatistics;
use campus_cache::stats::{DashboardStats, StatisticsDeriver};
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;
use std::collections::BTreeSet;

#[path = "../common/mod.rs"]
mod common;

use common::{sample_fixture, setup_logging, FakeProviders};

fn deriver(fake: FakeProviders) -> StatisticsDeriver {
    setup_logging();
    StatisticsDeriver::new(fake.into_providers(), HeuristicsConfig::default())
}

fn at(month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, month, day)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

/// 收集JSON对象的键路径，数组只展开第一个元素
fn key_paths(value: &Value, prefix: &str, out: &mut BTreeSet<String>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let path = format!("{}/{}", prefix, key);
                out.insert(path.clone());
                key_paths(child, &path, out);
            }
        }
        Value::Array(items) => {
            if let Some(first) = items.first() {
                key_paths(first, &format!("{}[]", prefix), out);
            }
        }
        _ => {}
    }
}

fn shape(stats: &DashboardStats) -> BTreeSet<String> {
    let mut paths = BTreeSet::new();
    key_paths(&serde_json::to_value(stats).unwrap(), "", &mut paths);
    paths
}

#[tokio::test]
async fn test_chart_keys_identical_when_every_source_fails() {
    let now = at(6, 20, 10, 5);
    let healthy = deriver(FakeProviders::new(sample_fixture()))
        .derive_at(now)
        .await;
    let failing = deriver(FakeProviders::new(sample_fixture()).failing_everything())
        .derive_at(now)
        .await;

    let healthy_charts = serde_json::to_value(&healthy.charts).unwrap();
    let failing_charts = serde_json::to_value(&failing.charts).unwrap();
    let healthy_keys: Vec<&String> = healthy_charts.as_object().unwrap().keys().collect();
    let failing_keys: Vec<&String> = failing_charts.as_object().unwrap().keys().collect();
    assert_eq!(healthy_keys, failing_keys);
    assert_eq!(healthy_keys.len(), 6);

    for (name, series) in failing_charts.as_object().unwrap() {
        let points = series.as_array().unwrap();
        assert!(!points.is_empty(), "{} is empty", name);
        assert!(
            points.iter().all(|p| p["value"].as_f64() == Some(0.0)),
            "{} should be all zero",
            name
        );
    }

    assert_eq!(
        healthy.charts.student_trend.len(),
        failing.charts.student_trend.len()
    );
    assert_eq!(healthy.charts.course_trend.len(), 4);
    assert_eq!(failing.charts.revenue_trend.len(), 6);
}

#[tokio::test]
async fn test_failing_sources_fall_back_to_zero() {
    let stats = deriver(FakeProviders::new(sample_fixture()).failing_everything())
        .derive_at(at(6, 20, 10, 5))
        .await;

    assert_eq!(stats.total_students, 0);
    assert_eq!(stats.total_courses, 0);
    assert_eq!(stats.total_teachers, 0);
    assert_eq!(stats.pending_payments, 0);
    assert_eq!(stats.monthly_revenue, "¥0.00");
    assert_eq!(stats.quick_stats.today_new_students, 0);
    assert_eq!(stats.quick_stats.today_revenue, 0.0);
    assert_eq!(stats.quick_stats.online_users, 1);
    assert_eq!(stats.recent_activities.len(), 1);
    assert_eq!(stats.recent_activities[0].title, "系统状态");
    assert_eq!(stats.system_notifications.len(), 5);
}

#[tokio::test]
async fn test_partial_failure_only_affects_its_fields() {
    let now = at(6, 20, 10, 5);
    let stats = deriver(FakeProviders::new(sample_fixture()).failing_stats())
        .derive_at(now)
        .await;

    // 用户与课程仍可用
    assert_eq!(stats.total_users, 3);
    assert_eq!(stats.total_courses, 3);
    assert_eq!(stats.charts.course_trend[0].value, 0.0);
    assert_eq!(stats.charts.course_trend[3].value, 15.0);
    // 学生与缴费退化
    assert_eq!(stats.total_students, 0);
    assert_eq!(stats.monthly_revenue, "¥0.00");
    assert_eq!(stats.charts.grade_distribution[0].label, "2024级");
}

#[tokio::test]
async fn test_shape_is_stable_across_failures() {
    let now = at(3, 1, 9, 0);
    let healthy = deriver(FakeProviders::new(sample_fixture()))
        .derive_at(now)
        .await;
    let failing = deriver(FakeProviders::new(sample_fixture()).failing_everything())
        .derive_at(now)
        .await;
    assert_eq!(shape(&healthy), shape(&failing));
}

#[tokio::test]
async fn test_healthy_dashboard_values() {
    let stats = deriver(FakeProviders::new(sample_fixture()))
        .derive_at(at(6, 20, 15, 5))
        .await;

    assert_eq!(stats.total_students, 1200);
    assert_eq!(stats.total_classes, 40);
    assert_eq!(stats.active_schedules, 120);
    assert_eq!(stats.pending_payments, 50);
    assert_eq!(stats.monthly_revenue, "¥2,250,000.00");

    let trend: Vec<f64> = stats.charts.student_trend.iter().map(|p| p.value).collect();
    assert_eq!(trend[2], 600.0);
    assert_eq!(trend[5], 1200.0);
    assert_eq!(trend[8], 1272.0);
    assert_eq!(stats.charts.student_trend[0].label, "1月");

    let majors: Vec<(&str, f64)> = stats
        .charts
        .major_distribution
        .iter()
        .map(|p| (p.label.as_str(), p.value))
        .collect();
    assert_eq!(majors, vec![("计算机科学", 500.0), ("外国语言", 100.0)]);

    let grade_colors: Vec<Option<&str>> = stats
        .charts
        .grade_distribution
        .iter()
        .map(|p| p.color.as_deref())
        .collect();
    assert_eq!(
        grade_colors,
        vec![Some("#4e73df"), Some("#1cc88a"), Some("#36b9cc")]
    );

    // 450 * 0.005 * 1.8
    assert_eq!(stats.quick_stats.today_payments, 4);
    // 活跃用户 2 * 0.40
    assert_eq!(stats.quick_stats.online_users, 1);
    assert_eq!(stats.recent_activities.len(), 4);
}

#[tokio::test]
async fn test_online_users_at_least_one_every_hour() {
    let mut fixture = sample_fixture();
    fixture.user_statistics = Some(UserStatistics {
        total_users: 0,
        active_users: 0,
    });
    let deriver = deriver(FakeProviders::new(fixture));

    for hour in 0..24 {
        let stats = deriver.derive_at(at(10, 15, hour, 30)).await;
        assert!(stats.quick_stats.online_users >= 1, "hour {}", hour);
    }
}

#[tokio::test]
async fn test_derivation_is_deterministic_for_fixed_time() {
    let deriver = deriver(FakeProviders::new(sample_fixture()));
    let now = at(9, 1, 10, 10);
    assert_eq!(deriver.derive_at(now).await, deriver.derive_at(now).await);
}
