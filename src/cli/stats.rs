use crate::cli::{build_manager, StatsArgs};
use crate::config::AppConfig;
use crate::stats::{ChartPoint, DashboardStats};
use anyhow::Result;

pub async fn execute(config: AppConfig, args: &StatsArgs) -> Result<()> {
    let manager = build_manager(config, args.fixture.as_deref()).await?;
    let stats = manager.dashboard_stats_cached().await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        display_stats(&stats);
    }
    Ok(())
}

fn display_stats(stats: &DashboardStats) {
    println!("=== Dashboard ({}) ===\n", stats.generated_at.format("%Y-%m-%d %H:%M"));
    println!("Students:          {}", stats.total_students);
    println!("Teachers:          {}", stats.total_teachers);
    println!("Courses:           {}", stats.total_courses);
    println!("Classes:           {}", stats.total_classes);
    println!("Users:             {}", stats.total_users);
    println!("Active Schedules:  {}", stats.active_schedules);
    println!("Revenue:           {}", stats.monthly_revenue);
    println!("Pending Payments:  {}", stats.pending_payments);

    let quick = &stats.quick_stats;
    println!("\n--- Today ---");
    println!("New Students:      {}", quick.today_new_students);
    println!("Payments:          {}", quick.today_payments);
    println!("Revenue:           {:.2}", quick.today_revenue);
    println!("Online Users:      {}", quick.online_users);
    println!("System Alerts:     {}", quick.system_alerts);

    let charts = &stats.charts;
    print_series("Student Trend", &charts.student_trend);
    print_series("Course Trend", &charts.course_trend);
    print_series("Revenue Trend", &charts.revenue_trend);
    print_series("Course Distribution", &charts.course_distribution);
    print_series("Grade Distribution", &charts.grade_distribution);
    print_series("Major Distribution", &charts.major_distribution);
}

fn print_series(title: &str, points: &[ChartPoint]) {
    let rendered: Vec<String> = points
        .iter()
        .map(|p| format!("{}={}", p.label, p.value))
        .collect();
    println!("\n{}: {}", title, rendered.join(", "));
}
