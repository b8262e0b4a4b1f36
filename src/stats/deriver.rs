//! Copyright (c) 2025, Kirky.X
//!
//! MIT License
//!
//! 该模块实现了仪表板统计推导器。

use super::heuristics::{self, palette_color};
use super::model::{
    ChartPoint, ChartSet, DashboardStats, QuickStats, RecentActivity, SystemNotification,
};
use crate::config::HeuristicsConfig;
use crate::error::Result;
use crate::provider::Providers;
use crate::snapshot::{GradeCount, PaymentStatistics, UserStatistics};
use chrono::{Datelike, Duration, Local, NaiveDateTime, Timelike};
use tracing::{debug, warn};

const MONTH_LABELS: [&str; 12] = [
    "1月", "2月", "3月", "4月", "5月", "6月", "7月", "8月", "9月", "10月", "11月", "12月",
];
const QUARTER_LABELS: [&str; 4] = ["Q1", "Q2", "Q3", "Q4"];
const COURSE_TYPE_LABELS: [&str; 4] = ["必修课", "选修课", "实践课", "理论课"];
const DEFAULT_GRADE_LABELS: [&str; 4] = ["2024级", "2023级", "2022级", "2021级"];
const DEFAULT_MAJOR_LABELS: [&str; 4] = ["计算机科学与技术", "软件工程", "数据科学与大数据", "人工智能"];
const REVENUE_MONTHS: usize = 6;

/// 一次推导所需的全部快照，获取失败的字段为None
struct Inputs {
    students: Option<u64>,
    courses: Option<u64>,
    classes: Option<u64>,
    schedules: Option<u64>,
    users: Option<UserStatistics>,
    payments: Option<PaymentStatistics>,
    grades: Option<Vec<GradeCount>>,
}

fn settle<T>(source: &str, result: Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Dashboard source {} unavailable, using default: {}", source, e);
            None
        }
    }
}

fn zero_series<const N: usize>(labels: [&str; N]) -> Vec<ChartPoint> {
    labels.iter().map(|label| ChartPoint::new(*label, 0.0)).collect()
}

fn zero_colored_series<const N: usize>(labels: [&str; N]) -> Vec<ChartPoint> {
    labels
        .iter()
        .enumerate()
        .map(|(i, label)| ChartPoint::colored(*label, 0.0, palette_color(i)))
        .collect()
}

fn colored_counts(counts: Vec<(String, u64)>) -> Vec<ChartPoint> {
    counts
        .into_iter()
        .enumerate()
        .map(|(i, (label, count))| ChartPoint::colored(label, count as f64, palette_color(i)))
        .collect()
}

/// 仪表板统计推导器
///
/// 从数据提供者读取快照并用启发式规则合成趋势、分布和今日统计。
/// 推导永不失败，单个数据源失败时对应部分退化为默认值。
#[derive(Clone)]
pub struct StatisticsDeriver {
    providers: Providers,
    heuristics: HeuristicsConfig,
}

impl StatisticsDeriver {
    pub fn new(providers: Providers, heuristics: HeuristicsConfig) -> Self {
        Self {
            providers,
            heuristics,
        }
    }

    /// 以当前本地时间推导仪表板统计
    pub async fn derive(&self) -> DashboardStats {
        self.derive_at(Local::now().naive_local()).await
    }

    /// 以指定时间推导仪表板统计
    ///
    /// # 参数
    ///
    /// * `now` - 作为启发式种子的时间，相同输入得到相同结果
    pub async fn derive_at(&self, now: NaiveDateTime) -> DashboardStats {
        let inputs = self.fetch().await;
        let h = &self.heuristics;

        let users = inputs.users.unwrap_or_default();
        let payments = inputs.payments.unwrap_or_default();
        let charts = self.charts(&inputs, now);
        let quick_stats = QuickStats {
            today_new_students: heuristics::today_new_students(
                inputs.students.unwrap_or(0),
                now.date(),
                h,
            ),
            today_payments: heuristics::today_payments(payments.success_records, now.hour(), h),
            today_revenue: heuristics::today_revenue(
                payments.success_amount,
                now.hour(),
                now.day(),
                h,
            ),
            online_users: heuristics::online_users(users.active_users, now.hour(), h),
            system_alerts: heuristics::system_alerts(now),
        };

        debug!("Dashboard statistics derived at {}", now);
        DashboardStats {
            total_students: inputs.students.unwrap_or(0),
            total_courses: inputs.courses.unwrap_or(0),
            total_classes: inputs.classes.unwrap_or(0),
            total_users: users.total_users,
            total_teachers: (users.total_users as f64 * h.teacher_ratio).round() as u64,
            active_schedules: inputs.schedules.unwrap_or(0),
            monthly_revenue: heuristics::format_currency(payments.success_amount),
            pending_payments: payments
                .total_records
                .saturating_sub(payments.success_records),
            charts,
            quick_stats,
            recent_activities: Self::recent_activities(&inputs, now),
            system_notifications: Self::system_notifications(now),
            generated_at: now,
        }
    }

    async fn fetch(&self) -> Inputs {
        let p = &self.providers;
        let (students, courses, classes, schedules, users, payments, grades) = tokio::join!(
            p.students.count(),
            p.courses.count(),
            p.classes.count(),
            p.schedules.count(),
            p.users.statistics(),
            p.payments.statistics(),
            p.students.count_by_grade(),
        );
        Inputs {
            students: settle("students", students),
            courses: settle("courses", courses),
            classes: settle("classes", classes),
            schedules: settle("schedules", schedules),
            users: settle("users", users),
            payments: settle("payments", payments),
            grades: settle("grades", grades),
        }
    }

    fn charts(&self, inputs: &Inputs, now: NaiveDateTime) -> ChartSet {
        ChartSet {
            student_trend: self.student_trend(inputs.students, now.month()),
            course_trend: Self::course_trend(inputs.courses),
            revenue_trend: Self::revenue_trend(inputs.payments.as_ref()),
            course_distribution: Self::course_distribution(inputs.courses),
            grade_distribution: Self::grade_distribution(inputs.grades.as_deref()),
            major_distribution: Self::major_distribution(inputs.grades.as_deref(), inputs.students),
        }
    }

    fn student_trend(&self, students: Option<u64>, month: u32) -> Vec<ChartPoint> {
        let Some(total) = students else {
            return zero_series(MONTH_LABELS);
        };
        let series = heuristics::heuristic_distribution(
            total,
            month,
            MONTH_LABELS.len() as u32,
            self.heuristics.growth_rate,
        );
        MONTH_LABELS
            .iter()
            .zip(series)
            .map(|(label, value)| ChartPoint::new(*label, value as f64))
            .collect()
    }

    fn course_trend(courses: Option<u64>) -> Vec<ChartPoint> {
        let Some(total) = courses else {
            return zero_series(QUARTER_LABELS);
        };
        QUARTER_LABELS
            .iter()
            .enumerate()
            .map(|(i, label)| ChartPoint::new(*label, (total / 4 + i as u64 * 5) as f64))
            .collect()
    }

    fn revenue_trend(payments: Option<&PaymentStatistics>) -> Vec<ChartPoint> {
        let labels = &MONTH_LABELS[..REVENUE_MONTHS];
        let Some(payments) = payments else {
            return labels.iter().map(|label| ChartPoint::new(*label, 0.0)).collect();
        };
        let average = heuristics::round2(payments.success_amount / REVENUE_MONTHS as f64);
        labels
            .iter()
            .enumerate()
            .map(|(i, label)| {
                let factor = 0.8 + 0.1 * i as f64;
                ChartPoint::new(*label, heuristics::round2(average * factor))
            })
            .collect()
    }

    fn course_distribution(courses: Option<u64>) -> Vec<ChartPoint> {
        let split = heuristics::course_type_split(courses.unwrap_or(0));
        COURSE_TYPE_LABELS
            .iter()
            .zip(split)
            .enumerate()
            .map(|(i, (label, count))| ChartPoint::colored(*label, count as f64, palette_color(i)))
            .collect()
    }

    fn grade_distribution(grades: Option<&[GradeCount]>) -> Vec<ChartPoint> {
        match grades {
            Some(grades) if !grades.is_empty() => colored_counts(
                grades
                    .iter()
                    .map(|g| (g.grade.clone(), g.count))
                    .collect(),
            ),
            _ => zero_colored_series(DEFAULT_GRADE_LABELS),
        }
    }

    fn major_distribution(grades: Option<&[GradeCount]>, students: Option<u64>) -> Vec<ChartPoint> {
        match grades {
            None => zero_colored_series(DEFAULT_MAJOR_LABELS),
            Some(grades) if grades.is_empty() => {
                colored_counts(heuristics::default_major_split(students.unwrap_or(0)))
            }
            Some(grades) => colored_counts(heuristics::merge_majors(grades)),
        }
    }

    fn recent_activities(inputs: &Inputs, now: NaiveDateTime) -> Vec<RecentActivity> {
        let activity = |title: &str, description: String, operator: &str, ago: Duration| {
            RecentActivity {
                title: title.to_string(),
                description,
                operator: operator.to_string(),
                time: now - ago,
            }
        };

        match (inputs.students, inputs.courses, inputs.payments.as_ref()) {
            (Some(students), Some(courses), Some(payments)) => vec![
                activity(
                    "系统统计",
                    format!("当前系统共有 {} 名学生", students),
                    "系统管理员",
                    Duration::minutes(30),
                ),
                activity(
                    "课程统计",
                    format!("系统共开设 {} 门课程", courses),
                    "教务老师",
                    Duration::hours(1),
                ),
                activity(
                    "缴费统计",
                    format!("成功缴费记录 {} 条", payments.success_records),
                    "财务老师",
                    Duration::hours(2),
                ),
                activity(
                    "数据更新",
                    "仪表盘数据已更新".to_string(),
                    "系统",
                    Duration::hours(3),
                ),
            ],
            _ => vec![activity(
                "系统状态",
                "系统运行正常".to_string(),
                "系统管理员",
                Duration::zero(),
            )],
        }
    }

    fn system_notifications(now: NaiveDateTime) -> Vec<SystemNotification> {
        [
            ("数据备份提醒", "系统将在今晚2:00进行自动数据备份。", "系统管理员", Duration::hours(3)),
            ("新学期开始", "新学期即将开始，请检查课程安排。", "教务处", Duration::days(1)),
            ("系统更新完成", "智慧校园管理系统已完成版本更新。", "技术部", Duration::days(3)),
            ("缴费提醒", "本月学费缴纳截止日期为月底，请及时提醒学生。", "财务处", Duration::days(5)),
            ("安全更新", "系统安全补丁已安装，请重启相关服务。", "技术部", Duration::weeks(1)),
        ]
        .into_iter()
        .map(|(title, content, publisher, ago)| SystemNotification {
            title: title.to_string(),
            content: content.to_string(),
            publisher: publisher.to_string(),
            time: now - ago,
        })
        .collect()
    }
}
