//! Copyright (c) 2025, Kirky.X
//!
//! MIT License
//!
//! 该模块包含仪表板统计使用的启发式计算函数。
//!
//! 所有函数都是纯函数，时间由调用方传入，结果可重复。

use crate::config::HeuristicsConfig;
use crate::snapshot::GradeCount;
use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};

/// 图表调色板
pub const PALETTE: [&str; 5] = ["#4e73df", "#1cc88a", "#36b9cc", "#f6c23e", "#e74a3b"];

/// 课程类型占比：必修、选修、实践，剩余为理论课
const COURSE_TYPE_SHARES: [f64; 3] = [0.55, 0.25, 0.15];

/// 无法识别专业时的默认专业占比
pub const DEFAULT_MAJOR_SHARES: [(&str, f64); 5] = [
    ("计算机科学与技术", 0.35),
    ("软件工程", 0.25),
    ("数据科学与大数据", 0.20),
    ("人工智能", 0.15),
    ("其他专业", 0.05),
];

/// 专业关键字表，按顺序匹配
const MAJOR_KEYWORDS: [(&[&str], &str); 6] = [
    (&["计算机", "软件"], "计算机科学"),
    (&["电子", "通信"], "电子工程"),
    (&["机械", "自动化"], "机械工程"),
    (&["经济", "管理"], "经济管理"),
    (&["外语", "英语"], "外国语言"),
    (&["数学", "统计"], "数学统计"),
];

const UNKNOWN_MAJOR: &str = "其他专业";

pub fn palette_color(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

/// 四舍五入到两位小数
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn round_u64(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        value.round() as u64
    } else {
        0
    }
}

/// 围绕当前位置的启发式分布
///
/// 位置从1开始。不晚于当前位置的桶按比例增长到总数，
/// 之后的桶按 `growth_rate` 线性外推。
///
/// # 参数
///
/// * `total` - 当前总量
/// * `current` - 当前位置，超出范围时截断到 `[1, buckets]`
/// * `buckets` - 桶数量
/// * `growth_rate` - 每个未来桶的增长率
pub fn heuristic_distribution(total: u64, current: u32, buckets: u32, growth_rate: f64) -> Vec<u64> {
    if total == 0 {
        return vec![0; buckets as usize];
    }
    let current = current.clamp(1, buckets.max(1));
    let total = total as f64;
    (1..=buckets)
        .map(|index| {
            if index <= current {
                round_u64(total * f64::from(index) / f64::from(current))
            } else {
                round_u64(total * (1.0 + f64::from(index - current) * growth_rate))
            }
        })
        .collect()
}

/// 课程类型分布：必修、选修、实践、理论
pub fn course_type_split(total: u64) -> [u64; 4] {
    let [required, elective, practical] =
        COURSE_TYPE_SHARES.map(|share| round_u64(total as f64 * share));
    let theory = total.saturating_sub(required + elective + practical);
    [required, elective, practical, theory]
}

/// 按关键字从年级名称推断专业
pub fn major_from_grade(grade: &str) -> &'static str {
    MAJOR_KEYWORDS
        .iter()
        .find(|(words, _)| words.iter().any(|word| grade.contains(word)))
        .map(|(_, major)| *major)
        .unwrap_or(UNKNOWN_MAJOR)
}

/// 将年级计数合并为专业计数，保持首次出现的顺序
pub fn merge_majors(grades: &[GradeCount]) -> Vec<(String, u64)> {
    let mut merged: Vec<(String, u64)> = Vec::new();
    for grade in grades {
        let major = major_from_grade(&grade.grade);
        match merged.iter_mut().find(|(name, _)| name == major) {
            Some((_, count)) => *count += grade.count,
            None => merged.push((major.to_string(), grade.count)),
        }
    }
    merged
}

/// 按默认占比拆分学生总数
pub fn default_major_split(total_students: u64) -> Vec<(String, u64)> {
    DEFAULT_MAJOR_SHARES
        .iter()
        .map(|(name, share)| (name.to_string(), round_u64(total_students as f64 * share)))
        .collect()
}

/// 是否处于学期开始窗口
pub fn is_start_of_semester(date: NaiveDate) -> bool {
    let day = date.day();
    match date.month() {
        2 => day <= 28,
        3 => day <= 15,
        8 => day >= 15,
        9 => day <= 15,
        _ => false,
    }
}

/// 今日新增学生估算，月初与学期开始时更高
pub fn today_new_students(total: u64, date: NaiveDate, h: &HeuristicsConfig) -> u64 {
    let month_factor = 1.0 + f64::from(31 - date.day().min(31)) / 31.0;
    let semester = if is_start_of_semester(date) {
        h.semester_factor
    } else {
        1.0
    };
    round_u64(total as f64 * h.new_student_rate * month_factor * semester)
}

/// 今日缴费笔数估算
pub fn today_payments(success_records: u64, hour: u32, h: &HeuristicsConfig) -> u64 {
    let multiplier = match hour {
        9..=17 => h.payment_business_hours,
        19..=21 => h.payment_evening,
        _ => h.payment_off_hours,
    };
    round_u64(success_records as f64 * h.payment_rate * multiplier)
}

/// 今日收入估算（元，两位小数）
pub fn today_revenue(success_amount: f64, hour: u32, day: u32, h: &HeuristicsConfig) -> f64 {
    if !success_amount.is_finite() || success_amount <= 0.0 {
        return 0.0;
    }
    let time_factor = if (9..=17).contains(&hour) {
        h.revenue_business_hours
    } else {
        h.revenue_off_hours
    };
    let month_factor = 1.0 + f64::from(31 - day.min(31)) / 62.0;
    round2(success_amount * h.revenue_rate * time_factor * month_factor)
}

/// 在线用户估算，至少为1
pub fn online_users(active_users: u64, hour: u32, h: &HeuristicsConfig) -> u64 {
    let rate = match hour {
        8..=11 => h.online_morning,
        14..=17 => h.online_afternoon,
        19..=22 => h.online_evening,
        12..=13 => h.online_lunch,
        _ => h.online_night,
    };
    round_u64(active_users as f64 * rate).max(1)
}

/// 系统警告数：维护窗口、周末更新窗口以及高峰期整十分钟
pub fn system_alerts(now: NaiveDateTime) -> u32 {
    let hour = now.hour();
    if (2..=5).contains(&hour) {
        return 1;
    }
    let weekend = now.weekday().number_from_monday() >= 6;
    if weekend && (1..=3).contains(&hour) {
        return 1;
    }
    if (9..=11).contains(&hour) || (14..=16).contains(&hour) {
        return u32::from(now.minute() % 10 == 0);
    }
    0
}

/// 以人民币格式化金额，例如 `¥1,234.56`
pub fn format_currency(amount: f64) -> String {
    if !amount.is_finite() {
        return "¥0.00".to_string();
    }
    let cents = (amount.abs() * 100.0).round() as u64;
    let digits = (cents / 100).to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("¥{}{}.{:02}", sign, grouped, cents % 100)
}
