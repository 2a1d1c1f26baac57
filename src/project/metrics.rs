//! Completion counts and logging streaks.
//!
//! Everything here is a pure function of the tasks, the logs and an explicit
//! "now", so results are reproducible in tests. Log dates are treated as
//! midnight UTC instants and day counts are floor divisions of millisecond
//! differences.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::daily_log::LogEntry;
use crate::task::Task;

/// Milliseconds in one day.
pub const DAY_MS: i64 = 86_400_000;

/// Sentinel for `last_log_days` when there are no logs.
pub const NO_LOGS: i64 = -1;

/// Derived project metrics. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMetrics {
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub last_log_date: Option<NaiveDate>,
    /// Whole days since the most recent log, or [`NO_LOGS`]. A log dated
    /// after "now" counts as 0.
    pub last_log_days: i64,
    pub consecutive_log_days: usize,
    pub total_logs: usize,
}

impl Default for ProjectMetrics {
    fn default() -> Self {
        Self {
            total_tasks: 0,
            completed_tasks: 0,
            last_log_date: None,
            last_log_days: NO_LOGS,
            consecutive_log_days: 0,
            total_logs: 0,
        }
    }
}

impl ProjectMetrics {
    /// Tasks not yet completed.
    #[must_use]
    pub fn pending_tasks(&self) -> usize {
        self.total_tasks.saturating_sub(self.completed_tasks)
    }

    /// Completed tasks as a percentage of all tasks (0.0 when there are none).
    #[must_use]
    pub fn completion_percentage(&self) -> f64 {
        if self.total_tasks == 0 {
            0.0
        } else {
            (self.completed_tasks as f64 / self.total_tasks as f64) * 100.0
        }
    }
}

fn midnight_ms(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp_millis()
}

/// Whole days from `earlier` to `later`, floored.
#[must_use]
pub fn days_between(later_ms: i64, earlier_ms: i64) -> i64 {
    (later_ms - earlier_ms).div_euclid(DAY_MS)
}

/// Length of the logging streak ending at the most recent date.
///
/// `dates` must be sorted newest first. Walks back while each date is at most
/// one day before the previous counted one; the first gap of two or more days
/// ends the walk. Repeated dates each count.
#[must_use]
pub fn streak_length(dates: &[NaiveDate]) -> usize {
    let Some(&first) = dates.first() else {
        return 0;
    };

    let mut current = midnight_ms(first);
    let mut streak = 0;
    for date in dates {
        let ms = midnight_ms(*date);
        if days_between(current, ms) > 1 {
            break;
        }
        streak += 1;
        current = ms;
    }
    streak
}

/// Compute metrics from scratch.
///
/// # Example
///
/// ```
/// use chrono::{NaiveDate, TimeZone, Utc};
/// use pilot::daily_log::LogEntry;
/// use pilot::project::metrics::compute_metrics;
///
/// let day = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
/// let logs: Vec<_> = [10, 9, 8, 5]
///     .into_iter()
///     .map(|d| LogEntry::new(day(d), format!("5-logs/2024-01-{d:02}.md")))
///     .collect();
/// let now = Utc.with_ymd_and_hms(2024, 1, 12, 9, 0, 0).unwrap();
///
/// let metrics = compute_metrics(&[], &logs, now);
/// assert_eq!(metrics.consecutive_log_days, 3);
/// assert_eq!(metrics.last_log_days, 2);
/// ```
#[must_use]
pub fn compute_metrics(tasks: &[Task], logs: &[LogEntry], now: DateTime<Utc>) -> ProjectMetrics {
    let mut dates: Vec<NaiveDate> = logs.iter().map(|l| l.date).collect();
    dates.sort_unstable_by(|a, b| b.cmp(a));

    let last_log_date = dates.first().copied();
    let last_log_days = last_log_date.map_or(NO_LOGS, |d| {
        days_between(now.timestamp_millis(), midnight_ms(d)).max(0)
    });

    ProjectMetrics {
        total_tasks: tasks.len(),
        completed_tasks: tasks.iter().filter(|t| t.completed).count(),
        last_log_date,
        last_log_days,
        consecutive_log_days: streak_length(&dates),
        total_logs: logs.len(),
    }
}
