use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::Duration;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeRange {
    #[serde(rename = "7d")]
    Week,
    #[default]
    #[serde(rename = "30d")]
    Month,
    #[serde(rename = "90d")]
    Quarter,
    #[serde(rename = "1y")]
    Year,
}

impl TimeRange {
    pub fn duration(&self) -> Duration {
        match self {
            TimeRange::Week => Duration::days(7),
            TimeRange::Month => Duration::days(30),
            TimeRange::Quarter => Duration::days(90),
            TimeRange::Year => Duration::days(365),
        }
    }
}

impl FromStr for TimeRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "7d" => Ok(TimeRange::Week),
            "30d" => Ok(TimeRange::Month),
            "90d" => Ok(TimeRange::Quarter),
            "1y" => Ok(TimeRange::Year),
            other => Err(format!("Unknown range '{}': use 7d, 30d, 90d or 1y", other)),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalyticsQuery {
    pub range: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClientTotals {
    pub total: i64,
    pub active: i64,
    pub completed: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TaskTotals {
    pub total: i64,
    pub completed: i64,
    pub pending: i64,
    pub overdue: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RecentActivity {
    pub new_clients: i64,
    pub new_tasks: i64,
    pub completed_tasks: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgencyAnalytics {
    pub range: TimeRange,
    pub clients: ClientTotals,
    pub tasks: TaskTotals,
    pub completion_rate: f64,
    pub client_completion_rate: f64,
    pub task_type_breakdown: BTreeMap<String, i64>,
    pub recent_activity: RecentActivity,
}
