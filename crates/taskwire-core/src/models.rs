use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Completed,
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid task status: {0}")]
pub struct ParseTaskStatusError(String);

impl FromStr for TaskStatus {
    type Err = ParseTaskStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(TaskStatus::Pending),
            "completed" | "done" => Ok(TaskStatus::Completed),
            _ => Err(ParseTaskStatusError(s.to_string())),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskStatus::Pending => write!(f, "pending"),
            TaskStatus::Completed => write!(f, "completed"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
    Urgent,
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid task priority: {0}")]
pub struct ParseTaskPriorityError(String);

impl FromStr for TaskPriority {
    type Err = ParseTaskPriorityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(TaskPriority::Low),
            "medium" => Ok(TaskPriority::Medium),
            "high" => Ok(TaskPriority::High),
            "urgent" => Ok(TaskPriority::Urgent),
            _ => Err(ParseTaskPriorityError(s.to_string())),
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskPriority::Low => write!(f, "low"),
            TaskPriority::Medium => write!(f, "medium"),
            TaskPriority::High => write!(f, "high"),
            TaskPriority::Urgent => write!(f, "urgent"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub deadline: Option<DateTime<Utc>>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub archived: bool,
    pub time_required_minutes: Option<u32>,
    #[serde(default)]
    pub comments: Vec<String>,
    /// Series roots have `recurring = true` and no `parent_task_id`.
    #[serde(default)]
    pub recurring: bool,
    /// Occurrences point at their series root and carry `occurrence_index`,
    /// 1-based and unique within the series.
    pub parent_task_id: Option<Uuid>,
    pub occurrence_index: Option<u32>,
    pub rrule_string: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Default for Task {
    fn default() -> Self {
        Self {
            id: Uuid::now_v7(),
            title: String::new(),
            description: None,
            status: TaskStatus::Pending,
            priority: TaskPriority::Medium,
            deadline: None,
            category: String::new(),
            archived: false,
            time_required_minutes: None,
            comments: Vec::new(),
            recurring: false,
            parent_task_id: None,
            occurrence_index: None,
            rrule_string: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }
}

impl Task {
    pub fn is_series_root(&self) -> bool {
        self.recurring && self.parent_task_id.is_none()
    }

    pub fn is_occurrence(&self) -> bool {
        self.parent_task_id.is_some()
    }
}

/// Payload for creating a task.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NewTaskData {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_required_minutes: Option<u32>,
    /// When present the server creates a series root and the task becomes
    /// its template.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rrule: Option<String>,
}

/// Field-level changes to a task. `None` leaves a field alone; `Some(None)`
/// clears a clearable field; `Some(Some(v))` sets it.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TaskChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub description: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub deadline: Option<Option<DateTime<Utc>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archived: Option<bool>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub time_required_minutes: Option<Option<u32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub add_comment: Option<String>,
    /// Changing the recurrence rule requires `EditScope::EntireSeries`.
    /// `Some(None)` converts the series root back to a one-time task.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub rrule: Option<Option<String>>,
}

impl TaskChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.deadline.is_none()
            && self.category.is_none()
            && self.archived.is_none()
            && self.time_required_minutes.is_none()
            && self.add_comment.is_none()
            && self.rrule.is_none()
    }

    pub fn touches_rrule(&self) -> bool {
        self.rrule.is_some()
    }
}

/// Scope for edits and deletes on a recurring series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditScope {
    /// Affect only the selected occurrence.
    #[serde(rename = "this")]
    ThisOccurrence,
    /// Affect the selected occurrence and everything after it.
    #[serde(rename = "following")]
    ThisAndFollowing,
    /// Affect the series root and every occurrence.
    #[serde(rename = "all")]
    EntireSeries,
}

impl fmt::Display for EditScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditScope::ThisOccurrence => write!(f, "this"),
            EditScope::ThisAndFollowing => write!(f, "following"),
            EditScope::EntireSeries => write!(f, "all"),
        }
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid edit scope: {0} (expected this|following|all)")]
pub struct ParseEditScopeError(String);

impl FromStr for EditScope {
    type Err = ParseEditScopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "this" | "occurrence" => Ok(EditScope::ThisOccurrence),
            "following" | "future" => Ok(EditScope::ThisAndFollowing),
            "all" | "series" => Ok(EditScope::EntireSeries),
            _ => Err(ParseEditScopeError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Frequency::Daily => write!(f, "DAILY"),
            Frequency::Weekly => write!(f, "WEEKLY"),
            Frequency::Monthly => write!(f, "MONTHLY"),
            Frequency::Yearly => write!(f, "YEARLY"),
        }
    }
}

/// A recurrence rule: a frequency plus an optional end timestamp.
///
/// The wire form is the task's `rrule_string`, a restricted RRULE-style
/// string: `FREQ=<DAILY|WEEKLY|MONTHLY|YEARLY>[;UNTIL=<YYYYMMDDTHHMMSSZ>]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecurrenceRule {
    pub frequency: Frequency,
    pub until: Option<DateTime<Utc>>,
}

impl RecurrenceRule {
    pub fn new(frequency: Frequency) -> Self {
        Self {
            frequency,
            until: None,
        }
    }

    pub fn with_until(frequency: Frequency, until: DateTime<Utc>) -> Self {
        Self {
            frequency,
            until: Some(until),
        }
    }
}

const UNTIL_FORMAT: &str = "%Y%m%dT%H%M%SZ";

impl fmt::Display for RecurrenceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FREQ={}", self.frequency)?;
        if let Some(until) = self.until {
            write!(f, ";UNTIL={}", until.format(UNTIL_FORMAT))?;
        }
        Ok(())
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid recurrence rule '{0}': {1}")]
pub struct ParseRecurrenceRuleError(String, String);

impl FromStr for RecurrenceRule {
    type Err = ParseRecurrenceRuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = |msg: &str| ParseRecurrenceRuleError(s.to_string(), msg.to_string());

        let mut frequency = None;
        let mut until = None;
        for part in s.split(';').filter(|p| !p.is_empty()) {
            let (key, value) = part
                .split_once('=')
                .ok_or_else(|| err("expected KEY=VALUE parts"))?;
            match key.trim().to_uppercase().as_str() {
                "FREQ" => {
                    frequency = Some(match value.trim().to_uppercase().as_str() {
                        "DAILY" => Frequency::Daily,
                        "WEEKLY" => Frequency::Weekly,
                        "MONTHLY" => Frequency::Monthly,
                        "YEARLY" => Frequency::Yearly,
                        _ => return Err(err("unsupported FREQ")),
                    });
                }
                "UNTIL" => {
                    let parsed = NaiveDateTime::parse_from_str(value.trim(), UNTIL_FORMAT)
                        .map_err(|_| err("UNTIL must be YYYYMMDDTHHMMSSZ"))?;
                    until = Some(parsed.and_utc());
                }
                _ => return Err(err("unsupported rule part")),
            }
        }

        let frequency = frequency.ok_or_else(|| err("missing FREQ"))?;
        Ok(Self { frequency, until })
    }
}

/// Bound applied to expansion so that open-ended rules stay finite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Horizon {
    /// At most this many occurrences.
    Count(usize),
    /// Occurrences scheduled up to and including this instant.
    Until(DateTime<Utc>),
}

/// Applied when the caller has no opinion and the rule has no end date.
pub const DEFAULT_HORIZON_COUNT: usize = 30;

impl Default for Horizon {
    fn default() -> Self {
        Horizon::Count(DEFAULT_HORIZON_COUNT)
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    Dark,
    #[default]
    System,
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid theme mode: {0} (expected light|dark|system)")]
pub struct ParseThemeModeError(String);

impl FromStr for ThemeMode {
    type Err = ParseThemeModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "light" => Ok(ThemeMode::Light),
            "dark" => Ok(ThemeMode::Dark),
            "system" => Ok(ThemeMode::System),
            _ => Err(ParseThemeModeError(s.to_string())),
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThemeMode::Light => write!(f, "light"),
            ThemeMode::Dark => write!(f, "dark"),
            ThemeMode::System => write!(f, "system"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn edit_scope_parses_enumerated_values() {
        assert_eq!("this".parse::<EditScope>(), Ok(EditScope::ThisOccurrence));
        assert_eq!(
            "following".parse::<EditScope>(),
            Ok(EditScope::ThisAndFollowing)
        );
        assert_eq!("all".parse::<EditScope>(), Ok(EditScope::EntireSeries));
        assert!("everything".parse::<EditScope>().is_err());
    }

    #[test]
    fn rule_round_trips_through_display() {
        let until = Utc.with_ymd_and_hms(2026, 12, 31, 0, 0, 0).unwrap();
        let rule = RecurrenceRule::with_until(Frequency::Monthly, until);
        let rendered = rule.to_string();
        assert_eq!(rendered, "FREQ=MONTHLY;UNTIL=20261231T000000Z");
        assert_eq!(rendered.parse::<RecurrenceRule>().unwrap(), rule);
    }

    #[test]
    fn rule_without_until_round_trips() {
        let rule = RecurrenceRule::new(Frequency::Daily);
        assert_eq!(rule.to_string(), "FREQ=DAILY");
        assert_eq!("FREQ=DAILY".parse::<RecurrenceRule>().unwrap(), rule);
    }

    #[test]
    fn rule_rejects_malformed_input() {
        assert!("".parse::<RecurrenceRule>().is_err());
        assert!("FREQ=HOURLY".parse::<RecurrenceRule>().is_err());
        assert!("UNTIL=20261231T000000Z".parse::<RecurrenceRule>().is_err());
        assert!("FREQ=DAILY;UNTIL=tomorrow".parse::<RecurrenceRule>().is_err());
    }

    #[test]
    fn status_and_priority_parse() {
        assert_eq!("Pending".parse::<TaskStatus>(), Ok(TaskStatus::Pending));
        assert_eq!("urgent".parse::<TaskPriority>(), Ok(TaskPriority::Urgent));
        assert!("critical".parse::<TaskPriority>().is_err());
    }
}
