use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

lazy_static! {
    // At least one non-whitespace character.
    static ref NON_BLANK_REGEX: Regex = Regex::new(r"\S").unwrap();
}

/// Represents the priority of a task.
/// Corresponds to the `task_priority` SQL enum.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "task_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

/// Represents the status of a task.
/// Corresponds to the `task_status` SQL enum.
///
/// Any status may be replaced by any other; there is no transition table.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Initial state of every new task.
    #[default]
    Pending,
    #[sqlx(rename = "in-progress")]
    #[serde(rename = "in-progress")]
    InProgress,
    Completed,
}

/// Body of `POST /tasks` and `PUT /tasks/{id}`.
///
/// `due_date` and `priority` are optional at the type level so that their absence
/// surfaces as a validation message rather than a deserialization failure.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct TaskInput {
    #[validate(
        length(min = 1, max = 200),
        regex(path = "NON_BLANK_REGEX", message = "Title must not be blank")
    )]
    pub title: String,

    #[validate(length(max = 1000))]
    pub description: Option<String>,

    #[serde(deserialize_with = "due_date::deserialize")]
    pub due_date: Option<DateTime<Utc>>,

    pub priority: Option<TaskPriority>,
}

/// Body of `PATCH /tasks/{id}/status`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct StatusInput {
    pub status: Option<TaskStatus>,
}

/// Fields of a task about to be inserted. The owner is supplied separately.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub due_date: DateTime<Utc>,
    pub priority: TaskPriority,
}

/// A partial update. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub priority: Option<TaskPriority>,
    pub status: Option<TaskStatus>,
}

impl TaskInput {
    /// Checks field rules and required fields, producing the complete set of editable fields.
    pub fn into_new_task(self) -> Result<NewTask, crate::error::AppError> {
        let (due_date, priority) = match (self.due_date, self.priority) {
            (Some(due_date), Some(priority)) if !self.title.is_empty() => (due_date, priority),
            _ => {
                return Err(crate::error::AppError::ValidationError(
                    "Title, due date, and priority are required".into(),
                ))
            }
        };
        self.validate()?;
        Ok(NewTask {
            title: self.title,
            description: self.description.unwrap_or_default(),
            due_date,
            priority,
        })
    }
}

impl From<NewTask> for TaskPatch {
    fn from(task: NewTask) -> Self {
        TaskPatch {
            title: Some(task.title),
            description: Some(task.description),
            due_date: Some(task.due_date),
            priority: Some(task.priority),
            status: None,
        }
    }
}

/// Represents a task entity as stored and returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    /// Owning user. Never changes after creation.
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub due_date: DateTime<Utc>,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new `pending` task owned by `user_id`, stamped with the current time.
    pub fn new(input: NewTask, user_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            title: input.title,
            description: input.description,
            due_date: input.due_date,
            priority: input.priority,
            status: TaskStatus::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies the supplied fields and bumps `updated_at`.
    pub fn apply(&mut self, patch: TaskPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = due_date;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        self.updated_at = Utc::now();
    }

    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.status != TaskStatus::Completed && self.due_date < now
    }
}

/// Query parameters accepted by `GET /tasks`.
///
/// `status` and `priority` take the literal `all` to mean "no filter", which is what the
/// dashboard sends by default.
#[derive(Debug, Default, Deserialize)]
pub struct TaskQuery {
    pub status: Option<String>,
    pub priority: Option<String>,
    pub search: Option<String>,
}

/// Parsed form of `TaskQuery`, handed to the store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskFilter {
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    /// Case-insensitive substring of the title.
    pub search: Option<String>,
}

impl TryFrom<TaskQuery> for TaskFilter {
    type Error = crate::error::AppError;

    fn try_from(query: TaskQuery) -> Result<Self, Self::Error> {
        Ok(TaskFilter {
            status: parse_filter_value(query.status, "status")?,
            priority: parse_filter_value(query.priority, "priority")?,
            search: query
                .search
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
        })
    }
}

fn parse_filter_value<T: serde::de::DeserializeOwned>(
    value: Option<String>,
    field: &str,
) -> Result<Option<T>, crate::error::AppError> {
    match value.as_deref().map(str::trim) {
        None | Some("") | Some("all") => Ok(None),
        Some(raw) => serde_json::from_value(serde_json::Value::String(raw.to_string()))
            .map(Some)
            .map_err(|_| {
                crate::error::AppError::ValidationError(format!("Invalid {} filter: {}", field, raw))
            }),
    }
}

impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        self.status.map_or(true, |s| task.status == s)
            && self.priority.map_or(true, |p| task.priority == p)
            && self.search.as_ref().map_or(true, |needle| {
                task.title.to_lowercase().contains(&needle.to_lowercase())
            })
    }
}

/// Counters shown on the dashboard.
#[derive(Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    pub total: usize,
    pub pending: usize,
    pub in_progress: usize,
    pub completed: usize,
    /// Not completed and past the due date.
    pub overdue: usize,
}

impl TaskStats {
    pub fn from_tasks(tasks: &[Task], now: DateTime<Utc>) -> Self {
        tasks.iter().fold(TaskStats::default(), |mut stats, task| {
            stats.total += 1;
            match task.status {
                TaskStatus::Pending => stats.pending += 1,
                TaskStatus::InProgress => stats.in_progress += 1,
                TaskStatus::Completed => stats.completed += 1,
            }
            if task.is_overdue(now) {
                stats.overdue += 1;
            }
            stats
        })
    }
}

/// Lenient due-date parsing: RFC 3339, a naive `YYYY-MM-DDTHH:MM[:SS]` (taken as UTC),
/// or a bare `YYYY-MM-DD` (midnight UTC). Empty strings and `null` read as absent.
pub mod due_date {
    use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
    use serde::{de::Error, Deserialize, Deserializer};

    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        let raw = raw.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
            if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
                return Some(naive.and_utc());
            }
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(None),
            Some(raw) if raw.trim().is_empty() => Ok(None),
            Some(raw) => parse(&raw)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("invalid due date: {}", raw))),
        }
    }
}
