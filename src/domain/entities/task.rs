use serde::{Deserialize, Serialize};

use crate::domain::entities::draft::{Draft, DraftReader, FieldErrors};
use crate::domain::entities::record::{FieldDef, FieldKind, FieldValue, Record};

pub const TASK_STATUSES: &[&str] = &["pending", "completed"];

static TASK_SCHEMA: [FieldDef; 5] = [
    FieldDef::new("id", "ID", FieldKind::Number).read_only(),
    FieldDef::new("title", "Title", FieldKind::Text).required(),
    FieldDef::new("description", "Description", FieldKind::Text),
    FieldDef::new("status", "Status", FieldKind::Enum(TASK_STATUSES)).required(),
    FieldDef::new("userId", "Assignee", FieldKind::Number).required(),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Completed,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Completed => "completed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(TaskStatus::Pending),
            "completed" => Some(TaskStatus::Completed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub status: TaskStatus,
    #[serde(rename = "userId")]
    pub user_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPayload {
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    #[serde(rename = "userId")]
    pub user_id: i64,
}

impl Record for Task {
    type Id = i64;
    type Payload = TaskPayload;

    const RESOURCE: &'static str = "tasks";
    const ID_FIELD: &'static str = "id";
    const LABEL: &'static str = "task";

    fn schema() -> &'static [FieldDef] {
        &TASK_SCHEMA
    }

    fn id(&self) -> i64 {
        self.id
    }

    fn value(&self, field: &str) -> Option<FieldValue> {
        match field {
            "id" => Some(FieldValue::Number(self.id as f64)),
            "title" => Some(FieldValue::text(&self.title)),
            "description" => Some(FieldValue::text(&self.description)),
            "status" => Some(FieldValue::text(self.status.as_str())),
            "userId" => Some(FieldValue::Number(self.user_id as f64)),
            _ => None,
        }
    }

    fn payload_from_draft(draft: &Draft) -> Result<TaskPayload, FieldErrors> {
        let mut reader = DraftReader::new(draft);
        let title = reader.required_text("title");
        let description = reader.text("description");
        let status = reader.choice("status", TASK_STATUSES);
        let user_id = reader.integer("userId");
        if user_id < 0 {
            reader.reject("userId", "must not be negative");
        }
        let status = TaskStatus::parse(&status).unwrap_or(TaskStatus::Pending);
        reader.finish(TaskPayload {
            title,
            description,
            status,
            user_id,
        })
    }

    fn from_payload(id: i64, payload: TaskPayload, _existing: Option<&Self>) -> Self {
        Task {
            id,
            title: payload.title,
            description: payload.description,
            status: payload.status,
            user_id: payload.user_id,
        }
    }

    fn next_id(existing: &[Self]) -> i64 {
        existing.iter().map(|task| task.id).max().unwrap_or(0) + 1
    }
}
