use serde::{Deserialize, Serialize};

use crate::domain::entities::draft::{Draft, DraftReader, FieldErrors};
use crate::domain::entities::record::{FieldDef, FieldKind, FieldValue, Record};

pub const USER_ROLES: &[&str] = &["Admin", "User"];

const AVATAR_COUNT: i64 = 6;

static USER_SCHEMA: [FieldDef; 5] = [
    FieldDef::new("id", "ID", FieldKind::Number).read_only(),
    FieldDef::new("name", "Name", FieldKind::Text).required(),
    FieldDef::new("email", "Email", FieldKind::Text).required(),
    FieldDef::new("role", "Role", FieldKind::Enum(USER_ROLES)).required(),
    FieldDef::new("avatar", "Avatar", FieldKind::Text).read_only(),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: String,
    #[serde(default)]
    pub avatar: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPayload {
    pub name: String,
    pub email: String,
    pub role: String,
}

/// Avatars rotate through the bundled images by id.
pub fn avatar_for(id: i64) -> String {
    format!("/assets/avatar/{}.jpg", (id - 1).rem_euclid(AVATAR_COUNT) + 1)
}

impl Record for User {
    type Id = i64;
    type Payload = UserPayload;

    const RESOURCE: &'static str = "users";
    const ID_FIELD: &'static str = "id";
    const LABEL: &'static str = "user";

    fn schema() -> &'static [FieldDef] {
        &USER_SCHEMA
    }

    fn id(&self) -> i64 {
        self.id
    }

    fn value(&self, field: &str) -> Option<FieldValue> {
        match field {
            "id" => Some(FieldValue::Number(self.id as f64)),
            "name" => Some(FieldValue::text(&self.name)),
            "email" => Some(FieldValue::text(&self.email)),
            "role" => Some(FieldValue::text(&self.role)),
            "avatar" => Some(FieldValue::text(&self.avatar)),
            _ => None,
        }
    }

    fn payload_from_draft(draft: &Draft) -> Result<UserPayload, FieldErrors> {
        let mut reader = DraftReader::new(draft);
        let name = reader.required_text("name");
        let email = reader.required_text("email");
        if !email.is_empty() && !is_plausible_email(&email) {
            reader.reject("email", "must be an email address");
        }
        let role = reader.choice("role", USER_ROLES);
        reader.finish(UserPayload { name, email, role })
    }

    fn from_payload(id: i64, payload: UserPayload, existing: Option<&Self>) -> Self {
        let avatar = existing
            .map(|user| user.avatar.clone())
            .filter(|avatar| !avatar.is_empty())
            .unwrap_or_else(|| avatar_for(id));
        User {
            id,
            name: payload.name,
            email: payload.email,
            role: payload.role,
            avatar,
        }
    }

    fn next_id(existing: &[Self]) -> i64 {
        existing.iter().map(|user| user.id).max().unwrap_or(0) + 1
    }
}

fn is_plausible_email(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.ends_with('.'),
        None => false,
    }
}
