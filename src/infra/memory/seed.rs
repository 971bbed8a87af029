use anyhow::{Context, Result};

use crate::domain::entities::alarm::Alarm;
use crate::domain::entities::record::Record;
use crate::domain::entities::task::Task;
use crate::domain::entities::user::User;

const USERS_CSV: &str = include_str!("fixtures/users.csv");
const TASKS_CSV: &str = include_str!("fixtures/tasks.csv");
const ALARMS_CSV: &str = include_str!("fixtures/alarms.csv");

/// Parses CSV text whose header row names the record's serde fields.
pub fn parse_records<R: Record>(csv_text: &str) -> Result<Vec<R>> {
    let mut reader = csv::Reader::from_reader(csv_text.as_bytes());
    let mut records = Vec::new();
    for (row_idx, row) in reader.deserialize::<R>().enumerate() {
        let record = row.with_context(|| {
            format!("failed to parse {} fixture row {}", R::RESOURCE, row_idx + 1)
        })?;
        records.push(record);
    }
    Ok(records)
}

pub fn seed_users() -> Result<Vec<User>> {
    parse_records(USERS_CSV)
}

pub fn seed_tasks() -> Result<Vec<Task>> {
    parse_records(TASKS_CSV)
}

pub fn seed_alarms() -> Result<Vec<Alarm>> {
    parse_records(ALARMS_CSV)
}
