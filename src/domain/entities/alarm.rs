use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::entities::draft::{Draft, DraftReader, FieldErrors};
use crate::domain::entities::record::{FieldDef, FieldKind, FieldValue, Record};

pub const CALL_TYPES: &[&str] = &["Incoming", "Outgoing", "Missed"];
pub const CARRIERS: &[&str] = &["Verizon", "AT&T", "T-Mobile", "Sprint"];
pub const CALL_STATUSES: &[&str] = &["Completed", "Failed", "In Progress"];

const CALL_ID_PREFIX: &str = "CALL-";

static ALARM_SCHEMA: [FieldDef; 10] = [
    FieldDef::new("call_id", "Call ID", FieldKind::Text).read_only(),
    FieldDef::new("caller_number", "Caller", FieldKind::Text).required(),
    FieldDef::new("called_number", "Called", FieldKind::Text).required(),
    FieldDef::new("start_time", "Start", FieldKind::Timestamp).required(),
    FieldDef::new("end_time", "End", FieldKind::Timestamp).required(),
    FieldDef::new("duration_seconds", "Duration (s)", FieldKind::Number),
    FieldDef::new("call_type", "Call type", FieldKind::Enum(CALL_TYPES)).required(),
    FieldDef::new("carrier", "Carrier", FieldKind::Enum(CARRIERS)),
    FieldDef::new("charge_amount", "Charge", FieldKind::Number),
    FieldDef::new("call_status", "Status", FieldKind::Enum(CALL_STATUSES)),
];

/// One call-detail alarm. Identified by `call_id` rather than a numeric id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alarm {
    pub call_id: String,
    pub caller_number: String,
    pub called_number: String,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub duration_seconds: i64,
    pub call_type: String,
    pub carrier: String,
    pub charge_amount: f64,
    pub call_status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlarmPayload {
    pub caller_number: String,
    pub called_number: String,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub duration_seconds: i64,
    pub call_type: String,
    pub carrier: String,
    pub charge_amount: f64,
    pub call_status: String,
}

pub fn format_call_id(sequence: u32) -> String {
    format!("{CALL_ID_PREFIX}{sequence:04}")
}

fn call_sequence(call_id: &str) -> Option<u32> {
    call_id.strip_prefix(CALL_ID_PREFIX)?.parse().ok()
}

impl Record for Alarm {
    type Id = String;
    type Payload = AlarmPayload;

    const RESOURCE: &'static str = "alarms";
    const ID_FIELD: &'static str = "call_id";
    const LABEL: &'static str = "alarm";

    fn schema() -> &'static [FieldDef] {
        &ALARM_SCHEMA
    }

    fn id(&self) -> String {
        self.call_id.clone()
    }

    fn value(&self, field: &str) -> Option<FieldValue> {
        match field {
            "call_id" => Some(FieldValue::text(&self.call_id)),
            "caller_number" => Some(FieldValue::text(&self.caller_number)),
            "called_number" => Some(FieldValue::text(&self.called_number)),
            "start_time" => Some(FieldValue::Timestamp(self.start_time)),
            "end_time" => Some(FieldValue::Timestamp(self.end_time)),
            "duration_seconds" => Some(FieldValue::Number(self.duration_seconds as f64)),
            "call_type" => Some(FieldValue::text(&self.call_type)),
            "carrier" => Some(FieldValue::text(&self.carrier)),
            "charge_amount" => Some(FieldValue::Number(self.charge_amount)),
            "call_status" => Some(FieldValue::text(&self.call_status)),
            _ => None,
        }
    }

    fn payload_from_draft(draft: &Draft) -> Result<AlarmPayload, FieldErrors> {
        let mut reader = DraftReader::new(draft);
        let caller_number = reader.required_text("caller_number");
        let called_number = reader.required_text("called_number");
        let start_time = reader.timestamp("start_time");
        let end_time = reader.timestamp("end_time");
        if let (Some(start), Some(end)) = (start_time, end_time) {
            if end < start {
                reader.reject("end_time", "must not be before the start");
            }
        }
        let duration_seconds = reader.integer_or("duration_seconds", 0);
        if duration_seconds < 0 {
            reader.reject("duration_seconds", "must not be negative");
        }
        let call_type = reader.choice("call_type", CALL_TYPES);
        let carrier = reader.optional_choice("carrier", CARRIERS);
        let charge_amount = reader.number_or("charge_amount", 0.0);
        if charge_amount < 0.0 {
            reader.reject("charge_amount", "must not be negative");
        }
        let call_status = reader.optional_choice("call_status", CALL_STATUSES);

        let Some((start_time, end_time)) = start_time.zip(end_time) else {
            return Err(reader.into_errors());
        };
        reader.finish(AlarmPayload {
            caller_number,
            called_number,
            start_time,
            end_time,
            duration_seconds,
            call_type,
            carrier,
            charge_amount,
            call_status,
        })
    }

    fn from_payload(call_id: String, payload: AlarmPayload, _existing: Option<&Self>) -> Self {
        Alarm {
            call_id,
            caller_number: payload.caller_number,
            called_number: payload.called_number,
            start_time: payload.start_time,
            end_time: payload.end_time,
            duration_seconds: payload.duration_seconds,
            call_type: payload.call_type,
            carrier: payload.carrier,
            charge_amount: payload.charge_amount,
            call_status: payload.call_status,
        }
    }

    fn next_id(existing: &[Self]) -> String {
        let highest = existing
            .iter()
            .filter_map(|alarm| call_sequence(&alarm.call_id))
            .max()
            .unwrap_or(0);
        format_call_id(highest + 1)
    }
}
