pub mod alarm;
pub mod draft;
pub mod query;
pub mod record;
pub mod task;
pub mod user;
