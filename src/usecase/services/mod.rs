pub mod edit_service;
pub mod fetch_guard;
pub mod query_service;
