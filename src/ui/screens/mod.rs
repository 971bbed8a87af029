pub mod alarms;
pub mod crud_screen;
pub mod tasks;
pub mod users;
