pub mod dialog;
pub mod timer;
