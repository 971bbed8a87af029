pub mod banner;
pub mod create_modal;
pub mod data_table;
pub mod filters;
pub mod pagination;
