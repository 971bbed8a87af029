pub mod components;
pub mod screens;
pub mod state;
pub mod styles;
pub mod view;
