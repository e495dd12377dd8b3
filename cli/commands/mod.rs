pub mod config;
pub mod delete;
pub mod generate;
pub mod list;
pub mod render;
pub mod show;
