pub mod config;
pub mod navigation;
pub mod notification;
