pub mod config;
pub mod mail;
pub mod media;
pub mod render;
pub mod services;
pub mod state;
pub mod store;
