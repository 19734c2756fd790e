pub mod basic_auth;
pub mod config;
pub mod database;
pub mod logging;
pub mod security;
