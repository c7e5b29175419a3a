pub mod config;
pub mod database;
pub mod persistence;
pub mod security;
pub mod telemetry;
