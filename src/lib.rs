/// Basic application code
pub mod app;
/// SMTP client for outgoing mail
pub mod client;
/// Controllers for REST endpoints
pub mod controller;
/// Domain objects
pub mod domain;
/// Staff notifications for captured leads
pub mod notify;
/// Repositories
pub mod repo;
/// Application settings
pub mod settings;
/// Application telemetry for tracing and logging
pub mod telemetry;
