pub mod api;
pub mod app_state;
pub mod config;
pub mod dashboard;
pub mod entities;
pub mod extractor;
pub mod health;
pub mod links;
pub mod llm;
pub mod measures;
pub mod repositories;
pub mod search;
pub mod suggest;
pub mod telemetry;
