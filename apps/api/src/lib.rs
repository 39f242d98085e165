pub mod analytics;
pub mod config;
pub mod errors;
pub mod jobs;
pub mod models;
pub mod routes;
pub mod state;
