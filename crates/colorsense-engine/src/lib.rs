pub mod chat;
pub mod config;
pub mod ingest;
pub mod providers;
pub mod query;
pub mod store;
