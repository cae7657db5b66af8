pub mod chat;
pub mod color;
pub mod events;
pub mod query;
pub mod records;
pub mod summary;
pub mod terms;
