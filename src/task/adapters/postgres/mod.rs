//! `PostgreSQL` adapters for task document persistence.

mod models;
mod repository;
mod schema;

pub use repository::{PostgresTaskStore, TaskPgPool};
