//! Tasks Domain
//!
//! This module provides a complete domain implementation for managing tasks.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Business logic, validation
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + Postgres/in-memory adapters)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Entities, DTOs
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_tasks::{
//!     handlers,
//!     postgres::PgTaskRepository,
//!     service::TaskService,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Connect to Postgres (see the `database` crate)
//! let db = sea_orm::Database::connect("postgres://localhost/todo").await?;
//!
//! // Create a repository and service
//! let repository = PgTaskRepository::new(db);
//! let service = TaskService::new(repository);
//!
//! // Create Axum router
//! let router = handlers::router(service);
//! # Ok(())
//! # }
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use error::{TaskError, TaskResult};
pub use handlers::ApiDoc;
pub use memory::MemoryTaskRepository;
pub use models::{CreateTask, NewTask, Task, TaskPatch};
pub use postgres::PgTaskRepository;
pub use repository::TaskRepository;
pub use service::TaskService;
