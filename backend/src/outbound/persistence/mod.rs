//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! This module provides concrete implementations of domain repository ports
//! backed by PostgreSQL via the Diesel ORM with async support through
//! `diesel-async` and `bb8` connection pooling.
//!
//! # Architecture
//!
//! - **Thin adapters**: Repository implementations only translate between
//!   Diesel models and domain types. No business logic resides here.
//! - **Internal models**: Diesel row structs (`models.rs`) and schema
//!   definitions (`schema.rs`) are internal implementation details, never
//!   exposed to the domain layer.
//! - **Async-safe pooling**: Connections are managed via `bb8` pools with
//!   proper async integration through `diesel-async`.
//! - **Strongly typed errors**: All database errors are mapped to the port
//!   error types the domain services expect.
//!
//! # Example
//!
//! ```ignore
//! use backend::outbound::persistence::{DbPool, PoolConfig, DieselProgramRepository};
//!
//! let config = PoolConfig::new("postgres://localhost/coachup");
//! let pool = DbPool::new(config).await?;
//! let programs = DieselProgramRepository::new(pool);
//! ```

mod diesel_assignment_repository;
mod diesel_coaching_repository;
pub(crate) mod diesel_error_mapping;
mod diesel_exercise_repository;
mod diesel_program_repository;
mod diesel_user_repository;
mod diesel_workout_log_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_assignment_repository::DieselAssignmentRepository;
pub use diesel_coaching_repository::DieselCoachingRepository;
pub use diesel_exercise_repository::DieselExerciseRepository;
pub use diesel_program_repository::DieselProgramRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use diesel_workout_log_repository::DieselWorkoutLogRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
