//! PostgreSQL record stores using Diesel ORM.
//!
//! Stores run on `diesel-async` with a `bb8` pool. Row structs and the
//! Diesel schema stay private to this module; only domain types cross the
//! port boundary.
//!
//! # Example
//!
//! ```ignore
//! use gym_backend::outbound::persistence::{DbPool, PoolConfig, postgres_gym};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/gym")).await?;
//! let stores = postgres_gym(pool);
//! ```

mod diesel_trainee_store;
mod diesel_trainer_store;
mod diesel_training_store;
mod migrations;
mod models;
mod pool;
mod query_filters;
mod schema;
mod store_error_mapping;

use std::sync::Arc;

use crate::domain::ports::GymStores;

pub use diesel_trainee_store::DieselTraineeStore;
pub use diesel_trainer_store::DieselTrainerStore;
pub use diesel_training_store::{DieselTrainingStore, DieselTrainingTypeStore};
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};

/// Bundle the four PostgreSQL stores over one pool.
pub fn postgres_gym(pool: DbPool) -> GymStores {
    GymStores {
        trainees: Arc::new(DieselTraineeStore::new(pool.clone())),
        trainers: Arc::new(DieselTrainerStore::new(pool.clone())),
        trainings: Arc::new(DieselTrainingStore::new(pool.clone())),
        training_types: Arc::new(DieselTrainingTypeStore::new(pool)),
    }
}
