//! Gym roster backend: trainees, trainers, and their trainings.
//!
//! The `domain` module holds the model, ports, and services; `outbound`
//! holds the in-memory and PostgreSQL adapters; `config` loads runtime
//! settings.

pub mod config;
pub mod domain;
pub mod outbound;
