//! Outbound adapters implementing domain ports.
//!
//! - **memory**: in-process record stores sharing ids and usernames
//! - **persistence**: PostgreSQL record stores using Diesel ORM
//! - **password**: random password generation
//!
//! Adapters translate between domain types and their backing technology.
//! They contain no business logic.

pub mod memory;
pub mod password;
pub mod persistence;
