//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod password_generator;
mod record_store;
mod username_registry;

#[cfg(test)]
pub use password_generator::MockPasswordGenerator;
pub use password_generator::{FixturePasswordGenerator, PasswordGenerator};
pub use record_store::{GymStores, Record, RecordStore, StoreError};
#[cfg(test)]
pub use username_registry::MockUsernameRegistry;
pub use username_registry::{FixtureUsernameRegistry, UsernameRegistry};
