//! Username assignment.
//!
//! The candidate for Jane Doe is `Jane.Doe`. When it is held by any trainee or
//! trainer the assigner probes `Jane.Doe1`, `Jane.Doe2`, and so on, returning
//! the first free one. Assignment only reads; the store's unique constraint
//! settles races between concurrent registrations.

use std::sync::Arc;

use tracing::debug;

use crate::domain::ports::{StoreError, UsernameRegistry};
use crate::domain::{PersonName, Username};

/// Picks the first free username for a first/last name pair.
#[derive(Clone)]
pub struct UsernameAssigner {
    registry: Arc<dyn UsernameRegistry>,
}

impl UsernameAssigner {
    /// Assigner checking candidates against `registry`.
    pub fn new(registry: Arc<dyn UsernameRegistry>) -> Self {
        Self { registry }
    }

    /// Return `first.last`, or `first.last{n}` for the smallest free `n >= 1`.
    ///
    /// Store failures propagate unchanged.
    pub async fn assign(
        &self,
        first_name: &PersonName,
        last_name: &PersonName,
    ) -> Result<Username, StoreError> {
        let base = Username::from_names(first_name, last_name);
        if !self.registry.is_taken(&base).await? {
            return Ok(base);
        }
        let mut discriminator: u64 = 1;
        loop {
            let candidate = base.with_discriminator(discriminator);
            if !self.registry.is_taken(&candidate).await? {
                debug!(%base, %candidate, "username base taken; assigned discriminated candidate");
                return Ok(candidate);
            }
            discriminator += 1;
        }
    }
}
