//! Port answering whether a username is held by anyone, of either kind.

use async_trait::async_trait;

use crate::domain::Username;

use super::StoreError;

/// Single lookup spanning trainees and trainers.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsernameRegistry: Send + Sync {
    /// Whether any trainee or trainer currently holds `username`.
    async fn is_taken(&self, username: &Username) -> Result<bool, StoreError>;
}

/// Fixture implementation where every username is free.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUsernameRegistry;

#[async_trait]
impl UsernameRegistry for FixtureUsernameRegistry {
    async fn is_taken(&self, _username: &Username) -> Result<bool, StoreError> {
        Ok(false)
    }
}
