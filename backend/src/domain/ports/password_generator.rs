//! Port producing initial passwords for newly registered people.

use crate::domain::Password;

/// Port producing passwords for new accounts.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordGenerator: Send + Sync {
    /// Produce a fresh password.
    fn generate(&self) -> Password;
}

/// Fixture generator returning a fixed password.
#[derive(Debug, Clone)]
pub struct FixturePasswordGenerator {
    password: Password,
}

impl FixturePasswordGenerator {
    /// Generator that always returns `password`.
    pub fn new(password: Password) -> Self {
        Self { password }
    }
}

impl PasswordGenerator for FixturePasswordGenerator {
    fn generate(&self) -> Password {
        self.password.clone()
    }
}
