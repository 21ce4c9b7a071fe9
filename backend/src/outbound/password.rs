//! Random password generation.

use rand::distributions::Alphanumeric;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::domain::Password;
use crate::domain::ports::PasswordGenerator;

/// Length of generated passwords.
pub const PASSWORD_LENGTH: usize = 10;

/// Generates alphanumeric passwords from a freshly seeded RNG per call.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomPasswordGenerator;

impl PasswordGenerator for RandomPasswordGenerator {
    fn generate(&self) -> Password {
        let raw: String = SmallRng::from_entropy()
            .sample_iter(&Alphanumeric)
            .take(PASSWORD_LENGTH)
            .map(char::from)
            .collect();
        match Password::new(raw) {
            Ok(password) => password,
            // PASSWORD_LENGTH is non-zero, so the password is never empty.
            Err(err) => unreachable!("generated password rejected: {err}"),
        }
    }
}
