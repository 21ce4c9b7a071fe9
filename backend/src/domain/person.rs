//! People holding a gym account: trainees and trainers.
//!
//! Both kinds share one identity shape ([`PersonProfile`]) and one username
//! namespace. [`Person`] is the sum type used wherever code must reason about
//! either kind at once, such as the username registry.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::training::TrainingTypeName;

/// Validation errors returned by the person value-object constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersonValidationError {
    EmptyName,
    EmptyUsername,
    UsernamePadded,
    EmptyPassword,
}

impl fmt::Display for PersonValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "name must not be empty"),
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::UsernamePadded => {
                write!(f, "username must not start or end with whitespace")
            }
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for PersonValidationError {}

/// Store-assigned numeric identifier shared by trainees and trainers.
///
/// Trainees and trainers draw from one sequence, so an identifier never
/// names two people at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonId(i64);

impl PersonId {
    /// Wrap a raw store identifier.
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Raw identifier value.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// First or last name, trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PersonName(String);

impl PersonName {
    /// Validate and construct a [`PersonName`].
    pub fn new(name: impl Into<String>) -> Result<Self, PersonValidationError> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(PersonValidationError::EmptyName);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for PersonName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for PersonName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<PersonName> for String {
    fn from(value: PersonName) -> Self {
        value.0
    }
}

impl TryFrom<String> for PersonName {
    type Error = PersonValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Login handle, unique across trainees and trainers.
///
/// ## Invariants
/// - Non-empty.
/// - No leading or trailing whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Validate and construct a [`Username`].
    pub fn new(username: impl Into<String>) -> Result<Self, PersonValidationError> {
        let username = username.into();
        if username.is_empty() {
            return Err(PersonValidationError::EmptyUsername);
        }
        if username.trim() != username {
            return Err(PersonValidationError::UsernamePadded);
        }
        Ok(Self(username))
    }

    /// Base candidate for a person: `first.last`.
    ///
    /// [`PersonName`] trims its input, so surrounding whitespace never
    /// reaches the username: `" Jane"` and `"Doe "` give `Jane.Doe`.
    ///
    /// # Examples
    /// ```
    /// use gym_backend::domain::{PersonName, Username};
    ///
    /// let first = PersonName::new("Jane").expect("valid name");
    /// let last = PersonName::new("Doe").expect("valid name");
    /// assert_eq!(Username::from_names(&first, &last).as_ref(), "Jane.Doe");
    /// ```
    #[must_use]
    pub fn from_names(first_name: &PersonName, last_name: &PersonName) -> Self {
        // Both names are trimmed and non-empty, so the result is valid.
        Self(format!("{first_name}.{last_name}"))
    }

    /// Candidate with a numeric discriminator appended (`Jane.Doe3`).
    #[must_use]
    pub fn with_discriminator(&self, discriminator: u64) -> Self {
        Self(format!("{}{discriminator}", self.0))
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl TryFrom<String> for Username {
    type Error = PersonValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Opaque account password. `Debug` output is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    /// Validate and construct a [`Password`].
    pub fn new(password: impl Into<String>) -> Result<Self, PersonValidationError> {
        let password = password.into();
        if password.is_empty() {
            return Err(PersonValidationError::EmptyPassword);
        }
        Ok(Self(password))
    }

    /// Reveal the password, e.g. to hand freshly generated credentials back
    /// to the person who registered.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Which side of the username namespace a person lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonKind {
    Trainee,
    Trainer,
}

impl PersonKind {
    /// The other party of a training, seen from this kind.
    #[must_use]
    pub const fn counterpart(self) -> Self {
        match self {
            Self::Trainee => Self::Trainer,
            Self::Trainer => Self::Trainee,
        }
    }
}

impl fmt::Display for PersonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Trainee => f.write_str("trainee"),
            Self::Trainer => f.write_str("trainer"),
        }
    }
}

/// Identity fields shared by trainees and trainers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonProfile {
    first_name: PersonName,
    last_name: PersonName,
    username: Username,
    #[serde(skip_serializing)]
    password: Password,
    active: bool,
}

impl PersonProfile {
    /// Build a profile from validated components.
    #[must_use]
    pub fn new(
        first_name: PersonName,
        last_name: PersonName,
        username: Username,
        password: Password,
        active: bool,
    ) -> Self {
        Self {
            first_name,
            last_name,
            username,
            password,
            active,
        }
    }

    /// Given name.
    pub fn first_name(&self) -> &PersonName {
        &self.first_name
    }

    /// Family name.
    pub fn last_name(&self) -> &PersonName {
        &self.last_name
    }

    /// Login handle.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Current password.
    pub fn password(&self) -> &Password {
        &self.password
    }

    /// Whether the account may sign in.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Replace first and last name. The username is left untouched.
    #[must_use]
    pub fn with_names(mut self, first_name: PersonName, last_name: PersonName) -> Self {
        self.first_name = first_name;
        self.last_name = last_name;
        self
    }

    /// Profile with `password` replacing the current one.
    #[must_use]
    pub fn with_password(mut self, password: Password) -> Self {
        self.password = password;
        self
    }

    /// Profile with the active flag set to `active`.
    #[must_use]
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }
}

/// Behaviour shared by the two person record kinds.
pub trait PersonRecord: Clone + Send + Sync + 'static {
    /// Namespace side this record lives on.
    const KIND: PersonKind;

    fn id(&self) -> PersonId;

    fn profile(&self) -> &PersonProfile;

    /// Return the record with its profile replaced.
    #[must_use]
    fn with_profile(self, profile: PersonProfile) -> Self;
}

/// Fields needed to persist a new trainee; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraineeDraft {
    pub profile: PersonProfile,
    pub date_of_birth: Option<NaiveDate>,
    pub address: Option<String>,
}

/// A person attending trainings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Trainee {
    id: PersonId,
    #[serde(flatten)]
    profile: PersonProfile,
    #[serde(skip_serializing_if = "Option::is_none")]
    date_of_birth: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    address: Option<String>,
}

impl Trainee {
    /// Materialise a stored trainee.
    #[must_use]
    pub fn new(id: PersonId, draft: TraineeDraft) -> Self {
        let TraineeDraft {
            profile,
            date_of_birth,
            address,
        } = draft;
        Self {
            id,
            profile,
            date_of_birth,
            address,
        }
    }

    /// Date of birth, if recorded.
    pub fn date_of_birth(&self) -> Option<NaiveDate> {
        self.date_of_birth
    }

    /// Postal address, if recorded.
    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    /// Trainee with a replaced date of birth.
    #[must_use]
    pub fn with_date_of_birth(mut self, date_of_birth: Option<NaiveDate>) -> Self {
        self.date_of_birth = date_of_birth;
        self
    }

    /// Trainee with a replaced address.
    #[must_use]
    pub fn with_address(mut self, address: Option<String>) -> Self {
        self.address = address;
        self
    }
}

impl PersonRecord for Trainee {
    const KIND: PersonKind = PersonKind::Trainee;

    fn id(&self) -> PersonId {
        self.id
    }

    fn profile(&self) -> &PersonProfile {
        &self.profile
    }

    fn with_profile(mut self, profile: PersonProfile) -> Self {
        self.profile = profile;
        self
    }
}

/// Fields needed to persist a new trainer; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainerDraft {
    pub profile: PersonProfile,
    pub specialization: TrainingTypeName,
}

/// A person running trainings, specialised in one training type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Trainer {
    id: PersonId,
    #[serde(flatten)]
    profile: PersonProfile,
    specialization: TrainingTypeName,
}

impl Trainer {
    /// Materialise a stored trainer.
    #[must_use]
    pub fn new(id: PersonId, draft: TrainerDraft) -> Self {
        let TrainerDraft {
            profile,
            specialization,
        } = draft;
        Self {
            id,
            profile,
            specialization,
        }
    }

    /// Training type the trainer teaches.
    pub fn specialization(&self) -> &TrainingTypeName {
        &self.specialization
    }

    /// Trainer with a replaced specialization.
    #[must_use]
    pub fn with_specialization(mut self, specialization: TrainingTypeName) -> Self {
        self.specialization = specialization;
        self
    }
}

impl PersonRecord for Trainer {
    const KIND: PersonKind = PersonKind::Trainer;

    fn id(&self) -> PersonId {
        self.id
    }

    fn profile(&self) -> &PersonProfile {
        &self.profile
    }

    fn with_profile(mut self, profile: PersonProfile) -> Self {
        self.profile = profile;
        self
    }
}

/// Either kind of account holder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Person {
    Trainee(Trainee),
    Trainer(Trainer),
}

impl Person {
    /// Whether this is a trainee or a trainer.
    pub fn kind(&self) -> PersonKind {
        match self {
            Self::Trainee(_) => PersonKind::Trainee,
            Self::Trainer(_) => PersonKind::Trainer,
        }
    }

    /// Id shared across both kinds.
    pub fn id(&self) -> PersonId {
        match self {
            Self::Trainee(trainee) => trainee.id(),
            Self::Trainer(trainer) => trainer.id(),
        }
    }

    /// Account profile.
    pub fn profile(&self) -> &PersonProfile {
        match self {
            Self::Trainee(trainee) => trainee.profile(),
            Self::Trainer(trainer) => trainer.profile(),
        }
    }
}

impl From<Trainee> for Person {
    fn from(value: Trainee) -> Self {
        Self::Trainee(value)
    }
}

impl From<Trainer> for Person {
    fn from(value: Trainer) -> Self {
        Self::Trainer(value)
    }
}
