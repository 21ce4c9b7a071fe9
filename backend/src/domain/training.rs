//! Training sessions, training types, and the deterministic training id.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::person::PersonId;

/// Validation errors for training value objects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrainingValidationError {
    EmptyTypeName,
    EmptyTrainingName,
    ZeroDuration,
}

impl fmt::Display for TrainingValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTypeName => write!(f, "training type name must not be empty"),
            Self::EmptyTrainingName => write!(f, "training name must not be empty"),
            Self::ZeroDuration => write!(f, "training duration must be positive"),
        }
    }
}

impl std::error::Error for TrainingValidationError {}

/// Identifier of a training, derived from its participants and date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrainingId(i64);

impl TrainingId {
    /// Wrap a stored identifier.
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

impl fmt::Display for TrainingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Name of a training type; also its identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TrainingTypeName(String);

impl TrainingTypeName {
    /// Validate and construct a [`TrainingTypeName`].
    pub fn new(name: impl Into<String>) -> Result<Self, TrainingValidationError> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(TrainingValidationError::EmptyTypeName);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for TrainingTypeName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for TrainingTypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<TrainingTypeName> for String {
    fn from(value: TrainingTypeName) -> Self {
        value.0
    }
}

impl TryFrom<String> for TrainingTypeName {
    type Error = TrainingValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Named training category. Created on first use and never removed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrainingType {
    name: TrainingTypeName,
}

impl TrainingType {
    /// Training type called `name`.
    #[must_use]
    pub fn new(name: TrainingTypeName) -> Self {
        Self { name }
    }

    /// Type name.
    pub fn name(&self) -> &TrainingTypeName {
        &self.name
    }
}

/// Training length in whole minutes, strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct TrainingDuration(u32);

impl TrainingDuration {
    /// Validate a positive duration in minutes.
    pub fn from_minutes(minutes: u32) -> Result<Self, TrainingValidationError> {
        if minutes == 0 {
            return Err(TrainingValidationError::ZeroDuration);
        }
        Ok(Self(minutes))
    }

    /// Length in minutes.
    #[must_use]
    pub const fn minutes(self) -> u32 {
        self.0
    }
}

impl From<TrainingDuration> for u32 {
    fn from(value: TrainingDuration) -> Self {
        value.0
    }
}

impl TryFrom<u32> for TrainingDuration {
    type Error = TrainingValidationError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::from_minutes(value)
    }
}

/// Fields of a training before its identifier is derived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingDraft {
    pub trainee_id: PersonId,
    pub trainer_id: PersonId,
    pub name: String,
    pub training_type: TrainingTypeName,
    pub date: NaiveDate,
    pub duration: TrainingDuration,
}

/// A recorded session between one trainee and one trainer. Immutable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Training {
    id: TrainingId,
    trainee_id: PersonId,
    trainer_id: PersonId,
    name: String,
    training_type: TrainingTypeName,
    date: NaiveDate,
    duration: TrainingDuration,
}

impl Training {
    /// Validate a draft and derive the identifier from its participants and
    /// date.
    pub fn new(draft: TrainingDraft) -> Result<Self, TrainingValidationError> {
        let TrainingDraft {
            trainee_id,
            trainer_id,
            name,
            training_type,
            date,
            duration,
        } = draft;
        if name.trim().is_empty() {
            return Err(TrainingValidationError::EmptyTrainingName);
        }
        Ok(Self {
            id: training_identifier(trainee_id, trainer_id, date),
            trainee_id,
            trainer_id,
            name,
            training_type,
            date,
            duration,
        })
    }

    /// Identifier derived from participants and date.
    pub fn id(&self) -> TrainingId {
        self.id
    }

    /// Trainee who attended.
    pub fn trainee_id(&self) -> PersonId {
        self.trainee_id
    }

    /// Trainer who led the session.
    pub fn trainer_id(&self) -> PersonId {
        self.trainer_id
    }

    /// Free-text session name.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Kind of training.
    pub fn training_type(&self) -> &TrainingTypeName {
        &self.training_type
    }

    /// Day the training took place.
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Session length.
    pub fn duration(&self) -> TrainingDuration {
        self.duration
    }
}

/// 32-bit polynomial string hash over UTF-16 code units (`h = 31*h + c`).
///
/// Stored training ids depend on this exact function; it must not change.
#[must_use]
pub fn string_hash(value: &str) -> i32 {
    value
        .encode_utf16()
        .fold(0_i32, |h, unit| h.wrapping_mul(31).wrapping_add(i32::from(unit)))
}

/// Derive the identifier of a training from its trainee, trainer, and date.
///
/// Stored records depend on this value: the accumulator starts at 7, folds
/// in both ids and the hash of the ISO date (`YYYY-MM-DD`) with wrapping
/// 64-bit arithmetic.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use gym_backend::domain::{PersonId, training_identifier};
///
/// let date = NaiveDate::from_ymd_opt(2024, 5, 1).expect("valid date");
/// let id = training_identifier(PersonId::new(1), PersonId::new(2), date);
/// assert_eq!(id.get(), -613_012_908);
/// ```
#[must_use]
pub fn training_identifier(trainee_id: PersonId, trainer_id: PersonId, date: NaiveDate) -> TrainingId {
    let date_hash = string_hash(&date.format("%Y-%m-%d").to_string());
    let acc = 7_i64;
    let acc = acc.wrapping_mul(31).wrapping_add(trainee_id.get());
    let acc = acc.wrapping_mul(31).wrapping_add(trainer_id.get());
    let acc = acc.wrapping_mul(31).wrapping_add(i64::from(date_hash));
    TrainingId(acc)
}
