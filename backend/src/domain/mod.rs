//! Domain primitives, ports, and services for the gym roster.
//!
//! Purpose: model trainees, trainers, and trainings; assign usernames;
//! derive training identifiers; and filter training relationships. Adapters
//! live in `crate::outbound` and reach the domain only through `ports`.
//!
//! Public surface:
//! - Error (alias to `error::DomainError`) and ErrorCode.
//! - Person types (`Trainee`, `Trainer`, `Person`) and value objects.
//! - `Training`, `TrainingType`, and `training_identifier`.
//! - `RecordQuery` and its predicates.
//! - The trainee, trainer, and training services.

pub mod error;
pub mod gym_services;
pub mod person;
mod person_accounts;
pub mod person_directory;
pub mod ports;
pub mod query;
pub mod relationships;
pub mod trace_id;
pub mod trainee_service;
pub mod trainer_service;
pub mod training;
pub mod training_service;
pub mod username;

pub use self::error::{DomainError, DomainErrorValidationError, ErrorCode};
pub use self::gym_services::GymServices;
pub use self::person::{
    Password, Person, PersonId, PersonKind, PersonName, PersonProfile, PersonRecord,
    PersonValidationError, Trainee, TraineeDraft, Trainer, TrainerDraft, Username,
};
pub use self::person_directory::PersonDirectory;
pub use self::query::{FieldValue, Predicate, RecordField, RecordKind, RecordQuery};
pub use self::relationships::{DateRange, Participation, TrainingFilter};
pub use self::trace_id::TraceId;
pub use self::trainee_service::{NewTrainee, TraineeService};
pub use self::trainer_service::{NewTrainer, TrainerService};
pub use self::training::{
    Training, TrainingDraft, TrainingDuration, TrainingId, TrainingType, TrainingTypeName,
    TrainingValidationError, string_hash, training_identifier,
};
pub use self::training_service::{NewTraining, TrainingService};
pub use self::username::UsernameAssigner;

/// Domain error type returned by services.
pub type Error = DomainError;

impl From<PersonValidationError> for DomainError {
    fn from(value: PersonValidationError) -> Self {
        Self::invalid_request(value.to_string())
    }
}

impl From<TrainingValidationError> for DomainError {
    fn from(value: TrainingValidationError) -> Self {
        Self::invalid_request(value.to_string())
    }
}
