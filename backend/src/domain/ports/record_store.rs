//! Port for keyed record persistence, shared by every record kind.
//!
//! One generic trait covers trainees, trainers, trainings, and training
//! types. Each kind describes itself through [`Record`]: its key, the draft
//! a store turns into a stored record, and the fields it can be queried by.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{
    FieldValue, PersonId, PersonRecord, Predicate, RecordField, RecordKind, RecordQuery, Trainee,
    TraineeDraft, Trainer, TrainerDraft, Training, TrainingId, TrainingType, TrainingTypeName,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by record store adapters.
    pub enum StoreError {
        /// Store connection could not be established.
        Connection { message: String } => "record store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "record store query failed: {message}",
        /// A uniqueness constraint rejected the write.
        Conflict { message: String } => "record store conflict: {message}",
        /// The record kind has no such field.
        UnsupportedField { kind: RecordKind, field: RecordField } =>
            "{kind} records cannot be queried by {field}",
    }
}

/// A record kind a [`RecordStore`] can hold.
pub trait Record: Clone + Send + Sync + 'static {
    /// Identity used by `find_by_id`, `update`, and `delete`.
    type Key: Clone + fmt::Debug + fmt::Display + Send + Sync + 'static;
    /// What `create` accepts; the store completes it into a record.
    type Draft: Clone + Send + Sync + 'static;

    const KIND: RecordKind;
    /// Fields the kind can be queried by.
    const FIELDS: &'static [RecordField];

    fn key(&self) -> Self::Key;

    fn supports(field: RecordField) -> bool {
        Self::FIELDS.contains(&field)
    }

    /// First field in `query` the kind cannot be queried by.
    fn unsupported_field(query: &RecordQuery) -> Option<RecordField> {
        query
            .predicates()
            .iter()
            .map(Predicate::field)
            .find(|field| !Self::supports(*field))
    }

    /// Value of a queryable field, or `None` when the kind lacks it.
    fn field_value(&self, field: RecordField) -> Option<FieldValue>;
}

/// Port for storing and querying one record kind.
#[async_trait]
pub trait RecordStore<R: Record>: Send + Sync {
    /// Fetch a record by key.
    async fn find_by_id(&self, key: &R::Key) -> Result<Option<R>, StoreError>;

    /// Fetch all records matching `query`, in store order.
    async fn find_by(&self, query: RecordQuery) -> Result<Vec<R>, StoreError>;

    /// Persist a new record and return it as stored.
    async fn create(&self, draft: R::Draft) -> Result<R, StoreError>;

    /// Replace an existing record. Returns `false` when it is absent.
    async fn update(&self, record: &R) -> Result<bool, StoreError>;

    /// Remove a record. Returns `false` when it is absent.
    async fn delete(&self, key: &R::Key) -> Result<bool, StoreError>;
}

/// The four stores the gym services work against.
#[derive(Clone)]
pub struct GymStores {
    pub trainees: Arc<dyn RecordStore<Trainee>>,
    pub trainers: Arc<dyn RecordStore<Trainer>>,
    pub trainings: Arc<dyn RecordStore<Training>>,
    pub training_types: Arc<dyn RecordStore<TrainingType>>,
}

const PERSON_FIELDS: &[RecordField] = &[RecordField::Id, RecordField::Username, RecordField::Active];

fn person_field<P: PersonRecord>(person: &P, field: RecordField) -> Option<FieldValue> {
    let profile = person.profile();
    match field {
        RecordField::Id => Some(FieldValue::Id(person.id().get())),
        RecordField::Username => Some(FieldValue::Text(profile.username().as_ref().to_owned())),
        RecordField::Active => Some(FieldValue::Flag(profile.is_active())),
        RecordField::TraineeId | RecordField::TrainerId | RecordField::Name => None,
    }
}

impl Record for Trainee {
    type Key = PersonId;
    type Draft = TraineeDraft;

    const KIND: RecordKind = RecordKind::Trainee;
    const FIELDS: &'static [RecordField] = PERSON_FIELDS;

    fn key(&self) -> PersonId {
        self.id()
    }

    fn field_value(&self, field: RecordField) -> Option<FieldValue> {
        person_field(self, field)
    }
}

impl Record for Trainer {
    type Key = PersonId;
    type Draft = TrainerDraft;

    const KIND: RecordKind = RecordKind::Trainer;
    const FIELDS: &'static [RecordField] = PERSON_FIELDS;

    fn key(&self) -> PersonId {
        self.id()
    }

    fn field_value(&self, field: RecordField) -> Option<FieldValue> {
        person_field(self, field)
    }
}

impl Record for Training {
    type Key = TrainingId;
    // Training ids are derived before storage, so the draft is the record.
    type Draft = Training;

    const KIND: RecordKind = RecordKind::Training;
    const FIELDS: &'static [RecordField] = &[
        RecordField::Id,
        RecordField::TraineeId,
        RecordField::TrainerId,
        RecordField::Name,
    ];

    fn key(&self) -> TrainingId {
        self.id()
    }

    fn field_value(&self, field: RecordField) -> Option<FieldValue> {
        match field {
            RecordField::Id => Some(FieldValue::Id(self.id().get())),
            RecordField::TraineeId => Some(FieldValue::Id(self.trainee_id().get())),
            RecordField::TrainerId => Some(FieldValue::Id(self.trainer_id().get())),
            RecordField::Name => Some(FieldValue::Text(self.name().to_owned())),
            RecordField::Username | RecordField::Active => None,
        }
    }
}

impl Record for TrainingType {
    type Key = TrainingTypeName;
    type Draft = TrainingType;

    const KIND: RecordKind = RecordKind::TrainingType;
    const FIELDS: &'static [RecordField] = &[RecordField::Name];

    fn key(&self) -> TrainingTypeName {
        self.name().clone()
    }

    fn field_value(&self, field: RecordField) -> Option<FieldValue> {
        match field {
            RecordField::Name => Some(FieldValue::Text(self.name().as_ref().to_owned())),
            _ => None,
        }
    }
}
