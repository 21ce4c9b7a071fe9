//! Typed record queries understood by every record store.
//!
//! A [`RecordQuery`] is a conjunction of [`Predicate`]s over a closed set of
//! [`RecordField`]s. Adapters translate predicates into their own query
//! language; nothing ever interpolates field names into strings.

use std::collections::BTreeSet;
use std::fmt;

use super::person::{PersonId, Username};

/// Kind of record a store holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Trainee,
    Trainer,
    Training,
    TrainingType,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Trainee => "trainee",
            Self::Trainer => "trainer",
            Self::Training => "training",
            Self::TrainingType => "training type",
        };
        f.write_str(label)
    }
}

/// Queryable field. Not every record kind supports every field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordField {
    Id,
    Username,
    Active,
    TraineeId,
    TrainerId,
    Name,
}

impl fmt::Display for RecordField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Id => "id",
            Self::Username => "username",
            Self::Active => "active",
            Self::TraineeId => "trainee_id",
            Self::TrainerId => "trainer_id",
            Self::Name => "name",
        };
        f.write_str(label)
    }
}

/// Value compared against a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Id(i64),
    Text(String),
    Flag(bool),
}

/// A single condition in a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// `field = value`.
    Equals { field: RecordField, value: FieldValue },
    /// `field NOT IN ids`.
    Excludes {
        field: RecordField,
        ids: BTreeSet<i64>,
    },
}

impl Predicate {
    /// Field the predicate tests.
    pub fn field(&self) -> RecordField {
        match self {
            Self::Equals { field, .. } | Self::Excludes { field, .. } => *field,
        }
    }

    fn accepts(&self, actual: &FieldValue) -> bool {
        match self {
            Self::Equals { value, .. } => value == actual,
            Self::Excludes { ids, .. } => match actual {
                FieldValue::Id(id) => !ids.contains(id),
                FieldValue::Text(_) | FieldValue::Flag(_) => true,
            },
        }
    }
}

/// Conjunction of predicates. An empty query matches every record.
///
/// # Examples
/// ```
/// use gym_backend::domain::{FieldValue, RecordField, RecordQuery};
///
/// let query = RecordQuery::all().and_equals(RecordField::Active, FieldValue::Flag(true));
/// assert_eq!(query.predicates().len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordQuery {
    predicates: Vec<Predicate>,
}

impl RecordQuery {
    /// Query matching every record.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Records held by `username`.
    #[must_use]
    pub fn by_username(username: &Username) -> Self {
        Self::all().and_equals(
            RecordField::Username,
            FieldValue::Text(username.as_ref().to_owned()),
        )
    }

    /// Trainings attended by `trainee_id`.
    #[must_use]
    pub fn by_trainee(trainee_id: PersonId) -> Self {
        Self::all().and_equals(RecordField::TraineeId, FieldValue::Id(trainee_id.get()))
    }

    /// Trainings led by `trainer_id`.
    #[must_use]
    pub fn by_trainer(trainer_id: PersonId) -> Self {
        Self::all().and_equals(RecordField::TrainerId, FieldValue::Id(trainer_id.get()))
    }

    /// Records whose id is not in `ids`. An empty set yields [`Self::all`].
    #[must_use]
    pub fn excluding_ids(ids: BTreeSet<i64>) -> Self {
        if ids.is_empty() {
            return Self::all();
        }
        Self::all().and_excluding(RecordField::Id, ids)
    }

    /// Add a `field = value` condition.
    #[must_use]
    pub fn and_equals(mut self, field: RecordField, value: FieldValue) -> Self {
        self.predicates.push(Predicate::Equals { field, value });
        self
    }

    /// Add a `field NOT IN ids` condition.
    #[must_use]
    pub fn and_excluding(mut self, field: RecordField, ids: BTreeSet<i64>) -> Self {
        self.predicates.push(Predicate::Excludes { field, ids });
        self
    }

    /// Conditions, in the order added.
    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    /// Whether the query has no conditions.
    pub fn is_all(&self) -> bool {
        self.predicates.is_empty()
    }

    /// Evaluate the query against one record.
    ///
    /// `lookup` returns the record's value for a field, or `None` when the
    /// record kind has no such field; that field is reported as the error.
    pub fn evaluate<F>(&self, lookup: F) -> Result<bool, RecordField>
    where
        F: Fn(RecordField) -> Option<FieldValue>,
    {
        for predicate in &self.predicates {
            let field = predicate.field();
            let actual = lookup(field).ok_or(field)?;
            if !predicate.accepts(&actual) {
                return Ok(false);
            }
        }
        Ok(true)
    }
}
