//! Translation of domain predicates into boxed Diesel filters.
//!
//! Each table accepts a fixed set of fields. A predicate naming any other
//! field is rejected with `StoreError::UnsupportedField`; a supported field
//! compared against a value of the wrong shape is a query error.

use diesel::pg::Pg;
use diesel::prelude::*;

use crate::domain::ports::StoreError;
use crate::domain::{FieldValue, Predicate, RecordField, RecordKind};

use super::schema::{trainees, trainers, training_types, trainings};

fn mismatched(kind: RecordKind, field: RecordField, value: &FieldValue) -> StoreError {
    StoreError::query(format!(
        "{kind} field {field} cannot be compared with {value:?}"
    ))
}

fn excluded_ids(ids: &std::collections::BTreeSet<i64>) -> Vec<i64> {
    ids.iter().copied().collect()
}

/// Generate a predicate translator for a person table.
macro_rules! person_filter {
    ($fn_name:ident, $table:ident, $kind:expr) => {
        pub(super) fn $fn_name(
            query: $table::BoxedQuery<'static, Pg>,
            predicate: &Predicate,
        ) -> Result<$table::BoxedQuery<'static, Pg>, StoreError> {
            match predicate {
                Predicate::Equals { field, value } => match (field, value) {
                    (RecordField::Id, FieldValue::Id(id)) => Ok(query.filter($table::id.eq(*id))),
                    (RecordField::Username, FieldValue::Text(text)) => {
                        Ok(query.filter($table::username.eq(text.clone())))
                    }
                    (RecordField::Active, FieldValue::Flag(flag)) => {
                        Ok(query.filter($table::active.eq(*flag)))
                    }
                    (RecordField::Id | RecordField::Username | RecordField::Active, _) => {
                        Err(mismatched($kind, *field, value))
                    }
                    _ => Err(StoreError::unsupported_field($kind, *field)),
                },
                Predicate::Excludes {
                    field: RecordField::Id,
                    ids,
                } => Ok(query.filter($table::id.ne_all(excluded_ids(ids)))),
                Predicate::Excludes { field, .. } => {
                    Err(StoreError::unsupported_field($kind, *field))
                }
            }
        }
    };
}

person_filter!(trainee_filter, trainees, RecordKind::Trainee);
person_filter!(trainer_filter, trainers, RecordKind::Trainer);

pub(super) fn training_filter(
    query: trainings::BoxedQuery<'static, Pg>,
    predicate: &Predicate,
) -> Result<trainings::BoxedQuery<'static, Pg>, StoreError> {
    let kind = RecordKind::Training;
    match predicate {
        Predicate::Equals { field, value } => match (field, value) {
            (RecordField::Id, FieldValue::Id(id)) => Ok(query.filter(trainings::id.eq(*id))),
            (RecordField::TraineeId, FieldValue::Id(id)) => {
                Ok(query.filter(trainings::trainee_id.eq(*id)))
            }
            (RecordField::TrainerId, FieldValue::Id(id)) => {
                Ok(query.filter(trainings::trainer_id.eq(*id)))
            }
            (RecordField::Name, FieldValue::Text(text)) => {
                Ok(query.filter(trainings::name.eq(text.clone())))
            }
            (
                RecordField::Id | RecordField::TraineeId | RecordField::TrainerId | RecordField::Name,
                _,
            ) => Err(mismatched(kind, *field, value)),
            _ => Err(StoreError::unsupported_field(kind, *field)),
        },
        Predicate::Excludes { field, ids } => match field {
            RecordField::Id => Ok(query.filter(trainings::id.ne_all(excluded_ids(ids)))),
            RecordField::TraineeId => {
                Ok(query.filter(trainings::trainee_id.ne_all(excluded_ids(ids))))
            }
            RecordField::TrainerId => {
                Ok(query.filter(trainings::trainer_id.ne_all(excluded_ids(ids))))
            }
            _ => Err(StoreError::unsupported_field(kind, *field)),
        },
    }
}

pub(super) fn training_type_filter(
    query: training_types::BoxedQuery<'static, Pg>,
    predicate: &Predicate,
) -> Result<training_types::BoxedQuery<'static, Pg>, StoreError> {
    let kind = RecordKind::TrainingType;
    match predicate {
        Predicate::Equals {
            field: RecordField::Name,
            value: FieldValue::Text(text),
        } => Ok(query.filter(training_types::name.eq(text.clone()))),
        Predicate::Equals {
            field: RecordField::Name,
            value,
        } => Err(mismatched(kind, RecordField::Name, value)),
        other => Err(StoreError::unsupported_field(kind, other.field())),
    }
}
