//! Account operations shared by the trainee and trainer services.
//!
//! Both person kinds are stored the same way, so lookups by username,
//! password changes, activation, and participation loading are written once
//! here, generic over the record kind.

use std::collections::HashMap;

use tracing::{info, warn};

use crate::domain::ports::{Record, RecordStore, StoreError};
use crate::domain::relationships::{Participation, counterpart_id, distinct_counterpart_ids};
use crate::domain::{
    Error, Password, PersonId, PersonRecord, RecordQuery, TraceId, Training, Username,
};

/// Map store failures into domain errors.
pub(crate) fn map_store_error(error: StoreError) -> Error {
    match error {
        StoreError::Connection { message } => {
            Error::service_unavailable(format!("record store unavailable: {message}"))
        }
        StoreError::Query { message } => Error::internal(format!("record store error: {message}")),
        StoreError::Conflict { message } => Error::conflict(message),
        StoreError::UnsupportedField { kind, field } => {
            Error::internal(format!("{kind} store cannot filter by {field}"))
        }
    }
}

pub(crate) async fn find_by_username<P>(
    store: &dyn RecordStore<P>,
    username: &Username,
) -> Result<Option<P>, Error>
where
    P: Record,
{
    let found = store
        .find_by(RecordQuery::by_username(username))
        .await
        .map_err(map_store_error)?;
    Ok(found.into_iter().next())
}

pub(crate) async fn change_password<P>(
    store: &dyn RecordStore<P>,
    trace_id: TraceId,
    username: &Username,
    password: Password,
) -> Result<bool, Error>
where
    P: Record + PersonRecord,
{
    let kind = <P as Record>::KIND;
    let Some(person) = find_by_username(store, username).await? else {
        warn!(%trace_id, %kind, %username, "password change for unknown person");
        return Ok(false);
    };
    let profile = person.profile().clone().with_password(password);
    let updated = store
        .update(&person.with_profile(profile))
        .await
        .map_err(map_store_error)?;
    if updated {
        info!(%trace_id, %kind, %username, "password changed");
    }
    Ok(updated)
}

pub(crate) async fn set_active<P>(
    store: &dyn RecordStore<P>,
    trace_id: TraceId,
    id: PersonId,
    active: bool,
) -> Result<bool, Error>
where
    P: Record<Key = PersonId> + PersonRecord,
{
    let kind = <P as Record>::KIND;
    let Some(person) = store.find_by_id(&id).await.map_err(map_store_error)? else {
        warn!(%trace_id, %kind, %id, "activation change for unknown person");
        return Ok(false);
    };
    let profile = person.profile().clone().with_active(active);
    let updated = store
        .update(&person.with_profile(profile))
        .await
        .map_err(map_store_error)?;
    if updated {
        info!(%trace_id, %kind, %id, active, "activation changed");
    }
    Ok(updated)
}

/// Pair each training with its counterpart's username.
///
/// Counterparts are only looked up when `resolve` is set; each distinct
/// counterpart is fetched once.
pub(crate) async fn participations<C>(
    trainings: Vec<Training>,
    counterparts: &dyn RecordStore<C>,
    resolve: bool,
) -> Result<Vec<Participation>, Error>
where
    C: Record<Key = PersonId> + PersonRecord,
{
    let subject = <C as PersonRecord>::KIND.counterpart();
    let mut usernames: HashMap<PersonId, Username> = HashMap::new();
    if resolve {
        for id in distinct_counterpart_ids(&trainings, subject) {
            if let Some(person) = counterparts.find_by_id(&id).await.map_err(map_store_error)? {
                usernames.insert(id, person.profile().username().clone());
            }
        }
    }
    Ok(trainings
        .into_iter()
        .map(|training| {
            let counterpart = usernames.get(&counterpart_id(&training, subject)).cloned();
            Participation {
                training,
                counterpart,
            }
        })
        .collect())
}

/// Delete every training in `trainings`, counting the ones removed.
pub(crate) async fn delete_trainings(
    store: &dyn RecordStore<Training>,
    trainings: &[Training],
) -> Result<usize, Error> {
    let mut removed = 0;
    for training in trainings {
        if store
            .delete(&training.id())
            .await
            .map_err(map_store_error)?
        {
            removed += 1;
        }
    }
    Ok(removed)
}
