//! Trainee account and training-history service.
//!
//! Lookups that find nothing are soft: they log a warning and return
//! `None`, `false`, or an empty list. Store failures are hard errors.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::domain::person_accounts::{
    change_password, delete_trainings, find_by_username, map_store_error, participations,
    set_active,
};
use crate::domain::ports::{GymStores, PasswordGenerator, RecordStore};
use crate::domain::relationships::{
    TrainingFilter, distinct_counterpart_ids, filter_trainings, unpaired_trainers_query,
};
use crate::domain::{
    Error, Password, PersonId, PersonKind, PersonName, PersonProfile, PersonRecord, RecordQuery,
    TraceId, Trainee, TraineeDraft, Trainer, Training, UsernameAssigner, Username,
};

/// Registration details for a trainee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTrainee {
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub date_of_birth: Option<NaiveDate>,
    pub address: Option<String>,
}

/// Trainee service over the shared gym stores.
#[derive(Clone)]
pub struct TraineeService {
    stores: GymStores,
    usernames: UsernameAssigner,
    passwords: Arc<dyn PasswordGenerator>,
}

impl TraineeService {
    /// Service over `stores`, assigning usernames and passwords on create.
    pub fn new(
        stores: GymStores,
        usernames: UsernameAssigner,
        passwords: Arc<dyn PasswordGenerator>,
    ) -> Self {
        Self {
            stores,
            usernames,
            passwords,
        }
    }

    /// Register a trainee with a fresh username and generated password.
    pub async fn create(&self, trace_id: TraceId, request: NewTrainee) -> Result<Trainee, Error> {
        let NewTrainee {
            first_name,
            last_name,
            date_of_birth,
            address,
        } = request;
        let username = self
            .usernames
            .assign(&first_name, &last_name)
            .await
            .map_err(map_store_error)?;
        let profile = PersonProfile::new(
            first_name,
            last_name,
            username,
            self.passwords.generate(),
            true,
        );
        let trainee = self
            .stores
            .trainees
            .create(TraineeDraft {
                profile,
                date_of_birth,
                address,
            })
            .await
            .map_err(map_store_error)?;
        info!(
            %trace_id,
            id = %trainee.id(),
            username = %trainee.profile().username(),
            "trainee created"
        );
        Ok(trainee)
    }

    /// Fetch a trainee by id.
    pub async fn select(&self, trace_id: TraceId, id: PersonId) -> Result<Option<Trainee>, Error> {
        let found = self
            .stores
            .trainees
            .find_by_id(&id)
            .await
            .map_err(map_store_error)?;
        if found.is_none() {
            warn!(%trace_id, %id, "trainee not found");
        }
        Ok(found)
    }

    /// Fetch a trainee by username.
    pub async fn select_by_username(
        &self,
        trace_id: TraceId,
        username: &Username,
    ) -> Result<Option<Trainee>, Error> {
        let found = find_by_username(self.stores.trainees.as_ref(), username).await?;
        if found.is_none() {
            warn!(%trace_id, %username, "trainee not found");
        }
        Ok(found)
    }

    /// Replace a trainee's stored details. Returns `false` when absent.
    pub async fn update(&self, trace_id: TraceId, trainee: &Trainee) -> Result<bool, Error> {
        let updated = self
            .stores
            .trainees
            .update(trainee)
            .await
            .map_err(map_store_error)?;
        if updated {
            info!(%trace_id, id = %trainee.id(), "trainee updated");
        } else {
            warn!(%trace_id, id = %trainee.id(), "update of unknown trainee");
        }
        Ok(updated)
    }

    /// Delete a trainee together with their trainings.
    pub async fn delete(&self, trace_id: TraceId, id: PersonId) -> Result<bool, Error> {
        let trainings = self
            .stores
            .trainings
            .find_by(RecordQuery::by_trainee(id))
            .await
            .map_err(map_store_error)?;
        let removed = delete_trainings(self.stores.trainings.as_ref(), &trainings).await?;
        let deleted = self
            .stores
            .trainees
            .delete(&id)
            .await
            .map_err(map_store_error)?;
        if deleted {
            info!(%trace_id, %id, trainings = removed, "trainee deleted");
        } else {
            warn!(%trace_id, %id, "delete of unknown trainee");
        }
        Ok(deleted)
    }

    /// Delete a trainee together with their trainings.
    pub async fn delete_by_username(
        &self,
        trace_id: TraceId,
        username: &Username,
    ) -> Result<bool, Error> {
        match self.select_by_username(trace_id, username).await? {
            Some(trainee) => self.delete(trace_id, trainee.id()).await,
            None => Ok(false),
        }
    }

    /// Set a new password. Returns `false` for an unknown username.
    pub async fn change_password(
        &self,
        trace_id: TraceId,
        username: &Username,
        password: Password,
    ) -> Result<bool, Error> {
        change_password(self.stores.trainees.as_ref(), trace_id, username, password).await
    }

    /// Set the active flag. Returns `false` for an unknown id.
    pub async fn activate(
        &self,
        trace_id: TraceId,
        id: PersonId,
        active: bool,
    ) -> Result<bool, Error> {
        set_active(self.stores.trainees.as_ref(), trace_id, id, active).await
    }

    /// The trainee's trainings matching `filter`, in store order.
    pub async fn trainings(
        &self,
        trace_id: TraceId,
        username: &Username,
        filter: &TrainingFilter,
    ) -> Result<Vec<Training>, Error> {
        let Some(trainings) = self.history(trace_id, username).await? else {
            return Ok(Vec::new());
        };
        let participations = participations(
            trainings,
            self.stores.trainers.as_ref(),
            filter.counterpart.is_some(),
        )
        .await?;
        let matched = filter_trainings(participations, filter);
        info!(%trace_id, %username, count = matched.len(), "trainee trainings filtered");
        Ok(matched)
    }

    /// Trainers the trainee has trained with, each once, in first-seen order.
    pub async fn assigned_trainers(
        &self,
        trace_id: TraceId,
        username: &Username,
    ) -> Result<Vec<Trainer>, Error> {
        let Some(trainings) = self.history(trace_id, username).await? else {
            return Ok(Vec::new());
        };
        let mut trainers = Vec::new();
        for id in distinct_counterpart_ids(&trainings, PersonKind::Trainee) {
            match self
                .stores
                .trainers
                .find_by_id(&id)
                .await
                .map_err(map_store_error)?
            {
                Some(trainer) => trainers.push(trainer),
                None => warn!(%trace_id, %id, "training references unknown trainer"),
            }
        }
        Ok(trainers)
    }

    /// Trainers the trainee has never trained with.
    pub async fn unassigned_trainers(
        &self,
        trace_id: TraceId,
        username: &Username,
    ) -> Result<Vec<Trainer>, Error> {
        let Some(trainings) = self.history(trace_id, username).await? else {
            return Ok(Vec::new());
        };
        let trainers = self
            .stores
            .trainers
            .find_by(unpaired_trainers_query(&trainings))
            .await
            .map_err(map_store_error)?;
        info!(%trace_id, %username, count = trainers.len(), "unassigned trainers listed");
        Ok(trainers)
    }

    async fn history(
        &self,
        trace_id: TraceId,
        username: &Username,
    ) -> Result<Option<Vec<Training>>, Error> {
        let Some(trainee) = self.select_by_username(trace_id, username).await? else {
            return Ok(None);
        };
        let trainings = self
            .stores
            .trainings
            .find_by(RecordQuery::by_trainee(trainee.id()))
            .await
            .map_err(map_store_error)?;
        Ok(Some(trainings))
    }
}

#[cfg(test)]
mod tests;
