//! Trainer account and training-history service.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::person_accounts::{
    change_password, delete_trainings, find_by_username, map_store_error, participations,
    set_active,
};
use crate::domain::ports::{GymStores, PasswordGenerator, RecordStore};
use crate::domain::relationships::{TrainingFilter, filter_trainings};
use crate::domain::training_service::ensure_training_type;
use crate::domain::{
    Error, Password, PersonId, PersonName, PersonProfile, PersonRecord, RecordQuery, TraceId,
    Trainer, TrainerDraft, Training, TrainingTypeName, Username, UsernameAssigner,
};

/// Registration details for a trainer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTrainer {
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub specialization: TrainingTypeName,
}

/// Trainer service over the shared gym stores.
#[derive(Clone)]
pub struct TrainerService {
    stores: GymStores,
    usernames: UsernameAssigner,
    passwords: Arc<dyn PasswordGenerator>,
}

impl TrainerService {
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

    /// Register a trainer, creating their specialization type if it is new.
    pub async fn create(&self, trace_id: TraceId, request: NewTrainer) -> Result<Trainer, Error> {
        let NewTrainer {
            first_name,
            last_name,
            specialization,
        } = request;
        ensure_training_type(self.stores.training_types.as_ref(), trace_id, &specialization)
            .await?;
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
        let trainer = self
            .stores
            .trainers
            .create(TrainerDraft {
                profile,
                specialization,
            })
            .await
            .map_err(map_store_error)?;
        info!(
            %trace_id,
            id = %trainer.id(),
            username = %trainer.profile().username(),
            "trainer created"
        );
        Ok(trainer)
    }

    /// Fetch a trainer by id.
    pub async fn select(&self, trace_id: TraceId, id: PersonId) -> Result<Option<Trainer>, Error> {
        let found = self
            .stores
            .trainers
            .find_by_id(&id)
            .await
            .map_err(map_store_error)?;
        if found.is_none() {
            warn!(%trace_id, %id, "trainer not found");
        }
        Ok(found)
    }

    /// Fetch a trainer by username.
    pub async fn select_by_username(
        &self,
        trace_id: TraceId,
        username: &Username,
    ) -> Result<Option<Trainer>, Error> {
        let found = find_by_username(self.stores.trainers.as_ref(), username).await?;
        if found.is_none() {
            warn!(%trace_id, %username, "trainer not found");
        }
        Ok(found)
    }

    /// Replace a trainer. A changed specialization is created if new.
    pub async fn update(&self, trace_id: TraceId, trainer: &Trainer) -> Result<bool, Error> {
        ensure_training_type(
            self.stores.training_types.as_ref(),
            trace_id,
            trainer.specialization(),
        )
        .await?;
        let updated = self
            .stores
            .trainers
            .update(trainer)
            .await
            .map_err(map_store_error)?;
        if updated {
            info!(%trace_id, id = %trainer.id(), "trainer updated");
        } else {
            warn!(%trace_id, id = %trainer.id(), "update of unknown trainer");
        }
        Ok(updated)
    }

    /// Delete a trainer together with their trainings.
    pub async fn delete_by_username(
        &self,
        trace_id: TraceId,
        username: &Username,
    ) -> Result<bool, Error> {
        let Some(trainer) = self.select_by_username(trace_id, username).await? else {
            return Ok(false);
        };
        let trainings = self
            .stores
            .trainings
            .find_by(RecordQuery::by_trainer(trainer.id()))
            .await
            .map_err(map_store_error)?;
        let removed = delete_trainings(self.stores.trainings.as_ref(), &trainings).await?;
        let deleted = self
            .stores
            .trainers
            .delete(&trainer.id())
            .await
            .map_err(map_store_error)?;
        if deleted {
            info!(%trace_id, %username, trainings = removed, "trainer deleted");
        }
        Ok(deleted)
    }

    /// Set a new password. Returns `false` for an unknown username.
    pub async fn change_password(
        &self,
        trace_id: TraceId,
        username: &Username,
        password: Password,
    ) -> Result<bool, Error> {
        change_password(self.stores.trainers.as_ref(), trace_id, username, password).await
    }

    /// Set the active flag. Returns `false` for an unknown id.
    pub async fn activate(
        &self,
        trace_id: TraceId,
        id: PersonId,
        active: bool,
    ) -> Result<bool, Error> {
        set_active(self.stores.trainers.as_ref(), trace_id, id, active).await
    }

    /// The trainer's trainings matching `filter`, in store order.
    pub async fn trainings(
        &self,
        trace_id: TraceId,
        username: &Username,
        filter: &TrainingFilter,
    ) -> Result<Vec<Training>, Error> {
        let Some(trainer) = self.select_by_username(trace_id, username).await? else {
            return Ok(Vec::new());
        };
        let trainings = self
            .stores
            .trainings
            .find_by(RecordQuery::by_trainer(trainer.id()))
            .await
            .map_err(map_store_error)?;
        let participations = participations(
            trainings,
            self.stores.trainees.as_ref(),
            filter.counterpart.is_some(),
        )
        .await?;
        let matched = filter_trainings(participations, filter);
        info!(%trace_id, %username, count = matched.len(), "trainer trainings filtered");
        Ok(matched)
    }
}
