//! Training recording and training type catalogue.

use serde_json::json;
use tracing::{info, warn};

use crate::domain::person_accounts::{find_by_username, map_store_error};
use crate::domain::ports::{GymStores, RecordStore};
use crate::domain::{
    Error, PersonRecord, RecordQuery, TraceId, Training, TrainingDraft, TrainingDuration,
    TrainingId, TrainingType, TrainingTypeName, Username,
};

/// Request to record a training between two registered people.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTraining {
    pub trainee: Username,
    pub trainer: Username,
    pub name: String,
    pub training_type: TrainingTypeName,
    pub date: chrono::NaiveDate,
    pub duration: TrainingDuration,
}

/// Return the training type called `name`, creating it on first use.
pub(crate) async fn ensure_training_type(
    store: &dyn RecordStore<TrainingType>,
    trace_id: TraceId,
    name: &TrainingTypeName,
) -> Result<TrainingType, Error> {
    if let Some(existing) = store.find_by_id(name).await.map_err(map_store_error)? {
        return Ok(existing);
    }
    let created = store
        .create(TrainingType::new(name.clone()))
        .await
        .map_err(map_store_error)?;
    info!(%trace_id, training_type = %name, "training type created");
    Ok(created)
}

/// Training service over the shared gym stores.
#[derive(Clone)]
pub struct TrainingService {
    stores: GymStores,
}

impl TrainingService {
    /// Service over `stores`.
    pub fn new(stores: GymStores) -> Self {
        Self { stores }
    }

    /// Record a training.
    ///
    /// Returns `Ok(None)` when either participant is unknown. A training with
    /// the same trainee, trainer, and date already on record is a conflict;
    /// the stored one is left untouched.
    pub async fn create(
        &self,
        trace_id: TraceId,
        request: NewTraining,
    ) -> Result<Option<Training>, Error> {
        let NewTraining {
            trainee,
            trainer,
            name,
            training_type,
            date,
            duration,
        } = request;

        let Some(trainee_record) = find_by_username(self.stores.trainees.as_ref(), &trainee).await?
        else {
            warn!(%trace_id, username = %trainee, "training for unknown trainee");
            return Ok(None);
        };
        let Some(trainer_record) = find_by_username(self.stores.trainers.as_ref(), &trainer).await?
        else {
            warn!(%trace_id, username = %trainer, "training with unknown trainer");
            return Ok(None);
        };

        let training = Training::new(TrainingDraft {
            trainee_id: trainee_record.id(),
            trainer_id: trainer_record.id(),
            name,
            training_type,
            date,
            duration,
        })
        .map_err(|err| Error::invalid_request(err.to_string()))?;

        if self
            .stores
            .trainings
            .find_by_id(&training.id())
            .await
            .map_err(map_store_error)?
            .is_some()
        {
            warn!(
                %trace_id,
                id = %training.id(),
                %trainee,
                %trainer,
                %date,
                "training with the same participants and date already recorded"
            );
            return Err(Error::conflict("training already recorded").with_details(json!({
                "trainingId": training.id().get(),
                "trainee": trainee.as_ref(),
                "trainer": trainer.as_ref(),
                "date": date.to_string(),
            })));
        }

        ensure_training_type(
            self.stores.training_types.as_ref(),
            trace_id,
            training.training_type(),
        )
        .await?;
        let stored = self
            .stores
            .trainings
            .create(training)
            .await
            .map_err(map_store_error)?;
        info!(%trace_id, id = %stored.id(), %trainee, %trainer, "training recorded");
        Ok(Some(stored))
    }

    /// Fetch a training by its identifier.
    pub async fn select(
        &self,
        trace_id: TraceId,
        id: TrainingId,
    ) -> Result<Option<Training>, Error> {
        let found = self
            .stores
            .trainings
            .find_by_id(&id)
            .await
            .map_err(map_store_error)?;
        if found.is_none() {
            warn!(%trace_id, %id, "training not found");
        }
        Ok(found)
    }

    /// Every known training type.
    pub async fn training_types(&self, trace_id: TraceId) -> Result<Vec<TrainingType>, Error> {
        let types = self
            .stores
            .training_types
            .find_by(RecordQuery::all())
            .await
            .map_err(map_store_error)?;
        info!(%trace_id, count = types.len(), "training types listed");
        Ok(types)
    }
}
