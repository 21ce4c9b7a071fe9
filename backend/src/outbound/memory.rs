//! In-memory record stores.
//!
//! Used by tests and by embedders that do not need PostgreSQL. The stores
//! of one [`InMemoryGym`] share an id sequence and a username set, so they
//! uphold the same cross-kind invariants as the database schema.

use std::collections::HashSet;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::domain::ports::{GymStores, Record, RecordStore, StoreError};
use crate::domain::{
    PersonDirectory, PersonId, PersonRecord, RecordQuery, Trainee, TraineeDraft, Trainer,
    TrainerDraft, Training, TrainingType, Username,
};

/// Record kinds the in-memory store knows how to complete from drafts.
pub trait MemoryRecord: Record {
    /// Turn a draft into a stored record, drawing ids from `sequence`.
    fn materialise(draft: Self::Draft, sequence: &AtomicI64) -> Self;

    /// Username held in the shared namespace, for person records.
    fn username(&self) -> Option<&Username> {
        None
    }
}

fn next_person_id(sequence: &AtomicI64) -> PersonId {
    PersonId::new(sequence.fetch_add(1, Ordering::Relaxed))
}

impl MemoryRecord for Trainee {
    fn materialise(draft: TraineeDraft, sequence: &AtomicI64) -> Self {
        Trainee::new(next_person_id(sequence), draft)
    }

    fn username(&self) -> Option<&Username> {
        Some(self.profile().username())
    }
}

impl MemoryRecord for Trainer {
    fn materialise(draft: TrainerDraft, sequence: &AtomicI64) -> Self {
        Trainer::new(next_person_id(sequence), draft)
    }

    fn username(&self) -> Option<&Username> {
        Some(self.profile().username())
    }
}

impl MemoryRecord for Training {
    fn materialise(draft: Training, _sequence: &AtomicI64) -> Self {
        draft
    }
}

impl MemoryRecord for TrainingType {
    fn materialise(draft: TrainingType, _sequence: &AtomicI64) -> Self {
        draft
    }
}

fn poisoned() -> StoreError {
    StoreError::query("in-memory store lock poisoned")
}

/// Thread-safe, insertion-ordered store for one record kind.
pub struct InMemoryRecordStore<R> {
    records: Arc<RwLock<Vec<R>>>,
    sequence: Arc<AtomicI64>,
    usernames: Arc<RwLock<HashSet<Username>>>,
}

impl<R> InMemoryRecordStore<R> {
    /// Standalone store with its own sequence and username set.
    pub fn new() -> Self {
        Self::sharing(
            Arc::new(AtomicI64::new(1)),
            Arc::new(RwLock::new(HashSet::new())),
        )
    }

    fn sharing(sequence: Arc<AtomicI64>, usernames: Arc<RwLock<HashSet<Username>>>) -> Self {
        Self {
            records: Arc::new(RwLock::new(Vec::new())),
            sequence,
            usernames,
        }
    }
}

impl<R> Default for InMemoryRecordStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> Clone for InMemoryRecordStore<R> {
    fn clone(&self) -> Self {
        Self {
            records: Arc::clone(&self.records),
            sequence: Arc::clone(&self.sequence),
            usernames: Arc::clone(&self.usernames),
        }
    }
}

impl<R: MemoryRecord> InMemoryRecordStore<R>
where
    R::Key: PartialEq,
{
    fn claim_username(&self, username: Option<&Username>) -> Result<(), StoreError> {
        let Some(username) = username else {
            return Ok(());
        };
        let mut usernames = self.usernames.write().map_err(|_| poisoned())?;
        if !usernames.insert(username.clone()) {
            return Err(StoreError::conflict(format!(
                "username {username} is already taken"
            )));
        }
        Ok(())
    }

    fn release_username(&self, username: Option<&Username>) -> Result<(), StoreError> {
        if let Some(username) = username {
            self.usernames
                .write()
                .map_err(|_| poisoned())?
                .remove(username);
        }
        Ok(())
    }
}

#[async_trait]
impl<R> RecordStore<R> for InMemoryRecordStore<R>
where
    R: MemoryRecord,
    R::Key: PartialEq,
{
    async fn find_by_id(&self, key: &R::Key) -> Result<Option<R>, StoreError> {
        let records = self.records.read().map_err(|_| poisoned())?;
        Ok(records.iter().find(|record| &record.key() == key).cloned())
    }

    async fn find_by(&self, query: RecordQuery) -> Result<Vec<R>, StoreError> {
        if let Some(field) = R::unsupported_field(&query) {
            return Err(StoreError::unsupported_field(R::KIND, field));
        }
        let records = self.records.read().map_err(|_| poisoned())?;
        let mut matched = Vec::new();
        for record in records.iter() {
            let accepted = query
                .evaluate(|field| record.field_value(field))
                .map_err(|field| StoreError::unsupported_field(R::KIND, field))?;
            if accepted {
                matched.push(record.clone());
            }
        }
        Ok(matched)
    }

    async fn create(&self, draft: R::Draft) -> Result<R, StoreError> {
        let mut records = self.records.write().map_err(|_| poisoned())?;
        let record = R::materialise(draft, &self.sequence);
        if records.iter().any(|existing| existing.key() == record.key()) {
            return Err(StoreError::conflict(format!(
                "{} {} already exists",
                R::KIND,
                record.key()
            )));
        }
        self.claim_username(record.username())?;
        records.push(record.clone());
        Ok(record)
    }

    async fn update(&self, record: &R) -> Result<bool, StoreError> {
        let mut records = self.records.write().map_err(|_| poisoned())?;
        let Some(slot) = records
            .iter_mut()
            .find(|existing| existing.key() == record.key())
        else {
            return Ok(false);
        };
        if slot.username() != record.username() {
            self.claim_username(record.username())?;
            self.release_username(slot.username())?;
        }
        *slot = record.clone();
        Ok(true)
    }

    async fn delete(&self, key: &R::Key) -> Result<bool, StoreError> {
        let mut records = self.records.write().map_err(|_| poisoned())?;
        let Some(position) = records.iter().position(|record| &record.key() == key) else {
            return Ok(false);
        };
        let removed = records.remove(position);
        self.release_username(removed.username())?;
        Ok(true)
    }
}

/// A complete in-memory gym: four stores sharing ids and usernames.
#[derive(Clone)]
pub struct InMemoryGym {
    trainees: Arc<InMemoryRecordStore<Trainee>>,
    trainers: Arc<InMemoryRecordStore<Trainer>>,
    trainings: Arc<InMemoryRecordStore<Training>>,
    training_types: Arc<InMemoryRecordStore<TrainingType>>,
}

impl Default for InMemoryGym {
    fn default() -> Self {
        let sequence = Arc::new(AtomicI64::new(1));
        let usernames = Arc::new(RwLock::new(HashSet::new()));
        Self {
            trainees: Arc::new(InMemoryRecordStore::sharing(
                Arc::clone(&sequence),
                Arc::clone(&usernames),
            )),
            trainers: Arc::new(InMemoryRecordStore::sharing(
                Arc::clone(&sequence),
                Arc::clone(&usernames),
            )),
            trainings: Arc::new(InMemoryRecordStore::sharing(
                Arc::clone(&sequence),
                Arc::clone(&usernames),
            )),
            training_types: Arc::new(InMemoryRecordStore::sharing(sequence, usernames)),
        }
    }
}

impl InMemoryGym {
    /// The four stores, ready for [`crate::domain::GymServices::new`].
    pub fn stores(&self) -> GymStores {
        GymStores {
            trainees: self.trainees.clone(),
            trainers: self.trainers.clone(),
            trainings: self.trainings.clone(),
            training_types: self.training_types.clone(),
        }
    }

    /// Username directory spanning this gym's trainees and trainers.
    pub fn directory(&self) -> PersonDirectory {
        PersonDirectory::new(self.trainees.clone(), self.trainers.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use chrono::NaiveDate;
    use rstest::{fixture, rstest};

    use super::*;
    use crate::domain::{
        Password, PersonName, PersonProfile, RecordField, RecordKind, TrainingDraft,
        TrainingDuration, TrainingTypeName,
    };

    fn profile(first: &str, last: &str) -> PersonProfile {
        PersonProfile::new(
            PersonName::new(first).expect("valid name"),
            PersonName::new(last).expect("valid name"),
            Username::new(format!("{first}.{last}")).expect("valid username"),
            Password::new("pass").expect("valid password"),
            true,
        )
    }

    fn trainee_draft(first: &str, last: &str) -> TraineeDraft {
        TraineeDraft {
            profile: profile(first, last),
            date_of_birth: None,
            address: None,
        }
    }

    fn trainer_draft(first: &str, last: &str) -> TrainerDraft {
        TrainerDraft {
            profile: profile(first, last),
            specialization: TrainingTypeName::new("Yoga").expect("valid type"),
        }
    }

    #[fixture]
    fn gym() -> InMemoryGym {
        InMemoryGym::default()
    }

    #[rstest]
    #[tokio::test]
    async fn ids_are_shared_across_person_kinds(gym: InMemoryGym) {
        let stores = gym.stores();
        let trainee = stores
            .trainees
            .create(trainee_draft("Jane", "Doe"))
            .await
            .expect("trainee created");
        let trainer = stores
            .trainers
            .create(trainer_draft("Ann", "Lee"))
            .await
            .expect("trainer created");
        assert_ne!(trainee.id(), trainer.id());
    }

    #[rstest]
    #[tokio::test]
    async fn usernames_are_unique_across_kinds(gym: InMemoryGym) {
        let stores = gym.stores();
        stores
            .trainees
            .create(trainee_draft("Jane", "Doe"))
            .await
            .expect("trainee created");
        let err = stores
            .trainers
            .create(trainer_draft("Jane", "Doe"))
            .await
            .expect_err("username collides");
        assert!(matches!(err, StoreError::Conflict { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn delete_frees_username(gym: InMemoryGym) {
        let stores = gym.stores();
        let trainee = stores
            .trainees
            .create(trainee_draft("Jane", "Doe"))
            .await
            .expect("trainee created");
        assert!(stores.trainees.delete(&trainee.id()).await.expect("deleted"));
        assert!(!stores.trainees.delete(&trainee.id()).await.expect("already gone"));
        stores
            .trainers
            .create(trainer_draft("Jane", "Doe"))
            .await
            .expect("username reusable after delete");
    }

    #[rstest]
    #[tokio::test]
    async fn update_of_missing_record_is_false(gym: InMemoryGym) {
        let ghost = Trainee::new(PersonId::new(99), trainee_draft("Ghost", "Person"));
        assert!(!gym.stores().trainees.update(&ghost).await.expect("update runs"));
    }

    #[rstest]
    #[tokio::test]
    async fn exclusion_query_filters_trainers(gym: InMemoryGym) {
        let stores = gym.stores();
        let ann = stores
            .trainers
            .create(trainer_draft("Ann", "Lee"))
            .await
            .expect("trainer created");
        let bob = stores
            .trainers
            .create(trainer_draft("Bob", "Ray"))
            .await
            .expect("trainer created");

        let remaining = stores
            .trainers
            .find_by(RecordQuery::excluding_ids(BTreeSet::from([ann.id().get()])))
            .await
            .expect("query runs");

        assert_eq!(remaining, vec![bob]);
    }

    #[rstest]
    #[tokio::test]
    async fn unsupported_fields_are_rejected(gym: InMemoryGym) {
        let stores = gym.stores();
        let err = stores
            .trainers
            .find_by(RecordQuery::by_trainee(PersonId::new(1)))
            .await
            .expect_err("rejected while empty");
        assert_eq!(
            err,
            StoreError::unsupported_field(RecordKind::Trainer, RecordField::TraineeId)
        );

        stores
            .trainers
            .create(trainer_draft("Ann", "Lee"))
            .await
            .expect("trainer created");
        let err = stores
            .trainers
            .find_by(RecordQuery::by_trainee(PersonId::new(1)))
            .await
            .expect_err("trainers have no trainee_id");
        assert_eq!(
            err,
            StoreError::unsupported_field(RecordKind::Trainer, RecordField::TraineeId)
        );
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_training_id_is_conflict(gym: InMemoryGym) {
        let training = Training::new(TrainingDraft {
            trainee_id: PersonId::new(1),
            trainer_id: PersonId::new(2),
            name: "Flow".to_owned(),
            training_type: TrainingTypeName::new("Yoga").expect("valid type"),
            date: NaiveDate::from_ymd_opt(2024, 5, 1).expect("valid date"),
            duration: TrainingDuration::from_minutes(30).expect("valid duration"),
        })
        .expect("valid training");
        let stores = gym.stores();
        stores
            .trainings
            .create(training.clone())
            .await
            .expect("first insert");
        let err = stores
            .trainings
            .create(training)
            .await
            .expect_err("same id collides");
        assert!(matches!(err, StoreError::Conflict { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn directory_spans_both_kinds(gym: InMemoryGym) {
        gym.stores()
            .trainers
            .create(trainer_draft("Ann", "Lee"))
            .await
            .expect("trainer created");
        let found = gym
            .directory()
            .find_by_username(&Username::new("Ann.Lee").expect("valid username"))
            .await
            .expect("lookup runs")
            .expect("trainer found");
        assert_eq!(found.kind(), crate::domain::PersonKind::Trainer);
    }
}
