//! Unified person lookup over the trainee and trainer stores.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{GymStores, RecordStore, StoreError, UsernameRegistry};
use crate::domain::{Person, RecordQuery, Trainee, Trainer, Username};

/// Resolves usernames to people of either kind.
///
/// Implements [`UsernameRegistry`] so username assignment sees one namespace.
#[derive(Clone)]
pub struct PersonDirectory {
    trainees: Arc<dyn RecordStore<Trainee>>,
    trainers: Arc<dyn RecordStore<Trainer>>,
}

impl PersonDirectory {
    /// Directory over the trainee and trainer stores.
    pub fn new(
        trainees: Arc<dyn RecordStore<Trainee>>,
        trainers: Arc<dyn RecordStore<Trainer>>,
    ) -> Self {
        Self { trainees, trainers }
    }

    /// Directory over the person stores of a store bundle.
    pub fn from_stores(stores: &GymStores) -> Self {
        Self::new(Arc::clone(&stores.trainees), Arc::clone(&stores.trainers))
    }

    /// Trainee holding `username`, if any.
    pub async fn find_trainee(&self, username: &Username) -> Result<Option<Trainee>, StoreError> {
        let found = self.trainees.find_by(RecordQuery::by_username(username)).await?;
        Ok(found.into_iter().next())
    }

    /// Trainer holding `username`, if any.
    pub async fn find_trainer(&self, username: &Username) -> Result<Option<Trainer>, StoreError> {
        let found = self.trainers.find_by(RecordQuery::by_username(username)).await?;
        Ok(found.into_iter().next())
    }

    /// Look the username up among trainees first, then trainers.
    pub async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<Person>, StoreError> {
        if let Some(trainee) = self.find_trainee(username).await? {
            return Ok(Some(Person::Trainee(trainee)));
        }
        Ok(self.find_trainer(username).await?.map(Person::Trainer))
    }
}

#[async_trait]
impl UsernameRegistry for PersonDirectory {
    async fn is_taken(&self, username: &Username) -> Result<bool, StoreError> {
        Ok(self.find_by_username(username).await?.is_some())
    }
}
