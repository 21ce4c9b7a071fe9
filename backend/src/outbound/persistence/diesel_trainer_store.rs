//! PostgreSQL-backed trainer store.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{RecordStore, StoreError};
use crate::domain::{
    Password, PersonId, PersonName, PersonProfile, PersonRecord, RecordQuery, Trainer,
    TrainerDraft, TrainingTypeName, Username,
};

use super::models::{NewTrainerRow, TrainerRow, TrainerUpdate};
use super::pool::DbPool;
use super::query_filters::trainer_filter;
use super::schema::trainers;
use super::store_error_mapping::{map_diesel_error, map_pool_error, map_row_error};

/// Diesel-backed implementation of `RecordStore<Trainer>`.
#[derive(Clone)]
pub struct DieselTrainerStore {
    pool: DbPool,
}

impl DieselTrainerStore {
    /// Store backed by `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_trainer(row: TrainerRow) -> Result<Trainer, StoreError> {
    let TrainerRow {
        id,
        first_name,
        last_name,
        username,
        password,
        active,
        specialization,
    } = row;
    let profile = PersonProfile::new(
        PersonName::new(first_name).map_err(map_row_error)?,
        PersonName::new(last_name).map_err(map_row_error)?,
        Username::new(username).map_err(map_row_error)?,
        Password::new(password).map_err(map_row_error)?,
        active,
    );
    Ok(Trainer::new(
        PersonId::new(id),
        TrainerDraft {
            profile,
            specialization: TrainingTypeName::new(specialization).map_err(map_row_error)?,
        },
    ))
}

#[async_trait]
impl RecordStore<Trainer> for DieselTrainerStore {
    async fn find_by_id(&self, key: &PersonId) -> Result<Option<Trainer>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = trainers::table
            .filter(trainers::id.eq(key.get()))
            .select(TrainerRow::as_select())
            .first::<TrainerRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_trainer).transpose()
    }

    async fn find_by(&self, query: RecordQuery) -> Result<Vec<Trainer>, StoreError> {
        let mut boxed = trainers::table.order(trainers::id.asc()).into_boxed();
        for predicate in query.predicates() {
            boxed = trainer_filter(boxed, predicate)?;
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<TrainerRow> = boxed
            .select(TrainerRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_trainer).collect()
    }

    async fn create(&self, draft: TrainerDraft) -> Result<Trainer, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let profile = &draft.profile;
        let new_row = NewTrainerRow {
            first_name: profile.first_name().as_ref(),
            last_name: profile.last_name().as_ref(),
            username: profile.username().as_ref(),
            password: profile.password().expose(),
            active: profile.is_active(),
            specialization: draft.specialization.as_ref(),
        };
        let row = diesel::insert_into(trainers::table)
            .values(&new_row)
            .returning(TrainerRow::as_returning())
            .get_result::<TrainerRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row_to_trainer(row)
    }

    async fn update(&self, record: &Trainer) -> Result<bool, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let profile = record.profile();
        let changes = TrainerUpdate {
            first_name: profile.first_name().as_ref(),
            last_name: profile.last_name().as_ref(),
            username: profile.username().as_ref(),
            password: profile.password().expose(),
            active: profile.is_active(),
            specialization: record.specialization().as_ref(),
        };
        let affected = diesel::update(trainers::table.filter(trainers::id.eq(record.id().get())))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(affected > 0)
    }

    async fn delete(&self, key: &PersonId) -> Result<bool, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let affected = diesel::delete(trainers::table.filter(trainers::id.eq(key.get())))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(affected > 0)
    }
}
