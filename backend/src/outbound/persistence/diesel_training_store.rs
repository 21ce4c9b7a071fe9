//! PostgreSQL-backed training and training type stores.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{RecordStore, StoreError};
use crate::domain::{
    PersonId, RecordQuery, Training, TrainingDraft, TrainingDuration, TrainingId, TrainingType,
    TrainingTypeName,
};

use super::models::{NewTrainingRow, TrainingRow, TrainingTypeRow, TrainingUpdate};
use super::pool::DbPool;
use super::query_filters::{training_filter, training_type_filter};
use super::schema::{training_types, trainings};
use super::store_error_mapping::{map_diesel_error, map_pool_error, map_row_error};

/// Diesel-backed implementation of `RecordStore<Training>`.
///
/// Listings follow insertion order.
#[derive(Clone)]
pub struct DieselTrainingStore {
    pool: DbPool,
}

impl DieselTrainingStore {
    /// Store backed by `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn duration_for_db(duration: TrainingDuration) -> Result<i32, StoreError> {
    i32::try_from(duration.minutes()).map_err(map_row_error)
}

fn row_to_training(row: TrainingRow) -> Result<Training, StoreError> {
    let TrainingRow {
        id,
        trainee_id,
        trainer_id,
        name,
        training_type,
        training_date,
        duration_minutes,
    } = row;
    let minutes = u32::try_from(duration_minutes).map_err(map_row_error)?;
    let training = Training::new(TrainingDraft {
        trainee_id: PersonId::new(trainee_id),
        trainer_id: PersonId::new(trainer_id),
        name,
        training_type: TrainingTypeName::new(training_type).map_err(map_row_error)?,
        date: training_date,
        duration: TrainingDuration::from_minutes(minutes).map_err(map_row_error)?,
    })
    .map_err(map_row_error)?;
    if training.id().get() != id {
        return Err(map_row_error(format!(
            "training {id} does not match its derived identifier {}",
            training.id()
        )));
    }
    Ok(training)
}

#[async_trait]
impl RecordStore<Training> for DieselTrainingStore {
    async fn find_by_id(&self, key: &TrainingId) -> Result<Option<Training>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = trainings::table
            .filter(trainings::id.eq(key.get()))
            .select(TrainingRow::as_select())
            .first::<TrainingRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_training).transpose()
    }

    async fn find_by(&self, query: RecordQuery) -> Result<Vec<Training>, StoreError> {
        let mut boxed = trainings::table.order(trainings::ordinal.asc()).into_boxed();
        for predicate in query.predicates() {
            boxed = training_filter(boxed, predicate)?;
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<TrainingRow> = boxed
            .select(TrainingRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_training).collect()
    }

    async fn create(&self, draft: Training) -> Result<Training, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let new_row = NewTrainingRow {
            id: draft.id().get(),
            trainee_id: draft.trainee_id().get(),
            trainer_id: draft.trainer_id().get(),
            name: draft.name(),
            training_type: draft.training_type().as_ref(),
            training_date: draft.date(),
            duration_minutes: duration_for_db(draft.duration())?,
        };
        diesel::insert_into(trainings::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(draft)
    }

    async fn update(&self, record: &Training) -> Result<bool, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = TrainingUpdate {
            trainee_id: record.trainee_id().get(),
            trainer_id: record.trainer_id().get(),
            name: record.name(),
            training_type: record.training_type().as_ref(),
            training_date: record.date(),
            duration_minutes: duration_for_db(record.duration())?,
        };
        let affected =
            diesel::update(trainings::table.filter(trainings::id.eq(record.id().get())))
                .set(&changes)
                .execute(&mut conn)
                .await
                .map_err(map_diesel_error)?;
        Ok(affected > 0)
    }

    async fn delete(&self, key: &TrainingId) -> Result<bool, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let affected = diesel::delete(trainings::table.filter(trainings::id.eq(key.get())))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(affected > 0)
    }
}

/// Diesel-backed implementation of `RecordStore<TrainingType>`.
#[derive(Clone)]
pub struct DieselTrainingTypeStore {
    pool: DbPool,
}

impl DieselTrainingTypeStore {
    /// Store backed by `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_training_type(row: TrainingTypeRow) -> Result<TrainingType, StoreError> {
    Ok(TrainingType::new(
        TrainingTypeName::new(row.name).map_err(map_row_error)?,
    ))
}

#[async_trait]
impl RecordStore<TrainingType> for DieselTrainingTypeStore {
    async fn find_by_id(&self, key: &TrainingTypeName) -> Result<Option<TrainingType>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = training_types::table
            .filter(training_types::name.eq(key.as_ref()))
            .select(TrainingTypeRow::as_select())
            .first::<TrainingTypeRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_training_type).transpose()
    }

    async fn find_by(&self, query: RecordQuery) -> Result<Vec<TrainingType>, StoreError> {
        let mut boxed = training_types::table
            .order(training_types::name.asc())
            .into_boxed();
        for predicate in query.predicates() {
            boxed = training_type_filter(boxed, predicate)?;
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<TrainingTypeRow> = boxed
            .select(TrainingTypeRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_training_type).collect()
    }

    async fn create(&self, draft: TrainingType) -> Result<TrainingType, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(training_types::table)
            .values(TrainingTypeRow {
                name: draft.name().as_ref().to_owned(),
            })
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(draft)
    }

    /// Training types carry no columns beyond their key, so an update only
    /// reports whether the type exists.
    async fn update(&self, record: &TrainingType) -> Result<bool, StoreError> {
        Ok(self.find_by_id(record.name()).await?.is_some())
    }

    async fn delete(&self, key: &TrainingTypeName) -> Result<bool, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let affected =
            diesel::delete(training_types::table.filter(training_types::name.eq(key.as_ref())))
                .execute(&mut conn)
                .await
                .map_err(map_diesel_error)?;
        Ok(affected > 0)
    }
}
