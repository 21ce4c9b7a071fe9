//! PostgreSQL-backed trainee store.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{RecordStore, StoreError};
use crate::domain::{
    Password, PersonId, PersonName, PersonProfile, PersonRecord, RecordQuery, Trainee,
    TraineeDraft, Username,
};

use super::models::{NewTraineeRow, TraineeRow, TraineeUpdate};
use super::pool::DbPool;
use super::query_filters::trainee_filter;
use super::schema::trainees;
use super::store_error_mapping::{map_diesel_error, map_pool_error, map_row_error};

/// Diesel-backed implementation of `RecordStore<Trainee>`.
#[derive(Clone)]
pub struct DieselTraineeStore {
    pool: DbPool,
}

impl DieselTraineeStore {
    /// Store backed by `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_trainee(row: TraineeRow) -> Result<Trainee, StoreError> {
    let TraineeRow {
        id,
        first_name,
        last_name,
        username,
        password,
        active,
        date_of_birth,
        address,
    } = row;
    let profile = PersonProfile::new(
        PersonName::new(first_name).map_err(map_row_error)?,
        PersonName::new(last_name).map_err(map_row_error)?,
        Username::new(username).map_err(map_row_error)?,
        Password::new(password).map_err(map_row_error)?,
        active,
    );
    Ok(Trainee::new(
        PersonId::new(id),
        TraineeDraft {
            profile,
            date_of_birth,
            address,
        },
    ))
}

#[async_trait]
impl RecordStore<Trainee> for DieselTraineeStore {
    async fn find_by_id(&self, key: &PersonId) -> Result<Option<Trainee>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = trainees::table
            .filter(trainees::id.eq(key.get()))
            .select(TraineeRow::as_select())
            .first::<TraineeRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_trainee).transpose()
    }

    async fn find_by(&self, query: RecordQuery) -> Result<Vec<Trainee>, StoreError> {
        let mut boxed = trainees::table.order(trainees::id.asc()).into_boxed();
        for predicate in query.predicates() {
            boxed = trainee_filter(boxed, predicate)?;
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<TraineeRow> = boxed
            .select(TraineeRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_trainee).collect()
    }

    async fn create(&self, draft: TraineeDraft) -> Result<Trainee, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let profile = &draft.profile;
        let new_row = NewTraineeRow {
            first_name: profile.first_name().as_ref(),
            last_name: profile.last_name().as_ref(),
            username: profile.username().as_ref(),
            password: profile.password().expose(),
            active: profile.is_active(),
            date_of_birth: draft.date_of_birth,
            address: draft.address.as_deref(),
        };
        let row = diesel::insert_into(trainees::table)
            .values(&new_row)
            .returning(TraineeRow::as_returning())
            .get_result::<TraineeRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row_to_trainee(row)
    }

    async fn update(&self, record: &Trainee) -> Result<bool, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let profile = record.profile();
        let changes = TraineeUpdate {
            first_name: profile.first_name().as_ref(),
            last_name: profile.last_name().as_ref(),
            username: profile.username().as_ref(),
            password: profile.password().expose(),
            active: profile.is_active(),
            date_of_birth: record.date_of_birth(),
            address: record.address(),
        };
        let affected = diesel::update(trainees::table.filter(trainees::id.eq(record.id().get())))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(affected > 0)
    }

    async fn delete(&self, key: &PersonId) -> Result<bool, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let affected = diesel::delete(trainees::table.filter(trainees::id.eq(key.get())))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(affected > 0)
    }
}
