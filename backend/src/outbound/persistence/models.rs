//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::NaiveDate;
use diesel::prelude::*;

use super::schema::{trainees, trainers, training_types, trainings};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = trainees)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TraineeRow {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub password: String,
    pub active: bool,
    pub date_of_birth: Option<NaiveDate>,
    pub address: Option<String>,
}

/// Insertable trainee; `id` comes from the shared person sequence.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = trainees)]
pub(crate) struct NewTraineeRow<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub username: &'a str,
    pub password: &'a str,
    pub active: bool,
    pub date_of_birth: Option<NaiveDate>,
    pub address: Option<&'a str>,
}

/// Full replacement of a trainee's mutable columns.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = trainees)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct TraineeUpdate<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub username: &'a str,
    pub password: &'a str,
    pub active: bool,
    pub date_of_birth: Option<NaiveDate>,
    pub address: Option<&'a str>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = trainers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TrainerRow {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub password: String,
    pub active: bool,
    pub specialization: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = trainers)]
pub(crate) struct NewTrainerRow<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub username: &'a str,
    pub password: &'a str,
    pub active: bool,
    pub specialization: &'a str,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = trainers)]
pub(crate) struct TrainerUpdate<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub username: &'a str,
    pub password: &'a str,
    pub active: bool,
    pub specialization: &'a str,
}

/// Training row; `ordinal` is only used for ordering and is not selected.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = trainings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TrainingRow {
    pub id: i64,
    pub trainee_id: i64,
    pub trainer_id: i64,
    pub name: String,
    pub training_type: String,
    pub training_date: NaiveDate,
    pub duration_minutes: i32,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = trainings)]
pub(crate) struct NewTrainingRow<'a> {
    pub id: i64,
    pub trainee_id: i64,
    pub trainer_id: i64,
    pub name: &'a str,
    pub training_type: &'a str,
    pub training_date: NaiveDate,
    pub duration_minutes: i32,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = training_types)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TrainingTypeRow {
    pub name: String,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = trainings)]
pub(crate) struct TrainingUpdate<'a> {
    pub trainee_id: i64,
    pub trainer_id: i64,
    pub name: &'a str,
    pub training_type: &'a str,
    pub training_date: NaiveDate,
    pub duration_minutes: i32,
}
