//! Diesel table definitions for the PostgreSQL schema.
//!
//! These must match `migrations/` exactly. `diesel print-schema` against a
//! migrated database regenerates them.

diesel::table! {
    /// Usernames held by any person, keeping the namespace shared across
    /// trainees and trainers. Maintained by triggers on both tables.
    person_usernames (username) {
        username -> Varchar,
        kind -> Varchar,
    }
}

diesel::table! {
    /// Training categories, keyed by name.
    training_types (name) {
        name -> Varchar,
    }
}

diesel::table! {
    trainees (id) {
        /// Drawn from `person_id_seq`, shared with trainers.
        id -> Int8,
        first_name -> Varchar,
        last_name -> Varchar,
        username -> Varchar,
        password -> Varchar,
        active -> Bool,
        date_of_birth -> Nullable<Date>,
        address -> Nullable<Varchar>,
    }
}

diesel::table! {
    trainers (id) {
        /// Drawn from `person_id_seq`, shared with trainees.
        id -> Int8,
        first_name -> Varchar,
        last_name -> Varchar,
        username -> Varchar,
        password -> Varchar,
        active -> Bool,
        specialization -> Varchar,
    }
}

diesel::table! {
    trainings (id) {
        /// Derived from trainee, trainer, and date; never generated here.
        id -> Int8,
        /// Insertion order, used as store order for listings.
        ordinal -> Int8,
        trainee_id -> Int8,
        trainer_id -> Int8,
        name -> Varchar,
        training_type -> Varchar,
        training_date -> Date,
        duration_minutes -> Int4,
    }
}

diesel::joinable!(trainers -> training_types (specialization));
diesel::joinable!(trainings -> trainees (trainee_id));
diesel::joinable!(trainings -> trainers (trainer_id));
diesel::joinable!(trainings -> training_types (training_type));

diesel::allow_tables_to_appear_in_same_query!(
    person_usernames,
    training_types,
    trainees,
    trainers,
    trainings,
);
