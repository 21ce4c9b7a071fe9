//! Trainee service behaviour over the in-memory gym.

use std::sync::Arc;

use chrono::NaiveDate;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::FixturePasswordGenerator;
use crate::domain::{
    DateRange, GymServices, NewTrainer, NewTraining, TrainingDuration, TrainingTypeName,
};
use crate::outbound::memory::InMemoryGym;

struct Roster {
    gym: InMemoryGym,
    services: GymServices,
}

#[fixture]
fn roster() -> Roster {
    let gym = InMemoryGym::default();
    let passwords = FixturePasswordGenerator::new(Password::new("s3cretpass").expect("valid"));
    let services = GymServices::new(gym.stores(), Arc::new(passwords));
    Roster { gym, services }
}

fn name(value: &str) -> PersonName {
    PersonName::new(value).expect("valid name")
}

fn username(value: &str) -> Username {
    Username::new(value).expect("valid username")
}

fn day(month: u32, date: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, month, date).expect("valid date")
}

fn new_trainee(first: &str, last: &str) -> NewTrainee {
    NewTrainee {
        first_name: name(first),
        last_name: name(last),
        date_of_birth: None,
        address: None,
    }
}

async fn add_trainer(roster: &Roster, first: &str, last: &str) -> Trainer {
    roster
        .services
        .trainers
        .create(
            TraceId::generate(),
            NewTrainer {
                first_name: name(first),
                last_name: name(last),
                specialization: TrainingTypeName::new("Yoga").expect("valid type"),
            },
        )
        .await
        .expect("trainer created")
}

async fn add_training(roster: &Roster, trainee: &str, trainer: &str, date: NaiveDate) -> Training {
    roster
        .services
        .trainings
        .create(
            TraceId::generate(),
            NewTraining {
                trainee: username(trainee),
                trainer: username(trainer),
                name: "Morning flow".to_owned(),
                training_type: TrainingTypeName::new("Yoga").expect("valid type"),
                date,
                duration: TrainingDuration::from_minutes(60).expect("valid duration"),
            },
        )
        .await
        .expect("training recorded")
        .expect("participants known")
}

#[rstest]
#[tokio::test]
async fn namesakes_receive_numbered_usernames(roster: Roster) {
    let trainees = &roster.services.trainees;
    let trace_id = TraceId::generate();

    let first = trainees
        .create(trace_id, new_trainee("Jane", "Doe"))
        .await
        .expect("first created");
    let second = trainees
        .create(trace_id, new_trainee("Jane", "Doe"))
        .await
        .expect("second created");

    assert_eq!(first.profile().username().as_ref(), "Jane.Doe");
    assert_eq!(second.profile().username().as_ref(), "Jane.Doe1");
    assert_eq!(first.profile().password().expose(), "s3cretpass");
    assert!(first.profile().is_active());
}

#[rstest]
#[tokio::test]
async fn trainer_usernames_share_the_namespace(roster: Roster) {
    roster
        .services
        .trainees
        .create(TraceId::generate(), new_trainee("Sam", "Hill"))
        .await
        .expect("trainee created");

    let trainer = add_trainer(&roster, "Sam", "Hill").await;

    assert_eq!(trainer.profile().username().as_ref(), "Sam.Hill1");
}

#[rstest]
#[tokio::test]
async fn trainings_filter_by_trainer_and_range(roster: Roster) {
    let trainees = &roster.services.trainees;
    trainees
        .create(TraceId::generate(), new_trainee("Jane", "Doe"))
        .await
        .expect("trainee created");
    add_trainer(&roster, "Ann", "Lee").await;
    add_trainer(&roster, "Bob", "Ray").await;
    let with_ann = add_training(&roster, "Jane.Doe", "Ann.Lee", day(5, 1)).await;
    let with_bob = add_training(&roster, "Jane.Doe", "Bob.Ray", day(5, 3)).await;
    let jane = username("Jane.Doe");
    let trace_id = TraceId::generate();

    let everything = trainees
        .trainings(trace_id, &jane, &TrainingFilter::default())
        .await
        .expect("listed");
    assert_eq!(everything, vec![with_ann.clone(), with_bob.clone()]);

    let by_bob = TrainingFilter::default().with_counterpart(username("Bob.Ray"));
    let listed = trainees
        .trainings(trace_id, &jane, &by_bob)
        .await
        .expect("listed");
    assert_eq!(listed, vec![with_bob]);

    let first_day = TrainingFilter::default().with_range(DateRange::new(None, Some(day(5, 1))));
    let listed = trainees
        .trainings(trace_id, &jane, &first_day)
        .await
        .expect("listed");
    assert_eq!(listed, vec![with_ann]);

    let april = TrainingFilter::default().with_range(DateRange::new(None, Some(day(4, 30))));
    let listed = trainees
        .trainings(trace_id, &jane, &april)
        .await
        .expect("listed");
    assert!(listed.is_empty());
}

#[rstest]
#[tokio::test]
async fn assigned_and_unassigned_trainers_partition_the_roster(roster: Roster) {
    let trainees = &roster.services.trainees;
    trainees
        .create(TraceId::generate(), new_trainee("Jane", "Doe"))
        .await
        .expect("trainee created");
    let ann = add_trainer(&roster, "Ann", "Lee").await;
    let bob = add_trainer(&roster, "Bob", "Ray").await;
    let jane = username("Jane.Doe");
    let trace_id = TraceId::generate();

    let unassigned = trainees
        .unassigned_trainers(trace_id, &jane)
        .await
        .expect("listed");
    assert_eq!(unassigned, vec![ann.clone(), bob.clone()]);

    add_training(&roster, "Jane.Doe", "Ann.Lee", day(5, 1)).await;
    add_training(&roster, "Jane.Doe", "Ann.Lee", day(5, 2)).await;

    let assigned = trainees
        .assigned_trainers(trace_id, &jane)
        .await
        .expect("listed");
    assert_eq!(assigned, vec![ann]);
    let unassigned = trainees
        .unassigned_trainers(trace_id, &jane)
        .await
        .expect("listed");
    assert_eq!(unassigned, vec![bob]);
}

#[rstest]
#[tokio::test]
async fn unknown_trainee_yields_empty_results(roster: Roster) {
    let trainees = &roster.services.trainees;
    let ghost = username("Ghost.Trainee");
    let trace_id = TraceId::generate();

    assert!(
        trainees
            .trainings(trace_id, &ghost, &TrainingFilter::default())
            .await
            .expect("soft miss")
            .is_empty()
    );
    assert!(
        trainees
            .assigned_trainers(trace_id, &ghost)
            .await
            .expect("soft miss")
            .is_empty()
    );
    assert!(
        trainees
            .unassigned_trainers(trace_id, &ghost)
            .await
            .expect("soft miss")
            .is_empty()
    );
    assert!(
        trainees
            .select_by_username(trace_id, &ghost)
            .await
            .expect("soft miss")
            .is_none()
    );
    assert!(!trainees.delete_by_username(trace_id, &ghost).await.expect("soft miss"));
}

#[rstest]
#[tokio::test]
async fn deleting_a_trainee_removes_their_trainings(roster: Roster) {
    let trainees = &roster.services.trainees;
    trainees
        .create(TraceId::generate(), new_trainee("Jane", "Doe"))
        .await
        .expect("trainee created");
    add_trainer(&roster, "Ann", "Lee").await;
    let training = add_training(&roster, "Jane.Doe", "Ann.Lee", day(5, 1)).await;

    let deleted = trainees
        .delete_by_username(TraceId::generate(), &username("Jane.Doe"))
        .await
        .expect("deleted");

    assert!(deleted);
    let remaining = roster
        .gym
        .stores()
        .trainings
        .find_by_id(&training.id())
        .await
        .expect("lookup succeeds");
    assert!(remaining.is_none());
}

#[rstest]
#[tokio::test]
async fn password_and_activation_changes_persist(roster: Roster) {
    let trainees = &roster.services.trainees;
    let trace_id = TraceId::generate();
    let jane = trainees
        .create(trace_id, new_trainee("Jane", "Doe"))
        .await
        .expect("trainee created");
    let login = jane.profile().username().clone();

    let changed = trainees
        .change_password(trace_id, &login, Password::new("n3wpass").expect("valid"))
        .await
        .expect("changed");
    let deactivated = trainees
        .activate(trace_id, jane.id(), false)
        .await
        .expect("deactivated");

    assert!(changed && deactivated);
    let stored = trainees
        .select(trace_id, jane.id())
        .await
        .expect("selected")
        .expect("present");
    assert_eq!(stored.profile().password().expose(), "n3wpass");
    assert!(!stored.profile().is_active());
}

#[rstest]
#[tokio::test]
async fn update_replaces_details(roster: Roster) {
    let trainees = &roster.services.trainees;
    let trace_id = TraceId::generate();
    let jane = trainees
        .create(trace_id, new_trainee("Jane", "Doe"))
        .await
        .expect("trainee created");

    let moved = jane
        .clone()
        .with_address(Some("1 Gym Street".to_owned()))
        .with_date_of_birth(Some(day(1, 15)));
    assert!(trainees.update(trace_id, &moved).await.expect("updated"));

    let stored = trainees
        .select(trace_id, jane.id())
        .await
        .expect("selected")
        .expect("present");
    assert_eq!(stored.address(), Some("1 Gym Street"));
    assert_eq!(stored.date_of_birth(), Some(day(1, 15)));
}
