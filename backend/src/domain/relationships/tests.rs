//! Tests for training filters and the unpaired-trainer query.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::{
    FieldValue, Predicate, RecordField, TrainingDraft, TrainingDuration, TrainingTypeName,
};

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, day).expect("valid date")
}

fn training(trainee: i64, trainer: i64, day: u32) -> Training {
    Training::new(TrainingDraft {
        trainee_id: PersonId::new(trainee),
        trainer_id: PersonId::new(trainer),
        name: format!("session {day}"),
        training_type: TrainingTypeName::new("Yoga").expect("valid type"),
        date: date(day),
        duration: TrainingDuration::from_minutes(45).expect("valid duration"),
    })
    .expect("valid training")
}

fn username(value: &str) -> Username {
    Username::new(value).expect("valid username")
}

/// Trainee 1's history: trainer 10 (Ann.Lee) on the 1st and 20th, trainer 11
/// (Bob.Ray) on the 10th.
#[fixture]
fn history() -> Vec<Participation> {
    vec![
        Participation {
            training: training(1, 10, 1),
            counterpart: Some(username("Ann.Lee")),
        },
        Participation {
            training: training(1, 11, 10),
            counterpart: Some(username("Bob.Ray")),
        },
        Participation {
            training: training(1, 10, 20),
            counterpart: Some(username("Ann.Lee")),
        },
    ]
}

fn days(trainings: &[Training]) -> Vec<u32> {
    use chrono::Datelike;
    trainings.iter().map(|t| t.date().day()).collect()
}

#[rstest]
fn unbounded_filter_keeps_everything_in_order(history: Vec<Participation>) {
    let kept = filter_trainings(history, &TrainingFilter::default());
    assert_eq!(days(&kept), vec![1, 10, 20]);
}

#[rstest]
#[case(Some(1), Some(1), vec![1])]
#[case(Some(1), Some(10), vec![1, 10])]
#[case(Some(2), Some(19), vec![10])]
#[case(Some(21), None, vec![])]
#[case(None, Some(10), vec![1, 10])]
fn range_bounds_are_inclusive(
    history: Vec<Participation>,
    #[case] from: Option<u32>,
    #[case] to: Option<u32>,
    #[case] expected: Vec<u32>,
) {
    let filter = TrainingFilter::default().with_range(DateRange::new(from.map(date), to.map(date)));
    assert_eq!(days(&filter_trainings(history, &filter)), expected);
}

#[rstest]
fn widening_the_range_never_drops_results(history: Vec<Participation>) {
    let narrow = TrainingFilter::default().with_range(DateRange::new(Some(date(5)), Some(date(15))));
    let wide = TrainingFilter::default().with_range(DateRange::new(Some(date(1)), Some(date(25))));

    let narrow_ids: BTreeSet<_> = filter_trainings(history.clone(), &narrow)
        .iter()
        .map(Training::id)
        .collect();
    let wide_ids: BTreeSet<_> = filter_trainings(history, &wide)
        .iter()
        .map(Training::id)
        .collect();

    assert!(narrow_ids.is_subset(&wide_ids));
}

#[rstest]
fn counterpart_criterion_matches_username(history: Vec<Participation>) {
    let filter = TrainingFilter::default().with_counterpart(username("Ann.Lee"));
    assert_eq!(days(&filter_trainings(history, &filter)), vec![1, 20]);
}

#[rstest]
fn unknown_counterpart_matches_nothing(history: Vec<Participation>) {
    let filter = TrainingFilter::default().with_counterpart(username("Nobody.Here"));
    assert!(filter_trainings(history, &filter).is_empty());
}

#[rstest]
fn unresolved_counterparts_are_skipped_only_when_requested() {
    let participations = vec![Participation {
        training: training(1, 12, 3),
        counterpart: None,
    }];
    let by_name = TrainingFilter::default().with_counterpart(username("Ann.Lee"));

    assert!(filter_trainings(participations.clone(), &by_name).is_empty());
    assert_eq!(filter_trainings(participations, &TrainingFilter::default()).len(), 1);
}

#[rstest]
#[case(PersonKind::Trainee, vec![10, 11])]
#[case(PersonKind::Trainer, vec![1])]
fn counterpart_ids_are_distinct_in_first_seen_order(
    history: Vec<Participation>,
    #[case] subject: PersonKind,
    #[case] expected: Vec<i64>,
) {
    let trainings: Vec<Training> = history.into_iter().map(|p| p.training).collect();
    let ids: Vec<i64> = distinct_counterpart_ids(&trainings, subject)
        .into_iter()
        .map(PersonId::get)
        .collect();
    assert_eq!(ids, expected);
}

#[rstest]
fn no_trainings_means_every_trainer_is_unpaired() {
    assert!(unpaired_trainers_query(&[]).is_all());
}

#[rstest]
fn recorded_trainers_are_excluded(history: Vec<Participation>) {
    let trainings: Vec<Training> = history.into_iter().map(|p| p.training).collect();
    let query = unpaired_trainers_query(&trainings);
    assert_eq!(
        query.predicates(),
        &[Predicate::Excludes {
            field: RecordField::Id,
            ids: BTreeSet::from([10, 11]),
        }]
    );
    assert_eq!(
        query.evaluate(|_| Some(FieldValue::Id(10))),
        Ok(false)
    );
    assert_eq!(
        query.evaluate(|_| Some(FieldValue::Id(12))),
        Ok(true)
    );
}
