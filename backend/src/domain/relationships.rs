//! Relationship filtering between trainees, trainers, and their trainings.
//!
//! Two questions are answered here, both from a person's participations:
//! which trainings match a counterpart and date window, and which trainers a
//! trainee has never trained with.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::{PersonId, PersonKind, RecordQuery, Training, Username};

/// Inclusive date window. A missing bound is open on that side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
}

impl DateRange {
    /// Range between optional inclusive bounds.
    #[must_use]
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self { from, to }
    }

    /// Range with neither bound.
    #[must_use]
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Inclusive lower bound.
    pub fn from(&self) -> Option<NaiveDate> {
        self.from
    }

    /// Inclusive upper bound.
    pub fn to(&self) -> Option<NaiveDate> {
        self.to
    }

    /// Whether `date` lies within `[from, to]`.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from.is_none_or(|from| from <= date) && self.to.is_none_or(|to| date <= to)
    }
}

/// Criteria for narrowing a person's training history.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrainingFilter {
    /// Username of the other party; `None` matches any counterpart.
    pub counterpart: Option<Username>,
    pub range: DateRange,
}

impl TrainingFilter {
    /// Keep only trainings with this counterpart.
    #[must_use]
    pub fn with_counterpart(mut self, counterpart: Username) -> Self {
        self.counterpart = Some(counterpart);
        self
    }

    /// Keep only trainings dated within `range`.
    #[must_use]
    pub fn with_range(mut self, range: DateRange) -> Self {
        self.range = range;
        self
    }
}

/// One training seen from a subject, with the counterpart's username when
/// it could be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participation {
    pub training: Training,
    pub counterpart: Option<Username>,
}

/// Id of the other party of `training`, seen from a person of `subject` kind.
pub fn counterpart_id(training: &Training, subject: PersonKind) -> PersonId {
    match subject {
        PersonKind::Trainee => training.trainer_id(),
        PersonKind::Trainer => training.trainee_id(),
    }
}

/// Keep the participations matching `filter`, preserving input order.
///
/// When a counterpart is requested, participations whose counterpart could
/// not be resolved are skipped and logged.
pub fn filter_trainings<I>(participations: I, filter: &TrainingFilter) -> Vec<Training>
where
    I: IntoIterator<Item = Participation>,
{
    participations
        .into_iter()
        .filter(|participation| filter.range.contains(participation.training.date()))
        .filter(|participation| match (&filter.counterpart, &participation.counterpart) {
            (None, _) => true,
            (Some(wanted), Some(actual)) => wanted == actual,
            (Some(_), None) => {
                warn!(
                    training_id = %participation.training.id(),
                    "skipping training whose counterpart could not be resolved"
                );
                false
            }
        })
        .map(|participation| participation.training)
        .collect()
}

/// Distinct counterpart ids in first-seen order.
pub fn distinct_counterpart_ids(trainings: &[Training], subject: PersonKind) -> Vec<PersonId> {
    let mut seen = BTreeSet::new();
    trainings
        .iter()
        .map(|training| counterpart_id(training, subject))
        .filter(|id| seen.insert(*id))
        .collect()
}

/// Ids of every trainer appearing in a trainee's trainings.
pub fn assigned_trainer_ids(trainings: &[Training]) -> BTreeSet<i64> {
    trainings
        .iter()
        .map(|training| training.trainer_id().get())
        .collect()
}

/// Trainer query for those absent from a trainee's trainings.
///
/// With no trainings this is [`RecordQuery::all`]; otherwise an id exclusion.
pub fn unpaired_trainers_query(trainings: &[Training]) -> RecordQuery {
    RecordQuery::excluding_ids(assigned_trainer_ids(trainings))
}

#[cfg(test)]
mod tests;
