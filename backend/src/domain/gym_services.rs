//! Wiring of the three gym services over one store bundle.

use std::sync::Arc;

use crate::domain::ports::{GymStores, PasswordGenerator};
use crate::domain::{
    PersonDirectory, TraineeService, TrainerService, TrainingService, UsernameAssigner,
};

/// The trainee, trainer, and training services sharing one set of stores.
///
/// Usernames are assigned against a [`PersonDirectory`] over the same
/// stores, so both person kinds share one namespace.
#[derive(Clone)]
pub struct GymServices {
    pub trainees: TraineeService,
    pub trainers: TrainerService,
    pub trainings: TrainingService,
}

impl GymServices {
    /// Wire the three services over `stores` with one shared username assigner.
    pub fn new(stores: GymStores, passwords: Arc<dyn PasswordGenerator>) -> Self {
        let usernames = UsernameAssigner::new(Arc::new(PersonDirectory::from_stores(&stores)));
        Self {
            trainees: TraineeService::new(stores.clone(), usernames.clone(), Arc::clone(&passwords)),
            trainers: TrainerService::new(stores.clone(), usernames, passwords),
            trainings: TrainingService::new(stores),
        }
    }
}
