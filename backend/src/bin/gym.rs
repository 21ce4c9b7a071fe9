//! Manage the gym roster stored in PostgreSQL: trainees, trainers, and trainings.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::io;
use std::sync::Arc;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use gym_backend::config::GymSettings;
use gym_backend::domain::{
    DateRange, Error, GymServices, NewTrainee, NewTrainer, NewTraining, Password, PersonName,
    PersonProfile, PersonRecord, TraceId, TrainingDuration, TrainingFilter, TrainingId,
    TrainingTypeName, Username,
};
use gym_backend::outbound::password::RandomPasswordGenerator;
use gym_backend::outbound::persistence::{DbPool, postgres_gym, run_pending_migrations};
use ortho_config::OrthoConfig;
use serde::Serialize;
use serde_json::json;
use tokio::runtime::Builder;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

/// `gym` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(name = "gym", about = "Manage gym trainees, trainers, and trainings", version)]
struct CliArgs {
    /// Database connection URL. Overrides `GYM_DATABASE_URL`.
    #[arg(long = "database-url", value_name = "url", global = true)]
    database_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Apply pending schema migrations.
    Migrate,
    /// Trainee accounts and history.
    #[command(subcommand)]
    Trainee(TraineeCommand),
    /// Trainer accounts and history.
    #[command(subcommand)]
    Trainer(TrainerCommand),
    /// Recorded trainings.
    #[command(subcommand)]
    Training(TrainingCommand),
}

#[derive(Debug, Clone, Subcommand)]
enum TraineeCommand {
    /// Register a trainee and print the assigned credentials.
    Create {
        #[arg(value_parser = parse_name)]
        first_name: PersonName,
        #[arg(value_parser = parse_name)]
        last_name: PersonName,
        #[arg(long = "date-of-birth", value_name = "yyyy-mm-dd")]
        date_of_birth: Option<NaiveDate>,
        #[arg(long)]
        address: Option<String>,
    },
    Show(UsernameArg),
    /// Change names, date of birth, or address.
    Update {
        #[command(flatten)]
        target: UsernameArg,
        #[command(flatten)]
        names: NameChanges,
        #[arg(long = "date-of-birth", value_name = "yyyy-mm-dd")]
        date_of_birth: Option<NaiveDate>,
        #[arg(long)]
        address: Option<String>,
    },
    /// List trainings, optionally narrowed to one trainer and a date range.
    Trainings {
        #[command(flatten)]
        target: UsernameArg,
        #[arg(long, value_parser = parse_username)]
        trainer: Option<Username>,
        #[command(flatten)]
        range: RangeArgs,
    },
    /// Trainers the trainee has trained with.
    AssignedTrainers(UsernameArg),
    /// Trainers the trainee has never trained with.
    UnassignedTrainers(UsernameArg),
    Activate(ActivationArgs),
    ChangePassword(PasswordArgs),
    /// Delete the trainee and their trainings.
    Delete(UsernameArg),
}

#[derive(Debug, Clone, Subcommand)]
enum TrainerCommand {
    /// Register a trainer and print the assigned credentials.
    Create {
        #[arg(value_parser = parse_name)]
        first_name: PersonName,
        #[arg(value_parser = parse_name)]
        last_name: PersonName,
        #[arg(long, value_parser = parse_type_name)]
        specialization: TrainingTypeName,
    },
    Show(UsernameArg),
    /// Change names or specialization.
    Update {
        #[command(flatten)]
        target: UsernameArg,
        #[command(flatten)]
        names: NameChanges,
        #[arg(long, value_parser = parse_type_name)]
        specialization: Option<TrainingTypeName>,
    },
    /// List trainings, optionally narrowed to one trainee and a date range.
    Trainings {
        #[command(flatten)]
        target: UsernameArg,
        #[arg(long, value_parser = parse_username)]
        trainee: Option<Username>,
        #[command(flatten)]
        range: RangeArgs,
    },
    Activate(ActivationArgs),
    ChangePassword(PasswordArgs),
    /// Delete the trainer and their trainings.
    Delete(UsernameArg),
}

#[derive(Debug, Clone, Subcommand)]
enum TrainingCommand {
    /// Record a training between a trainee and a trainer.
    Create {
        #[arg(long, value_parser = parse_username)]
        trainee: Username,
        #[arg(long, value_parser = parse_username)]
        trainer: Username,
        #[arg(long)]
        name: String,
        #[arg(long = "type", value_parser = parse_type_name)]
        training_type: TrainingTypeName,
        #[arg(long, value_name = "yyyy-mm-dd")]
        date: NaiveDate,
        #[arg(long = "minutes", value_parser = parse_duration)]
        duration: TrainingDuration,
    },
    Show {
        #[arg(allow_negative_numbers = true)]
        id: i64,
    },
    /// List known training types.
    Types,
}

#[derive(Debug, Clone, Args)]
struct UsernameArg {
    #[arg(value_parser = parse_username)]
    username: Username,
}

#[derive(Debug, Clone, Args)]
struct NameChanges {
    #[arg(long = "first-name", value_parser = parse_name)]
    first_name: Option<PersonName>,
    #[arg(long = "last-name", value_parser = parse_name)]
    last_name: Option<PersonName>,
}

#[derive(Debug, Clone, Args)]
struct RangeArgs {
    /// First day of the range, inclusive.
    #[arg(long, value_name = "yyyy-mm-dd")]
    from: Option<NaiveDate>,
    /// Last day of the range, inclusive.
    #[arg(long, value_name = "yyyy-mm-dd")]
    to: Option<NaiveDate>,
}

#[derive(Debug, Clone, Args)]
struct ActivationArgs {
    #[arg(value_parser = parse_username)]
    username: Username,
    /// Deactivate instead of activating.
    #[arg(long)]
    inactive: bool,
}

#[derive(Debug, Clone, Args)]
struct PasswordArgs {
    #[arg(value_parser = parse_username)]
    username: Username,
    #[arg(value_parser = parse_password)]
    password: Password,
}

fn main() -> io::Result<()> {
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| io::Error::other(format!("create Tokio runtime: {error}")))?;
    runtime.block_on(async_main())
}

async fn async_main() -> io::Result<()> {
    let args = CliArgs::try_parse().map_err(io::Error::other)?;
    let settings = GymSettings::load_from_iter([OsString::from("gym")])
        .map_err(|error| io::Error::other(format!("load settings: {error}")))?;
    init_tracing(settings.log_json);

    let database_url = resolve_database_url(args.database_url, &settings)?;
    if matches!(args.command, Command::Migrate) {
        let applied = run_pending_migrations(&database_url)
            .await
            .map_err(|error| io::Error::other(format!("apply migrations: {error}")))?;
        return print_json(&applied);
    }

    let pool = DbPool::new(settings.pool_config(&database_url))
        .await
        .map_err(|error| io::Error::other(format!("create database pool: {error}")))?;
    let services = GymServices::new(postgres_gym(pool), Arc::new(RandomPasswordGenerator));
    let trace_id = TraceId::generate();

    match args.command {
        Command::Migrate => Ok(()),
        Command::Trainee(command) => run_trainee(&services, trace_id, command).await,
        Command::Trainer(command) => run_trainer(&services, trace_id, command).await,
        Command::Training(command) => run_training(&services, trace_id, command).await,
    }
}

fn init_tracing(json: bool) {
    let builder = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr);
    let result = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    if let Err(error) = result {
        warn!(%error, "tracing init failed");
    }
}

async fn run_trainee(
    services: &GymServices,
    trace_id: TraceId,
    command: TraineeCommand,
) -> io::Result<()> {
    let trainees = &services.trainees;
    match command {
        TraineeCommand::Create {
            first_name,
            last_name,
            date_of_birth,
            address,
        } => {
            let trainee = trainees
                .create(
                    trace_id,
                    NewTrainee {
                        first_name,
                        last_name,
                        date_of_birth,
                        address,
                    },
                )
                .await
                .map_err(domain_failure)?;
            print_json(&credentials(trainee.profile()))
        }
        TraineeCommand::Show(UsernameArg { username }) => print_json(
            &trainees
                .select_by_username(trace_id, &username)
                .await
                .map_err(domain_failure)?,
        ),
        TraineeCommand::Update {
            target,
            names,
            date_of_birth,
            address,
        } => {
            let Some(current) = trainees
                .select_by_username(trace_id, &target.username)
                .await
                .map_err(domain_failure)?
            else {
                return print_json(&false);
            };
            let profile = names.apply(current.profile().clone());
            let date_of_birth = date_of_birth.or_else(|| current.date_of_birth());
            let address = address.or_else(|| current.address().map(str::to_owned));
            let changed = current
                .with_profile(profile)
                .with_date_of_birth(date_of_birth)
                .with_address(address);
            print_json(
                &trainees
                    .update(trace_id, &changed)
                    .await
                    .map_err(domain_failure)?,
            )
        }
        TraineeCommand::Trainings {
            target,
            trainer,
            range,
        } => {
            let filter = range.into_filter(trainer)?;
            print_json(
                &trainees
                    .trainings(trace_id, &target.username, &filter)
                    .await
                    .map_err(domain_failure)?,
            )
        }
        TraineeCommand::AssignedTrainers(UsernameArg { username }) => print_json(
            &trainees
                .assigned_trainers(trace_id, &username)
                .await
                .map_err(domain_failure)?,
        ),
        TraineeCommand::UnassignedTrainers(UsernameArg { username }) => print_json(
            &trainees
                .unassigned_trainers(trace_id, &username)
                .await
                .map_err(domain_failure)?,
        ),
        TraineeCommand::Activate(ActivationArgs { username, inactive }) => {
            let Some(trainee) = trainees
                .select_by_username(trace_id, &username)
                .await
                .map_err(domain_failure)?
            else {
                return print_json(&false);
            };
            print_json(
                &trainees
                    .activate(trace_id, trainee.id(), !inactive)
                    .await
                    .map_err(domain_failure)?,
            )
        }
        TraineeCommand::ChangePassword(PasswordArgs { username, password }) => print_json(
            &trainees
                .change_password(trace_id, &username, password)
                .await
                .map_err(domain_failure)?,
        ),
        TraineeCommand::Delete(UsernameArg { username }) => print_json(
            &trainees
                .delete_by_username(trace_id, &username)
                .await
                .map_err(domain_failure)?,
        ),
    }
}

async fn run_trainer(
    services: &GymServices,
    trace_id: TraceId,
    command: TrainerCommand,
) -> io::Result<()> {
    let trainers = &services.trainers;
    match command {
        TrainerCommand::Create {
            first_name,
            last_name,
            specialization,
        } => {
            let trainer = trainers
                .create(
                    trace_id,
                    NewTrainer {
                        first_name,
                        last_name,
                        specialization,
                    },
                )
                .await
                .map_err(domain_failure)?;
            print_json(&credentials(trainer.profile()))
        }
        TrainerCommand::Show(UsernameArg { username }) => print_json(
            &trainers
                .select_by_username(trace_id, &username)
                .await
                .map_err(domain_failure)?,
        ),
        TrainerCommand::Update {
            target,
            names,
            specialization,
        } => {
            let Some(current) = trainers
                .select_by_username(trace_id, &target.username)
                .await
                .map_err(domain_failure)?
            else {
                return print_json(&false);
            };
            let profile = names.apply(current.profile().clone());
            let specialization =
                specialization.unwrap_or_else(|| current.specialization().clone());
            let changed = current
                .with_profile(profile)
                .with_specialization(specialization);
            print_json(
                &trainers
                    .update(trace_id, &changed)
                    .await
                    .map_err(domain_failure)?,
            )
        }
        TrainerCommand::Trainings {
            target,
            trainee,
            range,
        } => {
            let filter = range.into_filter(trainee)?;
            print_json(
                &trainers
                    .trainings(trace_id, &target.username, &filter)
                    .await
                    .map_err(domain_failure)?,
            )
        }
        TrainerCommand::Activate(ActivationArgs { username, inactive }) => {
            let Some(trainer) = trainers
                .select_by_username(trace_id, &username)
                .await
                .map_err(domain_failure)?
            else {
                return print_json(&false);
            };
            print_json(
                &trainers
                    .activate(trace_id, trainer.id(), !inactive)
                    .await
                    .map_err(domain_failure)?,
            )
        }
        TrainerCommand::ChangePassword(PasswordArgs { username, password }) => print_json(
            &trainers
                .change_password(trace_id, &username, password)
                .await
                .map_err(domain_failure)?,
        ),
        TrainerCommand::Delete(UsernameArg { username }) => print_json(
            &trainers
                .delete_by_username(trace_id, &username)
                .await
                .map_err(domain_failure)?,
        ),
    }
}

async fn run_training(
    services: &GymServices,
    trace_id: TraceId,
    command: TrainingCommand,
) -> io::Result<()> {
    let trainings = &services.trainings;
    match command {
        TrainingCommand::Create {
            trainee,
            trainer,
            name,
            training_type,
            date,
            duration,
        } => print_json(
            &trainings
                .create(
                    trace_id,
                    NewTraining {
                        trainee,
                        trainer,
                        name,
                        training_type,
                        date,
                        duration,
                    },
                )
                .await
                .map_err(domain_failure)?,
        ),
        TrainingCommand::Show { id } => print_json(
            &trainings
                .select(trace_id, TrainingId::new(id))
                .await
                .map_err(domain_failure)?,
        ),
        TrainingCommand::Types => print_json(
            &trainings
                .training_types(trace_id)
                .await
                .map_err(domain_failure)?,
        ),
    }
}

impl NameChanges {
    fn apply(self, profile: PersonProfile) -> PersonProfile {
        let first_name = self
            .first_name
            .unwrap_or_else(|| profile.first_name().clone());
        let last_name = self
            .last_name
            .unwrap_or_else(|| profile.last_name().clone());
        profile.with_names(first_name, last_name)
    }
}

impl RangeArgs {
    fn into_filter(self, counterpart: Option<Username>) -> io::Result<TrainingFilter> {
        if let (Some(from), Some(to)) = (self.from, self.to) {
            if from > to {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("--from {from} is after --to {to}"),
                ));
            }
        }
        let filter = TrainingFilter::default().with_range(DateRange::new(self.from, self.to));
        Ok(match counterpart {
            Some(username) => filter.with_counterpart(username),
            None => filter,
        })
    }
}

/// Credentials printed once after registration.
#[derive(Serialize)]
struct Credentials<'a> {
    username: &'a str,
    password: &'a str,
}

fn credentials(profile: &PersonProfile) -> Credentials<'_> {
    Credentials {
        username: profile.username().as_ref(),
        password: profile.password().expose(),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> io::Result<()> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|error| io::Error::other(format!("render output: {error}")))?;
    println!("{rendered}");
    Ok(())
}

fn domain_failure(error: Error) -> io::Error {
    let rendered = json!({ "code": error.code(), "message": error.message() });
    io::Error::other(rendered.to_string())
}

fn resolve_database_url(explicit: Option<String>, settings: &GymSettings) -> io::Result<String> {
    match explicit {
        Some(value) if value.trim().is_empty() => Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "--database-url must not be empty when provided",
        )),
        Some(value) => Ok(value),
        None => Ok(settings.database_url().to_owned()),
    }
}

fn parse_name(raw: &str) -> Result<PersonName, String> {
    PersonName::new(raw).map_err(|error| error.to_string())
}

fn parse_username(raw: &str) -> Result<Username, String> {
    Username::new(raw).map_err(|error| error.to_string())
}

fn parse_password(raw: &str) -> Result<Password, String> {
    Password::new(raw).map_err(|error| error.to_string())
}

fn parse_type_name(raw: &str) -> Result<TrainingTypeName, String> {
    TrainingTypeName::new(raw).map_err(|error| error.to_string())
}

fn parse_duration(raw: &str) -> Result<TrainingDuration, String> {
    let minutes = raw
        .parse::<u32>()
        .map_err(|error| format!("failed to parse minutes: {error}"))?;
    TrainingDuration::from_minutes(minutes).map_err(|error| error.to_string())
}

#[cfg(test)]
mod tests {
    //! Unit tests for CLI parsing helpers.

    use rstest::rstest;

    use super::*;

    #[rstest]
    fn trainings_arguments_parse_into_a_filter() {
        let args = CliArgs::try_parse_from([
            "gym",
            "trainee",
            "trainings",
            "Jane.Doe",
            "--trainer",
            "John.Smith",
            "--from",
            "2024-05-01",
            "--to",
            "2024-05-31",
        ])
        .expect("arguments should parse");
        let Command::Trainee(TraineeCommand::Trainings { trainer, range, .. }) = args.command
        else {
            panic!("expected trainee trainings command");
        };
        let filter = range.into_filter(trainer).expect("range is ordered");
        assert_eq!(
            filter.counterpart.as_ref().map(AsRef::as_ref),
            Some("John.Smith")
        );
        let day = NaiveDate::from_ymd_opt(2024, 5, 31).expect("valid date");
        assert!(filter.range.contains(day));
    }

    #[rstest]
    fn reversed_range_is_rejected() {
        let range = RangeArgs {
            from: NaiveDate::from_ymd_opt(2024, 6, 1),
            to: NaiveDate::from_ymd_opt(2024, 5, 1),
        };
        let error = range.into_filter(None).expect_err("reversed range should fail");
        assert_eq!(error.kind(), io::ErrorKind::InvalidInput);
    }

    #[rstest]
    #[case("0")]
    #[case("-3")]
    #[case("an hour")]
    fn durations_must_be_positive_minutes(#[case] raw: &str) {
        assert!(parse_duration(raw).is_err());
    }

    #[rstest]
    fn negative_training_ids_parse() {
        let args = CliArgs::try_parse_from(["gym", "training", "show", "-613012908"])
            .expect("arguments should parse");
        assert!(matches!(
            args.command,
            Command::Training(TrainingCommand::Show { id: -613_012_908 })
        ));
    }

    #[rstest]
    fn blank_explicit_database_url_is_rejected() {
        let settings = GymSettings {
            database_url: None,
            pool_max_size: None,
            pool_min_idle: None,
            connection_timeout_secs: None,
            log_json: false,
        };
        let error =
            resolve_database_url(Some("  ".to_owned()), &settings).expect_err("blank should fail");
        assert_eq!(error.kind(), io::ErrorKind::InvalidInput);
    }
}
